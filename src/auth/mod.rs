pub mod cleanup;
pub mod middleware;
pub mod provider;
pub mod session;
pub mod validation;

pub use cleanup::run_cleanup_worker;
pub use middleware::{cookie_value, MaybeSession, RequireSession};
pub use provider::{AdminProfile, AuthError, AuthProvider, Identity, IdentityToolkitProvider};
pub use session::{generate_session_token, BrowserSession, SessionContext, SessionStore, ShellUser};
pub use validation::{FieldErrors, ForgotPasswordForm, LoginForm, SignupForm};
