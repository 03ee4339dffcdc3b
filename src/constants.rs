//! Shared constants used across the application.

/// User agent sent with backend and identity provider requests.
pub const USER_AGENT: &str = concat!("filxconnect-admin/", env!("CARGO_PKG_VERSION"));

/// Image host prefix for media paths that are not absolute URLs.
pub const DEFAULT_MEDIA_BASE_URL: &str =
    "https://res.cloudinary.com/djvat4mcp/image/upload/v1741357526/";

/// Avatar shown when a user has no profile picture.
pub const DEFAULT_AVATAR_URL: &str =
    "https://res.cloudinary.com/djvat4mcp/image/upload/v1741357526/zybt9ffewrjwhq7tyvy1.png";

/// Placeholder for a user id that could not be resolved to a username.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Name shown in the header when the signed-in admin has no name on record.
pub const FALLBACK_ADMIN_NAME: &str = "Admin User";

/// Email shown in the header when the identity carries none.
pub const FALLBACK_ADMIN_EMAIL: &str = "admin@filxconnect.com";

/// Role written to the profile record of every admin created through signup.
pub const ADMIN_ROLE: &str = "SUPER_ADMIN";

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Name of the one-shot cookie carrying a toast message across a redirect.
pub const FLASH_COOKIE: &str = "flash";

/// Session lifetime in seconds (12 hours).
pub const SESSION_MAX_AGE_SECS: i64 = 12 * 60 * 60;

/// Number of notifications shown on the dashboard.
pub const DASHBOARD_NOTIFICATION_COUNT: usize = 3;

/// Characters of post content shown in the posts table.
pub const POST_PREVIEW_CHARS: usize = 20;
