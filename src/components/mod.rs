//! Maud HTML template components for the web UI.
//!
//! Components are organized into submodules by functionality:
//!
//! - `layout`: Signed-in shell (sidebar, header) and the auth layout
//! - `badge`: Account, post and report status badges
//! - `button`: Buttons and single-action POST forms
//! - `alert`: Alerts, toasts and status boxes
//! - `card`: Dashboard stats cards and panels
//! - `form`: Form elements and the table filter box
//! - `table`: Data table, sortable headers, key-value table
//! - `media`: Avatars and the post media gallery
//! - `modal`: Detail dialogs
//! - `pagination`: Previous/Next controls
//! - `tabs`: Tab navigation
//!
//! # Example
//!
//! ```ignore
//! use maud::{html, Markup};
//! use crate::components::{Alert, BaseLayout, Button};
//!
//! fn my_page(user: &ShellUser) -> Markup {
//!     let content = html! {
//!         (Alert::success("Nothing left to review"))
//!         (Button::outline("Refresh").href("/posts"))
//!     };
//!     BaseLayout::new("Posts", user, "/posts").render(content)
//! }
//! ```

pub mod alert;
pub mod badge;
pub mod button;
pub mod card;
pub mod form;
pub mod layout;
pub mod media;
pub mod modal;
pub mod pagination;
pub mod table;
pub mod tabs;

pub use alert::{Alert, StatusBox, Toast, Tone};
pub use badge::{Badge, BadgeTone};
pub use button::{ActionButton, Button, ButtonStyle};
pub use card::{EmptyState, Panel, StatsCard, StatsCardGrid};
pub use form::{AuthForm, Field, FilterBox};
pub use layout::{AuthLayout, BaseLayout};
pub use media::{Avatar, MediaGallery};
pub use modal::Modal;
pub use pagination::{with_query, Pagination};
pub use table::{KeyValueTable, SortHeader, Table, TableRow};
pub use tabs::TabGroup;
