//! Authentication, sessions and role-based access

mod access;
mod session;

pub use access::{authorize, ensure_allowed, navigation, Access, Action, NavItem, Page, Scope};
pub use session::{authenticate, Session};
