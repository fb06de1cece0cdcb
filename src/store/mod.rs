mod models;
mod posts;
pub mod scoring;
mod sessions;
mod users;

pub use models::*;
pub use posts::{PostError, PostStore};
pub use sessions::{SessionError, SessionStore};
pub use users::{UserError, UserStore};
