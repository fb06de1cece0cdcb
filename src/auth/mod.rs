pub mod middleware;
pub mod password;
pub mod session;
pub mod token;

pub use middleware::{MaybeSession, RequireSession};
pub use password::{hash_password, verify_password};
pub use session::{expired_session_cookie, session_cookie, session_token, SESSION_COOKIE};
pub use token::{decode_token, issue_token, Claims, TokenError};
