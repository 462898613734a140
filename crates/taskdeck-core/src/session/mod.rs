//! Authentication session domain module.
//!
//! - `model`: the session triple and the auth endpoint payloads
//! - `repository`: persistence contract for the session

mod model;
pub mod repository;

pub use model::{
    AccessToken, LoginCredentials, RefreshRequest, RegisterCredentials, RegisteredUser, Session,
    TokenPair,
};
pub use repository::SessionRepository;
