//! Session lifecycle: authentication, restoration, namespace orchestration.

pub mod gateway;
pub mod manager;
pub mod models;

pub use gateway::{AuthGateway, EverrestAuthGateway};
pub use manager::SessionManager;
pub use models::{decode_identity, SessionState, SignUpRequest, TokenPair, UserProfile};
