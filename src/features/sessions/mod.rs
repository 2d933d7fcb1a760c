//! Ephemeral code-to-file sessions
//!
//! Codes are minted by the key generator, tracked by the registry and
//! expired by one scheduled task per session.

pub mod expiration;
pub mod key_generator;
pub mod models;
pub mod registry;

pub use key_generator::KeyGenerator;
pub use models::Session;
pub use registry::{RegistryError, SessionRegistry};
