pub mod client;
pub mod config;
pub mod device;
pub mod models;
pub mod provider;
pub mod session;

pub use client::EmbyClient;
pub use device::DeviceIdentity;
pub use models::ServerKind;
pub use provider::EmbyProvider;
pub use session::{Credentials, Session, SessionManager};
