pub mod emby;
pub mod errors;
pub mod extension;
pub mod models;
pub mod providers;

pub use errors::BridgeError;
pub use extension::ExtensionShell;

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
