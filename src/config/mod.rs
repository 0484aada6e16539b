#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod sites;

#[cfg(feature = "cli")]
pub use cli::{QueryArgs, ServeArgs};
pub use settings::Settings;
pub use sites::load_sites;
