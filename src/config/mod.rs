// Configuration: settings struct and optional TOML loader

mod loader;
mod settings;

pub use loader::load_settings;
pub use settings::Settings;
