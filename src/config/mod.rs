//! Project configuration (`.securebox.toml`).

pub mod settings;

pub use settings::Settings;
