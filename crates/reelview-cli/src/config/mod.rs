//! `reelview` settings: catalog API origin, request timeout and the genre
//! rows of the home view, read from one TOML file.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, BACKEND_URL_ENV};
pub use paths::resolve_config_path;
