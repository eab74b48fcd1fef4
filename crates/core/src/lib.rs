pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_settings, parse_settings_str};
pub use error::{Error, Result};
pub use types::*;
