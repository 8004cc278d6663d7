use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("serialize: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("environment: {0}")]
    Environment(#[from] config::ConfigError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
