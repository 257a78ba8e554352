use miette::Diagnostic;
use thiserror::Error;
use varasto_utils::error::{FileSystemError, PathError};

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(varasto_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(varasto_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {0}")]
    #[diagnostic(
        code(varasto_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists(String),

    #[error("Host must not be empty")]
    #[diagnostic(
        code(varasto_config::empty_host),
        help("Set `host` to an address such as \"::1\" or \"127.0.0.1\"")
    )]
    EmptyHost,

    #[error("Page size must be greater than zero")]
    #[diagnostic(
        code(varasto_config::page_size),
        help("Remove `page_size` for unbounded lists or set a positive value")
    )]
    InvalidPageSize,

    #[error("IO error: {0}")]
    #[diagnostic(code(varasto_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
