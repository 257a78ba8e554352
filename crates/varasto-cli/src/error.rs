use miette::Diagnostic;
use thiserror::Error;
use varasto_config::error::ConfigError;
use varasto_db::DbError;
use varasto_server::ServerError;
use varasto_utils::error::PathError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error("Failed to run blocking task: {0}")]
    #[diagnostic(code(varasto::task))]
    Task(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
