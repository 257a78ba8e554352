use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum PathError {
    #[error("Failed to get current directory: {source}")]
    #[diagnostic(code(varasto_utils::path::current_dir))]
    CurrentDir { source: std::io::Error },

    #[error("Path is empty")]
    #[diagnostic(code(varasto_utils::path::empty), help("Provide a non-empty path"))]
    Empty,

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(varasto_utils::path::missing_env_var),
        help("Set the environment variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{input}`")]
    #[diagnostic(code(varasto_utils::path::unclosed_variable))]
    UnclosedVariable { input: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum FileSystemError {
    #[error("Failed to {action} directory `{}`: {source}", path.display())]
    #[diagnostic(
        code(varasto_utils::fs::directory),
        help("Check directory permissions")
    )]
    Directory {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },

    #[error("`{}` is not a directory", path.display())]
    #[diagnostic(
        code(varasto_utils::fs::not_a_directory),
        help("Point the path at a directory instead of a file")
    )]
    NotADirectory { path: PathBuf },
}

pub type PathResult<T> = std::result::Result<T, PathError>;
pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_error_display() {
        let error = PathError::MissingEnvVar {
            var: "VARASTO_TEST".into(),
            input: "$VARASTO_TEST/db".into(),
        };
        assert_eq!(
            error.to_string(),
            "Environment variable `VARASTO_TEST` not set in `$VARASTO_TEST/db`"
        );
    }

    #[test]
    fn test_filesystem_error_display() {
        let error = FileSystemError::NotADirectory {
            path: PathBuf::from("/tmp/file"),
        };
        assert_eq!(error.to_string(), "`/tmp/file` is not a directory");
    }
}
