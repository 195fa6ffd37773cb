use miette::Diagnostic;
use thiserror::Error;

/// Main error type for atlasc operations
#[derive(Error, Diagnostic, Debug)]
pub enum AtlasError {
    #[error("IO error: {0}")]
    #[diagnostic(code(atlasc::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(atlasc::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Manifest error: {message}")]
    #[diagnostic(code(atlasc::manifest))]
    Manifest {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Load error with {path}: {message}")]
    #[diagnostic(code(atlasc::load))]
    Load {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Pack error: {message}")]
    #[diagnostic(code(atlasc::pack))]
    Pack {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, AtlasError>;
