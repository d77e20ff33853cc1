use std::path::PathBuf;
use thiserror::Error;

/// Run-fatal configuration problems, each with its own process exit code
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    BadOption(String),

    #[error("Missing required argument: path to image file or images directory")]
    MissingImagesPath,

    #[error("--keyfile argument must specify the path to a readable key file ({}): {source}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Specified images path '{}' not found or is not readable", .0.display())]
    ImagesPathNotFound(PathBuf),

    #[error("Specified images path '{}' is not readable", .0.display())]
    ImagesPathUnreadable(PathBuf),

    #[error("Specified images path '{}' is not a file or a directory", .0.display())]
    NotFileOrDirectory(PathBuf),
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::BadOption(_) => 2,
            ConfigError::MissingImagesPath => 3,
            ConfigError::KeyFile { .. } => 4,
            ConfigError::ImagesPathNotFound(_) => 5,
            ConfigError::ImagesPathUnreadable(_) => 6,
            ConfigError::NotFileOrDirectory(_) => 7,
        }
    }
}
