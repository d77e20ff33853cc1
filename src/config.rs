use crate::catalog::KeyCatalog;
use crate::cli::{ActionKind, Cli, OutputFormat};
use crate::error::ConfigError;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What each file of the run is processed with
#[derive(Debug, Clone)]
pub enum Action {
    Info,
    Metadata {
        catalog: KeyCatalog,
        format: OutputFormat,
    },
    Verify {
        problem_log: PathBuf,
    },
}

/// The validated images path of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagesTarget {
    File(PathBuf),
    Directory(PathBuf),
}

impl ImagesTarget {
    /// Check that `path` exists, is readable, and is a file or directory
    pub fn validate(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path)
            .map_err(|_| ConfigError::ImagesPathNotFound(path.to_path_buf()))?;

        let readable = |result: std::io::Result<()>| match result {
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                Err(ConfigError::ImagesPathUnreadable(path.to_path_buf()))
            }
            Err(_) => Err(ConfigError::ImagesPathNotFound(path.to_path_buf())),
            Ok(()) => Ok(()),
        };

        if metadata.is_file() {
            readable(File::open(path).map(|_| ()))?;
            Ok(ImagesTarget::File(path.to_path_buf()))
        } else if metadata.is_dir() {
            readable(fs::read_dir(path).map(|_| ()))?;
            Ok(ImagesTarget::Directory(path.to_path_buf()))
        } else {
            Err(ConfigError::NotFileOrDirectory(path.to_path_buf()))
        }
    }
}

/// Immutable configuration of one run, built once from the command line
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub action: Action,
    pub target: ImagesTarget,
}

impl RunConfig {
    /// Validate the command line. The key catalog is loaded here, before any
    /// file is touched, so a bad key file aborts the whole run.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let action = match cli.action() {
            ActionKind::Info => Action::Info,
            ActionKind::Metadata => Action::Metadata {
                catalog: KeyCatalog::load(Path::new(cli.keyfile.trim()))?,
                format: cli.format,
            },
            ActionKind::Verify => Action::Verify {
                problem_log: PathBuf::from(&cli.problem_log),
            },
        };

        let images_path = cli
            .images_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingImagesPath)?;
        let target = ImagesTarget::validate(Path::new(images_path))?;

        Ok(Self { action, target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fits-meta").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_info_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();

        let config = RunConfig::from_cli(&cli(&[path])).unwrap();
        assert!(matches!(config.action, Action::Info));
        assert_eq!(config.target, ImagesTarget::Directory(dir.path().to_path_buf()));
    }

    #[test]
    fn test_metadata_loads_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let keys = dir.path().join("keys.txt");
        let image = dir.path().join("a.fits");
        fs::write(&keys, "OBJECT\nCRVAL1\n").unwrap();
        fs::write(&image, b"").unwrap();

        let config = RunConfig::from_cli(&cli(&[
            "--metadata",
            "--keyfile",
            keys.to_str().unwrap(),
            image.to_str().unwrap(),
        ]))
        .unwrap();

        match config.action {
            Action::Metadata { catalog, format } => {
                assert_eq!(catalog.desired_keys(), ["OBJECT", "CRVAL1"]);
                assert_eq!(format, OutputFormat::Text);
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert_eq!(config.target, ImagesTarget::File(image));
    }

    #[test]
    fn test_key_file_checked_before_images_path() {
        let err = RunConfig::from_cli(&cli(&["--metadata", "--keyfile", "/no/such/keys.txt"]))
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_key_file_ignored_for_other_actions() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::from_cli(&cli(&[
            "--verify",
            "--keyfile",
            "/no/such/keys.txt",
            "--problem-log",
            "log.txt",
            dir.path().to_str().unwrap(),
        ]))
        .unwrap();
        match config.action {
            Action::Verify { problem_log } => assert_eq!(problem_log, PathBuf::from("log.txt")),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_blank_images_path() {
        assert_eq!(RunConfig::from_cli(&cli(&[])).unwrap_err().exit_code(), 3);
        assert_eq!(RunConfig::from_cli(&cli(&["  "])).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn test_nonexistent_images_path() {
        let err = RunConfig::from_cli(&cli(&["/no/such/images"])).unwrap_err();
        assert!(matches!(err, ConfigError::ImagesPathNotFound(_)));
        assert_eq!(err.exit_code(), 5);
    }

    #[cfg(unix)]
    #[test]
    fn test_special_file_is_not_file_or_directory() {
        let err = ImagesTarget::validate(Path::new("/dev/null")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFileOrDirectory(_)));
        assert_eq!(err.exit_code(), 7);
    }
}
