pub mod extract_metadata;
pub mod show_info;
pub mod verify;

pub use extract_metadata::MetadataWriter;
pub use show_info::show_info;
pub use verify::verify_file;

use crate::config::{Action, ImagesTarget, RunConfig};
use crate::extract::MetadataExtractor;
use crate::fits::HeaderProvider;
use crate::walk::find_fits_files;
use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome counts of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub failed: usize,
    pub with_problems: usize,
}

/// Process every file of the run with its action, one file at a time.
///
/// A file the provider cannot read is reported and skipped; only failures to
/// write results end the run early.
pub fn run<P: HeaderProvider, W: Write>(
    config: &RunConfig,
    provider: &P,
    out: W,
) -> Result<RunSummary> {
    let files: Box<dyn Iterator<Item = PathBuf>> = match &config.target {
        ImagesTarget::File(path) => Box::new(std::iter::once(path.clone())),
        ImagesTarget::Directory(dir) => {
            tracing::info!("Scanning directory: {}", dir.display());
            Box::new(find_fits_files(dir))
        }
    };

    match &config.action {
        Action::Info => {
            let mut out = out;
            for_each_file(files, provider, |fits| {
                show_info(fits, &mut out)?;
                Ok(false)
            })
        }
        Action::Metadata { catalog, format } => {
            let extractor = MetadataExtractor::new(catalog);
            let mut writer = MetadataWriter::new(*format, out)?;
            let summary = for_each_file(files, provider, |fits| {
                let metadata = extractor.extract(&fits.path, &fits.primary_header());
                writer.write(&fits.path, &metadata)?;
                Ok(false)
            })?;
            writer.finish()?;
            Ok(summary)
        }
        Action::Verify { problem_log } => for_each_file(files, provider, |fits| {
            Ok(verify_file(fits, problem_log)? > 0)
        }),
    }
}

/// Read each file through the provider and hand it to `handle`, which
/// returns whether the file had problems worth counting
fn for_each_file<P, F>(
    files: impl Iterator<Item = PathBuf>,
    provider: &P,
    mut handle: F,
) -> Result<RunSummary>
where
    P: HeaderProvider,
    F: FnMut(&crate::fits::FitsFile) -> Result<bool>,
{
    let mut summary = RunSummary::default();
    for path in files {
        match provider.read(&path) {
            Ok(fits) => {
                summary.processed += 1;
                if handle(&fits)? {
                    summary.with_problems += 1;
                }
            }
            Err(e) => {
                summary.failed += 1;
                report_failure(&path, &e);
            }
        }
    }
    tracing::info!(
        "Processed {} files ({} failed, {} with problems)",
        summary.processed,
        summary.failed,
        summary.with_problems
    );
    Ok(summary)
}

fn report_failure(path: &Path, err: &anyhow::Error) {
    tracing::error!("Skipping {}: {:#}", path.display(), err);
}
