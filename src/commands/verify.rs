use crate::conformance::{append_problems, check_file};
use crate::fits::FitsFile;
use anyhow::Result;
use std::path::Path;

/// Check a file against the FITS standard and append any warnings to the
/// problem log. Returns the number of warnings found.
pub fn verify_file(fits: &FitsFile, problem_log: &Path) -> Result<usize> {
    let warnings = check_file(fits);
    if warnings.is_empty() {
        tracing::debug!("{}: conforms to the FITS standard", fits.path.display());
        return Ok(0);
    }

    tracing::warn!(
        "{}: {} conformance warning(s) written to {}",
        fits.path.display(),
        warnings.len(),
        problem_log.display()
    );
    append_problems(problem_log, &fits.path, &warnings)?;
    Ok(warnings.len())
}
