use crate::fits::{FitsFile, HeaderUnit, UnitKind, MAX_NAXIS};
use crate::header::HeaderValue;
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

const VALID_BITPIX: &[i64] = &[8, 16, 32, 64, -32, -64];
const DATE_KEYWORDS: &[&str] = &["DATE", "DATE-OBS"];

static KEYWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_-]{0,8}$").expect("valid keyword regex"));

/// Collect standard-conformance warnings for every unit of a file.
/// Never fails: each problem becomes one human-readable message.
pub fn check_file(fits: &FitsFile) -> Vec<String> {
    let mut warnings = Vec::new();
    for unit in &fits.units {
        check_unit(unit, &mut warnings);
    }
    if fits.trailing_bytes {
        warnings.push("Unrecognised bytes follow the last HDU".to_string());
    }
    warnings
}

fn check_unit(unit: &HeaderUnit, warnings: &mut Vec<String>) {
    let hdu = unit.index;
    let mut warn = |message: String| warnings.push(format!("HDU {}: {}", hdu, message));

    check_mandatory_keywords(unit, &mut warn);

    let mut seen = HashSet::new();
    for (position, card) in unit.cards.iter().enumerate() {
        let card_no = position + 1;
        if !card.printable {
            warn(format!(
                "Card {} ({}) contains characters outside printable ASCII",
                card_no, card.keyword
            ));
        }
        if !KEYWORD_PATTERN.is_match(&card.keyword) {
            warn(format!("Card {}: illegal keyword name '{}'", card_no, card.keyword));
        }
        if card.malformed {
            warn(format!(
                "Card {}: unparsable value for keyword '{}': {}",
                card_no,
                card.keyword,
                card.raw.trim_end()
            ));
        }
        if card.has_value && !seen.insert(card.keyword.as_str()) {
            warn(format!("Duplicate keyword '{}' at card {}", card.keyword, card_no));
        }
    }

    for keyword in DATE_KEYWORDS {
        if let Some(value) = unit.header.get(keyword) {
            if !is_valid_date(value) {
                warn(format!("{} value '{}' is not a valid FITS date", keyword, value));
            }
        }
    }

    if !unit.has_end {
        warn("Header is missing the END card".to_string());
    } else if unit.data_read < unit.data_len {
        warn(format!(
            "Data unit is truncated: header declares {} bytes but only {} are present",
            unit.data_len, unit.data_read
        ));
    } else if unit.data_read < unit.padded_data_len() {
        warn("Data unit is not padded to a multiple of 2880 bytes".to_string());
    }
}

/// Fixed-position keywords: SIMPLE/XTENSION, BITPIX, NAXIS, NAXISn, and
/// PCOUNT/GCOUNT for extensions
fn check_mandatory_keywords(unit: &HeaderUnit, warn: &mut impl FnMut(String)) {
    let mut expected: Vec<String> = Vec::new();
    match unit.kind {
        UnitKind::Primary => {
            if unit.header.get("SIMPLE") != Some(&HeaderValue::Logical(true)) {
                warn("SIMPLE keyword is not T; file does not conform to the standard".to_string());
            }
            expected.push("SIMPLE".to_string());
        }
        _ => {
            if unit.header.get_str("XTENSION").is_none() {
                warn("XTENSION value is not a string".to_string());
            }
            if let UnitKind::Other(name) = &unit.kind {
                warn(format!("Unknown extension type '{}'", name));
            }
            expected.push("XTENSION".to_string());
        }
    }
    expected.push("BITPIX".to_string());
    expected.push("NAXIS".to_string());

    match unit.header.get_integer("BITPIX") {
        Some(bitpix) if VALID_BITPIX.contains(&bitpix) => {}
        Some(bitpix) => warn(format!("Invalid BITPIX value {}", bitpix)),
        None => warn("BITPIX keyword is missing or not an integer".to_string()),
    }

    let naxis = match unit.header.get_integer("NAXIS") {
        Some(n) if (0..=MAX_NAXIS).contains(&n) => n,
        Some(n) => {
            warn(format!("NAXIS value {} is outside 0..{}", n, MAX_NAXIS));
            0
        }
        None => {
            warn("NAXIS keyword is missing or not an integer".to_string());
            0
        }
    };

    for i in 1..=naxis {
        let key = format!("NAXIS{}", i);
        match unit.header.get_integer(&key) {
            Some(len) if len >= 0 => {}
            Some(len) => warn(format!("{} has negative length {}", key, len)),
            None => warn(format!("{} keyword is missing or not an integer", key)),
        }
        expected.push(key);
    }

    if unit.kind != UnitKind::Primary {
        for key in ["PCOUNT", "GCOUNT"] {
            if unit.header.get_integer(key).is_none() {
                warn(format!("{} keyword is missing or not an integer", key));
            }
            expected.push(key.to_string());
        }
    }

    for (position, key) in expected.iter().enumerate() {
        let actual = unit.cards.get(position).map(|c| c.keyword.as_str());
        if actual != Some(key.as_str()) && unit.header.get(key).is_some() {
            warn(format!(
                "{} should be card {} but found '{}' there",
                key,
                position + 1,
                actual.unwrap_or("")
            ));
        }
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDThh:mm:ss[.s...]` and legacy `DD/MM/YY`
fn is_valid_date(value: &HeaderValue) -> bool {
    let HeaderValue::String(text) = value else {
        return false;
    };
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(text, "%d/%m/%y").is_ok()
}

/// Append a file's warnings to the problem log, creating it if needed
pub fn append_problems(log_path: &Path, file_path: &Path, warnings: &[String]) -> Result<()> {
    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open problem log: {}", log_path.display()))?;

    let mut entry = format!("FILE: {}\n", file_path.display());
    for warning in warnings {
        entry.push_str(warning);
        entry.push('\n');
    }
    log.write_all(entry.as_bytes())
        .with_context(|| format!("Failed to write problem log: {}", log_path.display()))?;
    Ok(())
}
