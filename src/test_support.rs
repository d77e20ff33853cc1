//! Builders for synthetic FITS files used across the unit tests.

use crate::fits::{BLOCK_SIZE, CARD_SIZE};
use std::path::Path;

/// Pad raw card text to the 80-column card width
pub fn card(text: &str) -> String {
    format!("{:<width$}", text, width = CARD_SIZE)
}

/// A `KEYWORD = value` card with the keyword in columns 1-8
pub fn value_card(keyword: &str, value: &str) -> String {
    card(&format!("{:<8}= {}", keyword, value))
}

/// Minimal primary header cards for an image without data
pub fn minimal_primary() -> Vec<String> {
    vec![
        value_card("SIMPLE", "T"),
        value_card("BITPIX", "8"),
        value_card("NAXIS", "0"),
    ]
}

/// Serialize header units (cards plus a zero-filled data unit of the given
/// length) into FITS bytes, adding `END` and block padding
pub fn fits_bytes(units: &[(Vec<String>, usize)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (cards, data_len) in units {
        for c in cards {
            bytes.extend_from_slice(c.as_bytes());
        }
        bytes.extend_from_slice(card("END").as_bytes());
        pad_to_block(&mut bytes, b' ');

        bytes.extend(std::iter::repeat(0u8).take(*data_len));
        pad_to_block(&mut bytes, 0);
    }
    bytes
}

fn pad_to_block(bytes: &mut Vec<u8>, fill: u8) {
    let rem = bytes.len() % BLOCK_SIZE;
    if rem != 0 {
        bytes.resize(bytes.len() + BLOCK_SIZE - rem, fill);
    }
}

/// Write a single-unit FITS file with the given extra primary cards
pub fn write_fits(path: &Path, extra_cards: &[String]) {
    let mut cards = minimal_primary();
    cards.extend_from_slice(extra_cards);
    std::fs::write(path, fits_bytes(&[(cards, 0)])).unwrap();
}
