use crate::fits::{FitsFile, HeaderUnit};
use anyhow::Result;
use std::io::Write;

/// Print the unit summary of a file followed by every non-blank keyword
pub fn show_info<W: Write>(fits: &FitsFile, out: &mut W) -> Result<()> {
    writeln!(out, "Filename: {}", fits.path.display())?;
    writeln!(
        out,
        "{:<5} {:<10} {:>4} {:<18} {:>6} {:<16} {}",
        "No.", "Name", "Ver", "Type", "Cards", "Dimensions", "Format"
    )?;
    for unit in &fits.units {
        writeln!(
            out,
            "{:>3}   {:<10} {:>4} {:<18} {:>6} {:<16} {}",
            unit.index,
            unit.name(),
            unit.header.get_integer("EXTVER").unwrap_or(1),
            unit.kind.name(),
            unit.cards.len(),
            dimensions(unit),
            pixel_format(unit)
        )?;
    }

    for unit in &fits.units {
        for (key, value) in unit.header.iter() {
            let value = value.to_string();
            if !key.is_empty() && !value.is_empty() {
                writeln!(out, "{}: {}", key, value)?;
            }
        }
    }
    writeln!(out)?;
    Ok(())
}

fn dimensions(unit: &HeaderUnit) -> String {
    if unit.kind.is_table() {
        let rows = unit.header.get_integer("NAXIS2").unwrap_or(0);
        let cols = unit.header.get_integer("TFIELDS").unwrap_or(0);
        return format!("{}R x {}C", rows, cols);
    }
    let dims: Vec<String> = unit.dimensions().iter().map(i64::to_string).collect();
    format!("({})", dims.join(", "))
}

fn pixel_format(unit: &HeaderUnit) -> &'static str {
    if unit.kind.is_table() {
        return "";
    }
    match unit.header.get_integer("BITPIX") {
        Some(8) => "uint8",
        Some(16) => "int16",
        Some(32) => "int32",
        Some(64) => "int64",
        Some(-32) => "float32",
        Some(-64) => "float64",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fits::read_fits_from;
    use crate::test_support::{card, fits_bytes, value_card};
    use std::path::Path;

    #[test]
    fn test_show_info_lists_units_and_keywords() {
        let primary = vec![
            value_card("SIMPLE", "T"),
            value_card("BITPIX", "16"),
            value_card("NAXIS", "2"),
            value_card("NAXIS1", "4"),
            value_card("NAXIS2", "2"),
            value_card("OBJECT", "'M51'"),
            value_card("FILTER", "''"),
            card("COMMENT   processed by the pipeline"),
            card(""),
        ];
        let table = vec![
            value_card("XTENSION", "'BINTABLE'"),
            value_card("BITPIX", "8"),
            value_card("NAXIS", "2"),
            value_card("NAXIS1", "4"),
            value_card("NAXIS2", "3"),
            value_card("PCOUNT", "0"),
            value_card("GCOUNT", "1"),
            value_card("TFIELDS", "1"),
            value_card("EXTNAME", "'CATALOG'"),
        ];
        let bytes = fits_bytes(&[(primary, 16), (table, 12)]);
        let fits = read_fits_from(Path::new("/data/m51.fits"), bytes.as_slice()).unwrap();

        let mut out = Vec::new();
        show_info(&fits, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Filename: /data/m51.fits");
        assert!(lines[2].contains("PRIMARY"));
        assert!(lines[2].contains("PrimaryHDU"));
        assert!(lines[2].contains("(4, 2)"));
        assert!(lines[2].ends_with("int16"));
        assert!(lines[3].contains("CATALOG"));
        assert!(lines[3].contains("BinTableHDU"));
        assert!(lines[3].contains("3R x 1C"));

        assert!(text.contains("\nSIMPLE: true\n"));
        assert!(text.contains("\nOBJECT: M51\n"));
        assert!(text.contains("\nCOMMENT:   processed by the pipeline\n"));
        assert!(text.contains("\nEXTNAME: CATALOG\n"));
        assert!(!text.contains("FILTER"));
        assert!(text.ends_with("\n\n"));
    }
}
