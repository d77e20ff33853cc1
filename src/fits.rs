use crate::header::{HeaderMapping, HeaderValue};
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// FITS files are organized in logical records of 2880 bytes
pub const BLOCK_SIZE: usize = 2880;
/// Each header record is split into 36 cards of 80 ASCII characters
pub const CARD_SIZE: usize = 80;
/// Largest axis count the standard allows
pub const MAX_NAXIS: i64 = 999;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Source of per-file header units.
///
/// The metadata, info and verify commands only ever see files through this
/// trait, so tests can feed them in-memory headers.
pub trait HeaderProvider {
    fn read(&self, path: &Path) -> Result<FitsFile>;
}

/// Header provider backed by the filesystem, reading plain or gzipped FITS
#[derive(Debug, Default, Clone, Copy)]
pub struct FitsReader;

impl HeaderProvider for FitsReader {
    fn read(&self, path: &Path) -> Result<FitsFile> {
        read_fits(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    Primary,
    Image,
    AsciiTable,
    BinaryTable,
    Other(String),
}

impl UnitKind {
    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Primary => "PrimaryHDU",
            UnitKind::Image => "ImageHDU",
            UnitKind::AsciiTable => "TableHDU",
            UnitKind::BinaryTable => "BinTableHDU",
            UnitKind::Other(_) => "NonstandardExtHDU",
        }
    }

    fn from_xtension(value: &str) -> Self {
        match value.trim() {
            "IMAGE" => UnitKind::Image,
            "TABLE" => UnitKind::AsciiTable,
            "BINTABLE" => UnitKind::BinaryTable,
            other => UnitKind::Other(other.to_string()),
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, UnitKind::AsciiTable | UnitKind::BinaryTable)
    }
}

/// One 80-column header card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub keyword: String,
    pub value: HeaderValue,
    /// True when the card carries a `= ` value indicator
    pub has_value: bool,
    /// The value field could not be decoded as any FITS literal
    pub malformed: bool,
    /// All 80 bytes were printable ASCII
    pub printable: bool,
    pub raw: String,
}

/// A header-data unit: the decoded header plus what is known about its data
#[derive(Debug, Clone)]
pub struct HeaderUnit {
    pub index: usize,
    pub kind: UnitKind,
    pub cards: Vec<Card>,
    pub header: HeaderMapping,
    pub has_end: bool,
    /// Data size declared by the header, without padding
    pub data_len: u64,
    /// Data bytes (including padding) actually present in the file
    pub data_read: u64,
}

impl HeaderUnit {
    pub fn name(&self) -> String {
        match self.header.get_str("EXTNAME") {
            Some(name) => name.to_string(),
            None if self.index == 0 => "PRIMARY".to_string(),
            None => String::new(),
        }
    }

    pub fn padded_data_len(&self) -> u64 {
        padded_len(self.data_len)
    }

    /// Axis lengths NAXIS1..NAXISn, skipping axes the header does not declare
    pub fn dimensions(&self) -> Vec<i64> {
        let naxis = self.header.get_integer("NAXIS").unwrap_or(0).clamp(0, MAX_NAXIS);
        (1..=naxis)
            .filter_map(|i| self.header.get_integer(&format!("NAXIS{}", i)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct FitsFile {
    pub path: PathBuf,
    pub units: Vec<HeaderUnit>,
    /// Bytes after the last unit that do not start a valid extension
    pub trailing_bytes: bool,
}

impl FitsFile {
    pub fn primary(&self) -> Option<&HeaderUnit> {
        self.units.first()
    }

    /// Header of the primary unit, empty if the file has none
    pub fn primary_header(&self) -> HeaderMapping {
        self.primary()
            .map(|unit| unit.header.clone())
            .unwrap_or_default()
    }
}

/// Read every header unit of a FITS file, decompressing gzip transparently
pub fn read_fits(path: &Path) -> Result<FitsFile> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open FITS file: {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let is_gzip = reader
        .fill_buf()
        .with_context(|| format!("Failed to read FITS file: {}", path.display()))?
        .starts_with(&GZIP_MAGIC);

    let result = if is_gzip {
        read_fits_from(path, GzDecoder::new(reader))
    } else {
        read_fits_from(path, reader)
    };
    result.with_context(|| format!("Failed to read FITS file: {}", path.display()))
}

/// Read header units from any byte stream; `path` is only recorded
pub fn read_fits_from<R: Read>(path: &Path, mut reader: R) -> Result<FitsFile> {
    let mut units = Vec::new();
    let mut trailing_bytes = false;
    let mut block = vec![0u8; BLOCK_SIZE];

    loop {
        let index = units.len();
        let n = fill_block(&mut reader, &mut block)?;

        if n < BLOCK_SIZE {
            if index == 0 {
                anyhow::bail!("file is shorter than one {}-byte FITS block", BLOCK_SIZE);
            }
            trailing_bytes = n > 0;
            break;
        }

        let first = parse_card(&block[..CARD_SIZE]);
        let kind = if index == 0 {
            if first.keyword != "SIMPLE" {
                anyhow::bail!(
                    "not a FITS file: first keyword is '{}', expected SIMPLE",
                    first.keyword
                );
            }
            UnitKind::Primary
        } else if first.keyword == "XTENSION" {
            match &first.value {
                HeaderValue::String(s) => UnitKind::from_xtension(s),
                other => UnitKind::Other(other.to_string()),
            }
        } else {
            trailing_bytes = true;
            break;
        };

        let mut cards = Vec::new();
        let mut has_end = false;
        loop {
            for chunk in block.chunks(CARD_SIZE) {
                let card = parse_card(chunk);
                if card.keyword == "END" {
                    has_end = true;
                    break;
                }
                cards.push(card);
            }
            if has_end {
                break;
            }
            if fill_block(&mut reader, &mut block)? < BLOCK_SIZE {
                break;
            }
        }

        let header = build_mapping(&cards);
        if let Some(naxis) = header.get_integer("NAXIS") {
            if !(0..=MAX_NAXIS).contains(&naxis) {
                anyhow::bail!(
                    "HDU {}: NAXIS value {} is outside 0..={}",
                    index,
                    naxis,
                    MAX_NAXIS
                );
            }
        }
        let data_len = data_unit_len(&header, index == 0);
        let data_read = if has_end {
            io::copy(&mut (&mut reader).take(padded_len(data_len)), &mut io::sink())?
        } else {
            0
        };

        tracing::debug!(
            "HDU {} ({}): {} cards, {} data bytes",
            index,
            kind.name(),
            cards.len(),
            data_len
        );

        let complete = has_end && data_read == padded_len(data_len);
        units.push(HeaderUnit {
            index,
            kind,
            cards,
            header,
            has_end,
            data_len,
            data_read,
        });

        if !complete {
            break;
        }
    }

    Ok(FitsFile {
        path: path.to_path_buf(),
        units,
        trailing_bytes,
    })
}

/// Fill `buf` as far as the stream allows; decoders may return short reads
fn fill_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn padded_len(len: u64) -> u64 {
    let block = BLOCK_SIZE as u64;
    len.div_ceil(block) * block
}

/// Size in bytes of the data unit that follows a header
fn data_unit_len(header: &HeaderMapping, primary: bool) -> u64 {
    let naxis = header.get_integer("NAXIS").unwrap_or(0).clamp(0, MAX_NAXIS);
    if naxis == 0 {
        return 0;
    }

    let bytes_per_value = header.get_integer("BITPIX").unwrap_or(0).unsigned_abs() / 8;
    let random_groups = primary
        && header.get("GROUPS") == Some(&HeaderValue::Logical(true))
        && header.get_integer("NAXIS1") == Some(0);

    let mut values: u64 = 1;
    for i in 1..=naxis {
        if i == 1 && random_groups {
            continue;
        }
        let len = header.get_integer(&format!("NAXIS{}", i)).unwrap_or(0).max(0);
        values = values.saturating_mul(len as u64);
    }

    let pcount = header.get_integer("PCOUNT").unwrap_or(0).max(0) as u64;
    let gcount = header.get_integer("GCOUNT").unwrap_or(1).max(0) as u64;
    bytes_per_value
        .saturating_mul(gcount)
        .saturating_mul(pcount.saturating_add(values))
}

fn is_commentary(keyword: &str) -> bool {
    matches!(keyword, "" | "COMMENT" | "HISTORY")
}

/// Decode one 80-byte card
pub fn parse_card(bytes: &[u8]) -> Card {
    let printable = bytes.iter().all(|b| (0x20..=0x7e).contains(b));
    // Map anything outside printable ASCII to '?' so column slicing stays on char boundaries
    let raw: String = bytes
        .iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '?' })
        .collect();

    let keyword = raw.get(..8).unwrap_or(raw.as_str()).trim_end().to_string();
    let rest = raw.get(8..).unwrap_or("");

    let (value, has_value, malformed) = if rest.starts_with("= ") && !is_commentary(&keyword) {
        let (value, malformed) = parse_value(&rest[2..]);
        (value, true, malformed)
    } else if keyword == "CONTINUE" {
        let (value, malformed) = parse_value(rest);
        (value, false, malformed)
    } else {
        (HeaderValue::String(rest.trim_end().to_string()), false, false)
    };

    Card {
        keyword,
        value,
        has_value,
        malformed,
        printable,
        raw,
    }
}

/// Decode the value field of a card (everything after `= `).
/// Returns the value and whether the field was malformed.
fn parse_value(field: &str) -> (HeaderValue, bool) {
    let trimmed = field.trim_start();

    if let Some(body) = trimmed.strip_prefix('\'') {
        let mut text = String::new();
        let mut chars = body.chars().peekable();
        let mut closed = false;
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    text.push('\'');
                    chars.next();
                } else {
                    closed = true;
                    break;
                }
            } else {
                text.push(c);
            }
        }
        // Trailing blanks in string values are not significant
        return (HeaderValue::String(text.trim_end().to_string()), !closed);
    }

    let token = match trimmed.find('/') {
        Some(pos) => &trimmed[..pos],
        None => trimmed,
    }
    .trim();

    if token.is_empty() {
        return (HeaderValue::Absent, false);
    }
    match token {
        "T" => return (HeaderValue::Logical(true), false),
        "F" => return (HeaderValue::Logical(false), false),
        _ => {}
    }
    if let Ok(n) = token.parse::<i64>() {
        return (HeaderValue::Integer(n), false);
    }
    if is_real_literal(token) {
        if let Ok(x) = token.replace(['D', 'd'], "E").parse::<f64>() {
            return (HeaderValue::Float(x), false);
        }
    }
    if token.starts_with('(') && token.ends_with(')') {
        // Complex values are kept in their textual form
        return (HeaderValue::String(token.to_string()), false);
    }
    (HeaderValue::String(token.to_string()), true)
}

fn is_real_literal(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'E' | 'e' | 'D' | 'd'))
}

/// Build the ordered key/value mapping for a unit, joining `CONTINUE`
/// long-string cards onto the value they extend
fn build_mapping(cards: &[Card]) -> HeaderMapping {
    let mut mapping = HeaderMapping::new();
    let mut i = 0;
    while i < cards.len() {
        let card = &cards[i];
        i += 1;

        let mut value = card.value.clone();
        if card.has_value {
            if let HeaderValue::String(text) = &mut value {
                while text.ends_with('&') && i < cards.len() && cards[i].keyword == "CONTINUE" {
                    match &cards[i].value {
                        HeaderValue::String(more) if !cards[i].malformed => {
                            text.pop();
                            text.push_str(more);
                            i += 1;
                        }
                        _ => break,
                    }
                }
            }
        }
        mapping.insert(card.keyword.clone(), value);
    }
    mapping
}
