use serde::Serialize;
use std::fmt;

/// A single typed header value as decoded from a FITS card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    String(String),
    Integer(i64),
    Float(f64),
    Logical(bool),
    Absent,
}

impl HeaderValue {
    /// True for values that carry no metadata: `Absent` and zero-length strings.
    /// Numeric zero and logical false are real values and are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            HeaderValue::Absent => true,
            HeaderValue::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::String(s) => f.write_str(s),
            HeaderValue::Integer(n) => write!(f, "{}", n),
            HeaderValue::Float(x) => {
                let magnitude = x.abs();
                if x.is_finite() && *x != 0.0 && !(1e-4..1e16).contains(&magnitude) {
                    return write!(f, "{:e}", x);
                }
                let text = x.to_string();
                // Keep integral floats distinguishable from integers
                if x.is_finite() && !text.contains(['.', 'e', 'E']) {
                    write!(f, "{}.0", text)
                } else {
                    f.write_str(&text)
                }
            }
            HeaderValue::Logical(b) => write!(f, "{}", b),
            HeaderValue::Absent => Ok(()),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::String(value.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::String(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Float(value)
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Logical(value)
    }
}

/// Insertion-ordered key/value view of one header unit.
///
/// Keys are case-sensitive. Repeated keys (commentary cards, or malformed
/// headers) are all kept; lookups return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMapping {
    entries: Vec<(String, HeaderValue)>,
}

impl HeaderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Lookup that folds a missing key into `HeaderValue::Absent`
    pub fn value_or_absent(&self, key: &str) -> HeaderValue {
        self.get(key).cloned().unwrap_or(HeaderValue::Absent)
    }

    pub fn get_integer(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(HeaderValue::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(HeaderValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for HeaderMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = HeaderMapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_natural_forms() {
        assert_eq!(HeaderValue::Integer(512).to_string(), "512");
        assert_eq!(HeaderValue::Float(10.5).to_string(), "10.5");
        assert_eq!(HeaderValue::Float(512.0).to_string(), "512.0");
        assert_eq!(HeaderValue::Float(-0.25).to_string(), "-0.25");
        assert_eq!(HeaderValue::Float(0.0).to_string(), "0.0");
        assert_eq!(HeaderValue::Float(0.0001).to_string(), "0.0001");
        assert_eq!(HeaderValue::Float(1.0e-5).to_string(), "1e-5");
        assert_eq!(HeaderValue::Float(-2.5e-7).to_string(), "-2.5e-7");
        assert_eq!(HeaderValue::Float(1e300).to_string(), "1e300");
        assert_eq!(HeaderValue::Float(1e16).to_string(), "1e16");
        assert_eq!(HeaderValue::Float(123456789.0).to_string(), "123456789.0");
        assert_eq!(HeaderValue::Logical(true).to_string(), "true");
        assert_eq!(HeaderValue::from("M31").to_string(), "M31");
        assert_eq!(HeaderValue::Absent.to_string(), "");
    }

    #[test]
    fn test_is_empty() {
        assert!(HeaderValue::Absent.is_empty());
        assert!(HeaderValue::from("").is_empty());
        assert!(!HeaderValue::from(" ").is_empty());
        assert!(!HeaderValue::Integer(0).is_empty());
        assert!(!HeaderValue::Float(0.0).is_empty());
        assert!(!HeaderValue::Logical(false).is_empty());
    }

    #[test]
    fn test_mapping_preserves_order_and_first_match() {
        let header: HeaderMapping = vec![
            ("SIMPLE", HeaderValue::Logical(true)),
            ("COMMENT", HeaderValue::from("first")),
            ("NAXIS", HeaderValue::Integer(2)),
            ("COMMENT", HeaderValue::from("second")),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = header.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["SIMPLE", "COMMENT", "NAXIS", "COMMENT"]);
        assert_eq!(header.get("COMMENT"), Some(&HeaderValue::from("first")));
        assert_eq!(header.get_integer("NAXIS"), Some(2));
        assert_eq!(header.get("naxis"), None);
        assert_eq!(header.value_or_absent("OBJECT"), HeaderValue::Absent);
    }

    #[test]
    fn test_json_serialization_is_typed() {
        let values = vec![
            HeaderValue::from("M31"),
            HeaderValue::Integer(3),
            HeaderValue::Float(1.5),
            HeaderValue::Logical(false),
            HeaderValue::Absent,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"["M31",3,1.5,false,null]"#);
    }
}
