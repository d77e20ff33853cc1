use crate::extract::MetadataPair;
use crate::header::{HeaderMapping, HeaderValue};

/// Name of the derived pair for an axis whose type is right ascension
pub const RIGHT_ASCENSION: &str = "right_ascension";
/// Name of the derived pair for an axis whose type is declination
pub const DECLINATION: &str = "declination";

/// One of the two world-coordinate axes whose reference value is exported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateAxis {
    One,
    Two,
}

impl CoordinateAxis {
    /// Map a coordinate value key (`CRVAL1`/`CRVAL2`) to its axis
    pub fn from_value_key(key: &str) -> Option<Self> {
        match key {
            "CRVAL1" => Some(CoordinateAxis::One),
            "CRVAL2" => Some(CoordinateAxis::Two),
            _ => None,
        }
    }

    pub fn value_key(self) -> &'static str {
        match self {
            CoordinateAxis::One => "CRVAL1",
            CoordinateAxis::Two => "CRVAL2",
        }
    }

    pub fn type_key(self) -> &'static str {
        match self {
            CoordinateAxis::One => "CTYPE1",
            CoordinateAxis::Two => "CTYPE2",
        }
    }
}

/// What an axis type (`CTYPEn`) says the axis measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMeaning {
    RightAscension,
    Declination,
    Unknown,
}

impl AxisMeaning {
    /// Case-sensitive substring match; "RA" takes precedence over "DEC"
    pub fn from_axis_type(axis_type: &str) -> Self {
        if axis_type.contains("RA") {
            AxisMeaning::RightAscension
        } else if axis_type.contains("DEC") {
            AxisMeaning::Declination
        } else {
            AxisMeaning::Unknown
        }
    }
}

/// Produce the raw value pair for an axis and the pair derived from its type.
///
/// When the axis type is missing or names neither RA nor DEC, the derived
/// pair carries the axis' own key with an absent value.
pub fn resolve(axis: CoordinateAxis, header: &HeaderMapping) -> (MetadataPair, MetadataPair) {
    let value_key = axis.value_key();
    let value = header.value_or_absent(value_key);

    let axis_type = header
        .get(axis.type_key())
        .map(|v| v.to_string())
        .unwrap_or_default();

    let derived = match AxisMeaning::from_axis_type(&axis_type) {
        AxisMeaning::RightAscension => MetadataPair::new(RIGHT_ASCENSION, value.clone()),
        AxisMeaning::Declination => MetadataPair::new(DECLINATION, value.clone()),
        AxisMeaning::Unknown => MetadataPair::new(value_key, HeaderValue::Absent),
    };

    (MetadataPair::new(value_key, value), derived)
}
