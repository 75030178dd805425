//! Chart palette.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// Palette used for result charts, assigned by candidate index.
pub const CHART_COLORS: [ChartColor; 4] = [
    ChartColor::rgb(0x3B, 0x82, 0xF6),
    ChartColor::rgb(0xEF, 0x44, 0x44),
    ChartColor::rgb(0x10, 0xB9, 0x81),
    ChartColor::rgb(0xF5, 0x9E, 0x0B),
];

/// An sRGB colour, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChartColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ChartColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Colour for the candidate at `index` in its registry list.
    pub fn for_index(index: usize) -> Self {
        CHART_COLORS[index % CHART_COLORS.len()]
    }

    /// Parse `#RRGGBB` (case-insensitive, leading `#` required).
    pub fn parse_hex(s: &str) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for ChartColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ChartColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ChartColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}
