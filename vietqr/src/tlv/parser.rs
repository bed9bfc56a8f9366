//! EMVCo TLV Parser
//!
//! Parses the text TLV structures used by EMVCo merchant-presented QR codes:
//! a 2-digit tag, a 2-digit decimal length, then exactly that many characters
//! of value. Templates (such as the merchant account block) carry further
//! TLV units inside their value and are parsed on demand.

use log::warn;
use thiserror::Error;

use super::take_chars;

/// Errors that can occur while building or parsing TLV units
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TLVError {
    #[error("Invalid tag {0:?}: expected two decimal digits")]
    InvalidTag(String),

    #[error("Invalid length field {length:?} for tag {tag}")]
    InvalidLength { tag: String, length: String },

    #[error("Unexpected end of data while parsing header: {0} characters left")]
    UnexpectedEndHeader(usize),

    #[error("Tag {tag} declares {declared} characters but only {available} remain")]
    UnexpectedEndValue {
        tag: String,
        declared: usize,
        available: usize,
    },

    #[error("Value for tag {tag} is {length} characters, the length field holds at most 99")]
    ValueTooLong { tag: String, length: usize },

    #[error("{0} trailing characters after the last TLV unit")]
    TrailingBytes(usize),
}

/// How the parser treats a remainder too short to hold another header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Leftover characters are an error
    #[default]
    Strict,
    /// Leftover characters are dropped with a warning
    Lenient,
}

/// A single TLV unit
///
/// `value` is kept as text. For template tags the value is itself a sequence
/// of TLV units, see [`TLV::children`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TLV {
    /// Two-digit tag
    pub tag: String,
    /// Raw value text
    pub value: String,
}

impl TLV {
    /// Create a new TLV unit
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }

    /// Get the tag
    pub fn get_t(&self) -> &str {
        &self.tag
    }

    /// Get the length of the value in characters
    pub fn get_l(&self) -> usize {
        self.value.chars().count()
    }

    /// Get the value
    pub fn get_v(&self) -> &str {
        &self.value
    }

    /// Parse the value as a nested TLV sequence
    pub fn children(&self, mode: ParseMode) -> Result<TagMap, TLVError> {
        TLVParser::parse_with(&self.value, mode)
    }
}

/// Ordered tag to value mapping
///
/// Keeps first-insertion order. Inserting a tag that is already present
/// replaces the earlier value in place, so the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<TLV>,
}

impl TagMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a unit, returning the one it replaced
    pub fn insert(&mut self, tlv: TLV) -> Option<TLV> {
        match self.entries.iter_mut().find(|e| e.tag == tlv.tag) {
            Some(slot) => Some(std::mem::replace(slot, tlv)),
            None => {
                self.entries.push(tlv);
                None
            }
        }
    }

    /// Get the value for a tag
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.get_tlv(tag).map(TLV::get_v)
    }

    /// Get the whole unit for a tag
    pub fn get_tlv(&self, tag: &str) -> Option<&TLV> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Check if a tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.get_tlv(tag).is_some()
    }

    /// Parse the value of `tag` as a nested TLV sequence, if present
    pub fn nested(&self, tag: &str, mode: ParseMode) -> Result<Option<TagMap>, TLVError> {
        self.get_tlv(tag).map(|tlv| tlv.children(mode)).transpose()
    }

    /// Iterate over the units in order
    pub fn iter(&self) -> std::slice::Iter<'_, TLV> {
        self.entries.iter()
    }

    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TLV> for TagMap {
    fn from_iter<I: IntoIterator<Item = TLV>>(iter: I) -> Self {
        let mut map = TagMap::new();
        for tlv in iter {
            map.insert(tlv);
        }
        map
    }
}

impl<'a> IntoIterator for &'a TagMap {
    type Item = &'a TLV;
    type IntoIter = std::slice::Iter<'a, TLV>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Parse every TLV unit in `data`, in order, duplicates included
///
/// Stops when fewer than 4 characters remain. What happens to that remainder
/// depends on `mode`.
pub fn read_list(data: &str, mode: ParseMode) -> Result<Vec<TLV>, TLVError> {
    let mut result = Vec::new();
    let mut remaining = data;

    while remaining.chars().nth(3).is_some() {
        let (tlv, rest) = read_single(remaining)?;
        result.push(tlv);
        remaining = rest;
    }

    if !remaining.is_empty() {
        let leftover = remaining.chars().count();
        match mode {
            ParseMode::Strict => return Err(TLVError::TrailingBytes(leftover)),
            ParseMode::Lenient => {
                warn!("Dropping {} trailing characters {:?}", leftover, remaining);
            }
        }
    }

    Ok(result)
}

/// Parse a single TLV unit and return it with the unparsed rest
pub fn read_single(data: &str) -> Result<(TLV, &str), TLVError> {
    let (header, rest) =
        take_chars(data, 4).ok_or_else(|| TLVError::UnexpectedEndHeader(data.chars().count()))?;
    let (tag, length) = take_chars(header, 2).unwrap_or_default();

    if !is_two_digits(tag) {
        return Err(TLVError::InvalidTag(tag.to_string()));
    }
    if !is_two_digits(length) {
        return Err(TLVError::InvalidLength {
            tag: tag.to_string(),
            length: length.to_string(),
        });
    }

    // Two ASCII digits always parse
    let declared: usize = length.parse().unwrap_or_default();
    let (value, rest) = take_chars(rest, declared).ok_or_else(|| TLVError::UnexpectedEndValue {
        tag: tag.to_string(),
        declared,
        available: rest.chars().count(),
    })?;

    Ok((TLV::new(tag, value), rest))
}

pub(crate) fn is_two_digits(s: &str) -> bool {
    s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Entry point producing a [`TagMap`]
pub struct TLVParser;

impl TLVParser {
    /// Parse strictly into a tag map
    pub fn parse(data: &str) -> Result<TagMap, TLVError> {
        Self::parse_with(data, ParseMode::Strict)
    }

    /// Parse into a tag map with the given mode
    pub fn parse_with(data: &str, mode: ParseMode) -> Result<TagMap, TLVError> {
        Ok(read_list(data, mode)?.into_iter().collect())
    }
}
