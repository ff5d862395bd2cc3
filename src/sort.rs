//! Gallery ordering.
//!
//! [`sort_items`] is a pure function from (items, mode) to a fresh vector. The
//! input slice is never reordered in place.
//!
//! There are exactly three modes. Any other mode string parses as
//! [`SortMode::Random`]: the gallery always shows *some* order, and a stale
//! query parameter or config value must not break the page.

use crate::types::GalleryItem;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMode {
    #[default]
    Random,
    TitleAsc,
    TitleDesc,
}

impl SortMode {
    /// All modes in dropdown order.
    pub const ALL: [SortMode; 3] = [SortMode::Random, SortMode::TitleAsc, SortMode::TitleDesc];

    /// Parse a mode name. Unrecognized names are `Random`.
    pub fn parse(value: &str) -> Self {
        match value {
            "titleAsc" => SortMode::TitleAsc,
            "titleDesc" => SortMode::TitleDesc,
            _ => SortMode::Random,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Random => "random",
            SortMode::TitleAsc => "titleAsc",
            SortMode::TitleDesc => "titleDesc",
        }
    }

    /// Dropdown label.
    pub fn label(self) -> &'static str {
        match self {
            SortMode::Random => "Randomized",
            SortMode::TitleAsc => "A to Z",
            SortMode::TitleDesc => "Z to A",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        SortMode::parse(&value)
    }
}

impl From<SortMode> for String {
    fn from(mode: SortMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Order gallery items without touching the input.
///
/// `None` (no data yet) yields an empty vector. Title sorts are stable, so
/// items with equal titles keep their relative order.
pub fn sort_items(items: Option<&[GalleryItem]>, mode: SortMode) -> Vec<GalleryItem> {
    let Some(items) = items else {
        return Vec::new();
    };
    let mut sorted = items.to_vec();
    match mode {
        SortMode::TitleAsc => sorted.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
        SortMode::TitleDesc => sorted.sort_by(|a, b| locale_cmp(&b.title, &a.title)),
        SortMode::Random => sorted.shuffle(&mut rand::thread_rng()),
    }
    sorted
}

/// Compare two strings roughly the way a browser's `localeCompare` does for
/// Latin text.
///
/// Levels, in order: base letters (canonical decomposition with combining
/// marks stripped, then lowercased), then accents, then case (lowercase
/// first), then raw code points as a final tiebreak so the result is a total
/// order.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(&tertiary_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> Vec<char> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(strip_stroke)
        .collect()
}

fn secondary_key(s: &str) -> Vec<char> {
    s.nfd().flat_map(char::to_lowercase).collect()
}

fn tertiary_key(s: &str) -> Vec<bool> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}

/// Letters whose diacritic is part of the glyph and has no canonical
/// decomposition.
fn strip_stroke(c: char) -> char {
    match c {
        'ł' => 'l',
        'ø' => 'o',
        'đ' | 'ð' => 'd',
        'ħ' => 'h',
        'ı' => 'i',
        'ŧ' => 't',
        'ƀ' => 'b',
        'ƶ' => 'z',
        _ => c,
    }
}
