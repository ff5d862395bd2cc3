//! Content types shared by the cache, the sort engine, and the page renderers.
//!
//! These mirror the documents served by the content source. Field names follow
//! the CMS (`backgroundColor`, not `background_color`) so the JSON fixtures can
//! be exported from it unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A student project card in the dynamic gallery.
///
/// Items have no stable id. Identity is by value, so re-sorting compares
/// whole items rather than positions. Missing fields deserialize as empty
/// strings, which is also how the sort engine treats a missing title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryItem {
    pub title: String,
    /// Alt text of the first image. Doubles as the key into the [`ColorMapping`].
    pub alt1: String,
    pub alt2: String,
    pub image1: String,
    pub image2: String,
    /// Link to the student's project.
    pub url1: String,
    pub background_color: String,
}

/// Inline SVG icon document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgIcon {
    pub title: String,
    /// Inline SVG markup, trusted CMS content.
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Alt-text key → `[c0, c1, c2, c3]`.
///
/// Index 2 is the accent (borders, active color) and index 3 the offset
/// shadow. Indices 0, 1 and 3 feed the moving title text.
pub type ColorMapping = BTreeMap<String, [String; 4]>;

/// Icon title → inline SVG.
pub type IconMap = BTreeMap<String, String>;

/// Index icons by title. Later duplicates win.
pub fn icon_map(icons: &[SvgIcon]) -> IconMap {
    icons
        .iter()
        .map(|icon| (icon.title.clone(), icon.icon.clone()))
        .collect()
}
