//! Color derivation for the dynamic gallery.
//!
//! Every gallery item's `alt1` keys a `[c0, c1, c2, c3]` entry in the
//! [`ColorMapping`]. Nothing here mutates the mapping; these helpers only read
//! it to compute the sort dropdown accent and the theme's active colors.

use crate::config::Breakpoints;
use crate::types::{ColorMapping, GalleryItem};

/// Used when an item has no mapping entry.
pub const FALLBACK_COLOR: &str = "#ffffff";

/// Convert `#rrggbb` to `rgba(r, g, b, alpha)`.
///
/// A missing color is white. Channels that are missing or not valid hex
/// are 255.
pub fn hex_to_rgba(hex: Option<&str>, alpha: f32) -> String {
    let hex = hex.unwrap_or(FALLBACK_COLOR).trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(255)
    };
    format!("rgba({}, {}, {}, {})", channel(0..2), channel(2..4), channel(4..6), alpha)
}

/// Which gallery item drives the accent at a given screen width.
///
/// Desktop samples the third card, tablet the second, phones the first: the
/// first card visible beside the dropdown in each layout.
pub fn sample_index(width: u32, breakpoints: &Breakpoints) -> usize {
    if width >= breakpoints.desktop {
        2
    } else if width >= breakpoints.tablet {
        1
    } else {
        0
    }
}

/// Border and offset shadow colors of the sort dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownAccent {
    /// `rgba(…)` of the item's accent color.
    pub border: String,
    /// The item's shadow color, as stored.
    pub box_shadow: String,
}

impl DropdownAccent {
    /// Inline `style` value for the dropdown.
    pub fn style(&self) -> String {
        format!(
            "border: solid 1.6px {}; \
             box-shadow: 0 1px 8px rgba(0,0,0,0.1), 0 22px 8px rgba(0,0,0,0.08), 12px 12px {};",
            self.border, self.box_shadow
        )
    }
}

/// Accent for the item at `index`, white when it or its colors are missing.
pub fn dropdown_accent(
    items: &[GalleryItem],
    mapping: &ColorMapping,
    index: usize,
    alpha: f32,
) -> DropdownAccent {
    let colors = items.get(index).and_then(|item| mapping.get(&item.alt1));
    DropdownAccent {
        border: hex_to_rgba(colors.map(|c| c[2].as_str()), alpha),
        box_shadow: colors
            .map(|c| c[3].clone())
            .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
    }
}

/// Colors that follow whichever gallery card is in view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeColors {
    pub active: String,
    pub moving_text: [String; 3],
    pub last_known: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        let white = || "#FFFFFF".to_string();
        Self {
            active: white(),
            moving_text: [white(), white(), white()],
            last_known: white(),
        }
    }
}

impl ThemeColors {
    /// A card with alt text `alt` came into view.
    ///
    /// Returns false if the card has no colors or its first color already
    /// equals the active one.
    pub fn activate(&mut self, alt: &str, mapping: &ColorMapping) -> bool {
        let Some([c0, c1, c2, c3]) = mapping.get(alt) else {
            return false;
        };
        if *c0 == self.active {
            return false;
        }
        self.active = c2.clone();
        self.moving_text = [c0.clone(), c1.clone(), c3.clone()];
        self.last_known = c2.clone();
        true
    }

    /// The active card left view: fall back to the last known accent.
    pub fn deactivate(&mut self) -> bool {
        if self.active == self.last_known {
            return false;
        }
        self.active = self.last_known.clone();
        true
    }
}
