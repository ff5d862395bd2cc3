//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. A single optional
//! file at the content root is merged over the stock defaults, so it only needs
//! the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! lang = "en"
//! description = ""
//!
//! [gallery]
//! default_sort = "random"   # random | titleAsc | titleDesc
//! accent_alpha = 0.8        # Opacity of the sort dropdown border
//!
//! [gallery.breakpoints]
//! tablet = 768              # Width where the second item drives the accent
//! desktop = 1025            # Width where the third item drives the accent
//!
//! [hydration]
//! ssr = true                # Prefetch SSR payloads and pre-render projects
//! bundle_base = "/assets"   # Where client modules and enhancers are served
//! shadow_root_margin = "200px"
//! shadow_idle_timeout_ms = 2000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::sort::SortMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Document metadata.
    pub site: SiteMeta,
    /// Dynamic gallery behavior.
    pub gallery: GalleryConfig,
    /// SSR and client module settings.
    pub hydration: HydrationConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.gallery.accent_alpha) {
            return Err(ConfigError::Validation(
                "gallery.accent_alpha must be between 0 and 1".into(),
            ));
        }
        let bp = &self.gallery.breakpoints;
        if bp.tablet >= bp.desktop {
            return Err(ConfigError::Validation(
                "gallery.breakpoints.tablet must be smaller than desktop".into(),
            ));
        }
        if self.hydration.bundle_base.trim().is_empty() {
            return Err(ConfigError::Validation(
                "hydration.bundle_base must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    pub title: String,
    pub lang: String,
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            lang: "en".to_string(),
            description: String::new(),
        }
    }
}

/// Dynamic gallery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Order used for the server-rendered gallery. Unknown values mean `random`.
    pub default_sort: SortMode,
    /// Opacity applied to the accent color on the sort dropdown border.
    pub accent_alpha: f32,
    pub breakpoints: Breakpoints,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            default_sort: SortMode::Random,
            accent_alpha: 0.8,
            breakpoints: Breakpoints::default(),
        }
    }
}

/// Screen widths (px) that select which gallery item colors the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Breakpoints {
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet: 768,
            desktop: 1025,
        }
    }
}

/// SSR and client module settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HydrationConfig {
    /// When false, no payloads are prefetched and every project takes the
    /// client path.
    pub ssr: bool,
    /// URL prefix for client module and enhancer bundles.
    pub bundle_base: String,
    /// IntersectionObserver root margin used before mounting the shadow app.
    pub shadow_root_margin: String,
    /// Idle fallback (ms) after which the shadow app mounts regardless.
    pub shadow_idle_timeout_ms: u64,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            ssr: true,
            bundle_base: "/assets".to_string(),
            shadow_root_margin: "200px".to_string(),
            shadow_idle_timeout_ms: 2000,
        }
    }
}

impl HydrationConfig {
    /// Join a bundle path onto `bundle_base` with exactly one slash.
    pub fn bundle_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.bundle_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Showcase Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Document metadata
# ---------------------------------------------------------------------------
[site]
title = "Portfolio"
lang = "en"
description = ""

# ---------------------------------------------------------------------------
# Dynamic gallery
# ---------------------------------------------------------------------------
[gallery]
# Order of the server-rendered gallery: random, titleAsc or titleDesc.
# Anything else is treated as random.
default_sort = "random"

# Opacity of the accent color on the sort dropdown border (0-1).
accent_alpha = 0.8

# The dropdown takes its colors from the first, second or third gallery item
# depending on the screen width.
[gallery.breakpoints]
tablet = 768
desktop = 1025

# ---------------------------------------------------------------------------
# Hydration
# ---------------------------------------------------------------------------
[hydration]
# Pre-render project showcases from fetched content. When false, every
# project ships as a client-only mount point.
ssr = true

# URL prefix for client modules and enhancers.
bundle_base = "/assets"

# The dynamic app's heavy shadow bundle mounts once the frame comes within
# this margin of the viewport, or after the idle timeout, whichever is first.
shadow_root_margin = "200px"
shadow_idle_timeout_ms = 2000
"##
}
