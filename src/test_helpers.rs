//! Shared test utilities for the showcase test suite.
//!
//! Provides item builders, an in-memory [`ContentSource`] that counts calls
//! and can be told to fail, and a [`ModuleLoader`] that records what it was
//! asked to load.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let source = Arc::new(StubSource::with_items(vec![item("a")]).yielding());
//! let cache = PreloadCache::new(source.clone());
//! cache.ensure_loaded().await;
//! assert_eq!(source.gallery_calls(), 1);
//! ```

use crate::component::{BoxComponent, Component, LoadError, ModuleId, ModuleLoader};
use crate::content::{ContentError, ContentSource};
use crate::types::{ColorMapping, GalleryItem, SvgIcon};
use async_trait::async_trait;
use maud::{Markup, html};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

// =========================================================================
// Builders
// =========================================================================

/// A gallery item with just a title; alt text derived from it.
pub fn item(title: &str) -> GalleryItem {
    GalleryItem {
        title: title.to_string(),
        alt1: format!("{title}-1"),
        alt2: format!("{title}-2"),
        ..GalleryItem::default()
    }
}

/// A gallery item keyed for a color mapping entry.
pub fn item_with_alt(title: &str, alt1: &str) -> GalleryItem {
    GalleryItem {
        alt1: alt1.to_string(),
        ..item(title)
    }
}

// =========================================================================
// Content source stub
// =========================================================================

enum Behavior {
    Succeed,
    Fail,
    FailOnce,
    PanicOnce,
}

/// In-memory content source.
pub struct StubSource {
    items: Vec<GalleryItem>,
    behavior: Behavior,
    yielding: bool,
    icons: Vec<SvgIcon>,
    colors: ColorMapping,
    projects: BTreeMap<String, Value>,
    gallery_calls: AtomicUsize,
    project_calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn with_items(items: Vec<GalleryItem>) -> Self {
        Self {
            items,
            behavior: Behavior::Succeed,
            yielding: false,
            icons: Vec::new(),
            colors: ColorMapping::new(),
            projects: BTreeMap::new(),
            gallery_calls: AtomicUsize::new(0),
            project_calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails.
    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            ..Self::with_items(Vec::new())
        }
    }

    /// The first gallery fetch fails, later ones return `items`.
    pub fn failing_once(items: Vec<GalleryItem>) -> Self {
        Self {
            behavior: Behavior::FailOnce,
            ..Self::with_items(items)
        }
    }

    /// The first gallery fetch panics, later ones return `items`.
    pub fn panicking_once(items: Vec<GalleryItem>) -> Self {
        Self {
            behavior: Behavior::PanicOnce,
            ..Self::with_items(items)
        }
    }

    /// Yield to the scheduler before answering, so concurrent callers overlap.
    pub fn yielding(mut self) -> Self {
        self.yielding = true;
        self
    }

    pub fn with_project(mut self, slug: &str, doc: Value) -> Self {
        self.projects.insert(slug.to_string(), doc);
        self
    }

    pub fn with_icons(mut self, icons: Vec<SvgIcon>) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_colors(mut self, colors: ColorMapping) -> Self {
        self.colors = colors;
        self
    }

    pub fn gallery_calls(&self) -> usize {
        self.gallery_calls.load(Ordering::SeqCst)
    }

    pub fn project_calls(&self) -> Vec<String> {
        self.project_calls.lock().unwrap().clone()
    }

    fn should_fail(&self, call: usize) -> bool {
        match self.behavior {
            Behavior::Succeed => false,
            Behavior::Fail => true,
            Behavior::FailOnce => call == 0,
            Behavior::PanicOnce => false,
        }
    }

    async fn pause(&self) {
        if self.yielding {
            tokio::task::yield_now().await;
        }
    }
}

fn unavailable() -> ContentError {
    ContentError::Unavailable("stub configured to fail".into())
}

#[async_trait]
impl ContentSource for StubSource {
    async fn fetch_gallery(&self) -> Result<Vec<GalleryItem>, ContentError> {
        let call = self.gallery_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if matches!(self.behavior, Behavior::PanicOnce) && call == 0 {
            panic!("stub gallery fetch panicked");
        }
        if self.should_fail(call) {
            return Err(unavailable());
        }
        Ok(self.items.clone())
    }

    async fn fetch_icons(&self) -> Result<Vec<SvgIcon>, ContentError> {
        if matches!(self.behavior, Behavior::Fail) {
            return Err(unavailable());
        }
        Ok(self.icons.clone())
    }

    async fn fetch_colors(&self) -> Result<ColorMapping, ContentError> {
        if matches!(self.behavior, Behavior::Fail) {
            return Err(unavailable());
        }
        Ok(self.colors.clone())
    }

    async fn fetch_project(&self, slug: &str) -> Result<Value, ContentError> {
        self.project_calls.lock().unwrap().push(slug.to_string());
        self.pause().await;
        if matches!(self.behavior, Behavior::Fail) {
            return Err(unavailable());
        }
        self.projects
            .get(slug)
            .cloned()
            .ok_or_else(|| ContentError::MissingDocument(slug.to_string()))
    }
}

// =========================================================================
// Module loader stub
// =========================================================================

/// Renders `<module-stub data-module="…">` for every module and records loads.
#[derive(Default)]
pub struct RecordingModules {
    loads: Mutex<Vec<ModuleId>>,
    fail: Option<ModuleId>,
}

impl RecordingModules {
    /// Loading `module` fails; everything else succeeds.
    pub fn failing_on(module: ModuleId) -> Self {
        Self {
            loads: Mutex::new(Vec::new()),
            fail: Some(module),
        }
    }

    pub fn loads(&self) -> Vec<ModuleId> {
        self.loads.lock().unwrap().clone()
    }
}

struct StubComponent(ModuleId);

impl Component for StubComponent {
    fn render(&self) -> Markup {
        html! { module-stub data-module=(self.0.to_string()) {} }
    }
}

#[async_trait]
impl ModuleLoader for RecordingModules {
    async fn load(&self, module: ModuleId) -> Result<BoxComponent, LoadError> {
        self.loads.lock().unwrap().push(module);
        if self.fail == Some(module) {
            return Err(LoadError::Unavailable {
                module,
                reason: "chunk failed to load".into(),
            });
        }
        Ok(Box::new(StubComponent(module)))
    }
}
