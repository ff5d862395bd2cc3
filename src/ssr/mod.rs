//! Server-side rendering of project showcases.
//!
//! An [`SsrDescriptor`] says which content document a project needs and how to
//! turn it into markup. [`SsrRegistry::prefetch`] is the hydration bootstrap:
//! it fetches every descriptor's document and fills an [`SsrPayloadStore`],
//! which the resolver then reads per key.
//!
//! A fetch failure only costs that project its SSR markup. The payload is
//! left out of the store and the project falls back to its client module.

mod dataviz;
mod dynamic;
mod rotary;
mod scoop;

use crate::content::{ContentError, ContentSource};
use crate::media::{ImageVariants, asset_url, high_quality_url, image_variants, medium_url};
use crate::registry::ProjectKey;
use futures::future::join_all;
use maud::{Markup, html};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub type RenderFn = fn(&Value) -> Markup;

/// Stylesheet shared by the split-media showcases.
pub const BLOCK_TYPE_1_CSS: &str = "static/block-type-1.css";
pub const DYNAMIC_FRAME_CSS: &str = "static/dynamic-frame.css";

pub struct SsrDescriptor {
    /// Content document holding the project's data.
    pub slug: &'static str,
    pub render: Option<RenderFn>,
    /// Stylesheets inlined in the page head so SSR markup paints styled.
    pub critical_css_files: &'static [&'static str],
}

impl SsrDescriptor {
    pub async fn fetch(&self, source: &dyn ContentSource) -> Result<Value, ContentError> {
        source.fetch_project(self.slug).await
    }
}

#[derive(Default)]
pub struct SsrRegistry {
    descriptors: BTreeMap<ProjectKey, SsrDescriptor>,
}

impl SsrRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptors for every SSR-capable project. `game` is client-only.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(ProjectKey::Scoop, scoop::descriptor());
        registry.insert(ProjectKey::Rotary, rotary::descriptor());
        registry.insert(ProjectKey::Dataviz, dataviz::descriptor());
        registry.insert(ProjectKey::Dynamic, dynamic::descriptor());
        registry
    }

    pub fn insert(&mut self, key: ProjectKey, descriptor: SsrDescriptor) {
        self.descriptors.insert(key, descriptor);
    }

    pub fn get(&self, key: ProjectKey) -> Option<&SsrDescriptor> {
        self.descriptors.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectKey, &SsrDescriptor)> {
        self.descriptors.iter().map(|(key, d)| (*key, d))
    }

    /// Fetch every descriptor's document concurrently.
    ///
    /// Failed fetches are logged and skipped.
    pub async fn prefetch(&self, source: &dyn ContentSource) -> SsrPayloadStore {
        let fetches = self
            .iter()
            .map(|(key, descriptor)| async move { (key, descriptor.fetch(source).await) });

        let mut store = SsrPayloadStore::default();
        for (key, result) in join_all(fetches).await {
            match result {
                Ok(payload) => {
                    debug!(project = %key, "prefetched SSR payload");
                    store.insert(key, payload);
                }
                Err(err) => {
                    warn!(project = %key, error = %err, "SSR prefetch failed; using client module");
                }
            }
        }
        store
    }
}

/// Pre-fetched SSR payloads keyed by project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SsrPayloadStore {
    preloaded: BTreeMap<ProjectKey, Value>,
}

impl SsrPayloadStore {
    pub fn insert(&mut self, key: ProjectKey, payload: Value) {
        self.preloaded.insert(key, payload);
    }

    pub fn preloaded(&self, key: ProjectKey) -> Option<&Value> {
        self.preloaded.get(&key)
    }

    pub fn len(&self) -> usize {
        self.preloaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preloaded.is_empty()
    }

    /// `{"preloaded": {"scoop": …}}`, embedded in the page for the client.
    pub fn to_json(&self) -> Value {
        let preloaded: Map<String, Value> = self
            .preloaded
            .iter()
            .map(|(key, payload)| (key.to_string(), payload.clone()))
            .collect();
        serde_json::json!({ "preloaded": preloaded })
    }
}

/// Whether a payload counts as present: anything except `null`, `false`,
/// `0` and the empty string.
pub fn payload_present(payload: &Value) -> bool {
    match payload {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The document to render: `payload.data` when the store wrapped it, else
/// the payload itself.
pub fn payload_data(payload: &Value) -> &Value {
    match payload.get("data") {
        Some(data) if !data.is_null() => data,
        _ => payload,
    }
}

// ============================================================================
// Split-media building blocks
// ============================================================================

const FULL_COVER: &str = "width: 100%; height: 100%; object-fit: cover; display: block;";

/// Ids and classes of one half of a split-media showcase.
struct MediaSlot<'a> {
    container_id: &'a str,
    container_class: &'a str,
    media_id: &'a str,
    media_class: &'a str,
}

fn high_quality(media: &Value) -> Option<ImageVariants> {
    image_variants(media, 1920, 1080, 90)
}

/// Image half: medium first paint, `data-src-full` for the swap.
fn media_image(slot: &MediaSlot<'_>, media: &Value, default_alt: &str) -> Markup {
    let variants = high_quality(media);
    let alt = media
        .get("alt")
        .and_then(Value::as_str)
        .unwrap_or(default_alt);
    html! {
        div id=(slot.container_id) class=(slot.container_class) style="position: absolute;" {
            @if let Some(v) = &variants {
                img id=(slot.media_id)
                    class=(slot.media_class)
                    src=(v.medium)
                    data-src-full=(v.high)
                    alt=(alt)
                    draggable="false"
                    decoding="async"
                    fetchpriority="high"
                    style=(FULL_COVER);
            }
        }
    }
}

/// Video half: poster for first paint, webm/mp4 sources when present.
fn media_video(slot: &MediaSlot<'_>, media: &Value) -> Markup {
    let video = &media["video"];
    let poster = video.get("poster").and_then(high_quality_poster);
    let webm = video.get("webmUrl").and_then(Value::as_str);
    let mp4 = video.get("mp4Url").and_then(Value::as_str);
    html! {
        div id=(slot.container_id) class=(slot.container_class) style="position: absolute;" {
            @if let Some(p) = &poster {
                video id=(slot.media_id)
                    class=(slot.media_class)
                    poster=(p.medium)
                    data-src-full=(p.high)
                    muted
                    playsinline
                    loop
                    preload="auto"
                    style=(FULL_COVER) {
                    @if let Some(src) = webm {
                        source src=(src) type="video/webm";
                    }
                    @if let Some(src) = mp4 {
                        source src=(src) type="video/mp4";
                    }
                }
            }
        }
    }
}

fn high_quality_poster(poster: &Value) -> Option<ImageVariants> {
    asset_url(poster).map(|url| ImageVariants {
        medium: medium_url(url),
        high: high_quality_url(url, 1920, 1080, 90),
    })
}

/// Section wrapper with the enhancer mount point between the two halves.
fn split_section(section_id: &str, mount_id: &str, first: Markup, second: Markup) -> Markup {
    html! {
        section id=(section_id)
            class="block-type-1 ssr-initial-split"
            style="position: relative; width: 100%; overflow: hidden;" {
            (first)
            div id=(mount_id) {}
            (second)
        }
    }
}
