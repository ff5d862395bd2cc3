//! Sort dropdown of the dynamic gallery.
//!
//! [`SortDropdown`] owns the state behind the "Sort by" control: whether it is
//! open, the selected [`SortMode`], the base items and the ordered list
//! derived from them. Base items start from the preload cache snapshot; only
//! when that is empty does the dropdown ask the cache to load, and only once.
//!
//! The dropdown listens for pointer-down (to close when the user clicks
//! elsewhere) and resize (to pick which card colors the accent). Both
//! subscriptions live inside the dropdown and are released when it is dropped.

use crate::colors::{DropdownAccent, dropdown_accent, sample_index};
use crate::config::Breakpoints;
use crate::preload::PreloadCache;
use crate::sort::{SortMode, sort_items};
use crate::subscription::{Listeners, Subscription};
use crate::types::{ColorMapping, GalleryItem};
use maud::{Markup, PreEscaped, html};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Where a pointer-down landed, relative to the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Dropdown,
    /// The animation pause button sits over the dropdown on small screens
    /// and must not close it.
    PauseButton,
    Elsewhere,
}

/// Event sources the gallery subscribes to.
#[derive(Clone, Default)]
pub struct GalleryEvents {
    pub pointer_down: Listeners<PointerTarget>,
    /// New viewport width in px.
    pub resize: Listeners<u32>,
}

struct DropdownState {
    open: bool,
    selected: SortMode,
    base: Arc<[GalleryItem]>,
    items: Vec<GalleryItem>,
    screen_width: u32,
    load_requested: bool,
}

impl DropdownState {
    fn derive(&mut self) {
        self.items = sort_items(Some(&*self.base), self.selected);
    }
}

pub struct SortDropdown {
    cache: PreloadCache,
    state: Arc<Mutex<DropdownState>>,
    _subscriptions: Vec<Subscription>,
}

impl SortDropdown {
    /// Build the dropdown from the cache snapshot and subscribe to `events`.
    ///
    /// Does not load anything; call [`ensure_items`](Self::ensure_items).
    pub fn mount(
        cache: PreloadCache,
        events: &GalleryEvents,
        screen_width: u32,
        default_mode: SortMode,
    ) -> Self {
        let base = cache.snapshot().images;
        let mut state = DropdownState {
            open: false,
            selected: default_mode,
            base,
            items: Vec::new(),
            screen_width,
            load_requested: false,
        };
        state.derive();
        let state = Arc::new(Mutex::new(state));

        let on_pointer = {
            let state = Arc::clone(&state);
            events.pointer_down.subscribe(move |target| {
                if *target == PointerTarget::Elsewhere {
                    lock(&state).open = false;
                }
            })
        };
        let on_resize = {
            let state = Arc::clone(&state);
            events.resize.subscribe(move |width| {
                lock(&state).screen_width = *width;
            })
        };

        Self {
            cache,
            state,
            _subscriptions: vec![on_pointer, on_resize],
        }
    }

    /// Load base items through the cache if the snapshot was empty.
    ///
    /// Only the first call may trigger a load; a failed load leaves the
    /// gallery empty.
    pub async fn ensure_items(&self) {
        {
            let mut state = self.lock();
            if !state.base.is_empty() || state.load_requested {
                return;
            }
            state.load_requested = true;
        }
        let images = self.cache.ensure_loaded().await;
        debug!(count = images.len(), "sort dropdown received items");
        let mut state = self.lock();
        state.base = images;
        state.derive();
    }

    pub fn toggle(&self) {
        let mut state = self.lock();
        state.open = !state.open;
    }

    /// Select a mode, close the dropdown and re-derive the ordered list.
    pub fn select(&self, mode: SortMode) {
        let mut state = self.lock();
        state.selected = mode;
        state.open = false;
        state.derive();
    }

    /// The ordered items currently shown.
    pub fn items(&self) -> Vec<GalleryItem> {
        self.lock().items.clone()
    }

    pub fn selected(&self) -> SortMode {
        self.lock().selected
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn screen_width(&self) -> u32 {
        self.lock().screen_width
    }

    /// Accent colors from the card that sits beside the dropdown at the
    /// current width.
    pub fn accent(
        &self,
        mapping: &ColorMapping,
        breakpoints: &Breakpoints,
        alpha: f32,
    ) -> DropdownAccent {
        let state = self.lock();
        let index = sample_index(state.screen_width, breakpoints);
        dropdown_accent(&state.items, mapping, index, alpha)
    }

    /// The dropdown markup. `arrow_icon` is trusted inline SVG.
    pub fn render(&self, accent: &DropdownAccent, arrow_icon: Option<&str>) -> Markup {
        let state = self.lock();
        html! {
            div.sort-by-container {
                div.sort-container { p { "Sort by:" } }
                div.sort-container2 {
                    div.custom-dropdown style=(accent.style()) {
                        div.custom-select {
                            div.selected-value { h5 { (state.selected.label()) } }
                            span.custom-arrow.open[state.open] {
                                @if let Some(icon) = arrow_icon {
                                    div { (PreEscaped(icon)) }
                                }
                            }
                        }
                        @if state.open {
                            div.options-container style={ "border: solid 1.6px " (accent.border) "; border-top: none;" } {
                                @for mode in SortMode::ALL {
                                    div.option.selected[mode == state.selected] data-value=(mode.as_str()) {
                                        (mode.label())
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DropdownState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<DropdownState>) -> MutexGuard<'_, DropdownState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{StubSource, item, item_with_alt};

    fn titles(items: &[GalleryItem]) -> Vec<String> {
        items.iter().map(|i| i.title.clone()).collect()
    }

    async fn loaded_cache(items: Vec<GalleryItem>) -> PreloadCache {
        let cache = PreloadCache::new(Arc::new(StubSource::with_items(items)));
        cache.ensure_loaded().await;
        cache
    }

    #[tokio::test]
    async fn mount_uses_cached_snapshot() {
        let cache = loaded_cache(vec![item("b"), item("a"), item("c")]).await;
        let events = GalleryEvents::default();
        let dropdown = SortDropdown::mount(cache, &events, 1200, SortMode::TitleAsc);
        assert_eq!(titles(&dropdown.items()), ["a", "b", "c"]);
        assert_eq!(dropdown.selected(), SortMode::TitleAsc);
        assert!(!dropdown.is_open());
    }

    #[tokio::test]
    async fn empty_snapshot_loads_once() {
        let source = Arc::new(StubSource::with_items(vec![item("z"), item("y")]));
        let cache = PreloadCache::new(source.clone());
        let events = GalleryEvents::default();
        let dropdown = SortDropdown::mount(cache, &events, 1200, SortMode::TitleDesc);
        assert!(dropdown.items().is_empty());

        dropdown.ensure_items().await;
        dropdown.ensure_items().await;
        assert_eq!(titles(&dropdown.items()), ["z", "y"]);
        assert_eq!(source.gallery_calls(), 1);
    }

    #[tokio::test]
    async fn failed_load_leaves_gallery_empty() {
        let source = Arc::new(StubSource::failing());
        let dropdown = SortDropdown::mount(
            PreloadCache::new(source.clone()),
            &GalleryEvents::default(),
            1200,
            SortMode::Random,
        );
        dropdown.ensure_items().await;
        dropdown.ensure_items().await;
        assert!(dropdown.items().is_empty());
        assert_eq!(source.gallery_calls(), 1);
    }

    #[tokio::test]
    async fn select_sorts_and_closes() {
        let cache = loaded_cache(vec![item("b"), item("a")]).await;
        let dropdown =
            SortDropdown::mount(cache, &GalleryEvents::default(), 1200, SortMode::Random);
        dropdown.toggle();
        assert!(dropdown.is_open());

        dropdown.select(SortMode::TitleDesc);
        assert!(!dropdown.is_open());
        assert_eq!(titles(&dropdown.items()), ["b", "a"]);
    }

    #[tokio::test]
    async fn click_outside_closes_but_pause_button_does_not() {
        let cache = loaded_cache(vec![item("a")]).await;
        let events = GalleryEvents::default();
        let dropdown = SortDropdown::mount(cache, &events, 1200, SortMode::Random);

        dropdown.toggle();
        events.pointer_down.emit(&PointerTarget::Dropdown);
        assert!(dropdown.is_open());
        events.pointer_down.emit(&PointerTarget::PauseButton);
        assert!(dropdown.is_open());
        events.pointer_down.emit(&PointerTarget::Elsewhere);
        assert!(!dropdown.is_open());
    }

    #[tokio::test]
    async fn resize_moves_accent_sample() {
        let cache = loaded_cache(vec![
            item_with_alt("a", "first"),
            item_with_alt("b", "second"),
            item_with_alt("c", "third"),
        ])
        .await;
        let mut mapping = ColorMapping::new();
        let accents = [("first", "#010101"), ("second", "#020202"), ("third", "#030303")];
        for (alt, accent) in accents {
            mapping.insert(
                alt.into(),
                ["#000000".into(), "#000000".into(), accent.into(), accent.into()],
            );
        }
        let events = GalleryEvents::default();
        let dropdown = SortDropdown::mount(cache, &events, 1400, SortMode::TitleAsc);
        let bp = Breakpoints::default();

        assert_eq!(dropdown.accent(&mapping, &bp, 1.0).box_shadow, "#030303");
        events.resize.emit(&800);
        assert_eq!(dropdown.screen_width(), 800);
        assert_eq!(dropdown.accent(&mapping, &bp, 1.0).box_shadow, "#020202");
        events.resize.emit(&400);
        assert_eq!(dropdown.accent(&mapping, &bp, 1.0).border, "rgba(1, 1, 1, 1)");
    }

    #[tokio::test]
    async fn drop_releases_subscriptions() {
        let cache = loaded_cache(vec![item("a")]).await;
        let events = GalleryEvents::default();
        let dropdown = SortDropdown::mount(cache, &events, 1200, SortMode::Random);
        assert_eq!(events.pointer_down.len(), 1);
        assert_eq!(events.resize.len(), 1);

        drop(dropdown);
        assert!(events.pointer_down.is_empty());
        assert!(events.resize.is_empty());
    }

    #[tokio::test]
    async fn render_shows_label_and_options_when_open() {
        let cache = loaded_cache(vec![item("a")]).await;
        let dropdown =
            SortDropdown::mount(cache, &GalleryEvents::default(), 1200, SortMode::TitleAsc);
        let accent = DropdownAccent {
            border: "rgba(255, 255, 255, 0.8)".into(),
            box_shadow: "#ffffff".into(),
        };

        let closed = dropdown.render(&accent, Some("<svg></svg>")).into_string();
        assert!(closed.contains("<h5>A to Z</h5>"));
        assert!(closed.contains("<svg></svg>"));
        assert!(!closed.contains("options-container"));

        dropdown.toggle();
        let open = dropdown.render(&accent, None).into_string();
        assert!(open.contains(r#"class="custom-arrow open""#));
        assert!(open.contains(r#"class="option selected""#));
        assert!(open.contains(r#"data-value="titleDesc""#));
        assert!(open.contains("Z to A"));
    }
}
