//! HTML site generation.
//!
//! Renders the landing page and the dynamic gallery page from a content
//! directory.
//!
//! ## Generated Pages
//!
//! - **Landing page** (`/index.html`): navigation menu plus one pane per
//!   registered project. Each pane holds whatever the resolver produced for
//!   it: SSR markup followed by its enhancer, plain SSR markup, or a client
//!   mount point.
//! - **Dynamic gallery** (`/dynamic/index.html`): the student cards, ordered
//!   by `gallery.default_sort`, with the sort dropdown colored from the card
//!   beside it.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! └── dynamic/
//!     └── index.html
//! ```
//!
//! ## Hydration Bootstrap
//!
//! The landing page embeds the prefetched SSR payloads as
//! `<script id="ssr-data" type="application/json">`. The client reads it to
//! pick the same strategy per project that the server rendered, so hydration
//! never replaces SSR markup with a client mount.
//!
//! ## CSS
//!
//! Stylesheets are embedded at compile time from `static/` and inlined in the
//! page head through a [`StyleInjector`], which keeps each stylesheet to a
//! single `<style>` block no matter how many projects ask for it.

use crate::colors::{DropdownAccent, ThemeColors};
use crate::component::{LoadError, ModuleLoader};
use crate::config::SiteConfig;
use crate::content::{ContentError, ContentSource, FileContentSource};
use crate::gallery::{GalleryEvents, SortDropdown};
use crate::preload::PreloadCache;
use crate::registry::{ProjectMeta, Registry, RegistryError};
use crate::resolver::{Resolver, Strategy};
use crate::sort::SortMode;
use crate::ssr::{SsrPayloadStore, SsrRegistry};
use crate::types::{ColorMapping, GalleryItem, IconMap, icon_map};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("{0}")]
    Registry(#[from] RegistryError),
    #[error("{0}")]
    Load(#[from] LoadError),
}

const LANDING_STYLES: &str = include_str!("../static/landing.css");
const BLOCK_TYPE_1_STYLES: &str = include_str!("../static/block-type-1.css");
const DYNAMIC_FRAME_STYLES: &str = include_str!("../static/dynamic-frame.css");
const DYNAMIC_APP_STYLES: &str = include_str!("../static/dynamic-app.css");
const SORT_BY_STYLES: &str = include_str!("../static/sort-by.css");

/// Width assumed when rendering the gallery without a viewport.
pub const DEFAULT_SCREEN_WIDTH: u32 = 1200;

/// Embedded stylesheet for a critical CSS path named by an SSR descriptor.
pub fn critical_css(path: &str) -> Option<&'static str> {
    match path {
        crate::ssr::BLOCK_TYPE_1_CSS => Some(BLOCK_TYPE_1_STYLES),
        crate::ssr::DYNAMIC_FRAME_CSS => Some(DYNAMIC_FRAME_STYLES),
        _ => None,
    }
}

// ============================================================================
// Style injection
// ============================================================================

/// Collects `<style>` blocks by id. The first injection of an id wins and
/// later ones are ignored; blocks render in insertion order.
#[derive(Debug, Default)]
pub struct StyleInjector {
    styles: Vec<(String, &'static str)>,
}

impl StyleInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `id` was already injected.
    pub fn inject(&mut self, id: &str, css: &'static str) -> bool {
        if self.styles.iter().any(|(existing, _)| existing == id) {
            return false;
        }
        self.styles.push((id.to_string(), css));
        true
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|(id, _)| id.as_str())
    }

    pub fn render(&self) -> Markup {
        html! {
            @for (id, css) in &self.styles {
                style id=(id) { (PreEscaped(*css)) }
            }
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// What [`generate`] rendered.
#[derive(Debug)]
pub struct GenerateReport {
    /// Every project in landing order, with the strategy it was rendered by.
    pub projects: Vec<(ProjectMeta, Strategy)>,
    pub gallery_items: usize,
    pub icons: usize,
}

/// One landing page pane, ready to render.
struct RenderedProject {
    meta: ProjectMeta,
    strategy: Strategy,
    markup: Markup,
}

pub async fn generate(
    source_dir: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    modules: Arc<dyn ModuleLoader>,
) -> Result<GenerateReport, GenerateError> {
    let source: Arc<dyn ContentSource> = Arc::new(FileContentSource::open(source_dir)?);
    let registry = Arc::new(Registry::standard());
    let ssr = Arc::new(SsrRegistry::standard());

    let payloads = if config.hydration.ssr {
        ssr.prefetch(source.as_ref()).await
    } else {
        SsrPayloadStore::default()
    };
    let resolver = Resolver::new(Arc::clone(&registry), Arc::clone(&ssr), modules);

    let mut styles = StyleInjector::new();
    styles.inject("landing", LANDING_STYLES);

    let mut projects = Vec::with_capacity(registry.len());
    for project in registry.iter() {
        let key = project.meta.key;
        let payload = payloads.preloaded(key);
        let strategy = resolver.plan(key, payload)?;
        let loader = resolver.resolve(key, payload)?;
        let component = loader().await?;

        if !matches!(strategy, Strategy::Client { .. })
            && let Some(descriptor) = ssr.get(key)
        {
            for path in descriptor.critical_css_files {
                match critical_css(path) {
                    Some(css) => {
                        styles.inject(path, css);
                    }
                    None => warn!(project = %key, path, "unknown critical stylesheet"),
                }
            }
        }

        projects.push(RenderedProject {
            meta: project.meta.clone(),
            strategy,
            markup: component.render(),
        });
    }

    fs::create_dir_all(output_dir)?;
    let landing = render_landing(config, &projects, &styles, &payloads);
    let index_path = output_dir.join("index.html");
    fs::write(&index_path, landing.into_string())?;
    info!(path = %index_path.display(), "wrote landing page");

    let cache = PreloadCache::new(Arc::clone(&source));
    let gallery = build_gallery(
        source.as_ref(),
        cache,
        config,
        config.gallery.default_sort,
        DEFAULT_SCREEN_WIDTH,
    )
    .await;
    let dynamic_dir = output_dir.join("dynamic");
    fs::create_dir_all(&dynamic_dir)?;
    let gallery_path = dynamic_dir.join("index.html");
    fs::write(&gallery_path, gallery.markup.into_string())?;
    info!(path = %gallery_path.display(), items = gallery.items.len(), "wrote gallery page");

    Ok(GenerateReport {
        projects: projects
            .into_iter()
            .map(|p| (p.meta, p.strategy))
            .collect(),
        gallery_items: gallery.items.len(),
        icons: gallery.icons.len(),
    })
}

/// The gallery page and the data it was built from.
pub struct GalleryPage {
    pub items: Vec<GalleryItem>,
    pub icons: IconMap,
    pub accent: DropdownAccent,
    pub markup: Markup,
}

/// Load, order and render the gallery.
///
/// Never fails: missing items, icons or colors render an empty but working
/// page.
pub async fn build_gallery(
    source: &dyn ContentSource,
    cache: PreloadCache,
    config: &SiteConfig,
    mode: SortMode,
    screen_width: u32,
) -> GalleryPage {
    let events = GalleryEvents::default();
    let dropdown = SortDropdown::mount(cache, &events, screen_width, mode);
    dropdown.ensure_items().await;

    let icons = match source.fetch_icons().await {
        Ok(icons) => icon_map(&icons),
        Err(err) => {
            warn!(error = %err, "icon fetch failed; rendering without icons");
            IconMap::new()
        }
    };
    let colors = match source.fetch_colors().await {
        Ok(colors) => colors,
        Err(err) => {
            warn!(error = %err, "color fetch failed; using default colors");
            ColorMapping::new()
        }
    };

    let gallery = &config.gallery;
    let accent = dropdown.accent(&colors, &gallery.breakpoints, gallery.accent_alpha);
    let items = dropdown.items();

    let mut theme = ThemeColors::default();
    if let Some(first) = items.first() {
        theme.activate(&first.alt1, &colors);
    }

    let mut styles = StyleInjector::new();
    styles.inject("dynamic-app-style-index", DYNAMIC_APP_STYLES);
    styles.inject("dynamic-app-style-sortby", SORT_BY_STYLES);

    let content = html! {
        div.dynamic-app {
            div.homePage-container {
                div.navigation-wrapper {
                    a href="/" style={ "color: " (theme.active) } { "Home" }
                    @if let Some(icon) = icons.get("arrow1") {
                        span.nav-arrow { (PreEscaped(icon)) }
                    }
                }
                div.title-divider {
                    h1 {
                        @for (word, color) in ["Dynamic", "Student", "Gallery"].iter().zip(&theme.moving_text) {
                            span style={ "color: " (color) } { (word) " " }
                        }
                    }
                }
                div #homePage {
                    div.no-overflow {
                        div.sort-by-divider {
                            h3.students-heading { "Students" }
                            (dropdown.render(&accent, icons.get("arrow2").map(String::as_str)))
                        }
                        (render_cards(&items, icons.get("arrow1").map(String::as_str)))
                        footer.dynamic-footer {
                            a href="/" { "Back to portfolio" }
                            @if let Some(icon) = icons.get("link-icon") {
                                span.link-icon { (PreEscaped(icon)) }
                            }
                        }
                    }
                }
            }
        }
    };
    let markup = base_document(config, Some("Dynamic Gallery"), &styles, content);

    GalleryPage {
        items,
        icons,
        accent,
        markup,
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    config: &SiteConfig,
    page_title: Option<&str>,
    styles: &StyleInjector,
    content: Markup,
) -> Markup {
    let site = &config.site;
    html! {
        (DOCTYPE)
        html lang=(site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !site.description.is_empty() {
                    meta name="description" content=(site.description);
                }
                title {
                    @if let Some(page) = page_title { (page) " · " }
                    (site.title)
                }
                (styles.render())
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the landing navigation menu. Link projects go to their own page,
/// the rest scroll to their pane.
pub fn render_nav(projects: &[ProjectMeta]) -> Markup {
    html! {
        nav.nav-menu {
            @for meta in projects {
                @if meta.is_link {
                    a href={ "/" (meta.key.as_str()) "/" } { (meta.title) }
                } @else {
                    a href={ "#" (meta.key.as_str()) } { (meta.title) }
                }
            }
        }
    }
}

/// Hydration bootstrap: SSR payloads as inline JSON.
fn render_bootstrap(payloads: &SsrPayloadStore) -> Markup {
    // `</` inside a script would end it early
    let json = payloads.to_json().to_string().replace("</", "<\\/");
    html! {
        script #ssr-data type="application/json" { (PreEscaped(json)) }
    }
}

fn render_cards(items: &[GalleryItem], arrow_icon: Option<&str>) -> Markup {
    html! {
        div.UI-card-divider {
            @if items.is_empty() {
                p.gallery-empty { "No student projects to show yet." }
            }
            @for (index, item) in items.iter().enumerate() {
                div class={ "ui-card custom-card-" (index) }
                    style={ "background-color: " (item.background_color) }
                    data-alt=(item.alt1) {
                    a href=(item.url1) target="_blank" rel="noopener" {
                        img src=(item.image1) alt=(item.alt1) loading="lazy";
                        img src=(item.image2) alt=(item.alt2) loading="lazy";
                        h4.card-title { (item.title) }
                        @if let Some(icon) = arrow_icon {
                            span.card-arrow { (PreEscaped(icon)) }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_landing(
    config: &SiteConfig,
    projects: &[RenderedProject],
    styles: &StyleInjector,
    payloads: &SsrPayloadStore,
) -> Markup {
    let metas: Vec<ProjectMeta> = projects.iter().map(|p| p.meta.clone()).collect();
    let content = html! {
        div #landing .HereGoesNothing data-prehydrate style="position: relative;" {
            (render_nav(&metas))
            @for project in projects {
                section.project-pane
                    id=(project.meta.key.as_str())
                    data-strategy=(project.strategy.kind()) {
                    (project.markup)
                    h2.project-title { (project.meta.title) }
                }
            }
        }
        (render_bootstrap(payloads))
    };
    base_document(config, None, styles, content)
}

// ============================================================================
// Tests
// ============================================================================
