//! # Showcase
//!
//! The front-end renderer of a portfolio site: a landing page of project
//! showcases and a "dynamic theme" gallery of student projects, rendered from
//! content exported by the CMS.
//!
//! # Architecture
//!
//! Two small engines sit under the page renderers:
//!
//! ```text
//! Registry ──┐
//! SsrRegistry┼─→ Resolver ──→ Loader ──→ Component ──→ landing page
//! payloads ──┘
//!
//! ContentSource ──→ PreloadCache ──→ sort_items ──→ SortDropdown ──→ gallery page
//! ```
//!
//! - The **resolver** decides per project whether the page gets SSR markup
//!   plus a deferred enhancer, plain SSR markup, or a client-only module.
//!   The decision is data-driven: each project's [`registry::HydrationPlan`]
//!   names its client module and enhancer.
//! - The **preload cache** loads gallery items at most once per session, with
//!   every concurrent caller sharing the one in-flight fetch. The **sort
//!   engine** orders them without touching the cached list.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | `ContentSource` trait and the content directory reader |
//! | [`preload`] | Single-flight gallery cache |
//! | [`sort`] | `SortMode` and the pure sort/shuffle function |
//! | [`registry`] | Project keys, metadata and hydration plans |
//! | [`ssr`] | SSR descriptors, per-project render functions, payload prefetch |
//! | [`component`] | `Component`, `ModuleLoader` and the built-in modules |
//! | [`resolver`] | SSR/hydration strategy selection |
//! | [`subscription`] | Event listeners released on drop |
//! | [`gallery`] | Sort dropdown state |
//! | [`colors`] | Accent and theme color derivation |
//! | [`media`] | CDN image URL helpers |
//! | [`generate`] | Page rendering with Maud |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`types`] | Content documents shared across modules |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Failures That Degrade vs. Failures That Surface
//!
//! Missing gallery items, icons, colors or SSR payloads cost the page some
//! completeness and nothing more: the cache resolves to `[]`, the prefetch
//! skips the project, and the renderers draw an empty but working page. An
//! unknown project key or a module that fails to load is a wiring problem and
//! is returned as an error.
//!
//! ## Injected State Over Globals
//!
//! The preload cache is a value created once per session and passed to
//! whatever needs gallery data. Tests build their own cache with a stub
//! source; nothing leaks between them.

pub mod colors;
pub mod component;
pub mod config;
pub mod content;
pub mod gallery;
pub mod generate;
pub mod media;
pub mod output;
pub mod preload;
pub mod registry;
pub mod resolver;
pub mod sort;
pub mod ssr;
pub mod subscription;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
