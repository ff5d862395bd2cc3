//! Renderable components and the modules that provide them.
//!
//! A [`Component`] is anything that renders to maud [`Markup`]. Components are
//! produced by a [`ModuleLoader`] from a [`ModuleId`]: the client bundle for a
//! project, the lightweight dynamic frame, or a per-project enhancer. The
//! resolver hands out a [`Loader`] that is invoked later, the way a lazy
//! import is awaited by the page.
//!
//! [`BuiltinModules`] renders each module as the markup that boots it in the
//! browser: a mount point plus a `<script type="module">` pointing at the
//! bundle under `hydration.bundle_base`.

use crate::config::HydrationConfig;
use crate::registry::ProjectKey;
use async_trait::async_trait;
use futures::future::BoxFuture;
use maud::{Markup, html};
use std::fmt;
use thiserror::Error;

pub trait Component: Send + Sync {
    fn render(&self) -> Markup;
}

pub type BoxComponent = Box<dyn Component>;

pub type LoadFuture = BoxFuture<'static, Result<BoxComponent, LoadError>>;

/// A deferred component load. Nothing is fetched until it is called.
pub type Loader = Box<dyn FnOnce() -> LoadFuture + Send>;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to load module {module}: {reason}")]
    Unavailable { module: ModuleId, reason: String },
}

/// A loadable code module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleId {
    /// Client-only bundle of a project.
    Client(ProjectKey),
    /// Placeholder standing in for the full dynamic app.
    DynamicFrame,
    /// Progressive enhancement for a project's SSR markup.
    Enhancer(ProjectKey),
}

impl ModuleId {
    /// Bundle path relative to `hydration.bundle_base`.
    pub fn bundle_path(self) -> String {
        match self {
            ModuleId::Client(key) => format!("client/{key}.js"),
            ModuleId::DynamicFrame => "dynamic/frame.js".to_string(),
            ModuleId::Enhancer(key) => format!("enhancers/{key}.js"),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Client(key) => write!(f, "client:{key}"),
            ModuleId::DynamicFrame => f.write_str("dynamic-frame"),
            ModuleId::Enhancer(key) => write!(f, "enhancer:{key}"),
        }
    }
}

#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load(&self, module: ModuleId) -> Result<BoxComponent, LoadError>;
}

// ============================================================================
// Composite SSR output
// ============================================================================

/// Pre-rendered markup, optionally followed by an enhancer.
///
/// The enhancer renders after the markup and never replaces it.
pub struct SsrComposite {
    pub markup: Markup,
    pub enhancer: Option<BoxComponent>,
}

impl Component for SsrComposite {
    fn render(&self) -> Markup {
        html! {
            (self.markup)
            @if let Some(enhancer) = &self.enhancer {
                (enhancer.render())
            }
        }
    }
}

// ============================================================================
// Built-in modules
// ============================================================================

/// Module loader that emits browser boot markup for each module.
#[derive(Debug, Clone)]
pub struct BuiltinModules {
    hydration: HydrationConfig,
}

impl BuiltinModules {
    pub fn new(hydration: HydrationConfig) -> Self {
        Self { hydration }
    }

    fn src(&self, module: ModuleId) -> String {
        self.hydration.bundle_url(&module.bundle_path())
    }
}

#[async_trait]
impl ModuleLoader for BuiltinModules {
    async fn load(&self, module: ModuleId) -> Result<BoxComponent, LoadError> {
        let src = self.src(module);
        let component: BoxComponent = match module {
            ModuleId::Client(key) => Box::new(ClientMount { key, src }),
            ModuleId::DynamicFrame => Box::new(DynamicFrame { src }),
            ModuleId::Enhancer(ProjectKey::Dynamic) => Box::new(DynamicEnhancer {
                src,
                shadow: ShadowMount {
                    src: self.hydration.bundle_url("dynamic/shadow.js"),
                    root_margin: self.hydration.shadow_root_margin.clone(),
                    idle_timeout_ms: self.hydration.shadow_idle_timeout_ms,
                },
            }),
            ModuleId::Enhancer(key) => Box::new(EnhancerMount { key, src }),
        };
        Ok(component)
    }
}

/// Empty mount point a client bundle renders into.
struct ClientMount {
    key: ProjectKey,
    src: String,
}

impl Component for ClientMount {
    fn render(&self) -> Markup {
        html! {
            div.client-mount data-project=(self.key.as_str()) data-module=(self.src) {}
            script type="module" src=(self.src) {}
        }
    }
}

struct DynamicFrame {
    src: String,
}

impl Component for DynamicFrame {
    fn render(&self) -> Markup {
        html! {
            div #dynamic-frame .dynamic-frame data-module=(self.src) {
                div.dynamic-frame-spinner role="progressbar" aria-label="Loading" {}
            }
            script type="module" src=(self.src) {}
        }
    }
}

struct EnhancerMount {
    key: ProjectKey,
    src: String,
}

impl Component for EnhancerMount {
    fn render(&self) -> Markup {
        html! {
            script type="module" src=(self.src) data-enhancer=(self.key.as_str()) {}
        }
    }
}

/// When and where the dynamic app's heavy shadow bundle attaches.
///
/// The browser mounts it once the frame is within `root_margin` of the
/// viewport or after `idle_timeout_ms` of idle time, whichever comes first.
#[derive(Debug, Clone)]
struct ShadowMount {
    src: String,
    root_margin: String,
    idle_timeout_ms: u64,
}

/// Sizes the SSR overlay to the frame image and defers the shadow app.
struct DynamicEnhancer {
    src: String,
    shadow: ShadowMount,
}

impl Component for DynamicEnhancer {
    fn render(&self) -> Markup {
        html! {
            div.dynamic-shadow-mount
                data-overlay-target="#dynamic-overlay"
                data-shadow-module=(self.shadow.src)
                data-root-margin=(self.shadow.root_margin)
                data-idle-timeout=(self.shadow.idle_timeout_ms) {}
            script type="module" src=(self.src) data-enhancer="dynamic" {}
        }
    }
}
