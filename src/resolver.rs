//! Per-project choice between SSR markup and a client-loaded component.
//!
//! The resolver reads three things: the project's [`HydrationPlan`], the SSR
//! descriptor (if the project has one) and the pre-fetched payload. The first
//! rule that matches wins:
//!
//! 1. A present payload plus a render function: render the markup. If the
//!    plan names an enhancer it is loaded once and rendered after the markup.
//! 2. Otherwise the plan's client module. For `dynamic` that is the
//!    lightweight frame, never the full app.
//!
//! Resolution itself is synchronous and only returns a [`Loader`]. No markup
//! is rendered and no module is loaded until the loader is invoked.
//!
//! [`HydrationPlan`]: crate::registry::HydrationPlan

use crate::component::{BoxComponent, LoadError, Loader, ModuleId, ModuleLoader, SsrComposite};
use crate::registry::{ProjectKey, Registry, RegistryError};
use crate::ssr::{RenderFn, SsrRegistry, payload_data, payload_present};
use futures::FutureExt;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// How a project reaches the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// SSR markup followed by an enhancer module.
    SsrEnhanced { enhancer: ModuleId },
    /// SSR markup on its own.
    Ssr,
    /// A client module rendered with no SSR markup.
    Client { module: ModuleId },
}

impl Strategy {
    /// Short tag used in `data-strategy` attributes.
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::SsrEnhanced { .. } => "ssr-enhanced",
            Strategy::Ssr => "ssr",
            Strategy::Client { .. } => "client",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::SsrEnhanced { enhancer } => write!(f, "ssr + {enhancer}"),
            Strategy::Ssr => f.write_str("ssr"),
            Strategy::Client { module } => write!(f, "client {module}"),
        }
    }
}

pub struct Resolver {
    registry: Arc<Registry>,
    ssr: Arc<SsrRegistry>,
    modules: Arc<dyn ModuleLoader>,
}

impl Resolver {
    pub fn new(
        registry: Arc<Registry>,
        ssr: Arc<SsrRegistry>,
        modules: Arc<dyn ModuleLoader>,
    ) -> Self {
        Self {
            registry,
            ssr,
            modules,
        }
    }

    /// The strategy [`resolve`](Self::resolve) would use, without building a loader.
    pub fn plan(
        &self,
        key: ProjectKey,
        payload: Option<&Value>,
    ) -> Result<Strategy, RegistryError> {
        self.decide(key, payload).map(|decision| decision.strategy())
    }

    pub fn resolve(
        &self,
        key: ProjectKey,
        payload: Option<&Value>,
    ) -> Result<Loader, RegistryError> {
        let decision = self.decide(key, payload)?;
        debug!(project = %key, strategy = %decision.strategy(), "resolved hydration strategy");

        let modules = Arc::clone(&self.modules);
        let loader: Loader = match decision {
            Decision::Client(module) => {
                Box::new(move || async move { modules.load(module).await }.boxed())
            }
            Decision::Ssr {
                render,
                data,
                enhancer,
            } => {
                let data = data.clone();
                Box::new(move || {
                    async move {
                        let markup = render(&data);
                        let enhancer = match enhancer {
                            Some(module) => Some(modules.load(module).await?),
                            None => None,
                        };
                        let component: BoxComponent = Box::new(SsrComposite { markup, enhancer });
                        Ok::<_, LoadError>(component)
                    }
                    .boxed()
                })
            }
        };
        Ok(loader)
    }

    /// [`resolve`](Self::resolve) by key name.
    pub fn resolve_named(
        &self,
        name: &str,
        payload: Option<&Value>,
    ) -> Result<Loader, RegistryError> {
        self.resolve(name.parse()?, payload)
    }

    fn decide<'a>(
        &self,
        key: ProjectKey,
        payload: Option<&'a Value>,
    ) -> Result<Decision<'a>, RegistryError> {
        let project = self.registry.get(key)?;
        let render = self.ssr.get(key).and_then(|descriptor| descriptor.render);
        let payload = payload.filter(|p| payload_present(p));

        if let Some(payload) = payload
            && let Some(render) = render
        {
            return Ok(Decision::Ssr {
                render,
                data: payload_data(payload),
                enhancer: project.plan.enhancer,
            });
        }

        if payload.is_some() {
            debug!(project = %key, "payload without render function; using client module");
        }
        Ok(Decision::Client(project.plan.client))
    }
}

/// Outcome of the decision procedure, before a loader is built.
enum Decision<'a> {
    Client(ModuleId),
    Ssr {
        render: RenderFn,
        /// The document to render, already unwrapped from `payload.data`.
        data: &'a Value,
        enhancer: Option<ModuleId>,
    },
}

impl Decision<'_> {
    fn strategy(&self) -> Strategy {
        match self {
            Decision::Client(module) => Strategy::Client { module: *module },
            Decision::Ssr {
                enhancer: Some(enhancer),
                ..
            } => Strategy::SsrEnhanced {
                enhancer: *enhancer,
            },
            Decision::Ssr { enhancer: None, .. } => Strategy::Ssr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{HydrationPlan, Project, ProjectMeta};
    use crate::ssr::SsrDescriptor;
    use crate::test_helpers::RecordingModules;
    use maud::{Markup, html};
    use serde_json::json;

    fn resolver_with(modules: Arc<RecordingModules>) -> Resolver {
        Resolver::new(
            Arc::new(Registry::standard()),
            Arc::new(SsrRegistry::standard()),
            modules,
        )
    }

    fn scoop_payload() -> Value {
        json!({
            "data": {
                "mediaOne": {"imageUrl": "https://static/scoop.png"},
                "mediaTwo": {"video": {"poster": "https://cdn/p.jpg", "mp4Url": "https://cdn/v.mp4"}}
            }
        })
    }

    #[tokio::test]
    async fn scoop_with_payload_renders_markup_then_enhancer() {
        let modules = Arc::new(RecordingModules::default());
        let resolver = resolver_with(modules.clone());
        let payload = scoop_payload();

        assert_eq!(
            resolver.plan(ProjectKey::Scoop, Some(&payload)).unwrap(),
            Strategy::SsrEnhanced {
                enhancer: ModuleId::Enhancer(ProjectKey::Scoop)
            }
        );

        let loader = resolver.resolve(ProjectKey::Scoop, Some(&payload)).unwrap();
        assert!(modules.loads().is_empty(), "resolve must not load anything");

        let html = loader().await.unwrap().render().into_string();
        let markup_at = html.find(r#"id="scoop-ssr""#).unwrap();
        let enhancer_at = html.find(r#"data-module="enhancer:scoop""#).unwrap();
        assert!(markup_at < enhancer_at);
        assert_eq!(modules.loads(), [ModuleId::Enhancer(ProjectKey::Scoop)]);
    }

    #[tokio::test]
    async fn dynamic_without_payload_loads_frame() {
        let modules = Arc::new(RecordingModules::default());
        let resolver = resolver_with(modules.clone());

        let loader = resolver.resolve(ProjectKey::Dynamic, None).unwrap();
        let html = loader().await.unwrap().render().into_string();
        assert!(html.contains(r#"data-module="dynamic-frame""#));
        assert_eq!(modules.loads(), [ModuleId::DynamicFrame]);
    }

    #[tokio::test]
    async fn dynamic_with_payload_uses_its_enhancer() {
        let modules = Arc::new(RecordingModules::default());
        let resolver = resolver_with(modules.clone());
        let payload = json!({"frame": {"imageUrl": "https://static/app.png"}});

        let loader = resolver.resolve(ProjectKey::Dynamic, Some(&payload)).unwrap();
        let html = loader().await.unwrap().render().into_string();
        assert!(html.contains(r#"id="dynamic-overlay""#));
        assert_eq!(modules.loads(), [ModuleId::Enhancer(ProjectKey::Dynamic)]);
    }

    #[test]
    fn unknown_name_fails_with_the_key() {
        let resolver = resolver_with(Arc::new(RecordingModules::default()));
        let err = match resolver.resolve_named("carousel", None) {
            Ok(_) => panic!("expected an error"),
            Err(err) => err,
        };
        assert_eq!(err, RegistryError::UnknownProject("carousel".into()));
    }

    #[test]
    fn unregistered_key_fails() {
        let resolver = Resolver::new(
            Arc::new(Registry::new(vec![])),
            Arc::new(SsrRegistry::standard()),
            Arc::new(RecordingModules::default()),
        );
        assert!(resolver.plan(ProjectKey::Scoop, Some(&scoop_payload())).is_err());
    }

    #[tokio::test]
    async fn enhancer_failure_propagates() {
        let modules = Arc::new(RecordingModules::failing_on(ModuleId::Enhancer(ProjectKey::Scoop)));
        let resolver = resolver_with(modules);
        let payload = scoop_payload();

        let loader = resolver.resolve(ProjectKey::Scoop, Some(&payload)).unwrap();
        match loader().await {
            Err(LoadError::Unavailable { module, .. }) => {
                assert_eq!(module, ModuleId::Enhancer(ProjectKey::Scoop));
            }
            Ok(_) => panic!("enhancer failure was swallowed"),
        }
    }

    #[tokio::test]
    async fn game_with_payload_stays_client_side() {
        let modules = Arc::new(RecordingModules::default());
        let resolver = resolver_with(modules.clone());
        let payload = json!({"anything": true});

        assert_eq!(
            resolver.plan(ProjectKey::Game, Some(&payload)).unwrap(),
            Strategy::Client {
                module: ModuleId::Client(ProjectKey::Game)
            }
        );
        let loader = resolver.resolve(ProjectKey::Game, Some(&payload)).unwrap();
        loader().await.unwrap();
        assert_eq!(modules.loads(), [ModuleId::Client(ProjectKey::Game)]);
    }

    #[test]
    fn falsy_payload_is_absent() {
        let resolver = resolver_with(Arc::new(RecordingModules::default()));
        for payload in [Value::Null, json!(false), json!(""), json!(0)] {
            assert_eq!(
                resolver.plan(ProjectKey::Scoop, Some(&payload)).unwrap(),
                Strategy::Client {
                    module: ModuleId::Client(ProjectKey::Scoop)
                }
            );
        }
    }

    fn render_scoreboard(data: &Value) -> Markup {
        html! { p.scoreboard { (data["score"].as_i64().unwrap_or(0)) } }
    }

    #[tokio::test]
    async fn render_without_enhancer_is_plain_ssr() {
        let registry = Registry::new(vec![Project {
            meta: ProjectMeta {
                key: ProjectKey::Game,
                title: "Evade the Rock",
                is_link: false,
            },
            plan: HydrationPlan {
                client: ModuleId::Client(ProjectKey::Game),
                enhancer: None,
            },
        }]);
        let mut ssr = SsrRegistry::new();
        ssr.insert(
            ProjectKey::Game,
            SsrDescriptor {
                slug: "game",
                render: Some(render_scoreboard),
                critical_css_files: &[],
            },
        );
        let modules = Arc::new(RecordingModules::default());
        let resolver = Resolver::new(Arc::new(registry), Arc::new(ssr), modules.clone());
        let payload = json!({"score": 42});

        assert_eq!(resolver.plan(ProjectKey::Game, Some(&payload)).unwrap(), Strategy::Ssr);
        let loader = resolver.resolve(ProjectKey::Game, Some(&payload)).unwrap();
        let html = loader().await.unwrap().render().into_string();
        assert_eq!(html, r#"<p class="scoreboard">42</p>"#);
        assert!(modules.loads().is_empty());
    }

    #[test]
    fn strategy_tags() {
        assert_eq!(Strategy::Ssr.kind(), "ssr");
        assert_eq!(
            Strategy::Client {
                module: ModuleId::DynamicFrame
            }
            .to_string(),
            "client dynamic-frame"
        );
    }
}
