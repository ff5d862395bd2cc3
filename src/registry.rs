//! Static project registry.
//!
//! Every project on the landing page has a [`ProjectMeta`] and a
//! [`HydrationPlan`] naming its client module and, if it has one, the enhancer
//! that takes over its SSR markup. The plan is the dispatch table the resolver
//! reads: adding a project is a new entry here, not a new branch there.
//!
//! Looking up a key that is not registered is a wiring bug. It fails with
//! [`RegistryError::UnknownProject`] instead of falling back to a default.

use crate::component::ModuleId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown project key: {0}")]
    UnknownProject(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectKey {
    Rotary,
    Scoop,
    Dataviz,
    Game,
    Dynamic,
}

impl ProjectKey {
    pub const ALL: [ProjectKey; 5] = [
        ProjectKey::Rotary,
        ProjectKey::Scoop,
        ProjectKey::Dataviz,
        ProjectKey::Game,
        ProjectKey::Dynamic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectKey::Rotary => "rotary",
            ProjectKey::Scoop => "scoop",
            ProjectKey::Dataviz => "dataviz",
            ProjectKey::Game => "game",
            ProjectKey::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKey {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownProject(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub key: ProjectKey,
    pub title: &'static str,
    /// Rendered as a link to its own page rather than an inline pane.
    pub is_link: bool,
}

/// Which modules a project loads on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationPlan {
    /// Loaded when there is no SSR markup to enhance.
    pub client: ModuleId,
    /// Mounted after SSR markup. `None` means the markup stands alone.
    pub enhancer: Option<ModuleId>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub meta: ProjectMeta,
    pub plan: HydrationPlan,
}

#[derive(Debug, Clone)]
pub struct Registry {
    projects: Vec<Project>,
}

impl Registry {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// The landing page projects, in display order.
    ///
    /// `dynamic` loads only the frame by default. Its shadow app is attached
    /// later by the dynamic enhancer.
    pub fn standard() -> Self {
        let project = |key, title, enhanced: bool| Project {
            meta: ProjectMeta {
                key,
                title,
                is_link: false,
            },
            plan: HydrationPlan {
                client: ModuleId::Client(key),
                enhancer: enhanced.then_some(ModuleId::Enhancer(key)),
            },
        };
        Self::new(vec![
            project(ProjectKey::Scoop, "Ice Cream Scoop", true),
            project(ProjectKey::Rotary, "Rotary Lamp", true),
            project(ProjectKey::Dataviz, "Data Visualization", true),
            project(ProjectKey::Game, "Evade the Rock", false),
            Project {
                meta: ProjectMeta {
                    key: ProjectKey::Dynamic,
                    title: "Dynamic App",
                    is_link: true,
                },
                plan: HydrationPlan {
                    client: ModuleId::DynamicFrame,
                    enhancer: Some(ModuleId::Enhancer(ProjectKey::Dynamic)),
                },
            },
        ])
    }

    pub fn get(&self, key: ProjectKey) -> Result<&Project, RegistryError> {
        self.projects
            .iter()
            .find(|p| p.meta.key == key)
            .ok_or_else(|| RegistryError::UnknownProject(key.to_string()))
    }

    /// Look up by key name.
    pub fn find(&self, name: &str) -> Result<&Project, RegistryError> {
        self.get(name.parse()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
