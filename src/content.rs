//! Content source: the CMS stand-in.
//!
//! Everything the site shows comes through [`ContentSource`]. The shipped
//! implementation, [`FileContentSource`], reads JSON documents exported from
//! the CMS into a content directory:
//!
//! ```text
//! content/
//! ├── config.toml        # Site config (optional)
//! ├── gallery.json       # [GalleryItem]
//! ├── icons.json         # [SvgIcon] (optional)
//! ├── colors.json        # { alt1: [c0, c1, c2, c3] } (optional)
//! └── projects/
//!     ├── ice-scoop.json # One document per SSR project, named by slug
//!     └── ...
//! ```
//!
//! The shape of each document is not validated beyond deserialization. Project
//! documents stay as raw `serde_json::Value` and are interpreted only by the
//! matching SSR render function.

use crate::types::{ColorMapping, GalleryItem, SvgIcon};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no content document named '{0}'")]
    MissingDocument(String),
    #[error("content source unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to site content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// All gallery cards, in CMS order.
    async fn fetch_gallery(&self) -> Result<Vec<GalleryItem>, ContentError>;

    /// Inline SVG icons used by the dynamic theme.
    async fn fetch_icons(&self) -> Result<Vec<SvgIcon>, ContentError>;

    /// Accent colors keyed by gallery alt text.
    async fn fetch_colors(&self) -> Result<ColorMapping, ContentError>;

    /// A project document by slug.
    async fn fetch_project(&self, slug: &str) -> Result<Value, ContentError>;
}

const GALLERY_FILE: &str = "gallery.json";
const ICONS_FILE: &str = "icons.json";
const COLORS_FILE: &str = "colors.json";
const PROJECTS_DIR: &str = "projects";

/// Content directory exported from the CMS.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    root: PathBuf,
    /// slug → document path, built once on open.
    projects: BTreeMap<String, PathBuf>,
}

impl FileContentSource {
    /// Open a content directory and index its project documents.
    ///
    /// Fails if `root` is not a directory. A missing `projects/` directory
    /// just means no project has SSR content.
    pub fn open(root: &Path) -> Result<Self, ContentError> {
        if !root.is_dir() {
            return Err(ContentError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("content directory not found: {}", root.display()),
            )));
        }
        let projects = index_projects(&root.join(PROJECTS_DIR))?;
        Ok(Self {
            root: root.to_path_buf(),
            projects,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Slugs of all indexed project documents, sorted.
    pub fn project_slugs(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, ContentError> {
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content).map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`read_json`](Self::read_json) but a missing file is the default value.
    async fn read_optional_json<T: DeserializeOwned + Default>(
        &self,
        path: &Path,
    ) -> Result<T, ContentError> {
        if !path.exists() {
            return Ok(T::default());
        }
        self.read_json(path).await
    }
}

/// Map `projects/**/<slug>.json` to slugs. Nested directories are allowed;
/// the file stem is the slug.
fn index_projects(dir: &Path) -> Result<BTreeMap<String, PathBuf>, ContentError> {
    let mut projects = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(projects);
    }
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| ContentError::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            projects.insert(stem.to_string(), path.to_path_buf());
        }
    }
    Ok(projects)
}

#[async_trait]
impl ContentSource for FileContentSource {
    async fn fetch_gallery(&self) -> Result<Vec<GalleryItem>, ContentError> {
        self.read_json(&self.root.join(GALLERY_FILE)).await
    }

    async fn fetch_icons(&self) -> Result<Vec<SvgIcon>, ContentError> {
        self.read_optional_json(&self.root.join(ICONS_FILE)).await
    }

    async fn fetch_colors(&self) -> Result<ColorMapping, ContentError> {
        self.read_optional_json(&self.root.join(COLORS_FILE)).await
    }

    async fn fetch_project(&self, slug: &str) -> Result<Value, ContentError> {
        let path = self
            .projects
            .get(slug)
            .ok_or_else(|| ContentError::MissingDocument(slug.to_string()))?;
        self.read_json(path).await
    }
}
