//! Content Catalog
//!
//! Read-only records shown by the gallery views. A catalog is bundled into
//! the binary; a JSON file with the same shape can replace it.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Could not read the catalog file
    #[error("Failed to read catalog at {path}: {source}")]
    Read {
        /// File that was attempted
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The JSON did not match the catalog shape
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records of the same kind share an id
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId {
        /// Record kind
        kind: &'static str,
        /// Offending id
        id: String,
    },
}

/// Kind of software project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectCategory {
    /// Company or product
    Venture,
    /// Personal project
    SideProject,
    /// Client work
    Freelance,
}

impl ProjectCategory {
    /// Filter tab order
    pub const ALL: [ProjectCategory; 3] = [Self::Venture, Self::SideProject, Self::Freelance];

    /// Label used on filter tabs
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Venture => "VENTURE",
            Self::SideProject => "SIDE_PROJECT",
            Self::Freelance => "FREELANCE",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A software project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Unique id
    pub id: String,
    /// Display title
    pub title: String,
    /// One-line summary shown in lists
    pub short_description: String,
    /// Full write-up for the detail pane
    #[serde(default)]
    pub long_description: Option<String>,
    /// Project kind
    pub category: ProjectCategory,
    /// Technologies used
    #[serde(default)]
    pub tech_tags: Vec<String>,
    /// Card image
    pub thumbnail_url: String,
    /// Logo image
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Year the project began
    #[serde(default)]
    pub start_year: Option<String>,
    /// Public link
    #[serde(default)]
    pub external_link: Option<String>,
    /// Extra screenshots
    #[serde(default)]
    pub gallery_urls: Option<Vec<String>>,
}

impl Project {
    /// Long description, falling back to the short one
    #[must_use]
    pub fn description(&self) -> &str {
        self.long_description
            .as_deref()
            .unwrap_or(&self.short_description)
    }

    /// Number of gallery images
    #[must_use]
    pub fn gallery_len(&self) -> usize {
        self.gallery_urls.as_ref().map_or(0, Vec::len)
    }
}

/// Kind of written work
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritingCategory {
    /// Long-form fiction
    Book,
    /// Poems
    Poetry,
}

impl WritingCategory {
    /// Filter tab order
    pub const ALL: [WritingCategory; 2] = [Self::Book, Self::Poetry];

    /// Label used on filter tabs
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Book => "BOOK",
            Self::Poetry => "POETRY",
        }
    }
}

impl fmt::Display for WritingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A book or poem
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingWork {
    /// Unique id
    pub id: String,
    /// Display title
    pub title: String,
    /// Teaser shown in lists
    pub excerpt: String,
    /// Complete text for the reader
    pub full_text: String,
    /// Book or poetry
    pub category: WritingCategory,
    /// Publication year
    pub year: String,
}

/// A visual work
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    /// Unique id
    pub id: String,
    /// Display title
    pub title: String,
    /// Image location
    pub image_url: String,
}

/// Hub header content
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Where the author is based
    pub location: String,
    /// Tagline above the name
    pub persona: String,
    /// Role chips under the name
    pub roles: Vec<String>,
    /// Heading of the about section
    pub headline: String,
    /// About text
    pub about: String,
    /// Skill chips in the about section
    pub skills: Vec<String>,
}

impl Profile {
    /// First and last name joined
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Everything the gallery views display
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Hub header
    pub profile: Profile,
    /// Software projects, in display order
    pub projects: Vec<Project>,
    /// Written works, in display order
    pub writings: Vec<WritingWork>,
    /// Visual works, in display order
    pub artworks: Vec<Artwork>,
}

impl Catalog {
    /// The catalog bundled with the binary
    ///
    /// # Errors
    ///
    /// Only fails if the bundled JSON is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from JSON
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and
    /// [`CatalogError::DuplicateId`] when ids collide.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            projects = catalog.projects.len(),
            writings = catalog.writings.len(),
            artworks = catalog.artworks.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Load `path` if given, otherwise the bundled catalog
    ///
    /// # Errors
    ///
    /// Propagates [`Catalog::load`] errors.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// Projects in `category`, or all of them
    pub fn projects_in(
        &self,
        category: Option<ProjectCategory>,
    ) -> impl Iterator<Item = &Project> + '_ {
        self.projects
            .iter()
            .filter(move |p| category.map_or(true, |c| p.category == c))
    }

    /// Written works in `category`, or all of them
    pub fn writings_in(
        &self,
        category: Option<WritingCategory>,
    ) -> impl Iterator<Item = &WritingWork> + '_ {
        self.writings
            .iter()
            .filter(move |w| category.map_or(true, |c| w.category == c))
    }

    /// Look up a project by id
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up a written work by id
    #[must_use]
    pub fn writing(&self, id: &str) -> Option<&WritingWork> {
        self.writings.iter().find(|w| w.id == id)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        check_unique("project", self.projects.iter().map(|p| p.id.as_str()))?;
        check_unique("writing", self.writings.iter().map(|w| w.id.as_str()))?;
        check_unique("artwork", self.artworks.iter().map(|a| a.id.as_str()))?;
        Ok(())
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
