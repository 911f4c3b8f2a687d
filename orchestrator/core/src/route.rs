//! Routes and the Host Routing Mechanism
//!
//! The set of top-level views is closed and known at build time. The
//! currently committed route lives in a [`RouteHost`]; only the
//! orchestrator writes to it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four top-level views
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// The hub linking to every gallery
    #[default]
    Hub,
    /// Visual works gallery
    Artworks,
    /// Software projects gallery
    Coding,
    /// Written works gallery
    Writing,
}

impl Route {
    /// Every route, in hub-card order
    pub const ALL: [Route; 4] = [Route::Hub, Route::Artworks, Route::Coding, Route::Writing];

    /// The three galleries reachable from the hub
    pub const GALLERIES: [Route; 3] = [Route::Artworks, Route::Coding, Route::Writing];

    /// Hash-style path for this route
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Hub => "/",
            Self::Artworks => "/artworks",
            Self::Coding => "/coding",
            Self::Writing => "/writing",
        }
    }

    /// Title shown in the sub-page navbar and on hub cards
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Hub => "HUB",
            Self::Artworks => "VISUAL ARRAYS",
            Self::Coding => "NEURAL NETWORKS",
            Self::Writing => "DATA ARCHIVES",
        }
    }

    /// One-line description shown on hub cards
    #[must_use]
    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Hub => "Return to the hub",
            Self::Artworks => "Digital & Traditional Artworks",
            Self::Coding => "Coding Projects & Ventures",
            Self::Writing => "Writing & Lore",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A path outside the closed route set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route: {0:?}")]
pub struct RouteError(pub String);

impl FromStr for Route {
    type Err = RouteError;

    /// Accepts `/coding`, `#/coding`, `coding` and a trailing slash
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let path = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let name = path.trim_matches('/');

        match name.to_ascii_lowercase().as_str() {
            "" | "hub" => Ok(Self::Hub),
            "artworks" => Ok(Self::Artworks),
            "coding" => Ok(Self::Coding),
            "writing" => Ok(Self::Writing),
            _ => Err(RouteError(s.to_string())),
        }
    }
}

/// The host routing mechanism holding the committed route
pub trait RouteHost {
    /// Currently committed route
    fn current(&self) -> Route;

    /// Switch to a new route
    fn commit(&mut self, route: Route);

    /// Jump to a route at process start, without a transition
    fn reset(&mut self, route: Route) {
        self.commit(route);
    }
}

/// In-memory router with a visit history
#[derive(Clone, Debug, Default)]
pub struct MemoryRouter {
    current: Route,
    history: Vec<Route>,
}

impl MemoryRouter {
    /// Router starting at the hub
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes committed so far, oldest first
    #[must_use]
    pub fn history(&self) -> &[Route] {
        &self.history
    }
}

impl RouteHost for MemoryRouter {
    fn current(&self) -> Route {
        self.current
    }

    fn commit(&mut self, route: Route) {
        self.current = route;
        self.history.push(route);
    }

    fn reset(&mut self, route: Route) {
        self.current = route;
        self.history.clear();
    }
}
