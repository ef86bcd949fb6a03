//! Page routes and navigation.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown view {0:?} (expected dashboard, incidents or about)")]
pub struct UnknownRoute(pub String);

/// Which view a request drives. Resolved once from the path, then passed
/// explicitly into rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Incidents,
    About,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Dashboard, Route::Incidents, Route::About];

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().trim_matches('/') {
            "" | "dashboard" => Some(Route::Dashboard),
            "incidents" => Some(Route::Incidents),
            "about" => Some(Route::About),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Incidents => "incidents",
            Route::About => "about",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Incidents => "/incidents",
            Route::About => "/about",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Incidents => "Incidents",
            Route::About => "About",
        }
    }

    /// Whether the view is backed by upstream data and refreshes.
    pub fn is_live(self) -> bool {
        !matches!(self, Route::About)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s).ok_or_else(|| UnknownRoute(s.to_string()))
    }
}

/// A navigation entry, `active` for the current route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

pub fn nav(active: Route) -> Vec<NavLink> {
    Route::ALL
        .iter()
        .map(|&r| NavLink {
            href: r.path(),
            label: r.title(),
            active: r == active,
        })
        .collect()
}
