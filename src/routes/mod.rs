//! Screens of the application and the roles allowed on each of them.
//!
//! Roles come from the employee record's `employee_type`. Parsing is
//! case-insensitive so `"White Collar"`, `"white-collar"` and
//! `"WHITE_COLLAR"` all name the same role.

pub mod guard;

use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    WhiteCollar,
    BlueCollar,
    Manager,
    Officer,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognized role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Self; 4] = [
        Self::WhiteCollar,
        Self::BlueCollar,
        Self::Manager,
        Self::Officer,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WhiteCollar => "white collar",
            Self::BlueCollar => "blue collar",
            Self::Manager => "manager",
            Self::Officer => "officer",
        }
    }

    /// Landing screen after login.
    #[must_use]
    pub const fn home(self) -> Route {
        match self {
            Self::Manager | Self::Officer => Route::ManagerDashboard,
            Self::WhiteCollar | Self::BlueCollar => Route::Dashboard,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(value.trim().to_string()))
    }
}

/// Roles admitted to a screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    roles: Vec<Role>,
}

impl AllowList {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.sort();
        roles.dedup();
        Self { roles }
    }

    #[must_use]
    pub fn all() -> Self {
        Self::new(Role::ALL)
    }

    /// # Errors
    /// Returns the first name that is not a known role.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownRole> {
        let roles = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Role>, _>>()?;
        Ok(Self::new(roles))
    }

    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Dashboard,
    ManagerDashboard,
    Profile,
}

impl Route {
    pub const ALL: [Self; 5] = [
        Self::Root,
        Self::Login,
        Self::Dashboard,
        Self::ManagerDashboard,
        Self::Profile,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::ManagerDashboard => "/manager-dashboard",
            Self::Profile => "/profile",
        }
    }

    /// Matches a location, ignoring query, fragment and a trailing slash.
    #[must_use]
    pub fn from_path(location: &str) -> Option<Self> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// `None` for screens that need no session.
    #[must_use]
    pub fn allow_list(self) -> Option<AllowList> {
        match self {
            Self::Root | Self::Login => None,
            Self::Dashboard => Some(AllowList::new([Role::WhiteCollar, Role::BlueCollar])),
            Self::ManagerDashboard => Some(AllowList::new([Role::Manager, Role::Officer])),
            Self::Profile => Some(AllowList::all()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
