//! User preferences.

use std::fmt;
use std::str::FromStr;

/// A toggleable preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Notifications,
    LocationServices,
    DarkMode,
}

impl Preference {
    pub const ALL: [Self; 3] = [Self::Notifications, Self::LocationServices, Self::DarkMode];

    /// Path segment for the toggle route.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::LocationServices => "location_services",
            Self::DarkMode => "dark_mode",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Notifications => "Notifications",
            Self::LocationServices => "Location Services",
            Self::DarkMode => "Dark Mode",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Notifications => "Receive app notifications",
            Self::LocationServices => "Allow app to access your location",
            Self::DarkMode => "Toggle dark theme",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| format!("unknown preference {s:?}"))
    }
}

/// In-memory preferences. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Preferences {
    pub notifications: bool,
    pub location_services: bool,
    pub dark_mode: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            notifications: true,
            location_services: true,
            dark_mode: false,
        }
    }
}

impl Preferences {
    #[must_use]
    pub const fn get(&self, preference: Preference) -> bool {
        match preference {
            Preference::Notifications => self.notifications,
            Preference::LocationServices => self.location_services,
            Preference::DarkMode => self.dark_mode,
        }
    }

    /// Flip `preference` and return its new value.
    pub const fn toggle(&mut self, preference: Preference) -> bool {
        let value = match preference {
            Preference::Notifications => &mut self.notifications,
            Preference::LocationServices => &mut self.location_services,
            Preference::DarkMode => &mut self.dark_mode,
        };
        *value = !*value;
        *value
    }
}
