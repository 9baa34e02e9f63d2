use serde::Serialize;
use std::fmt;

/// A cookie category a user can consent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Strictly necessary cookies. Always enabled.
    Essential,
    Analytics,
    Marketing,
    Preferences,
}

impl Category {
    /// Categories the user may switch, in activation order.
    pub const OPTIONAL: [Category; 3] = [Category::Analytics, Category::Marketing, Category::Preferences];

    /// Field name used in the persisted settings object.
    pub fn key(self) -> &'static str {
        match self {
            Category::Essential => "essential",
            Category::Analytics => "analytics",
            Category::Marketing => "marketing",
            Category::Preferences => "preferences",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The user's cookie-category preferences.
///
/// `essential` is private and always `true`: no constructor or setter can clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PreferenceRecord {
    essential: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
}

impl Default for PreferenceRecord {
    fn default() -> Self {
        Self::essential_only()
    }
}

impl PreferenceRecord {
    pub fn new(analytics: bool, marketing: bool, preferences: bool) -> Self {
        Self {
            essential: true,
            analytics,
            marketing,
            preferences,
        }
    }

    /// Every category enabled.
    pub fn all_granted() -> Self {
        Self::new(true, true, true)
    }

    /// Only essential cookies; also the default before any decision.
    pub fn essential_only() -> Self {
        Self::new(false, false, false)
    }

    pub fn essential(&self) -> bool {
        self.essential
    }

    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Essential => self.essential,
            Category::Analytics => self.analytics,
            Category::Marketing => self.marketing,
            Category::Preferences => self.preferences,
        }
    }

    /// Sets an optional category. Attempts to change `Essential` are ignored.
    pub fn set(&mut self, category: Category, enabled: bool) {
        match category {
            Category::Essential => {
                if !enabled {
                    log::warn!("PreferenceRecord: essential cookies cannot be disabled");
                }
            }
            Category::Analytics => self.analytics = enabled,
            Category::Marketing => self.marketing = enabled,
            Category::Preferences => self.preferences = enabled,
        }
    }

    /// Optional categories currently enabled, in activation order.
    pub fn enabled_optional(&self) -> impl Iterator<Item = Category> + '_ {
        Category::OPTIONAL.into_iter().filter(|c| self.get(*c))
    }
}

/// Per-category choices from a custom save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomChoices {
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
}

impl From<CustomChoices> for PreferenceRecord {
    fn from(c: CustomChoices) -> Self {
        PreferenceRecord::new(c.analytics, c.marketing, c.preferences)
    }
}
