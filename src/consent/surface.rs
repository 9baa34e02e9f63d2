//! UI collaborators.
//!
//! The consent layer does not render anything. The host page supplies the decision
//! prompt (banner) and the settings editor (modal) through these traits. Either may be
//! absent, in which case every operation on it is a logged no-op.

use crate::consent::{CustomChoices, PreferenceRecord};

/// The decision prompt, e.g. a cookie banner.
pub trait PromptSurface {
    fn show(&mut self);
    fn hide(&mut self);
}

/// The settings editor with one toggle per optional category.
pub trait SettingsSurface {
    fn show(&mut self);
    fn hide(&mut self);

    /// Current toggle positions. A toggle missing from the page reads as `None`.
    fn read_toggles(&self) -> ToggleStates;

    /// Moves the toggles to match `record`.
    fn sync_toggles(&mut self, record: &PreferenceRecord);
}

/// Toggle positions read from a [`SettingsSurface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleStates {
    pub analytics: Option<bool>,
    pub marketing: Option<bool>,
    pub preferences: Option<bool>,
}

impl ToggleStates {
    /// Missing toggles count as switched off.
    pub fn to_choices(self) -> CustomChoices {
        CustomChoices {
            analytics: self.analytics.unwrap_or(false),
            marketing: self.marketing.unwrap_or(false),
            preferences: self.preferences.unwrap_or(false),
        }
    }
}

/// User interactions the host forwards to [`ConsentStore::handle`](crate::ConsentStore::handle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    AcceptAll,
    RejectAll,
    /// Open the settings editor.
    OpenSettings,
    /// Save the settings editor's toggles.
    SaveSettings,
    CloseSettings,
    /// Click on the settings backdrop, outside its content.
    BackdropClick,
}

/// The attached surfaces. Absent ones turn calls into no-ops.
#[derive(Default)]
pub(crate) struct Surfaces {
    pub prompt: Option<Box<dyn PromptSurface>>,
    pub settings: Option<Box<dyn SettingsSurface>>,
}

impl Surfaces {
    pub fn show_prompt(&mut self) {
        match self.prompt.as_mut() {
            Some(p) => p.show(),
            None => log::debug!("Surfaces: no prompt attached, cannot show"),
        }
    }

    pub fn hide_prompt(&mut self) {
        match self.prompt.as_mut() {
            Some(p) => p.hide(),
            None => log::debug!("Surfaces: no prompt attached, cannot hide"),
        }
    }

    pub fn show_settings(&mut self) {
        match self.settings.as_mut() {
            Some(s) => s.show(),
            None => log::debug!("Surfaces: no settings editor attached, cannot show"),
        }
    }

    pub fn hide_settings(&mut self) {
        match self.settings.as_mut() {
            Some(s) => s.hide(),
            None => log::debug!("Surfaces: no settings editor attached, cannot hide"),
        }
    }

    pub fn sync_toggles(&mut self, record: &PreferenceRecord) {
        if let Some(s) = self.settings.as_mut() {
            s.sync_toggles(record);
        }
    }

    /// Reads the toggles; with no settings editor every toggle is missing.
    pub fn read_toggles(&self) -> ToggleStates {
        match self.settings.as_ref() {
            Some(s) => s.read_toggles(),
            None => {
                log::debug!("Surfaces: no settings editor attached, toggles read as off");
                ToggleStates::default()
            }
        }
    }
}
