pub mod config;
pub mod consent;
pub mod cookies;
pub mod errors;

pub use config::{ConfigError, ConsentConfig, ConsentConfigBuilder};
pub use consent::{
    ActivationHooks, Category, ConsentEvent, ConsentPhase, ConsentStore, ConsentStoreBuilder, CustomChoices,
    Decision, Integrations, PreferenceRecord, PromptSurface, SettingsSurface, Startup, ToggleStates, UiAction,
};
pub use errors::ConsentError;
