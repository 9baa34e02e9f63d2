use crate::config::ConsentConfig;
use crate::consent::event::ConsentBus;
use crate::consent::surface::Surfaces;
use crate::consent::{
    ActivationHooks, ConsentPhase, ConsentStore, NoopHooks, PreferenceRecord, PromptSurface, SettingsSurface,
};
use crate::cookies::{CookieJar, InMemoryCookieJar};

/// Builder for [`ConsentStore`].
///
/// Everything is optional: without a jar the store keeps cookies in memory, without
/// hooks nothing is activated, and without surfaces UI calls are no-ops.
///
/// ```rust
/// use cookie_consent::{ConsentConfig, ConsentStore, Integrations};
/// use cookie_consent::cookies::InMemoryCookieJar;
///
/// let mut store = ConsentStore::builder()
///     .config(ConsentConfig::default())
///     .jar(InMemoryCookieJar::new())
///     .hooks(Integrations::new().on_analytics(|| println!("analytics on")))
///     .build();
/// store.initialize();
/// store.accept_all();
/// ```
#[derive(Default)]
pub struct ConsentStoreBuilder {
    config: Option<ConsentConfig>,
    jar: Option<Box<dyn CookieJar>>,
    hooks: Option<Box<dyn ActivationHooks>>,
    prompt: Option<Box<dyn PromptSurface>>,
    settings: Option<Box<dyn SettingsSurface>>,
}

impl ConsentStoreBuilder {
    pub fn config(mut self, config: ConsentConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Storage medium for the consent cookie.
    pub fn jar(mut self, jar: impl CookieJar + 'static) -> Self {
        self.jar = Some(Box::new(jar));
        self
    }

    pub fn hooks(mut self, hooks: impl ActivationHooks + 'static) -> Self {
        self.hooks = Some(Box::new(hooks));
        self
    }

    /// The decision prompt (banner).
    pub fn prompt(mut self, prompt: impl PromptSurface + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    /// The settings editor (modal).
    pub fn settings(mut self, settings: impl SettingsSurface + 'static) -> Self {
        self.settings = Some(Box::new(settings));
        self
    }

    pub fn build(self) -> ConsentStore {
        let config = self.config.unwrap_or_default();
        let bus = ConsentBus::new(config.event_capacity);

        ConsentStore {
            record: PreferenceRecord::default(),
            phase: ConsentPhase::Unknown,
            prompted: false,
            jar: self.jar.unwrap_or_else(|| Box::new(InMemoryCookieJar::new())),
            hooks: self.hooks.unwrap_or_else(|| Box::new(NoopHooks)),
            surfaces: Surfaces {
                prompt: self.prompt,
                settings: self.settings,
            },
            bus,
            config,
        }
    }
}
