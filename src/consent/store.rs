use crate::config::ConsentConfig;
use crate::consent::event::ConsentBus;
use crate::consent::hooks::dispatch_activations;
use crate::consent::surface::Surfaces;
use crate::consent::{
    decode_envelope_over, ActivationHooks, Category, ConsentEvent, ConsentStoreBuilder, CustomChoices, Decision,
    PersistedEnvelope, PreferenceRecord, Subscription, UiAction,
};
use crate::cookies::{format_set_cookie, CookieJar};
use crate::errors::ConsentError;
use std::time::Duration;
use time::OffsetDateTime;

/// Where the session stands with respect to a consent decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsentPhase {
    /// `initialize()` has not run yet.
    #[default]
    Unknown,
    /// No decision is stored; the prompt is (or is about to be) shown.
    AwaitingDecision,
    /// A decision was restored or made in this session.
    Decided,
}

/// Result of [`ConsentStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// A stored decision is in effect.
    Restored(PreferenceRecord),
    /// No usable decision is stored. Call [`ConsentStore::present_prompt`] after the delay.
    PromptAfter(Duration),
}

/// Single source of truth for consent during a page session.
///
/// Construct one per session with [`ConsentStore::builder`] and pass it to whatever
/// wires up the UI. All mutation goes through `&mut self`.
pub struct ConsentStore {
    pub(crate) config: ConsentConfig,
    pub(crate) record: PreferenceRecord,
    pub(crate) phase: ConsentPhase,
    /// Set once the prompt has been shown this session.
    pub(crate) prompted: bool,
    pub(crate) jar: Box<dyn CookieJar>,
    pub(crate) hooks: Box<dyn ActivationHooks>,
    pub(crate) surfaces: Surfaces,
    pub(crate) bus: ConsentBus,
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentStore")
            .field("cookie", &self.config.cookie_name)
            .field("record", &self.record)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl ConsentStore {
    pub fn builder() -> ConsentStoreBuilder {
        ConsentStoreBuilder::default()
    }

    pub fn record(&self) -> PreferenceRecord {
        self.record
    }

    pub fn phase(&self) -> ConsentPhase {
        self.phase
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    /// The storage medium, for inspection.
    pub fn jar(&self) -> &dyn CookieJar {
        self.jar.as_ref()
    }

    /// Returns `true` if `category` may be used right now.
    pub fn is_allowed(&self, category: Category) -> bool {
        self.record.get(category)
    }

    /// Subscribes to consent changes.
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Reads the stored decision and seeds the in-memory record from it.
    ///
    /// Nothing is written back and no integration is activated. An envelope that cannot
    /// be decoded counts as no decision. Calling this again after the first time only
    /// reports the current state.
    pub fn initialize(&mut self) -> Startup {
        match self.phase {
            ConsentPhase::Unknown => {}
            ConsentPhase::AwaitingDecision => return Startup::PromptAfter(self.config.grace_delay),
            ConsentPhase::Decided => return Startup::Restored(self.record),
        }

        match self.read_stored(PreferenceRecord::default()) {
            Some(record) => {
                self.record = record;
                self.phase = ConsentPhase::Decided;
                log::info!("ConsentStore: restored decision {:?}", record);
                self.publish(Decision::Restored, false);
                Startup::Restored(record)
            }
            None => {
                self.record = PreferenceRecord::default();
                self.phase = ConsentPhase::AwaitingDecision;
                log::info!(
                    "ConsentStore: no decision stored, prompting in {:?}",
                    self.config.grace_delay
                );
                Startup::PromptAfter(self.config.grace_delay)
            }
        }
    }

    /// Initializes, waits out the grace delay if a decision is needed, then shows the prompt.
    pub async fn start(&mut self) -> ConsentPhase {
        if let Startup::PromptAfter(delay) = self.initialize() {
            tokio::time::sleep(delay).await;
            self.present_prompt();
        }
        self.phase
    }

    /// Shows the decision prompt if a decision is still outstanding.
    ///
    /// The prompt is shown at most once per session. Returns whether it was shown.
    pub fn present_prompt(&mut self) -> bool {
        if self.phase != ConsentPhase::AwaitingDecision || self.prompted {
            return false;
        }
        self.prompted = true;
        self.surfaces.show_prompt();
        true
    }

    /// Grants every category.
    pub fn accept_all(&mut self) {
        self.decide(Decision::AcceptAll, PreferenceRecord::all_granted());
    }

    /// Keeps essential cookies only. Activates nothing.
    pub fn reject_all(&mut self) {
        self.decide(Decision::RejectAll, PreferenceRecord::essential_only());
    }

    /// Applies per-category choices. Essential stays enabled regardless.
    pub fn save_custom(&mut self, choices: CustomChoices) {
        self.decide(Decision::Custom, choices.into());
    }

    /// Writes the current record as a fresh envelope, replacing any stored one.
    ///
    /// The cookie expires [`ConsentConfig::retention`] after now.
    pub fn persist(&mut self) -> Result<PersistedEnvelope, ConsentError> {
        let now = OffsetDateTime::now_utc();
        let envelope = PersistedEnvelope::new(self.config.schema_version, self.record, now);
        let value = envelope
            .encode()
            .map_err(|e| ConsentError::StorageWrite(e.to_string()))?;

        let cookie = self.config.consent_cookie(value, now).ok_or_else(|| {
            ConsentError::StorageWrite(format!("retention {} puts the expiry out of range", self.config.retention))
        })?;
        let line = format_set_cookie(&cookie);
        self.jar
            .set_cookie(cookie)
            .map_err(|e| ConsentError::StorageWrite(format!("{e:#}")))?;

        log::debug!("ConsentStore: wrote {}", line);
        Ok(envelope)
    }

    /// The gating hook: activates every optional category enabled in `record`.
    pub fn on_preferences_changed(&mut self, record: &PreferenceRecord) {
        let activated = dispatch_activations(record, self.hooks.as_mut());
        log::info!("ConsentStore: activated {:?}", activated);
    }

    /// Re-reads the stored decision, syncs the toggles and shows the settings editor.
    pub fn open_settings(&mut self) {
        if let Some(record) = self.read_stored(self.record) {
            self.record = record;
        }
        self.surfaces.sync_toggles(&self.record);
        self.surfaces.show_settings();
    }

    pub fn close_settings(&mut self) {
        self.surfaces.hide_settings();
    }

    /// Saves the settings editor's toggles as a custom decision.
    pub fn save_settings(&mut self) {
        let choices = self.surfaces.read_toggles().to_choices();
        self.save_custom(choices);
    }

    /// Dispatches a UI interaction.
    pub fn handle(&mut self, action: UiAction) {
        log::debug!("ConsentStore: handling {:?}", action);
        match action {
            UiAction::AcceptAll => self.accept_all(),
            UiAction::RejectAll => self.reject_all(),
            UiAction::OpenSettings => self.open_settings(),
            UiAction::SaveSettings => self.save_settings(),
            UiAction::CloseSettings | UiAction::BackdropClick => self.close_settings(),
        }
    }

    fn decide(&mut self, decision: Decision, record: PreferenceRecord) {
        self.record = record;
        self.phase = ConsentPhase::Decided;

        // A failed write still dismisses the UI; the decision holds for this session.
        let written = match self.persist() {
            Ok(_) => true,
            Err(e) => {
                log::error!("ConsentStore: {}", e);
                false
            }
        };

        self.surfaces.hide_prompt();
        self.surfaces.hide_settings();

        if decision.activates() {
            self.on_preferences_changed(&record);
        }

        log::info!("ConsentStore: {:?} -> {:?}", decision, record);
        self.publish(decision, written);
    }

    /// Decodes the stored envelope over `base`. `None` when absent or unreadable.
    fn read_stored(&self, base: PreferenceRecord) -> Option<PreferenceRecord> {
        let cookie = self.jar.get_cookie(&self.config.cookie_name)?;
        match decode_envelope_over(&cookie.value, base) {
            Ok(envelope) => Some(envelope.settings),
            Err(e) => {
                log::warn!("ConsentStore: ignoring stored consent: {}", ConsentError::from(e));
                None
            }
        }
    }

    fn publish(&self, decision: Decision, written: bool) {
        self.bus.publish(ConsentEvent {
            decision,
            record: self.record,
            at: OffsetDateTime::now_utc(),
            written,
        });
    }
}
