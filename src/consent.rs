//! Consent state: the preference record, its persisted envelope and the [`ConsentStore`]
//! that ties them to a cookie jar, the UI surfaces and the tracking integrations.
//!
//! # Lifecycle
//!
//! ```text
//! Unknown --(no cookie)--> AwaitingDecision --(decision)--> Decided
//! Unknown --(cookie found)-------------------------------> Decided
//! Decided --(decision)--> Decided
//! ```
//!
//! Activation callbacks only fire on explicit decisions that enable optional
//! categories (accept-all, custom save). Restoring a stored decision at startup
//! updates the in-memory record but does not activate anything.

mod builder;
mod envelope;
mod event;
mod hooks;
mod reconcile;
mod record;
mod store;
mod surface;

pub use builder::ConsentStoreBuilder;
pub use envelope::{decode, decode_envelope, decode_envelope_over, DecodeError, DecodedEnvelope, PersistedEnvelope, SCHEMA_VERSION};
pub use event::{ConsentEvent, Decision, Subscription};
pub use hooks::{dispatch_activations, ActivationHooks, Integrations, NoopHooks};
pub use reconcile::reconcile;
pub use record::{Category, CustomChoices, PreferenceRecord};
pub use store::{ConsentPhase, ConsentStore, Startup};
pub use surface::{PromptSurface, SettingsSurface, ToggleStates, UiAction};
