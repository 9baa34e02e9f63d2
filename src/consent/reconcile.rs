use crate::consent::{Category, PreferenceRecord};
use serde_json::Value;

/// Merges a persisted `settings` object into `base`.
///
/// Each optional category present as a JSON boolean overwrites `base`. Absent or
/// non-boolean fields keep the `base` value. `essential` is never read: it stays `true`.
/// A missing or non-object `settings` leaves `base` untouched.
pub fn reconcile(base: PreferenceRecord, settings: Option<&Value>) -> PreferenceRecord {
    let mut merged = base;

    let Some(fields) = settings.and_then(Value::as_object) else {
        log::debug!("reconcile: no settings object in envelope, keeping {:?}", base);
        return merged;
    };

    for category in Category::OPTIONAL {
        match fields.get(category.key()) {
            Some(Value::Bool(enabled)) => merged.set(category, *enabled),
            Some(other) => log::debug!("reconcile: ignoring malformed `{}` value {}", category, other),
            None => {}
        }
    }

    merged
}
