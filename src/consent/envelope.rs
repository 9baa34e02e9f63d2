//! The persisted consent envelope and its codec.
//!
//! Wire format (compact JSON, stored as the consent cookie's value):
//!
//! ```text
//! {"version":1,"date":"2024-01-01T00:00:00.000Z","settings":{"essential":true,"analytics":false,"marketing":false,"preferences":false}}
//! ```
//!
//! Decoding is lenient below the top level: the envelope must be a JSON object, but a
//! missing/odd `version`, an unparseable `date`, or malformed `settings` fields only
//! fall back to defaults (see [`reconcile`](crate::consent::reconcile)).

use crate::consent::{reconcile, PreferenceRecord};
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Envelope schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// A consent decision as written to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedEnvelope {
    pub version: u32,
    /// Time of the decision, millisecond precision, UTC.
    #[serde(rename = "date", with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    pub settings: PreferenceRecord,
}

impl PersistedEnvelope {
    pub fn new(version: u32, settings: PreferenceRecord, saved_at: OffsetDateTime) -> Self {
        let saved_at = saved_at.to_offset(time::UtcOffset::UTC);
        let saved_at = saved_at.replace_millisecond(saved_at.millisecond()).unwrap_or(saved_at);
        Self {
            version,
            saved_at,
            settings,
        }
    }

    /// Serializes the envelope to its compact JSON storage string.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why a stored envelope could not be read at all.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("envelope is empty")]
    Empty,

    #[error("envelope is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("envelope is not a JSON object")]
    NotAnObject,
}

/// An envelope as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEnvelope {
    /// `None` when absent or not a non-negative integer.
    pub version: Option<u64>,
    /// `None` when absent or not an ISO-8601 / RFC 3339 timestamp.
    pub saved_at: Option<OffsetDateTime>,
    pub settings: PreferenceRecord,
}

/// Decodes `text`, reconciling its settings over `base`.
pub fn decode_envelope_over(text: &str, base: PreferenceRecord) -> Result<DecodedEnvelope, DecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }

    let value: Value = serde_json::from_str(text)?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let version = object.get("version").and_then(Value::as_u64);
    if let Some(v) = version.filter(|v| *v > u64::from(SCHEMA_VERSION)) {
        log::debug!("decode: envelope version {} is newer than {}, reading known fields only", v, SCHEMA_VERSION);
    }

    let saved_at = object
        .get("date")
        .and_then(Value::as_str)
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok());

    Ok(DecodedEnvelope {
        version,
        saved_at,
        settings: reconcile(base, object.get("settings")),
    })
}

/// Decodes `text` over the default record.
pub fn decode_envelope(text: &str) -> Result<DecodedEnvelope, DecodeError> {
    decode_envelope_over(text, PreferenceRecord::default())
}

/// Decodes just the preference record from `text`.
pub fn decode(text: &str) -> Result<PreferenceRecord, DecodeError> {
    decode_envelope(text).map(|envelope| envelope.settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const SCENARIO_ENVELOPE: &str = r#"{"version":1,"date":"2024-01-01T00:00:00Z","settings":{"essential":true,"analytics":true,"marketing":false,"preferences":false}}"#;

    #[test]
    fn encode_matches_wire_format() {
        let envelope = PersistedEnvelope::new(1, PreferenceRecord::default(), datetime!(2024-01-01 00:00 UTC));
        assert_eq!(
            envelope.encode().unwrap(),
            r#"{"version":1,"date":"2024-01-01T00:00:00Z","settings":{"essential":true,"analytics":false,"marketing":false,"preferences":false}}"#
        );
    }

    #[test]
    fn saved_at_is_truncated_to_millis_in_utc() {
        let envelope = PersistedEnvelope::new(
            1,
            PreferenceRecord::default(),
            datetime!(2024-01-01 01:00:00.123456789 +01:00),
        );
        assert_eq!(envelope.saved_at, datetime!(2024-01-01 00:00:00.123 UTC));
        assert!(envelope.encode().unwrap().contains(r#""date":"2024-01-01T00:00:00.123Z""#));
    }

    #[test]
    fn round_trip_every_record() {
        for bits in 0..8u8 {
            let record = PreferenceRecord::new(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let text = PersistedEnvelope::new(1, record, OffsetDateTime::now_utc()).encode().unwrap();
            assert_eq!(decode(&text).unwrap(), record);
        }
    }

    #[test]
    fn decode_reads_version_and_date() {
        let decoded = decode_envelope(SCENARIO_ENVELOPE).unwrap();
        assert_eq!(decoded.version, Some(1));
        assert_eq!(decoded.saved_at, Some(datetime!(2024-01-01 00:00 UTC)));
        assert_eq!(decoded.settings, PreferenceRecord::new(true, false, false));
    }

    #[test]
    fn decode_accepts_javascript_iso_strings() {
        let text = r#"{"version":1,"date":"2024-05-06T07:08:09.010Z","settings":{"analytics":true}}"#;
        let decoded = decode_envelope(text).unwrap();
        assert_eq!(decoded.saved_at, Some(datetime!(2024-05-06 07:08:09.010 UTC)));
    }

    #[test]
    fn decode_is_lenient_below_top_level() {
        let decoded = decode_envelope(r#"{"date":"last tuesday","settings":{"marketing":true}}"#).unwrap();
        assert_eq!(decoded.version, None);
        assert_eq!(decoded.saved_at, None);
        assert_eq!(decoded.settings, PreferenceRecord::new(false, true, false));

        let decoded = decode_envelope(r#"{"version":1}"#).unwrap();
        assert_eq!(decoded.settings, PreferenceRecord::default());
    }

    #[test]
    fn decode_rejects_unreadable_envelopes() {
        assert!(matches!(decode(""), Err(DecodeError::Empty)));
        assert!(matches!(decode("   "), Err(DecodeError::Empty)));
        assert!(matches!(decode("{\"version\":1,"), Err(DecodeError::Json(_))));
        assert!(matches!(decode("not json"), Err(DecodeError::Json(_))));
        assert!(matches!(decode("[1,2]"), Err(DecodeError::NotAnObject)));
        assert!(matches!(decode("true"), Err(DecodeError::NotAnObject)));
    }

    #[test]
    fn decode_over_uses_base_for_missing_fields() {
        let base = PreferenceRecord::new(false, false, true);
        let decoded = decode_envelope_over(r#"{"settings":{"analytics":true}}"#, base).unwrap();
        assert_eq!(decoded.settings, PreferenceRecord::new(true, false, true));
    }
}
