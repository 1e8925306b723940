//! Wire shape of a per-test result record.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! record is ignored. Every field is optional so a sparse record still
//! decodes, and defaults are applied when converting to a `TestOutcome`.

use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
pub struct RawTestCase {
    pub name: Option<String>,
    pub status: Option<String>,
    pub time: Option<RawTime>,
    #[serde(rename = "retriesCount")]
    pub retries_count: Option<u64>,
    pub flaky: Option<bool>,
    #[serde(rename = "testStage")]
    pub test_stage: Option<RawStage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawTime {
    #[serde(default, deserialize_with = "lenient_duration")]
    pub duration: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStage {
    pub attachments: Option<Vec<RawAttachment>>,
    pub steps: Option<Vec<RawStep>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStep {
    pub attachments: Option<Vec<RawAttachment>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAttachment {
    pub name: Option<String>,
    pub source: Option<String>,
}

/// Integer milliseconds. Non-negative floats are truncated; anything else
/// makes the record malformed.
fn lenient_duration<'de, D>(d: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Number> = Option::deserialize(d)?;
    let Some(num) = raw else {
        return Ok(None);
    };
    if let Some(ms) = num.as_u64() {
        return Ok(Some(ms));
    }
    match num.as_f64() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(Some(ms.trunc() as u64)),
        _ => Err(de::Error::custom(format!(
            "duration must be a non-negative number, got: {num}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_record_decodes() {
        let raw: RawTestCase = serde_json::from_str("{}").unwrap();
        assert!(raw.name.is_none());
        assert!(raw.time.is_none());
        assert!(raw.test_stage.is_none());
    }

    #[test]
    fn duration_accepts_integers_and_floats() {
        let t: RawTime = serde_json::from_str(r#"{"duration": 1520}"#).unwrap();
        assert_eq!(t.duration, Some(1520));

        let t: RawTime = serde_json::from_str(r#"{"duration": 12.9}"#).unwrap();
        assert_eq!(t.duration, Some(12));

        let t: RawTime = serde_json::from_str(r#"{"duration": null}"#).unwrap();
        assert_eq!(t.duration, None);

        let t: RawTime = serde_json::from_str(r#"{"start": 1}"#).unwrap();
        assert_eq!(t.duration, None);
    }

    #[test]
    fn duration_rejects_negative_and_text() {
        assert!(serde_json::from_str::<RawTime>(r#"{"duration": -5}"#).is_err());
        assert!(serde_json::from_str::<RawTime>(r#"{"duration": "10ms"}"#).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let raw: RawTestCase = serde_json::from_str(
            r#"{"uuid":"x","name":"t","labels":[{"name":"suite","value":"s"}],
                "testStage":{"status":"passed","attachments":[{"name":"log","source":"a.txt","type":"text/plain"}]}}"#,
        )
        .unwrap();
        let stage = raw.test_stage.unwrap();
        assert_eq!(stage.attachments.unwrap()[0].source.as_deref(), Some("a.txt"));
    }
}
