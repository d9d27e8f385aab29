// src/job_search/types.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One job posting as returned by a job-search backend.
///
/// Every field is optional: boards routinely omit salary, job type or the
/// description, and remote backends may send partial records. Decoding from
/// JSON is lenient so that a single odd field never rejects the listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub site: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_posted: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub min_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub max_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

impl JobListing {
    /// Decode a listing from an arbitrary JSON value.
    ///
    /// Returns `None` only when the value is not an object at all.
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_string))
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(coerce_amount))
}

fn coerce_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn coerce_amount(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_decode_as_none() {
        let listing: JobListing = serde_json::from_value(json!({ "id": "1" })).unwrap();
        assert_eq!(listing.id.as_deref(), Some("1"));
        assert_eq!(listing.currency, None);
        assert_eq!(listing.min_amount, None);
    }

    #[test]
    fn test_wrong_types_are_coerced() {
        let listing: JobListing = serde_json::from_value(json!({
            "id": 42,
            "site": "indeed",
            "title": true,
            "min_amount": "100,000",
            "max_amount": 120000,
            "currency": null,
            "description": ["a", "b"],
            "job_type": {"kind": "fulltime"}
        }))
        .unwrap();

        assert_eq!(listing.id.as_deref(), Some("42"));
        assert_eq!(listing.title.as_deref(), Some("true"));
        assert_eq!(listing.min_amount, Some(100000.0));
        assert_eq!(listing.max_amount, Some(120000.0));
        assert_eq!(listing.currency, None);
        assert_eq!(listing.description.as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(listing.job_type.as_deref(), Some(r#"{"kind":"fulltime"}"#));
    }

    #[test]
    fn test_unparseable_amount_becomes_none() {
        let listing = JobListing::from_value(json!({ "min_amount": "competitive" })).unwrap();
        assert_eq!(listing.min_amount, None);
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(JobListing::from_value(json!("not a listing")).is_none());
        assert!(JobListing::from_value(json!(null)).is_none());
    }
}
