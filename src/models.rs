use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One day's weight entry. `date` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    pub date: String,
    #[serde(deserialize_with = "weight_string")]
    pub weight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
}

impl WeightRecord {
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight.trim().parse::<f64>().ok().filter(|w| w.is_finite())
    }

    pub fn has_exercise(&self) -> bool {
        has_text(self.exercise.as_deref())
    }

    pub fn has_diet(&self) -> bool {
        has_text(self.diet.as_deref())
    }
}

/// A cached model narrative for the record dated `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub date: String,
    pub analysis: String,
    pub timestamp: DateTime<Utc>,
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.trim().is_empty())
}

// Older clients stored the weight as a bare JSON number.
fn weight_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => number
            .as_f64()
            .map(|w| format!("{w:.1}"))
            .ok_or_else(|| serde::de::Error::custom("weight is not a finite number")),
        other => Err(serde::de::Error::custom(format!(
            "weight must be a string or number, got {other}"
        ))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryRequest {
    pub date: Option<String>,
    pub weight: Option<Value>,
    pub exercise: Option<String>,
    pub diet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisRequest {
    pub date: Option<String>,
    pub analysis: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModelAnalysisRequest {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedResponse<T> {
    pub message: String,
    pub entry: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_numeric_weight_is_normalized() {
        let record: WeightRecord =
            serde_json::from_str(r#"{"date":"2024-01-01","weight":80,"exercise":""}"#).unwrap();
        assert_eq!(record.weight, "80.0");
        assert_eq!(record.exercise.as_deref(), Some(""));
        assert!(!record.has_exercise());
        assert_eq!(record.weight_kg(), Some(80.0));
    }

    #[test]
    fn absent_notes_are_not_serialized() {
        let record = WeightRecord {
            date: "2024-01-01".to_string(),
            weight: "79.5".to_string(),
            exercise: None,
            diet: Some("salad".to_string()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "date": "2024-01-01", "weight": "79.5", "diet": "salad" })
        );
    }

    #[test]
    fn boolean_weight_is_rejected() {
        let result =
            serde_json::from_str::<WeightRecord>(r#"{"date":"2024-01-01","weight":true}"#);
        assert!(result.is_err());
    }
}
