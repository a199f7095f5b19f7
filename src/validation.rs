use crate::models::{AnalysisRecord, AnalysisRequest, EntryRequest, WeightRecord};
use crate::records::canonical_date;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: date and weight")]
    MissingEntryFields,
    #[error("Invalid weight value")]
    InvalidWeight,
    #[error("Invalid date value, expected YYYY-MM-DD")]
    InvalidDate,
    #[error("Missing required fields: date and analysis")]
    MissingAnalysisFields,
}

pub fn validate_entry(request: EntryRequest) -> Result<WeightRecord, ValidationError> {
    let date = required_text(request.date).ok_or(ValidationError::MissingEntryFields)?;
    let weight = request
        .weight
        .filter(|value| !is_blank(value))
        .ok_or(ValidationError::MissingEntryFields)?;

    let weight = parse_weight(&weight).ok_or(ValidationError::InvalidWeight)?;
    if canonical_date(&date).is_none() {
        return Err(ValidationError::InvalidDate);
    }

    Ok(WeightRecord {
        date,
        weight: format_weight(weight),
        exercise: request.exercise,
        diet: request.diet,
    })
}

pub fn validate_analysis(
    request: AnalysisRequest,
    now: DateTime<Utc>,
) -> Result<AnalysisRecord, ValidationError> {
    let date = required_text(request.date).ok_or(ValidationError::MissingAnalysisFields)?;
    let analysis = required_text(request.analysis).ok_or(ValidationError::MissingAnalysisFields)?;
    if canonical_date(&date).is_none() {
        return Err(ValidationError::InvalidDate);
    }

    Ok(AnalysisRecord {
        date,
        analysis,
        timestamp: request.timestamp.unwrap_or(now),
    })
}

pub fn format_weight(weight: f64) -> String {
    format!("{weight:.1}")
}

/// Positive, finite weight from a JSON number or numeric string.
fn parse_weight(value: &Value) -> Option<f64> {
    let weight = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (weight.is_finite() && weight > 0.0).then_some(weight)
}

fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}
