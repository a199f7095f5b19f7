//! Narrative analysis of recent entries: prompt assembly for the model,
//! splitting its reply into display blocks, and the rule-based summary used
//! whenever the model is unavailable.

use crate::models::WeightRecord;
use crate::progress::round1;
use crate::records::newest_first;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries considered for analysis, newest first.
pub const ANALYSIS_WINDOW: usize = 7;
/// Below this many entries the model is not asked at all.
pub const MIN_ANALYSIS_RECORDS: usize = 2;
const MIN_TREND_RECORDS: usize = 3;
const TREND_THRESHOLD_KG: f64 = 0.5;

pub const SYSTEM_PROMPT: &str = "You are a friendly nutrition and fitness coach. \
Give practical, evidence-based advice in plain language.";

pub fn recent_records(records: &[WeightRecord]) -> Vec<WeightRecord> {
    newest_first(records, ANALYSIS_WINDOW)
}

pub fn has_enough_records(recent: &[WeightRecord]) -> bool {
    recent.len() >= MIN_ANALYSIS_RECORDS
}

pub fn build_prompt(recent: &[WeightRecord]) -> String {
    let mut prompt = String::from(
        "Please analyse the following health log and give diet and exercise advice:\n\n",
    );

    for record in recent {
        prompt.push_str(&format!("Date: {}\n", record.date));
        prompt.push_str(&format!("Weight: {} kg\n", record.weight));
        prompt.push_str(&format!("Exercise: {}\n", note_or_none(record.exercise.as_deref())));
        prompt.push_str(&format!("Diet: {}\n\n", note_or_none(record.diet.as_deref())));
    }

    prompt.push_str("Cover the following:\n");
    prompt.push_str("1. Diet pattern and how to improve it\n");
    prompt.push_str("2. Exercise habits and how to improve them\n");
    prompt.push_str("3. How the weight trend relates to diet and exercise\n");
    prompt.push_str("4. Personal health advice\n\n");
    prompt.push_str("Be thorough but easy to follow. ");
    prompt.push_str("Give the analysis directly without showing your reasoning.");
    prompt
}

fn note_or_none(note: Option<&str>) -> &str {
    match note.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => "none",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum Block {
    Heading(String),
    Paragraph(String),
    List(Vec<String>),
}

/// Splits model output on blank lines. Numbered paragraphs become headings,
/// paragraphs made only of `-`/`*` bullets become lists.
pub fn split_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(classify(&current));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(classify(&current));
    }
    blocks
}

fn classify(lines: &[&str]) -> Block {
    if is_numbered_heading(lines[0]) {
        return Block::Heading(lines.join("\n"));
    }

    let items: Option<Vec<String>> = lines.iter().map(|line| bullet_text(line)).collect();
    match items {
        Some(items) => Block::List(items),
        None => Block::Paragraph(lines.join("\n")),
    }
}

fn is_numbered_heading(line: &str) -> bool {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let rest = &line[digits..];
    let Some(rest) = rest.strip_prefix('.') else {
        return false;
    };
    let body = rest.trim_start();
    body.len() < rest.len() && !body.is_empty()
}

fn bullet_text(line: &str) -> Option<String> {
    let line = line.trim();
    let rest = line.strip_prefix('-').or_else(|| line.strip_prefix('*'))?;
    let body = rest.trim_start();
    (body.len() < rest.len() && !body.is_empty()).then(|| body.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum WeightTrend {
    Unknown,
    Falling { kg: f64 },
    Rising { kg: f64 },
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub records_considered: usize,
    pub exercise_rate: u32,
    pub exercise_note: String,
    pub diet_rate: u32,
    pub diet_note: String,
    pub trend: WeightTrend,
    pub trend_note: String,
    pub suggestions: Vec<String>,
}

/// Rule-based summary of the newest [`ANALYSIS_WINDOW`] entries.
pub fn summarize(records: &[WeightRecord]) -> HealthSummary {
    let recent = recent_records(records);
    let exercise_rate = rate(&recent, WeightRecord::has_exercise);
    let diet_rate = rate(&recent, WeightRecord::has_diet);

    let exercise_note = match exercise_rate {
        80.. => "Excellent exercise habit, keep it up!",
        50.. => "Good exercise habit, try to go a little more often.",
        30.. => "Exercise is on the low side, consider adding more sessions.",
        _ => "More exercise would help your health.",
    };
    let diet_note = match diet_rate {
        80.. => "Very consistent diet logging, great for managing your health.",
        50.. => "Good diet logging habit, keep going.",
        30.. => "Diet logging is sparse, try to record more often.",
        _ => "Try to log your meals more regularly.",
    };

    let trend = weight_trend(&recent);
    let trend_note = match &trend {
        WeightTrend::Unknown => "No clear trend yet.".to_string(),
        WeightTrend::Stable => "Your weight has been stable recently.".to_string(),
        WeightTrend::Falling { kg } => {
            let mut note = format!("Your weight is trending down, {kg:.1} kg lost recently");
            if exercise_rate > 50 {
                note.push_str(", likely helped by regular exercise");
            }
            if diet_rate > 50 {
                note.push_str(", and your healthy eating habits are paying off");
            }
            note.push('.');
            note
        }
        WeightTrend::Rising { kg } => {
            let mut note = format!("Your weight is trending up, {kg:.1} kg gained recently");
            if exercise_rate < 30 {
                note.push_str(", possibly due to little exercise");
            }
            if diet_rate < 30 {
                note.push_str(", so pay closer attention to your diet");
            }
            note.push('.');
            note
        }
    };

    let mut suggestions = Vec::new();
    if exercise_rate < 50 {
        suggestions.push(
            "Try to exercise more often: at least 30 minutes of moderate activity a day."
                .to_string(),
        );
    }
    if diet_rate < 50 {
        suggestions.push(
            "Logging meals regularly helps reveal eating patterns; aim to log daily.".to_string(),
        );
    }
    suggestions.push("Drink enough water, at least 1.5 to 2 litres a day.".to_string());
    suggestions.push("Get enough sleep, 7 to 8 hours a night.".to_string());
    if recent.len() < MIN_TREND_RECORDS {
        suggestions.push(
            "Keep logging for at least a week in a row for a more accurate analysis.".to_string(),
        );
    }

    HealthSummary {
        records_considered: recent.len(),
        exercise_rate,
        exercise_note: exercise_note.to_string(),
        diet_rate,
        diet_note: diet_note.to_string(),
        trend,
        trend_note,
        suggestions,
    }
}

fn rate(recent: &[WeightRecord], logged: impl Fn(&WeightRecord) -> bool) -> u32 {
    if recent.is_empty() {
        return 0;
    }
    let count = recent.iter().filter(|record| logged(record)).count();
    (count as f64 / recent.len() as f64 * 100.0).round() as u32
}

fn weight_trend(recent: &[WeightRecord]) -> WeightTrend {
    if recent.len() < MIN_TREND_RECORDS {
        return WeightTrend::Unknown;
    }
    let (Some(newest), Some(oldest)) = (
        recent.first().and_then(WeightRecord::weight_kg),
        recent.last().and_then(WeightRecord::weight_kg),
    ) else {
        return WeightTrend::Unknown;
    };

    let diff = newest - oldest;
    if diff < -TREND_THRESHOLD_KG {
        WeightTrend::Falling { kg: round1(-diff) }
    } else if diff > TREND_THRESHOLD_KG {
        WeightTrend::Rising { kg: round1(diff) }
    } else {
        WeightTrend::Stable
    }
}

/// Body of `POST /api/model-analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum AnalysisResponse {
    Model {
        date: String,
        analysis: String,
        blocks: Vec<Block>,
        timestamp: DateTime<Utc>,
    },
    Cached {
        date: String,
        analysis: String,
        blocks: Vec<Block>,
        timestamp: DateTime<Utc>,
    },
    Fallback {
        note: String,
        summary: HealthSummary,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, weight: &str, exercise: &str, diet: &str) -> WeightRecord {
        let note = |text: &str| (!text.is_empty()).then(|| text.to_string());
        WeightRecord {
            date: date.to_string(),
            weight: weight.to_string(),
            exercise: note(exercise),
            diet: note(diet),
        }
    }

    #[test]
    fn prompt_lists_newest_first_with_placeholders() {
        let records = [
            record("2024-01-01", "80.0", "run", ""),
            record("2024-01-02", "79.8", "", "  "),
        ];
        let prompt = build_prompt(&recent_records(&records));

        let newest = prompt.find("Date: 2024-01-02").unwrap();
        let oldest = prompt.find("Date: 2024-01-01").unwrap();
        assert!(newest < oldest);
        assert!(prompt.contains("Exercise: run\n"));
        assert!(prompt.contains("Diet: none\n"));
        assert!(prompt.contains("4. Personal health advice"));
    }

    #[test]
    fn guard_needs_two_records() {
        let one = recent_records(&[record("2024-01-01", "80.0", "", "")]);
        assert!(!has_enough_records(&one));
        let two = recent_records(&[
            record("2024-01-01", "80.0", "", ""),
            record("2024-01-02", "80.0", "", ""),
        ]);
        assert!(has_enough_records(&two));
    }

    #[test]
    fn splits_headings_lists_and_paragraphs() {
        let text = "Overall you are doing well.\n\n1. Diet\nMore vegetables.\n\n\
                    - drink water\n* sleep early\n\n\n-not a bullet\nplain";
        let blocks = split_blocks(text);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("Overall you are doing well.".to_string()),
                Block::Heading("1. Diet\nMore vegetables.".to_string()),
                Block::List(vec!["drink water".to_string(), "sleep early".to_string()]),
                Block::Paragraph("-not a bullet\nplain".to_string()),
            ]
        );
    }

    #[test]
    fn numbered_heading_needs_text_after_marker() {
        assert!(is_numbered_heading("12. Exercise"));
        assert!(!is_numbered_heading("12."));
        assert!(!is_numbered_heading("12.5 kg lost"));
        assert!(!is_numbered_heading("Step 1. go"));
    }

    #[test]
    fn summary_rates_and_falling_trend() {
        let records = [
            record("2024-01-01", "82.0", "run", "salad"),
            record("2024-01-02", "81.5", "swim", "soup"),
            record("2024-01-03", "81.0", "", "rice"),
            record("2024-01-04", "80.9", "gym", ""),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.records_considered, 4);
        assert_eq!(summary.exercise_rate, 75);
        assert_eq!(summary.diet_rate, 75);
        assert_eq!(summary.trend, WeightTrend::Falling { kg: 1.1 });
        assert!(summary.trend_note.contains("regular exercise"));
        assert_eq!(summary.suggestions.len(), 2);
    }

    #[test]
    fn summary_rising_trend_blames_missing_habits() {
        let records = [
            record("2024-01-01", "80.0", "", ""),
            record("2024-01-02", "80.4", "", ""),
            record("2024-01-03", "81.0", "", ""),
        ];
        let summary = summarize(&records);

        assert_eq!(summary.trend, WeightTrend::Rising { kg: 1.0 });
        assert!(summary.trend_note.contains("little exercise"));
        assert_eq!(summary.exercise_rate, 0);
        assert_eq!(summary.suggestions.len(), 4);
    }

    #[test]
    fn summary_window_is_last_seven() {
        let mut records: Vec<_> = (1..=9)
            .map(|day| record(&format!("2024-01-0{day}"), "80.0", "", ""))
            .collect();
        records[0].exercise = Some("old run".to_string());
        let summary = summarize(&records);

        assert_eq!(summary.records_considered, 7);
        assert_eq!(summary.exercise_rate, 0);
        assert_eq!(summary.trend, WeightTrend::Stable);
    }

    #[test]
    fn short_history_has_unknown_trend() {
        let summary = summarize(&[record("2024-01-01", "80.0", "walk", "")]);
        assert_eq!(summary.trend, WeightTrend::Unknown);
        assert_eq!(summary.exercise_rate, 100);
        assert!(
            summary
                .suggestions
                .iter()
                .any(|s| s.starts_with("Keep logging"))
        );
    }
}
