use crate::models::WeightRecord;
use crate::records::newest_first;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Initial,
    Down,
    Up,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Above,
    Below,
    Reached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub date: String,
    pub current_weight: f64,
    pub previous_weight: Option<f64>,
    pub change: Option<f64>,
    pub direction: Direction,
    pub target_weight: f64,
    pub to_target: f64,
    pub target_status: TargetStatus,
}

/// Latest weight against the previous entry and the target. `None` when
/// there is no record with a readable weight.
pub fn build_progress(records: &[WeightRecord], target_weight: f64) -> Option<Progress> {
    let mut weighed = newest_first(records, records.len())
        .into_iter()
        .filter_map(|record| record.weight_kg().map(|kg| (record.date, kg)));

    let (date, current) = weighed.next()?;
    let previous = weighed.next().map(|(_, kg)| kg);

    let change = previous.map(|prev| round1(current - prev));
    let direction = match change {
        None => Direction::Initial,
        Some(delta) if delta < 0.0 => Direction::Down,
        Some(delta) if delta > 0.0 => Direction::Up,
        Some(_) => Direction::Flat,
    };

    let gap = round1(current - target_weight);
    let target_status = if gap > 0.0 {
        TargetStatus::Above
    } else if gap < 0.0 {
        TargetStatus::Below
    } else {
        TargetStatus::Reached
    };

    Some(Progress {
        date,
        current_weight: current,
        previous_weight: previous,
        change,
        direction,
        target_weight,
        to_target: gap.abs(),
        target_status,
    })
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, weight: &str) -> WeightRecord {
        WeightRecord {
            date: date.to_string(),
            weight: weight.to_string(),
            exercise: None,
            diet: None,
        }
    }

    #[test]
    fn empty_history_has_no_progress() {
        assert_eq!(build_progress(&[], 75.0), None);
    }

    #[test]
    fn single_record_is_initial() {
        let progress = build_progress(&[record("2024-01-01", "80.0")], 75.0).unwrap();
        assert_eq!(progress.direction, Direction::Initial);
        assert_eq!(progress.change, None);
        assert_eq!(progress.to_target, 5.0);
        assert_eq!(progress.target_status, TargetStatus::Above);
    }

    #[test]
    fn compares_latest_two_by_date() {
        let records = [
            record("2024-01-03", "79.4"),
            record("2024-01-01", "81.0"),
            record("2024-01-02", "80.0"),
        ];
        let progress = build_progress(&records, 80.0).unwrap();
        assert_eq!(progress.date, "2024-01-03");
        assert_eq!(progress.previous_weight, Some(80.0));
        assert_eq!(progress.change, Some(-0.6));
        assert_eq!(progress.direction, Direction::Down);
        assert_eq!(progress.target_status, TargetStatus::Below);
        assert_eq!(progress.to_target, 0.6);
    }

    #[test]
    fn equal_weights_are_flat_and_target_reached() {
        let records = [record("2024-01-01", "75.0"), record("2024-01-02", "75.0")];
        let progress = build_progress(&records, 75.0).unwrap();
        assert_eq!(progress.direction, Direction::Flat);
        assert_eq!(progress.target_status, TargetStatus::Reached);
    }
}
