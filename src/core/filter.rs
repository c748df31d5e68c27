use crate::models::punch::RawPunchRecord;
use chrono::NaiveDate;

/// Drop records dated before `cutoff`, keeping the original order.
/// No cutoff → every record passes.
pub fn filter_by_cutoff(records: Vec<RawPunchRecord>, cutoff: Option<NaiveDate>) -> Vec<RawPunchRecord> {
    match cutoff {
        Some(day) => records
            .into_iter()
            .filter(|r| r.timestamp.date() >= day)
            .collect(),
        None => records,
    }
}
