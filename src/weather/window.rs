//! Forecast window selection
//!
//! Picks the subset of hourly samples relevant to a prediction target:
//! samples on the explicit target dates when the question named any,
//! otherwise samples inside [now, now + lookahead]. An empty selection is a
//! valid outcome, not an error.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Select the values whose timestamps match the target dates (UTC), or fall
/// inside the lookahead window when no explicit dates exist
pub fn select_window(
    timestamps: &[DateTime<Utc>],
    values: &[f64],
    target_dates: Option<&[NaiveDate]>,
    now: DateTime<Utc>,
    lookahead_hours: i64,
) -> Vec<f64> {
    if let Some(dates) = target_dates {
        return timestamps
            .iter()
            .zip(values.iter())
            .filter(|(ts, _)| dates.contains(&ts.date_naive()))
            .map(|(_, v)| *v)
            .collect();
    }

    let horizon = now + Duration::hours(lookahead_hours);
    timestamps
        .iter()
        .zip(values.iter())
        .filter(|(ts, _)| **ts >= now && **ts <= horizon)
        .map(|(_, v)| *v)
        .collect()
}
