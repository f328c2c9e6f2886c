use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::Result;

pub const DEFAULT_WINDOW_WEEKS: usize = 6;

/// One week's slice of a spending report.
///
/// `week_end` is exclusive: the bucket covers `[week_start, week_end)`, so a
/// transaction dated exactly at `week_end` is counted in the following
/// bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySpending {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total: Decimal,
}

/// Boundaries of the `window_weeks` consecutive buckets ending at the bucket
/// containing `as_of`, oldest first.
///
/// Weeks are anchored to Monday (ISO 8601), so the same `as_of` always
/// yields the same boundaries and historical totals never shift between
/// calls. Pure calculation; the store is not consulted.
pub fn week_buckets(as_of: DateTime<Utc>, window_weeks: usize) -> Vec<(NaiveDate, NaiveDate)> {
    let newest_start = week_start_of(as_of.date_naive());
    (0..window_weeks)
        .rev()
        .map(|weeks_back| {
            let start = newest_start - Duration::weeks(weeks_back as i64);
            (start, start + Duration::days(7))
        })
        .collect()
}

/// Monday on or before the given date.
fn week_start_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Sums a user's transaction amounts into weekly buckets.
///
/// Always returns exactly `window_weeks` entries, oldest first; weeks with
/// no transactions report a zero total rather than being omitted, so callers
/// charting the report can rely on fixed-length output. Amounts accumulate
/// in `Decimal`, so totals are exact and reproducible across calls.
///
/// One ranged store query covers the whole window; each transaction is then
/// assigned to its bucket by UTC calendar date. A store failure is returned
/// as the storage error; an empty store is not a failure.
pub fn weekly_spending(
    db: &Database,
    user_id: i64,
    as_of: DateTime<Utc>,
    window_weeks: usize,
) -> Result<Vec<WeeklySpending>> {
    let buckets = week_buckets(as_of, window_weeks);
    let mut totals = vec![Decimal::ZERO; buckets.len()];

    if let (Some(&(window_start, _)), Some(&(_, window_end))) = (buckets.first(), buckets.last()) {
        let range = (midnight_utc(window_start), midnight_utc(window_end));
        let window_days = 7 * buckets.len() as i64;
        for txn in db.get_transactions(user_id, None, Some(range))? {
            // The stored-text range comparison and the UTC calendar date can
            // disagree for a row written with a non-UTC offset, so the offset
            // may fall just outside the window. Such rows are skipped, not
            // indexed.
            let offset_days = txn
                .transaction_date
                .date_naive()
                .signed_duration_since(window_start)
                .num_days();
            if (0..window_days).contains(&offset_days) {
                totals[(offset_days / 7) as usize] += txn.amount;
            }
        }
    }

    Ok(buckets
        .into_iter()
        .zip(totals)
        .map(|((week_start, week_end), total)| WeeklySpending {
            week_start,
            week_end,
            total,
        })
        .collect())
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
