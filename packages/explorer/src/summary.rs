//! Display helpers: month labels and per-region series summaries.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use crime_explorer_models::{Period, PeriodCount, SeriesSummary};

/// Number of periods highlighted in the pinned panel.
pub const TOP_PERIODS: usize = 3;

/// Formats a period as a short British month label, e.g. `"Jan 2024"`.
///
/// September is abbreviated `"Sept"`, following the `en-GB` locale. Keys
/// that are not a real calendar month are returned unchanged.
#[must_use]
pub fn format_period(period: &Period) -> String {
    let date = period
        .year()
        .parse::<i32>()
        .ok()
        .zip(period.month().parse::<u32>().ok())
        .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1));

    date.map_or_else(
        || period.as_str().to_string(),
        |date| {
            if date.month() == 9 {
                format!("Sept {}", date.year())
            } else {
                date.format("%b %Y").to_string()
            }
        },
    )
}

/// Summarizes a monthly series for the pinned detail panel.
#[must_use]
pub fn summarize_series(series: &BTreeMap<Period, u64>) -> SeriesSummary {
    let periods = series.len();
    let total = series.values().fold(0_u64, |acc, n| acc.saturating_add(*n));
    let average = rounded_average(total, periods);

    // BTreeMap iterates chronologically, so the first maximum is the earliest.
    let peak = series
        .iter()
        .fold(None::<(&Period, u64)>, |best, (period, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((period, count)),
        })
        .map(|(period, count)| PeriodCount {
            period: period.clone(),
            count,
        });

    let mut ranked: Vec<(&Period, u64)> = series.iter().map(|(p, c)| (p, *c)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let top_periods = ranked
        .into_iter()
        .take(TOP_PERIODS)
        .map(|(p, _)| p.clone())
        .collect();

    SeriesSummary {
        periods,
        total,
        average,
        peak,
        top_periods,
    }
}

fn rounded_average(total: u64, count: usize) -> u64 {
    let count = count as u64;
    if count == 0 {
        return 0;
    }
    total.saturating_add(count / 2) / count
}
