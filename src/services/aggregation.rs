//! Summary statistics folded over a set of donations.
//!
//! Everything here is a pure function of its input. Callers pass donations
//! already scoped to the viewer's role and already sorted newest first by
//! the datastore; nothing in this module filters by role or sorts.

use std::collections::HashSet;

use chrono::Datelike;
use serde::Serialize;

use crate::models::donation::{Donation, DonationStatus};
use crate::services::impact;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Record counts per status.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub available: i64,
    pub collected: i64,
}

impl StatusCounts {
    pub fn get(&self, status: DonationStatus) -> i64 {
        match status {
            DonationStatus::Available => self.available,
            DonationStatus::Collected => self.collected,
        }
    }
}

/// Totals and derived impact for one donation set.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct DonationSummary {
    pub total_count: i64,
    pub total_quantity: f64,
    pub status_counts: StatusCounts,
    pub co2_reduced: f64,
    pub methane_reduced: f64,
    pub estimated_meals: i64,
    pub unique_donor_count: i64,
}

/// Value accumulated into each monthly bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMetric {
    Count,
    Quantity,
    Co2,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub value: f64,
}

pub fn total_quantity(donations: &[Donation]) -> f64 {
    donations.iter().map(|d| d.quantity).sum()
}

pub fn status_counts(donations: &[Donation]) -> StatusCounts {
    donations
        .iter()
        .fold(StatusCounts::default(), |mut counts, d| {
            match d.status {
                DonationStatus::Available => counts.available += 1,
                DonationStatus::Collected => counts.collected += 1,
            }
            counts
        })
}

pub fn unique_donor_count(donations: &[Donation]) -> i64 {
    donations
        .iter()
        .map(|d| d.donor_id)
        .collect::<HashSet<_>>()
        .len() as i64
}

/// Fold a donation set into its summary.
pub fn summarize(donations: &[Donation]) -> DonationSummary {
    let total_quantity = total_quantity(donations);
    let impact = impact::report(total_quantity);

    DonationSummary {
        total_count: donations.len() as i64,
        total_quantity,
        status_counts: status_counts(donations),
        co2_reduced: impact.co2_reduced_kg,
        methane_reduced: impact.methane_reduced_kg,
        estimated_meals: impact.estimated_meals,
        unique_donor_count: unique_donor_count(donations),
    }
}

/// Twelve calendar-month buckets keyed on `created_at` (UTC).
///
/// With `year = None` only the month index is used, so January of every year
/// lands in the same bucket. `Some(year)` restricts the series to that year.
pub fn monthly_series(
    donations: &[Donation],
    metric: SeriesMetric,
    year: Option<i32>,
) -> Vec<MonthlyPoint> {
    let mut buckets = [0.0_f64; 12];

    for d in donations
        .iter()
        .filter(|d| year.map_or(true, |y| d.created_at.year() == y))
    {
        let month = d.created_at.month0() as usize;
        buckets[month] += match metric {
            SeriesMetric::Count => 1.0,
            SeriesMetric::Quantity | SeriesMetric::Co2 => d.quantity,
        };
    }

    MONTH_LABELS
        .iter()
        .zip(buckets)
        .map(|(&month, value)| MonthlyPoint {
            month,
            value: match metric {
                SeriesMetric::Co2 => impact::report(value).co2_reduced_kg,
                _ => value,
            },
        })
        .collect()
}

/// Leading `n` records of an already sorted slice.
pub fn recent(donations: &[Donation], n: usize) -> &[Donation] {
    &donations[..n.min(donations.len())]
}
