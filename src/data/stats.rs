use std::collections::BTreeSet;

use chrono::{Local, Months, NaiveDate};
use serde::Serialize;

use super::model::FleetRecord;
use super::parse::round_to;
use crate::config::{EXPIRY_HORIZON_MONTHS, STAT_DECIMALS};

// ---------------------------------------------------------------------------
// FleetStatistics
// ---------------------------------------------------------------------------

/// Scalar summary of a record set. Every field is defined for empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetStatistics {
    pub total_vehicles: usize,
    pub brand_count: usize,
    pub avg_monthly_fee: f64,
    pub min_monthly_fee: f64,
    pub max_monthly_fee: f64,
    pub avg_emissions: f64,
    pub min_emissions: f64,
    pub max_emissions: f64,
    pub expiring_contracts: usize,
}

/// Running min / max / mean over the values that were present.
#[derive(Debug, Default)]
struct Summary {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Summary {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.count += 1;
    }

    /// `(avg, min, max)`, rounded; all zero when nothing was pushed.
    fn finish(&self) -> (f64, f64, f64) {
        if self.count == 0 {
            return (0.0, 0.0, 0.0);
        }
        (
            round_to(self.sum / self.count as f64, STAT_DECIMALS),
            round_to(self.min, STAT_DECIMALS),
            round_to(self.max, STAT_DECIMALS),
        )
    }
}

/// Whether `expiry` falls in `[today, today + horizon)`, by calendar date.
pub(crate) fn expires_within_horizon(expiry: NaiveDate, today: NaiveDate) -> bool {
    let horizon_end = today
        .checked_add_months(Months::new(EXPIRY_HORIZON_MONTHS))
        .unwrap_or(NaiveDate::MAX);
    today <= expiry && expiry < horizon_end
}

/// Statistics relative to the local current date.
pub fn calculate_fleet_statistics<'a, I>(records: I) -> FleetStatistics
where
    I: IntoIterator<Item = &'a FleetRecord>,
{
    calculate_fleet_statistics_at(records, Local::now().date_naive())
}

/// Statistics with an explicit "today", for reproducible results.
///
/// Fees that are missing and emissions without a magnitude are left out of
/// their min/avg/max. Unparseable expiry dates never count as expiring.
pub fn calculate_fleet_statistics_at<'a, I>(records: I, today: NaiveDate) -> FleetStatistics
where
    I: IntoIterator<Item = &'a FleetRecord>,
{
    let mut total_vehicles = 0;
    let mut brands: BTreeSet<&str> = BTreeSet::new();
    let mut fees = Summary::default();
    let mut emissions = Summary::default();
    let mut expiring_contracts = 0;

    for record in records {
        total_vehicles += 1;

        let brand = record.marca.trim();
        if !brand.is_empty() {
            brands.insert(brand);
        }
        if let Some(fee) = record.canone_mensile.filter(|v| v.is_finite()) {
            fees.push(fee);
        }
        if let Some(magnitude) = record.emission_magnitude() {
            emissions.push(magnitude);
        }
        if let Some(expiry) = record.contract_expiry() {
            if expires_within_horizon(expiry.date(), today) {
                expiring_contracts += 1;
            }
        }
    }

    let (avg_monthly_fee, min_monthly_fee, max_monthly_fee) = fees.finish();
    let (avg_emissions, min_emissions, max_emissions) = emissions.finish();

    FleetStatistics {
        total_vehicles,
        brand_count: brands.len(),
        avg_monthly_fee,
        min_monthly_fee,
        max_monthly_fee,
        avg_emissions,
        min_emissions,
        max_emissions,
        expiring_contracts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn horizon_is_half_open() {
        let t = today();
        assert!(expires_within_horizon(t, t));
        assert!(expires_within_horizon(NaiveDate::from_ymd_opt(2027, 4, 17).unwrap(), t));
        assert!(!expires_within_horizon(NaiveDate::from_ymd_opt(2027, 4, 18).unwrap(), t));
        assert!(!expires_within_horizon(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(), t));
    }

    #[test]
    fn fees_are_rounded_to_cents() {
        let records: Vec<FleetRecord> = [100.0, 200.0, 200.005]
            .into_iter()
            .map(|fee| FleetRecord {
                canone_mensile: Some(fee),
                ..Default::default()
            })
            .collect();
        let stats = calculate_fleet_statistics_at(&records, today());
        assert_eq!(stats.avg_monthly_fee, 166.67);
        assert_eq!(stats.min_monthly_fee, 100.0);
        assert_eq!(stats.total_vehicles, 3);
    }

    #[test]
    fn brand_count_ignores_blank_and_trims() {
        let records: Vec<FleetRecord> = ["Fiat", " Fiat", "", "  ", "BMW"]
            .into_iter()
            .map(|marca| FleetRecord {
                marca: marca.to_string(),
                ..Default::default()
            })
            .collect();
        assert_eq!(calculate_fleet_statistics_at(&records, today()).brand_count, 2);
    }
}
