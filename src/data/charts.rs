use std::collections::BTreeMap;

use chrono::{Datelike, Local, Months, NaiveDate};
use serde::Serialize;

use super::model::FleetRecord;
use crate::config::{
    Band, BEYOND_LABEL, EMISSION_BANDS, EXPIRED_LABEL, EXPIRY_CHART_MONTHS, FEE_BANDS,
    UNKNOWN_LABEL,
};

// ---------------------------------------------------------------------------
// Chart-ready series
// ---------------------------------------------------------------------------

/// One bar of a bar-style series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarBucket {
    pub bucket_label: String,
    pub count: usize,
}

/// One slice of a categorical (pie) series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: usize,
}

/// Every series shown on the dashboard, computed together from one record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub emissions_chart_data: Vec<BarBucket>,
    pub fee_chart_data: Vec<BarBucket>,
    pub contract_expiry_chart_data: Vec<BarBucket>,
    pub brand_chart_data: Vec<BarBucket>,
    pub noleggiatore_pie_data: Vec<PieSlice>,
    pub societa_pie_data: Vec<PieSlice>,
    pub alimentazione_pie_data: Vec<PieSlice>,
}

/// Chart data relative to the local current date.
pub fn generate_chart_data<'a, I>(records: I) -> ChartData
where
    I: IntoIterator<Item = &'a FleetRecord>,
{
    generate_chart_data_at(records, Local::now().date_naive())
}

/// Chart data with an explicit "today" for the contract expiry buckets.
pub fn generate_chart_data_at<'a, I>(records: I, today: NaiveDate) -> ChartData
where
    I: IntoIterator<Item = &'a FleetRecord>,
{
    let records: Vec<&FleetRecord> = records.into_iter().collect();

    let brands = category_counts(records.iter().map(|r| r.marca.as_str()));

    let emissions = records.iter().map(|r| r.emission_magnitude());
    let fees = records.iter().map(|r| r.canone_mensile);

    ChartData {
        emissions_chart_data: band_counts(emissions, &EMISSION_BANDS),
        fee_chart_data: band_counts(fees, &FEE_BANDS),
        contract_expiry_chart_data: expiry_counts(&records, today),
        brand_chart_data: brands
            .into_iter()
            .map(|(bucket_label, count)| BarBucket { bucket_label, count })
            .collect(),
        noleggiatore_pie_data: pie(records.iter().map(|r| r.noleggiatore.as_str())),
        societa_pie_data: pie(records.iter().map(|r| r.societa.as_str())),
        alimentazione_pie_data: pie(records.iter().map(|r| r.alimentazione.as_str())),
    }
}

// ---------------------------------------------------------------------------
// Bucketing helpers
// ---------------------------------------------------------------------------

/// Count values per band. All bands are emitted, in order, followed by the
/// `Unknown` band for missing values and values below the first band.
fn band_counts<I>(values: I, bands: &[Band]) -> Vec<BarBucket>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut counts = vec![0usize; bands.len()];
    let mut unknown = 0usize;

    for value in values {
        let slot = value
            .filter(|v| v.is_finite())
            .and_then(|v| bands.iter().position(|band| band.contains(v)));
        match slot {
            Some(i) => counts[i] += 1,
            None => unknown += 1,
        }
    }

    bands
        .iter()
        .zip(counts)
        .map(|(band, count)| BarBucket {
            bucket_label: band.label.to_string(),
            count,
        })
        .chain(std::iter::once(BarBucket {
            bucket_label: UNKNOWN_LABEL.to_string(),
            count: unknown,
        }))
        .collect()
}

/// First day of the month `offset` months after the month of `today`.
fn month_start(today: NaiveDate, offset: u32) -> Option<NaiveDate> {
    today.with_day(1)?.checked_add_months(Months::new(offset))
}

/// `Expired`, one bucket per calendar month starting with the current one,
/// `Beyond`, `Unknown`. The current month only holds dates from today on.
fn expiry_counts(records: &[&FleetRecord], today: NaiveDate) -> Vec<BarBucket> {
    let months = EXPIRY_CHART_MONTHS as usize;
    let mut monthly = vec![0usize; months];
    let (mut expired, mut beyond, mut unknown) = (0usize, 0usize, 0usize);

    for record in records {
        let Some(expiry) = record.contract_expiry().map(|dt| dt.date()) else {
            unknown += 1;
            continue;
        };
        if expiry < today {
            expired += 1;
            continue;
        }
        let offset =
            (expiry.year() - today.year()) * 12 + expiry.month() as i32 - today.month() as i32;
        match usize::try_from(offset) {
            Ok(i) if i < months => monthly[i] += 1,
            _ => beyond += 1,
        }
    }

    let mut buckets = Vec::with_capacity(months + 3);
    buckets.push(BarBucket {
        bucket_label: EXPIRED_LABEL.to_string(),
        count: expired,
    });
    for (i, count) in monthly.into_iter().enumerate() {
        // Months past the end of the representable calendar fold into Beyond.
        match month_start(today, i as u32) {
            Some(start) => buckets.push(BarBucket {
                bucket_label: start.format("%Y-%m").to_string(),
                count,
            }),
            None => beyond += count,
        }
    }
    buckets.push(BarBucket {
        bucket_label: BEYOND_LABEL.to_string(),
        count: beyond,
    });
    buckets.push(BarBucket {
        bucket_label: UNKNOWN_LABEL.to_string(),
        count: unknown,
    });
    buckets
}

/// Group by trimmed, case-preserving value. Real categories come sorted by
/// count (descending) then name. Blanks and values spelled `Unknown` (any
/// case) share the single `Unknown` group, listed last and only when present.
fn category_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    let mut unknown = 0usize;
    for value in values {
        let key = value.trim();
        if key.is_empty() || key.eq_ignore_ascii_case(UNKNOWN_LABEL) {
            unknown += 1;
        } else {
            *groups.entry(key).or_default() += 1;
        }
    }

    let mut counted: Vec<(String, usize)> = groups
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    // Stable sort keeps the BTreeMap's name order among equal counts.
    counted.sort_by(|a, b| b.1.cmp(&a.1));
    if unknown > 0 {
        counted.push((UNKNOWN_LABEL.to_string(), unknown));
    }
    counted
}

fn pie<'a, I>(values: I) -> Vec<PieSlice>
where
    I: IntoIterator<Item = &'a str>,
{
    category_counts(values)
        .into_iter()
        .map(|(name, value)| PieSlice { name, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(buckets: &[BarBucket]) -> Vec<&str> {
        buckets.iter().map(|b| b.bucket_label.as_str()).collect()
    }

    fn counts(buckets: &[BarBucket]) -> Vec<usize> {
        buckets.iter().map(|b| b.count).collect()
    }

    #[test]
    fn band_edges_are_half_open() {
        let values = [
            Some(0.0),
            Some(99.99),
            Some(100.0),
            Some(199.0),
            Some(200.0),
            Some(-5.0),
            None,
        ];
        let buckets = band_counts(values, &EMISSION_BANDS);
        assert_eq!(
            labels(&buckets),
            ["0-100", "100-130", "130-160", "160-200", "200+", "Unknown"]
        );
        assert_eq!(counts(&buckets), [2, 1, 0, 1, 1, 2]);
    }

    #[test]
    fn fee_bands_cover_common_contracts() {
        let values = [Some(299.0), Some(300.0), Some(850.0), Some(1000.0), Some(2500.0)];
        let buckets = band_counts(values, &FEE_BANDS);
        assert_eq!(
            labels(&buckets),
            ["0-300", "300-500", "500-750", "750-1000", "1000+", "Unknown"]
        );
        assert_eq!(counts(&buckets), [1, 1, 0, 1, 2, 0]);
    }

    #[test]
    fn expiry_buckets_by_calendar_month() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let records: Vec<FleetRecord> = [
            "2026-10-17", // expired
            "2026-10-18", // current month
            "2026-10-31",
            "2026-11-01",
            "2027-09-30", // last monthly bucket
            "2027-10-01", // beyond
            "garbage",
        ]
        .into_iter()
        .map(|d| FleetRecord {
            scadenza_contratto: d.to_string(),
            ..Default::default()
        })
        .collect();
        let refs: Vec<&FleetRecord> = records.iter().collect();
        let buckets = expiry_counts(&refs, today);

        assert_eq!(buckets.len(), 15);
        assert_eq!(buckets[0].bucket_label, "Expired");
        assert_eq!(buckets[1].bucket_label, "2026-10");
        assert_eq!(buckets[12].bucket_label, "2027-09");
        assert_eq!(buckets[13].bucket_label, "Beyond");
        assert_eq!(buckets[14].bucket_label, "Unknown");
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets[2].count, 1);
        assert_eq!(buckets[12].count, 1);
        assert_eq!(buckets[13].count, 1);
        assert_eq!(buckets[14].count, 1);
    }

    #[test]
    fn expiry_months_past_the_calendar_end_are_not_labelled() {
        let buckets = expiry_counts(&[], NaiveDate::MAX);
        // Only the current month is representable.
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].bucket_label, "Expired");
        assert_eq!(buckets[2].bucket_label, "Beyond");
        assert_eq!(buckets[3].bucket_label, "Unknown");
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn categories_sort_by_count_then_name_with_unknown_last() {
        let counted = category_counts(["Fiat", "BMW", " Fiat ", "", "Audi", "fiat"]);
        assert_eq!(
            counted,
            vec![
                ("Fiat".to_string(), 2),
                ("Audi".to_string(), 1),
                ("BMW".to_string(), 1),
                ("fiat".to_string(), 1),
                ("Unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn literal_unknown_joins_the_blank_group() {
        let counted = category_counts(["Unknown", "", "Fiat", "UNKNOWN "]);
        assert_eq!(
            counted,
            vec![("Fiat".to_string(), 1), ("Unknown".to_string(), 3)]
        );
    }

    #[test]
    fn no_unknown_slice_when_every_value_is_present() {
        let slices = pie(["Diesel", "Benzina", "Diesel"]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0], PieSlice { name: "Diesel".into(), value: 2 });
    }
}
