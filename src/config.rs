/// Contracts expiring within this many months from today count as "expiring".
pub const EXPIRY_HORIZON_MONTHS: u32 = 6;

/// Number of calendar-month buckets in the contract expiry chart.
pub const EXPIRY_CHART_MONTHS: u32 = 12;

/// Label used for empty categories and values that could not be parsed.
pub const UNKNOWN_LABEL: &str = "Unknown";

pub const EXPIRED_LABEL: &str = "Expired";
pub const BEYOND_LABEL: &str = "Beyond";

/// Decimal places kept in statistics (currency precision).
pub const STAT_DECIMALS: i32 = 2;

/// A half-open numeric band `[lower, upper)`. `upper == None` is open-ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub label: &'static str,
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Band {
    const fn new(label: &'static str, lower: f64, upper: Option<f64>) -> Self {
        Band { label, lower, upper }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && self.upper.map_or(true, |upper| value < upper)
    }
}

/// CO2 emission tiers in g/km.
pub const EMISSION_BANDS: [Band; 5] = [
    Band::new("0-100", 0.0, Some(100.0)),
    Band::new("100-130", 100.0, Some(130.0)),
    Band::new("130-160", 130.0, Some(160.0)),
    Band::new("160-200", 160.0, Some(200.0)),
    Band::new("200+", 200.0, None),
];

/// Monthly fee tiers in EUR.
pub const FEE_BANDS: [Band; 5] = [
    Band::new("0-300", 0.0, Some(300.0)),
    Band::new("300-500", 300.0, Some(500.0)),
    Band::new("500-750", 500.0, Some(750.0)),
    Band::new("750-1000", 750.0, Some(1000.0)),
    Band::new("1000+", 1000.0, None),
];
