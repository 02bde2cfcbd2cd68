use std::fmt;

use chrono::{Local, NaiveDateTime};

use super::model::{FieldKind, FieldName, FleetRecord};
use super::parse::{parse_date, parse_number};

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FieldKind {
    /// Operators offered for this kind of field.
    pub fn operators(self) -> &'static [Operator] {
        match self {
            FieldKind::String => &[Operator::Eq],
            FieldKind::Number => &[
                Operator::Eq,
                Operator::Gt,
                Operator::Lt,
                Operator::Ge,
                Operator::Le,
            ],
            FieldKind::Date => &[Operator::Eq, Operator::Gt, Operator::Lt],
        }
    }

    pub fn default_operator(self) -> Operator {
        match self {
            FieldKind::String => Operator::Eq,
            FieldKind::Number => Operator::Ge,
            FieldKind::Date => Operator::Gt,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterValue – the comparison operand, already narrowed to its kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Number(f64),
    /// Raw date text; parsed at evaluation so the user can keep typing.
    Date(String),
}

impl FilterValue {
    /// Default operand for a freshly created filter of `kind`.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::String => FilterValue::Text(String::new()),
            FieldKind::Number => FilterValue::Number(0.0),
            FieldKind::Date => {
                FilterValue::Date(Local::now().date_naive().format("%Y-%m-%d").to_string())
            }
        }
    }

    /// Number typed by the user; anything unparseable is `0`.
    pub fn number_from_input(input: &str) -> Self {
        FilterValue::Number(parse_number(input).unwrap_or(0.0))
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FilterValue::Text(_) => FieldKind::String,
            FilterValue::Number(_) => FieldKind::Number,
            FilterValue::Date(_) => FieldKind::Date,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) | FilterValue::Date(s) => write!(f, "{s}"),
            FilterValue::Number(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// One user-defined constraint. A list of specs is a conjunction.
///
/// `field` is kept as the raw key so that a spec naming an unknown field can
/// exist; such a spec constrains nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub id: String,
    pub field: String,
    pub operator: Operator,
    pub value: FilterValue,
    pub label: String,
}

impl FilterSpec {
    /// A new filter on `field` with the defaults of its kind.
    pub fn for_field(id: impl Into<String>, field: FieldName) -> Self {
        let kind = field.kind();
        FilterSpec {
            id: id.into(),
            field: field.key().to_string(),
            operator: kind.default_operator(),
            value: FilterValue::default_for(kind),
            label: field.label().to_string(),
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    pub fn field_name(&self) -> Option<FieldName> {
        FieldName::from_key(&self.field)
    }

    /// Change the operator if it is valid for this filter's kind.
    /// Returns `false` (and keeps the old operator) otherwise.
    pub fn set_operator(&mut self, operator: Operator) -> bool {
        if !self.kind().operators().contains(&operator) {
            return false;
        }
        self.operator = operator;
        true
    }

    /// Short description such as `Marca = Fiat`.
    pub fn summary(&self) -> String {
        format!("{} {} {}", self.label, self.operator, self.value)
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Whether `record` satisfies every filter in `filters`.
pub fn matches(record: &FleetRecord, filters: &[FilterSpec]) -> bool {
    filters.iter().all(|filter| matches_one(record, filter))
}

fn matches_one(record: &FleetRecord, filter: &FilterSpec) -> bool {
    let Some(field) = filter.field_name() else {
        // Unknown field: no constraint.
        return true;
    };
    let cell = field.extract(record);

    match &filter.value {
        // Equality regardless of operator.
        FilterValue::Text(wanted) => cell.as_text().to_lowercase() == wanted.trim().to_lowercase(),
        FilterValue::Number(wanted) => compare_numbers(cell.as_number(), filter.operator, *wanted),
        FilterValue::Date(wanted) => {
            let Some(actual) = cell.as_date() else {
                return false;
            };
            let Some(wanted) = parse_date(wanted) else {
                return false;
            };
            compare_dates(actual, filter.operator, wanted)
        }
    }
}

fn compare_numbers(actual: f64, operator: Operator, wanted: f64) -> bool {
    match operator {
        Operator::Eq => actual == wanted,
        Operator::Gt => actual > wanted,
        Operator::Lt => actual < wanted,
        Operator::Ge => actual >= wanted,
        Operator::Le => actual <= wanted,
    }
}

fn compare_dates(actual: NaiveDateTime, operator: Operator, wanted: NaiveDateTime) -> bool {
    match operator {
        Operator::Eq => actual.date() == wanted.date(),
        Operator::Gt => actual > wanted,
        Operator::Lt => actual < wanted,
        Operator::Ge => actual >= wanted,
        Operator::Le => actual <= wanted,
    }
}

/// Records matching all `filters`, in input order.
///
/// Accepts anything iterating over `&FleetRecord`, so the output of one call
/// can be fed straight into another.
pub fn partition<'a, I>(records: I, filters: &[FilterSpec]) -> Vec<&'a FleetRecord>
where
    I: IntoIterator<Item = &'a FleetRecord>,
{
    records
        .into_iter()
        .filter(|record| matches(record, filters))
        .collect()
}

/// Indices of records matching all `filters`, ascending.
pub fn matching_indices(records: &[FleetRecord], filters: &[FilterSpec]) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches(record, filters))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(marca: &str, fee: Option<f64>, emissioni: &str, scadenza: &str) -> FleetRecord {
        FleetRecord {
            marca: marca.to_string(),
            canone_mensile: fee,
            emissioni: emissioni.to_string(),
            scadenza_contratto: scadenza.to_string(),
            ..Default::default()
        }
    }

    fn spec(field: &str, operator: Operator, value: FilterValue) -> FilterSpec {
        FilterSpec {
            id: format!("{field}-{operator}"),
            field: field.to_string(),
            operator,
            value,
            label: field.to_string(),
        }
    }

    #[test]
    fn string_filter_ignores_case_and_whitespace() {
        let r = record(" Fiat ", None, "", "");
        assert!(matches(&r, &[spec("marca", Operator::Eq, FilterValue::Text("fiat".into()))]));
        assert!(!matches(&r, &[spec("marca", Operator::Eq, FilterValue::Text("fia".into()))]));
    }

    #[test]
    fn string_filter_applies_equality_whatever_the_operator() {
        let r = record("Fiat", None, "", "");
        assert!(matches(&r, &[spec("marca", Operator::Gt, FilterValue::Text("FIAT".into()))]));
        assert!(!matches(&r, &[spec("marca", Operator::Gt, FilterValue::Text("Audi".into()))]));
    }

    #[test]
    fn unknown_field_is_vacuously_true() {
        let r = record("Fiat", None, "", "");
        assert!(matches(&r, &[spec("colore", Operator::Eq, FilterValue::Text("rosso".into()))]));
    }

    #[test]
    fn number_filter_on_emissions_uses_magnitude() {
        let low = record("A", None, "95 g/km", "");
        let high = record("B", None, "140 g/km", "");
        let dirty = record("C", None, "n/d", "");
        let f = [spec("emissioni", Operator::Lt, FilterValue::Number(100.0))];
        assert!(matches(&low, &f));
        assert!(!matches(&high, &f));
        // No magnitude counts as 0.
        assert!(matches(&dirty, &f));
    }

    #[test]
    fn missing_fee_coerces_to_zero() {
        let r = record("A", None, "", "");
        assert!(matches(&r, &[spec("canoneMensile", Operator::Eq, FilterValue::Number(0.0))]));
        assert!(!matches(&r, &[spec("canoneMensile", Operator::Gt, FilterValue::Number(0.0))]));
    }

    #[test]
    fn unparseable_number_input_degrades_to_zero() {
        assert_eq!(FilterValue::number_from_input("abc"), FilterValue::Number(0.0));
        assert_eq!(FilterValue::number_from_input("1.200,5"), FilterValue::Number(1200.5));
    }

    #[test]
    fn date_equality_ignores_time_of_day() {
        let r = record("A", None, "", "2026-03-31T17:45:00");
        let eq = [spec("scadenzaContratto", Operator::Eq, FilterValue::Date("2026-03-31".into()))];
        let gt = [spec("scadenzaContratto", Operator::Gt, FilterValue::Date("2026-03-31".into()))];
        let lt = [spec("scadenzaContratto", Operator::Lt, FilterValue::Date("2026-03-31".into()))];
        assert!(matches(&r, &eq));
        assert!(matches(&r, &gt));
        assert!(!matches(&r, &lt));
    }

    #[test]
    fn unparseable_dates_never_match() {
        let dirty = record("A", None, "", "someday");
        let clean = record("A", None, "", "2026-03-31");
        let f = [spec("scadenzaContratto", Operator::Gt, FilterValue::Date("2020-01-01".into()))];
        assert!(!matches(&dirty, &f));
        assert!(matches(&clean, &f));

        let bad_value = [spec("scadenzaContratto", Operator::Gt, FilterValue::Date("soon".into()))];
        assert!(!matches(&clean, &bad_value));
    }

    #[test]
    fn set_operator_rejects_operators_outside_the_kind() {
        let mut f = FilterSpec::for_field("1", FieldName::Marca);
        assert_eq!(f.operator, Operator::Eq);
        assert!(!f.set_operator(Operator::Gt));
        assert_eq!(f.operator, Operator::Eq);

        let mut d = FilterSpec::for_field("2", FieldName::ScadenzaContratto);
        assert!(d.set_operator(Operator::Lt));
        assert!(!d.set_operator(Operator::Ge));
        assert_eq!(d.operator, Operator::Lt);
    }

    #[test]
    fn defaults_follow_field_kind() {
        let n = FilterSpec::for_field("n", FieldName::CanoneMensile);
        assert_eq!(n.operator, Operator::Ge);
        assert_eq!(n.value, FilterValue::Number(0.0));
        assert_eq!(n.label, "Canone mensile");
        assert_eq!(n.field, "canoneMensile");

        let d = FilterSpec::for_field("d", FieldName::ScadenzaContratto);
        assert_eq!(d.kind(), FieldKind::Date);
        assert_eq!(d.operator, Operator::Gt);
    }

    #[test]
    fn summary_reads_label_operator_value() {
        let mut f = FilterSpec::for_field("1", FieldName::CanoneMensile);
        f.value = FilterValue::number_from_input("850");
        assert_eq!(f.summary(), "Canone mensile >= 850");
    }

    #[test]
    fn matching_indices_preserve_order() {
        let records = vec![
            record("Fiat", None, "", ""),
            record("BMW", None, "", ""),
            record("fiat", None, "", ""),
        ];
        let f = [spec("marca", Operator::Eq, FilterValue::Text("FIAT".into()))];
        assert_eq!(matching_indices(&records, &f), vec![0, 2]);
    }
}
