use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::parse::{parse_date, parse_magnitude, parse_number};

// ---------------------------------------------------------------------------
// FleetRecord – one vehicle/driver row
// ---------------------------------------------------------------------------

/// A single vehicle/driver entry of the fleet.
///
/// Text fields are kept exactly as supplied; trimming and case folding happen
/// where they are compared. Numeric fields are `None` when the source cell was
/// missing or not a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FleetRecord {
    pub targa: String,
    pub conducente: String,
    pub noleggiatore: String,
    pub societa: String,
    pub alimentazione: String,
    pub marca: String,
    pub modello: String,
    /// Contract expiry, ISO-8601 text.
    pub scadenza_contratto: String,
    #[serde(deserialize_with = "lenient_number")]
    pub canone_mensile: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub km_contrattuali: Option<f64>,
    /// Free text with an embedded magnitude, e.g. `"120 g/km"`.
    pub emissioni: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accept `850`, `850.5`, `"850,50"`, `"€ 850"` or `null`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(v)) if v.is_finite() => Some(v),
        Some(NumberOrText::Text(s)) => parse_number(&s),
        _ => None,
    })
}

impl FleetRecord {
    /// Parsed contract expiry, if the text is a valid ISO date.
    pub fn contract_expiry(&self) -> Option<NaiveDateTime> {
        parse_date(&self.scadenza_contratto)
    }

    /// Emission magnitude in g/km, if the text carries a number.
    pub fn emission_magnitude(&self) -> Option<f64> {
        parse_magnitude(&self.emissioni)
    }
}

// ---------------------------------------------------------------------------
// FieldName – closed set of filterable fields with typed accessors
// ---------------------------------------------------------------------------

/// How a field is compared by filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Date,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    Targa,
    Conducente,
    Noleggiatore,
    Societa,
    Alimentazione,
    Marca,
    Modello,
    ScadenzaContratto,
    CanoneMensile,
    KmContrattuali,
    Emissioni,
}

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        FieldName::Targa,
        FieldName::Conducente,
        FieldName::Noleggiatore,
        FieldName::Societa,
        FieldName::Alimentazione,
        FieldName::Marca,
        FieldName::Modello,
        FieldName::ScadenzaContratto,
        FieldName::CanoneMensile,
        FieldName::KmContrattuali,
        FieldName::Emissioni,
    ];

    /// Wire name, as used in JSON/CSV/Parquet column headers and filter specs.
    pub fn key(self) -> &'static str {
        match self {
            FieldName::Targa => "targa",
            FieldName::Conducente => "conducente",
            FieldName::Noleggiatore => "noleggiatore",
            FieldName::Societa => "societa",
            FieldName::Alimentazione => "alimentazione",
            FieldName::Marca => "marca",
            FieldName::Modello => "modello",
            FieldName::ScadenzaContratto => "scadenzaContratto",
            FieldName::CanoneMensile => "canoneMensile",
            FieldName::KmContrattuali => "kmContrattuali",
            FieldName::Emissioni => "emissioni",
        }
    }

    pub fn from_key(key: &str) -> Option<FieldName> {
        FieldName::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Human readable label for filter chips and table headers.
    pub fn label(self) -> &'static str {
        match self {
            FieldName::Targa => "Targa",
            FieldName::Conducente => "Conducente",
            FieldName::Noleggiatore => "Noleggiatore",
            FieldName::Societa => "Società",
            FieldName::Alimentazione => "Alimentazione",
            FieldName::Marca => "Marca",
            FieldName::Modello => "Modello",
            FieldName::ScadenzaContratto => "Scadenza contratto",
            FieldName::CanoneMensile => "Canone mensile",
            FieldName::KmContrattuali => "Km contrattuali",
            FieldName::Emissioni => "Emissioni",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FieldName::ScadenzaContratto => FieldKind::Date,
            FieldName::CanoneMensile | FieldName::KmContrattuali | FieldName::Emissioni => {
                FieldKind::Number
            }
            _ => FieldKind::String,
        }
    }

    /// Read this field from a record.
    pub fn extract(self, record: &FleetRecord) -> FieldValue<'_> {
        match self {
            FieldName::Targa => FieldValue::Text(&record.targa),
            FieldName::Conducente => FieldValue::Text(&record.conducente),
            FieldName::Noleggiatore => FieldValue::Text(&record.noleggiatore),
            FieldName::Societa => FieldValue::Text(&record.societa),
            FieldName::Alimentazione => FieldValue::Text(&record.alimentazione),
            FieldName::Marca => FieldValue::Text(&record.marca),
            FieldName::Modello => FieldValue::Text(&record.modello),
            FieldName::ScadenzaContratto => FieldValue::Text(&record.scadenza_contratto),
            FieldName::CanoneMensile => FieldValue::Number(record.canone_mensile),
            FieldName::KmContrattuali => FieldValue::Number(record.km_contrattuali),
            FieldName::Emissioni => FieldValue::Text(&record.emissioni),
        }
    }

    /// Write a raw cell (as read from CSV/Parquet) into the record.
    pub fn assign(self, record: &mut FleetRecord, raw: &str) {
        match self {
            FieldName::Targa => record.targa = raw.to_string(),
            FieldName::Conducente => record.conducente = raw.to_string(),
            FieldName::Noleggiatore => record.noleggiatore = raw.to_string(),
            FieldName::Societa => record.societa = raw.to_string(),
            FieldName::Alimentazione => record.alimentazione = raw.to_string(),
            FieldName::Marca => record.marca = raw.to_string(),
            FieldName::Modello => record.modello = raw.to_string(),
            FieldName::ScadenzaContratto => record.scadenza_contratto = raw.to_string(),
            FieldName::CanoneMensile => record.canone_mensile = parse_number(raw),
            FieldName::KmContrattuali => record.km_contrattuali = parse_number(raw),
            FieldName::Emissioni => record.emissioni = raw.to_string(),
        }
    }

    /// Write a cell that is already numeric (typed Parquet column), skipping
    /// the text heuristics of [`assign`](Self::assign).
    pub fn assign_number(self, record: &mut FleetRecord, value: f64) {
        let value = Some(value).filter(|v| v.is_finite());
        match self {
            FieldName::CanoneMensile => record.canone_mensile = value,
            FieldName::KmContrattuali => record.km_contrattuali = value,
            other => other.assign(record, &value.map(|v| v.to_string()).unwrap_or_default()),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FieldValue – a borrowed cell, coerced on demand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
}

impl FieldValue<'_> {
    /// Trimmed string form.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.trim()),
            FieldValue::Number(Some(v)) => Cow::Owned(v.to_string()),
            FieldValue::Number(None) => Cow::Borrowed(""),
        }
    }

    /// Numeric form. Text goes through magnitude extraction; anything without
    /// a number is `0`.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Text(s) => parse_magnitude(s).unwrap_or(0.0),
            FieldValue::Number(v) => v.unwrap_or(0.0),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Text(s) => parse_date(s),
            FieldValue::Number(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_key() {
        for field in FieldName::ALL {
            assert_eq!(FieldName::from_key(field.key()), Some(field));
        }
        assert_eq!(FieldName::from_key("colore"), None);
    }

    #[test]
    fn deserializes_lenient_numbers() {
        let json = r#"[
            {"marca": "Fiat", "canoneMensile": 850, "kmContrattuali": "120.000,00"},
            {"marca": "BMW", "canoneMensile": "€ 1.200,50", "kmContrattuali": null},
            {"marca": "Audi", "canoneMensile": "n/d"}
        ]"#;
        let records: Vec<FleetRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].canone_mensile, Some(850.0));
        assert_eq!(records[0].km_contrattuali, Some(120_000.0));
        assert_eq!(records[1].canone_mensile, Some(1200.5));
        assert_eq!(records[1].km_contrattuali, None);
        assert_eq!(records[2].canone_mensile, None);
        assert_eq!(records[2].km_contrattuali, None);
    }

    #[test]
    fn field_value_coercions() {
        let record = FleetRecord {
            marca: "  Fiat ".into(),
            emissioni: "120 g/km".into(),
            canone_mensile: Some(850.0),
            scadenza_contratto: "2026-01-31".into(),
            ..Default::default()
        };
        assert_eq!(FieldName::Marca.extract(&record).as_text(), "Fiat");
        assert_eq!(FieldName::Emissioni.extract(&record).as_number(), 120.0);
        assert_eq!(FieldName::CanoneMensile.extract(&record).as_text(), "850");
        assert_eq!(FieldName::KmContrattuali.extract(&record).as_number(), 0.0);
        assert!(FieldName::ScadenzaContratto.extract(&record).as_date().is_some());
        assert!(FieldName::CanoneMensile.extract(&record).as_date().is_none());
    }

    #[test]
    fn assign_parses_numeric_cells() {
        let mut record = FleetRecord::default();
        FieldName::CanoneMensile.assign(&mut record, "499,90");
        FieldName::Marca.assign(&mut record, "Peugeot");
        assert_eq!(record.canone_mensile, Some(499.9));
        assert_eq!(record.marca, "Peugeot");
    }

    #[test]
    fn assign_number_keeps_typed_values() {
        let mut record = FleetRecord::default();
        FieldName::CanoneMensile.assign_number(&mut record, 1000.125);
        FieldName::KmContrattuali.assign_number(&mut record, f64::NAN);
        FieldName::Emissioni.assign_number(&mut record, 118.0);
        assert_eq!(record.canone_mensile, Some(1000.125));
        assert_eq!(record.km_contrattuali, None);
        assert_eq!(record.emission_magnitude(), Some(118.0));
    }
}
