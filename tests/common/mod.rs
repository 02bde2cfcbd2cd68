//! Shared fixtures for the fleet dashboard integration tests.
//!
//! `sample_fleet()` returns a small fleet with one deliberately dirty record
//! (no fee, no emission magnitude, unparseable expiry, blank brand).

#![allow(dead_code)]

use chrono::NaiveDate;
use fleet_dashboard::{FilterSpec, FilterValue, FleetRecord, Operator};

/// Fixed "today" used by every date-dependent test.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

pub fn vehicle(
    marca: &str,
    noleggiatore: &str,
    alimentazione: &str,
    fee: Option<f64>,
    emissioni: &str,
    scadenza: &str,
) -> FleetRecord {
    FleetRecord {
        targa: format!("XX{marca}"),
        conducente: "Mario Rossi".to_string(),
        noleggiatore: noleggiatore.to_string(),
        societa: "Alfa S.p.A.".to_string(),
        alimentazione: alimentazione.to_string(),
        marca: marca.to_string(),
        modello: String::new(),
        scadenza_contratto: scadenza.to_string(),
        canone_mensile: fee,
        km_contrattuali: Some(100_000.0),
        emissioni: emissioni.to_string(),
    }
}

pub fn sample_fleet() -> Vec<FleetRecord> {
    vec![
        vehicle("Fiat", "Arval", "Diesel", Some(500.0), "110 g/km", "2026-10-18"),
        vehicle("BMW", "Leasys", "Benzina", Some(850.0), "150 g/km", "2027-04-17"),
        vehicle("Fiat", "Arval", "Ibrido", Some(1200.0), "95 g/km", "2027-04-18"),
        vehicle("Tesla", "ALD Automotive", "Elettrico", Some(990.0), "0 g/km", "2025-12-31"),
        vehicle("", "", "", None, "n/d", "someday"),
    ]
}

pub fn text_filter(id: &str, field: &str, value: &str) -> FilterSpec {
    FilterSpec {
        id: id.to_string(),
        field: field.to_string(),
        operator: Operator::Eq,
        value: FilterValue::Text(value.to_string()),
        label: field.to_string(),
    }
}

pub fn number_filter(id: &str, field: &str, operator: Operator, value: f64) -> FilterSpec {
    FilterSpec {
        id: id.to_string(),
        field: field.to_string(),
        operator,
        value: FilterValue::Number(value),
        label: field.to_string(),
    }
}

pub fn date_filter(id: &str, field: &str, operator: Operator, value: &str) -> FilterSpec {
    FilterSpec {
        id: id.to_string(),
        field: field.to_string(),
        operator,
        value: FilterValue::Date(value.to_string()),
        label: field.to_string(),
    }
}
