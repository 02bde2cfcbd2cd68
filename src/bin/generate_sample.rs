use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, Local};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const VEHICLES: usize = 240;

fn main() {
    let mut rng = SimpleRng::new(42);
    let today = Local::now().date_naive();

    let lessors = ["ALD Automotive", "Arval", "Leasys", "LeasePlan", "Athlon"];
    let companies = ["Alfa S.p.A.", "Beta S.r.l.", "Gamma Servizi", ""];
    let brands: [(&str, &[&str]); 6] = [
        ("Fiat", &["Panda", "Tipo", "500X"]),
        ("Volkswagen", &["Golf", "Passat", "T-Roc"]),
        ("BMW", &["Serie 3", "X1"]),
        ("Tesla", &["Model 3", "Model Y"]),
        ("Peugeot", &["308", "3008"]),
        ("Toyota", &["Yaris", "C-HR"]),
    ];
    let first_names = ["Marco", "Giulia", "Luca", "Sara", "Paolo", "Elena", "Andrea", "Chiara"];
    let last_names = ["Rossi", "Bianchi", "Ferrari", "Esposito", "Romano", "Colombo"];

    let mut targa = Vec::with_capacity(VEHICLES);
    let mut conducente = Vec::with_capacity(VEHICLES);
    let mut noleggiatore = Vec::with_capacity(VEHICLES);
    let mut societa = Vec::with_capacity(VEHICLES);
    let mut alimentazione = Vec::with_capacity(VEHICLES);
    let mut marca = Vec::with_capacity(VEHICLES);
    let mut modello = Vec::with_capacity(VEHICLES);
    let mut scadenza = Vec::with_capacity(VEHICLES);
    let mut canone: Vec<Option<f64>> = Vec::with_capacity(VEHICLES);
    let mut km: Vec<Option<f64>> = Vec::with_capacity(VEHICLES);
    let mut emissioni = Vec::with_capacity(VEHICLES);

    for i in 0..VEHICLES {
        let (brand, models) = brands[(rng.next_u64() % brands.len() as u64) as usize];
        let electric = brand == "Tesla";
        let fuel = if electric {
            "Elettrico"
        } else {
            rng.pick(&["Diesel", "Benzina", "Ibrido", "Diesel"])
        };

        targa.push(format!(
            "G{}{:03}{}",
            (b'A' + (i % 26) as u8) as char,
            i,
            (b'Z' - (i % 26) as u8) as char
        ));
        conducente.push(format!("{} {}", rng.pick(&first_names), rng.pick(&last_names)));
        noleggiatore.push(rng.pick(&lessors).to_string());
        societa.push(rng.pick(&companies).to_string());
        alimentazione.push(fuel.to_string());
        marca.push(brand.to_string());
        modello.push(rng.pick(models).to_string());

        // Contracts between two years ago and four years ahead.
        let offset_days = rng.range(-730.0, 1460.0) as i64;
        let expiry = if offset_days >= 0 {
            today.checked_add_days(Days::new(offset_days as u64))
        } else {
            today.checked_sub_days(Days::new(offset_days.unsigned_abs()))
        };
        scadenza.push(expiry.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default());

        // A few dirty rows: missing fee, unknown emissions.
        canone.push((i % 37 != 0).then(|| (rng.range(250.0, 1400.0) * 100.0).round() / 100.0));
        km.push(Some((rng.range(60.0, 200.0) as i64 * 1000) as f64));
        emissioni.push(if electric {
            "0 g/km".to_string()
        } else if i % 41 == 0 {
            "n/d".to_string()
        } else {
            format!("{:.0} g/km", rng.range(85.0, 230.0))
        });
    }

    fn text(values: &[String]) -> ArrayRef {
        Arc::new(StringArray::from(values.iter().map(|s| s.as_str()).collect::<Vec<_>>()))
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("targa", DataType::Utf8, false),
        Field::new("conducente", DataType::Utf8, false),
        Field::new("noleggiatore", DataType::Utf8, false),
        Field::new("societa", DataType::Utf8, false),
        Field::new("alimentazione", DataType::Utf8, false),
        Field::new("marca", DataType::Utf8, false),
        Field::new("modello", DataType::Utf8, false),
        Field::new("scadenzaContratto", DataType::Utf8, false),
        Field::new("canoneMensile", DataType::Float64, true),
        Field::new("kmContrattuali", DataType::Float64, true),
        Field::new("emissioni", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(&targa),
            text(&conducente),
            text(&noleggiatore),
            text(&societa),
            text(&alimentazione),
            text(&marca),
            text(&modello),
            text(&scadenza),
            Arc::new(Float64Array::from(canone)) as ArrayRef,
            Arc::new(Float64Array::from(km)) as ArrayRef,
            text(&emissioni),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "sample_fleet.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {VEHICLES} vehicles to {output_path}");
}
