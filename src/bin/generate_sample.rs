use std::path::Path;

use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;

use rusty_carat::data::{Column, Dataset, Value};

const N_ROWS: usize = 2000;

/// (name, sampling weight, price multiplier)
const CUTS: [(&str, f64, f64); 5] = [
    ("Fair", 0.03, 0.80),
    ("Good", 0.09, 0.90),
    ("Very Good", 0.22, 1.00),
    ("Premium", 0.26, 1.05),
    ("Ideal", 0.40, 1.10),
];

const COLORS: [(&str, f64, f64); 7] = [
    ("D", 0.13, 1.25),
    ("E", 0.18, 1.18),
    ("F", 0.18, 1.10),
    ("G", 0.21, 1.00),
    ("H", 0.15, 0.90),
    ("I", 0.10, 0.80),
    ("J", 0.05, 0.70),
];

const CLARITIES: [(&str, f64, f64); 8] = [
    ("I1", 0.01, 0.55),
    ("SI2", 0.17, 0.80),
    ("SI1", 0.24, 0.90),
    ("VS2", 0.23, 1.00),
    ("VS1", 0.15, 1.08),
    ("VVS2", 0.09, 1.18),
    ("VVS1", 0.07, 1.28),
    ("IF", 0.04, 1.40),
];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick an entry according to its sampling weight.
    fn pick<'a>(&mut self, table: &'a [(&'a str, f64, f64)]) -> (&'a str, f64) {
        let total: f64 = table.iter().map(|t| t.1).sum();
        let mut target = self.next_f64() * total;
        for &(name, weight, factor) in table {
            if target < weight {
                return (name, factor);
            }
            target -= weight;
        }
        let (name, _, factor) = table[table.len() - 1];
        (name, factor)
    }
}

fn generate(rng: &mut SimpleRng) -> Result<Dataset> {
    let mut cut = Vec::with_capacity(N_ROWS);
    let mut color = Vec::with_capacity(N_ROWS);
    let mut clarity = Vec::with_capacity(N_ROWS);
    let mut carat = Vec::with_capacity(N_ROWS);
    let mut price = Vec::with_capacity(N_ROWS);

    for _ in 0..N_ROWS {
        let (cut_name, cut_factor) = rng.pick(&CUTS);
        let (color_name, color_factor) = rng.pick(&COLORS);
        let (clarity_name, clarity_factor) = rng.pick(&CLARITIES);

        // Log-normal weight around 0.7 ct, rounded like a scale would.
        let weight = (rng.gauss(-0.4, 0.55).exp().clamp(0.2, 5.0) * 100.0).round() / 100.0;
        let noise = rng.gauss(1.0, 0.08).max(0.5);
        let value = 4000.0 * weight.powf(1.7) * cut_factor * color_factor * clarity_factor * noise;

        cut.push(cut_name);
        color.push(color_name);
        clarity.push(clarity_name);
        carat.push(weight);
        price.push(value.round().max(326.0));
    }

    Ok(Dataset::new(vec![
        ("carat".into(), Column::float(carat)),
        ("cut".into(), Column::text(cut)),
        ("color".into(), Column::text(color)),
        ("clarity".into(), Column::text(clarity)),
        ("price".into(), Column::float(price)),
    ])?)
}

fn write_parquet(dataset: &Dataset, path: &Path) -> Result<()> {
    let batch = dataset.to_record_batch().context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    log::info!("wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

/// Missing cells are written as empty fields, which the loader reads back
/// as missing.
fn csv_field(value: Value<'_>) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(dataset.column_names())?;
    for row in dataset.rows() {
        writer.write_record(row.values().map(|(_, v)| csv_field(v)))?;
    }
    writer.flush()?;
    log::info!("wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let dataset = generate(&mut rng)?;

    write_parquet(&dataset, Path::new("sample_diamonds.parquet"))?;
    write_csv(&dataset, Path::new("sample_diamonds.csv"))?;

    println!(
        "Wrote {} diamonds to sample_diamonds.parquet and sample_diamonds.csv",
        dataset.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_carat::data::loader::load_file;
    use rusty_carat::data::ColumnType;

    use super::*;

    #[test]
    fn csv_keeps_missing_cells_empty() {
        let dataset = Dataset::new(vec![
            ("cut".into(), Column::Text(vec![Some("Ideal".into()), None])),
            ("price".into(), Column::float(vec![f64::NAN, 326.0])),
        ])
        .unwrap();
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write_csv(&dataset, file.path()).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "cut,price\nIdeal,\n,326\n");

        let loaded = load_file(file.path()).unwrap();
        assert_eq!(loaded.column("price").unwrap().column_type(), ColumnType::Float);
        assert_eq!(loaded.text("cut").unwrap(), dataset.text("cut").unwrap());
    }

    #[test]
    fn generated_data_round_trips_through_csv() {
        let dataset = generate(&mut SimpleRng::new(7)).unwrap();
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write_csv(&dataset, file.path()).unwrap();

        let loaded = load_file(file.path()).unwrap();
        assert_eq!(loaded.len(), N_ROWS);
        for name in dataset.column_names() {
            assert_eq!(
                loaded.column(name).unwrap().column_type(),
                dataset.column(name).unwrap().column_type(),
                "column {name}"
            );
        }
    }
}
