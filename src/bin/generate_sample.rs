use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 3000;

const YEARS: [i64; 6] = [2020, 2021, 2022, 2023, 2024, 2025];
/// (seniority, salary multiplier, relative weight)
const SENIORITIES: [(&str, f64, f64); 4] = [
    ("Junior", 0.55, 0.2),
    ("Mid", 0.8, 0.3),
    ("Senior", 1.15, 0.4),
    ("Executive", 1.6, 0.1),
];
const CONTRACTS: [(&str, f64, f64); 4] = [
    ("Full-time", 1.0, 0.9),
    ("Contract", 1.1, 0.04),
    ("Part-time", 0.5, 0.03),
    ("Freelance", 0.75, 0.03),
];
const SIZES: [(&str, f64, f64); 3] = [("S", 0.85, 0.15), ("M", 1.0, 0.65), ("L", 1.05, 0.2)];
/// (job title, base salary in USD, relative weight)
const TITLES: [(&str, f64, f64); 10] = [
    ("Data Scientist", 130000.0, 0.22),
    ("Data Engineer", 135000.0, 0.2),
    ("Data Analyst", 95000.0, 0.18),
    ("Machine Learning Engineer", 160000.0, 0.12),
    ("Analytics Engineer", 140000.0, 0.06),
    ("Research Scientist", 170000.0, 0.05),
    ("Data Architect", 165000.0, 0.04),
    ("Applied Scientist", 175000.0, 0.04),
    ("BI Developer", 90000.0, 0.05),
    ("Data Manager", 120000.0, 0.04),
];
const REMOTE: [(&str, f64, f64); 3] = [("Remote", 1.0, 0.45), ("Hybrid", 0.95, 0.1), ("On-site", 1.0, 0.45)];
/// (ISO3 country, salary multiplier, relative weight)
const COUNTRIES: [(&str, f64, f64); 10] = [
    ("USA", 1.0, 0.6),
    ("CAN", 0.8, 0.06),
    ("GBR", 0.65, 0.07),
    ("DEU", 0.6, 0.04),
    ("ESP", 0.45, 0.05),
    ("FRA", 0.55, 0.03),
    ("IND", 0.25, 0.05),
    ("BRA", 0.3, 0.04),
    ("AUS", 0.75, 0.03),
    ("NLD", 0.6, 0.03),
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

    /// Pick an entry proportionally to its weight (third tuple element).
    fn weighted<'a>(&mut self, table: &'a [(&'a str, f64, f64)]) -> &'a (&'a str, f64, f64) {
        let total: f64 = table.iter().map(|e| e.2).sum();
        let mut target = self.next_f64() * total;
        for entry in table {
            if target < entry.2 {
                return entry;
            }
            target -= entry.2;
        }
        &table[table.len() - 1]
    }
}

struct Columns {
    year: Vec<i64>,
    seniority: Vec<&'static str>,
    contract_type: Vec<&'static str>,
    company_size: Vec<&'static str>,
    job_title: Vec<&'static str>,
    remote_type: Vec<&'static str>,
    country: Vec<&'static str>,
    salary_usd: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns {
        year: Vec::with_capacity(ROWS),
        seniority: Vec::with_capacity(ROWS),
        contract_type: Vec::with_capacity(ROWS),
        company_size: Vec::with_capacity(ROWS),
        job_title: Vec::with_capacity(ROWS),
        remote_type: Vec::with_capacity(ROWS),
        country: Vec::with_capacity(ROWS),
        salary_usd: Vec::with_capacity(ROWS),
    };

    for _ in 0..ROWS {
        // Later years are over-represented, as in the real survey.
        let year_idx = ((rng.next_f64().sqrt()) * YEARS.len() as f64) as usize;
        let year = YEARS[year_idx.min(YEARS.len() - 1)];
        let &(seniority, s_mult, _) = rng.weighted(&SENIORITIES);
        let &(contract, c_mult, _) = rng.weighted(&CONTRACTS);
        let &(size, z_mult, _) = rng.weighted(&SIZES);
        let &(title, base, _) = rng.weighted(&TITLES);
        let &(remote, r_mult, _) = rng.weighted(&REMOTE);
        let &(country, k_mult, _) = rng.weighted(&COUNTRIES);

        let growth = 1.0 + 0.04 * (year - YEARS[0]) as f64;
        let expected = base * s_mult * c_mult * z_mult * r_mult * k_mult * growth;
        let salary = rng.gauss(expected, expected * 0.18).max(5000.0).round();

        cols.year.push(year);
        cols.seniority.push(seniority);
        cols.contract_type.push(contract);
        cols.company_size.push(size);
        cols.job_title.push(title);
        cols.remote_type.push(remote);
        cols.country.push(country);
        cols.salary_usd.push(salary);
    }
    cols
}

fn write_csv(path: &str, cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "year",
        "seniority",
        "contract_type",
        "company_size",
        "job_title",
        "remote_type",
        "residence_country_code",
        "salary_usd",
    ])?;
    for i in 0..cols.year.len() {
        writer.write_record([
            cols.year[i].to_string().as_str(),
            cols.seniority[i],
            cols.contract_type[i],
            cols.company_size[i],
            cols.job_title[i],
            cols.remote_type[i],
            cols.country[i],
            cols.salary_usd[i].to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, cols: &Columns) -> Result<()> {
    let text = |values: &[&'static str]| -> ArrayRef { Arc::new(StringArray::from(values.to_vec())) };

    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int64, false),
        Field::new("seniority", DataType::Utf8, false),
        Field::new("contract_type", DataType::Utf8, false),
        Field::new("company_size", DataType::Utf8, false),
        Field::new("job_title", DataType::Utf8, false),
        Field::new("remote_type", DataType::Utf8, false),
        Field::new("residence_country_code", DataType::Utf8, false),
        Field::new("salary_usd", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.year.clone())),
            text(&cols.seniority),
            text(&cols.contract_type),
            text(&cols.company_size),
            text(&cols.job_title),
            text(&cols.remote_type),
            text(&cols.country),
            Arc::new(Float64Array::from(cols.salary_usd.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let cols = generate(&mut rng);

    let csv_path = "sample_salaries.csv";
    let parquet_path = "sample_salaries.parquet";
    write_csv(csv_path, &cols)?;
    write_parquet(parquet_path, &cols)?;

    println!("Wrote {} salary records to {csv_path} and {parquet_path}", cols.year.len());
    Ok(())
}
