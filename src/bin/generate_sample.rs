use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One molecule: generic name, class, ATC code, brand name and typical
/// monthly cost band for the brand.
struct Molecule {
    generic: &'static str,
    class: &'static str,
    atc: &'static str,
    brand: &'static str,
    pmpm: (f64, f64),
    age: (f64, f64),
}

const MOLECULES: &[Molecule] = &[
    Molecule { generic: "Atorvastatin Calcium", class: "Statins", atc: "C10AA05", brand: "Lipitor", pmpm: (35.0, 55.0), age: (50.0, 72.0) },
    Molecule { generic: "Rosuvastatin Calcium", class: "Statins", atc: "C10AA07", brand: "Crestor", pmpm: (30.0, 50.0), age: (50.0, 72.0) },
    Molecule { generic: "Simvastatin", class: "Statins", atc: "C10AA01", brand: "Zocor", pmpm: (15.0, 30.0), age: (55.0, 75.0) },
    Molecule { generic: "Metformin Hydrochloride", class: "Antidiabetics", atc: "A10BA02", brand: "Glucophage", pmpm: (10.0, 25.0), age: (45.0, 68.0) },
    Molecule { generic: "Sitagliptin", class: "Antidiabetics", atc: "A10BH01", brand: "Januvia", pmpm: (420.0, 560.0), age: (48.0, 70.0) },
    Molecule { generic: "Insulin Lispro", class: "Insulin", atc: "A10AB04", brand: "Humalog", pmpm: (520.0, 680.0), age: (30.0, 65.0) },
    Molecule { generic: "Insulin Aspart", class: "Insulin", atc: "A10AB05", brand: "Novolog", pmpm: (480.0, 620.0), age: (30.0, 65.0) },
    Molecule { generic: "Apixaban", class: "Anticoagulants", atc: "B01AF02", brand: "Eliquis", pmpm: (450.0, 560.0), age: (62.0, 82.0) },
    Molecule { generic: "Warfarin Sodium", class: "Anticoagulants", atc: "B01AA03", brand: "Coumadin", pmpm: (8.0, 20.0), age: (65.0, 85.0) },
    Molecule { generic: "Lisinopril", class: "ACE Inhibitors", atc: "C09AA03", brand: "Zestril", pmpm: (6.0, 18.0), age: (50.0, 75.0) },
    Molecule { generic: "Sertraline", class: "Antidepressants", atc: "N06AB06", brand: "Zoloft", pmpm: (12.0, 35.0), age: (22.0, 55.0) },
    Molecule { generic: "Escitalopram", class: "Antidepressants", atc: "N06AB10", brand: "Lexapro", pmpm: (15.0, 40.0), age: (22.0, 55.0) },
];

const STRENGTHS: &[&str] = &["5mg", "10mg", "20mg", "40mg"];
const STATES: &[&str] = &["CA", "TX", "NY", "FL", "IL", "PA", "OH", "GA"];
const BRAND_TE_CODES: &[&str] = &["AB", "AB1", "NA", "BX", ""];

/// One generated dataset row.
struct Row {
    ndc: String,
    drug_name: String,
    generic_name: String,
    therapeutic_class: String,
    atc_code: String,
    te_code: String,
    total_drug_cost: f64,
    member_count: i64,
    avg_age: f64,
    state: String,
    pmpm_cost: f64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut labeler = 10_000u64;

    for molecule in MOLECULES {
        for strength in STRENGTHS {
            // Brand product, then its generic equivalent at a fraction of the cost.
            for is_generic in [false, true] {
                labeler += 1 + rng.next_u64() % 50;
                let product = rng.next_u64() % 10_000;
                let package = rng.next_u64() % 100;

                let brand_pmpm = rng.range(molecule.pmpm.0, molecule.pmpm.1);
                let pmpm = if is_generic {
                    brand_pmpm * rng.range(0.12, 0.35)
                } else {
                    brand_pmpm
                };
                let members = (rng.range(400.0, 6_500.0)) as i64;
                let months = rng.range(6.0, 12.0);
                let name = if is_generic { molecule.generic } else { molecule.brand };
                let te_code = if is_generic {
                    "AB"
                } else {
                    *rng.pick(BRAND_TE_CODES)
                };

                rows.push(Row {
                    ndc: format!("{labeler:05}-{product:04}-{package:02}"),
                    drug_name: format!("{name} {strength} Tablets"),
                    generic_name: molecule.generic.to_string(),
                    therapeutic_class: molecule.class.to_string(),
                    atc_code: molecule.atc.to_string(),
                    te_code: te_code.to_string(),
                    total_drug_cost: (pmpm * members as f64 * months).round(),
                    member_count: members,
                    avg_age: (rng.range(molecule.age.0, molecule.age.1) * 10.0).round() / 10.0,
                    state: rng.pick(STATES).to_string(),
                    pmpm_cost: (pmpm * 100.0).round() / 100.0,
                });
            }
        }
    }
    rows
}

fn to_batch(rows: &[Row]) -> Result<RecordBatch> {
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("ndc", DataType::Utf8, false),
        Field::new("drug_name", DataType::Utf8, false),
        Field::new("generic_name", DataType::Utf8, false),
        Field::new("therapeutic_class", DataType::Utf8, false),
        Field::new("atc_code", DataType::Utf8, false),
        Field::new("therapeutic_equivalence_code", DataType::Utf8, false),
        Field::new("total_drug_cost", DataType::Float64, false),
        Field::new("member_count", DataType::Int64, false),
        Field::new("avg_age", DataType::Float64, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("pmpm_cost", DataType::Float64, false),
    ]));

    let members: ArrayRef = Arc::new(Int64Array::from(
        rows.iter().map(|r| r.member_count).collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(
        schema,
        vec![
            text(|r| r.ndc.as_str()),
            text(|r| r.drug_name.as_str()),
            text(|r| r.generic_name.as_str()),
            text(|r| r.therapeutic_class.as_str()),
            text(|r| r.atc_code.as_str()),
            text(|r| r.te_code.as_str()),
            float(|r| r.total_drug_cost),
            members,
            float(|r| r.avg_age),
            text(|r| r.state.as_str()),
            float(|r| r.pmpm_cost),
        ],
    )
    .context("Failed to create RecordBatch")
}

fn write_parquet(path: &str, batch: &RecordBatch) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("Cannot create {path}"))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// CSV with pre-formatted costs, as spreadsheet exports deliver them.
fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("Cannot create {path}"))?;
    writer.write_record([
        "ndc",
        "drug_name",
        "generic_name",
        "therapeutic_class",
        "atc_code",
        "therapeutic_equivalence_code",
        "total_drug_cost",
        "member_count",
        "avg_age",
        "state",
        "pmpm_cost",
    ])?;
    for r in rows {
        writer.write_record([
            r.ndc.clone(),
            r.drug_name.clone(),
            r.generic_name.clone(),
            r.therapeutic_class.clone(),
            r.atc_code.clone(),
            r.te_code.clone(),
            format!("${:.0}", r.total_drug_cost),
            r.member_count.to_string(),
            format!("{:.1}", r.avg_age),
            r.state.clone(),
            format!("{:.2}", r.pmpm_cost),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let batch = to_batch(&rows)?;
    let preview = arrow::util::pretty::pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])?;
    println!("{preview}");

    let parquet_path = "sample_drugs.parquet";
    write_parquet(parquet_path, &batch)?;

    let csv_path = "sample_drugs.csv";
    write_csv(csv_path, &rows)?;

    println!(
        "Wrote {} drugs in {} classes to {parquet_path} and {csv_path}",
        rows.len(),
        MOLECULES
            .iter()
            .map(|m| m.class)
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    );
    Ok(())
}
