use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use disaster_dash::data::model::{
    COL_DISASTER_TYPE, COL_LATITUDE, COL_LONGITUDE, COL_REGION, COL_TOTAL_AFFECTED,
    COL_TOTAL_DAMAGES, COL_YEAR,
};
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CSV_PATH: &str = "sample_disasters.csv";
const PARQUET_PATH: &str = "sample_disasters.parquet";

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Log-uniform draw in `[10^lo, 10^hi)`.
    fn log_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        10f64.powf(lo + (hi - lo) * self.next_f64()).round()
    }
}

/// One output row; field names follow the source dataset's headers.
#[derive(Serialize)]
struct SampleRow {
    #[serde(rename = "Dis No")]
    dis_no: String,
    #[serde(rename = "Year")]
    year: i64,
    #[serde(rename = "Disaster Type")]
    disaster_type: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Total Affected")]
    total_affected: Option<f64>,
    #[serde(rename = "Total Damages ('000 US$)")]
    total_damages: Option<f64>,
    #[serde(rename = "Latitude")]
    latitude: Option<String>,
    #[serde(rename = "Longitude")]
    longitude: Option<String>,
}

/// (region, latitude centre, longitude centre)
const REGIONS: [(&str, f64, f64); 6] = [
    ("Southern Asia", 23.0, 80.0),
    ("South-Eastern Asia", 10.0, 110.0),
    ("Caribbean", 18.0, -72.0),
    ("Western Europe", 48.0, 5.0),
    ("Eastern Africa", -2.0, 36.0),
    ("South America", -15.0, -60.0),
];

const DISASTER_TYPES: [&str; 7] = [
    "Flood",
    "Storm",
    "Earthquake",
    "Drought",
    "Epidemic",
    "Mass movement (wet)",
    "Volcanic activity",
];

fn generate(rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for year in 1900..=2021i64 {
        // Recorded events grow over the century.
        let per_year = 1 + (year - 1900) as usize / 8 + rng.below(3);
        for seq in 0..per_year {
            let (region, lat, lon) = REGIONS[rng.below(REGIONS.len())];
            let disaster_type = DISASTER_TYPES[rng.below(DISASTER_TYPES.len())];

            let total_affected = (rng.next_f64() > 0.25).then(|| rng.log_uniform(1.0, 6.5));
            let total_damages = (rng.next_f64() > 0.6).then(|| rng.log_uniform(2.0, 7.0));

            // Mostly clean coordinates, some blank, a few unparseable.
            let (latitude, longitude) = match rng.below(10) {
                0..=5 => (
                    Some(format!("{:.4}", lat + (rng.next_f64() - 0.5) * 10.0)),
                    Some(format!("{:.4}", lon + (rng.next_f64() - 0.5) * 10.0)),
                ),
                6 => (Some(format!("{lat:.1} N")), Some(format!("{lon:.1}"))),
                _ => (None, None),
            };

            rows.push(SampleRow {
                dis_no: format!("{year}-{seq:04}"),
                year,
                disaster_type: disaster_type.to_string(),
                region: region.to_string(),
                total_affected,
                total_damages,
                latitude,
                longitude,
            });
        }
    }
    rows
}

fn write_csv(rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating sample CSV")?;
    for row in rows {
        writer.serialize(row).context("writing sample CSV row")?;
    }
    writer.flush().context("flushing sample CSV")?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_YEAR, DataType::Int64, false),
        Field::new(COL_DISASTER_TYPE, DataType::Utf8, false),
        Field::new(COL_REGION, DataType::Utf8, false),
        Field::new(COL_TOTAL_AFFECTED, DataType::Float64, true),
        Field::new(COL_TOTAL_DAMAGES, DataType::Float64, true),
        Field::new(COL_LATITUDE, DataType::Utf8, true),
        Field::new(COL_LONGITUDE, DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.disaster_type.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.region.as_str()))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.total_affected))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.total_damages))),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.latitude.as_deref()))),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.longitude.as_deref()))),
        ],
    )
    .context("building sample record batch")?;

    let file = File::create(PARQUET_PATH).context("creating sample Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!(
        "Wrote {} events (1900-2021) to {CSV_PATH} and {PARQUET_PATH}",
        rows.len()
    );
    Ok(())
}
