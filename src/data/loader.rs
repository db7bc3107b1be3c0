use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{
    Event, RecordStore, COL_DISASTER_TYPE, COL_REGION, COL_TOTAL_AFFECTED, COL_TOTAL_DAMAGES,
    COL_YEAR, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an event table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row naming at least the required columns
/// * `.json`         – `[{ "Year": 2000, "Disaster Type": "Flood", ... }, ...]`
/// * `.parquet`      – flat columns of string, integer or float type
pub fn load_file(path: &Path) -> Result<RecordStore, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let events = match ext.as_str() {
        "csv" => read_csv(open(path)?, b',')?,
        "tsv" => read_csv(open(path)?, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    let store = RecordStore::from_events(events);
    log::info!(
        "Loaded {} events from {} (years {:?}..={:?})",
        store.len(),
        path.display(),
        store.min_year(),
        store.max_year()
    );
    Ok(store)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Cell – an untyped source value before validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
enum Cell {
    #[default]
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Blank text counts as missing.
    fn text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn raw(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

/// The required columns of one row, in [`REQUIRED_COLUMNS`] order.
struct RawRow([Cell; 7]);

impl RawRow {
    /// Validate and type one row. `row` is the 1-based data row number.
    fn into_event(self, row: usize) -> Result<Event, DataLoadError> {
        let [year, disaster_type, region, affected, damages, latitude, longitude] = self.0;
        Ok(Event {
            year: parse_year(&year, row)?,
            disaster_type: parse_label(&disaster_type, row, COL_DISASTER_TYPE)?,
            region: parse_label(&region, row, COL_REGION)?,
            total_affected: parse_metric(&affected, row, COL_TOTAL_AFFECTED)?,
            total_damages: parse_metric(&damages, row, COL_TOTAL_DAMAGES)?,
            latitude: coordinate_text(latitude),
            longitude: coordinate_text(longitude),
        })
    }
}

fn invalid(row: usize, column: &'static str, cell: &Cell) -> DataLoadError {
    DataLoadError::InvalidField {
        row,
        column,
        value: cell.raw(),
    }
}

fn parse_year(cell: &Cell, row: usize) -> Result<i32, DataLoadError> {
    let whole = |f: f64| (f.is_finite() && f.fract() == 0.0).then_some(f as i64);
    let year = match cell {
        Cell::Integer(i) => Some(*i),
        // pandas writes integer columns with gaps as `2000.0`
        Cell::Float(f) => whole(*f),
        Cell::Text(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
        }
        Cell::Null => None,
    };
    year.and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| invalid(row, COL_YEAR, cell))
}

fn parse_label(cell: &Cell, row: usize, column: &'static str) -> Result<String, DataLoadError> {
    match cell {
        Cell::Text(s) => Ok(s.trim().to_string()),
        Cell::Integer(_) | Cell::Float(_) => Ok(cell.raw()),
        Cell::Null => Err(invalid(row, column, cell)),
    }
}

fn parse_metric(
    cell: &Cell,
    row: usize,
    column: &'static str,
) -> Result<Option<f64>, DataLoadError> {
    let value = match cell {
        Cell::Null => return Ok(None),
        Cell::Float(f) if f.is_nan() => return Ok(None),
        Cell::Integer(i) => Some(*i as f64),
        Cell::Float(f) => Some(*f),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
    };
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(invalid(row, column, cell)),
    }
}

/// Coordinates stay as text; numeric sources are rendered back to text.
fn coordinate_text(cell: Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Text(s) => Some(s),
        other => Some(other.raw()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a delimited table with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(source: R, delimiter: u8) -> Result<Vec<Event>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(source);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut indices = [0usize; 7];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or(DataLoadError::MissingColumn(column))?;
    }

    let mut events = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cells = indices.map(|idx| Cell::text(record.get(idx).unwrap_or("")));
        events.push(RawRow(cells).into_event(row_no + 1)?);
    }

    Ok(events)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Year": 2000,
///     "Disaster Type": "Flood",
///     "Region": "Southern Asia",
///     "Total Affected": 1200,
///     "Total Damages ('000 US$)": null,
///     "Latitude": "23.5",
///     "Longitude": "90.3"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Event>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(&text)
}

pub fn read_json(text: &str) -> Result<Vec<Event>, DataLoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected top-level JSON array".to_string()))?;

    let mut events = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| {
            DataLoadError::Malformed(format!("row {} is not a JSON object", i + 1))
        })?;

        let mut cells: [Cell; 7] = Default::default();
        for (cell, column) in cells.iter_mut().zip(REQUIRED_COLUMNS) {
            let value = obj.get(column).ok_or(DataLoadError::MissingColumn(column))?;
            *cell = json_to_cell(value);
        }
        events.push(RawRow(cells).into_event(i + 1)?);
    }

    Ok(events)
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Null,
        JsonValue::String(s) => Cell::text(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per required field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Event>, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let schema = builder.schema().clone();
    let mut indices = [0usize; 7];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = schema
            .index_of(column)
            .map_err(|_| DataLoadError::MissingColumn(column))?;
    }

    let reader = builder.build()?;
    let mut events = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let columns: Vec<&ArrayRef> = indices.iter().map(|&i| batch.column(i)).collect();

        for row in 0..batch.num_rows() {
            let mut cells: [Cell; 7] = Default::default();
            for (cell, col) in cells.iter_mut().zip(&columns) {
                *cell = arrow_cell(col, row)?;
            }
            let row_no = events.len() + 1;
            events.push(RawRow(cells).into_event(row_no)?);
        }
    }

    Ok(events)
}

/// Extract a single value from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Cell, DataLoadError> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|a| Cell::text(a.value(row))),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .map(|a| Cell::text(a.value(row))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| Cell::Integer(i64::from(a.value(row)))),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| Cell::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| Cell::Float(f64::from(a.value(row)))),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| Cell::Float(a.value(row))),
        other => {
            return Err(DataLoadError::Malformed(format!(
                "unsupported Parquet column type {other:?}"
            )))
        }
    };
    cell.ok_or_else(|| {
        DataLoadError::Malformed(format!("column does not match its type {:?}", col.data_type()))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::BooleanArray;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::{COL_LATITUDE, COL_LONGITUDE};

    const HEADER: &str =
        "Year,Disaster Type,Region,Total Affected,Total Damages ('000 US$),Latitude,Longitude";

    fn csv(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn csv_rows_become_typed_events() {
        let text = csv(&[
            "2000,Flood,Southern Asia,1200,350.5,23.5,90.3",
            "2001,Storm,Caribbean,,,abc,",
        ]);
        let events = read_csv(text.as_bytes(), b',').unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].year, 2000);
        assert_eq!(events[0].total_affected, Some(1200.0));
        assert_eq!(events[0].total_damages, Some(350.5));
        assert_eq!(events[0].latitude.as_deref(), Some("23.5"));
        assert_eq!(events[1].total_affected, None);
        assert_eq!(events[1].latitude.as_deref(), Some("abc"));
        assert_eq!(events[1].longitude, None);
    }

    #[test]
    fn extra_columns_and_order_do_not_matter() {
        let text = "Dis No,Longitude,Latitude,Region,Year,\
                    Total Damages ('000 US$),Disaster Type,Total Affected\n\
                    2000-0001,90.3,23.5,Southern Asia,2000,,Flood,10\n";
        let events = read_csv(text.as_bytes(), b',').unwrap();

        assert_eq!(events[0].disaster_type, "Flood");
        assert_eq!(events[0].longitude.as_deref(), Some("90.3"));
        assert_eq!(events[0].total_affected, Some(10.0));
    }

    #[test]
    fn float_years_are_accepted() {
        let text = csv(&["2000.0,Flood,Asia,,,,"]);
        let events = read_csv(text.as_bytes(), b',').unwrap();
        assert_eq!(events[0].year, 2000);
    }

    #[test]
    fn missing_column_is_reported() {
        let text = "Year,Disaster Type,Region\n2000,Flood,Asia\n";
        let err = read_csv(text.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(COL_TOTAL_AFFECTED)));
    }

    #[test]
    fn bad_year_is_reported_with_row() {
        let text = csv(&["2000,Flood,Asia,,,,", "soon,Flood,Asia,,,,"]);
        let err = read_csv(text.as_bytes(), b',').unwrap_err();
        match err {
            DataLoadError::InvalidField { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, COL_YEAR);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_or_text_metric_is_rejected() {
        let text = csv(&["2000,Flood,Asia,-5,,,"]);
        assert!(matches!(
            read_csv(text.as_bytes(), b',').unwrap_err(),
            DataLoadError::InvalidField { column: COL_TOTAL_AFFECTED, .. }
        ));

        let text = csv(&["2000,Flood,Asia,,lots,,"]);
        assert!(matches!(
            read_csv(text.as_bytes(), b',').unwrap_err(),
            DataLoadError::InvalidField { column: COL_TOTAL_DAMAGES, .. }
        ));
    }

    #[test]
    fn blank_label_is_rejected() {
        let text = csv(&["2000,,Asia,,,,"]);
        assert!(matches!(
            read_csv(text.as_bytes(), b',').unwrap_err(),
            DataLoadError::InvalidField { column: COL_DISASTER_TYPE, .. }
        ));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let text = csv(&["2000,Flood"]);
        assert!(matches!(
            read_csv(text.as_bytes(), b',').unwrap_err(),
            DataLoadError::Csv(_)
        ));
    }

    #[test]
    fn tab_delimited() {
        let row = "2010\tEarthquake\tCaribbean\t3700000\t8000000\t18.4\t-72.5";
        let text = format!("{}\n{row}\n", HEADER.replace(',', "\t"));
        let events = read_csv(text.as_bytes(), b'\t').unwrap();
        assert_eq!(events[0].disaster_type, "Earthquake");
        assert_eq!(events[0].total_damages, Some(8_000_000.0));
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"Year": 2000, "Disaster Type": "Flood", "Region": "Asia",
             "Total Affected": 10, "Total Damages ('000 US$)": null,
             "Latitude": 23.5, "Longitude": "90.3"},
            {"Year": "2001", "Disaster Type": "Storm", "Region": "Europe",
             "Total Affected": null, "Total Damages ('000 US$)": 2.5,
             "Latitude": null, "Longitude": ""}
        ]"#;
        let events = read_json(text).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].latitude.as_deref(), Some("23.5"));
        assert_eq!(events[0].total_damages, None);
        assert_eq!(events[1].year, 2001);
        assert_eq!(events[1].total_damages, Some(2.5));
        assert_eq!(events[1].longitude, None);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(read_json("{}").unwrap_err(), DataLoadError::Malformed(_)));
        assert!(matches!(read_json("[1]").unwrap_err(), DataLoadError::Malformed(_)));
        assert!(matches!(read_json("[").unwrap_err(), DataLoadError::Json(_)));
    }

    #[test]
    fn json_missing_key_is_missing_column() {
        let text = r#"[{"Year": 2000, "Disaster Type": "Flood"}]"#;
        assert!(matches!(
            read_json(text).unwrap_err(),
            DataLoadError::MissingColumn(COL_REGION)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("events.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    /// Write `batch` to a per-test Parquet file in the temp dir and load it back.
    fn load_parquet_batch(name: &str, batch: RecordBatch) -> Result<RecordStore, DataLoadError> {
        let path = std::env::temp_dir().join(format!(
            "disaster_dash_{name}_{}.parquet",
            std::process::id()
        ));
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let loaded = load_file(&path);
        std::fs::remove_file(&path).unwrap();
        loaded
    }

    #[test]
    fn parquet_columns_are_read() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_DISASTER_TYPE, DataType::Utf8, false),
            Field::new(COL_REGION, DataType::Utf8, false),
            Field::new(COL_TOTAL_AFFECTED, DataType::Float64, true),
            Field::new(COL_TOTAL_DAMAGES, DataType::Float64, true),
            Field::new(COL_LATITUDE, DataType::Utf8, true),
            Field::new(COL_LONGITUDE, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![2000, 2005])),
                Arc::new(StringArray::from(vec!["Flood", "Volcanic activity"])),
                Arc::new(StringArray::from(vec!["Asia", "Melanesia"])),
                Arc::new(Float64Array::from(vec![Some(100.0), None])),
                Arc::new(Float64Array::from(vec![None, Some(f64::NAN)])),
                Arc::new(StringArray::from(vec![Some("1.5"), None])),
                Arc::new(Float64Array::from(vec![Some(2.5), Some(167.0)])),
            ],
        )
        .unwrap();

        let store = load_parquet_batch("columns", batch).unwrap();

        let events = store.all();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].total_affected, Some(100.0));
        assert_eq!(events[0].latitude.as_deref(), Some("1.5"));
        assert_eq!(events[0].longitude.as_deref(), Some("2.5"));
        assert_eq!(events[1].disaster_type, "Volcanic activity");
        assert_eq!(events[1].total_damages, None);
        assert_eq!(events[1].latitude, None);
        assert_eq!(store.max_year(), Some(2005));
    }

    #[test]
    fn parquet_without_region_is_missing_column() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_DISASTER_TYPE, DataType::Utf8, false),
            Field::new(COL_TOTAL_AFFECTED, DataType::Float64, true),
            Field::new(COL_TOTAL_DAMAGES, DataType::Float64, true),
            Field::new(COL_LATITUDE, DataType::Utf8, true),
            Field::new(COL_LONGITUDE, DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![2000])),
                Arc::new(StringArray::from(vec!["Flood"])),
                Arc::new(Float64Array::from(vec![Some(1.0)])),
                Arc::new(Float64Array::from(vec![None::<f64>])),
                Arc::new(StringArray::from(vec![None::<&str>])),
                Arc::new(StringArray::from(vec![None::<&str>])),
            ],
        )
        .unwrap();

        let err = load_parquet_batch("no_region", batch).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(COL_REGION)));
    }

    #[test]
    fn parquet_unsupported_column_type_is_malformed() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_DISASTER_TYPE, DataType::Utf8, false),
            Field::new(COL_REGION, DataType::Boolean, false),
            Field::new(COL_TOTAL_AFFECTED, DataType::Float64, true),
            Field::new(COL_TOTAL_DAMAGES, DataType::Float64, true),
            Field::new(COL_LATITUDE, DataType::Utf8, true),
            Field::new(COL_LONGITUDE, DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![2000])),
                Arc::new(StringArray::from(vec!["Flood"])),
                Arc::new(BooleanArray::from(vec![true])),
                Arc::new(Float64Array::from(vec![Some(1.0)])),
                Arc::new(Float64Array::from(vec![None::<f64>])),
                Arc::new(StringArray::from(vec![None::<&str>])),
                Arc::new(StringArray::from(vec![None::<&str>])),
            ],
        )
        .unwrap();

        let err = load_parquet_batch("boolean_region", batch).unwrap_err();
        assert!(
            matches!(&err, DataLoadError::Malformed(msg) if msg.contains("Boolean")),
            "{err}"
        );
    }
}
