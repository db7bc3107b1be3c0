use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use super::error::DataLoadError;
use super::filter::YearRange;

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub const COL_YEAR: &str = "Year";
pub const COL_DISASTER_TYPE: &str = "Disaster Type";
pub const COL_REGION: &str = "Region";
pub const COL_TOTAL_AFFECTED: &str = "Total Affected";
pub const COL_TOTAL_DAMAGES: &str = "Total Damages ('000 US$)";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

/// Columns every input file must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_YEAR,
    COL_DISASTER_TYPE,
    COL_REGION,
    COL_TOTAL_AFFECTED,
    COL_TOTAL_DAMAGES,
    COL_LATITUDE,
    COL_LONGITUDE,
];

// ---------------------------------------------------------------------------
// Event – one row of the source table
// ---------------------------------------------------------------------------

/// A single historical disaster record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub year: i32,
    pub disaster_type: String,
    pub region: String,
    /// Non-negative when present.
    pub total_affected: Option<f64>,
    /// Thousands of US dollars. Non-negative when present.
    pub total_damages: Option<f64>,
    /// Raw text; only [`geo`](super::geo) coerces it.
    pub latitude: Option<String>,
    /// Raw text; only [`geo`](super::geo) coerces it.
    pub longitude: Option<String>,
}

// ---------------------------------------------------------------------------
// RecordStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    events: Vec<Event>,
    year_bounds: Option<YearRange>,
    disaster_types: BTreeSet<String>,
    regions: BTreeSet<String>,
}

impl RecordStore {
    /// Load a store from a file, dispatching on its extension.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        super::loader::load_file(path)
    }

    /// Build the store and its whole-dataset indices from typed events.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut disaster_types = BTreeSet::new();
        let mut regions = BTreeSet::new();
        let mut bounds: Option<(i32, i32)> = None;

        for ev in &events {
            disaster_types.insert(ev.disaster_type.clone());
            regions.insert(ev.region.clone());
            bounds = Some(match bounds {
                None => (ev.year, ev.year),
                Some((lo, hi)) => (lo.min(ev.year), hi.max(ev.year)),
            });
        }

        RecordStore {
            events,
            year_bounds: bounds.map(|(lower, upper)| YearRange { lower, upper }),
            disaster_types,
            regions,
        }
    }

    /// Every event, in file order.
    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Earliest year in the dataset, `None` when empty.
    pub fn min_year(&self) -> Option<i32> {
        self.year_bounds.map(|r| r.lower)
    }

    /// Latest year in the dataset, `None` when empty.
    pub fn max_year(&self) -> Option<i32> {
        self.year_bounds.map(|r| r.upper)
    }

    /// `[min_year, max_year]` as a range, used to bound the range selector.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.year_bounds
    }

    /// Sorted distinct disaster types over the whole dataset.
    pub fn disaster_types(&self) -> &BTreeSet<String> {
        &self.disaster_types
    }

    /// Sorted distinct regions over the whole dataset.
    pub fn regions(&self) -> &BTreeSet<String> {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn event(year: i32, disaster_type: &str, region: &str) -> Event {
    Event {
        year,
        disaster_type: disaster_type.to_string(),
        region: region.to_string(),
        total_affected: None,
        total_damages: None,
        latitude: None,
        longitude: None,
    }
}
