use std::path::Path;

use disaster_dash::data::{RecordStore, Snapshot, YearRange};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub store: Option<RecordStore>,

    /// Slider positions; may be inverted or out of bounds while dragging.
    pub lower: i32,
    pub upper: i32,

    /// Derived views for the current range (recomputed on change).
    pub snapshot: Option<Snapshot>,

    /// Colour per disaster type, stable across range changes.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(initial_range: (i32, i32)) -> Self {
        Self {
            store: None,
            lower: initial_range.0,
            upper: initial_range.1,
            snapshot: None,
            color_map: ColorMap::default(),
            status_message: None,
        }
    }

    /// Replace the dataset with the one at `path` (File → Open…).
    ///
    /// On failure the current dataset stays loaded and the error goes to the status bar.
    pub fn load(&mut self, path: &Path) {
        match RecordStore::load(path) {
            Ok(store) => self.set_store(store),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, rebuild colours and recompute.
    pub fn set_store(&mut self, store: RecordStore) {
        self.color_map = ColorMap::new(store.disaster_types());
        self.store = Some(store);
        self.snapshot = None;
        self.status_message = None;
        self.refilter();
    }

    /// Placeholder shown instead of sliders and charts, if there is nothing to plot.
    pub fn placeholder(&self) -> Option<&'static str> {
        match &self.store {
            None => Some("No dataset loaded."),
            Some(store) if store.is_empty() => Some("Dataset has no events"),
            Some(_) => None,
        }
    }

    /// Clamp the sliders to the dataset and recompute every derived view.
    pub fn refilter(&mut self) {
        let Some(store) = &self.store else {
            self.snapshot = None;
            return;
        };
        let Some(bounds) = store.year_bounds() else {
            self.snapshot = None;
            return;
        };

        let range = YearRange::clamped(self.lower, self.upper, bounds);
        self.lower = range.lower();
        self.upper = range.upper();

        if self.snapshot.as_ref().map(|s| s.range) != Some(range) {
            self.snapshot = Some(Snapshot::compute(store, range));
        }
    }
}
