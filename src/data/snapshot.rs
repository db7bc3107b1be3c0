use serde::Serialize;

use super::aggregate::AggregateResult;
use super::error::InvalidRangeError;
use super::filter::{filter_range, YearRange};
use super::geo::{centroid, extract_points, GeoPoint};
use super::model::RecordStore;

/// Result of one recomputation pass: every derived view comes from the same
/// filtered view of the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub range: YearRange,
    pub summary: AggregateResult,
    pub points: Vec<GeoPoint>,
    pub centroid: Option<(f64, f64)>,
}

impl Snapshot {
    pub fn compute(store: &RecordStore, range: YearRange) -> Self {
        let view = filter_range(store.all(), range);
        let summary = AggregateResult::from_view(&view);
        let points = extract_points(&view);
        let centroid = centroid(&points);

        log::debug!(
            "Recomputed {}-{}: {} events, {} located",
            range.lower(),
            range.upper(),
            summary.event_count,
            points.len()
        );

        Snapshot {
            range,
            summary,
            points,
            centroid,
        }
    }

    /// Validating form of [`Snapshot::compute`].
    pub fn for_years(
        store: &RecordStore,
        lower: i32,
        upper: i32,
    ) -> Result<Self, InvalidRangeError> {
        Ok(Self::compute(store, YearRange::new(lower, upper)?))
    }

    pub fn is_empty(&self) -> bool {
        self.summary.event_count == 0
    }
}
