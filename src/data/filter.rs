use serde::Serialize;

use super::error::InvalidRangeError;
use super::model::Event;

// ---------------------------------------------------------------------------
// YearRange – the single user-controlled parameter
// ---------------------------------------------------------------------------

/// Inclusive year range with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct YearRange {
    pub(crate) lower: i32,
    pub(crate) upper: i32,
}

impl YearRange {
    pub fn new(lower: i32, upper: i32) -> Result<Self, InvalidRangeError> {
        if lower > upper {
            return Err(InvalidRangeError { lower, upper });
        }
        Ok(YearRange { lower, upper })
    }

    /// Clamp a possibly inverted pair of slider values into `bounds`.
    ///
    /// When the ends cross, the lower end is pulled down to the upper end.
    pub fn clamped(lower: i32, upper: i32, bounds: YearRange) -> Self {
        let upper = upper.clamp(bounds.lower, bounds.upper);
        let lower = lower.clamp(bounds.lower, bounds.upper).min(upper);
        YearRange { lower, upper }
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lower <= year && year <= self.upper
    }
}

// ---------------------------------------------------------------------------
// FilteredView – events inside a range
// ---------------------------------------------------------------------------

/// Borrowed, immutable subset of a store's events inside one [`YearRange`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    range: YearRange,
    events: Vec<&'a Event>,
}

impl<'a> FilteredView<'a> {
    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn events(&self) -> &[&'a Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.events.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Select the events with `lower <= year <= upper`.
///
/// An inverted range is rejected rather than silently producing an empty view.
pub fn filter(
    events: &[Event],
    lower: i32,
    upper: i32,
) -> Result<FilteredView<'_>, InvalidRangeError> {
    let range = YearRange::new(lower, upper)?;
    Ok(filter_range(events, range))
}

/// Select the events inside an already-validated range.
pub fn filter_range(events: &[Event], range: YearRange) -> FilteredView<'_> {
    let events = events.iter().filter(|ev| range.contains(ev.year)).collect();
    FilteredView { range, events }
}
