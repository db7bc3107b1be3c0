//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RecordStore
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ RecordStore  │  Vec<Event>, year bounds
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  inclusive year range → FilteredView
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌───────────┐  ┌────────┐
//!   │ aggregate  │  │  geo    │  counts, trend, pivot / valid points
//!   └───────────┘  └────────┘
//!        │              │
//!        └──────┬───────┘
//!               ▼
//!         ┌──────────┐
//!         │ snapshot  │  one recomputation pass for the UI
//!         └──────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod model;
pub mod snapshot;

pub use error::{DataLoadError, InvalidRangeError};
pub use filter::{FilteredView, YearRange};
pub use model::{Event, RecordStore};
pub use snapshot::Snapshot;
