//! Core of the disaster dashboard: typed loading, year-range filtering and
//! the derived views the charts consume.

pub mod config;
pub mod data;
