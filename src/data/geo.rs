use serde::Serialize;

use super::filter::FilteredView;

/// A geocoded event ready for the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub disaster_type: String,
    pub year: i32,
}

/// Parse raw coordinate text. Blank, non-numeric and non-finite values yield `None`.
pub fn coerce_coordinate(raw: Option<&str>) -> Option<f64> {
    let value = raw?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Events whose latitude and longitude both coerce. Others are skipped, not reported.
pub fn extract_points(view: &FilteredView<'_>) -> Vec<GeoPoint> {
    view.iter()
        .filter_map(|ev| {
            let latitude = coerce_coordinate(ev.latitude.as_deref())?;
            let longitude = coerce_coordinate(ev.longitude.as_deref())?;
            Some(GeoPoint {
                latitude,
                longitude,
                disaster_type: ev.disaster_type.clone(),
                year: ev.year,
            })
        })
        .collect()
}

/// Mean `(latitude, longitude)` of `points`, `None` when there are none.
pub fn centroid(points: &[GeoPoint]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
    Some((lat / n, lon / n))
}
