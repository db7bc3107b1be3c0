//! Derived statistical views over a [`FilteredView`].
//!
//! Every function here is total: an empty view yields an empty collection or
//! `None`, never a panic or a division by zero.

use std::collections::BTreeMap;

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::filter::FilteredView;

/// Event count per (region, disaster type). Absent pairs are zero.
pub type RegionTypePivot = BTreeMap<(String, String), usize>;

#[derive(Serialize)]
struct PivotCell<'a> {
    region: &'a str,
    disaster_type: &'a str,
    count: usize,
}

/// Tuple keys are not valid map keys in most formats; emit a list of cells.
fn serialize_pivot<S: Serializer>(
    pivot: &RegionTypePivot,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(pivot.len()))?;
    for ((region, disaster_type), count) in pivot {
        seq.serialize_element(&PivotCell {
            region,
            disaster_type,
            count: *count,
        })?;
    }
    seq.end()
}

/// One point of the affected-people vs. damage scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactPoint {
    pub total_affected: f64,
    pub total_damages: f64,
    pub disaster_type: String,
}

/// Everything the charts need from one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub event_count: usize,
    pub mean_affected: Option<f64>,
    pub type_probabilities: BTreeMap<String, f64>,
    pub type_counts: Vec<(String, usize)>,
    pub yearly_trend: Vec<(i32, usize)>,
    #[serde(serialize_with = "serialize_pivot")]
    pub region_type_pivot: RegionTypePivot,
    pub token_frequencies: BTreeMap<String, usize>,
    pub impact: Vec<ImpactPoint>,
}

impl AggregateResult {
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        AggregateResult {
            event_count: count(view),
            mean_affected: mean_affected(view),
            type_probabilities: type_probabilities(view),
            type_counts: type_counts(view),
            yearly_trend: yearly_trend(view),
            region_type_pivot: region_type_pivot(view),
            token_frequencies: token_frequencies(view),
            impact: impact_points(view),
        }
    }
}

pub fn count(view: &FilteredView<'_>) -> usize {
    view.len()
}

/// Mean of the non-null `total_affected` values.
pub fn mean_affected(view: &FilteredView<'_>) -> Option<f64> {
    let (sum, n) = view
        .iter()
        .filter_map(|ev| ev.total_affected)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn counts_by_type(view: &FilteredView<'_>) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for ev in view.iter() {
        *counts.entry(ev.disaster_type.clone()).or_default() += 1;
    }
    counts
}

/// Share of events per disaster type; sums to 1.0 on a non-empty view.
pub fn type_probabilities(view: &FilteredView<'_>) -> BTreeMap<String, f64> {
    let total = view.len();
    if total == 0 {
        return BTreeMap::new();
    }
    counts_by_type(view)
        .into_iter()
        .map(|(ty, n)| (ty, n as f64 / total as f64))
        .collect()
}

/// Event count per disaster type, most frequent first, ties by name.
pub fn type_counts(view: &FilteredView<'_>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = counts_by_type(view).into_iter().collect();
    counts.sort_by(|(a_ty, a_n), (b_ty, b_n)| b_n.cmp(a_n).then_with(|| a_ty.cmp(b_ty)));
    counts
}

/// Event count per year present in the view, ascending by year.
pub fn yearly_trend(view: &FilteredView<'_>) -> Vec<(i32, usize)> {
    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for ev in view.iter() {
        *by_year.entry(ev.year).or_default() += 1;
    }
    by_year.into_iter().collect()
}

/// Sparse (region, disaster type) cross-tabulation.
pub fn region_type_pivot(view: &FilteredView<'_>) -> RegionTypePivot {
    let mut pivot = RegionTypePivot::new();
    for ev in view.iter() {
        *pivot
            .entry((ev.region.clone(), ev.disaster_type.clone()))
            .or_default() += 1;
    }
    pivot
}

/// Sorted distinct regions and disaster types present in `pivot`.
pub fn pivot_axes(pivot: &RegionTypePivot) -> (Vec<String>, Vec<String>) {
    let mut rows: Vec<String> = pivot.keys().map(|(region, _)| region.clone()).collect();
    rows.dedup();
    let mut cols: Vec<String> = pivot.keys().map(|(_, ty)| ty.clone()).collect();
    cols.sort();
    cols.dedup();
    (rows, cols)
}

/// Dense `rows × cols` matrix with absent combinations filled with 0.
pub fn dense_fill(pivot: &RegionTypePivot, rows: &[String], cols: &[String]) -> Vec<Vec<usize>> {
    rows.iter()
        .map(|region| {
            cols.iter()
                .map(|ty| {
                    pivot
                        .get(&(region.clone(), ty.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect()
}

/// Percentage of each disaster type within each region; each region sums to 100.
pub fn region_type_shares(pivot: &RegionTypePivot) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for ((region, _), n) in pivot {
        *totals.entry(region.as_str()).or_default() += n;
    }

    let mut shares: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for ((region, ty), n) in pivot {
        let total = totals.get(region.as_str()).copied().unwrap_or(0);
        if total == 0 {
            continue;
        }
        shares
            .entry(region.clone())
            .or_default()
            .insert(ty.clone(), *n as f64 * 100.0 / total as f64);
    }
    shares
}

/// Whitespace-token counts over every event's disaster type.
pub fn token_frequencies(view: &FilteredView<'_>) -> BTreeMap<String, usize> {
    let mut freqs: BTreeMap<String, usize> = BTreeMap::new();
    for ev in view.iter() {
        for token in ev.disaster_type.split_whitespace() {
            *freqs.entry(token.to_string()).or_default() += 1;
        }
    }
    freqs
}

/// Events with both impact metrics present and strictly positive, so they
/// can be drawn on log axes.
pub fn impact_points(view: &FilteredView<'_>) -> Vec<ImpactPoint> {
    view.iter()
        .filter_map(|ev| match (ev.total_affected, ev.total_damages) {
            (Some(affected), Some(damages)) if affected > 0.0 && damages > 0.0 => Some(ImpactPoint {
                total_affected: affected,
                total_damages: damages,
                disaster_type: ev.disaster_type.clone(),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::filter;
    use crate::data::model::{event, Event};

    fn with_metrics(mut ev: Event, affected: Option<f64>, damages: Option<f64>) -> Event {
        ev.total_affected = affected;
        ev.total_damages = damages;
        ev
    }

    fn sample() -> Vec<Event> {
        vec![
            with_metrics(event(1999, "Flood", "Asia"), Some(100.0), Some(10.0)),
            with_metrics(event(2000, "Flood", "Asia"), None, Some(5.0)),
            with_metrics(event(2000, "Storm", "Americas"), Some(300.0), None),
            with_metrics(event(2001, "Mass movement (wet)", "Asia"), Some(0.0), Some(2.0)),
            with_metrics(event(2003, "Flood", "Europe"), Some(50.0), Some(1.0)),
        ]
    }

    #[test]
    fn single_year_example() {
        let events = vec![
            event(1999, "Flood", "Asia"),
            event(2000, "Flood", "Asia"),
            event(2000, "Storm", "Asia"),
        ];
        let view = filter(&events, 2000, 2000).unwrap();

        assert_eq!(count(&view), 2);
        let probs = type_probabilities(&view);
        assert_eq!(probs.len(), 2);
        assert!((probs["Flood"] - 0.5).abs() < 1e-12);
        assert!((probs["Storm"] - 0.5).abs() < 1e-12);
        assert_eq!(yearly_trend(&view), vec![(2000, 2)]);
    }

    #[test]
    fn mean_ignores_nulls() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let mean = mean_affected(&view).unwrap();
        assert!((mean - 112.5).abs() < 1e-9);
    }

    #[test]
    fn mean_is_none_when_all_null() {
        let events = vec![event(2000, "Flood", "Asia"), event(2000, "Storm", "Asia")];
        let view = filter(&events, 2000, 2000).unwrap();
        assert_eq!(mean_affected(&view), None);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let sum: f64 = type_probabilities(&view).values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn type_counts_most_frequent_first() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        assert_eq!(
            type_counts(&view),
            vec![
                ("Flood".to_string(), 3),
                ("Mass movement (wet)".to_string(), 1),
                ("Storm".to_string(), 1),
            ]
        );
    }

    #[test]
    fn trend_is_ascending_and_sums_to_count() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let trend = yearly_trend(&view);

        assert!(trend.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(trend.iter().map(|(_, n)| n).sum::<usize>(), count(&view));
        assert_eq!(trend, vec![(1999, 1), (2000, 2), (2001, 1), (2003, 1)]);
    }

    #[test]
    fn pivot_sums_to_count_and_dense_fill_zeroes_gaps() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let pivot = region_type_pivot(&view);

        assert_eq!(pivot.values().sum::<usize>(), count(&view));
        assert_eq!(pivot.get(&("Asia".to_string(), "Flood".to_string())), Some(&2));
        assert!(!pivot.contains_key(&("Europe".to_string(), "Storm".to_string())));

        let (rows, cols) = pivot_axes(&pivot);
        assert_eq!(rows, vec!["Americas", "Asia", "Europe"]);
        assert_eq!(cols, vec!["Flood", "Mass movement (wet)", "Storm"]);

        let matrix = dense_fill(&pivot, &rows, &cols);
        assert_eq!(matrix, vec![vec![0, 0, 1], vec![2, 1, 0], vec![1, 0, 0]]);
    }

    #[test]
    fn dense_fill_follows_caller_order() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let pivot = region_type_pivot(&view);

        let rows = vec!["Oceania".to_string(), "Asia".to_string()];
        let cols = vec!["Storm".to_string(), "Flood".to_string()];
        assert_eq!(dense_fill(&pivot, &rows, &cols), vec![vec![0, 0], vec![0, 2]]);
    }

    #[test]
    fn region_shares_sum_to_hundred() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let shares = region_type_shares(&region_type_pivot(&view));

        for per_type in shares.values() {
            let total: f64 = per_type.values().sum();
            assert!((total - 100.0).abs() < 1e-9);
        }
        let asia = &shares["Asia"];
        assert!((asia["Flood"] - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tokens_split_on_whitespace() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let tokens = token_frequencies(&view);

        assert_eq!(tokens["Flood"], 3);
        assert_eq!(tokens["Mass"], 1);
        assert_eq!(tokens["movement"], 1);
        assert_eq!(tokens["(wet)"], 1);
        assert_eq!(tokens.values().sum::<usize>(), 7);
    }

    #[test]
    fn impact_keeps_positive_pairs_only() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        let impact = impact_points(&view);

        assert_eq!(impact.len(), 2);
        assert!(impact.iter().all(|p| p.total_affected > 0.0 && p.total_damages > 0.0));
    }

    #[test]
    fn empty_view_gives_sentinels() {
        let events = sample();
        let view = filter(&events, 1850, 1850).unwrap();
        let result = AggregateResult::from_view(&view);

        assert_eq!(result.event_count, 0);
        assert_eq!(result.mean_affected, None);
        assert!(result.type_probabilities.is_empty());
        assert!(result.type_counts.is_empty());
        assert!(result.yearly_trend.is_empty());
        assert!(result.region_type_pivot.is_empty());
        assert!(result.token_frequencies.is_empty());
        assert!(result.impact.is_empty());
        assert!(region_type_shares(&result.region_type_pivot).is_empty());
    }

    #[test]
    fn repeated_calls_agree() {
        let events = sample();
        let view = filter(&events, 1999, 2003).unwrap();
        assert_eq!(AggregateResult::from_view(&view), AggregateResult::from_view(&view));
    }
}
