use std::collections::BTreeMap;

use disaster_dash::data::aggregate::{dense_fill, pivot_axes, region_type_shares};
use disaster_dash::data::Snapshot;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::{coolwarm, ColorMap};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 320.0;
const WORD_CLOUD_LIMIT: usize = 60;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current snapshot.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(snap) = &state.snapshot else {
        let message = match state.placeholder() {
            Some(message) if state.store.is_some() => message,
            _ => "Open a dataset to begin  (File → Open…)",
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return;
    };
    let colors = &state.color_map;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Natural Disaster Data Visualization");
            ui.label(RichText::new("Explore the impact of natural disasters worldwide!").italics());
            ui.add_space(8.0);

            key_statistics(ui, snap);

            if snap.is_empty() {
                ui.add_space(8.0);
                ui.label("No disaster events in the selected years.");
                return;
            }

            frequency_chart(ui, snap, colors);
            trend_chart(ui, snap);
            impact_chart(ui, snap, colors);
            region_heatmap(ui, snap);
            word_cloud(ui, snap);
            region_shares(ui, snap);
            location_map(ui, snap, colors);
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.separator();
    ui.heading(title);
}

/// `1234567.8` → `"1,234,568"`.
fn thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 {
        out.insert(0, '-');
    }
    out
}

fn group_by_type<'a>(
    items: impl Iterator<Item = (&'a str, [f64; 2])>,
) -> BTreeMap<&'a str, Vec<[f64; 2]>> {
    let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for (ty, point) in items {
        groups.entry(ty).or_default().push(point);
    }
    groups
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn key_statistics(ui: &mut Ui, snap: &Snapshot) {
    let summary = &snap.summary;
    section(ui, "Key Statistics");

    ui.label(format!(
        "Total disaster events ({} - {}): {}",
        snap.range.lower(),
        snap.range.upper(),
        summary.event_count
    ));
    let mean = summary
        .mean_affected
        .map(thousands)
        .unwrap_or_else(|| "no data".to_string());
    ui.label(format!("Average affected per event: {mean}"));

    if summary.type_counts.is_empty() {
        return;
    }
    ui.label("Probability of occurrence per disaster type:");
    ui.push_id("probabilities", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(180.0))
            .column(Column::auto().at_least(90.0))
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Disaster Type");
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("Probability");
                });
            })
            .body(|mut body| {
                for (ty, _) in &summary.type_counts {
                    let p = summary.type_probabilities.get(ty).copied().unwrap_or(0.0);
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(ty);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format!("{p:.4}"));
                        });
                    });
                }
            });
    });
}

fn frequency_chart(ui: &mut Ui, snap: &Snapshot, colors: &ColorMap) {
    section(ui, "Number of Events per Disaster Type");

    Plot::new("frequency_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Number of Events")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (ty, n)) in snap.summary.type_counts.iter().enumerate() {
                let bar = Bar::new(i as f64, *n as f64).width(0.7).name(ty);
                let chart = BarChart::new(vec![bar]).name(ty).color(colors.color_for(ty));
                plot_ui.bar_chart(chart);
            }
        });
}

fn trend_chart(ui: &mut Ui, snap: &Snapshot) {
    section(ui, "Natural Disaster Trend per Year");

    let series: Vec<[f64; 2]> = snap
        .summary
        .yearly_trend
        .iter()
        .map(|&(year, n)| [year as f64, n as f64])
        .collect();

    Plot::new("trend_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            plot_ui.points(Points::new(series).radius(3.0).color(Color32::LIGHT_BLUE));
        });
}

fn impact_chart(ui: &mut Ui, snap: &Snapshot, colors: &ColorMap) {
    section(ui, "Impact Analysis: Affected People vs. Damage");

    if snap.summary.impact.is_empty() {
        ui.label("No events report both affected people and damage.");
        return;
    }

    let groups = group_by_type(snap.summary.impact.iter().map(|p| {
        (
            p.disaster_type.as_str(),
            [p.total_affected.log10(), p.total_damages.log10()],
        )
    }));

    Plot::new("impact_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("log10 Total Affected")
        .y_axis_label("log10 Total Damages ('000 US$)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (ty, points) in groups {
                plot_ui.points(
                    Points::new(points)
                        .radius(3.0)
                        .color(colors.color_for(ty))
                        .name(ty),
                );
            }
        });
}

fn region_heatmap(ui: &mut Ui, snap: &Snapshot) {
    section(ui, "Heatmap: Disaster Occurrence by Region");

    let pivot = &snap.summary.region_type_pivot;
    let (rows, cols) = pivot_axes(pivot);
    let matrix = dense_fill(pivot, &rows, &cols);
    let max = matrix.iter().flatten().copied().max().unwrap_or(0);

    ui.push_id("heatmap", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .vscroll(false)
            .column(Column::auto().at_least(160.0))
            .columns(Column::auto().at_least(70.0), cols.len())
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Region");
                });
                for ty in &cols {
                    header.col(|ui: &mut Ui| {
                        ui.strong(ty);
                    });
                }
            })
            .body(|mut body| {
                for (region, counts) in rows.iter().zip(&matrix) {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(region);
                        });
                        for &n in counts {
                            let t = if max == 0 { 0.0 } else { n as f32 / max as f32 };
                            row.col(|ui: &mut Ui| {
                                ui.label(
                                    RichText::new(format!(" {n} "))
                                        .background_color(coolwarm(t))
                                        .color(Color32::BLACK),
                                );
                            });
                        }
                    });
                }
            });
    });
}

fn word_cloud(ui: &mut Ui, snap: &Snapshot) {
    section(ui, "Most Frequent Disaster Types");

    let mut words: Vec<(&String, &usize)> = snap.summary.token_frequencies.iter().collect();
    words.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    words.truncate(WORD_CLOUD_LIMIT);
    let max = words.first().map(|(_, n)| **n).unwrap_or(1).max(1);

    egui::Frame::dark_canvas(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (word, n) in words {
                let t = *n as f32 / max as f32;
                ui.label(RichText::new(word).size(12.0 + 36.0 * t).color(coolwarm(t)));
            }
        });
    });
}

fn region_shares(ui: &mut Ui, snap: &Snapshot) {
    section(ui, "Probability Distribution of Disasters by Region");

    let shares = region_type_shares(&snap.summary.region_type_pivot);
    let (_, cols) = pivot_axes(&snap.summary.region_type_pivot);

    ui.push_id("region_shares", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(160.0))
            .columns(Column::auto().at_least(70.0), cols.len())
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("Region");
                });
                for ty in &cols {
                    header.col(|ui: &mut Ui| {
                        ui.strong(ty);
                    });
                }
            })
            .body(|mut body| {
                for (region, per_type) in &shares {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(region);
                        });
                        for ty in &cols {
                            let pct = per_type.get(ty).copied().unwrap_or(0.0);
                            row.col(|ui: &mut Ui| {
                                ui.label(format!("{pct:.1}%"));
                            });
                        }
                    });
                }
            });
    });
}

fn location_map(ui: &mut Ui, snap: &Snapshot, colors: &ColorMap) {
    section(ui, "Disaster Locations Map");

    let Some((center_lat, center_lon)) = snap.centroid else {
        ui.label("No valid location data available for mapping.");
        return;
    };
    ui.label(format!(
        "{} located events, centred on {center_lat:.2}, {center_lon:.2}",
        snap.points.len()
    ));

    let groups = group_by_type(
        snap.points
            .iter()
            .map(|p| (p.disaster_type.as_str(), [p.longitude, p.latitude])),
    );

    Plot::new("location_map")
        .height(480.0)
        .data_aspect(1.0)
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .show(ui, |plot_ui| {
            for (ty, points) in groups {
                plot_ui.points(
                    Points::new(points)
                        .radius(4.0)
                        .color(colors.color_for(ty).gamma_multiply(0.6))
                        .name(ty),
                );
            }
            plot_ui.points(
                Points::new(vec![[center_lon, center_lat]])
                    .shape(MarkerShape::Cross)
                    .radius(8.0)
                    .color(Color32::WHITE)
                    .name("Centroid"),
            );
        });
}
