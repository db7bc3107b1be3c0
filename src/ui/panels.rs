use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year range
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(bounds) = state.store.as_ref().and_then(|s| s.year_bounds()) else {
        ui.label(state.placeholder().unwrap_or_default());
        return;
    };

    ui.strong("Select Year Range");
    let years = bounds.lower()..=bounds.upper();
    let from = ui.add(egui::Slider::new(&mut state.lower, years.clone()).text("from"));
    let to = ui.add(egui::Slider::new(&mut state.upper, years).text("to"));

    // Dragging `from` past `to` carries `to` along.
    if from.changed() && state.lower > state.upper {
        state.upper = state.lower;
    }
    if from.changed() || to.changed() {
        state.refilter();
    }

    ui.separator();
    if ui.button("Whole dataset").clicked() {
        state.lower = bounds.lower();
        state.upper = bounds.upper();
        state.refilter();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(store), Some(snap)) = (&state.store, &state.snapshot) {
            ui.label(format!(
                "{} events loaded, {} in {}–{}",
                store.len(),
                snap.summary.event_count,
                snap.range.lower(),
                snap.range.upper()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open disaster dataset")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
