use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::RelationshipMode;
use crate::data::aggregate::options;
use crate::data::filter::FILTER_COLUMNS;
use crate::state::AppState;

/// Label of the "no constraint" entry in filter selectors.
pub const ALL: &str = "All";
/// Label of the unset entry in the X / Y selectors.
pub const SELECT: &str = "Select…";
/// Label of the unset entry in the optional column selectors.
pub const NONE: &str = "None";

fn filter_label(column: &str) -> &str {
    match column {
        "type" => "Type",
        "release_year" => "Release year",
        "country" => "Country",
        other => other,
    }
}

/// A combo box over `choices` plus an unset entry. Returns the new value
/// when the user picked something different.
fn choice_combo(
    ui: &mut Ui,
    id: &str,
    unset: &str,
    choices: &[String],
    current: Option<&str>,
) -> Option<Option<String>> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.unwrap_or(unset))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), unset).clicked() && current.is_some() {
                picked = Some(None);
            }
            for choice in choices {
                let is_current = current == Some(choice.as_str());
                if ui.selectable_label(is_current, choice).clicked() && !is_current {
                    picked = Some(Some(choice.clone()));
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Left side panel – filter and column widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let columns = state.dataset.column_names.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filters");
            ui.separator();

            for col in FILTER_COLUMNS {
                let choices: Vec<String> = options(&state.dataset, col)
                    .iter()
                    .map(|v| v.to_string())
                    .collect();
                ui.strong(filter_label(col));
                let current = state.filter_value(col).map(str::to_string);
                if let Some(value) = choice_combo(ui, col, ALL, &choices, current.as_deref()) {
                    state.set_filter(col, value);
                }
                ui.add_space(4.0);
            }

            if ui.small_button("Reset filters").clicked() {
                state.clear_filters();
            }

            ui.add_space(8.0);
            ui.heading("Relationship");
            ui.separator();

            let mut mode = state.selection.mode;
            for m in RelationshipMode::ALL {
                ui.radio_value(&mut mode, m, m.label());
            }
            if mode != state.selection.mode {
                state.set_mode(mode);
            }

            ui.strong("X column");
            let x = state.selection.x.clone();
            if let Some(value) = choice_combo(ui, "x_column", SELECT, &columns, x.as_deref()) {
                state.set_x(value);
            }

            ui.strong("Y column");
            let y = state.selection.y.clone();
            if let Some(value) = choice_combo(ui, "y_column", SELECT, &columns, y.as_deref()) {
                state.set_y(value);
            }

            ui.strong("Color by");
            let color = state.selection.color_by.clone();
            if let Some(value) = choice_combo(ui, "color_by", NONE, &columns, color.as_deref()) {
                state.set_color_column(value);
            }

            ui.add_space(8.0);
            ui.heading("Summary");
            ui.separator();

            ui.strong("Column");
            let summary = state.summary_column.clone();
            if let Some(value) = choice_combo(ui, "summary_column", NONE, &columns, summary.as_deref()) {
                state.set_summary_column(value);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Netflix Catalog Explorer");
        ui.separator();
        ui.label(format!(
            "{} titles loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if !state.filters.is_empty() {
            ui.separator();
            let active: Vec<String> = state
                .filters
                .iter()
                .map(|(col, val)| format!("{}: {val}", filter_label(col)))
                .collect();
            ui.label(RichText::new(active.join(", ")).color(Color32::LIGHT_BLUE));
        }
    });
}
