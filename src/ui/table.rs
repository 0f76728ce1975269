use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::data::stats::Summary;

/// Two-column statistic/value table for a column summary.
pub fn summary_table(ui: &mut egui::Ui, summary: &Summary) {
    let rows = summary.rows();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(100.0).at_least(80.0)) // Statistic
        .column(Column::initial(160.0).at_least(100.0)) // Value
        .min_scrolled_height(0.0)
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("Statistic");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|mut body| {
            for (name, value) in &rows {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(*name);
                    });
                    row.col(|ui| {
                        ui.monospace(value);
                    });
                });
            }
        });
}
