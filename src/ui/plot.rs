use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, Points};

use crate::chart::{CategoryChart, Chart, Outcome, PivotTable, XyChart, NO_DATA_NOTICE};
use crate::color::{heat, ColorMap, Rgb};
use crate::state::AppState;

use super::table::summary_table;

const PLOT_HEIGHT: f32 = 260.0;

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the charts and tables in the central panel.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.visible_indices.is_empty() {
                ui.label(RichText::new(NO_DATA_NOTICE).color(Color32::YELLOW).strong());
                ui.separator();
            }

            for (i, chart) in state.derived.standing.iter().enumerate() {
                chart_widget(ui, &format!("standing_{i}"), chart);
                ui.add_space(8.0);
            }

            if let (Some(col), Some(summary)) = (&state.summary_column, &state.derived.summary) {
                ui.heading(format!("Summary of {col}"));
                summary_table(ui, summary);
                ui.add_space(8.0);
            }

            ui.heading(format!("Relationship ({})", state.selection.mode));
            match &state.derived.relationship {
                Outcome::Prompt(msg) => {
                    ui.label(RichText::new(msg).weak().italics());
                }
                Outcome::NoData => {
                    ui.label(RichText::new(NO_DATA_NOTICE).color(Color32::YELLOW));
                }
                Outcome::Warning(msg) => {
                    ui.label(RichText::new(msg).color(Color32::RED));
                }
                Outcome::Chart(chart) => chart_widget(ui, "relationship", chart),
            }
        });
}

// ---------------------------------------------------------------------------
// Chart widgets
// ---------------------------------------------------------------------------

/// Render one chart description with its title.
pub fn chart_widget(ui: &mut Ui, id: &str, chart: &Chart) {
    ui.strong(&chart.axes().title);
    match chart {
        Chart::Bar(c) | Chart::Histogram(c) => category_plot(ui, id, c),
        Chart::Line(c) => xy_plot(ui, id, c, true),
        Chart::Scatter(c) => xy_plot(ui, id, c, false),
        Chart::Heatmap(p) => heatmap(ui, id, p),
    }
}

/// Stacked bars over category labels.
fn category_plot(ui: &mut Ui, id: &str, c: &CategoryChart) {
    let labels = c.categories.clone();
    let category_colors = ColorMap::new(c.categories.iter().cloned());
    let series_colors = ColorMap::new(c.series.iter().map(|s| s.name.clone()));

    let mut charts: Vec<BarChart> = Vec::with_capacity(c.series.len());
    for series in &c.series {
        let bars: Vec<Bar> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let bar = Bar::new(i as f64, v).width(0.7).name(&c.categories[i]);
                if c.color_by_category {
                    bar.fill(color32(category_colors.color_for(&c.categories[i])))
                } else {
                    bar
                }
            })
            .collect();

        let mut chart = BarChart::new(bars).name(&series.name);
        if !c.color_by_category {
            chart = chart.color(color32(series_colors.color_for(&series.name)));
        }
        let below: Vec<&BarChart> = charts.iter().collect();
        chart = chart.stack_on(&below);
        charts.push(chart);
    }

    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(c.axes.x_label.clone())
        .y_axis_label(c.axes.y_label.clone())
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range: &std::ops::RangeInclusive<f64>| {
            let i = mark.value.round();
            if (mark.value - i).abs() > 1e-6 || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    // The plot legend lists series only; per-category colours get their own row.
    if c.color_by_category {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (label, color) in category_colors.legend_entries() {
                ui.label(RichText::new("■").color(color32(color)));
                ui.label(RichText::new(label).small());
            }
        });
    }
}

fn xy_plot(ui: &mut Ui, id: &str, c: &XyChart, connect: bool) {
    let colors = ColorMap::new(c.series.iter().map(|s| s.name.clone()));
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(c.axes.x_label.clone())
        .y_axis_label(c.axes.y_label.clone())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for series in &c.series {
                let color = color32(colors.color_for(&series.name));
                let points: Vec<[f64; 2]> = series.points.iter().map(|&(x, y)| [x, y]).collect();
                if connect {
                    plot_ui.line(Line::new(points.clone()).name(&series.name).color(color).width(1.5));
                }
                plot_ui.points(
                    Points::new(points)
                        .name(&series.name)
                        .color(color)
                        .radius(if connect { 2.5 } else { 3.5 }),
                );
            }
        });
}

/// Count grid painted cell by cell.
fn heatmap(ui: &mut Ui, id: &str, p: &PivotTable) {
    let nx = p.x_labels.len();
    let ny = p.y_labels.len();
    let cell_size = 42.0;
    let label_width = 140.0;
    let header_height = 60.0;
    let max = p.max_count();

    ui.label(
        RichText::new(format!("{} (columns) × {} (rows)", p.axes.x_label, p.axes.y_label))
            .weak()
            .size(12.0),
    );

    ScrollArea::horizontal().id_salt(id).show(ui, |ui: &mut Ui| {
        let (rect, _response) = ui.allocate_exact_size(
            egui::vec2(
                label_width + nx as f32 * cell_size + 20.0,
                header_height + ny as f32 * cell_size + 20.0,
            ),
            egui::Sense::hover(),
        );
        let painter = ui.painter();
        let text_color = ui.visuals().text_color();

        for (j, name) in p.x_labels.iter().enumerate() {
            painter.text(
                rect.min + egui::vec2(label_width + j as f32 * cell_size + cell_size / 2.0, header_height - 8.0),
                egui::Align2::CENTER_BOTTOM,
                name.chars().take(16).collect::<String>(),
                egui::FontId::proportional(10.0),
                text_color,
            );
        }

        for (i, row_name) in p.y_labels.iter().enumerate() {
            painter.text(
                rect.min + egui::vec2(label_width - 8.0, header_height + i as f32 * cell_size + cell_size / 2.0),
                egui::Align2::RIGHT_CENTER,
                row_name.chars().take(24).collect::<String>(),
                egui::FontId::proportional(11.0),
                text_color,
            );

            for (j, &count) in p.counts[i].iter().enumerate() {
                let cell_rect = egui::Rect::from_min_size(
                    rect.min + egui::vec2(label_width + j as f32 * cell_size, header_height + i as f32 * cell_size),
                    egui::vec2(cell_size, cell_size),
                );
                painter.rect_filled(cell_rect.shrink(1.0), 4.0, color32(heat(count, max)));
                painter.text(
                    cell_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    count.to_string(),
                    egui::FontId::proportional(11.0),
                    if count * 2 > max { Color32::WHITE } else { Color32::BLACK },
                );
            }
        }
    });
}
