//! HTML page composition for the server-rendered variant.

use std::fmt::Write as _;

use serde::Deserialize;

use crate::chart::{
    relationship_chart, standing_charts, Chart, Outcome, RelationshipMode, Selection,
    NO_DATA_NOTICE,
};
use crate::data::aggregate::options;
use crate::data::filter::{apply, filter_state, FilterState, View};
use crate::data::model::Dataset;
use crate::data::stats::{describe, Summary};

use super::render::render_svg;

const TEMPLATE: &str = include_str!("./static/index.html");

/// Fields posted by the page's form. Every field is optional; empty means unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardForm {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Column to summarise.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn set(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl DashboardForm {
    pub fn filters(&self) -> FilterState {
        filter_state([
            ("type", self.content_type.as_deref()),
            ("release_year", self.release_year.as_deref()),
            ("country", self.country.as_deref()),
        ])
    }

    /// The relationship chart request, if the user touched either axis.
    pub fn selection(&self) -> Option<Selection> {
        if set(&self.x).is_none() && set(&self.y).is_none() {
            return None;
        }
        Some(Selection {
            mode: set(&self.mode)
                .map(RelationshipMode::from_label)
                .unwrap_or_default(),
            x: set(&self.x).map(str::to_string),
            y: set(&self.y).map(str::to_string),
            color_by: set(&self.color).map(str::to_string),
        })
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Build the whole page. `posted` enables the summary table, which the
/// initial GET never shows.
pub fn render_page(dataset: &Dataset, form: &DashboardForm, posted: bool) -> String {
    let filters = form.filters();
    let view = apply(dataset, &filters);
    log::info!(
        "Rendering page: filters {:?}, {} of {} rows",
        filters,
        view.len(),
        dataset.len()
    );

    let notice = if view.is_empty() {
        format!(r#"<div class="notice">{}</div>"#, html_escape(NO_DATA_NOTICE))
    } else {
        String::new()
    };

    let summary = set(&form.column)
        .filter(|_| posted)
        .and_then(|col| describe(&view, col).map(|s| summary_table(col, &s)))
        .unwrap_or_default();

    let charts: String = standing_charts(&view).iter().map(chart_html).collect();

    let relationship = form
        .selection()
        .map(|sel| relationship_html(&view, &sel))
        .unwrap_or_default();

    let status = format!("Showing {} of {} titles", view.len(), dataset.len());

    fill(
        TEMPLATE,
        &[
            ("form", filter_form(dataset, form).as_str()),
            ("status", html_escape(&status).as_str()),
            ("notice", notice.as_str()),
            ("summary", summary.as_str()),
            ("charts", charts.as_str()),
            ("relationship", relationship.as_str()),
        ],
    )
}

/// Substitute `{{key}}` placeholders in one pass, so inserted text is never
/// rescanned.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, v)) => out.push_str(v),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn select(name: &str, label: &str, unset_label: &str, choices: &[String], current: Option<&str>) -> String {
    let mut html = format!(
        r#"<label>{}<select name="{}"><option value="">{}</option>"#,
        html_escape(label),
        html_escape(name),
        html_escape(unset_label)
    );
    for choice in choices {
        let selected = if current == Some(choice.as_str()) { " selected" } else { "" };
        let escaped = html_escape(choice);
        let _ = write!(html, r#"<option value="{escaped}"{selected}>{escaped}</option>"#);
    }
    html.push_str("</select></label>");
    html
}

fn filter_form(dataset: &Dataset, form: &DashboardForm) -> String {
    let opts = |col: &str| -> Vec<String> { options(dataset, col).iter().map(|v| v.to_string()).collect() };
    let columns = &dataset.column_names;
    let modes: Vec<String> = RelationshipMode::ALL.iter().map(|m| m.label().to_string()).collect();
    let current_mode = set(&form.mode).map(RelationshipMode::from_label).unwrap_or_default();

    let mut html = String::from(r#"<form class="filters" method="post" action="/">"#);
    html.push_str(r#"<fieldset><legend>Filters</legend>"#);
    html.push_str(&select("type", "Type", "All", &opts("type"), set(&form.content_type)));
    html.push_str(&select("release_year", "Release year", "All", &opts("release_year"), set(&form.release_year)));
    html.push_str(&select("country", "Country", "All", &opts("country"), set(&form.country)));
    html.push_str("</fieldset>");

    html.push_str(r#"<fieldset><legend>Summary</legend>"#);
    html.push_str(&select("column", "Column", "None", columns, set(&form.column)));
    html.push_str("</fieldset>");

    html.push_str(r#"<fieldset><legend>Relationship</legend>"#);
    html.push_str(&select("mode", "Mode", "Auto", &modes[1..], Some(current_mode.label())));
    html.push_str(&select("x", "X", "Select…", columns, set(&form.x)));
    html.push_str(&select("y", "Y", "Select…", columns, set(&form.y)));
    html.push_str(&select("color", "Color by", "None", columns, set(&form.color)));
    html.push_str("</fieldset>");

    html.push_str(r#"<button type="submit">Apply</button></form>"#);
    html
}

fn summary_table(column: &str, summary: &Summary) -> String {
    let mut html = format!(
        r#"<h2>Summary of {}</h2><table class="summary"><tbody>"#,
        html_escape(column)
    );
    for (stat, value) in summary.rows() {
        let _ = write!(
            html,
            "<tr><th>{}</th><td>{}</td></tr>",
            html_escape(stat),
            html_escape(&value)
        );
    }
    html.push_str("</tbody></table>");
    html
}

fn chart_html(chart: &Chart) -> String {
    match render_svg(chart) {
        Ok(svg) => format!(r#"<figure class="chart">{svg}</figure>"#),
        Err(e) => {
            log::error!("Failed to render {:?} chart: {e:#}", chart.family());
            format!(
                r#"<div class="warning">Could not render "{}": {}</div>"#,
                html_escape(&chart.axes().title),
                html_escape(&format!("{e:#}"))
            )
        }
    }
}

fn relationship_html(view: &View<'_>, selection: &Selection) -> String {
    let body = match relationship_chart(view, selection) {
        Outcome::Prompt(msg) => format!(r#"<p class="prompt">{}</p>"#, html_escape(&msg)),
        Outcome::NoData => format!(r#"<div class="notice">{}</div>"#, html_escape(NO_DATA_NOTICE)),
        Outcome::Warning(msg) => format!(r#"<div class="warning">{}</div>"#, html_escape(&msg)),
        Outcome::Chart(chart) => chart_html(&chart),
    };
    format!(
        r#"<section class="relationship"><h2>Relationship ({})</h2>{body}</section>"#,
        html_escape(selection.mode.label())
    )
}
