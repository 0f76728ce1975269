use crate::chart::{relationship_chart, standing_charts, Chart, Outcome, RelationshipMode, Selection};
use crate::data::filter::{filtered_indices, FilterState, View, FILTER_COLUMNS};
use crate::data::model::Dataset;
use crate::data::stats::{describe, Summary};

// ---------------------------------------------------------------------------
// Derived outputs – everything recomputed on a rerun
// ---------------------------------------------------------------------------

/// Charts and tables computed from the current selections.
pub struct Derived {
    pub standing: [Chart; 3],
    pub summary: Option<Summary>,
    pub relationship: Outcome,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Catalog loaded at startup; never modified.
    pub dataset: Dataset,

    /// Per-column equality filters (absent = "All").
    pub filters: FilterState,

    /// Indices of rows passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Relationship mode and X / Y / colour-by choices.
    pub selection: Selection,

    /// Column whose summary statistics are shown.
    pub summary_column: Option<String>,

    /// Outputs of the last rerun.
    pub derived: Derived,
}

impl AppState {
    /// Ingest the loaded dataset with no filters and nothing selected.
    pub fn new(dataset: Dataset) -> Self {
        let view = View::all(&dataset);
        let selection = Selection::default();
        let derived = Derived {
            standing: standing_charts(&view),
            summary: None,
            relationship: relationship_chart(&view, &selection),
        };
        let visible_indices = view.indices().to_vec();
        Self {
            dataset,
            filters: FilterState::new(),
            visible_indices,
            selection,
            summary_column: None,
            derived,
        }
    }

    pub fn view(&self) -> View<'_> {
        View::from_indices(&self.dataset, self.visible_indices.clone())
    }

    /// Recompute the visible rows and every derived output from scratch.
    pub fn rerun(&mut self) {
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        let view = View::from_indices(&self.dataset, self.visible_indices.clone());
        self.derived = Derived {
            standing: standing_charts(&view),
            summary: self
                .summary_column
                .as_deref()
                .and_then(|col| describe(&view, col)),
            relationship: relationship_chart(&view, &self.selection),
        };
        log::debug!(
            "Rerun: {} of {} rows visible",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Current filter value of `column`, `None` meaning "All".
    pub fn filter_value(&self, column: &str) -> Option<&str> {
        self.filters.get(column).map(String::as_str)
    }

    /// Set or clear (`None`) the filter on `column`.
    pub fn set_filter(&mut self, column: &str, value: Option<String>) {
        match value {
            Some(v) if !v.is_empty() => {
                self.filters.insert(column.to_string(), v);
            }
            _ => {
                self.filters.remove(column);
            }
        }
        self.rerun();
    }

    /// Drop every filter.
    pub fn clear_filters(&mut self) {
        for col in FILTER_COLUMNS {
            self.filters.remove(col);
        }
        self.rerun();
    }

    pub fn set_mode(&mut self, mode: RelationshipMode) {
        self.selection.mode = mode;
        self.rerun();
    }

    pub fn set_x(&mut self, column: Option<String>) {
        self.selection.x = column;
        self.rerun();
    }

    pub fn set_y(&mut self, column: Option<String>) {
        self.selection.y = column;
        self.rerun();
    }

    pub fn set_color_column(&mut self, column: Option<String>) {
        self.selection.color_by = column;
        self.rerun();
    }

    pub fn set_summary_column(&mut self, column: Option<String>) {
        self.summary_column = column;
        self.rerun();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartFamily;
    use crate::data::loader::read_csv;

    fn state() -> AppState {
        AppState::new(
            read_csv(
                "type,country,release_year\n\
                 Movie,India,2019\n\
                 Movie,Japan,2020\n\
                 TV Show,India,2021\n"
                    .as_bytes(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn starts_unfiltered_with_a_prompt() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 1, 2]);
        assert!(matches!(s.derived.relationship, Outcome::Prompt(_)));
        assert!(s.derived.summary.is_none());
    }

    #[test]
    fn filters_rerun_everything() {
        let mut s = state();
        s.set_filter("type", Some("Movie".into()));
        assert_eq!(s.visible_indices, vec![0, 1]);
        assert_eq!(s.filter_value("type"), Some("Movie"));

        s.set_filter("country", Some("Peru".into()));
        assert!(s.view().is_empty());
        assert!(s.derived.standing.iter().all(Chart::is_empty));

        s.clear_filters();
        assert_eq!(s.visible_indices.len(), 3);
        assert_eq!(s.filter_value("type"), None);
    }

    #[test]
    fn all_sentinel_clears_a_filter() {
        let mut s = state();
        s.set_filter("type", Some("Movie".into()));
        s.set_filter("type", None);
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn selections_drive_the_relationship_chart() {
        let mut s = state();
        s.set_x(Some("type".into()));
        s.set_y(Some("country".into()));
        s.set_mode(RelationshipMode::ManyToMany);
        let Outcome::Chart(chart) = &s.derived.relationship else {
            panic!("expected chart");
        };
        assert_eq!(chart.family(), ChartFamily::Heatmap);

        s.set_y(Some("release_year".into()));
        assert!(matches!(s.derived.relationship, Outcome::Warning(_)));
    }

    #[test]
    fn summary_follows_filters() {
        let mut s = state();
        s.set_summary_column(Some("release_year".into()));
        let rows = s.derived.summary.as_ref().unwrap().rows();
        assert_eq!(rows[0], ("count", "3".to_string()));
        s.set_filter("type", Some("TV Show".into()));
        let rows = s.derived.summary.as_ref().unwrap().rows();
        assert_eq!(rows[0], ("count", "1".to_string()));
    }
}
