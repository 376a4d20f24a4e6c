use std::path::Path;

use crate::color::ChartColors;
use crate::config::DashboardConfig;
use crate::data::filter::filter;
use crate::data::loader::{write_csv, LoadError};
use crate::data::model::{Dataset, Dimension, FieldValue};
use crate::data::selection::{Selection, SelectionError};
use crate::data::summary::Summary;

// ---------------------------------------------------------------------------
// Selection events
// ---------------------------------------------------------------------------

/// A user interaction with the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Toggle {
        dimension: Dimension,
        value: FieldValue,
        active: bool,
    },
    SelectAll(Dimension),
    SelectNone(Dimension),
    Reset,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub dataset: Dataset,

    pub config: DashboardConfig,

    /// Checked values per dimension.
    pub selection: Selection,

    /// KPIs and chart tables for the current selection.
    pub summary: Summary,

    /// Category colours, fixed for the whole session.
    pub colors: ChartColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with everything selected.
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let selection = Selection::all(dataset.options());
        let summary = Summary::compute(&filter(&dataset, &selection), &config);
        let colors = ChartColors::new(&dataset);
        Self {
            dataset,
            config,
            selection,
            summary,
            colors,
            status_message: None,
        }
    }

    /// Apply one interaction and recompute the view and every aggregation.
    ///
    /// A rejected toggle leaves both the selection and the summary unchanged.
    pub fn on_selection_change(&mut self, event: SelectionEvent) -> Result<(), SelectionError> {
        match &event {
            SelectionEvent::Toggle {
                dimension,
                value,
                active,
            } => self.selection.toggle(*dimension, value, *active)?,
            SelectionEvent::SelectAll(dim) => self.selection.select_all(*dim),
            SelectionEvent::SelectNone(dim) => self.selection.select_none(*dim),
            SelectionEvent::Reset => self.selection.reset(),
        }
        self.refresh();
        log::debug!(
            "{event:?}: {} of {} records visible",
            self.summary.visible_indices.len(),
            self.dataset.len()
        );
        Ok(())
    }

    /// Dispatch a batch of events collected during one frame.
    pub fn apply_events(&mut self, events: Vec<SelectionEvent>) {
        for event in events {
            match self.on_selection_change(event) {
                Ok(()) => self.status_message = None,
                Err(e) => {
                    log::warn!("Ignoring selection change: {e}");
                    self.status_message = Some(format!("Error: {e}"));
                }
            }
        }
    }

    fn refresh(&mut self) {
        let view = filter(&self.dataset, &self.selection);
        self.summary = Summary::compute(&view, &self.config);
    }

    /// Write the currently visible records to a CSV file.
    pub fn export_filtered(&self, path: &Path) -> Result<usize, LoadError> {
        let records = self
            .summary
            .visible_indices
            .iter()
            .filter_map(|&i| self.dataset.get(i));
        write_csv(path, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::tests::two_rows;

    fn state() -> AppState {
        AppState::new(two_rows(), DashboardConfig::default())
    }

    #[test]
    fn starts_unfiltered() {
        let st = state();
        assert!(st.selection.is_unfiltered());
        assert_eq!(st.summary.visible_indices, vec![0, 1]);
        assert_eq!(st.summary.kpis.count, 2);
    }

    #[test]
    fn toggle_recomputes_summary() {
        let mut st = state();
        st.on_selection_change(SelectionEvent::Toggle {
            dimension: Dimension::Year,
            value: FieldValue::Integer(2022),
            active: false,
        })
        .unwrap();

        assert_eq!(st.summary.kpis.count, 1);
        assert_eq!(st.summary.kpis.mean, 120000.0);
        assert_eq!(st.summary.kpis.top_job_title, "Data Scientist");

        st.on_selection_change(SelectionEvent::Reset).unwrap();
        assert_eq!(st.summary.kpis.count, 2);
    }

    #[test]
    fn select_none_empties_everything() {
        let mut st = state();
        st.on_selection_change(SelectionEvent::SelectNone(Dimension::Seniority))
            .unwrap();
        assert!(st.summary.is_empty());
        assert_eq!(st.summary.kpis.max, 0.0);

        st.on_selection_change(SelectionEvent::SelectAll(Dimension::Seniority))
            .unwrap();
        assert!(!st.summary.is_empty());
    }

    #[test]
    fn invalid_toggle_keeps_previous_summary() {
        let mut st = state();
        let before = st.summary.clone();
        st.apply_events(vec![SelectionEvent::Toggle {
            dimension: Dimension::CompanySize,
            value: "XL".into(),
            active: true,
        }]);
        assert_eq!(st.summary, before);
        assert!(st.status_message.as_deref().unwrap().contains("XL"));

        st.apply_events(vec![SelectionEvent::Reset]);
        assert_eq!(st.status_message, None);
    }

    #[test]
    fn export_writes_visible_rows_only() {
        let mut st = state();
        st.on_selection_change(SelectionEvent::Toggle {
            dimension: Dimension::CompanySize,
            value: "M".into(),
            active: false,
        })
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("filtered.csv");
        assert_eq!(st.export_filtered(&out).unwrap(), 1);

        let reloaded = load_file(&out).unwrap();
        assert_eq!(reloaded.records()[0].job_title, "Analyst");

        st.on_selection_change(SelectionEvent::SelectNone(Dimension::Year))
            .unwrap();
        let empty = dir.path().join("empty.csv");
        assert_eq!(st.export_filtered(&empty).unwrap(), 0);
        assert!(load_file(&empty).unwrap().is_empty());
    }
}
