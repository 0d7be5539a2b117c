use std::path::Path;

use anyhow::Result;

use crate::data::model::columns::{CLARITY, COLOR, CUT};
use crate::data::{filter, loader, Dataset, FilterReport, FilterSpec, SchemaError};
use crate::insight::{summarize, InsightRow};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Caller-side state: the current dataset, the active filter and the last
/// filtered view.
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Active filter selections.
    pub filters: FilterSpec,

    /// Result of the last `apply_filter`.
    pub filtered: Option<Dataset>,

    /// Row counts of the last `apply_filter`.
    pub last_report: Option<FilterReport>,

    /// Error message from the last failed operation.
    pub status_message: Option<String>,
}

impl Session {
    /// Load a file and make it the current dataset.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let loaded = loader::load_file(path).and_then(|ds| Ok(self.set_dataset(ds)?));
        if let Err(e) = &loaded {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
        loaded
    }

    /// Ingest a newly loaded dataset and reset filters to "everything".
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<(), SchemaError> {
        self.filters = FilterSpec::from_dataset(&dataset)?;
        self.dataset = Some(dataset);
        self.filtered = None;
        self.last_report = None;
        self.status_message = None;
        Ok(())
    }

    /// Replace the active filter.
    pub fn set_filters(&mut self, spec: FilterSpec) {
        self.filters = spec;
    }

    /// Toggle a single category in the `cut`, `color` or `clarity` filter.
    /// Other column names are ignored.
    pub fn toggle_category(&mut self, column: &str, value: &str) {
        let selected = match column {
            CUT => &mut self.filters.cuts,
            COLOR => &mut self.filters.colors,
            CLARITY => &mut self.filters.clarities,
            other => {
                log::warn!("no category filter for column '{other}'");
                return;
            }
        };
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    /// Run the active filter over the current dataset.
    ///
    /// Returns `None` when nothing is loaded.
    pub fn apply_filter(&mut self) -> Result<Option<FilterReport>, SchemaError> {
        let Some(dataset) = &self.dataset else {
            return Ok(None);
        };
        let filtered = match filter(dataset, &self.filters) {
            Ok(ds) => ds,
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
                return Err(e);
            }
        };
        let report = FilterReport::new(dataset, &filtered);
        log::info!("{report}");

        self.filtered = Some(filtered);
        self.last_report = Some(report);
        self.status_message = None;
        Ok(Some(report))
    }

    /// Insights over the filtered view (when `filtered` is set and a filter
    /// has been applied) or over the full dataset.
    pub fn insights(&self, filtered: bool) -> Result<Vec<InsightRow>, SchemaError> {
        let source = if filtered {
            self.filtered.as_ref().or(self.dataset.as_ref())
        } else {
            self.dataset.as_ref()
        };
        match source {
            Some(ds) => summarize(ds),
            None => summarize(&Dataset::default()),
        }
    }

    /// One-line status for display.
    pub fn status(&self) -> String {
        if let Some(msg) = &self.status_message {
            return msg.clone();
        }
        match (&self.dataset, &self.last_report) {
            (None, _) => "No data loaded".to_string(),
            (Some(_), Some(report)) => report.to_string(),
            (Some(ds), None) => format!("Loaded {} rows", ds.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, RangeFilter};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            ("cut".into(), Column::text(["Ideal", "Premium", "Ideal", "Good"])),
            ("color".into(), Column::text(["E", "E", "G", "H"])),
            ("clarity".into(), Column::text(["SI1", "VS2", "VS1", "SI1"])),
            ("carat".into(), Column::float(vec![0.23, 0.21, 0.9, 1.2])),
            ("price".into(), Column::float(vec![326.0, 326.0, 2750.0, 4100.0])),
        ])
        .unwrap()
    }

    #[test]
    fn fresh_session_has_no_data() {
        let session = Session::default();
        assert_eq!(session.status(), "No data loaded");
        assert_eq!(
            session.insights(false).unwrap(),
            vec![InsightRow::new("No data", "")]
        );
    }

    #[test]
    fn loading_selects_every_category() {
        let mut session = Session::default();
        session.set_dataset(dataset()).unwrap();
        assert_eq!(session.status(), "Loaded 4 rows");
        assert_eq!(session.filters.cuts.len(), 3);

        let report = session.apply_filter().unwrap().unwrap();
        assert_eq!(report, FilterReport { total: 4, kept: 4 });
    }

    #[test]
    fn toggling_narrows_the_view() {
        let mut session = Session::default();
        session.set_dataset(dataset()).unwrap();
        session.toggle_category("cut", "Premium");
        session.toggle_category("cut", "Good");
        session.apply_filter().unwrap();

        assert_eq!(session.status(), "Filtered 2 of 4 rows (50.0 %)");
        let filtered = session.filtered.as_ref().unwrap();
        assert_eq!(filtered.unique_text("cut").unwrap().len(), 1);

        // Toggling back re-selects the value.
        session.toggle_category("cut", "Good");
        assert!(session.filters.cuts.contains("Good"));
    }

    #[test]
    fn insights_follow_the_filtered_view() {
        let mut session = Session::default();
        session.set_dataset(dataset()).unwrap();
        session.set_filters(FilterSpec {
            price: RangeFilter::between(0.0, 400.0),
            ..Default::default()
        });
        session.apply_filter().unwrap();

        let all = session.insights(false).unwrap();
        let subset = session.insights(true).unwrap();
        assert_eq!(all[4].value, "326–3,087 USD (median 1,538)");
        assert_eq!(subset[4].value, "326–326 USD (median 326)");
    }

    #[test]
    fn schema_errors_surface_in_status() {
        let mut session = Session::default();
        session
            .set_dataset(Dataset::new(vec![("cut".into(), Column::text(["Ideal"]))]).unwrap())
            .unwrap();
        session.set_filters(FilterSpec {
            carat: RangeFilter::between(0.0, 1.0),
            ..Default::default()
        });
        assert!(session.apply_filter().is_err());
        assert!(session.status().starts_with("Error: "));
    }
}
