use std::path::Path;

use fleet_dashboard::{
    calculate_fleet_statistics, export_csv, generate_chart_data, matching_indices,
    records_for_export, ChartData, ExportOutcome, FieldName, FilterSpec, FilterValue, FleetRecord,
    FleetStatistics, Operator,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Vehicles,
}

/// The full UI state, independent of rendering.
///
/// Owns the record set and the filter list; statistics and chart series are
/// recomputed from scratch whenever either changes.
pub struct AppState {
    /// Loaded fleet (empty until the user opens a file).
    pub records: Vec<FleetRecord>,

    /// Active filters, combined with AND.
    pub filters: Vec<FilterSpec>,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub stats: FleetStatistics,
    pub charts: ChartData,

    /// Name of the file the records came from.
    pub source_name: Option<String>,

    /// Field picked in the "add filter" selector.
    pub pending_field: FieldName,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    next_filter_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            filters: Vec::new(),
            visible_indices: Vec::new(),
            stats: FleetStatistics::default(),
            charts: ChartData::default(),
            source_name: None,
            pending_field: FieldName::Marca,
            tab: Tab::Overview,
            status_message: None,
            next_filter_id: 1,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded record set. Existing filters are kept.
    pub fn set_records(&mut self, records: Vec<FleetRecord>, source_name: Option<String>) {
        self.records = records;
        self.source_name = source_name;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices`, statistics and charts.
    pub fn refilter(&mut self) {
        self.visible_indices = matching_indices(&self.records, &self.filters);
        self.stats = calculate_fleet_statistics(self.visible_records());
        self.charts = generate_chart_data(self.visible_records());
        log::debug!(
            "{} of {} records pass {} filter(s)",
            self.visible_indices.len(),
            self.records.len(),
            self.filters.len()
        );
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &FleetRecord> + '_ {
        self.visible_indices.iter().map(|&i| &self.records[i])
    }

    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Add a filter on `field` with its kind's defaults; returns the new id.
    pub fn add_filter(&mut self, field: FieldName) -> String {
        let id = format!("filter-{}", self.next_filter_id);
        self.next_filter_id += 1;
        self.filters.push(FilterSpec::for_field(id.clone(), field));
        self.refilter();
        id
    }

    /// Change a filter's operator. Ignored for unknown ids and operators not
    /// valid for the filter's kind.
    pub fn set_filter_operator(&mut self, id: &str, operator: Operator) -> bool {
        let changed = self
            .filters
            .iter_mut()
            .find(|f| f.id == id)
            .is_some_and(|f| f.set_operator(operator));
        if changed {
            self.refilter();
        }
        changed
    }

    /// Replace a filter's operand. The new value must keep the filter's kind.
    pub fn set_filter_value(&mut self, id: &str, value: FilterValue) -> bool {
        let Some(filter) = self.filters.iter_mut().find(|f| f.id == id) else {
            return false;
        };
        if filter.kind() != value.kind() {
            log::warn!(
                "Ignoring {} value for {} filter {id}",
                value.kind().as_str(),
                filter.kind().as_str()
            );
            return false;
        }
        filter.value = value;
        self.refilter();
        true
    }

    pub fn remove_filter(&mut self, id: &str) {
        let before = self.filters.len();
        self.filters.retain(|f| f.id != id);
        if self.filters.len() != before {
            self.refilter();
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    /// Export the filtered set when a filter is active, the full set otherwise.
    pub fn export_to(&mut self, path: &Path) -> ExportOutcome {
        let selection = records_for_export(&self.records, &self.filters);
        let outcome = ExportOutcome::from(export_csv(selection, path));
        match &outcome.error {
            Some(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Export failed: {e}"));
            }
            None => self.status_message = None,
        }
        outcome
    }
}
