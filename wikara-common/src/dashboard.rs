//! Dashboard load pipeline and view state
//!
//! Loading fetches the submission export and the reference hierarchy
//! together and joins them. Both fetches succeed or the whole load fails;
//! a failed load leaves the dashboard usable with no data.
//!
//! [`DashboardState`] owns everything the dashboard screen shows and only
//! changes through its transition methods.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::aggregate::{chart_series, selected_region, table_rows, ChartEntry, Grouping, TableRow};
use crate::join::{join, JoinedHierarchy};
use crate::pagination::{calculate_pagination, page_buttons, PageButton, PAGE_SIZE};
use crate::reference::ReferenceSource;
use crate::sheets::SheetStore;
use crate::Result;

/// Fetch both sources concurrently and join them
pub async fn load_joined(
    store: &dyn SheetStore,
    reference: &dyn ReferenceSource,
) -> Result<JoinedHierarchy> {
    let (export, regions) = tokio::try_join!(store.fetch_export(), reference.load())?;

    let joined = join(&regions, &export);
    if !joined.duplicate_ids.is_empty() {
        warn!(
            count = joined.duplicate_ids.len(),
            ids = ?joined.duplicate_ids,
            "Export contains duplicate sub-unit ids; the last row for each id was used"
        );
    }
    info!(
        regions = joined.regions.len(),
        sub_units = joined.sub_unit_count(),
        matched = joined.matched_count(),
        "Dashboard data joined"
    );

    Ok(joined)
}

/// Where the dashboard data stands
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Fetch not settled yet
    Loading,
    /// Data joined and available
    Ready(JoinedHierarchy),
    /// Load failed; the dashboard shows an empty data set
    Unavailable,
}

/// Status tag reported to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Loading,
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionOption {
    pub id: String,
    pub name: String,
}

/// Everything the dashboard screen renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub status: ViewStatus,
    pub selected_region: Option<String>,
    pub regions: Vec<RegionOption>,
    pub grouping: Grouping,
    pub chart: Vec<ChartEntry>,
    pub rows: Vec<TableRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub page_buttons: Vec<PageButton>,
    pub duplicate_ids: Vec<String>,
}

/// Dashboard screen state
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    load: LoadState,
    region: Option<String>,
    page: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    /// Fresh state: loading, no filter, first page
    pub fn new() -> Self {
        Self {
            load: LoadState::Loading,
            region: None,
            page: 1,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Leave `Loading` with the outcome of a load
    pub fn finish_load(&mut self, result: Result<JoinedHierarchy>) {
        self.load = match result {
            Ok(joined) => LoadState::Ready(joined),
            Err(e) => {
                error!("Failed to load dashboard data: {}", e);
                LoadState::Unavailable
            }
        };
    }

    /// Change the region filter; empty means all regions
    ///
    /// Always returns to the first page.
    pub fn select_region(&mut self, region: Option<&str>) {
        self.region = selected_region(region).map(str::to_string);
        self.page = 1;
    }

    /// Jump to a page, clamped to the available range
    pub fn go_to_page(&mut self, page: usize) {
        let total_rows = self.rows().len();
        self.page = calculate_pagination(total_rows, page).page;
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    fn joined(&self) -> Option<&JoinedHierarchy> {
        match &self.load {
            LoadState::Ready(joined) => Some(joined),
            LoadState::Loading | LoadState::Unavailable => None,
        }
    }

    fn rows(&self) -> Vec<TableRow> {
        self.joined()
            .map(|j| table_rows(j, self.selected_region()))
            .unwrap_or_default()
    }

    /// Compute the current view
    pub fn view(&self) -> DashboardView {
        let status = match self.load {
            LoadState::Loading => ViewStatus::Loading,
            LoadState::Ready(_) => ViewStatus::Ready,
            LoadState::Unavailable => ViewStatus::Unavailable,
        };

        let (grouping, chart) = match self.joined() {
            Some(joined) => chart_series(joined, self.selected_region()),
            None if self.region.is_some() => (Grouping::SubRegion, Vec::new()),
            None => (Grouping::Region, Vec::new()),
        };

        let rows = self.rows();
        let pagination = calculate_pagination(rows.len(), self.page);

        DashboardView {
            status,
            selected_region: self.region.clone(),
            regions: self
                .joined()
                .map(|j| {
                    j.regions
                        .iter()
                        .map(|r| RegionOption {
                            id: r.id.clone(),
                            name: r.name.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            grouping,
            chart,
            page: pagination.page,
            total_pages: pagination.total_pages,
            total_rows: rows.len(),
            page_size: PAGE_SIZE,
            has_previous: pagination.has_previous(),
            has_next: pagination.has_next(),
            page_buttons: page_buttons(pagination.page, pagination.total_pages),
            duplicate_ids: self
                .joined()
                .map(|j| j.duplicate_ids.clone())
                .unwrap_or_default(),
            rows: pagination.slice(&rows).to_vec(),
        }
    }
}
