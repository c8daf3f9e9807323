//! Dashboard visits held in memory
//!
//! Opening the dashboard loads and joins both sources once. The resulting
//! [`DashboardState`] is kept under a visit id so filter and page changes
//! only recompute the view. Visits are never written anywhere and the
//! oldest are dropped once [`MAX_VISITS`] is reached.

use std::collections::BTreeMap;

use tokio::sync::Mutex;
use tracing::debug;
use wikara_common::dashboard::{DashboardState, DashboardView};

/// Open visits kept before the oldest is evicted
pub const MAX_VISITS: usize = 64;

pub type VisitId = u64;

#[derive(Default)]
struct Visits {
    next_id: VisitId,
    open: BTreeMap<VisitId, DashboardState>,
}

/// In-memory store of dashboard visits
#[derive(Default)]
pub struct DashboardVisits {
    inner: Mutex<Visits>,
}

impl DashboardVisits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a loaded dashboard and return its id
    pub async fn open(&self, dashboard: DashboardState) -> VisitId {
        let mut visits = self.inner.lock().await;
        visits.next_id += 1;
        let id = visits.next_id;
        visits.open.insert(id, dashboard);

        while visits.open.len() > MAX_VISITS {
            if let Some((evicted, _)) = visits.open.pop_first() {
                debug!(visit = evicted, "Dashboard visit evicted");
            }
        }
        id
    }

    /// Apply a change to a visit and return the recomputed view
    ///
    /// Returns `None` for an unknown or evicted visit.
    pub async fn update<F>(&self, id: VisitId, change: F) -> Option<DashboardView>
    where
        F: FnOnce(&mut DashboardState),
    {
        let mut visits = self.inner.lock().await;
        let dashboard = visits.open.get_mut(&id)?;
        change(dashboard);
        Some(dashboard.view())
    }

    /// Number of visits currently held
    pub async fn len(&self) -> usize {
        self.inner.lock().await.open.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
