// Host trait - calls back into the dashboard framework
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::Filter;
use async_trait::async_trait;
use serde::Serialize;

/// Options passed along with a filter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterUpdateOptions {
    pub refresh: bool,
    pub save: bool,
    #[serde(rename = "unionIfSameDimensionAndSameType")]
    pub union_if_same_dimension_and_same_type: bool,
}

impl FilterUpdateOptions {
    /// Refresh widgets without persisting, merging with any filter on the same dimension.
    pub fn rotation() -> Self {
        Self {
            refresh: true,
            save: false,
            union_if_same_dimension_and_same_type: true,
        }
    }
}

#[async_trait]
pub trait DashboardHost: Send + Sync {
    /// Persist a single named field of the dashboard
    async fn update_dashboard(&self, dashboard: &Dashboard, field: &str) -> anyhow::Result<()>;

    /// Apply a filter change to the dashboard view
    async fn update_filter(&self, filter: &Filter, options: FilterUpdateOptions) -> anyhow::Result<()>;

    /// Reload the dashboard so it goes through a fresh load lifecycle
    async fn reload(&self) -> anyhow::Result<()>;
}
