// Snapshot host - a dashboard host backed by an exported dashboard JSON file
use crate::application::dashboard_host::{DashboardHost, FilterUpdateOptions};
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::Filter;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    Reload,
}

pub struct SnapshotHost {
    path: PathBuf,
    signals: mpsc::UnboundedSender<HostSignal>,
}

impl SnapshotHost {
    pub fn new(path: impl AsRef<Path>, signals: mpsc::UnboundedSender<HostSignal>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            signals,
        }
    }

    pub async fn load_dashboard(&self) -> anyhow::Result<Dashboard> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read dashboard snapshot {}", self.path.display()))?;
        serde_json::from_str(&raw).context("Failed to parse dashboard snapshot")
    }
}

#[async_trait]
impl DashboardHost for SnapshotHost {
    async fn update_dashboard(&self, dashboard: &Dashboard, field: &str) -> anyhow::Result<()> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read dashboard snapshot {}", self.path.display()))?;
        let mut snapshot: serde_json::Value =
            serde_json::from_str(&raw).context("Failed to parse dashboard snapshot")?;

        let updated = serde_json::to_value(dashboard)?;
        let value = updated
            .get(field)
            .cloned()
            .with_context(|| format!("Dashboard has no field {}", field))?;
        let object = snapshot
            .as_object_mut()
            .context("Dashboard snapshot is not a JSON object")?;
        object.insert(field.to_string(), value);

        tokio::fs::write(&self.path, serde_json::to_string_pretty(&snapshot)?)
            .await
            .with_context(|| format!("Failed to write dashboard snapshot {}", self.path.display()))?;

        tracing::debug!("Persisted {} on dashboard {}", field, dashboard.oid);
        Ok(())
    }

    async fn update_filter(&self, filter: &Filter, options: FilterUpdateOptions) -> anyhow::Result<()> {
        let key = filter.key().map(|k| k.to_string()).unwrap_or_default();
        let member = filter.current_member().cloned().unwrap_or_default();

        tracing::info!(
            filter = %key,
            member = %member,
            refresh = options.refresh,
            save = options.save,
            "Filter selection rotated"
        );
        Ok(())
    }

    async fn reload(&self) -> anyhow::Result<()> {
        self.signals
            .send(HostSignal::Reload)
            .context("Dashboard view is no longer listening for reloads")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::ROTATING_FILTER_FIELD;
    use crate::domain::filter::FilterKey;
    use serde_json::json;

    fn snapshot_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "filter-rotation-snapshot-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_update_dashboard_writes_only_named_field() {
        let path = snapshot_path("field");
        let original = json!({
            "oid": "d1",
            "title": "Sales",
            "layout": { "columns": [] },
            "filters": []
        });
        tokio::fs::write(&path, original.to_string()).await.unwrap();

        let (tx, _rx) = mpsc::unbounded_channel();
        let host = SnapshotHost::new(&path, tx);

        let mut dashboard = host.load_dashboard().await.unwrap();
        dashboard.title = "Renamed".to_string();
        dashboard.rotating_filter = Some(FilterKey::new("[Geo.Country]"));
        host.update_dashboard(&dashboard, ROTATING_FILTER_FIELD).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(written["title"], json!("Sales"));
        assert_eq!(written["layout"], json!({ "columns": [] }));
        assert_eq!(written[ROTATING_FILTER_FIELD], json!("[Geo.Country]"));

        let reloaded = host.load_dashboard().await.unwrap();
        assert_eq!(reloaded.rotating_filter, Some(FilterKey::new("[Geo.Country]")));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_reload_signals_view() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let host = SnapshotHost::new(snapshot_path("reload"), tx);

        host.reload().await.unwrap();
        assert_eq!(rx.recv().await, Some(HostSignal::Reload));

        drop(rx);
        assert!(host.reload().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let host = SnapshotHost::new(snapshot_path("missing"), tx);
        assert!(host.load_dashboard().await.is_err());
    }
}
