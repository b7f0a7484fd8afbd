// Rotation controller - menu toggle, dashboard load handling and the rotation timer
use crate::application::dashboard_host::{DashboardHost, FilterUpdateOptions};
use crate::application::values_repository::{fetch_filter_values, FilterValuesRepository};
use crate::domain::dashboard::{Dashboard, ROTATING_FILTER_FIELD};
use crate::domain::filter::{Filter, FilterKey};
use crate::domain::menu::{CommandArgs, MenuItem, MenuSettings, DASHBOARD_FILTER_MENU};
use crate::domain::values_cache::ValuesCache;
use crate::infrastructure::config::RotationSettings;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Result of executing the rotate-values toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Enabled(FilterKey),
    Disabled(FilterKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationStatus {
    pub filter: FilterKey,
    pub idx: usize,
    pub values: usize,
}

struct RotationSession {
    key: FilterKey,
    filter: Filter,
    cache: ValuesCache,
    ticker: JoinHandle<()>,
}

#[derive(Default)]
struct RotationState {
    generation: u64,
    session: Option<RotationSession>,
}

impl RotationState {
    /// Cancel the active session, if any, and invalidate work tagged with the old generation.
    fn stop(&mut self) -> Option<FilterKey> {
        self.generation += 1;
        let session = self.session.take()?;
        session.ticker.abort();
        Some(session.key)
    }

    fn current(&mut self, generation: u64) -> Option<&mut RotationSession> {
        if self.generation != generation {
            return None;
        }
        self.session.as_mut()
    }
}

/// Drives value rotation for at most one filter of the dashboard view it belongs to.
pub struct RotationController {
    host: Arc<dyn DashboardHost>,
    repository: Arc<dyn FilterValuesRepository>,
    settings: RotationSettings,
    state: Arc<Mutex<RotationState>>,
}

impl RotationController {
    pub fn new(
        host: Arc<dyn DashboardHost>,
        repository: Arc<dyn FilterValuesRepository>,
        settings: RotationSettings,
    ) -> Self {
        Self {
            host,
            repository,
            settings,
            state: Arc::new(Mutex::new(RotationState::default())),
        }
    }

    /// Append the rotate-values toggle to a dashboard filter's context menu.
    /// Returns false for any other menu.
    pub fn handle_menu_open(&self, settings: &mut MenuSettings) -> bool {
        if settings.name != DASHBOARD_FILTER_MENU {
            return false;
        }

        let item = MenuItem::rotate_values(
            settings.scope.item.clone(),
            settings.scope.dashboard.clone(),
        );
        settings.items.push(item);
        true
    }

    /// Toggle rotation for the filter in `args`, persist the flag and reload the dashboard.
    pub async fn execute_toggle(&self, args: &mut CommandArgs) -> anyhow::Result<ToggleOutcome> {
        anyhow::ensure!(
            args.dashboard.is_owned() && args.filter.is_single_select(),
            "Rotate values is not available for this filter"
        );
        let key = args
            .filter
            .key()
            .ok_or_else(|| anyhow::anyhow!("Filter has no dimension key"))?;

        self.stop_rotation();

        let outcome = if args.dashboard.toggle_rotating_filter(key.clone()) {
            ToggleOutcome::Enabled(key)
        } else {
            ToggleOutcome::Disabled(key)
        };
        tracing::info!("Rotate values toggled on dashboard {}: {:?}", args.dashboard.oid, outcome);

        self.host
            .update_dashboard(&args.dashboard, ROTATING_FILTER_FIELD)
            .await?;
        self.host.reload().await?;

        Ok(outcome)
    }

    /// Start rotating the dashboard's configured filter, replacing any previous rotation.
    /// Returns the key of the rotating filter, or None when nothing valid is configured.
    ///
    /// Must be called from within a tokio runtime.
    pub fn handle_dashboard_loaded(&self, dashboard: &Dashboard) -> Option<FilterKey> {
        let mut state = self.lock_state();
        if let Some(previous) = state.stop() {
            tracing::debug!("Stopped rotation of {} on dashboard load", previous);
        }

        let key = dashboard.rotating_filter.clone()?;
        let filter = match dashboard.find_rotating_filter() {
            Some(filter) if filter.is_single_select() => filter.clone(),
            _ => {
                tracing::debug!(
                    "Rotating filter {} not found or not single-select on dashboard {}",
                    key,
                    dashboard.oid
                );
                return None;
            }
        };

        let generation = state.generation;
        let cache = ValuesCache::seeded(filter.current_member().cloned());

        self.spawn_fetch(generation, key.clone(), filter.clone(), dashboard.clone());
        let ticker = tokio::spawn(run_ticker(
            self.state.clone(),
            self.host.clone(),
            generation,
            self.settings.interval(),
        ));

        state.session = Some(RotationSession {
            key: key.clone(),
            filter,
            cache,
            ticker,
        });

        tracing::info!(
            "Rotating filter {} every {}ms",
            key,
            self.settings.interval_ms
        );
        Some(key)
    }

    /// Cancel the rotation timer and drop the values cache. Safe to call when idle.
    pub fn stop_rotation(&self) {
        if let Some(key) = self.lock_state().stop() {
            tracing::info!("Stopped rotating filter {}", key);
        }
    }

    pub fn status(&self) -> Option<RotationStatus> {
        let state = self.lock_state();
        state.session.as_ref().map(|session| RotationStatus {
            filter: session.key.clone(),
            idx: session.cache.position(),
            values: session.cache.len(),
        })
    }

    fn spawn_fetch(&self, generation: u64, key: FilterKey, filter: Filter, dashboard: Dashboard) {
        let repository = self.repository.clone();
        let state = self.state.clone();
        let max_values = self.settings.max_values_to_load;

        tokio::spawn(async move {
            match fetch_filter_values(repository.as_ref(), &filter, &dashboard, max_values).await {
                Ok(values) => apply_values(&state, generation, &key, values),
                Err(e) => tracing::error!("Failed to load values for filter {}: {}", key, e),
            }
        });
    }

    fn lock_state(&self) -> MutexGuard<'_, RotationState> {
        lock(&self.state)
    }
}

impl Drop for RotationController {
    fn drop(&mut self) {
        self.lock_state().stop();
    }
}

fn lock(state: &Mutex<RotationState>) -> MutexGuard<'_, RotationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_values(state: &Mutex<RotationState>, generation: u64, key: &FilterKey, values: Vec<Value>) {
    let mut state = lock(state);
    let Some(session) = state.current(generation) else {
        tracing::debug!("Discarding values for {} from a superseded rotation", key);
        return;
    };

    let count = values.len();
    if session.cache.replace_values(values) {
        tracing::debug!("Loaded {} values for filter {}", count, key);
    } else {
        tracing::warn!("No values returned for filter {}, keeping current selection", key);
    }
}

async fn run_ticker(
    state: Arc<Mutex<RotationState>>,
    host: Arc<dyn DashboardHost>,
    generation: u64,
    period: Duration,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let filter = {
            let mut state = lock(&state);
            let Some(session) = state.current(generation) else {
                break;
            };
            let Some(value) = session.cache.advance().cloned() else {
                continue;
            };
            session.filter.select_member(value);
            session.filter.clone()
        };

        if let Err(e) = host.update_filter(&filter, FilterUpdateOptions::rotation()).await {
            tracing::warn!("Failed to apply rotated filter value: {}", e);
        }
    }
}
