// Main entry point - Dependency injection and the preview event loop
use std::sync::Arc;

use filter_rotation::application::events::{dispatch, HostEvent};
use filter_rotation::application::rotation_controller::RotationController;
use filter_rotation::infrastructure::config::load_config;
use filter_rotation::infrastructure::jaql_repository::JaqlRepository;
use filter_rotation::infrastructure::snapshot_host::{HostSignal, SnapshotHost};
use filter_rotation::presentation::console::{run_command, ConsoleCommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("filter_rotation=info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;

    // Create adapters (infrastructure layer)
    let repository = Arc::new(JaqlRepository::new(
        config.server.base_url.clone(),
        config.server.api_token.clone(),
        config.server.request_timeout(),
    )?);
    let (signals_tx, mut signals) = mpsc::unbounded_channel();
    let host = Arc::new(SnapshotHost::new(&config.preview.dashboard_path, signals_tx));

    // Create controller (application layer)
    let controller = RotationController::new(host.clone(), repository, config.rotation.clone());

    let mut dashboard = host.load_dashboard().await?;
    println!(
        "Previewing dashboard {} ({}) from {}",
        dashboard.title, dashboard.oid, config.preview.dashboard_path
    );
    dispatch(&controller, HostEvent::DashboardLoaded { dashboard: dashboard.clone() });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(signal) = signals.recv() => match signal {
                HostSignal::Reload => {
                    dashboard = host.load_dashboard().await?;
                    dispatch(&controller, HostEvent::DashboardLoaded { dashboard: dashboard.clone() });
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match ConsoleCommand::parse(&line) {
                    Some(command) => {
                        if !run_command(&controller, &mut dashboard, command).await? {
                            break;
                        }
                    }
                    None => println!("Commands: toggle <filter-key> | status | stop | quit"),
                }
            }
        }
    }

    controller.stop_rotation();
    Ok(())
}
