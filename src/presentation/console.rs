// Console commands for the preview binary
use crate::application::events::{dispatch, EventOutcome, HostEvent};
use crate::application::rotation_controller::RotationController;
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::FilterKey;
use crate::domain::menu::{MenuSettings, ROTATE_FILTER_ITEM_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Toggle(FilterKey),
    Status,
    Stop,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match (verb, rest) {
            ("toggle", key) if !key.is_empty() => Some(Self::Toggle(FilterKey::new(key))),
            ("status", "") => Some(Self::Status),
            ("stop", "") => Some(Self::Stop),
            ("quit" | "exit", "") => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Run a console command against the dashboard view. Returns false when the view should close.
pub async fn run_command(
    controller: &RotationController,
    dashboard: &mut Dashboard,
    command: ConsoleCommand,
) -> anyhow::Result<bool> {
    match command {
        ConsoleCommand::Toggle(key) => toggle(controller, dashboard, &key).await?,
        ConsoleCommand::Status => match controller.status() {
            Some(status) => println!(
                "Rotating {} (value {} of {})",
                status.filter,
                status.idx + 1,
                status.values
            ),
            None => println!("No filter is rotating"),
        },
        ConsoleCommand::Stop => controller.stop_rotation(),
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Open the filter's context menu and execute the rotate-values item the way the host would.
async fn toggle(
    controller: &RotationController,
    dashboard: &mut Dashboard,
    key: &FilterKey,
) -> anyhow::Result<()> {
    let Some(filter) = dashboard.find_filter(key).cloned() else {
        println!("No filter with key {}", key);
        return Ok(());
    };

    let settings = MenuSettings::dashboard_filter(filter, dashboard.clone());
    let EventOutcome::Menu(settings) = dispatch(controller, HostEvent::BeforeMenu { settings }) else {
        return Ok(());
    };
    let Some(item) = settings.item(ROTATE_FILTER_ITEM_ID) else {
        return Ok(());
    };
    if !item.can_execute() {
        println!("Rotate values is not available for {}", key);
        return Ok(());
    }

    let mut args = item.command_args.clone();
    let outcome = controller.execute_toggle(&mut args).await?;
    println!("{:?}", outcome);
    *dashboard = args.dashboard;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ConsoleCommand::parse("toggle [Geo.Country]"),
            Some(ConsoleCommand::Toggle(FilterKey::new("[Geo.Country]")))
        );
        assert_eq!(
            ConsoleCommand::parse("  toggle   [Date.Date]/years "),
            Some(ConsoleCommand::Toggle(FilterKey::new("[Date.Date]/years")))
        );
        assert_eq!(ConsoleCommand::parse("status"), Some(ConsoleCommand::Status));
        assert_eq!(ConsoleCommand::parse("stop"), Some(ConsoleCommand::Stop));
        assert_eq!(ConsoleCommand::parse("exit"), Some(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(ConsoleCommand::parse(""), None);
        assert_eq!(ConsoleCommand::parse("toggle"), None);
        assert_eq!(ConsoleCommand::parse("status now"), None);
        assert_eq!(ConsoleCommand::parse("rotate [Geo.Country]"), None);
    }
}
