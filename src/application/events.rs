// Host lifecycle events and their dispatch to the rotation controller
use crate::application::rotation_controller::RotationController;
use crate::domain::dashboard::Dashboard;
use crate::domain::filter::FilterKey;
use crate::domain::menu::MenuSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostEvent {
    /// A context menu is about to open
    BeforeMenu { settings: MenuSettings },
    /// A dashboard finished loading
    DashboardLoaded { dashboard: Dashboard },
}

#[derive(Debug)]
pub enum EventOutcome {
    /// The menu settings after augmentation, to be rendered by the host
    Menu(MenuSettings),
    /// The filter now rotating, if any
    Rotation(Option<FilterKey>),
}

pub fn dispatch(controller: &RotationController, event: HostEvent) -> EventOutcome {
    match event {
        HostEvent::BeforeMenu { mut settings } => {
            controller.handle_menu_open(&mut settings);
            EventOutcome::Menu(settings)
        }
        HostEvent::DashboardLoaded { dashboard } => {
            EventOutcome::Rotation(controller.handle_dashboard_loaded(&dashboard))
        }
    }
}
