//! Selects and runs exactly one transport for the process.

use std::sync::{atomic::AtomicBool, Arc};

use anyhow::Context;
use tracing::info;

use mirror_core::{DisplayManager, StaticDisplayService};

use crate::application::capture::check_video_settings;
use crate::application::hub::EventHub;
use crate::domain::config::{SessionConfig, TransportKind};
use crate::infrastructure::local_socket::LocalSocketEndpoint;
use crate::infrastructure::settings::ServerSettings;
use crate::infrastructure::ws_server::WsListener;

/// Builds the display front end from the settings' display table.
pub fn display_manager(settings: &ServerSettings) -> DisplayManager<StaticDisplayService> {
    let service = if settings.displays.is_empty() {
        StaticDisplayService::single_default()
    } else {
        StaticDisplayService::new(settings.displays.clone())
    };
    DisplayManager::new(service, settings.platform_api_level)
}

/// Runs the transport named by `config` until it finishes or `running` is
/// cleared.  The transport is never restarted.
///
/// # Errors
///
/// Returns a [`SessionFault`](crate::application::SessionFault) (wrapped in
/// context) for invalid video settings, or any bind/accept/write failure.
pub async fn run_transport(
    config: Arc<SessionConfig>,
    settings: Arc<ServerSettings>,
    hub: Arc<EventHub>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    match config.transport {
        TransportKind::DirectSocket => {
            info!("starting direct socket transport on port {}", config.port);
            let displays = display_manager(&settings);
            let display = check_video_settings(&settings.video, &displays)
                .context("invalid video settings")?;
            let endpoint =
                LocalSocketEndpoint::bind(&config, settings.video.clone(), display).await?;
            endpoint.run(hub, running).await
        }
        TransportKind::WebSocket => {
            info!(
                "starting WebSocket transport on {} ({:?})",
                config.bind_addr(),
                config.bind_scope
            );
            WsListener::bind(config)?.run(hub, running).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_core::{DisplayInfo, Size};

    #[test]
    fn test_display_manager_defaults_to_single_display() {
        let manager = display_manager(&ServerSettings::default());

        assert_eq!(manager.display_ids().unwrap(), vec![0]);
    }

    #[test]
    fn test_display_manager_uses_configured_table() {
        let mut settings = ServerSettings::default();
        settings.displays = vec![DisplayInfo {
            display_id: 7,
            size: Size::new(800, 600),
            rotation: 0,
            layer_stack: 7,
            flags: 0,
        }];

        let manager = display_manager(&settings);

        assert_eq!(manager.display_ids().unwrap(), vec![7]);
        assert!(manager.display_info(0).unwrap().is_none());
    }
}
