use crate::error::Result;
use crate::events::{GameContext, HostEvent, KeyCode, WindowHandle};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use super::r#trait::GameHost;

/// Emulated game host: every action succeeds and is only logged.
///
/// Emits a demo trigger every ten seconds, alternating the context between
/// "in a match" and "at the menu" so both escalation arms get exercised.
pub struct DryRunHost {
    context: RwLock<GameContext>,
}

impl DryRunHost {
    pub fn create() -> (Arc<Self>, mpsc::Receiver<HostEvent>) {
        let host = Arc::new(Self {
            context: RwLock::new(GameContext {
                in_match: true,
                ..Default::default()
            }),
        });

        let (events_tx, events_rx) = mpsc::channel(16);

        let demo = Arc::clone(&host);
        tokio::spawn(async move {
            info!("Dry-run mode - emulating the game host");

            let mut ticker = interval(Duration::from_secs(10));
            ticker.tick().await; // first tick completes immediately

            loop {
                ticker.tick().await;

                info!("Dry-run: emulating a combo press while {}", demo.context());
                if events_tx.send(HostEvent::ManualTrigger).await.is_err() {
                    break;
                }

                let mut context = demo.context.write();
                context.in_match = !context.in_match;
            }
        });

        (host, events_rx)
    }
}

#[async_trait::async_trait]
impl GameHost for DryRunHost {
    fn key_down(&self, _key: KeyCode) -> bool {
        false
    }

    fn context(&self) -> GameContext {
        *self.context.read()
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        info!("[DRY RUN] would send console command: {:?}", command);
        Ok(())
    }

    fn notify(&self, title: &str, message: &str, duration_secs: f32) {
        info!("[DRY RUN] notification: {} - {} ({}s)", title, message, duration_secs);
    }

    async fn find_window(&self, title: &str) -> Option<WindowHandle> {
        info!("[DRY RUN] would look up window {:?}", title);
        Some(WindowHandle::new("0x00000000"))
    }

    async fn close_window(&self, handle: &WindowHandle) -> Result<()> {
        info!("[DRY RUN] would close window {}", handle);
        Ok(())
    }

    fn terminate_process(&self) {
        warn!("[DRY RUN] would kill the game client process");
    }
}
