use crate::config::Config;
use crate::error::Result;
use crate::events::{GameContext, HostEvent, KeyCode, WindowHandle};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Everything the escalation core needs from the game side.
///
/// The real implementation bridges to a running game client; the dry-run
/// implementation emulates one. Observability operations (`notify`) are
/// fire-and-forget; command delivery reports failure so callers can decide
/// between retrying and relying on already-scheduled fallbacks.
#[async_trait::async_trait]
pub trait GameHost: Send + Sync {
    /// Instantaneous key-down status. A failed read counts as "not pressed".
    fn key_down(&self, key: KeyCode) -> bool;

    /// Last known game context, all flags captured together.
    fn context(&self) -> GameContext;

    /// Send one console command line to the game client.
    async fn run_command(&self, command: &str) -> Result<()>;

    /// Best-effort user notification.
    fn notify(&self, title: &str, message: &str, duration_secs: f32);

    /// Locate the game client's top-level window by title.
    async fn find_window(&self, title: &str) -> Option<WindowHandle>;

    /// Ask the window manager to close the window.
    async fn close_window(&self, handle: &WindowHandle) -> Result<()>;

    /// Unconditional last resort: kill the game client process.
    fn terminate_process(&self);
}

/// Factory function to create the appropriate host based on the dry_run flag.
///
/// Also returns the channel on which the host delivers plugin commands
/// (manual trigger, enable/disable).
pub async fn create_host(
    config: Arc<Config>,
    dry_run: bool,
) -> Result<(Arc<dyn GameHost>, mpsc::Receiver<HostEvent>)> {
    if dry_run {
        let (host, events) = super::dry_run::DryRunHost::create();
        Ok((host as Arc<dyn GameHost>, events))
    } else {
        let (host, events) = super::remote::RemoteHost::connect(config).await?;
        Ok((host as Arc<dyn GameHost>, events))
    }
}
