use crate::config::Config;
use crate::events::GameContext;
use crate::services::GameHost;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, error, info, warn};

// Console commands the game client understands
const CMD_DISCONNECT: &str = "disconnect";
const CMD_QUIT: &str = "quit";
const CMD_QUIT_FALLBACK: &str = "unreal_command quit";
const CMD_OPEN_MAIN_MENU: &str = "unreal_command open MainMenu";

/// How far the escalation has progressed.
///
/// There is no explicit way back to `AtMatch`: the stage only gates the
/// quit branch, and a later trigger observed in a live match simply takes
/// the leave-match arm again, so the machine self-corrects against the
/// ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AtMatch,
    AtMenu,
}

#[derive(Debug)]
struct EscalationState {
    stage: Stage,
    last_trigger: Option<Instant>,
}

/// Consequence of one trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitAction {
    LeaveMatch,
    QuitApplication,
}

fn decide(stage: Stage, context: &GameContext) -> ExitAction {
    if context.is_in_match() {
        ExitAction::LeaveMatch
    } else if stage == Stage::AtMenu || context.is_menu_like() {
        ExitAction::QuitApplication
    } else {
        // Not in a match but not recognizably at the menu either (freeplay):
        // start with the milder step.
        ExitAction::LeaveMatch
    }
}

/// Decides what a combo press means and issues graduated exit commands.
pub struct EscalationController {
    config: Arc<Config>,
    host: Arc<dyn GameHost>,
    state: Mutex<EscalationState>,
    enabled: AtomicBool,
}

impl EscalationController {
    pub fn new(config: Arc<Config>, host: Arc<dyn GameHost>) -> Self {
        Self {
            enabled: AtomicBool::new(config.escalation.enabled),
            config,
            host,
            state: Mutex::new(EscalationState {
                stage: Stage::AtMatch,
                last_trigger: None,
            }),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        info!("Rage quit {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Instant of the most recent handled trigger.
    pub fn last_trigger(&self) -> Option<Instant> {
        self.state.lock().last_trigger
    }

    #[cfg(test)]
    fn stage(&self) -> Stage {
        self.state.lock().stage
    }

    /// Handle one detected combo press. Never returns an error: failures are
    /// logged and covered by retries or the scheduled fallbacks.
    pub async fn on_trigger(&self) {
        if !self.is_enabled() {
            debug!("Combo press ignored: rage quit is disabled");
            return;
        }

        let context = self.host.context();
        let action = {
            let mut state = self.state.lock();
            state.last_trigger = Some(Instant::now());
            let action = decide(state.stage, &context);
            if action == ExitAction::LeaveMatch {
                state.stage = Stage::AtMenu;
            }
            action
        };

        info!("Combo press while {}: {:?}", context, action);

        match action {
            ExitAction::LeaveMatch => self.leave_match(&context).await,
            ExitAction::QuitApplication => self.quit_application().await,
        }
    }

    async fn leave_match(&self, context: &GameContext) {
        self.host.notify("Rage Quit", "Exiting to main menu...", 2.0);

        if context.is_in_match() {
            if let Err(e) = self.host.run_command(CMD_DISCONNECT).await {
                // best effort: one direct retry, no retry loop
                warn!("Disconnect failed ({}), retrying once", e);
                if let Err(e) = self.host.run_command(CMD_DISCONNECT).await {
                    error!("Disconnect retry failed: {}", e);
                }
            }
        }

        // Give the disconnect time to settle before forcing navigation
        self.schedule_command(
            self.config.escalation.menu_fallback_delay_ms,
            CMD_OPEN_MAIN_MENU,
        );
    }

    async fn quit_application(&self) {
        self.host.notify("Rage Quit", "Exiting game...", 1.0);

        if let Err(e) = self.host.run_command(CMD_QUIT).await {
            // The one case where local recovery is skipped: the user asked to
            // quit and the primary path is gone, so nothing milder will do.
            error!("Primary quit failed ({}), terminating the game client directly", e);
            self.host.terminate_process();
            return;
        }

        self.schedule_command(self.config.escalation.quit_retry_delay_ms, CMD_QUIT_FALLBACK);
        self.schedule_window_close(self.config.escalation.window_close_delay_ms);
    }

    /// Detached fallback: issue a command after a delay. Not cancellable; a
    /// failure after the game already quit is expected and only logged.
    fn schedule_command(&self, delay_ms: u64, command: &'static str) {
        let host = Arc::clone(&self.host);
        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            debug!("Issuing fallback command: {:?}", command);
            if let Err(e) = host.run_command(command).await {
                warn!("Fallback command {:?} failed: {}", command, e);
            }
        });
    }

    fn schedule_window_close(&self, delay_ms: u64) {
        let host = Arc::clone(&self.host);
        let title = self.config.escalation.window_title.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            match host.find_window(&title).await {
                Some(handle) => {
                    info!("Asking the window manager to close {:?} ({})", title, handle);
                    if let Err(e) = host.close_window(&handle).await {
                        warn!("Window close failed: {}", e);
                    }
                }
                // fallback of a fallback, a miss is fine
                None => debug!("Window {:?} not found, nothing to close", title),
            }
        });
    }
}
