use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{ComboState, KeyCode};
use crate::services::{EscalationController, GameHost};
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

/// Samples the watched key pair at a fixed cadence and turns a rising edge
/// of "both held" into exactly one escalation trigger.
pub struct ComboDetector {
    host: Arc<dyn GameHost>,
    controller: Arc<EscalationController>,
    modifier: KeyCode,
    action: KeyCode,
    poll_interval: Duration,
}

impl ComboDetector {
    pub fn new(
        config: Arc<Config>,
        host: Arc<dyn GameHost>,
        controller: Arc<EscalationController>,
    ) -> Self {
        Self {
            modifier: config.modifier_key_code(),
            action: config.action_key_code(),
            poll_interval: Duration::from_millis(config.input.poll_interval_ms),
            host,
            controller,
        }
    }

    /// Repeating poll loop; runs until the owning task is aborted at teardown.
    pub async fn run(&self) -> Result<()> {
        info!(
            "ComboDetector started: watching {} + {} every {:?}",
            self.modifier, self.action, self.poll_interval
        );

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut combo = ComboState::new();

        loop {
            ticker.tick().await;
            self.poll(&mut combo).await;
        }
    }

    /// One sample: read both key states, update the edge state, escalate on
    /// a rising edge.
    async fn poll(&self, combo: &mut ComboState) {
        let modifier_down = self.host.key_down(self.modifier);
        let action_down = self.host.key_down(self.action);

        if combo.update(modifier_down, action_down) {
            debug_if_enabled!("Combo rising edge detected");
            self.controller.on_trigger().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GameContext, WindowHandle};
    use parking_lot::Mutex;

    /// Host double whose key state is scripted by the test.
    struct KeyedHost {
        modifier: KeyCode,
        keys: Mutex<(bool, bool)>,
        commands: Mutex<Vec<String>>,
    }

    impl KeyedHost {
        fn new(config: &Config) -> Arc<Self> {
            Arc::new(Self {
                modifier: config.modifier_key_code(),
                keys: Mutex::new((false, false)),
                commands: Mutex::new(Vec::new()),
            })
        }

        fn hold(&self, modifier: bool, action: bool) {
            *self.keys.lock() = (modifier, action);
        }

        fn command_count(&self, command: &str) -> usize {
            self.commands.lock().iter().filter(|c| *c == command).count()
        }
    }

    #[async_trait::async_trait]
    impl GameHost for KeyedHost {
        fn key_down(&self, key: KeyCode) -> bool {
            let (modifier, action) = *self.keys.lock();
            if key == self.modifier {
                modifier
            } else {
                action
            }
        }

        fn context(&self) -> GameContext {
            GameContext {
                in_match: true,
                ..Default::default()
            }
        }

        async fn run_command(&self, command: &str) -> crate::error::Result<()> {
            self.commands.lock().push(command.to_string());
            Ok(())
        }

        fn notify(&self, _title: &str, _message: &str, _duration_secs: f32) {}

        async fn find_window(&self, _title: &str) -> Option<WindowHandle> {
            None
        }

        async fn close_window(&self, _handle: &WindowHandle) -> crate::error::Result<()> {
            Ok(())
        }

        fn terminate_process(&self) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_hold_release_hold_triggers_twice() {
        let config = Arc::new(Config::default());
        let host = KeyedHost::new(&config);
        let controller = Arc::new(EscalationController::new(
            config.clone(),
            host.clone() as Arc<dyn GameHost>,
        ));
        let detector = ComboDetector::new(config, host.clone() as Arc<dyn GameHost>, controller);

        let mut combo = ComboState::new();

        // Sample sequence: held, held, released, held - context always in-match
        for (modifier, action) in [(true, true), (true, true), (false, false), (true, true)] {
            host.hold(modifier, action);
            detector.poll(&mut combo).await;
        }

        // Exactly two triggers, both taking the leave-match arm
        assert_eq!(host.command_count("disconnect"), 2);
        assert_eq!(host.command_count("quit"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_combo_never_triggers() {
        let config = Arc::new(Config::default());
        let host = KeyedHost::new(&config);
        let controller = Arc::new(EscalationController::new(
            config.clone(),
            host.clone() as Arc<dyn GameHost>,
        ));
        let detector = ComboDetector::new(config, host.clone() as Arc<dyn GameHost>, controller);

        let mut combo = ComboState::new();

        for (modifier, action) in [(true, false), (false, true), (true, false)] {
            host.hold(modifier, action);
            detector.poll(&mut combo).await;
        }

        assert!(host.commands.lock().is_empty());
    }
}
