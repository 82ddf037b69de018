//! Remote game host: the bridge to a running game client.
//!
//! Key state is polled from the local keyboard via evdev. Console commands
//! go out over a line-based TCP channel to the game client; the client (or
//! the plugin loader on its side) pushes lines back:
//!
//! ```text
//! context <in_match:0|1> <in_online:0|1> <in_freeplay:0|1>
//! command ragequit
//! command ragequit_enabled <0|1>
//! ```
//!
//! `context` lines refresh the cached [`GameContext`]; `command` lines are
//! forwarded as [`HostEvent`]s. Window lookup and close shell out to
//! `wmctrl`, notifications to a configurable notifier command.

use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::Result;
use crate::events::{GameContext, HostEvent, KeyCode, WindowHandle};
use crate::ragequit_error;
use crate::utils::DeviceFinder;
use parking_lot::{Mutex, RwLock};
use std::process::Command;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use super::r#trait::GameHost;

pub struct RemoteHost {
    config: Arc<Config>,
    device: Mutex<evdev::Device>,
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    context: Arc<RwLock<GameContext>>,
}

impl RemoteHost {
    pub async fn connect(config: Arc<Config>) -> Result<(Arc<Self>, mpsc::Receiver<HostEvent>)> {
        info!("Connecting to game host at {}", config.host.address);

        let connect = TcpStream::connect(&config.host.address);
        let timeout = Duration::from_millis(config.host.connect_timeout_ms);
        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| {
                ragequit_error!(host_unavailable, "Connecting to {} timed out", config.host.address)
            })?
            .map_err(|e| {
                ragequit_error!(host_unavailable, "Connecting to {} failed: {}", config.host.address, e)
            })?;
        let (read_half, write_half) = stream.into_split();

        let device_path = DeviceFinder::find_keyboard_device(&config.input.device_path)?;
        let device = evdev::Device::open(&device_path).map_err(|e| {
            ragequit_error!(device_not_found, "Could not open device {:?}: {}", device_path, e)
        })?;
        info!("Polling key state from {:?}", device_path);

        let context = Arc::new(RwLock::new(GameContext::default()));
        let (events_tx, events_rx) = mpsc::channel(16);

        tokio::spawn(Self::read_loop(read_half, Arc::clone(&context), events_tx));

        let host = Arc::new(Self {
            config,
            device: Mutex::new(device),
            writer: tokio::sync::Mutex::new(write_half),
            context,
        });

        Ok((host, events_rx))
    }

    async fn read_loop(
        read_half: OwnedReadHalf,
        context: Arc<RwLock<GameContext>>,
        events: mpsc::Sender<HostEvent>,
    ) {
        let mut lines = BufReader::new(read_half).lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_host_line(line.trim()) {
                    Some(HostLine::Context(ctx)) => {
                        debug_if_enabled!("Game context update: {}", ctx);
                        *context.write() = ctx;
                    }
                    Some(HostLine::Event(event)) => {
                        if events.send(event).await.is_err() {
                            // receiver gone, the daemon is shutting down
                            break;
                        }
                    }
                    None => debug!("Unrecognized host line: {:?}", line),
                },
                Ok(None) => {
                    warn!("Game host closed the connection; keeping last known context");
                    break;
                }
                Err(e) => {
                    error!("Error reading from game host: {}", e);
                    break;
                }
            }
        }
    }

    fn window_pid(title: &str) -> Option<u32> {
        let output = Command::new("wmctrl").args(["-l", "-p"]).output().ok()?;
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);

        // wmctrl -lp lines: <id> <desktop> <pid> <host> <title...>
        for line in stdout.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() > 4 && parts[4..].join(" ").contains(title) {
                return parts[2].parse().ok();
            }
        }

        None
    }
}

#[async_trait::async_trait]
impl GameHost for RemoteHost {
    fn key_down(&self, key: KeyCode) -> bool {
        let device = self.device.lock();
        match device.get_key_state() {
            Ok(keys) => keys.contains(evdev::KeyCode::new(key.value())),
            Err(e) => {
                debug_if_enabled!("Key state read failed, treating as not pressed: {}", e);
                false
            }
        }
    }

    fn context(&self) -> GameContext {
        *self.context.read()
    }

    async fn run_command(&self, command: &str) -> Result<()> {
        debug_if_enabled!("Sending console command: {:?}", command);

        let mut writer = self.writer.lock().await;
        writer
            .write_all(command.as_bytes())
            .await
            .map_err(|e| ragequit_error!(command, "Could not deliver {:?}: {}", command, e))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| ragequit_error!(command, "Could not deliver {:?}: {}", command, e))?;
        writer
            .flush()
            .await
            .map_err(|e| ragequit_error!(command, "Could not deliver {:?}: {}", command, e))?;

        Ok(())
    }

    fn notify(&self, title: &str, message: &str, duration_secs: f32) {
        let timeout_ms = (duration_secs * 1000.0) as u32;
        let result = Command::new(&self.config.host.notify_command)
            .args(["-a", "ragequit", "-t", &timeout_ms.to_string(), title, message])
            .spawn();

        if let Err(e) = result {
            warn!("Notification failed: {}", e);
        }
    }

    async fn find_window(&self, title: &str) -> Option<WindowHandle> {
        let output = Command::new("wmctrl").args(["-l"]).output().ok()?;
        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);

        // wmctrl -l lines: <id> <desktop> <host> <title...>
        for line in stdout.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() > 3 && parts[3..].join(" ").contains(title) {
                return Some(WindowHandle::new(parts[0]));
            }
        }

        None
    }

    async fn close_window(&self, handle: &WindowHandle) -> Result<()> {
        let status = Command::new("wmctrl")
            .args(["-i", "-c", handle.id()])
            .status()
            .map_err(|e| ragequit_error!(internal, "wmctrl not available: {}", e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ragequit_error!(internal, "wmctrl could not close window {}", handle))
        }
    }

    fn terminate_process(&self) {
        error!("Last resort: killing the game client process");

        match Self::window_pid(&self.config.escalation.window_title) {
            Some(pid) => match Command::new("kill").args(["-9", &pid.to_string()]).status() {
                Ok(status) if status.success() => info!("Killed game client (pid {})", pid),
                Ok(status) => error!("kill exited with {}", status),
                Err(e) => error!("Could not run kill: {}", e),
            },
            None => error!(
                "Game client window {:?} not found, nothing to kill",
                self.config.escalation.window_title
            ),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum HostLine {
    Context(GameContext),
    Event(HostEvent),
}

fn parse_host_line(line: &str) -> Option<HostLine> {
    let mut parts = line.split_whitespace();

    match parts.next()? {
        "context" => {
            let in_match = parse_flag(parts.next()?)?;
            let in_online_match = parse_flag(parts.next()?)?;
            let in_freeplay = parse_flag(parts.next()?)?;
            Some(HostLine::Context(GameContext {
                in_match,
                in_online_match,
                in_freeplay,
            }))
        }
        "command" => match parts.next()? {
            "ragequit" => Some(HostLine::Event(HostEvent::ManualTrigger)),
            "ragequit_enabled" => {
                let enabled = parse_flag(parts.next()?)?;
                Some(HostLine::Event(HostEvent::SetEnabled(enabled)))
            }
            _ => None,
        },
        _ => None,
    }
}

fn parse_flag(token: &str) -> Option<bool> {
    match token {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_line() {
        assert_eq!(
            parse_host_line("context 1 0 0"),
            Some(HostLine::Context(GameContext {
                in_match: true,
                in_online_match: false,
                in_freeplay: false,
            }))
        );
        assert_eq!(
            parse_host_line("context 0 1 0"),
            Some(HostLine::Context(GameContext {
                in_match: false,
                in_online_match: true,
                in_freeplay: false,
            }))
        );
    }

    #[test]
    fn test_parse_command_lines() {
        assert_eq!(
            parse_host_line("command ragequit"),
            Some(HostLine::Event(HostEvent::ManualTrigger))
        );
        assert_eq!(
            parse_host_line("command ragequit_enabled 0"),
            Some(HostLine::Event(HostEvent::SetEnabled(false)))
        );
        assert_eq!(
            parse_host_line("command ragequit_enabled 1"),
            Some(HostLine::Event(HostEvent::SetEnabled(true)))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_host_line(""), None);
        assert_eq!(parse_host_line("context 1 0"), None);
        assert_eq!(parse_host_line("context yes no no"), None);
        assert_eq!(parse_host_line("command selfdestruct"), None);
        assert_eq!(parse_host_line("hello world"), None);
    }
}
