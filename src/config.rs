use crate::events::KeyCode;
use crate::mappings::KeyName;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub input: InputConfig,
    pub escalation: EscalationConfig,
    pub host: HostConfig,
    // Resolved evdev codes - not serialized, built after load
    #[serde(skip)]
    modifier_code: u16,
    #[serde(skip)]
    action_code: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub device_path: String,
    pub modifier_key: String,
    pub action_key: String,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EscalationConfig {
    pub enabled: bool,
    pub menu_fallback_delay_ms: u64,
    pub quit_retry_delay_ms: u64,
    pub window_close_delay_ms: u64,
    pub window_title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    pub address: String,
    pub connect_timeout_ms: u64,
    pub notify_command: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut config = Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "ragequit=info".to_string(),
            },
            input: InputConfig {
                device_path: "auto".to_string(),
                modifier_key: "alt".to_string(),
                action_key: "f4".to_string(),
                poll_interval_ms: 100,
            },
            escalation: EscalationConfig {
                enabled: true,
                menu_fallback_delay_ms: 500,
                quit_retry_delay_ms: 1000,
                window_close_delay_ms: 2000,
                window_title: "Rocket League".to_string(),
            },
            host: HostConfig {
                address: "127.0.0.1:9736".to_string(),
                connect_timeout_ms: 3000,
                notify_command: "notify-send".to_string(),
            },
            modifier_code: 0,
            action_code: 0,
        };
        config
            .build_key_codes()
            .expect("default key names must translate");
        config
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("RAGEQUIT_"));

        let mut config: Config = figment
            .extract()
            .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

        config.validate()?;
        config.build_key_codes()?;

        Ok(config)
    }

    /// Resolve the configured key names into evdev codes.
    fn build_key_codes(&mut self) -> Result<()> {
        self.modifier_code = KeyName::translate(&self.input.modifier_key)
            .map_err(|e| anyhow::anyhow!("Invalid modifier_key: {}", e))?;
        self.action_code = KeyName::translate(&self.input.action_key)
            .map_err(|e| anyhow::anyhow!("Invalid action_key: {}", e))?;
        Ok(())
    }

    pub fn modifier_key_code(&self) -> KeyCode {
        KeyCode::new(self.modifier_code)
    }

    pub fn action_key_code(&self) -> KeyCode {
        KeyCode::new(self.action_code)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Invalid log format: {}", self.logging.format),
        }

        if self.input.poll_interval_ms < 10 {
            anyhow::bail!("poll_interval_ms must be at least 10");
        }

        if let Err(e) = KeyName::translate(&self.input.modifier_key) {
            anyhow::bail!("Invalid modifier_key: {}", e);
        }
        if let Err(e) = KeyName::translate(&self.input.action_key) {
            anyhow::bail!("Invalid action_key: {}", e);
        }

        if self.escalation.menu_fallback_delay_ms == 0 {
            anyhow::bail!("menu_fallback_delay_ms must be greater than 0");
        }

        // The redundant quit must land before the window-close last resort
        if self.escalation.quit_retry_delay_ms == 0
            || self.escalation.quit_retry_delay_ms >= self.escalation.window_close_delay_ms
        {
            anyhow::bail!(
                "quit_retry_delay_ms ({}) must be greater than 0 and less than window_close_delay_ms ({})",
                self.escalation.quit_retry_delay_ms,
                self.escalation.window_close_delay_ms
            );
        }

        if self.escalation.window_title.is_empty() {
            anyhow::bail!("window_title must not be empty");
        }

        if self.host.address.is_empty() {
            anyhow::bail!("host.address must not be empty");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_combo_is_alt_f4() {
        let config = Config::default();
        assert_eq!(config.modifier_key_code().value(), 56); // KEY_LEFTALT
        assert_eq!(config.action_key_code().value(), 62); // KEY_F4
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let mut config = Config::default();
        config.input.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_key_name_rejected() {
        let mut config = Config::default();
        config.input.action_key = "f13".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unordered_fallback_delays_rejected() {
        let mut config = Config::default();
        config.escalation.quit_retry_delay_ms = 2500;
        config.escalation.window_close_delay_ms = 2000;
        assert!(config.validate().is_err());
    }
}
