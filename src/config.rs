//! Runtime configuration.
//!
//! Settings are resolved in order: built-in defaults, then `SERCON_DEVICE` /
//! `SERCON_BAUD` environment variables, then positional CLI arguments
//! (`sercon [device] [baud]`).

use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_DEVICE: &str = "/dev/ttyAMA0";
pub const DEFAULT_BAUD: u32 = 115_200;
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    /// Serial device path.
    pub device: String,
    /// Baud rate for the serial device.
    pub baud: u32,
    /// Delay between liveness checks in the supervisor's monitor loop.
    pub idle_interval: Duration,
    /// How long the close sequence waits for workers before aborting them.
    pub grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            baud: DEFAULT_BAUD,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            grace: DEFAULT_GRACE,
        }
    }
}

impl Config {
    /// Builds the config from the environment and CLI arguments.
    ///
    /// `args` excludes argv[0].
    pub fn from_env_and_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Ok(device) = std::env::var("SERCON_DEVICE") {
            cfg.device = device;
        }
        if let Ok(baud) = std::env::var("SERCON_BAUD") {
            cfg.baud = parse_baud(&baud)?;
        }

        if let Some(device) = args.first() {
            cfg.device = device.clone();
        }
        if let Some(baud) = args.get(1) {
            cfg.baud = parse_baud(baud)?;
        }
        if let Some(extra) = args.get(2) {
            return Err(ConfigError::UnexpectedArgument(extra.clone()));
        }

        Ok(cfg)
    }
}

fn parse_baud(value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|source| ConfigError::InvalidBaud {
        value: value.to_string(),
        source,
    })
}
