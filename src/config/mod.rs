#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::render::RenderTarget;
use crate::core::{ConfigProvider, Transport};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

pub const DEFAULT_PORT: u16 = 5010;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_FPS: f64 = 20.0;
pub const DEFAULT_ROTATE_SECS: f64 = 2.0;

/// Fully resolved runtime settings (defaults, then settings file, then CLI).
#[derive(Debug, Clone, PartialEq)]
pub struct SignConfig {
    pub host: String,
    pub port: u16,
    pub transport: Transport,
    pub fps: f64,
    pub result_rotate_sec: f64,
    pub renderer: RenderTarget,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            transport: Transport::Udp,
            fps: DEFAULT_FPS,
            result_rotate_sec: DEFAULT_ROTATE_SECS,
            renderer: RenderTarget::Log,
        }
    }
}

impl ConfigProvider for SignConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn transport(&self) -> Transport {
        self.transport
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn result_rotate_secs(&self) -> f64 {
        self.result_rotate_sec
    }
}

impl Validate for SignConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("receiver.host", &self.host)?;
        validation::validate_port("receiver.port", self.port)?;
        // fps below the minimum is clamped at runtime, not rejected
        validation::validate_finite_number("receiver.fps", self.fps)?;
        validation::validate_positive_number("receiver.result_rotate_sec", self.result_rotate_sec)?;
        Ok(())
    }
}
