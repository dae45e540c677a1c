use crate::adapters::render::RenderTarget;
use crate::config::toml_config::TomlConfig;
use crate::config::SignConfig;
use crate::core::Transport;
use crate::utils::error::{Result, SignError};
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "track-sign")]
#[command(about = "Receives FinishLynx scoreboard lines over the network and drives the track sign")]
#[command(version)]
pub struct CliConfig {
    /// Port to listen on [default: 5010]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Listen via UDP (default)
    #[arg(long, conflicts_with = "tcp")]
    pub udp: bool,

    /// Listen via TCP
    #[arg(long)]
    pub tcp: bool,

    /// Target frame rate; values below 5 are raised to 5 [default: 20]
    #[arg(long)]
    pub fps: Option<f64>,

    /// Seconds each result stays on the sign while rotating [default: 2]
    #[arg(long = "result-rotate-sec")]
    pub result_rotate_sec: Option<f64>,

    /// Optional TOML settings file; command line flags take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    /// Where frames go: log, json (stdout) or none [default: log]
    #[arg(long)]
    pub render: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Defaults, then the settings file (if any), then command line flags.
    pub fn resolve(&self) -> Result<SignConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading settings from: {}", path);
                TomlConfig::from_file(path)?.to_sign_config()?
            }
            None => SignConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.tcp {
            config.transport = Transport::Tcp;
        } else if self.udp {
            config.transport = Transport::Udp;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(rotate) = self.result_rotate_sec {
            config.result_rotate_sec = rotate;
        }
        if let Some(render) = &self.render {
            validation::validate_one_of("render", render, &RenderTarget::NAMES)?;
            config.renderer = render.parse::<RenderTarget>().map_err(SignError::config)?;
        }

        config.validate()?;
        Ok(config)
    }
}
