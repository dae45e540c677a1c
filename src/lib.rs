pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::{toml_config::TomlConfig, SignConfig};

pub use crate::adapters::render::{JsonRenderer, LogRenderer, NullRenderer, RenderTarget};
pub use crate::core::{
    decoder::decode,
    receiver::{ShutdownHandle, SignReceiver},
    scheduler::{RenderScheduler, SchedulerStats},
    state::DisplayState,
};
pub use crate::domain::{
    message::{ProtocolMessage, ResultsPhase},
    model::{DisplayMode, Frame, ResultEntry},
    ports::{ConfigProvider, Renderer, Transport},
};
pub use crate::utils::error::{Result, SignError};
