use crate::adapters::render::RenderTarget;
use crate::config::SignConfig;
use crate::core::Transport;
use crate::utils::error::{Result, SignError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file, e.g. `/etc/track-sign/settings.toml`:
///
/// ```toml
/// [receiver]
/// port = 5010
/// transport = "udp"
/// fps = 20.0
/// result_rotate_sec = 2.0
///
/// [display]
/// renderer = "json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub receiver: ReceiverSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiverSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub transport: Option<String>,
    pub fps: Option<f64>,
    pub result_rotate_sec: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplaySection {
    pub renderer: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SignError::config(format!(
                "Cannot read settings file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        toml::from_str(&processed)
            .map_err(|e| SignError::config(format!("TOML parsing error: {}", e)))
    }

    /// 替換環境變數 (例如 ${SIGN_PORT})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| SignError::config(format!("Invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Layers the file's values over `base`.
    pub fn apply_to(&self, base: SignConfig) -> Result<SignConfig> {
        let mut config = base;
        let receiver = &self.receiver;

        if let Some(host) = &receiver.host {
            config.host = host.clone();
        }
        if let Some(port) = receiver.port {
            config.port = port;
        }
        if let Some(transport) = &receiver.transport {
            validation::validate_one_of("receiver.transport", transport, &["udp", "tcp"])?;
            config.transport = transport.parse::<Transport>().map_err(SignError::config)?;
        }
        if let Some(fps) = receiver.fps {
            config.fps = fps;
        }
        if let Some(rotate) = receiver.result_rotate_sec {
            config.result_rotate_sec = rotate;
        }
        if let Some(renderer) = &self.display.renderer {
            validation::validate_one_of("display.renderer", renderer, &RenderTarget::NAMES)?;
            config.renderer = renderer.parse::<RenderTarget>().map_err(SignError::config)?;
        }

        Ok(config)
    }

    pub fn to_sign_config(&self) -> Result<SignConfig> {
        self.apply_to(SignConfig::default())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_sign_config()?.validate()
    }
}
