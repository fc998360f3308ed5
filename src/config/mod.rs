//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `GRADER_*` environment variables.
//! The resulting value is immutable and handed to the scorer and extractor at
//! construction time; nothing downstream reads the environment again.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::completion::CompletionConfig;
use crate::constants::DEFAULT_ALLOWED_ORIGIN;
use crate::scoring::ScoringConfig;

/// Service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `GRADER_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Score range and low-quality threshold.
    pub scoring: ScoringConfig,

    /// Completion service settings (model, timeout, availability).
    pub completion: CompletionConfig,

    /// Browser origins allowed by CORS. Default: `http://localhost:5173`.
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            scoring: ScoringConfig::default(),
            completion: CompletionConfig::default(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "GRADER_PORT";
    const ENV_BIND_ADDR: &'static str = "GRADER_BIND_ADDR";
    const ENV_SCORE_MIN: &'static str = "GRADER_SCORE_MIN";
    const ENV_SCORE_MAX: &'static str = "GRADER_SCORE_MAX";
    const ENV_LOW_QUALITY_THRESHOLD: &'static str = "GRADER_LOW_QUALITY_THRESHOLD";
    const ENV_LLM_MODEL: &'static str = "GRADER_LLM_MODEL";
    const ENV_LLM_TIMEOUT_SECS: &'static str = "GRADER_LLM_TIMEOUT_SECS";
    const ENV_SEMANTIC_REFERENCES: &'static str = "GRADER_SEMANTIC_REFERENCES";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    const ENV_ALLOWED_ORIGINS: &'static str = "GRADER_ALLOWED_ORIGINS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;

        let scoring = ScoringConfig {
            score_min: Self::parse_f64_from_env(Self::ENV_SCORE_MIN, defaults.scoring.score_min)?,
            score_max: Self::parse_f64_from_env(Self::ENV_SCORE_MAX, defaults.scoring.score_max)?,
            low_quality_threshold: Self::parse_f64_from_env(
                Self::ENV_LOW_QUALITY_THRESHOLD,
                defaults.scoring.low_quality_threshold,
            )?,
        };

        let completion = CompletionConfig {
            model: Self::parse_string_from_env(Self::ENV_LLM_MODEL, defaults.completion.model),
            timeout: Self::parse_timeout_from_env(defaults.completion.timeout)?,
            semantic_references: Self::parse_bool_from_env(
                Self::ENV_SEMANTIC_REFERENCES,
                defaults.completion.semantic_references,
            ),
            enabled: env::var(Self::ENV_OPENAI_API_KEY).is_ok_and(|v| !v.trim().is_empty()),
        };

        let allowed_origins = Self::parse_list_from_env(
            Self::ENV_ALLOWED_ORIGINS,
            defaults.allowed_origins,
        );

        Ok(Self {
            port,
            bind_addr,
            scoring,
            completion,
            allowed_origins,
        })
    }

    /// Validates basic invariants (score range ordering, finite values).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ScoringConfig {
            score_min,
            score_max,
            low_quality_threshold,
        } = self.scoring;

        if !score_min.is_finite() || !score_max.is_finite() || score_min >= score_max {
            return Err(ConfigError::InvalidScoreRange {
                min: score_min,
                max: score_max,
            });
        }

        if !low_quality_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold {
                value: low_quality_threshold,
            });
        }

        if self.completion.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_f64_from_env(var_name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::FloatParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_timeout_from_env(default: Duration) -> Result<Duration, ConfigError> {
        match env::var(Self::ENV_LLM_TIMEOUT_SECS) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                _ => Err(ConfigError::InvalidTimeout { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    /// Comma-separated list; blank entries are dropped.
    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        match env::var(var_name) {
            Ok(value) => value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => default,
        }
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        env::var(var_name)
            .map(|s| {
                let s = s.trim().to_ascii_lowercase();
                s != "false" && s != "0"
            })
            .unwrap_or(default)
    }
}
