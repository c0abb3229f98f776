use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::assessment::{
    BankError, ClarityWeighting, ItemBank, PolicyError, ScoringEngine, ScoringPolicy,
};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Files holding an externally calibrated item bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankPaths {
    pub item_parameters: PathBuf,
    pub questions: PathBuf,
}

/// Item bank source and scoring policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentConfig {
    /// `None` selects the bank bundled with the library.
    pub bank: Option<BankPaths>,
    pub policy: ScoringPolicy,
}

impl AssessmentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let bank = match (
            env::var_os("APP_ITEM_PARAMETERS"),
            env::var_os("APP_QUESTION_BANK"),
        ) {
            (Some(item_parameters), Some(questions)) => Some(BankPaths {
                item_parameters: item_parameters.into(),
                questions: questions.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteBankPaths),
        };

        let mut policy = ScoringPolicy::default();

        if let Ok(curve) = env::var("APP_CLARITY_CURVE") {
            policy.clarity = match curve.trim().to_ascii_lowercase().as_str() {
                "log" | "logarithmic" => ClarityWeighting::logarithmic(),
                "step" | "stepwise" => ClarityWeighting::stepwise(),
                _ => return Err(ConfigError::InvalidClarityCurve(curve)),
            };
        }

        if let Ok(raw) = env::var("APP_ATTITUDE_WEIGHT") {
            policy.attitude_weight = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidAttitudeWeight(raw.clone()))?;
        }

        policy.validate().map_err(ConfigError::Policy)?;

        Ok(Self { bank, policy })
    }

    pub fn load_bank(&self) -> Result<ItemBank, BankError> {
        match &self.bank {
            Some(paths) => ItemBank::from_paths(&paths.item_parameters, &paths.questions),
            None => ItemBank::standard(),
        }
    }

    pub fn engine(&self) -> Result<ScoringEngine, PolicyError> {
        ScoringEngine::new(self.policy)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    IncompleteBankPaths,
    InvalidClarityCurve(String),
    InvalidAttitudeWeight(String),
    Policy(PolicyError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::IncompleteBankPaths => write!(
                f,
                "APP_ITEM_PARAMETERS and APP_QUESTION_BANK must be set together"
            ),
            ConfigError::InvalidClarityCurve(value) => write!(
                f,
                "APP_CLARITY_CURVE must be 'logarithmic' or 'stepwise', got '{}'",
                value
            ),
            ConfigError::InvalidAttitudeWeight(value) => {
                write!(f, "APP_ATTITUDE_WEIGHT must be a number, got '{}'", value)
            }
            ConfigError::Policy(err) => write!(f, "invalid scoring policy: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::Policy(err) => Some(err),
            ConfigError::InvalidPort
            | ConfigError::IncompleteBankPaths
            | ConfigError::InvalidClarityCurve(_)
            | ConfigError::InvalidAttitudeWeight(_) => None,
        }
    }
}
