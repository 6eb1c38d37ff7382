use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use orders_db::DescriptorBuilder;
use serde::{Deserialize, Serialize, Serializer};

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "ORDERS_ENV";
const CONFIG_DIR_ENV: &str = "ORDERS_CONFIG_DIR";
const ENV_PREFIX: &str = "ORDERS";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl std::str::FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            // Default to the `config` directory under the working directory.
            Err(_) => std::env::current_dir()
                .map(|cwd| cwd.join("config"))
                .with_context(|| "unable to resolve current directory")?,
        };

        Self::load_from(&environment, &config_dir)
    }

    /// Load `base.toml` and `{environment}.toml` from `config_dir`, then apply
    /// `ORDERS_`-prefixed environment variables (`__` separates nested keys).
    pub fn load_from(environment: &str, config_dir: &Path) -> anyhow::Result<Self> {
        Self::load_layers(environment, config_dir, None)
    }

    /// Like [`Settings::load_from`], reading variables from `env_vars` instead
    /// of the process environment when given.
    fn load_layers(
        environment: &str,
        config_dir: &Path,
        env_vars: Option<config::Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let parsed_environment: Environment = environment.parse()?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        // Values stay strings here; serde converts the numeric and boolean
        // fields, so credentials such as `0123` are kept verbatim.
        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env_vars),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selected environment wins over anything set in files.
        settings.environment = parsed_environment;

        settings.validate()?;

        Ok(settings)
    }

    /// Reject combinations that are unsafe for the selected environment.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.synchronize && self.environment != Environment::Local {
            bail!(
                "database.synchronize is only allowed in the local environment (current: {:?})",
                self.environment
            );
        }

        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_host")]
    pub host: String,
    #[serde(default = "DatabaseSettings::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseSettings::default_username")]
    pub username: String,
    #[serde(
        default = "DatabaseSettings::default_password",
        serialize_with = "redact"
    )]
    pub password: String,
    #[serde(default = "DatabaseSettings::default_database")]
    pub database: String,
    /// Create mapped tables on startup. Local development only.
    #[serde(default)]
    pub synchronize: bool,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseSettings::default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_host() -> String {
        "postgres".to_string()
    }

    fn default_port() -> u16 {
        5432
    }

    fn default_username() -> String {
        "myuser".to_string()
    }

    fn default_password() -> String {
        "mypassword".to_string()
    }

    fn default_database() -> String {
        "orders_db".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }

    fn default_acquire_timeout_ms() -> u64 {
        30000
    }

    /// Descriptor builder seeded with these settings; entities are added by the caller.
    pub fn descriptor_builder(&self) -> DescriptorBuilder {
        orders_db::ConnectionDescriptor::builder()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
            .synchronize(self.synchronize)
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_millis(self.acquire_timeout_ms))
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            username: Self::default_username(),
            password: Self::default_password(),
            database: Self::default_database(),
            synchronize: false,
            max_connections: Self::default_max_connections(),
            acquire_timeout_ms: Self::default_acquire_timeout_ms(),
        }
    }
}

fn redact<S: Serializer>(_: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("<redacted>")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySettings {
    /// Default filter directive; `RUST_LOG` takes precedence when set.
    #[serde(default = "TelemetrySettings::default_level")]
    pub level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

impl TelemetrySettings {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
