/// Configuration management for the API server
///
/// Settings are layered with the `config` crate, later sources winning:
///
/// 1. Built-in defaults
/// 2. `config/projecthub.toml` (optional)
/// 3. `PROJECTHUB__<SECTION>__<KEY>` environment variables
/// 4. The conventional `DATABASE_URL`, `API_HOST` and `API_PORT` variables
///
/// A `.env` file is loaded first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required for the postgres store)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8000)
/// - `PROJECTHUB__STORE__BACKEND`: `postgres` or `memory`
/// - `PROJECTHUB__LOG__JSON`: `true` for JSON log lines
/// - `RUST_LOG`: Log filter (default: debug for ProjectHub crates)
///
/// # Example
///
/// ```no_run
/// use projecthub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::load()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use config::{builder::DefaultState, ConfigBuilder, Environment, File};
use projecthub_shared::db::pool::DatabaseConfig as PoolConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Optional configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "config/projecthub";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Entity store selection
    pub store: StoreConfig,

    /// Log output
    pub log: LogConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Path of the GraphQL endpoint; tenant resolution applies below it
    pub graphql_path: String,

    /// Serve the GraphiQL page on `GET <graphql_path>`
    pub graphiql: bool,

    /// Allowed CORS origins (`*` for any)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Minimum number of idle connections
    pub min_connections: u32,

    /// Seconds to wait for a connection
    pub connect_timeout_seconds: u64,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

/// Which `EntityStore` backs the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx
    #[default]
    Postgres,

    /// In-process tables, lost on restart
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable text
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                graphql_path: "/graphql".to_string(),
                graphiql: true,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                min_connections: 1,
                connect_timeout_seconds: 30,
                run_migrations: true,
            },
            store: StoreConfig {
                backend: StoreBackend::Postgres,
            },
            log: LogConfig { json: false },
        }
    }
}

impl Config {
    /// Loads configuration from defaults, the config file and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed, a value has the wrong
    /// type, or the result fails [`Config::validate`].
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let builder = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix("PROJECTHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.cors_origins")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("api.host", env::var("API_HOST").ok())?
            .set_override_option("api.port", env::var("API_PORT").ok())?;

        Self::from_builder(builder)
    }

    /// Builder pre-filled with the built-in defaults
    fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        let defaults = Config::default();

        config::Config::builder()
            .set_default("api.host", defaults.api.host)?
            .set_default("api.port", i64::from(defaults.api.port))?
            .set_default("api.graphql_path", defaults.api.graphql_path)?
            .set_default("api.graphiql", defaults.api.graphiql)?
            .set_default("api.cors_origins", defaults.api.cors_origins)?
            .set_default("database.url", defaults.database.url)?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default(
                "database.min_connections",
                i64::from(defaults.database.min_connections),
            )?
            .set_default(
                "database.connect_timeout_seconds",
                defaults.database.connect_timeout_seconds as i64,
            )?
            .set_default("database.run_migrations", defaults.database.run_migrations)?
            .set_default("store.backend", "postgres")?
            .set_default("log.json", defaults.log.json)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints the types cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        let path = &self.api.graphql_path;
        if !path.starts_with('/') || path.len() < 2 || path.ends_with('/') {
            anyhow::bail!(
                "api.graphql_path must start with '/' and not end with '/', got '{}'",
                path
            );
        }

        if self.store.backend == StoreBackend::Postgres && self.database.url.is_empty() {
            anyhow::bail!("DATABASE_URL environment variable is required for the postgres store");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!("database.min_connections must not exceed database.max_connections");
        }

        Ok(())
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for the shared crate
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_seconds: self.database.connect_timeout_seconds,
            ..PoolConfig::default()
        }
    }
}
