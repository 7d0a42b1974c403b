use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::domain::product::Product;
use crate::errors::DomainError;
use crate::links::{is_absolute_http_url, ExternalLinks};

pub const DEFAULT_CONFIG_FILE: &str = "storefront.toml";
pub const NESTED_CONFIG_FILE: &str = "config/storefront.toml";

#[derive(Clone, Debug)]
pub struct StorefrontConfig {
    pub store: StoreConfig,
    pub catalog: CatalogConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub name: String,
    pub currency_symbol: String,
    pub login_url: String,
    pub member_area_url: String,
    pub provider_name: String,
    pub purchase_notice: String,
}

/// Product list replacing the builtin catalog when present.
#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    pub products: Option<Vec<Product>>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
    pub static_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
    #[error("catalog validation failed: {0}")]
    Catalog(#[from] DomainError),
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                name: "Estudo com Fé".to_string(),
                currency_symbol: "R$".to_string(),
                login_url: "https://novenario.online".to_string(),
                member_area_url:
                    "https://members.kiwify.com/?club=8e69a7cf-e5ff-4894-840a-f0afbfad394c"
                        .to_string(),
                provider_name: "Kiwify".to_string(),
                purchase_notice: "Pagamento e acesso são processados pela Kiwify. Compra 100% \
                                  segura, com garantia de 7 dias."
                    .to_string(),
            },
            catalog: CatalogConfig::default(),
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
                static_dir: PathBuf::from("static"),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl StorefrontConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn external_links(&self) -> ExternalLinks {
        ExternalLinks {
            login_url: self.store.login_url.clone(),
            member_area_url: self.store.member_area_url.clone(),
        }
    }

    /// Build the process-wide catalog: configured products, or the builtin list.
    pub fn build_catalog(&self) -> Result<Catalog, DomainError> {
        match &self.catalog.products {
            Some(products) => Catalog::new(products.clone()),
            None => Ok(Catalog::builtin()),
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(store) = patch.store {
            if let Some(name) = store.name {
                self.store.name = name;
            }
            if let Some(currency_symbol) = store.currency_symbol {
                self.store.currency_symbol = currency_symbol;
            }
            if let Some(login_url) = store.login_url {
                self.store.login_url = login_url;
            }
            if let Some(member_area_url) = store.member_area_url {
                self.store.member_area_url = member_area_url;
            }
            if let Some(provider_name) = store.provider_name {
                self.store.provider_name = provider_name;
            }
            if let Some(purchase_notice) = store.purchase_notice {
                self.store.purchase_notice = purchase_notice;
            }
        }

        if let Some(catalog) = patch.catalog {
            if let Some(products) = catalog.products {
                self.catalog.products = Some(products);
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
            if let Some(static_dir) = server.static_dir {
                self.server.static_dir = static_dir;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("STOREFRONT_STORE_NAME") {
            self.store.name = value;
        }
        if let Some(value) = read_env("STOREFRONT_STORE_CURRENCY_SYMBOL") {
            self.store.currency_symbol = value;
        }
        if let Some(value) = read_env("STOREFRONT_STORE_LOGIN_URL") {
            self.store.login_url = value;
        }
        if let Some(value) = read_env("STOREFRONT_STORE_MEMBER_AREA_URL") {
            self.store.member_area_url = value;
        }
        if let Some(value) = read_env("STOREFRONT_STORE_PROVIDER_NAME") {
            self.store.provider_name = value;
        }
        if let Some(value) = read_env("STOREFRONT_STORE_PURCHASE_NOTICE") {
            self.store.purchase_notice = value;
        }

        if let Some(value) = read_env("STOREFRONT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("STOREFRONT_SERVER_PORT") {
            self.server.port = parse_u16("STOREFRONT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }
        if let Some(value) = read_env("STOREFRONT_SERVER_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(value);
        }

        let log_level =
            read_env("STOREFRONT_LOGGING_LEVEL").or_else(|| read_env("STOREFRONT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STOREFRONT_LOGGING_FORMAT").or_else(|| read_env("STOREFRONT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_store(&self.store)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        self.build_catalog()?;
        Ok(())
    }
}

/// Path of the config file `load` would read, if any.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_store(store: &StoreConfig) -> Result<(), ConfigError> {
    if store.name.trim().is_empty() {
        return Err(ConfigError::Validation("store.name must not be empty".to_string()));
    }
    if store.currency_symbol.trim().is_empty() {
        return Err(ConfigError::Validation(
            "store.currency_symbol must not be empty (e.g. `R$`)".to_string(),
        ));
    }

    validate_http_url("store.login_url", &store.login_url)?;
    validate_http_url("store.member_area_url", &store.member_area_url)?;

    Ok(())
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if !is_absolute_http_url(value.trim()) {
        return Err(ConfigError::Validation(format!(
            "{key} must be an absolute URL starting with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    catalog: Option<CatalogPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    name: Option<String>,
    currency_symbol: Option<String>,
    login_url: Option<String>,
    member_area_url: Option<String>,
    provider_name: Option<String>,
    purchase_notice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    products: Option<Vec<Product>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
    static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
