use config::{Config, Environment, File, Map};
use devents_domain::config::SubscriptionOverrides;
use devents_domain::constants::ENV_PREFIX;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Custom error type for config loading.
#[devents_derive::devents_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// Layers, lowest precedence first:
/// 1. **File**: an optional file (any format the `config` crate detects by extension).
///    A missing file is not an error.
/// 2. **Environment**: variables prefixed with `DISCOURSE_EVENTS_`. The remainder of the
///    name is lowercased and used as a flat key (`DISCOURSE_EVENTS_GEMS_S3_BUCKET` maps
///    to `gems_s3_bucket`).
///
/// # Errors
/// Returns [`ConfigError::Config`] if a present file cannot be parsed or the merged values
/// do not deserialize into `T`.
///
/// # Example
/// ```rust,no_run
/// use devents_kernel::config::load_config;
/// use devents_kernel::domain::SubscriptionOverrides;
///
/// let overrides: SubscriptionOverrides = load_config(Some("config/events")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    build::<T>(path.as_ref().map(AsRef::as_ref), None)
}

/// Reads the `DISCOURSE_EVENTS_*` overrides from the process environment.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the environment cannot be deserialized.
pub fn load_overrides() -> Result<SubscriptionOverrides, ConfigError> {
    build::<SubscriptionOverrides>(None, None)
}

/// Reads the overrides from an explicit variable map instead of the process environment.
///
/// Hosts that receive their settings from elsewhere (and tests) use this to avoid
/// mutating global process state. Keys keep their full names, e.g. `DISCOURSE_EVENTS_PRODUCT`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the variables cannot be deserialized.
pub fn load_overrides_from<I, K, V>(vars: I) -> Result<SubscriptionOverrides, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: Map<String, String> = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
    build::<SubscriptionOverrides>(None, Some(vars))
}

fn build<T>(path: Option<&Path>, vars: Option<Map<String, String>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let mut builder = Config::builder();

    if let Some(path) = path {
        info!("Loading config from {}", path.display());
        builder = builder.add_source(File::from(path).required(false));
    }

    let env = Environment::with_prefix(ENV_PREFIX).prefix_separator("_").source(vars);
    builder = builder.add_source(env);

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    debug!("Configuration loaded");
    Ok(config)
}
