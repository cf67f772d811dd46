//! Facade crate for the Discourse Events subscription gate.
//! Re-exports the domain, kernel and subscription crates and wires environment overrides
//! into the manager. Keep this crate thin: it composes other crates, it does not gate.
//!
//! ## Usage
//! - At boot, install logging with [`logger::Logger::plugin`], then call [`setup`] once
//!   with the host's [`Collaborators`].
//! - Per request, call [`manager`] and query it (`supports`, `supports_import`, ...).

use std::borrow::Cow;
use tracing::info;

pub use devents_domain as domain;
pub use devents_kernel as kernel;
pub use devents_logger as logger;
pub use devents_subscription as subscription;
pub use devents_subscription::{
    Collaborators, SetupOptions, SetupOutcome, SubscriptionManager, Tier,
};

use devents_kernel::config::{ConfigError, load_overrides, load_overrides_from};
use devents_subscription::SubscriptionError;

/// Errors raised while composing the gate from the environment.
#[devents_derive::devents_error]
pub enum BootError {
    #[error("Failed to read overrides{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Subscription setup failed{}: {source}", format_context(.context))]
    Subscription { source: SubscriptionError, context: Option<Cow<'static, str>> },
}

/// Builds a request-scoped manager with the current `DISCOURSE_EVENTS_*` overrides.
///
/// # Errors
/// Returns [`BootError::Config`] if the overrides cannot be read.
pub fn manager(ports: Collaborators) -> Result<SubscriptionManager, BootError> {
    let overrides = load_overrides().context("Reading DISCOURSE_EVENTS_* overrides")?;
    Ok(SubscriptionManager::new(ports, overrides))
}

/// Like [`manager`], reading the overrides from `vars` instead of the process environment.
///
/// # Errors
/// Returns [`BootError::Config`] if the variables cannot be deserialized.
pub fn manager_from<I, K, V>(ports: Collaborators, vars: I) -> Result<SubscriptionManager, BootError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let overrides = load_overrides_from(vars).context("Reading supplied overrides")?;
    Ok(SubscriptionManager::new(ports, overrides))
}

/// Boot-time setup: refresh subscriptions and install the tier's packages as requested.
///
/// # Errors
/// Returns [`BootError::Config`] if the overrides cannot be read, or
/// [`BootError::Subscription`] if a collaborator fails.
pub fn setup(ports: Collaborators, options: SetupOptions) -> Result<SetupOutcome, BootError> {
    run_setup(&manager(ports)?, options)
}

/// Like [`setup`], reading the overrides from `vars` instead of the process environment.
///
/// # Errors
/// Same as [`setup`].
pub fn setup_from<I, K, V>(
    ports: Collaborators,
    options: SetupOptions,
    vars: I,
) -> Result<SetupOutcome, BootError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    run_setup(&manager_from(ports, vars)?, options)
}

fn run_setup(manager: &SubscriptionManager, options: SetupOptions) -> Result<SetupOutcome, BootError> {
    let outcome = manager.setup(options).context("Running boot-time setup")?;
    info!(
        ready = outcome.ready,
        updated = outcome.updated,
        installed = ?outcome.installed,
        "Subscription setup finished"
    );
    Ok(outcome)
}
