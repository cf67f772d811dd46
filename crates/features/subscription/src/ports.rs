//! Collaborators the resolver queries but does not own.
//!
//! The host wires real implementations (the subscription client, the database, the
//! calendar engine's client registry); tests use [`crate::testing`].

use crate::catalog::PackageBundle;
use crate::error::SubscriptionError;
use crate::installer::S3GemConfig;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Storage credentials attached to a subscription resource.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageCredentials {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
}

impl Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .finish()
    }
}

/// One subscription as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub product_id: String,
    #[serde(default)]
    pub resource: Option<StorageCredentials>,
}

impl Subscription {
    #[must_use]
    pub fn new(product_id: impl Into<String>) -> Self {
        Self { product_id: product_id.into(), resource: None }
    }

    #[must_use]
    pub fn with_resource(mut self, resource: StorageCredentials) -> Self {
        self.resource = Some(resource);
        self
    }
}

/// Result of a store lookup for one plugin.
///
/// `resource` is the plugin-level credential record; it backs subscriptions that carry
/// no resource of their own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSet {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub resource: Option<StorageCredentials>,
}

/// The plugin's registered resource record in the subscription client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResource {
    pub name: String,
    #[serde(default)]
    pub supplier: Option<String>,
}

/// Subscription state owned by the subscription client.
pub trait SubscriptionStore: Debug + Send + Sync {
    /// Subscriptions registered for `plugin_name`, or `None` when the client knows nothing
    /// about the plugin.
    ///
    /// # Errors
    /// Returns [`SubscriptionError::Store`] when the lookup fails.
    fn find_subscriptions(&self, plugin_name: &str) -> Result<Option<SubscriptionSet>, SubscriptionError>;

    /// Asks the client to refresh its cached subscription state.
    ///
    /// # Errors
    /// Returns [`SubscriptionError::Store`] when the refresh fails.
    fn update(&self) -> Result<(), SubscriptionError>;
}

/// Lookup of resource records by name.
pub trait ResourceDirectory: Debug + Send + Sync {
    /// # Errors
    /// Returns [`SubscriptionError::Resource`] when the lookup fails.
    fn find_by_name(&self, name: &str) -> Result<Option<SubscriptionResource>, SubscriptionError>;
}

/// A configured package installer bound to one bucket.
pub trait PackageInstaller: Debug + Send + Sync {
    /// Whether the installer has what it needs (credentials, bucket) to install.
    fn ready(&self) -> bool;

    /// Installs every package of `bundle` at its pinned version.
    ///
    /// # Errors
    /// Returns [`SubscriptionError::Installer`] when the install fails.
    fn install(&self, bundle: &PackageBundle) -> Result<(), SubscriptionError>;
}

/// Builds installers from a resolved [`S3GemConfig`].
pub trait PackageInstallerFactory: Debug + Send + Sync {
    fn build(&self, config: &S3GemConfig) -> Box<dyn PackageInstaller>;
}

/// Client registry of the calendar sync engine.
pub trait CalendarSync: Debug + Send + Sync {
    /// Names of the source clients available in this process.
    fn available_clients(&self) -> FxHashSet<String>;
}

/// Schema inspection of the backing database.
pub trait SchemaProbe: Debug + Send + Sync {
    /// # Errors
    /// Returns [`SubscriptionError::NoDatabase`] when the database itself does not exist,
    /// or [`SubscriptionError::Database`] for any other failure.
    fn table_exists(&self, table: &str) -> Result<bool, SubscriptionError>;
}
