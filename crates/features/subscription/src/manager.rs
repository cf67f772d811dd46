//! # Subscription Manager
//!
//! Resolves the active subscription tier and answers feature queries against the
//! [`FeatureMatrix`]. One manager is built per request: every lookup is memoized on the
//! instance and nothing is cached process-wide.

use crate::catalog::{self, PackageBundle};
use crate::error::SubscriptionError;
use crate::installer::S3GemConfig;
use crate::matrix::{FeatureMatrix, TierSupport, base_features};
use crate::ports::{
    CalendarSync, PackageInstaller, PackageInstallerFactory, ResourceDirectory, SchemaProbe,
    Subscription, SubscriptionResource, SubscriptionSet, SubscriptionStore,
};
use devents_domain::constants::{
    CLIENT, DISCOURSE_CALENDAR_CLIENT, IMPORT, IMPORT_PUBLISH, IMPORT_TYPE, PLUGIN_NAME, PUBLISH,
    SOURCE, SUBSCRIPTIONS_TABLE,
};
use devents_domain::{HostMode, Integrations, SubscriptionOverrides, Tier};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use typed_builder::TypedBuilder;

/// Host-provided collaborators and capabilities.
///
/// Built once at startup and cloned into each manager.
#[derive(Debug, Clone, TypedBuilder)]
pub struct Collaborators {
    /// Optional integrations loaded in this process.
    #[builder(default = Integrations::ALL)]
    pub integrations: Integrations,
    #[builder(default)]
    pub host_mode: HostMode,
    pub store: Arc<dyn SubscriptionStore>,
    pub resources: Arc<dyn ResourceDirectory>,
    pub installers: Arc<dyn PackageInstallerFactory>,
    pub calendar: Arc<dyn CalendarSync>,
    pub schema: Arc<dyn SchemaProbe>,
}

/// What [`SubscriptionManager::setup`] should attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupOptions {
    /// Refresh the subscription client's cached state.
    pub update: bool,
    /// Install the package bundle of the resolved tier.
    pub install: bool,
}

impl SetupOptions {
    pub const ALL: Self = Self { update: true, install: true };
}

/// What [`SubscriptionManager::setup`] actually did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupOutcome {
    /// Preconditions held; `false` means setup was a no-op.
    pub ready: bool,
    pub updated: bool,
    /// Tier whose bundle was installed.
    pub installed: Option<Tier>,
}

#[derive(Debug)]
pub struct SubscriptionManager {
    ports: Collaborators,
    overrides: SubscriptionOverrides,
    subscriptions: OnceCell<Option<SubscriptionSet>>,
    active: OnceCell<Option<usize>>,
    product: OnceCell<Option<String>>,
    resource: OnceCell<Option<SubscriptionResource>>,
    s3_gem: OnceCell<S3GemConfig>,
    installer: OnceCell<Box<dyn PackageInstaller>>,
}

impl SubscriptionManager {
    #[must_use]
    pub fn new(ports: Collaborators, overrides: SubscriptionOverrides) -> Self {
        Self {
            ports,
            overrides,
            subscriptions: OnceCell::new(),
            active: OnceCell::new(),
            product: OnceCell::new(),
            resource: OnceCell::new(),
            s3_gem: OnceCell::new(),
            installer: OnceCell::new(),
        }
    }

    /// Uses `subscriptions` instead of asking the store.
    ///
    /// Replaces any set already fetched and drops everything resolved from it.
    #[must_use]
    pub fn with_subscriptions(mut self, subscriptions: SubscriptionSet) -> Self {
        self.subscriptions = OnceCell::from(Some(subscriptions));
        self.active = OnceCell::new();
        self.product = OnceCell::new();
        self.s3_gem = OnceCell::new();
        self.installer = OnceCell::new();
        self
    }

    /// Builds a manager and runs [`SubscriptionManager::setup`] once.
    ///
    /// # Errors
    /// Propagates any collaborator failure other than a missing database.
    pub fn run_setup(
        ports: Collaborators,
        overrides: SubscriptionOverrides,
        options: SetupOptions,
    ) -> Result<SetupOutcome, SubscriptionError> {
        Self::new(ports, overrides).setup(options)
    }

    /// The feature matrix for this process.
    ///
    /// Rebuilt on every call: the calendar client row appears only while the calendar
    /// engine reports that client as available.
    #[must_use]
    pub fn features(&self) -> FeatureMatrix {
        let mut matrix = base_features().clone();
        if let Some(support) = self.calendar_client_row() {
            matrix.insert(SOURCE, CLIENT, DISCOURSE_CALENDAR_CLIENT, support);
        }
        matrix
    }

    fn calendar_client_row(&self) -> Option<TierSupport> {
        self.ports
            .calendar
            .available_clients()
            .contains(DISCOURSE_CALENDAR_CLIENT)
            .then_some(TierSupport::PAID_ONLY)
    }

    /// Same lookup as `features().get(..)`, without copying the matrix. The calendar
    /// registry is only asked about its own row.
    fn feature_row(&self, feature: &str, attribute: &str, value: &str) -> Option<TierSupport> {
        if (feature, attribute, value) == (SOURCE, CLIENT, DISCOURSE_CALENDAR_CLIENT) {
            return self.calendar_client_row();
        }
        base_features().get(feature, attribute, value)
    }

    /// Whether the current tier may use `value` of `feature.attribute`.
    ///
    /// An empty argument means the caller has nothing to gate, so it is allowed.
    ///
    /// # Errors
    /// Propagates store failures from tier resolution.
    pub fn supports(&self, feature: &str, attribute: &str, value: &str) -> Result<bool, SubscriptionError> {
        if feature.is_empty() || attribute.is_empty() || value.is_empty() {
            return Ok(true);
        }
        let Some(product) = self.product()? else {
            return Ok(false);
        };
        // Unknown override products resolve to no tier, and `TierSupport::none` is false.
        let Some(tier) = Tier::from_product(product) else {
            return Ok(false);
        };
        Ok(self.feature_row(feature, attribute, value).is_some_and(|support| support.allows(Some(tier))))
    }

    /// # Errors
    /// Propagates store failures from tier resolution.
    pub fn supports_import(&self) -> Result<bool, SubscriptionError> {
        Ok(self.supports(SOURCE, IMPORT_TYPE, IMPORT)? || self.supports(SOURCE, IMPORT_TYPE, IMPORT_PUBLISH)?)
    }

    /// # Errors
    /// Propagates store failures from tier resolution.
    pub fn supports_publish(&self) -> Result<bool, SubscriptionError> {
        Ok(self.supports(SOURCE, IMPORT_TYPE, PUBLISH)? || self.supports(SOURCE, IMPORT_TYPE, IMPORT_PUBLISH)?)
    }

    /// Subscriptions the store holds for this plugin.
    ///
    /// # Errors
    /// Propagates [`SubscriptionStore::find_subscriptions`] failures.
    pub fn subscriptions(&self) -> Result<Option<&SubscriptionSet>, SubscriptionError> {
        if let Some(cached) = self.subscriptions.get() {
            return Ok(cached.as_ref());
        }
        let fetched = self.ports.store.find_subscriptions(PLUGIN_NAME)?;
        debug!(found = fetched.as_ref().map_or(0, |set| set.subscriptions.len()), "Fetched subscriptions");
        Ok(self.subscriptions.get_or_init(|| fetched).as_ref())
    }

    /// First subscription matching `tier`'s product id.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn tier_subscription(&self, tier: Tier) -> Result<Option<&Subscription>, SubscriptionError> {
        Ok(self.subscriptions()?.and_then(|set| find_product(set, tier).map(|i| &set.subscriptions[i])))
    }

    /// The highest-ranked subscription: enterprise, then business, then community.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn subscription(&self) -> Result<Option<&Subscription>, SubscriptionError> {
        let Some(set) = self.subscriptions()? else {
            return Ok(None);
        };
        let index = self.active.get_or_init(|| {
            Tier::BY_PRIORITY.into_iter().find_map(|tier| find_product(set, tier))
        });
        Ok(index.map(|i| &set.subscriptions[i]))
    }

    /// Name of the active product.
    ///
    /// A non-empty `DISCOURSE_EVENTS_PRODUCT` override is returned verbatim and the store
    /// is never consulted.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn product(&self) -> Result<Option<&str>, SubscriptionError> {
        if let Some(cached) = self.product.get() {
            return Ok(cached.as_deref());
        }
        let resolved = match self.overrides.product() {
            Some(forced) => {
                debug!(product = forced, "Product forced by environment override");
                Some(forced.to_owned())
            },
            None => self
                .subscription()?
                .and_then(|sub| catalog::tier_for_product_id(&sub.product_id))
                .map(|tier| tier.to_string()),
        };
        debug!(product = ?resolved, "Resolved product");
        Ok(self.product.get_or_init(|| resolved).as_deref())
    }

    /// The active product as a [`Tier`], if it names one.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn tier(&self) -> Result<Option<Tier>, SubscriptionError> {
        Ok(self.product()?.and_then(Tier::from_product))
    }

    /// Whether this site counts as subscribed. A product override always does.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn subscribed(&self) -> Result<bool, SubscriptionError> {
        if self.overrides.product().is_some() {
            return Ok(true);
        }
        Ok(self.subscription()?.is_some())
    }

    /// The plugin's resource record in the subscription client.
    ///
    /// # Errors
    /// Propagates [`ResourceDirectory::find_by_name`] failures.
    pub fn resource(&self) -> Result<Option<&SubscriptionResource>, SubscriptionError> {
        if let Some(cached) = self.resource.get() {
            return Ok(cached.as_ref());
        }
        let found = self.ports.resources.find_by_name(PLUGIN_NAME)?;
        Ok(self.resource.get_or_init(|| found).as_ref())
    }

    /// Supplier named on the resource record.
    ///
    /// # Errors
    /// Propagates resource lookup failures.
    pub fn supplier(&self) -> Result<Option<&str>, SubscriptionError> {
        Ok(self.resource()?.and_then(|resource| resource.supplier.as_deref()))
    }

    /// Installer settings for the active tier.
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn s3_gem(&self) -> Result<&S3GemConfig, SubscriptionError> {
        if let Some(cached) = self.s3_gem.get() {
            return Ok(cached);
        }
        let subscriptions = self.subscriptions()?;
        let resource = self
            .subscription()?
            .and_then(|sub| sub.resource.as_ref())
            .or_else(|| subscriptions.and_then(|set| set.resource.as_ref()));
        let config = S3GemConfig::resolve(&self.overrides, resource, self.tier()?);
        Ok(self.s3_gem.get_or_init(|| config))
    }

    /// Whether the calendar sync engine is loaded.
    #[must_use]
    pub const fn ready(&self) -> bool {
        self.ports.integrations.contains(Integrations::OMNIEVENT)
    }

    /// Whether setup may act: serving, subscription client loaded, and its table present.
    ///
    /// # Errors
    /// Propagates schema probe failures other than a missing database.
    pub fn ready_to_setup(&self) -> Result<bool, SubscriptionError> {
        Ok(self.database_ready()? && self.subscription_client_installed())
    }

    const fn subscription_client_installed(&self) -> bool {
        self.ports.integrations.contains(Integrations::SUBSCRIPTION_CLIENT)
    }

    fn database_ready(&self) -> Result<bool, SubscriptionError> {
        if self.ports.host_mode != HostMode::Serving {
            return Ok(false);
        }
        match self.ports.schema.table_exists(SUBSCRIPTIONS_TABLE) {
            Err(SubscriptionError::NoDatabase { .. }) => {
                debug!("Database does not exist yet");
                Ok(false)
            },
            other => other,
        }
    }

    /// Refreshes subscriptions and installs the tier's packages, as requested.
    ///
    /// A no-op unless [`SubscriptionManager::ready_to_setup`] holds.
    ///
    /// # Errors
    /// Propagates collaborator failures other than a missing database.
    #[instrument(skip(self), fields(plugin = PLUGIN_NAME))]
    pub fn setup(&self, options: SetupOptions) -> Result<SetupOutcome, SubscriptionError> {
        if !self.ready_to_setup()? {
            debug!("Not ready to set up subscriptions");
            return Ok(SetupOutcome::default());
        }

        let mut outcome = SetupOutcome { ready: true, ..SetupOutcome::default() };
        if options.update {
            self.perform_update()?;
            outcome.updated = true;
        }
        if options.install && self.subscribed()? {
            outcome.installed = self.perform_install()?;
        }
        Ok(outcome)
    }

    /// Asks the subscription client to refresh its state.
    ///
    /// # Errors
    /// Propagates [`SubscriptionStore::update`] failures.
    pub fn perform_update(&self) -> Result<(), SubscriptionError> {
        info!("Updating subscriptions");
        self.ports.store.update()
    }

    /// Installs the package bundle of the active tier, if the installer is ready.
    ///
    /// Returns the tier that was installed.
    ///
    /// # Errors
    /// Propagates store and installer failures.
    pub fn perform_install(&self) -> Result<Option<Tier>, SubscriptionError> {
        let Some(tier) = self.tier()? else {
            let product = self.product()?;
            warn!(product = ?product, "Product names no tier, nothing to install");
            return Ok(None);
        };
        let installer = self.installer()?;
        if !installer.ready() {
            warn!("Package installer is not ready, skipping install");
            return Ok(None);
        }
        let bundle: &PackageBundle = catalog::package_bundle(tier);
        info!(%tier, packages = bundle.len(), "Installing packages");
        installer.install(bundle)?;
        Ok(Some(tier))
    }

    fn installer(&self) -> Result<&dyn PackageInstaller, SubscriptionError> {
        if let Some(cached) = self.installer.get() {
            return Ok(cached.as_ref());
        }
        let built = self.ports.installers.build(self.s3_gem()?);
        Ok(self.installer.get_or_init(|| built).as_ref())
    }
}

fn find_product(set: &SubscriptionSet, tier: Tier) -> Option<usize> {
    let id = catalog::product_id(tier);
    set.subscriptions.iter().position(|sub| sub.product_id == id)
}
