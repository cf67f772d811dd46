//! In-memory collaborators for host integration tests.
//!
//! Enabled with the `testing` feature. Every double records how often it was called so
//! tests can assert on memoization and short-circuiting.

use crate::catalog::PackageBundle;
use crate::error::SubscriptionError;
use crate::installer::S3GemConfig;
use crate::manager::Collaborators;
use crate::ports::{
    CalendarSync, PackageInstaller, PackageInstallerFactory, ResourceDirectory, SchemaProbe,
    SubscriptionResource, SubscriptionSet, SubscriptionStore,
};
use devents_domain::{HostMode, Integrations};
use fxhash::FxHashSet;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    set: Option<SubscriptionSet>,
    lookups: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryStore {
    #[must_use]
    pub fn new(set: Option<SubscriptionSet>) -> Self {
        Self { set, ..Self::default() }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

impl SubscriptionStore for InMemoryStore {
    fn find_subscriptions(&self, _plugin_name: &str) -> Result<Option<SubscriptionSet>, SubscriptionError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.set.clone())
    }

    fn update(&self) -> Result<(), SubscriptionError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A store whose every call fails.
#[derive(Debug, Default)]
pub struct FailingStore;

impl SubscriptionStore for FailingStore {
    fn find_subscriptions(&self, _plugin_name: &str) -> Result<Option<SubscriptionSet>, SubscriptionError> {
        Err(SubscriptionError::Store { message: "store offline".into(), context: None })
    }

    fn update(&self) -> Result<(), SubscriptionError> {
        Err(SubscriptionError::Store { message: "store offline".into(), context: None })
    }
}

#[derive(Debug, Default)]
pub struct StaticResources(pub Option<SubscriptionResource>);

impl ResourceDirectory for StaticResources {
    fn find_by_name(&self, name: &str) -> Result<Option<SubscriptionResource>, SubscriptionError> {
        Ok(self.0.clone().filter(|resource| resource.name == name))
    }
}

/// Records every installer it builds and every bundle installed.
#[derive(Debug)]
pub struct RecordingInstallers {
    ready: bool,
    configs: Mutex<Vec<S3GemConfig>>,
    installs: Arc<Mutex<Vec<PackageBundle>>>,
}

impl RecordingInstallers {
    #[must_use]
    pub fn new(ready: bool) -> Self {
        Self { ready, configs: Mutex::new(Vec::new()), installs: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn configs(&self) -> Vec<S3GemConfig> {
        self.configs.lock().clone()
    }

    pub fn installs(&self) -> Vec<PackageBundle> {
        self.installs.lock().clone()
    }
}

impl PackageInstallerFactory for RecordingInstallers {
    fn build(&self, config: &S3GemConfig) -> Box<dyn PackageInstaller> {
        self.configs.lock().push(config.clone());
        Box::new(RecordingInstaller { ready: self.ready, installs: Arc::clone(&self.installs) })
    }
}

#[derive(Debug)]
struct RecordingInstaller {
    ready: bool,
    installs: Arc<Mutex<Vec<PackageBundle>>>,
}

impl PackageInstaller for RecordingInstaller {
    fn ready(&self) -> bool {
        self.ready
    }

    fn install(&self, bundle: &PackageBundle) -> Result<(), SubscriptionError> {
        self.installs.lock().push(bundle.clone());
        Ok(())
    }
}

/// Fixed calendar client registry that counts how often it is asked.
#[derive(Debug, Default)]
pub struct StaticCalendar {
    clients: FxHashSet<String>,
    queries: AtomicUsize,
}

impl StaticCalendar {
    pub fn with_clients<I, S>(clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { clients: clients.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl CalendarSync for StaticCalendar {
    fn available_clients(&self) -> FxHashSet<String> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.clients.clone()
    }
}

/// Schema state of the fake database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FakeSchema {
    #[default]
    Migrated,
    NotMigrated,
    NoDatabase,
    Broken,
}

impl SchemaProbe for FakeSchema {
    fn table_exists(&self, _table: &str) -> Result<bool, SubscriptionError> {
        match self {
            Self::Migrated => Ok(true),
            Self::NotMigrated => Ok(false),
            Self::NoDatabase => {
                Err(SubscriptionError::NoDatabase { message: "database missing".into(), context: None })
            },
            Self::Broken => {
                Err(SubscriptionError::Database { message: "connection refused".into(), context: None })
            },
        }
    }
}

/// A fully wired fake host with handles on every double.
#[derive(Debug, Clone)]
pub struct FakeHost {
    pub store: Arc<InMemoryStore>,
    pub installers: Arc<RecordingInstallers>,
    pub integrations: Integrations,
    pub host_mode: HostMode,
    pub schema: FakeSchema,
    pub calendar_clients: Vec<String>,
    pub resource: Option<SubscriptionResource>,
}

impl FakeHost {
    #[must_use]
    pub fn new(set: Option<SubscriptionSet>) -> Self {
        Self {
            store: Arc::new(InMemoryStore::new(set)),
            installers: Arc::new(RecordingInstallers::new(true)),
            integrations: Integrations::ALL,
            host_mode: HostMode::Serving,
            schema: FakeSchema::Migrated,
            calendar_clients: Vec::new(),
            resource: None,
        }
    }

    #[must_use]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::builder()
            .integrations(self.integrations)
            .host_mode(self.host_mode)
            .store(self.store.clone())
            .resources(Arc::new(StaticResources(self.resource.clone())))
            .installers(self.installers.clone())
            .calendar(Arc::new(StaticCalendar::with_clients(self.calendar_clients.clone())))
            .schema(Arc::new(self.schema))
            .build()
    }
}
