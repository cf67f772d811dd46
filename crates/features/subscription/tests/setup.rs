use devents_subscription::catalog::{package_bundle, product_id};
use devents_subscription::ports::{StorageCredentials, Subscription, SubscriptionSet};
use devents_subscription::testing::{FakeHost, FakeSchema, RecordingInstallers};
use devents_subscription::{
    HostMode, Integrations, SetupOptions, SetupOutcome, SubscriptionError, SubscriptionManager,
    SubscriptionOverrides, Tier,
};
use std::sync::Arc;

fn subscribed_host(tier: Tier) -> FakeHost {
    let set = SubscriptionSet {
        subscriptions: vec![Subscription::new(product_id(tier))],
        resource: Some(StorageCredentials {
            access_key_id: Some("key".to_owned()),
            secret_access_key: Some("secret".to_owned()),
            region: Some("us-east-1".to_owned()),
        }),
    };
    FakeHost::new(Some(set))
}

fn run(host: &FakeHost, overrides: SubscriptionOverrides, options: SetupOptions) -> Result<SetupOutcome, SubscriptionError> {
    SubscriptionManager::run_setup(host.collaborators(), overrides, options)
}

#[test]
fn full_setup_updates_and_installs_the_tier_bundle() {
    let host = subscribed_host(Tier::Business);
    let outcome = run(&host, SubscriptionOverrides::default(), SetupOptions::ALL).unwrap();

    assert_eq!(outcome, SetupOutcome { ready: true, updated: true, installed: Some(Tier::Business) });
    assert_eq!(host.store.updates(), 1);
    assert_eq!(host.installers.installs(), vec![package_bundle(Tier::Business).clone()]);

    let configs = host.installers.configs();
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].plugin_name, "discourse-events");
    assert_eq!(configs[0].bucket.as_deref(), Some("discourse-events-gems-business"));
    assert_eq!(configs[0].access_key_id.as_deref(), Some("key"));
}

#[test]
fn update_only_never_installs() {
    let host = subscribed_host(Tier::Enterprise);
    let options = SetupOptions { update: true, install: false };
    let outcome = run(&host, SubscriptionOverrides::default(), options).unwrap();

    assert!(outcome.updated);
    assert!(outcome.installed.is_none());
    assert!(host.installers.installs().is_empty());
}

#[test]
fn install_requires_a_subscription() {
    let host = FakeHost::new(None);
    let options = SetupOptions { update: false, install: true };
    let outcome = run(&host, SubscriptionOverrides::default(), options).unwrap();

    assert!(outcome.ready);
    assert!(outcome.installed.is_none());
    assert!(host.installers.configs().is_empty());
}

#[test]
fn product_override_installs_without_a_subscription() {
    let host = FakeHost::new(None);
    let options = SetupOptions { update: false, install: true };
    let outcome = run(&host, SubscriptionOverrides::with_product("community"), options).unwrap();

    assert_eq!(outcome.installed, Some(Tier::Community));
    assert_eq!(host.installers.installs(), vec![package_bundle(Tier::Community).clone()]);
    assert_eq!(host.installers.configs()[0].bucket.as_deref(), Some("discourse-events-gems-community"));
}

#[test]
fn bucket_override_wins() {
    let host = subscribed_host(Tier::Enterprise);
    let overrides = SubscriptionOverrides {
        gems_s3_bucket: Some("private-mirror".to_owned()),
        ..SubscriptionOverrides::default()
    };
    run(&host, overrides, SetupOptions::ALL).unwrap();

    assert_eq!(host.installers.configs()[0].bucket.as_deref(), Some("private-mirror"));
}

#[test]
fn installer_not_ready_skips_install() {
    let mut host = subscribed_host(Tier::Business);
    host.installers = Arc::new(RecordingInstallers::new(false));
    let outcome = run(&host, SubscriptionOverrides::default(), SetupOptions::ALL).unwrap();

    assert!(outcome.updated);
    assert!(outcome.installed.is_none());
    assert_eq!(host.installers.configs().len(), 1);
    assert!(host.installers.installs().is_empty());
}

#[test]
fn script_mode_is_a_no_op() {
    let mut host = subscribed_host(Tier::Business);
    host.host_mode = HostMode::Script;
    let outcome = run(&host, SubscriptionOverrides::default(), SetupOptions::ALL).unwrap();

    assert_eq!(outcome, SetupOutcome::default());
    assert_eq!(host.store.updates(), 0);
    assert_eq!(host.store.lookups(), 0);
}

#[test]
fn missing_database_is_not_ready() {
    let mut host = subscribed_host(Tier::Business);
    host.schema = FakeSchema::NoDatabase;
    let outcome = run(&host, SubscriptionOverrides::default(), SetupOptions::ALL).unwrap();

    assert!(!outcome.ready);
    assert_eq!(host.store.updates(), 0);
}

#[test]
fn unmigrated_database_is_not_ready() {
    let mut host = subscribed_host(Tier::Business);
    host.schema = FakeSchema::NotMigrated;
    let outcome = run(&host, SubscriptionOverrides::default(), SetupOptions::ALL).unwrap();

    assert!(!outcome.ready);
}

#[test]
fn other_database_errors_propagate() {
    let mut host = subscribed_host(Tier::Business);
    host.schema = FakeSchema::Broken;
    let err = run(&host, SubscriptionOverrides::default(), SetupOptions::ALL).unwrap_err();

    assert!(matches!(err, SubscriptionError::Database { .. }));
}

#[test]
fn missing_subscription_client_is_not_ready() {
    let mut host = subscribed_host(Tier::Business);
    host.integrations = Integrations::OMNIEVENT;
    let manager = SubscriptionManager::new(host.collaborators(), SubscriptionOverrides::default());

    assert!(manager.ready());
    assert!(!manager.ready_to_setup().unwrap());
    assert_eq!(manager.setup(SetupOptions::ALL).unwrap(), SetupOutcome::default());
}

#[test]
fn ready_tracks_the_calendar_engine() {
    let mut host = FakeHost::new(None);
    host.integrations = Integrations::SUBSCRIPTION_CLIENT;
    let manager = SubscriptionManager::new(host.collaborators(), SubscriptionOverrides::default());

    assert!(!manager.ready());
    assert!(manager.ready_to_setup().unwrap());
}

#[test]
fn unknown_product_never_builds_an_installer() {
    let host = FakeHost::new(None);
    let options = SetupOptions { update: false, install: true };
    let outcome = run(&host, SubscriptionOverrides::with_product("platinum"), options).unwrap();

    assert!(outcome.ready);
    assert!(outcome.installed.is_none());
    assert!(host.installers.configs().is_empty());
    assert!(host.installers.installs().is_empty());
}
