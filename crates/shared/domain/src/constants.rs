//! Names shared between the subscription client, the feature matrix and the host plugin.

/// Registered plugin name used for subscription and resource lookups.
pub const PLUGIN_NAME: &str = "discourse-events";

/// Table created by the subscription client once its migrations have run.
pub const SUBSCRIPTIONS_TABLE: &str = "subscription_client_subscriptions";

/// Prefix of every environment override (`DISCOURSE_EVENTS_PRODUCT`, ...).
pub const ENV_PREFIX: &str = "DISCOURSE_EVENTS";

// Feature matrix dimensions and attributes.
pub const PROVIDER: &str = "provider";
pub const PROVIDER_TYPE: &str = "provider_type";
pub const SOURCE: &str = "source";
pub const IMPORT_TYPE: &str = "import_type";
pub const TOPIC_SYNC: &str = "topic_sync";
pub const CLIENT: &str = "client";

// Provider types.
pub const ICALENDAR: &str = "icalendar";
pub const GOOGLE: &str = "google";
pub const OUTLOOK: &str = "outlook";

// Import types.
pub const IMPORT: &str = "import";
pub const IMPORT_PUBLISH: &str = "import_publish";
pub const PUBLISH: &str = "publish";

// Topic sync modes.
pub const MANUAL: &str = "manual";
pub const AUTO: &str = "auto";

// Source clients.
pub const DISCOURSE_EVENTS_CLIENT: &str = "discourse_events";
pub const DISCOURSE_CALENDAR_CLIENT: &str = "discourse_calendar";
