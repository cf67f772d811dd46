//! # Subscription Gating
//!
//! Decides which Discourse Events features a site may use, based on its commercial
//! subscription tier, and installs the vendor package bundle that tier pays for.
//!
//! ## Architecture
//!
//! 1.  **Catalogs ([`catalog`]):** fixed per-tier product ids, storage buckets and package
//!     bundles.
//! 2.  **Feature matrix ([`matrix`]):** `dimension -> attribute -> value -> tier` flags.
//! 3.  **Manager ([`manager`]):** per-request resolver. Finds the highest-ranked active
//!     subscription (enterprise, business, community), answers `supports` queries and runs
//!     the boot-time setup (refresh subscriptions, install packages).
//! 4.  **Ports ([`ports`]):** traits for everything the manager queries but does not own:
//!     the subscription store, resource directory, package installer, calendar client
//!     registry and database schema.
//!
//! ## Example
//!
//! ```rust
//! use devents_subscription::matrix::base_features;
//! use devents_subscription::{Tier, catalog};
//!
//! let google = base_features().get("provider", "provider_type", "google").unwrap();
//! assert!(!google.allows(Some(Tier::Community)));
//! assert!(google.allows(Some(Tier::Business)));
//! assert_eq!(catalog::bucket(Tier::Business), catalog::bucket(Tier::Enterprise));
//! ```
//!
//! Hosts wire real collaborators into [`Collaborators`] and build one
//! [`SubscriptionManager`] per request; the `testing` feature provides in-memory doubles.

pub mod catalog;
mod error;
pub mod installer;
pub mod manager;
pub mod matrix;
pub mod ports;
#[cfg(feature = "testing")]
pub mod testing;

pub use crate::error::{SubscriptionError, SubscriptionErrorExt};
pub use crate::manager::{Collaborators, SetupOptions, SetupOutcome, SubscriptionManager};
pub use crate::matrix::{FeatureMatrix, TierSupport};
pub use devents_domain::{HostMode, Integrations, SubscriptionOverrides, Tier};
