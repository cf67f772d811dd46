//! # Catalogs
//!
//! Fixed per-tier tables: billing product ids, package buckets and the vendor package
//! bundle each tier installs. Built once, never mutated.

use devents_domain::Tier;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const COMMUNITY_PRODUCT_ID: &str = "prod_RHux1cdd4puCl4";
const BUSINESS_PRODUCT_ID: &str = "prod_RHuzahTrqKrkkY";
const ENTERPRISE_PRODUCT_ID: &str = "prod_RHv03ip2qGhfsh";

const COMMUNITY_BUCKET: &str = "discourse-events-gems-community";
const BUSINESS_BUCKET: &str = "discourse-events-gems-business";

const COMMUNITY_PACKAGES: &[(&str, &str)] =
    &[("omnievent", "0.1.0.pre11"), ("omnievent_icalendar", "0.1.0.pre9")];

const PAID_PACKAGES: &[(&str, &str)] = &[
    ("omnievent", "0.1.0.pre11"),
    ("omnievent_icalendar", "0.1.0.pre9"),
    ("omnievent_api", "0.1.0.pre5"),
    ("omnievent_outlook", "0.1.0.pre11"),
    ("omnievent_google", "0.1.0.pre8"),
];

static COMMUNITY_BUNDLE: LazyLock<PackageBundle> =
    LazyLock::new(|| PackageBundle::from_pairs(COMMUNITY_PACKAGES));
static BUSINESS_BUNDLE: LazyLock<PackageBundle> =
    LazyLock::new(|| PackageBundle::from_pairs(PAID_PACKAGES));
static ENTERPRISE_BUNDLE: LazyLock<PackageBundle> =
    LazyLock::new(|| PackageBundle::from_pairs(PAID_PACKAGES));

/// Billing product id of `tier`.
#[must_use]
pub const fn product_id(tier: Tier) -> &'static str {
    match tier {
        Tier::Community => COMMUNITY_PRODUCT_ID,
        Tier::Business => BUSINESS_PRODUCT_ID,
        Tier::Enterprise => ENTERPRISE_PRODUCT_ID,
    }
}

/// Reverse lookup of [`product_id`].
#[must_use]
pub fn tier_for_product_id(id: &str) -> Option<Tier> {
    Tier::BY_PRIORITY.into_iter().find(|tier| product_id(*tier) == id)
}

/// Storage bucket holding the packages of `tier`. Business and enterprise share one.
#[must_use]
pub const fn bucket(tier: Tier) -> &'static str {
    match tier {
        Tier::Community => COMMUNITY_BUCKET,
        Tier::Business | Tier::Enterprise => BUSINESS_BUCKET,
    }
}

/// Packages installed for `tier`.
#[must_use]
pub fn package_bundle(tier: Tier) -> &'static PackageBundle {
    match tier {
        Tier::Community => &*COMMUNITY_BUNDLE,
        Tier::Business => &*BUSINESS_BUNDLE,
        Tier::Enterprise => &*ENTERPRISE_BUNDLE,
    }
}

/// Package name to pinned version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageBundle(BTreeMap<&'static str, &'static str>);

impl PackageBundle {
    fn from_pairs(pairs: &[(&'static str, &'static str)]) -> Self {
        Self(pairs.iter().copied().collect())
    }

    #[must_use]
    pub fn version(&self, package: &str) -> Option<&'static str> {
        self.0.get(package).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(name, version)| (*name, *version))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn product_ids_round_trip_for_every_tier() {
        for tier in Tier::iter() {
            assert_eq!(tier_for_product_id(product_id(tier)), Some(tier));
        }
        assert_eq!(tier_for_product_id("prod_unknown"), None);
    }

    #[test]
    fn paid_tiers_share_a_bucket() {
        assert_eq!(bucket(Tier::Business), bucket(Tier::Enterprise));
        assert_ne!(bucket(Tier::Community), bucket(Tier::Business));
    }

    #[test]
    fn community_bundle_is_a_subset_of_paid_bundles() {
        let community = package_bundle(Tier::Community);
        for paid in [Tier::Business, Tier::Enterprise] {
            let bundle = package_bundle(paid);
            for (name, version) in community.iter() {
                assert_eq!(bundle.version(name), Some(version));
            }
            assert!(bundle.version("omnievent_google").is_some());
        }
        assert_eq!(community.len(), 2);
        assert!(community.version("omnievent_outlook").is_none());
    }
}
