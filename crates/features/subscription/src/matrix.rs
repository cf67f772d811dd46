//! # Feature Matrix
//!
//! Which tier unlocks which feature value, keyed `dimension -> attribute -> value`.
//! The base table is a process-wide constant; the resolver adds the calendar client row
//! on top of a fresh copy each time it builds the matrix.

use devents_domain::Tier;
use devents_domain::constants::{
    AUTO, CLIENT, DISCOURSE_EVENTS_CLIENT, GOOGLE, ICALENDAR, IMPORT, IMPORT_PUBLISH,
    IMPORT_TYPE, MANUAL, OUTLOOK, PROVIDER, PROVIDER_TYPE, PUBLISH, SOURCE, TOPIC_SYNC,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static BASE_FEATURES: LazyLock<FeatureMatrix> = LazyLock::new(|| {
    let mut matrix = FeatureMatrix::default();

    matrix.insert(PROVIDER, PROVIDER_TYPE, ICALENDAR, TierSupport::ANY_TIER);
    matrix.insert(PROVIDER, PROVIDER_TYPE, GOOGLE, TierSupport::PAID_ONLY);
    matrix.insert(PROVIDER, PROVIDER_TYPE, OUTLOOK, TierSupport::PAID_ONLY);

    matrix.insert(SOURCE, IMPORT_TYPE, IMPORT, TierSupport::ANY_TIER);
    matrix.insert(SOURCE, IMPORT_TYPE, IMPORT_PUBLISH, TierSupport::PAID_ONLY);
    matrix.insert(SOURCE, IMPORT_TYPE, PUBLISH, TierSupport::PAID_ONLY);

    matrix.insert(SOURCE, TOPIC_SYNC, MANUAL, TierSupport::ANY_TIER);
    matrix.insert(SOURCE, TOPIC_SYNC, AUTO, TierSupport::ANY_TIER);

    matrix.insert(SOURCE, CLIENT, DISCOURSE_EVENTS_CLIENT, TierSupport::ANY_TIER);

    matrix
});

/// The static matrix, without host-dependent rows.
#[must_use]
pub fn base_features() -> &'static FeatureMatrix {
    &BASE_FEATURES
}

/// Support flags for one feature value, one per tier plus "no subscription".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TierSupport {
    pub none: bool,
    pub community: bool,
    pub business: bool,
    pub enterprise: bool,
}

impl TierSupport {
    /// Available to every subscriber.
    pub const ANY_TIER: Self = Self { none: false, community: true, business: true, enterprise: true };
    /// Business and enterprise only.
    pub const PAID_ONLY: Self = Self { none: false, community: false, business: true, enterprise: true };

    #[must_use]
    pub const fn allows(&self, tier: Option<Tier>) -> bool {
        match tier {
            None => self.none,
            Some(Tier::Community) => self.community,
            Some(Tier::Business) => self.business,
            Some(Tier::Enterprise) => self.enterprise,
        }
    }
}

type Values = BTreeMap<&'static str, TierSupport>;
type Attributes = BTreeMap<&'static str, Values>;

/// Nested `dimension -> attribute -> value -> TierSupport` table.
///
/// Serializes to the shape the admin client reads, e.g.
/// `{"provider":{"provider_type":{"google":{"none":false,"community":false,...}}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureMatrix(BTreeMap<&'static str, Attributes>);

impl FeatureMatrix {
    /// Adds or replaces a row.
    pub fn insert(
        &mut self,
        dimension: &'static str,
        attribute: &'static str,
        value: &'static str,
        support: TierSupport,
    ) {
        self.0.entry(dimension).or_default().entry(attribute).or_default().insert(value, support);
    }

    /// The row for a path, or `None` if any key is missing.
    #[must_use]
    pub fn get(&self, dimension: &str, attribute: &str, value: &str) -> Option<TierSupport> {
        self.0.get(dimension)?.get(attribute)?.get(value).copied()
    }

    /// Whether `tier` may use the value. Missing paths are unsupported.
    #[must_use]
    pub fn allows(&self, dimension: &str, attribute: &str, value: &str, tier: Option<Tier>) -> bool {
        self.get(dimension, attribute, value).is_some_and(|support| support.allows(tier))
    }

    /// Every row as `(dimension, attribute, value, support)`.
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, &'static str, &'static str, TierSupport)> + '_ {
        self.0.iter().flat_map(|(dimension, attributes)| {
            attributes.iter().flat_map(move |(attribute, values)| {
                values.iter().map(move |(value, support)| (*dimension, *attribute, *value, *support))
            })
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subscription_unlocks_nothing() {
        assert!(base_features().rows().all(|(_, _, _, support)| !support.none));
    }

    #[test]
    fn google_requires_a_paid_tier() {
        let matrix = base_features();
        assert!(!matrix.allows(PROVIDER, PROVIDER_TYPE, GOOGLE, Some(Tier::Community)));
        assert!(matrix.allows(PROVIDER, PROVIDER_TYPE, GOOGLE, Some(Tier::Business)));
        assert!(matrix.allows(PROVIDER, PROVIDER_TYPE, GOOGLE, Some(Tier::Enterprise)));
    }

    #[test]
    fn missing_paths_are_unsupported() {
        let matrix = base_features();
        assert!(matrix.get(PROVIDER, PROVIDER_TYPE, "caldav").is_none());
        assert!(!matrix.allows(PROVIDER, "provider_kind", ICALENDAR, Some(Tier::Enterprise)));
        assert!(!matrix.allows("calendar", PROVIDER_TYPE, ICALENDAR, Some(Tier::Enterprise)));
    }

    #[test]
    fn base_table_has_no_calendar_client() {
        assert_eq!(base_features().len(), 9);
        assert!(base_features().get(SOURCE, CLIENT, "discourse_calendar").is_none());
    }

    #[test]
    fn serializes_to_nested_json() {
        let json = serde_json::to_value(base_features()).expect("serialize matrix");
        assert_eq!(json["provider"]["provider_type"]["google"]["business"], true);
        assert_eq!(json["provider"]["provider_type"]["google"]["community"], false);
        assert_eq!(json["source"]["topic_sync"]["auto"]["none"], false);
    }
}
