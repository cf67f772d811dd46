use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Commercial subscription level.
///
/// Variants are declared lowest first, so the derived `Ord` ranks
/// `Enterprise > Business > Community`. "No subscription" is `Option::<Tier>::None`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Community,
    Business,
    Enterprise,
}

impl Tier {
    /// Tiers in the order an active subscription is searched for.
    pub const BY_PRIORITY: [Self; 3] = [Self::Enterprise, Self::Business, Self::Community];

    /// Parses a product name as used by overrides and catalogs.
    ///
    /// Unknown names yield `None` rather than an error: a product string that
    /// names no tier simply unlocks nothing.
    #[must_use]
    pub fn from_product(product: &str) -> Option<Self> {
        product.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn ranks_enterprise_highest() {
        assert!(Tier::Enterprise > Tier::Business);
        assert!(Tier::Business > Tier::Community);
        assert_eq!(Tier::iter().max(), Some(Tier::Enterprise));
    }

    #[test]
    fn priority_is_descending_rank() {
        let mut sorted = Tier::BY_PRIORITY;
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(sorted, Tier::BY_PRIORITY);
    }

    #[test]
    fn product_names_are_lowercase() {
        assert_eq!(Tier::Business.to_string(), "business");
        assert_eq!(Tier::from_product("enterprise"), Some(Tier::Enterprise));
        assert_eq!(Tier::from_product("Enterprise"), None);
        assert_eq!(Tier::from_product("platinum"), None);
        assert_eq!(Tier::from_product(""), None);
    }
}
