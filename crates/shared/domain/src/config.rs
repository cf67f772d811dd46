use serde::Deserialize;
use std::fmt;

/// Environment overrides read from `DISCOURSE_EVENTS_*` variables.
///
/// Field names match the variable suffix in lowercase, so `DISCOURSE_EVENTS_GEMS_S3_REGION`
/// lands in `gems_s3_region`. Empty values count as unset.
#[derive(Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubscriptionOverrides {
    pub product: Option<String>,
    pub gems_s3_access_key_id: Option<String>,
    pub gems_s3_secret_access_key: Option<String>,
    pub gems_s3_region: Option<String>,
    pub gems_s3_bucket: Option<String>,
}

impl SubscriptionOverrides {
    /// Overrides that force a product without any subscription record.
    #[must_use]
    pub fn with_product(product: impl Into<String>) -> Self {
        Self { product: Some(product.into()), ..Self::default() }
    }

    #[must_use]
    pub fn product(&self) -> Option<&str> {
        present(self.product.as_ref())
    }

    #[must_use]
    pub fn access_key_id(&self) -> Option<&str> {
        present(self.gems_s3_access_key_id.as_ref())
    }

    #[must_use]
    pub fn secret_access_key(&self) -> Option<&str> {
        present(self.gems_s3_secret_access_key.as_ref())
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        present(self.gems_s3_region.as_ref())
    }

    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        present(self.gems_s3_bucket.as_ref())
    }
}

impl fmt::Debug for SubscriptionOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionOverrides")
            .field("product", &self.product)
            .field("gems_s3_access_key_id", &self.gems_s3_access_key_id)
            .field("gems_s3_secret_access_key", &self.gems_s3_secret_access_key.as_ref().map(|_| "***"))
            .field("gems_s3_region", &self.gems_s3_region)
            .field("gems_s3_bucket", &self.gems_s3_bucket)
            .finish()
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}
