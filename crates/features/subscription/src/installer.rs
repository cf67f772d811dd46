//! # Package Installer Configuration
//!
//! Resolves where tier packages are fetched from and with which credentials. Each value
//! comes from its environment override first, then from the subscription's storage
//! resource (credentials) or the bucket catalog (bucket).

use crate::catalog;
use crate::ports::StorageCredentials;
use devents_domain::constants::PLUGIN_NAME;
use devents_domain::{SubscriptionOverrides, Tier};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Settings handed to the [`crate::ports::PackageInstallerFactory`].
///
/// Credentials are wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct S3GemConfig {
    #[zeroize(skip)]
    pub plugin_name: &'static str,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
}

impl S3GemConfig {
    /// Resolves the installer settings for `tier`.
    ///
    /// `resource` is the storage record of the active subscription (if any).
    #[must_use]
    pub fn resolve(
        overrides: &SubscriptionOverrides,
        resource: Option<&StorageCredentials>,
        tier: Option<Tier>,
    ) -> Self {
        Self {
            plugin_name: PLUGIN_NAME,
            access_key_id: first_of(
                overrides.access_key_id(),
                resource.and_then(|r| r.access_key_id.as_deref()),
            ),
            secret_access_key: first_of(
                overrides.secret_access_key(),
                resource.and_then(|r| r.secret_access_key.as_deref()),
            ),
            region: first_of(overrides.region(), resource.and_then(|r| r.region.as_deref())),
            bucket: first_of(overrides.bucket(), tier.map(catalog::bucket)),
        }
    }

    /// Whether every value an installer needs is present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.access_key_id.is_some()
            && self.secret_access_key.is_some()
            && self.region.is_some()
            && self.bucket.is_some()
    }
}

fn first_of(preferred: Option<&str>, fallback: Option<&str>) -> Option<String> {
    preferred.or(fallback).map(str::to_owned)
}

impl fmt::Debug for S3GemConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3GemConfig")
            .field("plugin_name", &self.plugin_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish()
    }
}
