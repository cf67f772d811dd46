//! # Domain Models
//!
//! Pure subscription-gating types with minimal dependencies (`serde`, `bitflags`, `strum`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod integrations;
pub mod tier;

pub use crate::config::SubscriptionOverrides;
pub use crate::integrations::{HostMode, Integrations};
pub use crate::tier::Tier;
