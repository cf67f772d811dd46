//! Kernel utilities shared across slices.
//! Keep this crate lightweight: configuration loading and re-exports of the domain types.
//!
//! ## Config loading
//! ```rust,no_run
//! use devents_kernel::config::load_overrides;
//!
//! let overrides = load_overrides().unwrap_or_default();
//! if let Some(product) = overrides.product() {
//!     println!("product forced to {product}");
//! }
//! ```
pub mod config;

pub use devents_domain as domain;
