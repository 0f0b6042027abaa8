//! Insight Brief - research brief model and canonicalization
//!
//! Clients submit a loosely-structured research brief. Two of its fields are
//! polymorphic and accept several legacy encodings:
//! - `scope`: structured `{type, value}`, plain text, or an already-canonical object
//! - `data_sources`: named object, positional array, or nothing
//!
//! This crate classifies each encoding into a tagged input variant and resolves
//! it into one canonical shape. Canonicalization is total: it never fails.
//!
//! # Example
//!
//! ```rust
//! use insight_brief::Brief;
//! use serde_json::json;
//!
//! let mut brief: Brief = serde_json::from_value(json!({
//!     "mode": "quick",
//!     "business_goal": "grow",
//!     "scope": "wireless earbuds",
//!     "data_sources": ["catalog.json", "reviews.json"],
//! }))
//! .unwrap();
//!
//! brief.normalize();
//! assert!(brief.missing_fields().is_empty());
//! assert_eq!(brief.data_sources().map(|s| s.len()), Some(2));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod brief;
pub mod json;
pub mod scope;
pub mod sources;

pub use brief::{Brief, REQUIRED_FIELDS};
pub use scope::{normalize_scope, CanonicalScope, Scope, ScopeInput, ScopeSiblings};
pub use sources::{
    normalize_data_sources, DataSourceEntry, DataSources, DataSourcesInput, POSITIONAL_KEYS,
};

/// Placeholder for any canonical field the client left unset
pub const UNKNOWN: &str = "Unknown";

/// Default timeframe when the brief names none
pub const UNSPECIFIED: &str = "Unspecified";
