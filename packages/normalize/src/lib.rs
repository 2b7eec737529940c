#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text primitives shared by segmentation, gazetteer matching and record
//! comparison.
//!
//! - [`sanitize`] / [`normalize`]: raw cell → clean text → [`NormalizedKey`]
//! - [`StreetPrefixStripper`]: drops leading street-type words
//! - [`AliasTable`]: resolves municipality aliases to a canonical key
//! - [`ratio`]: symmetric character similarity in `[0, 1]`

pub mod aliases;
pub mod normalize;
pub mod prefixes;
pub mod similarity;

pub use aliases::{AliasError, AliasTable, AliasTableBuilder};
pub use normalize::{NormalizedKey, first_non_empty, normalize, sanitize};
pub use prefixes::{STREET_PREFIXES, StreetPrefixStripper};
pub use similarity::ratio;
