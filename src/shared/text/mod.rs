//! Text processing utilities for cast name matching and formatting.
//!
//! # Components
//!
//! - [`contains_chinese`] - CJK ideograph detection used throughout the cast processor
//! - [`normalize_for_matching`] - diacritic/case-insensitive key for cross-catalog name matching
//! - [`CjkSpaceStripper`] - strips full-width and ASCII spaces from CJK text
//! - [`strip_zero_width_space`] / [`dedup_with_zero_width_space`] - display-name dedup suffixing

mod cjk;

pub use cjk::{contains_chinese, dedup_with_zero_width_space, normalize_for_matching, strip_zero_width_space, CjkSpaceStripper};
