#![warn(missing_docs)]
//! # cstd-benchmarks
//!
//! Bounded smoke benchmarks over the deterministic digest and listing-URL
//! paths. All behavior lives under `tests/`.
