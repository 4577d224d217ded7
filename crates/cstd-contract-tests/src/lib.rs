#![warn(missing_docs)]
//! # cstd-contract-tests
//!
//! Schema-validation harness for the frozen remote response contracts in
//! `contracts/`. All behavior lives under `tests/`.
