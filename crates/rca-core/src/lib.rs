//! # rca-core
//!
//! Core types, record shapes, and error types for root-cause context resolution.
//!
//! This crate provides the value types shared across all `rca-*` crates:
//! - Granularity tokens (`<count>_<UNIT>`) and their time units
//! - The resolved investigation `Context`, `SessionMeta`, and `SetupMode`
//! - Non-fatal `ResolutionErrors`
//! - Raw metric, anomaly, and session record shapes as delivered upstream
//! - URN prefix constants and formatting helpers
//! - Cross-cutting error types

pub mod context;
pub mod errors;
pub mod granularity;
pub mod records;
pub mod urn;

mod serde_helpers;
