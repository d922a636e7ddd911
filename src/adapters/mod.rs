//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure, and exposes the service over HTTP.
//!
//! Adapter categories:
//! - `api`: axum routes for click/adjust/stats
//! - `metrics`: Prometheus metrics export and health checks
//! - `persistence`: Atomic JSON snapshot file and in-memory store

pub mod api;
pub mod metrics;
pub mod persistence;
