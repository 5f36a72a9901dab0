//! Nexus core - session and telemetry engine for the Nexus console
//!
//! This crate owns the behavioral core of the dashboard:
//! - Session manager: token/user lifecycle, persistence, route guarding
//! - Telemetry feed: stats polling with synthesized fallback gauges
//! - HTTP clients for the credential, stats and profile endpoints
//! - Flat key/value persistence (the localStorage analog)
//! - Client-side form validation and theme preference
//!
//! Rendering is deliberately out of scope; consumers read snapshots and
//! session state through the public API.

pub mod format;
pub mod services;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod theme;
pub mod validation;
