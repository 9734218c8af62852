//! Student management core: admission intake, decision handling, conversion
//! of approved applications into enrollment records, and fee receipts.
//!
//! The crate exposes domain types, storage seams (traits), services, and
//! axum routers. Concrete stores live with the binary that wires them up.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
