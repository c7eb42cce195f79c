//! # punch_core - NC Punch Program Planning Engine
//!
//! `punch_core` plans and emits numerical-control punch programs for
//! roll-formed steel profiles (joists and bearers) used in modular flooring
//! platforms. Given a profile description it deterministically computes
//! every longitudinal punch position, validates the result against the
//! manufacturing rule set, and serialises the program line a press brake
//! consumes verbatim.
//!
//! ## Design Philosophy
//!
//! - **Pure core**: planning, advising, clash detection and encoding are
//!   pure functions; the only mutable state is the [`engine::LayoutEngine`]
//! - **JSON-First**: all public types implement Serialize/Deserialize
//! - **Findings as data**: clashes are graded diagnostics, never panics
//! - **Exact positions**: half-millimetre fixed point, no float drift
//!
//! ## Quick Start
//!
//! ```rust
//! use punch_core::clash::detect_clashes;
//! use punch_core::csv::{encode_csv, CsvMeta};
//! use punch_core::engine::LayoutEngine;
//! use punch_core::profile::{ProfileSpec, ProfileVariant};
//!
//! let mut spec = ProfileSpec::new(ProfileVariant::BearerSingle, 5200);
//! spec.stubs_enabled = true;
//! spec.stub_positions = vec![331, 1531, 2731, 3931, 4869];
//!
//! let engine = LayoutEngine::new(spec).unwrap();
//! let layout = engine.calculations();
//!
//! let diagnostics = detect_clashes(layout, engine.spec());
//! if diagnostics.is_export_ready() {
//!     let line = encode_csv(layout, &CsvMeta::new(engine.part_code(), 1));
//!     assert!(line.starts_with("csvCOMPONENT,B1-1,"));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Punch stations, die geometry, manufacturing constants
//! - [`span_table`] - Span-table advisor (length, kPa) → variant/spacing
//! - [`planner`] - The rule-driven layout generator
//! - [`engine`] - Computed/Manual override engine with change versioning
//! - [`clash`] - Post-layout validation against the rule set
//! - [`csv`] - Press wire-format encode/decode
//! - [`profile`] - Profile specification input types
//! - [`layout`] - The layout value type
//! - [`units`] - Half-millimetre position quantisation
//! - [`errors`] - Structured error types

pub mod catalog;
pub mod clash;
pub mod csv;
pub mod engine;
pub mod errors;
pub mod layout;
pub mod planner;
pub mod profile;
pub mod span_table;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalog::{Plane, PunchGeometry, PunchKind, Shape};
pub use clash::{detect_clashes, Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use csv::{decode_punches, encode_csv, CsvMeta};
pub use engine::{bolt_resync, LayoutEngine, LayoutMode};
pub use errors::{PlanError, PlanResult};
pub use layout::{Layout, Punch};
pub use planner::plan;
pub use profile::{HoleType, KpaRating, ProfileSpec, ProfileVariant, PunchStations};
pub use span_table::{advise, SpanAdvice};
pub use units::{round_half, HalfMm};
