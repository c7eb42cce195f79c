//! # Layout Engine
//!
//! The one stateful piece of the core. Holds the active [`ProfileSpec`], the
//! current [`Layout`] in either Computed or Manual mode, and a monotonic
//! `update_version` that external observers use to detect changes cheaply.
//!
//! Mode is an explicit tagged variant, not a flag: every consumer is forced
//! to acknowledge that a manual layout may exist.
//!
//! ## Example
//!
//! ```rust
//! use punch_core::engine::LayoutEngine;
//! use punch_core::profile::{ProfileSpec, ProfileVariant};
//!
//! let spec = ProfileSpec::new(ProfileVariant::BearerSingle, 5200);
//! let mut engine = LayoutEngine::new(spec).unwrap();
//!
//! let v1 = engine.update_version();
//! let layout = engine.calculations().clone();
//! engine.set_manual_punches(layout.all_punches().cloned().collect(), None);
//! assert!(engine.is_manual());
//! assert!(engine.update_version() > v1);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{rules, PunchKind};
use crate::errors::PlanResult;
use crate::layout::{Layout, Punch};
use crate::planner::plan;
use crate::profile::{ProfileSpec, ProfileVariant};

/// Whether the current layout came from the planner or from user edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "layout")]
pub enum LayoutMode {
    /// Derived from the spec by the planner
    Computed(Layout),
    /// Installed by the host's punch editor
    Manual(Layout),
}

impl LayoutMode {
    pub fn layout(&self) -> &Layout {
        match self {
            LayoutMode::Computed(layout) | LayoutMode::Manual(layout) => layout,
        }
    }
}

/// Stateful wrapper around the planner.
///
/// Single-threaded by design: mutation requires `&mut self`, and the host
/// provides external synchronisation if it shares an engine across threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEngine {
    spec: ProfileSpec,
    mode: LayoutMode,
    update_version: u64,
}

impl LayoutEngine {
    /// Plan the spec and start in Computed mode at version 1.
    pub fn new(spec: ProfileSpec) -> PlanResult<Self> {
        let layout = plan(&spec)?;
        Ok(LayoutEngine {
            spec,
            mode: LayoutMode::Computed(layout),
            update_version: 1,
        })
    }

    /// Install a new spec and recompute. Clears Manual mode. On an invalid
    /// spec nothing changes, not even the version.
    pub fn update_calculations(&mut self, spec: ProfileSpec) -> PlanResult<u64> {
        let layout = plan(&spec)?;
        self.spec = spec;
        self.mode = LayoutMode::Computed(layout);
        self.bump();
        tracing::debug!(version = self.update_version, "layout recomputed");
        Ok(self.update_version)
    }

    /// Install a user-edited punch list and enter Manual mode.
    ///
    /// The list is partitioned by kind into the five layout lists, each kept
    /// sorted. On bearers the flange bolts are then re-synchronised to the
    /// surviving web tabs. Positions outside the member are retained so the
    /// clash detector can report them.
    pub fn set_manual_punches(&mut self, punches: Vec<Punch>, variant: Option<ProfileVariant>) -> u64 {
        let variant = variant.unwrap_or(self.spec.variant);

        let mut layout = Layout {
            bolt_holes: Vec::new(),
            dimples: Vec::new(),
            web_tabs: Vec::new(),
            service_holes: Vec::new(),
            stubs: Vec::new(),
            ..self.mode.layout().clone()
        };
        for punch in punches {
            layout.push_manual(punch);
        }

        if variant.is_bearer() {
            bolt_resync(&mut layout);
        }

        self.mode = LayoutMode::Manual(layout);
        self.bump();
        tracing::debug!(version = self.update_version, "manual layout installed");
        self.update_version
    }

    /// Leave Manual mode and repopulate from the active spec. A no-op in
    /// Computed mode (the version does not change).
    pub fn clear_manual_mode(&mut self) -> u64 {
        if matches!(self.mode, LayoutMode::Manual(_)) {
            let layout = plan(&self.spec).unwrap_or_default();
            self.mode = LayoutMode::Computed(layout);
            self.bump();
            tracing::debug!(version = self.update_version, "manual mode cleared");
        }
        self.update_version
    }

    /// The current layout.
    pub fn calculations(&self) -> &Layout {
        self.mode.layout()
    }

    /// Part code for the active spec, e.g. `B_5200_J600_S1200`.
    pub fn part_code(&self) -> String {
        let spec = &self.spec;
        let boxed = spec.variant.is_box() || (spec.variant.is_joist() && spec.end_box_joist);
        let suffix = if boxed { "_BOX" } else { "" };
        if spec.variant.is_bearer() {
            format!(
                "B_{}_J{}_S{}{}",
                spec.length_mm, spec.joist_spacing_mm, spec.stub_spacing_mm, suffix
            )
        } else {
            format!("J_{}_S{}{}", spec.length_mm, spec.joist_spacing_mm, suffix)
        }
    }

    pub fn update_version(&self) -> u64 {
        self.update_version
    }

    pub fn spec(&self) -> &ProfileSpec {
        &self.spec
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.mode, LayoutMode::Manual(_))
    }

    fn bump(&mut self) {
        self.update_version += 1;
    }
}

/// Re-synchronise bearer flange bolts to the web tabs: keep only the end
/// bolts, then give each active tab its alternating-offset partner bolt.
///
/// Idempotent: the appended bolts are interior, so a second pass keeps the
/// same end bolts and re-derives the same partners.
pub fn bolt_resync(layout: &mut Layout) {
    let length = layout.length_mm;
    layout.bolt_holes.retain(|b| {
        b.position.as_mm() <= rules::MIN_CLEARANCE
            || b.position.as_mm() >= length - rules::MIN_CLEARANCE
    });

    let tabs: Vec<f64> = layout
        .web_tabs
        .iter()
        .filter(|t| t.active)
        .map(|t| t.position.as_mm())
        .collect();
    for (i, tab) in tabs.iter().enumerate() {
        let pos = tab + rules::BOLT_OFFSET_PATTERN[i % 2];
        if pos > rules::MIN_CLEARANCE && pos < length - rules::MIN_CLEARANCE {
            layout.push(PunchKind::BoltHole, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::HoleType;

    fn bearer_spec() -> ProfileSpec {
        let mut spec = ProfileSpec::new(ProfileVariant::BearerSingle, 5200);
        spec.stub_positions = vec![331, 1531, 2731, 3931, 4869];
        spec.stubs_enabled = true;
        spec
    }

    fn joist_spec() -> ProfileSpec {
        let mut spec = ProfileSpec::new(ProfileVariant::JoistSingle, 6000);
        spec.hole_type = HoleType::R200;
        spec
    }

    #[test]
    fn test_new_starts_computed() {
        let engine = LayoutEngine::new(bearer_spec()).unwrap();
        assert!(!engine.is_manual());
        assert_eq!(engine.update_version(), 1);
        assert!(!engine.calculations().web_tabs.is_empty());
    }

    #[test]
    fn test_update_calculations_bumps_version() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let v = engine.update_calculations(joist_spec()).unwrap();
        assert_eq!(v, 2);
        assert_eq!(engine.spec().variant, ProfileVariant::JoistSingle);
    }

    #[test]
    fn test_invalid_spec_leaves_state_untouched() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let mut bad = joist_spec();
        bad.length_mm = 10;
        assert!(engine.update_calculations(bad).is_err());
        assert_eq!(engine.update_version(), 1);
        assert_eq!(engine.spec().variant, ProfileVariant::BearerSingle);
    }

    #[test]
    fn test_manual_mode_partitions_by_kind() {
        let mut engine = LayoutEngine::new(joist_spec()).unwrap();
        let punches = vec![
            Punch::new(PunchKind::WebTab, 2000.0),
            Punch::new(PunchKind::BoltHole, 30.0),
            Punch::new(PunchKind::Dimple, 75.0),
            Punch::new(PunchKind::MServiceHole, 1000.0),
            Punch::new(PunchKind::WebTab, 1000.0),
        ];
        engine.set_manual_punches(punches, None);

        assert!(engine.is_manual());
        let layout = engine.calculations();
        let tabs: Vec<f64> = layout.web_tabs.iter().map(|p| p.position.as_mm()).collect();
        assert_eq!(tabs, vec![1000.0, 2000.0]);
        assert_eq!(layout.service_holes.len(), 1);
        // Joists get no resync: bolts stay exactly as supplied
        assert_eq!(layout.bolt_holes.len(), 1);
    }

    #[test]
    fn test_bearer_manual_resyncs_bolts() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let punches = vec![
            Punch::new(PunchKind::BoltHole, 30.0),
            Punch::new(PunchKind::BoltHole, 570.5),
            Punch::new(PunchKind::BoltHole, 5170.0),
            Punch::new(PunchKind::WebTab, 600.0),
            Punch::new(PunchKind::WebTab, 1200.0),
        ];
        engine.set_manual_punches(punches, None);

        let bolts: Vec<f64> = engine
            .calculations()
            .bolt_holes
            .iter()
            .map(|p| p.position.as_mm())
            .collect();
        // End bolts kept, interior 570.5 discarded, tabs get alternating
        // partners: 600−29.5, 1200+29.5
        assert_eq!(bolts, vec![30.0, 570.5, 1229.5, 5170.0]);
    }

    #[test]
    fn test_resync_skips_inactive_tabs() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let mut disabled = Punch::new(PunchKind::WebTab, 600.0);
        disabled.active = false;
        let punches = vec![disabled, Punch::new(PunchKind::WebTab, 1200.0)];
        engine.set_manual_punches(punches, None);

        let bolts: Vec<f64> = engine
            .calculations()
            .bolt_holes
            .iter()
            .map(|p| p.position.as_mm())
            .collect();
        // Only the active tab gets a partner, and it is index 0 (−29.5)
        assert_eq!(bolts, vec![1170.5]);
    }

    #[test]
    fn test_resync_idempotent() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let punches: Vec<Punch> = engine.calculations().all_punches().cloned().collect();
        engine.set_manual_punches(punches, None);

        let mut once = engine.calculations().clone();
        let mut twice = once.clone();
        bolt_resync(&mut once);
        bolt_resync(&mut twice);
        bolt_resync(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clear_manual_recomputes() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let computed = engine.calculations().clone();
        engine.set_manual_punches(vec![Punch::new(PunchKind::WebTab, 900.0)], None);
        assert_ne!(engine.calculations(), &computed);

        let v = engine.clear_manual_mode();
        assert_eq!(v, 3);
        assert!(!engine.is_manual());
        assert_eq!(engine.calculations(), &computed);
    }

    #[test]
    fn test_clear_in_computed_mode_is_noop() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let v = engine.clear_manual_mode();
        assert_eq!(v, 1);
    }

    #[test]
    fn test_version_strictly_monotonic() {
        let mut engine = LayoutEngine::new(bearer_spec()).unwrap();
        let mut last = engine.update_version();
        let v = engine.set_manual_punches(Vec::new(), None);
        assert!(v > last);
        last = v;
        let v = engine.clear_manual_mode();
        assert!(v > last);
        last = v;
        let v = engine.update_calculations(joist_spec()).unwrap();
        assert!(v > last);
    }

    #[test]
    fn test_part_codes() {
        let engine = LayoutEngine::new(bearer_spec()).unwrap();
        assert_eq!(engine.part_code(), "B_5200_J600_S1200");

        let engine = LayoutEngine::new(joist_spec()).unwrap();
        assert_eq!(engine.part_code(), "J_6000_S600");

        let mut spec = bearer_spec();
        spec.variant = ProfileVariant::BearerBox;
        let engine = LayoutEngine::new(spec).unwrap();
        assert_eq!(engine.part_code(), "B_5200_J600_S1200_BOX");
    }

    #[test]
    fn test_manual_preserves_out_of_range() {
        let mut engine = LayoutEngine::new(joist_spec()).unwrap();
        engine.set_manual_punches(vec![Punch::new(PunchKind::WebTab, 9500.0)], None);
        assert_eq!(engine.calculations().web_tabs.len(), 1);
    }
}
