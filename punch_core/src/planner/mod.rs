//! # Layout Planner
//!
//! The rule-driven generator. [`plan`] consumes a [`ProfileSpec`] and
//! produces a [`Layout`] with every punch class placed along the member:
//! bolt holes, dimples, web tabs, service holes and stub/corner-bracket
//! cuts.
//!
//! The dispatch lattice is variant × screens × joist-box:
//!
//! ```text
//! Bearer ∧ ¬screens ∧ ¬joist_box   → bearer normal
//! Bearer ∧ ¬screens ∧  joist_box   → bearer box mode
//! Bearer ∧  screens ∧ ¬joist_box   → bearer screens
//! Bearer ∧  screens ∧  joist_box   → bearer screens box mode
//! Joist  ∧ ¬screens                → joist normal
//! Joist  ∧  screens                → joist screens
//! ```
//!
//! The planner never runs clash detection; it may legitimately produce a
//! layout the clash detector will grade down. Positions that fall outside
//! the member are dropped silently (manual overrides keep them, see the
//! override engine).

mod bearer;
mod joist;

use crate::catalog::{rules, PunchKind};
use crate::errors::PlanResult;
use crate::layout::Layout;
use crate::profile::{HoleType, ProfileSpec};

/// Generate the full punch layout for a member.
///
/// Pure: equal specs produce byte-identical layouts. Returns an error only
/// for an out-of-range spec, before any layout work happens.
pub fn plan(spec: &ProfileSpec) -> PlanResult<Layout> {
    spec.validate()?;

    let mut layout = base_layout(spec);
    if spec.variant.is_bearer() {
        bearer::generate(spec, &mut layout);
    } else {
        joist::generate(spec, &mut layout);
    }
    Ok(layout)
}

/// Compute the derived scalars every branch needs.
fn base_layout(spec: &ProfileSpec) -> Layout {
    if spec.hole_type == HoleType::Legacy {
        tracing::warn!(
            diameter_mm = rules::LEGACY_HOLE_DIAMETER,
            "unrecognised hole type, falling back to legacy diameter"
        );
    }
    let length = spec.length_mm as f64;
    let hole_diameter = spec.hole_diameter_mm();
    let end_exclusion = 2.0 * (hole_diameter / 2.0 + rules::END_EXCLUSION_BASE);
    let length_mod = length - end_exclusion;

    // Whole number of openings across the modified length; the actual pitch
    // stretches to fill it exactly.
    let openings = (length_mod / spec.hole_spacing_mm as f64).floor().max(1.0);
    let opening_centres = length_mod / openings;

    Layout {
        length_mm: length,
        end_exclusion_mm: end_exclusion,
        length_mod_mm: length_mod,
        opening_centres_mm: opening_centres,
        hole_qty: 0,
        tab_offset_mm: (spec.profile_height_mm as f64 - rules::WEB_TAB_HEIGHT) / 2.0,
        flange_mm: spec.flange_mm(),
        thickness_mm: rules::THICKNESS,
        hole_diameter_mm: hole_diameter,
        hole_edge_distance_mm: end_exclusion / 2.0 - hole_diameter / 2.0,
        ..Layout::default()
    }
}

/// Seed-then-extend series: always emits `start`, then keeps appending
/// `+step` while the **last emitted** value is within `last_at_most`. The
/// final value may therefore land one step past the bound; out-of-member
/// values are discarded by [`Layout::push`].
///
/// This is the historical generator loop shape and the spacing data is
/// calibrated against it (a 5200 bearer gets dimples up to 4979.5, web tabs
/// up to 4800).
pub(crate) fn series(start: f64, step: f64, last_at_most: f64) -> Vec<f64> {
    let mut out = vec![start];
    let mut last = start;
    while last <= last_at_most {
        last += step;
        out.push(last);
    }
    out
}

/// Canonical end bolts at 30 / length−30.
pub(crate) fn end_bolts(spec: &ProfileSpec, layout: &mut Layout) {
    if spec.punch_stations.enabled(PunchKind::BoltHole) {
        layout.push(PunchKind::BoltHole, rules::END_BOLT_POSITION);
        layout.push(PunchKind::BoltHole, layout.length_mm - rules::END_BOLT_POSITION);
    }
}

/// Bearer-style paired bolts: each web tab gets a bolt at both offsets of
/// the pattern, kept only when interior and not doubling up an existing
/// bolt.
pub(crate) fn paired_bolts(layout: &mut Layout) {
    let length = layout.length_mm;
    let tabs: Vec<f64> = layout
        .web_tabs
        .iter()
        .map(|t| t.position.as_mm())
        .collect();
    for tab in tabs {
        for offset in rules::BOLT_OFFSET_PATTERN {
            let pos = tab + offset;
            if pos > rules::MIN_CLEARANCE
                && pos < length - rules::MIN_CLEARANCE
                && !layout.has_bolt_near(pos, rules::POSITION_TOLERANCE)
            {
                layout.push(PunchKind::BoltHole, pos);
            }
        }
    }
}

/// Place `qty` punches of `kind` symmetrically about the member midpoint at
/// the given pitch.
pub(crate) fn symmetric_row(layout: &mut Layout, kind: PunchKind, qty: u32, pitch_mm: f64) {
    if qty == 0 {
        return;
    }
    let first = (layout.length_mm - (qty - 1) as f64 * pitch_mm) / 2.0;
    for k in 0..qty {
        layout.push(kind, first + k as f64 * pitch_mm);
    }
}
