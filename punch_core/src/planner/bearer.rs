//! Bearer layout branches.
//!
//! Bearers carry the joists: web tabs (or box-mode service pairs) land at
//! the joist pitch, flange bolts pair off around each tab, and the stub
//! step adds corner brackets plus the user-placed stub cuts.

use crate::catalog::{rules, PunchKind};
use crate::layout::Layout;
use crate::profile::ProfileSpec;

use super::{end_bolts, paired_bolts, series, symmetric_row};

pub(crate) fn generate(spec: &ProfileSpec, layout: &mut Layout) {
    match (spec.screens_enabled, spec.joist_box) {
        (false, false) => normal(spec, layout),
        (false, true) => normal_boxmode(spec, layout),
        (true, false) => screens(spec, layout),
        (true, true) => screens_boxmode(spec, layout),
    }
}

/// Joist centreline positions along the bearer.
fn joist_positions(spec: &ProfileSpec, length: f64) -> Vec<f64> {
    let pitch = spec.joist_spacing_mm as f64;
    series(pitch, pitch, length - pitch)
}

/// Screens-mode tab positions: fixed 475 edge offsets with the joist pitch
/// between, intermediates strictly inside the edge tabs.
fn screens_positions(spec: &ProfileSpec, length: f64) -> Vec<f64> {
    let pitch = spec.joist_spacing_mm as f64;
    let first = rules::SCREENS_BEARER_FIRST_WEB_TAB;
    let last = length - rules::SCREENS_BEARER_FIRST_WEB_TAB;

    let mut out = vec![first];
    let mut pos = first + pitch;
    while pos < last {
        out.push(pos);
        pos += pitch;
    }
    if last > first {
        out.push(last);
    }
    out
}

fn normal(spec: &ProfileSpec, layout: &mut Layout) {
    end_bolts(spec, layout);
    dimple_grid(spec, layout);
    service_holes(spec, layout);

    if spec.punch_stations.enabled(PunchKind::WebTab) {
        for pos in joist_positions(spec, layout.length_mm) {
            layout.push(PunchKind::WebTab, pos);
        }
    }
    if spec.punch_stations.enabled(PunchKind::BoltHole) {
        paired_bolts(layout);
    }

    stubs(spec, layout);
}

/// Box mode: the carried joists are boxed, so each joist position gets a
/// service pair either side of the centreline and a dimple on it; flange
/// bolts are dropped in favour of dimples, including at the ends.
fn normal_boxmode(spec: &ProfileSpec, layout: &mut Layout) {
    if spec.punch_stations.enabled(PunchKind::Dimple) {
        layout.push(PunchKind::Dimple, rules::END_BOLT_POSITION);
        layout.push(PunchKind::Dimple, layout.length_mm - rules::END_BOLT_POSITION);
    }
    dimple_grid(spec, layout);
    service_holes(spec, layout);

    let length = layout.length_mm;
    for pos in joist_positions(spec, length) {
        if spec.punch_stations.enabled(PunchKind::Service) {
            layout.push(PunchKind::Service, pos - rules::BOX_SERVICE_OFFSET);
            layout.push(PunchKind::Service, pos + rules::BOX_SERVICE_OFFSET);
        }
        if spec.punch_stations.enabled(PunchKind::Dimple)
            && pos > rules::MIN_CLEARANCE
            && pos < length - rules::MIN_CLEARANCE
        {
            layout.push(PunchKind::Dimple, pos);
        }
    }

    stubs(spec, layout);
}

fn screens(spec: &ProfileSpec, layout: &mut Layout) {
    end_bolts(spec, layout);
    dimple_grid(spec, layout);
    service_holes(spec, layout);

    if spec.punch_stations.enabled(PunchKind::WebTab) {
        for pos in screens_positions(spec, layout.length_mm) {
            layout.push(PunchKind::WebTab, pos);
        }
    }
    if spec.punch_stations.enabled(PunchKind::BoltHole) {
        paired_bolts(layout);
    }

    stubs(spec, layout);
}

/// Screens + box: each tab position becomes a triple service hit with a
/// centred bolt, no offset pattern.
fn screens_boxmode(spec: &ProfileSpec, layout: &mut Layout) {
    end_bolts(spec, layout);
    dimple_grid(spec, layout);
    service_holes(spec, layout);

    for pos in screens_positions(spec, layout.length_mm) {
        if spec.punch_stations.enabled(PunchKind::Service) {
            layout.push(PunchKind::Service, pos - rules::BOX_SERVICE_OFFSET);
            layout.push(PunchKind::Service, pos);
            layout.push(PunchKind::Service, pos + rules::BOX_SERVICE_OFFSET);
        }
        if spec.punch_stations.enabled(PunchKind::BoltHole) {
            layout.push(PunchKind::BoltHole, pos);
        }
    }

    stubs(spec, layout);
}

/// The 479.5 + k·450 flange dimple grid.
fn dimple_grid(spec: &ProfileSpec, layout: &mut Layout) {
    if !spec.punch_stations.enabled(PunchKind::Dimple) {
        return;
    }
    let bound = layout.length_mm - rules::DIMPLE_END_CLEARANCE_BEARER;
    for pos in series(rules::DIMPLE_START_BEARER, rules::DIMPLE_SPACING_BEARER, bound) {
        layout.push(PunchKind::Dimple, pos);
    }
}

/// Service holes centred symmetrically about the midpoint at the fitted
/// opening pitch.
fn service_holes(spec: &ProfileSpec, layout: &mut Layout) {
    let Some(kind) = spec.hole_type.service_kind() else {
        return;
    };
    if !spec.punch_stations.enabled(kind) {
        return;
    }
    let pitch = layout.opening_centres_mm;
    if pitch <= 0.0 {
        return;
    }
    let qty = ((layout.length_mm - 2.0 * pitch) / pitch).floor().max(0.0) as u32;
    symmetric_row(layout, kind, qty, pitch);
    layout.hole_qty = qty;
}

/// Corner brackets plus the user-placed stub positions.
fn stubs(spec: &ProfileSpec, layout: &mut Layout) {
    if !spec.stubs_enabled || !spec.punch_stations.enabled(PunchKind::Service) {
        return;
    }
    let length = layout.length_mm;
    layout.push(PunchKind::CornerBrackets, rules::CORNER_BRACKET_POSITION);
    layout.push(PunchKind::CornerBrackets, length - rules::CORNER_BRACKET_POSITION);

    for &pos in &spec.stub_positions {
        let pos = pos as f64;
        if pos > 0.0 && pos < length {
            layout.push(PunchKind::Service, pos);
        }
    }
}
