//! Joist layout branches.
//!
//! Joists coordinate two web-face rows: service holes centred in the
//! exclusion-trimmed span, and web tabs fitted between them with a clear
//! distance from every hole centre. Flange bolts are centred on the tabs
//! (no bearer-style offset pattern).

use crate::catalog::{rules, PunchKind};
use crate::layout::Layout;
use crate::profile::ProfileSpec;

use super::end_bolts;

pub(crate) fn generate(spec: &ProfileSpec, layout: &mut Layout) {
    if spec.screens_enabled {
        screens(spec, layout);
    } else {
        normal(spec, layout);
    }
}

fn normal(spec: &ProfileSpec, layout: &mut Layout) {
    end_bolts(spec, layout);
    paired_offset_dimples(spec, layout);

    let holes = service_holes(spec, layout);

    if spec.punch_stations.enabled(PunchKind::WebTab) {
        let tabs = fitted_web_tabs(layout, &holes);
        for pos in &tabs {
            layout.push(PunchKind::WebTab, *pos);
        }
        centred_bolts(spec, layout, &tabs);
    }

    corner_brackets(spec, layout);
}

fn screens(spec: &ProfileSpec, layout: &mut Layout) {
    end_bolts(spec, layout);
    paired_offset_dimples(spec, layout);

    let tabs = screens_tabs(layout.length_mm);
    if spec.punch_stations.enabled(PunchKind::WebTab) {
        for pos in &tabs {
            layout.push(PunchKind::WebTab, *pos);
        }
    }

    screens_service_holes(spec, layout, &tabs);

    if spec.punch_stations.enabled(PunchKind::WebTab) {
        centred_bolts(spec, layout, &tabs);
    }

    corner_brackets(spec, layout);
}

/// The 600 mm paired-offset flange pattern: 75, then k·600 ± 75, closing at
/// length − 75.
fn paired_offset_dimples(spec: &ProfileSpec, layout: &mut Layout) {
    if !spec.punch_stations.enabled(PunchKind::Dimple) {
        return;
    }
    let length = layout.length_mm;
    let limit = length - rules::DIMPLE_OFFSET_JOIST;

    layout.push(PunchKind::Dimple, rules::DIMPLE_OFFSET_JOIST);
    let mut base = rules::DIMPLE_BASE_INTERVAL_JOIST;
    while base < limit {
        layout.push(PunchKind::Dimple, base - rules::DIMPLE_OFFSET_JOIST);
        if base + rules::DIMPLE_OFFSET_JOIST < limit {
            layout.push(PunchKind::Dimple, base + rules::DIMPLE_OFFSET_JOIST);
        }
        base += rules::DIMPLE_BASE_INTERVAL_JOIST;
    }
    layout.push(PunchKind::Dimple, limit);
}

/// Service holes centred symmetrically in `[exclusion/2, length −
/// exclusion/2]` at the fitted pitch. Returns the placed centres.
fn service_holes(spec: &ProfileSpec, layout: &mut Layout) -> Vec<f64> {
    let Some(kind) = spec.hole_type.service_kind() else {
        return Vec::new();
    };
    if !spec.punch_stations.enabled(kind) {
        return Vec::new();
    }
    let pitch = layout.opening_centres_mm;
    let usable = layout.length_mod_mm;
    if pitch <= 0.0 || usable < 0.0 {
        return Vec::new();
    }

    // One more hole than openings; derived from the nominal spacing, not the
    // stretched pitch, so the count cannot wobble on rounding dust
    let qty = (usable / spec.hole_spacing_mm as f64).floor().max(1.0) as u32 + 1;
    let first = (layout.length_mm - (qty - 1) as f64 * pitch) / 2.0;
    let mut centres = Vec::with_capacity(qty as usize);
    for k in 0..qty {
        let pos = first + k as f64 * pitch;
        if layout.push(kind, pos) {
            centres.push(pos);
        }
    }
    layout.hole_qty = centres.len() as u32;
    centres
}

/// Fit web tabs between the first and last service hole.
///
/// The tab count is the minimum that keeps intervals under the 2400 mm
/// ceiling (plus tolerance). Each ideal position must keep 150 mm from
/// every hole centre; on conflict the planner tries, in order, the nearest
/// midpoint between adjacent holes (within 650 mm of the ideal), then a
/// 150 mm shift off the conflicting hole, and otherwise skips the slot.
fn fitted_web_tabs(layout: &Layout, holes: &[f64]) -> Vec<f64> {
    let length = layout.length_mm;
    let (first, last) = match (holes.first(), holes.last()) {
        (Some(first), Some(last)) => (*first, *last),
        // No holes: fit across the exclusion-trimmed span instead
        _ => (
            layout.end_exclusion_mm / 2.0,
            length - layout.end_exclusion_mm / 2.0,
        ),
    };
    let span = last - first;
    if span <= 0.0 {
        return Vec::new();
    }

    let max_interval = rules::MAX_WEB_TAB_SPAN + rules::MIN_SPACING_TOLERANCE;
    let tab_count = (span / max_interval).ceil().max(1.0) as usize;
    let step = span / (tab_count + 1) as f64;

    let clear = |pos: f64| {
        holes
            .iter()
            .all(|h| (pos - h).abs() >= rules::WEB_TAB_CONFLICT_RADIUS)
    };

    let mut accepted: Vec<f64> = Vec::with_capacity(tab_count);
    for k in 1..=tab_count {
        let ideal = first + k as f64 * step;

        let resolved = if clear(ideal) {
            Some(ideal)
        } else if let Some(mid) = nearest_midpoint(holes, ideal)
            .filter(|m| (m - ideal).abs() <= rules::SERVICE_HOLE_SPACING && clear(*m))
        {
            Some(mid)
        } else {
            shifted_candidate(holes, ideal, length, &clear)
        };

        if let Some(pos) = resolved {
            if accepted
                .iter()
                .all(|t| (t - pos).abs() > rules::POSITION_TOLERANCE)
            {
                accepted.push(pos);
            }
        }
    }
    accepted
}

/// Midpoint between adjacent holes closest to `ideal`, ties to the lower.
fn nearest_midpoint(holes: &[f64], ideal: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for pair in holes.windows(2) {
        let mid = (pair[0] + pair[1]) / 2.0;
        best = match best {
            None => Some(mid),
            Some(current) => {
                let d_mid = (mid - ideal).abs();
                let d_cur = (current - ideal).abs();
                if d_mid < d_cur || (d_mid == d_cur && mid < current) {
                    Some(mid)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

/// Fallback (b): step 150 mm off the conflicting hole, preferring the side
/// nearer the ideal.
fn shifted_candidate(
    holes: &[f64],
    ideal: f64,
    length: f64,
    clear: &dyn Fn(f64) -> bool,
) -> Option<f64> {
    let conflicting = holes
        .iter()
        .copied()
        .min_by(|a, b| {
            (a - ideal)
                .abs()
                .partial_cmp(&(b - ideal).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;

    let mut candidates = [
        conflicting - rules::WEB_TAB_CONFLICT_RADIUS,
        conflicting + rules::WEB_TAB_CONFLICT_RADIUS,
    ];
    if (candidates[1] - ideal).abs() < (candidates[0] - ideal).abs() {
        candidates.swap(0, 1);
    }
    candidates
        .into_iter()
        .find(|c| *c > 0.0 && *c < length && clear(*c))
}

/// Bolt centred on each web tab, skipped when it would double up an
/// existing bolt.
fn centred_bolts(spec: &ProfileSpec, layout: &mut Layout, tabs: &[f64]) {
    if !spec.punch_stations.enabled(PunchKind::BoltHole) {
        return;
    }
    for &pos in tabs {
        if !layout.has_bolt_near(pos, rules::MIN_CLEARANCE) {
            layout.push(PunchKind::BoltHole, pos);
        }
    }
}

/// Screens tabs: 425 edge offsets, evenly divided with the 1200 mm cap.
fn screens_tabs(length: f64) -> Vec<f64> {
    let first = rules::SCREENS_JOIST_FIRST_WEB_TAB;
    let span = length - 2.0 * first;
    if span <= 0.0 {
        return vec![first];
    }
    let steps = (span / rules::SCREENS_MAX_WEB_TAB_SPACING).ceil().max(1.0);
    let delta = span / steps;
    (0..=steps as usize)
        .map(|k| first + k as f64 * delta)
        .collect()
}

/// Screens service holes: distributed evenly in each tab interval at the
/// nominal 650 pitch.
fn screens_service_holes(spec: &ProfileSpec, layout: &mut Layout, tabs: &[f64]) {
    let Some(kind) = spec.hole_type.service_kind() else {
        return;
    };
    if !spec.punch_stations.enabled(kind) {
        return;
    }
    let mut qty = 0u32;
    for pair in tabs.windows(2) {
        let gap = pair[1] - pair[0];
        let count = (gap / rules::SERVICE_HOLE_SPACING).floor() as u32;
        if count == 0 {
            continue;
        }
        let step = gap / (count + 1) as f64;
        for k in 1..=count {
            if layout.push(kind, pair[0] + k as f64 * step) {
                qty += 1;
            }
        }
    }
    layout.hole_qty = qty;
}

fn corner_brackets(spec: &ProfileSpec, layout: &mut Layout) {
    if !spec.punch_stations.enabled(PunchKind::CornerBrackets) {
        return;
    }
    layout.push(PunchKind::CornerBrackets, rules::CORNER_BRACKET_POSITION);
    layout.push(
        PunchKind::CornerBrackets,
        layout.length_mm - rules::CORNER_BRACKET_POSITION,
    );
}
