//! # Clash Detector
//!
//! Post-layout validation. [`detect_clashes`] grades a [`Layout`] against
//! the manufacturing rule set and returns every finding as data. Nothing
//! here ever errors or panics, because invalid layouts are legitimate
//! inputs (that is the whole point of detecting them).
//!
//! Planes are respected: flange punches are only compared with flange
//! punches and web-face punches with web-face punches; the rules that span
//! planes (bolt-over-tab alignment) are logical, not geometric.
//!
//! Rules run in a fixed order (edge clearance first, face overlap last) and
//! each rule reports in ascending position order, so the diagnostic list is
//! stable for a given layout.

use serde::{Deserialize, Serialize};

use crate::catalog::{rules, PunchKind};
use crate::layout::{Layout, Punch};
use crate::profile::ProfileSpec;

/// Diagnostic grading. Errors should gate the export; warnings should not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Which rule produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    EdgeClearance,
    WebTabServiceClearance,
    StubServiceClearance,
    BoltAlignment,
    FlangeConflict,
    DimpleGrid,
    SpanLimit,
    WebTabSpacing,
    ServiceHoleSpacing,
    FaceOverlap,
}

/// One graded finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Position of the offending punch (or the first of the pair)
    pub position_mm: Option<f64>,
    pub element_a: String,
    pub element_b: Option<String>,
    pub message: String,
}

/// Ordered findings plus severity tallies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
    pub error_count: u32,
    pub warning_count: u32,
}

impl Diagnostics {
    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.items.push(diagnostic);
    }

    /// No findings at all
    pub fn is_clean(&self) -> bool {
        self.items.is_empty()
    }

    /// Errors gate the export; warnings do not
    pub fn is_export_ready(&self) -> bool {
        self.error_count == 0
    }
}

/// Evaluate every rule against the layout.
pub fn detect_clashes(layout: &Layout, spec: &ProfileSpec) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    edge_clearance(layout, &mut diagnostics);
    web_tab_service_clearance(layout, &mut diagnostics);
    stub_service_clearance(layout, &mut diagnostics);
    bolt_alignment(layout, spec, &mut diagnostics);
    flange_conflicts(layout, &mut diagnostics);
    dimple_grid(layout, spec, &mut diagnostics);
    span_limits(layout, spec, &mut diagnostics);
    web_tab_spacing(layout, spec, &mut diagnostics);
    service_hole_spacing(layout, spec, &mut diagnostics);
    face_overlap(layout, &mut diagnostics);

    diagnostics
}

fn active(list: &[Punch]) -> impl Iterator<Item = &Punch> {
    list.iter().filter(|p| p.active)
}

fn describe(punch: &Punch) -> String {
    format!("{} at {}", punch.kind.station_name(), punch.position)
}

// === Rule 1: edge clearance ===

fn edge_clearance(layout: &Layout, diagnostics: &mut Diagnostics) {
    let length = layout.length_mm;

    for bolt in active(&layout.bolt_holes) {
        let pos = bolt.position.as_mm();
        // The canonical ~30 mm end bolts are exempt
        if pos <= rules::END_BOLT_EXEMPTION || pos >= length - rules::END_BOLT_EXEMPTION {
            continue;
        }
        if pos < rules::MIN_CLEARANCE || pos > length - rules::MIN_CLEARANCE {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::EdgeClearance,
                severity: Severity::Error,
                position_mm: Some(pos),
                element_a: describe(bolt),
                element_b: None,
                message: format!(
                    "{} is within {} mm of the member end",
                    describe(bolt),
                    rules::MIN_CLEARANCE
                ),
            });
        }
    }

    for tab in active(&layout.web_tabs) {
        let pos = tab.position.as_mm();
        if pos < rules::WEB_TAB_CLEARANCE || pos > length - rules::WEB_TAB_CLEARANCE {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::EdgeClearance,
                severity: Severity::Error,
                position_mm: Some(pos),
                element_a: describe(tab),
                element_b: None,
                message: format!("{} overhangs the member end", describe(tab)),
            });
        }
    }

    for punch in active(&layout.service_holes).chain(active(&layout.stubs)) {
        let radius = punch.kind.clearance_mm();
        let pos = punch.position.as_mm();
        if pos < radius || pos > length - radius {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::EdgeClearance,
                severity: Severity::Error,
                position_mm: Some(pos),
                element_a: describe(punch),
                element_b: None,
                message: format!("{} cuts past the member end", describe(punch)),
            });
        }
    }
}

// === Rule 2: web tab × service hole ===

/// Required tab-to-hole centre distance for a service hole kind.
fn tab_hole_clearance(kind: PunchKind) -> f64 {
    match kind {
        PunchKind::MServiceHole => 145.0,
        PunchKind::LargeServiceHole => 245.0,
        PunchKind::SmallServiceHole => 102.5,
        other => rules::WEB_TAB_CLEARANCE + other.clearance_mm() + rules::WEB_TAB_CLEARANCE,
    }
}

fn web_tab_service_clearance(layout: &Layout, diagnostics: &mut Diagnostics) {
    for tab in active(&layout.web_tabs) {
        for hole in active(&layout.service_holes) {
            let required = tab_hole_clearance(hole.kind);
            let distance = tab.position.distance_mm(hole.position);
            if distance < required {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::WebTabServiceClearance,
                    severity: Severity::Warning,
                    position_mm: Some(tab.position.as_mm()),
                    element_a: describe(tab),
                    element_b: Some(describe(hole)),
                    message: format!(
                        "{} is {distance} mm from {} (needs {required} mm)",
                        describe(tab),
                        describe(hole)
                    ),
                });
            }
        }
    }
}

// === Rule 3: stub × service hole ===

fn stub_service_clearance(layout: &Layout, diagnostics: &mut Diagnostics) {
    for stub in active(&layout.stubs) {
        for hole in active(&layout.service_holes) {
            let distance = stub.position.distance_mm(hole.position);
            if distance < rules::SERVICE_CLEARANCE {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::StubServiceClearance,
                    severity: Severity::Warning,
                    position_mm: Some(stub.position.as_mm()),
                    element_a: describe(stub),
                    element_b: Some(describe(hole)),
                    message: format!(
                        "{} is {distance} mm from {} (needs {} mm)",
                        describe(stub),
                        describe(hole),
                        rules::SERVICE_CLEARANCE
                    ),
                });
            }
        }
    }
}

// === Rule 4: bolt-over-web-tab alignment (bearer only) ===

fn bolt_alignment(layout: &Layout, spec: &ProfileSpec, diagnostics: &mut Diagnostics) {
    if !spec.variant.is_bearer() {
        return;
    }
    let interior: Vec<f64> = layout.interior_bolts().map(|b| b.position.as_mm()).collect();
    for (i, tab) in active(&layout.web_tabs).enumerate() {
        let expected = tab.position.as_mm() + rules::BOLT_OFFSET_PATTERN[i % 2];
        let found = interior
            .iter()
            .any(|b| (b - expected).abs() <= rules::POSITION_TOLERANCE);
        if !found {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::BoltAlignment,
                severity: Severity::Warning,
                position_mm: Some(tab.position.as_mm()),
                element_a: describe(tab),
                element_b: None,
                message: format!(
                    "{} has no partner bolt near {expected}",
                    describe(tab)
                ),
            });
        }
    }
}

// === Rule 5: flange conflicts ===

fn flange_conflicts(layout: &Layout, diagnostics: &mut Diagnostics) {
    for dimple in active(&layout.dimples) {
        for bolt in active(&layout.bolt_holes) {
            let distance = dimple.position.distance_mm(bolt.position);
            if distance < rules::FLANGE_CONFLICT_DISTANCE {
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::FlangeConflict,
                    severity: Severity::Warning,
                    position_mm: Some(dimple.position.as_mm()),
                    element_a: describe(dimple),
                    element_b: Some(describe(bolt)),
                    message: format!(
                        "{} is {distance} mm from {} (needs {} mm)",
                        describe(dimple),
                        describe(bolt),
                        rules::FLANGE_CONFLICT_DISTANCE
                    ),
                });
            }
        }
    }
}

// === Rule 6: dimple grid ===

fn dimple_grid(layout: &Layout, spec: &ProfileSpec, diagnostics: &mut Diagnostics) {
    let dimples: Vec<&Punch> = active(&layout.dimples).collect();
    if dimples.is_empty() {
        return;
    }

    // Box-mode bearers intentionally scatter dimples onto joist centres, so
    // the grid is not expected there.
    let (start, spacing) = if spec.variant.is_bearer() {
        if spec.joist_box {
            return;
        }
        (rules::DIMPLE_START_BEARER, rules::DIMPLE_SPACING_BEARER)
    } else {
        // Joists are still validated against the legacy grid, which the
        // current 600 mm paired pattern does not satisfy.
        (rules::DIMPLE_START_JOIST, rules::DIMPLE_SPACING_JOIST)
    };

    for (k, dimple) in dimples.iter().enumerate() {
        let expected = start + k as f64 * spacing;
        if (dimple.position.as_mm() - expected).abs() > rules::DIMPLE_GRID_TOLERANCE {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::DimpleGrid,
                severity: Severity::Warning,
                position_mm: Some(dimple.position.as_mm()),
                element_a: describe(dimple),
                element_b: None,
                message: format!(
                    "{} is off the {start} + k x {spacing} grid (expected {expected})",
                    describe(dimple)
                ),
            });
        }
    }
}

// === Rule 7: span limits ===

fn span_limits(layout: &Layout, spec: &ProfileSpec, diagnostics: &mut Diagnostics) {
    let Some(rating) = spec.kpa_rating else {
        return;
    };
    let limit = rating.span_limit_mm();

    if spec.variant.is_joist() {
        if layout.length_mm > limit {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::SpanLimit,
                severity: Severity::Error,
                position_mm: None,
                element_a: format!("member length {}", layout.length_mm),
                element_b: None,
                message: format!(
                    "Joist span {} exceeds the {limit} mm limit for {rating}",
                    layout.length_mm
                ),
            });
        }
    } else if let Some(joist_length) = spec.joist_length_mm {
        if joist_length as f64 > limit {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::SpanLimit,
                severity: Severity::Warning,
                position_mm: None,
                element_a: format!("joist length {joist_length}"),
                element_b: None,
                message: format!(
                    "Carried joist span {joist_length} exceeds the {limit} mm limit for {rating}"
                ),
            });
        }
    }
}

// === Rule 8: web-tab spacing ===

fn web_tab_spacing(layout: &Layout, spec: &ProfileSpec, diagnostics: &mut Diagnostics) {
    let nominal = spec.joist_spacing_mm as f64;
    let tolerance = (nominal * rules::SPACING_TOLERANCE_PERCENT).max(rules::MIN_SPACING_TOLERANCE);
    let tabs: Vec<&Punch> = active(&layout.web_tabs).collect();

    for pair in tabs.windows(2) {
        let gap = pair[1].position.distance_mm(pair[0].position);
        if (gap - nominal).abs() > tolerance {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::WebTabSpacing,
                severity: Severity::Warning,
                position_mm: Some(pair[0].position.as_mm()),
                element_a: describe(pair[0]),
                element_b: Some(describe(pair[1])),
                message: format!(
                    "Web tab gap {gap} mm deviates from the {nominal} mm pitch by more than {tolerance} mm"
                ),
            });
        }
    }
}

// === Rule 9: service-hole spacing ===

fn service_hole_spacing(layout: &Layout, spec: &ProfileSpec, diagnostics: &mut Diagnostics) {
    if spec.screens_enabled {
        return;
    }
    let length = layout.length_mm;
    // Corner-bracket positions are not part of the service run
    let holes: Vec<&Punch> = active(&layout.service_holes)
        .filter(|h| {
            let pos = h.position.as_mm();
            pos > rules::CORNER_BRACKET_EXCLUSION && pos < length - rules::CORNER_BRACKET_EXCLUSION
        })
        .collect();

    for pair in holes.windows(2) {
        let gap = pair[1].position.distance_mm(pair[0].position);
        if (gap - rules::SERVICE_HOLE_SPACING).abs() > rules::MIN_SPACING_TOLERANCE {
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::ServiceHoleSpacing,
                severity: Severity::Warning,
                position_mm: Some(pair[0].position.as_mm()),
                element_a: describe(pair[0]),
                element_b: Some(describe(pair[1])),
                message: format!(
                    "Service hole gap {gap} mm deviates from the {} mm pitch",
                    rules::SERVICE_HOLE_SPACING
                ),
            });
        }
    }
}

// === Rule 10: face-plane overlap ===

fn face_overlap(layout: &Layout, diagnostics: &mut Diagnostics) {
    let mut face: Vec<&Punch> = active(&layout.web_tabs)
        .chain(active(&layout.service_holes))
        .chain(active(&layout.stubs))
        .collect();
    face.sort_by_key(|p| p.position);

    // Largest die is the 400-wide oval; nothing past this distance can clash
    let max_required = 2.0 * PunchKind::LargeServiceHole.clearance_mm() + rules::POSITION_TOLERANCE;

    for i in 0..face.len() {
        for j in (i + 1)..face.len() {
            let a = face[i];
            let b = face[j];
            let distance = a.position.distance_mm(b.position);
            if distance >= max_required {
                break;
            }
            let required =
                a.kind.clearance_mm() + b.kind.clearance_mm() + rules::POSITION_TOLERANCE;
            if distance >= required {
                continue;
            }
            let severity = if distance < 5.0 {
                Severity::Error
            } else {
                Severity::Warning
            };
            diagnostics.push(Diagnostic {
                kind: DiagnosticKind::FaceOverlap,
                severity,
                position_mm: Some(a.position.as_mm()),
                element_a: describe(a),
                element_b: Some(describe(b)),
                message: format!(
                    "{} and {} are {distance} mm apart (needs {required} mm)",
                    describe(a),
                    describe(b)
                ),
            });
        }
    }
}
