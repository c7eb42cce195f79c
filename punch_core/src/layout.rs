//! # Layout Model
//!
//! A [`Layout`] is the value produced by the planner: five position lists
//! (two on the flange plane: bolt holes and dimples; three on the web face:
//! web tabs, service holes, stubs) plus the derived scalars a host needs to
//! dimension the drawing and the CSV record.
//!
//! The lists hold these invariants **by construction**:
//!
//! - every position lies in `[0, length_mm]` (computed insertions drop
//!   out-of-range values; manual insertions keep them so the clash detector
//!   can report them),
//! - each list is sorted ascending by position,
//! - positions are half-millimetre quantised ([`HalfMm`] cannot hold an
//!   off-grid value).

use serde::{Deserialize, Serialize};

use crate::catalog::{rules, Plane, PunchKind};
use crate::units::HalfMm;

/// One punch hit on the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Punch {
    /// Distance from the start end of the member
    pub position: HalfMm,
    pub kind: PunchKind,
    /// Disabled entries are kept for display but skipped on emit. Only
    /// manual overrides can produce `false`.
    pub active: bool,
}

impl Punch {
    /// An active punch at the given millimetre position (quantised)
    pub fn new(kind: PunchKind, position_mm: f64) -> Self {
        Punch {
            position: HalfMm::from_mm(position_mm),
            kind,
            active: true,
        }
    }

    pub fn plane(&self) -> Plane {
        self.kind.plane()
    }
}

/// The planned punch program for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Layout {
    // === Flange plane ===
    pub bolt_holes: Vec<Punch>,
    pub dimples: Vec<Punch>,

    // === Web face plane ===
    pub web_tabs: Vec<Punch>,
    pub service_holes: Vec<Punch>,
    pub stubs: Vec<Punch>,

    // === Derived scalars ===
    /// Member length
    pub length_mm: f64,
    /// `2 * (hole radius + 300)`
    pub end_exclusion_mm: f64,
    /// `length - end_exclusion`
    pub length_mod_mm: f64,
    /// Actual service-hole pitch after fitting a whole number of openings
    pub opening_centres_mm: f64,
    /// Number of service holes placed
    pub hole_qty: u32,
    /// Vertical offset centring the 45 × 70 tab in the web
    pub tab_offset_mm: f64,
    /// Flange width: 59 joist, 63 bearer
    pub flange_mm: f64,
    /// Sheet thickness
    pub thickness_mm: f64,
    /// Service-hole diameter used for end-exclusion maths
    pub hole_diameter_mm: f64,
    /// Start-of-member to first service-hole edge
    pub hole_edge_distance_mm: f64,
}

impl Layout {
    /// Insert a computed punch. Quantises, drops silently when outside
    /// `[0, length]`, keeps the target list sorted. Returns whether the
    /// punch was kept.
    pub fn push(&mut self, kind: PunchKind, position_mm: f64) -> bool {
        let punch = Punch::new(kind, position_mm);
        if punch.position < HalfMm::ZERO || punch.position.as_mm() > self.length_mm {
            return false;
        }
        Self::insert_sorted(self.list_mut(kind), punch);
        true
    }

    /// Insert a user-supplied punch, retaining out-of-range positions and
    /// the caller's `active` flag so the clash detector can report them.
    pub fn push_manual(&mut self, punch: Punch) {
        Self::insert_sorted(self.list_mut(punch.kind), punch);
    }

    fn insert_sorted(list: &mut Vec<Punch>, punch: Punch) {
        let idx = list.partition_point(|p| p.position <= punch.position);
        list.insert(idx, punch);
    }

    /// The list a punch kind belongs to. The three service-hole stations
    /// share one list; stubs and corner brackets share another.
    pub fn list_mut(&mut self, kind: PunchKind) -> &mut Vec<Punch> {
        match kind {
            PunchKind::BoltHole => &mut self.bolt_holes,
            PunchKind::Dimple => &mut self.dimples,
            PunchKind::WebTab => &mut self.web_tabs,
            PunchKind::SmallServiceHole
            | PunchKind::MServiceHole
            | PunchKind::LargeServiceHole => &mut self.service_holes,
            PunchKind::Service | PunchKind::CornerBrackets => &mut self.stubs,
        }
    }

    /// All punches in flange-then-web list order. This is the tie-break
    /// order the CSV encoder relies on.
    pub fn all_punches(&self) -> impl Iterator<Item = &Punch> {
        self.bolt_holes
            .iter()
            .chain(self.dimples.iter())
            .chain(self.web_tabs.iter())
            .chain(self.service_holes.iter())
            .chain(self.stubs.iter())
    }

    /// All punches that will actually be hit
    pub fn active_punches(&self) -> impl Iterator<Item = &Punch> {
        self.all_punches().filter(|p| p.active)
    }

    pub fn punch_count(&self) -> usize {
        self.bolt_holes.len()
            + self.dimples.len()
            + self.web_tabs.len()
            + self.service_holes.len()
            + self.stubs.len()
    }

    /// Whether an active bolt exists within `tolerance_mm` of a position
    pub fn has_bolt_near(&self, position_mm: f64, tolerance_mm: f64) -> bool {
        let target = HalfMm::from_mm(position_mm);
        self.bolt_holes
            .iter()
            .any(|b| b.active && b.position.distance_mm(target) <= tolerance_mm)
    }

    /// Active bolts strictly inside the interior window `(50, length-50)`
    pub fn interior_bolts(&self) -> impl Iterator<Item = &Punch> {
        let length = self.length_mm;
        self.bolt_holes.iter().filter(move |b| {
            b.active
                && b.position.as_mm() > rules::MIN_CLEARANCE
                && b.position.as_mm() < length - rules::MIN_CLEARANCE
        })
    }
}
