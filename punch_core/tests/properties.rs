//! Property-based tests for the universal planner guarantees: determinism,
//! ordering, quantisation, bounds, wire round-trips, resync idempotence,
//! advisor monotonicity and version monotonicity.

use proptest::prelude::*;

use punch_core::catalog::PunchKind;
use punch_core::clash::detect_clashes;
use punch_core::csv::{decode_punches, encode_csv, CsvMeta};
use punch_core::engine::{bolt_resync, LayoutEngine};
use punch_core::layout::Punch;
use punch_core::planner::plan;
use punch_core::profile::{HoleType, KpaRating, ProfileSpec, ProfileVariant, PunchStations};
use punch_core::span_table::advise;

fn variant_strategy() -> impl Strategy<Value = ProfileVariant> {
    prop_oneof![
        Just(ProfileVariant::JoistSingle),
        Just(ProfileVariant::JoistBox),
        Just(ProfileVariant::BearerSingle),
        Just(ProfileVariant::BearerBox),
    ]
}

fn hole_type_strategy() -> impl Strategy<Value = HoleType> {
    prop_oneof![
        Just(HoleType::None),
        Just(HoleType::R50),
        Just(HoleType::R115),
        Just(HoleType::R200),
        Just(HoleType::Oval200x400),
    ]
}

fn rating_strategy() -> impl Strategy<Value = KpaRating> {
    prop_oneof![Just(KpaRating::Kpa2_5), Just(KpaRating::Kpa5_0)]
}

fn spec_strategy() -> impl Strategy<Value = ProfileSpec> {
    let dims = (
        variant_strategy(),
        1000u32..=15000,
        prop_oneof![Just(200u32), Just(250u32), Just(300u32), Just(350u32)],
        400u32..=1200,
        600u32..=2400,
        400u32..=1000,
    );
    let features = (
        hole_type_strategy(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        proptest::option::of(rating_strategy()),
        proptest::collection::vec(0u32..16000, 0..6),
    );
    (dims, features).prop_map(
        |(
            (variant, length, height, joist_spacing, stub_spacing, hole_spacing),
            (hole_type, stubs_enabled, screens_enabled, joist_box, kpa_rating, stub_positions),
        )| {
            let mut spec = ProfileSpec::new(variant, length);
            spec.profile_height_mm = height;
            spec.joist_spacing_mm = joist_spacing;
            spec.stub_spacing_mm = stub_spacing;
            spec.hole_spacing_mm = hole_spacing;
            spec.hole_type = hole_type;
            spec.stubs_enabled = stubs_enabled;
            spec.screens_enabled = screens_enabled;
            spec.joist_box = joist_box;
            spec.kpa_rating = kpa_rating;
            spec.stub_positions = stub_positions;
            spec
        },
    )
}

fn punch_strategy() -> impl Strategy<Value = Punch> {
    (0usize..8, 0.0f64..16000.0, any::<bool>()).prop_map(|(kind, position, active)| {
        let mut punch = Punch::new(PunchKind::ALL[kind], position);
        punch.active = active;
        punch
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn plan_is_deterministic(spec in spec_strategy()) {
        let a = plan(&spec).unwrap();
        let b = plan(&spec).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn layouts_sorted_quantised_bounded(spec in spec_strategy()) {
        let layout = plan(&spec).unwrap();
        let lists = [
            &layout.bolt_holes,
            &layout.dimples,
            &layout.web_tabs,
            &layout.service_holes,
            &layout.stubs,
        ];
        for list in lists {
            for pair in list.windows(2) {
                prop_assert!(pair[0].position <= pair[1].position);
            }
            for punch in list {
                let mm = punch.position.as_mm();
                prop_assert!(mm >= 0.0);
                prop_assert!(mm <= spec.length_mm as f64);
                prop_assert_eq!((mm * 2.0).fract(), 0.0);
                prop_assert!(punch.active);
            }
        }
    }

    #[test]
    fn csv_round_trip(spec in spec_strategy(), qty in 1u32..10) {
        let layout = plan(&spec).unwrap();
        let code = if spec.variant.is_bearer() { "B_TEST" } else { "J_TEST" };
        let line = encode_csv(&layout, &CsvMeta::new(code, qty));
        let decoded = decode_punches(&line).unwrap();

        let mut expected: Vec<(String, f64)> = layout
            .active_punches()
            .map(|p| (p.kind.emit_station_name().to_string(), p.position.as_mm()))
            .collect();
        // Stable by position, same tie-break the encoder applies
        expected.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn bolt_resync_idempotent(spec in spec_strategy()) {
        let mut layout = plan(&spec).unwrap();
        bolt_resync(&mut layout);
        let once = layout.clone();
        bolt_resync(&mut layout);
        prop_assert_eq!(once, layout);
    }

    #[test]
    fn advisor_monotonic_within_variant(
        l1 in 1000.0f64..15000.0,
        l2 in 1000.0f64..15000.0,
        rating in rating_strategy(),
    ) {
        let (lo, hi) = if l1 <= l2 { (l1, l2) } else { (l2, l1) };
        let a = advise(lo, rating);
        let b = advise(hi, rating);
        if a.variant == b.variant {
            prop_assert!(a.joist_spacing_mm >= b.joist_spacing_mm);
        }
    }

    #[test]
    fn manual_lists_preserved(
        spec in spec_strategy(),
        punches in proptest::collection::vec(punch_strategy(), 0..24),
    ) {
        let mut engine = LayoutEngine::new(spec.clone()).unwrap();
        engine.set_manual_punches(punches.clone(), None);
        let layout = engine.calculations();

        let expected = |pred: fn(PunchKind) -> bool| -> Vec<i64> {
            let mut halves: Vec<i64> = punches
                .iter()
                .filter(|p| pred(p.kind))
                .map(|p| p.position.halves())
                .collect();
            halves.sort();
            halves
        };
        let actual = |list: &[Punch]| -> Vec<i64> {
            list.iter().map(|p| p.position.halves()).collect()
        };

        prop_assert_eq!(actual(&layout.dimples), expected(|k| k == PunchKind::Dimple));
        prop_assert_eq!(actual(&layout.web_tabs), expected(|k| k == PunchKind::WebTab));
        prop_assert_eq!(
            actual(&layout.service_holes),
            expected(|k| matches!(
                k,
                PunchKind::SmallServiceHole | PunchKind::MServiceHole | PunchKind::LargeServiceHole
            ))
        );
        prop_assert_eq!(
            actual(&layout.stubs),
            expected(|k| matches!(k, PunchKind::Service | PunchKind::CornerBrackets))
        );
        if spec.variant.is_joist() {
            // No resync on joists: bolts come back exactly as supplied
            prop_assert_eq!(actual(&layout.bolt_holes), expected(|k| k == PunchKind::BoltHole));
        }
    }

    #[test]
    fn version_strictly_monotonic(
        spec in spec_strategy(),
        ops in proptest::collection::vec(0u8..3, 1..12),
    ) {
        let mut engine = LayoutEngine::new(spec.clone()).unwrap();
        let mut last = engine.update_version();
        for op in ops {
            match op {
                0 => {
                    let v = engine.update_calculations(spec.clone()).unwrap();
                    prop_assert!(v > last);
                    last = v;
                }
                1 => {
                    let v = engine.set_manual_punches(Vec::new(), None);
                    prop_assert!(v > last);
                    last = v;
                }
                _ => {
                    let was_manual = engine.is_manual();
                    let v = engine.clear_manual_mode();
                    if was_manual {
                        prop_assert!(v > last);
                        last = v;
                    } else {
                        prop_assert_eq!(v, last);
                    }
                }
            }
        }
    }
}

#[test]
fn canonical_end_bolt_layout_has_zero_clashes() {
    let mut spec = ProfileSpec::new(ProfileVariant::BearerSingle, 5200);
    spec.punch_stations = PunchStations::none().with(PunchKind::BoltHole, true);
    let layout = plan(&spec).unwrap();
    let diagnostics = detect_clashes(&layout, &spec);
    assert!(diagnostics.is_clean(), "{:?}", diagnostics.items);

    let mut spec = ProfileSpec::new(ProfileVariant::JoistSingle, 6000);
    spec.punch_stations = PunchStations::none().with(PunchKind::BoltHole, true);
    let layout = plan(&spec).unwrap();
    let diagnostics = detect_clashes(&layout, &spec);
    assert!(diagnostics.is_clean(), "{:?}", diagnostics.items);
}
