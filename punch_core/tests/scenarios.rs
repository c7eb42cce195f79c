//! End-to-end scenarios: full specs through the planner, override engine,
//! clash detector and CSV encoder, checked against known-good programs.

use punch_core::catalog::PunchKind;
use punch_core::clash::{detect_clashes, DiagnosticKind, Severity};
use punch_core::csv::{decode_punches, encode_csv, CsvMeta};
use punch_core::engine::LayoutEngine;
use punch_core::layout::Punch;
use punch_core::planner::plan;
use punch_core::profile::{HoleType, KpaRating, ProfileSpec, ProfileVariant};
use punch_core::span_table::advise;

fn canonical_bearer() -> ProfileSpec {
    let mut spec = ProfileSpec::new(ProfileVariant::BearerSingle, 5200);
    spec.joist_spacing_mm = 600;
    spec.stub_spacing_mm = 1200;
    spec.stub_positions = vec![331, 1531, 2731, 3931, 4869];
    spec.stubs_enabled = true;
    spec.hole_type = HoleType::None;
    spec.kpa_rating = Some(KpaRating::Kpa2_5);
    spec
}

fn positions(punches: &[Punch]) -> Vec<f64> {
    punches.iter().map(|p| p.position.as_mm()).collect()
}

#[test]
fn scenario_1_canonical_bearer() {
    let layout = plan(&canonical_bearer()).unwrap();

    let bolts = positions(&layout.bolt_holes);
    assert_eq!(&bolts[..3], &[30.0, 570.5, 629.5]);
    assert_eq!(*bolts.last().unwrap(), 5170.0);
    // A pair either side of every tab, alternating ±29.5 around the pitch
    for (i, tab) in [600.0, 1200.0, 1800.0, 2400.0, 3000.0, 3600.0, 4200.0, 4800.0]
        .iter()
        .enumerate()
    {
        assert!(bolts.contains(&(tab - 29.5)), "tab {i} missing low bolt");
        assert!(bolts.contains(&(tab + 29.5)), "tab {i} missing high bolt");
    }

    let dimples = positions(&layout.dimples);
    assert_eq!(dimples.len(), 11);
    assert_eq!(&dimples[..3], &[479.5, 929.5, 1379.5]);
    assert_eq!(*dimples.last().unwrap(), 4979.5);

    assert_eq!(
        positions(&layout.web_tabs),
        vec![600.0, 1200.0, 1800.0, 2400.0, 3000.0, 3600.0, 4200.0, 4800.0]
    );

    assert!(layout.service_holes.is_empty());

    assert_eq!(
        positions(&layout.stubs),
        vec![131.0, 331.0, 1531.0, 2731.0, 3931.0, 4869.0, 5069.0]
    );
}

#[test]
fn scenario_2_bearer_box_mode() {
    let mut spec = canonical_bearer();
    spec.joist_box = true;
    let layout = plan(&spec).unwrap();

    assert!(layout.web_tabs.is_empty());

    let stubs = positions(&layout.stubs);
    let dimples = positions(&layout.dimples);
    for joist in [600.0, 1200.0, 1800.0, 2400.0, 3000.0, 3600.0, 4200.0, 4800.0] {
        assert!(stubs.contains(&(joist - 12.0)));
        assert!(stubs.contains(&(joist + 12.0)));
        assert!(dimples.contains(&joist));
    }

    // End bolts are replaced by end dimples
    assert!(layout.bolt_holes.is_empty());
    assert!(dimples.contains(&30.0));
    assert!(dimples.contains(&5170.0));

    // Corner brackets survive box mode
    assert!(stubs.contains(&131.0));
    assert!(stubs.contains(&5069.0));
}

#[test]
fn scenario_3_joist_with_r200_holes() {
    let advice = advise(6000.0, KpaRating::Kpa2_5);
    assert_eq!(advice.variant, ProfileVariant::JoistSingle);
    assert_eq!(advice.joist_spacing_mm, 600);
    assert!(!advice.exceeds_limit);

    let mut spec = ProfileSpec::new(ProfileVariant::JoistSingle, 6000);
    spec.hole_type = HoleType::R200;
    spec.hole_spacing_mm = 650;
    spec.kpa_rating = Some(KpaRating::Kpa2_5);
    let layout = plan(&spec).unwrap();

    let holes = positions(&layout.service_holes);
    assert_eq!(holes.len(), 9);
    for pair in holes.windows(2) {
        assert_eq!(pair[1] - pair[0], 650.0);
    }
    // Symmetric about the midpoint
    assert_eq!(holes[0] + *holes.last().unwrap(), 6000.0);

    let tabs = positions(&layout.web_tabs);
    assert!(!tabs.is_empty());
    for tab in &tabs {
        assert!(*tab > holes[0] && *tab < *holes.last().unwrap());
        for hole in &holes {
            assert!(
                (tab - hole).abs() >= 150.0,
                "tab {tab} within 150 of hole {hole}"
            );
        }
    }
}

#[test]
fn scenario_4_bearer_beyond_span_table() {
    let advice = advise(12000.0, KpaRating::Kpa5_0);
    assert_eq!(advice.variant, ProfileVariant::JoistBox);
    assert_eq!(advice.joist_spacing_mm, 300);
    assert!(advice.exceeds_limit);

    let mut spec = canonical_bearer();
    spec.length_mm = 12000;
    spec.joist_length_mm = Some(12000);
    spec.kpa_rating = Some(KpaRating::Kpa5_0);
    let layout = plan(&spec).unwrap();
    let diagnostics = detect_clashes(&layout, &spec);

    let span: Vec<_> = diagnostics
        .items
        .iter()
        .filter(|d| d.kind == DiagnosticKind::SpanLimit)
        .collect();
    assert_eq!(span.len(), 1);
    assert_eq!(span[0].severity, Severity::Warning);
    // A bearer over the table warns; it never hard-errors
    assert_eq!(diagnostics.error_count, 0);
    assert!(diagnostics.is_export_ready());
}

#[test]
fn scenario_5_csv_emission() {
    let engine = LayoutEngine::new(canonical_bearer()).unwrap();
    assert_eq!(engine.part_code(), "B_5200_J600_S1200");

    let line = encode_csv(
        engine.calculations(),
        &CsvMeta::new(engine.part_code(), 2),
    );
    assert!(line.starts_with(
        "csvCOMPONENT,B1-1,B_5200_J600_S1200,BEARER,NORMAL,2,5200,0,0,5200,0,50,BOLT HOLE,30,"
    ));
    assert!(line.ends_with("BOLT HOLE,5170"));

    // Every decoded hit matches a punch in the layout, in position order
    let decoded = decode_punches(&line).unwrap();
    assert_eq!(decoded.len(), engine.calculations().punch_count());
    for pair in decoded.windows(2) {
        assert!(pair[0].1 <= pair[1].1);
    }
}

#[test]
fn scenario_6_manual_web_tab_removal() {
    let mut engine = LayoutEngine::new(canonical_bearer()).unwrap();
    let computed = engine.calculations().clone();

    // Remove the 1800 and 2400 tabs, keep everything else as-is
    let edited: Vec<Punch> = computed
        .all_punches()
        .filter(|p| {
            let mm = p.position.as_mm();
            !(p.kind == PunchKind::WebTab && (mm == 1800.0 || mm == 2400.0))
        })
        .cloned()
        .collect();
    engine.set_manual_punches(edited, None);

    let layout = engine.calculations();
    let bolts = positions(&layout.bolt_holes);

    // The bolts that paired the removed tabs are gone, end bolts intact
    for removed in [1770.5, 1829.5, 2370.5, 2429.5] {
        assert!(!bolts.contains(&removed), "stale bolt {removed}");
    }
    assert!(bolts.contains(&30.0));
    assert!(bolts.contains(&5170.0));

    // Every surviving tab has its alternating partner, so alignment is clean
    let diagnostics = detect_clashes(layout, engine.spec());
    assert!(!diagnostics
        .items
        .iter()
        .any(|d| d.kind == DiagnosticKind::BoltAlignment));

    // A tab whose partner cannot be placed (too near the end) is flagged
    let mut edited: Vec<Punch> = layout.all_punches().cloned().collect();
    edited.push(Punch::new(PunchKind::WebTab, 5185.0));
    engine.set_manual_punches(edited, None);
    let diagnostics = detect_clashes(engine.calculations(), engine.spec());
    assert!(diagnostics
        .items
        .iter()
        .any(|d| d.kind == DiagnosticKind::BoltAlignment));
}
