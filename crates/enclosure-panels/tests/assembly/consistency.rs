use enclosure_panels::panels::{scheme, CutoutRole, PanelBuilder};
use enclosure_panels::{
    assemble, check, declared_matings, Dimensions, EdgeTreatment, Mating, Panel, PanelKind,
    Point, Shape, Side,
};

use super::common::{all_panels, resolve, thick_walls};

/// A top cap whose front slot row starts `inset` in from the front edge.
fn top_with_front_slots_at(dims: &Dimensions, inset: f64) -> Panel {
    let joint = scheme::wall_cap_joint(dims).at(dims.wall);
    let notch = EdgeTreatment::FingerNotch(scheme::side_cap_joint(dims));
    let mut builder = PanelBuilder::new(
        PanelKind::Top,
        dims.exterior_x,
        dims.panel_depth,
        dims.wall,
        scheme::cap_frame(dims, PanelKind::Top),
        dims,
    )
    .edge(Side::Top, EdgeTreatment::ThroughSlot { joint, inset })
    .edge(
        Side::Bottom,
        EdgeTreatment::ThroughSlot {
            joint,
            inset: dims.params.wall.side_overhang,
        },
    )
    .edge(Side::Left, notch)
    .edge(Side::Right, notch);
    for (x, y) in scheme::rod_positions(dims) {
        builder.cutout(
            CutoutRole::Rod,
            Shape::circle(Point::new(x, y), dims.params.rods.clearance_hole / 2.0),
            Some(dims.rod_inset),
        );
    }
    builder.build().unwrap()
}

#[test]
fn test_every_mating_is_reported() {
    let dims = resolve(&Default::default());
    let report = check(&all_panels(&dims), &dims);
    assert_eq!(report.results.len(), declared_matings().len());
    assert!(report.results.iter().all(|r| r.passed));
}

#[test]
fn test_panel_from_other_dimensions_is_caught() {
    let dims = resolve(&Default::default());
    let thick = resolve(&thick_walls());
    let mut panels = all_panels(&dims);
    let index = panels
        .iter()
        .position(|p| p.kind() == PanelKind::Bottom)
        .unwrap();
    panels[index] = assemble(PanelKind::Bottom, &thick).unwrap();

    let report = check(&panels, &dims);
    assert!(!report.passed());
    for err in report.mismatches() {
        assert!(err.panel_a == PanelKind::Bottom || err.panel_b == PanelKind::Bottom);
        assert!(err.to_string().contains(err.field));
    }
    let rods = report
        .results
        .iter()
        .find(|r| {
            matches!(
                r.mating,
                Mating::RodAlignment {
                    a: PanelKind::Bottom,
                    b: PanelKind::Top
                }
            )
        })
        .unwrap();
    assert!(!rods.passed);
}

#[test]
fn test_rail_from_other_dimensions_is_caught() {
    let dims = resolve(&Default::default());
    let mut params = enclosure_panels::Parameters::default();
    params.comb.thickness = 6.0;
    let drifted = resolve(&params);

    let mut panels = all_panels(&dims);
    let kind = PanelKind::CombRail(enclosure_panels::RailPosition::Rear);
    let index = panels.iter().position(|p| p.kind() == kind).unwrap();
    panels[index] = assemble(kind, &drifted).unwrap();

    let err = check(&panels, &dims).into_result().unwrap_err();
    assert_eq!(err.panel_a, kind);
    assert_eq!(err.field, "rail_y");
}

#[test]
fn test_report_serializes_to_json() {
    let dims = resolve(&Default::default());
    let report = check(&all_panels(&dims), &dims);
    let json = serde_json::to_value(&report).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 18);
    assert_eq!(results[0]["passed"], serde_json::Value::Bool(true));
}

#[test]
fn test_slot_row_off_the_wall_plane_is_caught() {
    let dims = resolve(&Default::default());
    let mut panels = all_panels(&dims);
    let index = panels
        .iter()
        .position(|p| p.kind() == PanelKind::Top)
        .unwrap();

    panels[index] = top_with_front_slots_at(&dims, dims.params.wall.side_overhang);
    let aligned = check(&panels, &dims);
    assert!(aligned.passed(), "{:?}", aligned.mismatches());

    panels[index] = top_with_front_slots_at(&dims, 0.0);
    let err = check(&panels, &dims).into_result().unwrap_err();
    assert_eq!(err.panel_a, PanelKind::Front);
    assert_eq!(err.panel_b, PanelKind::Top);
    assert_eq!(err.field, "slot_plane");
    assert!(err.expected.starts_with("[3.0000..6.0000"));
    assert!(err.actual.starts_with("[0.0000..3.0000"));
}
