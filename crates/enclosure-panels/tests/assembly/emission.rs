use std::collections::HashSet;

use enclosure_panels::emit::{emit_panel, margin_for, page_for, review::review_svg};
use enclosure_panels::{
    nest, DocumentFormat, EmissionError, PanelKind, Parameters, SheetSpec, SvgDocument,
};

use super::common::{all_panels, panel, resolve, thick_walls};

#[test]
fn test_every_panel_emits_both_formats() {
    for params in [Parameters::default(), thick_walls()] {
        let dims = resolve(&params);
        for p in all_panels(&dims) {
            let svg = emit_panel(&p, DocumentFormat::Svg).unwrap();
            let svg = String::from_utf8(svg).unwrap();
            assert!(svg.contains("stroke=\"#ff0000\""));
            let dxf = emit_panel(&p, DocumentFormat::Dxf).unwrap();
            assert!(!dxf.is_empty());
        }
    }
}

#[test]
fn test_page_leaves_room_for_tabs() {
    let dims = resolve(&Parameters::default());
    let panels = all_panels(&dims);
    let front = panel(&panels, PanelKind::Front);
    let page = page_for(front);
    assert_eq!(margin_for(front), 5.0 + dims.wall);
    assert_eq!(page.x, -(5.0 + dims.wall));
    assert_eq!(page.width, front.width() + 2.0 * (5.0 + dims.wall));
}

#[test]
fn test_geometry_past_the_page_is_rejected() {
    let dims = resolve(&Parameters::default());
    let panels = all_panels(&dims);
    let front = panel(&panels, PanelKind::Front);

    // A page without margin clips the protruding fingers.
    let mut doc = SvgDocument::new("front_unpadded", front.bounds());
    let err = doc.push_all(&front.elements()).unwrap_err();
    match err {
        EmissionError::OutOfBounds { document, x, y, .. } => {
            assert_eq!(document, "front_unpadded");
            assert!(x < 0.0 || x > front.width() || y < 0.0 || y > front.height());
        }
        other => panic!("expected OutOfBounds, got {}", other),
    }
}

#[test]
fn test_review_sheet_shows_scale_and_every_panel() {
    let dims = resolve(&Parameters::default());
    let svg = review_svg(&all_panels(&dims)).unwrap();
    assert!(svg.contains("100 mm"));
    assert!(svg.contains("FAN BRACKET"));
}

#[test]
fn test_nesting_places_every_part_once() {
    let dims = resolve(&thick_walls());
    let panels = all_panels(&dims);
    let sheets = nest(&panels, &SheetSpec::default()).unwrap();
    let placed: Vec<PanelKind> = sheets
        .iter()
        .flat_map(|s| s.placements.iter().map(|p| p.panel))
        .collect();
    assert_eq!(placed.len(), PanelKind::ALL.len());
    let unique: HashSet<PanelKind> = placed.into_iter().collect();
    assert_eq!(unique.len(), PanelKind::ALL.len());
    for sheet in &sheets {
        let svg = sheet.to_svg().unwrap();
        assert!(!svg.contains("<text"));
    }
}

#[test]
fn test_dxf_file_reloads_with_every_entity() {
    let dims = resolve(&Parameters::default());
    let panels = all_panels(&dims);
    let bottom = panel(&panels, PanelKind::Bottom);

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bottom.dxf");
    std::fs::write(&path, emit_panel(bottom, DocumentFormat::Dxf).unwrap()).unwrap();

    let drawing = dxf::Drawing::load_file(&path).unwrap();
    let layers: Vec<String> = drawing.entities().map(|e| e.common.layer.clone()).collect();
    assert_eq!(layers.len(), bottom.elements().len());
    assert!(layers.iter().all(|l| l == "CUT" || l == "SCORE"));
}
