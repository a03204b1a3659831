use std::collections::HashSet;

use enclosure_panels::{
    generate, generate_with, EnclosureError, OutputOptions, PanelKind, Parameters, SheetSpec,
};

#[test]
fn test_default_run_writes_one_document_per_panel() {
    let generation = generate(&Parameters::default()).unwrap();
    assert_eq!(generation.artifacts.len(), PanelKind::ALL.len());
    let names: HashSet<&str> = generation
        .artifacts
        .iter()
        .map(|a| a.file_name.as_str())
        .collect();
    assert_eq!(names.len(), PanelKind::ALL.len());
    for kind in PanelKind::ALL {
        assert!(names.contains(format!("{}.svg", kind.file_stem()).as_str()));
    }
    for artifact in &generation.artifacts {
        assert!(artifact.bytes.starts_with(b"<?xml"));
    }
}

#[test]
fn test_all_outputs_together() {
    let options = OutputOptions {
        dxf: true,
        review: true,
        nest: Some(SheetSpec::default()),
        ..OutputOptions::default()
    };
    let generation = generate_with(&Parameters::default(), &options).unwrap();
    let names: HashSet<&str> = generation
        .artifacts
        .iter()
        .map(|a| a.file_name.as_str())
        .collect();
    assert_eq!(names.len(), generation.artifacts.len());
    assert!(names.contains("01_bottom_panel.dxf"));
    assert!(names.contains("00_review.svg"));
}

#[test]
fn test_too_small_sheet_fails_the_run() {
    let options = OutputOptions {
        nest: Some(SheetSpec {
            width: 150.0,
            height: 150.0,
            ..SheetSpec::default()
        }),
        ..OutputOptions::default()
    };
    assert!(matches!(
        generate_with(&Parameters::default(), &options),
        Err(EnclosureError::Emission(_))
    ));
}

#[test]
fn test_board_off_the_floor_names_the_panel() {
    let mut params = Parameters::default();
    params.board.front_clearance = 200.0;
    match generate(&params) {
        Err(EnclosureError::Geometry { panel, .. }) => assert_eq!(panel, PanelKind::Bottom),
        other => panic!("expected a geometry error, got {:?}", other.map(|g| g.artifacts.len())),
    }
}
