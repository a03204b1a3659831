use enclosure_panels::{assemble, Dimensions, Panel, PanelKind, Parameters};

pub fn resolve(params: &Parameters) -> Dimensions {
    Dimensions::resolve(params).unwrap()
}

pub fn all_panels(dims: &Dimensions) -> Vec<Panel> {
    PanelKind::ALL
        .iter()
        .map(|&kind| assemble(kind, dims).unwrap())
        .collect()
}

pub fn panel(panels: &[Panel], kind: PanelKind) -> &Panel {
    panels.iter().find(|p| p.kind() == kind).unwrap()
}

/// Default parameters with thicker walls.
pub fn thick_walls() -> Parameters {
    let mut params = Parameters::default();
    params.wall.thickness = 4.0;
    params
}
