use enclosure_panels::panels::CutoutRole;
use enclosure_panels::{assemble, check, GeometryError, PanelKind, Parameters, RailPosition};

use super::common::{all_panels, panel, resolve, thick_walls};

#[test]
fn test_caps_share_footprint_and_rod_holes() {
    let dims = resolve(&Parameters::default());
    let panels = all_panels(&dims);
    for kind in [PanelKind::Bottom, PanelKind::Top] {
        let cap = panel(&panels, kind);
        assert_eq!(cap.width(), 191.0);
        assert_eq!(cap.height(), 138.0);

        let rods: Vec<_> = cap.cutouts_by(CutoutRole::Rod).collect();
        assert_eq!(rods.len(), 4);
        for rod in &rods {
            assert_eq!(rod.inset, Some(11.0));
            let c = rod.center().unwrap();
            let dx = c.x.min(cap.width() - c.x);
            let dy = c.y.min(cap.height() - c.y);
            assert!((dx - 11.0).abs() < 1e-9 && (dy - 11.0).abs() < 1e-9);
        }
    }
}

#[test]
fn test_side_width_matches_cap_depth() {
    let dims = resolve(&Parameters::default());
    let panels = all_panels(&dims);
    let side = panel(&panels, PanelKind::LeftSide);
    let bottom = panel(&panels, PanelKind::Bottom);
    assert_eq!(side.width(), 138.0);
    assert_eq!(side.width(), bottom.height());
    assert!(check(&panels, &dims).passed());
}

#[test]
fn test_comb_rails_follow_drive_pitch() {
    let dims = resolve(&Parameters::default());
    for position in [RailPosition::Front, RailPosition::Rear] {
        let rail = assemble(PanelKind::CombRail(position), &dims).unwrap();
        let comb = rail.comb().unwrap();
        assert_eq!(comb.teeth.len(), 4);
        assert_eq!(comb.tooth_pitch, 46.11);
        assert!(rail.width() >= 4.0 * 46.11);
        for tooth in &comb.teeth {
            assert_eq!(tooth.width, 20.0);
        }
        for pair in comb.teeth.windows(2) {
            assert!((pair[1].x - pair[0].x - 46.11).abs() < 1e-9);
        }
        assert_eq!(rail.cutouts_by(CutoutRole::DriveScrew).count(), 4 * 3);
    }
}

#[test]
fn test_thicker_walls_grow_exterior_only() {
    let base = resolve(&Parameters::default());
    let thick = resolve(&thick_walls());
    assert_eq!(thick.exterior_x - base.exterior_x, 2.0);
    assert_eq!(thick.exterior_y - base.exterior_y, 2.0);
    assert_eq!(thick.interior_x, base.interior_x);
    assert_eq!(thick.interior_y, base.interior_y);

    let panels = all_panels(&thick);
    let report = check(&panels, &thick);
    for result in &report.results {
        assert!(result.passed, "{}: {:?}", result.description, result.failure);
    }
}

#[test]
fn test_rod_holes_align_through_every_rod_panel() {
    for params in [Parameters::default(), thick_walls()] {
        let dims = resolve(&params);
        let panels = all_panels(&dims);
        let mut sets = Vec::new();
        for kind in [PanelKind::Bottom, PanelKind::Top, PanelKind::FanBracket] {
            let p = panel(&panels, kind);
            let origin = (p.frame().u.origin, p.frame().v.origin);
            let mut centers: Vec<(f64, f64)> = p
                .cutouts_by(CutoutRole::Rod)
                .map(|c| {
                    let at = c.center().unwrap();
                    (at.x + origin.0, at.y + origin.1)
                })
                .collect();
            centers.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.total_cmp(&b.0)));
            for (x, y) in &centers {
                let inset = x.min(*y).min(dims.exterior_x - x).min(dims.panel_depth - y);
                assert!((inset - dims.rod_inset).abs() < 1e-9);
            }
            if kind != PanelKind::FanBracket {
                for c in p.cutouts_by(CutoutRole::Rod) {
                    assert_eq!(c.inset, Some(dims.rod_inset));
                }
            }
            sets.push(centers);
        }
        for set in &sets[1..] {
            for (a, b) in set.iter().zip(&sets[0]) {
                assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_assembly_is_deterministic() {
    let dims = resolve(&Parameters::default());
    for kind in PanelKind::ALL {
        assert_eq!(assemble(kind, &dims).unwrap(), assemble(kind, &dims).unwrap());
    }
}

#[test]
fn test_finer_pitch_stays_consistent() {
    let mut params = Parameters::default();
    params.joints.finger_pitch = 10.0;
    let dims = resolve(&params);
    let panels = all_panels(&dims);
    let front = panel(&panels, PanelKind::Front);
    let layout = front
        .edge(enclosure_panels::Side::Top)
        .layout()
        .unwrap()
        .unwrap();
    assert_eq!(layout.count, 19);
    assert!(check(&panels, &dims).into_result().is_ok());
}

#[test]
fn test_kerf_shrinks_holes_and_keeps_matings() {
    let mut params = Parameters::default();
    params.wall.kerf = 0.2;
    let dims = resolve(&params);
    let panels = all_panels(&dims);
    let bottom = panel(&panels, PanelKind::Bottom);
    let rod = bottom.cutouts_by(CutoutRole::Rod).next().unwrap();
    let extent = rod.shape.extent().unwrap();
    assert!((extent.width - (4.5 - 0.2)).abs() < 1e-9);
    assert!(check(&panels, &dims).passed());
}

#[test]
fn test_vents_keep_min_bridge_to_every_cutout() {
    let mut finer = Parameters::default();
    finer.joints.finger_pitch = 10.0;
    let mut wide_hub = Parameters::default();
    wide_hub.vents.grille_hub = 8.0;

    for params in [Parameters::default(), thick_walls(), finer, wide_hub] {
        let min = params.vents.min_bridge;
        let dims = resolve(&params);
        for p in all_panels(&dims) {
            let cutouts = p.cutouts();
            for (i, a) in cutouts.iter().enumerate() {
                for b in &cutouts[i + 1..] {
                    if !(a.role.is_vent() || b.role.is_vent()) {
                        continue;
                    }
                    let (ea, eb) = (a.shape.extent().unwrap(), b.shape.extent().unwrap());
                    if ea.gap(&eb) >= min {
                        continue;
                    }
                    let gap = a.shape.clearance(&b.shape).unwrap();
                    assert!(
                        gap >= min - 1e-6,
                        "{}: {:?} and {:?} leave {:.3} mm",
                        p.kind(),
                        a.role,
                        b.role,
                        gap
                    );
                }
            }
        }
    }
}

#[test]
fn test_full_width_grille_against_slot_rows_is_rejected() {
    let mut params = Parameters::default();
    params.fan.bracket_clearance = 0.0;
    params.fan.size = 126.0;
    params.fan.opening = 126.0;
    params.fan.hole_spacing = 100.0;
    params.vents.grille_hub = 11.0;
    let dims = resolve(&params);

    let err = assemble(PanelKind::Top, &dims).unwrap_err();
    assert_eq!(err.panel, PanelKind::Top);
    match err.source {
        GeometryError::CutoutTooClose { feature, other, gap, min } => {
            assert_eq!(feature, "Grille");
            assert!(other.starts_with("EdgeSlot"), "{}", other);
            assert!(gap < min);
        }
        other => panic!("expected CutoutTooClose, got {:?}", other),
    }
}
