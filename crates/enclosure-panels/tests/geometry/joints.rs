use enclosure_panels::joints::{finger_count, EdgeTreatment, JointSpec};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_segment_count_is_odd_and_tiles_the_edge(
        length in 1.0f64..2000.0,
        pitch in 1.0f64..100.0,
        origin in -50.0f64..50.0,
    ) {
        let layout = JointSpec::new(length, pitch, 3.0).at(origin).layout().unwrap();
        prop_assert_eq!(layout.count % 2, 1);
        prop_assert_eq!(layout.segments().len(), layout.count);

        let segments = layout.segments();
        prop_assert_eq!(segments[0].start, origin);
        prop_assert_eq!(segments[layout.count - 1].end, origin + length);
        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
        let total: f64 = segments.iter().map(|s| s.width()).sum();
        prop_assert!((total - length).abs() <= 1e-9 * length.max(1.0));
    }

    #[test]
    fn prop_teeth_and_gaps_alternate(length in 10.0f64..1000.0, pitch in 2.0f64..50.0) {
        let layout = JointSpec::new(length, pitch, 3.0).layout().unwrap();
        prop_assert_eq!(layout.teeth().len(), (layout.count + 1) / 2);
        prop_assert_eq!(layout.gaps().len(), layout.count / 2);
    }

    #[test]
    fn prop_skipped_ends_leave_corners_plain(length in 40.0f64..1000.0, pitch in 2.0f64..12.0) {
        let layout = JointSpec::new(length, pitch, 3.0).skipping_ends().layout().unwrap();
        prop_assume!(layout.count >= 3);
        let teeth = layout.teeth();
        prop_assert_eq!(teeth.len(), (layout.count + 1) / 2 - 2);
        prop_assert!(teeth.iter().all(|t| t.index != 0 && t.index + 1 != layout.count));
    }

    #[test]
    fn prop_tab_and_slot_engage_the_same_intervals(length in 20.0f64..600.0, pitch in 4.0f64..30.0) {
        let joint = JointSpec::new(length, pitch, 3.0).skipping_ends();
        let tab = EdgeTreatment::OuterTab(joint);
        let slot = EdgeTreatment::ThroughSlot { joint, inset: 3.0 };
        prop_assert_eq!(tab.engaged().unwrap(), slot.receiving().unwrap());
    }
}

#[test]
fn test_count_rounds_to_nearest_odd() {
    assert_eq!(finger_count(138.0, 12.0).unwrap(), 11);
    assert_eq!(finger_count(185.0, 12.0).unwrap(), 15);
    assert_eq!(finger_count(5.0, 12.0).unwrap(), 1);
}

#[test]
fn test_degenerate_inputs_are_rejected() {
    assert!(finger_count(0.0, 12.0).is_err());
    assert!(finger_count(100.0, 0.0).is_err());
    assert!(finger_count(f64::NAN, 12.0).is_err());
    assert!(finger_count(1.0e9, 1.0e-3).is_err());
}
