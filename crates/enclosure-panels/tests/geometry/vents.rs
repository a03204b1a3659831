use enclosure_panels::geometry::Rect;
use enclosure_panels::vents::{finger_guard, slot_grid, slot_rows, FingerGuard, SlotPattern};
use enclosure_panels::Point;
use proptest::prelude::*;

fn assert_separated(slots: &[Rect], region: Rect, bridge: f64) {
    for (i, a) in slots.iter().enumerate() {
        assert!(region.contains_rect(a), "{:?} leaves {:?}", a, region);
        for b in &slots[i + 1..] {
            assert!(!a.intersects(b));
            assert!(a.gap(b) >= bridge - 1e-6, "{:?} and {:?} too close", a, b);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_grid_slots_stay_inside_and_apart(
        width in 30.0f64..250.0,
        height in 10.0f64..150.0,
        length in 5.0f64..30.0,
        slot_height in 2.0f64..6.0,
        bridge in 2.0f64..6.0,
    ) {
        prop_assume!(width >= length && height >= slot_height);
        let region = Rect::new(7.0, 11.0, width, height);
        let pattern = SlotPattern { length, height: slot_height, bridge };
        let slots = slot_grid(region, &pattern, &[]).unwrap();
        prop_assert!(!slots.is_empty());
        assert_separated(&slots, region, bridge);
    }

    #[test]
    fn prop_rows_stay_inside_and_apart(
        columns in 1usize..5,
        rows in 1usize..8,
        length in 5.0f64..25.0,
        slot_height in 2.0f64..4.0,
        spare_x in 0.0f64..40.0,
        spare_y in 0.0f64..40.0,
    ) {
        let bridge = 2.0;
        let width = columns as f64 * (length + bridge) + spare_x;
        let height = rows as f64 * (slot_height + bridge) + spare_y;
        let region = Rect::new(0.0, 0.0, width, height);
        let slots = slot_rows(region, length, slot_height, columns, rows, bridge).unwrap();
        prop_assert_eq!(slots.len(), columns * rows);
        assert_separated(&slots, region, bridge);
    }
}

#[test]
fn test_small_region_is_rejected() {
    let pattern = SlotPattern {
        length: 20.0,
        height: 3.0,
        bridge: 2.0,
    };
    assert!(slot_grid(Rect::new(0.0, 0.0, 10.0, 10.0), &pattern, &[]).is_err());
}

#[test]
fn test_guard_rings_stay_inside_opening() {
    let guard = FingerGuard {
        outer_radius: 37.0,
        hub_radius: 6.0,
        slot_width: 3.0,
        ring_gap: 4.0,
        spoke: 3.0,
        min_bridge: 2.0,
    };
    let center = Point::new(50.0, 50.0);
    let slots = finger_guard(center, &guard).unwrap();
    assert!(!slots.is_empty());
    for slot in &slots {
        assert!(slot.outer_radius <= guard.outer_radius + 1e-9);
        assert!(slot.inner_radius >= guard.hub_radius - 1e-9);
        for p in slot.to_polygon() {
            assert!(p.distance(center) <= guard.outer_radius + 1e-6);
        }
    }
}
