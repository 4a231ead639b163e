//! Property tests for geometry and pheromone decay.

use forage_core::prelude::*;
use proptest::prelude::*;

fn rect() -> impl Strategy<Value = Rect> {
    (0usize..40, 0usize..40, 1usize..8, 1usize..8)
        .prop_map(|(x, y, w, h)| Rect::new(DiscreteCoord::new(x, y), DiscreteSize::new(w, h)))
}

proptest! {
    #[test]
    fn proptest_inclusive_overlap_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(a.overlaps_inclusive(&b), b.overlaps_inclusive(&a));
    }

    #[test]
    fn proptest_disjoint_rects_keep_a_gap(a in rect(), b in rect()) {
        prop_assume!(!a.overlaps_inclusive(&b));
        // no cell of one rectangle touches a cell of the other, even diagonally
        for ca in a.cells() {
            for cb in b.cells() {
                let dx = ca.x.abs_diff(cb.x);
                let dy = ca.y.abs_diff(cb.y);
                prop_assert!(dx > 1 || dy > 1);
            }
        }
    }

    #[test]
    fn proptest_rect_cells_match_area(r in rect()) {
        prop_assert_eq!(r.cells().count(), r.extent.area());
        prop_assert!(r.cells().all(|c| r.contains(&c)));
    }

    #[test]
    fn proptest_density_never_rises_between_observations(
        rho in 0.0f64..=1.0,
        start in 0.0f64..=1.0,
        steps in 1usize..200,
    ) {
        let mut d = PheromoneDensity::with_value(start, rho);
        let mut last = d.value();
        for _ in 0..steps {
            let next = d.decay();
            prop_assert!(next <= last);
            prop_assert!(next >= 0.0);
            last = next;
        }
    }

    #[test]
    fn proptest_distance_is_symmetric(
        ax in -100.0f64..100.0, ay in -100.0f64..100.0,
        bx in -100.0f64..100.0, by in -100.0f64..100.0,
    ) {
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);
        prop_assert_eq!(a.distance_to(&b), b.distance_to(&a));
        prop_assert!(a.distance_to(&b) >= 0.0);
    }
}
