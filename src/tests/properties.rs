use anyhow::Result;
use geo::BooleanOps;

use super::*;
use crate::session::simulate;
use crate::tool::ToolProfile;

#[test]
fn zero_radius_is_passthrough() -> Result<()> {
    init_test_logger();

    let result = simulate(&square(100.0)?, &ToolProfile::with_tolerance(0.0, 0.1))?;
    assert!((area(&result.cut) - 10_000.0).abs() < 1e-6);
    assert!(result.diagnostics.unreachable.is_empty());
    Ok(())
}

#[test]
fn erosion_shrinks_monotonically() -> Result<()> {
    init_test_logger();

    let outline = circle(0.0, 0.0, 300.0)?;
    let mut last = area(&simulate(&outline, &ToolProfile::with_tolerance(0.0, 1.0))?.cut);

    for radius in [10.0, 50.0, 100.0, 200.0] {
        let result = simulate(&outline, &ToolProfile::with_tolerance(radius, 1.0))?;
        let cut = area(&result.cut);
        assert!(
            cut < last,
            "radius {radius}: area {cut} should be below {last}"
        );
        last = cut;
    }
    Ok(())
}

#[test]
fn bit_larger_than_shape_vanishes() -> Result<()> {
    init_test_logger();

    let result = simulate(&square(100.0)?, &ToolProfile::with_tolerance(60.0, 0.1))?;
    assert!(result.cut.0.is_empty());
    assert_eq!(result.diagnostics.vanished_contours, 1);
    Ok(())
}

#[test]
fn result_stays_inside_the_input() -> Result<()> {
    init_test_logger();

    let outline = notched_square()?;
    let original = simulate(&outline, &ToolProfile::with_tolerance(0.0, 0.4))?;
    let eroded = simulate(&outline, &ToolProfile::new(40.0))?;

    let overshoot = eroded.cut.difference(&original.cut);
    assert!(area(&overshoot) < 1.0, "overshoot area {}", area(&overshoot));
    Ok(())
}

#[test]
fn convex_round_trip_is_exact_with_miters() -> Result<()> {
    init_test_logger();

    use geo::{Coord, MultiPolygon};

    use crate::assemble::polygon_from_ring;
    use crate::offset::{JoinStyle, OffsetDirection, offset_solid};

    let ring = [
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 200.0, y: 0.0 },
        Coord { x: 200.0, y: 200.0 },
        Coord { x: 0.0, y: 200.0 },
    ];
    let solid = MultiPolygon::new(vec![polygon_from_ring(&ring)]);

    let eroded = offset_solid(&solid, 30.0, OffsetDirection::Erode, JoinStyle::Miter, 0.1);
    assert!((area(&eroded) - 140.0 * 140.0).abs() < 1e-6);

    let back = offset_solid(&eroded, 30.0, OffsetDirection::Grow, JoinStyle::Miter, 0.1);
    assert!((area(&back) - area(&solid)).abs() < 1e-6);
    Ok(())
}

#[test]
fn repeated_runs_are_bit_identical() -> Result<()> {
    init_test_logger();

    let outline = notched_square()?;
    let tool = ToolProfile::new(40.0);

    let a = simulate(&outline, &tool)?;
    let b = simulate(&outline, &tool)?;
    assert_eq!(a.cut, b.cut);
    Ok(())
}
