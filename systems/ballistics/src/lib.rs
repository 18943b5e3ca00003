#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure collision geometry shared by the combat simulation.
//!
//! Every function here is stateless and total: degenerate inputs (zero-length
//! sweeps, coincident points) resolve to "no hit" or `None` instead of
//! panicking, so the world never has to guard its calls.

use skyshield_core::{CellRect, WorldPoint};

/// Axis-aligned bounding box in world space. The y axis grows downward, so
/// `min` is the top-left corner on screen and `max` the bottom-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    min: WorldPoint,
    max: WorldPoint,
}

impl Aabb {
    /// Builds a box from its extreme corners. Inverted extents are normalised.
    #[must_use]
    pub fn new(min: WorldPoint, max: WorldPoint) -> Self {
        Self {
            min: WorldPoint::new(min.x().min(max.x()), min.y().min(max.y())),
            max: WorldPoint::new(min.x().max(max.x()), min.y().max(max.y())),
        }
    }

    /// World-space box covering a building's grid footprint.
    #[must_use]
    pub fn from_cell_rect(rect: &CellRect) -> Self {
        Self::new(rect.world_min(), rect.world_max())
    }

    /// Top-left corner of the box.
    #[must_use]
    pub const fn min(&self) -> WorldPoint {
        self.min
    }

    /// Bottom-right corner of the box.
    #[must_use]
    pub const fn max(&self) -> WorldPoint {
        self.max
    }

    /// Point inside the box nearest to the provided point.
    #[must_use]
    pub fn closest_point(&self, point: WorldPoint) -> WorldPoint {
        WorldPoint::new(
            point.x().clamp(self.min.x(), self.max.x()),
            point.y().clamp(self.min.y(), self.max.y()),
        )
    }

    /// Distance from the provided point to the box surface, zero inside.
    #[must_use]
    pub fn distance_to(&self, point: WorldPoint) -> f32 {
        self.closest_point(point).distance(point)
    }
}

/// Reports whether a circle touches the box, by closest-point distance.
#[must_use]
pub fn circle_hits_aabb(aabb: &Aabb, center: WorldPoint, radius: f32) -> bool {
    aabb.distance_to(center) <= radius
}

/// Reports whether two circles overlap, by radius sum.
#[must_use]
pub fn circles_overlap(a: WorldPoint, a_radius: f32, b: WorldPoint, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Sweeps a circle of the provided radius straight down from `y_start` to
/// `y_end` at the fixed horizontal position `x`, returning the y at which it
/// first touches the box.
///
/// Only the radius in x widens the box; vertically the sweep tests the box
/// edges directly, matching how descending enemies impact rooftops. Returns
/// `None` for sweeps that never reach the box or travel upward.
#[must_use]
pub fn vertical_sweep_hit(aabb: &Aabb, x: f32, radius: f32, y_start: f32, y_end: f32) -> Option<f32> {
    if y_end < y_start {
        return None;
    }
    if x + radius < aabb.min.x() || x - radius > aabb.max.x() {
        return None;
    }

    // Already level with or inside the box: impact where we stand.
    if y_start >= aabb.min.y() && y_start <= aabb.max.y() {
        return Some(y_start);
    }
    if y_start > aabb.max.y() {
        return None;
    }

    (y_end >= aabb.min.y()).then_some(aabb.min.y())
}

/// Velocity vector of the provided speed aimed from `from` toward `to`.
///
/// Returns `None` when the points coincide, so callers skip the shot instead
/// of dividing by zero.
#[must_use]
pub fn homing_velocity(from: WorldPoint, to: WorldPoint, speed: f32) -> Option<WorldPoint> {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let distance = (dx * dx + dy * dy).sqrt();
    if distance <= f32::EPSILON {
        return None;
    }
    Some(WorldPoint::new(dx / distance * speed, dy / distance * speed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyshield_core::{CellCoord, CellRectSize};

    fn unit_box() -> Aabb {
        Aabb::new(WorldPoint::new(10.0, 10.0), WorldPoint::new(20.0, 30.0))
    }

    #[test]
    fn closest_point_clamps_into_the_box() {
        let aabb = unit_box();
        let outside = WorldPoint::new(0.0, 50.0);
        assert_eq!(aabb.closest_point(outside), WorldPoint::new(10.0, 30.0));
        let inside = WorldPoint::new(15.0, 20.0);
        assert_eq!(aabb.closest_point(inside), inside);
    }

    #[test]
    fn circle_hit_matches_distance_to_surface() {
        let aabb = unit_box();
        assert!(circle_hits_aabb(&aabb, WorldPoint::new(25.0, 20.0), 5.0));
        assert!(!circle_hits_aabb(&aabb, WorldPoint::new(26.0, 20.0), 5.0));
        // Inside counts as a hit regardless of radius.
        assert!(circle_hits_aabb(&aabb, WorldPoint::new(15.0, 20.0), 0.0));
    }

    #[test]
    fn circle_overlap_uses_radius_sum() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(10.0, 0.0);
        assert!(circles_overlap(a, 5.0, b, 5.0));
        assert!(!circles_overlap(a, 4.0, b, 5.9));
    }

    #[test]
    fn vertical_sweep_reports_entry_edge() {
        let aabb = unit_box();
        assert_eq!(vertical_sweep_hit(&aabb, 15.0, 2.0, 0.0, 50.0), Some(10.0));
    }

    #[test]
    fn vertical_sweep_misses_when_offset_exceeds_radius() {
        let aabb = unit_box();
        assert_eq!(vertical_sweep_hit(&aabb, 25.0, 2.0, 0.0, 50.0), None);
        // The radius widens the box in x.
        assert_eq!(vertical_sweep_hit(&aabb, 25.0, 6.0, 0.0, 50.0), Some(10.0));
    }

    #[test]
    fn vertical_sweep_stops_short_of_the_box() {
        let aabb = unit_box();
        assert_eq!(vertical_sweep_hit(&aabb, 15.0, 2.0, 0.0, 9.0), None);
    }

    #[test]
    fn vertical_sweep_inside_box_impacts_in_place() {
        let aabb = unit_box();
        assert_eq!(vertical_sweep_hit(&aabb, 15.0, 2.0, 20.0, 25.0), Some(20.0));
    }

    #[test]
    fn vertical_sweep_below_box_never_hits() {
        let aabb = unit_box();
        assert_eq!(vertical_sweep_hit(&aabb, 15.0, 2.0, 40.0, 60.0), None);
    }

    #[test]
    fn homing_velocity_is_normalised_to_speed() {
        let velocity = homing_velocity(
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(3.0, 4.0),
            10.0,
        )
        .expect("distinct points produce a velocity");
        assert!((velocity.x() - 6.0).abs() < 1e-4);
        assert!((velocity.y() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn homing_velocity_refuses_coincident_points() {
        let point = WorldPoint::new(5.0, 5.0);
        assert!(homing_velocity(point, point, 10.0).is_none());
    }

    #[test]
    fn aabb_from_cell_rect_spans_footprint() {
        let rect = CellRect::from_origin_and_size(CellCoord::new(0, 0), CellRectSize::new(2, 1));
        let aabb = Aabb::from_cell_rect(&rect);
        assert_eq!(aabb.max().y(), skyshield_core::GROUND_Y);
        assert_eq!(
            aabb.max().x() - aabb.min().x(),
            2.0 * skyshield_core::SLOT_WIDTH
        );
    }
}
