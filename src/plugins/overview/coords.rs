//! World, map and screen coordinate transforms.
//!
//! Map space is a normalized 0..100 square over the bounds' X/Z plane.
//! Screen space is also 0..100, relative to the panel, after zoom and pan.

use bevy::prelude::*;

use super::camera::ViewportState;

// =============================================================================
// Constants
// =============================================================================

/// Smallest world extent per axis before the margin is applied.
pub const MIN_EXTENT: f32 = 50.0;
pub const BOUNDS_MARGIN: f32 = 1.2;
pub const DEFAULT_BOUNDS_SIZE: f32 = 100.0;
pub const MAP_CENTER: f32 = 50.0;

// =============================================================================
// Bounds
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub size: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        let size = Vec3::splat(DEFAULT_BOUNDS_SIZE);
        Self {
            min: -size * 0.5,
            size,
        }
    }
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        self.min + self.size * 0.5
    }

    /// Longest horizontal side, used for measurement calibration.
    pub fn horizontal_extent(&self) -> f32 {
        self.size.x.max(self.size.z)
    }
}

/// Bounds over every finite position, floored and padded.
pub fn compute_bounds(positions: impl IntoIterator<Item = Vec3>) -> Bounds {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    let mut any = false;

    for position in positions {
        if !position.is_finite() {
            continue;
        }
        min = min.min(position);
        max = max.max(position);
        any = true;
    }

    if !any {
        return Bounds::default();
    }

    let mid = (min + max) * 0.5;
    let raw = max - min;
    let size = Vec3::new(
        raw.x.max(MIN_EXTENT),
        raw.y.max(MIN_EXTENT),
        raw.z.max(MIN_EXTENT),
    ) * BOUNDS_MARGIN;

    Bounds {
        min: mid - size * 0.5,
        size,
    }
}

// =============================================================================
// CoordinateSpace
// =============================================================================

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateSpace {
    pub bounds: Bounds,
}

impl CoordinateSpace {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Self {
        Self::new(compute_bounds(positions))
    }

    pub fn world_to_map(&self, world: Vec3) -> Vec2 {
        let bounds = &self.bounds;
        Vec2::new(
            (world.x - bounds.min.x) / bounds.size.x * 100.0,
            (world.z - bounds.min.z) / bounds.size.z * 100.0,
        )
    }

    /// The returned Y sits at the bounds' centre height.
    pub fn map_to_world(&self, map: Vec2) -> Vec3 {
        let bounds = &self.bounds;
        Vec3::new(
            bounds.min.x + map.x / 100.0 * bounds.size.x,
            bounds.center().y,
            bounds.min.z + map.y / 100.0 * bounds.size.z,
        )
    }

    /// Shared by drawing and hit-testing.
    pub fn world_to_screen(&self, world: Vec3, view: &ViewportState) -> Vec2 {
        map_to_screen(self.world_to_map(world), view)
    }

    pub fn screen_to_world(&self, screen: Vec2, view: &ViewportState) -> Vec3 {
        self.map_to_world(screen_to_map(screen, view))
    }
}

pub fn map_to_screen(map: Vec2, view: &ViewportState) -> Vec2 {
    (map - Vec2::splat(MAP_CENTER)) * view.zoom + Vec2::splat(MAP_CENTER) + view.offset
}

pub fn screen_to_map(screen: Vec2, view: &ViewportState) -> Vec2 {
    (screen - Vec2::splat(MAP_CENTER) - view.offset) / view.zoom + Vec2::splat(MAP_CENTER)
}

// =============================================================================
// Panel pixels
// =============================================================================

/// Panel rectangle in window pixels (origin top-left, +Y down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanelRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl PanelRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Percent (0..100) to window pixels.
    pub fn to_pixels(&self, percent: Vec2) -> Vec2 {
        self.min + percent / 100.0 * self.size
    }

    /// Window pixels to percent; zero for a collapsed panel.
    pub fn to_percent(&self, pixels: Vec2) -> Vec2 {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Vec2::ZERO;
        }
        (pixels - self.min) / self.size * 100.0
    }

    pub fn delta_to_percent(&self, delta: Vec2) -> Vec2 {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Vec2::ZERO;
        }
        delta / self.size * 100.0
    }

    pub fn to_local(&self, pixels: Vec2) -> Vec2 {
        pixels - self.min
    }

    pub fn pixel_extent(&self) -> f32 {
        self.size.x.max(self.size.y)
    }
}

/// Window pixels to 2D canvas space (origin at window centre, +Y up).
pub fn window_to_canvas(pixels: Vec2, window_size: Vec2) -> Vec2 {
    Vec2::new(
        pixels.x - window_size.x * 0.5,
        window_size.y * 0.5 - pixels.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        let diff = (a - b).abs();
        assert!(diff < 1e-3, "expected {} close to {}", a, b);
    }

    fn assert_vec_close(a: Vec2, b: Vec2) {
        assert_close(a.x, b.x);
        assert_close(a.y, b.y);
    }

    fn unit_space() -> CoordinateSpace {
        CoordinateSpace::new(Bounds {
            min: Vec3::ZERO,
            size: Vec3::splat(100.0),
        })
    }

    #[test]
    fn empty_bounds_default_to_origin_square() {
        let bounds = compute_bounds(Vec::new());
        assert_eq!(bounds.size, Vec3::splat(100.0));
        assert_eq!(bounds.center(), Vec3::ZERO);
    }

    #[test]
    fn single_point_bounds_floor_and_margin() {
        let bounds = compute_bounds([Vec3::new(10.0, 0.0, 20.0)]);
        assert_close(bounds.size.x, 60.0);
        assert_close(bounds.size.z, 60.0);
        assert_close(bounds.center().x, 10.0);
        assert_close(bounds.center().z, 20.0);
    }

    #[test]
    fn wide_bounds_apply_margin_about_midpoint() {
        let bounds = compute_bounds([Vec3::new(0.0, 0.0, 0.0), Vec3::new(1000.0, 0.0, 10.0)]);
        assert_close(bounds.size.x, 1200.0);
        assert_close(bounds.min.x, -100.0);
        assert_close(bounds.size.z, 60.0);
        assert!(bounds.size.x >= MIN_EXTENT * BOUNDS_MARGIN);
    }

    #[test]
    fn non_finite_positions_are_skipped() {
        let bounds = compute_bounds([Vec3::new(f32::NAN, 0.0, 0.0), Vec3::new(5.0, 0.0, 5.0)]);
        assert!(bounds.min.is_finite());
        assert_close(bounds.center().x, 5.0);
    }

    #[test]
    fn world_to_map_spans_bounds() {
        let space = unit_space();
        assert_vec_close(space.world_to_map(Vec3::new(50.0, 0.0, 50.0)), Vec2::splat(50.0));
        assert_vec_close(space.world_to_map(Vec3::new(100.0, 0.0, 0.0)), Vec2::new(100.0, 0.0));
    }

    #[test]
    fn map_to_screen_identity_at_default_view() {
        let view = ViewportState::default();
        let map = Vec2::new(12.0, 87.0);
        assert_vec_close(map_to_screen(map, &view), map);
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let space = CoordinateSpace::from_positions([
            Vec3::new(-40.0, 3.0, 10.0),
            Vec3::new(300.0, 9.0, 220.0),
        ]);
        let bounds = space.bounds;
        let offsets = [
            Vec2::ZERO,
            Vec2::new(-14.0, 31.0),
            Vec2::new(60.0, -45.0),
            Vec2::new(-80.0, -80.0),
        ];

        for zoom in [0.5, 0.8, 1.0, 1.7, 2.3, 3.0] {
            for offset in offsets {
                let view = ViewportState { zoom, offset };
                for i in 0..=4 {
                    for j in 0..=4 {
                        let world = Vec3::new(
                            bounds.min.x + bounds.size.x * i as f32 / 4.0,
                            5.0,
                            bounds.min.z + bounds.size.z * j as f32 / 4.0,
                        );
                        let screen = space.world_to_screen(world, &view);
                        assert_vec_close(map_to_screen(space.world_to_map(world), &view), screen);

                        let back = space.screen_to_world(screen, &view);
                        assert_close(back.x, world.x);
                        assert_close(back.z, world.z);
                        assert_close(back.y, bounds.center().y);
                    }
                }
            }
        }
    }

    #[test]
    fn panel_rect_round_trip_and_contains() {
        let panel = PanelRect::new(Vec2::new(100.0, 50.0), Vec2::new(800.0, 400.0));
        assert_vec_close(panel.to_pixels(Vec2::splat(50.0)), Vec2::new(500.0, 250.0));
        assert_vec_close(panel.to_percent(Vec2::new(500.0, 250.0)), Vec2::splat(50.0));
        assert!(panel.contains(Vec2::new(100.0, 50.0)));
        assert!(!panel.contains(Vec2::new(99.0, 50.0)));
        assert_close(panel.pixel_extent(), 800.0);
    }

    #[test]
    fn collapsed_panel_maps_to_zero() {
        let panel = PanelRect::new(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert_eq!(panel.to_percent(Vec2::new(5.0, 5.0)), Vec2::ZERO);
        assert_eq!(panel.delta_to_percent(Vec2::new(5.0, 5.0)), Vec2::ZERO);
    }

    #[test]
    fn window_to_canvas_flips_y_about_center() {
        let canvas = window_to_canvas(Vec2::new(0.0, 0.0), Vec2::new(1280.0, 720.0));
        assert_vec_close(canvas, Vec2::new(-640.0, 360.0));
    }
}
