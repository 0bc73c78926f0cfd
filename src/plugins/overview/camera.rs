//! Viewport zoom and pan state plus the zoom controller systems.

use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::plugins::core::{ConsoleConfig, OverviewWindow};

use super::commands::ViewportCommand;
use super::coords::{screen_to_map, MAP_CENTER};
use super::layout::OverviewLayout;

// =============================================================================
// Constants
// =============================================================================

pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_DEFAULT: f32 = 1.0;

/// Pixel-unit wheel events are scaled down to roughly one line per notch.
const PIXELS_PER_LINE: f32 = 100.0;

// =============================================================================
// Resources
// =============================================================================

/// Zoom factor and pan offset of the overview map. Offset is in screen percent.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub zoom: f32,
    pub offset: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: ZOOM_DEFAULT,
            offset: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn label(&self) -> String {
        format!("{:.1}x", self.zoom)
    }

    /// Adjusts zoom by `delta`, keeping the map point under `pivot` fixed.
    /// Without a pivot the offset is left alone. Returns whether zoom changed.
    pub fn zoom_by(&mut self, delta: f32, pivot: Option<Vec2>) -> bool {
        if !delta.is_finite() {
            return false;
        }
        self.set_zoom(self.zoom + delta, pivot)
    }

    pub fn set_zoom(&mut self, zoom: f32, pivot: Option<Vec2>) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let next = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if next == self.zoom {
            return false;
        }

        if let Some(pivot) = pivot.filter(|pivot| pivot.is_finite()) {
            let anchored = screen_to_map(pivot, self);
            self.offset =
                pivot - Vec2::splat(MAP_CENTER) - (anchored - Vec2::splat(MAP_CENTER)) * next;
        }
        self.zoom = next;
        true
    }

    /// Slider position in `[0, 1]` mapped linearly onto the zoom range.
    pub fn zoom_to_slider(&mut self, fraction: f32) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        self.set_zoom(zoom_for_slider(fraction), None)
    }

    pub fn slider_fraction(&self) -> f32 {
        ((self.zoom - ZOOM_MIN) / (ZOOM_MAX - ZOOM_MIN)).clamp(0.0, 1.0)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        if delta.is_finite() {
            self.offset += delta;
        }
    }

    /// Puts `map` at the panel centre at the current zoom.
    pub fn recenter_on(&mut self, map: Vec2) {
        if map.is_finite() {
            self.offset = (Vec2::splat(MAP_CENTER) - map) * self.zoom;
        }
    }

    /// Raises zoom to at least `min_zoom`, then centres `map`.
    pub fn focus_on(&mut self, map: Vec2, min_zoom: f32) {
        if !map.is_finite() {
            return;
        }
        if self.zoom < min_zoom {
            self.zoom = min_zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
        self.recenter_on(map);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn zoom_for_slider(fraction: f32) -> f32 {
    ZOOM_MIN + fraction.clamp(0.0, 1.0) * (ZOOM_MAX - ZOOM_MIN)
}

/// Converts one wheel event into a bounded zoom delta. Scrolling up zooms in.
pub fn wheel_zoom_delta(event: &MouseWheel, sensitivity: f32, limit: f32) -> f32 {
    let lines = match event.unit {
        MouseScrollUnit::Line => event.y,
        MouseScrollUnit::Pixel => event.y / PIXELS_PER_LINE,
    };
    let limit = limit.abs();
    (lines * sensitivity).clamp(-limit, limit)
}

// =============================================================================
// Systems
// =============================================================================

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Camera {
            order: 0,
            ..default()
        },
        Name::new("ConsoleCamera"),
    ));

    info!("Console camera spawned");
}

/// Wheel over the map canvas zooms about the cursor.
/// Scrolling while the overview is closed is consumed and dropped.
pub fn handle_zoom_wheel(
    mut scroll_events: MessageReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    overview: Res<OverviewWindow>,
    layout: Res<OverviewLayout>,
    config: Res<ConsoleConfig>,
    mut commands: MessageWriter<ViewportCommand>,
) {
    if !overview.open {
        scroll_events.clear();
        return;
    }

    let cursor = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position());

    for event in scroll_events.read() {
        let Some(cursor) = cursor else {
            continue;
        };
        if !layout.map.contains(cursor) {
            continue;
        }

        let delta = wheel_zoom_delta(event, config.wheel_sensitivity, config.wheel_delta_limit);
        if delta == 0.0 {
            continue;
        }

        commands.write(ViewportCommand::ZoomBy {
            delta,
            pivot: Some(layout.map.to_percent(cursor)),
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
