//! Two-click distance measurement over the map canvas.
//!
//! Points are kept in panel-local pixels as clicked, so a measurement stays
//! put on screen if the view is panned or zoomed afterwards.

use bevy::prelude::*;

use super::coords::{window_to_canvas, PanelRect};
use super::layout::OverviewLayout;

/// Spacing between dots of the measurement line, in pixels.
pub const DOT_SPACING_PX: f32 = 3.0;
pub const MIN_DOT_INTERVALS: usize = 2;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MeasureState {
    #[default]
    Idle,
    AwaitingEnd,
    Complete,
}

/// Converts pixel distances into world units for the current view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub world_extent: f32,
    pub pixel_extent: f32,
    pub zoom: f32,
}

pub fn real_distance(ui_distance: f32, calibration: Calibration) -> f32 {
    if calibration.pixel_extent <= 0.0 || calibration.zoom <= 0.0 {
        return 0.0;
    }
    ui_distance * (calibration.world_extent / calibration.pixel_extent) / calibration.zoom
}

pub fn distance_label(real: f32) -> String {
    format!("{:.1} m", real)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureOutcome {
    Ignored,
    Started,
    Completed { ui_distance: f32, real_distance: f32 },
}

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MeasurementSession {
    active: bool,
    state: MeasureState,
    start: Option<Vec2>,
    end: Option<Vec2>,
    distance: Option<f32>,
}

impl MeasurementSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> MeasureState {
        self.state
    }

    pub fn start(&self) -> Option<Vec2> {
        self.start
    }

    pub fn end(&self) -> Option<Vec2> {
        self.end
    }

    pub fn distance(&self) -> Option<f32> {
        self.distance
    }

    /// Returns the new armed state.
    pub fn toggle(&mut self) -> bool {
        if self.active {
            self.deactivate();
        } else {
            self.activate();
        }
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Disarms and forgets any points.
    pub fn deactivate(&mut self) {
        *self = Self::default();
    }

    /// A third click starts a fresh measurement from the clicked point.
    pub fn click(&mut self, local: Vec2, calibration: Calibration) -> MeasureOutcome {
        if !self.active || !local.is_finite() {
            return MeasureOutcome::Ignored;
        }

        match (self.state, self.start) {
            (MeasureState::AwaitingEnd, Some(start)) => {
                let ui_distance = start.distance(local);
                let real = real_distance(ui_distance, calibration);
                self.end = Some(local);
                self.distance = Some(real);
                self.state = MeasureState::Complete;
                MeasureOutcome::Completed {
                    ui_distance,
                    real_distance: real,
                }
            }
            _ => {
                self.start = Some(local);
                self.end = None;
                self.distance = None;
                self.state = MeasureState::AwaitingEnd;
                MeasureOutcome::Started
            }
        }
    }

    pub fn label(&self) -> Option<String> {
        self.distance.map(distance_label)
    }
}

/// Evenly spaced dots from `start` to `end`, endpoints included.
pub fn dotted_line(start: Vec2, end: Vec2) -> Vec<Vec2> {
    let length = start.distance(end);
    let intervals = ((length / DOT_SPACING_PX).floor() as usize).max(MIN_DOT_INTERVALS);
    (0..=intervals)
        .map(|index| start.lerp(end, index as f32 / intervals as f32))
        .collect()
}

const MARKER_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);
const LINE_COLOR: Color = Color::srgb(1.0, 0.95, 0.6);

/// Window-pixel position of the distance label, at the line midpoint.
pub fn label_anchor(session: &MeasurementSession, panel: &PanelRect) -> Option<Vec2> {
    let (start, end) = (session.start?, session.end?);
    Some(panel.min + (start + end) * 0.5)
}

pub fn draw_measurement(
    mut gizmos: Gizmos,
    session: Res<MeasurementSession>,
    layout: Res<OverviewLayout>,
) {
    if !session.is_active() {
        return;
    }

    let origin = layout.map.min;
    let to_canvas = |local: Vec2| window_to_canvas(origin + local, layout.window);

    if let Some(start) = session.start() {
        gizmos.circle_2d(to_canvas(start), 4.0, MARKER_COLOR);
    }
    if let Some(end) = session.end() {
        gizmos.circle_2d(to_canvas(end), 4.0, MARKER_COLOR);
    }
    if let (Some(start), Some(end)) = (session.start(), session.end()) {
        for dot in dotted_line(start, end) {
            gizmos.circle_2d(to_canvas(dot), 0.8, LINE_COLOR);
        }
    }
}
