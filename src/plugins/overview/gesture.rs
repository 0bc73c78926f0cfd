//! Click versus drag classification for the primary pointer.

use bevy::prelude::*;

pub const CLICK_DISTANCE_PX: f32 = 5.0;
pub const CLICK_TIME_SECS: f64 = 0.3;

/// What the pointer went down on. Captured for the whole gesture.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PointerTarget {
    MapCanvas,
    Minimap,
    /// Zoom slider track in the toolbar.
    Slider,
    Backdrop,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Pressed,
    Dragging,
}

/// Result of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    Click { position: Vec2, target: PointerTarget },
    DragEnd { target: PointerTarget },
    /// Neither a click nor a drag: held too long or released too far away.
    Discarded,
    /// No gesture was in progress.
    Ignored,
}

#[derive(Resource, Debug, Clone)]
pub struct GestureClassifier {
    phase: GesturePhase,
    target: Option<PointerTarget>,
    down_time: f64,
    down_pos: Vec2,
    last_pos: Vec2,
    pub click_distance: f32,
    pub click_time: f64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::with_thresholds(CLICK_DISTANCE_PX, CLICK_TIME_SECS)
    }
}

impl GestureClassifier {
    pub fn with_thresholds(click_distance: f32, click_time: f64) -> Self {
        Self {
            phase: GesturePhase::Idle,
            target: None,
            down_time: 0.0,
            down_pos: Vec2::ZERO,
            last_pos: Vec2::ZERO,
            click_distance,
            click_time,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn target(&self) -> Option<PointerTarget> {
        self.target
    }

    pub fn is_active(&self) -> bool {
        self.phase != GesturePhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    /// A new press always restarts tracking.
    pub fn pointer_down(&mut self, position: Vec2, now: f64, target: PointerTarget) {
        self.phase = GesturePhase::Pressed;
        self.target = Some(target);
        self.down_time = now;
        self.down_pos = position;
        self.last_pos = position;
    }

    /// Returns the pan delta since the previous move once dragging.
    pub fn pointer_move(&mut self, position: Vec2) -> Option<Vec2> {
        match self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Pressed => {
                if position.distance(self.down_pos) > self.click_distance {
                    self.phase = GesturePhase::Dragging;
                    Some(self.advance(position))
                } else {
                    self.last_pos = position;
                    None
                }
            }
            GesturePhase::Dragging => Some(self.advance(position)),
        }
    }

    pub fn pointer_up(&mut self, position: Vec2, now: f64) -> Release {
        let Some(target) = self.target else {
            self.clear();
            return Release::Ignored;
        };

        let release = match self.phase {
            GesturePhase::Idle => Release::Ignored,
            GesturePhase::Dragging => Release::DragEnd { target },
            GesturePhase::Pressed => {
                let elapsed = now - self.down_time;
                let distance = position.distance(self.down_pos);
                if elapsed < self.click_time && distance < self.click_distance {
                    Release::Click { position, target }
                } else {
                    Release::Discarded
                }
            }
        };

        self.clear();
        release
    }

    /// Pointer left the surface: abandon the gesture without a click.
    pub fn pointer_leave(&mut self) {
        self.clear();
    }

    pub fn clear(&mut self) {
        self.phase = GesturePhase::Idle;
        self.target = None;
    }

    fn advance(&mut self, position: Vec2) -> Vec2 {
        let delta = position - self.last_pos;
        self.last_pos = position;
        delta
    }
}
