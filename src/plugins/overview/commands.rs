//! Viewport commands and the single handler that applies them.

use bevy::prelude::*;

use crate::network::{EntityRef, NetworkSnapshot};
use crate::plugins::core::{ConsoleConfig, EventLog, OverviewWindow};

use super::camera::ViewportState;
use super::coords::CoordinateSpace;
use super::gesture::GestureClassifier;
use super::layout::OverviewLayout;
use super::measure::{distance_label, Calibration, MeasureOutcome, MeasurementSession};
use super::minimap::recenter_offset;
use super::render::InteractionOverlay;

// =============================================================================
// Messages
// =============================================================================

/// Every mutation of the overview goes through one of these.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum ViewportCommand {
    Open,
    Close,
    /// Pivot is in map-panel screen percent.
    ZoomBy { delta: f32, pivot: Option<Vec2> },
    /// +1 zooms in one step, -1 zooms out.
    ZoomStep { direction: f32 },
    ZoomToSlider { fraction: f32 },
    /// Screen percent.
    PanBy(Vec2),
    Reset,
    RecenterMinimap { map: Vec2 },
    FocusMap { map: Vec2 },
    ToggleMeasure,
    /// Panel-local pixels.
    MeasureClick { local: Vec2 },
    Select(EntityRef),
}

/// Outbound request for the host camera to move to an entity.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct JumpToEntity {
    pub entity: EntityRef,
    pub position: Vec3,
}

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct OverviewOpened;

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct OverviewClosed;

// =============================================================================
// Handler
// =============================================================================

#[allow(clippy::too_many_arguments)]
pub fn apply_viewport_commands(
    mut commands: MessageReader<ViewportCommand>,
    mut overview: ResMut<OverviewWindow>,
    mut view: ResMut<ViewportState>,
    mut session: ResMut<MeasurementSession>,
    mut gesture: ResMut<GestureClassifier>,
    mut overlay: ResMut<InteractionOverlay>,
    snapshot: Res<NetworkSnapshot>,
    space: Res<CoordinateSpace>,
    layout: Res<OverviewLayout>,
    config: Res<ConsoleConfig>,
    mut jumps: MessageWriter<JumpToEntity>,
    mut opened: MessageWriter<OverviewOpened>,
    mut closed: MessageWriter<OverviewClosed>,
    mut log: ResMut<EventLog>,
) {
    for command in commands.read() {
        if !overview.open && *command != ViewportCommand::Open {
            continue;
        }

        match *command {
            ViewportCommand::Open => {
                if overview.open {
                    continue;
                }
                overview.open = true;
                *gesture =
                    GestureClassifier::with_thresholds(config.click_distance_px, config.click_time_secs);
                opened.write(OverviewOpened);
                info!("Line overview opened");
            }
            ViewportCommand::Close => {
                close_overview(
                    &mut overview,
                    &mut view,
                    &mut session,
                    &mut gesture,
                    &mut overlay,
                    &config,
                );
                closed.write(OverviewClosed);
                info!("Line overview closed");
            }
            ViewportCommand::ZoomBy { delta, pivot } => {
                if view.zoom_by(delta, pivot) {
                    info!("Overview zoom {}", view.label());
                }
            }
            ViewportCommand::ZoomStep { direction } => {
                if view.zoom_by(config.zoom_step * direction.signum(), None) {
                    info!("Overview zoom {}", view.label());
                }
            }
            ViewportCommand::ZoomToSlider { fraction } => {
                view.zoom_to_slider(fraction);
            }
            ViewportCommand::PanBy(delta) => view.pan_by(delta),
            ViewportCommand::Reset => {
                view.reset();
                log.push("View reset".to_string());
            }
            ViewportCommand::RecenterMinimap { map } => {
                if map.is_finite() {
                    view.offset = recenter_offset(map, view.zoom);
                }
            }
            ViewportCommand::FocusMap { map } => view.focus_on(map, config.focus_min_zoom),
            ViewportCommand::ToggleMeasure => {
                let active = session.toggle();
                info!("Measurement tool {}", if active { "armed" } else { "off" });
                log.push(format!("Measure: {}", if active { "on" } else { "off" }));
            }
            ViewportCommand::MeasureClick { local } => {
                let calibration = Calibration {
                    world_extent: space.bounds.horizontal_extent(),
                    pixel_extent: layout.map.pixel_extent(),
                    zoom: view.zoom,
                };
                if let MeasureOutcome::Completed { real_distance, .. } =
                    session.click(local, calibration)
                {
                    info!("Measured {}", distance_label(real_distance));
                    log.push(format!("Measured {}", distance_label(real_distance)));
                }
            }
            ViewportCommand::Select(entity) => {
                let Some(position) = snapshot.position_of(entity) else {
                    warn!("Selected entity {:?} is not in the snapshot", entity);
                    continue;
                };
                let name = snapshot.name_of(entity).unwrap_or("entity").to_string();
                jumps.write(JumpToEntity { entity, position });
                log.push(format!("Jump to {}", name));
                info!("Jump to {} at {:?}", name, position);

                close_overview(
                    &mut overview,
                    &mut view,
                    &mut session,
                    &mut gesture,
                    &mut overlay,
                    &config,
                );
                closed.write(OverviewClosed);
            }
        }
    }
}

/// Drops all transient overview state. The view survives only when configured to.
fn close_overview(
    overview: &mut OverviewWindow,
    view: &mut ViewportState,
    session: &mut MeasurementSession,
    gesture: &mut GestureClassifier,
    overlay: &mut InteractionOverlay,
    config: &ConsoleConfig,
) {
    overview.open = false;
    session.deactivate();
    gesture.clear();
    overlay.hovered = None;
    if !config.keep_view_on_close {
        view.reset();
    }
}
