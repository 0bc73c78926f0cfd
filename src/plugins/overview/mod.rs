//! Schematic overview of the line network.
//!
//! Systems run in one chain each frame: layout and input, then the command
//! dispatcher, then the jump animator, then layer rebuild, then drawing.

mod backdrop;
mod camera;
mod commands;
mod coords;
mod gesture;
mod interaction;
mod jump;
mod layout;
mod measure;
mod minimap;
mod render;

use bevy::ecs::schedule::IntoScheduleConfigs;
use bevy::prelude::*;

use crate::plugins::core::{overview_open, ConsoleState};

// Re-export public types
pub use camera::ViewportState;
pub use commands::{
    apply_viewport_commands, OverviewClosed, OverviewOpened, ViewportCommand,
};
pub use coords::CoordinateSpace;
pub use interaction::handle_overview_hotkeys;
pub use jump::{CameraRig, JumpAnimation};
pub use layout::{OverlayRegion, OverviewLayout, SLIDER_LEFT, SLIDER_SIZE};
pub use measure::{label_anchor, MeasurementSession};
pub use render::{
    hazard_color, node_color, wire_color, InteractionOverlay, MapLayer,
};

// =============================================================================
// Plugin
// =============================================================================

pub struct OverviewPlugin;

impl Plugin for OverviewPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportState>()
            .init_resource::<CoordinateSpace>()
            .init_resource::<gesture::GestureClassifier>()
            .init_resource::<MeasurementSession>()
            .init_resource::<MapLayer>()
            .init_resource::<InteractionOverlay>()
            .init_resource::<OverviewLayout>()
            .init_resource::<CameraRig>()
            .init_resource::<JumpAnimation>()
            .add_message::<ViewportCommand>()
            .add_message::<commands::JumpToEntity>()
            .add_message::<OverviewOpened>()
            .add_message::<OverviewClosed>()
            .add_systems(
                Startup,
                (camera::setup_camera, backdrop::spawn_overview_sprites),
            )
            .add_systems(
                Update,
                (
                    layout::update_overview_layout,
                    handle_overview_hotkeys,
                    camera::handle_zoom_wheel,
                    (interaction::route_pointer_input, interaction::update_hover)
                        .chain()
                        .run_if(overview_open),
                    apply_viewport_commands,
                    (jump::start_jumps, jump::animate_jump).chain(),
                    render::sync_coordinate_space,
                    render::rebuild_map_layer,
                    render::sync_map_labels,
                    backdrop::sync_overview_sprites,
                )
                    .chain()
                    .run_if(in_state(ConsoleState::Ready)),
            )
            .add_systems(
                Update,
                (
                    render::draw_map_layer,
                    minimap::draw_minimap,
                    measure::draw_measurement,
                )
                    .after(render::rebuild_map_layer)
                    .run_if(in_state(ConsoleState::Ready))
                    .run_if(overview_open),
            );
    }
}
