//! Routes window input through the gesture classifier into viewport commands.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::network::NetworkSnapshot;
use crate::plugins::core::{ConsoleConfig, InputBindings, OverviewWindow};
use crate::plugins::ui::SearchField;

use super::camera::ViewportState;
use super::commands::ViewportCommand;
use super::coords::CoordinateSpace;
use super::gesture::{GestureClassifier, PointerTarget, Release};
use super::layout::OverviewLayout;
use super::measure::MeasurementSession;
use super::render::{hit_test, hover_target, HitRadii, InteractionOverlay, MapProjection};

/// Primary-button state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerFrame {
    pub cursor: Option<Vec2>,
    pub just_pressed: bool,
    pub just_released: bool,
    pub now: f64,
}

/// What a click needs to know to decide what it means.
pub struct ClickContext<'a> {
    pub snapshot: &'a NetworkSnapshot,
    pub projection: MapProjection<'a>,
    pub layout: &'a OverviewLayout,
    pub measuring: bool,
    pub radii: HitRadii,
}

/// Entities take priority over measurement placement.
pub fn click_command(
    target: PointerTarget,
    position: Vec2,
    context: &ClickContext,
) -> Option<ViewportCommand> {
    match target {
        PointerTarget::MapCanvas => {
            if let Some(entity) =
                hit_test(context.snapshot, &context.projection, position, context.radii)
            {
                Some(ViewportCommand::Select(entity))
            } else if context.measuring {
                Some(ViewportCommand::MeasureClick {
                    local: context.layout.map.to_local(position),
                })
            } else {
                None
            }
        }
        PointerTarget::Minimap => Some(ViewportCommand::RecenterMinimap {
            map: context.layout.minimap.to_percent(position),
        }),
        PointerTarget::Backdrop => Some(ViewportCommand::Close),
        // Tracked while held; releasing adds nothing.
        PointerTarget::Slider => None,
    }
}

/// Zoom command for the slider under `cursor`, if it moves the handle.
pub fn slider_command(cursor: Vec2, context: &ClickContext) -> Option<ViewportCommand> {
    let fraction = context.layout.slider_fraction_at(cursor)?;
    if (fraction - context.projection.view.slider_fraction()).abs() > 1e-3 {
        Some(ViewportCommand::ZoomToSlider { fraction })
    } else {
        None
    }
}

/// Advances the classifier by one frame and returns the resulting commands.
pub fn route_pointer(
    frame: PointerFrame,
    gesture: &mut GestureClassifier,
    context: &ClickContext,
) -> Vec<ViewportCommand> {
    let mut out = Vec::new();

    let Some(cursor) = frame.cursor else {
        if gesture.is_active() {
            gesture.pointer_leave();
        }
        return out;
    };

    if frame.just_pressed {
        if let Some(target) = context.layout.pointer_target(cursor) {
            gesture.pointer_down(cursor, frame.now, target);
        }
    } else if let Some(target) = gesture.target() {
        if context.layout.has_left(target, cursor) {
            gesture.pointer_leave();
            return out;
        }
        if let Some(delta) = gesture.pointer_move(cursor) {
            if delta != Vec2::ZERO && gesture.target() == Some(PointerTarget::MapCanvas) {
                out.push(ViewportCommand::PanBy(
                    context.layout.map.delta_to_percent(delta),
                ));
            }
        }
    }

    if gesture.target() == Some(PointerTarget::Slider) {
        out.extend(slider_command(cursor, context));
    }

    if frame.just_released {
        if let Release::Click { position, target } = gesture.pointer_up(cursor, frame.now) {
            if let Some(command) = click_command(target, position, context) {
                out.push(command);
            }
        }
    }

    out
}

// =============================================================================
// Systems
// =============================================================================

#[allow(clippy::too_many_arguments)]
pub fn route_pointer_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    layout: Res<OverviewLayout>,
    snapshot: Res<NetworkSnapshot>,
    space: Res<CoordinateSpace>,
    view: Res<ViewportState>,
    session: Res<MeasurementSession>,
    config: Res<ConsoleConfig>,
    mut gesture: ResMut<GestureClassifier>,
    mut commands: MessageWriter<ViewportCommand>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let frame = PointerFrame {
        cursor: window.cursor_position(),
        just_pressed: mouse_button.just_pressed(MouseButton::Left),
        just_released: mouse_button.just_released(MouseButton::Left),
        now: time.elapsed_secs_f64(),
    };

    if !frame.just_pressed && !frame.just_released && !gesture.is_active() {
        return;
    }

    let context = ClickContext {
        snapshot: &snapshot,
        projection: MapProjection {
            space: &space,
            view: &view,
            panel: layout.map,
        },
        layout: &layout,
        measuring: session.is_active(),
        radii: HitRadii::from_config(&config),
    };

    for command in route_pointer(frame, &mut gesture, &context) {
        commands.write(command);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn update_hover(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<OverviewLayout>,
    snapshot: Res<NetworkSnapshot>,
    space: Res<CoordinateSpace>,
    view: Res<ViewportState>,
    config: Res<ConsoleConfig>,
    gesture: Res<GestureClassifier>,
    mut overlay: ResMut<InteractionOverlay>,
) {
    let cursor = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .filter(|cursor| layout.map.contains(*cursor));

    let hovered = match cursor {
        Some(cursor) if !gesture.is_dragging() => {
            let projection = MapProjection {
                space: &space,
                view: &view,
                panel: layout.map,
            };
            hover_target(
                &snapshot,
                &projection,
                cursor,
                HitRadii::from_config(&config),
                overlay.hovered,
            )
        }
        _ => None,
    };

    overlay.set_if_neq(InteractionOverlay { hovered });
}

pub fn handle_overview_hotkeys(
    input: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    overview: Res<OverviewWindow>,
    search: Res<SearchField>,
    mut commands: MessageWriter<ViewportCommand>,
) {
    if search.focused {
        return;
    }

    if input.just_pressed(bindings.toggle_overview) {
        commands.write(if overview.open {
            ViewportCommand::Close
        } else {
            ViewportCommand::Open
        });
        return;
    }

    if !overview.open {
        return;
    }

    if input.just_pressed(bindings.close) {
        commands.write(ViewportCommand::Close);
    }
    if input.just_pressed(bindings.reset_view) {
        commands.write(ViewportCommand::Reset);
    }
    if input.just_pressed(bindings.toggle_measure) {
        commands.write(ViewportCommand::ToggleMeasure);
    }
    if input.just_pressed(bindings.zoom_in) {
        commands.write(ViewportCommand::ZoomStep { direction: 1.0 });
    }
    if input.just_pressed(bindings.zoom_out) {
        commands.write(ViewportCommand::ZoomStep { direction: -1.0 });
    }
}
