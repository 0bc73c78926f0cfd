//! Floating text: hover tooltip, empty-map notice, measurement label, toast,
//! and the console status line under the overview.

use bevy::prelude::*;
use bevy::ui::Node as UiNode;
use bevy::window::PrimaryWindow;

use crate::network::{
    hazard_kind_label, hazard_level_label, status_label, EntityRef, NetworkSnapshot,
};
use crate::plugins::core::{InputBindings, OverviewWindow, StatusToast};
use crate::plugins::overview::{
    label_anchor, CameraRig, InteractionOverlay, JumpAnimation, MapLayer, MeasurementSession,
    OverviewLayout,
};

use super::components::{ConsoleStatusText, HoverTooltip, MeasureLabelText, NoDataText, ToastText};

const TOOLTIP_OFFSET: Vec2 = Vec2::new(16.0, 16.0);
const NO_DATA_TEXT: &str = "No tower data";

pub fn tooltip_text(snapshot: &NetworkSnapshot, entity: EntityRef) -> Option<String> {
    match entity {
        EntityRef::Node(index) => {
            let node = snapshot.nodes.get(index)?;
            Some(format!(
                "{}\nPosition: ({:.1}, {:.1}, {:.1})\nHeight: {:.1} m\nStatus: {}",
                node.name,
                node.position.x,
                node.position.y,
                node.position.z,
                node.height,
                status_label(node.status)
            ))
        }
        EntityRef::Hazard(index) => {
            let hazard = snapshot.hazards.get(index)?;
            let mut text = format!(
                "{}\nType: {}\nLevel: {}\nPosition: ({:.1}, {:.1}, {:.1})",
                hazard.name,
                hazard_kind_label(hazard.kind),
                hazard_level_label(hazard.level),
                hazard.position.x,
                hazard.position.y,
                hazard.position.z
            );
            if !hazard.description.is_empty() {
                text.push('\n');
                text.push_str(&hazard.description);
            }
            Some(text)
        }
    }
}

pub fn status_line(rig: &CameraRig, jumping: bool, bindings: &InputBindings) -> String {
    let state = if jumping { "Moving" } else { "Camera" };
    format!(
        "{} ({:.0}, {:.0}, {:.0}) -> ({:.0}, {:.0}, {:.0}) | {:?}: line overview | {:?}: refresh",
        state,
        rig.position.x,
        rig.position.y,
        rig.position.z,
        rig.look_at.x,
        rig.look_at.y,
        rig.look_at.z,
        bindings.toggle_overview,
        bindings.refresh
    )
}

// =============================================================================
// Setup Systems
// =============================================================================

pub fn setup_hud(mut commands: Commands) {
    commands.spawn((
        HoverTooltip,
        Text::new(""),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.95, 1.0)),
        UiNode {
            position_type: PositionType::Absolute,
            display: Display::None,
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.05, 0.08, 0.12, 0.92)),
    ));

    commands.spawn((
        NoDataText,
        Text::new(NO_DATA_TEXT),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.6, 0.65, 0.72)),
        UiNode {
            position_type: PositionType::Absolute,
            display: Display::None,
            ..default()
        },
    ));

    commands.spawn((
        MeasureLabelText,
        Text::new(""),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.95, 0.6)),
        UiNode {
            position_type: PositionType::Absolute,
            display: Display::None,
            padding: UiRect::axes(Val::Px(4.0), Val::Px(1.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
    ));

    commands.spawn((
        ToastText,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.95, 0.8)),
        UiNode {
            position_type: PositionType::Absolute,
            display: Display::None,
            left: Val::Px(14.0),
            bottom: Val::Px(36.0),
            padding: UiRect::axes(Val::Px(8.0), Val::Px(4.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.1, 0.12, 0.16, 0.9)),
    ));

    commands.spawn((
        ConsoleStatusText,
        Text::new(""),
        TextFont {
            font_size: 12.0,
            ..default()
        },
        TextColor(Color::srgb(0.7, 0.75, 0.82)),
        UiNode {
            position_type: PositionType::Absolute,
            left: Val::Px(14.0),
            bottom: Val::Px(10.0),
            ..default()
        },
    ));
}

// =============================================================================
// Update Systems
// =============================================================================

pub fn update_hover_tooltip(
    windows: Query<&Window, With<PrimaryWindow>>,
    overview: Res<OverviewWindow>,
    overlay: Res<InteractionOverlay>,
    snapshot: Res<NetworkSnapshot>,
    mut panel: Query<(&mut Text, &mut UiNode), With<HoverTooltip>>,
) {
    let Ok((mut text, mut node)) = panel.single_mut() else {
        return;
    };

    let cursor = windows.single().ok().and_then(|window| window.cursor_position());
    let content = overlay
        .hovered
        .filter(|_| overview.open)
        .and_then(|entity| tooltip_text(&snapshot, entity));

    match (content, cursor) {
        (Some(content), Some(cursor)) => {
            if text.0 != content {
                text.0 = content;
            }
            node.display = Display::Flex;
            node.left = Val::Px(cursor.x + TOOLTIP_OFFSET.x);
            node.top = Val::Px(cursor.y + TOOLTIP_OFFSET.y);
        }
        _ => {
            if node.display != Display::None {
                node.display = Display::None;
                text.0.clear();
            }
        }
    }
}

pub fn update_no_data_label(
    overview: Res<OverviewWindow>,
    layer: Res<MapLayer>,
    layout: Res<OverviewLayout>,
    mut panel: Query<&mut UiNode, With<NoDataText>>,
) {
    if !overview.is_changed() && !layer.is_changed() && !layout.is_changed() {
        return;
    }
    let Ok(mut node) = panel.single_mut() else {
        return;
    };

    if overview.open && layer.no_data {
        let center = layout.map.center();
        node.display = Display::Flex;
        node.left = Val::Px(center.x - 56.0);
        node.top = Val::Px(center.y - 10.0);
    } else {
        node.display = Display::None;
    }
}

pub fn update_measure_label(
    overview: Res<OverviewWindow>,
    session: Res<MeasurementSession>,
    layout: Res<OverviewLayout>,
    mut panel: Query<(&mut Text, &mut UiNode), With<MeasureLabelText>>,
) {
    if !overview.is_changed() && !session.is_changed() && !layout.is_changed() {
        return;
    }
    let Ok((mut text, mut node)) = panel.single_mut() else {
        return;
    };

    match (session.label(), label_anchor(&session, &layout.map)) {
        (Some(label), Some(anchor)) if overview.open => {
            text.0 = label;
            node.display = Display::Flex;
            node.left = Val::Px(anchor.x + 6.0);
            node.top = Val::Px(anchor.y - 18.0);
        }
        _ => {
            node.display = Display::None;
        }
    }
}

pub fn update_toast(toast: Res<StatusToast>, mut panel: Query<(&mut Text, &mut UiNode), With<ToastText>>) {
    if !toast.is_changed() {
        return;
    }
    let Ok((mut text, mut node)) = panel.single_mut() else {
        return;
    };

    match toast.message() {
        Some(message) => {
            text.0 = message.to_string();
            node.display = Display::Flex;
        }
        None => node.display = Display::None,
    }
}

pub fn update_console_status(
    rig: Res<CameraRig>,
    animation: Res<JumpAnimation>,
    bindings: Res<InputBindings>,
    mut panel: Query<&mut Text, With<ConsoleStatusText>>,
) {
    if !rig.is_changed() && !animation.is_changed() && !bindings.is_changed() {
        return;
    }
    if let Ok(mut text) = panel.single_mut() {
        text.0 = status_line(&rig, animation.is_running(), &bindings);
    }
}
