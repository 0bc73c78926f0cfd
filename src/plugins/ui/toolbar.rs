//! Header and toolbar: zoom buttons, zoom slider, measure toggle, reset, close.

use bevy::prelude::*;
use bevy::ui::Node as UiNode;

use crate::plugins::overview::{
    MeasurementSession, OverlayRegion, OverviewLayout, ViewportCommand, ViewportState,
    SLIDER_LEFT, SLIDER_SIZE,
};

use super::components::{
    button_color, toolbar_command, SliderHandle, ToolbarAction, ToolbarButton, ZoomLabelText,
};
use super::panel::{PanelConfig, PanelPosition};

pub const SLIDER_HANDLE_WIDTH: f32 = 10.0;
const TOOL_GROUP_LEFT: f32 = SLIDER_LEFT + SLIDER_SIZE.x + 20.0;

/// Handle left edge for a slider fraction, keeping the handle on the track.
pub fn handle_left(fraction: f32, track_width: f32) -> f32 {
    fraction.clamp(0.0, 1.0) * (track_width - SLIDER_HANDLE_WIDTH).max(0.0)
}

// =============================================================================
// Setup Systems
// =============================================================================

pub fn setup_toolbar(mut commands: Commands, layout: Res<OverviewLayout>) {
    let initial = ViewportState::default();

    let title = PanelConfig::at(OverlayRegion::Header, PanelPosition::TopLeft)
        .with_offset(Vec2::new(14.0, 12.0));
    commands.spawn((
        title.node(&layout),
        title,
        Text::new("Line Overview"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.93, 0.97)),
    ));

    let close = PanelConfig::at(OverlayRegion::Header, PanelPosition::TopRight)
        .with_offset(Vec2::new(12.0, 8.0))
        .with_padding(4.0);
    commands.spawn((
        close.node(&layout),
        close,
        toolbar_button(ToolbarAction::Close, "×", 20.0),
    ));

    let zoom_group = PanelConfig::at(OverlayRegion::Toolbar, PanelPosition::TopLeft)
        .with_offset(Vec2::new(10.0, 8.0));
    commands
        .spawn((zoom_group.node(&layout), zoom_group))
        .with_children(|group| {
            group.spawn(toolbar_button(ToolbarAction::ZoomOut, "−", 16.0));
            group.spawn((
                ZoomLabelText,
                Text::new(initial.label()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.93, 0.97)),
                UiNode {
                    width: Val::Px(48.0),
                    margin: UiRect::horizontal(Val::Px(8.0)),
                    ..default()
                },
            ));
            group.spawn(toolbar_button(ToolbarAction::ZoomIn, "+", 16.0));
        });

    let slider = PanelConfig::at(OverlayRegion::Slider, PanelPosition::TopLeft)
        .with_size(SLIDER_SIZE.x, SLIDER_SIZE.y)
        .with_background(Color::srgb(0.16, 0.2, 0.26));
    commands
        .spawn((slider.node(&layout), slider.background(), slider))
        .with_children(|track| {
            track.spawn((
                SliderHandle,
                UiNode {
                    position_type: PositionType::Absolute,
                    left: Val::Px(handle_left(initial.slider_fraction(), SLIDER_SIZE.x)),
                    top: Val::Px(0.0),
                    width: Val::Px(SLIDER_HANDLE_WIDTH),
                    height: Val::Px(SLIDER_SIZE.y),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.6, 0.75, 0.95)),
            ));
        });

    let tools = PanelConfig::at(OverlayRegion::Toolbar, PanelPosition::TopLeft)
        .with_offset(Vec2::new(TOOL_GROUP_LEFT, 8.0));
    commands
        .spawn((tools.node(&layout), tools))
        .with_children(|group| {
            group.spawn(toolbar_button(ToolbarAction::ToggleMeasure, "Measure", 14.0));
            group.spawn(toolbar_button(ToolbarAction::Reset, "Reset", 14.0));
        });
}

fn toolbar_button(action: ToolbarAction, label: &str, font_size: f32) -> impl Bundle {
    (
        ToolbarButton { action },
        Interaction::None,
        Text::new(label),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(button_color(false, false)),
        UiNode {
            margin: UiRect::horizontal(Val::Px(6.0)),
            padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
            ..default()
        },
        BackgroundColor(Color::srgb(0.12, 0.15, 0.2)),
    )
}

// =============================================================================
// Update Systems
// =============================================================================

pub fn handle_toolbar_clicks(
    buttons: Query<(&Interaction, &ToolbarButton), Changed<Interaction>>,
    mut commands: MessageWriter<ViewportCommand>,
) {
    for (interaction, button) in buttons.iter() {
        if matches!(interaction, Interaction::Pressed) {
            commands.write(toolbar_command(button.action));
        }
    }
}

pub fn update_toolbar(
    view: Res<ViewportState>,
    session: Res<MeasurementSession>,
    mut label: Query<&mut Text, With<ZoomLabelText>>,
    mut handle: Query<&mut UiNode, With<SliderHandle>>,
    mut buttons: Query<(&Interaction, &ToolbarButton, &mut TextColor)>,
) {
    if view.is_changed() {
        if let Ok(mut text) = label.single_mut() {
            text.0 = view.label();
        }
        if let Ok(mut node) = handle.single_mut() {
            node.left = Val::Px(handle_left(view.slider_fraction(), SLIDER_SIZE.x));
        }
    }

    for (interaction, button, mut color) in buttons.iter_mut() {
        let is_active = button.action == ToolbarAction::ToggleMeasure && session.is_active();
        let is_hovered = matches!(interaction, Interaction::Hovered);
        color.0 = button_color(is_active, is_hovered);
    }
}
