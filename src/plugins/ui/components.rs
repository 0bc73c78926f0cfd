//! Shared UI components, markers, and utility functions.

use bevy::prelude::*;

use crate::plugins::overview::ViewportCommand;

// =============================================================================
// Toolbar Components
// =============================================================================

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToolbarAction {
    ZoomIn,
    ZoomOut,
    ToggleMeasure,
    Reset,
    Close,
}

/// Component marking a clickable toolbar item
#[derive(Component, Clone, Copy, Debug)]
pub struct ToolbarButton {
    pub action: ToolbarAction,
}

#[derive(Component)]
pub struct ZoomLabelText;

#[derive(Component)]
pub struct SliderHandle;

// =============================================================================
// Sidebar Components
// =============================================================================

#[derive(Component)]
pub struct StatsText;

#[derive(Component)]
pub struct EventLogText;

#[derive(Component)]
pub struct SearchBoxText;

#[derive(Component)]
pub struct SearchButton;

// =============================================================================
// Floating Components
// =============================================================================

#[derive(Component)]
pub struct HoverTooltip;

#[derive(Component)]
pub struct NoDataText;

#[derive(Component)]
pub struct MeasureLabelText;

#[derive(Component)]
pub struct ToastText;

#[derive(Component)]
pub struct ConsoleStatusText;

// =============================================================================
// Resources
// =============================================================================

/// Text entry state of the sidebar search box.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct SearchField {
    pub text: String,
    pub focused: bool,
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn toolbar_command(action: ToolbarAction) -> ViewportCommand {
    match action {
        ToolbarAction::ZoomIn => ViewportCommand::ZoomStep { direction: 1.0 },
        ToolbarAction::ZoomOut => ViewportCommand::ZoomStep { direction: -1.0 },
        ToolbarAction::ToggleMeasure => ViewportCommand::ToggleMeasure,
        ToolbarAction::Reset => ViewportCommand::Reset,
        ToolbarAction::Close => ViewportCommand::Close,
    }
}

/// Returns the color for a toolbar item based on toggle and hover state
pub fn button_color(is_active: bool, is_hovered: bool) -> Color {
    match (is_active, is_hovered) {
        (true, _) => Color::srgb(1.0, 0.85, 0.2),
        (false, true) => Color::srgb(0.6, 0.85, 1.0),
        (false, false) => Color::srgb(0.82, 0.88, 0.95),
    }
}
