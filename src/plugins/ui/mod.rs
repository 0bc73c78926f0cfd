//! UI plugin for the overview overlay and console status line.
//!
//! This module provides all UI panels and systems:
//! - Toolbar (zoom buttons, slider, measure toggle, reset, close)
//! - Sidebar (search box, statistics, legend, event log)
//! - HUD (hover tooltip, empty-map notice, measurement label, toast, status line)
//!
//! The map canvas and minimap stay free of UI nodes apart from text, since
//! UI renders above gizmos.

mod components;
mod hud;
pub mod panel;
mod search;
mod sidebar;
mod toolbar;

use bevy::ecs::schedule::IntoScheduleConfigs;
use bevy::prelude::*;

use crate::plugins::core::{overview_open, ConsoleState};
use crate::plugins::overview::{apply_viewport_commands, handle_overview_hotkeys};

// Re-export public types
pub use components::SearchField;

// =============================================================================
// Plugin
// =============================================================================

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SearchField>()
            .add_systems(
                Startup,
                (toolbar::setup_toolbar, sidebar::setup_sidebar, hud::setup_hud),
            )
            .add_systems(
                Update,
                (
                    (search::handle_search_input, search::focus_search_field).chain(),
                    toolbar::handle_toolbar_clicks.run_if(overview_open),
                )
                    .after(handle_overview_hotkeys)
                    .before(apply_viewport_commands)
                    .run_if(in_state(ConsoleState::Ready)),
            )
            .add_systems(
                Update,
                (
                    panel::sync_anchored_panels,
                    toolbar::update_toolbar,
                    sidebar::update_stats_panel,
                    sidebar::update_event_log_panel,
                    sidebar::update_search_box,
                    hud::update_hover_tooltip,
                    hud::update_no_data_label,
                    hud::update_measure_label,
                    hud::update_toast,
                    hud::update_console_status,
                )
                    .after(apply_viewport_commands),
            );
    }
}
