//! Sidebar panels: search box, network statistics, legend, event log.

use bevy::prelude::*;
use bevy::ui::Node as UiNode;

use crate::network::{network_stats, HazardLevel, NetworkSnapshot, NetworkStats, NodeStatus, WireKind};
use crate::plugins::core::EventLog;
use crate::plugins::overview::{
    hazard_color, node_color, wire_color, OverlayRegion, OverviewLayout,
};

use super::components::{EventLogText, SearchBoxText, SearchButton, SearchField, StatsText};
use super::panel::{PanelConfig, PanelPosition};

const HEADING_COLOR: Color = Color::srgb(0.7, 0.75, 0.82);
const BODY_COLOR: Color = Color::srgb(0.85, 0.9, 0.96);
const SEARCH_PLACEHOLDER: &str = "Search towers / hazards";

pub fn format_stats(stats: &NetworkStats) -> String {
    format!(
        "Towers: {}\nLines: {}\nHazards: {} (high {} / med {} / low {})\nLine length: {:.0} m\nAvg tower height: {:.1} m",
        stats.node_count,
        stats.edge_count,
        stats.hazard_count,
        stats.high_hazards,
        stats.medium_hazards,
        stats.low_hazards,
        stats.total_length,
        stats.average_height
    )
}

pub fn format_event_log(entries: &[String]) -> String {
    if entries.is_empty() {
        return "Log: --".to_string();
    }
    let mut body = String::from("Log:\n");
    for entry in entries.iter().rev() {
        body.push_str("- ");
        body.push_str(entry);
        body.push('\n');
    }
    body.trim_end().to_string()
}

/// Search box contents: placeholder when empty, caret while focused.
pub fn search_box_text(field: &SearchField) -> String {
    match (field.text.is_empty(), field.focused) {
        (true, false) => SEARCH_PLACEHOLDER.to_string(),
        (_, true) => format!("{}|", field.text),
        (false, false) => field.text.clone(),
    }
}

pub fn legend_entries() -> [(&'static str, Color); 4] {
    [
        ("Tower", node_color(NodeStatus::Normal)),
        ("Conductor", wire_color(WireKind::Conductor)),
        ("Ground wire", wire_color(WireKind::GroundWire)),
        ("Hazard", hazard_color(HazardLevel::Medium)),
    ]
}

// =============================================================================
// Setup Systems
// =============================================================================

pub fn setup_sidebar(mut commands: Commands, layout: Res<OverviewLayout>) {
    let panel = PanelConfig::at(OverlayRegion::Sidebar, PanelPosition::TopLeft)
        .with_offset(Vec2::new(10.0, 0.0))
        .filling_width()
        .with_clip();

    let mut root = panel.node(&layout);
    root.flex_direction = FlexDirection::Column;

    commands.spawn((root, panel)).with_children(|parent| {
        parent
            .spawn(UiNode {
                flex_direction: FlexDirection::Row,
                margin: UiRect::bottom(Val::Px(8.0)),
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    SearchBoxText,
                    Interaction::None,
                    Text::new(SEARCH_PLACEHOLDER),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(HEADING_COLOR),
                    UiNode {
                        flex_grow: 1.0,
                        padding: UiRect::axes(Val::Px(6.0), Val::Px(3.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.12, 0.15, 0.2)),
                ));
                row.spawn((
                    SearchButton,
                    Interaction::None,
                    Text::new("Go"),
                    TextFont {
                        font_size: 12.0,
                        ..default()
                    },
                    TextColor(BODY_COLOR),
                    UiNode {
                        margin: UiRect::left(Val::Px(6.0)),
                        padding: UiRect::axes(Val::Px(8.0), Val::Px(3.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.18, 0.24, 0.32)),
                ));
            });

        parent.spawn(heading("Statistics"));
        parent.spawn((
            StatsText,
            Text::new(format_stats(&NetworkStats::default())),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(BODY_COLOR),
            UiNode {
                margin: UiRect::bottom(Val::Px(8.0)),
                ..default()
            },
        ));

        parent.spawn(heading("Legend"));
        for (label, color) in legend_entries() {
            parent
                .spawn(UiNode {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    margin: UiRect::vertical(Val::Px(1.0)),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        UiNode {
                            width: Val::Px(10.0),
                            height: Val::Px(10.0),
                            margin: UiRect::right(Val::Px(6.0)),
                            ..default()
                        },
                        BackgroundColor(color),
                    ));
                    row.spawn((
                        Text::new(label),
                        TextFont {
                            font_size: 12.0,
                            ..default()
                        },
                        TextColor(BODY_COLOR),
                    ));
                });
        }

        parent.spawn((
            EventLogText,
            Text::new(format_event_log(&[])),
            TextFont {
                font_size: 11.0,
                ..default()
            },
            TextColor(HEADING_COLOR),
            UiNode {
                margin: UiRect::top(Val::Px(8.0)),
                ..default()
            },
        ));
    });
}

fn heading(title: &str) -> impl Bundle {
    (
        Text::new(title),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(HEADING_COLOR),
        UiNode {
            margin: UiRect::bottom(Val::Px(2.0)),
            ..default()
        },
    )
}

// =============================================================================
// Update Systems
// =============================================================================

pub fn update_stats_panel(
    snapshot: Res<NetworkSnapshot>,
    mut panel: Query<&mut Text, With<StatsText>>,
) {
    if !snapshot.is_changed() {
        return;
    }
    if let Ok(mut text) = panel.single_mut() {
        text.0 = format_stats(&network_stats(&snapshot));
    }
}

pub fn update_event_log_panel(log: Res<EventLog>, mut panel: Query<&mut Text, With<EventLogText>>) {
    if !log.is_changed() {
        return;
    }
    if let Ok(mut text) = panel.single_mut() {
        text.0 = format_event_log(log.entries());
    }
}

pub fn update_search_box(
    field: Res<SearchField>,
    mut panel: Query<(&mut Text, &mut TextColor), With<SearchBoxText>>,
) {
    if !field.is_changed() {
        return;
    }
    if let Ok((mut text, mut color)) = panel.single_mut() {
        text.0 = search_box_text(&field);
        color.0 = if field.text.is_empty() && !field.focused {
            HEADING_COLOR
        } else {
            BODY_COLOR
        };
    }
}
