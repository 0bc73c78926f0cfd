//! Search box text entry and lookup.

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use crate::network::{search, EntityRef, NetworkSnapshot};
use crate::plugins::core::{InputBindings, OverviewWindow, StatusToast};
use crate::plugins::overview::{CoordinateSpace, OverviewClosed, ViewportCommand};

use super::components::{SearchBoxText, SearchButton, SearchField};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyOutcome {
    Edited,
    Submit,
    Unfocus,
    Ignored,
}

/// Applies one pressed key to a focused search field.
pub fn apply_key(field: &mut SearchField, key: &Key) -> KeyOutcome {
    match key {
        Key::Enter => KeyOutcome::Submit,
        Key::Escape => {
            field.focused = false;
            KeyOutcome::Unfocus
        }
        Key::Backspace => {
            field.text.pop();
            KeyOutcome::Edited
        }
        Key::Space => {
            field.text.push(' ');
            KeyOutcome::Edited
        }
        Key::Character(input) if !input.chars().any(char::is_control) => {
            field.text.push_str(input);
            KeyOutcome::Edited
        }
        _ => KeyOutcome::Ignored,
    }
}

/// Resolves a query into a focus command and the toast to show.
pub fn search_command(
    snapshot: &NetworkSnapshot,
    space: &CoordinateSpace,
    query: &str,
) -> (Option<ViewportCommand>, String) {
    let Some(entity) = search(snapshot, query) else {
        return (None, "No match".to_string());
    };
    let (Some(position), Some(name)) = (snapshot.position_of(entity), snapshot.name_of(entity))
    else {
        return (None, "No match".to_string());
    };

    let kind = match entity {
        EntityRef::Node(_) => "tower",
        EntityRef::Hazard(_) => "hazard",
    };
    (
        Some(ViewportCommand::FocusMap {
            map: space.world_to_map(position),
        }),
        format!("Found {}: {}", kind, name),
    )
}

// =============================================================================
// Systems
// =============================================================================

#[allow(clippy::too_many_arguments)]
pub fn handle_search_input(
    mut keys: MessageReader<KeyboardInput>,
    button: Query<&Interaction, (With<SearchButton>, Changed<Interaction>)>,
    mut field: ResMut<SearchField>,
    snapshot: Res<NetworkSnapshot>,
    space: Res<CoordinateSpace>,
    mut toast: ResMut<StatusToast>,
    mut commands: MessageWriter<ViewportCommand>,
) {
    let mut submit = button
        .iter()
        .any(|interaction| matches!(interaction, Interaction::Pressed));

    if field.focused {
        for event in keys.read() {
            if event.state != ButtonState::Pressed {
                continue;
            }
            if apply_key(&mut field, &event.logical_key) == KeyOutcome::Submit {
                submit = true;
            }
            if !field.focused {
                break;
            }
        }
    } else {
        keys.clear();
    }

    if !submit {
        return;
    }

    let (command, message) = search_command(&snapshot, &space, &field.text);
    info!("Search '{}': {}", field.text.trim(), message);
    if let Some(command) = command {
        commands.write(command);
    }
    toast.show(message);
}

/// Focus follows clicks on the box or the focus key; closing the overview releases it.
pub fn focus_search_field(
    input: Res<ButtonInput<KeyCode>>,
    bindings: Res<InputBindings>,
    overview: Res<OverviewWindow>,
    search_box: Query<&Interaction, (With<SearchBoxText>, Changed<Interaction>)>,
    mut closed: MessageReader<OverviewClosed>,
    mut field: ResMut<SearchField>,
) {
    if closed.read().count() > 0 || !overview.open {
        if field.focused {
            field.focused = false;
        }
        return;
    }

    let clicked = search_box
        .iter()
        .any(|interaction| matches!(interaction, Interaction::Pressed));
    if (clicked || input.just_pressed(bindings.focus_search)) && !field.focused {
        field.focused = true;
    }
}
