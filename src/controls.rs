use crate::state::{Event, UiState};

/// One of the three contextual command buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandSlot {
    pub label: &'static str,
    /// `None` renders the button disabled
    pub event: Option<Event>,
}

impl CommandSlot {
    const fn enabled(label: &'static str, event: Event) -> Self {
        CommandSlot { label, event: Some(event) }
    }

    const fn disabled(label: &'static str) -> Self {
        CommandSlot { label, event: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.event.is_some()
    }
}

const CLEAR_WALLS: CommandSlot = CommandSlot::enabled("Clear Walls", Event::Reset);

/// Buttons offered in each state
pub fn command_slots(state: UiState) -> [CommandSlot; 3] {
    match state {
        UiState::Ready => [
            CommandSlot::enabled("Start Search", Event::Start),
            CommandSlot::disabled("Pause Search"),
            CLEAR_WALLS,
        ],
        UiState::Searching => [
            CommandSlot::enabled("Restart Search", Event::Restart),
            CommandSlot::enabled("Pause Search", Event::Pause),
            CLEAR_WALLS,
        ],
        UiState::Paused => [
            CommandSlot::enabled("Resume Search", Event::Resume),
            CommandSlot::enabled("Cancel Search", Event::Cancel),
            CLEAR_WALLS,
        ],
        UiState::Finished => [
            CommandSlot::enabled("Restart Search", Event::Restart),
            CommandSlot::enabled("Clear Path", Event::Clear),
            CLEAR_WALLS,
        ],
        UiState::Modified => [
            CommandSlot::enabled("Start Search", Event::Start),
            CommandSlot::enabled("Clear Path", Event::Clear),
            CLEAR_WALLS,
        ],
        UiState::Uninitialized
        | UiState::Starting
        | UiState::DraggingStart
        | UiState::DraggingEnd
        | UiState::DrawingWall
        | UiState::ErasingWall => [
            CommandSlot::disabled("Start Search"),
            CommandSlot::disabled("Pause Search"),
            CommandSlot::disabled("Clear Walls"),
        ],
    }
}
