use std::fmt;

/// Interaction states of the visualizer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiState {
    Uninitialized,
    Ready,
    Starting,
    Searching,
    Paused,
    Finished,
    Modified,
    DraggingStart,
    DraggingEnd,
    DrawingWall,
    ErasingWall,
}

/// Events the controller accepts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    Init,
    Start,
    Restart,
    Search,
    Pause,
    Resume,
    Cancel,
    Finish,
    Modify,
    Clear,
    DragStart,
    DragEnd,
    DrawWall,
    EraseWall,
    Rest,
    Reset,
}

impl UiState {
    pub const ALL: [UiState; 11] = [
        UiState::Uninitialized,
        UiState::Ready,
        UiState::Starting,
        UiState::Searching,
        UiState::Paused,
        UiState::Finished,
        UiState::Modified,
        UiState::DraggingStart,
        UiState::DraggingEnd,
        UiState::DrawingWall,
        UiState::ErasingWall,
    ];

    /// The transition table: the state `event` leads to from `self`, or
    /// `None` when the event is not allowed here.
    pub fn next(self, event: Event) -> Option<UiState> {
        use Event as E;
        use UiState as S;

        let to = match (self, event) {
            (_, E::Reset) => S::Ready,
            (S::Uninitialized, E::Init) => S::Ready,
            (S::Ready | S::Modified, E::Start) => S::Starting,
            (S::Searching | S::Finished, E::Restart) => S::Starting,
            (S::Starting, E::Search) => S::Searching,
            (S::Searching, E::Pause) => S::Paused,
            (S::Paused, E::Resume) => S::Searching,
            (S::Paused, E::Cancel) => S::Ready,
            (S::Searching, E::Finish) => S::Finished,
            (S::Finished, E::Modify) => S::Modified,
            (S::Finished | S::Modified, E::Clear) => S::Ready,
            (S::Ready | S::Finished, E::DragStart) => S::DraggingStart,
            (S::Ready | S::Finished, E::DragEnd) => S::DraggingEnd,
            (S::Ready | S::Finished, E::DrawWall) => S::DrawingWall,
            (S::Ready | S::Finished, E::EraseWall) => S::ErasingWall,
            (S::DraggingStart | S::DraggingEnd | S::DrawingWall | S::ErasingWall, E::Rest) => {
                S::Ready
            }
            _ => return None,
        };
        Some(to)
    }

    pub fn can(self, event: Event) -> bool {
        self.next(event).is_some()
    }

    /// States in which the user is dragging a marker or painting walls
    pub fn is_editing(self) -> bool {
        matches!(
            self,
            UiState::DraggingStart | UiState::DraggingEnd | UiState::DrawingWall | UiState::ErasingWall
        )
    }
}

impl Event {
    pub const ALL: [Event; 16] = [
        Event::Init,
        Event::Start,
        Event::Restart,
        Event::Search,
        Event::Pause,
        Event::Resume,
        Event::Cancel,
        Event::Finish,
        Event::Modify,
        Event::Clear,
        Event::DragStart,
        Event::DragEnd,
        Event::DrawWall,
        Event::EraseWall,
        Event::Rest,
        Event::Reset,
    ];
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UiState::Uninitialized => "uninitialized",
            UiState::Ready => "ready",
            UiState::Starting => "starting",
            UiState::Searching => "searching",
            UiState::Paused => "paused",
            UiState::Finished => "finished",
            UiState::Modified => "modified",
            UiState::DraggingStart => "draggingStart",
            UiState::DraggingEnd => "draggingEnd",
            UiState::DrawingWall => "drawingWall",
            UiState::ErasingWall => "erasingWall",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_accepts_only_editing_start_and_reset() {
        let allowed: Vec<Event> = Event::ALL
            .into_iter()
            .filter(|&e| UiState::Ready.can(e))
            .collect();
        assert_eq!(
            allowed,
            vec![
                Event::Start,
                Event::DragStart,
                Event::DragEnd,
                Event::DrawWall,
                Event::EraseWall,
                Event::Reset
            ]
        );
    }

    #[test]
    fn reset_is_allowed_everywhere() {
        for state in UiState::ALL {
            assert_eq!(state.next(Event::Reset), Some(UiState::Ready), "{}", state);
        }
    }

    #[test]
    fn search_cycle() {
        let mut state = UiState::Ready;
        for (event, expected) in [
            (Event::Start, UiState::Starting),
            (Event::Search, UiState::Searching),
            (Event::Pause, UiState::Paused),
            (Event::Resume, UiState::Searching),
            (Event::Finish, UiState::Finished),
            (Event::Modify, UiState::Modified),
            (Event::Clear, UiState::Ready),
        ] {
            state = state.next(event).unwrap();
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn only_init_leaves_uninitialized_besides_reset() {
        for event in Event::ALL {
            let next = UiState::Uninitialized.next(event);
            match event {
                Event::Init | Event::Reset => assert_eq!(next, Some(UiState::Ready)),
                _ => assert_eq!(next, None, "{:?}", event),
            }
        }
    }

    #[test]
    fn rest_returns_editing_states_to_ready() {
        for state in UiState::ALL {
            assert_eq!(state.can(Event::Rest), state.is_editing(), "{}", state);
        }
    }
}
