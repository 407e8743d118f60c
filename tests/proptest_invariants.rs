//! Property-based invariants of the interaction core:
//!
//! 1. Grid/page coordinate round trip.
//! 2. Playback paints the trace filtered to opened/closed, in order.
//! 3. Arbitrary input never breaks the transition table or leaves a
//!    playback timer running outside `Searching`.

mod common;

use std::time::Duration;

use common::{page, play_to_end, ready_controller};
use pathviz::{CellMapper, Event, Grid, Position, UiState};
use proptest::prelude::*;

proptest! {
    #[test]
    fn grid_page_round_trip(size in 1u16..=64, x in -1000i32..1000, y in -1000i32..1000) {
        let mapper = CellMapper::new(size as f32);
        let (px, py) = mapper.to_page_coordinate(x, y);
        prop_assert_eq!(mapper.to_grid_coordinate(px, py), Position::new(x, y));
    }
}

fn walls_strategy() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::vec((0i32..6, 0i32..6), 0..14).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(x, y)| Position::new(x, y))
            .filter(|&p| p != Position::new(0, 0) && p != Position::new(5, 5))
            .collect()
    })
}

proptest! {
    #[test]
    fn playback_preserves_recorded_order(walls in walls_strategy()) {
        let mut c = ready_controller(
            Grid::with_blocked(6, 6, &walls),
            Position::new(0, 0),
            Position::new(5, 5),
        );
        c.fire(Event::Start);
        play_to_end(&mut c);

        let expected: Vec<_> = c
            .last_trace()
            .unwrap()
            .iter()
            .copied()
            .filter(|op| op.kind.is_visualizable())
            .collect();
        prop_assert_eq!(c.state(), UiState::Finished);
        prop_assert_eq!(c.view().played(), expected);
    }
}

#[derive(Clone, Debug)]
enum Input {
    Fire(Event),
    Advance(u64),
    Down(i32, i32),
    Move(i32, i32),
    Up,
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![
        prop::sample::select(Event::ALL.to_vec()).prop_map(Input::Fire),
        (0u64..200).prop_map(Input::Advance),
        (-1i32..7, -1i32..7).prop_map(|(x, y)| Input::Down(x, y)),
        (-1i32..7, -1i32..7).prop_map(|(x, y)| Input::Move(x, y)),
        Just(Input::Up),
    ]
}

proptest! {
    #[test]
    fn random_input_respects_the_transition_table(inputs in prop::collection::vec(input_strategy(), 0..60)) {
        let mut c = ready_controller(Grid::new(6, 6), Position::new(0, 0), Position::new(5, 5));

        for input in inputs {
            match input {
                Input::Fire(event) => {
                    let from = c.state();
                    let fired = c.fire(event);
                    prop_assert_eq!(fired, from.can(event));
                    match (fired, from.next(event)) {
                        (false, _) => prop_assert_eq!(c.state(), from),
                        (true, Some(UiState::Starting)) => prop_assert_eq!(c.state(), UiState::Searching),
                        (true, Some(to)) => prop_assert_eq!(c.state(), to),
                        (true, None) => unreachable!(),
                    }
                }
                Input::Advance(ms) => c.advance(Duration::from_millis(ms)),
                Input::Down(x, y) => {
                    let (px, py) = page(x, y);
                    c.pointer_down(px, py);
                }
                Input::Move(x, y) => {
                    let (px, py) = page(x, y);
                    c.pointer_move(px, py);
                }
                Input::Up => c.pointer_up(),
            }

            let state = c.state();
            prop_assert_eq!(c.playback().is_running(), state == UiState::Searching);
            if !matches!(state, UiState::Searching | UiState::Paused) {
                prop_assert_eq!(c.playback().remaining(), 0);
            }
            prop_assert!(c.grid().is_walkable_at(c.start().x, c.start().y));
            prop_assert!(c.grid().is_walkable_at(c.end().x, c.end().y));
            prop_assert_ne!(c.start(), c.end());
        }
    }
}
