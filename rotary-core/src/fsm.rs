//! Quadrature Gray-code state machine
//!
//! Two fixed 8×4 tables map `(state, CLK/DT)` to the next state. A direction
//! is only produced on the edge that completes a legal sequence, so contact
//! bounce inside a detent walks back and forth between states without ever
//! reporting a turn.

use crate::types::{Direction, QuadState};

/// One table cell: next state plus the direction emitted on this edge
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Transition {
    pub next: QuadState,
    pub direction: Option<Direction>,
}

const fn go(next: QuadState) -> Transition {
    Transition { next, direction: None }
}

const fn cw(next: QuadState) -> Transition {
    Transition { next, direction: Some(Direction::Clockwise) }
}

const fn ccw(next: QuadState) -> Transition {
    Transition { next, direction: Some(Direction::CounterClockwise) }
}

use QuadState::{Ccw1, Ccw2, Ccw3, Cw1, Cw2, Cw3, Start};

/// Full-step table, one turn per four edges.
///
/// Columns are the CLK/DT sample `00`, `01`, `10`, `11`.
pub const FULL_STEP_TABLE: [[Transition; 4]; 8] = [
    [go(Start), go(Ccw1), go(Cw1), go(Start)],   // Start
    [go(Cw2), go(Start), go(Cw1), go(Start)],    // Cw1
    [go(Cw2), go(Cw3), go(Cw1), go(Start)],      // Cw2
    [go(Cw2), go(Cw3), go(Start), cw(Start)],    // Cw3
    [go(Ccw2), go(Ccw1), go(Start), go(Start)],  // Ccw1
    [go(Ccw2), go(Ccw1), go(Ccw3), go(Start)],   // Ccw2
    [go(Ccw2), go(Start), go(Ccw3), ccw(Start)], // Ccw3
    [go(Start), go(Start), go(Start), go(Start)], // Illegal
];

/// Half-step table, one turn per two edges
pub const HALF_STEP_TABLE: [[Transition; 4]; 8] = [
    [go(Cw3), go(Cw2), go(Cw1), go(Start)],
    [ccw(Cw3), go(Start), go(Cw1), go(Start)],
    [cw(Cw3), go(Cw2), go(Start), go(Start)],
    [go(Cw3), go(Ccw2), go(Ccw1), go(Start)],
    [go(Cw3), go(Cw2), go(Ccw1), cw(Start)],
    [go(Cw3), go(Ccw2), go(Cw3), ccw(Start)],
    [go(Start), go(Start), go(Start), go(Start)],
    [go(Start), go(Start), go(Start), go(Start)],
];

/// Pack a CLK/DT sample into a table column, optionally complemented
#[inline]
pub const fn pin_index(clk: bool, dt: bool, invert: bool) -> usize {
    let pins = ((clk as u8) << 1) | dt as u8;
    if invert {
        (!pins & 0b11) as usize
    } else {
        pins as usize
    }
}

/// Table-driven quadrature decoder
pub struct QuadratureDecoder;

impl QuadratureDecoder {
    /// Look up the transition for `state` and a packed pin sample (`0..=3`)
    #[inline]
    pub fn transition(state: QuadState, pins: usize, half_step: bool) -> Transition {
        let table = if half_step { &HALF_STEP_TABLE } else { &FULL_STEP_TABLE };
        table[state.index()][pins & 0b11]
    }

    /// Advance the machine by one CLK/DT sample
    #[inline]
    pub fn decode(
        state: QuadState,
        clk: bool,
        dt: bool,
        half_step: bool,
    ) -> (QuadState, Option<Direction>) {
        let t = Self::transition(state, pin_index(clk, dt, false), half_step);
        (t.next, t.direction)
    }
}
