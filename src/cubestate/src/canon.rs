//! Canonical-sequence finite state machine: forbids a move on the face
//! just turned, and a move on the opposite face when the axis was entered
//! from its far side. Seven states, one per "last face" plus the start.

use crate::tables::TABLES;

/// Number of FSM states.
pub const CANON_STATES: usize = crate::FACES + 1;
/// The state before any move has been made.
pub const CANON_START: usize = 0;

/// The FSM state after playing `mv` from state `cs`. Only meaningful for
/// moves enabled by [`allowed_mask`].
#[must_use]
pub fn next_state(cs: usize, mv: usize) -> usize {
    TABLES.canon_next[cs][mv] as usize
}

/// Bitmask over the 18 moves that keep the sequence canonical from `cs`.
#[must_use]
pub fn allowed_mask(cs: usize) -> u32 {
    TABLES.canon_mask[cs]
}
