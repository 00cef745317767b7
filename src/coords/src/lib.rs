//! Coordinate systems for the two-phase solver: the Kociemba orientation
//! triple with its 16-way symmetry reduction (phase 1) and the layered
//! permutation coordinate (phase 2).

#![warn(clippy::pedantic)]
#![allow(clippy::similar_names, clippy::too_many_lines)]

mod orient;
mod perm;

pub use orient::{
    class_representative, corner_sym_info, in_kociemba_group, slice_compress, slice_expand,
    CornerSymInfo, OrientCoord, CORNER_CLASSES, CORNER_ORIENT, EDGE_ORIENT, SLICE_COORD,
    UD_SYMMETRIES,
};
pub use perm::{
    c12_8, c8_12, c8_4_parity, eperm_move, s4mul, PermCoord, C8_4, FACT4, FACT8,
};
