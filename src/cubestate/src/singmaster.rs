//! Singmaster notation: 12 edge tokens and 8 corner tokens describing
//! which cubie occupies each slot, plus move-sequence text.

use crate::cube::{corner_ori, corner_perm, corner_val, edge_ori, edge_perm, edge_val, CubeState};
use crate::tables::{cubie_value, TABLES, INVALID, SMCORNERS, SMEDGES};
use crate::{CUBIES, FACE_NAMES, MoveSeq, NMOVES, TWISTS};
use thiserror::Error;

/// Diagnostics for malformed Singmaster or move text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No such edge")]
    NoSuchEdge,
    #[error("No such corner")]
    NoSuchCorner,
    #[error("Extra stuff after Singmaster representation")]
    TrailingInput,
    #[error("Bad move at position {0}")]
    BadMove(usize),
}

fn parse_edge_token(token: &str) -> Option<u8> {
    let v = cubie_value(token)?;
    if !(36..72).contains(&v) {
        return None;
    }
    let c = TABLES.edge_cubie_lookup[v - 36];
    (c != INVALID).then_some(c)
}

fn parse_corner_token(token: &str) -> Option<u8> {
    let v = cubie_value(token)?;
    if !(216..432).contains(&v) {
        return None;
    }
    let c = TABLES.corner_cubie_lookup[v - 216];
    (c != INVALID && (c as usize) < CUBIES).then_some(c)
}

impl CubeState {
    /// Parse one line of Singmaster notation into a position.
    ///
    /// # Errors
    ///
    /// Returns a diagnostic when a token names no real cubie or when
    /// anything trails the twentieth token.
    pub fn parse_singmaster(text: &str) -> Result<CubeState, ParseError> {
        let mut tokens = text.split_whitespace();
        let mut cp = CubeState::IDENTITY;
        let t = &*TABLES;
        for i in 0..12 {
            let cv = tokens
                .next()
                .and_then(parse_edge_token)
                .ok_or(ParseError::NoSuchEdge)?
                ^ t.sm_edge_flipped[i];
            cp.e[edge_perm(cv) as usize] = edge_val(t.sm_edge_order[i], edge_ori(cv));
        }
        for i in 0..8 {
            let cv = tokens
                .next()
                .and_then(parse_corner_token)
                .ok_or(ParseError::NoSuchCorner)?;
            cp.c[corner_perm(cv) as usize] =
                corner_val(t.sm_corner_order[i], (3 - corner_ori(cv)) % 3);
        }
        if tokens.next().is_some() {
            return Err(ParseError::TrailingInput);
        }
        Ok(cp)
    }

    /// Format this position in Singmaster notation, the exact inverse of
    /// [`Self::parse_singmaster`].
    #[must_use]
    pub fn singmaster(&self) -> String {
        let t = &*TABLES;
        let mut out = String::with_capacity(64);
        for i in 0..12 {
            let p = t.sm_edge_order[i];
            let s = (0..12).find(|&s| edge_perm(self.e[s]) == p).unwrap();
            let cv = edge_val(s as u8, edge_ori(self.e[s])) ^ t.sm_edge_flipped[i];
            if i > 0 {
                out.push(' ');
            }
            out.push_str(SMEDGES[cv as usize]);
        }
        for i in 0..8 {
            let p = t.sm_corner_order[i];
            let s = (0..8).find(|&s| corner_perm(self.c[s]) == p).unwrap();
            let cv = corner_val(s as u8, (3 - corner_ori(self.c[s])) % 3);
            out.push(' ');
            out.push_str(SMCORNERS[cv as usize]);
        }
        out
    }
}

/// Render a move sequence as face letters with twist digits, e.g. `R1U2F3`.
#[must_use]
pub fn format_moves(seq: &[usize]) -> String {
    let mut out = String::with_capacity(seq.len() * 2);
    for &mv in seq {
        out.push(FACE_NAMES[mv / TWISTS]);
        out.push(char::from(b'1' + (mv % TWISTS) as u8));
    }
    out
}

/// Parse move text: a face letter optionally followed by a twist digit
/// (`1`, `2` or `3`); whitespace is ignored.
///
/// # Errors
///
/// Reports the byte offset of the first character that fits no move.
pub fn parse_moves(text: &str) -> Result<MoveSeq, ParseError> {
    let mut seq = MoveSeq::new();
    let mut chars = text.char_indices().peekable();
    while let Some((at, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }
        let face = crate::tables::parse_face(ch).ok_or(ParseError::BadMove(at))?;
        let twist = match chars.peek() {
            Some(&(_, d @ '1'..='3')) => {
                chars.next();
                d as usize - '1' as usize
            }
            _ => 0,
        };
        let mv = face * TWISTS + twist;
        debug_assert!(mv < NMOVES);
        seq.push(mv);
    }
    Ok(seq)
}
