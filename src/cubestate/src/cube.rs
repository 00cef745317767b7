//! The cubie-level cube state and its move and symmetry operations.

use crate::tables::TABLES;
use crate::{NMOVES, NSYM};

/// Which physical edge cubie a slot value names.
#[must_use]
pub const fn edge_perm(v: u8) -> u8 {
    v >> 1
}

/// The flip of an edge slot value.
#[must_use]
pub const fn edge_ori(v: u8) -> u8 {
    v & 1
}

/// Which physical corner cubie a slot value names.
#[must_use]
pub const fn corner_perm(v: u8) -> u8 {
    v & 7
}

/// The twist of a corner slot value.
#[must_use]
pub const fn corner_ori(v: u8) -> u8 {
    v >> 3
}

/// An edge slot value with its flip toggled.
#[must_use]
pub const fn edge_flip(v: u8) -> u8 {
    v ^ 1
}

/// Build an edge slot value from cubie index and flip.
#[must_use]
pub const fn edge_val(perm: u8, ori: u8) -> u8 {
    perm * 2 + ori
}

/// Build a corner slot value from cubie index and twist.
#[must_use]
pub const fn corner_val(perm: u8, ori: u8) -> u8 {
    ori * 8 + perm
}

fn corner_ori_add(cv1: u8, cv2: u8) -> u8 {
    TABLES.mod24[(cv1 + (cv2 & 0x18)) as usize]
}

fn corner_ori_sub(cv1: u8, cv2: u8) -> u8 {
    cv1 + TABLES.corner_ori_neg_strip[cv2 as usize]
}

fn edge_ori_add(cv1: u8, cv2: u8) -> u8 {
    cv1 ^ edge_ori(cv2)
}

/// A cube position: 8 corner slots and 12 edge slots.
///
/// Each corner slot holds `ori * 8 + perm`, each edge slot `perm * 2 +
/// ori`. The derived ordering compares the 20 bytes lexicographically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CubeState {
    pub c: [u8; 8],
    pub e: [u8; 12],
}

impl Default for CubeState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CubeState {
    /// The solved cube: every slot holds its own cubie, unoriented.
    pub const IDENTITY: CubeState = CubeState {
        c: [0, 1, 2, 3, 4, 5, 6, 7],
        e: [0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22],
    };

    /// Apply move `mv` in place through the per-cubie transition tables.
    pub fn apply_move(&mut self, mv: usize) {
        debug_assert!(mv < NMOVES);
        let p = &TABLES.corner_trans[mv];
        for c in &mut self.c {
            *c = p[*c as usize];
        }
        let p = &TABLES.edge_trans[mv];
        for e in &mut self.e {
            *e = p[*e as usize];
        }
    }

    /// Apply move `mv` in place through explicit slot cycles and
    /// orientation flips. This is the move in the position-to-cubie
    /// convention: it tracks [`Self::apply_move`] through inversion, so
    /// `x.inverse()` moved this way equals the inverse of `x` moved the
    /// other way.
    pub fn apply_move_cycles(&mut self, mv: usize) {
        match mv {
            0 => {
                self.rot4_e([0, 2, 3, 1]);
                self.rot4_c([0, 1, 3, 2]);
            }
            1 => {
                self.rot22_e([0, 2, 3, 1]);
                self.rot22_c([0, 1, 3, 2]);
            }
            2 => {
                self.rot4_e([1, 3, 2, 0]);
                self.rot4_c([2, 3, 1, 0]);
            }
            3 => {
                self.rot4_e([3, 7, 11, 6]);
                self.corner4flip([3, 7, 6, 2]);
            }
            4 => {
                self.rot22_e([3, 7, 11, 6]);
                self.rot22_c([2, 3, 7, 6]);
            }
            5 => {
                self.rot4_e([6, 11, 7, 3]);
                self.corner4flip([3, 2, 6, 7]);
            }
            6 => {
                self.edge4flip([2, 5, 10, 7]);
                self.corner4flip([1, 5, 7, 3]);
            }
            7 => {
                self.rot22_e([2, 5, 10, 7]);
                self.rot22_c([3, 1, 5, 7]);
            }
            8 => {
                self.edge4flip([7, 10, 5, 2]);
                self.corner4flip([1, 3, 7, 5]);
            }
            9 => {
                self.rot4_e([9, 11, 10, 8]);
                self.rot4_c([4, 6, 7, 5]);
            }
            10 => {
                self.rot22_e([9, 11, 10, 8]);
                self.rot22_c([4, 6, 7, 5]);
            }
            11 => {
                self.rot4_e([8, 10, 11, 9]);
                self.rot4_c([5, 7, 6, 4]);
            }
            12 => {
                self.rot4_e([0, 4, 8, 5]);
                self.corner4flip([0, 4, 5, 1]);
            }
            13 => {
                self.rot22_e([0, 4, 8, 5]);
                self.rot22_c([1, 0, 4, 5]);
            }
            14 => {
                self.rot4_e([5, 8, 4, 0]);
                self.corner4flip([0, 1, 5, 4]);
            }
            15 => {
                self.edge4flip([1, 6, 9, 4]);
                self.corner4flip([2, 6, 4, 0]);
            }
            16 => {
                self.rot22_e([1, 6, 9, 4]);
                self.rot22_c([0, 2, 6, 4]);
            }
            17 => {
                self.edge4flip([4, 9, 6, 1]);
                self.corner4flip([2, 0, 4, 6]);
            }
            _ => unreachable!("move index out of range"),
        }
    }

    fn rot4_e(&mut self, [a, b, c, d]: [usize; 4]) {
        let t = self.e[d];
        self.e[d] = self.e[c];
        self.e[c] = self.e[b];
        self.e[b] = self.e[a];
        self.e[a] = t;
    }

    fn rot4_c(&mut self, [a, b, c, d]: [usize; 4]) {
        let t = self.c[d];
        self.c[d] = self.c[c];
        self.c[c] = self.c[b];
        self.c[b] = self.c[a];
        self.c[a] = t;
    }

    fn rot22_e(&mut self, [a, b, c, d]: [usize; 4]) {
        self.e.swap(a, c);
        self.e.swap(b, d);
    }

    fn rot22_c(&mut self, [a, b, c, d]: [usize; 4]) {
        self.c.swap(a, c);
        self.c.swap(b, d);
    }

    fn edge4flip(&mut self, [a, b, c, d]: [usize; 4]) {
        let t = self.e[d];
        self.e[d] = edge_flip(self.e[c]);
        self.e[c] = edge_flip(self.e[b]);
        self.e[b] = edge_flip(self.e[a]);
        self.e[a] = edge_flip(t);
    }

    fn corner4flip(&mut self, [a, b, cc, d]: [usize; 4]) {
        let inc = &TABLES.corner_ori_inc;
        let dec = &TABLES.corner_ori_dec;
        let t = self.c[d];
        self.c[d] = inc[self.c[cc] as usize];
        self.c[cc] = dec[self.c[b] as usize];
        self.c[b] = inc[self.c[a] as usize];
        self.c[a] = dec[t as usize];
    }

    /// The inverse position: cubie `v` in slot `i` becomes cubie `i` in
    /// slot `perm(v)` with orientation negated.
    #[must_use]
    pub fn inverse(&self) -> CubeState {
        let mut dst = CubeState::IDENTITY;
        for i in 0..8 {
            let cval = self.c[i];
            dst.c[corner_perm(cval) as usize] = corner_ori_sub(i as u8, cval);
        }
        for i in 0..12 {
            let cval = self.e[i];
            dst.e[edge_perm(cval) as usize] = edge_val(i as u8, edge_ori(cval));
        }
        dst
    }

    /// View this position through whole-cube symmetry `m` (0..48).
    #[must_use]
    pub fn remap(&self, m: usize) -> CubeState {
        debug_assert!(m < NSYM);
        let t = &*TABLES;
        let mprime = t.invm[m] as usize;
        let mut dst = CubeState::IDENTITY;
        for i in 0..8 {
            let c1 = t.rot_corner[mprime][i];
            let c2 = corner_ori_add(self.c[corner_perm(c1) as usize], c1);
            dst.c[i] = t.rot_corner[m][c2 as usize];
        }
        for i in 0..12 {
            let c1 = t.rot_edge[mprime][i * 2];
            let c2 = edge_ori_add(self.e[edge_perm(c1) as usize], c1);
            dst.e[i] = t.rot_edge[m][c2 as usize];
        }
        dst
    }

    /// True if `self` and `other` are the same position viewed through any
    /// of the 48 whole-cube symmetries.
    #[must_use]
    pub fn equal_up_to_symmetry(&self, other: &CubeState) -> bool {
        (0..NSYM).any(|m| other.remap(m) == *self)
    }
}

/// Compose two symmetry indices: `sym_compose(a, b)` is "apply `b`, then
/// `a`" as a single symmetry.
#[must_use]
pub fn sym_compose(a: usize, b: usize) -> usize {
    TABLES.mm[a][b] as usize
}

/// The inverse of a symmetry index.
#[must_use]
pub fn sym_inverse(m: usize) -> usize {
    TABLES.invm[m] as usize
}

/// Rename a move through a symmetry: the move that, viewed through `m`,
/// has the same effect as `mv`.
#[must_use]
pub fn map_move(m: usize, mv: usize) -> usize {
    TABLES.move_map[m][mv] as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{inv_move, ALL_MOVE_MASK, NMOVES, NSYM, TWISTS};

    fn random_state(rng: &mut fastrand::Rng) -> CubeState {
        let mut cp = CubeState::IDENTITY;
        for _ in 0..40 {
            cp.apply_move(rng.usize(0..NMOVES));
        }
        cp
    }

    #[test]
    fn identity_is_default() {
        let cp = CubeState::default();
        for (i, &c) in cp.c.iter().enumerate() {
            assert_eq!(corner_perm(c) as usize, i);
            assert_eq!(corner_ori(c), 0);
        }
        for (i, &e) in cp.e.iter().enumerate() {
            assert_eq!(edge_perm(e) as usize, i);
            assert_eq!(edge_ori(e), 0);
        }
    }

    #[test]
    fn move_then_inverse_move_restores() {
        let mut rng = fastrand::Rng::with_seed(1);
        for _ in 0..50 {
            let cp = random_state(&mut rng);
            for mv in 0..NMOVES {
                let mut cp2 = cp;
                cp2.apply_move(mv);
                cp2.apply_move(inv_move(mv));
                assert_eq!(cp, cp2);
            }
        }
    }

    #[test]
    fn quarter_turns_have_order_four() {
        for f in 0..6 {
            for tw in [0, 2] {
                let mut cp = CubeState::IDENTITY;
                for _ in 0..4 {
                    cp.apply_move(f * TWISTS + tw);
                }
                assert_eq!(cp, CubeState::IDENTITY);
            }
        }
    }

    #[test]
    fn table_and_cycle_moves_are_inverse_conventions() {
        // The two move routines express the same turn on mutually inverse
        // representations.
        let mut rng = fastrand::Rng::with_seed(2);
        for _ in 0..50 {
            let cp = random_state(&mut rng);
            for mv in 0..NMOVES {
                let mut a = cp;
                a.apply_move(mv);
                let mut b = cp.inverse();
                b.apply_move_cycles(mv);
                assert_eq!(b, a.inverse());
            }
        }
    }

    #[test]
    fn cycle_moves_undo_with_the_inverse_move() {
        let mut rng = fastrand::Rng::with_seed(9);
        for _ in 0..50 {
            let cp = random_state(&mut rng);
            for mv in 0..NMOVES {
                let mut cp2 = cp;
                cp2.apply_move_cycles(mv);
                cp2.apply_move_cycles(inv_move(mv));
                assert_eq!(cp, cp2);
            }
        }
    }

    #[test]
    fn inverse_is_involutive() {
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..50 {
            let cp = random_state(&mut rng);
            assert_eq!(cp.inverse().inverse(), cp);
        }
    }

    #[test]
    fn inverted_sequence_builds_inverse_state() {
        let mut rng = fastrand::Rng::with_seed(4);
        for _ in 0..20 {
            let moves: Vec<usize> = (0..20).map(|_| rng.usize(0..NMOVES)).collect();
            let mut cp = CubeState::IDENTITY;
            for &mv in &moves {
                cp.apply_move(mv);
            }
            let mut redo = CubeState::IDENTITY;
            for &mv in &crate::invert_sequence(&moves) {
                redo.apply_move(mv);
            }
            assert_eq!(redo, cp.inverse());
        }
    }

    #[test]
    fn remap_identity_symmetry_is_noop() {
        let mut rng = fastrand::Rng::with_seed(5);
        for _ in 0..20 {
            let cp = random_state(&mut rng);
            assert_eq!(cp.remap(0), cp);
        }
    }

    #[test]
    fn remap_then_inverse_remap_is_identity() {
        let mut rng = fastrand::Rng::with_seed(6);
        for _ in 0..5 {
            let cp = random_state(&mut rng);
            for m in 0..NSYM {
                assert_eq!(cp.remap(m).remap(sym_inverse(m)), cp);
            }
        }
    }

    #[test]
    fn remap_composition_lands_on_a_symmetry_image() {
        // The 48 remaps of a state form one orbit; composing two remaps
        // stays inside it.
        let mut rng = fastrand::Rng::with_seed(8);
        let cp = random_state(&mut rng);
        for m1 in (0..NSYM).step_by(7) {
            for m2 in (0..NSYM).step_by(5) {
                let composed = cp.remap(m2).remap(m1);
                assert!((0..NSYM).any(|k| cp.remap(k) == composed));
            }
        }
    }

    #[test]
    fn remap_commutes_with_mapped_moves() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..10 {
            let cp = random_state(&mut rng);
            for m in 0..NSYM {
                for mv in 0..NMOVES {
                    let mut a = cp.remap(m);
                    a.apply_move(map_move(m, mv));
                    let mut b = cp;
                    b.apply_move(mv);
                    assert_eq!(a, b.remap(m));
                }
            }
        }
    }

    #[test]
    fn all_move_mask_covers_all_moves() {
        assert_eq!(ALL_MOVE_MASK.count_ones() as usize, NMOVES);
    }
}
