//! Phase-2 permutation coordinate: which four edges sit in each layer and
//! how each layer's four cubies are permuted, built on tables for the
//! symmetric group on four elements and the C(8,4) selector.

use crate::orient;
use cubestate::{corner_ori, corner_perm, corner_val, edge_ori, edge_perm, edge_val, CubeState, NMOVES};
use std::sync::LazyLock;

/// 4! permutations of one layer.
pub const FACT4: usize = 24;
/// C(8,4) corner selections.
pub const C8_4: usize = 70;
/// 8! permutations, the per-class extent of the phase-2 table.
pub const FACT8: usize = 40320;

/// Phase-2 coordinate: three edge layers and the corner split, each with a
/// 4-element permutation, plus the layer selectors.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PermCoord {
    /// Slot masks (compressed through the slice tables) of the top,
    /// middle and bottom edge layers.
    pub et: u16,
    pub em: u16,
    pub eb: u16,
    /// Permutation of each layer's four edges, 0..24.
    pub etp: u8,
    pub emp: u8,
    pub ebp: u8,
    /// Which four corner slots hold top-layer corners, 0..70.
    pub c8_4: u8,
    /// Permutation of the top and bottom corner quartets, 0..24.
    pub ctp: u8,
    pub cbp: u8,
}

struct PermTables {
    s4inv: [u8; FACT4],
    s4mul: [[u8; FACT4]; FACT4],
    s4compress: [u8; 256],
    s4expand: [u8; FACT4],
    c8_4_compact: [u8; 256],
    c8_4_expand: [u8; C8_4],
    c8_4_parity: [u8; C8_4],
    c12_8: [u8; orient::SLICE_COORD],
    c8_12: [u16; C8_4],
    eperm_move: Vec<[u16; NMOVES]>,
    cperm_move: Vec<[u32; NMOVES]>,
    identity: PermCoord,
}

static PERM: LazyLock<PermTables> = LazyLock::new(PermTables::new);

// Compose two packed 2-bit-per-slot permutations of four elements.
fn muls4(a: usize, b: usize) -> usize {
    let mut r = 3 & (b >> (2 * (a & 3)));
    r += (3 & (b >> (2 * ((a >> 2) & 3)))) << 2;
    r += (3 & (b >> (2 * ((a >> 4) & 3)))) << 4;
    r += (3 & (b >> (2 * ((a >> 6) & 3)))) << 6;
    r
}

impl PermTables {
    fn new() -> Self {
        let mut t = PermTables {
            s4inv: [0; FACT4],
            s4mul: [[0; FACT4]; FACT4],
            s4compress: [0; 256],
            s4expand: [0; FACT4],
            c8_4_compact: [0; 256],
            c8_4_expand: [0; C8_4],
            c8_4_parity: [0; C8_4],
            c12_8: [0; orient::SLICE_COORD],
            c8_12: [0; C8_4],
            eperm_move: vec![[0; NMOVES]; orient::SLICE_COORD],
            cperm_move: vec![[0; NMOVES]; C8_4],
            identity: PermCoord {
                et: 0,
                em: 0,
                eb: 0,
                etp: 0,
                emp: 0,
                ebp: 0,
                c8_4: 0,
                ctp: 0,
                cbp: 0,
            },
        };

        let mut cc = 0usize;
        for a in 0..4usize {
            for b in (0..4usize).filter(|&b| b != a) {
                for c in (0..4usize).filter(|&c| c != a && c != b) {
                    let d = 6 - a - b - c;
                    let coor = cc ^ ((cc >> 1) & 1);
                    let expanded = (1 << (2 * b)) + (2 << (2 * c)) + (3 << (2 * d));
                    t.s4compress[expanded] = coor as u8;
                    t.s4expand[coor] = expanded as u8;
                    cc += 1;
                }
            }
        }
        for i in 0..FACT4 {
            for j in 0..FACT4 {
                let k = t.s4compress[muls4(t.s4expand[i] as usize, t.s4expand[j] as usize)];
                t.s4mul[j][i] = k;
                if k == 0 {
                    t.s4inv[i] = j as u8;
                }
            }
        }

        let mut c = 0usize;
        for i in 0..256usize {
            if i.count_ones() == 4 {
                let mut parity = 0;
                for j in 0..8 {
                    if i >> j & 1 != 0 {
                        for k in 0..j {
                            if i >> k & 1 == 0 {
                                parity += 1;
                            }
                        }
                    }
                }
                t.c8_4_parity[c] = parity & 1;
                t.c8_4_compact[i] = c as u8;
                t.c8_4_expand[c] = i as u8;
                c += 1;
            }
        }
        assert_eq!(c, C8_4);

        for i in 0..orient::SLICE_COORD {
            let expbits = orient::slice_expand(i) as usize;
            if expbits & 0x0f0 != 0 {
                t.c12_8[i] = 255;
            } else {
                let ii = t.c8_4_compact[(expbits >> 4) + (expbits & 15)];
                t.c12_8[i] = ii;
                t.c8_12[ii as usize] = i as u16;
            }
        }

        t.identity = PermCoord {
            et: orient::slice_compress(0xf),
            em: 0,
            eb: orient::slice_compress(0xf00),
            etp: 0,
            emp: 0,
            ebp: 0,
            c8_4: 0,
            ctp: 0,
            cbp: 0,
        };

        for i in 0..orient::SLICE_COORD {
            let mut pc = t.identity;
            pc.em = i as u16;
            let remaining = 0xfff - orient::slice_expand(i) as usize;
            let mut mask = 0usize;
            let mut bits_seen = 0;
            while bits_seen < 4 {
                if remaining & (mask + 1) != 0 {
                    bits_seen += 1;
                }
                mask = 2 * mask + 1;
            }
            pc.et = orient::slice_compress(remaining & mask);
            pc.eb = orient::slice_compress(remaining & !mask & 0xfff);
            let mut cp = CubeState::IDENTITY;
            t.set_perm_into(pc, &mut cp);
            for mv in 0..NMOVES {
                let mut cp2 = cp;
                cp2.apply_move_cycles(mv);
                let pc2 = t.extract(&cp2);
                t.eperm_move[i][mv] = (pc2.em << 5) + u16::from(pc2.emp);
            }
        }

        for i in 0..C8_4 {
            let mut pc = t.identity;
            pc.c8_4 = i as u8;
            let mut cp = CubeState::IDENTITY;
            t.set_perm_into(pc, &mut cp);
            for mv in 0..NMOVES {
                let mut cp2 = cp;
                cp2.apply_move_cycles(mv);
                let pc2 = t.extract(&cp2);
                t.cperm_move[i][mv] = (u32::from(pc2.c8_4) << 10)
                    + (u32::from(pc2.ctp) << 5)
                    + u32::from(pc2.cbp);
            }
        }

        t
    }

    fn extract(&self, cp: &CubeState) -> PermCoord {
        let mut et = 0u16;
        let mut em = 0u16;
        let mut eb = 0u16;
        let mut etp = 0u8;
        let mut emp = 0u8;
        let mut ebp = 0u8;
        for i in (0..12).rev() {
            let perm = edge_perm(cp.e[i]);
            if perm & 4 != 0 {
                em |= 1 << i;
                emp = 4 * emp + (perm & 3);
            } else if perm & 8 != 0 {
                eb |= 1 << i;
                ebp = 4 * ebp + (perm & 3);
            } else {
                et |= 1 << i;
                etp = 4 * etp + (perm & 3);
            }
        }
        let mut c8_4 = 0u8;
        let mut ctp = 0u8;
        let mut cbp = 0u8;
        for i in (0..8).rev() {
            let perm = corner_perm(cp.c[i]);
            if perm & 4 != 0 {
                cbp = 4 * cbp + (perm & 3);
            } else {
                c8_4 |= 1 << i;
                ctp = 4 * ctp + (perm & 3);
            }
        }
        PermCoord {
            et: orient::slice_compress(et as usize),
            em: orient::slice_compress(em as usize),
            eb: orient::slice_compress(eb as usize),
            etp: self.s4compress[etp as usize],
            emp: self.s4compress[emp as usize],
            ebp: self.s4compress[ebp as usize],
            c8_4: self.c8_4_compact[c8_4 as usize],
            ctp: self.s4compress[ctp as usize],
            cbp: self.s4compress[cbp as usize],
        }
    }

    fn set_perm_into(&self, pc: PermCoord, cp: &mut CubeState) {
        let et_bits = orient::slice_expand(pc.et as usize);
        let em_bits = orient::slice_expand(pc.em as usize);
        let mut et_perm = self.s4expand[pc.etp as usize];
        let mut em_perm = self.s4expand[pc.emp as usize];
        let mut eb_perm = self.s4expand[pc.ebp as usize];
        for i in 0..12 {
            if et_bits >> i & 1 != 0 {
                cp.e[i] = edge_val(3 & et_perm, edge_ori(cp.e[i]));
                et_perm >>= 2;
            } else if em_bits >> i & 1 != 0 {
                cp.e[i] = edge_val((3 & em_perm) + 4, edge_ori(cp.e[i]));
                em_perm >>= 2;
            } else {
                cp.e[i] = edge_val((3 & eb_perm) + 8, edge_ori(cp.e[i]));
                eb_perm >>= 2;
            }
        }
        let c8_4_bits = self.c8_4_expand[pc.c8_4 as usize];
        let mut ct_perm = self.s4expand[pc.ctp as usize];
        let mut cb_perm = self.s4expand[pc.cbp as usize];
        for i in 0..8 {
            if c8_4_bits >> i & 1 != 0 {
                cp.c[i] = corner_val(3 & ct_perm, corner_ori(cp.c[i]));
                ct_perm >>= 2;
            } else {
                cp.c[i] = corner_val((3 & cb_perm) + 4, corner_ori(cp.c[i]));
                cb_perm >>= 2;
            }
        }
    }
}

impl Default for PermCoord {
    fn default() -> Self {
        PERM.identity
    }
}

impl From<&CubeState> for PermCoord {
    fn from(cp: &CubeState) -> Self {
        PERM.extract(cp)
    }
}

impl PermCoord {
    /// Apply a move through the packed layer tables.
    pub fn apply_move(&mut self, mv: usize) {
        let t = &*PERM;
        let e = t.eperm_move[self.et as usize][mv];
        self.et = e >> 5;
        self.etp = t.s4mul[self.etp as usize][(e & 31) as usize];
        let e = t.eperm_move[self.em as usize][mv];
        self.em = e >> 5;
        self.emp = t.s4mul[self.emp as usize][(e & 31) as usize];
        let e = t.eperm_move[self.eb as usize][mv];
        self.eb = e >> 5;
        self.ebp = t.s4mul[self.ebp as usize][(e & 31) as usize];
        let c = t.cperm_move[self.c8_4 as usize][mv];
        self.c8_4 = (c >> 10) as u8;
        self.ctp = t.s4mul[self.ctp as usize][(c >> 5 & 31) as usize];
        self.cbp = t.s4mul[self.cbp as usize][(c & 31) as usize];
    }

    /// Write this permutation into `cp`, preserving its orientations.
    pub fn set_perm(self, cp: &mut CubeState) {
        PERM.set_perm_into(self, cp);
    }
}

/// Compress a slice index whose mask avoids the middle slots into a
/// C(8,4) index over the U/D slots; 255 where the mask touches the slice.
#[must_use]
pub fn c12_8(slice: usize) -> usize {
    PERM.c12_8[slice] as usize
}

/// The slice index of a C(8,4) U/D-slot selection.
#[must_use]
pub fn c8_12(c: usize) -> u16 {
    PERM.c8_12[c]
}

/// Compose two S4 indices: the permutation `a` followed by table entry `b`.
#[must_use]
pub fn s4mul(a: usize, b: usize) -> usize {
    PERM.s4mul[a][b] as usize
}

/// Parity of a C(8,4) selection.
#[must_use]
pub fn c8_4_parity(c: usize) -> u8 {
    PERM.c8_4_parity[c]
}

/// Raw packed `(bits << 5) | s4` move entry for one edge layer.
#[must_use]
pub fn eperm_move(layer: usize, mv: usize) -> u16 {
    PERM.eperm_move[layer][mv]
}
