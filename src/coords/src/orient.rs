//! The Kociemba orientation coordinate: corner twist, edge flip and
//! middle-slice placement, with canonicalization under the 16 symmetries
//! that preserve the U/D axis.

use cubestate::{corner_ori, corner_val, edge_ori, edge_val, CubeState, NMOVES};
use std::sync::LazyLock;

/// Corner orientation states, 3^7 (the eighth twist is determined).
pub const CORNER_ORIENT: usize = 2187;
/// Edge orientation states, 2^11 (the twelfth flip is determined).
pub const EDGE_ORIENT: usize = 2048;
/// Middle-slice placements, C(12,4).
pub const SLICE_COORD: usize = 495;
/// Symmetries preserving the U/D axis.
pub const UD_SYMMETRIES: usize = 16;
/// Corner-orientation classes under those symmetries.
pub const CORNER_CLASSES: usize = 168;

/// Phase-1 coordinate triple. The solved coset is all zeros.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct OrientCoord {
    /// Corner orientation, 0..2187.
    pub twist: u16,
    /// Edge orientation, 0..2048.
    pub flip: u16,
    /// Which slots hold the four middle-slice edges, 0..495.
    pub slice: u16,
}

/// Symmetry-class record for one corner-orientation value.
#[derive(Clone, Copy, Debug)]
pub struct CornerSymInfo {
    /// Bitset over the 16 mappings that reach the class minimum.
    pub min_bits: u16,
    /// Canonical class id, 0..168.
    pub class: u16,
    /// Lowest mapping index reaching the minimum.
    pub min_map: u8,
}

struct OrientTables {
    twist_move: Vec<[u16; NMOVES]>,
    flip_move: Vec<[u16; NMOVES]>,
    slice_move: Vec<[u16; NMOVES]>,
    slice_compress: Vec<u16>,
    slice_expand: [u16; SLICE_COORD],
    class_expand: [u16; CORNER_CLASSES],
    corner_sym: Vec<CornerSymInfo>,
    flip_map: Vec<[u16; UD_SYMMETRIES]>,
    slice_map: Vec<[u16; UD_SYMMETRIES]>,
    slice_xor: Vec<[u16; 2]>,
}

static ORIENT: LazyLock<OrientTables> = LazyLock::new(OrientTables::new);

fn extract(compress: &[u16], cp: &CubeState) -> OrientCoord {
    let mut twist = 0u16;
    for i in (0..7).rev() {
        twist = 3 * twist + u16::from(corner_ori(cp.c[i]));
    }
    let mut flip = 0u16;
    let mut slice_bits = 0usize;
    for i in (0..11).rev() {
        flip = 2 * flip + u16::from(edge_ori(cp.e[i]));
        slice_bits = 2 * slice_bits + ((cp.e[i] >> 3) & 1) as usize;
    }
    OrientCoord {
        twist,
        flip,
        slice: compress[slice_bits],
    }
}

fn coset(expand: &[u16; SLICE_COORD], kc: OrientCoord) -> CubeState {
    let mut cp = CubeState::IDENTITY;
    let mut c = kc.twist;
    let mut s = 0u16;
    for i in 0..7 {
        let ori = (c % 3) as u8;
        cp.c[i] = corner_val(i as u8, ori);
        s += u16::from(ori);
        c /= 3;
    }
    cp.c[7] = corner_val(7, ((24 - s) % 3) as u8);

    let mut parity = 0u16;
    let mut eo = kc.flip;
    let mut ep = expand[kc.slice as usize];
    let mut next_mid = 4u8;
    let mut next_ud = 0u8;
    for i in 0..12 {
        if i == 11 {
            eo = parity;
        }
        let ori = (eo & 1) as u8;
        if ep & 1 != 0 {
            cp.e[i] = edge_val(next_mid, ori);
            next_mid += 1;
        } else {
            cp.e[i] = edge_val(next_ud, ori);
            next_ud += 1;
            if next_ud == 4 {
                next_ud = 8;
            }
        }
        parity ^= u16::from(ori);
        eo >>= 1;
        ep >>= 1;
    }
    cp
}

impl OrientTables {
    fn new() -> Self {
        let mut slice_compress = vec![0u16; 1 << 12];
        let mut slice_expand = [0u16; SLICE_COORD];
        let mut c = 0;
        for i in 0..1usize << 12 {
            if i.count_ones() == 4 {
                let rotval = ((i << 4) | (i >> 8)) & 0xfff;
                slice_compress[rotval] = c as u16;
                slice_compress[rotval & 0x7ff] = c as u16;
                slice_expand[c] = rotval as u16;
                c += 1;
            }
        }
        assert_eq!(c, SLICE_COORD);

        let mut t = OrientTables {
            twist_move: vec![[0; NMOVES]; CORNER_ORIENT],
            flip_move: vec![[0; NMOVES]; EDGE_ORIENT],
            slice_move: vec![[0; NMOVES]; SLICE_COORD],
            slice_compress,
            slice_expand,
            class_expand: [0; CORNER_CLASSES],
            corner_sym: vec![
                CornerSymInfo {
                    min_bits: 0,
                    class: 0,
                    min_map: 0
                };
                CORNER_ORIENT
            ],
            flip_map: vec![[0; UD_SYMMETRIES]; EDGE_ORIENT],
            slice_map: vec![[0; UD_SYMMETRIES]; SLICE_COORD],
            slice_xor: vec![[0; 2]; SLICE_COORD],
        };

        for i in 0..CORNER_ORIENT {
            let kc = OrientCoord {
                twist: i as u16,
                flip: (i % EDGE_ORIENT) as u16,
                slice: (i % SLICE_COORD) as u16,
            };
            let cp = coset(&t.slice_expand, kc);
            for mv in 0..NMOVES {
                let mut cp2 = cp;
                cp2.apply_move_cycles(mv);
                let kc2 = extract(&t.slice_compress, &cp2);
                t.twist_move[i][mv] = kc2.twist;
                if i < EDGE_ORIENT {
                    t.flip_move[i][mv] = kc2.flip;
                }
                if i < SLICE_COORD {
                    t.slice_move[i][mv] = kc2.slice;
                }
            }
        }

        let mut classes = 0;
        for cs in 0..CORNER_ORIENT {
            let mut min_val = cs as u16;
            let mut low_map = 0u8;
            let mut low_bits = 1u16;
            let kc = OrientCoord {
                twist: cs as u16,
                flip: 0,
                slice: 0,
            };
            let cp = coset(&t.slice_expand, kc);
            for m in 1..UD_SYMMETRIES {
                let kc2 = extract(&t.slice_compress, &cp.remap(m));
                if kc2.twist < min_val {
                    min_val = kc2.twist;
                    low_bits = 1 << m;
                    low_map = m as u8;
                } else if kc2.twist == min_val {
                    low_bits |= 1 << m;
                }
            }
            if min_val as usize == cs {
                t.class_expand[classes] = min_val;
                t.corner_sym[cs].class = classes as u16;
                classes += 1;
            } else {
                t.corner_sym[cs].class = t.corner_sym[min_val as usize].class;
            }
            t.corner_sym[cs].min_bits = low_bits;
            t.corner_sym[cs].min_map = low_map;
        }
        assert_eq!(classes, CORNER_CLASSES);

        for ep in 0..SLICE_COORD {
            let kc = OrientCoord {
                twist: 0,
                flip: 0,
                slice: ep as u16,
            };
            let cp = coset(&t.slice_expand, kc);
            for m in 0..UD_SYMMETRIES {
                let kc2 = extract(&t.slice_compress, &cp.remap(m));
                t.slice_map[ep][m] = kc2.slice;
                if m == 8 {
                    t.slice_xor[kc2.slice as usize][0] = 0;
                    t.slice_xor[kc2.slice as usize][1] = kc2.flip;
                }
            }
        }
        for eo in 0..EDGE_ORIENT {
            let kc = OrientCoord {
                twist: 0,
                flip: eo as u16,
                slice: 0,
            };
            let cp = coset(&t.slice_expand, kc);
            for m in 0..UD_SYMMETRIES {
                t.flip_map[eo][m] = extract(&t.slice_compress, &cp.remap(m)).flip;
            }
        }

        t
    }
}

impl From<&CubeState> for OrientCoord {
    fn from(cp: &CubeState) -> Self {
        extract(&ORIENT.slice_compress, cp)
    }
}

impl OrientCoord {
    /// Reconstruct a representative cube of this coset: the indicated
    /// orientations, middle-slice edges in the indicated slots, everything
    /// else in index order.
    #[must_use]
    pub fn set_coset(self) -> CubeState {
        coset(&ORIENT.slice_expand, self)
    }

    /// Apply a move through the three per-coordinate tables.
    pub fn apply_move(&mut self, mv: usize) {
        let t = &*ORIENT;
        self.twist = t.twist_move[self.twist as usize][mv];
        self.flip = t.flip_move[self.flip as usize][mv];
        self.slice = t.slice_move[self.slice as usize][mv];
    }

    /// The flip and slice parts as seen through U/D symmetry `m`.
    #[must_use]
    pub fn mapped(self, m: usize) -> (u16, u16) {
        let t = &*ORIENT;
        let xor = t.slice_xor[self.slice as usize][m >> 3];
        (
            t.flip_map[(xor ^ self.flip) as usize][m],
            t.slice_map[self.slice as usize][m],
        )
    }

    /// The lexicographically minimal triple over the 16 U/D symmetries.
    #[must_use]
    pub fn canon(self) -> OrientCoord {
        let t = &*ORIENT;
        let cm = t.corner_sym[self.twist as usize];
        let min_bits = u32::from(cm.min_bits);
        let (mut flip, mut slice) = self.mapped(cm.min_map as usize);
        let mut m = cm.min_map as usize + 1;
        while min_bits >> m != 0 {
            if min_bits >> m & 1 != 0 {
                let (nf, ns) = self.mapped(m);
                if nf <= flip && (nf < flip || ns < slice) {
                    flip = nf;
                    slice = ns;
                }
            }
            m += 1;
        }
        OrientCoord {
            twist: t.class_expand[cm.class as usize],
            flip,
            slice,
        }
    }

    /// How many of the 16 U/D symmetries fix this coordinate.
    #[must_use]
    pub fn symmetry_order(self) -> u32 {
        let t = &*ORIENT;
        let cm = t.corner_sym[self.twist as usize];
        let min_bits = u32::from(cm.min_bits);
        let reference = self.mapped(cm.min_map as usize);
        let mut r = 1;
        let mut m = cm.min_map as usize + 1;
        while min_bits >> m != 0 {
            if min_bits >> m & 1 != 0 && self.mapped(m) == reference {
                r += 1;
            }
            m += 1;
        }
        r
    }
}

/// True for the ten moves that stay inside the Kociemba subgroup.
#[must_use]
pub fn in_kociemba_group(mv: usize) -> bool {
    ORIENT.slice_move[0][mv] == 0
}

/// Symmetry-class record for a corner-orientation value.
#[must_use]
pub fn corner_sym_info(twist: u16) -> CornerSymInfo {
    ORIENT.corner_sym[twist as usize]
}

/// The representative corner-orientation value of a class.
#[must_use]
pub fn class_representative(class: usize) -> u16 {
    ORIENT.class_expand[class]
}

/// Compress a 12-bit (or 11-bit truncated) slot mask to a slice index.
#[must_use]
pub fn slice_compress(bits: usize) -> u16 {
    ORIENT.slice_compress[bits]
}

/// Expand a slice index back to its 12-bit slot mask.
#[must_use]
pub fn slice_expand(slice: usize) -> u16 {
    ORIENT.slice_expand[slice]
}
