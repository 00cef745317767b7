//! The two-phase orchestrator: six orientations of the input position,
//! symmetry deduplication, iterative-deepening phase 1 with delta-hint
//! move masks, and phase-2 probes bounded by the best solution so far.

use crate::phase1::Phase1Table;
use crate::phase2::Phase2Table;
use crate::table_io::TableIoError;
use coords::{OrientCoord, PermCoord, UD_SYMMETRIES};
use cubestate::{
    allowed_mask, format_moves, invert_sequence, map_move, next_state, sym_inverse, CubeState,
    MoveSeq, ALL_MOVE_MASK, CANON_START,
};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;
use thiserror::Error;

/// Hard upper bound on solution length; phase 1 plus phase 2 never need
/// more.
pub const MAX_MOVES: usize = 50;

/// Both pruning tables, built once and shared read-only by every worker.
pub struct Tables {
    pub phase1: Phase1Table,
    pub phase2: Phase2Table,
}

impl Tables {
    /// Load or generate both tables under `dir`.
    ///
    /// # Errors
    ///
    /// Propagates pruning-table write failures.
    pub fn init(dir: &Path, skip_write: bool) -> Result<Tables, TableIoError> {
        let start = Instant::now();
        let phase1 = Phase1Table::init(dir, skip_write)?;
        let phase2 = Phase2Table::init(dir, skip_write)?;
        info!(
            "pruning tables ready in {:.1?} (checksums {:#x} / {:#x})",
            start.elapsed(),
            phase1.checksum(),
            phase2.checksum(),
        );
        Ok(Tables { phase1, phase2 })
    }
}

/// Per-run solver knobs.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Search stops once a solution no longer than this is found.
    pub target_length: usize,
    /// Phase-2 probe budget; once exceeded the best solution so far wins.
    pub phase2_limit: u64,
    /// Which of the six orientations to search.
    pub axes_mask: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            target_length: 50,
            phase2_limit: u64::MAX,
            axes_mask: 0x3f,
        }
    }
}

/// A verified solving sequence for one input position.
#[derive(Clone, Debug)]
pub struct Solution {
    pub pos: CubeState,
    pub seq: u64,
    pub phase2_probes: u64,
    pub moves: MoveSeq,
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("move sequence doesn't work")]
    Verification,
}

/// One worker's solver. Owns its search buffers; never shared.
pub struct TwoPhaseSolver<'a> {
    tables: &'a Tables,
    config: SolverConfig,
    pos: CubeState,
    phase2_probes: u64,
    best_len: usize,
    finished: bool,
    cur_orient: usize,
    sol_orient: usize,
    moves: [usize; MAX_MOVES],
    best_moves: [usize; MAX_MOVES],
    cp6: [CubeState; 6],
    kc6: [OrientCoord; 6],
    kccanon6: [OrientCoord; 6],
    pc6: [PermCoord; 6],
    mindepth: [usize; 6],
    uniq: [bool; 6],
}

impl<'a> TwoPhaseSolver<'a> {
    #[must_use]
    pub fn new(tables: &'a Tables, config: SolverConfig) -> Self {
        TwoPhaseSolver {
            tables,
            config,
            pos: CubeState::IDENTITY,
            phase2_probes: 0,
            best_len: MAX_MOVES,
            finished: false,
            cur_orient: 0,
            sol_orient: 0,
            moves: [0; MAX_MOVES],
            best_moves: [0; MAX_MOVES],
            cp6: [CubeState::IDENTITY; 6],
            kc6: [OrientCoord::default(); 6],
            kccanon6: [OrientCoord::default(); 6],
            pc6: [PermCoord::default(); 6],
            mindepth: [0; 6],
            uniq: [false; 6],
        }
    }

    /// Solve one position and return the verified move sequence.
    ///
    /// # Errors
    ///
    /// [`SolveError::Verification`] when the assembled sequence does not
    /// reproduce the input; that is a broken invariant, not bad input.
    pub fn solve(&mut self, seq: u64, pos: CubeState) -> Result<Solution, SolveError> {
        self.pos = pos;
        self.phase2_probes = 0;
        self.best_len = MAX_MOVES;
        self.finished = false;

        // Six orientations: three axis renames of the position and of its
        // inverse. Equivalent ones are searched only once.
        let inv = pos.inverse();
        let mut minmindepth = MAX_MOVES;
        for ind in 0..6 {
            let base = if ind >= 3 { &inv } else { &pos };
            let cp = base.remap(UD_SYMMETRIES * (ind % 3));
            self.cp6[ind] = cp;
            self.kc6[ind] = OrientCoord::from(&cp);
            self.pc6[ind] = PermCoord::from(&cp);
            self.kccanon6[ind] = self.kc6[ind].canon();
            self.mindepth[ind] = self.tables.phase1.lookup(self.kc6[ind]);
            minmindepth = minmindepth.min(self.mindepth[ind]);
            self.uniq[ind] = self.config.axes_mask >> ind & 1 != 0;
            for i in 0..ind {
                if self.uniq[i]
                    && self.kccanon6[ind] == self.kccanon6[i]
                    && self.cp6[ind].equal_up_to_symmetry(&self.cp6[i])
                {
                    self.uniq[ind] = false;
                    break;
                }
            }
        }

        let mut d = minmindepth;
        while d < self.best_len && !self.finished {
            for curm in 0..6 {
                if !self.uniq[curm] {
                    continue;
                }
                if self.finished || d >= self.best_len || d < self.mindepth[curm] {
                    continue;
                }
                self.cur_orient = curm;
                self.solve_phase1(
                    self.kc6[curm],
                    self.pc6[curm],
                    d,
                    0,
                    ALL_MOVE_MASK,
                    CANON_START,
                );
            }
            d += 1;
        }

        // Map the winning orientation's moves back to the input frame; a
        // win on the inverted cube solves backwards.
        let m = sym_inverse((self.sol_orient % 3) * UD_SYMMETRIES);
        let mut sol: MoveSeq = self.best_moves[..self.best_len]
            .iter()
            .map(|&mv| map_move(m, mv))
            .collect();
        if self.sol_orient >= 3 {
            sol = invert_sequence(&sol);
        }

        let mut check = CubeState::IDENTITY;
        for &mv in &sol {
            check.apply_move(mv);
        }
        if check != self.pos {
            return Err(SolveError::Verification);
        }
        debug!(
            "seq {seq}: {} moves, {} phase 2 probes ({})",
            sol.len(),
            self.phase2_probes,
            format_moves(&sol),
        );
        Ok(Solution {
            pos: self.pos,
            seq,
            phase2_probes: self.phase2_probes,
            moves: sol,
        })
    }

    fn solve_phase1(
        &mut self,
        kc: OrientCoord,
        pc: PermCoord,
        togo: usize,
        sofar: usize,
        movemask: u32,
        canon: usize,
    ) {
        if togo == 0 {
            if kc == OrientCoord::default() {
                self.solve_phase2(&pc, sofar);
            }
            return;
        }
        if self.finished {
            return;
        }
        let togo = togo - 1;
        let mut movemask = movemask;
        while !self.finished && movemask != 0 {
            let mv = movemask.trailing_zeros() as usize;
            movemask &= movemask - 1;
            let mut kc2 = kc;
            kc2.apply_move(mv);
            let (nd, next_mask) = self.tables.phase1.lookup_with_togo(kc2, togo);
            // Advance only when the heuristic fits the budget exactly or
            // the combined depth clears the near-solved cutoff.
            if nd <= togo && (togo == nd || togo + nd >= 5) {
                let mut pc2 = pc;
                pc2.apply_move(mv);
                self.moves[sofar] = mv;
                let new_canon = next_state(canon, mv);
                self.solve_phase1(
                    kc2,
                    pc2,
                    togo,
                    sofar + 1,
                    next_mask & allowed_mask(new_canon),
                    new_canon,
                );
            }
        }
    }

    fn solve_phase2(&mut self, pc: &PermCoord, sofar: usize) {
        self.phase2_probes += 1;
        let d = self.tables.phase2.lookup(pc);
        if d + sofar < self.best_len {
            let ms = self.tables.phase2.solve(pc, self.best_len - sofar - 1);
            if ms.len() + sofar < self.best_len
                && (!ms.is_empty() || *pc == PermCoord::default())
            {
                self.best_len = ms.len() + sofar;
                self.moves[sofar..sofar + ms.len()].copy_from_slice(&ms);
                self.best_moves[..self.best_len].copy_from_slice(&self.moves[..self.best_len]);
                self.sol_orient = self.cur_orient;
                if self.best_len <= self.config.target_length {
                    self.finished = true;
                }
            }
        }
        if self.phase2_probes >= self.config.phase2_limit && self.best_len < MAX_MOVES {
            self.finished = true;
        }
    }
}
