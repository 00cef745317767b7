//! Ordered output: workers finish out of order, lines are emitted in
//! input order by buffering solutions until their turn comes.

use crate::solver::Solution;
use cubestate::format_moves;
use log::info;
use std::collections::BTreeMap;
use std::io::{self, Write};

pub struct SolutionSink<W: Write> {
    out: W,
    pending: BTreeMap<u64, Solution>,
    next_seq: u64,
    target_length: usize,
    solved: u64,
    missed_target: u64,
    phase2_total: u64,
}

impl<W: Write> SolutionSink<W> {
    pub fn new(out: W, target_length: usize) -> Self {
        SolutionSink {
            out,
            pending: BTreeMap::new(),
            next_seq: 1,
            target_length,
            solved: 0,
            missed_target: 0,
            phase2_total: 0,
        }
    }

    /// Emit `sol` now if it is next in line, then drain any queued
    /// contiguous successors; otherwise buffer it.
    ///
    /// # Errors
    ///
    /// Propagates output write failures.
    pub fn report(&mut self, sol: Solution) -> io::Result<()> {
        self.solved += 1;
        if self.target_length != 0 && !sol.moves.is_empty() && sol.moves.len() > self.target_length
        {
            self.missed_target += 1;
        }
        if sol.seq == self.next_seq {
            self.emit(&sol)?;
            self.next_seq += 1;
            while let Some(next) = self.pending.remove(&self.next_seq) {
                self.emit(&next)?;
                self.next_seq += 1;
            }
        } else {
            self.pending.insert(sol.seq, sol);
        }
        Ok(())
    }

    fn emit(&mut self, sol: &Solution) -> io::Result<()> {
        self.phase2_total += sol.phase2_probes;
        writeln!(self.out, "{}", format_moves(&sol.moves))?;
        self.out.flush()
    }

    /// Log run totals once input is exhausted.
    pub fn finish(&self) {
        info!(
            "solved {} cubes with {} phase 2 probes, {} over target",
            self.solved, self.phase2_total, self.missed_target,
        );
    }

    #[must_use]
    pub fn solved(&self) -> u64 {
        self.solved
    }

    /// Solutions still waiting on earlier sequence numbers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Give back the writer, e.g. to inspect captured output.
    pub fn into_writer(self) -> W {
        self.out
    }
}
