//! The `twophase` binary: read Singmaster positions from stdin, solve
//! them on a fixed pool of worker threads, print solutions in input
//! order.

#![warn(clippy::pedantic)]

use clap::Parser;
use cubestate::CubeState;
use log::LevelFilter;
use std::io::{self, BufRead, BufReader, Lines, Stdin, Stdout};
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;
use std::thread;
use twophase::{SolutionSink, SolverConfig, Tables, TwoPhaseSolver, MAX_THREADS};

/// Kociemba two-phase Rubik's cube solver.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Worker threads draining stdin
    #[arg(short = 't', long, default_value_t = 8)]
    threads: usize,

    /// Stop searching a cube once a solution no longer than this is found
    #[arg(long, default_value_t = 50)]
    target_length: usize,

    /// Phase-2 probe budget per cube; past it the best solution so far wins
    #[arg(long, default_value_t = u64::MAX)]
    phase2_limit: u64,

    /// Generate pruning tables without writing them to disk
    #[arg(long)]
    skip_write: bool,

    /// Bitmask over the six orientations (3 axes x 2 inversions) to search
    #[arg(long, default_value_t = 0x3f)]
    axes_mask: u32,

    /// Directory holding phase1.dat and phase2.dat
    #[arg(long, default_value = ".")]
    table_dir: PathBuf,

    /// Re-hash both pruning tables after loading and abort on mismatch
    #[arg(long)]
    check_integrity: bool,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Everything the workers share, behind one process-wide mutex.
struct Shared {
    input: Lines<BufReader<Stdin>>,
    next_seq: u64,
    sink: SolutionSink<Stdout>,
}

fn fatal(msg: &str) -> ! {
    eprintln!("! {msg}");
    process::exit(10);
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let threads = cli.threads.clamp(1, MAX_THREADS);
    let config = SolverConfig {
        target_length: cli.target_length,
        phase2_limit: cli.phase2_limit,
        axes_mask: cli.axes_mask,
    };

    let tables = match Tables::init(&cli.table_dir, cli.skip_write) {
        Ok(tables) => tables,
        Err(e) => fatal(&e.to_string()),
    };
    if cli.check_integrity {
        if let Err(e) = tables
            .phase1
            .check_integrity()
            .and_then(|()| tables.phase2.check_integrity())
        {
            fatal(&e.to_string());
        }
    }

    let shared = Mutex::new(Shared {
        input: BufReader::new(io::stdin()).lines(),
        next_seq: 0,
        sink: SolutionSink::new(io::stdout(), config.target_length),
    });

    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| worker(&tables, config, &shared));
        }
    });

    shared.lock().unwrap().sink.finish();
}

/// One worker: take a line and a sequence number under the lock, solve
/// outside it, report back under the lock. Exits at end of input.
fn worker(tables: &Tables, config: SolverConfig, shared: &Mutex<Shared>) {
    let mut solver = TwoPhaseSolver::new(tables, config);
    loop {
        let (pos, seq) = {
            let mut shared = shared.lock().unwrap();
            let line = match shared.input.next() {
                None => return,
                Some(Err(e)) => fatal(&format!("error reading input: {e}")),
                Some(Ok(line)) => line,
            };
            let pos = match CubeState::parse_singmaster(&line) {
                Ok(pos) => pos,
                Err(e) => fatal(&format!("could not parse Singmaster notation: {e}")),
            };
            shared.next_seq += 1;
            (pos, shared.next_seq)
        };
        let solution = match solver.solve(seq, pos) {
            Ok(solution) => solution,
            Err(e) => fatal(&e.to_string()),
        };
        if let Err(e) = shared.lock().unwrap().sink.report(solution) {
            fatal(&format!("error writing solution: {e}"));
        }
    }
}
