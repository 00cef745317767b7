//! End-to-end solver tests. Most of these build (or reuse) the full
//! pruning tables under the target tmpdir, which takes a while the first
//! time, so they are ignored by default: run with `--ignored --release`.

use coords::{in_kociemba_group, OrientCoord, PermCoord};
use cubestate::{edge_perm, CubeState, MoveSeq, NMOVES};
use itertools::Itertools;
use log::info;
use std::path::Path;
use std::sync::OnceLock;
use twophase::{SolverConfig, Tables, TwoPhaseSolver};

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| {
        Tables::init(Path::new(env!("CARGO_TARGET_TMPDIR")), false).expect("table init")
    })
}

/// The position that maneuver `moves` solves. The solver emits the
/// generator of its input, so the expected output here is the inverse of
/// `moves` (or something no longer).
fn scrambled(moves: &[usize]) -> CubeState {
    let mut cp = CubeState::IDENTITY;
    for &mv in &cubestate::invert_sequence(moves) {
        cp.apply_move(mv);
    }
    cp
}

fn solve_one(pos: CubeState) -> MoveSeq {
    let mut solver = TwoPhaseSolver::new(tables(), SolverConfig::default());
    solver.solve(1, pos).expect("verification").moves
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn solved_cube_has_empty_solution() {
    let text = "UF UR UB UL DF DR DB DL FR FL BR BL UFR URB UBL ULF DRF DFL DLB DBR";
    let pos = CubeState::parse_singmaster(text).unwrap();
    assert_eq!(solve_one(pos), Vec::<usize>::new());
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn single_quarter_turn_solves_with_the_inverse() {
    let pos = scrambled(&cubestate::parse_moves("R1").unwrap());
    let sol = solve_one(pos);
    assert_eq!(cubestate::format_moves(&sol), "R3");
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn two_move_scramble_solves_in_two() {
    let pos = scrambled(&cubestate::parse_moves("U1 R1").unwrap());
    let sol = solve_one(pos);
    assert!(sol.len() <= 2, "got {}", cubestate::format_moves(&sol));
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn superflip_solves_within_26() {
    let mut pos = CubeState::IDENTITY;
    for (i, e) in pos.e.iter_mut().enumerate() {
        *e = (i as u8) * 2 + 1;
    }
    let sol = solve_one(pos);
    info!("superflip: {}", cubestate::format_moves(&sol));
    assert!(sol.len() <= 26, "superflip took {} moves", sol.len());
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn random_scrambles_verify_within_bound() {
    let mut rng = fastrand::Rng::with_seed(51);
    for _ in 0..10 {
        let moves: Vec<usize> = (0..20).map(|_| rng.usize(0..NMOVES)).collect();
        let sol = solve_one(scrambled(&moves));
        assert!(sol.len() <= 30, "solution of {} moves", sol.len());
    }
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn singmaster_text_round_trips_through_the_solver() {
    let mut rng = fastrand::Rng::with_seed(52);
    let moves: Vec<usize> = (0..25).map(|_| rng.usize(0..NMOVES)).collect();
    let pos = scrambled(&moves);
    let reparsed = CubeState::parse_singmaster(&pos.singmaster()).unwrap();
    assert_eq!(reparsed, pos);
    let sol = solve_one(reparsed);
    let mut check = CubeState::IDENTITY;
    for &mv in &sol {
        check.apply_move(mv);
    }
    assert_eq!(check, pos);
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn phase1_distances_are_locally_consistent() {
    let mut rng = fastrand::Rng::with_seed(53);
    let phase1 = &tables().phase1;
    for _ in 0..200 {
        let mut cp = CubeState::IDENTITY;
        for _ in 0..rng.usize(0..25) {
            cp.apply_move(rng.usize(0..NMOVES));
        }
        let kc = OrientCoord::from(&cp);
        let d = phase1.lookup(kc);
        let successors = (0..NMOVES)
            .map(|mv| {
                let mut kc2 = kc;
                kc2.apply_move(mv);
                phase1.lookup(kc2)
            })
            .collect_vec();
        for &nd in &successors {
            assert!(nd + 1 >= d && nd <= d + 1, "distance jumped {d} -> {nd}");
        }
        if d > 0 {
            assert_eq!(successors.iter().min(), Some(&(d - 1)));
        }
    }
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn phase1_masks_match_successor_distances() {
    let mut rng = fastrand::Rng::with_seed(54);
    let phase1 = &tables().phase1;
    for _ in 0..100 {
        let mut cp = CubeState::IDENTITY;
        for _ in 0..rng.usize(1..25) {
            cp.apply_move(rng.usize(0..NMOVES));
        }
        let kc = OrientCoord::from(&cp);
        let d = phase1.lookup(kc);
        if d == 0 {
            continue;
        }
        let successors = (0..NMOVES)
            .map(|mv| {
                let mut kc2 = kc;
                kc2.apply_move(mv);
                phase1.lookup(kc2)
            })
            .collect_vec();
        // The delta hints are exact at any budget at or above the entry's
        // own distance.
        for togo in [d, d + 1] {
            let (r, mask) = phase1.lookup_with_togo(kc, togo);
            assert_eq!(r, d);
            for (mv, &nd) in successors.iter().enumerate() {
                assert_eq!(mask >> mv & 1 == 1, nd <= togo, "move {mv} at togo {togo}");
            }
        }
        let (r, mask) = phase1.lookup_mask(kc);
        assert_eq!(r, d);
        for (mv, &nd) in successors.iter().enumerate() {
            assert_eq!(mask >> mv & 1 == 1, nd <= d, "non-increasing move {mv}");
        }
    }
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn phase1_greedy_walk_reaches_the_subgroup() {
    let mut rng = fastrand::Rng::with_seed(55);
    let phase1 = &tables().phase1;
    for _ in 0..50 {
        let mut cp = CubeState::IDENTITY;
        for _ in 0..30 {
            cp.apply_move(rng.usize(0..NMOVES));
        }
        let mut kc = OrientCoord::from(&cp);
        let seq = phase1.solve(kc);
        assert_eq!(seq.len(), phase1.lookup(kc));
        for &mv in &seq {
            kc.apply_move(mv);
        }
        assert_eq!(kc, OrientCoord::default());
    }
}

fn random_subgroup_coord(rng: &mut fastrand::Rng, len: usize) -> PermCoord {
    let subgroup_moves = (0..NMOVES).filter(|&mv| in_kociemba_group(mv)).collect_vec();
    let mut pc = PermCoord::default();
    for _ in 0..len {
        pc.apply_move(subgroup_moves[rng.usize(0..subgroup_moves.len())]);
    }
    pc
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn phase2_distances_are_locally_consistent() {
    let mut rng = fastrand::Rng::with_seed(56);
    let phase2 = &tables().phase2;
    let subgroup_moves = (0..NMOVES).filter(|&mv| in_kociemba_group(mv)).collect_vec();
    for _ in 0..200 {
        let depth = rng.usize(0..22);
        let pc = random_subgroup_coord(&mut rng, depth);
        let d = phase2.lookup(&pc);
        if d == 0 || d > 15 {
            // Solved, or at the generation ceiling where values are only
            // lower bounds.
            continue;
        }
        let successors = subgroup_moves
            .iter()
            .map(|&mv| {
                let mut pc2 = pc;
                pc2.apply_move(mv);
                phase2.lookup(&pc2)
            })
            .collect_vec();
        for &nd in &successors {
            assert!(nd + 1 >= d, "distance dropped {d} -> {nd}");
        }
        assert_eq!(successors.iter().min(), Some(&(d - 1)));
    }
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn phase2_solver_solves_subgroup_states() {
    let mut rng = fastrand::Rng::with_seed(57);
    let phase2 = &tables().phase2;
    for _ in 0..50 {
        let pc = random_subgroup_coord(&mut rng, 22);
        let seq = phase2.solve(&pc, 30);
        // The table value is a lower bound even at the generation ceiling.
        assert!(seq.len() >= phase2.lookup(&pc) || pc == PermCoord::default());
        assert!(seq.len() <= 18, "phase 2 solution of {} moves", seq.len());
        let mut check = pc;
        for &mv in &seq {
            check.apply_move(mv);
        }
        assert_eq!(check, PermCoord::default());
    }
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn corner_parity_matches_edge_parity() {
    let mut rng = fastrand::Rng::with_seed(58);
    let phase2 = &tables().phase2;
    for _ in 0..100 {
        let mut cp = CubeState::IDENTITY;
        for _ in 0..rng.usize(0..30) {
            cp.apply_move(rng.usize(0..NMOVES));
        }
        let pc = PermCoord::from(&cp);
        let mut edge_parity = 0u8;
        for i in 0..12 {
            for j in 0..i {
                if edge_perm(cp.e[j]) > edge_perm(cp.e[i]) {
                    edge_parity ^= 1;
                }
            }
        }
        assert_eq!(phase2.corner_parity(&pc), edge_parity);
    }
}

#[test]
fn concurrent_reports_still_emit_in_input_order() {
    use std::sync::Mutex;
    use twophase::{Solution, SolutionSink};

    let sink = Mutex::new(SolutionSink::new(Vec::new(), 50));
    let total = 64u64;
    std::thread::scope(|scope| {
        for worker in 0..4u64 {
            let sink = &sink;
            scope.spawn(move || {
                let mut seq = total - worker;
                while seq >= 1 {
                    let moves = vec![0usize; seq as usize];
                    sink.lock()
                        .unwrap()
                        .report(Solution {
                            pos: CubeState::IDENTITY,
                            seq,
                            phase2_probes: 0,
                            moves,
                        })
                        .unwrap();
                    seq = seq.saturating_sub(4);
                }
            });
        }
    });
    let sink = sink.into_inner().unwrap();
    assert_eq!(sink.solved(), total);
    assert_eq!(sink.pending(), 0);
    let text = String::from_utf8(sink.into_writer()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), total as usize);
    for (i, line) in lines.iter().enumerate() {
        // Line for input k carries k moves, so order is observable.
        assert_eq!(line.len(), 2 * (i + 1));
    }
}

#[test_log::test]
#[ignore = "generates the full pruning tables"]
fn restricted_axes_still_solve() {
    let mut rng = fastrand::Rng::with_seed(59);
    let config = SolverConfig {
        axes_mask: 0b000001,
        ..SolverConfig::default()
    };
    let mut solver = TwoPhaseSolver::new(tables(), config);
    for seq in 1..=5u64 {
        let moves: Vec<usize> = (0..15).map(|_| rng.usize(0..NMOVES)).collect();
        let sol = solver.solve(seq, scrambled(&moves)).expect("verification");
        assert!(sol.moves.len() <= 30);
    }
}
