use anyhow::{Result, ensure};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::io::Write;

use stationdle_game::{GameEngine, StationGame, derive_seed};

/// Outcome of one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolveRecord {
    pub seed: u64,
    pub guesses: u32,
    pub solved: bool,
}

/// Solver statistics across every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveAggregate {
    pub games: usize,
    pub solve_rate: f64,
    pub mean_guesses: f64,
    pub std_guesses: f64,
    pub min_guesses: u32,
    pub max_guesses: u32,
}

/// Play `iterations` games per seed with a solver that guesses a random
/// remaining candidate each turn.
///
/// Games are capped at one guess per station; a pool emptied by a
/// disconnected clue falls back to guessing from the whole dataset.
///
/// # Errors
///
/// Returns an error if `iterations` is zero or a guess is rejected.
pub fn run_simulation(
    engine: &GameEngine,
    seeds: &[u64],
    iterations: usize,
) -> Result<Vec<SolveRecord>> {
    ensure!(iterations > 0, "simulation needs at least one iteration");
    let mut records = Vec::with_capacity(seeds.len() * iterations);

    for &seed in seeds {
        let mut game = engine.create_seeded_session(seed);
        let mut solver = SmallRng::seed_from_u64(derive_seed(seed, b"solver"));
        for iteration in 0..iterations {
            if iteration > 0 {
                game.new_game();
            }
            records.push(solve_one(&mut game, &mut solver, seed)?);
        }
    }
    Ok(records)
}

fn solve_one(game: &mut StationGame, solver: &mut SmallRng, seed: u64) -> Result<SolveRecord> {
    let cap = u32::try_from(game.index().len()).unwrap_or(u32::MAX);
    while !game.is_solved() && game.guesses() < cap {
        let pool: Vec<String> = if game.remaining().is_empty() {
            game.index().names().map(str::to_string).collect()
        } else {
            game.remaining_stations()
                .iter()
                .map(|s| s.name.clone())
                .collect()
        };
        let Some(pick) = pool.choose(solver) else {
            break;
        };
        let _ = game.evaluate_guess(pick)?;
    }
    log::debug!(
        "seed {seed}: {} in {} guesses",
        game.reveal_answer(),
        game.guesses()
    );
    Ok(SolveRecord {
        seed,
        guesses: game.guesses(),
        solved: game.is_solved(),
    })
}

#[must_use]
pub fn aggregate(records: &[SolveRecord]) -> SolveAggregate {
    let games = records.len();
    if games == 0 {
        return SolveAggregate {
            games,
            solve_rate: 0.0,
            mean_guesses: 0.0,
            std_guesses: 0.0,
            min_guesses: 0,
            max_guesses: 0,
        };
    }
    let count = games as f64;
    let solved = records.iter().filter(|r| r.solved).count() as f64;
    let mean = records.iter().map(|r| f64::from(r.guesses)).sum::<f64>() / count;
    let variance = records
        .iter()
        .map(|r| (f64::from(r.guesses) - mean).powi(2))
        .sum::<f64>()
        / count;
    SolveAggregate {
        games,
        solve_rate: solved / count,
        mean_guesses: mean,
        std_guesses: variance.sqrt(),
        min_guesses: records.iter().map(|r| r.guesses).min().unwrap_or(0),
        max_guesses: records.iter().map(|r| r.guesses).max().unwrap_or(0),
    }
}

/// Write the aggregate as a console summary.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_console_summary(out: &mut dyn Write, summary: &SolveAggregate) -> Result<()> {
    writeln!(out, "🧠 Solver simulation")?;
    writeln!(out, "  games:        {}", summary.games)?;
    writeln!(out, "  solve rate:   {:.1}%", summary.solve_rate * 100.0)?;
    writeln!(
        out,
        "  guesses:      mean {:.2} ± {:.2} (min {}, max {})",
        summary.mean_guesses, summary.std_guesses, summary.min_guesses, summary.max_guesses
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stationdle_game::{DatasetIndex, EngineConfig, StationData};
    use std::sync::Arc;

    fn engine() -> GameEngine {
        let data = StationData::from_json(
            r#"[
                { "id": 1, "name": "Alder", "nearStation": [2], "district": "X", "year": 1990, "line": ["1"] },
                { "id": 2, "name": "Birch", "nearStation": [1, 3], "district": "Y", "year": 2000, "line": ["1", "2"] },
                { "id": 3, "name": "Cedar", "nearStation": [2, 4], "district": "X", "year": 1990, "line": ["2"] },
                { "id": 4, "name": "Dune", "nearStation": [3], "district": "Z", "year": 2012, "line": ["2", "3"] }
            ]"#,
        )
        .unwrap();
        GameEngine::from_index(
            Arc::new(DatasetIndex::new(data).unwrap()),
            EngineConfig::default(),
        )
    }

    #[test]
    fn solver_always_finishes_on_connected_data() {
        let records = run_simulation(&engine(), &[1, 2, 3], 5).unwrap();
        assert_eq!(records.len(), 15);
        assert!(records.iter().all(|r| r.solved));
        assert!(records.iter().all(|r| (1..=4).contains(&r.guesses)));
    }

    #[test]
    fn simulation_is_deterministic_per_seed() {
        let first = run_simulation(&engine(), &[42], 8).unwrap();
        let second = run_simulation(&engine(), &[42], 8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_iterations_are_rejected() {
        assert!(run_simulation(&engine(), &[1], 0).is_err());
    }

    #[test]
    fn aggregate_summarizes_records() {
        let records = [
            SolveRecord { seed: 1, guesses: 1, solved: true },
            SolveRecord { seed: 1, guesses: 3, solved: true },
            SolveRecord { seed: 2, guesses: 4, solved: false },
        ];
        let summary = aggregate(&records);
        assert_eq!(summary.games, 3);
        assert!((summary.mean_guesses - 8.0 / 3.0).abs() < 1e-9);
        assert!((summary.solve_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.min_guesses, 1);
        assert_eq!(summary.max_guesses, 4);

        let mut out = Vec::new();
        write_console_summary(&mut out, &summary).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("games:        3"));
        assert_eq!(aggregate(&[]).games, 0);
    }
}
