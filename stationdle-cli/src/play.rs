use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{BufRead, Write};

use stationdle_game::{GameError, GuessResult, IndexError, LineOverlap, StationGame};

const SUGGESTION_LIMIT: usize = 5;

/// Outcome of a scripted game, used for JSON reports.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    pub answer: String,
    pub solved: bool,
    pub guesses: Vec<Value>,
}

/// Render one guess as a single console line.
pub fn render_guess(out: &mut dyn Write, turn: u32, result: &GuessResult<'_>) -> Result<()> {
    let name = if result.correct {
        result.station.name.bright_green().bold()
    } else {
        result.station.name.bold()
    };
    let district = if result.attributes.district {
        "district ✓".green()
    } else {
        "district ✗".red()
    };
    let lines = match result.attributes.line {
        LineOverlap::Every => "lines every".green(),
        LineOverlap::Some => "lines some".yellow(),
        LineOverlap::None => "lines none".red(),
    };
    let year = match result.attributes.year {
        y if y > 0 => "opened later",
        y if y < 0 => "opened earlier",
        _ => "same year",
    };
    writeln!(
        out,
        "#{turn:<3} {name:<20} hops {:<3} transfers {:<3} {district}  {lines}  {year}  ({} left)",
        result.min_stations.to_string(),
        result.min_transfer.to_string(),
        result.remain.len()
    )?;
    Ok(())
}

/// Evaluate a fixed list of guesses, stopping at the first correct one.
///
/// # Errors
///
/// Returns an error if a guess is not a known station or output fails.
pub fn run_scripted(
    game: &mut StationGame,
    guesses: &[String],
    json: bool,
    out: &mut dyn Write,
) -> Result<PlayReport> {
    let mut records = Vec::with_capacity(guesses.len());
    for name in guesses {
        let result = game
            .evaluate_guess(name)
            .with_context(|| format!("guess {name:?} rejected"))?;
        let correct = result.correct;
        if json {
            records.push(serde_json::to_value(&result)?);
        } else {
            render_guess(out, game_turn(records.len()), &result)?;
            records.push(Value::Null);
        }
        if correct {
            break;
        }
    }

    let report = PlayReport {
        answer: game.reveal_answer().to_string(),
        solved: game.is_solved(),
        guesses: records,
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else if report.solved {
        writeln!(
            out,
            "{}",
            format!("🎉 Solved in {} guesses", game.guesses()).bright_green()
        )?;
    } else {
        writeln!(
            out,
            "Not solved after {} guesses; {} candidates remain",
            game.guesses(),
            game.remaining().len()
        )?;
    }
    Ok(report)
}

fn game_turn(recorded: usize) -> u32 {
    u32::try_from(recorded + 1).unwrap_or(u32::MAX)
}

/// Read guesses and commands line by line until `!quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn run_interactive(
    game: &mut StationGame,
    input: impl BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(
        out,
        "Guess a station. Commands: ?prefix, !left, !reveal, !new, !quit"
    )?;
    out.flush()?;
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let entry = line.trim();
        match entry {
            "" => continue,
            "!quit" => break,
            "!reveal" => writeln!(out, "Answer: {}", game.reveal_answer().bold())?,
            "!new" => {
                game.new_game();
                writeln!(out, "{}", "New game started".cyan())?;
            }
            "!left" => {
                let names: Vec<&str> = game
                    .remaining_stations()
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect();
                writeln!(out, "{} left: {}", names.len(), names.join(", "))?;
            }
            _ if entry.starts_with('?') => {
                let hits = game.index().suggest(&entry[1..], SUGGESTION_LIMIT);
                writeln!(out, "{}", hits.join(", "))?;
            }
            _ if entry.starts_with('!') => {
                writeln!(out, "⚠️  Unknown command: {}", entry.yellow())?;
            }
            name => interactive_guess(game, name, out)?,
        }
        // Flush so a buffered stdout shows each reply before the next read.
        out.flush()?;
    }
    Ok(())
}

fn interactive_guess(game: &mut StationGame, name: &str, out: &mut dyn Write) -> Result<()> {
    let turn = game.guesses().saturating_add(1);
    match game.evaluate_guess(name) {
        Ok(result) => {
            render_guess(out, turn, &result)?;
            if result.correct {
                writeln!(
                    out,
                    "{}",
                    format!("🎉 Solved in {turn} guesses").bright_green()
                )?;
            }
        }
        Err(GameError::Index(IndexError::UnknownStation(_))) => {
            let hits = game.index().suggest(name, SUGGESTION_LIMIT);
            writeln!(out, "⚠️  Unknown station: {}", name.yellow())?;
            if !hits.is_empty() {
                writeln!(out, "   Did you mean: {}", hits.join(", "))?;
            }
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stationdle_game::{DatasetIndex, EngineConfig, StationData};
    use std::sync::Arc;

    fn game(target: &str) -> StationGame {
        let data = StationData::from_json(
            r#"[
                { "id": 1, "name": "Alder", "nearStation": [2], "district": "X", "year": 1990, "line": ["1"] },
                { "id": 2, "name": "Birch", "nearStation": [1, 3], "district": "Y", "year": 2000, "line": ["1", "2"] },
                { "id": 3, "name": "Cedar", "nearStation": [2], "district": "X", "year": 1990, "line": ["2"] }
            ]"#,
        )
        .unwrap();
        let index = Arc::new(DatasetIndex::new(data).unwrap());
        let mut game = StationGame::from_seed(index, EngineConfig::default(), 1);
        game.override_answer(target).unwrap();
        game
    }

    fn as_text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn scripted_play_stops_at_correct_guess() {
        let mut g = game("Cedar");
        let mut out = Vec::new();
        let guesses = vec!["Alder".to_string(), "Cedar".to_string(), "Birch".to_string()];
        let report = run_scripted(&mut g, &guesses, false, &mut out).unwrap();
        assert!(report.solved);
        assert_eq!(report.guesses.len(), 2);
        assert_eq!(report.answer, "Cedar");
        let text = as_text(out);
        assert!(text.contains("Alder"));
        assert!(text.contains("Solved in 2 guesses"));
    }

    #[test]
    fn scripted_json_report_carries_results() {
        let mut g = game("Cedar");
        let mut out = Vec::new();
        let report = run_scripted(&mut g, &["Alder".to_string()], true, &mut out).unwrap();
        assert!(!report.solved);
        assert_eq!(report.guesses[0]["minStations"], serde_json::json!(2));
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["answer"], Value::from("Cedar"));
    }

    #[test]
    fn scripted_play_rejects_unknown_station() {
        let mut g = game("Cedar");
        let mut out = Vec::new();
        let err = run_scripted(&mut g, &["Nowhere".to_string()], false, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("unknown station"));
    }

    #[test]
    fn interactive_session_handles_commands() {
        let mut g = game("Cedar");
        let mut out = Vec::new();
        let input = "?b\nBirc\nAlder\n!left\n!reveal\n!bogus\nCedar\n!quit\nBirch\n";
        run_interactive(&mut g, input.as_bytes(), &mut out).unwrap();
        let text = as_text(out);
        assert!(text.contains("Birch"));
        assert!(text.contains("Unknown station"));
        assert!(text.contains("Did you mean"));
        assert!(text.contains("1 left: Cedar"));
        assert!(text.contains("Answer"));
        assert!(text.contains("Unknown command"));
        assert!(text.contains("Solved in 2 guesses"));
        // Input after !quit is ignored.
        assert_eq!(g.guesses(), 2);
    }

    struct FlushCounter {
        written: Vec<u8>,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn interactive_session_flushes_after_every_reply() {
        let mut g = game("Cedar");
        let mut out = FlushCounter {
            written: Vec::new(),
            flushes: 0,
        };
        run_interactive(&mut g, "Alder\n\nNowhere\n!left\n".as_bytes(), &mut out).unwrap();
        // Prompt plus three replies; the blank line gets none.
        assert_eq!(out.flushes, 4);
        let text = as_text(out.written);
        assert!(text.contains("Unknown station"));
        assert_eq!(g.guesses(), 1);
    }
}
