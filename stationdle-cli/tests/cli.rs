use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../stationdle-game/tests/fixtures/stations.json"
);

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "stationdle-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&content).expect("valid json")
}

#[test]
fn cli_scripted_play_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_stationdle");
    let output_path = temp_path("play");
    let status = Command::new(exe)
        .args(["--data", FIXTURE, "--seed", "7", "--answer", "Stadium"])
        .args(["--guesses", "Market,University,Stadium", "--report", "json"])
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let report = read_json(&output_path);
    assert_eq!(report["answer"], "Stadium");
    assert_eq!(report["solved"], true);
    let guesses = report["guesses"].as_array().unwrap();
    assert_eq!(guesses.len(), 3);
    assert_eq!(guesses[0]["remain"].as_array().unwrap().len(), 3);
    assert_eq!(guesses[2]["correct"], true);
}

#[test]
fn cli_simulation_reports_summary() {
    let exe = env!("CARGO_BIN_EXE_stationdle");
    let output_path = temp_path("simulate");
    let status = Command::new(exe)
        .args(["--data", FIXTURE, "--mode", "simulate"])
        .args(["--seeds", "1,2", "--iterations", "4", "--report", "json"])
        .arg("--output")
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let report = read_json(&output_path);
    assert_eq!(report["summary"]["games"], 8);
    assert_eq!(report["summary"]["solve_rate"], 1.0);
    assert_eq!(report["records"].as_array().unwrap().len(), 8);
}

#[test]
fn cli_rejects_unknown_guess() {
    let exe = env!("CARGO_BIN_EXE_stationdle");
    let output = Command::new(exe)
        .args(["--data", FIXTURE, "--guesses", "Atlantis"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown station"));
}

#[test]
fn cli_rejects_missing_dataset() {
    let exe = env!("CARGO_BIN_EXE_stationdle");
    let output = Command::new(exe)
        .args(["--data", "/nonexistent/stations.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to prepare dataset"));
}

#[test]
fn cli_interactive_session_reads_stdin() {
    let exe = env!("CARGO_BIN_EXE_stationdle");
    let mut child = Command::new(exe)
        .args(["--data", FIXTURE, "--answer", "Depot"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(b"?Ma\nDepot\n!reveal\n!quit\n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Market"));
    assert!(stdout.contains("Solved in 1 guesses"));
    assert!(stdout.contains("Depot"));
}

#[test]
fn cli_interactive_replies_before_stdin_closes() {
    let exe = env!("CARGO_BIN_EXE_stationdle");
    let mut child = Command::new(exe)
        .args(["--data", FIXTURE, "--answer", "Depot"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn cli");
    let mut stdin = child.stdin.take().expect("stdin handle");
    let stdout = child.stdout.take().expect("stdout handle");

    let (tx, rx) = mpsc::channel();
    let reader = std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    stdin.write_all(b"Market\n").expect("write guess");
    stdin.flush().expect("flush guess");

    let mut seen = Vec::new();
    while !seen.iter().any(|l: &String| l.contains("hops")) {
        match rx.recv_timeout(Duration::from_secs(10)) {
            Ok(line) => seen.push(line),
            Err(_) => break,
        }
    }
    // Stdin is still open here, so everything seen was flushed mid-session.
    assert!(seen.iter().any(|l| l.contains("Guess a station")), "{seen:?}");
    assert!(
        seen.iter().any(|l| l.contains("Market") && l.contains("hops")),
        "{seen:?}"
    );

    drop(stdin);
    assert!(child.wait().expect("wait cli").success());
    reader.join().expect("reader thread");
}
