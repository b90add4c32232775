use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

fn listbench() -> Command {
    Command::cargo_bin("listbench").unwrap()
}

fn timing_lines(stdout: &[u8]) -> Vec<f64> {
    let text = String::from_utf8(stdout.to_vec()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Time(seconds)"));
    lines
        .map(|line| {
            let (_, decimals) = line.split_at(line.find('.').unwrap());
            assert_eq!(decimals.len(), 7, "`{}` should have 6 decimals", line);
            line.parse::<f64>().unwrap()
        })
        .collect()
}

#[test]
fn five_runs_print_five_lines() {
    let output = listbench()
        .args(&[
            "--policy", "mutex", "-n", "1000", "-m", "10000", "--member", "0.8", "--insert",
            "0.1", "--delete", "0.1", "--runs", "5", "--threads", "4",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let trials = timing_lines(&output.stdout);
    assert_eq!(trials.len(), 5);
    assert!(trials.iter().all(|secs| *secs >= 0.0));
}

#[test]
fn serial_and_rwlock_policies_run() {
    for policy in &["serial", "rwlock"] {
        let output = listbench()
            .args(&[
                "--policy", *policy, "-n", "200", "-m", "2000", "--runs", "2", "--threads", "2",
                "--seed", "7",
            ])
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", policy);
        assert_eq!(timing_lines(&output.stdout).len(), 2);
    }
}

#[test]
fn bad_mix_exits_non_zero() {
    listbench()
        .args(&[
            "--policy", "mutex", "--member", "0.5", "--insert", "0.1", "--delete", "0.1",
        ])
        .assert()
        .failure()
        .stderr(contains("Fractions must sum to 1.0"));
}

#[test]
fn zero_threads_exits_non_zero() {
    listbench()
        .args(&["--policy", "rwlock", "--threads", "0", "--runs", "1"])
        .assert()
        .failure()
        .stderr(contains("Number of threads must be > 0"));
}

#[test]
fn json_output_names_every_policy() {
    let output = listbench()
        .args(&[
            "--format", "json", "-n", "50", "-m", "500", "--runs", "1", "--threads", "2",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    let policies: Vec<String> = text
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["trials"].as_array().unwrap().len(), 1);
            value["policy"].as_str().unwrap().to_owned()
        })
        .collect();
    assert_eq!(policies, vec!["serial", "mutex", "rwlock"]);
}

#[test]
fn unknown_policy_is_rejected() {
    listbench().args(&["--policy", "spin"]).assert().failure();
}

#[test]
fn text_blocks_are_labelled_on_stderr() {
    let output = listbench()
        .args(&["-n", "50", "-m", "500", "--runs", "2", "--threads", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("Time(seconds)").count(), 3);
    assert_eq!(stdout.lines().count(), 9);
    let stderr = String::from_utf8(output.stderr).unwrap();
    for policy in &["serial", "mutex", "rwlock"] {
        assert!(
            stderr.contains(&format!("Timings of {} (2 trials)", policy)),
            "{}",
            stderr
        );
    }
}
