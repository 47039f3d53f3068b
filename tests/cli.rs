use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const UNBALANCED: &str = "\
generateur(G1,60).
generateur(G2,60).
maison(M1,NORMAL).
maison(M2,NORMAL).
maison(M3,NORMAL).
connexion(G1,M1).
connexion(G1,M2).
connexion(G1,M3).
";

fn network_file(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("network.txt");
    fs::write(&path, text).unwrap();
    path
}

fn grid_allocator() -> Command {
    let mut cmd = Command::cargo_bin("grid-allocator").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn show_prints_network_and_cost() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, UNBALANCED);

    grid_allocator()
        .arg("show")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("G1"))
        .stdout(predicate::str::contains("Total consumption: 60 kW"))
        .stdout(predicate::str::contains("Cost: 1.0000"));
}

#[test]
fn show_json_reports_cost_terms() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, UNBALANCED);

    let output = grid_allocator()
        .args(["show", "--json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["valid"], serde_json::json!(true));
    assert_eq!(summary["generators"].as_array().unwrap().len(), 2);
}

#[test]
fn optimize_descent_saves_a_cheaper_network() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, UNBALANCED);
    let output = dir.path().join("balanced.txt");

    grid_allocator()
        .args(["optimize", "--reject-ties", "-o"])
        .arg(&output)
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cost: 1.0000 -> 0.3333"))
        .stdout(predicate::str::contains("Saved to"));

    let saved = fs::read_to_string(&output).unwrap();
    assert!(saved.contains(",G2)."));
}

#[test]
fn optimize_random_is_reproducible_with_a_seed() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, UNBALANCED);

    let run = || {
        grid_allocator()
            .args(["optimize", "--strategy", "random", "-k", "100", "--seed", "42"])
            .arg(&path)
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn incomplete_file_fails_with_message() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, "generateur(G1,60).\nmaison(M1,BASSE).\n");

    grid_allocator()
        .arg("show")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("M1"));
}

#[test]
fn negative_lambda_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, UNBALANCED);

    grid_allocator()
        .args(["show", "--lambda=-1"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn zero_pass_cap_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = network_file(&dir, UNBALANCED);

    grid_allocator()
        .args(["optimize", "--max-passes", "0"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("pass cap").not());
}
