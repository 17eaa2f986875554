use predicates::str::{contains, diff};
use std::fs;

#[test]
fn show_config_prints_resolved_configuration() {
    let expected = concat!(
        "Customers: 12\n",
        "Seed: 42\n",
        "Inter-arrival: uniform[1, 8)\n",
        "Service: constant(2.5)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bank-sim");
    cmd.args([
        "show-config",
        "-n",
        "12",
        "--seed",
        "42",
        "--service",
        "constant:2.5",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn show_config_defaults() {
    let expected = concat!(
        "Customers: 500\n",
        "Seed: random\n",
        "Inter-arrival: uniform[1, 8)\n",
        "Service: uniform[1, 6)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bank-sim");
    cmd.arg("show-config");
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn output_dir_receives_result_files() {
    let base = std::env::temp_dir().join(format!("bank-sim-out-{}", std::process::id()));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("bank-sim");
    cmd.args([
        "run",
        "-n",
        "10",
        "--seed",
        "3",
        "--summary",
        "--output-dir",
        base.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stderr(contains("Results saved to: "));

    let runs: Vec<_> = fs::read_dir(&base)
        .expect("output dir should exist")
        .map(|entry| entry.expect("entry should be readable").path())
        .collect();
    assert_eq!(runs.len(), 1);
    let run_dir = &runs[0];
    for file in ["metrics.json", "customer_data.csv", "summary.txt"] {
        assert!(run_dir.join(file).is_file(), "missing {}", file);
    }
    let csv = fs::read_to_string(run_dir.join("customer_data.csv")).unwrap();
    assert_eq!(csv.lines().count(), 11);

    fs::remove_dir_all(&base).ok();
}
