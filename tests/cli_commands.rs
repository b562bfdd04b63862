//! CLI command dispatch tests: spec validation, dry runs, and the
//! failure messages commands return at the boundary.

use std::io::Write;
use std::path::PathBuf;

use retirar::cli::run_command;
use retirar::config::parse_args;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).expect("create file");
    f.write_all(content.as_bytes()).expect("write file");
    path
}

fn minimal_workspace(dir: &TempDir) -> PathBuf {
    write(dir, "labels.csv", "drug,withdrawn\npos0,1\npos1,1\npos2,1\npos3,1\npos4,1\nneg0,0\nneg1,0\nneg2,0\nneg3,0\nneg4,0\n");
    for name in ["inhibition.csv", "fingerprint.csv", "chemprops.csv", "targetannot.csv"] {
        let mut table = String::new();
        for i in 0..5 {
            table.push_str(&format!("pos{i},0.9,0.8\n"));
            table.push_str(&format!("neg{i},0.1,0.2\n"));
        }
        write(dir, name, &table);
    }
    let spec = format!(
        "\
data:
  labels: {0}/labels.csv
  features:
    inhibition: {0}/inhibition.csv
    fingerprint: {0}/fingerprint.csv
    chemprops: {0}/chemprops.csv
    targetannot: {0}/targetannot.csv
split:
  train_fraction: 0.6
  rounds: 1
output:
  dir: {0}/run
",
        dir.path().display()
    );
    write(dir, "run.yaml", &spec)
}

#[test]
fn validate_accepts_a_good_spec() {
    let dir = TempDir::new().expect("tempdir");
    let spec = minimal_workspace(&dir);
    let cli = parse_args(["retirar", "--quiet", "validate", spec.to_str().unwrap(), "--detailed"])
        .expect("parses");
    assert!(run_command(cli).is_ok());
}

#[test]
fn validate_reports_missing_data_files() {
    let dir = TempDir::new().expect("tempdir");
    let spec = write(
        &dir,
        "broken.yaml",
        "\
data:
  labels: nowhere/labels.csv
  features:
    inhibition: nowhere/a.csv
    fingerprint: nowhere/b.csv
    chemprops: nowhere/c.csv
    targetannot: nowhere/d.csv
",
    );
    let cli = parse_args(["retirar", "--quiet", "validate", spec.to_str().unwrap(), "--detailed"])
        .expect("parses");
    let err = run_command(cli).expect_err("missing files fail");
    assert!(err.contains("missing"));
}

#[test]
fn validate_rejects_a_bad_value() {
    let dir = TempDir::new().expect("tempdir");
    let spec = write(
        &dir,
        "bad.yaml",
        "\
data:
  labels: l.csv
  features:
    inhibition: a.csv
    fingerprint: b.csv
    chemprops: c.csv
    targetannot: d.csv
split:
  train_fraction: 2.0
",
    );
    let cli =
        parse_args(["retirar", "--quiet", "validate", spec.to_str().unwrap()]).expect("parses");
    let err = run_command(cli).expect_err("bad fraction fails");
    assert!(err.contains("train_fraction"));
}

#[test]
fn tune_dry_run_checks_data_paths() {
    let dir = TempDir::new().expect("tempdir");
    let spec = minimal_workspace(&dir);
    let cli =
        parse_args(["retirar", "--quiet", "tune", spec.to_str().unwrap(), "--dry-run"])
            .expect("parses");
    assert!(run_command(cli).is_ok());

    // Break one feature path and the dry run must fail.
    std::fs::remove_file(dir.path().join("chemprops.csv")).expect("remove");
    let cli =
        parse_args(["retirar", "--quiet", "tune", spec.to_str().unwrap(), "--dry-run"])
            .expect("parses");
    let err = run_command(cli).expect_err("missing feature file fails");
    assert!(err.contains("chemprops.csv"));
}

#[test]
fn stack_without_a_tune_run_explains_itself() {
    let dir = TempDir::new().expect("tempdir");
    let spec = minimal_workspace(&dir);
    let cli = parse_args(["retirar", "--quiet", "stack", spec.to_str().unwrap()]).expect("parses");
    let err = run_command(cli).expect_err("no run dir yet");
    assert!(err.contains("tune"));
}

#[test]
fn info_renders_a_digest() {
    let dir = TempDir::new().expect("tempdir");
    let spec = minimal_workspace(&dir);
    let cli = parse_args(["retirar", "info", spec.to_str().unwrap()]).expect("parses");
    assert!(run_command(cli).is_ok());

    let cli = parse_args(["retirar", "info", spec.to_str().unwrap(), "--json"]).expect("parses");
    assert!(run_command(cli).is_ok());
}

#[test]
fn summarize_requires_an_existing_summary() {
    let cli =
        parse_args(["retirar", "--quiet", "summarize", "no_such_summary.csv"]).expect("parses");
    assert!(run_command(cli).is_err());
}
