use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quickprof").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_argument_prints_usage_and_writes_nothing() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .assert()
        .code(1)
        .stdout(contains("Usage: quickprof <data_file>"));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn second_argument_prints_usage_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "x\n1\n").unwrap();
    fs::write(dir.path().join("b.csv"), "x\n2\n").unwrap();

    cmd(&dir)
        .args(["a.csv", "b.csv"])
        .assert()
        .code(1)
        .stdout(contains("Usage: quickprof <data_file>"));

    assert!(!dir.path().join("report.html").exists());
    assert!(!dir.path().join("images").exists());
}

#[test]
fn unknown_flag_prints_usage() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .args(["--quiet", "a.csv"])
        .assert()
        .code(1)
        .stdout(contains("Usage: quickprof <data_file>"));
}

#[test]
fn generates_report_in_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("people.csv"),
        "age,city\n30,Oslo\n41,Lima\n25,Oslo\n,Pune\n",
    )
    .unwrap();

    cmd(&dir)
        .arg("people.csv")
        .assert()
        .success()
        .stdout(contains("Report generated: report.html"));

    let report = fs::read_to_string(dir.path().join("report.html")).unwrap();
    assert!(report.contains("data:image/png;base64,"));
    assert!(dir.path().join("images/hist_age.png").is_file());
    assert!(dir.path().join("images/bar_city.png").is_file());
    assert!(dir.path().join("images/missing_values.png").is_file());
}

#[test]
fn unsupported_extension_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("data.json"), "{}").unwrap();

    cmd(&dir)
        .arg("data.json")
        .assert()
        .code(1)
        .stderr(contains("Unsupported file format"));

    assert!(!dir.path().join("report.html").exists());
    assert!(!dir.path().join("images").exists());
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .arg("absent.csv")
        .assert()
        .code(1)
        .stderr(contains("Error loading data"));
}

#[test]
fn help_exits_successfully() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("data_file"));
}
