use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

fn write_dumps(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let yahoo = dir.join("plaintxt_yahoo.txt");
    let csdn = dir.join("www.csdn.net.sql");
    {
        let mut f = fs::File::create(&yahoo).unwrap();
        writeln!(f, "1:alice@yahoo.com:alice1990").unwrap();
        writeln!(f, "2:bob@yahoo.com:20230401love").unwrap();
        writeln!(f, "3:carol@yahoo.com:123456").unwrap();
        writeln!(f, "malformed").unwrap();
    }
    {
        let mut f = fs::File::create(&csdn).unwrap();
        writeln!(f, "zhangsan # 123456 # zs@csdn.net").unwrap();
        writeln!(f, "lisi # 01-02-2020 # ls@csdn.net").unwrap();
        writeln!(f, "wangwu # 0214love # ww@csdn.net").unwrap();
    }
    (yahoo, csdn)
}

#[test]
fn e2e_runs_and_writes_outputs() {
    let tmp = tempdir().unwrap();
    let (yahoo, csdn) = write_dumps(tmp.path());
    let outdir = tmp.path().join("out");

    let mut cmd = Command::cargo_bin("leakstat").unwrap();
    cmd.arg("-a")
        .arg(&yahoo)
        .arg("-b")
        .arg(&csdn)
        .arg("-o")
        .arg(&outdir)
        .arg("--color")
        .arg("never");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cross-Corpus Comparison"));

    let report = fs::read_to_string(outdir.join("password_analysis_report.txt")).unwrap();
    assert!(report.contains("Yahoo Date Statistics"));
    assert!(report.contains("LLLLLNNNN: 1"));
    assert!(report.contains("NNNNNNNNLLLL: 1"));
    assert!(report.contains("[DDMMYYYY] Top-10:\n01022020: 1"));
    assert!(report.contains("'123456': 2 total (Yahoo 1, CSDN 1)"));
    assert!(outdir.join("Yahoo_top_years.svg").exists());
    assert!(outdir.join("CSDN_top_monthdays.svg").exists());
}

#[test]
fn missing_inputs_still_produce_report() {
    let tmp = tempdir().unwrap();
    let outdir = tmp.path().join("out");
    let mut cmd = Command::cargo_bin("leakstat").unwrap();
    cmd.arg("-a")
        .arg(tmp.path().join("missing-yahoo.txt"))
        .arg("-b")
        .arg(tmp.path().join("missing-csdn.sql"))
        .arg("-o")
        .arg(&outdir)
        .arg("-q");
    cmd.assert().success();

    let report = fs::read_to_string(outdir.join("password_analysis_report.txt")).unwrap();
    assert!(report.contains("Passwords containing a date: 0 (0.00%)"));
    let charts = fs::read_dir(&outdir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "svg"))
        .count();
    assert_eq!(charts, 0);
}

#[test]
fn source_kinds_and_labels_are_configurable() {
    let tmp = tempdir().unwrap();
    let plain = tmp.path().join("list.txt");
    fs::write(&plain, "summer2019\nsummer2019\n").unwrap();
    let other = tmp.path().join("other.txt");
    fs::write(&other, "x:y:summer2019\n").unwrap();
    let outdir = tmp.path().join("out");
    let mut cmd = Command::cargo_bin("leakstat").unwrap();
    cmd.arg("-a")
        .arg(&plain)
        .arg("--first-kind")
        .arg("plain")
        .arg("--first-label")
        .arg("Wordlist")
        .arg("-b")
        .arg(&other)
        .arg("--second-kind")
        .arg("colon")
        .arg("--second-label")
        .arg("Other")
        .arg("-o")
        .arg(&outdir)
        .arg("--top")
        .arg("3")
        .arg("--no-charts")
        .arg("--csv")
        .arg("--parallel")
        .arg("-q");
    cmd.assert().success();

    let report = fs::read_to_string(outdir.join("password_analysis_report.txt")).unwrap();
    assert!(report.contains("Wordlist Top-3 Years"));
    assert!(report.contains("'summer2019': 3 total (Wordlist 2, Other 1)"));
    assert!(!outdir.join("Wordlist_top_years.svg").exists());
    let years = fs::read_to_string(outdir.join("Wordlist_years.csv")).unwrap();
    assert_eq!(years, "Year,Count\n2019,2\n");
    assert!(outdir.join("common_passwords.csv").exists());
}

#[test]
fn unwritable_output_causes_non_zero_exit() {
    let tmp = tempdir().unwrap();
    let (yahoo, csdn) = write_dumps(tmp.path());
    let outdir = tmp.path().join("out");
    fs::write(&outdir, b"not a dir").unwrap();
    let mut cmd = Command::cargo_bin("leakstat").unwrap();
    cmd.arg("-a")
        .arg(&yahoo)
        .arg("-b")
        .arg(&csdn)
        .arg("-o")
        .arg(&outdir)
        .arg("-q");
    cmd.assert().failure().code(4);
}

#[test]
fn colliding_labels_are_rejected_before_writing() {
    let tmp = tempdir().unwrap();
    let first = tmp.path().join("a.txt");
    fs::write(&first, "x:y:alice1990\n").unwrap();
    let second = tmp.path().join("b.sql");
    fs::write(&second, "u # nodate # m\n").unwrap();
    let outdir = tmp.path().join("out");
    let mut cmd = Command::cargo_bin("leakstat").unwrap();
    cmd.arg("-a")
        .arg(&first)
        .arg("--first-label")
        .arg("site.a")
        .arg("-b")
        .arg(&second)
        .arg("--second-label")
        .arg("site_a")
        .arg("-o")
        .arg(&outdir)
        .arg("--csv")
        .arg("-q");
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("same output file names"));
    assert!(!outdir.join("site_a_years.csv").exists());
    assert!(!outdir.join("site_a_patterns.svg").exists());
}

#[test]
fn mmap_threshold_and_streaming_works() {
    let tmp = tempdir().unwrap();
    let (yahoo, csdn) = write_dumps(tmp.path());

    let mut e = leakstat::engine::Engine::new();
    e.load_from_file_paths_with_threshold(
        ("Yahoo", leakstat::source::SourceKind::Colon, &yahoo),
        ("CSDN", leakstat::source::SourceKind::Hash, &csdn),
        32,
        false,
    );
    assert_eq!(e.first.passwords, vec!["alice1990", "20230401love", "123456"]);
    assert_eq!(e.first.skipped_lines, 1);
    assert_eq!(e.second.len(), 3);
}
