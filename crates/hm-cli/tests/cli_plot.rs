use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hmetrics"))
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

const DOSE_CSV: &str = "\
dose,score
ctrl,1.2
ctrl,2.4
ctrl,3.1
ctrl,4.0
ctrl,4.8
ctrl,2.9
lowDose,10.5
lowDose,11.2
lowDose,12.9
lowDose,13.4
lowDose,14.1
lowDose,12.2
highDose,20.3
highDose,21.7
highDose,22.4
highDose,23.9
highDose,24.6
highDose,22.8
";

fn fixture(dir: &Path) -> PathBuf {
    let path = dir.join("dose.csv");
    std::fs::write(&path, DOSE_CSV).unwrap();
    path
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn assert_ok(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn assert_error(out: &Output, kind: &str) {
    assert_eq!(out.status.code(), Some(1), "stderr={}", String::from_utf8_lossy(&out.stderr));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.lines().any(|l| l.starts_with(&format!("error[{kind}]"))),
        "expected error[{kind}], stderr={stderr}"
    );
}

#[test]
fn box_plot_to_svg_file() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out_path = dir.path().join("fig.svg");
    let out = run(&[
        "plot",
        "--csv",
        s(&csv),
        "--group",
        "dose",
        "--value",
        "score",
        "--order",
        "ctrl,lowDose,highDose",
        "--nonparametric",
        "--title",
        "Dose response",
        "--out",
        s(&out_path),
    ]);
    assert_ok(&out, "plot");
    assert!(out.stdout.is_empty());

    let svg = std::fs::read_to_string(&out_path).unwrap();
    assert!(svg.contains(">Dose response</text>"));
    assert!(svg.contains(">score</text>"));
    // exact rank-sum p = 2/924 per pair, Holm-adjusted to ~0.0065
    assert_eq!(svg.matches(">**</text>").count(), 3);
}

#[test]
fn svg_goes_to_stdout_without_out() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "score", "--kind", "violin",
        "--points", "strip",
    ]);
    assert_ok(&out, "plot --kind violin");
    let svg = String::from_utf8(out.stdout).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<polygon").count(), 3);
}

#[test]
fn point_plot_with_standard_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "score", "--kind", "POINT",
        "--error", "se:1",
    ]);
    assert_ok(&out, "plot --kind point");
    let svg = String::from_utf8(out.stdout).unwrap();
    assert_eq!(svg.matches("<polyline").count(), 1 + 3);
}

#[test]
fn unsupported_kind_fails_before_reading_input() {
    let out = run(&[
        "plot",
        "--csv",
        "/nonexistent/input.csv",
        "--group",
        "dose",
        "--value",
        "score",
        "--kind",
        "bar",
    ]);
    assert_error(&out, "unsupported_plot_kind");
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_column_is_invalid_column() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out_path = dir.path().join("fig.svg");
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "weight", "--out", s(&out_path),
    ]);
    assert_error(&out, "invalid_column");
    assert!(!out_path.exists());
}

#[test]
fn single_level_order_is_empty_levels() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "score", "--order", "ctrl",
    ]);
    assert_error(&out, "empty_levels");
}

#[test]
fn unknown_correction_is_statistical_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "score", "--padjust", "magic",
    ]);
    assert_error(&out, "statistical_computation");
}

#[test]
fn unsupported_output_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out_path = dir.path().join("fig.gif");
    let tests_path = dir.path().join("tests.json");
    let out = run(&[
        "plot",
        "--csv",
        s(&csv),
        "--group",
        "dose",
        "--value",
        "score",
        "--out",
        s(&out_path),
        "--tests-out",
        s(&tests_path),
    ]);
    assert_error(&out, "unsupported_format");
    assert!(!out_path.exists());
    assert!(!tests_path.exists());
}

#[test]
fn artifact_rerenders_identically() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let fig = dir.path().join("fig.svg");
    let artifact = dir.path().join("artifact.json");
    let tests = dir.path().join("tests.json");
    let out = run(&[
        "plot",
        "--csv",
        s(&csv),
        "--group",
        "dose",
        "--value",
        "score",
        "--nonparametric",
        "--only-sig",
        "--out",
        s(&fig),
        "--artifact-out",
        s(&artifact),
        "--tests-out",
        s(&tests),
    ]);
    assert_ok(&out, "plot --artifact-out");

    let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&artifact).unwrap())
        .expect("artifact should be valid JSON");
    assert_eq!(v["schema_version"], "hmetrics.comparison.v1");
    assert_eq!(v["brackets"].as_array().map(Vec::len), Some(3));

    let t: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&tests).unwrap())
        .expect("tests report should be valid JSON");
    assert_eq!(t["rows"].as_array().map(Vec::len), Some(3));

    let refig = dir.path().join("refig.svg");
    let out = run(&["render", "--artifact", s(&artifact), "--out", s(&refig)]);
    assert_ok(&out, "render");
    assert_eq!(std::fs::read(&fig).unwrap(), std::fs::read(&refig).unwrap());
}

#[test]
fn theme_and_config_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let config = dir.path().join("viz.yaml");
    let yaml = "figure:\n  width: 500\n  height: 300\nannotations:\n  enabled: false\n";
    std::fs::write(&config, yaml).unwrap();
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "score", "--config", s(&config),
        "--theme", "ticks",
    ]);
    assert_ok(&out, "plot --config");
    let svg = String::from_utf8(out.stdout).unwrap();
    assert!(svg.contains(r#"width="500" height="300""#));
    assert!(!svg.contains(">**</text>"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("without brackets"));
}

#[test]
fn bad_theme_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let csv = fixture(dir.path());
    let out = run(&[
        "plot", "--csv", s(&csv), "--group", "dose", "--value", "score", "--theme", "atlas",
    ]);
    assert_error(&out, "config");
}

#[test]
fn version_prints_crate_version() {
    let out = run(&["version"]);
    assert_ok(&out, "version");
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.trim(), format!("hmetrics {}", env!("CARGO_PKG_VERSION")));
}
