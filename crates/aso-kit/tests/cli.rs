//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("Options:"));
}

#[test]
fn short_help_flag_shows_usage() {
    cmd()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn short_version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn info_json_contains_expected_fields() {
    cmd()
        .arg("info")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\""))
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn info_help_shows_command_options() {
    cmd()
        .args(["info", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--json"));
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn short_quiet_flag_accepted() {
    cmd().args(["-q", "info"]).assert().success();
}

#[test]
fn verbose_flag_accepted() {
    cmd().args(["--verbose", "info"]).assert().success();
}

#[test]
fn short_verbose_flag_accepted() {
    cmd().args(["-v", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_auto_accepted() {
    cmd().args(["--color", "auto", "info"]).assert().success();
}

#[test]
fn color_always_accepted() {
    cmd().args(["--color", "always", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

// =============================================================================
// Record Fixtures
// =============================================================================

const RECORD: &str = r"name: RedRain Fortune
ios:
  app_name: RedRain Fortune
  subtitle: Egyptian Fortune Adventure
  keywords_field: slots,pharaoh,casino
android:
  app_name: RedRain Fortune
  short_description: Spin Egyptian slots with pharaoh bonuses
keywords:
  - text: redrain fortune
    category: branded
    search_volume: 40000
    difficulty: 10
    relevance_score: 100
  - text: egyptian slots
    search_volume: 3000
    difficulty: 60
    relevance_score: 70
  - text: pharaoh
    search_volume: 9000
    difficulty: 30
    relevance_score: 85
  - text: other casino
    category: competitor
    search_volume: 200
    difficulty: 90
    relevance_score: 20
";

/// A temp dir holding `record.yaml`. Run commands with `-C <dir>`.
fn record_dir() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("record.yaml"), RECORD).unwrap();
    tmp
}

fn json_stdout(assert: &assert_cmd::assert::Assert) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    serde_json::from_str(&stdout).expect("command should output valid JSON")
}

// =============================================================================
// Analyze Command
// =============================================================================

#[test]
fn analyze_runs_all_checks() {
    let tmp = record_dir();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "record.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("RedRain Fortune"))
        .stdout(predicate::str::contains("4 keywords"))
        .stdout(predicate::str::contains("Priority:"))
        .stdout(predicate::str::contains("Density:"));
}

#[test]
fn analyze_json_has_every_section() {
    let tmp = record_dir();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "analyze", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);

    assert_eq!(json["keyword_count"], 4);
    assert_eq!(json["priority"].as_array().unwrap().len(), 4);
    assert!(json["tiers"]["high"].as_u64().unwrap() >= 1);
    assert_eq!(json["repetition"]["ios"]["score"], 80);
    assert_eq!(json["repetition"]["android"]["score"], 100);
    assert!(json["density"].is_object());
    assert!(json["optimize"]["ios"].is_object());
}

#[test]
fn analyze_selected_checks_only() {
    let tmp = record_dir();
    let assert = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--json",
            "analyze",
            "record.yaml",
            "--checks",
            "density,repetition",
        ])
        .assert()
        .success();
    let json = json_stdout(&assert);

    assert!(json.get("priority").is_none());
    assert!(json.get("optimize").is_none());
    assert!(json["density"].is_object());
    assert!(json["repetition"].is_object());
}

#[test]
fn analyze_unknown_check_fails() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "analyze",
            "record.yaml",
            "--checks",
            "spelling",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn analyze_min_score_gates_exit_code() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "analyze",
            "record.yaml",
            "--min-score",
            "90",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below minimum 90"));
}

#[test]
fn analyze_min_score_from_config() {
    let tmp = record_dir();
    std::fs::write(tmp.path().join(".aso-kit.toml"), "min_repetition_score = 85\n").unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "record.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("below minimum 85"));
}

#[test]
fn analyze_min_score_out_of_range_rejected() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "analyze",
            "record.yaml",
            "--min-score",
            "101",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Priority Command
// =============================================================================

#[test]
fn priority_json_keeps_input_order() {
    let tmp = record_dir();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "priority", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);
    let rows = json.as_array().unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["text"], "redrain fortune");
    assert_eq!(rows[0]["priority"], "high");
    assert_eq!(rows[3]["text"], "other casino");
    assert_eq!(rows[3]["priority"], "low");
}

#[test]
fn priority_sort_puts_highest_first() {
    let tmp = record_dir();
    let assert = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--json",
            "priority",
            "record.yaml",
            "--sort",
        ])
        .assert()
        .success();
    let json = json_stdout(&assert);
    let scores: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["score"].as_f64().unwrap())
        .collect();

    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn priority_text_lists_keywords() {
    let tmp = record_dir();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "priority", "record.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pharaoh"))
        .stdout(predicate::str::contains("egyptian slots"));
}

// =============================================================================
// Density Command
// =============================================================================

#[test]
fn density_single_keyword_counts_occurrences() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "density",
            "record.yaml",
            "--keyword",
            "fortune",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("appears 3 time(s)"));
}

#[test]
fn density_json_reports_both_stores() {
    let tmp = record_dir();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "density", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);

    assert!(json["ios"].as_f64().unwrap() > 0.0);
    assert!(json["android"].as_f64().unwrap() > 0.0);
    assert!(json["overall"].is_number());
}

// =============================================================================
// Repetition Command
// =============================================================================

#[test]
fn repetition_flags_brand_term_in_subtitle() {
    let tmp = record_dir();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "repetition", "record.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'fortune'"));
}

#[test]
fn repetition_json_per_store() {
    let tmp = record_dir();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "repetition", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);
    let reports = json.as_array().unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["store"], "ios");
    assert_eq!(reports[0]["has_issues"], true);
    assert_eq!(reports[0]["issues"][0]["severity"], "error");
    assert_eq!(reports[1]["store"], "android");
    assert_eq!(reports[1]["has_issues"], false);
}

#[test]
fn repetition_min_score_fails_below_threshold() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "repetition",
            "record.yaml",
            "--min-score",
            "90",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repetition score 80 is below minimum 90"));
}

#[test]
fn repetition_platform_filter_passes_clean_store() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "repetition",
            "record.yaml",
            "--platform",
            "android",
            "--min-score",
            "100",
        ])
        .assert()
        .success();
}

// =============================================================================
// Optimize Command
// =============================================================================

#[test]
fn optimize_places_brand_in_titles() {
    let tmp = record_dir();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "optimize", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);

    assert_eq!(json["ios"]["title"][0], "redrain fortune");
    assert_eq!(json["android"]["title"][0], "redrain fortune");
}

#[test]
fn optimize_keywords_field_prints_comma_list() {
    let tmp = record_dir();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "optimize",
            "record.yaml",
            "--keywords-field",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("egyptian slots"))
        .stdout(predicate::str::contains("redrain").not());
}

// =============================================================================
// Migrate Command
// =============================================================================

#[test]
fn migrate_without_renames_is_noop() {
    let tmp = record_dir();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "migrate", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);

    assert_eq!(json["rewrites"].as_array().unwrap().len(), 0);
    assert_eq!(json["record"]["name"], "RedRain Fortune");
}

#[test]
fn migrate_applies_configured_renames() {
    let tmp = record_dir();
    std::fs::write(
        tmp.path().join(".aso-kit.toml"),
        "[migrations.app_names]\n\"RedRain Fortune\" = \"RedRain\"\n",
    )
    .unwrap();
    let assert = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "--json", "migrate", "record.yaml"])
        .assert()
        .success();
    let json = json_stdout(&assert);

    assert_eq!(json["rewrites"].as_array().unwrap().len(), 3);
    assert_eq!(json["record"]["name"], "RedRain");
    assert_eq!(json["record"]["ios"]["app_name"], "RedRain");
    assert_eq!(json["record"]["android"]["app_name"], "RedRain");
    // Non-name text is left alone.
    assert_eq!(json["record"]["ios"]["subtitle"], "Egyptian Fortune Adventure");
}

#[test]
fn migrate_output_writes_json_file() {
    let tmp = record_dir();
    std::fs::write(
        tmp.path().join(".aso-kit.toml"),
        "[migrations.app_names]\n\"RedRain Fortune\" = \"RedRain\"\n",
    )
    .unwrap();
    cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "migrate",
            "record.yaml",
            "--output",
            "migrated.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("ios.app_name: "))
        .stdout(predicate::str::contains("android.app_name: "));

    let written = std::fs::read_to_string(tmp.path().join("migrated.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["ios"]["app_name"], "RedRain");
    assert_eq!(json["keywords"].as_array().unwrap().len(), 4);
}

// =============================================================================
// Record Input Errors
// =============================================================================

#[test]
fn missing_record_fails() {
    let tmp = tempfile::tempdir().unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "absent.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read absent.yaml"));
}

#[test]
fn unsupported_record_extension_fails() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("record.txt"), RECORD).unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "priority", "record.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported record format"));
}

#[test]
fn malformed_record_fails() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("record.json"), "{ not json").unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "priority", "record.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse record.json"));
}

#[test]
fn oversized_record_refused() {
    let tmp = record_dir();
    std::fs::write(tmp.path().join(".aso-kit.toml"), "max_input_bytes = 64\n").unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "record.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

#[test]
fn disabled_input_limit_accepts_large_record() {
    let tmp = record_dir();
    std::fs::write(
        tmp.path().join(".aso-kit.toml"),
        "max_input_bytes = 64\ndisable_input_limit = true\n",
    )
    .unwrap();
    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "analyze", "record.yaml"])
        .assert()
        .success();
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn no_subcommand_shows_help() {
    // arg_required_else_help makes clap print help to stderr and exit 2
    cmd()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("not-a-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn invalid_flag_shows_error() {
    cmd()
        .arg("--not-a-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// Chdir Flag
// =============================================================================

#[test]
fn chdir_flag_changes_directory() {
    // The -C flag should be accepted and work without error
    // We use a path that definitely exists
    cmd().args(["-C", "/tmp", "info"]).assert().success();
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/nonexistent/path/that/does/not/exist", "info"])
        .assert()
        .failure();
}
