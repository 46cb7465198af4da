use predicates::str::{contains, diff};
use std::fs;
use std::path::{Path, PathBuf};

fn write_config(dir: &Path, contents: &str, extension: &str) -> PathBuf {
    let path = dir.join(format!("match.{}", extension));
    fs::write(&path, contents).expect("config write should succeed");
    path
}

#[test]
fn toml_config_drives_match() {
    let dir = tempfile::tempdir().unwrap();
    let config = r#"
team_a = "Lions"
team_b = "Tigers"
overs = 1
players_per_team = 3
toss_winner = "teamB"
toss_decision = "bat"
"#;
    let path = write_config(dir.path(), config, "toml");

    let expected = concat!(
        "Match: Lions vs Tigers\n",
        "Status: innings break\n",
        "Tigers: 10/0 (1.0 ov)\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--config",
        path.to_str().unwrap(),
        "--script",
        "4 0 0 6 0 0",
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn json_config_with_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"{"team_a": "North", "team_b": "South", "overs": 20, "runs_for_wide": 0}"#,
        "json",
    );

    let expected = concat!(
        "Teams: North vs South\n",
        "Overs: 2\n",
        "Players per team: 11\n",
        "Wide: 0 runs, re-ball\n",
        "No-ball: 1 run, re-ball\n",
        "Toss: none\n",
        "Batting first: North\n",
        "Custom names: off\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["show-config", "--config", path.to_str().unwrap(), "--overs", "2"]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn unsupported_config_extension_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "overs: 2", "yaml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: unsupported config format 'yaml'"));
}

#[test]
fn malformed_toml_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "overs = ", "toml");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["show-config", "--config", path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: failed to parse TOML"));
}

#[test]
fn saved_match_resumes_and_lands_in_history() {
    let dir = tempfile::tempdir().unwrap();
    let backup = dir.path().join("store.json");
    let backup_arg = backup.to_str().unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--overs",
        "1",
        "--players",
        "3",
        "--script",
        "1 1 1 1 1 1",
        "--save",
        backup_arg,
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(contains("Status: innings break\n"));

    let expected = concat!(
        "Match: Team A vs Team B\n",
        "Status: completed\n",
        "Team A: 6/0 (1.0 ov)\n",
        "Team B: 4/0 (1.0 ov)\n",
        "Target: 7\n",
        "Result: Team A (Won by 2 runs)\n",
    );
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--resume",
        backup_arg,
        "--script",
        "next-innings 0 0 0 0 0 4",
        "--save",
        backup_arg,
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["history", "--backup", backup_arg]);
    cmd.assert()
        .success()
        .stdout(contains("1. Team A 6/0 v Team B 4/0: Team A (Won by 2 runs) at "));
}

#[test]
fn restore_merges_only_new_matches() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.json");
    let target = dir.path().join("target.json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--overs",
        "1",
        "--players",
        "2",
        "--script",
        "0+out:bowled next-innings 1",
        "--save",
        source.to_str().unwrap(),
    ]);
    cmd.assert().success();

    for expected in [
        "Restored 1 new matches (1 total)\n",
        "Restored 0 new matches (1 total)\n",
    ] {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
        cmd.args([
            "restore",
            "--backup",
            target.to_str().unwrap(),
            "--from",
            source.to_str().unwrap(),
        ]);
        cmd.assert().success().stdout(diff(expected));
    }

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["history", "--backup", target.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(contains("1. Team A 0/1 v Team B 1/0: Team B (Won by 1 wickets)"));
}
