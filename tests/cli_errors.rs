use predicates::str::contains;

#[test]
fn zero_overs_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--overs", "0"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: overs must be greater than 0"));
}

#[test]
fn too_many_players_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["show-config", "--players", "12"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: players per team must be between 2 and 11 (got 12)"));
}

#[test]
fn toss_winner_without_decision_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["show-config", "--toss-winner", "team-a"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: toss decision required when a toss winner is set"));
}

#[test]
fn unknown_delivery_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--script", "1 four"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: invalid delivery 'four'"));
}

#[test]
fn catch_without_fielder_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--script", "0+out:caught"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: caught requires a fielder"));
}

#[test]
fn ball_without_openers_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--custom-names", "--script", "1"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: awaiting striker selection"));
}

#[test]
fn same_bowler_twice_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--script", "0 0 0 0 0 0 bowl=B11"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: player 'B11' cannot be selected as bowler"));
}

#[test]
fn undo_with_nothing_recorded_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--script", "undo"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: nothing to undo"));
}

#[test]
fn second_innings_before_break_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--script", "1 next-innings"]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: no innings break to end"));
}

#[test]
fn missing_backup_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["history", "--backup", path.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(contains("Error: failed to read backup"));
}

#[test]
fn missing_subcommand_fails() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.assert().failure().stderr(contains("Error: "));
}
