use predicates::str::{contains, diff};

#[test]
fn summary_of_single_over_match_is_stable() {
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
        "--overs",
        "1",
        "--players",
        "3",
        "--script",
        "1 1 1 1 1 1 next-innings 0 0 0 0 0 4",
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn summary_of_successful_chase() {
    let expected = concat!(
        "Match: Team A vs Team B\n",
        "Status: completed\n",
        "Team A: 11/0 (1.0 ov)\n",
        "Team B: 12/0 (0.3 ov)\n",
        "Target: 12\n",
        "Result: Team B (Won by 1 wickets)\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--overs",
        "1",
        "--players",
        "2",
        "--script",
        "4,6,wd,0,0,0,0,next-innings,6,4,2",
        "--format",
        "summary",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn human_scorecard_after_last_wicket() {
    let expected = concat!(
        "Match: Team A vs Team B\n",
        "Status: innings break\n",
        "Innings 1: Team A 0/1 (1.1 ov)\n",
        "Batting:\n",
        "- Player 1 not out: 0 off 6 (4s: 0, 6s: 0, SR: 0)\n",
        "- Player 2 b Player 2: 0 off 1 (4s: 0, 6s: 0, SR: 0)\n",
        "Extras: 0 (wd 0, nb 0, b 0, lb 0)\n",
        "Fall of wickets: 1-0 (Player 2, 1.1 ov)\n",
        "Bowling:\n",
        "- Player 1: 1.0-1-0-0 (econ: 0.0)\n",
        "- Player 2: 0.1-0-0-1 (econ: 0.0)\n",
        "Overs:\n",
        "1: 0 0 0 0 0 0\n",
        "2: W\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--overs",
        "5",
        "--players",
        "2",
        "--script",
        "bowl=B1 0 0 0 0 0 0 bowl=B2 0+out:bowled",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn human_scorecard_shows_who_is_in() {
    let expected = concat!(
        "Match: India vs Kenya\n",
        "Status: innings 1\n",
        "Innings 1: India 7/1 (0.3 ov)\n",
        "Batting:\n",
        "- Player 1 c Player 4 b Player 11: 4 off 2 (4s: 1, 6s: 0, SR: 200)\n",
        "- Player 2 not out: 0 off 0 (4s: 0, 6s: 0, SR: 0)\n",
        "- Player 3 not out: 2 off 1 (4s: 0, 6s: 0, SR: 200)\n",
        "Extras: 1 (wd 1, nb 0, b 0, lb 0)\n",
        "Fall of wickets: 1-5 (Player 1, 0.2 ov)\n",
        "Bowling:\n",
        "- Player 11: 0.3-0-7-1 (econ: 14.0)\n",
        "Overs:\n",
        "1: 4 1wd W 2\n",
        "At crease: Player 3* & Player 2\n",
        "Bowling: Player 11\n",
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args([
        "score",
        "--team-a",
        "India",
        "--team-b",
        "Kenya",
        "--script",
        "4 wd 0+out:caught:B4 2",
    ]);
    cmd.assert().success().stdout(diff(expected));
}

#[test]
fn json_format_reports_live_status() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cric-score");
    cmd.args(["score", "--script", "1 2 3", "--format", "json"]);
    cmd.assert()
        .success()
        .stdout(contains("\"status\": \"innings 1\""))
        .stdout(contains("\"total_runs\": 6"));
}
