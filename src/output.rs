use serde::Serialize;
use std::fmt::Write;

use crate::engine::pending_selection;
use crate::models::MatchConfig;
use crate::scorecard::{innings_card, started_innings, target, InningsCard};
use crate::state::{MatchResult, MatchState};

pub trait Formatter {
    fn write(&self, config: &MatchConfig, state: &MatchState) -> String;
}

pub struct SummaryFormatter;
pub struct HumanFormatter;
pub struct JsonFormatter;

impl Formatter for SummaryFormatter {
    fn write(&self, config: &MatchConfig, state: &MatchState) -> String {
        let mut out = header(config, state);
        for which in started_innings(state) {
            let innings = state.innings(which);
            let _ = writeln!(
                out,
                "{}: {}/{} ({} ov)",
                innings.batting_team,
                innings.total_runs,
                innings.total_wickets,
                innings.overs_bowled()
            );
        }
        out.push_str(&footer(state));
        out
    }
}

impl Formatter for HumanFormatter {
    fn write(&self, config: &MatchConfig, state: &MatchState) -> String {
        let mut out = header(config, state);
        for which in started_innings(state) {
            write_card(&mut out, &innings_card(state, which));
        }

        if let Some(which) = state.phase.live_innings() {
            let innings = state.innings(which);
            let name = |id: &Option<String>| {
                id.as_deref()
                    .map_or("-".to_string(), |id| state.player_name(id).to_string())
            };
            let _ = writeln!(
                out,
                "At crease: {}* & {}",
                name(&innings.striker_id),
                name(&innings.non_striker_id)
            );
            let _ = writeln!(out, "Bowling: {}", name(&innings.current_bowler_id));
            if let Some(pending) = pending_selection(state) {
                let _ = writeln!(out, "Awaiting {} selection", pending);
            }
        }
        out.push_str(&footer(state));
        out
    }
}

#[derive(Serialize)]
struct MatchReport<'a> {
    team_a: &'a str,
    team_b: &'a str,
    status: &'a str,
    innings: Vec<InningsCard>,
    target: Option<u32>,
    result: Option<&'a MatchResult>,
}

impl Formatter for JsonFormatter {
    fn write(&self, config: &MatchConfig, state: &MatchState) -> String {
        let report = MatchReport {
            team_a: &config.team_a,
            team_b: &config.team_b,
            status: state.phase.label(),
            innings: started_innings(state)
                .into_iter()
                .map(|which| innings_card(state, which))
                .collect(),
            target: target(state),
            result: state.match_result(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => format!("{}\n", json),
            Err(err) => format!("{{\"error\": \"{}\"}}\n", err),
        }
    }
}

fn header(config: &MatchConfig, state: &MatchState) -> String {
    format!(
        "Match: {} vs {}\nStatus: {}\n",
        config.team_a,
        config.team_b,
        state.phase.label()
    )
}

fn footer(state: &MatchState) -> String {
    let mut out = String::new();
    if let Some(target) = target(state) {
        let _ = writeln!(out, "Target: {}", target);
    }
    if let Some(result) = state.match_result() {
        let _ = writeln!(out, "Result: {} ({})", result.winner, result.reason);
    }
    out
}

fn write_card(out: &mut String, card: &InningsCard) {
    let _ = writeln!(
        out,
        "Innings {}: {} {}/{} ({} ov)",
        card.number, card.batting_team, card.total_runs, card.total_wickets, card.overs
    );
    out.push_str("Batting:\n");
    for row in &card.batting {
        let _ = writeln!(
            out,
            "- {} {}: {} off {} (4s: {}, 6s: {}, SR: {})",
            row.name, row.dismissal, row.runs, row.balls, row.fours, row.sixes, row.strike_rate
        );
    }
    let _ = writeln!(out, "Extras: {}", card.extras);
    if card.fall_of_wickets.is_empty() {
        out.push_str("Fall of wickets: -\n");
    } else {
        let _ = writeln!(out, "Fall of wickets: {}", card.fall_of_wickets.join(", "));
    }
    out.push_str("Bowling:\n");
    for row in &card.bowling {
        let _ = writeln!(
            out,
            "- {}: {}-{}-{}-{} (econ: {})",
            row.name, row.overs, row.maidens, row.runs, row.wickets, row.economy
        );
    }
    out.push_str("Overs:\n");
    for (idx, balls) in card.over_history.iter().enumerate() {
        let _ = writeln!(out, "{}: {}", idx + 1, balls.join(" "));
    }
}

/// One line per completed match, oldest first.
pub fn history_lines(history: &[MatchState]) -> String {
    if history.is_empty() {
        return "No completed matches\n".to_string();
    }
    let mut out = String::new();
    for (idx, completed) in history.iter().enumerate() {
        let first = &completed.innings[0];
        let second = &completed.innings[1];
        let outcome = completed
            .match_result()
            .map_or("-".to_string(), |result| {
                format!("{} ({})", result.winner, result.reason)
            });
        let _ = write!(
            out,
            "{}. {} {}/{} v {} {}/{}: {}",
            idx + 1,
            first.batting_team,
            first.total_runs,
            first.total_wickets,
            second.batting_team,
            second.total_runs,
            second.total_wickets,
            outcome
        );
        match completed.completed_at {
            Some(at) => {
                let _ = writeln!(out, " at {}", at.format("%Y-%m-%d %H:%M UTC"));
            }
            None => out.push('\n'),
        }
    }
    out
}
