//! Presentation data derived from a match snapshot. Nothing here mutates
//! state; formatters in `output` turn these rows into text.

use serde::Serialize;

use crate::models::{ExtraType, WicketType};
use crate::state::{Ball, BattingStats, Extras, Innings, MatchState, BALLS_PER_OVER};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BattingRow {
    pub player_id: String,
    pub name: String,
    pub dismissal: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct BowlingRow {
    pub player_id: String,
    pub name: String,
    pub overs: String,
    pub maidens: u32,
    pub runs: u32,
    pub wickets: u32,
    pub economy: String,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct InningsCard {
    pub number: u8,
    pub batting_team: String,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub overs: String,
    pub batting: Vec<BattingRow>,
    pub bowling: Vec<BowlingRow>,
    pub extras: String,
    pub fall_of_wickets: Vec<String>,
    /// Ball labels per over, the in-progress over last.
    pub over_history: Vec<Vec<String>>,
}

pub fn strike_rate(runs: u32, balls: u32) -> String {
    if balls == 0 {
        return "0".to_string();
    }
    format!("{:.0}", runs as f64 * 100.0 / balls as f64)
}

pub fn economy(runs: u32, legal_balls: u32) -> String {
    if legal_balls == 0 {
        return "0.0".to_string();
    }
    format!(
        "{:.1}",
        runs as f64 * BALLS_PER_OVER as f64 / legal_balls as f64
    )
}

pub fn extras_line(extras: &Extras) -> String {
    format!(
        "{} (wd {}, nb {}, b {}, lb {})",
        extras.total(),
        extras.wide,
        extras.no_ball,
        extras.bye,
        extras.leg_bye
    )
}

pub fn dismissal_text(stats: &BattingStats, state: &MatchState) -> String {
    if !stats.is_out {
        return if stats.is_retired { "retired" } else { "not out" }.to_string();
    }
    let bowler = stats
        .bowler_id
        .as_deref()
        .map_or("?", |id| state.player_name(id));
    let fielder = stats
        .fielder_id
        .as_deref()
        .map_or("?", |id| state.player_name(id));

    match stats.dismissal {
        Some(WicketType::Bowled) => format!("b {}", bowler),
        Some(WicketType::Caught) => format!("c {} b {}", fielder, bowler),
        Some(WicketType::Lbw) => format!("lbw b {}", bowler),
        Some(WicketType::RunOut) => format!("run out ({})", fielder),
        Some(WicketType::Stumped) => format!("st {} b {}", fielder, bowler),
        Some(WicketType::RetiredHurt) => "retired hurt".to_string(),
        Some(WicketType::Other) | None => "out".to_string(),
    }
}

/// Short label for an over-history cell: `4`, `1wd`, `2nb`, `1lb`, `W`, `1+W`.
pub fn ball_label(ball: &Ball) -> String {
    let base = match ball.extra_type {
        ExtraType::None => ball.runs.to_string(),
        ExtraType::Wide => format!("{}wd", ball.runs),
        ExtraType::NoBall => format!("{}nb", ball.runs),
        ExtraType::Bye => format!("{}b", ball.runs),
        ExtraType::LegBye => format!("{}lb", ball.runs),
    };
    match ball.wicket {
        Some(_) if ball.runs == 0 && ball.extra_type == ExtraType::None => "W".to_string(),
        Some(_) => format!("{}+W", base),
        None => base,
    }
}

pub fn innings_card(state: &MatchState, which: Innings) -> InningsCard {
    let innings = state.innings(which);

    let batting = state
        .batting_roster(which)
        .iter()
        .filter_map(|player| innings.batting_stats.get(&player.id).map(|stats| (player, stats)))
        .map(|(player, stats)| BattingRow {
            player_id: player.id.clone(),
            name: player.name.clone(),
            dismissal: dismissal_text(stats, state),
            runs: stats.runs,
            balls: stats.balls_faced,
            fours: stats.fours,
            sixes: stats.sixes,
            strike_rate: strike_rate(stats.runs, stats.balls_faced),
        })
        .collect();

    let bowling = state
        .bowling_roster(which)
        .iter()
        .filter_map(|player| innings.bowling_stats.get(&player.id).map(|stats| (player, stats)))
        .map(|(player, stats)| BowlingRow {
            player_id: player.id.clone(),
            name: player.name.clone(),
            overs: stats.overs_bowled().to_string(),
            maidens: stats.maidens,
            runs: stats.runs_conceded,
            wickets: stats.wickets,
            economy: economy(stats.runs_conceded, stats.balls),
        })
        .collect();

    let fall_of_wickets = innings
        .fall_of_wickets
        .iter()
        .map(|fow| {
            format!(
                "{}-{} ({}, {} ov)",
                fow.wicket,
                fow.runs,
                state.player_name(&fow.player_id),
                fow.over
            )
        })
        .collect();

    let mut over_history: Vec<Vec<String>> = innings
        .overs
        .iter()
        .map(|over| over.balls.iter().map(ball_label).collect())
        .collect();
    if !innings.current_over.is_empty() {
        over_history.push(innings.current_over.iter().map(ball_label).collect());
    }

    InningsCard {
        number: which.number(),
        batting_team: innings.batting_team.clone(),
        total_runs: innings.total_runs,
        total_wickets: innings.total_wickets,
        overs: innings.overs_bowled().to_string(),
        batting,
        bowling,
        extras: extras_line(&innings.extras()),
        fall_of_wickets,
        over_history,
    }
}

/// Innings that are live or have any batting recorded.
pub fn started_innings(state: &MatchState) -> Vec<Innings> {
    [Innings::First, Innings::Second]
        .into_iter()
        .filter(|which| {
            state.phase.live_innings() == Some(*which)
                || !state.innings(*which).batting_stats.is_empty()
        })
        .collect()
}

pub fn target(state: &MatchState) -> Option<u32> {
    match state.current_innings() {
        Innings::Second => Some(state.innings(Innings::First).total_runs + 1),
        Innings::First => None,
    }
}
