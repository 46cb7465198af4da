//! Aggregates recomputed from the ball log, used to check that an innings'
//! running totals still agree with the deliveries that produced them.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::state::{Innings, InningsState, PlayerId, BALLS_PER_OVER};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BattingLine {
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BowlingLine {
    pub overs: u32,
    pub balls: u32,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub total_runs: u32,
    pub total_wickets: u32,
    pub batting: BTreeMap<PlayerId, BattingLine>,
    pub bowling: BTreeMap<PlayerId, BowlingLine>,
}

pub fn rebuild(innings: &InningsState) -> Tally {
    let mut tally = Tally::default();

    for ball in innings.balls() {
        tally.total_runs += ball.runs;

        let batting = tally.batting.entry(ball.batsman_id.clone()).or_default();
        if ball.faced_by_batter() {
            batting.balls_faced += 1;
        }
        batting.runs += ball.runs_off_bat;
        match ball.runs_off_bat {
            4 => batting.fours += 1,
            6 => batting.sixes += 1,
            _ => {}
        }

        let bowling = tally.bowling.entry(ball.bowler_id.clone()).or_default();
        if ball.is_valid_ball {
            bowling.balls += 1;
        }
        bowling.runs_conceded += ball.bowler_runs();
        if let Some(kind) = ball.wicket {
            tally.total_wickets += 1;
            if kind.credits_bowler() {
                bowling.wickets += 1;
            }
        }
    }

    for over in innings.overs.iter().filter(|over| over.is_maiden()) {
        tally.bowling.entry(over.bowler_id.clone()).or_default().maidens += 1;
    }
    for line in tally.bowling.values_mut() {
        line.overs = line.balls / BALLS_PER_OVER;
    }
    tally
}

/// Checks score conservation, wicket count, over arity, and that every
/// recorded statistic matches the ball log.
pub fn verify(innings: &InningsState, which: Innings) -> Result<()> {
    let fail = |detail: String| Err(Error::InconsistentInnings(which.number(), detail));
    let tally = rebuild(innings);

    if tally.total_runs != innings.total_runs {
        return fail(format!(
            "total runs {} but balls add up to {}",
            innings.total_runs, tally.total_runs
        ));
    }
    if tally.total_wickets != innings.total_wickets {
        return fail(format!(
            "{} wickets recorded but {} wicket balls",
            innings.total_wickets, tally.total_wickets
        ));
    }
    if innings.fall_of_wickets.len() as u32 != innings.total_wickets {
        return fail(format!(
            "{} fall-of-wicket entries for {} wickets",
            innings.fall_of_wickets.len(),
            innings.total_wickets
        ));
    }
    for (idx, over) in innings.overs.iter().enumerate() {
        let valid = over.balls.iter().filter(|ball| ball.is_valid_ball).count() as u32;
        if valid != BALLS_PER_OVER {
            return fail(format!("over {} has {} legal balls", idx + 1, valid));
        }
    }
    if innings.valid_balls_in_current_over() >= BALLS_PER_OVER {
        return fail("current over was never closed".to_string());
    }

    let batters: BTreeSet<&PlayerId> = tally
        .batting
        .keys()
        .chain(innings.batting_stats.keys())
        .collect();
    for id in batters {
        let expected = tally.batting.get(id).copied().unwrap_or_default();
        let Some(stats) = innings.batting_stats.get(id) else {
            return fail(format!("no batting entry for {}", id));
        };
        let recorded = BattingLine {
            runs: stats.runs,
            balls_faced: stats.balls_faced,
            fours: stats.fours,
            sixes: stats.sixes,
        };
        if recorded != expected {
            return fail(format!("batting figures for {} disagree with balls", id));
        }
    }

    let bowlers: BTreeSet<&PlayerId> = tally
        .bowling
        .keys()
        .chain(innings.bowling_stats.keys())
        .collect();
    for id in bowlers {
        let expected = tally.bowling.get(id).copied().unwrap_or_default();
        let Some(stats) = innings.bowling_stats.get(id) else {
            return fail(format!("no bowling entry for {}", id));
        };
        let recorded = BowlingLine {
            overs: stats.overs,
            balls: stats.balls,
            maidens: stats.maidens,
            runs_conceded: stats.runs_conceded,
            wickets: stats.wickets,
        };
        if recorded != expected {
            return fail(format!("bowling figures for {} disagree with balls", id));
        }
    }

    for id in innings.balls().filter_map(|ball| ball.dismissed_id.as_ref()) {
        if !innings.batting_stats.get(id).is_some_and(|stats| stats.is_out) {
            return fail(format!("{} was dismissed but is not marked out", id));
        }
    }
    Ok(())
}
