//! Pure match transitions. Every function takes a snapshot and returns a new
//! one; nothing here reads a clock, logs, or touches shared state.

use std::cmp::Ordering;
use std::fmt;
use std::mem;

use crate::events::BallEvent;
use crate::lineup::{batter_candidates, build_policy, LineupContext};
use crate::models::{Batter, ExtraType, MatchConfig, Team};
use crate::state::{
    Ball, BattingStats, BowlingStats, FallOfWicket, Innings, InningsState, MatchPhase,
    MatchResult, MatchState, Over, Player, BALLS_PER_OVER,
};

/// Selection the scorer has to make before the next delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pending {
    Striker,
    NonStriker,
    Bowler,
}

impl fmt::Display for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pending::Striker => write!(f, "striker"),
            Pending::NonStriker => write!(f, "non-striker"),
            Pending::Bowler => write!(f, "bowler"),
        }
    }
}

struct Delivery {
    runs_to_add: u32,
    runs_off_bat: u32,
    is_valid_ball: bool,
}

fn resolve_extras(config: &MatchConfig, event: &BallEvent) -> Delivery {
    match event.extra_type {
        ExtraType::None => Delivery {
            runs_to_add: event.runs,
            runs_off_bat: event.runs,
            is_valid_ball: true,
        },
        ExtraType::Wide => Delivery {
            runs_to_add: event.runs + config.runs_for_wide,
            runs_off_bat: 0,
            is_valid_ball: !config.reball_for_wide,
        },
        // Without the bye flag every run off a no-ball goes to the batter.
        ExtraType::NoBall => Delivery {
            runs_to_add: event.runs + config.runs_for_no_ball,
            runs_off_bat: if event.bye_for_no_ball { 0 } else { event.runs },
            is_valid_ball: !config.reball_for_no_ball,
        },
        ExtraType::Bye | ExtraType::LegBye => Delivery {
            runs_to_add: event.runs,
            runs_off_bat: 0,
            is_valid_ball: true,
        },
    }
}

pub fn pending_selection(state: &MatchState) -> Option<Pending> {
    let innings = state.current();
    if innings.striker_id.is_none() {
        Some(Pending::Striker)
    } else if innings.non_striker_id.is_none() {
        Some(Pending::NonStriker)
    } else if innings.current_bowler_id.is_none() {
        Some(Pending::Bowler)
    } else {
        None
    }
}

/// Applies one delivery to the live innings.
///
/// Returns the input unchanged when no innings is live or a striker,
/// non-striker or bowler selection is still pending.
pub fn process_ball(state: &MatchState, config: &MatchConfig, event: &BallEvent) -> MatchState {
    let Some(which) = state.phase.live_innings() else {
        return state.clone();
    };
    let current = state.innings(which);
    let (Some(striker_id), Some(non_striker_id), Some(bowler_id)) = (
        current.striker_id.clone(),
        current.non_striker_id.clone(),
        current.current_bowler_id.clone(),
    ) else {
        return state.clone();
    };

    let delivery = resolve_extras(config, event);
    let dismissed_id = event.wicket.as_ref().map(|dismissal| match dismissal.who_is_out {
        Batter::Striker => striker_id.clone(),
        Batter::NonStriker => non_striker_id.clone(),
    });
    let fielder_id = event
        .wicket
        .as_ref()
        .filter(|dismissal| dismissal.kind.needs_fielder())
        .and_then(|dismissal| dismissal.fielder_id.clone());

    let mut next = state.clone();
    let innings = next.innings_mut(which);

    credit_batter(innings, &striker_id, event.extra_type, &delivery);
    batting_entry(innings, &non_striker_id);
    if let (Some(dismissal), Some(out_id)) = (&event.wicket, &dismissed_id) {
        let stats = batting_entry(innings, out_id);
        stats.is_out = true;
        stats.dismissal = Some(dismissal.kind);
        stats.fielder_id = fielder_id.clone();
        stats.bowler_id = Some(bowler_id.clone());
    }
    credit_bowler(innings, &bowler_id, event, &delivery);

    innings.total_runs += delivery.runs_to_add;
    innings.current_over.push(Ball {
        runs: delivery.runs_to_add,
        runs_off_bat: delivery.runs_off_bat,
        extra_type: event.extra_type,
        wicket: event.wicket.as_ref().map(|dismissal| dismissal.kind),
        is_valid_ball: delivery.is_valid_ball,
        batsman_id: striker_id.clone(),
        bowler_id: bowler_id.clone(),
        fielder_id,
        dismissed_id: dismissed_id.clone(),
    });
    if let Some(out_id) = &dismissed_id {
        innings.total_wickets += 1;
        let fall = FallOfWicket {
            runs: innings.total_runs,
            wicket: innings.total_wickets,
            over: innings.overs_bowled(),
            player_id: out_id.clone(),
        };
        innings.fall_of_wickets.push(fall);
    }

    // Penalty runs never change ends, only the runs actually run or hit.
    let (mut striker_end, mut non_striker_end) = (Some(striker_id), Some(non_striker_id));
    if event.runs % 2 == 1 {
        mem::swap(&mut striker_end, &mut non_striker_end);
    }
    if let Some(out_id) = &dismissed_id {
        if striker_end.as_ref() == Some(out_id) {
            striker_end = None;
        } else if non_striker_end.as_ref() == Some(out_id) {
            non_striker_end = None;
        }
    }
    innings.striker_id = striker_end;
    innings.non_striker_id = non_striker_end;

    fill_vacancies(&mut next, config, which);
    complete_over(next.innings_mut(which), &bowler_id);
    conclude(next, config, which)
}

fn credit_batter(
    innings: &mut InningsState,
    striker_id: &str,
    extra_type: ExtraType,
    delivery: &Delivery,
) {
    let stats = batting_entry(innings, striker_id);
    if delivery.is_valid_ball && extra_type != ExtraType::Wide {
        stats.balls_faced += 1;
    }
    stats.runs += delivery.runs_off_bat;
    match delivery.runs_off_bat {
        4 => stats.fours += 1,
        6 => stats.sixes += 1,
        _ => {}
    }
}

fn credit_bowler(
    innings: &mut InningsState,
    bowler_id: &str,
    event: &BallEvent,
    delivery: &Delivery,
) {
    let stats = bowling_entry(innings, bowler_id);
    if delivery.is_valid_ball {
        stats.balls += 1;
        if stats.balls % BALLS_PER_OVER == 0 {
            stats.overs += 1;
        }
    }
    if event.extra_type.charged_to_bowler() {
        stats.runs_conceded += delivery.runs_to_add;
    }
    if let Some(dismissal) = &event.wicket {
        if dismissal.kind.credits_bowler() {
            stats.wickets += 1;
        }
    }
}

fn complete_over(innings: &mut InningsState, bowler_id: &str) {
    if innings.valid_balls_in_current_over() < BALLS_PER_OVER {
        return;
    }
    let over = Over {
        balls: mem::take(&mut innings.current_over),
        bowler_id: bowler_id.to_string(),
    };
    if over.is_maiden() {
        bowling_entry(innings, bowler_id).maidens += 1;
    }
    innings.overs.push(over);
    mem::swap(&mut innings.striker_id, &mut innings.non_striker_id);
    innings.current_bowler_id = None;
}

fn conclude(mut next: MatchState, config: &MatchConfig, which: Innings) -> MatchState {
    let innings = next.innings(which);
    let all_out = innings.total_wickets >= config.all_out_wickets();
    let overs_done = innings.overs.len() as u32 >= config.overs;

    match which {
        Innings::First => {
            if all_out || overs_done {
                next.phase = MatchPhase::InningsBreak;
            }
        }
        Innings::Second => {
            let target_reached = innings.total_runs > next.innings(Innings::First).total_runs;
            if all_out || overs_done || target_reached {
                let result = calculate_match_result(&next, config);
                next.phase = MatchPhase::Completed { result };
            }
        }
    }
    next
}

/// Decides the match from both innings' totals.
pub fn calculate_match_result(state: &MatchState, config: &MatchConfig) -> MatchResult {
    let first = state.innings(Innings::First);
    let second = state.innings(Innings::Second);

    match first.total_runs.cmp(&second.total_runs) {
        Ordering::Greater => MatchResult {
            winner: first.batting_team.clone(),
            reason: format!("Won by {} runs", first.total_runs - second.total_runs),
        },
        Ordering::Less => MatchResult {
            winner: second.batting_team.clone(),
            reason: format!(
                "Won by {} wickets",
                config.all_out_wickets().saturating_sub(second.total_wickets)
            ),
        },
        Ordering::Equal => MatchResult {
            winner: MatchResult::DRAW.to_string(),
            reason: "Scores are tied".to_string(),
        },
    }
}

/// Builds both rosters and opens the first innings.
pub fn start_match(config: &MatchConfig) -> MatchState {
    let batting_first = config.batting_first();
    let fielding_first = batting_first.other();
    let mut state = MatchState {
        phase: MatchPhase::InningsOneLive,
        team_a_players: build_roster(config, Team::A),
        team_b_players: build_roster(config, Team::B),
        innings: [
            InningsState::new(config.team_name(batting_first), batting_first),
            InningsState::new(config.team_name(fielding_first), fielding_first),
        ],
        completed_at: None,
    };
    open_innings(&mut state, config, Innings::First);
    state
}

/// Slot ids `A1..An` / `B1..Bn`; names come from the configured list, then
/// the saved roster for the team, then `Player N`.
pub fn build_roster(config: &MatchConfig, team: Team) -> Vec<Player> {
    let custom = config.custom_names(team);
    let cached = config
        .saved_teams
        .get(config.team_name(team))
        .map(Vec::as_slice)
        .unwrap_or_default();

    (1..=config.players_per_team as usize)
        .map(|slot| {
            let name = if config.custom_names_enabled {
                [custom.get(slot - 1), cached.get(slot - 1)]
                    .into_iter()
                    .flatten()
                    .map(|name| name.trim())
                    .find(|name| !name.is_empty())
                    .map(str::to_string)
            } else {
                None
            };
            Player {
                id: format!("{}{}", team.id_prefix(), slot),
                name: name.unwrap_or_else(|| format!("Player {}", slot)),
            }
        })
        .collect()
}

/// Ends the innings break and opens the second innings.
pub fn start_second_innings(state: &MatchState, config: &MatchConfig) -> MatchState {
    if state.phase != MatchPhase::InningsBreak {
        return state.clone();
    }
    let mut next = state.clone();
    next.phase = MatchPhase::InningsTwoLive;
    open_innings(&mut next, config, Innings::Second);
    next
}

fn open_innings(state: &mut MatchState, config: &MatchConfig, which: Innings) {
    let policy = build_policy(config);
    let (striker, non_striker) = policy.openers(state.batting_roster(which));
    let bowler = policy.opening_bowler(state.bowling_roster(which));

    let innings = state.innings_mut(which);
    if let Some(id) = striker {
        place(innings, Batter::Striker, id);
    }
    if let Some(id) = non_striker {
        place(innings, Batter::NonStriker, id);
    }
    innings.current_bowler_id = bowler;
}

fn fill_vacancies(state: &mut MatchState, config: &MatchConfig, which: Innings) {
    let policy = build_policy(config);
    for end in [Batter::Striker, Batter::NonStriker] {
        let replacement = {
            let innings = state.innings(which);
            let occupant = match end {
                Batter::Striker => &innings.striker_id,
                Batter::NonStriker => &innings.non_striker_id,
            };
            if occupant.is_some() {
                continue;
            }
            let ctx = LineupContext {
                roster: state.batting_roster(which),
                innings,
                at_crease: [
                    innings.striker_id.as_deref(),
                    innings.non_striker_id.as_deref(),
                ],
            };
            policy.next_batter(&ctx)
        };
        if let Some(id) = replacement {
            place(state.innings_mut(which), end, id);
        }
    }
}

fn place(innings: &mut InningsState, end: Batter, player_id: String) {
    batting_entry(innings, &player_id);
    match end {
        Batter::Striker => innings.striker_id = Some(player_id),
        Batter::NonStriker => innings.non_striker_id = Some(player_id),
    }
}

fn batting_entry<'a>(innings: &'a mut InningsState, player_id: &str) -> &'a mut BattingStats {
    innings
        .batting_stats
        .entry(player_id.to_string())
        .or_insert_with(|| BattingStats::new(player_id))
}

fn bowling_entry<'a>(innings: &'a mut InningsState, player_id: &str) -> &'a mut BowlingStats {
    innings
        .bowling_stats
        .entry(player_id.to_string())
        .or_insert_with(|| BowlingStats::new(player_id))
}

/// Exchanges striker and non-striker without touching any statistic.
pub fn swap_batsmen(state: &MatchState) -> MatchState {
    let mut next = state.clone();
    let innings = next.innings_mut(state.current_innings());
    mem::swap(&mut innings.striker_id, &mut innings.non_striker_id);
    next
}

/// Retires a batter at the crease. Unlike a dismissal this is not a wicket.
/// Nothing changes when no one is left to take the vacated end.
pub fn retire_player(state: &MatchState, config: &MatchConfig, player_id: &str) -> MatchState {
    let which = state.current_innings();
    let current = state.innings(which);
    if !current.is_at_crease(player_id) {
        return state.clone();
    }
    let at_crease = [current.striker_id.as_deref(), current.non_striker_id.as_deref()];
    if batter_candidates(state.batting_roster(which), current, at_crease).is_empty() {
        return state.clone();
    }
    let mut next = state.clone();
    let innings = next.innings_mut(which);
    batting_entry(innings, player_id).is_retired = true;
    if innings.striker_id.as_deref() == Some(player_id) {
        innings.striker_id = None;
    } else {
        innings.non_striker_id = None;
    }
    fill_vacancies(&mut next, config, which);
    next
}

/// Changes a display name in the roster and the team's saved name list.
/// Ids and statistics are left alone.
pub fn rename_player(
    state: &MatchState,
    config: &MatchConfig,
    player_id: &str,
    name: &str,
) -> (MatchState, MatchConfig) {
    let mut next = state.clone();
    let mut next_config = config.clone();
    for team in [Team::A, Team::B] {
        let roster = next.roster_mut(team);
        let Some(player) = roster.iter_mut().find(|player| player.id == player_id) else {
            continue;
        };
        player.name = name.to_string();
        let names = roster.iter().map(|player| player.name.clone()).collect();
        let key = next_config.team_name(team).to_string();
        next_config.saved_teams.insert(key, names);
        break;
    }
    (next, next_config)
}

pub fn assign_striker(state: &MatchState, player_id: &str) -> MatchState {
    let mut next = state.clone();
    let innings = next.innings_mut(state.current_innings());
    place(innings, Batter::Striker, player_id.to_string());
    next
}

pub fn assign_non_striker(state: &MatchState, player_id: &str) -> MatchState {
    let mut next = state.clone();
    let innings = next.innings_mut(state.current_innings());
    place(innings, Batter::NonStriker, player_id.to_string());
    next
}

pub fn assign_bowler(state: &MatchState, player_id: &str) -> MatchState {
    let mut next = state.clone();
    next.innings_mut(state.current_innings()).current_bowler_id = Some(player_id.to_string());
    next
}
