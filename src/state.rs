use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::models::{ExtraType, Team, WicketType};

pub type PlayerId = String;

pub const BALLS_PER_OVER: u32 = 6;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// One delivery. Never edited after it is appended to an over.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Ball {
    /// Team-total delta, penalty included.
    pub runs: u32,
    pub runs_off_bat: u32,
    pub extra_type: ExtraType,
    pub wicket: Option<WicketType>,
    /// Counts toward the six balls of an over.
    pub is_valid_ball: bool,
    pub batsman_id: PlayerId,
    pub bowler_id: PlayerId,
    pub fielder_id: Option<PlayerId>,
    pub dismissed_id: Option<PlayerId>,
}

impl Ball {
    pub fn is_wicket(&self) -> bool {
        self.wicket.is_some()
    }

    pub fn bowler_runs(&self) -> u32 {
        if self.extra_type.charged_to_bowler() {
            self.runs
        } else {
            0
        }
    }

    pub fn faced_by_batter(&self) -> bool {
        self.is_valid_ball && self.extra_type != ExtraType::Wide
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Over {
    pub balls: Vec<Ball>,
    pub bowler_id: PlayerId,
}

impl Over {
    pub fn is_maiden(&self) -> bool {
        self.balls.iter().all(|ball| ball.bowler_runs() == 0)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BattingStats {
    pub player_id: PlayerId,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    pub is_retired: bool,
    pub dismissal: Option<WicketType>,
    pub fielder_id: Option<PlayerId>,
    pub bowler_id: Option<PlayerId>,
}

impl BattingStats {
    pub fn new(player_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            is_out: false,
            is_retired: false,
            dismissal: None,
            fielder_id: None,
            bowler_id: None,
        }
    }

    /// Out or retired: cannot come back to the crease.
    pub fn is_finished(&self) -> bool {
        self.is_out || self.is_retired
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BowlingStats {
    pub player_id: PlayerId,
    pub overs: u32,
    /// Legal balls bowled in the innings.
    pub balls: u32,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
}

impl BowlingStats {
    pub fn new(player_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            overs: 0,
            balls: 0,
            maidens: 0,
            runs_conceded: 0,
            wickets: 0,
        }
    }

    pub fn overs_bowled(&self) -> OversBowled {
        OversBowled::from_legal_balls(self.balls)
    }
}

/// Completed overs plus balls into the next one, shown as `overs.balls`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct OversBowled {
    pub overs: u32,
    pub balls: u32,
}

impl OversBowled {
    pub fn from_legal_balls(legal_balls: u32) -> Self {
        Self {
            overs: legal_balls / BALLS_PER_OVER,
            balls: legal_balls % BALLS_PER_OVER,
        }
    }
}

impl fmt::Display for OversBowled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.overs, self.balls)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct FallOfWicket {
    pub runs: u32,
    pub wicket: u32,
    pub over: OversBowled,
    pub player_id: PlayerId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Extras {
    pub wide: u32,
    pub no_ball: u32,
    pub bye: u32,
    pub leg_bye: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wide + self.no_ball + self.bye + self.leg_bye
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct InningsState {
    pub batting_team: String,
    pub batting_side: Team,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub overs: Vec<Over>,
    pub current_over: Vec<Ball>,
    pub striker_id: Option<PlayerId>,
    pub non_striker_id: Option<PlayerId>,
    pub current_bowler_id: Option<PlayerId>,
    pub batting_stats: BTreeMap<PlayerId, BattingStats>,
    pub bowling_stats: BTreeMap<PlayerId, BowlingStats>,
    pub fall_of_wickets: Vec<FallOfWicket>,
}

impl InningsState {
    pub fn new(batting_team: &str, batting_side: Team) -> Self {
        Self {
            batting_team: batting_team.to_string(),
            batting_side,
            total_runs: 0,
            total_wickets: 0,
            overs: Vec::new(),
            current_over: Vec::new(),
            striker_id: None,
            non_striker_id: None,
            current_bowler_id: None,
            batting_stats: BTreeMap::new(),
            bowling_stats: BTreeMap::new(),
            fall_of_wickets: Vec::new(),
        }
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.overs
            .iter()
            .flat_map(|over| over.balls.iter())
            .chain(self.current_over.iter())
    }

    pub fn valid_balls_in_current_over(&self) -> u32 {
        self.current_over
            .iter()
            .filter(|ball| ball.is_valid_ball)
            .count() as u32
    }

    pub fn legal_balls(&self) -> u32 {
        self.overs.len() as u32 * BALLS_PER_OVER + self.valid_balls_in_current_over()
    }

    pub fn overs_bowled(&self) -> OversBowled {
        OversBowled::from_legal_balls(self.legal_balls())
    }

    /// Bowler of the last completed over, who may not bowl the next one.
    pub fn previous_bowler(&self) -> Option<&PlayerId> {
        self.overs.last().map(|over| &over.bowler_id)
    }

    pub fn is_at_crease(&self, player_id: &str) -> bool {
        self.striker_id.as_deref() == Some(player_id)
            || self.non_striker_id.as_deref() == Some(player_id)
    }

    pub fn extras(&self) -> Extras {
        let mut extras = Extras::default();
        for ball in self.balls() {
            match ball.extra_type {
                ExtraType::None => {}
                ExtraType::Wide => extras.wide += ball.runs,
                ExtraType::NoBall => extras.no_ball += ball.runs - ball.runs_off_bat,
                ExtraType::Bye => extras.bye += ball.runs,
                ExtraType::LegBye => extras.leg_bye += ball.runs,
            }
        }
        extras
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MatchResult {
    pub winner: String,
    pub reason: String,
}

impl MatchResult {
    pub const DRAW: &'static str = "Draw";

    pub fn is_draw(&self) -> bool {
        self.winner == Self::DRAW
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Innings {
    #[default]
    First,
    Second,
}

impl Innings {
    pub fn index(self) -> usize {
        match self {
            Innings::First => 0,
            Innings::Second => 1,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Innings::First => 1,
            Innings::Second => 2,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatchPhase {
    #[default]
    Setup,
    InningsOneLive,
    InningsBreak,
    InningsTwoLive,
    Completed { result: MatchResult },
}

impl MatchPhase {
    /// Innings that accepts deliveries in this phase.
    pub fn live_innings(&self) -> Option<Innings> {
        match self {
            MatchPhase::InningsOneLive => Some(Innings::First),
            MatchPhase::InningsTwoLive => Some(Innings::Second),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchPhase::Setup => "setup",
            MatchPhase::InningsOneLive => "innings 1",
            MatchPhase::InningsBreak => "innings break",
            MatchPhase::InningsTwoLive => "innings 2",
            MatchPhase::Completed { .. } => "completed",
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub team_a_players: Vec<Player>,
    pub team_b_players: Vec<Player>,
    pub innings: [InningsState; 2],
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            phase: MatchPhase::Setup,
            team_a_players: Vec::new(),
            team_b_players: Vec::new(),
            innings: [
                InningsState::new("", Team::A),
                InningsState::new("", Team::B),
            ],
            completed_at: None,
        }
    }
}

impl MatchState {
    pub fn is_playing(&self) -> bool {
        !matches!(
            self.phase,
            MatchPhase::Setup | MatchPhase::Completed { .. }
        )
    }

    pub fn is_innings_break(&self) -> bool {
        self.phase == MatchPhase::InningsBreak
    }

    pub fn current_innings(&self) -> Innings {
        match self.phase {
            MatchPhase::InningsTwoLive | MatchPhase::Completed { .. } => Innings::Second,
            _ => Innings::First,
        }
    }

    pub fn match_result(&self) -> Option<&MatchResult> {
        match &self.phase {
            MatchPhase::Completed { result } => Some(result),
            _ => None,
        }
    }

    pub fn innings(&self, which: Innings) -> &InningsState {
        &self.innings[which.index()]
    }

    pub fn innings_mut(&mut self, which: Innings) -> &mut InningsState {
        &mut self.innings[which.index()]
    }

    pub fn current(&self) -> &InningsState {
        self.innings(self.current_innings())
    }

    pub fn roster(&self, team: Team) -> &[Player] {
        match team {
            Team::A => &self.team_a_players,
            Team::B => &self.team_b_players,
        }
    }

    pub fn roster_mut(&mut self, team: Team) -> &mut Vec<Player> {
        match team {
            Team::A => &mut self.team_a_players,
            Team::B => &mut self.team_b_players,
        }
    }

    pub fn batting_roster(&self, which: Innings) -> &[Player] {
        self.roster(self.innings(which).batting_side)
    }

    pub fn bowling_roster(&self, which: Innings) -> &[Player] {
        self.roster(self.innings(which).batting_side.other())
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.team_a_players
            .iter()
            .chain(self.team_b_players.iter())
            .find(|player| player.id == player_id)
    }

    pub fn player_name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.player(player_id)
            .map(|player| player.name.as_str())
            .unwrap_or(player_id)
    }
}
