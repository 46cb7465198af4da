use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const MAX_PLAYERS_PER_TEAM: u32 = 11;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchConfig {
    pub team_a: String,
    pub team_b: String,
    pub overs: u32,
    pub players_per_team: u32,
    pub runs_for_wide: u32,
    pub runs_for_no_ball: u32,
    pub reball_for_wide: bool,
    pub reball_for_no_ball: bool,
    pub toss_winner: Option<Team>,
    pub toss_decision: Option<TossDecision>,
    pub custom_names_enabled: bool,
    pub team_a_player_names: Vec<String>,
    pub team_b_player_names: Vec<String>,
    /// Team name -> player names, reused when the same team plays again.
    pub saved_teams: BTreeMap<String, Vec<String>>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            team_a: "Team A".to_string(),
            team_b: "Team B".to_string(),
            overs: 5,
            players_per_team: 11,
            runs_for_wide: 1,
            runs_for_no_ball: 1,
            reball_for_wide: true,
            reball_for_no_ball: true,
            toss_winner: None,
            toss_decision: None,
            custom_names_enabled: false,
            team_a_player_names: Vec::new(),
            team_b_player_names: Vec::new(),
            saved_teams: BTreeMap::new(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.overs == 0 {
            return Err(Error::OversZero);
        }
        if !(2..=MAX_PLAYERS_PER_TEAM).contains(&self.players_per_team) {
            return Err(Error::InvalidPlayersPerTeam(self.players_per_team));
        }
        if self.team_a.trim().is_empty() || self.team_b.trim().is_empty() {
            return Err(Error::EmptyTeamName);
        }
        if self.team_a.trim() == self.team_b.trim() {
            return Err(Error::DuplicateTeamName(self.team_a.trim().to_string()));
        }
        if self.runs_for_wide > 1 {
            return Err(Error::InvalidWidePenalty(self.runs_for_wide));
        }
        if self.runs_for_no_ball > 1 {
            return Err(Error::InvalidNoBallPenalty(self.runs_for_no_ball));
        }
        if self.toss_winner.is_some() && self.toss_decision.is_none() {
            return Err(Error::MissingTossDecision);
        }
        Ok(())
    }

    pub fn team_name(&self, team: Team) -> &str {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    pub fn custom_names(&self, team: Team) -> &[String] {
        match team {
            Team::A => &self.team_a_player_names,
            Team::B => &self.team_b_player_names,
        }
    }

    pub fn batting_first(&self) -> Team {
        match (self.toss_winner, self.toss_decision) {
            (Some(winner), Some(TossDecision::Bat)) => winner,
            (Some(winner), Some(TossDecision::Bowl)) => winner.other(),
            _ => Team::A,
        }
    }

    /// Wicket count that ends an innings.
    pub fn all_out_wickets(&self) -> u32 {
        self.players_per_team.saturating_sub(1)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Team {
    #[serde(rename = "teamA")]
    A,
    #[serde(rename = "teamB")]
    B,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }

    pub fn id_prefix(self) -> char {
        match self {
            Team::A => 'A',
            Team::B => 'B',
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => write!(f, "teamA"),
            Team::B => write!(f, "teamB"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TossDecision {
    Bat,
    Bowl,
}

impl fmt::Display for TossDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TossDecision::Bat => write!(f, "bat"),
            TossDecision::Bowl => write!(f, "bowl"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraType {
    #[default]
    None,
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl ExtraType {
    /// Runs off a bye or leg-bye are never charged to the bowler.
    pub fn charged_to_bowler(self) -> bool {
        !matches!(self, ExtraType::Bye | ExtraType::LegBye)
    }
}

impl fmt::Display for ExtraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtraType::None => "none",
            ExtraType::Wide => "wide",
            ExtraType::NoBall => "no-ball",
            ExtraType::Bye => "bye",
            ExtraType::LegBye => "leg-bye",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WicketType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    RetiredHurt,
    Other,
}

impl WicketType {
    pub const ALL: [WicketType; 7] = [
        WicketType::Bowled,
        WicketType::Caught,
        WicketType::Lbw,
        WicketType::RunOut,
        WicketType::Stumped,
        WicketType::RetiredHurt,
        WicketType::Other,
    ];

    pub fn credits_bowler(self) -> bool {
        !matches!(self, WicketType::RunOut | WicketType::RetiredHurt)
    }

    pub fn needs_fielder(self) -> bool {
        matches!(
            self,
            WicketType::Caught | WicketType::RunOut | WicketType::Stumped
        )
    }
}

impl fmt::Display for WicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WicketType::Bowled => "bowled",
            WicketType::Caught => "caught",
            WicketType::Lbw => "lbw",
            WicketType::RunOut => "run-out",
            WicketType::Stumped => "stumped",
            WicketType::RetiredHurt => "retired-hurt",
            WicketType::Other => "other",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for WicketType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        WicketType::ALL
            .into_iter()
            .find(|kind| kind.to_string() == value)
            .ok_or_else(|| Error::UnknownWicketType(value.to_string()))
    }
}

/// Which batter a dismissal applies to. Only run-outs may take the non-striker.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Batter {
    #[default]
    Striker,
    NonStriker,
}

impl fmt::Display for Batter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Batter::Striker => write!(f, "striker"),
            Batter::NonStriker => write!(f, "non-striker"),
        }
    }
}
