use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Batter, ExtraType, WicketType};
use crate::state::PlayerId;

/// Upper bound on runs entered for a single delivery, overthrows included.
pub const MAX_RUNS_PER_BALL: u32 = 10;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Dismissal {
    pub kind: WicketType,
    pub fielder_id: Option<PlayerId>,
    #[serde(default)]
    pub who_is_out: Batter,
}

impl Dismissal {
    pub fn new(kind: WicketType) -> Self {
        Self {
            kind,
            fielder_id: None,
            who_is_out: Batter::Striker,
        }
    }

    pub fn by(mut self, fielder_id: &str) -> Self {
        self.fielder_id = Some(fielder_id.to_string());
        self
    }

    pub fn of(mut self, who_is_out: Batter) -> Self {
        self.who_is_out = who_is_out;
        self
    }
}

/// A single recorded delivery as entered by the scorer.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct BallEvent {
    /// Runs hit or run, excluding any wide/no-ball penalty.
    pub runs: u32,
    pub extra_type: ExtraType,
    pub wicket: Option<Dismissal>,
    /// Runs off a no-ball were byes, not off the bat.
    #[serde(default)]
    pub bye_for_no_ball: bool,
}

impl BallEvent {
    pub fn runs(runs: u32) -> Self {
        Self::extra(ExtraType::None, runs)
    }

    pub fn extra(extra_type: ExtraType, runs: u32) -> Self {
        Self {
            runs,
            extra_type,
            wicket: None,
            bye_for_no_ball: false,
        }
    }

    pub fn wicket(kind: WicketType) -> Self {
        Self::runs(0).with_wicket(Dismissal::new(kind))
    }

    pub fn with_wicket(mut self, dismissal: Dismissal) -> Self {
        self.wicket = Some(dismissal);
        self
    }

    pub fn byes_off_no_ball(mut self) -> Self {
        self.bye_for_no_ball = true;
        self
    }

    /// Caller-side contract check; the engine itself trusts its input.
    pub fn validate(&self) -> Result<()> {
        if self.runs > MAX_RUNS_PER_BALL {
            return Err(Error::TooManyRuns(self.runs));
        }
        if let Some(dismissal) = &self.wicket {
            if dismissal.kind.needs_fielder() && dismissal.fielder_id.is_none() {
                return Err(Error::MissingFielder(dismissal.kind));
            }
        }
        Ok(())
    }
}

/// Every mutation a store accepts, in the order the scorer recorded them.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum MatchEvent {
    RecordBall(BallEvent),
    Undo,
    SwapBatsmen,
    Retire { player_id: PlayerId },
    Rename { player_id: PlayerId, name: String },
    SetStriker { player_id: PlayerId },
    SetNonStriker { player_id: PlayerId },
    SetBowler { player_id: PlayerId },
    StartSecondInnings,
}
