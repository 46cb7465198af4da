use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::{MatchConfig, Team, TossDecision};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TossOutcome {
    pub winner: Team,
    pub decision: TossDecision,
}

impl TossOutcome {
    /// Writes the result into a config so `batting_first` follows it.
    pub fn apply_to(&self, config: &mut MatchConfig) {
        config.toss_winner = Some(self.winner);
        config.toss_decision = Some(self.decision);
    }

    pub fn describe(&self, config: &MatchConfig) -> String {
        format!(
            "{} won the toss and elected to {}",
            config.team_name(self.winner),
            self.decision
        )
    }
}

pub fn flip<R: Rng + ?Sized>(rng: &mut R) -> TossOutcome {
    let winner = if rng.gen_bool(0.5) { Team::A } else { Team::B };
    let decision = if rng.gen_bool(0.5) {
        TossDecision::Bat
    } else {
        TossDecision::Bowl
    };
    TossOutcome { winner, decision }
}

pub fn flip_seeded(seed: u64) -> TossOutcome {
    let mut rng = StdRng::seed_from_u64(seed);
    flip(&mut rng)
}

pub fn flip_unseeded() -> TossOutcome {
    let mut rng = StdRng::from_entropy();
    flip(&mut rng)
}
