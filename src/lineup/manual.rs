use crate::lineup::{LineupContext, ReplacementPolicy};
use crate::state::{Player, PlayerId};

/// Leaves every vacancy for the scorer to fill.
#[derive(Default)]
pub struct ManualSelection;

impl ReplacementPolicy for ManualSelection {
    fn openers(&self, _roster: &[Player]) -> (Option<PlayerId>, Option<PlayerId>) {
        (None, None)
    }

    fn opening_bowler(&self, _roster: &[Player]) -> Option<PlayerId> {
        None
    }

    fn next_batter(&self, _ctx: &LineupContext) -> Option<PlayerId> {
        None
    }
}
