use crate::lineup::{batter_candidates, LineupContext, ReplacementPolicy};
use crate::state::{Player, PlayerId};

/// Fills vacancies from the roster in batting order.
#[derive(Default)]
pub struct AutoPromote;

impl ReplacementPolicy for AutoPromote {
    fn openers(&self, roster: &[Player]) -> (Option<PlayerId>, Option<PlayerId>) {
        (
            roster.first().map(|player| player.id.clone()),
            roster.get(1).map(|player| player.id.clone()),
        )
    }

    fn opening_bowler(&self, roster: &[Player]) -> Option<PlayerId> {
        roster.last().map(|player| player.id.clone())
    }

    fn next_batter(&self, ctx: &LineupContext) -> Option<PlayerId> {
        batter_candidates(ctx.roster, ctx.innings, ctx.at_crease)
            .first()
            .map(|player| player.id.clone())
    }
}
