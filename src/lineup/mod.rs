mod auto_promote;
mod manual;

use crate::models::MatchConfig;
use crate::state::{InningsState, Player, PlayerId};

pub use auto_promote::AutoPromote;
pub use manual::ManualSelection;

/// Decides who walks out when an end is vacated.
pub trait ReplacementPolicy {
    fn openers(&self, roster: &[Player]) -> (Option<PlayerId>, Option<PlayerId>);
    fn opening_bowler(&self, roster: &[Player]) -> Option<PlayerId>;
    fn next_batter(&self, ctx: &LineupContext) -> Option<PlayerId>;
}

pub struct LineupContext<'a> {
    pub roster: &'a [Player],
    pub innings: &'a InningsState,
    /// Striker and non-striker ends after strike rotation.
    pub at_crease: [Option<&'a str>; 2],
}

pub fn build_policy(config: &MatchConfig) -> Box<dyn ReplacementPolicy> {
    if config.custom_names_enabled {
        Box::new(ManualSelection)
    } else {
        Box::new(AutoPromote)
    }
}

/// Roster players who can still come in to bat, in batting order.
pub fn batter_candidates<'a>(
    roster: &'a [Player],
    innings: &InningsState,
    at_crease: [Option<&str>; 2],
) -> Vec<&'a Player> {
    roster
        .iter()
        .filter(|player| !at_crease.contains(&Some(player.id.as_str())))
        .filter(|player| {
            innings
                .batting_stats
                .get(&player.id)
                .map_or(true, |stats| !stats.is_finished())
        })
        .collect()
}

/// Bowlers allowed to take the next over: anyone but the last over's bowler.
pub fn bowler_candidates<'a>(roster: &'a [Player], innings: &InningsState) -> Vec<&'a Player> {
    let previous = innings.previous_bowler();
    roster
        .iter()
        .filter(|player| previous != Some(&player.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Team;
    use crate::state::{BattingStats, Over};

    fn roster(prefix: char, count: usize) -> Vec<Player> {
        (1..=count)
            .map(|idx| Player {
                id: format!("{}{}", prefix, idx),
                name: format!("Player {}", idx),
            })
            .collect()
    }

    #[test]
    fn batter_candidates_skip_crease_and_dismissed() {
        let players = roster('A', 5);
        let mut innings = InningsState::new("Team A", Team::A);
        let mut out = BattingStats::new("A3");
        out.is_out = true;
        innings.batting_stats.insert("A3".to_string(), out);
        let mut retired = BattingStats::new("A4");
        retired.is_retired = true;
        innings.batting_stats.insert("A4".to_string(), retired);

        let ids = batter_candidates(&players, &innings, [Some("A1"), Some("A2")])
            .into_iter()
            .map(|player| player.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["A5"]);
    }

    #[test]
    fn bowler_candidates_exclude_previous_over() {
        let players = roster('B', 3);
        let mut innings = InningsState::new("Team A", Team::A);
        assert_eq!(bowler_candidates(&players, &innings).len(), 3);

        innings.overs.push(Over {
            balls: Vec::new(),
            bowler_id: "B3".to_string(),
        });
        let ids = bowler_candidates(&players, &innings)
            .into_iter()
            .map(|player| player.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["B1", "B2"]);
    }

    #[test]
    fn policy_follows_custom_names_flag() {
        let players = roster('A', 3);
        let auto = build_policy(&MatchConfig::default());
        assert_eq!(
            auto.openers(&players),
            (Some("A1".to_string()), Some("A2".to_string()))
        );

        let manual = build_policy(&MatchConfig {
            custom_names_enabled: true,
            ..MatchConfig::default()
        });
        assert_eq!(manual.openers(&players), (None, None));
    }
}
