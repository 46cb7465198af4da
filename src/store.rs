use std::mem;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::backup::{self, PersistedStore};
use crate::engine::{self, Pending};
use crate::error::{Error, Result};
use crate::events::{BallEvent, MatchEvent};
use crate::lineup::{batter_candidates, bowler_candidates};
use crate::models::{MatchConfig, Team};
use crate::state::{Innings, MatchState};

/// Owns the live match, its undo stack and the completed-match history.
/// Every change to `state` goes through an engine transition.
#[derive(Debug)]
pub struct MatchStore {
    config: MatchConfig,
    state: MatchState,
    snapshots: Vec<MatchState>,
    history: Vec<MatchState>,
}

impl MatchStore {
    pub fn new(config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: MatchState::default(),
            snapshots: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Resumes from a backup. The undo stack starts empty.
    pub fn from_persisted(persisted: PersistedStore) -> Result<Self> {
        persisted.config.validate()?;
        Ok(Self {
            config: persisted.config,
            state: persisted.state,
            snapshots: Vec::new(),
            history: persisted.history,
        })
    }

    pub fn persisted(&self) -> PersistedStore {
        PersistedStore {
            config: self.config.clone(),
            state: self.state.clone(),
            history: self.history.clone(),
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn history(&self) -> &[MatchState] {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    pub fn set_config(&mut self, config: MatchConfig) -> Result<()> {
        if self.state.is_playing() {
            warn!("config change rejected during play");
            return Err(Error::MatchInProgress);
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn start_match(&mut self) -> Result<()> {
        if self.state.is_playing() {
            warn!("start rejected, match already in play");
            return Err(Error::MatchInProgress);
        }
        self.config.validate()?;
        self.state = engine::start_match(&self.config);
        self.snapshots.clear();

        if self.config.custom_names_enabled {
            for team in [Team::A, Team::B] {
                let names = self
                    .state
                    .roster(team)
                    .iter()
                    .map(|player| player.name.clone())
                    .collect();
                let key = self.config.team_name(team).to_string();
                self.config.saved_teams.insert(key, names);
            }
        }

        info!(
            team_a = %self.config.team_a,
            team_b = %self.config.team_b,
            overs = self.config.overs,
            batting_first = %self.state.current().batting_team,
            "match started"
        );
        Ok(())
    }

    pub fn record_ball(&mut self, event: BallEvent) -> Result<()> {
        event.validate()?;
        let which = self.live_innings()?;
        if let Some(pending) = engine::pending_selection(&self.state) {
            warn!(%pending, "ball rejected, selection pending");
            return Err(Error::SelectionPending(pending));
        }

        let next = engine::process_ball(&self.state, &self.config, &event);
        let previous = mem::replace(&mut self.state, next);
        self.snapshots.push(previous);

        let innings = self.state.innings(which);
        debug!(
            innings = which.number(),
            runs = event.runs,
            extra = %event.extra_type,
            wicket = event.wicket.is_some(),
            score = %format!("{}/{}", innings.total_runs, innings.total_wickets),
            overs = %innings.overs_bowled(),
            "ball recorded"
        );

        if self.state.is_innings_break() {
            info!(
                runs = innings.total_runs,
                wickets = innings.total_wickets,
                "first innings closed"
            );
        }
        if let Some(result) = self.state.match_result().cloned() {
            self.state.completed_at = Some(Utc::now());
            self.history.push(self.state.clone());
            info!(winner = %result.winner, reason = %result.reason, "match completed");
        }
        Ok(())
    }

    /// Restores the snapshot taken before the last recorded ball. Undoing the
    /// winning ball also takes the match back out of history.
    pub fn undo_ball(&mut self) -> Result<()> {
        let Some(previous) = self.snapshots.pop() else {
            warn!("undo rejected, no recorded ball");
            return Err(Error::NothingToUndo);
        };
        if self.state.match_result().is_some() {
            if let Some(idx) = self.history.iter().rposition(|entry| *entry == self.state) {
                self.history.remove(idx);
            }
        }
        self.state = previous;
        debug!(remaining = self.snapshots.len(), "ball undone");
        Ok(())
    }

    pub fn swap_batsmen(&mut self) -> Result<()> {
        self.live_innings()?;
        self.state = engine::swap_batsmen(&self.state);
        Ok(())
    }

    pub fn retire_player(&mut self, player_id: &str) -> Result<()> {
        let which = self.live_innings()?;
        if !self.state.innings(which).is_at_crease(player_id) {
            warn!(player_id, "retire rejected");
            return Err(Error::NotAtCrease(player_id.to_string()));
        }
        let innings = self.state.innings(which);
        let at_crease = [innings.striker_id.as_deref(), innings.non_striker_id.as_deref()];
        if batter_candidates(self.state.batting_roster(which), innings, at_crease).is_empty() {
            warn!(player_id, "retire rejected, no batter left");
            return Err(Error::NoReplacementBatter(player_id.to_string()));
        }
        self.state = engine::retire_player(&self.state, &self.config, player_id);
        info!(player_id, "batter retired");
        Ok(())
    }

    pub fn rename_player(&mut self, player_id: &str, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyPlayerName);
        }
        if self.state.player(player_id).is_none() {
            return Err(Error::UnknownPlayer(player_id.to_string()));
        }
        let (state, config) = engine::rename_player(&self.state, &self.config, player_id, name);
        self.state = state;
        self.config = config;
        Ok(())
    }

    pub fn set_striker(&mut self, player_id: &str) -> Result<()> {
        self.check_batter(player_id, Pending::Striker)?;
        self.state = engine::assign_striker(&self.state, player_id);
        Ok(())
    }

    pub fn set_non_striker(&mut self, player_id: &str) -> Result<()> {
        self.check_batter(player_id, Pending::NonStriker)?;
        self.state = engine::assign_non_striker(&self.state, player_id);
        Ok(())
    }

    pub fn set_bowler(&mut self, player_id: &str) -> Result<()> {
        let which = self.live_innings()?;
        self.known_player(player_id)?;
        let allowed = bowler_candidates(
            self.state.bowling_roster(which),
            self.state.innings(which),
        )
        .iter()
        .any(|player| player.id == player_id);
        if !allowed {
            warn!(player_id, "bowler selection rejected");
            return Err(Error::InvalidSelection(
                player_id.to_string(),
                Pending::Bowler,
            ));
        }
        self.state = engine::assign_bowler(&self.state, player_id);
        debug!(player_id, "bowler selected");
        Ok(())
    }

    pub fn start_second_innings(&mut self) -> Result<()> {
        if !self.state.is_innings_break() {
            return Err(Error::NotInningsBreak);
        }
        self.state = engine::start_second_innings(&self.state, &self.config);
        info!(
            target = self.state.innings(Innings::First).total_runs + 1,
            batting = %self.state.current().batting_team,
            "second innings started"
        );
        Ok(())
    }

    /// Drops the current match. Config and history are kept.
    pub fn reset_match(&mut self) {
        self.state = MatchState::default();
        self.snapshots.clear();
        info!("match reset");
    }

    pub fn pending_selection(&self) -> Option<Pending> {
        self.state
            .phase
            .live_innings()
            .and_then(|_| engine::pending_selection(&self.state))
    }

    pub fn apply(&mut self, event: MatchEvent) -> Result<()> {
        match event {
            MatchEvent::RecordBall(ball) => self.record_ball(ball),
            MatchEvent::Undo => self.undo_ball(),
            MatchEvent::SwapBatsmen => self.swap_batsmen(),
            MatchEvent::Retire { player_id } => self.retire_player(&player_id),
            MatchEvent::Rename { player_id, name } => self.rename_player(&player_id, &name),
            MatchEvent::SetStriker { player_id } => self.set_striker(&player_id),
            MatchEvent::SetNonStriker { player_id } => self.set_non_striker(&player_id),
            MatchEvent::SetBowler { player_id } => self.set_bowler(&player_id),
            MatchEvent::StartSecondInnings => self.start_second_innings(),
        }
    }

    /// Merges completed matches from a backup, skipping ones already held.
    pub fn restore_matches(&mut self, json: &str) -> Result<usize> {
        let persisted = backup::import(json)?;
        let added = backup::merge_history(&mut self.history, persisted.history);
        info!(added, total = self.history.len(), "history restored");
        Ok(added)
    }

    fn live_innings(&self) -> Result<Innings> {
        self.state.phase.live_innings().ok_or_else(|| {
            warn!(phase = self.state.phase.label(), "action rejected, no live innings");
            Error::NotLive
        })
    }

    fn known_player(&self, player_id: &str) -> Result<()> {
        match self.state.player(player_id) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownPlayer(player_id.to_string())),
        }
    }

    fn check_batter(&self, player_id: &str, end: Pending) -> Result<()> {
        let which = self.live_innings()?;
        self.known_player(player_id)?;
        let innings = self.state.innings(which);
        let other_end = match end {
            Pending::NonStriker => innings.striker_id.as_deref(),
            _ => innings.non_striker_id.as_deref(),
        };
        let allowed = batter_candidates(self.state.batting_roster(which), innings, [None, other_end])
            .iter()
            .any(|player| player.id == player_id);
        if !allowed {
            warn!(player_id, %end, "batter selection rejected");
            return Err(Error::InvalidSelection(player_id.to_string(), end));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Dismissal;
    use crate::models::WicketType;
    use crate::state::MatchPhase;

    fn store(config: MatchConfig) -> MatchStore {
        let mut store = MatchStore::new(config).unwrap();
        store.start_match().unwrap();
        store
    }

    fn one_over_config() -> MatchConfig {
        MatchConfig {
            overs: 1,
            ..MatchConfig::default()
        }
    }

    fn finish_match(store: &mut MatchStore) {
        for _ in 0..6 {
            store.record_ball(BallEvent::runs(1)).unwrap();
        }
        store.start_second_innings().unwrap();
        for _ in 0..5 {
            store.record_ball(BallEvent::runs(0)).unwrap();
        }
        store.record_ball(BallEvent::runs(4)).unwrap();
    }

    #[test]
    fn ball_before_start_is_rejected() {
        let mut store = MatchStore::new(MatchConfig::default()).unwrap();
        let err = store.record_ball(BallEvent::runs(1)).unwrap_err();
        assert_eq!(err.to_string(), "match is not in play");
    }

    #[test]
    fn catch_without_fielder_never_reaches_engine() {
        let mut store = store(MatchConfig::default());
        assert!(store.record_ball(BallEvent::wicket(WicketType::Caught)).is_err());
        assert!(!store.can_undo());
        assert_eq!(store.state().current().total_runs, 0);
    }

    #[test]
    fn pending_bowler_blocks_next_ball() {
        let mut store = store(MatchConfig::default());
        for _ in 0..6 {
            store.record_ball(BallEvent::runs(0)).unwrap();
        }
        assert_eq!(store.pending_selection(), Some(Pending::Bowler));
        let err = store.record_ball(BallEvent::runs(1)).unwrap_err();
        assert_eq!(err.to_string(), "awaiting bowler selection");

        let err = store.set_bowler("B11").unwrap_err();
        assert_eq!(err.to_string(), "player 'B11' cannot be selected as bowler");
        store.set_bowler("B10").unwrap();
        store.record_ball(BallEvent::runs(1)).unwrap();
    }

    #[test]
    fn undo_restores_previous_snapshot() {
        let mut store = store(MatchConfig::default());
        let before = store.state().clone();
        store.record_ball(BallEvent::runs(4)).unwrap();
        store.undo_ball().unwrap();
        assert_eq!(store.state(), &before);
        assert_eq!(store.undo_ball().unwrap_err().to_string(), "nothing to undo");
    }

    #[test]
    fn completed_match_lands_in_history_with_timestamp() {
        let mut store = store(one_over_config());
        finish_match(&mut store);
        let result = store.state().match_result().unwrap();
        assert_eq!(result.winner, "Team A");
        assert_eq!(result.reason, "Won by 2 runs");
        assert_eq!(store.history().len(), 1);
        assert!(store.history()[0].completed_at.is_some());
    }

    #[test]
    fn undoing_the_last_ball_reopens_the_match() {
        let mut store = store(one_over_config());
        finish_match(&mut store);
        store.undo_ball().unwrap();
        assert!(store.history().is_empty());
        assert_eq!(store.state().phase, MatchPhase::InningsTwoLive);
        assert!(store.state().completed_at.is_none());
    }

    #[test]
    fn config_is_frozen_during_play() {
        let mut store = store(MatchConfig::default());
        let err = store.set_config(one_over_config()).unwrap_err();
        assert_eq!(err.to_string(), "config cannot change while a match is in play");
        store.reset_match();
        store.set_config(one_over_config()).unwrap();
        assert_eq!(store.config().overs, 1);
    }

    #[test]
    fn manual_selection_flow() {
        let mut store = store(MatchConfig {
            custom_names_enabled: true,
            team_a_player_names: vec!["Rohit".to_string(), "Gill".to_string()],
            ..MatchConfig::default()
        });
        assert_eq!(store.config().saved_teams["Team A"][0], "Rohit");
        assert_eq!(store.pending_selection(), Some(Pending::Striker));

        store.set_striker("A2").unwrap();
        let err = store.set_non_striker("A2").unwrap_err();
        assert_eq!(err.to_string(), "player 'A2' cannot be selected as non-striker");
        store.set_non_striker("A1").unwrap();
        assert!(store.set_bowler("A5").is_err());
        store.set_bowler("B1").unwrap();

        store
            .record_ball(BallEvent::runs(0).with_wicket(Dismissal::new(WicketType::Lbw)))
            .unwrap();
        assert_eq!(store.pending_selection(), Some(Pending::Striker));
        assert!(store.set_striker("A2").is_err());
        store.set_striker("A3").unwrap();
    }

    #[test]
    fn retire_requires_batter_at_crease() {
        let mut store = store(MatchConfig::default());
        let err = store.retire_player("A9").unwrap_err();
        assert_eq!(err.to_string(), "player 'A9' is not at the crease");
        store.retire_player("A1").unwrap();
        assert_eq!(store.state().current().striker_id.as_deref(), Some("A3"));
    }

    #[test]
    fn retire_is_refused_when_nobody_can_replace() {
        let mut store = store(MatchConfig {
            players_per_team: 2,
            ..MatchConfig::default()
        });
        let before = store.state().clone();
        let err = store.retire_player("A1").unwrap_err();
        assert_eq!(err.to_string(), "no batter left to replace 'A1'");
        assert_eq!(store.state(), &before);
        assert_eq!(store.pending_selection(), None);
        store.record_ball(BallEvent::runs(1)).unwrap();
    }

    #[test]
    fn oversized_run_count_is_rejected_before_scoring() {
        let mut store = store(MatchConfig::default());
        store.record_ball(BallEvent::runs(4)).unwrap();
        assert!(matches!(
            store.record_ball(BallEvent::runs(u32::MAX)),
            Err(Error::TooManyRuns(_))
        ));
        store.record_ball(BallEvent::runs(2)).unwrap();
        assert_eq!(store.state().current().total_runs, 6);
    }

    #[test]
    fn rename_checks_player_and_name() {
        let mut store = store(MatchConfig::default());
        assert!(matches!(
            store.rename_player("Z1", "Someone"),
            Err(Error::UnknownPlayer(_))
        ));
        assert!(matches!(
            store.rename_player("A1", "  "),
            Err(Error::EmptyPlayerName)
        ));
        store.rename_player("B2", " Bumrah ").unwrap();
        assert_eq!(store.state().player_name("B2"), "Bumrah");
        assert_eq!(store.config().saved_teams["Team B"][1], "Bumrah");
    }

    #[test]
    fn apply_dispatches_events() {
        let mut store = store(MatchConfig::default());
        store.apply(MatchEvent::RecordBall(BallEvent::runs(2))).unwrap();
        store.apply(MatchEvent::SwapBatsmen).unwrap();
        assert_eq!(store.state().current().striker_id.as_deref(), Some("A2"));
        store.apply(MatchEvent::Undo).unwrap();
        assert_eq!(store.state().current().total_runs, 0);
        assert!(matches!(
            store.apply(MatchEvent::StartSecondInnings),
            Err(Error::NotInningsBreak)
        ));
    }

    #[test]
    fn restore_skips_matches_already_in_history() {
        let mut store = store(one_over_config());
        finish_match(&mut store);
        let json = backup::export(&store.persisted()).unwrap();

        assert_eq!(store.restore_matches(&json).unwrap(), 0);

        let mut fresh = MatchStore::new(one_over_config()).unwrap();
        assert_eq!(fresh.restore_matches(&json).unwrap(), 1);
        assert_eq!(fresh.history(), store.history());
    }
}
