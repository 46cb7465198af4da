use thiserror::Error;

use crate::engine::Pending;
use crate::models::WicketType;

#[derive(Error, Debug)]
pub enum Error {
    #[error("overs must be greater than 0")]
    OversZero,
    #[error("players per team must be between 2 and 11 (got {0})")]
    InvalidPlayersPerTeam(u32),
    #[error("team names must not be empty")]
    EmptyTeamName,
    #[error("team names must differ (both are '{0}')")]
    DuplicateTeamName(String),
    #[error("wide penalty must be 0 or 1 (got {0})")]
    InvalidWidePenalty(u32),
    #[error("no-ball penalty must be 0 or 1 (got {0})")]
    InvalidNoBallPenalty(u32),
    #[error("toss decision required when a toss winner is set")]
    MissingTossDecision,
    #[error("config cannot change while a match is in play")]
    MatchInProgress,
    #[error("match is not in play")]
    NotLive,
    #[error("no innings break to end")]
    NotInningsBreak,
    #[error("awaiting {0} selection")]
    SelectionPending(Pending),
    #[error("unknown player '{0}'")]
    UnknownPlayer(String),
    #[error("player '{0}' cannot be selected as {1}")]
    InvalidSelection(String, Pending),
    #[error("player '{0}' is not at the crease")]
    NotAtCrease(String),
    #[error("no batter left to replace '{0}'")]
    NoReplacementBatter(String),
    #[error("player name must not be empty")]
    EmptyPlayerName,
    #[error("{0} requires a fielder")]
    MissingFielder(WicketType),
    #[error("at most {max} runs can come off one delivery (got {0})", max = crate::events::MAX_RUNS_PER_BALL)]
    TooManyRuns(u32),
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("invalid delivery '{0}'")]
    InvalidDelivery(String),
    #[error("unknown wicket type '{0}'")]
    UnknownWicketType(String),
    #[error("innings {0} is inconsistent: {1}")]
    InconsistentInnings(u8, String),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Backup(String),
    #[error("{0}")]
    Cli(String),
}

pub type Result<T> = std::result::Result<T, Error>;
