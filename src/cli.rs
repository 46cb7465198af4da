use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{ConfigArgs, FormatArg};
use crate::engine::Pending;
use crate::error::{Error, Result};
use crate::events::{BallEvent, Dismissal, MatchEvent};
use crate::lineup::bowler_candidates;
use crate::models::{Batter, ExtraType, WicketType};
use crate::store::MatchStore;

#[derive(Parser, Debug)]
#[command(name = "cric-score", about = "Ball-by-ball cricket scorer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a delivery script and print the scorecard.
    Score {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long, default_value = "", help = "Deliveries and commands, e.g. \"1 4 wd 0+out:bowled\"")]
        script: String,
        #[arg(long, help = "Continue the match stored in this backup file")]
        resume: Option<PathBuf>,
        #[arg(long, help = "Write the store to this backup file afterwards")]
        save: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "human")]
        format: FormatArg,
    },
    /// Print the resolved match configuration.
    ShowConfig {
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Flip for the toss.
    Toss {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Decide a result from final totals.
    Result {
        #[command(flatten)]
        config: ConfigArgs,
        #[arg(long)]
        first: u32,
        #[arg(long)]
        second: u32,
        #[arg(long, default_value_t = 0)]
        second_wickets: u32,
    },
    /// List completed matches in a backup file.
    History {
        #[arg(long)]
        backup: PathBuf,
    },
    /// Merge completed matches from another backup into this one.
    Restore {
        #[arg(long)]
        backup: PathBuf,
        #[arg(long)]
        from: PathBuf,
    },
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

/// Splits a script on commas and whitespace into store events.
pub fn parse_script(input: &str) -> Result<Vec<MatchEvent>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_token)
        .collect()
}

fn parse_token(token: &str) -> Result<MatchEvent> {
    let invalid = || Error::InvalidDelivery(token.to_string());

    match token {
        "swap" => return Ok(MatchEvent::SwapBatsmen),
        "undo" => return Ok(MatchEvent::Undo),
        "next-innings" => return Ok(MatchEvent::StartSecondInnings),
        _ => {}
    }
    if let Some((command, value)) = token.split_once('=') {
        if value.is_empty() {
            return Err(invalid());
        }
        let player_id = value.to_string();
        return match command {
            "bowl" => Ok(MatchEvent::SetBowler { player_id }),
            "striker" => Ok(MatchEvent::SetStriker { player_id }),
            "non-striker" => Ok(MatchEvent::SetNonStriker { player_id }),
            "retire" => Ok(MatchEvent::Retire { player_id }),
            "rename" => {
                let (player_id, name) = value.split_once(':').ok_or_else(invalid)?;
                if player_id.is_empty() || name.is_empty() {
                    return Err(invalid());
                }
                Ok(MatchEvent::Rename {
                    player_id: player_id.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(invalid()),
        };
    }

    let (delivery, wicket) = match token.split_once("+out:") {
        Some((delivery, wicket)) => (delivery, Some(wicket)),
        None => (token, None),
    };
    let mut event = parse_delivery(delivery).ok_or_else(invalid)?;
    if let Some(wicket) = wicket {
        event.wicket = Some(parse_dismissal(wicket, token)?);
    }
    Ok(MatchEvent::RecordBall(event))
}

fn parse_delivery(delivery: &str) -> Option<BallEvent> {
    // Longest prefix first so `nbb` is not read as `nb` + `b`.
    const KINDS: [(&str, ExtraType, u32); 5] = [
        ("nbb", ExtraType::NoBall, 0),
        ("nb", ExtraType::NoBall, 0),
        ("wd", ExtraType::Wide, 0),
        ("lb", ExtraType::LegBye, 1),
        ("b", ExtraType::Bye, 1),
    ];

    if let Ok(runs) = delivery.parse::<u32>() {
        return Some(BallEvent::runs(runs));
    }
    let (prefix, extra_type, default_runs) = KINDS
        .into_iter()
        .find(|(prefix, _, _)| delivery.starts_with(prefix))?;
    let count = &delivery[prefix.len()..];
    let runs = if count.is_empty() {
        default_runs
    } else {
        count.parse().ok()?
    };
    let event = BallEvent::extra(extra_type, runs);
    Some(if prefix == "nbb" {
        event.byes_off_no_ball()
    } else {
        event
    })
}

fn parse_dismissal(input: &str, token: &str) -> Result<Dismissal> {
    let mut parts = input.split(':');
    let kind: WicketType = parts.next().unwrap_or("").parse()?;
    let mut dismissal = Dismissal::new(kind);
    for part in parts {
        match part {
            "striker" => dismissal.who_is_out = Batter::Striker,
            "non-striker" => dismissal.who_is_out = Batter::NonStriker,
            "" => return Err(Error::InvalidDelivery(token.to_string())),
            fielder if dismissal.fielder_id.is_none() => {
                dismissal.fielder_id = Some(fielder.to_string());
            }
            _ => return Err(Error::InvalidDelivery(token.to_string())),
        }
    }
    Ok(dismissal)
}

/// Applies script events in order. With automatic lineups the host picks the
/// first eligible bowler whenever a new over is waiting for one.
pub fn play_script(store: &mut MatchStore, events: Vec<MatchEvent>) -> Result<()> {
    for event in events {
        if matches!(event, MatchEvent::RecordBall(_)) {
            auto_select_bowler(store)?;
        }
        store.apply(event)?;
    }
    Ok(())
}

fn auto_select_bowler(store: &mut MatchStore) -> Result<()> {
    if store.config().custom_names_enabled || store.pending_selection() != Some(Pending::Bowler) {
        return Ok(());
    }
    let state = store.state();
    let which = state.current_innings();
    let next = bowler_candidates(state.bowling_roster(which), state.innings(which))
        .first()
        .map(|player| player.id.clone());
    if let Some(player_id) = next {
        debug!(%player_id, "bowler picked automatically");
        store.set_bowler(&player_id)?;
    }
    Ok(())
}
