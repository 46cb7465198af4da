use std::fs;
use std::path::Path;

use cric_score::backup::{self, PersistedStore};
use cric_score::cli::{self, Command};
use cric_score::config::{self, FormatArg};
use cric_score::engine;
use cric_score::error::{Error, Result};
use cric_score::output::{self, Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};
use cric_score::state::Innings;
use cric_score::store::MatchStore;
use cric_score::telemetry;
use cric_score::toss;
use tracing::info;

fn main() {
    telemetry::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::parse_args()?;

    match args.command {
        Command::Score {
            config,
            script,
            resume,
            save,
            format,
        } => {
            let events = cli::parse_script(&script)?;
            let mut store = match resume {
                Some(path) => MatchStore::from_persisted(backup::load_from_path(&path)?)?,
                None => MatchStore::new(config::build_config(&config)?)?,
            };
            if !store.state().is_playing() {
                store.start_match()?;
            }
            cli::play_script(&mut store, events)?;

            if let Some(path) = save {
                backup::save_to_path(&path, &store.persisted())?;
                info!(path = %path.display(), "backup written");
            }
            let formatter = formatter_for(&format);
            print!("{}", formatter.write(store.config(), store.state()));
        }
        Command::ShowConfig { config } => {
            let config = config::build_config(&config)?;
            print!("{}", config::describe(&config));
        }
        Command::Toss { config, seed } => {
            let mut config = config::build_config(&config)?;
            let outcome = match seed {
                Some(seed) => toss::flip_seeded(seed),
                None => toss::flip_unseeded(),
            };
            outcome.apply_to(&mut config);
            println!("{}", outcome.describe(&config));
            println!("Batting first: {}", config.team_name(config.batting_first()));
        }
        Command::Result {
            config,
            first,
            second,
            second_wickets,
        } => {
            let config = config::build_config(&config)?;
            let mut state = engine::start_match(&config);
            state.innings_mut(Innings::First).total_runs = first;
            let chase = state.innings_mut(Innings::Second);
            chase.total_runs = second;
            chase.total_wickets = second_wickets.min(config.all_out_wickets());
            let result = engine::calculate_match_result(&state, &config);
            println!("Winner: {}", result.winner);
            println!("Reason: {}", result.reason);
        }
        Command::History { backup: path } => {
            let persisted = backup::load_from_path(&path)?;
            print!("{}", output::history_lines(&persisted.history));
        }
        Command::Restore { backup: path, from } => {
            let mut store = MatchStore::from_persisted(load_or_default(&path)?)?;
            let json = fs::read_to_string(&from).map_err(|err| {
                Error::Backup(format!(
                    "failed to read backup '{}': {}",
                    from.display(),
                    err
                ))
            })?;
            let added = store.restore_matches(&json)?;
            backup::save_to_path(&path, &store.persisted())?;
            println!(
                "Restored {} new matches ({} total)",
                added,
                store.history().len()
            );
        }
    }

    Ok(())
}

fn load_or_default(path: &Path) -> Result<PersistedStore> {
    if path.exists() {
        return backup::load_from_path(path);
    }
    Ok(PersistedStore {
        config: Default::default(),
        state: Default::default(),
        history: Vec::new(),
    })
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
