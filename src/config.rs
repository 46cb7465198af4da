use clap::{Args, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{MatchConfig, Team, TossDecision};

pub fn load_config(path: &Path) -> Result<MatchConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeamArg {
    TeamA,
    TeamB,
}

impl From<TeamArg> for Team {
    fn from(value: TeamArg) -> Self {
        match value {
            TeamArg::TeamA => Team::A,
            TeamArg::TeamB => Team::B,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionArg {
    Bat,
    Bowl,
}

impl From<DecisionArg> for TossDecision {
    fn from(value: DecisionArg) -> Self {
        match value {
            DecisionArg::Bat => TossDecision::Bat,
            DecisionArg::Bowl => TossDecision::Bowl,
        }
    }
}

/// Match settings shared by every subcommand. Flags override the file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    #[arg(long, help = "TOML or JSON match config; flags override its values")]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub team_a: Option<String>,
    #[arg(long)]
    pub team_b: Option<String>,
    #[arg(long)]
    pub overs: Option<u32>,
    #[arg(long)]
    pub players: Option<u32>,
    #[arg(long)]
    pub wide_runs: Option<u32>,
    #[arg(long)]
    pub no_ball_runs: Option<u32>,
    #[arg(long, help = "Count wides as legal deliveries")]
    pub no_reball_wide: bool,
    #[arg(long, help = "Count no-balls as legal deliveries")]
    pub no_reball_no_ball: bool,
    #[arg(long, value_enum)]
    pub toss_winner: Option<TeamArg>,
    #[arg(long, value_enum)]
    pub toss_decision: Option<DecisionArg>,
    #[arg(long, help = "Pick openers, bowlers and new batters by hand")]
    pub custom_names: bool,
    #[arg(long, help = "Comma-separated names for team A, in batting order")]
    pub team_a_players: Option<String>,
    #[arg(long, help = "Comma-separated names for team B, in batting order")]
    pub team_b_players: Option<String>,
}

pub fn build_config(args: &ConfigArgs) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => MatchConfig::default(),
    };

    if let Some(name) = &args.team_a {
        config.team_a = name.trim().to_string();
    }
    if let Some(name) = &args.team_b {
        config.team_b = name.trim().to_string();
    }
    if let Some(overs) = args.overs {
        config.overs = overs;
    }
    if let Some(players) = args.players {
        config.players_per_team = players;
    }
    if let Some(runs) = args.wide_runs {
        config.runs_for_wide = runs;
    }
    if let Some(runs) = args.no_ball_runs {
        config.runs_for_no_ball = runs;
    }
    if args.no_reball_wide {
        config.reball_for_wide = false;
    }
    if args.no_reball_no_ball {
        config.reball_for_no_ball = false;
    }
    if let Some(winner) = args.toss_winner {
        config.toss_winner = Some(winner.into());
    }
    if let Some(decision) = args.toss_decision {
        config.toss_decision = Some(decision.into());
    }
    if args.custom_names {
        config.custom_names_enabled = true;
    }
    if let Some(names) = &args.team_a_players {
        config.team_a_player_names = split_names(names);
    }
    if let Some(names) = &args.team_b_players {
        config.team_b_player_names = split_names(names);
    }

    config.validate()?;
    Ok(config)
}

fn split_names(input: &str) -> Vec<String> {
    input.split(',').map(|name| name.trim().to_string()).collect()
}

/// Human-readable dump used by `show-config`.
pub fn describe(config: &MatchConfig) -> String {
    let reball = |flag: bool| if flag { "re-ball" } else { "counts as legal" };
    let plural = |runs: u32| if runs == 1 { "run" } else { "runs" };
    let toss = match (config.toss_winner, config.toss_decision) {
        (Some(winner), Some(decision)) => format!(
            "{} won and elected to {}",
            config.team_name(winner),
            decision
        ),
        _ => "none".to_string(),
    };

    let mut out = format!(
        concat!(
            "Teams: {} vs {}\n",
            "Overs: {}\n",
            "Players per team: {}\n",
            "Wide: {} {}, {}\n",
            "No-ball: {} {}, {}\n",
            "Toss: {}\n",
            "Batting first: {}\n",
            "Custom names: {}\n",
        ),
        config.team_a,
        config.team_b,
        config.overs,
        config.players_per_team,
        config.runs_for_wide,
        plural(config.runs_for_wide),
        reball(config.reball_for_wide),
        config.runs_for_no_ball,
        plural(config.runs_for_no_ball),
        reball(config.reball_for_no_ball),
        toss,
        config.team_name(config.batting_first()),
        if config.custom_names_enabled { "on" } else { "off" },
    );
    for (team, names) in &config.saved_teams {
        out.push_str(&format!("Saved {}: {}\n", team, names.join(", ")));
    }
    out
}
