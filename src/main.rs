use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bracket_predictor::bracket::MatchState;
use bracket_predictor::calculate::{GroupStandings, ThirdPlaceStatus};
use bracket_predictor::config::AppConfig;
use bracket_predictor::models::{GroupLetter, MatchId, MatchScore, PlayoffId, TeamId};
use bracket_predictor::resolve::{Evaluation, GroupOutcome, Predictor};
use bracket_predictor::storage::{load_reference, PredictionStore, StorageConfig};

#[derive(Parser)]
#[command(name = "bracket-predictor")]
#[command(about = "Tournament prediction engine: group standings, best thirds and knockout bracket")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show group standings
    Standings {
        /// Saved prediction name
        #[arg(long, default_value = "default")]
        prediction: String,

        /// Only this group
        #[arg(long)]
        group: Option<char>,
    },

    /// Rank third-placed teams and show the qualifying combination
    ThirdPlace {
        #[arg(long, default_value = "default")]
        prediction: String,
    },

    /// Show every knockout match with its resolved teams
    Bracket {
        #[arg(long, default_value = "default")]
        prediction: String,
    },

    /// Enter a group match score (empty text clears a side)
    Score {
        #[arg(long, default_value = "default")]
        prediction: String,

        #[arg(long)]
        group: char,

        /// Group match number, 1-6
        #[arg(long = "match")]
        match_number: u8,

        #[arg(long)]
        goals_a: String,

        #[arg(long)]
        goals_b: String,
    },

    /// Pick the winner of a knockout match
    Pick {
        #[arg(long, default_value = "default")]
        prediction: String,

        #[arg(long = "match")]
        match_id: u32,

        #[arg(long)]
        team: u32,
    },

    /// Remove the winner of a knockout match and everything after it
    Clear {
        #[arg(long, default_value = "default")]
        prediction: String,

        #[arg(long = "match")]
        match_id: u32,
    },

    /// Pick a playoff winner
    Playoff {
        #[arg(long, default_value = "default")]
        prediction: String,

        #[arg(long)]
        id: String,

        #[arg(long)]
        team: u32,
    },

    /// Break a group's current tie, best team first (comma-separated ids)
    Tiebreak {
        #[arg(long, default_value = "default")]
        prediction: String,

        #[arg(long)]
        group: char,

        #[arg(long, value_delimiter = ',')]
        order: Vec<u32>,
    },

    /// Choose the qualifying third-place groups explicitly
    Thirds {
        #[arg(long, default_value = "default")]
        prediction: String,

        /// Group letters, e.g. EFGHIJKL; omit to clear the choice
        #[arg(long)]
        letters: Option<String>,
    },

    /// Show completeness counters
    Status {
        #[arg(long, default_value = "default")]
        prediction: String,
    },

    /// List saved predictions
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting bracket-predictor v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let reference = load_reference(&storage)
        .with_context(|| format!("Failed to load reference data from {:?}", storage.data_dir))?;
    let predictor = Predictor::new(reference, config.engine.clone());
    let store = PredictionStore::new(storage);

    match cli.command {
        Commands::Standings { prediction, group } => {
            let state = store.load_or_default(&prediction)?;
            let evaluation = predictor.evaluate(&state);
            let only = group.map(parse_group).transpose()?;
            for outcome in evaluation.groups() {
                if only.is_some_and(|g| g != outcome.group) {
                    continue;
                }
                print_group(&predictor, outcome);
            }
        }

        Commands::ThirdPlace { prediction } => {
            let state = store.load_or_default(&prediction)?;
            print_third_place(&predictor, &predictor.evaluate(&state));
        }

        Commands::Bracket { prediction } => {
            let state = store.load_or_default(&prediction)?;
            print_bracket(&predictor, &predictor.evaluate(&state));
        }

        Commands::Score {
            prediction,
            group,
            match_number,
            goals_a,
            goals_b,
        } => {
            let mut state = store.load_or_default(&prediction)?;
            let cleared = predictor.set_match_score(
                &mut state,
                parse_group(group)?,
                match_number,
                MatchScore::from_raw(&goals_a, &goals_b),
            )?;
            store.save(&prediction, &state)?;
            print_cleared(&cleared);
        }

        Commands::Pick {
            prediction,
            match_id,
            team,
        } => {
            let mut state = store.load_or_default(&prediction)?;
            let cleared = predictor.select_winner(&mut state, MatchId(match_id), TeamId(team))?;
            store.save(&prediction, &state)?;
            println!(
                "{}: {} advances",
                MatchId(match_id),
                predictor.reference().team_name(TeamId(team))
            );
            print_cleared(&cleared);
        }

        Commands::Clear {
            prediction,
            match_id,
        } => {
            let mut state = store.load_or_default(&prediction)?;
            let cleared = predictor.clear_winner(&mut state, MatchId(match_id))?;
            store.save(&prediction, &state)?;
            print_cleared(&cleared);
        }

        Commands::Playoff {
            prediction,
            id,
            team,
        } => {
            let mut state = store.load_or_default(&prediction)?;
            let cleared =
                predictor.select_playoff_winner(&mut state, &PlayoffId::new(id), TeamId(team))?;
            store.save(&prediction, &state)?;
            print_cleared(&cleared);
        }

        Commands::Tiebreak {
            prediction,
            group,
            order,
        } => {
            let mut state = store.load_or_default(&prediction)?;
            let order = order.into_iter().map(TeamId).collect();
            let cleared = predictor.set_tiebreaker_decision(&mut state, parse_group(group)?, order)?;
            store.save(&prediction, &state)?;
            print_cleared(&cleared);
        }

        Commands::Thirds {
            prediction,
            letters,
        } => {
            let mut state = store.load_or_default(&prediction)?;
            let cleared = predictor.set_third_place(&mut state, letters.as_deref())?;
            store.save(&prediction, &state)?;
            print_cleared(&cleared);
        }

        Commands::Status { prediction } => {
            let state = store.load_or_default(&prediction)?;
            let completeness = predictor.evaluate(&state).completeness();
            println!("=== Prediction '{}' ===", prediction);
            println!("Groups settled:   {}", completeness.groups);
            println!("Playoffs decided: {}", completeness.playoffs);
            println!("Third place:      {}", completeness.third_place);
            println!("Knockout picks:   {}", completeness.knockout);
            println!(
                "\n{}",
                if completeness.is_complete() {
                    "Prediction complete"
                } else {
                    "Prediction incomplete"
                }
            );
        }

        Commands::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!("No saved predictions in {:?}", config.data_dir);
            }
            for name in names {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn parse_group(c: char) -> Result<GroupLetter> {
    GroupLetter::new(c).ok_or_else(|| anyhow!("Invalid group letter: {}", c))
}

fn slot_label(predictor: &Predictor, team: Option<TeamId>) -> String {
    team.map(|t| predictor.reference().team_name(t))
        .unwrap_or_else(|| "TBD".to_string())
}

fn print_group(predictor: &Predictor, outcome: &GroupOutcome) {
    let Some(standings) = &outcome.standings else {
        println!("\n=== Group {} (manual order) ===", outcome.group);
        for (i, team) in outcome.order.iter().enumerate() {
            println!("{}. {}", i + 1, predictor.reference().team_name(*team));
        }
        return;
    };
    print_standings(predictor, standings);
}

fn print_standings(predictor: &Predictor, standings: &GroupStandings) {
    let state = if standings.is_settled() {
        "final"
    } else if standings.is_complete {
        "tie to decide"
    } else {
        "in progress"
    };
    println!("\n=== Group {} ({}) ===", standings.group, state);
    println!(
        "{:<3} {:<24} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>4} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for s in &standings.standings {
        println!(
            "{:<3} {:<24} {:>2} {:>2} {:>2} {:>2} {:>3} {:>3} {:>+4} {:>4}",
            s.position,
            predictor.reference().team_name(s.team_id),
            s.played,
            s.won,
            s.drawn,
            s.lost,
            s.goals_for,
            s.goals_against,
            s.goal_difference,
            s.points
        );
    }
    if let Some(tie) = &standings.unresolvable_tie {
        let ids: Vec<String> = tie.team_ids().iter().map(|t| t.to_string()).collect();
        println!("Unresolved: {}", tie.reason);
        println!(
            "  decide with: tiebreak --group {} --order {}",
            standings.group,
            ids.join(",")
        );
    }
}

fn print_third_place(predictor: &Predictor, evaluation: &Evaluation<'_>) {
    match evaluation.third_place() {
        ThirdPlaceStatus::NotReady { missing } => {
            let letters: Vec<String> = missing.iter().map(|g| g.to_string()).collect();
            println!("Third-place ranking waiting for groups: {}", letters.join(", "));
        }
        ThirdPlaceStatus::Ranked(selection) => {
            println!("=== Third-placed teams ===");
            for (i, entry) in selection.ranking.iter().enumerate() {
                let marker = if i < selection.qualifiers { "*" } else { " " };
                println!(
                    "{} {:>2}. {} {:<24} {:>2} pts {:>+3} GD {:>2} GF",
                    marker,
                    i + 1,
                    entry.group,
                    predictor.reference().team_name(entry.stats.team_id),
                    entry.stats.points,
                    entry.stats.goal_difference,
                    entry.stats.goals_for
                );
            }
            println!("\nQualifying groups: {}", selection.qualifying_letters);
            if let Some(reason) = selection.invalid_reason() {
                println!("{}", reason);
            }
        }
    }
    match evaluation.combination() {
        Some(combination) => println!("Combination in use: {}", combination.letters),
        None => println!("No third-place combination in use"),
    }
}

fn print_bracket(predictor: &Predictor, evaluation: &Evaluation<'_>) {
    let mut round = None;
    for view in evaluation.matches() {
        if round != Some(view.round) {
            println!("\n=== {} ===", view.round);
            round = Some(view.round);
        }
        let state = match view.state {
            MatchState::Unavailable => "-",
            MatchState::Ready => "ready",
            MatchState::Decided => "decided",
        };
        let winner = match view.state {
            MatchState::Decided => format!(" -> {}", slot_label(predictor, view.winner)),
            _ => String::new(),
        };
        println!(
            "{:<5} {} vs {} [{}]{}",
            view.id.to_string(),
            slot_label(predictor, view.team_a),
            slot_label(predictor, view.team_b),
            state,
            winner
        );
    }
}

fn print_cleared(cleared: &[MatchId]) {
    if cleared.is_empty() {
        return;
    }
    let ids: Vec<String> = cleared.iter().map(|m| m.to_string()).collect();
    println!("Cleared picks: {}", ids.join(", "));
}
