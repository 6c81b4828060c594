use std::fs;

use serde::Serialize;

use crate::advisor::{Advisor, ChatSession};
use crate::config::AppConfig;
use crate::data::validate::validate_catalog_file;
use crate::data::GoalBoard;
use crate::export::{export_matrix_csv, MATRIX_FILE_NAME};
use crate::planning::{plan_insight, simulate_goals, PlanInsight, SimulationOutcome};
use crate::scoring::{find_result, score_catalog, VendorResult, WeightState};
use crate::server::{self, AppState};
use crate::storage::GOALS_KEY;

const USAGE: &str = "usage: riadesk <serve|score|simulate|export|validate|advise|chat>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Score,
    Simulate,
    Export,
    Validate,
    Advise,
    Chat,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("score") => Some(Command::Score),
        Some("simulate") => Some(Command::Simulate),
        Some("export") => Some(Command::Export),
        Some("validate") => Some(Command::Validate),
        Some("advise") => Some(Command::Advise),
        Some("chat") => Some(Command::Chat),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };
    // Validation inspects the file itself and must not fall back to the built-in catalog.
    if command == Command::Validate {
        return handle_validate(&config, args);
    }
    let state = server::state_from_config(config);
    match command {
        Command::Serve => handle_serve(&state),
        Command::Score => handle_score(&state, args),
        Command::Simulate => handle_simulate(&state, args),
        Command::Export => handle_export(&state, args),
        Command::Validate => handle_validate(&state.config, args),
        Command::Advise => handle_advise(&state, args),
        Command::Chat => handle_chat(&state, args),
    }
}

fn handle_serve(state: &AppState) -> i32 {
    match server::run_server(state) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

/// Positional arguments after the command name, minus flags.
fn positional(args: &[String]) -> Vec<&str> {
    args.iter()
        .skip(2)
        .map(String::as_str)
        .filter(|arg| !arg.starts_with("--"))
        .collect()
}

fn wants_table(args: &[String]) -> bool {
    args.iter().any(|arg| arg == "--table")
}

/// Parse `id=value` pairs. No pairs means the catalog defaults.
pub fn parse_weight_args(state: &AppState, pairs: &[&str]) -> Result<WeightState, String> {
    if pairs.is_empty() {
        return Ok(WeightState::from_defaults(&state.catalog.categories));
    }
    let mut weights = WeightState::new();
    for pair in pairs {
        let Some((id, raw)) = pair.split_once('=') else {
            return Err(format!("expected <category>=<weight>, got '{pair}'"));
        };
        let id = id.trim();
        if !state.catalog.has_category(id) {
            return Err(format!("unknown category '{id}'"));
        }
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid weight '{raw}' for '{id}'"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("weight for '{id}' must be a non-negative number"));
        }
        weights.set(id, value);
    }
    Ok(weights)
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_score(state: &AppState, args: &[String]) -> i32 {
    let weights = match parse_weight_args(state, &positional(args)) {
        Ok(weights) => weights,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: riadesk score [<category>=<weight>...] [--table]");
            return 2;
        }
    };
    let results = score_catalog(&state.catalog, &weights);

    if wants_table(args) {
        println!("rank\tvendor\tfinal_score");
        for (index, result) in results.iter().enumerate() {
            println!("{}\t{}\t{:.1}", index + 1, result.name, result.final_score);
        }
        0
    } else {
        print_json(&results, "score results")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateOutput {
    projection_status: &'static str,
    outcome: SimulationOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    insight: Option<PlanInsight>,
}

fn handle_simulate(state: &AppState, args: &[String]) -> i32 {
    let mut board: GoalBoard = state.store.get_or_default(GOALS_KEY);
    let ids: Vec<String> = positional(args).into_iter().map(str::to_string).collect();
    if !ids.is_empty() {
        if let Some(unknown) = ids.iter().find(|id| !board.contains(id)) {
            eprintln!("unknown goal '{unknown}'");
            eprintln!("usage: riadesk simulate [<goal-id>...] [--table]");
            return 2;
        }
        board = board.with_active_ids(&ids);
    }

    let outcome = simulate_goals(&board.goals, &state.config.planning);
    let insight = plan_insight(&board.goals, &outcome);

    if wants_table(args) {
        println!("year\tassets\tspend");
        for row in &outcome.years {
            println!("{}\t{:.2}\t{:.2}", row.year, row.assets, row.spend);
        }
        eprintln!("status: {}", outcome.status_label());
        if let Some(insight) = &insight {
            eprintln!("{}", insight.text);
        }
        0
    } else {
        print_json(
            &SimulateOutput {
                projection_status: outcome.status_label(),
                outcome,
                insight,
            },
            "simulation result",
        )
    }
}

fn handle_export(state: &AppState, args: &[String]) -> i32 {
    let csv = match export_matrix_csv(&state.catalog) {
        Ok(csv) => csv,
        Err(err) => {
            eprintln!("export failed: {err}");
            return 1;
        }
    };
    match positional(args).first() {
        None => {
            print!("{csv}");
            0
        }
        Some(path) => {
            let path = if path.ends_with('/') {
                format!("{path}{MATRIX_FILE_NAME}")
            } else {
                path.to_string()
            };
            match fs::write(&path, csv) {
                Ok(()) => {
                    println!("exported {} vendors to {path}", state.catalog.vendors.len());
                    0
                }
                Err(err) => {
                    eprintln!("export failed: {path}: {err}");
                    1
                }
            }
        }
    }
}

fn handle_validate(config: &AppConfig, args: &[String]) -> i32 {
    let default_path = config.catalog_path.to_string_lossy().into_owned();
    let path = positional(args)
        .first()
        .map(|p| p.to_string())
        .unwrap_or(default_path);

    match validate_catalog_file(&path) {
        Ok(report) if !report.has_errors() => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            println!("validation passed: {path}");
            0
        }
        Ok(report) => {
            eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            1
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

/// Weights the advisor commands score with, and the ranking they produce.
fn advisory_ranking(state: &AppState) -> (WeightState, Vec<VendorResult>) {
    let weights = state.current_weights();
    let results = score_catalog(&state.catalog, &weights);
    (weights, results)
}

fn handle_advise(state: &AppState, args: &[String]) -> i32 {
    let (weights, results) = advisory_ranking(state);
    let positional = positional(args);
    let winner = match positional.first() {
        Some(name) => match find_result(&results, name) {
            Some(result) => result,
            None => {
                eprintln!("unknown vendor '{name}'");
                return 2;
            }
        },
        None => match results.first() {
            Some(result) => result,
            None => {
                eprintln!("catalog has no vendors");
                return 1;
            }
        },
    };
    let advisor = Advisor::new(state.generator.as_ref());
    println!("{}", advisor.analyze_selection(winner, &weights, &results));
    0
}

fn handle_chat(state: &AppState, args: &[String]) -> i32 {
    let message = positional(args).join(" ");
    if message.trim().is_empty() {
        eprintln!("usage: riadesk chat <message>");
        return 2;
    }
    let (weights, results) = advisory_ranking(state);
    let advisor = Advisor::new(state.generator.as_ref());
    let mut session = ChatSession::new();
    match session.send(&advisor, &message, &weights, &results) {
        Some(reply) => {
            println!("{}", reply.text);
            0
        }
        None => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::UnconfiguredGenerator;
    use crate::data::catalog::builtin_catalog;
    use crate::server::api::CalculatorState;
    use crate::storage::CALCULATOR_KEY;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn state() -> AppState {
        AppState::new(
            AppConfig::default(),
            builtin_catalog(),
            Box::new(UnconfiguredGenerator),
        )
    }

    #[test]
    fn parse_command_maps_known_names() {
        let args: Vec<String> = ["riadesk", "score"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_command(&args), Some(Command::Score));
        let args: Vec<String> = ["riadesk", "optimize"].iter().map(|s| s.to_string()).collect();
        assert_eq!(parse_command(&args), None);
    }

    #[test]
    fn weight_args_reject_bad_input() {
        let state = state();
        let weights = parse_weight_args(&state, &["plan=100", "crm=0"]).expect("valid weights");
        assert_eq!(weights.effective("plan"), 100.0);

        assert!(parse_weight_args(&state, &["plan=-5"]).is_err());
        assert!(parse_weight_args(&state, &["nope=5"]).is_err());
        assert!(parse_weight_args(&state, &["plan"]).is_err());
        assert!(parse_weight_args(&state, &["plan=abc"]).is_err());
    }

    #[test]
    fn no_weight_args_means_defaults() {
        let state = state();
        let weights = parse_weight_args(&state, &[]).expect("defaults");
        assert_eq!(weights.effective("plan"), 15.0);
    }

    #[test]
    fn advisory_ranking_prefers_saved_calculator_weights() {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let config = AppConfig {
            data_dir: std::env::temp_dir().join(format!("riadesk-cli-saved-{stamp}")),
            ..AppConfig::default()
        };
        let state = AppState::new(config, builtin_catalog(), Box::new(UnconfiguredGenerator));

        let (defaults, _) = advisory_ranking(&state);
        assert_eq!(defaults.effective("plan"), 15.0);

        let mut weights = WeightState::new();
        weights.set("crm", 100.0);
        state
            .store
            .put(
                CALCULATOR_KEY,
                &CalculatorState {
                    weights: weights.clone(),
                    ..CalculatorState::default()
                },
            )
            .expect("calculator state should be saved");

        let (resolved, results) = advisory_ranking(&state);
        assert_eq!(resolved, weights);
        assert_eq!(results, score_catalog(&state.catalog, &weights));
        let _ = fs::remove_dir_all(&state.config.data_dir);
    }
}
