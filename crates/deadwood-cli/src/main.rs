mod output;
mod render;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as _, ValueEnum};
use deadwood_analysis::{
    classified_branches, dead_store_report, AnalysisLimits, LiveVariableAnalyzer, MixedAnalyzer,
    PossibleValueAnalyzer, MAX_COMBINATION_COUNT, MAX_DEPTH,
};
use deadwood_lexer::Lexer;
use deadwood_parser::Parser;
use deadwood_syntax::ast::Program;
use serde::Serialize;
use tracing::{info, info_span};
use tracing_subscriber::EnvFilter;

use output::Analysis;
use render::{render_error, render_failure};

/// Which analysis to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Liveness sharpened by branch classification.
    #[default]
    Mixed,
    /// Plain liveness.
    Live,
    /// Possible values and branch classification only.
    Values,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum Format {
    #[default]
    Text,
    Json,
}

/// Finds dead stores and statically decided branches in deadwood programs.
#[derive(clap::Parser)]
#[command(name = "deadwood", version, about)]
struct Cli {
    /// Program to analyze
    path: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Mode::Mixed)]
    mode: Mode,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Largest operand combination count or value set size before a result
    /// is treated as unconstrained
    #[arg(long, default_value_t = MAX_COMBINATION_COUNT)]
    max_combinations: usize,

    /// Loop iterations unrolled before the loop's writes are given up on
    #[arg(long, default_value_t = MAX_DEPTH)]
    max_depth: usize,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("DEADWOOD_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(program: &Program, mode: Mode, limits: AnalysisLimits) -> Analysis {
    let _span = info_span!("analyze", ?mode).entered();
    let analysis = match mode {
        Mode::Mixed => {
            let report = MixedAnalyzer::new(limits).analyze(program);
            Analysis {
                mode,
                dead_stores: dead_store_report(program, &report.dead_stores),
                branches: classified_branches(program, &report.classification),
                values: None,
            }
        }
        Mode::Live => {
            let ids = LiveVariableAnalyzer::new().analyze(program);
            Analysis {
                mode,
                dead_stores: dead_store_report(program, &ids),
                branches: Vec::new(),
                values: None,
            }
        }
        Mode::Values => {
            let report = PossibleValueAnalyzer::new(limits).analyze(program);
            Analysis {
                mode,
                dead_stores: Vec::new(),
                branches: classified_branches(program, &report.classification),
                values: Some(report.values),
            }
        }
    };
    info!(
        dead_stores = analysis.dead_stores.len(),
        classified = analysis.branches.len(),
        "analysis finished"
    );
    analysis
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = cli.path.display().to_string();
    let src = match fs::read_to_string(&cli.path) {
        Ok(s) => s,
        Err(e) => {
            render_failure(&format!("Failed to read {}: {}", file, e));
            return ExitCode::FAILURE;
        }
    };

    let mut lexer = Lexer::new(&src);
    let tokens = match lexer.tokenize() {
        Ok(t) => t,
        Err(e) => {
            render_error("Lex error", &src, &e);
            return ExitCode::FAILURE;
        }
    };

    let mut parser = Parser::new(tokens);
    let program = match parser.parse_program() {
        Ok(p) => p,
        Err(e) => {
            render_error("Parse error", &src, &e);
            return ExitCode::FAILURE;
        }
    };
    info!(file = %file, statements = program.statements.len(), "parsed");

    let limits = AnalysisLimits::default()
        .with_max_combinations(cli.max_combinations)
        .with_max_depth(cli.max_depth);
    let analysis = analyze(&program, cli.mode, limits);

    match cli.format {
        Format::Text => print!("{}", output::text(&file, &program, &analysis)),
        Format::Json => match output::json(&file, &program, &analysis) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                render_failure(&format!("Failed to serialize report: {}", e));
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}
