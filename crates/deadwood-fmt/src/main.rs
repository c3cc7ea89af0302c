use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;
use deadwood_fmt::format_program;
use deadwood_lexer::Lexer;
use deadwood_parser::Parser;

/// Formats deadwood source files.
#[derive(clap::Parser)]
#[command(name = "deadwood-fmt", version, about)]
struct Cli {
    /// File to format
    file: PathBuf,

    /// Exit with an error if the file is not already formatted
    #[arg(long, conflicts_with = "write")]
    check: bool,

    /// Rewrite the file in place
    #[arg(long)]
    write: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let file = cli.file.display();

    let src = match fs::read_to_string(&cli.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read {}: {}", file, e);
            return ExitCode::FAILURE;
        }
    };
    let tokens = match Lexer::new(&src).tokenize() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Lex error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let program = match Parser::new(tokens).parse_program() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let formatted = format_program(&program);

    if cli.check {
        if normalize_newlines(&formatted) != normalize_newlines(&src) {
            eprintln!("{}: not formatted", file);
            return ExitCode::FAILURE;
        }
        println!("{}: ok", file);
    } else if cli.write {
        // formatting goes through the AST, which has no comments
        if src.contains('#') {
            eprintln!("{}: contains comments, which formatting would remove; not rewritten", file);
            return ExitCode::FAILURE;
        }
        if let Err(e) = fs::write(&cli.file, formatted) {
            eprintln!("Failed to write {}: {}", file, e);
            return ExitCode::FAILURE;
        }
    } else {
        print!("{}", formatted);
    }
    ExitCode::SUCCESS
}

fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n")
}
