use deadwood_syntax::error::Error;
use owo_colors::OwoColorize;

/// Prints a front-end error with the offending source line and a caret under
/// the column it points at.
pub fn render_error(kind: &str, source: &str, err: &Error) {
    eprintln!("{}: {}", kind.red().bold(), err.msg.red());
    if let (Some(line), Some(col)) = (err.line, err.col) {
        eprintln!("  --> line {}, column {}", line, col);
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let line_num_str = format!("{:3} | ", line);
            eprintln!("     |");
            eprintln!("{}{}", line_num_str.bright_black(), src_line);

            let mut marker = " ".repeat(line_num_str.len());
            marker.push_str(&" ".repeat(col.saturating_sub(1)));
            marker.push('^');
            eprintln!("{}{}", marker.red(), " error here".red());
            eprintln!("     |");
        }
    }
    provide_error_suggestions(&err.msg);
}

pub fn render_failure(msg: &str) {
    eprintln!("{}: {}", "error".red().bold(), msg.red());
}

fn provide_error_suggestions(err_msg: &str) {
    if err_msg.contains("Invalid name") {
        eprintln!("{}", "Help: Variables are named with one lowercase letter.".yellow());
        eprintln!("    {}", "Example: a = 1".bright_black());
    } else if err_msg.contains("Unexpected character") {
        eprintln!("{}", "Help: Programs only use integers, single-letter names and = + - * / < > ( ).".yellow());
        eprintln!("    {}", "Use '#' to start a comment.".bright_black());
    } else if err_msg.contains("Expected 'end'") {
        eprintln!("{}", "Help: Every 'if' and 'while' block needs a matching 'end'.".yellow());
        eprintln!("    {}", "Example: while i < 3 i = i + 1 end".bright_black());
    } else if err_msg.contains("Expected statement") {
        eprintln!("{}", "Help: A block needs at least one statement.".yellow());
    } else if err_msg.contains("Expected ')'") {
        eprintln!("{}", "Help: Check if parentheses are balanced.".yellow());
    } else if err_msg.contains("Expected '='") {
        eprintln!("{}", "Help: A statement starting with a name is an assignment: x = <expr>.".yellow());
    }
}
