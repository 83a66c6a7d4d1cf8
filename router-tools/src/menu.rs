use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::cli::{Command, ConfigDiffArgs, NatCountArgs, Router};

const OPTIONS: [&str; 3] = ["nat-diff", "nat-count", "config-diff"];

/// Show the mode menu and read one selection from `input`.
///
/// Returns `None` for anything that is not a listed option.
pub fn prompt(input: &mut impl BufRead, output: &mut impl Write) -> Result<Option<Command>> {
    writeln!(output, "\nRouter Tools")?;
    writeln!(output, "------------")?;
    for (idx, name) in OPTIONS.iter().enumerate() {
        writeln!(output, "{}. {name}", idx + 1)?;
    }
    write!(output, "\nSelect an option (1-{}): ", OPTIONS.len())?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read menu selection")?;
    Ok(parse_choice(&line))
}

/// Prompt on the process's own stdin/stdout.
pub fn prompt_stdio() -> Result<Option<Command>> {
    prompt(&mut io::stdin().lock(), &mut io::stdout().lock())
}

fn parse_choice(raw: &str) -> Option<Command> {
    match raw.trim() {
        "1" => Some(Command::NatDiff),
        "2" => Some(Command::NatCount(NatCountArgs {
            router: Router::First,
        })),
        "3" => Some(Command::ConfigDiff(ConfigDiffArgs { context: 3 })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_choice, prompt};
    use crate::cli::{Command, Router};

    #[test]
    fn maps_numbers_to_modes() {
        assert!(matches!(parse_choice("1\n"), Some(Command::NatDiff)));
        assert!(matches!(
            parse_choice(" 2 "),
            Some(Command::NatCount(args)) if args.router == Router::First
        ));
        assert!(matches!(
            parse_choice("3"),
            Some(Command::ConfigDiff(args)) if args.context == 3
        ));
        assert!(parse_choice("4").is_none());
        assert!(parse_choice("").is_none());
    }

    #[test]
    fn prompt_lists_options_before_reading() {
        let mut input: &[u8] = b"9\n";
        let mut output = Vec::new();
        let choice = prompt(&mut input, &mut output).expect("prompt");

        let shown = String::from_utf8(output).expect("utf8");
        assert!(shown.contains("1. nat-diff\n2. nat-count\n3. config-diff\n"));
        assert!(shown.ends_with("Select an option (1-3): "));
        assert!(choice.is_none());
    }
}
