//! Parsing of the line-oriented commands typed at the prompt.

/// Draft field addressed by `set <field> <value>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Content,
    Date,
    Time,
    Link,
    LinkVisible,
    Shortlisted,
}

impl Field {
    fn parse(raw: &str) -> Option<Self> {
        let field = match raw.to_ascii_lowercase().as_str() {
            "title" | "company" => Field::Title,
            "content" | "comment" | "info" => Field::Content,
            "date" => Field::Date,
            "time" => Field::Time,
            "link" => Field::Link,
            "visible" => Field::LinkVisible,
            "shortlisted" => Field::Shortlisted,
            _ => return None,
        };
        Some(field)
    }
}

/// Card numbers are 1-based as printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tab(String),
    Open(usize),
    Back,
    New,
    Edit(Option<usize>),
    Set(Field, String),
    Rate(usize, u8),
    Save,
    Cancel,
    Delete(Option<usize>),
    More(usize),
    Refresh,
    Dismiss,
    Process,
    ProcessMore,
    ProcessStep(usize),
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  tab <id>              switch tab
  open <n>              show card n
  back                  return to the list
  new                   start a new record
  edit [n]              edit card n (or the open record)
  set <field> <value>   title|content|date|time|link|visible|shortlisted
  rate <n> <score>      set rating n to 0-5
  save | cancel         submit or leave the form
  delete [n]            delete card n (or the open record)
  more <n>              Read More / Read Less on card n
  refresh               reload every tab
  dismiss               clear notifications
  process [more|<n>]    recruitment process guide
  quit";

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "tab" => Command::Tab(required(rest, "tab <id>")?.to_string()),
        "open" => Command::Open(index(rest)?),
        "back" => Command::Back,
        "new" => Command::New,
        "edit" => Command::Edit(optional_index(rest)?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            let field = Field::parse(field).ok_or_else(|| format!("unknown field {field:?}"))?;
            Command::Set(field, value.to_string())
        }
        "rate" => {
            let mut parts = rest.split_whitespace();
            let position = index(parts.next().unwrap_or(""))?;
            let score = parts
                .next()
                .and_then(|raw| raw.parse::<u8>().ok())
                .ok_or("usage: rate <n> <score>")?;
            Command::Rate(position, score)
        }
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "delete" => Command::Delete(optional_index(rest)?),
        "more" => Command::More(index(rest)?),
        "refresh" => Command::Refresh,
        "dismiss" => Command::Dismiss,
        "process" => match rest {
            "" => Command::Process,
            "more" | "less" => Command::ProcessMore,
            step => Command::ProcessStep(index(step)?),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err("empty command".to_string()),
        other => return Err(format!("unknown command {other:?}; type `help`")),
    };
    Ok(command)
}

/// `y`/`yes` approves; anything else declines.
pub fn parse_confirmation(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

fn index(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("expected a card number, got {raw:?}")),
    }
}

fn optional_index(raw: &str) -> Result<Option<usize>, String> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        index(raw).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_navigation() {
        assert_eq!(parse_command("tab gd"), Ok(Command::Tab("gd".into())));
        assert_eq!(parse_command(" open 2 "), Ok(Command::Open(2)));
        assert_eq!(parse_command("edit"), Ok(Command::Edit(None)));
        assert_eq!(parse_command("delete 3"), Ok(Command::Delete(Some(3))));
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            parse_command("set title Amazon SDE Intern"),
            Ok(Command::Set(Field::Title, "Amazon SDE Intern".into()))
        );
        assert_eq!(
            parse_command("set link"),
            Ok(Command::Set(Field::Link, String::new()))
        );
    }

    #[test]
    fn rejects_bad_numbers_and_unknown_words() {
        assert!(parse_command("open 0").is_err());
        assert!(parse_command("rate 1").is_err());
        assert!(parse_command("set colour red").is_err());
        assert!(parse_command("launch").is_err());
    }

    #[test]
    fn process_subcommands() {
        assert_eq!(parse_command("process"), Ok(Command::Process));
        assert_eq!(parse_command("process more"), Ok(Command::ProcessMore));
        assert_eq!(parse_command("process 5"), Ok(Command::ProcessStep(5)));
    }

    #[test]
    fn only_yes_confirms() {
        assert!(parse_confirmation("Y"));
        assert!(parse_confirmation("yes\n"));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("no"));
    }
}
