//! Line-oriented browser over a [`Session`].
//!
//! Each input line is one user action. The action is dispatched, the
//! session is settled (debounce timers included), and the resulting
//! screen is printed. Settling after every line keeps the output
//! deterministic; the navigator itself never assumes it.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::time::Duration;

use tokio::runtime::Runtime;

use dua_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DuaSource};
use dua_model::{CategoryId, DuaId, SubcategoryId};
use dua_navigator::{Message, SEARCH_DEBOUNCE, Session, render_detail};

const HELP: &str = "\
commands:
  tree              show the category tree
  open <cat_id>     expand or collapse a category
  sub <subcat_id>   expand or collapse a subcategory
  select <dua_id>   select a loaded dua and show it
  search <text>     search duas by name
  clear             clear the search box
  show              show the selected dua
  reset             drop all cached data and start over
  help              this text
  quit              leave";

/// Settings for `dua browse`.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    pub api: String,
    pub timeout: Duration,
    pub debounce: Duration,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            api: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            debounce: SEARCH_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Tree,
    Open(CategoryId),
    Sub(SubcategoryId),
    Select(DuaId),
    Search(String),
    Clear,
    Show,
    Reset,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word {
            "tree" | "ls" => Ok(Self::Tree),
            "open" => parse_id(rest).map(Self::Open),
            "sub" => parse_id(rest).map(Self::Sub),
            "select" => parse_id(rest).map(Self::Select),
            "search" | "/" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "show" => Ok(Self::Show),
            "reset" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command `{other}` (try `help`)")),
        }
    }
}

fn parse_id<T: FromStr>(value: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    if value.is_empty() {
        return Err("missing id".to_string());
    }
    value.parse().map_err(|err: T::Err| err.to_string())
}

/// Read commands from `input` until `quit` or end of input.
pub fn run_repl<S, R, W>(
    runtime: &Runtime,
    session: &mut Session<S>,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    S: DuaSource,
    R: BufRead,
    W: Write,
{
    apply(runtime, session, Message::Start);
    writeln!(output, "{}", session.navigator().screen())?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<ReplCommand>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };
        tracing::debug!(?command, "REPL command");

        match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(output, "{HELP}")?,
            ReplCommand::Tree => writeln!(output, "{}", session.navigator().tree())?,
            ReplCommand::Show => {
                writeln!(output, "{}", render_detail(session.navigator().selected()))?;
            }
            ReplCommand::Open(id) => {
                apply(runtime, session, Message::ToggleCategory(id));
                writeln!(output, "{}", session.navigator().screen())?;
            }
            ReplCommand::Sub(id) => {
                apply(runtime, session, Message::ToggleSubcategory(id));
                writeln!(output, "{}", session.navigator().screen())?;
            }
            ReplCommand::Select(id) => {
                let Some(dua) = session.navigator().find_dua(id).cloned() else {
                    writeln!(output, "dua {id} is not loaded; open its subcategory first")?;
                    continue;
                };
                apply(runtime, session, Message::SelectDua(dua));
                writeln!(output, "{}", render_detail(session.navigator().selected()))?;
            }
            ReplCommand::Search(text) => {
                apply(runtime, session, Message::SearchInput(text));
                writeln!(output, "{}", session.navigator().screen())?;
            }
            ReplCommand::Clear => {
                apply(runtime, session, Message::SearchInput(String::new()));
                writeln!(output, "{}", session.navigator().screen())?;
            }
            ReplCommand::Reset => {
                apply(runtime, session, Message::Reset);
                apply(runtime, session, Message::Start);
                writeln!(output, "{}", session.navigator().screen())?;
            }
        }
        output.flush()?;
    }
    Ok(())
}

/// Tasks are spawned on `runtime`, so dispatch runs inside it.
fn apply<S: DuaSource>(runtime: &Runtime, session: &mut Session<S>, message: Message) {
    runtime.block_on(async {
        session.dispatch(message);
        session.settle().await;
    });
}
