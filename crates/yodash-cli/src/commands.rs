//! REPL command parsing.

use std::path::PathBuf;
use std::str::FromStr;

use yodash_core::model::ModelVersion;

/// Command names offered by completion and hints.
pub const COMMANDS: &[&str] = &[
    "open", "run", "conf", "label", "model", "models", "history", "show", "export", "signin",
    "signout", "help", "quit",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(PathBuf),
    Run,
    /// Minimum confidence in `[0, 1]`.
    Confidence(f64),
    /// Empty clears the label filter.
    Label(String),
    Model(ModelVersion),
    Models,
    History,
    Show,
    Export(PathBuf),
    SignIn,
    SignOut,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "open" => Command::Open(required_path(name, arg)?),
            "run" => Command::Run,
            "conf" => {
                let value = arg
                    .parse::<f64>()
                    .map_err(|_| format!("conf expects a number between 0 and 1, got '{arg}'"))?;
                Command::Confidence(value)
            }
            "label" => Command::Label(arg.to_string()),
            "model" => {
                let model = ModelVersion::from_str(arg).map_err(|_| {
                    format!("Unknown model '{arg}'. Type 'models' to list available models.")
                })?;
                Command::Model(model)
            }
            "models" => Command::Models,
            "history" => Command::History,
            "show" => Command::Show,
            "export" => Command::Export(required_path(name, arg)?),
            "signin" => Command::SignIn,
            "signout" => Command::SignOut,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
        };
        Ok(command)
    }
}

fn required_path(name: &str, arg: &str) -> Result<PathBuf, String> {
    if arg.is_empty() {
        Err(format!("{name} expects a file path"))
    } else {
        Ok(PathBuf::from(arg))
    }
}

pub fn help_text() -> &'static str {
    "\
  open <path>      select an image (replaces the current one)
  run              run detection on the selected image
  conf <0..1>      minimum confidence shown
  label [text]     filter labels by substring, empty clears
  model <name>     choose the detection model
  models           list available models
  history          reload recent runs
  show             redraw the dashboard
  export <path>    write the preview with boxes as PNG
  signin           sign in through the hosted page
  signout          sign out
  quit             exit"
}
