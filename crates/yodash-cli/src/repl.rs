//! Interactive loop driving the root shell.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use yodash_application::{DashboardController, RootShell, RunOutcome, ShellView};
use yodash_core::model::{ImageFile, ModelVersion};
use yodash_core::session::Redirect;

use crate::commands::{Command, help_text};
use crate::export::export_png;
use crate::helper::CliHelper;
use crate::render;

enum Flow {
    Continue,
    Exit,
}

pub struct Repl {
    shell: RootShell,
}

impl Repl {
    pub fn new(shell: RootShell) -> Self {
        Self { shell }
    }

    pub async fn run(&mut self, preselect: Option<PathBuf>) -> Result<()> {
        let mut rl = Editor::new()?;
        rl.set_helper(Some(CliHelper::new()));

        if let Some(dashboard) = self.current_dashboard().await {
            match preselect {
                Some(path) => open_image(&dashboard, &path),
                None => println!("{}", render::dashboard(&dashboard.view(), Utc::now())),
            }
        }
        println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());

        loop {
            match rl.readline("yodash> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let command = match trimmed.parse::<Command>() {
                        Ok(command) => command,
                        Err(message) => {
                            println!("{}", message.yellow());
                            continue;
                        }
                    };
                    match self.handle(command).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Exit) => break,
                        Err(err) => {
                            tracing::error!("[Repl] Command failed: {:#}", err);
                            eprintln!("{}", format!("Error: {err:#}").red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("Error: {err:?}").red());
                    break;
                }
            }
        }
        Ok(())
    }

    /// Renders the current non-dashboard screen, or returns the dashboard.
    async fn current_dashboard(&mut self) -> Option<DashboardController> {
        match self.shell.view().await {
            ShellView::Loading => {
                println!("{}", render::loading());
                None
            }
            ShellView::Errored(message) => {
                println!("{}", render::errored(&message));
                None
            }
            ShellView::SignIn => {
                println!("{}", render::sign_in_card());
                None
            }
            ShellView::Dashboard(dashboard) => Some(dashboard.clone()),
        }
    }

    async fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Help => {
                println!("{}", help_text());
                return Ok(Flow::Continue);
            }
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                return Ok(Flow::Exit);
            }
            Command::SignIn => {
                if self.shell.gate().state().is_authenticated() {
                    println!("{}", "Already signed in.".bright_black());
                    return Ok(Flow::Continue);
                }
                let redirect = self.shell.sign_in().await?;
                print_redirect("Continue signing in at:", &redirect);
                return Ok(Flow::Exit);
            }
            Command::SignOut => {
                let redirect = self.shell.sign_out().await?;
                print_redirect("Signed out. Finish at:", &redirect);
                return Ok(Flow::Exit);
            }
            _ => {}
        }

        let Some(dashboard) = self.current_dashboard().await else {
            return Ok(Flow::Continue);
        };

        match command {
            Command::Open(path) => open_image(&dashboard, &path),
            Command::Run => {
                if dashboard.view().is_detecting {
                    println!("{}", "Detection already running.".yellow());
                    return Ok(Flow::Continue);
                }
                println!("{}", "Running…".bright_yellow());
                tokio::spawn(async move {
                    match dashboard.run_detection().await {
                        RunOutcome::Applied { count } => {
                            println!("{}", format!("Detection finished: {count} boxes").green());
                            println!("{}", render::boxes_panel(&dashboard.view()));
                        }
                        RunOutcome::Superseded => {
                            println!(
                                "{}",
                                "Detection finished for a previous image; result discarded."
                                    .bright_black()
                            );
                        }
                        RunOutcome::AlreadyRunning => {
                            println!("{}", "Detection already running.".yellow());
                        }
                        // alerts already went through the notifier
                        RunOutcome::NoFileSelected | RunOutcome::Failed(_) => {}
                    }
                });
            }
            Command::Confidence(value) => {
                dashboard.set_min_confidence(value)?;
                println!("{}", render::boxes_panel(&dashboard.view()));
            }
            Command::Label(query) => {
                dashboard.set_label_query(query);
                println!("{}", render::boxes_panel(&dashboard.view()));
            }
            Command::Model(model) => {
                dashboard.set_model_version(model);
                println!("Model set to {}", model.as_str().bright_cyan());
            }
            Command::Models => {
                let current = dashboard.view().model_version;
                for model in ModelVersion::all() {
                    let marker = if model == current { "*" } else { " " };
                    println!("{marker} {model}");
                }
            }
            Command::History => {
                dashboard.refresh_history().await;
                println!("{}", render::history_panel(&dashboard.view(), Utc::now()));
            }
            Command::Show => {
                println!("{}", render::dashboard(&dashboard.view(), Utc::now()));
            }
            Command::Export(path) => export(&dashboard, &path)?,
            Command::Help | Command::Quit | Command::SignIn | Command::SignOut => {}
        }
        Ok(Flow::Continue)
    }
}

fn open_image(dashboard: &DashboardController, path: &Path) {
    match ImageFile::open(path) {
        Ok(file) => {
            dashboard.select_file(file);
            println!("{}", render::input_panel(&dashboard.view()));
        }
        Err(err) => {
            tracing::warn!("[Repl] Cannot open {}: {}", path.display(), err);
            println!("{}", format!("Cannot open {}: {err}", path.display()).yellow());
        }
    }
}

fn export(dashboard: &DashboardController, path: &Path) -> Result<()> {
    let Some(preview) = dashboard.preview() else {
        println!("{}", "Upload an image first to export.".yellow());
        return Ok(());
    };
    let view = dashboard.view();
    let drawn = export_png(preview.file.bytes(), &view.filtered, path)?;
    println!("Wrote {} with {drawn} boxes", path.display().to_string().bright_white());
    Ok(())
}

fn print_redirect(title: &str, redirect: &Redirect) {
    println!("{}", title.bright_magenta());
    println!("  {}", redirect.url.underline());
}
