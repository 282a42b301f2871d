//! Interactive command loop around a single patient session

use crate::console::PatientArgs;
use clap::{Parser, Subcommand};
use ferrum_patient_client::{Outcome, PatientSession, RawFields, SessionMode};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

#[derive(Parser, Debug)]
#[command(name = "patient-manager", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ShellCommand {
    /// Create a new patient from the given fields
    Create(PatientArgs),
    /// Update the selected patient; omitted fields keep their loaded values
    Update(PatientArgs),
    /// Create when nothing is selected, otherwise update the selection
    Submit(PatientArgs),
    /// Read a patient by ID without selecting it
    Get { id: String },
    /// Search patients by name
    Search {
        #[arg(required = true, num_args = 1..)]
        term: Vec<String>,
    },
    /// Read a patient by ID and select it for editing
    Load { id: String },
    /// Delete a patient by ID
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Drop the current selection
    Clear,
    /// Print the selected patient as JSON
    Show,
    /// Check the selected patient against the field rules
    Validate,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R> {
    session: PatientSession,
    input: Lines<R>,
}

impl<R> Shell<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(session: PatientSession, input: Lines<R>) -> Self {
        Self { session, input }
    }

    pub fn session(&self) -> &PatientSession {
        &self.session
    }

    /// Read and execute commands until `quit` or end of input
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!(
            "Connected to {}. Type 'help' for commands.",
            self.session.base_url()
        );

        loop {
            self.prompt()?;
            let Some(line) = self.input.next_line().await? else {
                break;
            };
            if let Flow::Quit = self.execute(&line).await? {
                break;
            }
        }

        Ok(())
    }

    fn prompt(&self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        match self.session.selected().and_then(|p| p.id.as_deref()) {
            Some(id) => write!(stdout, "patient[{}]> ", id)?,
            None => write!(stdout, "patient> ")?,
        }
        stdout.flush()
    }

    async fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let tokens = match tokenize(line) {
            Ok(tokens) if tokens.is_empty() => return Ok(Flow::Continue),
            Ok(tokens) => tokens,
            Err(e) => {
                println!("{}", e);
                return Ok(Flow::Continue);
            }
        };

        let command = match ShellLine::try_parse_from(tokens) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Covers `help` as well as usage errors
                println!("{}", e.render());
                return Ok(Flow::Continue);
            }
        };
        tracing::debug!(?command, "Executing command");

        match command {
            ShellCommand::Create(args) => {
                self.session.create(&RawFields::from_source(&args)).await;
            }
            ShellCommand::Update(args) => {
                let raw = self.form_fields(&args);
                self.session.update_selected(&raw).await;
            }
            ShellCommand::Submit(args) => {
                let raw = self.form_fields(&args);
                self.session.submit(&raw).await;
            }
            ShellCommand::Get { id } => {
                if let Outcome::Found(patient) = self.session.fetch_by_id(&id).await {
                    print_json(&patient)?;
                }
            }
            ShellCommand::Search { term } => {
                self.session.search_by_name(&term.join(" ")).await;
            }
            ShellCommand::Load { id } => {
                if let Outcome::Loaded(_) = self.session.load_for_update(&id).await {
                    println!("Editing patient {}; 'submit' or 'update' saves changes.", id);
                }
            }
            ShellCommand::Delete { id, yes } => {
                if yes || self.confirm(&format!("Delete patient {}?", id)).await? {
                    self.session.delete_selected(&id).await;
                } else {
                    println!("Delete cancelled.");
                }
            }
            ShellCommand::Clear => {
                self.session.clear_selection();
                println!("Selection cleared.");
            }
            ShellCommand::Show => match self.session.selected() {
                Some(patient) => print_json(patient)?,
                None => println!("No patient selected."),
            },
            ShellCommand::Validate => match self.session.validate_selected() {
                Some(result) if result.is_valid => println!("Selected patient is valid."),
                Some(result) => {
                    for error in &result.errors {
                        println!("  - {}", error);
                    }
                }
                None => println!("No patient selected."),
            },
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Flags layered over the selected patient's current values when editing
    fn form_fields(&self, args: &PatientArgs) -> RawFields {
        match (self.session.mode(), self.session.selected()) {
            (SessionMode::Editing, Some(patient)) => {
                args.merged_onto(RawFields::from_patient(patient))
            }
            _ => RawFields::from_source(args),
        }
    }

    async fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        print!("{} [y/N] ", question);
        std::io::stdout().flush()?;

        let answer = self.input.next_line().await?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

fn print_json(patient: &ferrum_patient_client::Patient) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(patient)?);
    Ok(())
}

/// Split a command line on whitespace, keeping quoted sections together.
///
/// Single and double quotes are supported; quotes do not nest.
pub fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("Unterminated {} quote", q));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
