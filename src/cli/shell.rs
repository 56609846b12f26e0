use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use thiserror::Error;

use crate::application::{AppError, ReceiptService};
use crate::domain::{Amount, EntryId, EntryKind, format_amount};
use crate::io::{ExportFormat, Exporter};

use super::{OutputFormat, parse_amount, parse_item, write_history, write_summary, write_totals};

const HELP: &str = "\
Commands:
  mul PRICE QTY        add PRICE x QTY (alias: x, *)
  div PRICE QTY        add PRICE / QTY (alias: /)
  PRICE QTY            same as mul
  PRICExQTY, PRICE/QTY shorthand for mul / div
  service PCT          apply a service percentage (0-100)
  reset-service        set the service percentage back to 0
  remove ID            remove an entry (alias: rm)
  clear                remove every entry and reset the service
  total                show sum, service and total (alias: calc)
  history              show entries, most recent first (alias: list)
  export csv|json [FILE]
  help                 show this message
  quit                 leave (alias: exit)";

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid entry id '{0}'")]
    InvalidId(String),

    #[error("Unknown export format '{0}'. Use 'csv' or 'json'")]
    UnknownFormat(String),

    #[error("Export failed: {0:#}")]
    Export(anyhow::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add {
        kind: EntryKind,
        price: Amount,
        quantity: Amount,
    },
    Service(Amount),
    ResetService,
    Remove(EntryId),
    Clear,
    Total,
    History,
    Export {
        format: ExportFormat,
        path: Option<String>,
    },
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = tokens.split_first() else {
            return Ok(ShellCommand::Empty);
        };

        let command = match head.to_lowercase().as_str() {
            "mul" | "div" => {
                let kind = EntryKind::from_str(head)
                    .ok_or_else(|| CommandError::Unknown(head.to_string()))?;
                add(kind, args)?
            }
            "x" | "*" => add(EntryKind::Product, args)?,
            "/" => add(EntryKind::Quotient, args)?,
            "service" => match args {
                [percent] => ShellCommand::Service(parse_amount(percent)),
                _ => return Err(CommandError::Usage("service PCT")),
            },
            "reset-service" => ShellCommand::ResetService,
            "remove" | "rm" => match args {
                [id] => ShellCommand::Remove(
                    id.parse()
                        .map_err(|_| CommandError::InvalidId(id.to_string()))?,
                ),
                _ => return Err(CommandError::Usage("remove ID")),
            },
            "clear" => ShellCommand::Clear,
            "total" | "calc" => ShellCommand::Total,
            "history" | "list" => ShellCommand::History,
            "export" => match args {
                [format] | [format, _] => ShellCommand::Export {
                    format: ExportFormat::from_str(format)
                        .ok_or_else(|| CommandError::UnknownFormat(format.to_string()))?,
                    path: args.get(1).map(|p| p.to_string()),
                },
                _ => return Err(CommandError::Usage("export csv|json [FILE]")),
            },
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" | "q" => ShellCommand::Quit,
            _ => shorthand(&tokens).ok_or_else(|| CommandError::Unknown(head.to_string()))?,
        };

        Ok(command)
    }
}

fn add(kind: EntryKind, args: &[&str]) -> Result<ShellCommand, CommandError> {
    let usage = match kind {
        EntryKind::Product => "mul PRICE QTY",
        EntryKind::Quotient => "div PRICE QTY",
    };
    match args {
        [price, quantity] => Ok(ShellCommand::Add {
            kind,
            price: parse_amount(price),
            quantity: parse_amount(quantity),
        }),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// `100 2` adds a product, like pressing Enter in a price/quantity form;
/// `100x2` and `90/3` are item shorthands.
fn shorthand(tokens: &[&str]) -> Option<ShellCommand> {
    match tokens {
        [price, quantity] if !parse_amount(price).is_nan() => {
            Some(ShellCommand::Add {
                kind: EntryKind::Product,
                price: parse_amount(price),
                quantity: parse_amount(quantity),
            })
        }
        [item] => parse_item(item).map(|item| ShellCommand::Add {
            kind: item.kind,
            price: item.price,
            quantity: item.quantity,
        }),
        _ => None,
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Line-oriented interactive session over any reader/writer pair.
///
/// The session owns its [`ReceiptService`]; state lives exactly as long as
/// the session does. Every command that changes the receipt is followed by
/// a fresh summary read back from the service.
pub struct Session<R, W> {
    service: ReceiptService,
    input: R,
    output: W,
    assume_yes: bool,
    prompt: bool,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            service: ReceiptService::new(),
            input,
            output,
            assume_yes: false,
            prompt: false,
            format: OutputFormat::Text,
        }
    }

    /// Skip the confirmation before `clear`.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Print a `> ` prompt before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn service(&self) -> &ReceiptService {
        &self.service
    }

    /// Read and execute commands until `quit` or end of input.
    pub fn run(&mut self) -> Result<()> {
        if self.prompt {
            writeln!(self.output, "tally: type 'help' for a list of commands")?;
        }

        while let Some(line) = self.read_line("> ")? {
            let outcome = ShellCommand::parse(&line).and_then(|cmd| self.execute(cmd));
            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(CommandError::Io(err)) => return Err(err.into()),
                Err(err) => {
                    tracing::debug!(%err, line = line.trim(), "command failed");
                    writeln!(self.output, "error: {}", err)?;
                }
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.prompt {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;
        }
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn execute(&mut self, command: ShellCommand) -> Result<Flow, CommandError> {
        match command {
            ShellCommand::Add {
                kind,
                price,
                quantity,
            } => {
                let id = self.service.add_entry(kind, price, quantity)?;
                if let Some(entry) = self.service.entry(id) {
                    writeln!(
                        self.output,
                        "Added #{}: {} {} {} = {}",
                        entry.id,
                        entry.price,
                        entry.kind.symbol(),
                        entry.quantity,
                        format_amount(entry.value)
                    )?;
                }
                self.summary()?;
            }

            ShellCommand::Service(percent) => {
                let rate = self.service.apply_service(percent)?;
                writeln!(self.output, "Service set to {}%", rate)?;
                self.summary()?;
            }

            ShellCommand::ResetService => {
                self.service.reset_service();
                writeln!(self.output, "Service reset")?;
                self.summary()?;
            }

            ShellCommand::Remove(id) => {
                match self.service.remove_entry(id) {
                    Some(entry) => writeln!(self.output, "Removed #{}", entry.id)?,
                    None => writeln!(self.output, "No entry #{}", id)?,
                }
                self.summary()?;
            }

            ShellCommand::Clear => {
                if self.confirm("Clear all entries? [y/N] ")? {
                    self.service.clear();
                    writeln!(self.output, "Cleared")?;
                    self.summary()?;
                } else {
                    writeln!(self.output, "Cancelled")?;
                }
            }

            ShellCommand::Total => match self.format {
                OutputFormat::Text => {
                    let totals = self.service.totals();
                    write_totals(&mut self.output, &totals, self.service.service_rate())?;
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&self.service.totals())
                        .map_err(io::Error::from)?;
                    writeln!(self.output, "{}", json)?;
                }
            },

            ShellCommand::History => write_history(&mut self.output, &self.service)?,

            ShellCommand::Export { format, path } => self.export(format, path.as_deref())?,

            ShellCommand::Help => writeln!(self.output, "{}", HELP)?,

            ShellCommand::Quit => return Ok(Flow::Quit),

            ShellCommand::Empty => {}
        }

        Ok(Flow::Continue)
    }

    fn summary(&mut self) -> io::Result<()> {
        write_summary(&mut self.output, &self.service.totals())
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        // The question is shown even without a prompt so scripted input
        // still reads naturally in the transcript.
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        let answer = answer.trim().to_lowercase();
        if !self.prompt {
            writeln!(self.output)?;
        }
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    fn export(&mut self, format: ExportFormat, path: Option<&str>) -> Result<(), CommandError> {
        let exporter = Exporter::new(self.service.ledger());
        match path {
            Some(path) => {
                // Only the session's own output is fatal; a bad path is a user error.
                let file = File::create(path)
                    .with_context(|| format!("Failed to create file: {}", path))
                    .map_err(CommandError::Export)?;
                let count = exporter
                    .export(format, BufWriter::new(file))
                    .map_err(CommandError::Export)?;
                writeln!(self.output, "Exported {} entries as {} to {}", count, format, path)?;
            }
            None => {
                exporter
                    .export(format, &mut self.output)
                    .map_err(CommandError::Export)?;
            }
        }
        Ok(())
    }
}
