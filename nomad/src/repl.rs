//! Interactive trip form

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use colored::Colorize;
use eyre::Result;
use rustyline::completion::Completer;
use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{ColorMode, DefaultEditor, Editor, Helper};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{BudgetLevel, DEFAULT_DURATION_DAYS, SessionState, TravelGroup, TripRequest};
use crate::llm::{LlmError, create_client};
use crate::output::{MARKDOWN_CONTENT_TYPE, save_itinerary};
use crate::pipeline::Orchestrator;

/// One line typed at the main prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    Plan,
    Show,
    Save(Option<PathBuf>),
    Key,
    Help,
    Quit,
    Unknown(String),
}

impl FormCommand {
    pub fn parse(input: &str) -> Self {
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        match cmd.to_lowercase().as_str() {
            "plan" | "p" => Self::Plan,
            "show" | "s" => Self::Show,
            "save" | "w" => Self::Save(parts.next().map(PathBuf::from)),
            "key" | "k" => Self::Key,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(cmd.to_string()),
        }
    }
}

/// Outcome of reading one form field
enum Field<T> {
    Value(T),
    Cancelled,
}

/// Interactive session: collects trip fields, runs the pipeline, keeps the
/// latest itinerary for show/save
pub struct FormSession {
    config: Config,
    orchestrator: Orchestrator,
    session: SessionState,
}

impl FormSession {
    pub fn new(config: Config, orchestrator: Orchestrator) -> Self {
        Self {
            config,
            orchestrator,
            session: SessionState::new(),
        }
    }

    /// Run the prompt loop until quit or EOF
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", "nomad>".bright_green()));
            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    debug!(%input, "FormSession::run: command");
                    match FormCommand::parse(input) {
                        FormCommand::Plan => self.plan(&mut rl).await?,
                        FormCommand::Show => self.show(),
                        FormCommand::Save(dir) => self.save(dir),
                        FormCommand::Key => { self.prompt_key()?; }
                        FormCommand::Help => self.print_help(),
                        FormCommand::Quit => break,
                        FormCommand::Unknown(cmd) => {
                            println!("{} Unknown command: {}", "?".yellow(), cmd);
                            println!("Type {} for available commands", "help".yellow());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => return Err(eyre::eyre!("Readline error: {}", err)),
            }
        }

        println!("Safe travels!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "Nomad AI Travel Planner".bright_cyan().bold());
        println!("Type {} to plan a trip, {} for help, {} to quit", "plan".yellow(), "help".yellow(), "quit".yellow());
        println!();
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Fill in the trip form and generate an itinerary", "plan".yellow());
        println!("  {:14} Show the current itinerary", "show".yellow());
        println!("  {:14} Save the current itinerary as Markdown", "save [DIR]".yellow());
        println!("  {:14} Enter an API key (replaces {})", "key".yellow(), self.config.llm.api_key_env);
        println!("  {:14} Show this help", "help".yellow());
        println!("  {:14} Exit", "quit".yellow());
        println!();
        println!("Ctrl+C cancels a form; the last itinerary is kept until a new one succeeds.");
        println!();
    }

    /// Walk through the form, then run the pipeline
    async fn plan(&mut self, rl: &mut DefaultEditor) -> Result<()> {
        debug!("FormSession::plan: called");
        let Some(request) = self.read_request(rl)? else {
            println!("{}", "Form cancelled.".dimmed());
            return Ok(());
        };

        if !self.orchestrator.has_client() && !self.prompt_key()? {
            println!("{}", "Form cancelled.".dimmed());
            return Ok(());
        }

        match self.orchestrator.run(&request, &self.session).await {
            Ok(itinerary) => {
                println!();
                println!("{}", itinerary);
                println!();
                println!("Type {} to write it to a file", "save".yellow());
            }
            Err(e) => {
                println!("{} {}", "error:".red().bold(), e);
                if let Some(hint) = e.hint() {
                    println!("{} {}", "hint:".cyan().bold(), hint);
                }
                if e.needs_api_key() {
                    println!("Type {} to enter a different API key", "key".yellow());
                }
                if !e.is_validation() && !self.session.is_empty() {
                    println!("{}", "Your previous itinerary is still available.".dimmed());
                }
            }
        }
        Ok(())
    }

    /// Ask for a key with masked input; `false` when the user cancels
    ///
    /// A typed key replaces the current client, including one built from the
    /// environment. Blank input keeps whatever is configured.
    fn prompt_key(&mut self) -> Result<bool> {
        let prompt = format!("API key (blank keeps {}): ", self.config.llm.api_key_env);
        let Field::Value(key) = read_secret(&prompt)? else {
            return Ok(false);
        };
        match self.apply_key(&key) {
            Ok(true) => println!("{}", "API key updated.".bright_green()),
            Ok(false) => {}
            Err(e) => println!("{} {}", "error:".red().bold(), e),
        }
        Ok(true)
    }

    /// Build a client from a typed key; `Ok(false)` when the input is blank
    fn apply_key(&mut self, key: &str) -> Result<bool, LlmError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(false);
        }
        match create_client(&self.config.llm, key) {
            Ok(client) => {
                info!("FormSession::apply_key: client replaced from typed key");
                self.orchestrator.set_client(Some(client));
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "FormSession::apply_key: could not create client");
                Err(e)
            }
        }
    }

    /// Prompt for every field; `None` when the user cancels
    fn read_request(&self, rl: &mut DefaultEditor) -> Result<Option<TripRequest>> {
        let today = Local::now().date_naive();

        let Field::Value(destination) = read_line(rl, "Destination: ")? else {
            return Ok(None);
        };
        let Field::Value(travel_date) = read_parsed(rl, &format!("Travel date [{}]: ", today), today, parse_date)? else {
            return Ok(None);
        };
        let Field::Value(duration_days) = read_parsed(
            rl,
            &format!("Duration in days (1-10) [{}]: ", DEFAULT_DURATION_DAYS),
            DEFAULT_DURATION_DAYS,
            |s| s.parse::<u32>().map_err(|e| e.to_string()),
        )?
        else {
            return Ok(None);
        };
        let Field::Value(budget) = read_parsed(
            rl,
            &format!("Budget ({}) [{}]: ", choices(&BudgetLevel::ALL), BudgetLevel::default()),
            BudgetLevel::default(),
            str::parse,
        )?
        else {
            return Ok(None);
        };
        let Field::Value(group) = read_parsed(
            rl,
            &format!("Travel group ({}) [{}]: ", choices(&TravelGroup::ALL), TravelGroup::default()),
            TravelGroup::default(),
            str::parse,
        )?
        else {
            return Ok(None);
        };

        Ok(Some(TripRequest::new(
            destination.trim(),
            travel_date,
            duration_days,
            budget,
            group,
        )))
    }

    fn show(&self) {
        match self.session.current() {
            Some(entry) => {
                println!();
                println!(
                    "{}",
                    format!("Generated {}", entry.generated_at.format("%Y-%m-%d %H:%M")).dimmed()
                );
                println!("{}", entry.itinerary);
                println!();
            }
            None => println!("{}", "No itinerary yet. Type plan to create one.".dimmed()),
        }
    }

    fn save(&self, dir: Option<PathBuf>) {
        let Some(entry) = self.session.current() else {
            println!("{}", "No itinerary to save yet.".dimmed());
            return;
        };
        let dir = dir.unwrap_or_else(|| self.config.output.dir.clone());
        match save_itinerary(&dir, &entry.destination, &entry.itinerary) {
            Ok(path) => println!(
                "{} {} ({})",
                "Saved".bright_green(),
                path.display(),
                MARKDOWN_CONTENT_TYPE
            ),
            Err(e) => println!("{} {:#}", "error:".red().bold(), e),
        }
    }
}

fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<Field<String>> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Field::Value(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Field::Cancelled),
        Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
    }
}

/// Masks typed characters with `*`
struct MaskedInput;

impl Helper for MaskedInput {}

impl Completer for MaskedInput {
    type Candidate = String;
}

impl Hinter for MaskedInput {
    type Hint = String;
}

impl Validator for MaskedInput {}

impl Highlighter for MaskedInput {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            Borrowed(line)
        } else {
            Owned("*".repeat(line.chars().count()))
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, kind: CmdKind) -> bool {
        kind != CmdKind::MoveCursor
    }
}

/// Read one line without echoing it; nothing is added to history
fn read_secret(prompt: &str) -> Result<Field<String>> {
    let mut rl: Editor<MaskedInput, DefaultHistory> =
        Editor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
    rl.set_helper(Some(MaskedInput));
    rl.set_color_mode(ColorMode::Forced);
    rl.set_auto_add_history(false);
    match rl.readline(prompt) {
        Ok(line) => Ok(Field::Value(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Field::Cancelled),
        Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
    }
}

/// Re-prompt until the input parses; blank input takes the default
fn read_parsed<T, F>(rl: &mut DefaultEditor, prompt: &str, default: T, parse: F) -> Result<Field<T>>
where
    T: Clone,
    F: Fn(&str) -> Result<T, String>,
{
    loop {
        let Field::Value(line) = read_line(rl, prompt)? else {
            return Ok(Field::Cancelled);
        };
        match parse_or_default(&line, default.clone(), &parse) {
            Ok(value) => return Ok(Field::Value(value)),
            Err(e) => println!("{} {}", "?".yellow(), e),
        }
    }
}

fn parse_or_default<T>(input: &str, default: T, parse: impl Fn(&str) -> Result<T, String>) -> Result<T, String> {
    let input = input.trim();
    if input.is_empty() { Ok(default) } else { parse(input) }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| format!("Invalid date: {}. Use YYYY-MM-DD", input))
}

fn choices<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(FormCommand::parse("plan"), FormCommand::Plan);
        assert_eq!(FormCommand::parse("/show"), FormCommand::Show);
        assert_eq!(FormCommand::parse("save"), FormCommand::Save(None));
        assert_eq!(
            FormCommand::parse("save  ./trips"),
            FormCommand::Save(Some(PathBuf::from("./trips")))
        );
        assert_eq!(FormCommand::parse("key"), FormCommand::Key);
        assert_eq!(FormCommand::parse("HELP"), FormCommand::Help);
        assert_eq!(FormCommand::parse("exit"), FormCommand::Quit);
        assert_eq!(FormCommand::parse("fly"), FormCommand::Unknown("fly".to_string()));
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default("", 5u32, |s| s.parse().map_err(|_| "bad".to_string())), Ok(5));
        assert_eq!(parse_or_default(" 7 ", 5u32, |s| s.parse().map_err(|_| "bad".to_string())), Ok(7));
        assert!(parse_or_default("x", 5u32, |s| s.parse::<u32>().map_err(|_| "bad".to_string())).is_err());
        assert_eq!(
            parse_or_default("luxury", BudgetLevel::default(), str::parse),
            Ok(BudgetLevel::Luxury)
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-03-01"), Ok(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()));
        assert!(parse_date("tomorrow").unwrap_err().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_masked_input_hides_key() {
        let masked = MaskedInput.highlight("gsk_secret", 3);
        assert_eq!(masked, "**********");
        assert!(!masked.contains("gsk"));
        assert_eq!(MaskedInput.highlight("", 0), "");
        assert!(MaskedInput.highlight_char("gsk", 3, CmdKind::Other));
        assert!(!MaskedInput.highlight_char("gsk", 3, CmdKind::MoveCursor));
    }

    fn form_session(config: Config) -> FormSession {
        let reporter = Arc::new(crate::pipeline::RecordingReporter::new());
        let orchestrator = Orchestrator::from_config(&config, None, reporter).unwrap();
        FormSession::new(config, orchestrator)
    }

    #[test]
    fn test_typed_key_replaces_client() {
        let mut form = form_session(Config::default());
        assert!(!form.orchestrator.has_client());

        assert!(!form.apply_key("   ").unwrap());
        assert!(!form.orchestrator.has_client());

        assert!(form.apply_key(" gsk_typed ").unwrap());
        assert!(form.orchestrator.has_client());
    }

    #[test]
    fn test_typed_key_overrides_configured_client() {
        let config = Config::default();
        let reporter = Arc::new(crate::pipeline::RecordingReporter::new());
        let orchestrator = Orchestrator::from_config(&config, Some("gsk_from_env"), reporter).unwrap();
        let mut form = FormSession::new(config, orchestrator);
        assert!(form.orchestrator.has_client());

        assert!(form.apply_key("gsk_typed").unwrap());
        assert!(form.orchestrator.has_client());
    }

    #[test]
    fn test_client_errors_are_returned() {
        let mut config = Config::default();
        config.llm.provider = "anthropic".to_string();
        let mut form = form_session(config);

        let err = form.apply_key("sk-ant").unwrap_err();
        assert!(matches!(err, LlmError::UnknownProvider(_)));
        assert!(!form.orchestrator.has_client());
    }

    #[test]
    fn test_choices() {
        assert_eq!(choices(&BudgetLevel::ALL), "Student/Budget / Mid-Range / Luxury");
    }
}
