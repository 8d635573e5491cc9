//! User-facing output.
//!
//! Commands talk to a [`Logger`]; where the lines end up depends on the
//! [`LogSink`] chosen when the context is built:
//!
//! - [`ConsoleSink`]: styled terminal output, errors on stderr, responses dropped
//! - [`PipeSink`]: plain lines plus the JSON response line, written to a client
//! - [`MemorySink`]: records everything (tests)
//!
//! Questions go through a [`Prompt`], so pipe sessions never block on stdin.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use console::style;

use crate::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warn,
    Error,
}

impl Level {
    pub fn prefix(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Success => "[OK]  ",
            Level::Warn => "[WARN]",
            Level::Error => "[ERR ]",
        }
    }
}

/// One unit of output.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Log(Level, String),
    /// Unprefixed line (section banners, boxes).
    Plain(String),
    Response(Response),
}

impl Record {
    /// Plain-text rendering used by non-terminal sinks.
    pub fn text(&self) -> String {
        match self {
            Record::Log(level, msg) => format!("{} {}", level.prefix(), msg),
            Record::Plain(line) => line.clone(),
            Record::Response(response) => response.to_line(),
        }
    }
}

pub trait LogSink {
    fn emit(&mut self, record: Record);

    /// Whether responses reach a client.
    fn structured(&self) -> bool {
        false
    }
}

/// Terminal output styled with `console`.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn emit(&mut self, record: Record) {
        match record {
            Record::Log(Level::Error, msg) => {
                eprintln!("{} {}", style(Level::Error.prefix()).red().bold().for_stderr(), msg);
            }
            Record::Log(level, msg) => {
                let prefix = match level {
                    Level::Info => style(level.prefix()).dim(),
                    Level::Success => style(level.prefix()).green().bold(),
                    _ => style(level.prefix()).yellow().bold(),
                };
                println!("{} {}", prefix, msg);
            }
            Record::Plain(line) => println!("{}", line),
            Record::Response(response) => {
                tracing::trace!(code = response.status.code, "response dropped on console");
            }
        }
    }
}

/// Writes every record as one text line to a pipe client.
pub struct PipeSink {
    writer: Box<dyn Write>,
}

impl PipeSink {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl LogSink for PipeSink {
    fn emit(&mut self, record: Record) {
        let line = record.text();
        let written = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "pipe client write failed");
        }
    }

    fn structured(&self) -> bool {
        true
    }
}

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
    structured: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory sink that reports itself as a pipe (responses are expected).
    pub fn structured() -> Self {
        Self {
            structured: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Every record rendered as text.
    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(Record::text).collect()
    }

    pub fn responses(&self) -> Vec<Response> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Response(response) => Some(response),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl LogSink for MemorySink {
    fn emit(&mut self, record: Record) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }

    fn structured(&self) -> bool {
        self.structured
    }
}

/// Source of answers to interactive questions.
pub trait Prompt {
    /// `None` when no answer can be obtained (end of input, no terminal).
    fn answer(&mut self, question: &str) -> Option<String>;
}

/// Reads answers from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn answer(&mut self, question: &str) -> Option<String> {
        print!("{}", style(question).cyan());
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

/// Never answers; every question falls back to its default.
#[derive(Debug, Default)]
pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn answer(&mut self, _question: &str) -> Option<String> {
        None
    }
}

/// Pre-recorded answers, consumed in order.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn answer(&mut self, _question: &str) -> Option<String> {
        self.answers.pop_front()
    }
}

pub struct Logger {
    sink: Box<dyn LogSink>,
    prompt: Box<dyn Prompt>,
    responded: bool,
    /// Responses captured while a composite command runs a step.
    held: Option<Vec<Response>>,
}

impl Logger {
    pub fn new(sink: Box<dyn LogSink>, prompt: Box<dyn Prompt>) -> Self {
        Self {
            sink,
            prompt,
            responded: false,
            held: None,
        }
    }

    pub fn console() -> Self {
        Self::new(Box::new(ConsoleSink), Box::new(StdinPrompt))
    }

    pub fn log(&mut self, level: Level, message: impl Into<String>) {
        self.sink.emit(Record::Log(level, message.into()));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(Level::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(Level::Success, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(Level::Error, message);
    }

    fn plain(&mut self, line: impl Into<String>) {
        self.sink.emit(Record::Plain(line.into()));
    }

    pub fn section(&mut self, title: &str) {
        let bar = "=".repeat(title.chars().count().clamp(10, 30));
        self.plain("");
        self.plain(bar.clone());
        self.plain(title);
        self.plain(bar);
        self.plain("");
    }

    /// Titled block of lines between two rules.
    pub fn boxed<I, S>(&mut self, title: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let widest = lines
            .iter()
            .map(|l| l.chars().count())
            .chain(std::iter::once(title.chars().count()))
            .max()
            .unwrap_or(0);
        let bar = "-".repeat(widest.clamp(16, 60));
        self.plain("");
        self.plain(title);
        self.plain(bar.clone());
        for line in lines {
            self.plain(line);
        }
        self.plain(bar);
        self.plain("");
    }

    /// Ask a free-form question. `None` when no answer is available.
    pub fn ask(&mut self, question: &str) -> Option<String> {
        let answer = self.prompt.answer(question);
        if answer.is_none() {
            tracing::debug!(question, "no answer available");
        }
        answer
    }

    /// Yes/no question. An empty or missing answer yields `default`.
    pub fn confirm(&mut self, message: &str, default: bool) -> bool {
        let suffix = if default { " (Y/n): " } else { " (y/N): " };
        match self.ask(&format!("{message}{suffix}")) {
            Some(answer) => match answer.trim().to_ascii_lowercase().as_str() {
                "" => default,
                "y" | "yes" => true,
                _ => false,
            },
            None => {
                self.warn(format!(
                    "No answer for '{}'; assuming {}.",
                    message,
                    if default { "yes" } else { "no" }
                ));
                default
            }
        }
    }

    /// Emit the turn's structured response. Only the first one counts.
    pub fn respond(&mut self, response: Response) {
        if let Some(held) = self.held.as_mut() {
            held.push(response);
            return;
        }
        if self.responded {
            tracing::debug!(code = response.status.code, "extra response ignored");
            return;
        }
        self.responded = true;
        self.sink.emit(Record::Response(response));
    }

    pub fn has_responded(&self) -> bool {
        self.responded
    }

    /// Capture responses instead of emitting them, until [`Logger::release`].
    pub fn hold(&mut self) {
        self.held = Some(Vec::new());
    }

    /// Stop capturing and hand back what was captured.
    pub fn release(&mut self) -> Vec<Response> {
        self.held.take().unwrap_or_default()
    }

    /// True when responses reach a pipe client.
    pub fn is_structured(&self) -> bool {
        self.sink.structured()
    }

    /// Precondition failure: error line plus a 400 response.
    pub fn reject(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error(message.clone());
        self.respond(Response::bad_request(message));
    }

    /// Operational failure: error line plus a 500 response.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error(message.clone());
        self.respond(Response::internal_error(message));
    }
}
