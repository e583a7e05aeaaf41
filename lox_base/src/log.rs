//! Provides the functions related to logging/printing messages to the console.

use std::fmt::Display;

use derive_new::new;
use formatting::{Color, Style};

use crate::source_file::{is_line_terminator, Span};

pub mod formatting;

/// Represents the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

impl Severity {
    fn header(self) -> (Color, &'static str) {
        match self {
            Self::Error => (Color::Red, "[error]:"),
            Self::Info => (Color::Green, "[info]:"),
            Self::Warning => (Color::Yellow, "[warning]:"),
        }
    }
}

/// Is a struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (color, header) = self.severity.header();

        write!(
            f,
            "{} {}",
            Style::Bold.with(color.with(header)),
            Style::Bold.with(&self.display)
        )
    }
}

/// Structure implementing [`Display`] that prints the lines of source code covered by a span.
///
/// The output starts with a `--> origin:line:column` header, shows one line of context around the
/// span, and underlines the characters inside the span. An optional help message is attached
/// below a single-line span or after a multi-line one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, new)]
pub struct SourceCodeDisplay<'a, T> {
    /// The span of the source code to be printed.
    pub span: &'a Span,

    /// The help message to be displayed.
    pub help_display: Option<T>,
}

const TAB: &str = "    ";

fn write_gutter(
    f: &mut std::fmt::Formatter<'_>,
    width: usize,
    line_number: Option<usize>,
) -> std::fmt::Result {
    match line_number {
        Some(line_number) => write!(
            f,
            "{} {} ",
            Style::Bold.with(Color::Cyan.with(format!("{line_number:>width$}"))),
            Style::Bold.with(Color::Cyan.with("┃"))
        ),
        None => write!(
            f,
            "{:width$} {} ",
            "",
            Style::Bold.with(Color::Cyan.with("┃"))
        ),
    }
}

impl<'a, T: Display> SourceCodeDisplay<'a, T> {
    fn write_line(&self, f: &mut std::fmt::Formatter<'_>, line_number: usize) -> std::fmt::Result {
        let source_file = self.span.source_file();
        let (Some(line), Some(line_start)) = (
            source_file.get_line(line_number),
            source_file.line_start(line_number),
        ) else {
            return Ok(());
        };

        for (offset, character) in line.char_indices() {
            if is_line_terminator(character) {
                break;
            }

            let index = line_start + offset;
            let in_span = self.span.start() <= index && index < self.span.end();
            let text = if character == '\t' {
                TAB.to_owned()
            } else {
                character.to_string()
            };

            if in_span {
                write!(
                    f,
                    "{}",
                    Style::Underline.with(Style::Bold.with(Color::Red.with(text)))
                )?;
            } else {
                f.write_str(&text)?;
            }
        }

        Ok(())
    }

    fn write_markers(&self, f: &mut std::fmt::Formatter<'_>, line_number: usize) -> std::fmt::Result {
        let line = self
            .span
            .source_file()
            .get_line(line_number)
            .unwrap_or_default();
        let column = self.span.start_location().column;

        let indent: String = line
            .chars()
            .take(column - 1)
            .map(|character| if character == '\t' { TAB } else { " " })
            .collect();
        let width = self
            .span
            .str()
            .chars()
            .map(|character| if character == '\t' { TAB.len() } else { 1 })
            .sum::<usize>()
            .max(1);

        write!(
            f,
            "{indent}{}",
            Style::Bold.with(Color::Red.with("^".repeat(width)))
        )?;

        if let Some(help) = &self.help_display {
            write!(f, " {}: {help}", Style::Bold.with("help"))?;
        }

        writeln!(f)
    }
}

impl<'a, T: Display> Display for SourceCodeDisplay<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source_file = self.span.source_file();
        let start = self.span.start_location();
        let end = self.span.end_location();
        let is_multiline = start.line != end.line;

        // one line of context on each side
        let first_line = start.line.saturating_sub(1).max(1);
        let last_line = (end.line + 1).min(source_file.line_count());
        let width = last_line.to_string().len();

        writeln!(
            f,
            "{:width$}{} {}:{start}",
            "",
            Style::Bold.with(Color::Cyan.with("-->")),
            source_file.origin(),
        )?;

        write_gutter(f, width, None)?;
        writeln!(f)?;

        for line_number in first_line..=last_line {
            write_gutter(f, width, Some(line_number))?;
            self.write_line(f, line_number)?;
            writeln!(f)?;

            if !is_multiline && line_number == start.line {
                write_gutter(f, width, None)?;
                self.write_markers(f, line_number)?;
            }
        }

        write_gutter(f, width, None)?;
        writeln!(f)?;

        if let (true, Some(help)) = (is_multiline, &self.help_display) {
            writeln!(
                f,
                "{:width$} {} {}: {help}",
                "",
                Style::Bold.with(Color::Cyan.with("=")),
                Style::Bold.with("help")
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
