//! Contains the diagnostics reported for the error tokens produced while tokenizing the source
//! code.

use std::fmt::Display;

use derive_more::From;
use enum_as_inner::EnumAsInner;
use lox_base::{
    log::{Message, Severity, SourceCodeDisplay},
    source_file::Span,
};

use crate::token::{Kind, Token};

/// Narrows a span down to its first `length` bytes, falling back to the whole span.
fn opening_of(span: &Span, length: usize) -> Span {
    span.source_file()
        .span(span.start(), span.start() + length)
        .unwrap_or_else(|_| span.clone())
}

/// The source code contains a character or a run of characters that forms no token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvalidToken {
    /// The span of the offending characters.
    pub span: Span,
}

impl InvalidToken {
    fn help(&self) -> &'static str {
        let text = self.span.str();

        if text.starts_with(|character: char| character.is_ascii_digit()) {
            "a number can contain at most one `.`"
        } else if text.chars().count() > 1 {
            "this is not one of the operators `!= == >= <= > < = + - * / %`"
        } else {
            "this character can't start a token"
        }
    }
}

impl Display for InvalidToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                format!("found an invalid token `{}`", self.span.str())
            ),
            SourceCodeDisplay::new(&self.span, Some(self.help()))
        )
    }
}

/// The source code contains a `"` that is never closed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnterminatedString {
    /// The span from the opening `"` to the end of the source code.
    pub span: Span,
}

impl Display for UnterminatedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, "found an unterminated string literal"),
            SourceCodeDisplay::new(
                &opening_of(&self.span, 1),
                Some("this string is never closed by a `\"`")
            )
        )
    }
}

/// The source code contains a `/*` comment that is never closed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnterminatedBlockComment {
    /// The span from the opening `/*` to the end of the source code.
    pub span: Span,
}

impl Display for UnterminatedBlockComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, "found an unclosed `/*` comment"),
            SourceCodeDisplay::new(
                &opening_of(&self.span, 2),
                Some("every `/*`, including nested ones, needs a matching `*/`")
            )
        )
    }
}

/// Is an enumeration containing all kinds of lexical errors that can occur while tokenizing the
/// source code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner, From)]
#[allow(missing_docs)]
pub enum Error {
    InvalidToken(InvalidToken),
    UnterminatedString(UnterminatedString),
    UnterminatedBlockComment(UnterminatedBlockComment),
}

impl Error {
    /// Creates the diagnostic describing the given token.
    ///
    /// Returns [`None`] if the token is not an error token.
    #[must_use]
    pub fn from_token(token: &Token) -> Option<Self> {
        let span = token.span().clone();

        match token.kind() {
            Kind::Invalid => Some(InvalidToken { span }.into()),
            Kind::UnterminatedString => Some(UnterminatedString { span }.into()),
            Kind::UnterminatedBlockComment => Some(UnterminatedBlockComment { span }.into()),
            _ => None,
        }
    }

    /// Gets the span of the offending source code.
    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::InvalidToken(error) => &error.span,
            Self::UnterminatedString(error) => &error.span,
            Self::UnterminatedBlockComment(error) => &error.span,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidToken(error) => write!(f, "{error}"),
            Self::UnterminatedString(error) => write!(f, "{error}"),
            Self::UnterminatedBlockComment(error) => write!(f, "{error}"),
        }
    }
}
