//! Is a module containing the [`Token`] type and all of its related types.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use derive_new::new;
use getset::{CopyGetters, Getters};
use lazy_static::lazy_static;
use lox_base::source_file::{SourceElement, Span};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

/// Is an enumeration of every kind of token the lexer can produce.
///
/// The discriminants are grouped by thousands, one block per [`Group`], so that new kinds can be
/// added to a group without renumbering the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum Kind {
    // errors
    Invalid = 0,
    UnterminatedString,
    UnterminatedBlockComment,

    // keywords
    And = 1000,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Not,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    // literals
    Name = 2000,
    String,
    Number,

    // operators
    NotEquals = 3000,
    Equals,
    GreaterEquals,
    LessEquals,
    Greater,
    Less,
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,

    // punctuation
    Comma = 4000,
    Dot,

    // delimiters
    Semicolon = 5000,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

/// Is the category a [`Kind`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Group {
    Error,
    Keyword,
    Literal,
    Operator,
    Punctuation,
    Delimiter,
}

/// Is an error that is returned when a string is not the spelling of any [`Kind`] in [`FromStr`]
/// trait implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Error)]
#[error("invalid string representation of a token kind.")]
pub struct KindParseError;

lazy_static! {
    static ref SPELLING_KIND_MAP: HashMap<&'static str, Kind> = Kind::iter()
        .filter_map(|kind| kind.as_str().map(|spelling| (spelling, kind)))
        .collect();
}

impl Kind {
    /// Gets the numeric code of the kind.
    #[must_use]
    pub fn code(self) -> u16 { self as u16 }

    /// Gets the [`Group`] the kind belongs to.
    #[must_use]
    pub fn group(self) -> Group {
        match self.code() / 1000 {
            0 => Group::Error,
            1 => Group::Keyword,
            2 => Group::Literal,
            3 => Group::Operator,
            4 => Group::Punctuation,
            _ => Group::Delimiter,
        }
    }

    /// Checks whether the kind marks malformed input.
    #[must_use]
    pub fn is_error(self) -> bool { self.group() == Group::Error }

    /// Gets the fixed spelling of the kind.
    ///
    /// Returns [`None`] for errors and literals, whose text varies.
    #[must_use]
    pub fn as_str(self) -> Option<&'static str> {
        let spelling = match self {
            Self::Invalid
            | Self::UnterminatedString
            | Self::UnterminatedBlockComment
            | Self::Name
            | Self::String
            | Self::Number => return None,

            Self::And => "and",
            Self::Class => "class",
            Self::Else => "else",
            Self::False => "false",
            Self::Fun => "fun",
            Self::For => "for",
            Self::If => "if",
            Self::Nil => "nil",
            Self::Not => "not",
            Self::Or => "or",
            Self::Print => "print",
            Self::Return => "return",
            Self::Super => "super",
            Self::This => "this",
            Self::True => "true",
            Self::Var => "var",
            Self::While => "while",

            Self::NotEquals => "!=",
            Self::Equals => "==",
            Self::GreaterEquals => ">=",
            Self::LessEquals => "<=",
            Self::Greater => ">",
            Self::Less => "<",
            Self::Assign => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",

            Self::Comma => ",",
            Self::Dot => ".",

            Self::Semicolon => ";",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
        };

        Some(spelling)
    }

    /// Looks up the keyword spelled exactly as `word`.
    #[must_use]
    pub fn keyword(word: &str) -> Option<Self> {
        Self::from_str(word)
            .ok()
            .filter(|kind| kind.group() == Group::Keyword)
    }

    /// Looks up the operator spelled exactly as `operator`.
    #[must_use]
    pub fn operator(operator: &str) -> Option<Self> {
        Self::from_str(operator)
            .ok()
            .filter(|kind| kind.group() == Group::Operator)
    }
}

impl FromStr for Kind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SPELLING_KIND_MAP.get(s).copied().ok_or(KindParseError)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(spelling) = self.as_str() {
            return write!(f, "`{spelling}`");
        }

        f.write_str(match self {
            Self::Invalid => "invalid token",
            Self::UnterminatedString => "unterminated string",
            Self::UnterminatedBlockComment => "unterminated block comment",
            Self::Name => "name",
            Self::String => "string",
            _ => "number",
        })
    }
}

/// Represents a classified piece of source text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters, new)]
pub struct Token {
    /// Gets the kind of the token.
    #[get_copy = "pub"]
    kind: Kind,

    /// Gets the span of the text that makes up the token.
    #[get = "pub"]
    span: Span,
}

impl Token {
    /// Gets the text of the token.
    #[must_use]
    pub fn str(&self) -> &str { self.span.str() }

    /// Checks whether the token marks malformed input.
    #[must_use]
    pub fn is_error(&self) -> bool { self.kind.is_error() }
}

impl SourceElement for Token {
    fn span(&self) -> Span { self.span.clone() }
}
