//! Contains the [`Lexer`], a forward-only cursor that turns the text of a [`SourceFile`] into
//! [`Token`]s on demand.

use std::{iter::FusedIterator, sync::Arc};

use getset::{CopyGetters, Getters};
use lox_base::source_file::{is_line_terminator, ByteIndex, Position, SourceFile, Span};

use crate::token::{Kind, Token};

/// Is a pull-based tokenizer over a shared [`SourceFile`].
///
/// Every call to [`Iterator::next()`] skips whitespace and comments, then classifies the longest
/// run of characters that can form the next token. Malformed input never stops the lexer; it is
/// reported as a token whose [`Kind::is_error()`] is `true`.
///
/// Each lexer owns its cursor, so any number of lexers can scan the same source file at once.
#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct Lexer {
    /// Gets the source file being tokenized.
    #[get = "pub"]
    source_file: Arc<SourceFile>,

    /// Gets the byte index of the cursor.
    #[get_copy = "pub"]
    index: ByteIndex,
}

/// Checks whether the given character can be part of an operator.
fn is_operator_character(character: char) -> bool {
    matches!(
        character,
        '<' | '>' | '!' | '=' | '+' | '-' | '*' | '/' | '%'
    )
}

fn is_word_character(character: char) -> bool {
    character.is_alphabetic() || character.is_ascii_digit()
}

impl Lexer {
    /// Creates a lexer positioned at the start of the given source file.
    #[must_use]
    pub fn new(source_file: Arc<SourceFile>) -> Self {
        Self {
            source_file,
            index: 0,
        }
    }

    /// Gets the current [`Position`] of the cursor.
    #[must_use]
    pub fn position(&self) -> Position {
        self.source_file
            .position(self.index)
            .expect("the cursor always stays on a character boundary")
    }

    fn rest(&self) -> &str { &self.source_file.content()[self.index..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn bump(&mut self) {
        if let Some(character) = self.peek() {
            self.index += character.len_utf8();
        }
    }

    /// Consumes `prefix` if the remaining text starts with it.
    fn eat(&mut self, prefix: &str) -> bool {
        let found = self.rest().starts_with(prefix);
        if found {
            self.index += prefix.len();
        }
        found
    }

    /// Advances the cursor while the predicate holds.
    fn walk(&mut self, predicate: impl Fn(char) -> bool) {
        let rest = self.rest();
        let length = rest
            .find(|character: char| !predicate(character))
            .unwrap_or(rest.len());
        self.index += length;
    }

    fn text_from(&self, start: ByteIndex) -> &str { &self.source_file.content()[start..self.index] }

    /// Creates a span from the given start index to the cursor.
    fn create_span(&self, start: ByteIndex) -> Span {
        Span::new(self.source_file.clone(), start, self.index)
            .expect("the lexer only moves forward over whole characters")
    }

    /// Skips whitespace and comments.
    ///
    /// Returns the [`Kind::UnterminatedBlockComment`] token if a block comment runs to the end of
    /// the file.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            let start = self.index;

            if self.peek().is_some_and(char::is_whitespace) {
                self.walk(char::is_whitespace);
            } else if self.eat("//") {
                self.walk(|character| !is_line_terminator(character));
            } else if self.eat("/*") {
                if !self.skip_block_comment() {
                    return Some(Token::new(
                        Kind::UnterminatedBlockComment,
                        self.create_span(start),
                    ));
                }
            } else {
                return None;
            }
        }
    }

    /// Skips the body of a block comment whose `/*` has been consumed. Block comments nest.
    ///
    /// Returns `false` if the file ends before the comment is closed.
    fn skip_block_comment(&mut self) -> bool {
        let mut depth = 1_usize;

        while depth > 0 {
            if self.eat("/*") {
                depth += 1;
            } else if self.eat("*/") {
                depth -= 1;
            } else if self.peek().is_some() {
                self.bump();
            } else {
                return false;
            }
        }

        true
    }

    fn handle_word(&mut self, start: ByteIndex) -> Kind {
        self.walk(is_word_character);
        Kind::keyword(self.text_from(start)).unwrap_or(Kind::Name)
    }

    fn handle_number(&mut self, start: ByteIndex) -> Kind {
        self.walk(|character| character.is_ascii_digit() || character == '.');

        if self.text_from(start).matches('.').count() <= 1 {
            Kind::Number
        } else {
            Kind::Invalid
        }
    }

    fn handle_string(&mut self) -> Kind {
        // opening quote
        self.bump();
        self.walk(|character| character != '"');

        if self.peek().is_none() {
            return Kind::UnterminatedString;
        }

        // closing quote
        self.bump();
        Kind::String
    }

    fn handle_operator(&mut self, start: ByteIndex) -> Kind {
        self.walk(is_operator_character);
        Kind::operator(self.text_from(start)).unwrap_or(Kind::Invalid)
    }

    fn handle_single_character(&mut self, character: char) -> Kind {
        self.bump();

        match character {
            ',' => Kind::Comma,
            '.' => Kind::Dot,
            ';' => Kind::Semicolon,
            '(' => Kind::LParen,
            ')' => Kind::RParen,
            '{' => Kind::LBrace,
            '}' => Kind::RBrace,
            '[' => Kind::LBracket,
            ']' => Kind::RBracket,
            _ => Kind::Invalid,
        }
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.skip_trivia() {
            return Some(token);
        }

        let start = self.index;
        let character = self.peek()?;

        let kind = if character.is_alphabetic() {
            self.handle_word(start)
        } else if character.is_ascii_digit() {
            self.handle_number(start)
        } else if character == '"' {
            self.handle_string()
        } else if is_operator_character(character) {
            self.handle_operator(start)
        } else {
            self.handle_single_character(character)
        };

        Some(Token::new(kind, self.create_span(start)))
    }
}

impl FusedIterator for Lexer {}
