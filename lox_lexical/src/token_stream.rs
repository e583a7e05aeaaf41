//! Contains the [`TokenStream`] struct, the complete list of tokens of a source file.

use std::sync::Arc;

use derive_more::Deref;
use lox_base::{diagnostic::Handler, source_file::SourceFile};

use crate::{error, lexer::Lexer, token::Token};

/// Is the list of every token of a source file, in source order.
///
/// Error tokens are kept in the stream; each of them is also reported as an [`error::Error`]
/// diagnostic when the stream is built, so all lexical errors of a file surface in one pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Tokenizes the whole source file.
    ///
    /// Drives a [`Lexer`] until it is exhausted and reports every error token to `handler`.
    #[must_use]
    pub fn tokenize(source_file: &Arc<SourceFile>, handler: &dyn Handler<error::Error>) -> Self {
        let tokens = Lexer::new(source_file.clone())
            .inspect(|token| {
                if let Some(error) = error::Error::from_token(token) {
                    handler.receive(error);
                }
            })
            .collect();

        Self { tokens }
    }

    /// Checks whether the stream contains any error token.
    #[must_use]
    pub fn has_errors(&self) -> bool { self.tokens.iter().any(Token::is_error) }

    /// Dissolves this struct into the list of tokens.
    #[must_use]
    pub fn dissolve(self) -> Vec<Token> { self.tokens }
}

impl IntoIterator for TokenStream {
    type IntoIter = std::vec::IntoIter<Token>;
    type Item = Token;

    fn into_iter(self) -> Self::IntoIter { self.tokens.into_iter() }
}
