//! This crate implements the lexical analysis phase of the Lox front end. This phase is
//! responsible for tokenizing the source code into a stream of tokens.
//!
//! Tokens are pulled one at a time from a [`lexer::Lexer`], or collected all at once into a
//! [`token_stream::TokenStream`] which also reports the lexical errors it encounters.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod error;
pub mod lexer;
pub mod token;
pub mod token_stream;
