//! Contains the command-line entry point of the Lox front end.

use std::{
    fmt::Display,
    path::PathBuf,
    process::ExitCode,
    sync::atomic::{AtomicBool, Ordering},
};

pub use clap::Parser;
use lox_base::{
    diagnostic::Handler,
    log::{Message, Severity},
    source_file::SourceFile,
};
use lox_lexical::token_stream::TokenStream;

/// The arguments to the program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, clap::Parser)]
#[clap(
    name = "lox",
    about = "Lox programming language front end.",
    author = "66011245@kmitl.ac.th"
)]
pub struct Argument {
    /// The source file to tokenize.
    pub file: PathBuf,

    /// Prints every token with its location.
    #[clap(long = "dump-tokens")]
    pub dump_tokens: bool,
}

/// A struct that implements [`Handler`] but prints all the message to the standard error stream.
#[derive(Debug, Default)]
struct Printer {
    printed: AtomicBool,
}

impl Printer {
    fn has_printed(&self) -> bool { self.printed.load(Ordering::Relaxed) }
}

impl<E: Display> Handler<E> for Printer {
    fn receive(&self, diagnostic: E) {
        eprintln!("{diagnostic}");
        self.printed.store(true, Ordering::Relaxed);
    }
}

/// Runs the program with the given arguments.
#[must_use]
pub fn run(argument: &Argument) -> ExitCode {
    let source_file = match SourceFile::load(&argument.file) {
        Ok(source_file) => source_file,
        Err(error) => {
            let message = Message::new(
                Severity::Error,
                format!("{}: {error}", argument.file.display()),
            );

            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let printer = Printer::default();
    let token_stream = TokenStream::tokenize(&source_file, &printer);

    if argument.dump_tokens {
        for token in token_stream.iter() {
            println!(
                "{} {} {:?}",
                token.span().start_location(),
                token.kind(),
                token.str()
            );
        }
    }

    if printer.has_printed() {
        return ExitCode::FAILURE;
    }

    let summary = Message::new(
        Severity::Info,
        format!(
            "{}: {} token(s) over {} line(s)",
            source_file.origin(),
            token_stream.len(),
            source_file.line_count()
        ),
    );
    eprintln!("{summary}");

    ExitCode::SUCCESS
}
