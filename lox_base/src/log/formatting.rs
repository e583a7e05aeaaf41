//! Contains the ANSI escape codes used to color and style console output.

use std::fmt::Display;

/// Represents a style that can be applied to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Style {
    Bold,
    Underline,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Self::Bold => "1",
            Self::Underline => "4",
        }
    }

    /// Applies the style to the given displayable object.
    pub fn with<T>(self, display: T) -> Painted<T> {
        Painted {
            code: self.code(),
            display,
        }
    }
}

/// Represents a foreground color that can be applied to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
}

impl Color {
    fn code(self) -> &'static str {
        match self {
            Self::Red => "31",
            Self::Green => "32",
            Self::Yellow => "33",
            Self::Cyan => "36",
        }
    }

    /// Applies the color to the given displayable object.
    pub fn with<T>(self, display: T) -> Painted<T> {
        Painted {
            code: self.code(),
            display,
        }
    }
}

/// Is a [`Display`] wrapper that surrounds an object with an ANSI escape sequence and a reset.
///
/// Painted values nest: `Style::Bold.with(Color::Red.with("x"))` prints bold red text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Painted<T> {
    code: &'static str,

    /// The displayable object.
    pub display: T,
}

impl<T: Display> Display for Painted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1B[{}m{}\x1B[0m", self.code, self.display)
    }
}
