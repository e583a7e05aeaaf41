//! Contains the source buffer of a single source unit and the [`Position`]/[`Span`] types that
//! point into it.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
};

use getset::{CopyGetters, Getters};
use memmap::MmapOptions;
use ouroboros::self_referencing;
use thiserror::Error;
use uuid::Uuid;

/// Represents an error that occurs when loading a source file from the file system.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),
}

/// Is an error returned when a [`Position`] or [`Span`] is misused.
///
/// Both variants indicate a bug in the calling code rather than a problem in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum RangeError {
    /// The byte index is past the end of the source file or inside a multi-byte character.
    #[error("byte index {index} is out of range for a source of {length} bytes")]
    OutOfRange {
        /// The rejected byte index.
        index: ByteIndex,

        /// The length in bytes of the source file that was queried.
        length: usize,
    },

    /// The operation combines values that cannot be combined, e.g. spans from two different
    /// source files.
    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),
}

/// Is an unsigned integer that represents a byte index in the source code.
pub type ByteIndex = usize;

/// Describes where the text of a [`SourceFile`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The text was read from the file at the given path.
    File(PathBuf),

    /// The text was given in memory; the id makes the name globally unique.
    Synthesized(Uuid),
}

impl Origin {
    /// Gets the name of the source, without directories or extension.
    ///
    /// For a synthesized source this is its unique id.
    #[must_use]
    pub fn base_name(&self) -> String {
        match self {
            Self::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Self::Synthesized(id) => id.to_string(),
        }
    }

    /// Checks whether the source text was given in memory.
    #[must_use]
    pub fn is_synthesized(&self) -> bool { matches!(self, Self::Synthesized(..)) }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Synthesized(id) => write!(f, "synthesized://{id}"),
        }
    }
}

#[self_referencing]
struct MappedSource {
    file: File,
    mapped: Option<memmap::Mmap>,

    #[borrows(mapped)]
    mapped_str: &'this str,
}

impl MappedSource {
    fn create(file: File) -> Result<Self, Error> {
        // zero-length files can't be mapped
        let mapped = if file.metadata()?.len() == 0 {
            None
        } else {
            Some(unsafe { MmapOptions::new().map(&file)? })
        };

        MappedSourceTryBuilder {
            file,
            mapped,
            mapped_str_builder: |mapped| {
                mapped.as_ref().map_or(Ok(""), |mapped| {
                    std::str::from_utf8(mapped).map_err(Error::from)
                })
            },
        }
        .try_build()
    }
}

enum Content {
    Mapped(MappedSource),
    Owned(String),
}

impl Content {
    fn as_str(&self) -> &str {
        match self {
            Self::Mapped(mapped) => mapped.borrow_mapped_str(),
            Self::Owned(string) => string,
        }
    }
}

/// Represents the immutable text of one source unit together with the index of its line starts.
///
/// A source file is always handed out as an [`Arc<SourceFile>`] so that positions, spans, and
/// lexers can share it without copying the text.
#[derive(Getters)]
pub struct SourceFile {
    content: Content,

    /// Gets the origin of the source file.
    #[get = "pub"]
    origin: Origin,

    line_starts: Vec<ByteIndex>,
}

impl Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("origin", &self.origin)
            .field("line_starts", &self.line_starts)
            .finish_non_exhaustive()
    }
}

impl SourceFile {
    fn new(origin: Origin, content: Content) -> Arc<Self> {
        let line_starts = get_line_starts(content.as_str());
        Arc::new(Self {
            content,
            origin,
            line_starts,
        })
    }

    /// Loads the source file at the given path.
    ///
    /// # Errors
    /// - [`Error::IoError`]: Error occurred when opening the file or mapping it to memory.
    /// - [`Error::Utf8Error`]: The file content is not valid UTF-8.
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Self>, Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_file(file, path.to_owned())
    }

    /// Creates the source file from an already opened file located at `path`.
    ///
    /// # Errors
    /// - [`Error::IoError`]: Error occurred when mapping the file to memory.
    /// - [`Error::Utf8Error`]: The file content is not valid UTF-8.
    pub fn from_file(file: File, path: PathBuf) -> Result<Arc<Self>, Error> {
        let source = MappedSource::create(file)?;
        Ok(Self::new(Origin::File(path), Content::Mapped(source)))
    }

    /// Creates a source file from in-memory text and gives it a fresh unique name.
    #[must_use]
    pub fn synthesized(text: impl Into<String>) -> Arc<Self> {
        Self::new(
            Origin::Synthesized(Uuid::new_v4()),
            Content::Owned(text.into()),
        )
    }

    /// Gets the full text of the source file.
    #[must_use]
    pub fn content(&self) -> &str { self.content.as_str() }

    /// Gets the length of the source file in bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.content().len() }

    /// Checks whether the source file has no text at all.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.content().is_empty() }

    /// Gets the number of lines in the source file.
    ///
    /// A trailing line terminator starts one more (empty) line.
    #[must_use]
    pub fn line_count(&self) -> usize { self.line_starts.len() }

    /// Gets the byte index at which the given line starts.
    ///
    /// The line number starts at 1.
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<ByteIndex> {
        line.checked_sub(1)
            .and_then(|index| self.line_starts.get(index))
            .copied()
    }

    /// Gets the text of the given line, including its line terminator.
    ///
    /// The line number starts at 1.
    #[must_use]
    pub fn get_line(&self, line: usize) -> Option<&str> {
        let start = self.line_start(line)?;
        let end = self.line_start(line + 1).unwrap_or_else(|| self.len());
        Some(&self.content()[start..end])
    }

    /// Checks that `byte_index` is a valid position in this source file.
    ///
    /// The index equal to [`Self::len()`] is valid and denotes the end of the file.
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: The index is past the end of the text or not on a
    ///   character boundary.
    pub fn check_index(&self, byte_index: ByteIndex) -> Result<(), RangeError> {
        if self.content().is_char_boundary(byte_index) {
            Ok(())
        } else {
            Err(RangeError::OutOfRange {
                index: byte_index,
                length: self.len(),
            })
        }
    }

    /// Gets the [`Location`] of the given byte index.
    ///
    /// The end of the file reports the last line and the column right after its last character.
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: See [`Self::check_index()`].
    pub fn get_location(&self, byte_index: ByteIndex) -> Result<Location, RangeError> {
        self.check_index(byte_index)?;

        // the first entry is always 0, so at least one line start precedes the index
        let line = self
            .line_starts
            .partition_point(|start| *start <= byte_index);
        let line_start = self.line_starts[line - 1];

        let column = self.content()[line_start..byte_index].chars().count() + 1;

        Ok(Location { line, column })
    }

    /// Creates the [`Position`] of the given byte index in this source file.
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: See [`Self::check_index()`].
    pub fn position(self: &Arc<Self>, byte_index: ByteIndex) -> Result<Position, RangeError> {
        Position::new(self.clone(), byte_index)
    }

    /// Creates the [`Span`] from `start` to `end` (exclusive) in this source file.
    ///
    /// # Errors
    /// See [`Span::new()`].
    pub fn span(self: &Arc<Self>, start: ByteIndex, end: ByteIndex) -> Result<Span, RangeError> {
        Span::new(self.clone(), start, end)
    }
}

/// Checks whether the given character terminates a line.
///
/// `\r\n` is a single terminator; [`SourceFile`] accounts for it when indexing lines.
#[must_use]
pub fn is_line_terminator(character: char) -> bool {
    matches!(
        character,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn get_line_starts(text: &str) -> Vec<ByteIndex> {
    let mut results = vec![0];
    let mut iter = text.char_indices().peekable();

    while let Some((byte, character)) = iter.next() {
        if !is_line_terminator(character) {
            continue;
        }

        // crlf
        if character == '\r' && matches!(iter.peek(), Some((_, '\n'))) {
            iter.next();
            results.push(byte + 2);
        } else {
            results.push(byte + character.len_utf8());
        }
    }

    results
}

fn ptr_value(source_file: &Arc<SourceFile>) -> usize { Arc::as_ptr(source_file) as usize }

fn check_same_file(lhs: &Arc<SourceFile>, rhs: &Arc<SourceFile>) -> Result<(), RangeError> {
    if Arc::ptr_eq(lhs, rhs) {
        Ok(())
    } else {
        Err(RangeError::InvalidOperation(
            "the operands belong to different source files",
        ))
    }
}

/// Is a struct pointing to a particular location in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    /// The line number of the location (starts at 1).
    pub line: usize,

    /// The column number of the location (starts at 1).
    pub column: usize,
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents a single byte index within a source file.
#[derive(Clone, Getters, CopyGetters)]
pub struct Position {
    /// Gets the byte index of the position.
    #[get_copy = "pub"]
    index: ByteIndex,

    /// Gets the source file that the position is located in.
    #[get = "pub"]
    source_file: Arc<SourceFile>,
}

impl Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("index", &self.index)
            .field("location", &self.location())
            .finish()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source_file, &other.source_file) && self.index == other.index
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        ptr_value(&self.source_file)
            .cmp(&ptr_value(&other.source_file))
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl std::hash::Hash for Position {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        Arc::as_ptr(&self.source_file).hash(state);
    }
}

impl Position {
    /// Creates the position of `index` in the given source file.
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: See [`SourceFile::check_index()`].
    pub fn new(source_file: Arc<SourceFile>, index: ByteIndex) -> Result<Self, RangeError> {
        source_file.check_index(index)?;
        Ok(Self { index, source_file })
    }

    /// Creates the position right after the last character of the source file.
    #[must_use]
    pub fn end_of(source_file: Arc<SourceFile>) -> Self {
        Self {
            index: source_file.len(),
            source_file,
        }
    }

    /// Gets the line and column of the position.
    #[must_use]
    pub fn location(&self) -> Location {
        self.source_file
            .get_location(self.index)
            .expect("the index was validated on construction")
    }

    /// Gets the line number of the position (starts at 1).
    #[must_use]
    pub fn line(&self) -> usize { self.location().line }

    /// Gets the column number of the position (starts at 1).
    #[must_use]
    pub fn column(&self) -> usize { self.location().column }

    /// Creates the span starting at this position and ending at `end` (exclusive).
    ///
    /// # Errors
    /// - [`RangeError::InvalidOperation`]: The positions belong to different source files or
    ///   `end` precedes `self`.
    pub fn to(&self, end: &Self) -> Result<Span, RangeError> {
        check_same_file(&self.source_file, &end.source_file)?;
        Span::new(self.source_file.clone(), self.index, end.index)
    }
}

/// Represents a half-open range of characters in a source file.
#[derive(Clone, Getters, CopyGetters)]
pub struct Span {
    /// Gets the start byte index of the span.
    #[get_copy = "pub"]
    start: ByteIndex,

    /// Gets the end byte index of the span (exclusive).
    #[get_copy = "pub"]
    end: ByteIndex,

    /// Gets the source file that the span is located in.
    #[get = "pub"]
    source_file: Arc<SourceFile>,
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("content", &self.str())
            .finish()
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source_file, &other.source_file)
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Span {}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        ptr_value(&self.source_file)
            .cmp(&ptr_value(&other.source_file))
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl std::hash::Hash for Span {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        Arc::as_ptr(&self.source_file).hash(state);
    }
}

impl Span {
    /// Creates a span from the given start and end byte indices in the source file.
    ///
    /// # Parameters
    /// - `start`: The start byte index of the span.
    /// - `end`: The end byte index of the span (exclusive).
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: Either index is not a valid position in the source file.
    /// - [`RangeError::InvalidOperation`]: `start` is greater than `end`.
    pub fn new(
        source_file: Arc<SourceFile>,
        start: ByteIndex,
        end: ByteIndex,
    ) -> Result<Self, RangeError> {
        source_file.check_index(start)?;
        source_file.check_index(end)?;

        if start > end {
            return Err(RangeError::InvalidOperation(
                "the start of a span can't be greater than its end",
            ));
        }

        Ok(Self {
            start,
            end,
            source_file,
        })
    }

    /// Creates a span from the given start byte index to the end of the source file.
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: `start` is not a valid position in the source file.
    pub fn to_end(source_file: Arc<SourceFile>, start: ByteIndex) -> Result<Self, RangeError> {
        let end = source_file.len();
        Self::new(source_file, start, end)
    }

    /// Creates the span covering the whole source file.
    #[must_use]
    pub fn whole(source_file: Arc<SourceFile>) -> Self {
        Self {
            start: 0,
            end: source_file.len(),
            source_file,
        }
    }

    /// Creates an empty span located at `index`.
    ///
    /// # Errors
    /// - [`RangeError::OutOfRange`]: `index` is not a valid position in the source file.
    pub fn empty_at(source_file: Arc<SourceFile>, index: ByteIndex) -> Result<Self, RangeError> {
        Self::new(source_file, index, index)
    }

    /// Gets the string slice of the source code that the span represents.
    #[must_use]
    pub fn str(&self) -> &str { &self.source_file.content()[self.start..self.end] }

    /// Gets the length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.end - self.start }

    /// Checks whether the span covers no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.start == self.end }

    /// Gets the starting [`Position`] of the span.
    #[must_use]
    pub fn start_position(&self) -> Position {
        Position {
            index: self.start,
            source_file: self.source_file.clone(),
        }
    }

    /// Gets the ending [`Position`] of the span (exclusive).
    #[must_use]
    pub fn end_position(&self) -> Position {
        Position {
            index: self.end,
            source_file: self.source_file.clone(),
        }
    }

    /// Gets the starting [`Location`] of the span.
    #[must_use]
    pub fn start_location(&self) -> Location { self.start_position().location() }

    /// Gets the ending [`Location`] of the span (exclusive).
    #[must_use]
    pub fn end_location(&self) -> Location { self.end_position().location() }

    /// Checks whether the given position lies within the span.
    ///
    /// # Errors
    /// - [`RangeError::InvalidOperation`]: The position belongs to another source file.
    pub fn contains(&self, position: &Position) -> Result<bool, RangeError> {
        check_same_file(&self.source_file, &position.source_file)?;
        Ok((self.start..self.end).contains(&position.index))
    }

    /// Returns this span widened so that it ends at `new_end`.
    ///
    /// # Errors
    /// - [`RangeError::InvalidOperation`]: `new_end` is before the current end.
    /// - [`RangeError::OutOfRange`]: `new_end` is not a valid position in the source file.
    pub fn extended_up_to(&self, new_end: ByteIndex) -> Result<Self, RangeError> {
        if new_end < self.end {
            return Err(RangeError::InvalidOperation("a span can't be shrunk"));
        }

        Self::new(self.source_file.clone(), self.start, new_end)
    }

    /// Returns the smallest span covering both this span and `other`.
    ///
    /// # Errors
    /// - [`RangeError::InvalidOperation`]: The spans belong to different source files.
    pub fn extended_to_cover(&self, other: &Self) -> Result<Self, RangeError> {
        check_same_file(&self.source_file, &other.source_file)?;

        Ok(Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            source_file: self.source_file.clone(),
        })
    }
}

/// Represents an element that is located within a source file.
pub trait SourceElement {
    /// Gets the span location of the element.
    fn span(&self) -> Span;
}

impl<T: SourceElement> SourceElement for Box<T> {
    fn span(&self) -> Span { self.as_ref().span() }
}

#[cfg(test)]
mod tests;
