use std::io::Write;

use proptest::{prop_assert, prop_assert_eq, proptest};

use super::{Location, Origin, Position, RangeError, SourceFile, Span};

const FOUR_LINES: &str = "hello\nabc\n23\n3";

#[test]
fn test_get_line_starts() {
    let text = "Hello\nworld\r\n!\rtes";
    let line_starts = super::get_line_starts(text);
    assert_eq!(line_starts, vec![0, 6, 13, 15]);
}

#[test]
fn test_get_line_starts_unicode_terminators() {
    let text = "a\u{2028}b\u{85}c";
    let line_starts = super::get_line_starts(text);
    assert_eq!(line_starts, vec![0, 4, 7]);
}

#[test]
fn test_trailing_terminator_opens_empty_line() {
    let source_file = SourceFile::synthesized("a\n");
    assert_eq!(source_file.line_count(), 2);
    assert_eq!(source_file.get_line(2), Some(""));
    assert_eq!(
        source_file.get_location(2).unwrap(),
        Location { line: 2, column: 1 }
    );
}

#[test]
fn test_line_count() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    assert_eq!(source_file.line_count(), 4);
    assert_eq!(SourceFile::synthesized("").line_count(), 1);
}

#[test]
fn test_get_line() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    assert_eq!(source_file.get_line(0), None);
    assert_eq!(source_file.get_line(1), Some("hello\n"));
    assert_eq!(source_file.get_line(3), Some("23\n"));
    assert_eq!(source_file.get_line(4), Some("3"));
    assert_eq!(source_file.get_line(5), None);
}

#[test]
fn test_get_location() {
    let source_file = SourceFile::synthesized(FOUR_LINES);

    let cases = [
        (0, 1, 1),
        (6, 2, 1),
        (10, 3, 1),
        (11, 3, 2),
        (13, 4, 1),
        // end of file
        (14, 4, 2),
    ];

    for (index, line, column) in cases {
        assert_eq!(
            source_file.get_location(index).unwrap(),
            Location { line, column },
            "byte index {index}"
        );
    }
}

#[test]
fn test_get_location_counts_characters() {
    let source_file = SourceFile::synthesized("x\nñé=1");
    // `=` is preceded by two 2-byte characters
    assert_eq!(
        source_file.get_location(6).unwrap(),
        Location { line: 2, column: 3 }
    );
}

#[test]
fn test_get_location_out_of_range() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    assert_eq!(
        source_file.get_location(15),
        Err(RangeError::OutOfRange {
            index: 15,
            length: 14
        })
    );

    let source_file = SourceFile::synthesized("ñ");
    assert!(source_file.get_location(1).is_err());
}

#[test]
fn test_synthesized_origin() {
    let first = SourceFile::synthesized("a");
    let second = SourceFile::synthesized("a");

    assert!(first.origin().is_synthesized());
    assert_ne!(first.origin(), second.origin());
    assert!(first.origin().to_string().starts_with("synthesized://"));
    assert!(first
        .origin()
        .to_string()
        .ends_with(&first.origin().base_name()));
}

#[test]
fn test_mapped_file() {
    const TEST_FILE: &str = "test file\nsecond line";

    let mut tempfile = tempfile::Builder::new()
        .prefix("lox")
        .suffix(".lox")
        .tempfile()
        .unwrap();
    write!(tempfile.as_file_mut(), "{TEST_FILE}").unwrap();

    let source_file = SourceFile::load(tempfile.path()).unwrap();
    assert_eq!(source_file.content(), TEST_FILE);
    assert_eq!(source_file.line_count(), 2);
    assert_eq!(
        source_file.origin(),
        &Origin::File(tempfile.path().to_owned())
    );
    assert!(source_file.origin().base_name().starts_with("lox"));
}

#[test]
fn test_empty_mapped_file() {
    let tempfile = tempfile::NamedTempFile::new().unwrap();
    let source_file = SourceFile::load(tempfile.path()).unwrap();
    assert!(source_file.is_empty());
    assert_eq!(source_file.line_count(), 1);
}

#[test]
fn test_load_invalid_utf8() {
    let mut tempfile = tempfile::NamedTempFile::new().unwrap();
    tempfile.as_file_mut().write_all(&[0x61, 0xFF, 0xFE]).unwrap();

    assert!(matches!(
        SourceFile::load(tempfile.path()),
        Err(super::Error::Utf8Error(..))
    ));
}

#[test]
fn test_load_missing_file() {
    let directory = tempfile::tempdir().unwrap();
    assert!(matches!(
        SourceFile::load(directory.path().join("missing.lox")),
        Err(super::Error::IoError(..))
    ));
}

#[test]
fn test_span_text_and_locations() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    let span = source_file.span(6, 12).unwrap();

    assert_eq!(span.str(), "abc\n23");
    assert_eq!(span.len(), 6);
    assert_eq!(span.start_location(), Location { line: 2, column: 1 });
    assert_eq!(span.end_location(), Location { line: 3, column: 3 });
}

#[test]
fn test_span_validation() {
    let source_file = SourceFile::synthesized(FOUR_LINES);

    assert!(matches!(
        source_file.span(3, 2),
        Err(RangeError::InvalidOperation(..))
    ));
    assert!(matches!(
        source_file.span(0, 15),
        Err(RangeError::OutOfRange { .. })
    ));
    assert!(Span::to_end(source_file.clone(), 14).unwrap().is_empty());
    assert_eq!(Span::whole(source_file).str(), FOUR_LINES);
}

#[test]
fn test_extended_up_to() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    let span = Span::empty_at(source_file, 6).unwrap();

    let extended = span.extended_up_to(9).unwrap();
    assert_eq!(extended.str(), "abc");

    assert!(matches!(
        extended.extended_up_to(8),
        Err(RangeError::InvalidOperation(..))
    ));
    assert!(matches!(
        extended.extended_up_to(100),
        Err(RangeError::OutOfRange { .. })
    ));
}

#[test]
fn test_extended_to_cover() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    let hello = source_file.span(0, 5).unwrap();
    let abc = source_file.span(6, 9).unwrap();

    assert_eq!(hello.extended_to_cover(&abc).unwrap().str(), "hello\nabc");
    assert_eq!(abc.extended_to_cover(&hello).unwrap().str(), "hello\nabc");

    let other = SourceFile::synthesized(FOUR_LINES);
    let foreign = other.span(0, 5).unwrap();
    assert!(matches!(
        hello.extended_to_cover(&foreign),
        Err(RangeError::InvalidOperation(..))
    ));
    assert_ne!(hello, foreign);
}

#[test]
fn test_position() {
    let source_file = SourceFile::synthesized(FOUR_LINES);
    let start = source_file.position(10).unwrap();
    let end = Position::end_of(source_file.clone());

    assert_eq!(start.line(), 3);
    assert_eq!(start.column(), 1);
    assert_eq!(end.location(), Location { line: 4, column: 2 });
    assert_eq!(start.to(&end).unwrap().str(), "23\n3");
    assert!(end.to(&start).is_err());

    let span = source_file.span(6, 9).unwrap();
    assert!(span.contains(&source_file.position(8).unwrap()).unwrap());
    assert!(!span.contains(&source_file.position(9).unwrap()).unwrap());

    let other = SourceFile::synthesized(FOUR_LINES);
    assert!(span.contains(&other.position(8).unwrap()).is_err());
    assert!(source_file.position(15).is_err());
}

proptest! {
    #[test]
    fn line_lookup_agrees_with_linear_scan(text in "[a-c\\n\\r]{0,64}", index in 0usize..65) {
        let source_file = SourceFile::synthesized(text.clone());
        let index = index.min(text.len());

        let location = source_file.get_location(index).unwrap();

        // counts the lines started before `index` by walking the text
        let mut line = 1;
        let mut line_start = 0;
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < index {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    if i + 2 <= index {
                        line += 1;
                        line_start = i + 2;
                    }
                    i += 2;
                    continue;
                }
                b'\n' | b'\r' => {
                    line += 1;
                    line_start = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        prop_assert_eq!(location.line, line);
        prop_assert_eq!(location.column, index - line_start + 1);
        prop_assert!(location.line <= source_file.line_count());
    }
}
