use super::{Message, Severity, SourceCodeDisplay};
use crate::source_file::SourceFile;

/// Removes the ANSI escape sequences so that the layout can be compared.
fn strip_ansi(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars();

    while let Some(character) = chars.next() {
        if character == '\x1B' {
            // skips until the terminating `m` of the escape sequence
            for character in chars.by_ref() {
                if character == 'm' {
                    break;
                }
            }
        } else {
            result.push(character);
        }
    }

    result
}

#[test]
fn message_has_severity_header() {
    let error = strip_ansi(&Message::new(Severity::Error, "oops").to_string());
    let warning = strip_ansi(&Message::new(Severity::Warning, 42).to_string());

    assert_eq!(error, "[error]: oops");
    assert_eq!(warning, "[warning]: 42");
}

#[test]
fn single_line_span_is_marked() {
    let source_file = SourceFile::synthesized("var a = 1;\nvar b = $;\nprint b;");
    let span = source_file.span(19, 20).unwrap();

    let rendered = strip_ansi(&SourceCodeDisplay::new(&span, Some("remove this")).to_string());
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines[0],
        format!(" --> {}:2:9", source_file.origin())
    );
    assert_eq!(lines[2], "1 ┃ var a = 1;");
    assert_eq!(lines[3], "2 ┃ var b = $;");
    assert_eq!(lines[4], "  ┃         ^ help: remove this");
    assert_eq!(lines[5], "3 ┃ print b;");
    assert_eq!(lines.len(), 7);
}

#[test]
fn multi_line_span_puts_help_at_the_end() {
    let source_file = SourceFile::synthesized("a\n\"b\nc\nd");
    let span = source_file.span(2, 7).unwrap();

    let rendered = strip_ansi(&SourceCodeDisplay::new(&span, Some("close it")).to_string());
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[2], "1 ┃ a");
    assert_eq!(lines[3], "2 ┃ \"b");
    assert_eq!(lines[4], "3 ┃ c");
    assert_eq!(lines[5], "4 ┃ d");
    assert!(!rendered.contains('^'));
    assert_eq!(lines.last().copied(), Some("  = help: close it"));
}
