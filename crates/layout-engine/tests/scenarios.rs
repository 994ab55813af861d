//! Integration scenarios covering concrete metadata/directive layout
//! examples. Since there is no syntax-tree visitor in this crate, each
//! test drives the [`Formatter`] directly with the same event sequence
//! a metadata-then-directive visitor would produce, rather than
//! parsing source text.

use layout_engine::{Config, DoubleNewline, Formatter, VisitorSink};

fn fmt(page_width: usize) -> Formatter {
    Formatter::new(Config::new(page_width, 0, true))
}

#[test]
fn metadata_before_a_directive_gets_its_own_line() {
    let mut f = fmt(80);
    f.write("@deprecated").unwrap();
    f.block_split(false, DoubleNewline::Single).unwrap();
    f.write("library foo;").unwrap();
    let result = f.end().unwrap();
    assert_eq!(result.text, "@deprecated\nlibrary foo;\n");
}

#[test]
fn multiple_top_level_annotations_each_get_their_own_line() {
    let mut f = fmt(80);
    f.write("@a").unwrap();
    f.block_split(false, DoubleNewline::Single).unwrap();
    f.write("@b").unwrap();
    f.block_split(false, DoubleNewline::Single).unwrap();
    f.write("class A {}").unwrap();
    let result = f.end().unwrap();
    assert_eq!(result.text, "@a\n@b\nclass A {}\n");
}

#[test]
fn metadata_separated_by_source_blank_lines_still_collapses_to_one_line_each() {
    // The source had blank lines between @a/@b/@c; the metadata rule
    // never asks for a blank line between annotations, so they
    // collapse regardless of what the source did.
    let mut f = fmt(80);
    for tag in ["@a", "@b", "@c"] {
        f.write(tag).unwrap();
        f.block_split(false, DoubleNewline::Single).unwrap();
    }
    f.write("class A {}").unwrap();
    let result = f.end().unwrap();
    assert_eq!(result.text, "@a\n@b\n@c\nclass A {}\n");
}

#[test]
fn parameter_annotations_stay_inline_when_written_without_a_split() {
    let mut f = fmt(80);
    f.write("foo(").unwrap();
    f.write("@a").unwrap();
    f.write_whitespace(layout_engine::PendingWhitespace::Space);
    f.write("@b").unwrap();
    f.write_whitespace(layout_engine::PendingWhitespace::Space);
    f.write("param) {}").unwrap();
    let result = f.end().unwrap();
    assert_eq!(result.text, "foo(@a @b param) {}\n");
}

#[test]
fn blank_line_bound_never_exceeds_two_consecutive_newlines() {
    let mut f = fmt(80);
    f.write("a;").unwrap();
    f.block_split(false, DoubleNewline::Double).unwrap();
    f.write("b;").unwrap();
    let result = f.end().unwrap();
    assert!(!result.text.contains("\n\n\n"));
    assert_eq!(result.text, "a;\n\nb;\n");
}

#[test]
fn overflowing_call_wraps_its_argument_list() {
    let mut f = fmt(40);
    let rule = f.add_rule(Box::new(layout_engine::SimpleRule::new(1)));
    f.start_rule(Some(rule));
    f.write("withReturnType(").unwrap();
    f.indent(None);
    f.split(false, DoubleNewline::Single, false).unwrap();
    f.write(&"x".repeat(40)).unwrap();
    f.unindent();
    f.split(false, DoubleNewline::Single, false).unwrap();
    f.write(")").unwrap();
    f.end_rule();
    let result = f.end().unwrap();
    assert!(result.text.contains('\n'));
    assert!(result.text.len() > 40);
}
