//! A tiny scripted event format standing in for a real syntax-tree
//! visitor. Each non-blank, non-`#`-comment line is one call against
//! the builder's operation table, so a `.layout-script` file can be
//! hand-authored to exercise the engine without a parser.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Context, Result};
use layout_chunks::{DoubleNewline, PendingWhitespace, SourceComment};
use layout_engine::{
    AssignmentRule, CombinatorRule, Formatter, HardRule, NamedRule, PositionalRule, RuleId, SimpleRule,
    VisitorSink,
};

fn split_first(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim_start()),
        None => (line, ""),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

fn parse_bool(token: &str) -> Result<bool> {
    match token {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("expected true/false, got {other:?}"),
    }
}

fn parse_double(token: &str) -> Result<DoubleNewline> {
    match token {
        "single" => Ok(DoubleNewline::Single),
        "double" => Ok(DoubleNewline::Double),
        "unknown" => Ok(DoubleNewline::Unknown),
        other => bail!("expected single/double/unknown, got {other:?}"),
    }
}

fn parse_whitespace(token: &str) -> Result<PendingWhitespace> {
    Ok(match token {
        "space" => PendingWhitespace::Space,
        "newline" => PendingWhitespace::Newline,
        "nested_newline" => PendingWhitespace::NestedNewline,
        "flush_left" => PendingWhitespace::NewlineFlushLeft,
        "two_newlines" => PendingWhitespace::TwoNewlines,
        "space_or_newline" => PendingWhitespace::SpaceOrNewline,
        "one_or_two_newlines" => PendingWhitespace::OneOrTwoNewlines,
        other => bail!("unknown whitespace kind {other:?}"),
    })
}

fn build_rule(kind: &str, cost: Option<i32>) -> Result<Box<dyn layout_engine::RuleBehavior>> {
    Ok(match kind {
        "hard" => Box::new(HardRule),
        "simple" => Box::new(SimpleRule::new(cost.unwrap_or(0))),
        "positional" => Box::new(PositionalRule::new(cost.unwrap_or(1))),
        "named" => Box::new(NamedRule::new(cost.unwrap_or(0))),
        "combinator" => Box::new(CombinatorRule::new(cost.unwrap_or(0))),
        "assignment" => Box::new(AssignmentRule::new(cost.unwrap_or(0))),
        other => bail!("unknown rule kind {other:?} (expected hard/simple/positional/named/combinator/assignment)"),
    })
}

/// Named-rule registry kept by the interpreter across lines, since the
/// script refers to rules by name rather than by the opaque
/// [`RuleId`] handle a real visitor would hold onto directly.
#[derive(Default)]
struct Rules {
    by_name: HashMap<String, RuleId>,
}

impl Rules {
    fn resolve(&self, name: &str) -> Result<RuleId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("undefined rule {name:?}; declare it with `rule {name} <kind>` first"))
    }
}

pub fn run(source: &str, formatter: &mut Formatter) -> Result<()> {
    let mut rules = Rules::default();

    for (lineno, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        run_line(line, formatter, &mut rules)
            .with_context(|| format!("layout-script line {}: {raw_line:?}", lineno + 1))?;
    }
    Ok(())
}

fn run_line(line: &str, f: &mut Formatter, rules: &mut Rules) -> Result<()> {
    let (cmd, rest) = split_first(line);
    match cmd {
        "rule" => {
            let (name, rest) = split_first(rest);
            let (kind, rest) = split_first(rest);
            let cost = if rest.is_empty() {
                None
            } else {
                Some(rest.parse::<i32>().context("rule cost must be an integer")?)
            };
            let id = f.add_rule(build_rule(kind, cost)?);
            rules.by_name.insert(name.to_string(), id);
        }
        "write" => {
            f.write(&unescape(rest))?;
        }
        "ws" => {
            f.write_whitespace(parse_whitespace(rest.trim())?);
        }
        "split" => {
            let (space, rest) = split_first(rest);
            let (double, rest) = split_first(rest);
            let flush = rest.trim();
            f.split(
                parse_bool(space)?,
                parse_double(double)?,
                if flush.is_empty() { false } else { parse_bool(flush)? },
            )?;
        }
        "block_split" => {
            let (space, double) = split_first(rest);
            f.block_split(parse_bool(space)?, parse_double(double.trim())?)?;
        }
        "preserve" => {
            f.preserve_newlines(rest.trim().parse().context("preserve expects a newline count")?);
        }
        "indent" => {
            let amt = rest.trim();
            f.indent(if amt.is_empty() { None } else { Some(amt.parse()?) });
        }
        "unindent" => f.unindent(),
        "nest" => {
            let (amt, now) = split_first(rest);
            let amount = if amt.is_empty() { None } else { Some(amt.parse()?) };
            f.nest_expression(amount, now.trim() == "now");
        }
        "unnest" => f.unnest(),
        "start_rule" => {
            let name = rest.trim();
            let id = if name.is_empty() { None } else { Some(rules.resolve(name)?) };
            f.start_rule(id);
        }
        "end_rule" => f.end_rule(),
        "start_lazy_rule" => {
            let name = rest.trim();
            let id = if name.is_empty() { None } else { Some(rules.resolve(name)?) };
            f.start_lazy_rule(id);
        }
        "force_rules" => f.force_rules(),
        "start_span" => {
            let cost = rest.trim();
            f.start_span(if cost.is_empty() { None } else { Some(cost.parse()?) });
        }
        "end_span" => f.end_span(),
        "start_block_arg_nesting" => f.start_block_argument_nesting(),
        "end_block_arg_nesting" => f.end_block_argument_nesting(),
        "start_block" => {
            let name = rest.trim();
            let id = if name.is_empty() { None } else { Some(rules.resolve(name)?) };
            f.start_block(id);
        }
        "end_block" => {
            let force = rest.trim();
            f.end_block(None, if force.is_empty() { false } else { parse_bool(force)? });
        }
        "select_start" => {
            f.start_selection_from_end(rest.trim().parse()?);
        }
        "select_end" => {
            f.end_selection_from_end(rest.trim().parse()?);
        }
        "comment_line" | "comment_block" => {
            let (lines_before, text) = split_first(rest);
            let lines_before: usize = lines_before.parse().context("comment lines_before must be a number")?;
            let comment = if cmd == "comment_line" {
                SourceComment::line(unescape(text), lines_before)
            } else {
                SourceComment::block(unescape(text), lines_before)
            };
            f.write_comments(vec![comment], lines_before, "")?;
        }
        other => bail!("unknown layout-script command {other:?}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout_engine::Config;

    #[test]
    fn minimal_script_renders_expected_text() {
        let script = "write foo(\nsplit false single false\nwrite a, b\nsplit false single false\nwrite )\n";
        let mut f = Formatter::new(Config::new(80, 0, true));
        run(script, &mut f).unwrap();
        let result = f.end().unwrap();
        assert_eq!(result.text, "foo(a, b)\n");
    }

    #[test]
    fn named_rule_persists_across_lines() {
        let script = "rule r positional 1\nstart_rule r\nwrite call(\nindent\nsplit false single false\nwrite a\nunindent\nsplit false single false\nwrite )\nend_rule\n";
        let mut f = Formatter::new(Config::new(80, 0, true));
        run(script, &mut f).unwrap();
        let result = f.end().unwrap();
        assert_eq!(result.text, "call(a)\n");
    }

    #[test]
    fn unknown_command_is_a_reportable_error() {
        let mut f = Formatter::new(Config::new(80, 0, true));
        let err = run("bogus_command\n", &mut f).unwrap_err();
        assert!(err.to_string().contains("layout-script line 1"));
    }
}
