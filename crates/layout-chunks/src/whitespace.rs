//! Pending whitespace states.
//!
//! Maintained by the builder between tokens. The last two variants are
//! *ambiguous* and must be resolved via [`PendingWhitespace::resolve`]
//! (the builder's `preserve_newlines(n)`) before they can be emitted;
//! attempting to flush one unresolved is a programmer error.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingWhitespace {
    None,
    Space,
    Newline,
    NestedNewline,
    NewlineFlushLeft,
    TwoNewlines,
    SpaceOrNewline,
    OneOrTwoNewlines,
}

impl Default for PendingWhitespace {
    fn default() -> Self {
        PendingWhitespace::None
    }
}

impl PendingWhitespace {
    pub fn is_ambiguous(self) -> bool {
        matches!(
            self,
            PendingWhitespace::SpaceOrNewline | PendingWhitespace::OneOrTwoNewlines
        )
    }

    /// Resolve an ambiguous pending whitespace given `n` observed
    /// source newlines. Returns `self` unchanged when it isn't
    /// ambiguous - resolving is then a no-op, not an error, since
    /// `preserve_newlines` is called unconditionally at several points
    /// in the comment algorithm regardless of whether anything is
    /// pending.
    pub fn resolve(self, n: usize) -> PendingWhitespace {
        match self {
            PendingWhitespace::SpaceOrNewline => {
                if n > 0 {
                    PendingWhitespace::Newline
                } else {
                    PendingWhitespace::Space
                }
            }
            PendingWhitespace::OneOrTwoNewlines => {
                if n > 1 {
                    PendingWhitespace::TwoNewlines
                } else {
                    PendingWhitespace::Newline
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_space_or_newline() {
        assert_eq!(
            PendingWhitespace::SpaceOrNewline.resolve(0),
            PendingWhitespace::Space
        );
        assert_eq!(
            PendingWhitespace::SpaceOrNewline.resolve(2),
            PendingWhitespace::Newline
        );
    }

    #[test]
    fn resolves_one_or_two_newlines() {
        assert_eq!(
            PendingWhitespace::OneOrTwoNewlines.resolve(1),
            PendingWhitespace::Newline
        );
        assert_eq!(
            PendingWhitespace::OneOrTwoNewlines.resolve(2),
            PendingWhitespace::TwoNewlines
        );
    }

    #[test]
    fn non_ambiguous_values_pass_through() {
        assert_eq!(PendingWhitespace::Space.resolve(5), PendingWhitespace::Space);
    }
}
