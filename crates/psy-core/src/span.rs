use serde::{Deserialize, Serialize};

/// Source position of a node: byte offsets plus the lines it starts and ends on.
///
/// Lines are 1-based. A span with `start_line == 0` is null; synthetic nodes copy the
/// span of the node they replace instead of using a null span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub lo: u32,
    pub hi: u32,
    pub start_line: u32,
    pub end_line: u32,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Span({}-{}@{}:{})",
            self.lo, self.hi, self.start_line, self.end_line
        )
    }
}

impl Span {
    pub fn new(lo: u32, hi: u32, start_line: u32, end_line: u32) -> Span {
        Span {
            lo,
            hi,
            start_line,
            end_line,
        }
    }

    pub fn null() -> Span {
        Span::default()
    }

    pub fn is_null(&self) -> bool {
        self.start_line == 0
    }

    pub fn line(&self) -> u32 {
        self.start_line
    }

    /// Smallest span covering both. Null spans are ignored.
    pub fn union(self, other: Span) -> Span {
        if self.is_null() {
            return other;
        }
        if other.is_null() {
            return self;
        }
        Span {
            lo: self.lo.min(other.lo),
            hi: self.hi.max(other.hi),
            start_line: self.start_line.min(other.start_line),
            end_line: self.end_line.max(other.end_line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_ignores_null() {
        let a = Span::new(4, 9, 2, 2);
        assert_eq!(a.union(Span::null()), a);
        assert_eq!(Span::null().union(a), a);
        assert_eq!(a.union(Span::new(0, 3, 1, 1)), Span::new(0, 9, 1, 2));
    }
}
