//! Relational operators and three-way comparison results.
//!
//! Handles support equality by identity only. Ordering is answered with
//! [`Comparison::Unsupported`] so callers can tell "incomparable" apart from
//! "false".

use std::fmt;

/// A relational operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    pub const ALL: [RelOp; 4] = [RelOp::Lt, RelOp::Le, RelOp::Gt, RelOp::Ge];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a three-way comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
    /// The operands have no ordering.
    Unsupported,
}

impl Comparison {
    /// Apply `op` to this outcome. `None` when the operands are unordered.
    pub fn evaluate(self, op: RelOp) -> Option<bool> {
        let ordering = match self {
            Comparison::Less => std::cmp::Ordering::Less,
            Comparison::Equal => std::cmp::Ordering::Equal,
            Comparison::Greater => std::cmp::Ordering::Greater,
            Comparison::Unsupported => return None,
        };
        Some(match op {
            RelOp::Lt => ordering.is_lt(),
            RelOp::Le => ordering.is_le(),
            RelOp::Gt => ordering.is_gt(),
            RelOp::Ge => ordering.is_ge(),
        })
    }

    pub fn is_supported(self) -> bool {
        self != Comparison::Unsupported
    }
}

impl From<std::cmp::Ordering> for Comparison {
    fn from(ordering: std::cmp::Ordering) -> Self {
        match ordering {
            std::cmp::Ordering::Less => Comparison::Less,
            std::cmp::Ordering::Equal => Comparison::Equal,
            std::cmp::Ordering::Greater => Comparison::Greater,
        }
    }
}
