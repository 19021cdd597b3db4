//! Threshold condition parsing and evaluation

use std::fmt;
use std::str::FromStr;

/// Comparison operator for threshold conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    Equal,
    NotEqual,
}

impl FromStr for CompareOp {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Self::GreaterThan),
            "<" => Ok(Self::LessThan),
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            _ => Err(ConditionError::UnknownOperator(s.to_string())),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GreaterThan => write!(f, ">"),
            Self::LessThan => write!(f, "<"),
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
        }
    }
}

impl CompareOp {
    /// Check a sample value against a limit
    ///
    /// Equality and inequality are exact IEEE-754 comparisons. Conditions
    /// comparing backend-computed ratios with `==` are sensitive to
    /// rounding; callers that need tolerance should express it in the
    /// query instead.
    pub fn check(&self, value: f64, limit: f64) -> bool {
        match self {
            Self::GreaterThan => value > limit,
            Self::LessThan => value < limit,
            Self::Equal => value == limit,
            Self::NotEqual => value != limit,
        }
    }
}

/// A parsed threshold condition: operator, limit, optional trailing comment
///
/// The wire form is `"<op> <number> [comment]"`, e.g. `"> 1500 p95 latency"`.
/// The comment carries no semantics and is kept only for operators reading
/// the definition back.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub op: CompareOp,
    pub limit: f64,
    pub comment: Option<String>,
}

impl Condition {
    /// Parse the `"<op> <number> [comment]"` wire form
    pub fn parse(raw: &str) -> Result<Self, ConditionError> {
        let mut parts = raw.split_whitespace();

        let op = parts.next().ok_or(ConditionError::Empty)?.parse()?;

        let limit_str = parts.next().ok_or(ConditionError::MissingLimit)?;
        let limit: f64 = limit_str
            .parse()
            .map_err(|_| ConditionError::InvalidLimit(limit_str.to_string()))?;

        let comment: Vec<&str> = parts.collect();
        let comment = if comment.is_empty() {
            None
        } else {
            Some(comment.join(" "))
        };

        Ok(Self { op, limit, comment })
    }

    /// Whether `value` satisfies this condition
    pub fn holds(&self, value: f64) -> bool {
        self.op.check(value, self.limit)
    }

    /// Render the comparison that matched, e.g. `"1600 > 1500"`
    pub fn describe(&self, value: f64) -> String {
        format!("{} {} {}", value, self.op, self.limit)
    }
}

/// Condition parse errors
#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    #[error("Empty condition")]
    Empty,

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Missing limit value")]
    MissingLimit,

    #[error("Invalid limit value: {0}")]
    InvalidLimit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let cond = Condition::parse("> 1500").unwrap();
        assert_eq!(cond.op, CompareOp::GreaterThan);
        assert_eq!(cond.limit, 1500.0);
        assert_eq!(cond.comment, None);
    }

    #[test]
    fn test_parse_with_comment() {
        let cond = Condition::parse("< 0.5 ratio of failed requests").unwrap();
        assert_eq!(cond.op, CompareOp::LessThan);
        assert_eq!(cond.limit, 0.5);
        assert_eq!(cond.comment.as_deref(), Some("ratio of failed requests"));
    }

    #[test]
    fn test_parse_extra_whitespace() {
        let cond = Condition::parse("  ==   3   spaced   out  ").unwrap();
        assert_eq!(cond.op, CompareOp::Equal);
        assert_eq!(cond.limit, 3.0);
        assert_eq!(cond.comment.as_deref(), Some("spaced out"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Condition::parse(""),
            Err(ConditionError::Empty)
        ));
        assert!(matches!(
            Condition::parse("   "),
            Err(ConditionError::Empty)
        ));
        assert!(matches!(
            Condition::parse(">= 5"),
            Err(ConditionError::UnknownOperator(_))
        ));
        assert!(matches!(
            Condition::parse(">"),
            Err(ConditionError::MissingLimit)
        ));
        assert!(matches!(
            Condition::parse("> high"),
            Err(ConditionError::InvalidLimit(_))
        ));
    }

    #[test]
    fn test_holds() {
        let gt = Condition::parse("> 10").unwrap();
        assert!(gt.holds(10.1));
        assert!(!gt.holds(10.0));

        let lt = Condition::parse("< 10").unwrap();
        assert!(lt.holds(9.9));
        assert!(!lt.holds(10.0));

        let eq = Condition::parse("== 0").unwrap();
        assert!(eq.holds(0.0));
        assert!(!eq.holds(0.0000001));

        let ne = Condition::parse("!= 1").unwrap();
        assert!(ne.holds(2.0));
        assert!(!ne.holds(1.0));
    }

    #[test]
    fn test_describe() {
        let cond = Condition::parse("> 1500").unwrap();
        assert_eq!(cond.describe(1600.0), "1600 > 1500");
    }

    #[test]
    fn test_negative_limit() {
        let cond = Condition::parse("< -2.5").unwrap();
        assert_eq!(cond.limit, -2.5);
        assert!(cond.holds(-3.0));
    }
}
