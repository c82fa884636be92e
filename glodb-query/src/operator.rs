use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::errors::{QueryError, Result};

/// Code the query grammar uses for a node that has no operator.
pub const NO_OPERATOR_CODE: i32 = -1;
/// Code reserved for the coordinate-level spacing join, which is not supported.
pub const BPOS_CODE: i32 = 10;

///
/// The operators that combine an accumulated track with the next operand.
///
/// The first node of an expression has no operator; that is modelled as
/// `Option<Operator>` on the node rather than as a variant here.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Spacing join
    Pos,
    /// Overlap join
    And,
    /// Union
    Or,
    /// Intervals with no overlap on the right
    Minus,
    /// Exact matches
    SAnd,
    /// Intervals without an exact match on the right
    SMinus,
    /// Coordinate-level intersection
    BAnd,
    /// Coordinate-level union
    BOr,
    /// Coordinate-level difference
    BMinus,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Pos,
        Operator::And,
        Operator::Or,
        Operator::Minus,
        Operator::SAnd,
        Operator::SMinus,
        Operator::BAnd,
        Operator::BOr,
        Operator::BMinus,
    ];

    /// Stable numeric code of the operator.
    pub fn code(&self) -> i32 {
        match self {
            Operator::Pos => 0,
            Operator::And => 1,
            Operator::Or => 2,
            Operator::Minus => 3,
            Operator::SAnd => 4,
            Operator::SMinus => 5,
            Operator::BAnd => 11,
            Operator::BOr => 12,
            Operator::BMinus => 13,
        }
    }

    ///
    /// Map a numeric code back to its operator.
    ///
    /// # Errors
    /// - `-1` has no operator: [QueryError::MissingOperator]
    /// - `10` (bPOS): [QueryError::UnsupportedOperator]
    /// - anything else unknown: [QueryError::UnknownOperatorCode]
    pub fn from_code(code: i32) -> Result<Operator> {
        match code {
            NO_OPERATOR_CODE => Err(QueryError::MissingOperator { position: 0 }),
            BPOS_CODE => Err(QueryError::UnsupportedOperator("bPOS".to_string())),
            _ => Operator::ALL
                .into_iter()
                .find(|op| op.code() == code)
                .ok_or(QueryError::UnknownOperatorCode(code)),
        }
    }

    /// The keyword form, e.g. `sAND`.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Pos => "POS",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Minus => "MINUS",
            Operator::SAnd => "sAND",
            Operator::SMinus => "sMINUS",
            Operator::BAnd => "bAND",
            Operator::BOr => "bOR",
            Operator::BMinus => "bMINUS",
        }
    }

    /// The symbol form used in query strings.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Pos => "POS",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Minus => "MINUS",
            Operator::SAnd => "sAND",
            Operator::SMinus => "sMINUS",
            Operator::BAnd => "&&",
            Operator::BOr => "||",
            Operator::BMinus => "-",
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim() {
            "POS" | "pos" => Operator::Pos,
            "AND" | "and" => Operator::And,
            "OR" | "or" => Operator::Or,
            "MINUS" | "minus" => Operator::Minus,
            "sAND" | "sand" => Operator::SAnd,
            "sMINUS" | "sminus" => Operator::SMinus,
            "&&" | "bAND" | "band" => Operator::BAnd,
            "||" | "bOR" | "bor" => Operator::BOr,
            "-" | "bMINUS" | "bminus" => Operator::BMinus,
            "." | "bPOS" | "bpos" => {
                return Err(QueryError::UnsupportedOperator("bPOS".to_string()));
            }
            other => return Err(QueryError::UnknownOperator(other.to_string())),
        };
        Ok(op)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
