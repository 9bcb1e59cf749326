use serde::Serialize;

use super::types::FilterOp;
use crate::error::FilterError;

/// Column every row-isolated table carries with the creating user's id.
pub const OWNERSHIP_FIELD: &str = "created_by";

/// Row constraint the proxy appends for non-admin callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDirective {
    pub field: String,
    pub op: FilterOp,
    pub value: String,
}

impl FilterDirective {
    pub fn owned_by(subject: &str) -> Self {
        Self {
            field: OWNERSHIP_FIELD.to_string(),
            op: FilterOp::Eq,
            value: subject.to_string(),
        }
    }

    /// `(created_by,eq,user-001)`
    pub fn to_where_clause(&self) -> String {
        format!("({},{},{})", self.field, self.op.as_str(), self.value)
    }

    /// Combines with a caller-supplied `where` so it can only narrow the result set.
    ///
    /// The caller clause is nested one level deep; it must not close that
    /// group early, or its own `~or` would sit beside the ownership clause.
    pub fn merge_where(&self, existing: Option<&str>) -> Result<String, FilterError> {
        match existing.map(str::trim).filter(|w| !w.is_empty()) {
            Some(caller) => {
                check_nesting(caller)?;
                Ok(format!("{}~and({})", self.to_where_clause(), caller))
            }
            None => Ok(self.to_where_clause()),
        }
    }
}

/// Parentheses must balance and the depth may never go negative.
pub fn check_nesting(clause: &str) -> Result<(), FilterError> {
    let mut depth: usize = 0;
    for ch in clause.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FilterError::UnbalancedWhere(clause.to_string()))?;
            }
            _ => {}
        }
    }

    if depth == 0 {
        Ok(())
    } else {
        Err(FilterError::UnbalancedWhere(clause.to_string()))
    }
}
