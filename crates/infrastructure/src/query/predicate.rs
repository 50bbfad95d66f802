//! Filter expressions that translate into SQL conditions.
//!
//! A `Predicate` names fields by their column name and only uses operators
//! the store can evaluate, so every well-formed predicate can be pushed down
//! into the query. Field names are resolved when the predicate is translated
//! for a concrete entity.

use std::ops::Not;

use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityName, EntityTrait, Value};

use common::{AppError, AppResult};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Boolean filter over an entity's fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
    In {
        field: String,
        values: Vec<Value>,
    },
    /// SQL `LIKE` with `%` and `_` wildcards
    Like {
        field: String,
        pattern: String,
    },
    IsNull(String),
    IsNotNull(String),
    /// True when every child is true; true when empty
    All(Vec<Predicate>),
    /// True when any child is true; false when empty
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

/// Builder for predicates on a single field.
#[derive(Debug, Clone)]
pub struct Field(String);

impl Field {
    fn compare(self, op: CompareOp, value: impl Into<Value>) -> Predicate {
        Predicate::Compare {
            field: self.0,
            op,
            value: value.into(),
        }
    }

    pub fn eq(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Eq, value)
    }

    pub fn ne(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Ne, value)
    }

    pub fn lt(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Lte, value)
    }

    pub fn gt(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(self, value: impl Into<Value>) -> Predicate {
        self.compare(CompareOp::Gte, value)
    }

    pub fn is_in<V, I>(self, values: I) -> Predicate
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Predicate::In {
            field: self.0,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn like(self, pattern: impl Into<String>) -> Predicate {
        Predicate::Like {
            field: self.0,
            pattern: pattern.into(),
        }
    }

    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self.0)
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNotNull(self.0)
    }
}

impl Predicate {
    /// Start a predicate on the named field
    pub fn field(name: impl Into<String>) -> Field {
        Field(name.into())
    }

    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::All(predicates.into_iter().collect())
    }

    pub fn any(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Any(predicates.into_iter().collect())
    }

    /// Matches every entity
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    pub fn and(self, other: Predicate) -> Self {
        match self {
            Predicate::All(mut items) => {
                items.push(other);
                Predicate::All(items)
            }
            first => Predicate::All(vec![first, other]),
        }
    }

    pub fn or(self, other: Predicate) -> Self {
        match self {
            Predicate::Any(mut items) => {
                items.push(other);
                Predicate::Any(items)
            }
            first => Predicate::Any(vec![first, other]),
        }
    }

    /// Field names referenced anywhere in the expression.
    pub fn fields(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_fields(&mut names);
        names
    }

    fn collect_fields<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Predicate::Compare { field, .. }
            | Predicate::In { field, .. }
            | Predicate::Like { field, .. }
            | Predicate::IsNull(field)
            | Predicate::IsNotNull(field) => {
                if !names.contains(&field.as_str()) {
                    names.push(field);
                }
            }
            Predicate::All(items) | Predicate::Any(items) => {
                for item in items {
                    item.collect_fields(names);
                }
            }
            Predicate::Not(inner) => inner.collect_fields(names),
        }
    }

    /// Translate into a query condition over the columns of `E`.
    ///
    /// Fails with `InvalidPredicate` when a field does not name a column.
    pub fn to_condition<E: EntityTrait>(&self) -> AppResult<Condition> {
        let condition = match self {
            Predicate::All(items) if items.is_empty() => Condition::all().add(Expr::cust("1 = 1")),
            Predicate::Any(items) if items.is_empty() => Condition::all().add(Expr::cust("1 = 0")),
            Predicate::All(items) => items
                .iter()
                .try_fold(Condition::all(), |acc, item| Ok::<_, AppError>(acc.add(item.to_condition::<E>()?)))?,
            Predicate::Any(items) => items
                .iter()
                .try_fold(Condition::any(), |acc, item| Ok::<_, AppError>(acc.add(item.to_condition::<E>()?)))?,
            Predicate::Not(inner) => inner.to_condition::<E>()?.not(),
            leaf => Condition::all().add(leaf.to_expr::<E>()?),
        };

        Ok(condition)
    }

    fn to_expr<E: EntityTrait>(&self) -> AppResult<SimpleExpr> {
        let expr = match self {
            Predicate::Compare { field, op, value } => {
                let column = resolve_column::<E>(field)?;
                let value = value.clone();
                match op {
                    CompareOp::Eq => column.eq(value),
                    CompareOp::Ne => column.ne(value),
                    CompareOp::Lt => column.lt(value),
                    CompareOp::Lte => column.lte(value),
                    CompareOp::Gt => column.gt(value),
                    CompareOp::Gte => column.gte(value),
                }
            }
            Predicate::In { field, values } => resolve_column::<E>(field)?.is_in(values.iter().cloned()),
            Predicate::Like { field, pattern } => resolve_column::<E>(field)?.like(pattern.as_str()),
            Predicate::IsNull(field) => resolve_column::<E>(field)?.is_null(),
            Predicate::IsNotNull(field) => resolve_column::<E>(field)?.is_not_null(),
            Predicate::All(_) | Predicate::Any(_) | Predicate::Not(_) => {
                return Err(AppError::internal("combinator passed to leaf translation"));
            }
        };

        Ok(expr)
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        match self {
            Predicate::Not(inner) => *inner,
            other => Predicate::Not(Box::new(other)),
        }
    }
}

fn resolve_column<E: EntityTrait>(name: &str) -> AppResult<E::Column> {
    name.parse::<E::Column>().map_err(|_| {
        AppError::invalid_predicate(format!(
            "unknown field '{}' on {}",
            name,
            E::default().table_name()
        ))
    })
}
