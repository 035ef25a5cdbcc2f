//! Filters understood by every backend.
//!
//! Only two comparisons exist: exact equality and case-insensitive substring matching.
//! They combine with `And`/`Or` into an [`Expr`] tree.
//!
//! ```ignore
//! use culinary_core::query::{Query, Filter};
//!
//! let query = Query::builder()
//!     .filter(Filter::or([
//!         Filter::contains("title", "ramen"),
//!         Filter::contains("tags", "ramen"),
//!     ]))
//!     .build();
//! ```
//!
//! Backends walk the tree with a [`QueryVisitor`], either to evaluate it against
//! documents held in memory or to produce a native query.

use bson::Bson;

use crate::error::DocumentStoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOp {
    /// The field holds exactly this value. A list field matches when one element does.
    Eq,
    /// Case-insensitive, unanchored substring match.
    ///
    /// On a list field the expression matches when any string element contains the value.
    /// The value is always matched literally, never as a pattern.
    Contains,
}

/// Filter tree over document fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Every child matches. An empty list matches everything.
    And(Vec<Expr>),
    /// At least one child matches. An empty list matches nothing.
    Or(Vec<Expr>),
    Field {
        field: String,
        op: FieldOp,
        value: Bson,
    },
}

impl Expr {
    pub fn compare(field: impl Into<String>, op: FieldOp, value: Bson) -> Self {
        Expr::Field {
            field: field.into(),
            op,
            value,
        }
    }

    /// Requires both `self` and `other`, flattening into an existing `And`.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut children) => {
                children.push(other);
                Expr::And(children)
            }
            lhs => Expr::And(vec![lhs, other]),
        }
    }

    /// Accepts either `self` or `other`, flattening into an existing `Or`.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut children) => {
                children.push(other);
                Expr::Or(children)
            }
            lhs => Expr::Or(vec![lhs, other]),
        }
    }
}

/// What a backend is asked to read from one collection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// `None` selects the whole collection.
    pub filter: Option<Expr>,
    /// Upper bound on returned documents.
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }
}

/// Shorthands for building [`Expr`] leaves and groups.
pub struct Filter;

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Expr {
        Expr::compare(field, FieldOp::Eq, value.into())
    }

    /// See [`FieldOp::Contains`].
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Expr {
        Expr::compare(field, FieldOp::Contains, Bson::String(value.into()))
    }

    pub fn and(children: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(Vec::from_iter(children))
    }

    pub fn or(children: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(Vec::from_iter(children))
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn filter(self, filter: Expr) -> Self {
        self.maybe_filter(Some(filter))
    }

    /// Replaces the filter; `None` leaves the query unfiltered.
    pub fn maybe_filter(mut self, filter: Option<Expr>) -> Self {
        self.query.filter = filter;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}

/// Walks an [`Expr`] tree. Implementors decide how each node is combined.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, children: &[Expr]) -> Result<Self::Output, Self::Error>;

    fn visit_or(&mut self, children: &[Expr]) -> Result<Self::Output, Self::Error>;

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(children) => self.visit_and(children),
            Expr::Or(children) => self.visit_or(children),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_appends_to_existing_conjunction() {
        let expr = Filter::eq("active", true)
            .and(Filter::contains("title", "a"))
            .and(Filter::contains("tags", "b"));

        match expr {
            Expr::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected AND, got {other:?}"),
        }
    }

    #[test]
    fn or_does_not_flatten_into_and() {
        let expr = Filter::and([Filter::eq("a", 1)]).or(Filter::eq("b", 2));

        match expr {
            Expr::Or(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Expr::And(_)));
            }
            other => panic!("expected OR, got {other:?}"),
        }
    }

    #[test]
    fn contains_wraps_value_as_string() {
        assert_eq!(
            Filter::contains("tags", "vegan"),
            Expr::Field {
                field: "tags".to_string(),
                op: FieldOp::Contains,
                value: Bson::String("vegan".to_string()),
            }
        );
    }

    #[test]
    fn builder_without_filter_matches_everything() {
        let query = Query::builder().maybe_filter(None).limit(1).build();
        assert!(query.filter.is_none());
        assert_eq!(query.limit, Some(1));
    }
}
