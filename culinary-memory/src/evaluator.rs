//! Query expression evaluation for in-memory document filtering.

use bson::{Bson, Document};

use culinary_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, FieldOp, QueryVisitor},
};

/// Evaluates filter expressions against a single document.
pub(crate) struct DocumentEvaluator<'a> {
    document: &'a Document,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }

    /// Returns clones of the documents matching `expr`, preserving their order.
    pub fn filter_documents(
        documents: impl IntoIterator<Item = &'a Document>,
        expr: &Expr,
    ) -> Vec<Document> {
        documents
            .into_iter()
            .filter(|doc| {
                DocumentEvaluator::new(doc)
                    .evaluate(expr)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

/// Case-insensitive, unanchored substring test.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Numeric equality across BSON integer and float widths.
fn values_equal(left: &Bson, right: &Bson) -> bool {
    match (left, right) {
        (Bson::Int32(a), Bson::Int64(b)) | (Bson::Int64(b), Bson::Int32(a)) => i64::from(*a) == *b,
        (Bson::Int32(a), Bson::Double(b)) | (Bson::Double(b), Bson::Int32(a)) => f64::from(*a) == *b,
        (Bson::Int64(a), Bson::Double(b)) | (Bson::Double(b), Bson::Int64(a)) => *a as f64 == *b,
        _ => left == right,
    }
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, children: &[Expr]) -> Result<Self::Output, Self::Error> {
        for child in children {
            if !self.visit_expr(child)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, children: &[Expr]) -> Result<Self::Output, Self::Error> {
        for child in children {
            if self.visit_expr(child)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let Some(field_value) = self.document.get(field) else {
            return Ok(false);
        };

        match op {
            FieldOp::Eq => Ok(match field_value {
                Bson::Array(items) if !matches!(value, Bson::Array(_)) => {
                    items.iter().any(|item| values_equal(item, value))
                }
                _ => values_equal(field_value, value),
            }),
            FieldOp::Contains => {
                let Bson::String(needle) = value else {
                    return Err(DocumentStoreError::InvalidDocument(
                        "Contains operator requires a string value".to_string(),
                    ));
                };

                Ok(match field_value {
                    Bson::String(text) => contains_ignore_case(text, needle),
                    Bson::Array(items) => items.iter().any(|item| match item {
                        Bson::String(text) => contains_ignore_case(text, needle),
                        _ => false,
                    }),
                    _ => false,
                })
            }
        }
    }
}
