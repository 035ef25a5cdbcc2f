//! Query translation from the gateway filter AST to MongoDB query syntax.

use bson::{Bson, Document, doc};

use culinary_core::{
    error::DocumentStoreError,
    query::{Expr, FieldOp, QueryVisitor},
};

/// Translates gateway query expressions into MongoDB query documents.
///
/// `Contains` becomes an escaped, case-insensitive `$regex`. MongoDB applies a regex
/// condition on an array field to each element, which gives the any-element semantics
/// for list fields without an explicit `$elemMatch`.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Translates an optional filter, producing the match-all document for `None`.
    pub(crate) fn translate(filter: Option<&Expr>) -> Result<Document, DocumentStoreError> {
        match filter {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    fn translate_all(&mut self, children: &[Expr]) -> Result<Vec<Document>, DocumentStoreError> {
        children.iter().map(|child| self.visit_expr(child)).collect()
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, children: &[Expr]) -> Result<Self::Output, Self::Error> {
        if children.is_empty() {
            return Ok(doc! {});
        }

        Ok(doc! { "$and": self.translate_all(children)? })
    }

    fn visit_or(&mut self, children: &[Expr]) -> Result<Self::Output, Self::Error> {
        // An empty disjunction matches nothing; `$or: []` is rejected by the server.
        if children.is_empty() {
            return Ok(doc! { "_id": { "$exists": false } });
        }

        Ok(doc! { "$or": self.translate_all(children)? })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Contains => match value {
                    Bson::String(s) => doc! { "$regex": regex::escape(s), "$options": "i" },
                    _ => return Err(DocumentStoreError::InvalidDocument(
                        "Contains operator requires a string value".to_string(),
                    )),
                },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use culinary_core::query::Filter;

    #[test]
    fn contains_becomes_escaped_case_insensitive_regex() {
        let query = MongoQueryTranslator::translate(Some(&Filter::contains("title", "a.b (c)"))).unwrap();

        assert_eq!(
            query,
            doc! { "title": { "$regex": r"a\.b \(c\)", "$options": "i" } }
        );
    }

    #[test]
    fn nested_connectives_translate_recursively() {
        let expr = Filter::or([
            Filter::contains("title", "ramen"),
            Filter::contains("tags", "ramen"),
        ])
        .and(Filter::contains("tags", "vegan"));

        let query = MongoQueryTranslator::translate(Some(&expr)).unwrap();

        assert_eq!(
            query,
            doc! {
                "$and": [
                    { "$or": [
                        { "title": { "$regex": "ramen", "$options": "i" } },
                        { "tags": { "$regex": "ramen", "$options": "i" } }
                    ] },
                    { "tags": { "$regex": "vegan", "$options": "i" } }
                ]
            }
        );
    }

    #[test]
    fn eq_and_empty_filter() {
        assert_eq!(
            MongoQueryTranslator::translate(Some(&Filter::eq("active", true))).unwrap(),
            doc! { "active": { "$eq": true } }
        );
        assert_eq!(MongoQueryTranslator::translate(None).unwrap(), doc! {});
    }
}
