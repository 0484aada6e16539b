use crate::domain::model::MenuEntry;
use crate::domain::ports::SelectorEngine;
use crate::utils::error::{MenuError, Result};

/// Runs `expr` against `document` and returns every match trimmed, in document order.
///
/// An empty expression is rejected; callers skip weekdays without a selector
/// before getting here. Zero matches is `Ok(vec![])`.
pub fn extract<E: SelectorEngine>(
    engine: &E,
    document: &E::Document,
    expr: &str,
) -> Result<Vec<MenuEntry>> {
    if expr.trim().is_empty() {
        return Err(MenuError::SelectorError {
            expr: expr.to_string(),
            message: "selector is empty".to_string(),
        });
    }

    let values = engine.query(document, expr)?;
    Ok(values
        .into_iter()
        .map(|value| value.trim().to_string())
        .collect())
}
