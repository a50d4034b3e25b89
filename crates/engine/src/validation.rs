//! Field validation shared by records and users.

use sea_orm::ActiveValue;

use crate::{EngineError, ResultEngine};

/// A single violated field with a human readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

/// Collects every violation instead of stopping at the first one.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<FieldViolation>);

impl Violations {
    pub(crate) fn check(&mut self, field: &'static str, ok: bool, message: &'static str) {
        if !ok {
            self.0.push(FieldViolation { field, message });
        }
    }

    /// Require `value` to be present and non-empty.
    pub(crate) fn require_text(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        message: &'static str,
    ) {
        self.check(field, value.is_some_and(|v| !v.is_empty()), message);
    }

    pub(crate) fn into_inner(self) -> Vec<FieldViolation> {
        self.0
    }

    pub(crate) fn into_result(self) -> ResultEngine<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(self.0))
        }
    }
}

/// Set `target` when `value` is present and non-empty. Returns whether the
/// column was touched.
pub(crate) fn patch_text(target: &mut ActiveValue<String>, value: Option<String>) -> bool {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => {
            *target = ActiveValue::Set(value);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_all_missing_fields_in_order() {
        let mut v = Violations::default();
        v.require_text("name", None, "Name is required");
        v.require_text("amount", Some(""), "Amount is required");
        v.require_text("category", Some("food"), "Category is required");

        let fields: Vec<_> = v.into_inner().into_iter().map(|v| v.field).collect();
        assert_eq!(fields, ["name", "amount"]);
    }

    #[test]
    fn empty_patch_value_is_ignored() {
        let mut target = ActiveValue::Unchanged("old".to_string());
        assert!(!patch_text(&mut target, Some(String::new())));
        assert!(!patch_text(&mut target, None));
        assert_eq!(target, ActiveValue::Unchanged("old".to_string()));

        assert!(patch_text(&mut target, Some("new".to_string())));
        assert_eq!(target, ActiveValue::Set("new".to_string()));
    }
}
