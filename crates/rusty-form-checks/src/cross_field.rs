// File: src/cross_field.rs
// Purpose: Group-level rules that set or clear errors on sibling controls

use serde_json::Value;

use crate::control::{is_empty_value, AbstractControl, ErrorPayload, ValidationErrors};
use crate::error_state::{remove_errors, set_errors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossFieldKind {
    /// `target` is required while `other` is filled
    RequiredIf,
    /// `target` is required while `other` is empty
    RequiredIfNot,
    /// At least one of the two fields must be filled
    RequiredEither,
    /// Filling either field makes the other one required
    LinkTo,
    /// `target` must equal `other`
    LinkedTo,
}

/// A rule over two fields of one group
///
/// Rules report through the child controls' error state, not through the
/// group's return value: [`CrossFieldRule::apply`] sets or clears its error
/// name on the affected children and leaves every other key alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossFieldRule {
    pub kind: CrossFieldKind,
    pub target: String,
    pub other: String,
    pub error_name: String,
}

impl CrossFieldRule {
    pub fn new(kind: CrossFieldKind, target: impl Into<String>, other: impl Into<String>) -> Self {
        let error_name = match kind {
            CrossFieldKind::LinkedTo => "linkedTo",
            _ => "required",
        };
        Self {
            kind,
            target: target.into(),
            other: other.into(),
            error_name: error_name.to_string(),
        }
    }

    pub fn with_error_name(mut self, error_name: impl Into<String>) -> Self {
        self.error_name = error_name.into();
        self
    }

    pub fn fields(&self) -> [&str; 2] {
        [self.target.as_str(), self.other.as_str()]
    }

    /// Evaluates against a snapshot of the group value and updates the children
    ///
    /// Always returns `None`; the group itself never carries these errors.
    pub fn apply(&self, group: &mut dyn AbstractControl) -> Option<ValidationErrors> {
        let snapshot = group.value();
        let target = field_value(&snapshot, &self.target);
        let other = field_value(&snapshot, &self.other);
        let target_empty = is_empty_value(target);
        let other_empty = is_empty_value(other);

        match self.kind {
            CrossFieldKind::RequiredIf => {
                self.mark(group, &self.target, !other_empty && target_empty);
            }
            CrossFieldKind::RequiredIfNot => {
                self.mark(group, &self.target, other_empty && target_empty);
            }
            CrossFieldKind::RequiredEither => {
                let neither = target_empty && other_empty;
                self.mark(group, &self.target, neither);
                self.mark(group, &self.other, neither);
            }
            CrossFieldKind::LinkTo => {
                self.mark(group, &self.target, target_empty && !other_empty);
                self.mark(group, &self.other, other_empty && !target_empty);
            }
            CrossFieldKind::LinkedTo => {
                let matches = (target_empty && other_empty) || target == other;
                self.mark(group, &self.target, !matches);
            }
        }

        None
    }

    fn mark(&self, group: &mut dyn AbstractControl, field: &str, failing: bool) {
        let Some(child) = group.child_mut(field) else {
            tracing::warn!("Cross-field rule {:?} references missing field `{}`", self.kind, field);
            return;
        };

        if failing {
            let mut errors = ValidationErrors::new();
            errors.insert(self.error_name.clone(), ErrorPayload::Flag(true));
            set_errors(child, errors);
        } else {
            remove_errors(child, &[self.error_name.as_str()]);
        }
    }
}

static NULL: Value = Value::Null;

fn field_value<'a>(snapshot: &'a Value, field: &str) -> &'a Value {
    snapshot.get(field).unwrap_or(&NULL)
}

/// `target` is required while `trigger` is filled
pub fn required_if(target: impl Into<String>, trigger: impl Into<String>) -> CrossFieldRule {
    CrossFieldRule::new(CrossFieldKind::RequiredIf, target, trigger)
}

/// `target` is required while `trigger` is empty
pub fn required_if_not(target: impl Into<String>, trigger: impl Into<String>) -> CrossFieldRule {
    CrossFieldRule::new(CrossFieldKind::RequiredIfNot, target, trigger)
}

/// At least one of `a` and `b` must be filled; both are marked otherwise
pub fn required_either(a: impl Into<String>, b: impl Into<String>) -> CrossFieldRule {
    CrossFieldRule::new(CrossFieldKind::RequiredEither, a, b)
}

/// Filling either `a` or `b` makes the other required
pub fn link_to(a: impl Into<String>, b: impl Into<String>) -> CrossFieldRule {
    CrossFieldRule::new(CrossFieldKind::LinkTo, a, b)
}

/// `target` must hold the same value as `source` (`{linkedTo: true}` otherwise)
pub fn linked_to(target: impl Into<String>, source: impl Into<String>) -> CrossFieldRule {
    CrossFieldRule::new(CrossFieldKind::LinkedTo, target, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{FormControl, FormGroup};

    fn group(a: &str, b: &str) -> FormGroup {
        FormGroup::new()
            .with_control("a", FormControl::new(a))
            .with_control("b", FormControl::new(b))
    }

    #[test]
    fn test_required_if_not() {
        let rule = required_if_not("b", "a");
        let mut g = group("", "");
        rule.apply(&mut g);
        assert!(g.get("b").unwrap().has_error("required"));

        let mut g = group("x", "");
        rule.apply(&mut g);
        assert!(!g.get("b").unwrap().has_error("required"));
    }

    #[test]
    fn test_required_either() {
        let rule = required_either("a", "b");
        let mut g = group("", "");
        rule.apply(&mut g);
        assert!(g.get("a").unwrap().has_error("required"));
        assert!(g.get("b").unwrap().has_error("required"));

        g.set_value("b", "filled").unwrap();
        rule.apply(&mut g);
        assert!(g.get("a").unwrap().valid());
        assert!(g.get("b").unwrap().valid());
    }

    #[test]
    fn test_link_to() {
        let rule = link_to("a", "b");
        let mut g = group("x", "");
        rule.apply(&mut g);
        assert!(!g.get("a").unwrap().has_error("required"));
        assert!(g.get("b").unwrap().has_error("required"));

        let mut g = group("", "");
        rule.apply(&mut g);
        assert!(g.get("a").unwrap().valid() && g.get("b").unwrap().valid());
    }

    #[test]
    fn test_linked_to() {
        let rule = linked_to("b", "a");
        let mut g = group("secret", "secreT");
        rule.apply(&mut g);
        assert!(g.get("b").unwrap().has_error("linkedTo"));

        let mut g = group("secret", "secret");
        rule.apply(&mut g);
        assert!(!g.get("b").unwrap().has_error("linkedTo"));
    }

    #[test]
    fn test_custom_error_name() {
        let rule = required_if("b", "a").with_error_name("shippingRequired");
        let mut g = group("x", "");
        rule.apply(&mut g);
        assert!(g.get("b").unwrap().has_error("shippingRequired"));
        assert!(!g.get("b").unwrap().has_error("required"));
    }

    #[test]
    fn test_missing_field_is_ignored_at_apply() {
        let rule = required_if("missing", "a");
        let mut g = group("x", "");
        assert!(rule.apply(&mut g).is_none());
        assert!(g.get("b").unwrap().valid());
    }
}
