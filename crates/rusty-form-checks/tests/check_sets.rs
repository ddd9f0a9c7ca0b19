//! Integration tests for the check factory and the built-in check sets
//!
//! Check sets evaluate every rule independently, so a checklist display can
//! show all failing rules at once.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rusty_form_checks::*;

#[test]
fn test_password_checks_on_weak_password() {
    let checks = password_checks();
    let control = FormControl::new("abc");

    assert_eq!(checks.len(), 7);
    for name in ["noAlpha", "noLowercase", "noUppercase", "noNumeric", "noSpecial", "minLength", "maxLength"] {
        assert!(checks.messages.contains_key(name), "missing message for {}", name);
    }

    assert_eq!(
        checks.failing(&control),
        vec!["minLength", "noNumeric", "noSpecial", "noUppercase"]
    );
}

#[test]
fn test_password_checks_on_strong_password() {
    let checks = password_checks();
    let control = FormControl::new("Abcdef1!");

    assert!(checks.evaluate(&control).is_none());
    assert!(checks.statuses(&control).iter().all(|status| !status.failing));
}

#[test]
fn test_password_checks_attached_to_control() {
    let checks = password_checks();
    let mut control = FormControl::new("").with_validators(checks.validators.clone());
    assert!(!control.valid());

    control.set_value("Abcdef1!");
    assert!(control.valid());

    control.set_value("Abcdefg1");
    assert_eq!(
        control.errors().cloned(),
        Some(ValidationError::new("noSpecial", "Must contain at least one special character").into_errors())
    );
}

#[rstest]
#[case("one two three", vec![])]
#[case("one", vec!["minWords"])]
#[case("", vec!["minWords"])]
#[case("a b c d e f g h i j k", vec!["maxWords"])]
fn test_word_count_checks(#[case] value: &str, #[case] expected: Vec<&str>) {
    let checks = word_count_checks(2, 10);
    assert_eq!(checks.failing(&FormControl::new(value)), expected);
}

#[test]
fn test_factory_messages_match_descriptor_names() {
    let descriptors = vec![
        CheckDescriptor::new(CheckKind::Required, "required", "Required"),
        CheckDescriptor::new(
            CheckKind::pattern("^[a-z]+$", RegexLogic::MatchRequired).unwrap(),
            "lowercaseOnly",
            "Lowercase letters only",
        ),
        CheckDescriptor::new(
            CheckKind::Length {
                length: 3,
                op: CompareOp::Ge,
            },
            "required",
            "Required (again)",
        ),
    ];

    let set = check_factory(descriptors);
    assert_eq!(set.validators.len(), 3);
    assert_eq!(set.messages.len(), 2);
    assert_eq!(set.messages["required"], "Required (again)");
    assert_eq!(set.messages["lowercaseOnly"], "Lowercase letters only");
}

#[test]
fn test_select_messages_from_check_set() {
    let checks = password_checks();
    let control = FormControl::new("abcdefgh");
    let errors = checks.evaluate(&control);

    let all = DisplayOptions::from_partial(
        PartialDisplayOptions {
            first_only: Some(false),
            ..Default::default()
        },
        &DisplayOptions::default(),
    );
    assert_eq!(
        select_messages(errors.as_ref(), &checks.messages, &all),
        vec![
            "Must contain at least one number",
            "Must contain at least one special character",
            "Must contain at least one uppercase letter",
        ]
    );

    let first = select_messages(errors.as_ref(), &checks.messages, &DisplayOptions::default());
    assert_eq!(first, vec!["Must contain at least one number"]);
}
