// File: src/error_state.rs
// Purpose: Read-modify-write helpers for a control's error state

use crate::control::{AbstractControl, ValidationErrors};

/// Merges `incoming` into `current`; later keys overwrite earlier ones
pub fn merge_errors(current: &mut Option<ValidationErrors>, incoming: Option<ValidationErrors>) {
    let Some(incoming) = incoming else {
        return;
    };
    if incoming.is_empty() {
        return;
    }
    current.get_or_insert_with(ValidationErrors::new).extend(incoming);
}

/// Merges `errors` into the control's existing error state
pub fn set_errors(control: &mut dyn AbstractControl, errors: ValidationErrors) {
    let mut merged = control.errors().cloned();
    merge_errors(&mut merged, Some(errors));
    control.set_error_state(merged);
}

/// Deletes the named errors, keeping every other key
///
/// The state resets to `None` only once no keys remain.
pub fn remove_errors(control: &mut dyn AbstractControl, error_names: &[&str]) {
    let Some(current) = control.errors() else {
        return;
    };
    if !error_names.iter().any(|name| current.contains_key(*name)) {
        return;
    }

    let mut remaining = current.clone();
    for name in error_names {
        remaining.remove(*name);
    }
    control.set_error_state(if remaining.is_empty() { None } else { Some(remaining) });
}
