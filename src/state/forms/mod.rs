//! Form domain layer
//!
//! Setup form values, validation and the reducer that drives them. Nothing
//! here touches the terminal or any collaborator.

mod field;
mod setup_form;
mod validation;

pub use field::{setup_fields, FieldValue, FormField};
pub use setup_form::{
    initialize, reduce, FocusTarget, FormAction, SecurityCheckStatus, SetupFormState,
    SetupFormValues,
};
pub use validation::{FieldError, FieldName};
