pub mod alerts;
pub mod dependent_dropdown;
pub mod reset;
pub mod sequence;
pub mod validated_field;

pub use alerts::{AlertDismisser, DismissGuard};
pub use dependent_dropdown::DependentDropdown;
pub use reset::{ResetButton, reset_target};
pub use sequence::{RequestSequence, Ticket};
pub use validated_field::{ALREADY_EXISTS_MESSAGE, FieldOptions, RemoteValidationField};
