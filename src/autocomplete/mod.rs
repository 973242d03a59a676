//! Autocomplete fields with a single shared "open dropdown" slot.
//!
//! An [`AutocompleteField`] is a text buffer with a filtered option list.
//! All fields created from the same [`Scope`] share one [`DropdownRegistry`],
//! and only the field whose id is stored there considers itself open.

pub mod confirm;
pub mod field;
pub mod filter;
pub mod position;
pub mod registry;

pub use confirm::CustomValuePrompt;
pub use field::{AutocompleteField, FieldCommit, FieldProps, KeyOutcome};
pub use filter::{exact_match, filter_options};
pub use position::{DropdownPlacement, ListenerGuard, ViewportListeners, dropdown_rect};
pub use registry::{DropdownError, DropdownId, DropdownRegistry, Scope};
