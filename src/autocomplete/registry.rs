use std::cell::Cell;
use std::rc::Rc;

/// Identity of one autocomplete field within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DropdownId(u64);

/// Error type for dropdown registry lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropdownError {
    #[error("dropdown registry used outside of a dropdown provider scope")]
    NoProvider,
}

#[derive(Debug, Default)]
struct Slot {
    active: Cell<Option<DropdownId>>,
    next_id: Cell<u64>,
}

/// The shared "which dropdown is open" cell.
///
/// Cloning yields another handle to the same slot. Writes are last-writer-wins;
/// each field derives its open state by comparing its own id to [`active`](Self::active).
#[derive(Debug, Clone, Default)]
pub struct DropdownRegistry {
    slot: Rc<Slot>,
}

impl DropdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh id for a field joining this registry.
    pub fn register(&self) -> DropdownId {
        let id = self.slot.next_id.get();
        self.slot.next_id.set(id + 1);
        DropdownId(id)
    }

    pub fn active(&self) -> Option<DropdownId> {
        self.slot.active.get()
    }

    pub fn set_active(&self, id: Option<DropdownId>) {
        let previous = self.slot.active.replace(id);
        if previous != id {
            tracing::trace!(?previous, ?id, "active dropdown changed");
        }
    }

    pub fn is_active(&self, id: DropdownId) -> bool {
        self.active() == Some(id)
    }

    /// Clear the slot, but only if `id` currently owns it.
    pub fn release(&self, id: DropdownId) {
        if self.is_active(id) {
            self.set_active(None);
        }
    }
}

/// Scoped dependencies handed down to widgets.
///
/// A scope without a dropdown provider is valid for everything else, but
/// asking it for the dropdown registry fails: "nothing is open" and
/// "nobody is tracking what is open" must not be confused.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    dropdown: Option<DropdownRegistry>,
}

impl Scope {
    /// A scope with no providers installed.
    pub fn root() -> Self {
        Self::default()
    }

    /// Install a fresh dropdown registry for everything created from the returned scope.
    pub fn with_dropdown_provider(mut self) -> Self {
        self.dropdown = Some(DropdownRegistry::new());
        self
    }

    pub fn dropdown(&self) -> Result<&DropdownRegistry, DropdownError> {
        self.dropdown.as_ref().ok_or(DropdownError::NoProvider)
    }
}
