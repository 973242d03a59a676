//! Screen placement for dropdown panels.
//!
//! Panels are drawn on top of everything else, outside the table layout, so
//! their rectangle has to be recomputed from the input's rectangle whenever a
//! dropdown opens and whenever the viewport moves underneath it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use ratatui::layout::Rect;

use super::registry::DropdownId;

type ListenerMap = RefCell<HashMap<DropdownId, Rc<Cell<bool>>>>;

/// Rectangle for a panel showing `rows` entries below `anchor`.
///
/// Same width and left edge as the input, clamped to the viewport. When the
/// panel does not fit below and there is more room above, it opens upwards.
/// Otherwise it is cut to the space below.
pub fn dropdown_rect(anchor: Rect, viewport: Rect, rows: u16) -> Rect {
    let width = anchor.width.min(viewport.width);
    let x = if anchor.x + width > viewport.right() {
        viewport.right().saturating_sub(width).max(viewport.x)
    } else {
        anchor.x.max(viewport.x)
    };
    let height = rows.saturating_add(2); // borders

    let below = anchor.bottom();
    let space_below = viewport.bottom().saturating_sub(below);
    let space_above = anchor.y.saturating_sub(viewport.y);

    if height <= space_below {
        Rect::new(x, below, width, height)
    } else if space_above > space_below {
        let h = height.min(space_above);
        Rect::new(x, anchor.y - h, width, h)
    } else {
        Rect::new(x, below, width, space_below)
    }
}

/// Fields that want to hear about scroll and resize.
///
/// Registration is tied to a [`ListenerGuard`]; dropping the guard removes it,
/// so a field that closes or goes away stops listening on every path.
#[derive(Debug, Clone, Default)]
pub struct ViewportListeners {
    inner: Rc<ListenerMap>,
}

impl ViewportListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, id: DropdownId) -> ListenerGuard {
        let stale = Rc::new(Cell::new(false));
        self.inner.borrow_mut().insert(id, Rc::clone(&stale));
        tracing::trace!(?id, "viewport listener attached");
        ListenerGuard {
            id,
            stale,
            listeners: Rc::downgrade(&self.inner),
        }
    }

    /// The viewport scrolled or resized: every listener must recompute.
    pub fn notify(&self) {
        for stale in self.inner.borrow().values() {
            stale.set(true);
        }
    }

    pub fn is_listening(&self, id: DropdownId) -> bool {
        self.inner.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live registration in [`ViewportListeners`]
#[derive(Debug)]
pub struct ListenerGuard {
    id: DropdownId,
    stale: Rc<Cell<bool>>,
    listeners: Weak<ListenerMap>,
}

impl ListenerGuard {
    /// Whether a notification arrived since the last call.
    fn take_stale(&self) -> bool {
        self.stale.replace(false)
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().remove(&self.id);
            tracing::trace!(id = ?self.id, "viewport listener detached");
        }
    }
}

/// Per-field placement state: the current panel rectangle plus the listener
/// registration that keeps it fresh while the field is open.
#[derive(Debug, Default)]
pub struct DropdownPlacement {
    guard: Option<ListenerGuard>,
    inputs: Option<(Rect, Rect, u16)>,
    rect: Option<Rect>,
}

impl DropdownPlacement {
    /// Bring placement in line with the field's open state.
    ///
    /// Opening attaches a listener and computes the rectangle; while open the
    /// rectangle is recomputed after a viewport notification or when the
    /// anchor, viewport or row count changed; closing detaches.
    pub fn update(
        &mut self,
        id: DropdownId,
        open: bool,
        anchor: Rect,
        viewport: Rect,
        rows: u16,
        listeners: &ViewportListeners,
    ) -> Option<Rect> {
        if !open {
            self.detach();
            return None;
        }
        let newly_open = self.guard.is_none();
        if newly_open {
            self.guard = Some(listeners.attach(id));
        }
        let stale = self.guard.as_ref().is_some_and(ListenerGuard::take_stale);
        let inputs = (anchor, viewport, rows);
        if newly_open || stale || self.inputs != Some(inputs) {
            self.rect = Some(dropdown_rect(anchor, viewport, rows));
            self.inputs = Some(inputs);
        }
        self.rect
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn is_listening(&self) -> bool {
        self.guard.is_some()
    }

    pub fn detach(&mut self) {
        self.guard = None;
        self.inputs = None;
        self.rect = None;
    }
}
