//! OrderList: intrusive doubly-linked traversal order threaded through arena slots.

use slotmap::{DefaultKey, SlotMap};

/// Per-entry linkage for the traversal order. Lives inside each arena
/// node; `None` on both sides of an unlinked node.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct OrderLinks {
    pub(crate) prev: Option<DefaultKey>,
    pub(crate) next: Option<DefaultKey>,
}

/// Contract a node type must offer so the list can thread through it.
pub(crate) trait Ordered {
    fn links(&self) -> OrderLinks;
    fn links_mut(&mut self) -> &mut OrderLinks;
}

/// Doubly-linked list over arena slots. Head is the oldest (least
/// recently inserted/used) node, tail the newest. The list never owns
/// nodes; it only rewires their `OrderLinks`.
#[derive(Debug, Default)]
pub(crate) struct OrderList {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl OrderList {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    pub(crate) fn head(&self) -> Option<DefaultKey> {
        self.head
    }

    pub(crate) fn tail(&self) -> Option<DefaultKey> {
        self.tail
    }

    /// Append `node` at the tail. The node must currently be unlinked.
    pub(crate) fn push_back<T: Ordered>(
        &mut self,
        slots: &mut SlotMap<DefaultKey, T>,
        node: DefaultKey,
    ) {
        let old_tail = self.tail;
        {
            let links = slots[node].links_mut();
            debug_assert_eq!(*links, OrderLinks::default());
            links.prev = old_tail;
            links.next = None;
        }
        match old_tail {
            Some(t) => slots[t].links_mut().next = Some(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
    }

    /// Detach `node`, stitching its neighbours together. Its own links
    /// are reset so it can be relinked or destroyed.
    pub(crate) fn unlink<T: Ordered>(
        &mut self,
        slots: &mut SlotMap<DefaultKey, T>,
        node: DefaultKey,
    ) {
        let OrderLinks { prev, next } = slots[node].links();
        match prev {
            Some(p) => slots[p].links_mut().next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => slots[n].links_mut().prev = prev,
            None => self.tail = prev,
        }
        *slots[node].links_mut() = OrderLinks::default();
    }

    /// Move `node` to the tail (most-recently-used position).
    pub(crate) fn move_to_back<T: Ordered>(
        &mut self,
        slots: &mut SlotMap<DefaultKey, T>,
        node: DefaultKey,
    ) {
        if self.tail == Some(node) {
            return;
        }
        self.unlink(slots, node);
        self.push_back(slots, node);
    }

    /// Forget all linkage. Callers are responsible for the nodes
    /// themselves; used after bulk destruction.
    pub(crate) fn reset(&mut self) {
        self.head = None;
        self.tail = None;
    }
}
