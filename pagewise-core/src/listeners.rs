//! Model Listeners
//!
//! Listeners observe a [`WizardModel`] without owning it: the registry only
//! keeps weak references. Notification passes walk the live registry by
//! index, so a listener may register or unregister listeners (itself
//! included) from inside a callback.
//!
//! Unregistering during a pass clears the slot instead of shifting the
//! remaining entries, which keeps every later listener at its index and
//! guarantees none is skipped. Listeners registered during a pass are
//! appended and reached by that same pass. Cleared slots and dead weak
//! references are compacted once the outermost pass finishes.

use crate::model::WizardModel;
use crate::page::Page;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Weak;

/// Callbacks fired by a [`WizardModel`]
pub trait ModelCallbacks {
    /// A page's data changed; only that page needs to be redrawn
    fn on_page_data_changed(&self, model: &WizardModel, page: &Page);

    /// The set of active pages may have changed; the sequence must be re-derived
    fn on_page_tree_changed(&self, model: &WizardModel);
}

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Slot {
    id: ListenerId,
    listener: Weak<dyn ModelCallbacks>,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    slots: RefCell<Vec<Option<Slot>>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
}

impl ListenerRegistry {
    pub(crate) fn register(&self, listener: Weak<dyn ModelCallbacks>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.slots.borrow_mut().push(Some(Slot { id, listener }));
        id
    }

    /// Returns `false` when `id` was not registered
    pub(crate) fn unregister(&self, id: ListenerId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let Some(index) = slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|s| s.id == id))
        else {
            return false;
        };

        if self.depth.get() > 0 {
            slots[index] = None;
        } else {
            slots.remove(index);
        }
        true
    }

    /// Number of registered listeners that are still alive
    pub(crate) fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .flatten()
            .filter(|slot| slot.listener.strong_count() > 0)
            .count()
    }

    /// Call `notify` once for every live listener, by index over the live registry
    pub(crate) fn for_each(&self, mut notify: impl FnMut(&dyn ModelCallbacks)) {
        let _pass = Pass::enter(self);

        let mut index = 0;
        loop {
            // The borrow must end before the callback runs; it may touch the registry.
            let listener = {
                let slots = self.slots.borrow();
                match slots.get(index) {
                    Some(slot) => slot.as_ref().and_then(|s| s.listener.upgrade()),
                    None => break,
                }
            };
            index += 1;

            if let Some(listener) = listener {
                notify(listener.as_ref());
            }
        }
    }

    fn compact(&self) {
        self.slots
            .borrow_mut()
            .retain(|slot| slot.as_ref().is_some_and(|s| s.listener.strong_count() > 0));
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .field("depth", &self.depth.get())
            .finish()
    }
}

/// Tracks pass nesting; compacts when the outermost pass ends, even on unwind
struct Pass<'a> {
    registry: &'a ListenerRegistry,
}

impl<'a> Pass<'a> {
    fn enter(registry: &'a ListenerRegistry) -> Self {
        registry.depth.set(registry.depth.get() + 1);
        Self { registry }
    }
}

impl Drop for Pass<'_> {
    fn drop(&mut self) {
        let depth = self.registry.depth.get() - 1;
        self.registry.depth.set(depth);
        if depth == 0 {
            self.registry.compact();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_list::PageList;
    use std::rc::Rc;

    struct Named {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ModelCallbacks for Named {
        fn on_page_data_changed(&self, _model: &WizardModel, _page: &Page) {}

        fn on_page_tree_changed(&self, _model: &WizardModel) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn named(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<Named> {
        Rc::new(Named {
            name,
            log: Rc::clone(log),
        })
    }

    fn downgrade(listener: &Rc<Named>) -> Weak<dyn ModelCallbacks> {
        Rc::downgrade(listener) as Weak<dyn ModelCallbacks>
    }

    #[test]
    fn test_unregister_outside_pass_removes_slot() {
        let registry = ListenerRegistry::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = named("a", &log);

        let id = registry.register(downgrade(&a));
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.slots.borrow().is_empty());
    }

    #[test]
    fn test_nested_pass_keeps_indices_until_outermost_ends() {
        let registry = ListenerRegistry::default();
        let model = WizardModel::from_page_list(PageList::default()).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = named("a", &log);
        let b = named("b", &log);
        let c = named("c", &log);
        let d = named("d", &log);

        registry.register(downgrade(&a));
        registry.register(downgrade(&b));
        let c_id = registry.register(downgrade(&c));
        registry.register(downgrade(&d));

        let mut outer_calls = 0;
        registry.for_each(|listener| {
            outer_calls += 1;
            listener.on_page_tree_changed(&model);

            if outer_calls == 1 {
                log.borrow_mut().push("inner");
                registry.for_each(|inner| {
                    registry.unregister(c_id);
                    inner.on_page_tree_changed(&model);
                });
                log.borrow_mut().push("outer");

                // The outer pass is still running, so the cleared slot stays
                assert_eq!(registry.slots.borrow().len(), 4);
                assert_eq!(registry.depth.get(), 1);
            }
        });

        assert_eq!(
            *log.borrow(),
            ["a", "inner", "a", "b", "d", "outer", "b", "d"]
        );
        assert_eq!(outer_calls, 3);
        assert_eq!(registry.depth.get(), 0);
        assert_eq!(registry.slots.borrow().len(), 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_dropped_listeners_are_skipped_and_compacted() {
        let registry = ListenerRegistry::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = named("a", &log);
        let b = named("b", &log);

        registry.register(downgrade(&a));
        registry.register(downgrade(&b));
        drop(a);

        assert_eq!(registry.len(), 1);
        let mut seen = 0;
        registry.for_each(|_| seen += 1);
        assert_eq!(seen, 1);
        assert_eq!(registry.slots.borrow().len(), 1);
    }
}
