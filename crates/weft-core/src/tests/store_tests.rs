use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::host::{Host, WidgetId};
use crate::update::create;
use crate::value::EventHandler;
use crate::vnode::{h, keyed, text, Component, Rendered};

/// Hands out widget ids and records removals; nothing else matters to
/// the matcher.
struct StubHost {
    next_widget: WidgetId,
    removed: Vec<WidgetId>,
}

impl StubHost {
    fn shared() -> (Rc<RefCell<StubHost>>, SharedHost) {
        let host = Rc::new(RefCell::new(StubHost {
            next_widget: 0,
            removed: Vec::new(),
        }));
        let shared: SharedHost = host.clone();
        (host, shared)
    }

    fn allocate(&mut self) -> WidgetId {
        let id = self.next_widget;
        self.next_widget += 1;
        id
    }
}

impl Host for StubHost {
    fn create_text(&mut self, _text: &str) -> WidgetId {
        self.allocate()
    }

    fn create_element(&mut self, _tag: &str) -> WidgetId {
        self.allocate()
    }

    fn set_text(&mut self, _widget: WidgetId, _text: &str) {}
    fn set_attribute(&mut self, _widget: WidgetId, _name: &str, _value: &str) {}
    fn remove_attribute(&mut self, _widget: WidgetId, _name: &str) {}
    fn set_value(&mut self, _widget: WidgetId, _value: &str) {}
    fn set_checked(&mut self, _widget: WidgetId, _checked: bool) {}
    fn set_markup(&mut self, _widget: WidgetId, _markup: &str) {}
    fn set_style(&mut self, _widget: WidgetId, _css: &str) {}
    fn add_listener(&mut self, _widget: WidgetId, _event: &str, _handler: EventHandler) {}
    fn remove_listener(&mut self, _widget: WidgetId, _event: &str) {}

    fn parent(&self, _widget: WidgetId) -> Option<WidgetId> {
        None
    }

    fn next_sibling(&self, _widget: WidgetId) -> Option<WidgetId> {
        None
    }

    fn insert_before(&mut self, _parent: WidgetId, _widget: WidgetId, _before: Option<WidgetId>) {}

    fn remove(&mut self, widget: WidgetId) {
        self.removed.push(widget);
    }
}

#[test]
fn same_tag_elements_claim_in_fifo_order() {
    let (_, host) = StubHost::shared();
    let first = create(&host, h("li", [], []));
    let second = create(&host, h("li", [], []));
    let mut store = NodeStore::new(&host, vec![first.clone(), second.clone()]);

    assert!(store.claim(&h("li", [], [])).unwrap().ptr_eq(&first));
    assert!(store.claim(&h("li", [], [])).unwrap().ptr_eq(&second));
    assert!(store.claim(&h("li", [], [])).is_none());
    store.sweep(&host);
}

#[test]
fn tags_do_not_share_buckets() {
    let (_, host) = StubHost::shared();
    let item = create(&host, h("li", [], []));
    let mut store = NodeStore::new(&host, vec![item.clone()]);

    assert!(store.claim(&h("p", [], [])).is_none());
    assert!(store.claim(&h("li", [], [])).unwrap().ptr_eq(&item));
    store.sweep(&host);
}

#[test]
fn text_nodes_pool_regardless_of_content() {
    let (_, host) = StubHost::shared();
    let node = create(&host, text("a"));
    let mut store = NodeStore::new(&host, vec![node.clone()]);

    assert!(store.claim(&text("entirely different")).unwrap().ptr_eq(&node));
    store.sweep(&host);
}

#[test]
fn keyed_claims_are_exact_and_never_fall_back() {
    let (_, host) = StubHost::shared();
    let node = create(&host, h("li", [keyed(1)], []));
    let mut store = NodeStore::new(&host, vec![node.clone()]);

    // A different key finds nothing even though a matching tag exists,
    // and an unkeyed query cannot claim a keyed node.
    assert!(store.claim(&h("li", [keyed(2)], [])).is_none());
    assert!(store.claim(&h("li", [], [])).is_none());
    assert!(store.claim(&h("li", [keyed(1)], [])).unwrap().ptr_eq(&node));
    store.sweep(&host);
}

#[test]
fn components_bucket_by_identity() {
    let (_, host) = StubHost::shared();
    let first = Component::new("First", |_, _| Rendered::Nothing);
    let second = Component::new("Second", |_, _| Rendered::Nothing);
    let node = create(&host, h(&first, [], []));
    let mut store = NodeStore::new(&host, vec![node.clone()]);

    assert!(store.claim(&h(&second, [], [])).is_none());
    assert!(store.claim(&h(&first, [], [])).unwrap().ptr_eq(&node));
    store.sweep(&host);
}

#[test]
fn duplicate_previous_key_unmounts_the_earlier_occupant() {
    let (stub, host) = StubHost::shared();
    let first = create(&host, h("li", [keyed(7)], []));
    let second = create(&host, h("li", [keyed(7)], []));
    let first_widget = first.widget().unwrap();
    let mut store = NodeStore::new(&host, vec![first, second.clone()]);

    assert_eq!(stub.borrow().removed, [first_widget]);
    assert!(store.claim(&h("li", [keyed(7)], [])).unwrap().ptr_eq(&second));
    store.sweep(&host);
    assert_eq!(stub.borrow().removed, [first_widget]);
}

#[test]
fn sweep_unmounts_every_unclaimed_node() {
    let (stub, host) = StubHost::shared();
    let nodes = vec![
        create(&host, h("li", [], [])),
        create(&host, h("li", [keyed(1)], [])),
        create(&host, text("x")),
    ];
    let mut widgets = nodes
        .iter()
        .map(|node| node.widget().unwrap())
        .collect::<Vec<_>>();
    widgets.sort_unstable();

    let store = NodeStore::new(&host, nodes);
    store.sweep(&host);

    let mut removed = stub.borrow().removed.clone();
    removed.sort_unstable();
    assert_eq!(removed, widgets);
}
