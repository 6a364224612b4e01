//! Mount and unmount entry points end to end.

use std::cell::RefCell;
use std::rc::Rc;

use weft_core::{
    h, mount, nodes, unmount, Component, EffectResult, SharedHost, WidgetId,
};
use weft_testing::MemoryHost;

fn setup() -> (Rc<RefCell<MemoryHost>>, SharedHost, WidgetId) {
    let (memory, host) = MemoryHost::shared();
    let root = memory.borrow_mut().create_root();
    (memory, host, root)
}

#[test]
fn mounts_literal_markup() {
    let (memory, host, root) = setup();
    mount(&host, root, h("h1", [], nodes!["hello"]), None);
    assert_eq!(memory.borrow().render_children(root), "<h1>hello</h1>");
}

#[test]
fn update_reuses_the_live_widget() {
    let (memory, host, root) = setup();
    let node = mount(&host, root, h("h1", [], nodes!["hello"]), None);
    let h1 = memory.borrow().find("h1").unwrap();

    mount(&host, root, h("h1", [], nodes!["world"]), Some(node));
    assert_eq!(memory.borrow().render_children(root), "<h1>world</h1>");
    assert_eq!(memory.borrow().find("h1"), Some(h1));
}

#[test]
fn identity_change_replaces_the_root() {
    let (memory, host, root) = setup();
    let node = mount(&host, root, h("h1", [], nodes!["hello"]), None);
    mount(&host, root, h("p", [], nodes!["bye"]), Some(node));

    assert_eq!(memory.borrow().render_children(root), "<p>bye</p>");
    assert!(memory.borrow().find("h1").is_none());
}

#[test]
fn unmount_detaches_children_before_running_cleanups() {
    let (memory, host, root) = setup();
    let log = Rc::new(RefCell::new(Vec::<&'static str>::new()));

    let inner_log = log.clone();
    let inner = Component::new("Inner", move |scope, _| {
        let inner_log = inner_log.clone();
        scope.use_effect(Vec::new(), move || {
            EffectResult::on_dispose(move || inner_log.borrow_mut().push("inner"))
        });
        h("span", [], nodes!["x"]).into()
    });

    let outer_log = log.clone();
    let outer = Component::new("Outer", move |scope, _| {
        let outer_log = outer_log.clone();
        scope.use_effect(Vec::new(), move || {
            EffectResult::on_dispose(move || outer_log.borrow_mut().push("outer"))
        });
        h(&inner, [], []).into()
    });

    let node = mount(&host, root, h(&outer, [], []), None);
    assert_eq!(memory.borrow().render_children(root), "<span>x</span>");

    unmount(&host, &node);
    assert_eq!(*log.borrow(), ["inner", "outer"]);
    assert!(memory.borrow().find("span").is_none());
    assert_eq!(memory.borrow().render_children(root), "");
}
