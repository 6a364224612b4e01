//! Top-level mount and unmount entry points.

use log::debug;

use crate::hooks;
use crate::host::{Anchor, SharedHost, WidgetId};
use crate::real::{Mounted, RealNode};
use crate::update::{create, insert_all, update};
use crate::vnode::VNode;

/// Renders `next` into `parent`, reconciling against `prev` when one is
/// supplied and its identity agrees; otherwise the previous tree is
/// torn down first. The resulting root is appended at the end of
/// `parent`. This is the only way a caller starts a full render.
pub fn mount(host: &SharedHost, parent: WidgetId, next: VNode, prev: Option<RealNode>) -> RealNode {
    debug!("mounting into widget {parent}");
    let node = match prev {
        Some(prev) => update(host, prev, next),
        None => create(host, next),
    };
    insert_all(
        host,
        std::slice::from_ref(&node),
        Anchor {
            parent,
            before: None,
        },
    );
    node
}

enum Teardown {
    Widget(WidgetId),
    Component(Vec<RealNode>),
}

/// Tears a subtree down. Text and element nodes detach their widget,
/// which takes the whole widget subtree with it; component nodes
/// unmount their result children first and then run effect cleanups.
pub fn unmount(host: &SharedHost, node: &RealNode) {
    debug!("unmounting {node:?}");
    let teardown = match &*node.borrow() {
        Mounted::Text(real) => Teardown::Widget(real.widget),
        Mounted::Element(real) => Teardown::Widget(real.widget),
        Mounted::Component(real) => Teardown::Component(real.result.clone()),
    };
    match teardown {
        Teardown::Widget(widget) => host.borrow_mut().remove(widget),
        Teardown::Component(result) => {
            for child in &result {
                unmount(host, child);
            }
            hooks::cleanup(node);
        }
    }
}
