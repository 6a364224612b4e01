//! Real nodes: the live counterparts of mounted virtual nodes.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::collections::Map;
use crate::hooks::{HookSlot, NodeRef};
use crate::host::WidgetId;
use crate::value::EventHandler;
use crate::vnode::{AttrMap, Component, Key, Props, VNode};

pub(crate) struct TextReal {
    pub text: String,
    pub widget: WidgetId,
}

pub(crate) struct ElementReal {
    pub tag: String,
    pub key: Option<Key>,
    pub widget: WidgetId,
    /// Attributes currently applied to the widget, the baseline the
    /// next render diffs against.
    pub attrs: AttrMap,
    pub handlers: Map<String, EventHandler>,
    pub node_ref: Option<NodeRef>,
    pub children: Vec<RealNode>,
}

pub(crate) struct ComponentReal {
    pub component: Component,
    pub key: Option<Key>,
    pub props: Props,
    /// Positional hook slots, one per hook call site.
    pub slots: Vec<HookSlot>,
    /// Real nodes produced by the most recent invocation.
    pub result: Vec<RealNode>,
}

pub(crate) enum Mounted {
    Text(TextReal),
    Element(ElementReal),
    Component(ComponentReal),
}

impl Mounted {
    pub(crate) fn as_text_mut(&mut self) -> &mut TextReal {
        match self {
            Mounted::Text(real) => real,
            _ => panic!("real node is not a text node"),
        }
    }

    pub(crate) fn as_element(&self) -> &ElementReal {
        match self {
            Mounted::Element(real) => real,
            _ => panic!("real node is not an element"),
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> &mut ElementReal {
        match self {
            Mounted::Element(real) => real,
            _ => panic!("real node is not an element"),
        }
    }

    pub(crate) fn as_component(&self) -> &ComponentReal {
        match self {
            Mounted::Component(real) => real,
            _ => panic!("real node is not a component"),
        }
    }

    pub(crate) fn as_component_mut(&mut self) -> &mut ComponentReal {
        match self {
            Mounted::Component(real) => real,
            _ => panic!("real node is not a component"),
        }
    }
}

/// Live counterpart of one mounted virtual node. Cheap to clone; all
/// clones address the same instance.
#[derive(Clone)]
pub struct RealNode {
    inner: Rc<RefCell<Mounted>>,
}

impl RealNode {
    pub(crate) fn new(mounted: Mounted) -> Self {
        Self {
            inner: Rc::new(RefCell::new(mounted)),
        }
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Mounted> {
        self.inner.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Mounted> {
        self.inner.borrow_mut()
    }

    /// Whether both handles address the same mounted instance.
    pub fn ptr_eq(&self, other: &RealNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Key assigned when the node was created, if any.
    pub fn key(&self) -> Option<Key> {
        match &*self.borrow() {
            Mounted::Text(_) => None,
            Mounted::Element(element) => element.key,
            Mounted::Component(component) => component.key,
        }
    }

    /// The live widget this node owns; `None` for components, whose
    /// identity resolves transitively to their rendered descendants.
    pub fn widget(&self) -> Option<WidgetId> {
        match &*self.borrow() {
            Mounted::Text(real) => Some(real.widget),
            Mounted::Element(real) => Some(real.widget),
            Mounted::Component(_) => None,
        }
    }

    /// Last live widget reachable from this node, walking backwards
    /// through component results.
    pub fn last_widget(&self) -> Option<WidgetId> {
        match &*self.borrow() {
            Mounted::Text(real) => Some(real.widget),
            Mounted::Element(real) => Some(real.widget),
            Mounted::Component(real) => real.result.iter().rev().find_map(RealNode::last_widget),
        }
    }

    /// Whether `next` has the same identity as this node: same kind and
    /// equal tag / component function. Text matches text regardless of
    /// content.
    pub(crate) fn matches(&self, next: &VNode) -> bool {
        match (&*self.borrow(), next) {
            (Mounted::Text(_), VNode::Text(_)) => true,
            (Mounted::Element(real), VNode::Element(next)) => real.tag == next.tag,
            (Mounted::Component(real), VNode::Component(next)) => real.component == next.component,
            _ => false,
        }
    }
}

impl fmt::Debug for RealNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.borrow() {
            Mounted::Text(real) => write!(f, "Text({:?} @{})", real.text, real.widget),
            Mounted::Element(real) => write!(
                f,
                "Element(<{}> @{}, {} children)",
                real.tag,
                real.widget,
                real.children.len()
            ),
            Mounted::Component(real) => write!(
                f,
                "Component({}, {} result nodes)",
                real.component.name(),
                real.result.len()
            ),
        }
    }
}
