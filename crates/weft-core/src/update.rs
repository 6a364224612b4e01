//! The reconciliation engine: create, update, and placement.

use std::mem;

use log::trace;

use crate::collections::Map;
use crate::hooks::execute;
use crate::host::{Anchor, SharedHost, WidgetId};
use crate::mount::unmount;
use crate::real::{ComponentReal, ElementReal, Mounted, RealNode, TextReal};
use crate::store::NodeStore;
use crate::value::{EventHandler, Style, Value};
use crate::vnode::{VElement, VNode};

/// Unconditionally builds a fresh real node for `next`, allocating live
/// widgets for text and elements and invoking components. Placement is
/// the caller's concern.
pub(crate) fn create(host: &SharedHost, next: VNode) -> RealNode {
    match next {
        VNode::Text(text) => {
            let widget = host.borrow_mut().create_text(&text);
            RealNode::new(Mounted::Text(TextReal { text, widget }))
        }
        VNode::Element(element) => {
            let VElement {
                tag,
                key,
                node_ref,
                attrs,
                children,
            } = element;
            let widget = host.borrow_mut().create_element(&tag);
            let mut handlers = Map::default();
            for (name, value) in attrs.iter() {
                apply_attribute(host, widget, &mut handlers, name, Some(value));
            }
            let children = update_all(
                host,
                children,
                Vec::new(),
                Some(Anchor {
                    parent: widget,
                    before: None,
                }),
            );
            if let Some(target) = &node_ref {
                target.set(Some(widget));
            }
            RealNode::new(Mounted::Element(ElementReal {
                tag,
                key,
                widget,
                attrs,
                handlers,
                node_ref,
                children,
            }))
        }
        VNode::Component(component) => {
            let node = RealNode::new(Mounted::Component(ComponentReal {
                component: component.component,
                key: component.key,
                props: component.props,
                slots: Vec::new(),
                result: Vec::new(),
            }));
            let rendered = execute(host, &node);
            let result = update_all(host, rendered, Vec::new(), None);
            node.borrow_mut().as_component_mut().result = result;
            node
        }
    }
}

/// Absorbs `next` into `prev` when their identities agree, otherwise
/// unmounts `prev` and creates from scratch. An identity change is
/// never patched.
pub(crate) fn update(host: &SharedHost, prev: RealNode, next: VNode) -> RealNode {
    if !prev.matches(&next) {
        trace!("replacing {prev:?}");
        unmount(host, &prev);
        return create(host, next);
    }
    match next {
        VNode::Text(content) => {
            let mut inner = prev.borrow_mut();
            let real = inner.as_text_mut();
            if real.text != content {
                host.borrow_mut().set_text(real.widget, &content);
                real.text = content;
            }
            drop(inner);
            prev
        }
        VNode::Element(element) => {
            let VElement {
                tag: _,
                key: _,
                node_ref,
                attrs,
                children,
            } = element;
            let (widget, prev_children) = {
                let mut inner = prev.borrow_mut();
                let real = inner.as_element_mut();
                let widget = real.widget;
                let old = mem::take(&mut real.attrs);
                for (name, value) in attrs.iter() {
                    if old.get(name) != Some(value) {
                        apply_attribute(host, widget, &mut real.handlers, name, Some(value));
                    }
                }
                for name in old.keys() {
                    if !attrs.contains_key(name) {
                        apply_attribute(host, widget, &mut real.handlers, name, None);
                    }
                }
                real.attrs = attrs;
                if let Some(target) = &node_ref {
                    target.set(Some(widget));
                }
                real.node_ref = node_ref;
                (widget, mem::take(&mut real.children))
            };
            let children = update_all(
                host,
                children,
                prev_children,
                Some(Anchor {
                    parent: widget,
                    before: None,
                }),
            );
            prev.borrow_mut().as_element_mut().children = children;
            prev
        }
        VNode::Component(component) => {
            let skip = {
                let inner = prev.borrow();
                let real = inner.as_component();
                real.component
                    .policy()
                    .equivalent(&component.props, &real.props)
            };
            if skip {
                trace!("skipping {prev:?}: props equivalent");
                return prev;
            }
            prev.borrow_mut().as_component_mut().props = component.props;
            let rendered = execute(host, &prev);
            let prev_result = mem::take(&mut prev.borrow_mut().as_component_mut().result);
            let result = update_all(host, rendered, prev_result, None);
            prev.borrow_mut().as_component_mut().result = result;
            prev
        }
    }
}

/// Reconciles an ordered child list: matches `next` against `prev`
/// through a [`NodeStore`], updates or creates per node, unmounts the
/// unclaimed remainder, and (when `anchor` is given) places the result
/// into the surface.
pub(crate) fn update_all(
    host: &SharedHost,
    next: Vec<VNode>,
    prev: Vec<RealNode>,
    anchor: Option<Anchor>,
) -> Vec<RealNode> {
    let mut store = NodeStore::new(host, prev);
    let result: Vec<RealNode> = next
        .into_iter()
        .map(|vnode| match store.claim(&vnode) {
            Some(node) => update(host, node, vnode),
            None => create(host, vnode),
        })
        .collect();
    store.sweep(host);
    if let Some(anchor) = anchor {
        insert_all(host, &result, anchor);
    }
    result
}

/// Places `nodes` inside `anchor.parent` ending immediately before
/// `anchor.before`, walking in reverse so each widget is inserted
/// before the previously placed one.
pub(crate) fn insert_all(host: &SharedHost, nodes: &[RealNode], anchor: Anchor) {
    let mut before = anchor.before;
    for node in nodes.iter().rev() {
        if let Some(widget) = insert(host, node, anchor.parent, before) {
            before = Some(widget);
        }
    }
}

/// Places one node's widget (or, for a component, its result list) into
/// `parent` immediately before `before`; widgets already in position
/// are left untouched. Returns the first live widget of the node, the
/// cursor for the sibling to its left.
pub(crate) fn insert(
    host: &SharedHost,
    node: &RealNode,
    parent: WidgetId,
    before: Option<WidgetId>,
) -> Option<WidgetId> {
    if let Some(widget) = node.widget() {
        let placed = {
            let surface = host.borrow();
            surface.parent(widget) == Some(parent) && surface.next_sibling(widget) == before
        };
        if !placed {
            host.borrow_mut().insert_before(parent, widget, before);
        }
        return Some(widget);
    }
    let result = node.borrow().as_component().result.clone();
    let mut cursor = before;
    let mut first = None;
    for child in result.iter().rev() {
        if let Some(widget) = insert(host, child, parent, cursor) {
            cursor = Some(widget);
            first = Some(widget);
        }
    }
    first
}

/// Pushes one attribute into the live widget, routing the reserved
/// names (`value`, `checked`, `markup`, `style`, the `on*` listener
/// prefix) to their dedicated capabilities. `None`, or a value with no
/// textual form in a plain slot, removes the attribute.
fn apply_attribute(
    host: &SharedHost,
    widget: WidgetId,
    handlers: &mut Map<String, EventHandler>,
    name: &str,
    next: Option<&Value>,
) {
    if let Some(event) = name.strip_prefix("on").filter(|event| !event.is_empty()) {
        match next {
            Some(Value::Handler(handler)) => {
                if handlers.get(event) != Some(handler) {
                    // unbind the stale handler before rebinding; hosts
                    // are not promised replace semantics
                    if handlers
                        .insert(event.to_owned(), handler.clone())
                        .is_some()
                    {
                        host.borrow_mut().remove_listener(widget, event);
                    }
                    host.borrow_mut()
                        .add_listener(widget, event, handler.clone());
                }
            }
            _ => {
                if handlers.remove(event).is_some() {
                    host.borrow_mut().remove_listener(widget, event);
                }
            }
        }
        return;
    }
    let mut surface = host.borrow_mut();
    match name {
        "value" => {
            let text = next.and_then(Value::as_text).unwrap_or_default();
            surface.set_value(widget, &text);
        }
        "checked" => surface.set_checked(widget, next.is_some_and(Value::truthy)),
        "markup" => {
            let markup = next.and_then(Value::as_text).unwrap_or_default();
            surface.set_markup(widget, &markup);
        }
        "style" => match next {
            Some(Value::Style(style)) => surface.set_style(widget, &css_text(style)),
            Some(value) => surface.set_style(widget, &value.as_text().unwrap_or_default()),
            None => surface.set_style(widget, ""),
        },
        _ => match next.and_then(Value::as_text) {
            Some(text) => surface.set_attribute(widget, name, &text),
            None => surface.remove_attribute(widget, name),
        },
    }
}

/// Flattens a structured style into css text, folding camelCase
/// property names to kebab-case.
fn css_text(style: &Style) -> String {
    let mut css = String::new();
    for (name, value) in style {
        if !css.is_empty() {
            css.push(';');
        }
        for ch in name.chars() {
            if ch.is_ascii_uppercase() {
                css.push('-');
                css.push(ch.to_ascii_lowercase());
            } else {
                css.push(ch);
            }
        }
        css.push(':');
        css.push_str(value);
    }
    css
}
