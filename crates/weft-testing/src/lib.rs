//! In-memory host backend for weft tests and demos.
//!
//! [`MemoryHost`] keeps widgets in a slab and implements the full host
//! capability set, counting every mutating call so tests can assert
//! that an update touched the surface exactly as often as expected.
//! Invalid widget handles panic; there is no recovery path for a bad
//! handle and pretending otherwise would only hide engine bugs.

use std::cell::RefCell;
use std::rc::Rc;

use weft_core::collections::Map;
use weft_core::{Event, EventHandler, Host, SharedHost, WidgetId};

#[derive(Default)]
struct ElementWidget {
    tag: String,
    attrs: Map<String, String>,
    value: String,
    checked: bool,
    markup: String,
    style: String,
    listeners: Map<String, EventHandler>,
    children: Vec<WidgetId>,
}

enum Widget {
    Text(String),
    Element(ElementWidget),
}

struct Slot {
    widget: Widget,
    parent: Option<WidgetId>,
}

/// Widget slab plus parent links and a mutation counter.
#[derive(Default)]
pub struct MemoryHost {
    slots: Vec<Option<Slot>>,
    mutations: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a host and returns both the concrete handle (for
    /// assertions and dispatch) and the erased [`SharedHost`] the
    /// engine wants.
    pub fn shared() -> (Rc<RefCell<MemoryHost>>, SharedHost) {
        let host = Rc::new(RefCell::new(MemoryHost::new()));
        let shared: SharedHost = host.clone();
        (host, shared)
    }

    /// Creates a detached container element to mount into.
    pub fn create_root(&mut self) -> WidgetId {
        self.create_element("root")
    }

    /// Mutating capability calls since construction or the last
    /// [`MemoryHost::reset_mutations`]. Reads never count.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn reset_mutations(&mut self) {
        self.mutations = 0;
    }

    fn slot(&self, widget: WidgetId) -> &Slot {
        self.slots
            .get(widget)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("unknown widget {widget}"))
    }

    fn slot_mut(&mut self, widget: WidgetId) -> &mut Slot {
        self.slots
            .get_mut(widget)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("unknown widget {widget}"))
    }

    fn element(&self, widget: WidgetId) -> &ElementWidget {
        match &self.slot(widget).widget {
            Widget::Element(element) => element,
            Widget::Text(_) => panic!("widget {widget} is a text widget"),
        }
    }

    fn element_mut(&mut self, widget: WidgetId) -> &mut ElementWidget {
        match &mut self.slot_mut(widget).widget {
            Widget::Element(element) => element,
            Widget::Text(_) => panic!("widget {widget} is a text widget"),
        }
    }

    fn allocate(&mut self, widget: Widget) -> WidgetId {
        self.mutations += 1;
        let id = self.slots.len();
        self.slots.push(Some(Slot {
            widget,
            parent: None,
        }));
        id
    }

    fn detach(&mut self, widget: WidgetId) {
        if let Some(parent) = self.slot(widget).parent {
            self.element_mut(parent).children.retain(|c| *c != widget);
            self.slot_mut(widget).parent = None;
        }
    }

    fn discard(&mut self, widget: WidgetId) {
        let children = match &self.slot(widget).widget {
            Widget::Element(element) => element.children.clone(),
            Widget::Text(_) => Vec::new(),
        };
        for child in children {
            self.discard(child);
        }
        self.slots[widget] = None;
    }

    /// Looks the handler up, releases all borrows, and invokes it, so
    /// a state setter fired by the handler can re-enter the host.
    pub fn dispatch(host: &Rc<RefCell<MemoryHost>>, widget: WidgetId, event: Event) {
        let handler = host
            .borrow()
            .element(widget)
            .listeners
            .get(&event.name)
            .cloned();
        match handler {
            Some(handler) => handler.call(&event),
            None => panic!("widget {widget} has no {} listener", event.name),
        }
    }

    /// Live widgets currently in the slab.
    pub fn widget_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// First element widget (in allocation order) with the given tag.
    pub fn find(&self, tag: &str) -> Option<WidgetId> {
        self.slots.iter().enumerate().find_map(|(id, slot)| {
            matches!(slot, Some(Slot { widget: Widget::Element(element), .. }) if element.tag == tag)
                .then_some(id)
        })
    }

    /// Concatenated text content of the subtree under `widget`.
    pub fn text_of(&self, widget: WidgetId) -> String {
        match &self.slot(widget).widget {
            Widget::Text(text) => text.clone(),
            Widget::Element(element) => element
                .children
                .iter()
                .map(|child| self.text_of(*child))
                .collect(),
        }
    }

    pub fn attr(&self, widget: WidgetId, name: &str) -> Option<String> {
        self.element(widget).attrs.get(name).cloned()
    }

    pub fn value_of(&self, widget: WidgetId) -> String {
        self.element(widget).value.clone()
    }

    pub fn checked_of(&self, widget: WidgetId) -> bool {
        self.element(widget).checked
    }

    pub fn markup_of(&self, widget: WidgetId) -> String {
        self.element(widget).markup.clone()
    }

    pub fn style_of(&self, widget: WidgetId) -> String {
        self.element(widget).style.clone()
    }

    pub fn has_listener(&self, widget: WidgetId, event: &str) -> bool {
        self.element(widget).listeners.contains_key(event)
    }

    pub fn children(&self, widget: WidgetId) -> Vec<WidgetId> {
        self.element(widget).children.clone()
    }

    /// Markup-ish dump of the subtree under `widget`, attributes in
    /// sorted order, for literal end-to-end assertions.
    pub fn render(&self, widget: WidgetId) -> String {
        let mut out = String::new();
        self.render_into(&mut out, widget);
        out
    }

    /// Like [`MemoryHost::render`] but skipping the container itself.
    pub fn render_children(&self, widget: WidgetId) -> String {
        let mut out = String::new();
        for child in &self.element(widget).children {
            self.render_into(&mut out, *child);
        }
        out
    }

    fn render_into(&self, out: &mut String, widget: WidgetId) {
        match &self.slot(widget).widget {
            Widget::Text(text) => out.push_str(text),
            Widget::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                let mut names: Vec<&String> = element.attrs.keys().collect();
                names.sort();
                for name in names {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&element.attrs[name]);
                    out.push('"');
                }
                out.push('>');
                for child in &element.children {
                    self.render_into(out, *child);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

impl Host for MemoryHost {
    fn create_text(&mut self, text: &str) -> WidgetId {
        self.allocate(Widget::Text(text.to_owned()))
    }

    fn create_element(&mut self, tag: &str) -> WidgetId {
        self.allocate(Widget::Element(ElementWidget {
            tag: tag.to_owned(),
            ..ElementWidget::default()
        }))
    }

    fn set_text(&mut self, widget: WidgetId, text: &str) {
        self.mutations += 1;
        match &mut self.slot_mut(widget).widget {
            Widget::Text(stored) => *stored = text.to_owned(),
            Widget::Element(_) => panic!("widget {widget} is not a text widget"),
        }
    }

    fn set_attribute(&mut self, widget: WidgetId, name: &str, value: &str) {
        self.mutations += 1;
        self.element_mut(widget)
            .attrs
            .insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&mut self, widget: WidgetId, name: &str) {
        self.mutations += 1;
        self.element_mut(widget).attrs.remove(name);
    }

    fn set_value(&mut self, widget: WidgetId, value: &str) {
        self.mutations += 1;
        self.element_mut(widget).value = value.to_owned();
    }

    fn set_checked(&mut self, widget: WidgetId, checked: bool) {
        self.mutations += 1;
        self.element_mut(widget).checked = checked;
    }

    fn set_markup(&mut self, widget: WidgetId, markup: &str) {
        self.mutations += 1;
        self.element_mut(widget).markup = markup.to_owned();
    }

    fn set_style(&mut self, widget: WidgetId, css: &str) {
        self.mutations += 1;
        self.element_mut(widget).style = css.to_owned();
    }

    fn add_listener(&mut self, widget: WidgetId, event: &str, handler: EventHandler) {
        self.mutations += 1;
        self.element_mut(widget)
            .listeners
            .insert(event.to_owned(), handler);
    }

    fn remove_listener(&mut self, widget: WidgetId, event: &str) {
        self.mutations += 1;
        self.element_mut(widget).listeners.remove(event);
    }

    fn parent(&self, widget: WidgetId) -> Option<WidgetId> {
        self.slot(widget).parent
    }

    fn next_sibling(&self, widget: WidgetId) -> Option<WidgetId> {
        let parent = self.slot(widget).parent?;
        let siblings = &self.element(parent).children;
        let index = siblings.iter().position(|c| *c == widget)?;
        siblings.get(index + 1).copied()
    }

    fn insert_before(&mut self, parent: WidgetId, widget: WidgetId, before: Option<WidgetId>) {
        self.mutations += 1;
        self.detach(widget);
        self.slot_mut(widget).parent = Some(parent);
        let children = &mut self.element_mut(parent).children;
        match before {
            Some(before) => {
                let index = children
                    .iter()
                    .position(|c| *c == before)
                    .unwrap_or_else(|| panic!("widget {before} is not a child of {parent}"));
                children.insert(index, widget);
            }
            None => children.push(widget),
        }
    }

    fn remove(&mut self, widget: WidgetId) {
        self.mutations += 1;
        self.detach(widget);
        self.discard(widget);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_markup() {
        let mut host = MemoryHost::new();
        let root = host.create_root();
        let list = host.create_element("ul");
        let item = host.create_element("li");
        let text = host.create_text("one");
        host.set_attribute(item, "class", "row");
        host.insert_before(root, list, None);
        host.insert_before(list, item, None);
        host.insert_before(item, text, None);
        assert_eq!(
            host.render_children(root),
            "<ul><li class=\"row\">one</li></ul>"
        );
        assert_eq!(host.text_of(root), "one");
    }

    #[test]
    fn remove_discards_the_subtree() {
        let mut host = MemoryHost::new();
        let root = host.create_root();
        let div = host.create_element("div");
        let text = host.create_text("x");
        host.insert_before(root, div, None);
        host.insert_before(div, text, None);
        assert_eq!(host.widget_count(), 3);
        host.remove(div);
        assert_eq!(host.widget_count(), 1);
        assert_eq!(host.render_children(root), "");
    }

    #[test]
    #[should_panic(expected = "unknown widget")]
    fn stale_handles_panic() {
        let mut host = MemoryHost::new();
        let root = host.create_root();
        host.remove(root);
        host.set_attribute(root, "class", "gone");
    }
}
