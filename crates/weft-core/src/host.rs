//! The boundary between the engine and the platform it renders onto.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::EventHandler;

/// Handle to one live widget owned by the host backend.
pub type WidgetId = usize;

/// Shared handle the engine and state setters keep to the host.
pub type SharedHost = Rc<RefCell<dyn Host>>;

/// Insertion point inside a parent widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub parent: WidgetId,
    /// Widget the inserted content must end up immediately before;
    /// `None` appends at the end of the parent.
    pub before: Option<WidgetId>,
}

/// The primitive capability set a rendering surface must provide.
///
/// Hosts may assume every widget id they are handed was produced by
/// themselves and is still alive, and are free to panic otherwise; the
/// engine has no recovery path for a failed host mutation.
pub trait Host {
    fn create_text(&mut self, text: &str) -> WidgetId;
    fn create_element(&mut self, tag: &str) -> WidgetId;

    fn set_text(&mut self, widget: WidgetId, text: &str);
    fn set_attribute(&mut self, widget: WidgetId, name: &str, value: &str);
    fn remove_attribute(&mut self, widget: WidgetId, name: &str);
    /// Input value property (not reflected as a plain attribute).
    fn set_value(&mut self, widget: WidgetId, value: &str);
    /// Checked boolean property.
    fn set_checked(&mut self, widget: WidgetId, checked: bool);
    /// Raw markup injection.
    fn set_markup(&mut self, widget: WidgetId, markup: &str);
    fn set_style(&mut self, widget: WidgetId, css: &str);

    fn add_listener(&mut self, widget: WidgetId, event: &str, handler: EventHandler);
    fn remove_listener(&mut self, widget: WidgetId, event: &str);

    fn parent(&self, widget: WidgetId) -> Option<WidgetId>;
    fn next_sibling(&self, widget: WidgetId) -> Option<WidgetId>;
    /// Places `widget` inside `parent` immediately before `before`,
    /// appending when `before` is `None`. Detaches from any previous
    /// parent first.
    fn insert_before(&mut self, parent: WidgetId, widget: WidgetId, before: Option<WidgetId>);
    /// Detaches `widget` (and with it its subtree) from the surface.
    fn remove(&mut self, widget: WidgetId);
}
