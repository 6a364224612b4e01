//! Virtual nodes and the `h` constructor that builds them.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::thread_local;

use crate::collections::Map;
use crate::hooks::{NodeRef, Scope};
use crate::policy::{PropsPolicy, ShallowProps};
use crate::value::{Event, EventHandler, Value};

/// Caller-supplied identity hint overriding positional matching.
pub type Key = u64;

/// Hashes any hashable value into a [`Key`].
pub fn key_of<K: Hash>(key: &K) -> Key {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

pub type AttrMap = Map<String, Value>;

/// Render function: receives the hook scope of the executing instance
/// and the instance's current props.
pub type RenderFn = dyn Fn(&mut Scope, &Props) -> Rendered;

struct ComponentInner {
    name: &'static str,
    render: Box<RenderFn>,
    policy: Box<dyn PropsPolicy>,
}

/// A component: a render function with a stable identity.
///
/// Two `Component` values are the same logical component iff they are
/// clones of one another, so define a component once and clone the
/// handle wherever it is used.
#[derive(Clone)]
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl Component {
    pub fn new(
        name: &'static str,
        render: impl Fn(&mut Scope, &Props) -> Rendered + 'static,
    ) -> Self {
        Self::with_policy(name, render, ShallowProps)
    }

    /// Like [`Component::new`] with an explicit re-render policy
    /// replacing the default shallow props comparison.
    pub fn with_policy(
        name: &'static str,
        render: impl Fn(&mut Scope, &Props) -> Rendered + 'static,
        policy: impl PropsPolicy + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ComponentInner {
                name,
                render: Box::new(render),
                policy: Box::new(policy),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }

    pub(crate) fn render(&self, scope: &mut Scope, props: &Props) -> Rendered {
        (self.inner.render)(scope, props)
    }

    pub(crate) fn policy(&self) -> &dyn PropsPolicy {
        self.inner.policy.as_ref()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.inner.name)
    }
}

thread_local! {
    static FRAGMENT: Component =
        Component::new("Fragment", |_, props| Rendered::Nodes(props.children.clone()));
}

/// The pass-through component: renders to its own children, letting
/// grouped siblings reconcile as if they were flattened into the
/// parent. All calls return the same identity.
pub fn fragment() -> Component {
    FRAGMENT.with(Component::clone)
}

/// Component props: a value map plus the children list.
#[derive(Clone, Debug, Default)]
pub struct Props {
    values: AttrMap,
    pub children: Vec<VNode>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(Value::Str(text)) => Some(text),
            _ => None,
        }
    }

    pub fn num(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(Value::Num(number)) => Some(*number),
            _ => None,
        }
    }

    /// Non-children props.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Normalized component output.
#[derive(Clone, Debug)]
pub enum Rendered {
    Nothing,
    Node(VNode),
    Nodes(Vec<VNode>),
}

impl Rendered {
    pub(crate) fn into_nodes(self) -> Vec<VNode> {
        match self {
            Rendered::Nothing => Vec::new(),
            Rendered::Node(node) => vec![node],
            Rendered::Nodes(nodes) => nodes,
        }
    }
}

impl From<VNode> for Rendered {
    fn from(node: VNode) -> Self {
        Rendered::Node(node)
    }
}

impl From<Vec<VNode>> for Rendered {
    fn from(nodes: Vec<VNode>) -> Self {
        Rendered::Nodes(nodes)
    }
}

impl From<Option<VNode>> for Rendered {
    fn from(node: Option<VNode>) -> Self {
        match node {
            Some(node) => Rendered::Node(node),
            None => Rendered::Nothing,
        }
    }
}

/// Declarative description of desired UI state, rebuilt every render.
#[derive(Clone, Debug)]
pub enum VNode {
    Text(String),
    Element(VElement),
    Component(VComponent),
}

#[derive(Clone, Debug)]
pub struct VElement {
    pub tag: String,
    pub key: Option<Key>,
    pub node_ref: Option<NodeRef>,
    pub attrs: AttrMap,
    pub children: Vec<VNode>,
}

#[derive(Clone, Debug)]
pub struct VComponent {
    pub component: Component,
    pub key: Option<Key>,
    pub props: Props,
}

impl VNode {
    pub fn key(&self) -> Option<Key> {
        match self {
            VNode::Text(_) => None,
            VNode::Element(element) => element.key,
            VNode::Component(component) => component.key,
        }
    }
}

impl From<&str> for VNode {
    fn from(content: &str) -> Self {
        VNode::Text(content.to_owned())
    }
}

impl From<String> for VNode {
    fn from(content: String) -> Self {
        VNode::Text(content)
    }
}

/// What [`h`] is constructing: a tag element or a component.
pub enum NodeName {
    Tag(String),
    Component(Component),
}

impl From<&str> for NodeName {
    fn from(tag: &str) -> Self {
        NodeName::Tag(tag.to_owned())
    }
}

impl From<String> for NodeName {
    fn from(tag: String) -> Self {
        NodeName::Tag(tag)
    }
}

impl From<Component> for NodeName {
    fn from(component: Component) -> Self {
        NodeName::Component(component)
    }
}

impl From<&Component> for NodeName {
    fn from(component: &Component) -> Self {
        NodeName::Component(component.clone())
    }
}

/// One entry of the attribute list handed to [`h`]. `key` and `ref`
/// are reserved markers carried as their own variants, so [`h`] can
/// extract them before the remaining attributes are stored.
pub enum Attr {
    Pair(String, Value),
    Key(Key),
    Ref(NodeRef),
}

pub fn attr(name: impl Into<String>, value: impl Into<Value>) -> Attr {
    Attr::Pair(name.into(), value.into())
}

/// Binds an event listener; `on("click", ..)` becomes the `onclick`
/// attribute.
pub fn on(event: &str, handler: impl Fn(&Event) + 'static) -> Attr {
    Attr::Pair(
        format!("on{event}"),
        Value::Handler(EventHandler::new(handler)),
    )
}

pub fn keyed<K: Hash>(key: K) -> Attr {
    Attr::Key(key_of(&key))
}

/// Asks the engine to store the element's live widget into `target`
/// whenever the element is created or updated.
pub fn bind_ref(target: &NodeRef) -> Attr {
    Attr::Ref(target.clone())
}

/// Child-list entry; nested lists are flattened by [`h`].
pub enum Child {
    Node(VNode),
    List(Vec<Child>),
    Empty,
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(content: &str) -> Self {
        Child::Node(VNode::from(content))
    }
}

impl From<String> for Child {
    fn from(content: String) -> Self {
        Child::Node(VNode::from(content))
    }
}

impl From<Vec<Child>> for Child {
    fn from(children: Vec<Child>) -> Self {
        Child::List(children)
    }
}

impl From<Vec<VNode>> for Child {
    fn from(nodes: Vec<VNode>) -> Self {
        Child::List(nodes.into_iter().map(Child::Node).collect())
    }
}

impl From<Option<Child>> for Child {
    fn from(child: Option<Child>) -> Self {
        child.unwrap_or(Child::Empty)
    }
}

/// Builds a child list: `nodes![h("li", [], []), "text", inner_list]`.
#[macro_export]
macro_rules! nodes {
    ($($child:expr),* $(,)?) => {
        vec![$($crate::Child::from($child)),*]
    };
}

fn flatten(children: impl IntoIterator<Item = Child>, out: &mut Vec<VNode>) {
    for child in children {
        match child {
            Child::Node(node) => out.push(node),
            Child::List(list) => flatten(list, out),
            Child::Empty => {}
        }
    }
}

/// Text leaf constructor.
pub fn text(content: impl Into<String>) -> VNode {
    VNode::Text(content.into())
}

/// Virtual-node constructor: name, attributes, children.
pub fn h(
    name: impl Into<NodeName>,
    attrs: impl IntoIterator<Item = Attr>,
    children: impl IntoIterator<Item = Child>,
) -> VNode {
    let mut key = None;
    let mut node_ref = None;
    let mut values = AttrMap::default();
    for entry in attrs {
        match entry {
            Attr::Pair(name, value) => {
                values.insert(name, value);
            }
            Attr::Key(k) => key = Some(k),
            Attr::Ref(target) => node_ref = Some(target),
        }
    }
    let mut flat = Vec::new();
    flatten(children, &mut flat);
    match name.into() {
        NodeName::Tag(tag) => VNode::Element(VElement {
            tag,
            key,
            node_ref,
            attrs: values,
            children: flat,
        }),
        NodeName::Component(component) => VNode::Component(VComponent {
            component,
            key,
            props: Props {
                values,
                children: flat,
            },
        }),
    }
}

#[cfg(test)]
#[path = "tests/vnode_tests.rs"]
mod tests;
