//! Core runtime for weft, a small declarative UI rendering library.
//!
//! Application code builds lightweight virtual-node trees with [`h`];
//! [`mount`] reconciles them against the previously rendered tree and a
//! [`Host`] rendering surface, performing the minimal set of mutations
//! needed to bring the surface in sync. Component-local hook state
//! ([`Scope::use_state`] and friends) survives re-renders because it is
//! attached to the mounted instance, not to anything the application
//! controls.

pub mod collections;
pub mod fifo;
mod hooks;
mod host;
mod mount;
mod policy;
mod real;
mod store;
mod update;
mod value;
mod vnode;

pub use hooks::{EffectResult, NodeRef, Ref, Scope, Setter};
pub use host::{Anchor, Host, SharedHost, WidgetId};
pub use mount::{mount, unmount};
pub use policy::{NeverEqual, PropsPolicy, ShallowProps};
pub use real::RealNode;
pub use value::{Deps, Event, EventHandler, Style, Value};
pub use vnode::{
    attr, bind_ref, fragment, h, key_of, keyed, on, text, Attr, AttrMap, Child, Component, Key,
    NodeName, Props, Rendered, VComponent, VElement, VNode,
};
