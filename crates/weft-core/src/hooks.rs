//! Per-instance hook slots and the execution context they live behind.
//!
//! The hook cursor is not hidden global state: every component render
//! receives an explicit [`Scope`], valid only for that invocation, and
//! all hook calls go through it. Hook calls are positional: the N-th
//! call of every render of an instance addresses the N-th slot, so the
//! number and order of hook calls must not vary between renders. A slot
//! read by a different hook kind than the one that created it panics
//! instead of silently misaligning the slots that follow.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

use log::trace;

use crate::host::{Anchor, SharedHost, WidgetId};
use crate::real::RealNode;
use crate::update::update_all;
use crate::value::{Deps, Value};
use crate::vnode::VNode;

/// A stable mutable cell: the [`Scope::use_ref`] payload and the target
/// of an element `ref` binding.
pub struct Ref<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Ref<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow())
    }
}

impl<T: Clone> Ref<T> {
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }
}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ref")
    }
}

/// Cell an element stores its live widget into.
pub type NodeRef = Ref<Option<WidgetId>>;

pub(crate) type CleanupFn = Box<dyn FnOnce()>;

/// One positional persistent storage cell of a component instance.
pub(crate) enum HookSlot {
    State(Box<dyn Any>),
    Effect {
        deps: Deps,
        cleanup: Option<CleanupFn>,
    },
    Memo {
        args: Deps,
        value: Box<dyn Any>,
    },
}

impl HookSlot {
    fn kind(&self) -> &'static str {
        match self {
            HookSlot::State(_) => "state",
            HookSlot::Effect { .. } => "effect",
            HookSlot::Memo { .. } => "memo",
        }
    }
}

/// Return value of an effect: nothing, or a cleanup to run before the
/// effect re-runs and when the instance unmounts.
pub struct EffectResult {
    cleanup: Option<CleanupFn>,
}

impl EffectResult {
    pub fn none() -> Self {
        Self { cleanup: None }
    }

    pub fn on_dispose(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }
}

fn deps_equal(next: &[Value], prev: &[Value]) -> bool {
    next.len() == prev.len() && next.iter().zip(prev).all(|(a, b)| a == b)
}

/// Execution context of one component invocation. Only exists for the
/// duration of [`execute`]; holding hook calls to that window is what
/// keeps the slot cursor valid.
pub struct Scope {
    host: SharedHost,
    node: RealNode,
    cursor: usize,
}

impl Scope {
    fn next_index(&mut self) -> usize {
        let index = self.cursor;
        self.cursor += 1;
        index
    }

    /// Reads (initializing on first call) the next state slot and
    /// returns its value plus a setter that writes the slot and
    /// synchronously re-renders this instance.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, Setter<T>) {
        let index = self.next_index();
        let value = {
            let mut inner = self.node.borrow_mut();
            let slots = &mut inner.as_component_mut().slots;
            if index == slots.len() {
                slots.push(HookSlot::State(Box::new(initial)));
            }
            match &slots[index] {
                HookSlot::State(stored) => stored
                    .downcast_ref::<T>()
                    .unwrap_or_else(|| panic!("state slot {index} holds a different type"))
                    .clone(),
                other => panic!(
                    "hook call {index} is use_state but the slot is {}",
                    other.kind()
                ),
            }
        };
        (
            value,
            Setter {
                host: self.host.clone(),
                node: self.node.clone(),
                index,
                _value: PhantomData,
            },
        )
    }

    /// Runs `effect` when `deps` differs elementwise from the previous
    /// render (or on the first one), running the previous cleanup
    /// first.
    pub fn use_effect(&mut self, deps: Deps, effect: impl FnOnce() -> EffectResult) {
        let index = self.next_index();
        let (run, prior) = {
            let mut inner = self.node.borrow_mut();
            let slots = &mut inner.as_component_mut().slots;
            if index == slots.len() {
                slots.push(HookSlot::Effect {
                    deps: deps.clone(),
                    cleanup: None,
                });
                (true, None)
            } else {
                match &mut slots[index] {
                    HookSlot::Effect {
                        deps: stored,
                        cleanup,
                    } => {
                        if deps_equal(&deps, stored) {
                            (false, None)
                        } else {
                            *stored = deps;
                            (true, cleanup.take())
                        }
                    }
                    other => panic!(
                        "hook call {index} is use_effect but the slot is {}",
                        other.kind()
                    ),
                }
            }
        };
        if !run {
            return;
        }
        if let Some(cleanup) = prior {
            cleanup();
        }
        let result = effect();
        let mut inner = self.node.borrow_mut();
        match &mut inner.as_component_mut().slots[index] {
            HookSlot::Effect { cleanup, .. } => *cleanup = result.cleanup,
            _ => unreachable!(),
        }
    }

    /// Recomputes and caches `compute` only when `args` differs
    /// elementwise from the previous render.
    pub fn use_memo<T: Clone + 'static>(&mut self, args: Deps, compute: impl FnOnce() -> T) -> T {
        let index = self.next_index();
        let cached = {
            let mut inner = self.node.borrow_mut();
            let slots = &mut inner.as_component_mut().slots;
            if index == slots.len() {
                None
            } else {
                match &slots[index] {
                    HookSlot::Memo {
                        args: stored,
                        value,
                    } => {
                        if deps_equal(&args, stored) {
                            Some(
                                value
                                    .downcast_ref::<T>()
                                    .unwrap_or_else(|| {
                                        panic!("memo slot {index} holds a different type")
                                    })
                                    .clone(),
                            )
                        } else {
                            None
                        }
                    }
                    other => panic!(
                        "hook call {index} is use_memo but the slot is {}",
                        other.kind()
                    ),
                }
            }
        };
        if let Some(value) = cached {
            return value;
        }
        let value = compute();
        let mut inner = self.node.borrow_mut();
        let slots = &mut inner.as_component_mut().slots;
        let slot = HookSlot::Memo {
            args,
            value: Box::new(value.clone()),
        };
        if index == slots.len() {
            slots.push(slot);
        } else {
            slots[index] = slot;
        }
        value
    }

    /// [`Scope::use_memo`] specialized to always return the same
    /// mutable cell.
    pub fn use_ref<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Ref<T> {
        self.use_memo(Vec::new(), || Ref::new(init()))
    }
}

/// Writes a new value into its state slot and synchronously re-renders
/// the owning instance.
pub struct Setter<T> {
    host: SharedHost,
    node: RealNode,
    index: usize,
    _value: PhantomData<fn(T)>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
            node: self.node.clone(),
            index: self.index,
            _value: PhantomData,
        }
    }
}

impl<T: 'static> Setter<T> {
    pub fn set(&self, value: T) {
        {
            let mut inner = self.node.borrow_mut();
            match &mut inner.as_component_mut().slots[self.index] {
                HookSlot::State(stored) => *stored = Box::new(value),
                other => panic!("setter bound to a {} slot", other.kind()),
            }
        }
        rerender(&self.host, &self.node);
    }
}

/// Invokes the instance's render function with a fresh slot cursor and
/// normalizes the result into a node list.
pub(crate) fn execute(host: &SharedHost, node: &RealNode) -> Vec<VNode> {
    let (component, props) = {
        let inner = node.borrow();
        let real = inner.as_component();
        (real.component.clone(), real.props.clone())
    };
    let mut scope = Scope {
        host: host.clone(),
        node: node.clone(),
        cursor: 0,
    };
    component.render(&mut scope, &props).into_nodes()
}

/// Targeted re-render after a state write: re-executes the instance
/// and reconciles the new result against the previous one, re-anchored
/// right after the last live widget of the previous result, so the
/// insertion cursor starts past everything being re-placed. A result
/// that rendered no widget at all is reconciled without re-insertion.
pub(crate) fn rerender(host: &SharedHost, node: &RealNode) {
    trace!("re-rendering {node:?}");
    let next = execute(host, node);
    let prev = {
        let mut inner = node.borrow_mut();
        mem::take(&mut inner.as_component_mut().result)
    };
    let anchor = prev
        .iter()
        .rev()
        .find_map(RealNode::last_widget)
        .and_then(|widget| {
            let surface = host.borrow();
            surface.parent(widget).map(|parent| Anchor {
                parent,
                before: surface.next_sibling(widget),
            })
        });
    let result = update_all(host, next, prev, anchor);
    node.borrow_mut().as_component_mut().result = result;
}

/// Runs stored effect cleanups in slot order; called on unmount.
pub(crate) fn cleanup(node: &RealNode) {
    let cleanups: Vec<CleanupFn> = {
        let mut inner = node.borrow_mut();
        inner
            .as_component_mut()
            .slots
            .iter_mut()
            .filter_map(|slot| match slot {
                HookSlot::Effect { cleanup, .. } => cleanup.take(),
                _ => None,
            })
            .collect()
    };
    for cleanup in cleanups {
        cleanup();
    }
}
