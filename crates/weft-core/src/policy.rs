//! Props-equality policies deciding whether a component re-renders.

use crate::vnode::Props;

/// Decides whether a component instance may skip re-invocation: when
/// the next props are equivalent to the previous ones the stored result
/// is left untouched.
pub trait PropsPolicy {
    fn equivalent(&self, next: &Props, prev: &Props) -> bool;
}

/// Default policy: shallow, one-level comparison. Children are never
/// trusted to be stable, so a non-empty children list on either side
/// forces a re-render. Deeply-equal but differently-referenced handler
/// values count as different.
pub struct ShallowProps;

impl PropsPolicy for ShallowProps {
    fn equivalent(&self, next: &Props, prev: &Props) -> bool {
        if !next.children.is_empty() || !prev.children.is_empty() {
            return false;
        }
        for (name, value) in next.iter() {
            if prev.get(name) != Some(value) {
                return false;
            }
        }
        for (name, _) in prev.iter() {
            if !next.contains(name) {
                return false;
            }
        }
        true
    }
}

/// Never equivalent: the component re-renders on every pass.
pub struct NeverEqual;

impl PropsPolicy for NeverEqual {
    fn equivalent(&self, _next: &Props, _prev: &Props) -> bool {
        false
    }
}
