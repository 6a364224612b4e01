//! The node matcher: assigns previous-render real nodes to next-render
//! virtual nodes.

use crate::collections::Map;
use crate::fifo::Fifo;
use crate::host::SharedHost;
use crate::mount::unmount;
use crate::real::{Mounted, RealNode};
use crate::vnode::{Key, VNode};

enum Bucket {
    Text,
    Tag(String),
    Component(usize),
}

/// Built from the previous ordered child list of one parent. Keyed
/// nodes live in an exact-match table; unkeyed nodes are bucketed per
/// identity into FIFOs, with all text nodes pooled in a single FIFO.
/// Whatever is never claimed is unmounted by [`NodeStore::sweep`], so
/// every previous node gets a disposition.
pub(crate) struct NodeStore {
    by_key: Map<Key, RealNode>,
    by_tag: Map<String, Fifo<RealNode>>,
    by_component: Map<usize, Fifo<RealNode>>,
    texts: Fifo<RealNode>,
}

impl NodeStore {
    pub(crate) fn new(host: &SharedHost, prev: Vec<RealNode>) -> Self {
        let mut store = Self {
            by_key: Map::default(),
            by_tag: Map::default(),
            by_component: Map::default(),
            texts: Fifo::new(),
        };
        for node in prev {
            store.add(host, node);
        }
        store
    }

    fn add(&mut self, host: &SharedHost, node: RealNode) {
        if let Some(key) = node.key() {
            // A duplicate key among previous siblings is resolved now,
            // not deferred to sweep: the earlier occupant goes away.
            if let Some(evicted) = self.by_key.insert(key, node) {
                unmount(host, &evicted);
            }
            return;
        }
        let bucket = match &*node.borrow() {
            Mounted::Text(_) => Bucket::Text,
            Mounted::Element(element) => Bucket::Tag(element.tag.clone()),
            Mounted::Component(component) => Bucket::Component(component.component.id()),
        };
        match bucket {
            Bucket::Text => self.texts.push(node),
            Bucket::Tag(tag) => self.by_tag.entry(tag).or_default().push(node),
            Bucket::Component(id) => self.by_component.entry(id).or_default().push(node),
        }
    }

    /// Which previous node (if any) should absorb `next`: oldest text
    /// node for text, exact key match for keyed nodes, oldest node of
    /// the same identity otherwise. `None` forces creation.
    pub(crate) fn claim(&mut self, next: &VNode) -> Option<RealNode> {
        if let VNode::Text(_) = next {
            return self.texts.shift();
        }
        if let Some(key) = next.key() {
            return self.by_key.remove(&key);
        }
        match next {
            VNode::Element(element) => self.by_tag.get_mut(&element.tag).and_then(Fifo::shift),
            VNode::Component(component) => self
                .by_component
                .get_mut(&component.component.id())
                .and_then(Fifo::shift),
            VNode::Text(_) => unreachable!(),
        }
    }

    /// Unmounts every previous node never claimed.
    pub(crate) fn sweep(mut self, host: &SharedHost) {
        for (_, node) in self.by_key.drain() {
            unmount(host, &node);
        }
        for node in self.texts.drain() {
            unmount(host, &node);
        }
        for (_, mut bucket) in self.by_tag.drain() {
            for node in bucket.drain() {
                unmount(host, &node);
            }
        }
        for (_, mut bucket) in self.by_component.drain() {
            for node in bucket.drain() {
                unmount(host, &node);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
