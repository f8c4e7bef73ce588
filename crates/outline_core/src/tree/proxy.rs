//! Transclusion: proxies and their wrapper children.
//!
//! # Responsibility
//! - Create proxies and keep each proxy's wrapper list in step with the
//!   perceived children of its target.
//! - Find proxy targets that a removal would leave dangling.
//!
//! # Invariants
//! - A proxy never targets itself.
//! - Wrapper `i` of a proxy targets perceived child `i` of its target.
//! - Rebuilding reuses the wrapper already pointing at a surviving child.

use super::EditResult;
use crate::model::document::Document;
use crate::model::node::{Node, NodeId};
use log::debug;
use std::collections::{HashMap, HashSet};

impl Document {
    /// Creates a detached proxy that transcludes `target`.
    pub fn create_proxy(&mut self, target: NodeId) -> EditResult<NodeId> {
        self.ensure_exists(target)?;
        Ok(self.insert(Node::proxy(target, false)))
    }

    /// Brings the wrapper list of `proxy` in line with its target's perceived
    /// children. Returns whether the list was rebuilt.
    ///
    /// Proxy targets are refreshed first, innermost first, so chains of
    /// proxies see up-to-date wrappers.
    pub fn refresh_wrappers(&mut self, proxy: NodeId) -> bool {
        let mut chain = vec![proxy];
        let mut seen = HashSet::from([proxy]);
        while let Some(target) = chain.last().and_then(|last| self.proxy_target(*last)) {
            if !self.is_proxy(target) || !seen.insert(target) {
                break;
            }
            chain.push(target);
        }

        let mut rebuilt = false;
        for id in chain.into_iter().rev() {
            rebuilt = self.rebuild_wrappers(id);
        }
        rebuilt
    }

    fn rebuild_wrappers(&mut self, proxy: NodeId) -> bool {
        let Some(target) = self.proxy_target(proxy) else {
            return false;
        };
        let wanted = self.children(target).to_vec();
        let current = self.children(proxy).to_vec();
        let current_targets: Vec<NodeId> = current
            .iter()
            .filter_map(|wrapper| self.proxy_target(*wrapper))
            .collect();
        if current_targets == wanted {
            return false;
        }

        let mut reusable: HashMap<NodeId, NodeId> = current
            .iter()
            .filter_map(|wrapper| self.proxy_target(*wrapper).map(|t| (t, *wrapper)))
            .collect();
        let mut wrappers = Vec::with_capacity(wanted.len());
        for child in wanted {
            let wrapper = reusable
                .remove(&child)
                .unwrap_or_else(|| self.insert(Node::proxy(child, true)));
            if let Some(node) = self.node_mut(wrapper) {
                node.parent = Some(proxy);
            }
            wrappers.push(wrapper);
        }
        debug!(
            "event=proxy_refresh module=tree status=ok proxy={} wrappers={}",
            proxy,
            wrappers.len()
        );
        if let Some(link) = self.node_mut(proxy).and_then(Node::as_proxy_mut) {
            link.wrappers = wrappers;
        }
        true
    }

    /// Refreshes every proxy whose children the linearizer will visit.
    pub fn refresh_visible_proxies(&mut self) {
        let mut stack = self.children(self.root()).to_vec();
        while let Some(id) = stack.pop() {
            if !self.is_expanded(id) {
                continue;
            }
            if self.is_proxy(id) {
                self.refresh_wrappers(id);
            }
            stack.extend(self.children(id).iter().copied());
        }
    }

    /// A node owned by `id`'s subtree that is targeted by an attached proxy
    /// living outside that subtree, if any.
    pub fn live_proxy_target_within(&self, id: NodeId) -> Option<NodeId> {
        let subtree: HashSet<NodeId> = self.owned_subtree(id).into_iter().collect();
        subtree.iter().copied().find(|candidate| {
            self.proxies_targeting(*candidate)
                .iter()
                .any(|proxy| !subtree.contains(proxy) && self.is_attached(*proxy))
        })
    }

    /// Target of a proxy owned by `id`'s subtree that is neither attached
    /// nor inside that subtree, if any. Attaching such a subtree would leave
    /// a proxy pointing outside the saved tree.
    pub fn dangling_target_within(&self, id: NodeId) -> Option<NodeId> {
        let subtree: HashSet<NodeId> = self.owned_subtree(id).into_iter().collect();
        subtree.iter().find_map(|candidate| {
            let target = self.node(*candidate)?.as_proxy()?.target;
            (!subtree.contains(&target) && !self.is_attached(target)).then_some(target)
        })
    }

    /// The node a wrapper stands for, following wrappers only; placed
    /// proxies and items map to themselves.
    pub fn unwrap_derived(&self, id: NodeId) -> NodeId {
        let mut current = id;
        for _ in 0..self.arena_len() {
            match self.node(current).and_then(Node::as_proxy) {
                Some(link) if link.derived => current = link.target,
                _ => break,
            }
        }
        current
    }

    /// Placed proxies (not wrappers) whose target is `target`.
    pub fn proxies_targeting(&self, target: NodeId) -> Vec<NodeId> {
        self.node_ids()
            .filter(|id| {
                self.node(*id)
                    .and_then(Node::as_proxy)
                    .is_some_and(|link| !link.derived && link.target == target)
            })
            .collect()
    }
}
