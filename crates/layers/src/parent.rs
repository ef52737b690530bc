use scene::{LayerId, ParentRef};

/// One ancestor of a layer node in the UI tree, as seen by parent resolution.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UiAncestor {
    /// A layer-group node that has mounted its group.
    LayerGroup(LayerId),
    /// Any node that does not own a layer group.
    Other,
}

/// Parent for a node whose ancestors are given nearest first: the nearest
/// layer-group ancestor, else the root map.
///
/// Recompute on every render; a node can gain or lose a wrapping group
/// without being remounted.
pub fn resolve_parent<'a, I>(ancestors: I) -> ParentRef
where
    I: IntoIterator<Item = &'a UiAncestor>,
{
    ancestors
        .into_iter()
        .find_map(|a| match a {
            UiAncestor::LayerGroup(id) => Some(ParentRef::Group(*id)),
            UiAncestor::Other => None,
        })
        .unwrap_or(ParentRef::Root)
}

/// Ancestry stack maintained while walking the UI tree top-down.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParentScope {
    path: Vec<UiAncestor>,
}

impl ParentScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, node: UiAncestor) {
        self.path.push(node);
    }

    pub fn enter_group(&mut self, group: LayerId) {
        self.enter(UiAncestor::LayerGroup(group));
    }

    pub fn exit(&mut self) -> Option<UiAncestor> {
        self.path.pop()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Parent for a node rendered at the current position.
    pub fn current(&self) -> ParentRef {
        resolve_parent(self.path.iter().rev())
    }
}
