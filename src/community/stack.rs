//! LIFO worklist of vertex groups.

/// A group of original-graph vertex indices.
pub type Group = Vec<usize>;

/// Last-in, first-out collection of groups.
///
/// Used both for groups still waiting to be divided and for finished
/// communities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupStack {
    groups: Vec<Group>,
}

impl GroupStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a group on top.
    pub fn push(&mut self, group: Group) {
        self.groups.push(group);
    }

    /// Pop the most recently pushed group.
    pub fn pop(&mut self) -> Option<Group> {
        self.groups.pop()
    }

    /// Number of groups on the stack.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True if no groups are stacked.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of vertices across all groups.
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Groups in pop order (top of the stack first).
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().rev()
    }

    /// Consume the stack, returning groups in pop order.
    pub fn into_groups(self) -> Vec<Group> {
        let mut groups = self.groups;
        groups.reverse();
        groups
    }
}
