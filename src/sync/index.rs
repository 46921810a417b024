//! In-memory workspace view, indexed by id and kept in insertion order

use std::collections::HashMap;

use crate::domain::Workspace;

#[derive(Debug, Clone, Default)]
pub struct WorkspaceIndex {
    order: Vec<String>,
    by_id: HashMap<String, Workspace>,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced record keeps its position
    pub fn upsert(&mut self, workspace: Workspace) {
        if !self.by_id.contains_key(&workspace.id) {
            self.order.push(workspace.id.clone());
        }
        self.by_id.insert(workspace.id.clone(), workspace);
    }

    pub fn get(&self, id: &str) -> Option<&Workspace> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Workspace> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id).cloned())
            .collect()
    }
}

impl From<Vec<Workspace>> for WorkspaceIndex {
    fn from(list: Vec<Workspace>) -> Self {
        let mut index = WorkspaceIndex::new();
        for workspace in list {
            index.upsert(workspace);
        }
        index
    }
}
