//! Last-write-wins merge of workspace collections

use std::collections::HashMap;

use crate::domain::Workspace;

/// Merge `local` and `remote` into one collection with unique ids.
///
/// Records are ingested local first, then remote. An incoming record replaces
/// the accumulated one only when its `lastModified` is strictly greater, so
/// ties keep the local copy. Output order is first appearance of each id.
pub fn merge_workspaces(local: &[Workspace], remote: &[Workspace]) -> Vec<Workspace> {
    let mut merged: Vec<Workspace> = Vec::with_capacity(local.len() + remote.len());
    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(local.len() + remote.len());

    for incoming in local.iter().chain(remote.iter()) {
        match positions.get(incoming.id.as_str()) {
            Some(&at) => {
                if merged[at].last_modified < incoming.last_modified {
                    merged[at] = incoming.clone();
                }
            }
            None => {
                positions.insert(incoming.id.as_str(), merged.len());
                merged.push(incoming.clone());
            }
        }
    }

    merged
}
