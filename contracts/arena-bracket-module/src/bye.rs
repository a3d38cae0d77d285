use std::collections::BTreeSet;

use crate::topology::BracketTopology;

/// Matches a participant entering `bye_id` is forwarded through, in order.
///
/// The walk follows winner edges while the current match is a bye and ends
/// with the first playable match. A chain that dead-ends, loops or leaves the
/// bracket stops early, so the last element is not necessarily playable.
pub fn forwarding_path(topology: &BracketTopology, bye_id: u128) -> Vec<u128> {
    let mut path = Vec::new();
    let mut visited = BTreeSet::from([bye_id]);
    let mut current = bye_id;

    while let Some(next) = topology
        .matches
        .get(&current)
        .filter(|node| node.record.is_bye)
        .and_then(|node| node.record.winner_destination)
    {
        let next = next.u128();
        if !visited.insert(next) {
            break;
        }

        path.push(next);
        current = next;
    }

    path
}

/// The playable match that ultimately receives whoever enters `bye_id`.
pub fn resolve_bye(topology: &BracketTopology, bye_id: u128) -> Option<u128> {
    forwarding_path(topology, bye_id)
        .last()
        .copied()
        .filter(|id| {
            topology
                .matches
                .get(id)
                .map_or(false, |node| !node.record.is_bye)
        })
}
