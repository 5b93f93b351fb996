//! Per-invocation state of the creation flow.

use std::collections::BTreeMap;

use cutview_ir::NodeId;

use crate::cube::BoxSize;
use crate::error::Diagnostic;
use crate::label::{Letter, Ordinal, Tag};

/// What the user picked for one cut view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutSession {
    /// Object whose solids are cut.
    pub root: NodeId,
    /// Cutting plane.
    pub plane: NodeId,
    /// Session letter.
    pub letter: Letter,
    /// Box edge length.
    pub size: BoxSize,
}

impl CutSession {
    /// Tag for an ordinal of this session.
    pub fn tag(&self, ordinal: Ordinal) -> Tag {
        Tag::new(self.letter, ordinal)
    }
}

/// Everything a session created for one discovered solid.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionEntry {
    /// Discovered object.
    pub source: NodeId,
    /// Its label when discovered.
    pub original: String,
    /// Reference standing in for it.
    pub link: Option<NodeId>,
    /// Box cut from the reference.
    pub cube: Option<NodeId>,
    /// Cut result.
    pub result: Option<NodeId>,
}

/// Objects created by a session, keyed by ordinal.
///
/// Labels are derived from this map, never the other way around.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionMap {
    entries: BTreeMap<Ordinal, SessionEntry>,
}

impl SessionMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a discovered object.
    pub fn discovered(&mut self, ordinal: Ordinal, source: NodeId, original: impl Into<String>) {
        self.entries.insert(
            ordinal,
            SessionEntry {
                source,
                original: original.into(),
                link: None,
                cube: None,
                result: None,
            },
        );
    }

    /// Entry for an ordinal.
    pub fn get(&self, ordinal: Ordinal) -> Option<&SessionEntry> {
        self.entries.get(&ordinal)
    }

    fn entry_mut(&mut self, ordinal: Ordinal) -> Option<&mut SessionEntry> {
        self.entries.get_mut(&ordinal)
    }

    /// Record the reference made for an ordinal.
    pub fn set_link(&mut self, ordinal: Ordinal, link: NodeId) {
        if let Some(e) = self.entry_mut(ordinal) {
            e.link = Some(link);
        }
    }

    /// Record the box built for an ordinal.
    pub fn set_cube(&mut self, ordinal: Ordinal, cube: NodeId) {
        if let Some(e) = self.entry_mut(ordinal) {
            e.cube = Some(cube);
        }
    }

    /// Record the cut result for an ordinal.
    pub fn set_result(&mut self, ordinal: Ordinal, result: NodeId) {
        if let Some(e) = self.entry_mut(ordinal) {
            e.result = Some(result);
        }
    }

    /// Forget every box, after the geometry phase was rolled back.
    pub fn clear_cubes(&mut self) {
        for e in self.entries.values_mut() {
            e.cube = None;
        }
    }

    /// Entries in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Ordinal, &SessionEntry)> {
        self.entries.iter().map(|(o, e)| (*o, e))
    }

    /// Number of discovered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Created references, in ordinal order.
    pub fn links(&self) -> Vec<NodeId> {
        self.entries.values().filter_map(|e| e.link).collect()
    }

    /// Built boxes, in ordinal order.
    pub fn cubes(&self) -> Vec<NodeId> {
        self.entries.values().filter_map(|e| e.cube).collect()
    }

    /// Cut results, in ordinal order.
    pub fn results(&self) -> Vec<NodeId> {
        self.entries.values().filter_map(|e| e.result).collect()
    }
}

/// Result of a completed creation flow, handed to grouping and painting.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// The user's choices.
    pub session: CutSession,
    /// Created objects.
    pub map: SessionMap,
    /// Problems that were skipped over.
    pub diagnostics: Vec<Diagnostic>,
}

impl SessionOutcome {
    /// Cut results created by the session.
    pub fn results(&self) -> Vec<NodeId> {
        self.map.results()
    }

    /// Boxes built by the session.
    pub fn cubes(&self) -> Vec<NodeId> {
        self.map.cubes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_tracks_roles_by_ordinal() {
        let mut map = SessionMap::new();
        let first = Ordinal::from_index(0);
        let second = Ordinal::from_index(1);
        map.discovered(second, 20, "S2");
        map.discovered(first, 10, "S1");
        map.set_link(first, 11);
        map.set_cube(first, 12);
        map.set_cube(second, 22);
        map.set_result(first, 13);
        // Unknown ordinals are ignored
        map.set_link(Ordinal::from_index(5), 99);

        assert_eq!(map.len(), 2);
        assert_eq!(map.links(), vec![11]);
        assert_eq!(map.cubes(), vec![12, 22]);
        assert_eq!(map.results(), vec![13]);
        assert_eq!(map.get(second).map(|e| e.original.as_str()), Some("S2"));
        assert_eq!(
            map.iter().map(|(o, _)| o.get()).collect::<Vec<_>>(),
            vec![1, 2]
        );

        map.clear_cubes();
        assert!(map.cubes().is_empty());
    }
}
