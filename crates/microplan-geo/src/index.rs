//! R-tree index over polygon bounding boxes for candidate-neighbour
//! pruning.

use geo::{BoundingRect, Polygon};
use rstar::{RTree, RTreeObject, AABB};

/// One indexed entry: a caller-supplied id and the polygon's envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedBounds {
    id: u64,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index of polygon bounding boxes keyed by id.
///
/// Queries over-approximate: they return every id whose envelope
/// intersects the (expanded) query envelope, and callers apply the exact
/// geometric tests to the candidates.
#[derive(Debug)]
pub struct BoundsIndex {
    tree: RTree<IndexedBounds>,
}

impl BoundsIndex {
    /// Bulk-load an index from `(id, polygon)` pairs.
    ///
    /// Degenerate polygons without a bounding rectangle are skipped.
    pub fn build<'a>(entries: impl IntoIterator<Item = (u64, &'a Polygon<f64>)>) -> Self {
        let objects: Vec<IndexedBounds> = entries
            .into_iter()
            .filter_map(|(id, polygon)| {
                let rect = polygon.bounding_rect()?;
                Some(IndexedBounds {
                    id,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();
        Self {
            tree: RTree::bulk_load(objects),
        }
    }

    /// Ids whose envelope intersects `polygon`'s envelope expanded by
    /// `distance` on every side. Sorted for deterministic iteration.
    #[must_use]
    pub fn candidates_within(&self, polygon: &Polygon<f64>, distance: f64) -> Vec<u64> {
        let Some(rect) = polygon.bounding_rect() else {
            return Vec::new();
        };
        let query = AABB::from_corners(
            [rect.min().x - distance, rect.min().y - distance],
            [rect.max().x + distance, rect.max().y + distance],
        );
        let mut ids: Vec<u64> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// True when the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
