//! Spatial index for broad-phase world queries
//!
//! Every solid or decorative object (walls, tanks, bullets, tracks) lives in
//! the index as a kind-tagged rectangle. The simulation systems only consume
//! the [`SpatialIndex`] trait; [`GridIndex`] is the shipped implementation,
//! a persistent uniform hash grid whose entries can span multiple cells.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::state::{EntityId, PlayerId};
use crate::util::rect::Rect;

/// Default cell size for the world grid (world units)
/// Roughly 1.5x the tank footprint so a tank covers at most four cells
pub const GRID_CELL_SIZE: f32 = 128.0;

/// Initial capacity for the cell map (number of expected non-empty cells)
const GRID_INITIAL_CAPACITY: usize = 256;

/// Initial capacity for entity id vectors within cells
const CELL_INITIAL_CAPACITY: usize = 8;

/// Grid cell key - (x, y) cell coordinates
pub type CellKey = (i32, i32);

/// Object categories the index can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Wall,
    Tank,
    Bullet,
    Track,
}

/// Kind-specific payload carried by an index entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryData {
    Wall,
    Tank {
        player: PlayerId,
    },
    Bullet {
        owner: PlayerId,
    },
    Track {
        path: EntityId,
        angle: f32,
        age_ticks: u32,
    },
}

impl EntryData {
    pub fn kind(&self) -> ObjectKind {
        match self {
            EntryData::Wall => ObjectKind::Wall,
            EntryData::Tank { .. } => ObjectKind::Tank,
            EntryData::Bullet { .. } => ObjectKind::Bullet,
            EntryData::Track { .. } => ObjectKind::Track,
        }
    }
}

/// One object in the spatial index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: EntityId,
    pub rect: Rect,
    pub data: EntryData,
}

impl IndexEntry {
    pub fn kind(&self) -> ObjectKind {
        self.data.kind()
    }
}

/// Typed query result: one list per object kind
///
/// Lists for kinds that were not requested stay empty.
#[derive(Debug, Default)]
pub struct KindHits {
    pub walls: Vec<IndexEntry>,
    pub tanks: Vec<IndexEntry>,
    pub bullets: Vec<IndexEntry>,
    pub tracks: Vec<IndexEntry>,
}

impl KindHits {
    fn push(&mut self, entry: IndexEntry) {
        match entry.kind() {
            ObjectKind::Wall => self.walls.push(entry),
            ObjectKind::Tank => self.tanks.push(entry),
            ObjectKind::Bullet => self.bullets.push(entry),
            ObjectKind::Track => self.tracks.push(entry),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
            && self.tanks.is_empty()
            && self.bullets.is_empty()
            && self.tracks.is_empty()
    }
}

/// Broad-phase query interface the simulation systems are written against
pub trait SpatialIndex {
    /// Insert an entry, replacing any previous entry with the same id
    fn insert(&mut self, entry: IndexEntry);
    /// Remove the entry with the given id
    /// Returns false when no such entry exists
    fn remove(&mut self, id: EntityId) -> bool;
    /// All entries overlapping the area, any kind, ordered by id
    fn query_area(&self, area: Rect) -> Vec<IndexEntry>;
    /// Entries of the requested kinds, world-wide when `area` is None,
    /// ordered by id within each kind
    fn query_by_kinds(&self, kinds: &[ObjectKind], area: Option<Rect>) -> KindHits;
}

/// Persistent spatial hash grid
///
/// The entry table is authoritative; cells hold entity ids for every cell an
/// entry's rectangle covers. Entries are long-lived (walls never move, tracks
/// outlive their tank), so the grid is updated in place rather than rebuilt
/// per tick.
pub struct GridIndex {
    /// Cell size in world units
    cell_size: f32,
    /// Inverse cell size for fast position-to-cell conversion
    inv_cell_size: f32,
    /// Map from cell key to ids of entries covering that cell
    cells: HashMap<CellKey, Vec<EntityId>>,
    /// Authoritative entry table
    entries: HashMap<EntityId, IndexEntry>,
}

impl GridIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::with_capacity(GRID_INITIAL_CAPACITY),
            entries: HashMap::new(),
        }
    }

    /// Inclusive cell range covered by a rectangle
    #[inline]
    fn cell_span(&self, rect: Rect) -> (CellKey, CellKey) {
        (
            (
                (rect.x * self.inv_cell_size).floor() as i32,
                (rect.y * self.inv_cell_size).floor() as i32,
            ),
            (
                (rect.right() * self.inv_cell_size).floor() as i32,
                (rect.bottom() * self.inv_cell_size).floor() as i32,
            ),
        )
    }

    /// Candidate ids from every cell the area touches, sorted and deduplicated
    ///
    /// Sorting keeps query results in id order, which makes ticks
    /// reproducible under a seeded RNG.
    fn candidates(&self, area: Rect) -> SmallVec<[EntityId; 16]> {
        let ((x0, y0), (x1, y1)) = self.cell_span(area);
        let mut ids: SmallVec<[EntityId; 16]> = SmallVec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(cell) = self.cells.get(&(cx, cy)) {
                    ids.extend_from_slice(cell);
                }
            }
        }
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get statistics about the grid
    pub fn stats(&self) -> GridStats {
        let non_empty_cells = self.cells.values().filter(|c| !c.is_empty()).count();
        let max_per_cell = self.cells.values().map(|c| c.len()).max().unwrap_or(0);

        GridStats {
            non_empty_cells,
            total_entries: self.entries.len(),
            max_per_cell,
        }
    }
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

impl SpatialIndex for GridIndex {
    fn insert(&mut self, entry: IndexEntry) {
        self.remove(entry.id);
        let ((x0, y0), (x1, y1)) = self.cell_span(entry.rect);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells
                    .entry((cx, cy))
                    .or_insert_with(|| Vec::with_capacity(CELL_INITIAL_CAPACITY))
                    .push(entry.id);
            }
        }
        self.entries.insert(entry.id, entry);
    }

    fn remove(&mut self, id: EntityId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                let ((x0, y0), (x1, y1)) = self.cell_span(entry.rect);
                for cx in x0..=x1 {
                    for cy in y0..=y1 {
                        if let Some(cell) = self.cells.get_mut(&(cx, cy)) {
                            if let Some(pos) = cell.iter().position(|&e| e == id) {
                                cell.swap_remove(pos);
                            }
                        }
                    }
                }
                true
            }
            None => false,
        }
    }

    fn query_area(&self, area: Rect) -> Vec<IndexEntry> {
        self.candidates(area)
            .iter()
            .filter_map(|id| self.entries.get(id))
            .filter(|entry| entry.rect.intersects(area))
            .cloned()
            .collect()
    }

    fn query_by_kinds(&self, kinds: &[ObjectKind], area: Option<Rect>) -> KindHits {
        let mut hits = KindHits::default();
        match area {
            Some(area) => {
                for id in self.candidates(area) {
                    if let Some(entry) = self.entries.get(&id) {
                        if kinds.contains(&entry.kind()) && entry.rect.intersects(area) {
                            hits.push(entry.clone());
                        }
                    }
                }
            }
            None => {
                let mut ids: Vec<EntityId> = self
                    .entries
                    .iter()
                    .filter(|(_, entry)| kinds.contains(&entry.kind()))
                    .map(|(&id, _)| id)
                    .collect();
                ids.sort_unstable();
                for id in ids {
                    if let Some(entry) = self.entries.get(&id) {
                        hits.push(entry.clone());
                    }
                }
            }
        }
        hits
    }
}

/// Statistics about the grid
#[derive(Debug, Clone)]
pub struct GridStats {
    pub non_empty_cells: usize,
    pub total_entries: usize,
    pub max_per_cell: usize,
}
