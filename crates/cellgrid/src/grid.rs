use std::collections::HashMap;
use std::time::Instant;

use glam::{IVec3, Vec3};
use log::{debug, trace};

use crate::cell::{cell_of, neighborhood, CellCube};
use crate::error::GridError;
use crate::executor::{Executor, Threading};
use crate::morton;
use crate::partition::split_ranges;

/// Capability an entity type must provide for the grid to index it.
///
/// The grid never stores entity values, only indices into the slice the
/// caller hands to [`HashGrid::rebuild`].
pub trait PointSource {
    fn position(&self) -> Vec3;
}

impl PointSource for Vec3 {
    fn position(&self) -> Vec3 {
        *self
    }
}

impl<T: PointSource> PointSource for &T {
    fn position(&self) -> Vec3 {
        (*self).position()
    }
}

/// Grid behavior fixed at construction time.
#[derive(Clone, Copy, Debug)]
pub struct GridOptions {
    /// Drop cells that end a rebuild empty. Saves memory for entity sets
    /// that sweep through space, at the cost of reallocating buckets that
    /// get repopulated later. When off, empty buckets are kept and reused.
    pub erase_empty_cells: bool,
    pub threading: Threading,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            erase_empty_cells: true,
            threading: Threading::Sequential,
        }
    }
}

/// Uniform spatial hash grid over Morton-encoded cell keys.
///
/// Cell edge length equals the search radius, so a 3x3x3 block of cells
/// around any point is guaranteed to contain every entity within that
/// radius of it. Rebuild once per frame after entities move, then query
/// as often as needed; a query reflects positions as of the last
/// completed rebuild.
pub struct HashGrid {
    radius: f32,
    erase_empty_cells: bool,
    executor: Executor,
    buckets: HashMap<u64, Vec<usize>>,
}

impl HashGrid {
    /// Create an empty grid.
    ///
    /// `radius` is both the cell edge length and the nominal query
    /// cutoff; it must be positive and finite (fatal otherwise). Pool
    /// construction for a multithreaded grid can fail recoverably.
    pub fn new(radius: f32, options: GridOptions) -> Result<Self, GridError> {
        assert!(
            radius.is_finite() && radius > 0.0,
            "grid radius must be positive and finite, got {radius}"
        );
        let executor = Executor::new(options.threading)?;
        Ok(Self {
            radius,
            erase_empty_cells: options.erase_empty_cells,
            executor,
            buckets: HashMap::new(),
        })
    }

    /// Cell edge length / nominal search radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Number of cells currently holding at least one entity.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.values().filter(|b| !b.is_empty()).count()
    }

    /// Total number of entity indices across all buckets.
    pub fn indexed_entities(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Entity indices in one cell. Empty slice for cells not in the map.
    pub fn bucket(&self, coord: IVec3) -> &[usize] {
        self.buckets
            .get(&morton::encode(coord))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate all cells and their bucket contents (arbitrary cell order).
    pub fn cells(&self) -> impl Iterator<Item = (IVec3, &[usize])> {
        self.buckets
            .iter()
            .map(|(&key, bucket)| (morton::decode(key), bucket.as_slice()))
    }

    /// Re-index every entity from its current position.
    ///
    /// Index ranges are distributed across the configured workers; each
    /// worker fills a private scratch map over its own range, then the
    /// calling thread folds the scratch maps together in partition order,
    /// so no bucket is ever touched by two threads and bucket contents
    /// are identical for any worker count. A non-finite position fails
    /// the rebuild with [`GridError::InvalidPosition`] (smallest failing
    /// partition wins) after all workers have joined; on failure the
    /// previous build is left untouched and remains queryable.
    pub fn rebuild<E>(&mut self, entities: &[E]) -> Result<(), GridError>
    where
        E: PointSource + Sync,
    {
        let start = Instant::now();
        let ranges = split_ranges(entities.len(), self.executor.workers());
        trace!(
            "grid rebuild: {} entities over {} partitions",
            entities.len(),
            ranges.len()
        );

        let radius = self.radius;
        let scratch = self.executor.map_ranges(&ranges, |range| {
            let mut local: HashMap<u64, Vec<usize>> = HashMap::new();
            for i in range {
                let pos = entities[i].position();
                if !pos.is_finite() {
                    return Err(GridError::InvalidPosition { index: i });
                }
                let key = morton::encode(cell_of(pos, radius));
                local.entry(key).or_default().push(i);
            }
            Ok(local)
        })?;

        // Nothing above mutated `self`; the old build survives any failure.
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for local in scratch {
            for (key, mut indices) in local {
                self.buckets.entry(key).or_default().append(&mut indices);
            }
        }
        if self.erase_empty_cells {
            self.buckets.retain(|_, bucket| !bucket.is_empty());
        }

        debug!(
            "grid rebuild: {} entities into {} occupied cells in {:?}",
            entities.len(),
            self.occupied_cells(),
            start.elapsed()
        );
        Ok(())
    }

    /// All entity indices in the 27 cells around `position`.
    ///
    /// This is a cell-granularity superset of the true neighbor set:
    /// indices up to one cell diagonal away may be yielded, and exact
    /// distance filtering is the caller's job (or use
    /// [`HashGrid::query_filtered`]). Never blocks, never allocates.
    pub fn query(&self, position: Vec3) -> impl Iterator<Item = usize> + '_ {
        self.scan(neighborhood(cell_of(position, self.radius)))
    }

    /// Like [`HashGrid::query`] but widened to cover `radius`.
    ///
    /// Scans `ceil(radius / cell)` cells in every direction. Shrinking
    /// below the build radius would miss neighbors and is a fatal
    /// precondition violation.
    pub fn query_within(&self, position: Vec3, radius: f32) -> impl Iterator<Item = usize> + '_ {
        assert!(
            radius >= self.radius,
            "query radius {radius} may only widen the build radius {}",
            self.radius
        );
        let reach = (radius / self.radius).ceil() as i32;
        self.scan(CellCube::new(cell_of(position, self.radius), reach))
    }

    /// Candidates from [`HashGrid::query_within`] narrowed to exact
    /// Euclidean distance, for callers that want true neighbors rather
    /// than the cell-level superset. `entities` must be the slice the
    /// grid was last rebuilt from.
    pub fn query_filtered<'a, E>(
        &'a self,
        position: Vec3,
        radius: f32,
        entities: &'a [E],
    ) -> impl Iterator<Item = usize> + 'a
    where
        E: PointSource,
    {
        let radius_sq = radius * radius;
        self.query_within(position, radius.max(self.radius))
            .filter(move |&i| entities[i].position().distance_squared(position) <= radius_sq)
    }

    fn scan(&self, cells: CellCube) -> impl Iterator<Item = usize> + '_ {
        cells
            .filter_map(move |coord| self.buckets.get(&morton::encode(coord)))
            .flatten()
            .copied()
    }
}
