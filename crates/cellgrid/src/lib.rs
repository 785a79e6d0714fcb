//! Parallel uniform spatial hash grid for particle neighbor search.
//!
//! Space is partitioned into cubic cells whose edge length equals the
//! search radius, each cell keyed by a Morton encoding of its integer
//! coordinate. Rebuilding the index from a slice of moving entities is
//! spread across a fixed worker pool; a radius query then scans the
//! 3x3x3 block of cells around a point and yields the indices stored in
//! those buckets.
//!
//! ```
//! use cellgrid::grid::{GridOptions, HashGrid};
//! use cellgrid::executor::Threading;
//! use glam::Vec3;
//!
//! let mut grid = HashGrid::new(
//!     1.0,
//!     GridOptions {
//!         threading: Threading::Multithreaded(4),
//!         ..GridOptions::default()
//!     },
//! )?;
//!
//! let positions = vec![Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)];
//! grid.rebuild(&positions)?;
//!
//! let near_origin: Vec<usize> = grid.query(Vec3::ZERO).collect();
//! assert_eq!(near_origin, vec![0, 1]);
//! # Ok::<(), cellgrid::GridError>(())
//! ```
//!
//! Queries are cell-granularity supersets of the true neighbor set; use
//! [`grid::HashGrid::query_filtered`] when an exact Euclidean cutoff is
//! needed. The grid holds indices only, never entity values, and must be
//! rebuilt before querying whenever entities have moved.

pub mod cell;
pub mod error;
pub mod executor;
pub mod grid;
pub mod morton;
pub mod partition;

pub use error::GridError;
pub use executor::Threading;
pub use grid::{GridOptions, HashGrid, PointSource};
