//! # astar_grid
//!
//! An interactive grid pathfinding core: a fixed-size 4-connected grid on which
//! obstacles are painted and a start and end cell are placed, plus an
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search that recomputes
//! the shortest walkable route from scratch on every invocation. Each search
//! leaves its full state (path membership, explored and frontier sets, costs)
//! on the nodes themselves so a render shell can draw the grid with a single
//! pass of per-cell lookups.
//!
//! The search is stateless across invocations: the outcome depends only on the
//! current grid contents. "No path" is a normal outcome, reported by the absence
//! of path-flagged nodes rather than an error.

pub mod node_grid;
pub mod solver;

pub use node_grid::{CellKind, Node, NodeGrid};
pub use solver::octile_distance;

/// Cost of a cardinal (orthogonal) step.
pub const CARDINAL_COST: i32 = 10;
/// Cost of a diagonal step in the distance formula. Movement itself is strictly
/// 4-directional; see [octile_distance] for why this constant still appears.
pub const DIAGONAL_COST: i32 = 14;

/// Orthogonal neighbourhood size; nodes link to at most this many neighbours.
pub const N_NEIGHBOURS: usize = 4;
