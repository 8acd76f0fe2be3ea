use grid_util::point::Point;
use log::{debug, info};

use crate::node_grid::NodeGrid;
use crate::{CARDINAL_COST, DIAGONAL_COST};

/// Diagonal-distance approximation scaled to integer costs: 10 per cardinal
/// step, 14 per diagonal step. Movement on the grid is strictly 4-directional,
/// so no diagonal step is ever produced; the formula is kept as both step cost
/// and heuristic anyway, matching the behaviour this crate reproduces. It
/// never exceeds the true remaining cost (14 * min <= 10 * 2 * min), so the
/// search still finds cost-optimal routes.
pub fn octile_distance(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    DIAGONAL_COST * dx.min(dy) + CARDINAL_COST * (dx - dy).abs()
}

impl NodeGrid {
    /// Runs a full A* search from the current start to the current end and
    /// leaves the outcome on the nodes: `on_path` marks the route (endpoints
    /// excluded), `closed`/`open` record what was explored, `g_cost` at the
    /// end node is the route cost. Previous search state is cleared first, so
    /// the outcome depends only on the current grid contents.
    ///
    /// An unreachable end is a normal outcome, not an error: no node gets
    /// `on_path` and the end node keeps `parent == None`.
    pub fn run_search(&mut self) {
        self.clear_search_state();
        let end_point = self.end_point();
        self.add_open(self.start);

        while !self.open.is_empty() {
            let current = self.lowest_cost_open();
            self.remove_open(current);
            self.add_closed(current);
            if current == self.end {
                break;
            }

            let neighbours = self.nodes[current].neighbours.clone();
            for ix in neighbours {
                if !self.is_traversable(ix) || self.nodes[ix].closed {
                    continue;
                }
                let tentative = self.nodes[current].g_cost
                    + octile_distance(self.nodes[current].point, self.nodes[ix].point);
                let node = &self.nodes[ix];
                if tentative < node.g_cost || !node.open {
                    let node = &mut self.nodes[ix];
                    node.g_cost = tentative;
                    node.h_cost = octile_distance(node.point, end_point);
                    node.f_cost = node.g_cost + node.h_cost;
                    node.parent = Some(current);
                    self.add_open(ix);
                }
            }
        }

        self.mark_path();
        if self.nodes[self.end].parent.is_some() {
            debug!(
                "path found with cost {} after expanding {} nodes",
                self.nodes[self.end].g_cost,
                self.closed.len()
            );
        } else {
            info!(
                "{} is not reachable from {}",
                end_point,
                self.start_point()
            );
        }
    }

    /// The open node with the lowest `f_cost`, ties broken by lowest `h_cost`;
    /// among full ties the earliest-queued node wins. A linear scan keeps the
    /// selection order identical to the set's insertion order.
    fn lowest_cost_open(&self) -> usize {
        let mut best = self.open[0];
        for &ix in &self.open[1..] {
            let node = &self.nodes[ix];
            let best_node = &self.nodes[best];
            if node.f_cost < best_node.f_cost
                || (node.f_cost == best_node.f_cost && node.h_cost < best_node.h_cost)
            {
                best = ix;
            }
        }
        best
    }

    /// Walks parent links back from the end, flagging each intermediate node.
    /// The endpoints themselves are never flagged; they render via their own
    /// start/end markers.
    fn mark_path(&mut self) {
        let start = self.start;
        let mut current = self.nodes[self.end].parent;
        while let Some(ix) = current {
            if ix == start {
                break;
            }
            self.nodes[ix].on_path = true;
            current = self.nodes[ix].parent;
        }
    }

    /// The reconstructed route from start to end inclusive, or [None] when the
    /// last search did not reach the end.
    pub fn path_points(&self) -> Option<Vec<Point>> {
        self.nodes[self.end].parent?;
        let mut path: Vec<Point> = itertools::unfold(Some(self.end), |state| {
            state.map(|ix| {
                *state = self.nodes[ix].parent;
                self.nodes[ix].point
            })
        })
        .collect();
        path.reverse();
        Some(path)
    }
}
