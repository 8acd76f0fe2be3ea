use core::fmt;

use grid_util::grid::Grid;
use grid_util::point::Point;
use log::debug;
use smallvec::SmallVec;

use crate::N_NEIGHBOURS;

/// A single grid cell together with its search state. Adjacency is
/// arena-indexed: [neighbours](Node::neighbours) holds flat indices into
/// [NodeGrid::nodes] rather than references, so nodes stay plain data.
#[derive(Clone, Debug)]
pub struct Node {
    pub point: Point,
    /// Indices of the in-bounds orthogonal neighbours, in up, down, left,
    /// right order. Border nodes have fewer than four.
    pub neighbours: SmallVec<[usize; N_NEIGHBOURS]>,
    pub walkable: bool,
    pub start: bool,
    pub end: bool,
    /// Search-transient state below; reset at the start of every search.
    pub open: bool,
    pub closed: bool,
    pub on_path: bool,
    pub g_cost: i32,
    pub h_cost: i32,
    pub f_cost: i32,
    pub parent: Option<usize>,
}

/// What a cell should be drawn as, in decreasing precedence. A shell that does
/// not visualize the search itself can treat [Frontier](CellKind::Frontier) and
/// [Explored](CellKind::Explored) as [Free](CellKind::Free).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Start,
    End,
    Path,
    Frontier,
    Explored,
    Free,
    Blocked,
}

/// [NodeGrid] owns the fixed rectangle of [Node]s in a flat vector indexed as
/// `x + y * width`, the open and frontier bookkeeping of the current search,
/// and the start and end placement. The border ring is non-walkable by
/// default and the interior walkable; the start defaults to `(1, 1)` and the
/// end to `(width - 2, height - 2)`.
///
/// The open and closed sets are plain index vectors whose membership is
/// mirrored in the per-node `open`/`closed` flags, giving O(1) membership
/// tests while keeping the collections iterable in insertion order.
#[derive(Clone, Debug)]
pub struct NodeGrid {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<Node>,
    pub open: Vec<usize>,
    pub closed: Vec<usize>,
    pub start: usize,
    pub end: usize,
}

impl NodeGrid {
    /// Allocates the grid and links neighbours once; links never change
    /// afterwards. Needs at least a 3x3 grid so a walkable interior exists.
    pub fn new(width: usize, height: usize) -> NodeGrid {
        assert!(
            width >= 3 && height >= 3,
            "grid needs a border ring around a non-empty interior"
        );
        let mut nodes = Vec::with_capacity(width * height);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let mut neighbours = SmallVec::new();
                for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                    let (nx, ny) = (x + dx, y + dy);
                    if nx >= 0 && ny >= 0 && nx < width as i32 && ny < height as i32 {
                        neighbours.push(nx as usize + ny as usize * width);
                    }
                }
                nodes.push(Node {
                    point: Point::new(x, y),
                    neighbours,
                    walkable: interior(x, y, width, height),
                    start: false,
                    end: false,
                    open: false,
                    closed: false,
                    on_path: false,
                    g_cost: 0,
                    h_cost: 0,
                    f_cost: 0,
                    parent: None,
                });
            }
        }
        let start = 1 + width;
        let end = (width - 2) + (height - 2) * width;
        nodes[start].start = true;
        nodes[end].end = true;
        NodeGrid {
            width,
            height,
            nodes,
            open: Vec::new(),
            closed: Vec::new(),
            start,
            end,
        }
    }

    /// Restores every node's walkability to its initial value and clears all
    /// search-transient state. Start and end stay where they are.
    pub fn reset(&mut self) {
        debug!("resetting grid to initial walkability");
        let (w, h) = (self.width, self.height);
        for node in &mut self.nodes {
            node.walkable = interior(node.point.x, node.point.y, w, h);
        }
        self.clear_search_state();
    }

    /// Clears the open/closed sets and every node's transient search state,
    /// leaving walkability and start/end placement untouched.
    pub fn clear_search_state(&mut self) {
        self.open.clear();
        self.closed.clear();
        for node in &mut self.nodes {
            node.open = false;
            node.closed = false;
            node.on_path = false;
            node.g_cost = 0;
            node.h_cost = 0;
            node.f_cost = 0;
            node.parent = None;
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    pub fn get_ix(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    pub fn node(&self, x: usize, y: usize) -> &Node {
        &self.nodes[self.get_ix(x, y)]
    }

    /// Sets a single node's walkable flag. Out-of-bounds coordinates are a
    /// silent no-op. The start and end nodes remain navigable regardless of
    /// this flag, see [is_traversable](Self::is_traversable).
    pub fn set_walkable(&mut self, x: i32, y: i32, walkable: bool) {
        if self.in_bounds(x, y) {
            let ix = self.get_ix(x as usize, y as usize);
            self.nodes[ix].walkable = walkable;
        }
    }

    /// Moves the start marker. Silently rejected if out of bounds or if the
    /// target is the current end node, so exactly one start and one end exist
    /// at all times and they never coincide.
    pub fn set_start(&mut self, x: i32, y: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let ix = self.get_ix(x as usize, y as usize);
        if !self.nodes[ix].end {
            self.nodes[self.start].start = false;
            self.nodes[ix].start = true;
            self.start = ix;
        }
    }

    /// Moves the end marker; symmetric to [set_start](Self::set_start).
    pub fn set_end(&mut self, x: i32, y: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let ix = self.get_ix(x as usize, y as usize);
        if !self.nodes[ix].start {
            self.nodes[self.end].end = false;
            self.nodes[ix].end = true;
            self.end = ix;
        }
    }

    /// Whether the search may step onto this node: walkable, or one of the
    /// two endpoints (which are navigable no matter how they were painted).
    pub fn is_traversable(&self, ix: usize) -> bool {
        let node = &self.nodes[ix];
        node.walkable || node.start || node.end
    }

    pub fn start_point(&self) -> Point {
        self.nodes[self.start].point
    }

    pub fn end_point(&self) -> Point {
        self.nodes[self.end].point
    }

    /// Adds a node to the open set; a no-op if it is already a member.
    pub fn add_open(&mut self, ix: usize) {
        if !self.nodes[ix].open {
            self.nodes[ix].open = true;
            self.open.push(ix);
        }
    }

    /// Removes a node from the open set, shifting later members down so the
    /// collection keeps its insertion order without gaps.
    pub fn remove_open(&mut self, ix: usize) {
        if let Some(pos) = self.open.iter().position(|&i| i == ix) {
            self.nodes[ix].open = false;
            self.open.remove(pos);
        }
    }

    /// Adds a node to the closed set; a no-op if it is already a member.
    pub fn add_closed(&mut self, ix: usize) {
        if !self.nodes[ix].closed {
            self.nodes[ix].closed = true;
            self.closed.push(ix);
        }
    }

    /// Removes a node from the closed set, preserving the order of the rest.
    pub fn remove_closed(&mut self, ix: usize) {
        if let Some(pos) = self.closed.iter().position(|&i| i == ix) {
            self.nodes[ix].closed = false;
            self.closed.remove(pos);
        }
    }

    /// Classifies a cell for drawing, most specific kind first. This is the
    /// render branch order of the interactive shell: endpoints, then the
    /// found path, then search diagnostics, then plain terrain.
    pub fn classify(&self, x: usize, y: usize) -> CellKind {
        let node = self.node(x, y);
        if node.start {
            CellKind::Start
        } else if node.end {
            CellKind::End
        } else if node.on_path {
            CellKind::Path
        } else if node.open {
            CellKind::Frontier
        } else if node.closed {
            CellKind::Explored
        } else if node.walkable {
            CellKind::Free
        } else {
            CellKind::Blocked
        }
    }
}

fn interior(x: i32, y: i32, width: usize, height: usize) -> bool {
    x > 0 && y > 0 && x < width as i32 - 1 && y < height as i32 - 1
}

impl fmt::Display for NodeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let glyph = match self.classify(x, y) {
                    CellKind::Start => 'S',
                    CellKind::End => 'E',
                    CellKind::Path => '*',
                    CellKind::Frontier => 'o',
                    CellKind::Explored => 'x',
                    CellKind::Free => '.',
                    CellKind::Blocked => '#',
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Walkability view of the grid; `true` means the cell can be stepped on.
impl Grid<bool> for NodeGrid {
    fn new(width: usize, height: usize, default_value: bool) -> Self {
        let mut grid = NodeGrid::new(width, height);
        if !default_value {
            for node in &mut grid.nodes {
                node.walkable = false;
            }
        }
        grid
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.node(x, y).walkable
    }
    fn set(&mut self, x: usize, y: usize, value: bool) {
        self.set_walkable(x as i32, y as i32, value);
    }
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_flags(grid: &NodeGrid) -> (usize, usize) {
        let starts = grid.nodes.iter().filter(|n| n.start).count();
        let ends = grid.nodes.iter().filter(|n| n.end).count();
        (starts, ends)
    }

    #[test]
    fn border_blocked_interior_walkable() {
        let grid = NodeGrid::new(8, 5);
        for y in 0..5 {
            for x in 0..8 {
                let expect = x > 0 && y > 0 && x < 7 && y < 4;
                assert_eq!(grid.node(x, y).walkable, expect, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn border_nodes_have_fewer_neighbours() {
        let grid = NodeGrid::new(5, 5);
        assert_eq!(grid.node(0, 0).neighbours.len(), 2);
        assert_eq!(grid.node(2, 0).neighbours.len(), 3);
        assert_eq!(grid.node(2, 2).neighbours.len(), 4);
    }

    #[test]
    fn default_placement() {
        let grid = NodeGrid::new(10, 10);
        assert_eq!(grid.start_point(), Point::new(1, 1));
        assert_eq!(grid.end_point(), Point::new(8, 8));
        assert_eq!(count_flags(&grid), (1, 1));
    }

    #[test]
    fn single_start_and_end_after_moves() {
        let mut grid = NodeGrid::new(10, 10);
        grid.set_start(3, 4);
        grid.set_start(5, 5);
        grid.set_end(2, 2);
        grid.set_end(6, 1);
        assert_eq!(count_flags(&grid), (1, 1));
        assert_eq!(grid.start_point(), Point::new(5, 5));
        assert_eq!(grid.end_point(), Point::new(6, 1));
    }

    #[test]
    fn start_onto_end_is_rejected() {
        let mut grid = NodeGrid::new(10, 10);
        grid.set_start(8, 8);
        assert_eq!(grid.start_point(), Point::new(1, 1));
        grid.set_end(1, 1);
        assert_eq!(grid.end_point(), Point::new(8, 8));
        assert_eq!(count_flags(&grid), (1, 1));
    }

    #[test]
    fn out_of_bounds_mutation_is_a_noop() {
        let mut grid = NodeGrid::new(10, 10);
        grid.set_walkable(-1, 4, false);
        grid.set_walkable(4, 100, false);
        grid.set_start(-3, -3);
        grid.set_end(10, 10);
        assert_eq!(grid.start_point(), Point::new(1, 1));
        assert_eq!(grid.end_point(), Point::new(8, 8));
    }

    #[test]
    fn open_set_removal_preserves_order() {
        let mut grid = NodeGrid::new(10, 10);
        let (a, b, c) = (grid.get_ix(1, 1), grid.get_ix(2, 1), grid.get_ix(3, 1));
        grid.add_open(a);
        grid.add_open(b);
        grid.add_open(c);
        grid.add_open(b); // idempotent
        assert_eq!(grid.open, vec![a, b, c]);
        grid.remove_open(b);
        assert_eq!(grid.open, vec![a, c]);
        assert!(!grid.nodes[b].open);
        grid.remove_open(b); // absent member, no-op
        assert_eq!(grid.open, vec![a, c]);
    }

    #[test]
    fn closed_set_flags_track_membership() {
        let mut grid = NodeGrid::new(10, 10);
        let ix = grid.get_ix(4, 4);
        grid.add_closed(ix);
        assert!(grid.nodes[ix].closed);
        grid.remove_closed(ix);
        assert!(!grid.nodes[ix].closed);
        assert!(grid.closed.is_empty());
    }

    #[test]
    fn reset_restores_obstacles_and_keeps_endpoints() {
        let mut grid = NodeGrid::new(10, 10);
        grid.set_start(4, 4);
        grid.set_walkable(3, 3, false);
        grid.set_walkable(5, 6, false);
        grid.run_search();
        assert!(grid.nodes.iter().any(|n| n.closed));
        grid.reset();
        assert!(grid.node(3, 3).walkable);
        assert!(grid.node(5, 6).walkable);
        assert!(grid
            .nodes
            .iter()
            .all(|n| !n.open && !n.closed && !n.on_path && n.parent.is_none()));
        assert!(grid.open.is_empty() && grid.closed.is_empty());
        assert_eq!(grid.start_point(), Point::new(4, 4));
        assert_eq!(grid.end_point(), Point::new(8, 8));
    }

    #[test]
    fn walkability_grid_view() {
        let mut grid: NodeGrid = Grid::new(6, 6, true);
        assert!(Grid::get(&grid, 2, 2));
        Grid::set(&mut grid, 2, 2, false);
        assert!(!Grid::get(&grid, 2, 2));
        assert_eq!(Grid::width(&grid), 6);
    }

    #[test]
    fn classify_precedence() {
        let mut grid = NodeGrid::new(10, 10);
        assert_eq!(grid.classify(1, 1), CellKind::Start);
        assert_eq!(grid.classify(8, 8), CellKind::End);
        assert_eq!(grid.classify(0, 0), CellKind::Blocked);
        assert_eq!(grid.classify(4, 4), CellKind::Free);
        let ix = grid.get_ix(4, 4);
        grid.add_closed(ix);
        assert_eq!(grid.classify(4, 4), CellKind::Explored);
        grid.nodes[ix].on_path = true;
        assert_eq!(grid.classify(4, 4), CellKind::Path);
    }
}
