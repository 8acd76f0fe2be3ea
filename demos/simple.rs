use astar_grid::NodeGrid;

// In this example a path is found on a 10x10 grid with a near-complete wall
// in column 5; the search has to thread the single gap at (5, 4). The final
// grid is printed with S/E marking the endpoints, * the path, # obstacles.

fn main() {
    let mut grid = NodeGrid::new(10, 10);
    for y in 1..=8 {
        grid.set_walkable(5, y, false);
    }
    grid.set_walkable(5, 4, true);
    grid.run_search();
    print!("{}", grid);
    println!("Path:");
    for p in grid.path_points().expect("gap makes the end reachable") {
        println!("{:?}", p);
    }
}
