use std::io::{self, Write};
use std::time::Duration;

use astar_grid::{CellKind, NodeGrid};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton,
        MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

// Terminal rendition of the interactive shell: cells are two-column blocks,
// left-drag paints obstacles, right-drag erases them, S/E place the endpoints
// at the pointer, W toggles the explored overlay, R resets, Q quits. The
// search re-runs on every redraw, so the path follows the pointer live.

const FRAME: Duration = Duration::from_millis(33);

fn cell_color(kind: CellKind, show_explored: bool) -> Color {
    match kind {
        CellKind::Start => Color::Blue,
        CellKind::End => Color::Yellow,
        CellKind::Path => Color::Green,
        CellKind::Frontier | CellKind::Explored if show_explored => Color::Red,
        CellKind::Blocked => Color::Black,
        _ => Color::White,
    }
}

fn draw(grid: &NodeGrid, show_explored: bool, out: &mut impl Write) -> io::Result<()> {
    queue!(out, cursor::MoveTo(0, 0))?;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let color = cell_color(grid.classify(x, y), show_explored);
            queue!(out, SetBackgroundColor(color), Print("  "))?;
        }
        queue!(out, ResetColor, Print("\r\n"))?;
    }
    queue!(
        out,
        SetForegroundColor(Color::Grey),
        Print("drag: paint/erase walls  s/e: endpoints  w: explored  r: reset  q: quit"),
        ResetColor
    )?;
    out.flush()
}

fn main() -> io::Result<()> {
    env_logger::init();

    let (cols, rows) = terminal::size()?;
    let width = ((cols / 2) as usize).clamp(8, 80);
    let height = (rows.saturating_sub(1) as usize).clamp(8, 60);
    let mut grid = NodeGrid::new(width, height);

    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

    let mut show_explored = false;
    let mut pointer = (1i32, 1i32);
    'frame: loop {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break 'frame,
                    KeyCode::Char('r') => grid.reset(),
                    KeyCode::Char('s') => grid.set_start(pointer.0, pointer.1),
                    KeyCode::Char('e') => grid.set_end(pointer.0, pointer.1),
                    KeyCode::Char('w') => show_explored = !show_explored,
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    pointer = ((mouse.column / 2) as i32, mouse.row as i32);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left)
                        | MouseEventKind::Drag(MouseButton::Left) => {
                            grid.set_walkable(pointer.0, pointer.1, false)
                        }
                        MouseEventKind::Down(MouseButton::Right)
                        | MouseEventKind::Drag(MouseButton::Right) => {
                            grid.set_walkable(pointer.0, pointer.1, true)
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        grid.run_search();
        draw(&grid, show_explored, &mut out)?;
        std::thread::sleep(FRAME);
    }

    execute!(out, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}
