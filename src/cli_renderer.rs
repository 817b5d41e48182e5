use crate::coord::{Coord, Direction};
use crate::game::{Game, GameState};
use crate::grid::CellStatus;
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::collections::HashSet;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// What to paint in one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Empty,
    Trail,
    Wall,
    Cube,
    RisingCube,
    Enemy,
}

/// Arrow keys or WASD steer; the rest are menu keys.
fn key_input(code: KeyCode) -> Option<Input> {
    let input = match code {
        KeyCode::Up | KeyCode::Char('w') => Input::Direction(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Input::Direction(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Input::Direction(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Input::Direction(Direction::Right),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Input::Quit,
        KeyCode::Char('r' | 'R') => Input::Restart,
        KeyCode::Char(' ') | KeyCode::Enter => Input::NextLevel,
        _ => return None,
    };
    Some(input)
}

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    lift_delay: Duration,
    terminal_active: bool,
}

impl CliRenderer {
    pub fn new(lift_delay: Duration) -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS
            target_frame_time: Duration::from_millis(33),
            lift_delay,
            terminal_active: false,
        }
    }

    /// Filled cells are drawn from placed pool cubes, so a completed level
    /// still shows its territory after the grid is released.
    fn paint_at(&self, game: &Game, coord: Coord, cubes: &HashSet<Coord>, rising: &HashSet<Coord>) -> Paint {
        if game.active_enemies().any(|enemy| enemy.position == coord) {
            return Paint::Enemy;
        }
        if game.level().is_obstacle(coord) {
            return Paint::Wall;
        }
        if cubes.contains(&coord) {
            return if rising.contains(&coord) {
                Paint::RisingCube
            } else {
                Paint::Cube
            };
        }
        match game.session.grid().status(coord) {
            Ok(CellStatus::Trail) => Paint::Trail,
            Ok(CellStatus::Wall) => Paint::Wall,
            _ => Paint::Empty,
        }
    }

    fn rising_cells(&self, game: &Game) -> HashSet<Coord> {
        let lifting = game
            .claimed_at
            .map_or(false, |at| at.elapsed() < self.lift_delay);
        match game.session.last_resolution() {
            Some(resolution) if lifting => resolution.claimed.iter().copied().collect(),
            _ => HashSet::new(),
        }
    }

    fn draw_cell(&self, paint: Paint, stdout: &mut io::Stdout) -> io::Result<()> {
        let color = match paint {
            Paint::Empty => Color::Black,
            Paint::Trail => Color::Yellow,
            Paint::Wall => Color::DarkGrey,
            Paint::Cube => Color::Blue,
            Paint::RisingCube => Color::Cyan,
            Paint::Enemy => Color::Red,
        };
        queue!(stdout, SetBackgroundColor(color), Print("  "))?;
        Ok(())
    }

    fn draw_info(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        let rows = game.level().rows as u16;
        let remaining = game
            .session
            .remaining_empty_count()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "-".into());

        queue!(
            stdout,
            cursor::MoveTo(0, rows + 1),
            ResetColor,
            terminal::Clear(ClearType::CurrentLine),
            Print(format!(
                "Level {}: {}  Filled: {:.1}%  Empty cells: {}",
                game.level_index + 1,
                game.level().name,
                game.filled_ratio() * 100.0,
                remaining
            ))
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, rows + 2),
            Print("Controls: Arrows/WASD to move | Q to quit | R to restart")
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, rows + 3),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        match game.state {
            GameState::Won => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Green),
                    Print("LEVEL CLEAR! Press SPACE for next level or R to replay"),
                    ResetColor
                )?;
            }
            GameState::Lost => {
                queue!(
                    stdout,
                    SetForegroundColor(Color::Red),
                    Print("GAME OVER! Press R to restart"),
                    ResetColor
                )?;
            }
            GameState::Playing => {}
        }

        Ok(())
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        // Raw mode is on from here, so cleanup must run even if the switch fails
        self.terminal_active = true;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();
        let cubes: HashSet<Coord> = game
            .session
            .pool()
            .active()
            .filter_map(|handle| handle.position)
            .collect();
        let rising = self.rising_cells(game);

        queue!(stdout, cursor::MoveTo(0, 0))?;

        let level = game.level();
        for y in 0..level.rows {
            for x in 0..level.columns {
                let coord = Coord::new(x, y);

                if game.runner.position == coord {
                    let (background, glyph) = match game.state {
                        GameState::Lost => (Color::DarkRed, "##"),
                        _ => (Color::Green, "@@"),
                    };
                    queue!(
                        stdout,
                        SetBackgroundColor(background),
                        SetForegroundColor(Color::Black),
                        Print(glyph)
                    )?;
                    continue;
                }

                let paint = self.paint_at(game, coord, &cubes, &rising);
                self.draw_cell(paint, &mut stdout)?;
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        self.draw_info(game, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !std::mem::take(&mut self.terminal_active) {
            return Ok(());
        }
        execute!(
            io::stdout(),
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if !event::poll(Duration::from_millis(20))? {
            return Ok(None);
        }
        // Key releases are reported on some platforms; act on presses only
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => Ok(key_input(code)),
            _ => Ok(None),
        }
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            log::warn!("failed to restore terminal: {e}");
        }
    }
}
