use crate::coord::Direction;
use crate::game::Game;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    Quit,
    Restart,
    NextLevel,
}

/// Trait that abstracts the display/input backend driving a [`Game`].
pub trait Renderer {
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
