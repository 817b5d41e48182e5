use std::time::Instant;
use claimgrid::{CliRenderer, EngineConfig, Game, GameState, Input, LevelDatabase, Renderer};

fn main() -> claimgrid::Result<()> {
    // Silent unless RUST_LOG is set; stderr would scribble over the raw-mode screen
    env_logger::init();

    let config = EngineConfig::load();
    let levels = LevelDatabase::load(&config.game.levels_file);
    let mut game = Game::new(&config, levels)?;
    let mut renderer = CliRenderer::new(config.lift_delay());

    renderer.init()?;

    let tick_rate = config.tick_rate();
    let mut last_game_update = Instant::now();

    loop {
        if let Some(input) = renderer.poll_input()? {
            match input {
                Input::Direction(direction) => {
                    game.set_direction(direction)?;
                }
                Input::Quit => {
                    break;
                }
                Input::Restart => {
                    game.reset()?;
                }
                Input::NextLevel if game.state == GameState::Won => {
                    game.next_level()?;
                }
                _ => {}
            }
        }

        // Update game logic at fixed rate
        if last_game_update.elapsed() >= tick_rate {
            game.update()?;
            last_game_update = Instant::now();
        }

        renderer.render(&game)?;
    }

    renderer.cleanup()?;
    Ok(())
}
