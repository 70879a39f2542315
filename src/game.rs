//! Menu → Playing → Victory → Menu, and the per-frame simulate/render pass
//! for the level being played.

use log::{debug, info, trace, warn};

use crate::{
    camera::Camera,
    config::{ConfigError, GameConfig},
    frame::{PixelSink, Rgb},
    level::{LevelCatalog, LevelError},
    player::{MoveOutcome, Player, Step},
    sprites::{self, Sprite, SpriteParams},
    textures::TextureSet,
    walls::{self, DepthBuffer, WallParams},
    world::WorldGrid,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Victory,
}

/// Input sampled once per tick. Held keys for motion, edge-triggered
/// presses for the rest.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    pub forward: bool,
    pub backward: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub confirm: bool,
    pub cancel: bool,
    pub level_select: Option<u32>,
}

/// Audio events, by name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Victory,
    Ambient,
}

/// Receiver of audio cues. Playback is entirely its business.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Drops every cue.
pub struct Silent;

impl CueSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

impl CueSink for Vec<Cue> {
    fn play(&mut self, cue: Cue) {
        self.push(cue);
    }
}

/// Everything a running session owns.
pub struct Game {
    config: GameConfig,
    catalog: LevelCatalog,
    textures: TextureSet,
    state: GameState,
    level_id: Option<u32>,
    grid: WorldGrid,
    player: Player,
    sprites: Vec<Sprite>,
    depth: DepthBuffer,
}

impl Game {
    /// Fails on a config that [`GameConfig::validate`] rejects.
    pub fn new(config: GameConfig, catalog: LevelCatalog) -> Result<Self, ConfigError> {
        Self::with_textures(config, catalog, TextureSet::builtin())
    }

    pub fn with_textures(
        config: GameConfig,
        catalog: LevelCatalog,
        textures: TextureSet,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = WorldGrid::new(config.tile_size);
        let depth = DepthBuffer::new(config.width);
        Ok(Self {
            config,
            catalog,
            textures,
            state: GameState::Menu,
            level_id: None,
            grid,
            player: Player::default(),
            sprites: Vec::new(),
            depth,
        })
    }

    /// Reset grid, sprites and player from the catalog entry. Any mutation of
    /// a previous session is discarded.
    pub fn load_level(&mut self, id: u32) -> Result<(), LevelError> {
        let level = self.catalog.get(id)?;
        let ts = self.config.tile_size;

        self.grid.load_from(&level.grid);
        self.sprites.clear();
        self.sprites.extend(
            level
                .sprites
                .iter()
                .map(|s| Sprite::new(s.x * ts, s.y * ts, s.kind)),
        );
        self.player = Player::new(level.spawn.x * ts, level.spawn.y * ts, level.spawn.angle);
        self.level_id = Some(id);

        info!(
            "Loaded level {id} \"{}\" ({}x{}, {} sprites)",
            level.name,
            self.grid.width(),
            self.grid.height(),
            self.sprites.len()
        );
        Ok(())
    }

    /// Advance one tick.
    pub fn update(&mut self, input: &FrameInput, cues: &mut impl CueSink) {
        cues.play(Cue::Ambient);
        match self.state {
            GameState::Menu => {
                if let Some(id) = input.level_select {
                    match self.load_level(id) {
                        Ok(()) => self.set_state(GameState::Playing),
                        Err(e) => warn!("Level select ignored: {e}"),
                    }
                }
            }
            GameState::Playing => {
                self.simulate(input);
                if self.player.has_won {
                    self.set_state(GameState::Victory);
                    cues.play(Cue::Victory);
                }
            }
            GameState::Victory => {
                if input.confirm {
                    self.set_state(GameState::Menu);
                }
            }
        }
    }

    fn simulate(&mut self, input: &FrameInput) {
        let speed = self.config.move_speed;
        for (held, step) in [(input.forward, Step::Forward), (input.backward, Step::Backward)] {
            if !held {
                continue;
            }
            let outcome = self.player.try_move(&mut self.grid, step, speed);
            match outcome {
                MoveOutcome::CollectedGoal => {
                    info!(
                        "Goal collected at ({:.1}, {:.1})",
                        self.player.x, self.player.y
                    );
                    // The rest of this tick's input is dropped
                    return;
                }
                MoveOutcome::Blocked => trace!("{step:?} blocked"),
                MoveOutcome::Moved => {}
            }
        }
        if input.rotate_left {
            self.player.rotate(-self.config.turn_speed);
        }
        if input.rotate_right {
            self.player.rotate(self.config.turn_speed);
        }
    }

    fn set_state(&mut self, next: GameState) {
        debug!("State {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Draw the first-person view. Outside of play only the background is
    /// drawn; menus and summaries belong to the presentation layer.
    pub fn render(&mut self, out: &mut impl PixelSink) {
        let (width, height) = out.size();
        let palette = self.catalog.palette();
        fill_background(out, palette.ceiling, palette.floor);
        if self.state != GameState::Playing || width == 0 || height == 0 {
            return;
        }

        let camera = Camera::from_player(&self.player, self.config.fov(), width as f32);
        let wall_params = WallParams {
            step: self.config.ray_step,
            tile_size: self.config.tile_size,
            falloff: self.config.shade_falloff,
        };
        let columns = walls::cast_columns(&self.grid, &camera, width, height, &wall_params);
        walls::draw_walls(out, &columns, &mut self.depth, palette, wall_params.falloff);

        // Depth buffer is complete from here on
        let sprite_params = SpriteParams {
            tile_size: self.config.tile_size,
            falloff: self.config.shade_falloff,
            key_threshold: self.config.key_threshold,
        };
        sprites::draw_sprites(
            out,
            &mut self.sprites,
            &camera,
            &self.textures,
            &self.depth,
            &sprite_params,
        );
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn level_id(&self) -> Option<u32> {
        self.level_id
    }

    pub fn level_name(&self) -> Option<&str> {
        let id = self.level_id?;
        self.catalog.get(id).ok().map(|l| l.name.as_str())
    }

    pub fn has_won(&self) -> bool {
        self.player.has_won
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }
}

fn fill_background(out: &mut impl PixelSink, ceiling: Rgb, floor: Rgb) {
    let (width, height) = out.size();
    if height == 0 {
        return;
    }
    let mid = height / 2;
    for x in 0..width {
        if mid > 0 {
            out.vline(x, 0, mid - 1, ceiling);
        }
        out.vline(x, mid, height - 1, floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{frame::FrameBuffer, world::Tile};

    fn game() -> Game {
        let config = GameConfig {
            width: 80,
            height: 60,
            ..GameConfig::default()
        };
        Game::new(config, LevelCatalog::builtin()).unwrap()
    }

    fn select(id: u32) -> FrameInput {
        FrameInput {
            level_select: Some(id),
            ..FrameInput::default()
        }
    }

    #[test]
    fn starts_in_menu() {
        let g = game();
        assert_eq!(g.state(), GameState::Menu);
        assert_eq!(g.level_id(), None);
        assert_eq!(g.grid().tile_at(0, 0), Tile::Wall);
    }

    #[test]
    fn menu_ignores_motion_and_unknown_levels() {
        let mut g = game();
        let mut cues = Vec::new();
        g.update(
            &FrameInput {
                forward: true,
                confirm: true,
                ..FrameInput::default()
            },
            &mut cues,
        );
        assert_eq!(g.state(), GameState::Menu);
        g.update(&select(42), &mut cues);
        assert_eq!(g.state(), GameState::Menu);
        assert_eq!(cues, vec![Cue::Ambient, Cue::Ambient]);
    }

    #[test]
    fn level_select_starts_play_at_spawn() {
        let mut g = game();
        g.update(&select(2), &mut Silent);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.level_id(), Some(2));
        assert_eq!(g.level_name(), Some("Cellars"));
        let p = g.player();
        assert_eq!((p.x, p.y), (96.0, 96.0));
        assert!(!p.has_won);
        assert_eq!(g.sprites().len(), 3);
    }

    #[test]
    fn victory_only_returns_to_menu_on_confirm() {
        let mut g = game();
        g.update(&select(1), &mut Silent);
        g.player.has_won = true;
        let mut cues = Vec::new();
        g.update(&FrameInput::default(), &mut cues);
        assert_eq!(g.state(), GameState::Victory);
        assert_eq!(cues, vec![Cue::Ambient, Cue::Victory]);

        // Level select does nothing here
        g.update(&select(2), &mut Silent);
        assert_eq!(g.state(), GameState::Victory);
        assert_eq!(g.level_id(), Some(1));

        g.update(
            &FrameInput {
                confirm: true,
                ..FrameInput::default()
            },
            &mut Silent,
        );
        assert_eq!(g.state(), GameState::Menu);
    }

    #[test]
    fn rotation_input() {
        let mut g = game();
        g.update(&select(1), &mut Silent);
        let a = g.player().angle;
        g.update(
            &FrameInput {
                rotate_right: true,
                ..FrameInput::default()
            },
            &mut Silent,
        );
        assert!((g.player().angle - (a + 0.05)).abs() < 1e-6);
        g.update(
            &FrameInput {
                rotate_left: true,
                rotate_right: true,
                ..FrameInput::default()
            },
            &mut Silent,
        );
        assert!((g.player().angle - (a + 0.05)).abs() < 1e-6);
    }

    #[test]
    fn render_outside_play_is_background_only() {
        let mut g = game();
        let mut fb = FrameBuffer::new(80, 60);
        g.render(&mut fb);
        let p = g.catalog().palette().clone();
        assert_eq!(fb.pixel(10, 0), Some(p.ceiling));
        assert_eq!(fb.pixel(10, 59), Some(p.floor));
    }

    #[test]
    fn render_fills_depth_for_every_column() {
        let mut g = game();
        g.update(&select(1), &mut Silent);
        let mut fb = FrameBuffer::new(80, 60);
        g.render(&mut fb);
        assert_eq!(g.depth().len(), 80);
        assert!(g.depth().as_slice().iter().all(|d| d.is_finite() && *d > 0.0));
        // Sprites were re-sorted farthest first
        for pair in g.sprites().windows(2) {
            assert!(pair[0].dist_sq >= pair[1].dist_sq);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        for config in [
            GameConfig {
                ray_step: 0.0,
                ..GameConfig::default()
            },
            GameConfig {
                tile_size: -64.0,
                ..GameConfig::default()
            },
            GameConfig {
                width: 0,
                ..GameConfig::default()
            },
        ] {
            assert!(matches!(
                Game::new(config, LevelCatalog::builtin()),
                Err(ConfigError::Invalid(_))
            ));
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn collecting_goal_ends_the_tick() {
        let src = r#######"
            [[level]]
            id = 1
            rows = ["#####", "#.G.#", "#####"]
            spawn = { x = 1.9, y = 1.5 }
        "#######;
        let config = GameConfig {
            move_speed: 10.0,
            ..GameConfig::default()
        };
        let mut g = Game::new(config, LevelCatalog::from_toml_str(src).unwrap()).unwrap();
        g.update(&select(1), &mut Silent);
        let angle = g.player().angle;

        let mut cues = Vec::new();
        g.update(
            &FrameInput {
                forward: true,
                backward: true,
                rotate_right: true,
                ..FrameInput::default()
            },
            &mut cues,
        );
        assert_eq!(g.state(), GameState::Victory);
        assert_eq!(g.grid().tile_at(2, 1), Tile::Empty);
        // Still standing on the goal cell, facing the same way
        assert_eq!(g.grid().cell_at(g.player().x, g.player().y), (2, 1));
        assert_eq!(g.player().angle, angle);
        assert_eq!(cues, vec![Cue::Ambient, Cue::Victory]);
    }
}
