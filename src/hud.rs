//! Overlay drawn on top of the 3D view: minimap, menu level markers, victory
//! banner, and the status line shown in the window title.

use gridcaster::{FrameBuffer, Game, GameState, PixelSink, Rgb, Tile, sprites::SpriteKind};

const MINIMAP_SIZE: i32 = 60;
const BLINK_PERIOD: f32 = 0.5;

pub struct Hud {
    blink_timer: f32,
    blink_on: bool,
}

impl Default for Hud {
    fn default() -> Self {
        Self::new()
    }
}

impl Hud {
    pub fn new() -> Self {
        Self {
            blink_timer: 0.0,
            blink_on: true,
        }
    }

    /// Advance animations by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.blink_timer += dt;
        while self.blink_timer >= BLINK_PERIOD {
            self.blink_timer -= BLINK_PERIOD;
            self.blink_on = !self.blink_on;
        }
    }

    pub fn draw(&self, fb: &mut FrameBuffer, game: &Game) {
        match game.state() {
            GameState::Menu => self.draw_menu(fb, game),
            GameState::Playing => draw_minimap(fb, game),
            GameState::Victory => self.draw_victory(fb),
        }
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, game: &Game) {
        // One marker per selectable level
        let count = game.catalog().len() as i32;
        let size = 24;
        let gap = 12;
        let total = count * size + (count - 1).max(0) * gap;
        let mut x = (fb.width() as i32 - total) / 2;
        let y = fb.height() as i32 / 2 - size / 2;
        let palette = game.catalog().palette();
        for _ in 0..count {
            fb.fill_rect(x, y, size, size, palette.tile(Tile::Wall));
            if self.blink_on {
                fb.fill_rect(x + 4, y + 4, size - 8, size - 8, Rgb::WHITE);
            }
            x += size + gap;
        }
    }

    fn draw_victory(&self, fb: &mut FrameBuffer) {
        let h = fb.height() as i32 / 6;
        let y = fb.height() as i32 / 2 - h / 2;
        let color = if self.blink_on {
            Rgb::new(255, 203, 0)
        } else {
            Rgb::new(200, 150, 0)
        };
        fb.fill_rect(0, y, fb.width() as i32, h, color);
    }

    pub fn status_line(&self, game: &Game) -> String {
        match (game.state(), game.level_id()) {
            (GameState::Menu, _) => {
                let ids: Vec<String> = game.catalog().ids().map(|id| id.to_string()).collect();
                format!("gridcaster - select a level [{}], Esc quits", ids.join("/"))
            }
            (GameState::Playing, Some(id)) => format!(
                "gridcaster - level {id}: {} - W/S move, A/D turn",
                game.level_name().unwrap_or("")
            ),
            (GameState::Victory, Some(id)) => {
                format!("gridcaster - level {id} complete! Enter for menu")
            }
            _ => "gridcaster".to_owned(),
        }
    }
}

fn draw_minimap(fb: &mut FrameBuffer, game: &Game) {
    let grid = game.grid();
    if grid.width() == 0 || grid.height() == 0 {
        return;
    }
    let cell = (MINIMAP_SIZE / grid.width().max(grid.height()) as i32).max(2);
    let palette = game.catalog().palette();
    for (row, tiles) in grid.rows().enumerate() {
        for (col, tile) in tiles.iter().enumerate() {
            let color = match tile {
                Tile::Empty => Rgb::BLACK,
                Tile::Wall => Rgb::WHITE,
                t => palette.tile(*t),
            };
            fb.fill_rect(col as i32 * cell, row as i32 * cell, cell, cell, color);
        }
    }

    let to_map = |x: f32, y: f32| {
        let ts = grid.tile_size();
        ((x / ts) * cell as f32, (y / ts) * cell as f32)
    };

    for sprite in game.sprites().iter().filter(|s| s.active) {
        let (sx, sy) = to_map(sprite.x, sprite.y);
        let color = match sprite.kind {
            SpriteKind::Barrel => Rgb::new(139, 90, 43),
            SpriteKind::Pillar => Rgb::new(180, 180, 170),
            SpriteKind::Lamp => Rgb::new(255, 230, 120),
        };
        fb.fill_rect(sx as i32 - 1, sy as i32 - 1, 2, 2, color);
    }

    let player = game.player();
    let (px, py) = to_map(player.x, player.y);
    fb.fill_rect(px as i32 - 2, py as i32 - 2, 4, 4, Rgb::new(230, 41, 55));
    // Facing
    let (s, c) = player.angle.sin_cos();
    for i in 0..10 {
        let x = px + c * i as f32;
        let y = py + s * i as f32;
        if x >= 0.0 && y >= 0.0 {
            fb.put_pixel(x as usize, y as usize, Rgb::new(253, 249, 0));
        }
    }
}
