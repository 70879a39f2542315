//! Billboard sprites: camera transform, back-to-front ordering and per-column
//! occlusion against the wall depth buffer.

use serde::{Deserialize, Serialize};

use crate::{
    camera::Camera,
    frame::{PixelSink, shade},
    textures::{Texture, TextureSet},
    walls::DepthBuffer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Barrel,
    Pillar,
    Lamp,
}

impl SpriteKind {
    pub const COUNT: usize = 3;
    pub const ALL: [SpriteKind; Self::COUNT] =
        [SpriteKind::Barrel, SpriteKind::Pillar, SpriteKind::Lamp];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub kind: SpriteKind,
    pub active: bool,
    /// Squared distance to the player, refreshed before every sort
    pub dist_sq: f32,
}

impl Sprite {
    pub fn new(x: f32, y: f32, kind: SpriteKind) -> Self {
        Self {
            x,
            y,
            kind,
            active: true,
            dist_sq: 0.0,
        }
    }
}

/// Refresh `dist_sq` on every sprite and order the slice farthest first.
pub fn sort_back_to_front(sprites: &mut [Sprite], px: f32, py: f32) {
    for s in sprites.iter_mut() {
        let dx = s.x - px;
        let dy = s.y - py;
        s.dist_sq = dx * dx + dy * dy;
    }
    sprites.sort_by(|a, b| b.dist_sq.total_cmp(&a.dist_sq));
}

/// A sprite mapped to the screen. Ranges are clipped, `left`/`top` are not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteProjection {
    /// Camera-space depth
    pub depth: f32,
    pub screen_x: f32,
    /// Height and width on screen, sprites are square
    pub size: f32,
    pub left: f32,
    pub top: f32,
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

/// `None` for sprites behind the camera or entirely off screen.
pub fn project(
    camera: &Camera,
    sprite: &Sprite,
    width: usize,
    height: usize,
    tile_size: f32,
) -> Option<SpriteProjection> {
    let [tx, ty] = camera.world_to_camera([sprite.x, sprite.y]);
    if ty <= 0.0 || !ty.is_finite() {
        return None;
    }

    let (sw, sh) = (width as f32, height as f32);
    let screen_x = camera.project_x(tx, ty, sw);
    // Same scale as the wall pass so a sprite is one tile tall
    let size = (sh / ty).abs() * tile_size;
    if size <= 0.0 || !size.is_finite() || !screen_x.is_finite() {
        return None;
    }

    let left = screen_x - size / 2.0;
    let top = (sh - size) / 2.0;
    let x0 = left.max(0.0).floor() as usize;
    let x1 = (left + size).min(sw).ceil().max(0.0) as usize;
    let y0 = top.max(0.0).floor() as usize;
    let y1 = (top + size).min(sh).ceil().max(0.0) as usize;
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some(SpriteProjection {
        depth: ty,
        screen_x,
        size,
        left,
        top,
        x0,
        x1: x1.min(width),
        y0,
        y1: y1.min(height),
    })
}

/// Draw one projected sprite, returns the number of pixels written.
///
/// Whole columns are skipped unless the sprite is strictly nearer than the
/// wall at that column.
pub fn draw_sprite(
    out: &mut impl PixelSink,
    proj: &SpriteProjection,
    texture: &Texture,
    depth: &DepthBuffer,
    falloff: f32,
    key_threshold: u8,
) -> usize {
    let (tw, th) = (texture.width() as f32, texture.height() as f32);
    let mut drawn = 0;
    for x in proj.x0..proj.x1 {
        if proj.depth >= depth.get(x) {
            continue;
        }
        let tex_x = ((x as f32 + 0.5 - proj.left) * tw / proj.size).max(0.0) as usize;
        for y in proj.y0..proj.y1 {
            let tex_y = ((y as f32 + 0.5 - proj.top) * th / proj.size).max(0.0) as usize;
            let texel = texture.texel(tex_x, tex_y);
            if texel.is_key(key_threshold) {
                continue;
            }
            out.put_pixel(x, y, shade(texel, proj.depth, falloff));
            drawn += 1;
        }
    }
    drawn
}

pub struct SpriteParams {
    pub tile_size: f32,
    pub falloff: f32,
    pub key_threshold: u8,
}

/// Sort then draw every active sprite, farthest first. Must run after the
/// wall pass has filled `depth`.
pub fn draw_sprites(
    out: &mut impl PixelSink,
    sprites: &mut [Sprite],
    camera: &Camera,
    textures: &TextureSet,
    depth: &DepthBuffer,
    params: &SpriteParams,
) -> usize {
    let (width, height) = out.size();
    sort_back_to_front(sprites, camera.pos[0], camera.pos[1]);

    let mut drawn = 0;
    for sprite in sprites.iter().filter(|s| s.active) {
        let Some(proj) = project(camera, sprite, width, height, params.tile_size) else {
            continue;
        };
        drawn += draw_sprite(
            out,
            &proj,
            textures.get(sprite.kind),
            depth,
            params.falloff,
            params.key_threshold,
        );
    }
    drawn
}
