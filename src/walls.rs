use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    camera::Camera,
    frame::{PixelSink, Rgb, shade},
    level::Palette,
    raycast::{self, RayHit},
    world::{Tile, WorldGrid},
};

/// Perpendicular wall distance per screen column.
#[derive(Debug, Clone, Default)]
pub struct DepthBuffer {
    depth: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize) -> Self {
        Self {
            depth: vec![f32::INFINITY; width],
        }
    }

    pub fn resize(&mut self, width: usize) {
        self.depth.resize(width, f32::INFINITY);
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Columns outside the buffer read as zero, which occludes everything.
    #[inline]
    pub fn get(&self, x: usize) -> f32 {
        self.depth.get(x).copied().unwrap_or(0.0)
    }

    #[inline]
    pub fn set(&mut self, x: usize, d: f32) {
        if let Some(slot) = self.depth.get_mut(x) {
            *slot = d;
        }
    }

    pub fn fill(&mut self, d: f32) {
        self.depth.fill(d);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.depth
    }
}

/// One screen column's worth of wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallColumn {
    pub ray_angle: f32,
    pub raw_distance: f32,
    /// `raw_distance * cos(ray_angle - view angle)`
    pub corrected_distance: f32,
    pub tile: Tile,
    /// Unclipped wall height on screen
    pub height: f32,
}

impl WallColumn {
    /// Wall strip rows clipped to the screen, inclusive. `None` when nothing
    /// of the wall is visible.
    pub fn span(&self, screen_h: usize) -> Option<(usize, usize)> {
        if screen_h == 0 {
            return None;
        }
        if !self.height.is_finite() {
            // Standing against the wall
            return Some((0, screen_h - 1));
        }
        let sh = screen_h as f32;
        let top = (sh - self.height) / 2.0;
        let bottom = top + self.height;
        let y0 = (top.max(0.0)) as usize;
        let y1 = (bottom.min(sh - 1.0)) as usize;
        if bottom < 0.0 || y0 > y1 {
            return None;
        }
        Some((y0, y1))
    }
}

pub struct WallParams {
    pub step: f32,
    pub tile_size: f32,
    pub falloff: f32,
}

/// Cast one ray per column. Casts only read the grid, so they run in parallel.
pub fn cast_columns(
    grid: &WorldGrid,
    camera: &Camera,
    width: usize,
    height: usize,
    params: &WallParams,
) -> Vec<WallColumn> {
    let sh = height as f32;
    (0..width)
        .into_par_iter()
        .map(|x| {
            let ray_angle = camera.column_angle(x, width);
            let RayHit { distance, tile } =
                raycast::cast(grid, camera.pos[0], camera.pos[1], ray_angle, params.step);
            let corrected = distance * (ray_angle - camera.yaw).cos();
            WallColumn {
                ray_angle,
                raw_distance: distance,
                corrected_distance: corrected,
                tile,
                height: (sh / corrected) * params.tile_size,
            }
        })
        .collect()
}

/// Draw the wall strips and record every column's depth. The whole buffer is
/// written before this returns.
pub fn draw_walls(
    out: &mut impl PixelSink,
    columns: &[WallColumn],
    depth: &mut DepthBuffer,
    palette: &Palette,
    falloff: f32,
) {
    let (_, height) = out.size();
    depth.resize(columns.len());
    for (x, col) in columns.iter().enumerate() {
        depth.set(x, col.corrected_distance);
        if let Some((y0, y1)) = col.span(height) {
            let color = wall_color(palette, col.tile, col.corrected_distance, falloff);
            out.vline(x, y0, y1, color);
        }
    }
}

#[inline]
pub fn wall_color(palette: &Palette, tile: Tile, distance: f32, falloff: f32) -> Rgb {
    shade(palette.tile(tile), distance, falloff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{frame::FrameBuffer, world::GridTemplate};

    const TS: f32 = 64.0;

    fn setup(yaw: f32) -> (WorldGrid, Camera) {
        let template = GridTemplate::walled(8, 8).with_tile(5, 4, Tile::DecorWallA);
        let grid = WorldGrid::from_template(&template, TS);
        let mut cam = Camera {
            pos: [4.0 * TS, 4.0 * TS],
            yaw,
            fov: 0.0,
            fx: 0.0,
        };
        cam.set_fov_from_horizontal(80.0, 60f32.to_radians());
        (grid, cam)
    }

    fn params() -> WallParams {
        WallParams {
            step: 1.0,
            tile_size: TS,
            falloff: 0.01,
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn fisheye_correction_holds_for_every_column() {
        for yaw in [0.0, 1.0, -2.5, 13.0] {
            let (grid, cam) = setup(yaw);
            let cols = cast_columns(&grid, &cam, 80, 60, &params());
            assert_eq!(cols.len(), 80);
            for (x, c) in cols.iter().enumerate() {
                assert_eq!(c.ray_angle, cam.column_angle(x, 80));
                assert_eq!(c.corrected_distance, c.raw_distance * (c.ray_angle - yaw).cos());
                assert!(c.corrected_distance <= c.raw_distance);
            }
        }
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn center_column_is_uncorrected() {
        let (grid, cam) = setup(0.0);
        let cols = cast_columns(&grid, &cam, 80, 60, &params());
        let center = cols[40];
        assert_eq!(center.ray_angle, 0.0);
        assert_eq!(center.corrected_distance, center.raw_distance);
        assert_eq!(center.tile, Tile::DecorWallA);
    }

    #[test]
    fn flat_wall_is_not_curved() {
        // Facing a straight wall, corrected distances vary far less than raw
        let (grid, cam) = setup(std::f32::consts::PI);
        let cols = cast_columns(&grid, &cam, 80, 60, &params());
        let raw_spread = cols[0].raw_distance - cols[40].raw_distance;
        let corrected_spread = (cols[0].corrected_distance - cols[40].corrected_distance).abs();
        assert!(raw_spread > 10.0);
        assert!(corrected_spread <= 2.0, "{corrected_spread}");
    }

    #[test]
    fn draw_fills_depth_and_centers_strips() {
        let (grid, cam) = setup(0.0);
        let cols = cast_columns(&grid, &cam, 80, 60, &params());
        let mut fb = FrameBuffer::new(80, 60);
        let mut depth = DepthBuffer::new(3);
        draw_walls(&mut fb, &cols, &mut depth, &Palette::default(), 0.01);
        assert_eq!(depth.len(), 80);
        for (x, c) in cols.iter().enumerate() {
            assert_eq!(depth.get(x), c.corrected_distance);
        }

        let c = cols[40];
        let (y0, y1) = c.span(60).unwrap();
        // 60 / 64 * 64 = 60 tall: fills the screen height
        assert!(y0 <= 1 && y1 >= 58);
        let expected = shade(Palette::default().tile(Tile::DecorWallA), c.corrected_distance, 0.01);
        assert_eq!(fb.pixel(40, 30), Some(expected));
    }

    #[test]
    fn span_for_far_wall_is_centered() {
        let col = WallColumn {
            ray_angle: 0.0,
            raw_distance: 640.0,
            corrected_distance: 640.0,
            tile: Tile::Wall,
            height: 20.0,
        };
        assert_eq!(col.span(100), Some((40, 60)));
        let touching = WallColumn {
            height: f32::INFINITY,
            ..col
        };
        assert_eq!(touching.span(100), Some((0, 99)));
    }

    #[test]
    fn nearer_walls_are_brighter() {
        let p = Palette::default();
        let near = wall_color(&p, Tile::Wall, 10.0, 0.01);
        let far = wall_color(&p, Tile::Wall, 500.0, 0.01);
        assert!(near.r > far.r);
    }
}
