use crate::world::{Tile, WorldGrid};

/// Result of a single ray march.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance travelled along the ray, in world units
    pub distance: f32,
    pub tile: Tile,
}

/// March a ray from `(ox, oy)` in fixed increments of `step` until the
/// sampled cell is not empty. Leaving the grid counts as hitting a wall, which
/// is what bounds the loop. A step that is not positive and finite could
/// never leave the first cell, so it reports a boundary hit at the origin.
pub fn cast(grid: &WorldGrid, ox: f32, oy: f32, angle: f32, step: f32) -> RayHit {
    if !(step.is_finite() && step > 0.0) {
        return RayHit {
            distance: 0.0,
            tile: Tile::BOUNDARY,
        };
    }
    let (sin, cos) = angle.sin_cos();
    let mut d = 0.0f32;
    loop {
        let x = ox + d * cos;
        let y = oy + d * sin;
        let (col, row) = grid.cell_at(x, y);
        if !grid.in_bounds(col, row) {
            return RayHit {
                distance: d,
                tile: Tile::BOUNDARY,
            };
        }
        let tile = grid.tile_at(col, row);
        if tile != Tile::Empty {
            return RayHit { distance: d, tile };
        }
        d += step;
    }
}
