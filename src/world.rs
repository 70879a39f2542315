use serde::{Deserialize, Serialize};

/// Kind of a single grid cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    DecorWallA,
    DecorWallB,
    Goal,
}

impl Tile {
    pub const COUNT: usize = 5;

    /// Value returned for any cell outside the grid.
    pub const BOUNDARY: Tile = Tile::Wall;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_walkable(self) -> bool {
        self == Tile::Empty
    }

    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            'A' => Some(Tile::DecorWallA),
            'B' => Some(Tile::DecorWallB),
            'G' => Some(Tile::Goal),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::DecorWallA => 'A',
            Tile::DecorWallB => 'B',
            Tile::Goal => 'G',
        }
    }
}

/// Immutable tile layout a level is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTemplate {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl GridTemplate {
    pub fn new(width: usize, height: usize, tiles: Vec<Tile>) -> Option<Self> {
        if width == 0 || height == 0 || tiles.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    /// Rectangle of `width` x `height` cells with a Wall border and an empty
    /// interior.
    pub fn walled(width: usize, height: usize) -> Self {
        let mut tiles = vec![Tile::Empty; width * height];
        for row in 0..height {
            for col in 0..width {
                if row == 0 || col == 0 || row == height - 1 || col == width - 1 {
                    tiles[row * width + col] = Tile::Wall;
                }
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Builder-style cell override for hand-built grids.
    pub fn with_tile(mut self, col: usize, row: usize, tile: Tile) -> Self {
        if col < self.width && row < self.height {
            self.tiles[row * self.width + col] = tile;
        }
        self
    }
}

/// The mutable tile map of the level currently being played.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl WorldGrid {
    /// An empty 0x0 grid: every query answers with the boundary wall.
    pub fn new(tile_size: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            tile_size,
            tiles: Vec::new(),
        }
    }

    pub fn from_template(template: &GridTemplate, tile_size: f32) -> Self {
        let mut grid = Self::new(tile_size);
        grid.load_from(template);
        grid
    }

    /// Replace every cell with the template's contents.
    pub fn load_from(&mut self, template: &GridTemplate) {
        self.width = template.width;
        self.height = template.height;
        self.tiles.clear();
        self.tiles.extend_from_slice(&template.tiles);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.width && (row as usize) < self.height
    }

    /// Out of range reads are the boundary wall, never an error.
    #[inline]
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if self.in_bounds(col, row) {
            self.tiles[row as usize * self.width + col as usize]
        } else {
            Tile::BOUNDARY
        }
    }

    /// Returns false (and changes nothing) when the cell is out of range.
    pub fn set_tile(&mut self, col: i32, row: i32, tile: Tile) -> bool {
        if !self.in_bounds(col, row) {
            return false;
        }
        self.tiles[row as usize * self.width + col as usize] = tile;
        true
    }

    /// Grid cell containing the world-space point.
    #[inline]
    pub fn cell_at(&self, x: f32, y: f32) -> (i32, i32) {
        if !x.is_finite() || !y.is_finite() {
            return (-1, -1);
        }
        (
            (x / self.tile_size).floor() as i32,
            (y / self.tile_size).floor() as i32,
        )
    }

    #[inline]
    pub fn tile_at_world(&self, x: f32, y: f32) -> Tile {
        let (col, row) = self.cell_at(x, y);
        self.tile_at(col, row)
    }

    /// Row-major snapshot of the cells, for minimap drawing.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1))
    }
}
