//! Level catalog: grid templates, starting sprites and spawn poses, plus the
//! colour table the wall pass looks tiles up in.
//!
//! Catalogs are plain data. The built-in one ships two levels; others can be
//! read from TOML:
//!
//! ```toml
//! [[level]]
//! id = 3
//! name = "Corridor"
//! rows = ["#####", "#..G#", "#####"]
//! spawn = { x = 1.5, y = 1.5, angle = 0.0 }
//! sprites = [{ x = 2.5, y = 1.5, kind = "Lamp" }]
//! ```
//!
//! Positions are in tile units and get scaled by the tile size on load.

use std::{collections::BTreeMap, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    frame::Rgb,
    sprites::SpriteKind,
    world::{GridTemplate, Tile},
};

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("Could not read level catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse level catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Level {0} has no rows")]
    EmptyGrid(u32),
    #[error("Level {id}: row {row} is {len} tiles wide, expected {expected}")]
    RaggedRow {
        id: u32,
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("Level {id}: unknown tile '{ch}' at column {col}, row {row}")]
    BadTile {
        id: u32,
        col: usize,
        row: usize,
        ch: char,
    },
    #[error("Level {0} is defined twice")]
    DuplicateId(u32),
    #[error("No level with id {0}")]
    Unknown(u32),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPose {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteSpawn {
    pub x: f32,
    pub y: f32,
    pub kind: SpriteKind,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub id: u32,
    pub name: String,
    pub grid: GridTemplate,
    pub sprites: Vec<SpriteSpawn>,
    pub spawn: SpawnPose,
}

/// Colour lookup for wall tiles plus the background halves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Indexed by `Tile::index`
    pub tiles: [Rgb; Tile::COUNT],
    pub ceiling: Rgb,
    pub floor: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            tiles: [
                Rgb::new(0, 0, 0),       // Empty, never drawn
                Rgb::new(230, 41, 55),   // Wall
                Rgb::new(0, 121, 241),   // DecorWallA
                Rgb::new(0, 228, 48),    // DecorWallB
                Rgb::new(255, 203, 0),   // Goal
            ],
            ceiling: Rgb::new(30, 30, 70),
            floor: Rgb::new(40, 40, 40),
        }
    }
}

impl Palette {
    #[inline]
    pub fn tile(&self, tile: Tile) -> Rgb {
        self.tiles[tile.index()]
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    palette: Option<Palette>,
    #[serde(default, rename = "level")]
    levels: Vec<LevelDef>,
}

#[derive(Debug, Deserialize)]
struct LevelDef {
    id: u32,
    #[serde(default)]
    name: String,
    rows: Vec<String>,
    spawn: SpawnPose,
    #[serde(default)]
    sprites: Vec<SpriteSpawn>,
}

#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: BTreeMap<u32, Level>,
    palette: Palette,
}

impl LevelCatalog {
    pub fn builtin() -> Self {
        let defs = [
            LevelDef {
                id: 1,
                name: "Courtyard".to_owned(),
                rows: rows(&[
                    "########",
                    "#......#",
                    "#.A..B.#",
                    "#......#",
                    "#.A..B.#",
                    "#......#",
                    "#.....G#",
                    "########",
                ]),
                spawn: SpawnPose {
                    x: 1.5,
                    y: 1.5,
                    angle: 0.0,
                },
                sprites: vec![
                    SpriteSpawn {
                        x: 3.5,
                        y: 3.5,
                        kind: SpriteKind::Barrel,
                    },
                    SpriteSpawn {
                        x: 6.5,
                        y: 1.5,
                        kind: SpriteKind::Pillar,
                    },
                    SpriteSpawn {
                        x: 1.5,
                        y: 6.5,
                        kind: SpriteKind::Lamp,
                    },
                    SpriteSpawn {
                        x: 4.5,
                        y: 5.5,
                        kind: SpriteKind::Barrel,
                    },
                ],
            },
            LevelDef {
                id: 2,
                name: "Cellars".to_owned(),
                rows: rows(&[
                    "########",
                    "#..#...#",
                    "#..B.#.#",
                    "#.##.A.#",
                    "#....#.#",
                    "#A##.#.#",
                    "#...B.G#",
                    "########",
                ]),
                spawn: SpawnPose {
                    x: 1.5,
                    y: 1.5,
                    angle: std::f32::consts::FRAC_PI_2,
                },
                sprites: vec![
                    SpriteSpawn {
                        x: 2.5,
                        y: 4.5,
                        kind: SpriteKind::Lamp,
                    },
                    SpriteSpawn {
                        x: 4.5,
                        y: 1.5,
                        kind: SpriteKind::Pillar,
                    },
                    SpriteSpawn {
                        x: 6.5,
                        y: 4.5,
                        kind: SpriteKind::Lamp,
                    },
                ],
            },
        ];
        // The built-in layouts are known-good
        Self::from_defs(defs.into_iter().collect(), Palette::default())
            .unwrap_or_else(|e| panic!("built-in level catalog is invalid: {e}"))
    }

    pub fn from_toml_str(src: &str) -> Result<Self, LevelError> {
        let file: CatalogFile = toml::from_str(src)?;
        Self::from_defs(file.levels, file.palette.unwrap_or_default())
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let src = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&src)?;
        info!("Loaded {} level(s) from {:?}", catalog.len(), path);
        Ok(catalog)
    }

    fn from_defs(defs: Vec<LevelDef>, palette: Palette) -> Result<Self, LevelError> {
        let mut levels = BTreeMap::new();
        for def in defs {
            let id = def.id;
            let level = Level {
                id,
                name: def.name,
                grid: parse_rows(id, &def.rows)?,
                sprites: def.sprites,
                spawn: def.spawn,
            };
            debug!(
                "Level {id}: {}x{} tiles, {} sprite(s)",
                level.grid.width(),
                level.grid.height(),
                level.sprites.len()
            );
            if levels.insert(id, level).is_some() {
                return Err(LevelError::DuplicateId(id));
            }
        }
        Ok(Self { levels, palette })
    }

    pub fn get(&self, id: u32) -> Result<&Level, LevelError> {
        self.levels.get(&id).ok_or(LevelError::Unknown(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

fn rows(src: &[&str]) -> Vec<String> {
    src.iter().map(|r| (*r).to_owned()).collect()
}

fn parse_rows(id: u32, rows: &[String]) -> Result<GridTemplate, LevelError> {
    let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
    if width == 0 {
        return Err(LevelError::EmptyGrid(id));
    }
    let mut tiles = Vec::with_capacity(width * rows.len());
    for (row, line) in rows.iter().enumerate() {
        let len = line.chars().count();
        if len != width {
            return Err(LevelError::RaggedRow {
                id,
                row,
                len,
                expected: width,
            });
        }
        for (col, ch) in line.chars().enumerate() {
            let tile = Tile::from_char(ch).ok_or(LevelError::BadTile { id, col, row, ch })?;
            tiles.push(tile);
        }
    }
    GridTemplate::new(width, rows.len(), tiles).ok_or(LevelError::EmptyGrid(id))
}
