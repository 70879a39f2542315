//! Sprite textures. Pixels at or near black are the transparent key.

use crate::{frame::Rgb, sprites::SpriteKind};

const SIZE: usize = 32;

#[derive(Debug, Clone)]
pub struct Texture {
    width: usize,
    height: usize,
    texels: Vec<Rgb>,
}

impl Texture {
    pub fn new(width: usize, height: usize, texels: Vec<Rgb>) -> Option<Self> {
        if width == 0 || height == 0 || texels.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            texels,
        })
    }

    /// Uniform colour, mostly useful for tests.
    pub fn solid(width: usize, height: usize, color: Rgb) -> Self {
        Self {
            width,
            height,
            texels: vec![color; width * height],
        }
    }

    fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> Rgb) -> Self {
        let mut texels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Coordinates are clamped to the texture.
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Rgb {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.texels[y * self.width + x]
    }
}

/// One texture per sprite kind, indexed by `SpriteKind::index`.
#[derive(Debug, Clone)]
pub struct TextureSet {
    textures: [Texture; SpriteKind::COUNT],
}

impl TextureSet {
    pub fn new(textures: [Texture; SpriteKind::COUNT]) -> Self {
        Self { textures }
    }

    pub fn builtin() -> Self {
        Self {
            textures: [barrel(), pillar(), lamp()],
        }
    }

    #[inline]
    pub fn get(&self, kind: SpriteKind) -> &Texture {
        &self.textures[kind.index()]
    }
}

impl Default for TextureSet {
    fn default() -> Self {
        Self::builtin()
    }
}

fn barrel() -> Texture {
    let wood = Rgb::new(139, 90, 43);
    let band = Rgb::new(90, 90, 96);
    Texture::from_fn(SIZE, SIZE, |x, y| {
        // Lower half of the cell only, rounded sides
        if y < SIZE / 2 || !(6..SIZE - 6).contains(&x) {
            return Rgb::BLACK;
        }
        if y == SIZE / 2 + 2 || y == SIZE - 4 {
            return band;
        }
        // Vertical staves
        if x % 5 == 0 {
            Rgb::new(110, 70, 33)
        } else {
            wood
        }
    })
}

fn pillar() -> Texture {
    Texture::from_fn(SIZE, SIZE, |x, y| {
        if !(11..SIZE - 11).contains(&x) {
            // Capital and base are wider
            if (y < 3 || y >= SIZE - 3) && (8..SIZE - 8).contains(&x) {
                return Rgb::new(200, 200, 190);
            }
            return Rgb::BLACK;
        }
        // Fluting
        let v = if x % 3 == 0 { 150 } else { 180 };
        Rgb::new(v, v, v - 10)
    })
}

fn lamp() -> Texture {
    let c = (SIZE / 2) as i32;
    Texture::from_fn(SIZE, SIZE, |x, y| {
        let (dx, dy) = (x as i32 - c, y as i32 - 8);
        if dx * dx + dy * dy <= 25 {
            return Rgb::new(255, 230, 120);
        }
        // Pole
        if y > 12 && (c - 1..=c).contains(&(x as i32)) {
            return Rgb::new(60, 60, 60);
        }
        Rgb::BLACK
    })
}
