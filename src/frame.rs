use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn packed(self) -> u32 {
        pack_rgb(self.r, self.g, self.b)
    }

    #[inline]
    pub fn from_packed(p: u32) -> Self {
        Self {
            r: ((p >> 16) & 0xFF) as u8,
            g: ((p >> 8) & 0xFF) as u8,
            b: (p & 0xFF) as u8,
        }
    }

    /// Colour-key test used for sprite transparency.
    #[inline]
    pub fn is_key(self, threshold: u8) -> bool {
        self.r < threshold && self.g < threshold && self.b < threshold
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0RGB, what softbuffer expects
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

/// `255 / (1 + distance * falloff)`, truncated.
#[inline]
pub fn brightness(distance: f32, falloff: f32) -> u32 {
    let b = 255.0 / (1.0 + distance.max(0.0) * falloff);
    (b as u32).min(255)
}

/// Darken `color` by distance, component-wise.
#[inline]
pub fn shade(color: Rgb, distance: f32, falloff: f32) -> Rgb {
    let b = brightness(distance, falloff);
    Rgb {
        r: (color.r as u32 * b / 255) as u8,
        g: (color.g as u32 * b / 255) as u8,
        b: (color.b as u32 * b / 255) as u8,
    }
}

/// Where the wall and sprite passes put their output. The core only writes.
pub trait PixelSink {
    fn size(&self) -> (usize, usize);

    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb);

    /// Inclusive vertical run `y0..=y1` at column `x`.
    fn vline(&mut self, x: usize, y0: usize, y1: usize, color: Rgb) {
        for y in y0..=y1 {
            self.put_pixel(x, y, color);
        }
    }
}

/// Packed CPU framebuffer.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(Rgb::from_packed(self.pixels[y * self.width + x]))
        } else {
            None
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color.packed());
    }

    /// Clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w)).clamp(0, self.width as i32) as usize;
        let y1 = (y.saturating_add(h)).clamp(0, self.height as i32) as usize;
        if x0 >= x1 {
            return;
        }
        let c = color.packed();
        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0..start + x1].fill(c);
        }
    }
}

impl PixelSink for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    fn put_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color.packed();
        }
    }

    fn vline(&mut self, x: usize, y0: usize, y1: usize, color: Rgb) {
        if x >= self.width || self.height == 0 {
            return;
        }
        let y1 = y1.min(self.height - 1);
        let c = color.packed();
        let mut idx = y0 * self.width + x;
        for _y in y0..=y1 {
            self.pixels[idx] = c;
            idx += self.width;
        }
    }
}
