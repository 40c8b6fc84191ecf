use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use rand::Rng;
use std::path::Path;
use tracing::info;

use crate::common::Cell;
use crate::map::{Map, Tile};

pub const JPS_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const A_STAR_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
pub const SHARED_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const OBSTACLE_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

/// One random colour per terrain weight.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgb<u8>>,
}

impl Palette {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let colors = (0..26)
            .map(|_| {
                let h = rng.gen::<f64>();
                let s = 0.5 + rng.gen::<f64>() / 2.0;
                let l = 0.4 + rng.gen::<f64>() / 5.0;
                hls_to_rgb(h, l, s)
            })
            .collect();
        Palette { colors }
    }

    pub fn color(&self, weight: u32) -> Rgb<u8> {
        self.colors[weight as usize % self.colors.len()]
    }
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> Rgb<u8> {
    let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    if s == 0.0 {
        return Rgb([channel(l); 3]);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    let hue = |t: f64| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            m1 + (m2 - m1) * t * 6.0
        } else if t < 0.5 {
            m2
        } else if t < 2.0 / 3.0 {
            m1 + (m2 - m1) * (2.0 / 3.0 - t) * 6.0
        } else {
            m1
        }
    };
    Rgb([
        channel(hue(h + 1.0 / 3.0)),
        channel(hue(h)),
        channel(hue(h - 1.0 / 3.0)),
    ])
}

/// Map raster with computed paths drawn over the terrain.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(map: &Map, palette: &Palette) -> Self {
        let mut image = RgbImage::new(map.width as u32, map.height as u32);
        for cell in map.cells() {
            let color = match map.tile(cell) {
                Some(Tile::Weight(weight)) => palette.color(weight),
                _ => OBSTACLE_COLOR,
            };
            image.put_pixel(cell.1 as u32, cell.0 as u32, color);
        }
        Canvas { image }
    }

    pub fn pixel(&self, cell: Cell) -> Rgb<u8> {
        *self.image.get_pixel(cell.1 as u32, cell.0 as u32)
    }

    pub fn draw_jps(&mut self, path: &[Cell]) {
        for &(x, y) in path {
            self.image.put_pixel(y as u32, x as u32, JPS_COLOR);
        }
    }

    /// Cells already on a JPS path turn red, the rest black.
    pub fn draw_a_star(&mut self, path: &[Cell]) {
        for &(x, y) in path {
            let pixel = self.image.get_pixel_mut(y as u32, x as u32);
            *pixel = if *pixel == JPS_COLOR {
                SHARED_COLOR
            } else {
                A_STAR_COLOR
            };
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        self.image
            .save(path)
            .with_context(|| format!("cannot save {}", path.display()))?;
        info!("saved path image to {}", path.display());
        Ok(())
    }
}
