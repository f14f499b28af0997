//! Glint demo - color-cycling quads
//!
//! Exercise program for the presentation loop: the clear color cycles
//! through RGB space one fixed step at a time, and ten textured quads
//! march diagonally from a position derived from the current color.
//! Closing the window must be asked twice.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use glint::{Canvas, Config, Game, TextureHandle, WgpuGraphics};

const TEXTURE_SIZE: u32 = 256;

/// Diagonal grayscale gradient, RGBA8 row-major top-to-bottom.
fn gradient_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let shade = ((x + y) / 2) as u8;
            pixels.extend_from_slice(&[shade, shade, shade, 255]);
        }
    }
    pixels
}

struct ColorCycle {
    r: f32,
    g: f32,
    b: f32,
    rd: f32,
    gd: f32,
    bd: f32,
    width: f32,
    height: f32,
    texture: Option<TextureHandle>,
    ask_count: u32,
}

impl ColorCycle {
    fn new(width: u32, height: u32) -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            rd: 0.001,
            gd: 0.005,
            bd: 0.0025,
            width: width as f32,
            height: height as f32,
            texture: None,
            ask_count: 0,
        }
    }
}

impl Game<WgpuGraphics> for ColorCycle {
    fn init(&mut self, canvas: &mut Canvas<'_, WgpuGraphics>) -> Result<()> {
        let pixels = gradient_pixels(TEXTURE_SIZE);
        self.texture = Some(canvas.load_texture(TEXTURE_SIZE, TEXTURE_SIZE, &pixels)?);
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        if self.r > 1.0 || self.r < 0.0 {
            self.rd = -self.rd;
        }
        if self.g > 1.0 || self.g < 0.0 {
            self.gd = -self.gd;
        }
        if self.b > 1.0 || self.b < 0.0 {
            self.bd = -self.bd;
        }
        self.r += self.rd;
        self.g += self.gd;
        self.b += self.bd;
        Ok(())
    }

    fn render(&mut self, canvas: &mut Canvas<'_, WgpuGraphics>) -> Result<()> {
        canvas.clear(self.r, self.g, self.b)?;

        let Some(texture) = self.texture else {
            return Ok(());
        };
        canvas.set_texture(texture)?;

        let base_x = self.r * self.width;
        let base_y = self.g * self.height;
        for i in 0..10 {
            let offset = i as f32 * 10.0;
            canvas.draw_quad(
                base_x + offset,
                base_y + offset,
                50.0,
                50.0,
                0.0,
                0.0,
                1.0,
                1.0,
            )?;
        }
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    fn on_close(&mut self) -> bool {
        self.ask_count += 1;
        tracing::info!("Close asked ({}/2)", self.ask_count);
        self.ask_count >= 2
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config {
        title: "Glint demo".to_string(),
        ..Config::default()
    };
    let mut game = ColorCycle::new(config.width, config.height);

    if let Err(e) = glint::run(config, &mut game) {
        tracing::error!("Application error: {}", e);
        std::process::exit(1);
    }
}
