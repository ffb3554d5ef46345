//! `Surface` on a browser 2D canvas context

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Sprite, Surface};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::settings::AssetPaths;
use crate::sim::Aabb;

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    player_img: Option<HtmlImageElement>,
    enemy_img: Option<HtmlImageElement>,
}

impl CanvasSurface {
    /// Size the canvas to the logical field and start loading sprite images.
    ///
    /// Returns `None` if the canvas has no 2D context.
    pub fn new(canvas: &HtmlCanvasElement, assets: &AssetPaths) -> Option<Self> {
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        Some(Self {
            ctx,
            player_img: load_image(&assets.player_image),
            enemy_img: load_image(&assets.enemy_image),
        })
    }

    fn image(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
        match sprite {
            Sprite::Player => self.player_img.as_ref(),
            Sprite::Enemy => self.enemy_img.as_ref(),
        }
    }
}

/// Start an image load; the element decodes in the background
fn load_image(src: &str) -> Option<HtmlImageElement> {
    let img = HtmlImageElement::new().ok();
    match &img {
        Some(img) => img.set_src(src),
        None => log::warn!("Could not create image element for {}", src),
    }
    img
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);
    }

    fn fill_rect(&mut self, rect: Aabb, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            rect.min.x as f64,
            rect.min.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn sprite_ready(&self, sprite: Sprite) -> bool {
        self.image(sprite)
            .is_some_and(|img| img.complete() && img.natural_width() > 0)
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Aabb) {
        if let Some(img) = self.image(sprite) {
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                rect.min.x as f64,
                rect.min.y as f64,
                rect.size.x as f64,
                rect.size.y as f64,
            );
        }
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
