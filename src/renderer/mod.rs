//! GPU-accelerated rendering with femtovg

mod fonts;
mod page;

use femtovg::{Canvas, Color, FontId, renderer::OpenGl};
use page_sync::dom::{Document, ElementId};
use page_sync::page::PageDocument;

use crate::theme::Theme;

use page::PageRenderer;

/// Everything a frame needs from the application
pub struct PageView<'a> {
    pub doc: &'a PageDocument,
    /// Live notification elements, oldest first
    pub notifications: &'a [ElementId],
    pub newsletter: &'a str,
    pub newsletter_focused: bool,
}

pub struct Renderer {
    canvas: Canvas<OpenGl>,
    fonts: Vec<FontId>,
    theme: Theme,
    width: f32,
    height: f32,
    scale: f32,
}

impl Renderer {
    pub fn new(renderer: OpenGl, width: f32, height: f32, scale: f32) -> anyhow::Result<Self> {
        let mut canvas = Canvas::new(renderer)
            .map_err(|err| anyhow::anyhow!("failed to create canvas: {err:?}"))?;
        let fonts = fonts::load_fonts(&mut canvas)?;

        Ok(Self {
            canvas,
            fonts,
            theme: Theme::sabor(),
            width,
            height,
            scale,
        })
    }

    pub fn resize(&mut self, width: f32, height: f32, scale: f32) {
        self.width = width;
        self.height = height;
        self.scale = scale;
    }

    pub fn render(&mut self, view: &PageView) {
        let (width, height) = (self.width, self.height);
        let bg = self.theme.bg;

        self.canvas.set_size(width as u32, height as u32, 1.0);
        self.canvas
            .clear_rect(0, 0, width as u32, height as u32, Color::rgbf(bg.0, bg.1, bg.2));

        {
            let scroll = view.doc.scroll_y() as f32;
            let mut page = PageRenderer::new(
                &mut self.canvas,
                &self.fonts,
                &self.theme,
                self.width,
                self.scale,
                scroll,
            );
            page.draw(view);
        }

        self.canvas.flush();
    }
}
