//! Page content rendering
//!
//! Draws the in-memory document the way the page stylesheet would: classes
//! and inline styles written by the engine decide colors, visibility and
//! offsets.

use femtovg::{Canvas, Color, FontId, Paint, Path, renderer::OpenGl};
use page_sync::config::{classes, layout, notify, rendering, selectors};
use page_sync::dom::{self, Document, ElementId};
use page_sync::page::{Node, PageDocument, Rect};

use crate::theme::Theme;

use super::PageView;

type Rgb = (f32, f32, f32);

fn rgba(color: Rgb, alpha: f32) -> Color {
    Color::rgbaf(color.0, color.1, color.2, alpha)
}

/// Inline `opacity`, defaulting to opaque
fn opacity(doc: &PageDocument, element: ElementId) -> f32 {
    doc.style(element, "opacity")
        .and_then(|value| value.trim().parse::<f32>().ok())
        .unwrap_or(1.0)
        .clamp(0.0, 1.0)
}

/// Vertical offset of a `translateY(..px)` component
fn translate_y(transform: &str) -> f32 {
    transform
        .split("translateY(")
        .nth(1)
        .and_then(|rest| rest.split(')').next())
        .and_then(|value| value.trim().trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

/// Alpha and vertical offset of an animated element
fn visual_state(doc: &PageDocument, element: ElementId) -> (f32, f32) {
    let unrevealed = doc.attribute(element, "data-aos").is_some()
        && !doc.has_class(element, classes::REVEALED);
    if unrevealed {
        return (0.0, 0.0);
    }
    let offset = doc
        .style(element, "transform")
        .map(|t| translate_y(&t))
        .unwrap_or(0.0);
    (opacity(doc, element), offset)
}

pub struct PageRenderer<'a> {
    canvas: &'a mut Canvas<OpenGl>,
    fonts: &'a [FontId],
    theme: &'a Theme,
    width: f32,
    scale: f32,
    scroll: f32,
}

impl<'a> PageRenderer<'a> {
    pub fn new(
        canvas: &'a mut Canvas<OpenGl>,
        fonts: &'a [FontId],
        theme: &'a Theme,
        width: f32,
        scale: f32,
        scroll: f32,
    ) -> Self {
        Self {
            canvas,
            fonts,
            theme,
            width,
            scale,
            scroll,
        }
    }

    pub fn draw(&mut self, view: &PageView) {
        let doc = view.doc;
        let mut section_index = 0;

        for (id, node) in doc.elements() {
            if node.fixed || !doc.is_displayed(id) {
                continue;
            }
            match node.tag.as_str() {
                "section" => {
                    if section_index % 2 == 1 {
                        let rect = self.screen(node.rect, false, 0.0);
                        self.fill_rect(rect, rgba(self.theme.section_alt, 1.0), 0.0);
                    }
                    section_index += 1;
                }
                "h2" => {
                    let rect = self.screen(node.rect, false, 0.0);
                    self.left_text(rect, &node.text, rendering::TITLE_FONT_SIZE, rgba(self.theme.accent, 1.0));
                }
                "p" => {
                    let rect = self.screen(node.rect, false, 0.0);
                    self.left_text(rect, &node.text, rendering::BODY_FONT_SIZE, rgba(self.theme.muted, 1.0));
                }
                "div" if node.has_class("card-plato") => self.draw_card(doc, id, node),
                "button" if node.has_class("btn-success") => self.draw_order_button(doc, node),
                "button" if node.dom_id() == Some("toggle-menu") => self.draw_toggle(doc, node),
                "button" if node.dom_id() == Some("newsletter-submit") => {
                    let rect = self.screen(node.rect, false, 0.0);
                    self.fill_rect(rect, rgba(self.theme.accent, 1.0), rendering::CORNER_RADIUS);
                    self.centered_text(rect, &node.text, rendering::BODY_FONT_SIZE, rgba(self.theme.button_fg, 1.0));
                }
                "footer" => {
                    let rect = self.screen(node.rect, false, 0.0);
                    self.fill_rect(rect, rgba(self.theme.footer, 1.0), 0.0);
                    let title = Rect::new(rect.x, rect.y + 16.0 * self.scale, rect.width, 40.0 * self.scale);
                    self.centered_text(title, &node.text, rendering::BODY_FONT_SIZE, rgba(self.theme.footer_fg, 1.0));
                }
                "input" => self.draw_input(node, view),
                _ => {}
            }
        }

        self.draw_navbar(doc);
        self.draw_back_to_top(doc);
        self.draw_notifications(view);
    }

    fn draw_card(&mut self, doc: &PageDocument, id: ElementId, node: &Node) {
        let (alpha, offset) = visual_state(doc, id);
        if alpha <= 0.0 {
            return;
        }
        let rect = self.screen(node.rect, false, offset);
        self.fill_rect(rect, rgba(self.theme.card, alpha), rendering::CORNER_RADIUS);
        self.stroke_rect(rect, rgba(self.theme.card_border, alpha));

        let name = Rect::new(rect.x, rect.y + 16.0 * self.scale, rect.width, 32.0 * self.scale);
        self.centered_text(name, &node.text, rendering::BODY_FONT_SIZE + 2.0, rgba(self.theme.fg, alpha));
        if let Some(price) = node.attributes.get("data-price") {
            let line = Rect::new(rect.x, name.bottom(), rect.width, 28.0 * self.scale);
            self.centered_text(line, price, rendering::BODY_FONT_SIZE, rgba(self.theme.accent, alpha));
        }
    }

    fn draw_order_button(&mut self, doc: &PageDocument, node: &Node) {
        let (alpha, offset) = node.parent.map_or((1.0, 0.0), |card| visual_state(doc, card));
        if alpha <= 0.0 {
            return;
        }
        let rect = self.screen(node.rect, false, offset);
        self.fill_rect(rect, rgba(self.theme.button_success, alpha), rendering::CORNER_RADIUS);
        self.centered_text(rect, &node.text, rendering::BODY_FONT_SIZE, rgba(self.theme.button_fg, alpha));
    }

    fn draw_toggle(&mut self, doc: &PageDocument, node: &Node) {
        let rect = self.screen(node.rect, false, 0.0);
        self.stroke_rect(rect, rgba(self.theme.accent, 1.0));

        let label = dom::resolve(doc, selectors::PANEL_LABEL)
            .and_then(|el| doc.text(el))
            .unwrap_or_default();
        let expanded = dom::resolve(doc, selectors::PANEL_ICON)
            .is_some_and(|el| doc.has_class(el, classes::ICON_EXPANDED));
        let chevron = if expanded { "▲" } else { "▼" };
        self.centered_text(
            rect,
            &format!("{label}  {chevron}"),
            rendering::BODY_FONT_SIZE,
            rgba(self.theme.accent, 1.0),
        );
    }

    fn draw_input(&mut self, node: &Node, view: &PageView) {
        let rect = self.screen(node.rect, false, 0.0);
        self.fill_rect(rect, rgba(self.theme.input_bg, 1.0), rendering::CORNER_RADIUS / 2.0);
        if view.newsletter_focused {
            self.stroke_rect(rect, rgba(self.theme.input_focus, 1.0));
        }
        let inner = Rect::new(rect.x + 12.0 * self.scale, rect.y, rect.width, rect.height);
        if view.newsletter.is_empty() {
            let placeholder = node.attributes.get("placeholder").map(String::as_str).unwrap_or("");
            self.left_text(inner, placeholder, rendering::BODY_FONT_SIZE, rgba(self.theme.muted, 0.7));
        } else {
            let text = if view.newsletter_focused {
                format!("{}|", view.newsletter)
            } else {
                view.newsletter.to_string()
            };
            self.left_text(inner, &text, rendering::BODY_FONT_SIZE, rgba(self.theme.fg, 1.0));
        }
    }

    fn draw_navbar(&mut self, doc: &PageDocument) {
        let Some(navbar) = dom::resolve(doc, selectors::NAVBAR) else {
            return;
        };
        let Some(node) = doc.node(navbar) else {
            return;
        };
        let scrolled = node.has_class(classes::NAVBAR_SCROLLED);
        let rect = self.screen(node.rect, true, 0.0);
        let color = if scrolled {
            self.theme.navbar_scrolled
        } else {
            self.theme.navbar
        };
        self.fill_rect(rect, rgba(color, if scrolled { 1.0 } else { 0.92 }), 0.0);
        if scrolled {
            let shadow = Rect::new(rect.x, rect.bottom(), rect.width, 3.0 * self.scale);
            self.fill_rect(shadow, Color::rgba(0, 0, 0, 50), 0.0);
        }

        let brand = Rect::new(rect.x + 24.0 * self.scale, rect.y, rect.width / 2.0, rect.height);
        self.left_text(brand, &node.text, rendering::TITLE_FONT_SIZE - 6.0, rgba(self.theme.navbar_fg, 1.0));

        for link in dom::resolve_all(doc, selectors::NAV_LINKS) {
            let Some(link_node) = doc.node(link) else {
                continue;
            };
            let rect = self.screen(link_node.rect, true, 0.0);
            let active = link_node.has_class(classes::NAV_LINK_ACTIVE);
            let color = if active { self.theme.accent } else { self.theme.navbar_fg };
            self.centered_text(rect, &link_node.text, rendering::NAV_FONT_SIZE, rgba(color, 1.0));
            if active {
                let underline = Rect::new(
                    rect.x + 20.0 * self.scale,
                    rect.bottom() - 14.0 * self.scale,
                    rect.width - 40.0 * self.scale,
                    2.0 * self.scale,
                );
                self.fill_rect(underline, rgba(self.theme.accent, 1.0), 0.0);
            }
        }
    }

    fn draw_back_to_top(&mut self, doc: &PageDocument) {
        let Some(button) = dom::resolve(doc, selectors::BACK_TO_TOP) else {
            return;
        };
        if !doc.is_displayed(button) {
            return;
        }
        let Some(node) = doc.node(button) else {
            return;
        };
        // Fading out until the grace delay removes it from layout
        let alpha = if node.has_class(classes::SHOW) { 1.0 } else { 0.35 };
        let rect = self.screen(node.rect, true, 0.0);
        let mut path = Path::new();
        path.circle(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0, rect.width / 2.0);
        self.canvas.fill_path(&path, &Paint::color(rgba(self.theme.accent, alpha)));
        self.centered_text(rect, &node.text, rendering::TITLE_FONT_SIZE - 6.0, rgba(self.theme.button_fg, alpha));
    }

    fn draw_notifications(&mut self, view: &PageView) {
        let doc = view.doc;
        for (index, element) in view.notifications.iter().enumerate() {
            let Some(node) = doc.node(*element).filter(|n| n.connected) else {
                continue;
            };
            let alpha = opacity(doc, *element);
            if alpha <= 0.0 {
                continue;
            }
            let offset = doc
                .style(*element, "transform")
                .map(|t| translate_y(&t))
                .unwrap_or(0.0);
            let color = if node.has_class(classes::ALERT_WARNING) {
                self.theme.alert_warning
            } else {
                self.theme.alert_success
            };

            let paint = self.text_paint(rgba(self.theme.alert_fg, alpha), rendering::BODY_FONT_SIZE);
            let text_width = self.text_width(&node.text, &paint) / self.scale;
            let width = (text_width + 48.0).max(notify::MIN_WIDTH_PX);
            let top = layout::NAVBAR_HEIGHT
                + 16.0
                + index as f32 * (layout::NOTIFICATION_HEIGHT + layout::NOTIFICATION_GAP);
            let logical = Rect::new(
                (self.width / self.scale - width) / 2.0,
                top,
                width,
                layout::NOTIFICATION_HEIGHT,
            );
            let rect = self.screen(logical, true, offset);
            self.fill_rect(rect, rgba(color, alpha), rendering::CORNER_RADIUS);
            self.stroke_rect(rect, Color::rgbaf(0.0, 0.0, 0.0, 0.08 * alpha));
            self.centered_text(rect, &node.text, rendering::BODY_FONT_SIZE, rgba(self.theme.alert_fg, alpha));
        }
    }

    /// Logical page rect to physical screen rect
    fn screen(&self, rect: Rect, fixed: bool, offset_y: f32) -> Rect {
        let scroll = if fixed { 0.0 } else { self.scroll };
        Rect::new(
            rect.x * self.scale,
            (rect.y - scroll + offset_y) * self.scale,
            rect.width * self.scale,
            rect.height * self.scale,
        )
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, radius: f32) {
        let mut path = Path::new();
        if radius > 0.0 {
            path.rounded_rect(rect.x, rect.y, rect.width, rect.height, radius * self.scale);
        } else {
            path.rect(rect.x, rect.y, rect.width, rect.height);
        }
        self.canvas.fill_path(&path, &Paint::color(color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let mut path = Path::new();
        path.rounded_rect(
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            rendering::CORNER_RADIUS * self.scale,
        );
        self.canvas
            .stroke_path(&path, &Paint::color(color).with_line_width(1.5 * self.scale));
    }

    fn text_paint(&self, color: Color, size: f32) -> Paint {
        let mut paint = Paint::color(color);
        paint.set_font(self.fonts);
        paint.set_font_size(size * self.scale);
        paint
    }

    fn text_width(&self, text: &str, paint: &Paint) -> f32 {
        self.canvas
            .measure_text(0.0, 0.0, text, paint)
            .map(|metrics| metrics.width())
            .unwrap_or(text.chars().count() as f32 * 8.0 * self.scale)
    }

    fn left_text(&mut self, rect: Rect, text: &str, size: f32, color: Color) {
        let paint = self.text_paint(color, size);
        let y = rect.y + rect.height / 2.0 + size * self.scale * 0.35;
        let _ = self.canvas.fill_text(rect.x.round(), y.round(), text, &paint);
    }

    fn centered_text(&mut self, rect: Rect, text: &str, size: f32, color: Color) {
        let paint = self.text_paint(color, size);
        let width = self.text_width(text, &paint);
        let x = rect.x + (rect.width - width) / 2.0;
        let y = rect.y + rect.height / 2.0 + size * self.scale * 0.35;
        let _ = self.canvas.fill_text(x.round(), y.round(), text, &paint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_y_parsing() {
        assert_eq!(translate_y("translateY(20px)"), 20.0);
        assert_eq!(translate_y("translateX(-50%) translateY(-20px)"), -20.0);
        assert_eq!(translate_y("translateY(0)"), 0.0);
        assert_eq!(translate_y("scale(2)"), 0.0);
    }

    #[test]
    fn test_unrevealed_elements_are_invisible() {
        let mut doc = PageDocument::new(800.0, 600);
        let card = doc.push(Node::new("div").attr("data-aos", "fade-up"));
        assert_eq!(visual_state(&doc, card), (0.0, 0.0));

        doc.add_class(card, classes::REVEALED);
        doc.set_style(card, "opacity", "0");
        doc.set_style(card, "transform", "translateY(20px)");
        assert_eq!(visual_state(&doc, card), (0.0, 20.0));

        doc.set_style(card, "opacity", "1");
        assert_eq!(visual_state(&doc, card).0, 1.0);
    }
}
