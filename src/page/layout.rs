//! Page description and layout
//!
//! A `PageLayout` lists the sections and dishes of the landing page. `build`
//! stacks them vertically into a `PageDocument` using the markup conventions
//! the engine's default selectors expect.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{layout, panel, selectors};
use crate::dom::{self, Document, ElementId};
use crate::error::{PageError, Result};

use super::document::{Node, PageDocument, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub name: String,
    pub price: String,
}

impl Dish {
    fn new(name: &str, price: &str) -> Self {
        Self {
            name: name.to_string(),
            price: price.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Defaults to most of the viewport height
    #[serde(default)]
    pub min_height: Option<f32>,
    #[serde(default)]
    pub dishes: Vec<Dish>,
    /// Shown only while the menu panel is expanded
    #[serde(default)]
    pub extra_dishes: Vec<Dish>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub brand: String,
    pub sections: Vec<SectionLayout>,
    pub newsletter: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::sabor_salvadoreno()
    }
}

const LINK_WIDTH: f32 = 110.0;
const EDGE: f32 = 16.0;
const BODY_HEIGHT: f32 = 48.0;
const FOOTER_HEIGHT: f32 = 160.0;
const ORDER_BUTTON_HEIGHT: f32 = 36.0;

impl PageLayout {
    /// The restaurant landing page
    pub fn sabor_salvadoreno() -> Self {
        let section = |id: &str, title: &str, body: &str| SectionLayout {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            min_height: None,
            dishes: Vec::new(),
            extra_dishes: Vec::new(),
        };

        let mut inicio = section(
            "inicio",
            "Inicio",
            "Auténtica comida salvadoreña, hecha con amor desde 1998.",
        );
        inicio.min_height = Some(640.0);

        let mut menu = section("menu", "Menú", "Nuestros platillos favoritos.");
        menu.dishes = vec![
            Dish::new("Pupusas Revueltas", "$2.50"),
            Dish::new("Yuca Frita con Chicharrón", "$4.75"),
            Dish::new("Sopa de Pata", "$6.00"),
        ];
        menu.extra_dishes = vec![
            Dish::new("Tamales de Elote", "$1.75"),
            Dish::new("Panes con Pavo", "$5.50"),
            Dish::new("Empanadas de Plátano", "$1.50"),
        ];

        Self {
            brand: "Sabor Salvadoreño".to_string(),
            sections: vec![
                inicio,
                menu,
                section(
                    "nosotros",
                    "Nosotros",
                    "Recetas de la abuela, ingredientes frescos y el calor de nuestra tierra.",
                ),
                section(
                    "contacto",
                    "Contacto",
                    "Visítanos en San Salvador o escríbenos para reservaciones.",
                ),
            ],
            newsletter: true,
        }
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let payload = std::fs::read_to_string(path).map_err(|source| PageError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&payload)
    }

    /// Lay the page out for a viewport
    pub fn build(&self, width: f32, height: u32) -> PageDocument {
        let mut doc = PageDocument::new(width, height);

        let navbar = doc.push(
            Node::new("nav")
                .class("navbar navbar-custom")
                .text(&self.brand)
                .fixed(),
        );
        let collapse = doc.push(Node::new("div").class("navbar-collapse").child_of(navbar).fixed());
        for section in &self.sections {
            doc.push(
                Node::new("a")
                    .class("nav-link")
                    .attr("href", &format!("#{}", section.id))
                    .text(&section.title)
                    .child_of(collapse)
                    .fixed(),
            );
        }

        let mut y = 0.0;
        for section in &self.sections {
            y = self.build_section(&mut doc, section, y, width, height as f32);
        }

        if self.newsletter {
            let footer = doc.push(
                Node::new("footer")
                    .text("Recibe nuestras promociones")
                    .at(Rect::new(0.0, y, width, FOOTER_HEIGHT)),
            );
            doc.push(
                Node::new("input")
                    .id("newsletter-email")
                    .attr("type", "email")
                    .attr("placeholder", "tu@correo.com")
                    .child_of(footer)
                    .at(Rect::new(width / 2.0 - 220.0, y + 72.0, 300.0, layout::BUTTON_HEIGHT)),
            );
            doc.push(
                Node::new("button")
                    .id("newsletter-submit")
                    .text("Suscribirme")
                    .child_of(footer)
                    .at(Rect::new(width / 2.0 + 96.0, y + 72.0, 124.0, layout::BUTTON_HEIGHT)),
            );
        }

        doc.push(
            Node::new("button")
                .id("btnVolverArriba")
                .text("↑")
                .style("display", "none")
                .fixed(),
        );

        place_fixed(&mut doc);
        doc
    }

    fn build_section(
        &self,
        doc: &mut PageDocument,
        section: &SectionLayout,
        top: f32,
        width: f32,
        viewport_height: f32,
    ) -> f32 {
        let element = doc.push(
            Node::new("section")
                .id(&section.id)
                .at(Rect::new(0.0, top, width, 0.0)),
        );
        let mut y = top + layout::NAVBAR_HEIGHT + layout::SECTION_PADDING;

        doc.push(
            Node::new("h2")
                .text(&section.title)
                .child_of(element)
                .at(Rect::new(EDGE * 2.0, y, width - EDGE * 4.0, layout::SECTION_TITLE_HEIGHT)),
        );
        y += layout::SECTION_TITLE_HEIGHT;

        if !section.body.is_empty() {
            doc.push(
                Node::new("p")
                    .text(&section.body)
                    .child_of(element)
                    .at(Rect::new(EDGE * 2.0, y, width - EDGE * 4.0, BODY_HEIGHT)),
            );
            y += BODY_HEIGHT;
        }

        if !section.dishes.is_empty() || !section.extra_dishes.is_empty() {
            y += layout::CARD_GAP;
            let container = if section.extra_dishes.is_empty() {
                element
            } else {
                doc.push(
                    Node::new("div")
                        .id("platos-container")
                        .child_of(element)
                        .at(Rect::new(0.0, y, width, 0.0)),
                )
            };
            let grid_top = y;
            y = place_cards(doc, container, &section.dishes, y, width, false);

            if !section.extra_dishes.is_empty() {
                let button = doc.push(
                    Node::new("button")
                        .id("toggle-menu")
                        .child_of(container)
                        .at(Rect::new(width / 2.0 - 120.0, y, 240.0, layout::BUTTON_HEIGHT)),
                );
                doc.push(
                    Node::new("span")
                        .id("toggle-text")
                        .text(panel::COLLAPSED_LABEL)
                        .child_of(button),
                );
                doc.push(Node::new("i").id("toggle-icon").class("bi bi-chevron-down").child_of(button));
                y += layout::BUTTON_HEIGHT + layout::CARD_GAP;
                y = place_cards(doc, container, &section.extra_dishes, y, width, true);
                doc.place(container, Rect::new(0.0, grid_top, width, y - grid_top));
            }
        }

        y += layout::SECTION_PADDING;
        let min_height = section.min_height.unwrap_or(viewport_height * 0.8);
        let height = (y - top).max(min_height);
        doc.place(element, Rect::new(0.0, top, width, height));
        top + height
    }
}

fn place_cards(
    doc: &mut PageDocument,
    parent: ElementId,
    dishes: &[Dish],
    top: f32,
    width: f32,
    extra: bool,
) -> f32 {
    if dishes.is_empty() {
        return top;
    }
    let cols = layout::CARDS_PER_ROW.max(1);
    let row_width = cols as f32 * layout::CARD_WIDTH + (cols - 1) as f32 * layout::CARD_GAP;
    let left = ((width - row_width) / 2.0).max(EDGE);

    for (index, dish) in dishes.iter().enumerate() {
        let col = index % cols;
        let row = index / cols;
        let rect = Rect::new(
            left + col as f32 * (layout::CARD_WIDTH + layout::CARD_GAP),
            top + row as f32 * (layout::CARD_HEIGHT + layout::CARD_GAP),
            layout::CARD_WIDTH,
            layout::CARD_HEIGHT,
        );
        let mut node = Node::new("div")
            .class("card-plato")
            .attr("data-aos", "fade-up")
            .attr("data-dish", &dish.name)
            .attr("data-price", &dish.price)
            .text(&dish.name)
            .child_of(parent)
            .at(rect);
        if extra {
            node = node.class("card-extra");
        }
        let card = doc.push(node);
        doc.push(
            Node::new("button")
                .class("btn btn-success")
                .attr("data-dish", &dish.name)
                .text("Ordenar")
                .child_of(card)
                .at(Rect::new(
                    rect.x + EDGE,
                    rect.bottom() - ORDER_BUTTON_HEIGHT - EDGE,
                    rect.width - EDGE * 2.0,
                    ORDER_BUTTON_HEIGHT,
                )),
        );
    }

    let rows = dishes.len().div_ceil(cols);
    top + rows as f32 * (layout::CARD_HEIGHT + layout::CARD_GAP)
}

/// Position viewport-anchored elements for the current viewport size
pub fn place_fixed(doc: &mut PageDocument) {
    let width = doc.viewport_width();
    let height = doc.viewport_height() as f32;

    if let Some(navbar) = dom::resolve(doc, selectors::NAVBAR) {
        doc.place(navbar, Rect::new(0.0, 0.0, width, layout::NAVBAR_HEIGHT));
    }
    let links = dom::resolve_all(doc, selectors::NAV_LINKS);
    let links_left = (width - links.len() as f32 * LINK_WIDTH - EDGE).max(0.0);
    if let Some(collapse) = dom::resolve(doc, selectors::NAV_COLLAPSE) {
        doc.place(
            collapse,
            Rect::new(links_left, 0.0, width - links_left, layout::NAVBAR_HEIGHT),
        );
    }
    for (index, link) in links.into_iter().enumerate() {
        doc.place(
            link,
            Rect::new(
                links_left + index as f32 * LINK_WIDTH,
                0.0,
                LINK_WIDTH,
                layout::NAVBAR_HEIGHT,
            ),
        );
    }
    if let Some(button) = dom::resolve(doc, selectors::BACK_TO_TOP) {
        let size = layout::BACK_TO_TOP_SIZE;
        doc.place(
            button,
            Rect::new(width - size - EDGE * 2.0, height - size - EDGE * 2.0, size, size),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    #[test]
    fn test_sections_stack_in_order() {
        let doc = PageLayout::default().build(1024.0, 720);
        let sections = doc.query_all(&Selector::parse("section[id]").unwrap());
        assert_eq!(sections.len(), 4);

        let tops: Vec<i32> = sections.iter().map(|s| doc.offset_top(*s).unwrap()).collect();
        assert_eq!(tops[0], 0);
        assert!(tops.windows(2).all(|w| w[0] < w[1]));
        assert!(doc.content_height() > tops[3] as u32);
    }

    #[test]
    fn test_default_selectors_resolve() {
        let doc = PageLayout::default().build(1024.0, 720);
        for selector in [
            selectors::NAVBAR,
            selectors::NAV_COLLAPSE,
            selectors::BACK_TO_TOP,
            selectors::PANEL_CONTROL,
            selectors::PANEL_CONTAINER,
            selectors::PANEL_LABEL,
            selectors::PANEL_ICON,
            selectors::PANEL_ANCHOR,
        ] {
            assert!(dom::resolve(&doc, selector).is_some(), "{selector}");
        }
        assert_eq!(dom::resolve_all(&doc, selectors::NAV_LINKS).len(), 4);
        assert_eq!(dom::resolve_all(&doc, selectors::PANEL_EXTRA_ITEMS).len(), 3);
        assert_eq!(dom::resolve_all(&doc, selectors::REVEALABLE).len(), 6);
    }

    #[test]
    fn test_layout_from_json() {
        let layout = PageLayout::from_json(
            r#"{"brand": "Prueba", "sections": [{"id": "uno", "title": "Uno"}], "newsletter": false}"#,
        )
        .unwrap();
        let doc = layout.build(800.0, 600);
        assert_eq!(dom::resolve_all(&doc, "section[id]").len(), 1);
        assert!(dom::resolve(&doc, "#newsletter-email").is_none());
    }
}
