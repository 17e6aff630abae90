//! Theme colors for the demo page

pub struct Theme {
    /// Page background (RGB 0.0-1.0)
    pub bg: (f32, f32, f32),
    /// Every other section
    pub section_alt: (f32, f32, f32),
    pub fg: (f32, f32, f32),
    pub muted: (f32, f32, f32),
    /// Brand accent (titles, active link, toggle outline)
    pub accent: (f32, f32, f32),
    /// Navbar at the top of the page
    pub navbar: (f32, f32, f32),
    /// Navbar once scrolled
    pub navbar_scrolled: (f32, f32, f32),
    pub navbar_fg: (f32, f32, f32),
    pub card: (f32, f32, f32),
    pub card_border: (f32, f32, f32),
    pub button_success: (f32, f32, f32),
    pub button_fg: (f32, f32, f32),
    pub footer: (f32, f32, f32),
    pub footer_fg: (f32, f32, f32),
    pub input_bg: (f32, f32, f32),
    pub input_focus: (f32, f32, f32),
    pub alert_success: (f32, f32, f32),
    pub alert_warning: (f32, f32, f32),
    pub alert_fg: (f32, f32, f32),
}

impl Theme {
    /// Warm palette of the restaurant page
    pub fn sabor() -> Self {
        Self {
            bg: (0.99, 0.97, 0.93),             // Cream
            section_alt: (0.96, 0.92, 0.85),    // Masa
            fg: (0.17, 0.12, 0.09),             // Coffee
            muted: (0.42, 0.35, 0.30),
            accent: (0.80, 0.33, 0.10),         // Achiote
            navbar: (0.05, 0.20, 0.45),         // Flag blue
            navbar_scrolled: (0.03, 0.12, 0.30),
            navbar_fg: (1.0, 1.0, 1.0),
            card: (1.0, 1.0, 1.0),
            card_border: (0.88, 0.82, 0.74),
            button_success: (0.10, 0.53, 0.33),
            button_fg: (1.0, 1.0, 1.0),
            footer: (0.12, 0.09, 0.07),
            footer_fg: (0.95, 0.90, 0.84),
            input_bg: (1.0, 1.0, 1.0),
            input_focus: (0.05, 0.20, 0.45),
            alert_success: (0.82, 0.93, 0.86),
            alert_warning: (1.0, 0.93, 0.75),
            alert_fg: (0.17, 0.12, 0.09),
        }
    }
}
