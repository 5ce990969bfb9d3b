use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub outline: Srgba<f64>,
    pub handle: Srgba<f64>,
    pub handle_pressed: Srgba<f64>,
    pub handle_border: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            outline: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.0, 0.0, 0.0, 1.0),
                None,
            ),
            handle: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.93, 0.93, 0.93, 1.0),
                Some(1.0),
            ),
            handle_pressed: Self::lookup_color(
                context,
                "theme_unfocused_bg_color",
                Srgba::new(0.75, 0.75, 0.75, 1.0),
                Some(1.0),
            ),
            handle_border: Self::lookup_color(
                context,
                "borders",
                Srgba::new(0.2, 0.2, 0.2, 1.0),
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.pie-drawing-area {
    background: none;
    background-color: transparent;
}
.pie-summary {
    font-feature-settings: \"tnum\";
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
