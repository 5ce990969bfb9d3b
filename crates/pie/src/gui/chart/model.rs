use crate::config::Config;
use crate::gui::chart::{FALLBACK_SECTOR_COLOR, PRESSED_SHADE, WHEEL_NOTCH};
use divvy::{Change, DragController, Engine, Geometry, HandleMetrics, Point};
use palette::{Srgb, Srgba};
use std::str::FromStr;

pub fn parse_palette(colors: &[String]) -> Vec<Srgba<f64>> {
    colors
        .iter()
        .filter_map(|hex| match Srgb::<u8>::from_str(hex) {
            Ok(rgb) => {
                let (r, g, b) = rgb.into_format::<f64>().into_components();
                Some(Srgba::new(r, g, b, 1.0))
            }
            Err(e) => {
                log::warn!("Ignoring palette color '{}': {}", hex, e);
                None
            }
        })
        .collect()
}

pub fn darker(color: Srgba<f64>) -> Srgba<f64> {
    let (r, g, b, a) = color.into_components();
    Srgba::new(r * PRESSED_SHADE, g * PRESSED_SHADE, b * PRESSED_SHADE, a)
}

fn build_slider(config: &Config) -> Result<DragController, divvy::Error> {
    let engine = Engine::new(config.dividers, config.total)?;
    Ok(DragController::new(
        engine,
        config.origin.zero_angle(),
        config.handles,
    ))
}

pub struct State {
    pub slider: DragController,
    pub palette: Vec<Srgba<f64>>,
    pub geometry: Geometry,
    pub pointer: Point,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, divvy::Error> {
        let slider = build_slider(config)?;
        let geometry = Geometry::fit(0.0, 0.0, &config.handles);
        Ok(Self {
            slider,
            palette: parse_palette(&config.palette),
            geometry,
            pointer: Point::default(),
        })
    }

    /// Applies a reloaded config. A new divider count rebuilds the slider
    /// (returns `true`, observers must be reconnected); a new total rescales it.
    pub fn apply_config(&mut self, config: &Config) -> Result<bool, divvy::Error> {
        self.palette = parse_palette(&config.palette);

        let rebuild = self.slider.engine().divider_count() != config.dividers;
        if rebuild {
            self.slider = build_slider(config)?;
        } else {
            self.slider.set_zero_angle(config.origin.zero_angle());
            self.slider.set_metrics(config.handles);
            self.slider.set_total(config.total);
        }
        Ok(rebuild)
    }

    pub fn connect(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.slider.connect(observer);
    }

    pub fn metrics(&self) -> &HandleMetrics {
        self.slider.metrics()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.geometry = Geometry::fit(width, height, self.slider.metrics());
    }

    pub fn sector_color(&self, index: usize) -> Srgba<f64> {
        if self.palette.is_empty() {
            let (r, g, b) = FALLBACK_SECTOR_COLOR;
            return Srgba::new(r, g, b, 1.0);
        }
        self.palette[index % self.palette.len()]
    }

    /// Returns whether a handle was grabbed.
    pub fn press(&mut self, point: Point) -> bool {
        self.pointer = point;
        self.slider.press(&self.geometry, point).is_some()
    }

    /// Returns whether a drag is in progress.
    pub fn update_cursor(&mut self, point: Point) -> bool {
        self.pointer = point;
        let dragging = self.is_dragging();
        if dragging {
            self.slider.drag(&self.geometry, point);
        }
        dragging
    }

    pub fn release(&mut self) -> bool {
        self.slider.release()
    }

    /// `dy` is the GTK scroll delta, positive towards the user.
    pub fn scroll(&mut self, dy: f64) -> bool {
        let magnitude = (-dy * WHEEL_NOTCH).round() as i64;
        !self
            .slider
            .wheel(&self.geometry, self.pointer, magnitude)
            .is_empty()
    }

    pub fn is_dragging(&self) -> bool {
        self.slider
            .divider_handles()
            .iter()
            .chain(self.slider.sector_handles())
            .any(|h| h.pressed)
    }

    pub fn summary(&self) -> String {
        let engine = self.slider.engine();
        let mut lines = vec![format!("Total: {}", engine.total()), String::new()];
        lines.extend(
            engine
                .sector_values()
                .iter()
                .enumerate()
                .map(|(i, value)| format!("Sector {}: {}", i + 1, value)),
        );
        lines.join("\n")
    }
}
