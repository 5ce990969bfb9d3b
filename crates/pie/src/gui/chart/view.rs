use super::LINE_WIDTH;
use super::model::{State, darker};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use divvy::{CircularMapper, Geometry, Handle, HandleId, TICKS_PER_CIRCLE};
use palette::Srgba;
use std::f64::consts::PI;

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

struct ChartRenderer<'a> {
    state: &'a State,
    geometry: &'a Geometry,
    mapper: CircularMapper,
    colors: &'a ThemeColors,
}

impl<'a> ChartRenderer<'a> {
    fn new(state: &'a State, geometry: &'a Geometry, colors: &'a ThemeColors) -> Self {
        Self {
            state,
            geometry,
            mapper: state.slider.mapper(geometry),
            colors,
        }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_sectors(cr)?;
        self.draw_dividing_lines(cr)?;
        self.draw_divider_handles(cr)?;
        self.draw_sector_handles(cr)?;
        Ok(())
    }

    fn draw_sectors(&self, cr: &Context) -> Result<(), cairo::Error> {
        let center = self.geometry.center;
        let ends = self
            .state
            .slider
            .divider_handles()
            .iter()
            .map(|h| h.angle)
            .chain(std::iter::once(TICKS_PER_CIRCLE));

        let mut start = 0;
        for (index, end) in ends.enumerate() {
            // no outlines here, the dividing lines are drawn once on top
            if end > start {
                set_color(cr, self.state.sector_color(index));
                cr.move_to(center.x, center.y);
                cr.arc(
                    center.x,
                    center.y,
                    self.geometry.radius,
                    self.mapper.to_radians(start),
                    self.mapper.to_radians(end),
                );
                cr.close_path();
                cr.fill()?;
            }
            start = end;
        }
        Ok(())
    }

    fn draw_dividing_lines(&self, cr: &Context) -> Result<(), cairo::Error> {
        let center = self.geometry.center;
        set_color(cr, self.colors.outline);
        cr.set_line_width(LINE_WIDTH);

        let angles = self
            .state
            .slider
            .divider_handles()
            .iter()
            .map(|h| h.angle)
            .chain(std::iter::once(0));
        for angle in angles {
            let rim = self.mapper.angle_to_position(angle, self.geometry.radius);
            cr.move_to(center.x, center.y);
            cr.line_to(rim.x, rim.y);
        }
        cr.stroke()?;

        cr.arc(center.x, center.y, self.geometry.radius, 0.0, 2.0 * PI);
        cr.stroke()
    }

    fn draw_divider_handles(&self, cr: &Context) -> Result<(), cairo::Error> {
        // reversed, so the handle that wins a press is painted on top
        let handles = self.state.slider.divider_handles();
        for index in (0..handles.len()).rev() {
            let fill = HandleState::resolve(&handles[index]).divider_color(self.colors);
            self.draw_handle(cr, HandleId::Divider(index), fill, self.colors.handle_border)?;
        }
        Ok(())
    }

    fn draw_sector_handles(&self, cr: &Context) -> Result<(), cairo::Error> {
        let handles = self.state.slider.sector_handles();
        for (index, handle) in handles.iter().enumerate() {
            if !handle.is_visible() {
                continue;
            }
            let fill = HandleState::resolve(handle).sector_color(self.state.sector_color(index));
            self.draw_handle(cr, HandleId::Sector(index), fill, self.colors.outline)?;
        }
        Ok(())
    }

    fn draw_handle(
        &self,
        cr: &Context,
        id: HandleId,
        fill: Srgba<f64>,
        border: Srgba<f64>,
    ) -> Result<(), cairo::Error> {
        let bounds = self.state.slider.handle_bounds(self.geometry, id);
        let (cx, cy) = (bounds.x + bounds.width / 2.0, bounds.y + bounds.height / 2.0);

        cr.new_sub_path();
        cr.arc(cx, cy, bounds.width / 2.0, 0.0, 2.0 * PI);
        set_color(cr, fill);
        cr.fill_preserve()?;
        set_color(cr, border);
        cr.set_line_width(LINE_WIDTH);
        cr.stroke()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandleState {
    Pressed,
    Idle,
}

impl HandleState {
    fn resolve(handle: &Handle) -> Self {
        if handle.pressed {
            Self::Pressed
        } else {
            Self::Idle
        }
    }

    fn divider_color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Pressed => colors.handle_pressed,
            Self::Idle => colors.handle,
        }
    }

    /// Sector handles wear their sector's color, a shade darker while held.
    fn sector_color(&self, sector: Srgba<f64>) -> Srgba<f64> {
        match self {
            Self::Pressed => darker(sector),
            Self::Idle => sector,
        }
    }
}

pub fn draw(
    cr: &Context,
    state: &State,
    geometry: &Geometry,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    ChartRenderer::new(state, geometry, colors).draw(cr)
}
