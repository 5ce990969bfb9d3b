//! Pointer interaction for the circular layout.
//!
//! Every divider has a handle on the rim. Every sector has a handle at the
//! angle where it ends, which only shows up (and can only be grabbed) while
//! the sector is empty. Grabbing an empty sector and pulling it to either
//! side hands the drag over to the divider on that side, so the sector grows
//! out of the correct edge.

use crate::engine::{Change, Engine};
use crate::geometry::{Bounds, Geometry, Point};
use crate::handle::{Handle, HandleId, HandleMetrics};
use crate::mapper::{CircularMapper, TICKS_PER_CIRCLE};
use std::collections::HashMap;

#[derive(Debug)]
pub struct DragController {
    engine: Engine,
    zero_angle: i64,
    metrics: HandleMetrics,
    dividers: Vec<Handle>,
    sectors: Vec<Handle>,
    handle_start_angle: i64,
}

impl DragController {
    pub fn new(engine: Engine, zero_angle: i64, metrics: HandleMetrics) -> Self {
        let mut sectors = vec![Handle::sector(0); engine.sector_count()];
        if let Some(last) = sectors.last_mut() {
            last.angle = TICKS_PER_CIRCLE;
        }

        let mut controller = Self {
            dividers: vec![Handle::divider(0); engine.divider_count()],
            sectors,
            engine,
            zero_angle,
            metrics,
            handle_start_angle: 0,
        };
        controller.relayout();
        controller
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// See [`Engine::connect`].
    pub fn connect(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.engine.connect(observer);
    }

    pub fn divider_handles(&self) -> &[Handle] {
        &self.dividers
    }

    pub fn sector_handles(&self) -> &[Handle] {
        &self.sectors
    }

    pub fn handle(&self, id: HandleId) -> &Handle {
        match id {
            HandleId::Divider(index) => &self.dividers[index],
            HandleId::Sector(index) => &self.sectors[index],
        }
    }

    pub fn metrics(&self) -> &HandleMetrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: HandleMetrics) {
        self.metrics = metrics;
    }

    pub fn zero_angle(&self) -> i64 {
        self.zero_angle
    }

    pub fn set_zero_angle(&mut self, zero_angle: i64) {
        self.zero_angle = zero_angle;
    }

    pub fn mapper(&self, geometry: &Geometry) -> CircularMapper {
        CircularMapper::new(self.engine.total(), self.zero_angle, geometry.center)
    }

    pub fn handle_position(&self, geometry: &Geometry, id: HandleId) -> Point {
        let handle = self.handle(id);
        let radius = geometry.radius + self.metrics.radius_offset(&handle.kind);
        self.mapper(geometry).angle_to_position(handle.angle, radius)
    }

    pub fn handle_bounds(&self, geometry: &Geometry, id: HandleId) -> Bounds {
        let size = self.metrics.size(&self.handle(id).kind);
        Bounds::around(self.handle_position(geometry, id), size)
    }

    pub fn set_total(&mut self, total: i64) -> Vec<Change> {
        let changes = self.engine.set_total(total);
        self.apply(&changes);
        changes
    }

    pub fn set_divider_value(&mut self, index: usize, value: i64) -> Vec<Change> {
        let changes = self.engine.set_divider_value(index, value);
        self.apply(&changes);
        changes
    }

    pub fn set_sector_value(&mut self, index: usize, value: i64) -> Vec<Change> {
        let changes = self.engine.set_sector_value(index, value);
        self.apply(&changes);
        changes
    }

    /// First handle under `pos`: dividers win over sectors, lower indices win
    /// within a kind. Hidden sector handles are skipped.
    pub fn hit_test(&self, geometry: &Geometry, pos: Point) -> Option<HandleId> {
        let mapper = self.mapper(geometry);
        let on_handle = |handle: &Handle| {
            let radius = geometry.radius + self.metrics.radius_offset(&handle.kind);
            let center = mapper.angle_to_position(handle.angle, radius);
            center.distance(pos) < self.metrics.size(&handle.kind) / 2.0
        };

        self.dividers
            .iter()
            .position(|h| on_handle(h))
            .map(HandleId::Divider)
            .or_else(|| {
                self.sectors
                    .iter()
                    .position(|h| h.is_visible() && on_handle(h))
                    .map(HandleId::Sector)
            })
    }

    /// Starts a drag on the handle under `pos`. Refused while a handle of the
    /// same kind is already held.
    pub fn press(&mut self, geometry: &Geometry, pos: Point) -> Option<HandleId> {
        self.engine.collapse_empty_sectors();

        let hit = self.hit_test(geometry, pos)?;
        match hit {
            HandleId::Divider(index) => {
                if self.dividers.iter().any(|h| h.pressed) {
                    return None;
                }
                self.dividers[index].pressed = true;
            }
            HandleId::Sector(index) => {
                if self.sectors.iter().any(|h| h.pressed) {
                    return None;
                }
                self.sectors[index].pressed = true;
                self.handle_start_angle = self.sectors[index].angle;
            }
        }

        log::debug!("Pressed {hit}");
        Some(hit)
    }

    pub fn drag(&mut self, geometry: &Geometry, pos: Point) {
        for index in 0..self.sectors.len() {
            if self.sectors[index].pressed {
                self.drag_sector(geometry, index, pos);
            }
        }
        for index in 0..self.dividers.len() {
            if self.dividers[index].pressed {
                self.drag_divider(geometry, index, pos);
            }
        }
    }

    /// Ends the drag. Returns whether anything was held.
    pub fn release(&mut self) -> bool {
        self.engine.collapse_empty_sectors();

        let mut released = false;
        for handle in self.dividers.iter_mut().chain(self.sectors.iter_mut()) {
            released |= handle.pressed;
            handle.pressed = false;
        }
        if released {
            log::debug!("Released drag");
        }
        released
    }

    /// Grows or shrinks the sector under `pos`. `magnitude` is in eighths of
    /// a degree, 120 per wheel notch, positive away from the user.
    pub fn wheel(&mut self, geometry: &Geometry, pos: Point, magnitude: i64) -> Vec<Change> {
        if magnitude == 0 {
            return Vec::new();
        }

        let value = self.pointer_value(geometry, pos);
        let dividers = self.engine.divider_count();
        let sector = (0..dividers)
            .find(|&i| self.engine.divider_value(i) >= value)
            .unwrap_or(dividers);

        let mut delta = self.mapper(geometry).angle_to_value(magnitude / 5);
        if delta == 0 {
            delta = magnitude.signum();
        }
        self.set_sector_value(sector, self.engine.sector_value(sector) + delta)
    }

    /// Pulls a pointer value that looks like it wrapped across the origin
    /// back to the nearer end of the legal range of `min_index..=max_index`.
    pub fn stabilized_value(&self, min_index: usize, max_index: usize, value: i64) -> i64 {
        let minimum = self.engine.divider_minimum(min_index);
        let maximum = self.engine.divider_maximum(max_index);
        let range = maximum - minimum;
        let total = self.engine.total();

        if value - self.engine.divider_value(min_index) > range {
            if total - value + minimum < value - maximum {
                minimum
            } else {
                maximum
            }
        } else if self.engine.divider_value(max_index) - value > range {
            if total + value - maximum < minimum - value {
                maximum
            } else {
                minimum
            }
        } else {
            value
        }
    }

    fn pointer_value(&self, geometry: &Geometry, pos: Point) -> i64 {
        let mapper = self.mapper(geometry);
        mapper.angle_to_value(mapper.position_to_angle(pos))
    }

    fn drag_divider(&mut self, geometry: &Geometry, index: usize, pos: Point) {
        let value = self.pointer_value(geometry, pos);
        let value = self.stabilized_value(index, index, value);
        self.set_divider_value(index, value);
    }

    fn drag_sector(&mut self, geometry: &Geometry, index: usize, pos: Point) {
        let dividers = self.engine.divider_count();
        let min_index = index.saturating_sub(1);
        let max_index = if index < dividers { index } else { index - 1 };

        let value = self.pointer_value(geometry, pos);
        let value = self.stabilized_value(min_index, max_index, value);
        let mapper = self.mapper(geometry);
        let angle = mapper.value_to_angle(value);

        let start = self.handle_start_angle;
        if angle == start {
            return;
        }
        self.engine.set_sector_collapsed(index, false);

        // (divider taking over, divider on the other side)
        let handover = if angle < start && index > 0 {
            Some((index - 1, (index < dividers).then_some(index)))
        } else if angle > start && index < dividers {
            Some((index, index.checked_sub(1)))
        } else {
            None
        };

        if let Some((taker, other)) = handover {
            // only one divider follows the pointer
            for i in 0..self.dividers.len() {
                if i == taker || !self.dividers[i].pressed {
                    continue;
                }
                self.dividers[i].pressed = false;
                if Some(i) == other {
                    log::debug!("Sector {index} pushed through, divider {taker} takes over");
                    self.set_divider_value(i, mapper.angle_to_value(start));
                }
            }
            self.dividers[taker].pressed = true;
        }
    }

    fn apply(&mut self, changes: &[Change]) {
        for change in changes {
            match *change {
                Change::Divider { index, value } => self.move_handles(index, value),
                Change::Sector { index, value } => self.sectors[index].set_visible(value == 0),
                Change::Total(_) => {}
            }
        }
        self.restack();
    }

    fn relayout(&mut self) {
        for index in 0..self.engine.divider_count() {
            self.move_handles(index, self.engine.divider_value(index));
        }
        for index in 0..self.engine.sector_count() {
            let empty = self.engine.sector_value(index) == 0;
            self.sectors[index].set_visible(empty);
        }
        self.restack();
    }

    fn move_handles(&mut self, index: usize, value: i64) {
        let angle = CircularMapper::new(self.engine.total(), self.zero_angle, Point::default())
            .value_to_angle(value);
        self.dividers[index].angle = angle;
        self.sectors[index].angle = angle;
    }

    /// Numbers visible sector handles sharing an angle in index order, with
    /// the origin and the full turn counting as the same angle.
    fn restack(&mut self) {
        let mut levels: HashMap<i64, usize> = HashMap::new();
        for handle in &mut self.sectors {
            let level = if handle.is_visible() {
                let next = levels
                    .entry(handle.angle.rem_euclid(TICKS_PER_CIRCLE))
                    .or_default();
                *next += 1;
                *next - 1
            } else {
                0
            };
            handle.set_collapse_level(level);
        }
    }
}
