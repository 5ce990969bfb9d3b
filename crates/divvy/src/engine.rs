//! Constant-sum value model.
//!
//! `N` dividers split `[0, total]` into `N + 1` sectors. Divider values are
//! kept non-decreasing and inside `[0, total]`, so the sectors always add up
//! to the total. Sectors flagged as collapsed glue their two dividers
//! together: moving either one drags the whole run along.

use crate::error::Error;
use derive_more::Display;

/// A value change, reported to observers in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Change {
    #[display("total = {_0}")]
    Total(i64),
    #[display("sector {index} = {value}")]
    Sector { index: usize, value: i64 },
    #[display("divider {index} = {value}")]
    Divider { index: usize, value: i64 },
}

type Observer = Box<dyn FnMut(&Change)>;

pub struct Engine {
    total: i64,
    dividers: Vec<i64>,
    collapsed: Vec<bool>,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("total", &self.total)
            .field("dividers", &self.dividers)
            .field("collapsed", &self.collapsed)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Engine {
    /// Places the dividers evenly, rounding each position to the nearest unit.
    pub fn new(dividers: usize, total: i64) -> Result<Self, Error> {
        if dividers == 0 {
            return Err(Error::NoDividers);
        }
        if total < 1 {
            return Err(Error::InvalidTotal(total));
        }

        let sectors = (dividers + 1) as f64;
        let values = (1..=dividers)
            .map(|i| {
                let even = (i as f64 * total as f64 / sectors).round() as i64;
                even.min(total)
            })
            .collect();

        Ok(Self {
            total,
            dividers: values,
            collapsed: vec![false; dividers + 1],
            observers: Vec::new(),
        })
    }

    /// Registers an observer. Observers run synchronously, in registration
    /// order, for every change of every mutation.
    pub fn connect(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn divider_count(&self) -> usize {
        self.dividers.len()
    }

    pub fn sector_count(&self) -> usize {
        self.dividers.len() + 1
    }

    pub fn divider_value(&self, index: usize) -> i64 {
        debug_assert!(index < self.divider_count(), "divider {index} out of range");
        self.dividers[index]
    }

    pub fn divider_values(&self) -> &[i64] {
        &self.dividers
    }

    pub fn sector_value(&self, index: usize) -> i64 {
        debug_assert!(index < self.sector_count(), "sector {index} out of range");
        let upper = self.dividers.get(index).copied().unwrap_or(self.total);
        let lower = index.checked_sub(1).map_or(0, |i| self.dividers[i]);
        upper - lower
    }

    pub fn sector_values(&self) -> Vec<i64> {
        (0..self.sector_count()).map(|i| self.sector_value(i)).collect()
    }

    pub fn is_collapsed(&self, index: usize) -> bool {
        debug_assert!(index < self.sector_count(), "sector {index} out of range");
        self.collapsed[index]
    }

    pub fn set_sector_collapsed(&mut self, index: usize, collapsed: bool) {
        debug_assert!(index < self.sector_count(), "sector {index} out of range");
        self.collapsed[index] = collapsed;
    }

    /// Lowest value divider `index` may take: the value of the first divider
    /// to its left that is not glued to it by a collapsed sector, or 0.
    pub fn divider_minimum(&self, index: usize) -> i64 {
        let mut index = index;
        while index > 0 && self.collapsed[index] {
            index -= 1;
        }
        if index == 0 { 0 } else { self.dividers[index - 1] }
    }

    /// Highest value divider `index` may take, mirroring `divider_minimum`.
    pub fn divider_maximum(&self, index: usize) -> i64 {
        let last = self.divider_count() - 1;
        let mut index = index;
        while index < last && self.collapsed[index + 1] {
            index += 1;
        }
        if index == last {
            self.total
        } else {
            self.dividers[index + 1]
        }
    }

    /// Rescales every divider to a new total. Totals below 1 are ignored.
    pub fn set_total(&mut self, total: i64) -> Vec<Change> {
        if total < 1 || total == self.total {
            return Vec::new();
        }

        let ratio = total as f64 / self.total as f64;
        log::debug!("Rescaling total {} -> {} (ratio {ratio})", self.total, total);
        self.total = total;

        for value in &mut self.dividers {
            *value = ((*value as f64 * ratio).round() as i64).clamp(0, total);
        }

        let mut changes: Vec<Change> = self
            .dividers
            .iter()
            .enumerate()
            .map(|(index, &value)| Change::Divider { index, value })
            .collect();
        changes.extend((0..self.sector_count()).map(|index| Change::Sector {
            index,
            value: self.sector_value(index),
        }));
        changes.push(Change::Total(total));

        self.emit(changes)
    }

    /// Moves divider `index`, together with every divider glued to it by
    /// collapsed sectors, clamped between its free neighbours.
    pub fn set_divider_value(&mut self, index: usize, value: i64) -> Vec<Change> {
        debug_assert!(index < self.divider_count(), "divider {index} out of range");
        if value == self.dividers[index] {
            return Vec::new();
        }

        let (first, last) = self.linked_run(index);
        let value = value.clamp(self.divider_minimum(first), self.divider_maximum(last));
        log::trace!("Moving dividers {first}..={last} to {value}");

        self.dividers[first..=last].fill(value);

        let mut changes: Vec<Change> = (first..=last)
            .map(|index| Change::Divider { index, value })
            .collect();
        changes.extend((first..=last + 1).map(|index| Change::Sector {
            index,
            value: self.sector_value(index),
        }));

        self.emit(changes)
    }

    /// Resizes sector `index` by moving the divider that closes it (the one
    /// that opens it, for the last sector). Clears the collapsed flag.
    pub fn set_sector_value(&mut self, index: usize, value: i64) -> Vec<Change> {
        debug_assert!(index < self.sector_count(), "sector {index} out of range");
        if value == self.sector_value(index) {
            return Vec::new();
        }
        self.collapsed[index] = false;

        let last = self.divider_count();
        if index == last {
            self.set_divider_value(index - 1, self.total - value)
        } else if index == 0 {
            self.set_divider_value(0, value)
        } else {
            self.set_divider_value(index, self.dividers[index - 1] + value)
        }
    }

    /// Flags every sector that currently has zero width as collapsed.
    pub fn collapse_empty_sectors(&mut self) {
        for index in 0..self.sector_count() {
            if self.sector_value(index) == 0 {
                self.collapsed[index] = true;
            }
        }
    }

    fn linked_run(&self, index: usize) -> (usize, usize) {
        let last_divider = self.divider_count() - 1;
        let mut first = index;
        while first > 0 && self.collapsed[first] {
            first -= 1;
        }
        let mut last = index;
        while last < last_divider && self.collapsed[last + 1] {
            last += 1;
        }
        (first, last)
    }

    fn emit(&mut self, changes: Vec<Change>) -> Vec<Change> {
        for change in &changes {
            for observer in &mut self.observers {
                observer(change);
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(engine: &mut Engine) -> Rc<RefCell<Vec<Change>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        engine.connect(move |change| sink.borrow_mut().push(*change));
        log
    }

    fn assert_consistent(engine: &Engine) {
        assert_eq!(engine.sector_values().iter().sum::<i64>(), engine.total());
        assert!(engine.divider_values().windows(2).all(|w| w[0] <= w[1]));
        assert!(engine.sector_values().iter().all(|&v| v >= 0));
    }

    #[test]
    fn test_rejects_bad_construction() {
        assert_eq!(Engine::new(0, 100).unwrap_err(), Error::NoDividers);
        assert_eq!(Engine::new(2, 0).unwrap_err(), Error::InvalidTotal(0));
    }

    #[test]
    fn test_single_divider_starts_halfway() {
        let engine = Engine::new(1, 100).unwrap();
        assert_eq!(engine.divider_values(), &[50]);
        assert_eq!(engine.sector_values(), vec![50, 50]);
    }

    #[test]
    fn test_even_spacing_rounds_each_divider() {
        let engine = Engine::new(2, 100).unwrap();
        assert_eq!(engine.divider_values(), &[33, 67]);

        let tiny = Engine::new(5, 2).unwrap();
        assert_eq!(tiny.divider_values(), &[0, 1, 1, 1, 2]);
        assert_consistent(&tiny);
    }

    #[test]
    fn test_set_divider_reports_divider_then_sectors() {
        let mut engine = Engine::new(1, 100).unwrap();
        let log = recorded(&mut engine);

        let changes = engine.set_divider_value(0, 30);

        assert_eq!(engine.sector_values(), vec![30, 70]);
        let expected = vec![
            Change::Divider { index: 0, value: 30 },
            Change::Sector { index: 0, value: 30 },
            Change::Sector { index: 1, value: 70 },
        ];
        assert_eq!(changes, expected);
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn test_unchanged_values_are_silent() {
        let mut engine = Engine::new(3, 90).unwrap();
        let log = recorded(&mut engine);
        let before = engine.divider_values().to_vec();

        for i in 0..engine.divider_count() {
            assert!(engine.set_divider_value(i, engine.divider_value(i)).is_empty());
        }
        for i in 0..engine.sector_count() {
            assert!(engine.set_sector_value(i, engine.sector_value(i)).is_empty());
        }
        assert!(engine.set_total(90).is_empty());
        assert!(engine.set_total(0).is_empty());
        assert!(engine.set_total(-5).is_empty());

        assert!(log.borrow().is_empty());
        assert_eq!(engine.divider_values(), before.as_slice());
    }

    #[test]
    fn test_divider_is_clamped_between_neighbours() {
        let mut engine = Engine::new(3, 100).unwrap();
        assert_eq!(engine.divider_values(), &[25, 50, 75]);

        engine.set_divider_value(1, 10);
        assert_eq!(engine.divider_values(), &[25, 25, 75]);

        engine.set_divider_value(1, 1000);
        assert_eq!(engine.divider_values(), &[25, 75, 75]);

        engine.set_divider_value(0, -3);
        assert_eq!(engine.divider_values(), &[0, 75, 75]);
        assert_consistent(&engine);
    }

    #[test]
    fn test_empty_interior_sector() {
        let mut engine = Engine::new(2, 100).unwrap();

        engine.set_sector_value(1, 0);

        assert_eq!(engine.divider_values(), &[33, 33]);
        assert_eq!(engine.sector_values(), vec![33, 0, 67]);
        assert!(!engine.is_collapsed(1));
    }

    #[test]
    fn test_set_sector_maps_to_correct_divider() {
        let mut engine = Engine::new(2, 100).unwrap();

        engine.set_sector_value(0, 10);
        assert_eq!(engine.divider_values(), &[10, 67]);

        engine.set_sector_value(2, 13);
        assert_eq!(engine.divider_values(), &[10, 87]);

        engine.set_sector_value(1, 40);
        assert_eq!(engine.divider_values(), &[10, 50]);
        assert_consistent(&engine);
    }

    #[test]
    fn test_rescale_keeps_empty_sector() {
        let mut engine = Engine::new(2, 100).unwrap();
        engine.set_sector_value(1, 0);
        let log = recorded(&mut engine);

        engine.set_total(200);

        assert_eq!(engine.divider_values(), &[66, 66]);
        assert_eq!(engine.sector_values(), vec![66, 0, 134]);
        assert_eq!(
            *log.borrow(),
            vec![
                Change::Divider { index: 0, value: 66 },
                Change::Divider { index: 1, value: 66 },
                Change::Sector { index: 0, value: 66 },
                Change::Sector { index: 1, value: 0 },
                Change::Sector { index: 2, value: 134 },
                Change::Total(200),
            ]
        );
    }

    #[test]
    fn test_upscale_round_trip_drifts_at_most_one() {
        for total in [101, 250, 999, 12345] {
            let mut engine = Engine::new(4, 100).unwrap();
            engine.set_divider_value(0, 3);
            engine.set_divider_value(2, 61);
            let before = engine.divider_values().to_vec();

            engine.set_total(total);
            assert_consistent(&engine);
            engine.set_total(100);

            for (old, new) in before.iter().zip(engine.divider_values()) {
                assert!((old - new).abs() <= 1, "{old} vs {new} via {total}");
            }
        }
    }

    #[test]
    fn test_collapsed_run_moves_together() {
        let mut engine = Engine::new(3, 100).unwrap();
        engine.set_divider_value(0, 50);
        engine.set_divider_value(2, 50);
        assert_eq!(engine.sector_values(), vec![50, 0, 0, 50]);
        engine.collapse_empty_sectors();

        let changes = engine.set_divider_value(1, 70);

        assert_eq!(engine.divider_values(), &[70, 70, 70]);
        assert_eq!(engine.sector_values(), vec![70, 0, 0, 30]);
        let dividers: Vec<_> = changes
            .iter()
            .filter(|c| matches!(c, Change::Divider { .. }))
            .collect();
        assert_eq!(dividers.len(), 3);
        assert_eq!(changes.last(), Some(&Change::Sector { index: 3, value: 30 }));
    }

    #[test]
    #[should_panic]
    fn test_collapsed_flag_index_is_checked() {
        let engine = Engine::new(1, 10).unwrap();
        engine.is_collapsed(2);
    }

    #[test]
    fn test_collapsed_run_bounds() {
        let mut engine = Engine::new(4, 100).unwrap();
        assert_eq!(engine.divider_values(), &[20, 40, 60, 80]);
        engine.set_divider_value(2, 40);
        engine.collapse_empty_sectors();

        assert_eq!(engine.divider_minimum(2), 20);
        assert_eq!(engine.divider_maximum(1), 80);
        assert_eq!(engine.divider_minimum(0), 0);
        assert_eq!(engine.divider_maximum(3), 100);

        engine.set_divider_value(2, 95);
        assert_eq!(engine.divider_values(), &[20, 80, 80, 80]);
    }

    #[test]
    fn test_setting_sector_value_releases_collapse() {
        let mut engine = Engine::new(2, 100).unwrap();
        engine.set_sector_value(1, 0);
        engine.collapse_empty_sectors();
        assert!(engine.is_collapsed(1));

        engine.set_sector_value(1, 20);

        assert!(!engine.is_collapsed(1));
        assert_eq!(engine.divider_values(), &[33, 53]);
    }

    #[test]
    fn test_invariants_hold_over_mixed_edits() {
        let mut engine = Engine::new(5, 60).unwrap();
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: i64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % bound as u64) as i64
        };

        for step in 0..500 {
            match next(4) {
                0 => {
                    engine.set_divider_value(next(5) as usize, next(160) - 50);
                }
                1 => {
                    engine.set_sector_value(next(6) as usize, next(100) - 20);
                }
                2 => {
                    engine.set_total(next(300) - 10);
                }
                _ => engine.collapse_empty_sectors(),
            }
            assert_consistent(&engine);
            assert!(engine.divider_values().iter().all(|&v| v <= engine.total()), "step {step}");
        }
    }
}
