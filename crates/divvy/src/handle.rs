use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HandleId {
    #[display("divider {_0}")]
    Divider(usize),
    #[display("sector {_0}")]
    Sector(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Divider,
    /// Only interactable while its sector has zero width. Coincident visible
    /// sector handles are stacked inwards by `collapse_level`.
    Sector { collapse_level: usize, visible: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub kind: HandleKind,
    pub angle: i64,
    pub pressed: bool,
}

impl Handle {
    pub fn divider(angle: i64) -> Self {
        Self {
            kind: HandleKind::Divider,
            angle,
            pressed: false,
        }
    }

    pub fn sector(angle: i64) -> Self {
        Self {
            kind: HandleKind::Sector {
                collapse_level: 0,
                visible: false,
            },
            angle,
            pressed: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self.kind {
            HandleKind::Divider => true,
            HandleKind::Sector { visible, .. } => visible,
        }
    }

    pub fn collapse_level(&self) -> usize {
        match self.kind {
            HandleKind::Divider => 0,
            HandleKind::Sector { collapse_level, .. } => collapse_level,
        }
    }

    pub(crate) fn set_visible(&mut self, is_visible: bool) {
        if let HandleKind::Sector { visible, .. } = &mut self.kind {
            *visible = is_visible;
        }
    }

    pub(crate) fn set_collapse_level(&mut self, level: usize) {
        if let HandleKind::Sector { collapse_level, .. } = &mut self.kind {
            *collapse_level = level;
        }
    }
}

/// Pixel sizes of the handles. Layout only, the value model never sees them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleMetrics {
    pub divider_size: f64,
    pub sector_size: f64,
}

impl Default for HandleMetrics {
    fn default() -> Self {
        Self {
            divider_size: 16.0,
            sector_size: 12.0,
        }
    }
}

impl HandleMetrics {
    pub fn size(&self, kind: &HandleKind) -> f64 {
        match kind {
            HandleKind::Divider => self.divider_size,
            HandleKind::Sector { .. } => self.sector_size,
        }
    }

    /// Distance from the rim to the handle's center, negative meaning inwards.
    pub fn radius_offset(&self, kind: &HandleKind) -> f64 {
        match kind {
            HandleKind::Divider => 0.0,
            HandleKind::Sector { collapse_level, .. } => {
                -(self.divider_size + self.sector_size) / 2.0
                    - *collapse_level as f64 * self.sector_size
            }
        }
    }
}
