//! Configuration value types for the Rakit configurator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Centimetres per engine unit. Sliders report centimetres.
pub const CM_PER_UNIT: f32 = 100.0;

/// Target outer dimensions of a module, in engine units (metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Convert slider values in centimetres to engine units.
    pub fn from_cm(width: f32, height: f32, depth: f32) -> Self {
        Self::new(width / CM_PER_UNIT, height / CM_PER_UNIT, depth / CM_PER_UNIT)
    }

    /// Clamp every axis to at least `epsilon`.
    ///
    /// NaN collapses to `epsilon` as well, so the result is always finite
    /// and strictly positive for a positive `epsilon`.
    pub fn clamped(&self, epsilon: f32) -> Self {
        let clamp = |v: f32| if v.is_finite() && v > epsilon { v } else { epsilon };
        Self::new(clamp(self.width), clamp(self.height), clamp(self.depth))
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.width, self.height, self.depth]
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.5, 0.5)
    }
}

/// Repetition counts for the layout recipes.
///
/// Every variant reads only the fields it needs: the tiled grid uses
/// `columns`/`rows`, the stacked composite uses `drawers`/`units`, and the
/// single instance uses `shelves`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutCounts {
    pub columns: u32,
    pub rows: u32,
    pub drawers: u32,
    pub units: u32,
    pub shelves: u32,
}

impl Default for LayoutCounts {
    fn default() -> Self {
        Self {
            columns: 1,
            rows: 1,
            drawers: 1,
            units: 0,
            shelves: 0,
        }
    }
}

impl LayoutCounts {
    /// A columns × rows grid shape.
    pub fn grid(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// A stack of `drawers` drawers topped by `units` cabinet units.
    pub fn stack(drawers: u32, units: u32) -> Self {
        Self {
            drawers,
            units,
            ..Self::default()
        }
    }

    /// Counts with the degenerate values lifted to their floor.
    ///
    /// Grid axes are at least one. A stack may omit either drawers or units
    /// but never both; an empty stack becomes a single drawer.
    pub fn clamped(&self) -> Self {
        let (drawers, units) = if self.drawers == 0 && self.units == 0 {
            (1, 0)
        } else {
            (self.drawers, self.units)
        };
        Self {
            columns: self.columns.max(1),
            rows: self.rows.max(1),
            drawers,
            units,
            shelves: self.shelves,
        }
    }
}

/// Which structural recipe builds the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductVariant {
    /// One prototype repeated across a columns × rows grid.
    TiledGrid,
    /// Heterogeneous parts stacked on a base inside a resizable frame.
    StackedComposite,
    /// One prototype, scaled to the dimensions.
    #[default]
    Single,
}

/// The full user-chosen configuration. Replaced wholesale on every edit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub dimensions: Dimensions,
    pub counts: LayoutCounts,
    pub variant: ProductVariant,
}

impl Configuration {
    pub fn new(dimensions: Dimensions, counts: LayoutCounts, variant: ProductVariant) -> Self {
        Self { dimensions, counts, variant }
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_counts(mut self, counts: LayoutCounts) -> Self {
        self.counts = counts;
        self
    }

    pub fn with_variant(mut self, variant: ProductVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// The role a prototype plays in a product recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartRole {
    /// Repeated grid module, or the whole product for single instances.
    Module,
    /// Fixed bottom part of a stack.
    Base,
    Drawer,
    /// Separator placed between consecutive drawers.
    Divider,
    /// Stacked cabinet unit.
    Unit,
    /// Enclosing frame, stretched to the stack height.
    Frame,
    /// Procedural shelf board.
    Shelf,
}

impl PartRole {
    pub const ALL: [PartRole; 7] = [
        PartRole::Module,
        PartRole::Base,
        PartRole::Drawer,
        PartRole::Divider,
        PartRole::Unit,
        PartRole::Frame,
        PartRole::Shelf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartRole::Module => "module",
            PartRole::Base => "base",
            PartRole::Drawer => "drawer",
            PartRole::Divider => "divider",
            PartRole::Unit => "unit",
            PartRole::Frame => "frame",
            PartRole::Shelf => "shelf",
        }
    }
}

impl fmt::Display for PartRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "module" | "rack" | "cabinet" => Ok(PartRole::Module),
            "base" | "foot" => Ok(PartRole::Base),
            "drawer" | "laci" => Ok(PartRole::Drawer),
            "divider" => Ok(PartRole::Divider),
            "unit" => Ok(PartRole::Unit),
            "frame" => Ok(PartRole::Frame),
            "shelf" => Ok(PartRole::Shelf),
            _ => Err(ConfigError::UnknownRole { name: s.to_string() }),
        }
    }
}

/// Identity of an interactive sub-part that survives rebuilds.
///
/// `index` is positional within the role (grid cell `r * cols + c`, or the
/// stacking sequence index); `part` tells apart several movers of one clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StableId {
    pub role: PartRole,
    pub index: u32,
    #[serde(default)]
    pub part: u16,
}

impl StableId {
    pub fn new(role: PartRole, index: u32) -> Self {
        Self { role, index, part: 0 }
    }

    pub fn with_part(mut self, part: u16) -> Self {
        self.part = part;
        self
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}.{}", self.role, self.index, self.part)
    }
}
