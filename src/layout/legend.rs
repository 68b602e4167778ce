use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::layout::container::Point;
use crate::layout::position::BoundingBox;

macro_rules! legend_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> u64 {
                self.0
            }
        }
    };
}

legend_id!(LegendId);
legend_id!(GridId);
legend_id!(SectionId);
legend_id!(SwatchId);

/// Direction children of a grid or section are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Children stack vertically.
    #[default]
    Column,
    /// Children line up horizontally.
    Inline,
}

#[derive(Debug)]
struct Children<P, C> {
    by_parent: IndexMap<P, Vec<C>>,
}

impl<P, C> Default for Children<P, C> {
    fn default() -> Self {
        Self {
            by_parent: IndexMap::new(),
        }
    }
}

impl<P: Hash + Eq + Copy, C: PartialEq + Copy> Children<P, C> {
    fn register(&mut self, parent: P, child: C) {
        let children = self.by_parent.entry(parent).or_default();
        if !children.contains(&child) {
            children.push(child);
        }
    }

    fn unregister(&mut self, parent: P, child: C) -> bool {
        let Some(children) = self.by_parent.get_mut(&parent) else {
            return false;
        };
        let before = children.len();
        children.retain(|known| *known != child);
        let removed = children.len() != before;
        if children.is_empty() {
            self.by_parent.shift_remove(&parent);
        }
        removed
    }

    fn preceding(&self, parent: P, child: C, kind: &'static str) -> ChartResult<&[C]> {
        let children = self
            .by_parent
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let index = children
            .iter()
            .position(|known| *known == child)
            .ok_or(ChartError::LookupMiss { kind })?;
        Ok(&children[..index])
    }
}

/// Registries and measured sizes for legend layout.
///
/// A legend holds grids, a grid holds sections and a section holds swatches.
/// Every child is placed after the children registered before it.
#[derive(Debug)]
pub struct LegendLayout {
    grid_padding: f64,
    grids: Children<LegendId, GridId>,
    sections: Children<GridId, SectionId>,
    swatches: Children<SectionId, SwatchId>,
    grid_layouts: HashMap<GridId, Layout>,
    section_layouts: HashMap<SectionId, Layout>,
    grid_sizes: HashMap<GridId, BoundingBox>,
    section_sizes: HashMap<SectionId, BoundingBox>,
    swatch_sizes: HashMap<SwatchId, BoundingBox>,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl LegendLayout {
    /// `grid_padding` separates consecutive grids horizontally.
    #[must_use]
    pub fn new(grid_padding: f64) -> Self {
        Self {
            grid_padding,
            grids: Children::default(),
            sections: Children::default(),
            swatches: Children::default(),
            grid_layouts: HashMap::new(),
            section_layouts: HashMap::new(),
            grid_sizes: HashMap::new(),
            section_sizes: HashMap::new(),
            swatch_sizes: HashMap::new(),
        }
    }

    pub fn register_grid(&mut self, legend: LegendId, grid: GridId, layout: Layout) {
        self.grids.register(legend, grid);
        self.grid_layouts.insert(grid, layout);
    }

    pub fn unregister_grid(&mut self, legend: LegendId, grid: GridId) -> bool {
        self.grid_sizes.remove(&grid);
        self.grid_layouts.remove(&grid);
        self.grids.unregister(legend, grid)
    }

    pub fn register_section(&mut self, grid: GridId, section: SectionId, layout: Layout) {
        self.sections.register(grid, section);
        self.section_layouts.insert(section, layout);
    }

    pub fn unregister_section(&mut self, grid: GridId, section: SectionId) -> bool {
        self.section_sizes.remove(&section);
        self.section_layouts.remove(&section);
        self.sections.unregister(grid, section)
    }

    pub fn register_swatch(&mut self, section: SectionId, swatch: SwatchId) {
        self.swatches.register(section, swatch);
    }

    pub fn unregister_swatch(&mut self, section: SectionId, swatch: SwatchId) -> bool {
        self.swatch_sizes.remove(&swatch);
        self.swatches.unregister(section, swatch)
    }

    pub fn set_grid_size(&mut self, grid: GridId, size: BoundingBox) {
        self.grid_sizes.insert(grid, size);
    }

    pub fn set_section_size(&mut self, section: SectionId, size: BoundingBox) {
        self.section_sizes.insert(section, size);
    }

    pub fn set_swatch_size(&mut self, swatch: SwatchId, size: BoundingBox) {
        self.swatch_sizes.insert(swatch, size);
    }

    /// Offset of `swatch` inside `section`.
    pub fn swatch_position(&self, section: SectionId, swatch: SwatchId) -> ChartResult<Point> {
        let preceding = self.swatches.preceding(section, swatch, "legend swatch")?;
        let layout = self
            .section_layouts
            .get(&section)
            .copied()
            .unwrap_or_default();
        Ok(stack(layout, preceding.iter().map(|id| size_of(&self.swatch_sizes, id))))
    }

    /// Offset of `section` inside `grid`.
    pub fn section_position(&self, grid: GridId, section: SectionId) -> ChartResult<Point> {
        let preceding = self.sections.preceding(grid, section, "legend swatch section")?;
        let layout = self.grid_layouts.get(&grid).copied().unwrap_or_default();
        Ok(stack(layout, preceding.iter().map(|id| size_of(&self.section_sizes, id))))
    }

    /// Offset of `grid` inside `legend`. Grids always line up horizontally.
    pub fn grid_position(&self, legend: LegendId, grid: GridId) -> ChartResult<Point> {
        let preceding = self.grids.preceding(legend, grid, "legend grid")?;
        if preceding.is_empty() {
            return Ok(Point::default());
        }
        let widths: f64 = preceding
            .iter()
            .map(|id| size_of(&self.grid_sizes, id).width)
            .sum();
        Ok(Point::new(
            widths + self.grid_padding * preceding.len() as f64,
            0.0,
        ))
    }
}

fn size_of<K: Hash + Eq>(sizes: &HashMap<K, BoundingBox>, id: &K) -> BoundingBox {
    sizes.get(id).copied().unwrap_or_default()
}

fn stack(layout: Layout, sizes: impl Iterator<Item = BoundingBox>) -> Point {
    sizes.fold(Point::default(), |point, size| match layout {
        Layout::Column => Point::new(0.0, point.y + size.height),
        Layout::Inline => Point::new(point.x + size.width, 0.0),
    })
}
