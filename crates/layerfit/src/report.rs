//! Human-readable description of a layout pass.
//!
//! A [`LayoutReport`] is produced with every plan. It lists what the layout
//! saw (the available space, whether it sat in a viewport, the shared cross
//! length) and what it decided for each child. Printing it is the quickest
//! way to find out why a form does not look the way the hints suggest.
//!
//! ```text
//! Stack layout, 2 children, available 280x180
//!   cross width: 280
//!   #0 min 10x20 max infx40 -> 280x40 at (10, 10)
//!   #1 min 10x20 max unset -> 280x140 at (10, 50)
//! ```

use core::fmt;

use embedded_graphics::primitives::Rectangle;

use crate::geometry::Dimension;
use crate::layout::Variant;
use crate::tree::BoxId;

/// What a layout pass decided for one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEntry {
    /// The child box.
    pub child: BoxId,
    /// Effective minimum (content wins over the declared hint).
    pub min: Option<Dimension>,
    /// Effective maximum (content wins over the declared hint).
    pub max: Option<Dimension>,
    /// Planned bounds.
    pub bounds: Rectangle,
}

/// Snapshot of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutReport {
    /// The layout variant.
    pub variant: Variant,
    /// `true` if the available space came from a scrollable viewport.
    pub in_viewport: bool,
    /// Space available to the children (insets removed).
    pub available: Dimension,
    /// Cross length shared by all children; `None` for Center.
    pub cross_length: Option<u32>,
    /// One entry per child, in child order.
    pub children: Vec<ChildEntry>,
}

impl LayoutReport {
    /// Number of children in the pass.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

struct Hint(Option<Dimension>);

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dimension) => write!(f, "{dimension}"),
            None => f.write_str("unset"),
        }
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.child_count() == 1 { "child" } else { "children" };
        write!(
            f,
            "{} layout, {} {noun}, available {}",
            self.variant.name(),
            self.child_count(),
            self.available
        )?;
        if self.in_viewport {
            f.write_str(" (scrollable viewport)")?;
        }
        writeln!(f)?;

        if let (Some(cross), Some(axis)) = (self.cross_length, self.variant.axis()) {
            writeln!(f, "  cross {}: {cross}", axis.cross().name())?;
        }
        for (index, entry) in self.children.iter().enumerate() {
            let size = Dimension::from(entry.bounds.size);
            let origin = entry.bounds.top_left;
            writeln!(
                f,
                "  #{index} min {} max {} -> {size} at ({}, {})",
                Hint(entry.min),
                Hint(entry.max),
                origin.x,
                origin.y
            )?;
        }
        Ok(())
    }
}
