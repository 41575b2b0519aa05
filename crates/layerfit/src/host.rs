//! The capability surface a layout needs from its host toolkit.
//!
//! Layout code never owns boxes. It reads size hints and structure through
//! [`BoxQuery`] and [`Container`], and commits results through
//! [`BoxQuery::set_bounds`]. [`BoxTree`](crate::tree::BoxTree) is the
//! in-memory implementation shipped with this crate; a GUI toolkit can
//! implement the traits over its own component tree instead.
//!
//! Queries take `&self` and may be called many times during one pass, so
//! implementations should be cheap and free of side effects.

use embedded_graphics::primitives::Rectangle;

use crate::geometry::{Dimension, Insets};
use crate::layout::LayoutInstance;
use crate::tree::BoxId;

/// Per-box queries and the single mutation a layout pass performs.
pub trait BoxQuery {
    /// Declared minimum size, `None` if the box was never given one.
    fn min_size(&self, id: BoxId) -> Option<Dimension>;

    /// Declared maximum size, `None` if the box was never given one.
    fn max_size(&self, id: BoxId) -> Option<Dimension>;

    /// The box's current size (zero before its first layout).
    fn current_size(&self, id: BoxId) -> Dimension;

    /// Moves and resizes the box.
    fn set_bounds(&mut self, id: BoxId, bounds: Rectangle);

    /// The layout instance governing this box, if it is a layout container.
    fn as_nested_layout(&self, id: BoxId) -> Option<&LayoutInstance>;

    /// The extent of the scrollable viewport this box sits directly in.
    ///
    /// Returns `None` when the box's parent is not a scrollable viewport.
    fn viewport_extent(&self, id: BoxId) -> Option<Dimension>;

    /// Returns `true` when the box's parent is a scrollable viewport.
    fn is_inside_scrollable_viewport(&self, id: BoxId) -> bool {
        self.viewport_extent(id).is_some()
    }
}

/// Structural queries on a box that holds children.
pub trait Container: BoxQuery {
    /// Children in layout order. Empty for leaves and unknown ids.
    fn children(&self, id: BoxId) -> &[BoxId];

    /// Padding between the box's edge and its children.
    fn insets(&self, id: BoxId) -> Insets;

    /// The box's parent, `None` for a root.
    fn parent(&self, id: BoxId) -> Option<BoxId>;
}
