//! In-memory box tree.
//!
//! [`BoxTree`] is the host this crate ships with: an arena of [`BoxNode`]s
//! addressed by [`BoxId`]. It implements [`BoxQuery`] and [`Container`] and
//! wraps the layout entry points so that callers do not have to juggle
//! borrows of the tree and the layout instances stored inside it.
//!
//! Structural mutations ([`add_child`](BoxTree::add_child),
//! [`insert_child`](BoxTree::insert_child),
//! [`remove_child`](BoxTree::remove_child),
//! [`set_layout`](BoxTree::set_layout), [`set_gap`](BoxTree::set_gap))
//! invalidate cached aggregates up the ancestor chain. Hint mutations and
//! resizing do not.
//!
//! # Example
//!
//! ```
//! use layerfit::prelude::*;
//!
//! let mut tree = BoxTree::new();
//! let window = tree.insert(BoxNode::leaf().with_size(Dimension::new(400, 300)));
//! tree.set_layout(window, LayoutInstance::center(window))?;
//!
//! let dialog = tree.insert(
//!     BoxNode::leaf()
//!         .with_min(Dimension::new(100, 80))
//!         .with_max(Dimension::new(200, 120)),
//! );
//! tree.add_child(window, dialog)?;
//! tree.layout_container(window)?;
//!
//! let bounds = tree.bounds(dialog)?;
//! assert_eq!(bounds.top_left.x, 100);
//! assert_eq!(bounds.size.height, 120);
//! # Ok::<(), LayoutError>(())
//! ```

use embedded_graphics::primitives::Rectangle;
use slotmap::SlotMap;

use crate::diagnostics::{DiagnosticsSink, NullSink, TracingSink};
use crate::error::{LayoutError, Result};
use crate::geometry::{Dimension, Insets};
use crate::host::{BoxQuery, Container};
use crate::layout::{self, LayoutInstance};
use crate::report::LayoutReport;
use crate::variants::LayoutOutcome;

slotmap::new_key_type! {
    /// Handle to a box in a [`BoxTree`].
    pub struct BoxId;
}

/// Slot index and generation, as in `3v1`.
impl core::fmt::Display for BoxId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if slotmap::Key::is_null(self) {
            return f.write_str("null");
        }
        let ffi = self.0.as_ffi();
        let index = ffi & u64::from(u32::MAX);
        let version = ffi.checked_shr(32).unwrap_or_default();
        write!(f, "{index}v{version}")
    }
}

/// One box: size hints, current bounds, children and an optional layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxNode {
    min_size: Option<Dimension>,
    max_size: Option<Dimension>,
    bounds: Rectangle,
    insets: Insets,
    scrollable: bool,
    parent: Option<BoxId>,
    children: Vec<BoxId>,
    layout: Option<LayoutInstance>,
}

impl Default for BoxNode {
    fn default() -> Self {
        Self {
            min_size: None,
            max_size: None,
            bounds: Rectangle::zero(),
            insets: Insets::zero(),
            scrollable: false,
            parent: None,
            children: Vec::new(),
            layout: None,
        }
    }
}

impl BoxNode {
    /// A box without hints, children or layout.
    pub fn leaf() -> Self {
        Self::default()
    }

    /// A scrollable viewport showing `extent` pixels of its content.
    ///
    /// Layouts whose container sits directly inside a viewport lay out
    /// against the viewport's extent and report their minimum as preferred
    /// size, so the viewport can scroll.
    pub fn scrollable_viewport(extent: Dimension) -> Self {
        Self {
            scrollable: true,
            ..Self::default()
        }
        .with_size(extent)
    }

    /// Sets the minimum size hint.
    #[must_use]
    pub fn with_min(mut self, min: Dimension) -> Self {
        self.min_size = Some(min);
        self
    }

    /// Sets the maximum size hint.
    #[must_use]
    pub fn with_max(mut self, max: Dimension) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Sets the current size.
    #[must_use]
    pub fn with_size(mut self, size: Dimension) -> Self {
        self.bounds.size = size.into();
        self
    }

    /// Sets the insets.
    #[must_use]
    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = insets;
        self
    }

    /// Minimum size hint.
    pub fn min_size(&self) -> Option<Dimension> {
        self.min_size
    }

    /// Maximum size hint.
    pub fn max_size(&self) -> Option<Dimension> {
        self.max_size
    }

    /// Current bounds relative to the parent.
    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    /// Padding around the children.
    pub fn insets(&self) -> Insets {
        self.insets
    }

    /// Returns `true` for scrollable viewports.
    pub fn is_scrollable(&self) -> bool {
        self.scrollable
    }

    /// The parent box.
    pub fn parent(&self) -> Option<BoxId> {
        self.parent
    }

    /// Children in layout order.
    pub fn children(&self) -> &[BoxId] {
        &self.children
    }

    /// The layout governing this box.
    pub fn layout(&self) -> Option<&LayoutInstance> {
        self.layout.as_ref()
    }
}

/// Arena of boxes implementing the host traits.
#[derive(Debug, Clone, Default)]
pub struct BoxTree {
    nodes: SlotMap<BoxId, BoxNode>,
}

impl BoxTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached box and returns its id.
    ///
    /// Parent, children and layout of `node` are reset; use
    /// [`add_child`](Self::add_child) and [`set_layout`](Self::set_layout)
    /// to connect it.
    pub fn insert(&mut self, node: BoxNode) -> BoxId {
        self.nodes.insert(BoxNode {
            parent: None,
            children: Vec::new(),
            layout: None,
            ..node
        })
    }

    /// Returns `true` if `id` is in the tree.
    pub fn contains(&self, id: BoxId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of boxes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds no boxes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node for `id`.
    pub fn node(&self, id: BoxId) -> Result<&BoxNode> {
        self.nodes.get(id).ok_or(LayoutError::UnknownBox(id))
    }

    fn node_mut(&mut self, id: BoxId) -> Result<&mut BoxNode> {
        self.nodes.get_mut(id).ok_or(LayoutError::UnknownBox(id))
    }

    fn layout_of(&self, id: BoxId) -> Result<&LayoutInstance> {
        self.node(id)?
            .layout
            .as_ref()
            .ok_or(LayoutError::NotALayoutContainer(id))
    }

    /// Attaches `layout` to `container`.
    ///
    /// The instance must have been built for `container`, and a container
    /// accepts only one instance.
    pub fn set_layout(&mut self, container: BoxId, layout: LayoutInstance) -> Result<()> {
        layout.check_binding(container)?;
        let node = self.node_mut(container)?;
        if node.layout.is_some() {
            return Err(LayoutError::AlreadyBound { container });
        }
        node.layout = Some(layout);
        layout::invalidate_layout(&*self, container);
        Ok(())
    }

    /// Changes the gap of `container`'s layout and invalidates the caches of
    /// the container and its governed ancestors.
    pub fn set_gap(&mut self, container: BoxId, gap: u32) -> Result<()> {
        self.node_mut(container)?
            .layout
            .as_mut()
            .ok_or(LayoutError::NotALayoutContainer(container))?
            .set_gap(gap);
        layout::invalidate_layout(&*self, container);
        Ok(())
    }

    /// Appends `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: BoxId, child: BoxId) -> Result<()> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, index, child)
    }

    /// Inserts `child` at `index` among `parent`'s children (clamped to the
    /// end). A child that already has a parent is detached from it first.
    pub fn insert_child(&mut self, parent: BoxId, index: usize, child: BoxId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(LayoutError::CycleDetected { parent, child });
        }

        if let Some(previous) = self.node(child)?.parent {
            self.detach(previous, child)?;
        }
        self.node_mut(child)?.parent = Some(parent);
        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, child);

        let cleared = layout::invalidate_layout(&*self, parent);
        tracing::trace!(index, cleared, "child added");
        Ok(())
    }

    /// Removes `child` from `parent`. The child stays in the tree, detached.
    pub fn remove_child(&mut self, parent: BoxId, child: BoxId) -> Result<()> {
        self.node(child)?;
        let cleared = self.detach(parent, child)?;
        tracing::trace!(cleared, "child removed");
        Ok(())
    }

    fn detach(&mut self, parent: BoxId, child: BoxId) -> Result<usize> {
        let children = &mut self.node_mut(parent)?.children;
        let position = children
            .iter()
            .position(|candidate| *candidate == child)
            .ok_or(LayoutError::NotAChild { parent, child })?;
        children.remove(position);
        self.node_mut(child)?.parent = None;
        Ok(layout::invalidate_layout(&*self, parent))
    }

    /// `id` followed by each of its ancestors up to the root.
    fn ancestors(&self, id: BoxId) -> impl Iterator<Item = BoxId> + '_ {
        core::iter::successors(Some(id), move |current| {
            self.nodes.get(*current).and_then(|node| node.parent)
        })
    }

    /// Replaces the minimum size hint. Does not invalidate cached aggregates.
    pub fn set_min_size(&mut self, id: BoxId, min: Option<Dimension>) -> Result<()> {
        self.node_mut(id)?.min_size = min;
        Ok(())
    }

    /// Replaces the maximum size hint. Does not invalidate cached aggregates.
    pub fn set_max_size(&mut self, id: BoxId, max: Option<Dimension>) -> Result<()> {
        self.node_mut(id)?.max_size = max;
        Ok(())
    }

    /// Resizes the box, keeping its position.
    pub fn set_size(&mut self, id: BoxId, size: Dimension) -> Result<()> {
        self.node_mut(id)?.bounds.size = size.into();
        Ok(())
    }

    /// Current bounds of `id`, relative to its parent.
    pub fn bounds(&self, id: BoxId) -> Result<Rectangle> {
        Ok(self.node(id)?.bounds)
    }

    /// Minimum size of `container`'s content.
    pub fn minimum_layout_size(&self, container: BoxId) -> Result<Option<Dimension>> {
        self.layout_of(container)?
            .minimum_layout_size(self, container)
    }

    /// Maximum size of `container`'s content.
    pub fn maximum_layout_size(&self, container: BoxId) -> Result<Option<Dimension>> {
        self.layout_of(container)?
            .maximum_layout_size(self, container)
    }

    /// Preferred size of `container`.
    pub fn preferred_layout_size(&self, container: BoxId) -> Result<Dimension> {
        self.layout_of(container)?
            .preferred_layout_size(self, container)
    }

    /// Clears cached aggregates of `container` and its governed ancestors.
    pub fn invalidate_layout(&self, container: BoxId) -> Result<usize> {
        self.node(container)?;
        Ok(layout::invalidate_layout(self, container))
    }

    /// Describes what a layout pass of `container` would do.
    pub fn report(&self, container: BoxId) -> Result<LayoutReport> {
        Ok(self
            .layout_of(container)?
            .plan(self, container, &mut NullSink)?
            .report)
    }

    /// Lays out `container`'s children, logging diagnostics with `tracing`.
    pub fn layout_container(&mut self, container: BoxId) -> Result<LayoutOutcome> {
        self.layout_container_with(container, &mut TracingSink)
    }

    /// Lays out `container`'s children, reporting diagnostics to `sink`.
    pub fn layout_container_with(
        &mut self,
        container: BoxId,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<LayoutOutcome> {
        self.node(container)?;
        layout::layout_container(self, container, sink)
    }

    /// Lays out `root` and then every layout container below it, parents
    /// before children, so each nested pass sees the bounds just committed
    /// by its parent.
    ///
    /// Returns the number of containers laid out.
    pub fn layout_tree(&mut self, root: BoxId, sink: &mut dyn DiagnosticsSink) -> Result<usize> {
        self.node(root)?;
        let mut pending = vec![root];
        let mut laid_out: usize = 0;
        while let Some(id) = pending.pop() {
            if self.node(id)?.layout.is_some() {
                layout::layout_container(self, id, sink)?;
                laid_out = laid_out.saturating_add(1);
            }
            pending.extend(self.node(id)?.children.iter().rev());
        }
        tracing::debug!(laid_out, "layout tree pass complete");
        Ok(laid_out)
    }
}

impl BoxQuery for BoxTree {
    fn min_size(&self, id: BoxId) -> Option<Dimension> {
        self.nodes.get(id).and_then(|node| node.min_size)
    }

    fn max_size(&self, id: BoxId) -> Option<Dimension> {
        self.nodes.get(id).and_then(|node| node.max_size)
    }

    fn current_size(&self, id: BoxId) -> Dimension {
        self.nodes
            .get(id)
            .map(|node| Dimension::from(node.bounds.size))
            .unwrap_or_default()
    }

    fn set_bounds(&mut self, id: BoxId, bounds: Rectangle) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bounds = bounds;
        }
    }

    fn as_nested_layout(&self, id: BoxId) -> Option<&LayoutInstance> {
        self.nodes.get(id).and_then(|node| node.layout.as_ref())
    }

    fn viewport_extent(&self, id: BoxId) -> Option<Dimension> {
        let parent = self.nodes.get(id)?.parent?;
        let parent = self.nodes.get(parent)?;
        parent
            .scrollable
            .then(|| Dimension::from(parent.bounds.size))
    }
}

impl Container for BoxTree {
    fn children(&self, id: BoxId) -> &[BoxId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    fn insets(&self, id: BoxId) -> Insets {
        self.nodes
            .get(id)
            .map(|node| node.insets)
            .unwrap_or_default()
    }

    fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }
}
