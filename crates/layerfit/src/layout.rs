//! Layout instances and the entry points that drive them.
//!
//! A [`LayoutInstance`] is bound to exactly one container when it is
//! constructed. It keeps the container's gap and caches the container's
//! minimum and maximum size, which are expensive to compute because they
//! recurse into every nested layout below.
//!
//! # Core Types
//!
//! - [`Variant`] - Stack (column), Row, or Center
//! - [`LayoutInstance`] - Per-container state: owner, variant, gap, caches
//!
//! # Entry points
//!
//! - [`LayoutInstance::minimum_layout_size`] / [`maximum_layout_size`]
//! - [`LayoutInstance::preferred_layout_size`]
//! - [`LayoutInstance::plan`] - compute child bounds without committing
//! - [`layout_container`] - plan and commit
//! - [`invalidate_layout`] - clear caches up the ancestor chain
//!
//! Every entry point that takes a container id checks it against the owner
//! first and fails with [`LayoutError::BindingMismatch`] before touching any
//! cache or bounds.
//!
//! # Caching
//!
//! Aggregates are cached until [`invalidate_layout`] runs, which tree
//! mutations do for you. Changing a size hint or resizing a container is not
//! a structural change and does not invalidate. This includes aggregates that
//! contain an estimate for a missing hint, so a nested container and its
//! parent always agree on the nested container's size.
//!
//! Caches are [`Cell`]s so that queries only need a shared borrow of the
//! host. This also makes `LayoutInstance` `!Sync`.
//!
//! [`maximum_layout_size`]: LayoutInstance::maximum_layout_size
//!
//! # Example
//!
//! ```
//! use layerfit::prelude::*;
//!
//! let mut tree = BoxTree::new();
//! let form = tree.insert(BoxNode::leaf().with_size(Dimension::new(300, 200)));
//! tree.set_layout(form, LayoutInstance::stack(form, 0))?;
//!
//! let field = tree.insert(
//!     BoxNode::leaf()
//!         .with_min(Dimension::new(100, 20))
//!         .with_max(Dimension::new(Dimension::UNBOUNDED_LENGTH, 40)),
//! );
//! tree.add_child(form, field)?;
//!
//! assert_eq!(tree.minimum_layout_size(form)?, Some(Dimension::new(100, 20)));
//! tree.layout_container(form)?;
//! assert_eq!(tree.bounds(field)?.size.height, 40);
//! # Ok::<(), LayoutError>(())
//! ```

use core::cell::Cell;

use crate::aggregate::{center_maximum, center_minimum, linear_maximum, linear_minimum, Aggregate};
use crate::diagnostics::DiagnosticsSink;
use crate::error::{LayoutError, Result};
use crate::geometry::{Axis, Dimension};
use crate::host::Container;
use crate::tree::BoxId;
use crate::variants::{plan_center, plan_linear, LayoutOutcome, LayoutPlan};

/// The three arrangements a [`LayoutInstance`] can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// One column, top to bottom. All children share one width.
    Stack,
    /// One row, left to right. All children share one height.
    Row,
    /// A single child centered in the container.
    Center,
}

impl Variant {
    /// The primary axis, `None` for Center.
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Variant::Stack => Some(Axis::Vertical),
            Variant::Row => Some(Axis::Horizontal),
            Variant::Center => None,
        }
    }

    /// Display name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Stack => "Stack",
            Variant::Row => "Row",
            Variant::Center => "Center",
        }
    }
}

/// Layout state bound to one container.
///
/// Cannot be shared between containers: every entry point verifies that it
/// is called for the container the instance was constructed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInstance {
    owner: BoxId,
    variant: Variant,
    gap: u32,
    cached_min: Cell<Option<Dimension>>,
    cached_max: Cell<Option<Dimension>>,
}

impl LayoutInstance {
    fn new(owner: BoxId, variant: Variant, gap: u32) -> Self {
        Self {
            owner,
            variant,
            gap,
            cached_min: Cell::new(None),
            cached_max: Cell::new(None),
        }
    }

    /// A column layout for `owner` with `gap` pixels between children.
    pub fn stack(owner: BoxId, gap: u32) -> Self {
        Self::new(owner, Variant::Stack, gap)
    }

    /// A row layout for `owner` with `gap` pixels between children.
    pub fn row(owner: BoxId, gap: u32) -> Self {
        Self::new(owner, Variant::Row, gap)
    }

    /// A centering layout for `owner`. Holds at most one child.
    pub fn center(owner: BoxId) -> Self {
        Self::new(owner, Variant::Center, 0)
    }

    /// The container this instance is bound to.
    pub fn owner(&self) -> BoxId {
        self.owner
    }

    /// The arrangement this instance performs.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Gap between consecutive children (always 0 for Center).
    pub fn gap(&self) -> u32 {
        self.gap
    }

    /// Changes the gap and clears this instance's caches.
    ///
    /// Ancestors keep their caches; call [`invalidate_layout`] if they
    /// should pick up the new size too. Ignored for Center.
    pub fn set_gap(&mut self, gap: u32) {
        if self.variant == Variant::Center {
            return;
        }
        self.gap = gap;
        self.clear_caches();
    }

    /// The cached minimum, if one is stored.
    pub fn cached_minimum(&self) -> Option<Dimension> {
        self.cached_min.get()
    }

    /// The cached maximum, if one is stored.
    pub fn cached_maximum(&self) -> Option<Dimension> {
        self.cached_max.get()
    }

    pub(crate) fn clear_caches(&self) {
        self.cached_min.set(None);
        self.cached_max.set(None);
    }

    /// Fails with [`LayoutError::BindingMismatch`] unless `container` is the
    /// owner.
    pub fn check_binding(&self, container: BoxId) -> Result<()> {
        if container == self.owner {
            Ok(())
        } else {
            Err(LayoutError::BindingMismatch {
                owner: self.owner,
                container,
            })
        }
    }

    fn cached(
        &self,
        cache: &Cell<Option<Dimension>>,
        compute: impl FnOnce() -> Result<Aggregate>,
    ) -> Result<Option<Dimension>> {
        if let Some(size) = cache.get() {
            tracing::trace!(variant = self.variant.name(), "aggregate cache hit");
            return Ok(Some(size));
        }
        let aggregate = compute()?;
        tracing::trace!(
            variant = self.variant.name(),
            estimated = aggregate.estimated,
            "aggregate cache miss"
        );
        cache.set(aggregate.size);
        Ok(aggregate.size)
    }

    /// The smallest size the container's content can take, insets included
    /// for Stack and Row. `None` for a container without children.
    pub fn minimum_layout_size<H: Container + ?Sized>(
        &self,
        host: &H,
        container: BoxId,
    ) -> Result<Option<Dimension>> {
        self.check_binding(container)?;
        self.cached(&self.cached_min, || match self.variant.axis() {
            Some(axis) => linear_minimum(host, container, axis, self.gap),
            None => center_minimum(host, container),
        })
    }

    /// The largest size the container's content can use, insets included
    /// for Stack and Row. `None` for a container without children.
    pub fn maximum_layout_size<H: Container + ?Sized>(
        &self,
        host: &H,
        container: BoxId,
    ) -> Result<Option<Dimension>> {
        self.check_binding(container)?;
        self.cached(&self.cached_max, || match self.variant.axis() {
            Some(axis) => linear_maximum(host, container, axis, self.gap),
            None => center_maximum(host, container),
        })
    }

    /// The size the container would like to have.
    ///
    /// - Empty container: its declared minimum, else the inner extent of the
    ///   viewport it sits in, else its current size.
    /// - Inside a scrollable viewport: the minimum, so the viewport scrolls
    ///   instead of squeezing the content.
    /// - Otherwise: all the space it already has, its current size with
    ///   insets.
    pub fn preferred_layout_size<H: Container + ?Sized>(
        &self,
        host: &H,
        container: BoxId,
    ) -> Result<Dimension> {
        self.check_binding(container)?;
        if host.children(container).is_empty() {
            if let Some(min) = host.min_size(container) {
                return Ok(min);
            }
            if let Some(extent) = host.viewport_extent(container) {
                return Ok(host.insets(container).deflate(extent));
            }
            return Ok(host.current_size(container));
        }
        if host.is_inside_scrollable_viewport(container) {
            return Ok(self
                .minimum_layout_size(host, container)?
                .unwrap_or_default());
        }
        Ok(host.current_size(container))
    }

    /// Computes child bounds without committing them.
    ///
    /// Diagnostics are reported to `sink` after the allocation is complete.
    pub fn plan<H: Container + ?Sized>(
        &self,
        host: &H,
        container: BoxId,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<LayoutPlan> {
        self.check_binding(container)?;
        match self.variant.axis() {
            Some(axis) => plan_linear(host, container, self.variant, axis, self.gap, sink),
            None => plan_center(host, container, sink),
        }
    }

    /// Clears this instance's caches and those of every governed ancestor.
    ///
    /// Returns the number of instances cleared.
    pub fn invalidate_layout<H: Container + ?Sized>(
        &self,
        host: &H,
        container: BoxId,
    ) -> Result<usize> {
        self.check_binding(container)?;
        Ok(invalidate_layout(host, container))
    }
}

/// Plans `container` and commits the result through
/// [`BoxQuery::set_bounds`](crate::host::BoxQuery::set_bounds).
///
/// Nothing is written if planning fails.
pub fn layout_container<H: Container + ?Sized>(
    host: &mut H,
    container: BoxId,
    sink: &mut dyn DiagnosticsSink,
) -> Result<LayoutOutcome> {
    let (variant, plan) = match host.as_nested_layout(container) {
        Some(layout) => (layout.variant(), layout.plan(&*host, container, sink)?),
        None => return Err(LayoutError::NotALayoutContainer(container)),
    };
    for placement in &plan.placements {
        host.set_bounds(placement.child, placement.bounds);
    }

    let outcome = LayoutOutcome::from(&plan);
    tracing::debug!(
        variant = variant.name(),
        placed = outcome.placed,
        overflowing = outcome.overflow.is_overflowing(),
        "layout pass committed"
    );
    Ok(outcome)
}

/// Clears the caches of `container` and walks up its ancestors, clearing
/// each one's caches, until it reaches a box without a layout instance.
///
/// Returns the number of instances cleared (0 if `container` itself has no
/// layout).
pub fn invalidate_layout<H: Container + ?Sized>(host: &H, container: BoxId) -> usize {
    let mut cleared: usize = 0;
    let mut current = Some(container);
    while let Some(id) = current {
        let Some(layout) = host.as_nested_layout(id) else {
            break;
        };
        layout.clear_caches();
        cleared = cleared.saturating_add(1);
        current = host.parent(id);
    }
    tracing::trace!(cleared, "layout caches invalidated");
    cleared
}
