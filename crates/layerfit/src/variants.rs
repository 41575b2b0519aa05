//! Stack, Row and Center: turning aggregated hints into child bounds.
//!
//! A layout pass is split in two. Planning reads the host through a shared
//! borrow and produces a [`LayoutPlan`]; committing writes the planned bounds
//! back through [`BoxQuery::set_bounds`](crate::host::BoxQuery::set_bounds).
//! Diagnostics found while planning are held back and handed to the sink only
//! once the allocation is finished.
//!
//! # Available space
//!
//! The available space is the container's current size minus its insets. If
//! the container sits directly in a scrollable viewport the viewport's extent
//! is used instead, so content that does not fit overflows the viewport and
//! can be scrolled.
//!
//! # Placement
//!
//! Stack and Row place children one after another along the primary axis,
//! separated by the gap, and give every child the same cross length. Center
//! sizes its only child within the child's own bounds and centers it:
//!
//! ```text
//! offset = max(inset, inset + (available - size) / 2)
//! ```

use embedded_graphics::primitives::Rectangle;

use crate::aggregate::{center_child, resolve_child, ResolvedChild};
use crate::allocator::{allocate, equal_share, fit, gap_total, Span};
use crate::diagnostics::{BoundKind, Diagnostic, DiagnosticsSink};
use crate::error::Result;
use crate::geometry::{Axis, Dimension};
use crate::host::Container;
use crate::layout::Variant;
use crate::report::{ChildEntry, LayoutReport};
use crate::tree::BoxId;

/// Where one child goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// The child box.
    pub child: BoxId,
    /// Its new bounds, relative to the container.
    pub bounds: Rectangle,
}

/// Content that did not fit into the available space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Overflow {
    /// Pixels missing horizontally, if any.
    pub horizontal: Option<u32>,
    /// Pixels missing vertically, if any.
    pub vertical: Option<u32>,
    /// `true` when the container sits in a scrollable viewport.
    pub scrollable: bool,
}

impl Overflow {
    /// Returns `true` if content exceeds the available space on either axis.
    pub fn is_overflowing(&self) -> bool {
        self.horizontal.is_some() || self.vertical.is_some()
    }

    fn set(&mut self, axis: Axis, excess: Option<u32>) {
        match axis {
            Axis::Horizontal => self.horizontal = excess,
            Axis::Vertical => self.vertical = excess,
        }
    }
}

/// The result of planning one container, before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan {
    /// Bounds for each child, in child order.
    pub placements: Vec<Placement>,
    /// What did not fit.
    pub overflow: Overflow,
    /// Extent covered by the children, insets included.
    pub occupied: Dimension,
    /// Human-readable description of the pass.
    pub report: LayoutReport,
}

/// What [`layout_container`](crate::layout::layout_container) reports back
/// after committing a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOutcome {
    /// Number of children whose bounds were set.
    pub placed: usize,
    /// What did not fit. A viewport can use this to show scroll bars.
    pub overflow: Overflow,
    /// Extent covered by the children, insets included.
    pub occupied: Dimension,
}

impl From<&LayoutPlan> for LayoutOutcome {
    fn from(plan: &LayoutPlan) -> Self {
        Self {
            placed: plan.placements.len(),
            overflow: plan.overflow,
            occupied: plan.occupied,
        }
    }
}

/// Geometry shared by every variant's planning step.
struct Frame {
    available: Dimension,
    in_viewport: bool,
    outer: Dimension,
}

fn frame<H: Container + ?Sized>(host: &H, container: BoxId) -> Frame {
    let viewport = host.viewport_extent(container);
    let outer = viewport.unwrap_or_else(|| host.current_size(container));
    Frame {
        available: host.insets(container).deflate(outer),
        in_viewport: viewport.is_some(),
        outer,
    }
}

fn empty_plan(variant: Variant, frame: &Frame) -> LayoutPlan {
    LayoutPlan {
        placements: Vec::new(),
        overflow: Overflow {
            scrollable: frame.in_viewport,
            ..Overflow::default()
        },
        occupied: frame.outer,
        report: LayoutReport {
            variant,
            in_viewport: frame.in_viewport,
            available: frame.available,
            cross_length: None,
            children: Vec::new(),
        },
    }
}

/// Reports nested content that replaced a declared hint.
fn note_overrides(index: usize, child: &ResolvedChild, diagnostics: &mut Vec<Diagnostic>) {
    let pairs = [
        (BoundKind::Minimum, child.declared_min, child.content_min),
        (BoundKind::Maximum, child.declared_max, child.content_max),
    ];
    for (bound, declared, content) in pairs {
        if let (Some(declared), Some(content)) = (declared, content) {
            if declared != content {
                diagnostics.push(Diagnostic::HintOverridden {
                    index,
                    bound,
                    declared,
                    content,
                });
            }
        }
    }
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Plans a Stack (`axis` vertical) or Row (`axis` horizontal).
pub(crate) fn plan_linear<H: Container + ?Sized>(
    host: &H,
    container: BoxId,
    variant: Variant,
    axis: Axis,
    gap: u32,
    sink: &mut dyn DiagnosticsSink,
) -> Result<LayoutPlan> {
    let frame = frame(host, container);
    let children = host.children(container);
    if children.is_empty() {
        return Ok(empty_plan(variant, &frame));
    }
    let insets = host.insets(container);
    let cross_axis = axis.cross();
    let available = axis.length(frame.available);
    let estimate = equal_share(
        available.saturating_sub(gap_total(gap, children.len())),
        children.len(),
    );

    let mut diagnostics = Vec::new();
    let mut resolved = Vec::with_capacity(children.len());
    let mut spans = Vec::with_capacity(children.len());
    let mut cross_min = 0;
    let mut cross_max = Dimension::UNBOUNDED_LENGTH;
    for (index, &child) in children.iter().enumerate() {
        let hints = resolve_child(host, child)?;
        note_overrides(index, &hints, &mut diagnostics);

        let min = match hints.min() {
            Some(min) => {
                cross_min = cross_min.max(cross_axis.length(min));
                axis.length(min)
            }
            None => {
                diagnostics.push(Diagnostic::MinimumEstimated {
                    index,
                    axis,
                    estimate,
                });
                estimate
            }
        };
        let max = match hints.max() {
            Some(max) => {
                cross_max = cross_max.min(cross_axis.length(max));
                axis.length(max)
            }
            None => {
                diagnostics.push(Diagnostic::MaximumEstimated {
                    index,
                    axis,
                    estimate,
                });
                estimate
            }
        };
        spans.push(Span::new(min, max));
        resolved.push(hints);
    }

    let cross = fit(cross_axis.length(frame.available), cross_min, cross_max);
    if cross.corrected {
        diagnostics.push(Diagnostic::InconsistentCrossBounds {
            axis: cross_axis,
            min: cross_min,
            max: cross_max,
        });
    }

    let allocation = allocate(&spans, gap, available);
    for &index in allocation.corrected() {
        if let Some(span) = spans.get(index) {
            diagnostics.push(Diagnostic::InconsistentBounds {
                index,
                axis,
                min: span.min,
                max: span.max,
            });
        }
    }

    let mut overflow = Overflow {
        scrollable: frame.in_viewport,
        ..Overflow::default()
    };
    overflow.set(axis, allocation.excess());
    overflow.set(cross_axis, cross.excess);
    if allocation.overflows() {
        diagnostics.push(Diagnostic::ContentOverflow {
            axis,
            available: allocation.content(),
            required: saturate(allocation.required()),
            scrollable: frame.in_viewport,
        });
    }
    if cross.excess.is_some() {
        diagnostics.push(Diagnostic::ContentOverflow {
            axis: cross_axis,
            available: cross_axis.length(frame.available),
            required: cross_min,
            scrollable: frame.in_viewport,
        });
    }
    if allocation.unallocated() > 0 {
        diagnostics.push(Diagnostic::Underfilled {
            axis,
            available: allocation.content(),
            allocated: saturate(allocation.total()),
        });
    }

    let across = insets.leading(cross_axis);
    let mut along = insets.leading(axis);
    let mut placements = Vec::with_capacity(children.len());
    let mut entries = Vec::with_capacity(children.len());
    for (hints, &length) in resolved.iter().zip(allocation.lengths()) {
        let bounds = Rectangle::new(
            axis.point(along, across),
            axis.compose(length, cross.length).into(),
        );
        along = along.saturating_add(length).saturating_add(gap);
        placements.push(Placement {
            child: hints.id,
            bounds,
        });
        entries.push(ChildEntry {
            child: hints.id,
            min: hints.min(),
            max: hints.max(),
            bounds,
        });
    }

    let occupied = insets.inflate(axis.compose(
        saturate(allocation.total()).saturating_add(gap_total(gap, children.len())),
        cross.length,
    ));

    for diagnostic in &diagnostics {
        sink.report(diagnostic);
    }

    Ok(LayoutPlan {
        placements,
        overflow,
        occupied,
        report: LayoutReport {
            variant,
            in_viewport: frame.in_viewport,
            available: frame.available,
            cross_length: Some(cross.length),
            children: entries,
        },
    })
}

/// Plans a Center container.
pub(crate) fn plan_center<H: Container + ?Sized>(
    host: &H,
    container: BoxId,
    sink: &mut dyn DiagnosticsSink,
) -> Result<LayoutPlan> {
    let frame = frame(host, container);
    let Some(child) = center_child(host, container)? else {
        return Ok(empty_plan(Variant::Center, &frame));
    };
    let insets = host.insets(container);
    let hints = resolve_child(host, child)?;

    let mut diagnostics = Vec::new();
    note_overrides(0, &hints, &mut diagnostics);

    // A missing hint leaves that side unconstrained.
    let min = hints.min().unwrap_or_default();
    let max = hints.max().unwrap_or_else(Dimension::unbounded);

    let mut overflow = Overflow {
        scrollable: frame.in_viewport,
        ..Overflow::default()
    };
    let mut lengths = [0; 2];
    let mut offsets = [0; 2];
    for ((axis, length), offset) in [Axis::Horizontal, Axis::Vertical]
        .into_iter()
        .zip(lengths.iter_mut())
        .zip(offsets.iter_mut())
    {
        let available = axis.length(frame.available);
        let fitted = fit(available, axis.length(min), axis.length(max));
        if fitted.corrected {
            diagnostics.push(Diagnostic::InconsistentBounds {
                index: 0,
                axis,
                min: axis.length(min),
                max: axis.length(max),
            });
        }
        if fitted.excess.is_some() {
            diagnostics.push(Diagnostic::ContentOverflow {
                axis,
                available,
                required: axis.length(min),
                scrollable: frame.in_viewport,
            });
        }
        overflow.set(axis, fitted.excess);
        *length = fitted.length;
        *offset = insets
            .leading(axis)
            .saturating_add(available.saturating_sub(fitted.length) / 2);
    }
    let [width, height] = lengths;
    let [x, y] = offsets;

    let size = Dimension::new(width, height);
    let bounds = Rectangle::new(Axis::Horizontal.point(x, y), size.into());

    for diagnostic in &diagnostics {
        sink.report(diagnostic);
    }

    Ok(LayoutPlan {
        placements: vec![Placement { child, bounds }],
        overflow,
        occupied: insets.inflate(size),
        report: LayoutReport {
            variant: Variant::Center,
            in_viewport: frame.in_viewport,
            available: frame.available,
            cross_length: None,
            children: vec![ChildEntry {
                child,
                min: hints.min(),
                max: hints.max(),
                bounds,
            }],
        },
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::diagnostics::{NullSink, RecordingSink};
    use crate::geometry::Insets;
    use crate::layout::LayoutInstance;
    use crate::tree::{BoxNode, BoxTree};
    use embedded_graphics::prelude::{Point, Size};

    fn linear(tree: &mut BoxTree, layout: fn(BoxId) -> LayoutInstance, size: Dimension) -> BoxId {
        let id = tree.insert(BoxNode::leaf().with_size(size));
        tree.set_layout(id, layout(id)).unwrap();
        id
    }

    fn leaf(tree: &mut BoxTree, parent: BoxId, min: Dimension, max: Dimension) -> BoxId {
        let id = tree.insert(BoxNode::leaf().with_min(min).with_max(max));
        tree.add_child(parent, id).unwrap();
        id
    }

    #[test]
    fn test_stack_places_children_top_to_bottom() {
        let mut tree = BoxTree::new();
        let stack = linear(
            &mut tree,
            |id| LayoutInstance::stack(id, 10),
            Dimension::new(100, 130),
        );
        let inf = Dimension::UNBOUNDED_LENGTH;
        leaf(&mut tree, stack, Dimension::new(10, 20), Dimension::new(inf, 40));
        leaf(&mut tree, stack, Dimension::new(10, 20), Dimension::new(inf, inf));

        let plan = plan_linear(&tree, stack, Variant::Stack, Axis::Vertical, 10, &mut NullSink)
            .unwrap();
        assert_eq!(
            plan.placements[0].bounds,
            Rectangle::new(Point::new(0, 0), Size::new(100, 40))
        );
        assert_eq!(
            plan.placements[1].bounds,
            Rectangle::new(Point::new(0, 50), Size::new(100, 80))
        );
        assert_eq!(plan.occupied, Dimension::new(100, 130));
        assert!(!plan.overflow.is_overflowing());
    }

    #[test]
    fn test_row_shares_cross_height() {
        let mut tree = BoxTree::new();
        let row = linear(&mut tree, |id| LayoutInstance::row(id, 0), Dimension::new(200, 100));
        leaf(&mut tree, row, Dimension::new(50, 20), Dimension::new(150, 60));
        leaf(&mut tree, row, Dimension::new(50, 30), Dimension::new(150, 80));

        let plan = plan_linear(&tree, row, Variant::Row, Axis::Horizontal, 0, &mut NullSink)
            .unwrap();
        assert_eq!(plan.report.cross_length, Some(60));
        for placement in &plan.placements {
            assert_eq!(placement.bounds.size.height, 60);
            assert_eq!(placement.bounds.size.width, 100);
        }
    }

    #[test]
    fn test_diagnostics_describe_corrections() {
        let mut tree = BoxTree::new();
        let stack = linear(
            &mut tree,
            |id| LayoutInstance::stack(id, 0),
            Dimension::new(100, 100),
        );
        leaf(&mut tree, stack, Dimension::new(10, 40), Dimension::new(50, 10));
        let unset = tree.insert(BoxNode::leaf());
        tree.add_child(stack, unset).unwrap();

        let mut sink = RecordingSink::<8>::new();
        plan_linear(&tree, stack, Variant::Stack, Axis::Vertical, 0, &mut sink).unwrap();
        assert!(sink.iter().any(|d| matches!(
            d,
            Diagnostic::InconsistentBounds { index: 0, min: 40, max: 10, .. }
        )));
        assert!(sink
            .iter()
            .any(|d| matches!(d, Diagnostic::MinimumEstimated { index: 1, estimate: 50, .. })));
    }

    #[test]
    fn test_overflow_sets_flag_and_keeps_minima() {
        let mut tree = BoxTree::new();
        let stack = linear(
            &mut tree,
            |id| LayoutInstance::stack(id, 0),
            Dimension::new(100, 200),
        );
        for _ in 0..3 {
            leaf(&mut tree, stack, Dimension::new(10, 100), Dimension::new(100, 150));
        }
        let plan = plan_linear(&tree, stack, Variant::Stack, Axis::Vertical, 0, &mut NullSink)
            .unwrap();
        assert_eq!(plan.overflow.vertical, Some(100));
        assert!(!plan.overflow.scrollable);
        assert!(plan
            .placements
            .iter()
            .all(|placement| placement.bounds.size.height == 100));
    }

    #[test]
    fn test_center_respects_insets() {
        let mut tree = BoxTree::new();
        let center = tree.insert(
            BoxNode::leaf()
                .with_size(Dimension::new(120, 120))
                .with_insets(Insets::all(10)),
        );
        tree.set_layout(center, LayoutInstance::center(center))
            .unwrap();
        leaf(&mut tree, center, Dimension::new(20, 20), Dimension::new(40, 200));

        let plan = plan_center(&tree, center, &mut NullSink).unwrap();
        assert_eq!(
            plan.placements[0].bounds,
            Rectangle::new(Point::new(40, 10), Size::new(40, 100))
        );
    }

    #[test]
    fn test_center_child_larger_than_available_stays_at_inset() {
        let mut tree = BoxTree::new();
        let center = tree.insert(
            BoxNode::leaf()
                .with_size(Dimension::new(100, 100))
                .with_insets(Insets::all(5)),
        );
        tree.set_layout(center, LayoutInstance::center(center))
            .unwrap();
        leaf(&mut tree, center, Dimension::new(150, 50), Dimension::new(300, 50));

        let mut sink = RecordingSink::<4>::new();
        let plan = plan_center(&tree, center, &mut sink).unwrap();
        assert_eq!(
            plan.placements[0].bounds,
            Rectangle::new(Point::new(5, 25), Size::new(150, 50))
        );
        assert_eq!(plan.overflow.horizontal, Some(60));
        assert_eq!(sink.len(), 1);
    }
}
