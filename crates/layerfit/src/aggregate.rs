//! Size aggregation: a container's own minimum and maximum derived from its
//! children.
//!
//! Stack and Row combine children the same way along different axes:
//!
//! - **primary axis**: sum of the children's lengths plus the gaps
//! - **cross axis**: largest minimum (for the minimum) and smallest maximum
//!   (for the maximum), since every sibling shares one cross length
//!
//! Center passes its single child's size through unchanged.
//!
//! A child that is itself a layout container contributes the size of its
//! content, which replaces whatever hint was declared on the box. The declared
//! hint only counts while the nested container is empty. A child without a
//! hint on the primary axis is estimated as an equal share of the container's
//! current length; such results are flagged [`Aggregate::estimated`].

use crate::allocator::{equal_share, gap_total};
use crate::error::{LayoutError, Result};
use crate::geometry::{Axis, Dimension};
use crate::host::Container;
use crate::tree::BoxId;

/// A child's size hints with any nested layout already resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedChild {
    /// The child box.
    pub id: BoxId,
    /// Minimum declared on the box.
    pub declared_min: Option<Dimension>,
    /// Maximum declared on the box.
    pub declared_max: Option<Dimension>,
    /// Minimum of the child's own content, if it is a non-empty container.
    pub content_min: Option<Dimension>,
    /// Maximum of the child's own content, if it is a non-empty container.
    pub content_max: Option<Dimension>,
}

impl ResolvedChild {
    /// Effective minimum: content wins over the declared hint.
    pub fn min(&self) -> Option<Dimension> {
        self.content_min.or(self.declared_min)
    }

    /// Effective maximum: content wins over the declared hint.
    pub fn max(&self) -> Option<Dimension> {
        self.content_max.or(self.declared_max)
    }
}

/// Reads a child's hints, recursing into its layout instance if it has one.
pub fn resolve_child<H: Container + ?Sized>(host: &H, child: BoxId) -> Result<ResolvedChild> {
    let (content_min, content_max) = match host.as_nested_layout(child) {
        Some(nested) => (
            nested.minimum_layout_size(host, child)?,
            nested.maximum_layout_size(host, child)?,
        ),
        None => (None, None),
    };
    Ok(ResolvedChild {
        id: child,
        declared_min: host.min_size(child),
        declared_max: host.max_size(child),
        content_min,
        content_max,
    })
}

/// An aggregated size and whether any part of it was estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregate {
    /// The size, `None` for a container without children.
    pub size: Option<Dimension>,
    /// `true` if a missing hint was replaced by an estimate.
    pub estimated: bool,
}

impl Aggregate {
    const EMPTY: Self = Self {
        size: None,
        estimated: false,
    };
}

/// The equal share of the container's current inner length along `axis`.
fn primary_estimate<H: Container + ?Sized>(host: &H, container: BoxId, axis: Axis) -> u32 {
    let inner = host.insets(container).deflate(host.current_size(container));
    equal_share(axis.length(inner), host.children(container).len())
}

/// Minimum size of a Stack (`axis` vertical) or Row (`axis` horizontal).
pub fn linear_minimum<H: Container + ?Sized>(
    host: &H,
    container: BoxId,
    axis: Axis,
    gap: u32,
) -> Result<Aggregate> {
    let children = host.children(container);
    if children.is_empty() {
        return Ok(Aggregate::EMPTY);
    }
    let estimate = primary_estimate(host, container, axis);

    let mut primary = gap_total(gap, children.len());
    let mut cross = 0;
    let mut estimated = false;
    for &child in children {
        match resolve_child(host, child)?.min() {
            Some(min) => {
                primary = primary.saturating_add(axis.length(min));
                cross = cross.max(axis.cross().length(min));
            }
            None => {
                estimated = true;
                primary = primary.saturating_add(estimate);
            }
        }
    }

    let inner = axis.compose(primary, cross);
    Ok(Aggregate {
        size: Some(host.insets(container).inflate(inner)),
        estimated,
    })
}

/// Maximum size of a Stack (`axis` vertical) or Row (`axis` horizontal).
pub fn linear_maximum<H: Container + ?Sized>(
    host: &H,
    container: BoxId,
    axis: Axis,
    gap: u32,
) -> Result<Aggregate> {
    let children = host.children(container);
    if children.is_empty() {
        return Ok(Aggregate::EMPTY);
    }
    let estimate = primary_estimate(host, container, axis);

    let mut primary = gap_total(gap, children.len());
    let mut cross = Dimension::UNBOUNDED_LENGTH;
    let mut estimated = false;
    for &child in children {
        match resolve_child(host, child)?.max() {
            Some(max) => {
                primary = primary.saturating_add(axis.length(max));
                cross = cross.min(axis.cross().length(max));
            }
            None => {
                estimated = true;
                primary = primary.saturating_add(estimate);
            }
        }
    }

    let inner = axis.compose(primary, cross);
    Ok(Aggregate {
        size: Some(host.insets(container).inflate(inner)),
        estimated,
    })
}

/// The single child of a Center container, `None` when it is empty.
pub fn center_child<H: Container + ?Sized>(host: &H, container: BoxId) -> Result<Option<BoxId>> {
    match host.children(container) {
        [] => Ok(None),
        [child] => Ok(Some(*child)),
        children => Err(LayoutError::TooManyChildren {
            container,
            count: children.len(),
        }),
    }
}

fn center_bound<H: Container + ?Sized>(
    host: &H,
    container: BoxId,
    pick: fn(&ResolvedChild) -> Option<Dimension>,
) -> Result<Aggregate> {
    let Some(child) = center_child(host, container)? else {
        return Ok(Aggregate::EMPTY);
    };
    let resolved = resolve_child(host, child)?;
    Ok(match pick(&resolved) {
        Some(size) => Aggregate {
            size: Some(size),
            estimated: false,
        },
        None => Aggregate {
            size: Some(host.insets(container).deflate(host.current_size(container))),
            estimated: true,
        },
    })
}

/// Minimum size of a Center container: the child's minimum, without insets.
pub fn center_minimum<H: Container + ?Sized>(host: &H, container: BoxId) -> Result<Aggregate> {
    center_bound(host, container, ResolvedChild::min)
}

/// Maximum size of a Center container: the child's maximum, without insets.
pub fn center_maximum<H: Container + ?Sized>(host: &H, container: BoxId) -> Result<Aggregate> {
    center_bound(host, container, ResolvedChild::max)
}
