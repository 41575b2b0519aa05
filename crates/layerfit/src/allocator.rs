//! Constrained proportional allocation along one axis.
//!
//! This is the numeric core shared by every layout variant. Given the
//! ordered `(min, max)` spans of a container's children, the gap between
//! them and the available length, [`allocate`] produces one final length per
//! child such that:
//!
//! - every length lies within its (corrected) span,
//! - lengths plus gaps fill the available length exactly whenever the
//!   available length lies between the summed minima and the summed maxima,
//! - when space is short every child receives exactly its minimum and the
//!   shortfall is reported instead of being absorbed.
//!
//! # Algorithm
//!
//! 1. **Correct**: a span with `max < min` is repaired with `max := min`.
//! 2. **Weigh**: space is shared in proportion to the minima. If all minima
//!    are zero every child gets an equal baseline share instead.
//! 3. **Proportional pass**: `floor(min_i / total_min * content)`, clamped
//!    into the span.
//! 4. **Slack pass**: what is left is shared in proportion to each child's
//!    remaining headroom (`max_i - final_i`), clamped to the maximum.
//! 5. **Rounding sweep**: any remainder is handed out from the last child to
//!    the first until it is gone or nobody has headroom left.
//!
//! The function is pure; diagnostics about corrections and overflow are
//! reported by the caller from the returned [`Allocation`].
//!
//! # Example
//!
//! ```
//! use layerfit::allocator::{allocate, Span};
//!
//! let spans = [Span::new(10, 20), Span::unbounded(10)];
//! let allocation = allocate(&spans, 0, 100);
//! assert_eq!(allocation.lengths(), &[20, 80]);
//! assert!(!allocation.overflows());
//! ```

use crate::geometry::Dimension;

/// The permitted range of one child along the allocation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Smallest acceptable length.
    pub min: u32,
    /// Largest acceptable length; [`Dimension::UNBOUNDED_LENGTH`] for none.
    pub max: u32,
}

impl Span {
    /// Creates a span from explicit bounds.
    ///
    /// Inconsistent bounds (`max < min`) are accepted here and repaired by
    /// [`allocate`], which also reports which spans needed the repair.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// A span with no upper bound.
    pub const fn unbounded(min: u32) -> Self {
        Self::new(min, Dimension::UNBOUNDED_LENGTH)
    }

    /// Returns `true` if `max < min`.
    pub const fn is_inconsistent(self) -> bool {
        self.max < self.min
    }

    /// The span with `max` raised to `min` where necessary.
    pub const fn corrected(self) -> Self {
        if self.is_inconsistent() {
            Self::new(self.min, self.min)
        } else {
            self
        }
    }

    /// Clamps `length` into the span.
    pub fn clamp(self, length: u32) -> u32 {
        length.max(self.min).min(self.max.max(self.min))
    }
}

/// The outcome of one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    lengths: Vec<u32>,
    corrected: Vec<usize>,
    available: u32,
    content: u32,
    required: u64,
    unallocated: u32,
}

impl Allocation {
    /// Final length of each child, in input order.
    pub fn lengths(&self) -> &[u32] {
        &self.lengths
    }

    /// Indices of the spans whose `max < min` had to be corrected.
    pub fn corrected(&self) -> &[usize] {
        &self.corrected
    }

    /// The available length the allocation was asked to fill.
    pub fn available(&self) -> u32 {
        self.available
    }

    /// Available length minus the gaps between children.
    pub fn content(&self) -> u32 {
        self.content
    }

    /// Sum of the children's minima.
    pub fn required(&self) -> u64 {
        self.required
    }

    /// Returns `true` if the minima do not fit into the content length.
    pub fn overflows(&self) -> bool {
        u64::from(self.content) < self.required
    }

    /// How far the minima exceed the content length, if they do.
    pub fn excess(&self) -> Option<u32> {
        self.required
            .checked_sub(u64::from(self.content))
            .filter(|excess| *excess > 0)
            .map(|excess| u32::try_from(excess).unwrap_or(u32::MAX))
    }

    /// Content length left unused because every child reached its maximum.
    pub fn unallocated(&self) -> u32 {
        self.unallocated
    }

    /// Sum of the final lengths.
    pub fn total(&self) -> u64 {
        self.lengths.iter().map(|length| u64::from(*length)).sum()
    }
}

/// Total gap length between `count` consecutive children.
pub fn gap_total(gap: u32, count: usize) -> u32 {
    let separators = u32::try_from(count.saturating_sub(1)).unwrap_or(u32::MAX);
    gap.saturating_mul(separators)
}

/// An equal share of `length` among `count` children (zero for no children).
pub fn equal_share(length: u32, count: usize) -> u32 {
    match u32::try_from(count) {
        Ok(0) => 0,
        Ok(count) => length.checked_div(count).unwrap_or(0),
        Err(_) => 0,
    }
}

/// Distributes `available` pixels among `spans` separated by `gap`.
///
/// See the [module documentation](self) for the exact steps. The returned
/// lengths always honour the corrected spans; the content length is filled
/// exactly whenever it lies between the summed minima and summed maxima.
pub fn allocate(spans: &[Span], gap: u32, available: u32) -> Allocation {
    let count = spans.len();
    let content = available.saturating_sub(gap_total(gap, count));

    let corrected: Vec<usize> = spans
        .iter()
        .enumerate()
        .filter(|(_, span)| span.is_inconsistent())
        .map(|(index, _)| index)
        .collect();
    let spans: Vec<Span> = spans.iter().map(|span| span.corrected()).collect();

    let required: u64 = spans.iter().map(|span| u64::from(span.min)).sum();
    let mut allocation = Allocation {
        lengths: Vec::with_capacity(count),
        corrected,
        available,
        content,
        required,
        unallocated: 0,
    };
    if count == 0 {
        return allocation;
    }

    if u64::from(content) < required {
        // Content overflow: everybody gets the minimum, the caller decides
        // whether to scroll or clip.
        allocation.lengths = spans.iter().map(|span| span.min).collect();
        return allocation;
    }

    // With no minima at all, fall back to an equal split as the baseline.
    let (weights, floors, weight_total): (Vec<u64>, Vec<u32>, u64) = if required == 0 {
        let share = equal_share(content, count);
        (
            vec![1; count],
            spans.iter().map(|span| share.min(span.max)).collect(),
            u64::try_from(count).unwrap_or(u64::MAX),
        )
    } else {
        (
            spans.iter().map(|span| u64::from(span.min)).collect(),
            spans.iter().map(|span| span.min).collect(),
            required,
        )
    };
    let spans: Vec<Span> = spans
        .iter()
        .zip(&floors)
        .map(|(span, floor)| Span::new(*floor, span.max))
        .collect();

    // Proportional pass.
    let content_wide = u64::from(content);
    allocation.lengths = spans
        .iter()
        .zip(&weights)
        .map(|(span, weight)| {
            let share = weight
                .saturating_mul(content_wide)
                .checked_div(weight_total)
                .unwrap_or(0);
            span.clamp(u32::try_from(share).unwrap_or(u32::MAX))
        })
        .collect();

    // Slack pass.
    let mut leftover = content_wide.saturating_sub(allocation.total());
    if leftover > 0 {
        let slack: Vec<u64> = spans
            .iter()
            .zip(&allocation.lengths)
            .map(|(span, length)| u64::from(span.max.saturating_sub(*length)))
            .collect();
        let total_slack: u64 = slack.iter().sum();
        if total_slack > 0 {
            for ((length, span), headroom) in
                allocation.lengths.iter_mut().zip(&spans).zip(&slack)
            {
                let extra = headroom
                    .saturating_mul(leftover)
                    .checked_div(total_slack)
                    .unwrap_or(0);
                let extra = u32::try_from(extra).unwrap_or(u32::MAX);
                *length = length.saturating_add(extra).min(span.max);
            }
        }
        leftover = content_wide.saturating_sub(allocation.total());
    }

    // Rounding sweep, last child first.
    if leftover > 0 {
        for (length, span) in allocation.lengths.iter_mut().zip(&spans).rev() {
            let headroom = u64::from(span.max.saturating_sub(*length));
            let extra = headroom.min(leftover);
            *length = length.saturating_add(u32::try_from(extra).unwrap_or(u32::MAX));
            leftover = leftover.saturating_sub(extra);
            if leftover == 0 {
                break;
            }
        }
    }

    allocation.unallocated = u32::try_from(leftover).unwrap_or(u32::MAX);
    allocation
}

/// A single length fitted into `[min, max]` against an available length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    /// The resolved length.
    pub length: u32,
    /// `true` if `max < min` had to be corrected.
    pub corrected: bool,
    /// How far `min` exceeds the available length, if it does.
    pub excess: Option<u32>,
}

/// Clamps `available` into `[min, max]`, repairing `max < min` first.
///
/// Used for the cross axis of Stack and Row, where every sibling shares the
/// same length, and for both axes of Center.
///
/// ```
/// use layerfit::allocator::fit;
///
/// assert_eq!(fit(300, 50, 200).length, 200);
/// assert_eq!(fit(30, 50, 200).excess, Some(20));
/// assert!(fit(100, 80, 60).corrected);
/// ```
pub fn fit(available: u32, min: u32, max: u32) -> Fit {
    let span = Span::new(min, max);
    Fit {
        length: span.clamp(available),
        corrected: span.is_inconsistent(),
        excess: min.checked_sub(available).filter(|excess| *excess > 0),
    }
}
