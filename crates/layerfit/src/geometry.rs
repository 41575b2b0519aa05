//! Geometry primitives shared by the allocator, the aggregator and the
//! layout variants.
//!
//! # Core Types
//!
//! - [`Dimension`] - Width/height pair with an unbounded sentinel for maxima
//! - [`Insets`] - Container padding (top, right, bottom, left)
//! - [`Axis`] - Primary/cross axis selector shared by Stack and Row
//!
//! Lengths are `u32` pixels. Every summation in this crate is saturating, so
//! [`Dimension::UNBOUNDED_LENGTH`] absorbs anything added to it and an
//! unbounded maximum stays unbounded through aggregation.
//!
//! # Example
//!
//! ```
//! use layerfit::geometry::{Axis, Dimension, Insets};
//!
//! let max = Dimension::new(Dimension::UNBOUNDED_LENGTH, 80);
//! assert!(max.is_unbounded_width());
//!
//! let inner = Insets::all(10).deflate(Dimension::new(300, 200));
//! assert_eq!(inner, Dimension::new(280, 180));
//!
//! assert_eq!(Axis::Vertical.length(inner), 180);
//! assert_eq!(Axis::Vertical.compose(40, 280), Dimension::new(280, 40));
//! ```

use embedded_graphics::prelude::{Point, Size};

/// A width/height pair in pixels.
///
/// A maximum that should never constrain is expressed with
/// [`UNBOUNDED_LENGTH`](Self::UNBOUNDED_LENGTH) on the relevant axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Dimension {
    /// Horizontal extent in pixels.
    pub width: u32,
    /// Vertical extent in pixels.
    pub height: u32,
}

impl Dimension {
    /// Sentinel length standing in for +∞ in a maximum.
    pub const UNBOUNDED_LENGTH: u32 = u32::MAX;

    /// Creates a dimension from explicit width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The empty dimension.
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// A dimension that is unbounded on both axes.
    ///
    /// ```
    /// use layerfit::geometry::Dimension;
    ///
    /// let max = Dimension::unbounded();
    /// assert!(max.is_unbounded_width() && max.is_unbounded_height());
    /// ```
    pub const fn unbounded() -> Self {
        Self::new(Self::UNBOUNDED_LENGTH, Self::UNBOUNDED_LENGTH)
    }

    /// Returns `true` if the width is the unbounded sentinel.
    pub const fn is_unbounded_width(self) -> bool {
        self.width == Self::UNBOUNDED_LENGTH
    }

    /// Returns `true` if the height is the unbounded sentinel.
    pub const fn is_unbounded_height(self) -> bool {
        self.height == Self::UNBOUNDED_LENGTH
    }

    /// Component-wise saturating addition.
    pub const fn saturating_add(self, other: Self) -> Self {
        Self::new(
            self.width.saturating_add(other.width),
            self.height.saturating_add(other.height),
        )
    }
}

impl From<Size> for Dimension {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<Dimension> for Size {
    fn from(dimension: Dimension) -> Self {
        Size::new(dimension.width, dimension.height)
    }
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        fn length(f: &mut core::fmt::Formatter<'_>, value: u32) -> core::fmt::Result {
            if value == Dimension::UNBOUNDED_LENGTH {
                write!(f, "inf")
            } else {
                write!(f, "{value}")
            }
        }
        length(f, self.width)?;
        write!(f, "x")?;
        length(f, self.height)
    }
}

/// Padding subtracted from a container's raw bounds before any axis math.
///
/// Follows the CSS box model order: top, right, bottom, left.
///
/// ```
/// use layerfit::geometry::Insets;
///
/// let insets = Insets::new(4, 8, 6, 2);
/// assert_eq!(insets.horizontal(), 10);
/// assert_eq!(insets.vertical(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    /// Top inset in pixels.
    pub top: u32,
    /// Right inset in pixels.
    pub right: u32,
    /// Bottom inset in pixels.
    pub bottom: u32,
    /// Left inset in pixels.
    pub left: u32,
}

impl Insets {
    /// Insets with every side set to the same value.
    pub const fn all(value: u32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Insets with individual values for each side.
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// No padding at all.
    pub const fn zero() -> Self {
        Self::all(0)
    }

    /// Total horizontal inset (left + right).
    pub const fn horizontal(self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical inset (top + bottom).
    pub const fn vertical(self) -> u32 {
        self.top.saturating_add(self.bottom)
    }

    /// Total inset along `axis`.
    pub const fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// The inset at the start of `axis` (left or top).
    pub const fn leading(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Shrinks `outer` by these insets, clamping at zero.
    pub const fn deflate(self, outer: Dimension) -> Dimension {
        Dimension::new(
            outer.width.saturating_sub(self.horizontal()),
            outer.height.saturating_sub(self.vertical()),
        )
    }

    /// Grows `inner` by these insets, saturating at the unbounded sentinel.
    pub const fn inflate(self, inner: Dimension) -> Dimension {
        Dimension::new(
            inner.width.saturating_add(self.horizontal()),
            inner.height.saturating_add(self.vertical()),
        )
    }
}

/// One of the two layout axes.
///
/// Stack and Row are the same algorithm run along different axes; `Axis`
/// lets that code read and build dimensions without caring which one it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Left to right (width).
    Horizontal,
    /// Top to bottom (height).
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub const fn cross(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// The extent of `dimension` along this axis.
    pub const fn length(self, dimension: Dimension) -> u32 {
        match self {
            Axis::Horizontal => dimension.width,
            Axis::Vertical => dimension.height,
        }
    }

    /// Builds a dimension from a length along this axis and one across it.
    pub const fn compose(self, along: u32, across: u32) -> Dimension {
        match self {
            Axis::Horizontal => Dimension::new(along, across),
            Axis::Vertical => Dimension::new(across, along),
        }
    }

    /// Builds a point from an offset along this axis and one across it.
    pub fn point(self, along: u32, across: u32) -> Point {
        match self {
            Axis::Horizontal => Point::new(coordinate(along), coordinate(across)),
            Axis::Vertical => Point::new(coordinate(across), coordinate(along)),
        }
    }

    /// Lower-case axis name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Axis::Horizontal => "width",
            Axis::Vertical => "height",
        }
    }
}

/// Converts a pixel offset to a signed coordinate, saturating at `i32::MAX`.
pub fn coordinate(offset: u32) -> i32 {
    i32::try_from(offset).unwrap_or(i32::MAX)
}
