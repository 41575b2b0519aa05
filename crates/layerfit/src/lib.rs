//! Layerfit Layout Engine
//!
//! Min/max driven layout for trees of nested containers. Boxes declare how
//! small and how large they may be; layouts share the available space among
//! them without any fixed pixel constraints from the caller.
//!
//! # Architecture
//!
//! ```text
//! BoxTree / host toolkit (BoxQuery + Container)
//!         ↓
//! LayoutInstance (Stack, Row, Center)   ← caches min/max per container
//!         ↓
//! Size aggregation (recurses into nested layouts)
//!         ↓
//! Axis allocator (pure: spans + gap + length → lengths)
//! ```
//!
//! - [`allocator`] - constrained proportional allocation along one axis
//! - [`aggregate`] - a container's min/max derived from its children
//! - [`variants`] - Stack, Row and Center planning
//! - [`layout`] - layout instances, caching, invalidation
//! - [`tree`] - in-memory [`BoxTree`](tree::BoxTree) host
//! - [`diagnostics`] - what a pass corrected, estimated or could not fit
//! - [`report`] - printable description of a pass
//!
//! # Features
//!
//! - `defmt`: derive `defmt::Format` on plain enums and flags
//!
//! # Example
//!
//! ```
//! use layerfit::prelude::*;
//!
//! let mut tree = BoxTree::new();
//! let row = tree.insert(BoxNode::leaf().with_size(Dimension::new(240, 40)));
//! tree.set_layout(row, LayoutInstance::row(row, 0))?;
//!
//! let mut buttons = Vec::new();
//! for _ in 0..3 {
//!     let button = tree.insert(
//!         BoxNode::leaf()
//!             .with_min(Dimension::new(50, 20))
//!             .with_max(Dimension::new(100, 40)),
//!     );
//!     tree.add_child(row, button)?;
//!     buttons.push(button);
//! }
//!
//! tree.layout_container(row)?;
//! for button in buttons {
//!     assert_eq!(tree.bounds(button)?.size.width, 80);
//! }
//! # Ok::<(), LayoutError>(())
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in library code
#![deny(clippy::expect_used)] // no .expect() in library code
#![deny(clippy::panic)] // layout never panics; fatal conditions are Err
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]

pub mod aggregate;
pub mod allocator;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod report;
pub mod tree;
pub mod variants;

pub use error::{LayoutError, Result};

pub mod prelude {
    //! Common imports.

    // Geometry
    pub use crate::geometry::{Axis, Dimension, Insets};

    // Host traits and the reference tree
    pub use crate::host::{BoxQuery, Container};
    pub use crate::tree::{BoxId, BoxNode, BoxTree};

    // Layouts
    pub use crate::layout::{invalidate_layout, layout_container, LayoutInstance, Variant};
    pub use crate::variants::{LayoutOutcome, LayoutPlan, Overflow, Placement};

    // Diagnostics
    pub use crate::diagnostics::{
        Diagnostic, DiagnosticsSink, FirstIssueSink, NullSink, RecordingSink, Severity,
        TracingSink,
    };
    pub use crate::report::LayoutReport;

    // Errors
    pub use crate::error::LayoutError;
}
