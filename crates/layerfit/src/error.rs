//! Layout errors.
//!
//! Only programmer errors are reported through [`LayoutError`]. Recoverable
//! conditions (inconsistent bounds, missing hints, content overflow) never
//! fail a pass; they are corrected in place and described to a
//! [`DiagnosticsSink`](crate::diagnostics::DiagnosticsSink) instead.
//!
//! Every variant is fatal for the call that produced it: the pass aborts
//! before any cache is written or any bounds are committed.

use thiserror_no_std::Error;

use crate::tree::BoxId;

/// Errors returned by layout entry points and tree mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A layout instance was used for a container other than the one it was
    /// constructed for. Instances cannot be shared.
    #[error("layout instance bound to {owner} cannot be used for container {container}")]
    BindingMismatch {
        /// The container the instance was constructed for.
        owner: BoxId,
        /// The container it was invoked against.
        container: BoxId,
    },

    /// The container already carries a layout instance.
    #[error("container {container} already has a layout instance")]
    AlreadyBound {
        /// The container that was bound twice.
        container: BoxId,
    },

    /// A center layout was asked to arrange more than one child.
    #[error("center layout of {container} can hold only one child, found {count}")]
    TooManyChildren {
        /// The offending container.
        container: BoxId,
        /// How many children it holds.
        count: usize,
    },

    /// The id does not refer to a box in the tree.
    #[error("unknown box {0}")]
    UnknownBox(BoxId),

    /// A layout entry point was invoked on a box that has no layout instance.
    #[error("box {0} is not governed by a layout instance")]
    NotALayoutContainer(BoxId),

    /// `child` is not among the children of `parent`.
    #[error("box {child} is not a child of {parent}")]
    NotAChild {
        /// The container that was searched.
        parent: BoxId,
        /// The box that was not found.
        child: BoxId,
    },

    /// Adding `child` under `parent` would make a box its own ancestor.
    #[error("adding {child} under {parent} would create a cycle")]
    CycleDetected {
        /// The intended parent.
        parent: BoxId,
        /// The intended child.
        child: BoxId,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = LayoutError> = core::result::Result<T, E>;
