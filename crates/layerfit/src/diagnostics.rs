//! Diagnostics reported by layout passes.
//!
//! Layout never fails on bad size hints. It corrects them and keeps going,
//! then describes what it had to do to a [`DiagnosticsSink`] once the
//! allocation for a container is complete. The allocator itself stays pure.
//!
//! # Sinks
//!
//! - [`NullSink`] - discards everything
//! - [`TracingSink`] - forwards to `tracing` (the default for `BoxTree`)
//! - [`RecordingSink`] - keeps the last `N` diagnostics in a bounded buffer
//! - [`FirstIssueSink`] - forwards only the first problem until re-armed
//!
//! # Example
//!
//! ```
//! use layerfit::diagnostics::{Diagnostic, DiagnosticsSink, RecordingSink};
//! use layerfit::geometry::Axis;
//!
//! let mut sink = RecordingSink::<4>::new();
//! sink.report(&Diagnostic::ContentOverflow {
//!     axis: Axis::Vertical,
//!     available: 200,
//!     required: 300,
//!     scrollable: false,
//! });
//! assert_eq!(sink.len(), 1);
//! assert!(sink.iter().all(Diagnostic::is_problem));
//! ```

use heapless::Deque;

use crate::geometry::{Axis, Dimension};

/// Which size hint a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoundKind {
    /// The minimum size.
    Minimum,
    /// The maximum size.
    Maximum,
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Severity {
    /// Expected behaviour worth knowing about.
    Info,
    /// A hint was missing and had to be estimated.
    Warning,
    /// The hints are wrong or the result will look broken.
    Error,
}

/// Something a layout pass corrected, estimated or could not satisfy.
///
/// `index` fields are the child's position within its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A child's maximum was below its minimum and was raised to it.
    InconsistentBounds {
        /// Child position.
        index: usize,
        /// Axis of the bad pair.
        axis: Axis,
        /// Declared minimum.
        min: u32,
        /// Declared maximum (before correction).
        max: u32,
    },
    /// Siblings disagree on the shared cross length: the widest minimum is
    /// larger than the narrowest maximum. The minimum wins.
    InconsistentCrossBounds {
        /// The cross axis.
        axis: Axis,
        /// Largest minimum among the siblings.
        min: u32,
        /// Smallest maximum among the siblings.
        max: u32,
    },
    /// A child had no minimum; an equal share was used instead.
    MinimumEstimated {
        /// Child position.
        index: usize,
        /// Axis of the estimate.
        axis: Axis,
        /// The substituted length.
        estimate: u32,
    },
    /// A child had no maximum; an equal share was used instead.
    MaximumEstimated {
        /// Child position.
        index: usize,
        /// Axis of the estimate.
        axis: Axis,
        /// The substituted length.
        estimate: u32,
    },
    /// A nested layout's content size replaced a hint declared on its box.
    HintOverridden {
        /// Child position.
        index: usize,
        /// Which hint was replaced.
        bound: BoundKind,
        /// The hint declared on the box.
        declared: Dimension,
        /// The size derived from the nested layout's children.
        content: Dimension,
    },
    /// The children's minima do not fit into the available length.
    ContentOverflow {
        /// Axis that overflows.
        axis: Axis,
        /// Available length (after insets and gaps).
        available: u32,
        /// Length the children need at minimum.
        required: u32,
        /// `true` when a scrollable viewport will show the excess.
        scrollable: bool,
    },
    /// Every child reached its maximum and part of the available length is
    /// left empty.
    Underfilled {
        /// Axis with unused space.
        axis: Axis,
        /// Available length (after insets and gaps).
        available: u32,
        /// Length actually handed out.
        allocated: u32,
    },
}

impl Diagnostic {
    /// The severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::InconsistentBounds { .. }
            | Diagnostic::InconsistentCrossBounds { .. }
            | Diagnostic::Underfilled { .. } => Severity::Error,
            Diagnostic::ContentOverflow { scrollable, .. } => {
                if *scrollable {
                    Severity::Info
                } else {
                    Severity::Error
                }
            }
            Diagnostic::MinimumEstimated { .. } | Diagnostic::MaximumEstimated { .. } => {
                Severity::Warning
            }
            Diagnostic::HintOverridden { .. } => Severity::Info,
        }
    }

    /// Returns `true` for warnings and errors.
    pub fn is_problem(&self) -> bool {
        self.severity() >= Severity::Warning
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Diagnostic::InconsistentBounds {
                index,
                axis,
                min,
                max,
            } => write!(
                f,
                "child {index}: minimum {} {min} is larger than maximum {max}; maximum raised to minimum",
                axis.name()
            ),
            Diagnostic::InconsistentCrossBounds { axis, min, max } => write!(
                f,
                "children need a {} of at least {min} but allow at most {max}; minimum wins",
                axis.name()
            ),
            Diagnostic::MinimumEstimated {
                index,
                axis,
                estimate,
            } => write!(
                f,
                "child {index}: minimum size not set, estimated minimum {} {estimate}",
                axis.name()
            ),
            Diagnostic::MaximumEstimated {
                index,
                axis,
                estimate,
            } => write!(
                f,
                "child {index}: maximum size not set, estimated maximum {} {estimate}",
                axis.name()
            ),
            Diagnostic::HintOverridden {
                index,
                bound,
                declared,
                content,
            } => {
                let bound = match bound {
                    BoundKind::Minimum => "minimum",
                    BoundKind::Maximum => "maximum",
                };
                write!(
                    f,
                    "child {index}: declared {bound} size {declared} overridden by its content ({content})"
                )
            }
            Diagnostic::ContentOverflow {
                axis,
                available,
                required,
                scrollable,
            } => {
                if *scrollable {
                    write!(
                        f,
                        "available {} {available} is smaller than the required {required}; viewport should scroll",
                        axis.name()
                    )
                } else {
                    write!(
                        f,
                        "available {} {available} is smaller than the required {required}; content will be clipped",
                        axis.name()
                    )
                }
            }
            Diagnostic::Underfilled {
                axis,
                available,
                allocated,
            } => write!(
                f,
                "allocated {} {allocated} is smaller than the available {available}; alignment is broken",
                axis.name()
            ),
        }
    }
}

/// Receives diagnostics from layout passes.
pub trait DiagnosticsSink {
    /// Called once per diagnostic, after the container's allocation is done.
    fn report(&mut self, diagnostic: &Diagnostic);
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut S {
    fn report(&mut self, diagnostic: &Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn report(&mut self, _diagnostic: &Diagnostic) {}
}

/// Forwards diagnostics to `tracing`.
///
/// Errors and warnings are emitted at `WARN`, informational diagnostics at
/// `DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => tracing::warn!(severity = "error", "{}", diagnostic),
            Severity::Warning => tracing::warn!(severity = "warning", "{}", diagnostic),
            Severity::Info => tracing::debug!("{}", diagnostic),
        }
    }
}

/// Keeps the most recent `N` diagnostics.
///
/// When the buffer is full the oldest entry is dropped and counted.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink<const N: usize> {
    entries: Deque<Diagnostic, N>,
    dropped: usize,
}

impl<const N: usize> RecordingSink<N> {
    /// Creates an empty sink.
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            dropped: 0,
        }
    }

    /// Recorded diagnostics, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics dropped because the buffer was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.dropped = 0;
    }

    /// Returns `true` if any recorded diagnostic is a warning or error.
    pub fn has_problems(&self) -> bool {
        self.iter().any(Diagnostic::is_problem)
    }
}

impl<const N: usize> DiagnosticsSink for RecordingSink<N> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        if self.entries.is_full() {
            self.entries.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        // Cannot fail: a slot was freed above when the buffer was full.
        let _ = self.entries.push_back(diagnostic.clone());
    }
}

/// Forwards only the first problem (warning or error) it sees.
///
/// Useful while tuning size hints: the first inconsistency is usually the
/// cause of everything reported after it. Informational diagnostics are
/// never forwarded. Call [`rearm`](Self::rearm) to catch the next one.
#[derive(Debug, Clone, Default)]
pub struct FirstIssueSink<S> {
    inner: S,
    fired: bool,
}

impl<S: DiagnosticsSink> FirstIssueSink<S> {
    /// Wraps `inner`.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            fired: false,
        }
    }

    /// Returns `true` once a problem has been forwarded.
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Allows the next problem through.
    pub fn rearm(&mut self) {
        self.fired = false;
    }

    /// The wrapped sink.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: DiagnosticsSink> DiagnosticsSink for FirstIssueSink<S> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        if self.fired || !diagnostic.is_problem() {
            return;
        }
        self.fired = true;
        self.inner.report(diagnostic);
    }
}
