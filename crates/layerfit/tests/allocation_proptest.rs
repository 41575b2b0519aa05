//! Property-based tests for the axis allocator.
//! Verifies the bounds and fill guarantees for ALL inputs, not just fixed examples.

use layerfit::allocator::{allocate, gap_total, Span};
use layerfit::geometry::Dimension;
use proptest::prelude::*;

/// A span whose maximum is sometimes below its minimum and sometimes unbounded.
fn span() -> impl Strategy<Value = Span> {
    (
        0u32..=200,
        prop_oneof![
            3 => (0u32..=400).boxed(),
            1 => Just(Dimension::UNBOUNDED_LENGTH).boxed(),
        ],
    )
        .prop_map(|(min, max)| Span::new(min, max))
}

fn spans() -> impl Strategy<Value = Vec<Span>> {
    proptest::collection::vec(span(), 1..8)
}

proptest::proptest! {
    /// Every length lies within its span after `max < min` is repaired.
    #[test]
    fn lengths_respect_corrected_spans(spans in spans(), gap in 0u32..=20, available in 0u32..=2000) {
        let allocation = allocate(&spans, gap, available);
        assert_eq!(allocation.lengths().len(), spans.len());
        for (span, length) in spans.iter().zip(allocation.lengths()) {
            let span = span.corrected();
            assert!(span.min <= *length && *length <= span.max,
                "length {} outside [{}, {}]", length, span.min, span.max);
        }
    }

    /// Between the summed minima and the summed maxima the content length is filled exactly.
    #[test]
    fn feasible_input_is_filled_exactly(spans in spans(), gap in 0u32..=20, available in 0u32..=2000) {
        let corrected: Vec<Span> = spans.iter().map(|span| span.corrected()).collect();
        let total_min: u64 = corrected.iter().map(|span| u64::from(span.min)).sum();
        let total_max: u64 = corrected.iter().map(|span| u64::from(span.max)).sum();
        let content = u64::from(available.saturating_sub(gap_total(gap, spans.len())));
        prop_assume!(total_min <= content && content <= total_max);

        let allocation = allocate(&spans, gap, available);
        assert_eq!(allocation.total(), content);
        assert_eq!(allocation.unallocated(), 0);
        assert!(!allocation.overflows());
    }

    /// When the minima do not fit, every item gets exactly its minimum.
    #[test]
    fn overflow_hands_out_minima(spans in spans(), gap in 0u32..=20, available in 0u32..=300) {
        let allocation = allocate(&spans, gap, available);
        if allocation.overflows() {
            let minima: Vec<u32> = spans.iter().map(|span| span.min).collect();
            assert_eq!(allocation.lengths(), minima.as_slice());
            assert!(allocation.excess().is_some());
        }
    }

    /// Allocation is a pure function of its inputs.
    #[test]
    fn allocation_is_deterministic(spans in spans(), gap in 0u32..=20, available in 0u32..=2000) {
        assert_eq!(allocate(&spans, gap, available), allocate(&spans, gap, available));
    }
}
