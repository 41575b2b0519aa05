//! End-to-End Layout Scenarios
//!
//! Builds small box trees, runs full layout passes and checks the committed
//! bounds, overflow flags, caches and diagnostics.
//!
//! ```bash
//! cargo test -p layerfit --test scenarios
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use layerfit::diagnostics::{Diagnostic, RecordingSink};
use layerfit::prelude::*;
use layerfit_testing::LayoutFixture;

const INF: u32 = Dimension::UNBOUNDED_LENGTH;

fn dim(width: u32, height: u32) -> Dimension {
    Dimension::new(width, height)
}

/// Installs a `tracing` subscriber once so diagnostics show up with
/// `RUST_LOG=layerfit=debug cargo test`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Allocation scenarios
// ============================================================================

#[test]
fn test_stack_equal_split() {
    let mut t = LayoutFixture::new();
    let stack = t.add_root_stack("stack", dim(100, 240), 0);
    for name in ["a", "b", "c"] {
        t.add_leaf(name, stack, dim(10, 50), dim(INF, 100));
    }

    t.layout("stack").unwrap();

    t.assert_bounds("a", (0, 0), (100, 80)).unwrap();
    t.assert_bounds("b", (0, 80), (100, 80)).unwrap();
    t.assert_bounds("c", (0, 160), (100, 80)).unwrap();
    t.assert_fills("stack").unwrap();
    t.assert_no_problems().unwrap();
}

#[test]
fn test_row_slack_goes_to_unbounded_item() {
    let mut t = LayoutFixture::new();
    let row = t.add_root_row("row", dim(100, 50), 0);
    t.add_leaf("narrow", row, dim(10, 10), dim(20, 50));
    t.add_leaf("wide", row, dim(10, 10), dim(INF, 50));

    t.layout("row").unwrap();

    t.assert_bounds("narrow", (0, 0), (20, 50)).unwrap();
    t.assert_bounds("wide", (20, 0), (80, 50)).unwrap();
    t.assert_fills("row").unwrap();
}

#[test]
fn test_center_clamps_to_child_maximum() {
    let mut t = LayoutFixture::new();
    let center = t.add_root_center("center", dim(300, 300));
    t.add_leaf("child", center, dim(50, 50), dim(200, 200));

    t.layout("center").unwrap();

    t.assert_bounds("child", (50, 50), (200, 200)).unwrap();
    t.assert_within_hints("child").unwrap();
}

#[test]
fn test_content_overflow_keeps_minima() {
    init_tracing();
    let mut t = LayoutFixture::new();
    let stack = t.add_root_stack("stack", dim(100, 200), 0);
    for name in ["a", "b", "c"] {
        t.add_leaf(name, stack, dim(10, 100), dim(100, 150));
    }

    let mut sink = RecordingSink::<8>::new();
    let outcome = t.layout_container_with(stack, &mut sink).unwrap();

    assert!(outcome.overflow.is_overflowing());
    assert_eq!(outcome.overflow.vertical, Some(100));
    assert!(!outcome.overflow.scrollable);
    for name in ["a", "b", "c"] {
        t.assert_size(name, (100, 100)).unwrap();
    }
    assert!(sink.iter().any(|d| matches!(
        d,
        Diagnostic::ContentOverflow {
            axis: Axis::Vertical,
            available: 200,
            required: 300,
            scrollable: false,
        }
    )));
}

#[test]
fn test_gap_and_insets_are_respected() {
    let mut t = LayoutFixture::new();
    let stack = t.add_box(
        "stack",
        BoxNode::leaf()
            .with_size(dim(120, 130))
            .with_insets(Insets::new(5, 10, 5, 10)),
    );
    t.set_layout(stack, LayoutInstance::stack(stack, 20)).unwrap();
    t.add_leaf("top", stack, dim(10, 10), dim(INF, INF));
    t.add_leaf("bottom", stack, dim(10, 10), dim(INF, INF));

    t.layout("stack").unwrap();

    t.assert_bounds("top", (10, 5), (100, 50)).unwrap();
    t.assert_bounds("bottom", (10, 75), (100, 50)).unwrap();
    t.assert_fills("stack").unwrap();
}

#[test]
fn test_sibling_cross_conflict_gives_everyone_the_minimum() {
    let mut t = LayoutFixture::new();
    let stack = t.add_root_stack("stack", dim(100, 100), 0);
    t.add_leaf("wide", stack, dim(120, 10), dim(INF, INF));
    t.add_leaf("narrow", stack, dim(10, 10), dim(80, INF));

    t.layout("stack").unwrap();

    t.assert_size("wide", (120, 50)).unwrap();
    t.assert_size("narrow", (120, 50)).unwrap();
    t.assert_reported("cross-axis conflict", |d| {
        matches!(
            d,
            Diagnostic::InconsistentCrossBounds {
                axis: Axis::Horizontal,
                min: 120,
                max: 80,
            }
        )
    })
    .unwrap();
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_nested_content_overrides_declared_hints() {
    let mut t = LayoutFixture::new();
    let form = t.add_root_stack("form", dim(300, 200), 0);
    let buttons = t.add_row(
        "buttons",
        form,
        BoxNode::leaf().with_min(dim(10, 10)).with_max(dim(20, 20)),
        0,
    );
    t.add_leaf("ok", buttons, dim(50, 30), dim(200, 60));
    t.add_leaf("cancel", buttons, dim(50, 30), dim(200, 60));
    t.add_leaf("notes", form, dim(100, 20), dim(INF, INF));

    assert_eq!(t.minimum_layout_size(buttons).unwrap(), Some(dim(100, 30)));
    assert_eq!(t.maximum_layout_size(buttons).unwrap(), Some(dim(400, 60)));
    assert_eq!(t.minimum_layout_size(form).unwrap(), Some(dim(100, 50)));

    assert_eq!(t.layout("form").unwrap(), 2);

    t.assert_bounds("buttons", (0, 0), (300, 60)).unwrap();
    t.assert_bounds("notes", (0, 60), (300, 140)).unwrap();
    t.assert_bounds("ok", (0, 0), (150, 60)).unwrap();
    t.assert_bounds("cancel", (150, 0), (150, 60)).unwrap();
    t.assert_within_hints("buttons").unwrap();
    t.assert_reported("hint override", |d| {
        matches!(d, Diagnostic::HintOverridden { index: 0, .. })
    })
    .unwrap();
}

#[test]
fn test_empty_nested_container_uses_declared_hints() {
    let mut t = LayoutFixture::new();
    let form = t.add_root_stack("form", dim(200, 100), 0);
    let placeholder = t.add_row(
        "placeholder",
        form,
        BoxNode::leaf().with_min(dim(40, 15)).with_max(dim(INF, 15)),
        0,
    );
    t.add_leaf("body", form, dim(40, 10), dim(INF, INF));

    assert_eq!(t.minimum_layout_size(placeholder).unwrap(), None);
    assert_eq!(t.minimum_layout_size(form).unwrap(), Some(dim(40, 25)));

    t.layout("form").unwrap();
    t.assert_size("placeholder", (200, 15)).unwrap();
    t.assert_size("body", (200, 85)).unwrap();
}

// ============================================================================
// Scrollable viewports
// ============================================================================

#[test]
fn test_viewport_extent_drives_layout() {
    let mut t = LayoutFixture::new();
    let viewport = t.add_box("viewport", BoxNode::scrollable_viewport(dim(200, 100)));
    let list = t.add_stack("list", viewport, BoxNode::leaf(), 0);
    for name in ["a", "b", "c"] {
        t.add_leaf(name, list, dim(100, 50), dim(INF, 80));
    }

    // Inside a viewport the preferred size is the minimum.
    assert_eq!(t.preferred_layout_size(list).unwrap(), dim(100, 150));

    let mut sink = RecordingSink::<8>::new();
    let outcome = t.layout_container_with(list, &mut sink).unwrap();
    assert_eq!(outcome.overflow.vertical, Some(50));
    assert!(outcome.overflow.scrollable);
    assert!(!sink.has_problems());

    t.assert_bounds("a", (0, 0), (200, 50)).unwrap();
    t.assert_bounds("c", (0, 100), (200, 50)).unwrap();
}

#[test]
fn test_empty_container_prefers_viewport_extent() {
    let mut t = LayoutFixture::new();
    let viewport = t.add_box("viewport", BoxNode::scrollable_viewport(dim(200, 100)));
    let page = t.add_box("page", BoxNode::leaf().with_insets(Insets::all(10)));
    t.set_layout(page, LayoutInstance::stack(page, 0)).unwrap();
    t.add_child(viewport, page).unwrap();

    assert_eq!(t.preferred_layout_size(page).unwrap(), dim(180, 80));

    t.set_min_size(page, Some(dim(60, 60))).unwrap();
    assert_eq!(t.preferred_layout_size(page).unwrap(), dim(60, 60));
}

#[test]
fn test_preferred_size_outside_viewport_is_available_size() {
    let mut t = LayoutFixture::new();
    let row = t.add_box(
        "row",
        BoxNode::leaf()
            .with_size(dim(300, 50))
            .with_insets(Insets::all(5)),
    );
    t.set_layout(row, LayoutInstance::row(row, 10)).unwrap();
    t.add_leaf("a", row, dim(20, 20), dim(100, 40));
    t.add_leaf("b", row, dim(20, 20), dim(100, 40));

    assert_eq!(t.preferred_layout_size(row).unwrap(), dim(300, 50));
}

// ============================================================================
// Passes, caches and invalidation
// ============================================================================

#[test]
fn test_layout_is_idempotent() {
    let mut t = LayoutFixture::new();
    let row = t.add_root_row("row", dim(101, 40), 3);
    for name in ["a", "b", "c"] {
        t.add_leaf(name, row, dim(7, 10), dim(INF, INF));
    }

    t.layout("row").unwrap();
    let first: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| t.bounds_of(name).unwrap())
        .collect();
    t.layout("row").unwrap();
    let second: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| t.bounds_of(name).unwrap())
        .collect();

    assert_eq!(first, second);
    t.assert_fills("row").unwrap();
}

#[test]
fn test_invalidation_stops_at_plain_ancestor() {
    let mut t = LayoutFixture::new();
    let top = t.add_root_stack("top", dim(400, 400), 0);
    let plain = t.add_child_box(
        "plain",
        top,
        BoxNode::leaf().with_min(dim(10, 10)).with_max(dim(INF, INF)),
    );
    let middle = t.add_stack("middle", plain, BoxNode::leaf(), 0);
    let inner = t.add_stack("inner", middle, BoxNode::leaf(), 0);
    t.add_leaf("leaf", inner, dim(10, 10), dim(INF, INF));

    for id in [top, middle, inner] {
        t.minimum_layout_size(id).unwrap();
    }
    let cached = |t: &LayoutFixture, id| {
        t.node(id)
            .unwrap()
            .layout()
            .unwrap()
            .cached_minimum()
            .is_some()
    };
    assert!(cached(&t, top) && cached(&t, middle) && cached(&t, inner));

    t.add_leaf("late", inner, dim(10, 10), dim(INF, INF));

    assert!(!cached(&t, inner));
    assert!(!cached(&t, middle));
    assert!(cached(&t, top));
    assert_eq!(t.invalidate_layout(inner).unwrap(), 2);
}

#[test]
fn test_removing_a_child_refreshes_minimum() {
    let mut t = LayoutFixture::new();
    let stack = t.add_root_stack("stack", dim(100, 100), 5);
    t.add_leaf("a", stack, dim(10, 20), dim(INF, INF));
    let b = t.add_leaf("b", stack, dim(30, 20), dim(INF, INF));

    assert_eq!(t.minimum_layout_size(stack).unwrap(), Some(dim(30, 45)));
    t.remove_child(stack, b).unwrap();
    assert_eq!(t.minimum_layout_size(stack).unwrap(), Some(dim(10, 20)));
}

#[test]
fn test_estimated_minimum_stays_cached_until_invalidated() {
    let mut t = LayoutFixture::new();
    let stack = t.add_root_stack("stack", dim(100, 100), 0);
    t.add_child_box("unsized", stack, BoxNode::leaf());

    assert_eq!(t.minimum_layout_size(stack).unwrap(), Some(dim(0, 100)));
    assert_eq!(
        t.node(stack).unwrap().layout().unwrap().cached_minimum(),
        Some(dim(0, 100))
    );

    // Resizing is not structural: the memoized value is returned.
    t.set_size(stack, dim(100, 60)).unwrap();
    assert_eq!(t.minimum_layout_size(stack).unwrap(), Some(dim(0, 100)));

    t.invalidate_layout(stack).unwrap();
    assert_eq!(t.minimum_layout_size(stack).unwrap(), Some(dim(0, 60)));
}

#[test]
fn test_nested_estimate_agrees_with_parent() {
    let mut t = LayoutFixture::new();
    let outer = t.add_root_stack("outer", dim(100, 400), 0);
    let inner = t.add_stack("inner", outer, BoxNode::leaf().with_size(dim(100, 200)), 0);
    t.add_child_box("unsized", inner, BoxNode::leaf());
    t.add_leaf("fixed", outer, dim(10, 10), dim(INF, 10));

    let inner_min = t.minimum_layout_size(inner).unwrap().unwrap();
    let outer_min = t.minimum_layout_size(outer).unwrap().unwrap();
    assert_eq!(inner_min, dim(0, 200));
    assert_eq!(outer_min, dim(10, 210));

    t.set_size(inner, dim(100, 50)).unwrap();
    let inner_min = t.minimum_layout_size(inner).unwrap().unwrap();
    let outer_min = t.minimum_layout_size(outer).unwrap().unwrap();
    assert_eq!(outer_min.height, inner_min.height.saturating_add(10));

    t.invalidate_layout(inner).unwrap();
    assert_eq!(t.minimum_layout_size(inner).unwrap(), Some(dim(0, 50)));
    assert_eq!(t.minimum_layout_size(outer).unwrap(), Some(dim(10, 60)));
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_foreign_instance_is_rejected() {
    let mut t = LayoutFixture::new();
    let a = t.add_root_stack("a", dim(10, 10), 0);
    let b = t.add_box("b", BoxNode::leaf());

    let foreign = LayoutInstance::stack(a, 0);
    assert_eq!(
        foreign.plan(&*t, b, &mut RecordingSink::<1>::new()),
        Err(LayoutError::BindingMismatch {
            owner: a,
            container: b
        })
    );
    assert_eq!(
        t.set_layout(b, LayoutInstance::row(a, 0)),
        Err(LayoutError::BindingMismatch {
            owner: a,
            container: b
        })
    );
}

#[test]
fn test_center_with_two_children_commits_nothing() {
    let mut t = LayoutFixture::new();
    let center = t.add_root_center("center", dim(100, 100));
    t.add_leaf("first", center, dim(10, 10), dim(50, 50));
    t.add_leaf("second", center, dim(10, 10), dim(50, 50));

    assert_eq!(
        t.layout_container(center),
        Err(LayoutError::TooManyChildren {
            container: center,
            count: 2
        })
    );
    t.assert_bounds("first", (0, 0), (0, 0)).unwrap();
    assert!(t.layout("center").is_err());
}

#[test]
fn test_report_describes_pass() {
    let mut t = LayoutFixture::new();
    let stack = t.add_root_stack("stack", dim(100, 100), 0);
    t.add_leaf("a", stack, dim(10, 20), dim(INF, 40));

    let report = t.report(stack).unwrap();
    assert_eq!(report.child_count(), 1);
    assert_eq!(report.cross_length, Some(100));
    let text = report.to_string();
    assert!(text.starts_with("Stack layout, 1 child, available 100x100"));
    assert!(text.contains("#0 min 10x20 max infx40 -> 100x40 at (0, 0)"));
}
