//! Layerfit Testing Utilities
//!
//! Named box trees and bounds assertions for layout tests.
//!
//! # Quick start
//!
//! ```
//! use layerfit::prelude::*;
//! use layerfit_testing::LayoutFixture;
//!
//! let mut t = LayoutFixture::new();
//! let form = t.add_root_stack("form", Dimension::new(200, 100), 0);
//! t.add_leaf("name", form, Dimension::new(50, 20), Dimension::new(400, 40));
//! t.add_leaf("notes", form, Dimension::new(50, 20), Dimension::unbounded());
//!
//! t.layout("form").unwrap();
//!
//! t.assert_bounds("name", (0, 0), (200, 40)).unwrap();
//! t.assert_bounds("notes", (0, 40), (200, 60)).unwrap();
//! t.assert_fills("form").unwrap();
//! t.assert_within_hints("notes").unwrap();
//! ```
//!
//! Assertions return `Result<(), String>` so failures carry a readable
//! message; unwrap them in the test.

#![warn(clippy::all)]
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]

use std::ops::{Deref, DerefMut};

use embedded_graphics::primitives::Rectangle;
use layerfit::diagnostics::{Diagnostic, RecordingSink};
use layerfit::prelude::*;

/// How many diagnostics a fixture keeps between layout passes.
pub const DIAGNOSTICS_CAPACITY: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// LayoutFixture
// ─────────────────────────────────────────────────────────────────────────────

/// A [`BoxTree`] whose boxes can be addressed by name.
///
/// Derefs to [`BoxTree`], so every tree operation is available directly.
/// Diagnostics of [`layout`](Self::layout) passes are recorded and can be
/// checked afterwards.
#[derive(Debug, Default)]
pub struct LayoutFixture {
    tree: BoxTree,
    names: Vec<(String, BoxId)>,
    diagnostics: RecordingSink<DIAGNOSTICS_CAPACITY>,
}

impl LayoutFixture {
    /// An empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, id: BoxId) -> BoxId {
        if let Some(existing) = self.names.iter_mut().find(|(n, _)| n == name) {
            existing.1 = id;
        } else {
            self.names.push((name.to_string(), id));
        }
        id
    }

    /// Adds a detached box under `name`.
    pub fn add_box(&mut self, name: &str, node: BoxNode) -> BoxId {
        let id = self.tree.insert(node);
        self.register(name, id)
    }

    /// Adds a box under `name` and appends it to `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in the tree.
    #[allow(clippy::panic)]
    pub fn add_child_box(&mut self, name: &str, parent: BoxId, node: BoxNode) -> BoxId {
        let id = self.add_box(name, node);
        if let Err(e) = self.tree.add_child(parent, id) {
            panic!("add_child_box({name}): {e}");
        }
        id
    }

    /// Adds a leaf with min and max hints under `parent`.
    pub fn add_leaf(&mut self, name: &str, parent: BoxId, min: Dimension, max: Dimension) -> BoxId {
        self.add_child_box(name, parent, BoxNode::leaf().with_min(min).with_max(max))
    }

    #[allow(clippy::panic)]
    fn bind(&mut self, id: BoxId, layout: LayoutInstance) -> BoxId {
        if let Err(e) = self.tree.set_layout(id, layout) {
            panic!("binding layout: {e}");
        }
        id
    }

    /// Adds a root Stack of the given size.
    pub fn add_root_stack(&mut self, name: &str, size: Dimension, gap: u32) -> BoxId {
        let id = self.add_box(name, BoxNode::leaf().with_size(size));
        self.bind(id, LayoutInstance::stack(id, gap))
    }

    /// Adds a root Row of the given size.
    pub fn add_root_row(&mut self, name: &str, size: Dimension, gap: u32) -> BoxId {
        let id = self.add_box(name, BoxNode::leaf().with_size(size));
        self.bind(id, LayoutInstance::row(id, gap))
    }

    /// Adds a root Center of the given size.
    pub fn add_root_center(&mut self, name: &str, size: Dimension) -> BoxId {
        let id = self.add_box(name, BoxNode::leaf().with_size(size));
        self.bind(id, LayoutInstance::center(id))
    }

    /// Adds a nested Stack under `parent`. `node` carries its own hints.
    pub fn add_stack(&mut self, name: &str, parent: BoxId, node: BoxNode, gap: u32) -> BoxId {
        let id = self.add_child_box(name, parent, node);
        self.bind(id, LayoutInstance::stack(id, gap))
    }

    /// Adds a nested Row under `parent`. `node` carries its own hints.
    pub fn add_row(&mut self, name: &str, parent: BoxId, node: BoxNode, gap: u32) -> BoxId {
        let id = self.add_child_box(name, parent, node);
        self.bind(id, LayoutInstance::row(id, gap))
    }

    /// Adds a nested Center under `parent`. `node` carries its own hints.
    pub fn add_center(&mut self, name: &str, parent: BoxId, node: BoxNode) -> BoxId {
        let id = self.add_child_box(name, parent, node);
        self.bind(id, LayoutInstance::center(id))
    }

    /// Looks up a box by name.
    pub fn id(&self, name: &str) -> Result<BoxId, String> {
        self.names
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| format!("Box '{name}' not registered"))
    }

    /// Lays out the named box and every layout container below it.
    ///
    /// Diagnostics from earlier passes are discarded first.
    pub fn layout(&mut self, name: &str) -> Result<usize, String> {
        let root = self.id(name)?;
        self.diagnostics.clear();
        self.tree
            .layout_tree(root, &mut self.diagnostics)
            .map_err(|e| format!("layout('{name}') failed: {e}"))
    }

    /// Diagnostics recorded by the last [`layout`](Self::layout) pass.
    pub fn diagnostics(&self) -> &RecordingSink<DIAGNOSTICS_CAPACITY> {
        &self.diagnostics
    }

    /// Bounds of the named box.
    pub fn bounds_of(&self, name: &str) -> Result<Rectangle, String> {
        let id = self.id(name)?;
        self.tree.bounds(id).map_err(|e| e.to_string())
    }

    // ── Assertions ───────────────────────────────────────────────────────────

    /// Assert that the named box sits at `origin` with `size`.
    pub fn assert_bounds(
        &self,
        name: &str,
        origin: (i32, i32),
        size: (u32, u32),
    ) -> Result<(), String> {
        let bounds = self.bounds_of(name)?;
        let actual_origin = (bounds.top_left.x, bounds.top_left.y);
        let actual_size = (bounds.size.width, bounds.size.height);
        if actual_origin == origin && actual_size == size {
            Ok(())
        } else {
            Err(format!(
                "assert_bounds('{name}'): expected {}x{} at ({}, {}), got {}x{} at ({}, {})",
                size.0,
                size.1,
                origin.0,
                origin.1,
                actual_size.0,
                actual_size.1,
                actual_origin.0,
                actual_origin.1
            ))
        }
    }

    /// Assert that the named box has `size`, wherever it is.
    pub fn assert_size(&self, name: &str, size: (u32, u32)) -> Result<(), String> {
        let bounds = self.bounds_of(name)?;
        let actual = (bounds.size.width, bounds.size.height);
        if actual == size {
            Ok(())
        } else {
            Err(format!(
                "assert_size('{name}'): expected {}x{}, got {}x{}",
                size.0, size.1, actual.0, actual.1
            ))
        }
    }

    /// Assert that the named box's size lies within its effective hints.
    ///
    /// For a layout container the content size replaces declared hints, the
    /// same way the parent layout sees it. A maximum below the minimum counts
    /// as equal to the minimum.
    pub fn assert_within_hints(&self, name: &str) -> Result<(), String> {
        let id = self.id(name)?;
        let size = Dimension::from(self.bounds_of(name)?.size);
        let (content_min, content_max) = if self.tree.as_nested_layout(id).is_some() {
            (
                self.tree.minimum_layout_size(id).map_err(|e| e.to_string())?,
                self.tree.maximum_layout_size(id).map_err(|e| e.to_string())?,
            )
        } else {
            (None, None)
        };
        let min = content_min.or(self.tree.min_size(id)).unwrap_or_default();
        let max = content_max
            .or(self.tree.max_size(id))
            .unwrap_or_else(Dimension::unbounded);

        for axis in [Axis::Horizontal, Axis::Vertical] {
            let length = axis.length(size);
            let lower = axis.length(min);
            let upper = axis.length(max).max(lower);
            if length < lower || length > upper {
                return Err(format!(
                    "assert_within_hints('{name}'): {} {length} outside [{lower}, {upper}]",
                    axis.name()
                ));
            }
        }
        Ok(())
    }

    /// Assert that the children of a Stack or Row, plus gaps, exactly fill
    /// the container's inner length along its primary axis.
    pub fn assert_fills(&self, name: &str) -> Result<(), String> {
        let id = self.id(name)?;
        let layout = self
            .tree
            .as_nested_layout(id)
            .ok_or_else(|| format!("assert_fills('{name}'): not a layout container"))?;
        let axis = layout
            .variant()
            .axis()
            .ok_or_else(|| format!("assert_fills('{name}'): Center has no primary axis"))?;

        let outer = self
            .tree
            .viewport_extent(id)
            .unwrap_or_else(|| self.tree.current_size(id));
        let available = axis.length(self.tree.insets(id).deflate(outer));

        let children = self.tree.children(id);
        let gaps = layout
            .gap()
            .saturating_mul(u32::try_from(children.len().saturating_sub(1)).unwrap_or(u32::MAX));
        let mut used = u64::from(gaps);
        for child in children {
            let size = self.tree.current_size(*child);
            used = used.saturating_add(u64::from(axis.length(size)));
        }

        if used == u64::from(available) {
            Ok(())
        } else {
            Err(format!(
                "assert_fills('{name}'): children use {used} of {available} along {}",
                axis.name()
            ))
        }
    }

    /// Assert that the last layout pass reported no warnings or errors.
    pub fn assert_no_problems(&self) -> Result<(), String> {
        match self.diagnostics.iter().find(|d| d.is_problem()) {
            None => Ok(()),
            Some(first) => Err(format!("assert_no_problems: {first}")),
        }
    }

    /// Assert that the last layout pass reported a diagnostic matching
    /// `predicate`.
    pub fn assert_reported(
        &self,
        what: &str,
        predicate: impl Fn(&Diagnostic) -> bool,
    ) -> Result<(), String> {
        if self.diagnostics.iter().any(predicate) {
            Ok(())
        } else {
            let seen: Vec<String> = self.diagnostics.iter().map(ToString::to_string).collect();
            Err(format!(
                "assert_reported: no {what} diagnostic among [{}]",
                seen.join("; ")
            ))
        }
    }
}

impl Deref for LayoutFixture {
    type Target = BoxTree;

    fn deref(&self) -> &BoxTree {
        &self.tree
    }
}

impl DerefMut for LayoutFixture {
    fn deref_mut(&mut self) -> &mut BoxTree {
        &mut self.tree
    }
}
