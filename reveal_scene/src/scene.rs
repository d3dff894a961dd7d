// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Scene`] container: view storage, hierarchy edits, queries, and commit.

use alloc::vec::Vec;
use kurbo::{Affine, Point, Rect, RoundedRect, Shape, Size};
use peniko::Color;

use crate::damage::Damage;
use crate::types::{LocalView, ViewFlags, ViewId, ViewShape};

/// World-space data cached by [`Scene::commit`].
#[derive(Clone, Debug, Default)]
struct WorldView {
    world_transform: Affine,
    world_bounds: Rect, // AABB of transformed bounds, clipped by ancestors
    committed: bool,
}

#[derive(Clone, Debug)]
struct View {
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    local: LocalView,
    world: WorldView,
    paint_dirty: bool,
}

impl View {
    fn new(local: LocalView) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            local,
            world: WorldView::default(),
            paint_dirty: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    view: Option<View>,
}

/// Results of a hit test.
#[derive(Clone, Debug)]
pub struct Hit {
    /// The matched view.
    pub view: ViewId,
    /// Path from root to view (inclusive).
    pub path: Vec<ViewId>,
    /// The queried point in the matched view's local space.
    pub local_point: Point,
}

/// Filters applied during hit testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryFilter {
    /// If true, skip views (and their subtrees) not marked [`ViewFlags::VISIBLE`].
    pub visible_only: bool,
    /// If true, only report views marked [`ViewFlags::PICKABLE`].
    pub pickable_only: bool,
}

/// Retained tree of views.
///
/// Children are painted after their parent, ordered by z-index and then by the order in
/// which they were attached. All geometry queries except [`Scene::world_bounds`] read the
/// live local state; [`Scene::commit`] caches world bounds and reports damage.
pub struct Scene {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
    epoch: u64,
    removed: Vec<Rect>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("views_total", &self.slots.len())
            .field("views_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
            removed: Vec::new(),
        }
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.view.is_some()).count()
    }

    /// Returns `true` if the scene holds no live views.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a new view as the top-most child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the view as a root.
    pub fn insert(&mut self, parent: Option<ViewId>, local: LocalView) -> ViewId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation += 1;
            slot.view = Some(View::new(local));
            idx
        } else {
            self.slots.push(Slot {
                generation: 1,
                view: Some(View::new(local)),
            });
            self.slots.len() - 1
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ViewId uses 32-bit indices by design."
        )]
        let id = ViewId::new(idx as u32, self.slots[idx].generation);
        if let Some(p) = parent.filter(|p| self.is_alive(*p)) {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a view and its subtree from the scene.
    pub fn remove(&mut self, id: ViewId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.view(id).parent {
            self.unlink_parent(id, parent);
        }
        self.free_subtree(id);
    }

    /// Detach a view from its parent, keeping it (and its subtree) alive as a root.
    pub fn detach(&mut self, id: ViewId) {
        self.reparent(id, None);
    }

    /// Reparent `id` under `new_parent` as its top-most child, keeping local values.
    ///
    /// Requests that would create a cycle, or that name a stale view, are ignored.
    pub fn reparent(&mut self, id: ViewId, new_parent: Option<ViewId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) || self.is_ancestor_or_self(id, p) {
                return;
            }
        }
        if let Some(parent) = self.view(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Attach `id` as the top-most child of `parent`, keeping its world-space center.
    ///
    /// The view's center is rewritten into `parent`'s local space; its size and
    /// transform are kept. Mounting a view that is already a child of `parent` brings it
    /// to the front.
    pub fn mount(&mut self, id: ViewId, parent: ViewId) {
        if !self.is_alive(id) || !self.is_alive(parent) || self.is_ancestor_or_self(id, parent) {
            return;
        }
        let world_center = self.parent_transform(id) * self.view(id).local.center;
        self.reparent(id, Some(parent));
        let to_parent = self.world_transform_of(parent);
        if to_parent.determinant() != 0.0 {
            self.set_center(id, to_parent.inverse() * world_center);
        }
    }

    /// Update the size of a view's bounds.
    pub fn set_size(&mut self, id: ViewId, size: Size) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.size = size;
        }
    }

    /// Update the center of a view in its parent's space.
    pub fn set_center(&mut self, id: ViewId, center: Point) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.center = center;
        }
    }

    /// Update the transform applied around a view's center.
    pub fn set_transform(&mut self, id: ViewId, transform: Affine) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.transform = transform;
        }
    }

    /// Update opacity, clamped to `0.0..=1.0`.
    pub fn set_opacity(&mut self, id: ViewId, opacity: f64) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.opacity = opacity.clamp(0.0, 1.0);
            self.mark_subtree_paint(id);
        }
    }

    /// Update fill.
    pub fn set_fill(&mut self, id: ViewId, fill: Option<Color>) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.fill = fill;
            view.paint_dirty = true;
        }
    }

    /// Update shape.
    pub fn set_shape(&mut self, id: ViewId, shape: ViewShape) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.shape = shape;
            view.paint_dirty = true;
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: ViewId, z: i32) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.z_index = z;
            self.mark_subtree_paint(id);
        }
    }

    /// Update flags.
    pub fn set_flags(&mut self, id: ViewId, flags: ViewFlags) {
        if let Some(view) = self.view_opt_mut(id) {
            view.local.flags = flags;
            self.mark_subtree_paint(id);
        }
    }

    /// Returns `true` if `id` refers to a live view.
    pub fn is_alive(&self, id: ViewId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|s| s.generation == id.1 && s.view.is_some())
    }

    /// Returns `true` if `id` is `ancestor` or lies in its subtree.
    ///
    /// Stale handles are never related.
    pub fn is_ancestor_or_self(&self, ancestor: ViewId, mut id: ViewId) -> bool {
        if !self.is_alive(ancestor) || !self.is_alive(id) {
            return false;
        }
        loop {
            if id == ancestor {
                return true;
            }
            match self.view(id).parent {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    /// Local state of a view.
    pub fn local(&self, id: ViewId) -> Option<&LocalView> {
        self.view_opt(id).map(|v| &v.local)
    }

    /// Parent of a view, if it has one.
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.view_opt(id)?.parent
    }

    /// Children of a view in attachment order. Empty for stale handles.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        match self.view_opt(id) {
            Some(view) => &view.children,
            None => &[],
        }
    }

    /// Axis-aligned box of a view's transformed bounds, in its parent's space.
    pub fn frame(&self, id: ViewId) -> Option<Rect> {
        let local = self.local(id)?;
        Some(local.placement().transform_rect_bbox(local.bounds()))
    }

    /// Corner radius of a view's outline, derived from its current size.
    pub fn corner_radius(&self, id: ViewId) -> Option<f64> {
        let local = self.local(id)?;
        Some(local.shape.corner_radius(local.size))
    }

    /// Outline of a view in its own local space, derived from its current size.
    pub fn outline(&self, id: ViewId) -> Option<RoundedRect> {
        let local = self.local(id)?;
        Some(local.shape.outline(local.bounds()))
    }

    /// Transform from a view's local space to world space, computed from live state.
    pub fn world_transform(&self, id: ViewId) -> Option<Affine> {
        self.is_alive(id).then(|| self.world_transform_of(id))
    }

    /// Convert `pt` from the local space of `from` into the local space of `to`.
    ///
    /// Returns `None` for stale handles or when `to` has a singular transform.
    pub fn convert_point(&self, pt: Point, from: ViewId, to: ViewId) -> Option<Point> {
        let world = self.world_transform(from)? * pt;
        let to_world = self.world_transform(to)?;
        (to_world.determinant() != 0.0).then(|| to_world.inverse() * world)
    }

    /// Opacity of a view multiplied by the opacity of all its ancestors.
    pub fn effective_opacity(&self, id: ViewId) -> Option<f64> {
        let mut view = self.view_opt(id)?;
        let mut opacity = view.local.opacity;
        while let Some(p) = view.parent {
            view = self.view(p);
            opacity *= view.local.opacity;
        }
        Some(opacity)
    }

    /// World-space bounds cached by the last [`Scene::commit`].
    pub fn world_bounds(&self, id: ViewId) -> Option<Rect> {
        let view = self.view_opt(id)?;
        view.world.committed.then_some(view.world.world_bounds)
    }

    /// Local-to-world transform cached by the last [`Scene::commit`].
    ///
    /// Unlike [`Scene::world_transform`] this does not see edits made since that commit.
    pub fn committed_transform(&self, id: ViewId) -> Option<Affine> {
        let view = self.view_opt(id)?;
        view.world.committed.then_some(view.world.world_transform)
    }

    /// Visible views in paint order (back to front).
    pub fn paint_order(&self) -> Vec<ViewId> {
        let mut out = Vec::new();
        for root in self.sorted(self.roots()) {
            self.collect_painted(root, &mut out);
        }
        out
    }

    /// Returns the top-most view at a world-space point.
    ///
    /// Views are matched against their [outline](Scene::outline), so circles only hit
    /// inside the circle. Descendants of a view with [`ViewFlags::CLIPS_CHILDREN`] only
    /// hit inside that view's outline. Honors [`QueryFilter`].
    pub fn hit_test_point(&self, pt: Point, filter: QueryFilter) -> Option<Hit> {
        let mut best = None;
        for root in self.sorted(self.roots()) {
            self.hit_recursive(root, Affine::IDENTITY, pt, filter, &mut best);
        }
        best.map(|(view, local_point)| Hit {
            view,
            path: self.path_to_root(view),
            local_point,
        })
    }

    /// Commit pending changes, updating world-space caches and returning coarse damage.
    ///
    /// Damage holds the old and new world bounds of every view whose bounds moved, the
    /// bounds of views removed since the last commit, and the bounds of views whose paint
    /// state (opacity, fill, shape, z-order, flags) changed.
    pub fn commit(&mut self) -> Damage {
        self.epoch = self.epoch.wrapping_add(1);
        let mut damage = Damage::default();
        for rect in self.removed.drain(..) {
            damage.push(rect);
        }
        for root in self.roots() {
            self.update_world_recursive(root, Affine::IDENTITY, None, &mut damage);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(
            epoch = self.epoch,
            dirty_rects = damage.dirty_rects.len(),
            "scene commit"
        );
        damage
    }

    // --- internals ---

    fn view(&self, id: ViewId) -> &View {
        self.slots[id.idx()].view.as_ref().expect("dangling ViewId")
    }

    fn view_mut(&mut self, id: ViewId) -> &mut View {
        self.slots[id.idx()].view.as_mut().expect("dangling ViewId")
    }

    fn view_opt(&self, id: ViewId) -> Option<&View> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.view.as_ref()
    }

    fn view_opt_mut(&mut self, id: ViewId) -> Option<&mut View> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.view.as_mut()
    }

    fn roots(&self) -> Vec<ViewId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match &s.view {
                Some(v) if v.parent.is_none() =>
                {
                    #[allow(
                        clippy::cast_possible_truncation,
                        reason = "ViewId uses 32-bit indices by design."
                    )]
                    Some(ViewId::new(i as u32, s.generation))
                }
                _ => None,
            })
            .collect()
    }

    fn sorted(&self, mut ids: Vec<ViewId>) -> Vec<ViewId> {
        ids.sort_by_key(|id| self.view(*id).local.z_index);
        ids
    }

    fn link_parent(&mut self, id: ViewId, parent: ViewId) {
        self.view_mut(parent).children.push(id);
        self.view_mut(id).parent = Some(parent);
        self.mark_subtree_paint(id);
    }

    fn unlink_parent(&mut self, id: ViewId, parent: ViewId) {
        self.view_mut(parent).children.retain(|c| *c != id);
        self.view_mut(id).parent = None;
    }

    fn free_subtree(&mut self, id: ViewId) {
        let Some(view) = self.slots[id.idx()].view.take() else {
            return;
        };
        if view.world.committed {
            self.removed.push(view.world.world_bounds);
        }
        self.free_list.push(id.idx());
        for child in view.children {
            self.free_subtree(child);
        }
    }

    fn mark_subtree_paint(&mut self, id: ViewId) {
        let children = {
            let view = self.view_mut(id);
            view.paint_dirty = true;
            view.children.clone()
        };
        for c in children {
            self.mark_subtree_paint(c);
        }
    }

    fn world_transform_of(&self, id: ViewId) -> Affine {
        let mut tf = Affine::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let view = self.view(c);
            tf = view.local.placement() * tf;
            cur = view.parent;
        }
        tf
    }

    fn parent_transform(&self, id: ViewId) -> Affine {
        self.view(id)
            .parent
            .map_or(Affine::IDENTITY, |p| self.world_transform_of(p))
    }

    fn path_to_root(&self, mut id: ViewId) -> Vec<ViewId> {
        let mut out = Vec::new();
        loop {
            out.push(id);
            match self.view(id).parent {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    fn collect_painted(&self, id: ViewId, out: &mut Vec<ViewId>) {
        let view = self.view(id);
        if !view.local.flags.contains(ViewFlags::VISIBLE) {
            return;
        }
        out.push(id);
        for child in self.sorted(view.children.clone()) {
            self.collect_painted(child, out);
        }
    }

    fn hit_recursive(
        &self,
        id: ViewId,
        parent_tf: Affine,
        pt: Point,
        filter: QueryFilter,
        best: &mut Option<(ViewId, Point)>,
    ) {
        let view = self.view(id);
        let flags = view.local.flags;
        if filter.visible_only && !flags.contains(ViewFlags::VISIBLE) {
            return;
        }
        let tf = parent_tf * view.local.placement();
        if tf.determinant() == 0.0 {
            return;
        }
        let local_pt = tf.inverse() * pt;
        let inside = view.local.shape.outline(view.local.bounds()).contains(local_pt);
        if flags.contains(ViewFlags::CLIPS_CHILDREN) && !inside {
            return;
        }
        if inside && (!filter.pickable_only || flags.contains(ViewFlags::PICKABLE)) {
            *best = Some((id, local_pt));
        }
        for child in self.sorted(view.children.clone()) {
            self.hit_recursive(child, tf, pt, filter, best);
        }
    }

    fn update_world_recursive(
        &mut self,
        id: ViewId,
        parent_tf: Affine,
        parent_clip: Option<Rect>,
        damage: &mut Damage,
    ) {
        let (child_ids, world_transform, child_clip) = {
            let view = self.view_mut(id);
            let old = view.world.clone();
            let world_transform = parent_tf * view.local.placement();
            let mut world_bounds = world_transform.transform_rect_bbox(view.local.bounds());
            if let Some(c) = parent_clip {
                world_bounds = world_bounds.intersect(c);
            }
            let child_clip = if view.local.flags.contains(ViewFlags::CLIPS_CHILDREN) {
                Some(world_bounds)
            } else {
                parent_clip
            };

            if !old.committed || old.world_bounds != world_bounds {
                if old.committed {
                    damage.push(old.world_bounds);
                }
                damage.push(world_bounds);
            } else if view.paint_dirty {
                damage.push(world_bounds);
            }

            view.world = WorldView {
                world_transform,
                world_bounds,
                committed: true,
            };
            view.paint_dirty = false;
            (view.children.clone(), world_transform, child_clip)
        };

        for child in child_ids {
            self.update_world_recursive(child, world_transform, child_clip, damage);
        }
    }
}
