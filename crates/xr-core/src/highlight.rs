//! Hover highlighting: material capability and the single global highlight slot.

use glam::Vec3;
use log::debug;

use crate::raycast::TargetId;

/// A surface whose appearance can be toggled to show it is under a ray.
///
/// `apply_highlight` and `revert_highlight` are both idempotent.
pub trait Highlightable {
    fn apply_highlight(&mut self);
    fn revert_highlight(&mut self);
    fn is_highlighted(&self) -> bool;
}

/// Material with an emissive channel: highlight sets a fixed tint, revert clears to black.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissiveCapable {
    pub color: Vec3,
    pub emissive: Vec3,
    pub tint: Vec3,
    highlighted: bool,
}

impl EmissiveCapable {
    pub fn new(color: Vec3, tint: Vec3) -> Self {
        Self {
            color,
            emissive: Vec3::ZERO,
            tint,
            highlighted: false,
        }
    }
}

impl Highlightable for EmissiveCapable {
    fn apply_highlight(&mut self) {
        self.emissive = self.tint;
        self.highlighted = true;
    }

    fn revert_highlight(&mut self) {
        if self.highlighted {
            self.emissive = Vec3::ZERO;
            self.highlighted = false;
        }
    }

    fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// Material without emissive: highlight darkens the base color.
///
/// The pre-highlight color is stored and restored exactly, so repeated
/// highlight/revert cycles never drift.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorOnly {
    pub color: Vec3,
    pub darken: f32,
    saved: Option<Vec3>,
}

impl ColorOnly {
    pub fn new(color: Vec3, darken: f32) -> Self {
        Self {
            color,
            darken,
            saved: None,
        }
    }
}

impl Highlightable for ColorOnly {
    fn apply_highlight(&mut self) {
        if self.saved.is_none() {
            self.saved = Some(self.color);
            self.color *= self.darken;
        }
    }

    fn revert_highlight(&mut self) {
        if let Some(original) = self.saved.take() {
            self.color = original;
        }
    }

    fn is_highlighted(&self) -> bool {
        self.saved.is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    Emissive(EmissiveCapable),
    ColorOnly(ColorOnly),
}

impl Material {
    pub fn base_color(&self) -> Vec3 {
        match self {
            Material::Emissive(m) => m.color,
            Material::ColorOnly(m) => m.color,
        }
    }

    pub fn emissive(&self) -> Vec3 {
        match self {
            Material::Emissive(m) => m.emissive,
            Material::ColorOnly(_) => Vec3::ZERO,
        }
    }
}

impl Highlightable for Material {
    fn apply_highlight(&mut self) {
        match self {
            Material::Emissive(m) => m.apply_highlight(),
            Material::ColorOnly(m) => m.apply_highlight(),
        }
    }

    fn revert_highlight(&mut self) {
        match self {
            Material::Emissive(m) => m.revert_highlight(),
            Material::ColorOnly(m) => m.revert_highlight(),
        }
    }

    fn is_highlighted(&self) -> bool {
        match self {
            Material::Emissive(m) => m.is_highlighted(),
            Material::ColorOnly(m) => m.is_highlighted(),
        }
    }
}

/// Lookup of highlightable surfaces by id.
pub trait HighlightTargets {
    fn surface_mut(&mut self, id: TargetId) -> Option<&mut dyn Highlightable>;
}

/// Tracks the one object, across all controllers, that is currently highlighted.
#[derive(Clone, Debug, Default)]
pub struct HighlightController {
    current: Option<TargetId>,
}

impl HighlightController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<TargetId> {
        self.current
    }

    /// Per-frame update. `hits` holds each controller's hit target in frame
    /// order. The first controller claims the slot when it is free and clears
    /// it when it hits nothing; later controllers only claim a free slot.
    pub fn update<T: HighlightTargets + ?Sized>(&mut self, hits: &[Option<TargetId>], targets: &mut T) {
        let Some((first, rest)) = hits.split_first() else {
            return;
        };
        match first {
            Some(id) => self.claim(*id, targets),
            None => self.clear(targets),
        }
        for hit in rest.iter().flatten() {
            self.claim(*hit, targets);
        }
    }

    /// Highlight `id` if nothing is highlighted yet.
    pub fn claim<T: HighlightTargets + ?Sized>(&mut self, id: TargetId, targets: &mut T) {
        if self.current.is_some() {
            return;
        }
        if let Some(surface) = targets.surface_mut(id) {
            surface.apply_highlight();
            self.current = Some(id);
            debug!("[highlight] on {:?}", id);
        }
    }

    /// Revert and forget the current highlight. No-op when nothing is highlighted.
    pub fn clear<T: HighlightTargets + ?Sized>(&mut self, targets: &mut T) {
        if let Some(id) = self.current.take() {
            if let Some(surface) = targets.surface_mut(id) {
                surface.revert_highlight();
            }
            debug!("[highlight] off {:?}", id);
        }
    }
}
