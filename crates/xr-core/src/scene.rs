//! Intersectable objects owned by the interaction context.

use fnv::FnvHashMap;

use crate::highlight::{HighlightTargets, Highlightable, Material};
use crate::pose::Ray;
use crate::raycast::{Intersectable, Quad, QuadHit, TargetId};

#[derive(Clone, Debug)]
pub struct Target {
    pub id: TargetId,
    pub quad: Quad,
    pub material: Material,
    pub visible: bool,
}

impl Intersectable for Target {
    fn target_id(&self) -> TargetId {
        self.id
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<QuadHit> {
        if !self.visible {
            return None;
        }
        self.quad.intersect(ray)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    targets: Vec<Target>,
    index: FnvHashMap<TargetId, usize>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, quad: Quad, material: Material) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.index.insert(id, self.targets.len());
        self.targets.push(Target {
            id,
            quad,
            material,
            visible: true,
        });
        id
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.index.get(&id).map(|&i| &self.targets[i])
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.index.get(&id).map(|&i| &mut self.targets[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Number of targets currently showing highlight appearance.
    pub fn highlighted_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| t.material.is_highlighted())
            .count()
    }
}

impl HighlightTargets for Scene {
    fn surface_mut(&mut self, id: TargetId) -> Option<&mut dyn Highlightable> {
        self.get_mut(id).map(|t| &mut t.material as &mut dyn Highlightable)
    }
}
