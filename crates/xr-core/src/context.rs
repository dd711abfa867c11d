//! Host-owned interaction state, driven once per frame and on select events.

use glam::{Vec2, Vec3};
use log::{debug, info};
use smallvec::SmallVec;

use crate::config::SceneConfig;
use crate::error::XrResult;
use crate::highlight::{ColorOnly, HighlightController, Material};
use crate::interaction::Controller;
use crate::painter::HitPainter;
use crate::panel::{Panel, PixelBuffer, WHITE};
use crate::pose::{ControllerId, ControllerPose, Handedness};
use crate::raycast::{intersect, Intersection, Quad, TargetId};
use crate::scene::Scene;

/// Controller poses sampled for the current frame, in controller order.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    poses: SmallVec<[(ControllerId, ControllerPose); 2]>,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: ControllerId, pose: ControllerPose) -> Self {
        self.push(id, pose);
        self
    }

    pub fn push(&mut self, id: ControllerId, pose: ControllerPose) {
        match self.poses.iter_mut().find(|(i, _)| *i == id) {
            Some(slot) => slot.1 = pose,
            None => self.poses.push((id, pose)),
        }
    }

    pub fn pose(&self, id: ControllerId) -> Option<&ControllerPose> {
        self.poses.iter().find(|(i, _)| *i == id).map(|(_, p)| p)
    }

    pub fn clear(&mut self) {
        self.poses.clear();
    }
}

/// What one frame update observed.
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    pub hits: SmallVec<[(ControllerId, Option<Intersection>); 2]>,
    pub highlighted: Option<TargetId>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PressOutcome {
    /// No immersive session; nothing happened.
    Ignored,
    /// Trigger state changed but the ray missed the panel.
    Missed,
    Painted { point: Vec3, pixel: Vec2 },
}

pub struct InteractionContext {
    config: SceneConfig,
    session_active: bool,
    controllers: SmallVec<[Controller; 2]>,
    scene: Scene,
    panel: Panel,
    highlight: HighlightController,
    painter: HitPainter,
}

impl InteractionContext {
    /// Build the scene with a single panel and the left/right controller slots.
    pub fn new(config: SceneConfig) -> XrResult<Self> {
        config.validate()?;
        let mut scene = Scene::new();
        let panel_target = scene.add(
            Quad::new(config.panel_position, config.panel_width, config.panel_height),
            Material::ColorOnly(ColorOnly::new(Vec3::ONE, config.highlight_darken)),
        );
        let panel = Panel::new(
            panel_target,
            config.panel_width,
            config.panel_height,
            PixelBuffer::new(config.buffer_width, config.buffer_height, WHITE),
        );
        let controllers = [Handedness::Left, Handedness::Right]
            .into_iter()
            .enumerate()
            .map(|(i, h)| Controller::new(ControllerId(i as u8), h, config.ray_length))
            .collect();
        let painter = HitPainter::new(config.marker_radius, config.marker_color);
        Ok(Self {
            config,
            session_active: false,
            controllers,
            scene,
            panel,
            highlight: HighlightController::new(),
            painter,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.id == id)
    }

    pub fn highlighted(&self) -> Option<TargetId> {
        self.highlight.current()
    }

    /// Slot for an input source: handed sources use their fixed slot,
    /// unhanded ones are placed after the handed slots by source index.
    pub fn assign_slot(&mut self, handedness: Handedness, source_index: usize) -> ControllerId {
        let id = handedness
            .preferred_slot()
            .unwrap_or(ControllerId((source_index + 2).min(u8::MAX as usize) as u8));
        self.ensure_controller(id, handedness);
        id
    }

    /// Register a controller slot the first time it is seen.
    pub fn ensure_controller(&mut self, id: ControllerId, handedness: Handedness) {
        if self.controllers.iter().any(|c| c.id == id) {
            return;
        }
        debug!("[context] new controller slot {} ({:?})", id.0, handedness);
        self.controllers
            .push(Controller::new(id, handedness, self.config.ray_length));
        self.controllers.sort_by_key(|c| c.id);
    }

    pub fn start_session(&mut self) {
        self.session_active = true;
        for c in &mut self.controllers {
            c.reset();
        }
        info!("VR session started");
    }

    pub fn end_session(&mut self) {
        self.highlight.clear(&mut self.scene);
        for c in &mut self.controllers {
            c.reset();
        }
        self.session_active = false;
        info!("VR session ended");
    }

    /// Nearest hit of a controller's ray against every scene target.
    pub fn intersect_controller(&self, id: ControllerId, input: &FrameInput) -> Option<Intersection> {
        let pose = input.pose(id)?;
        intersect(self.session_active, pose, self.scene.iter())
    }

    /// Nearest hit of a controller's ray against the panel only.
    pub fn intersect_panel(&self, id: ControllerId, input: &FrameInput) -> Option<Intersection> {
        let pose = input.pose(id)?;
        intersect(self.session_active, pose, self.scene.get(self.panel.target))
    }

    /// Per-frame hit testing and highlight update, in controller order.
    pub fn on_frame(&mut self, input: &FrameInput) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.session_active {
            return report;
        }
        let mut order: SmallVec<[Option<TargetId>; 2]> = SmallVec::new();
        for c in &self.controllers {
            let hit = self.intersect_controller(c.id, input);
            order.push(hit.map(|h| h.target));
            report.hits.push((c.id, hit));
        }
        self.highlight.update(&order, &mut self.scene);
        report.highlighted = self.highlight.current();
        report
    }

    /// `selectstart`: toggle trigger state, then paint if the ray hits the panel.
    pub fn on_press(&mut self, id: ControllerId, input: &FrameInput) -> PressOutcome {
        if !self.session_active {
            return PressOutcome::Ignored;
        }
        self.ensure_controller(id, Handedness::None);
        if let Some(c) = self.controllers.iter_mut().find(|c| c.id == id) {
            c.select_start();
        }
        match self.intersect_panel(id, input) {
            Some(hit) => {
                info!(
                    "Canvas panel clicked at: ({:.3}, {:.3}, {:.3})",
                    hit.point.x, hit.point.y, hit.point.z
                );
                let pixel = self.painter.paint(&mut self.panel, hit.local);
                PressOutcome::Painted {
                    point: hit.point,
                    pixel,
                }
            }
            None => PressOutcome::Missed,
        }
    }

    /// `selectend`: release the trigger. Returns false outside a session.
    pub fn on_release(&mut self, id: ControllerId) -> bool {
        if !self.session_active {
            return false;
        }
        match self.controllers.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.select_end();
                true
            }
            None => false,
        }
    }
}
