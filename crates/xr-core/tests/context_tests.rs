// End-to-end frame/press/release behavior of the interaction context.

use glam::{Quat, Vec2, Vec3};
use xr_core::*;

const LEFT: ControllerId = ControllerId(0);
const RIGHT: ControllerId = ControllerId(1);
const RED: [u8; 4] = [0xff, 0x00, 0x00, 0xff];

fn ctx() -> InteractionContext {
    InteractionContext::new(SceneConfig::default()).expect("default config is valid")
}

/// Pose in front of the panel aimed at panel-local `(x, y)`.
fn aim_at(x: f32, y: f32) -> ControllerPose {
    ControllerPose::new(Vec3::new(x, 1.6 + y, 0.0), Quat::IDENTITY)
}

fn away() -> ControllerPose {
    ControllerPose::new(Vec3::new(0.0, 1.6, 0.0), Quat::from_rotation_y(std::f32::consts::PI))
}

fn panel_color(c: &InteractionContext) -> Vec3 {
    c.scene().get(c.panel().target).unwrap().material.base_color()
}

#[test]
fn starts_idle_with_two_controllers() {
    let c = ctx();
    assert!(!c.is_session_active());
    assert_eq!(c.controllers().len(), 2);
    assert!(c.controller(LEFT).unwrap().is_designated());
    assert!(!c.controller(RIGHT).unwrap().is_designated());
    assert_eq!(c.highlighted(), None);
    assert_eq!(c.panel().buffer.width(), 320);
    assert_eq!(c.panel().buffer.height(), 180);
}

#[test]
fn press_outside_session_does_nothing() {
    let mut c = ctx();
    c.panel_mut().buffer.take_dirty();
    let input = FrameInput::new().with(LEFT, aim_at(0.0, 0.0));
    assert_eq!(c.on_press(LEFT, &input), PressOutcome::Ignored);
    assert!(!c.panel().buffer.is_dirty());
    assert_eq!(c.panel().buffer.pixel(160, 90), Some(xr_core::panel::WHITE));
    let left = c.controller(LEFT).unwrap();
    assert_eq!(left.state, InteractionState::Inactive);
    assert!(!left.ray.is_active());
    assert!(!c.on_release(LEFT));
}

#[test]
fn frame_outside_session_reports_nothing() {
    let mut c = ctx();
    let input = FrameInput::new().with(LEFT, aim_at(0.0, 0.0));
    let report = c.on_frame(&input);
    assert!(report.hits.is_empty());
    assert_eq!(report.highlighted, None);
    assert_eq!(panel_color(&c), Vec3::ONE);
}

#[test]
fn press_at_panel_center_paints_center_pixel() {
    let mut c = ctx();
    c.start_session();
    let input = FrameInput::new().with(LEFT, aim_at(0.0, 0.0));
    match c.on_press(LEFT, &input) {
        PressOutcome::Painted { point, pixel } => {
            assert!((point - Vec3::new(0.0, 1.6, -2.0)).length() < 1e-4);
            assert!((pixel - Vec2::new(160.0, 90.0)).length() < 1e-3);
        }
        other => panic!("expected paint, got {:?}", other),
    }
    assert_eq!(c.panel().buffer.pixel(160, 90), Some(RED));
    assert!(c.panel().buffer.is_dirty());
}

#[test]
fn secondary_press_paints_without_ray_toggle() {
    let mut c = ctx();
    c.start_session();
    let input = FrameInput::new().with(RIGHT, aim_at(0.4, 0.2));
    assert!(matches!(c.on_press(RIGHT, &input), PressOutcome::Painted { .. }));
    let right = c.controller(RIGHT).unwrap();
    assert_eq!(right.state, InteractionState::Active);
    assert!(!right.ray.is_active());
    assert!(!right.ray.overlay_visible());
    assert!(c.on_release(RIGHT));
    assert_eq!(c.controller(RIGHT).unwrap().state, InteractionState::Inactive);
}

#[test]
fn designated_press_release_toggles_only_its_ray() {
    let mut c = ctx();
    c.start_session();
    let input = FrameInput::new()
        .with(LEFT, away())
        .with(RIGHT, away());

    assert_eq!(c.on_press(LEFT, &input), PressOutcome::Missed);
    let left = c.controller(LEFT).unwrap();
    assert!(left.ray.is_active());
    assert!(left.ray.overlay_visible());
    assert_eq!(left.ray.color(), Vec3::new(1.0, 0.0, 0.0));
    assert!(!c.controller(RIGHT).unwrap().ray.is_active());

    assert!(c.on_release(LEFT));
    let left = c.controller(LEFT).unwrap();
    assert!(!left.ray.is_active());
    assert_eq!(left.ray.color(), Vec3::ONE);
    assert!(!c.controller(RIGHT).unwrap().ray.is_active());
}

#[test]
fn trigger_state_is_independent_of_hover() {
    let mut c = ctx();
    c.start_session();
    let aimed = FrameInput::new().with(LEFT, aim_at(0.0, 0.0));
    c.on_press(LEFT, &aimed);
    // ray leaves the panel while the trigger is held
    let moved = FrameInput::new().with(LEFT, away());
    c.on_frame(&moved);
    assert!(c.controller(LEFT).unwrap().ray.is_active());
    assert_eq!(c.highlighted(), None);
}

#[test]
fn press_without_pose_misses() {
    let mut c = ctx();
    c.start_session();
    assert_eq!(c.on_press(LEFT, &FrameInput::new()), PressOutcome::Missed);
}

#[test]
fn hover_highlights_panel_and_reverts_exactly() {
    let mut c = ctx();
    c.start_session();
    let report = c.on_frame(&FrameInput::new().with(LEFT, aim_at(0.1, 0.1)));
    assert_eq!(report.highlighted, Some(c.panel().target));
    assert!((panel_color(&c) - Vec3::splat(0.8)).length() < 1e-6);

    // stays darkened once, however many frames it is hovered
    for _ in 0..10 {
        c.on_frame(&FrameInput::new().with(LEFT, aim_at(0.1, 0.1)));
    }
    assert!((panel_color(&c) - Vec3::splat(0.8)).length() < 1e-6);

    let report = c.on_frame(&FrameInput::new().with(LEFT, away()));
    assert_eq!(report.highlighted, None);
    assert_eq!(panel_color(&c), Vec3::ONE);
}

#[test]
fn second_controller_highlights_when_first_misses() {
    let mut c = ctx();
    c.start_session();
    let input = FrameInput::new().with(LEFT, away()).with(RIGHT, aim_at(0.0, 0.0));
    let report = c.on_frame(&input);
    assert_eq!(report.highlighted, Some(c.panel().target));
    assert_eq!(report.hits.len(), 2);
    assert!(report.hits[0].1.is_none());
    assert!(report.hits[1].1.is_some());
}

#[test]
fn first_controller_wins_between_two_objects() {
    let mut c = ctx();
    let y = c.scene_mut().add(
        Quad::new(Vec3::new(3.0, 1.6, -2.0), 1.0, 1.0),
        Material::Emissive(EmissiveCapable::new(Vec3::ONE, Vec3::splat(0.4))),
    );
    let x = c.panel().target;
    c.start_session();
    let both = FrameInput::new()
        .with(LEFT, aim_at(0.0, 0.0))
        .with(RIGHT, ControllerPose::new(Vec3::new(3.0, 1.6, 0.0), Quat::IDENTITY));
    assert_eq!(c.on_frame(&both).highlighted, Some(x));
    assert_eq!(c.scene().highlighted_count(), 1);

    let only_b = FrameInput::new()
        .with(LEFT, away())
        .with(RIGHT, ControllerPose::new(Vec3::new(3.0, 1.6, 0.0), Quat::IDENTITY));
    assert_eq!(c.on_frame(&only_b).highlighted, Some(y));
    assert_eq!(c.scene().highlighted_count(), 1);
    assert_eq!(panel_color(&c), Vec3::ONE);
}

#[test]
fn press_only_paints_panel() {
    let mut c = ctx();
    c.scene_mut().add(
        Quad::new(Vec3::new(3.0, 1.6, -2.0), 1.0, 1.0),
        Material::Emissive(EmissiveCapable::new(Vec3::ONE, Vec3::splat(0.4))),
    );
    c.start_session();
    c.panel_mut().buffer.take_dirty();
    let input = FrameInput::new().with(LEFT, ControllerPose::new(Vec3::new(3.0, 1.6, 0.0), Quat::IDENTITY));
    assert_eq!(c.on_press(LEFT, &input), PressOutcome::Missed);
    assert!(!c.panel().buffer.is_dirty());
}

#[test]
fn ending_session_resets_everything() {
    let mut c = ctx();
    c.start_session();
    let input = FrameInput::new().with(LEFT, aim_at(0.0, 0.0));
    c.on_frame(&input);
    c.on_press(LEFT, &input);
    assert!(c.highlighted().is_some());

    c.end_session();
    assert!(!c.is_session_active());
    assert_eq!(c.highlighted(), None);
    assert_eq!(panel_color(&c), Vec3::ONE);
    assert!(!c.controller(LEFT).unwrap().ray.is_active());
    assert_eq!(c.controller(LEFT).unwrap().state, InteractionState::Inactive);
    // marks survive the session
    assert_eq!(c.panel().buffer.pixel(160, 90), Some(RED));
}

#[test]
fn highlight_invariant_with_extra_controllers() {
    let mut c = ctx();
    c.start_session();
    let extra = c.assign_slot(Handedness::None, 0);
    assert_eq!(extra, ControllerId(2));
    assert_eq!(c.controllers().len(), 3);
    let input = FrameInput::new()
        .with(LEFT, aim_at(0.0, 0.0))
        .with(RIGHT, aim_at(0.2, 0.0))
        .with(extra, aim_at(-0.2, 0.0));
    let report = c.on_frame(&input);
    assert_eq!(report.hits.len(), 3);
    assert_eq!(c.scene().highlighted_count(), 1);
}

#[test]
fn slots_follow_handedness() {
    let mut c = ctx();
    assert_eq!(c.assign_slot(Handedness::Left, 1), LEFT);
    assert_eq!(c.assign_slot(Handedness::Right, 0), RIGHT);
    assert_eq!(c.controllers().len(), 2);
    assert_eq!(c.controller(LEFT).unwrap().role, ControllerRole::Designated);
    assert_eq!(c.controller(RIGHT).unwrap().role, ControllerRole::Secondary);
}

#[test]
fn press_from_unknown_controller_registers_it() {
    let mut c = ctx();
    c.start_session();
    let id = ControllerId(5);
    let input = FrameInput::new().with(id, aim_at(0.0, 0.0));
    assert!(matches!(c.on_press(id, &input), PressOutcome::Painted { .. }));
    let ctrl = c.controller(id).unwrap();
    assert_eq!(ctrl.role, ControllerRole::Secondary);
    assert!(!ctrl.ray.is_active());
}

#[test]
fn frame_input_replaces_duplicate_pose() {
    let mut input = FrameInput::new();
    input.push(LEFT, aim_at(0.0, 0.0));
    input.push(LEFT, away());
    assert_eq!(input.pose(LEFT), Some(&away()));
    input.clear();
    assert_eq!(input.pose(LEFT), None);
}

#[test]
fn degenerate_pose_neither_highlights_nor_paints() {
    let mut c = ctx();
    c.start_session();
    let broken = ControllerPose::new(Vec3::new(0.0, 1.6, 0.0), Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
    let input = FrameInput::new().with(LEFT, broken);
    let report = c.on_frame(&input);
    assert_eq!(report.highlighted, None);
    assert_eq!(c.highlighted(), None);
    assert_eq!(c.on_press(LEFT, &input), PressOutcome::Missed);
    assert_ne!(c.panel().buffer.pixel(160, 90), Some(RED));
}
