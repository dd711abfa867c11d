// Highlight materials and the single-slot highlight controller.

use glam::Vec3;
use xr_core::*;

fn tint() -> Vec3 {
    Vec3::splat(0x66 as f32 / 255.0)
}

/// Scene with `n` stacked quads so each one can be hit independently.
fn scene_with(n: usize) -> (Scene, Vec<TargetId>) {
    let mut scene = Scene::new();
    let ids = (0..n)
        .map(|i| {
            let material = if i % 2 == 0 {
                Material::Emissive(EmissiveCapable::new(Vec3::new(0.2, 0.4, 0.6), tint()))
            } else {
                Material::ColorOnly(ColorOnly::new(Vec3::new(0.9, 0.5, 0.3), 0.8))
            };
            scene.add(Quad::new(Vec3::new(i as f32 * 2.0, 0.0, -2.0), 1.0, 1.0), material)
        })
        .collect();
    (scene, ids)
}

#[test]
fn emissive_round_trip_restores_black() {
    let mut m = EmissiveCapable::new(Vec3::ONE, tint());
    m.apply_highlight();
    assert_eq!(m.emissive, tint());
    assert!(m.is_highlighted());
    m.revert_highlight();
    assert_eq!(m.emissive, Vec3::ZERO);
    assert!(!m.is_highlighted());
}

#[test]
fn color_only_round_trip_is_exact() {
    let original = Vec3::new(0.37, 0.61, 0.93);
    let mut m = ColorOnly::new(original, 0.8);
    m.apply_highlight();
    assert!((m.color - original * 0.8).length() < 1e-6);
    m.revert_highlight();
    assert_eq!(m.color, original);
}

#[test]
fn color_only_does_not_drift_over_many_cycles() {
    let original = Vec3::new(0.1, 0.7, 0.33);
    let mut m = ColorOnly::new(original, 0.8);
    for _ in 0..10_000 {
        m.apply_highlight();
        m.revert_highlight();
    }
    assert_eq!(m.color, original);
}

#[test]
fn repeated_apply_darkens_once() {
    let mut m = ColorOnly::new(Vec3::ONE, 0.8);
    m.apply_highlight();
    m.apply_highlight();
    assert!((m.color - Vec3::splat(0.8)).length() < 1e-6);
    m.revert_highlight();
    assert_eq!(m.color, Vec3::ONE);
}

#[test]
fn revert_without_highlight_is_noop() {
    let mut emissive = EmissiveCapable::new(Vec3::ONE, tint());
    emissive.emissive = Vec3::new(0.1, 0.0, 0.0);
    emissive.revert_highlight();
    assert_eq!(emissive.emissive, Vec3::new(0.1, 0.0, 0.0));

    let (mut scene, _) = scene_with(2);
    let before: Vec<Material> = scene.iter().map(|t| t.material.clone()).collect();
    let mut hc = HighlightController::new();
    hc.clear(&mut scene);
    hc.clear(&mut scene);
    assert_eq!(hc.current(), None);
    let after: Vec<Material> = scene.iter().map(|t| t.material.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn first_controller_takes_priority() {
    let (mut scene, ids) = scene_with(2);
    let (x, y) = (ids[0], ids[1]);
    let mut hc = HighlightController::new();

    hc.update(&[Some(x), Some(y)], &mut scene);
    assert_eq!(hc.current(), Some(x));
    assert!(scene.get(x).unwrap().material.is_highlighted());
    assert!(!scene.get(y).unwrap().material.is_highlighted());

    // Still both hit: nothing changes
    hc.update(&[Some(x), Some(y)], &mut scene);
    assert_eq!(hc.current(), Some(x));

    // A stops hitting X: cleared, then B claims Y in the same frame
    hc.update(&[None, Some(y)], &mut scene);
    assert_eq!(hc.current(), Some(y));
    assert!(!scene.get(x).unwrap().material.is_highlighted());
    assert!(scene.get(y).unwrap().material.is_highlighted());
}

#[test]
fn first_controller_does_not_steal_existing_highlight() {
    let (mut scene, ids) = scene_with(2);
    let (x, y) = (ids[0], ids[1]);
    let mut hc = HighlightController::new();
    hc.update(&[None, Some(y)], &mut scene);
    assert_eq!(hc.current(), Some(y));
    hc.update(&[Some(x), Some(y)], &mut scene);
    assert_eq!(hc.current(), Some(y));
    assert_eq!(scene.highlighted_count(), 1);
}

#[test]
fn nothing_hit_clears_highlight() {
    let (mut scene, ids) = scene_with(1);
    let mut hc = HighlightController::new();
    hc.update(&[Some(ids[0]), None], &mut scene);
    hc.update(&[None, None], &mut scene);
    assert_eq!(hc.current(), None);
    assert_eq!(scene.highlighted_count(), 0);
    match &scene.get(ids[0]).unwrap().material {
        Material::Emissive(m) => assert_eq!(m.emissive, Vec3::ZERO),
        other => panic!("unexpected material {:?}", other),
    }
}

#[test]
fn unknown_target_is_ignored() {
    let (mut scene, _) = scene_with(1);
    let mut hc = HighlightController::new();
    hc.update(&[Some(TargetId(99))], &mut scene);
    assert_eq!(hc.current(), None);
}

#[test]
fn at_most_one_highlight_across_many_controllers() {
    let (mut scene, ids) = scene_with(4);
    let mut hc = HighlightController::new();
    // small LCG so the sequence is reproducible
    let mut state: u32 = 12345;
    let mut next = || {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (state >> 16) as usize
    };
    for _ in 0..500 {
        let hits: Vec<Option<TargetId>> = (0..5)
            .map(|_| {
                let r = next() % (ids.len() + 1);
                ids.get(r).copied()
            })
            .collect();
        hc.update(&hits, &mut scene);
        assert!(scene.highlighted_count() <= 1);
        match hc.current() {
            Some(id) => assert!(scene.get(id).unwrap().material.is_highlighted()),
            None => assert_eq!(scene.highlighted_count(), 0),
        }
    }
}
