// Scene configuration defaults and validation.

use xr_core::*;

#[test]
fn defaults_match_demo_layout() {
    let c = SceneConfig::default();
    assert!(c.validate().is_ok());
    assert_eq!(c.panel_position, glam::Vec3::new(0.0, 1.6, -2.0));
    assert_eq!((c.panel_width, c.panel_height), (1.6, 0.9));
    assert_eq!((c.buffer_width, c.buffer_height), (320, 180));
    assert_eq!(c.marker_radius, 5.0);
    assert_eq!(c.highlight_darken, 0.8);
    assert!((c.highlight_emissive.x - 0.4).abs() < 1e-6);
}

#[test]
fn invalid_configs_are_rejected() {
    let bad = [
        SceneConfig {
            panel_width: 0.0,
            ..Default::default()
        },
        SceneConfig {
            buffer_height: 0,
            ..Default::default()
        },
        SceneConfig {
            highlight_darken: 1.5,
            ..Default::default()
        },
        SceneConfig {
            zfar: 0.05,
            ..Default::default()
        },
    ];
    for cfg in bad {
        assert!(matches!(cfg.validate(), Err(XrError::InvalidConfig(_))));
        assert!(InteractionContext::new(cfg).is_err());
    }
}

#[test]
fn preview_camera_looks_at_panel() {
    let c = SceneConfig::default();
    let view_proj = c.preview_projection(16.0 / 9.0) * c.preview_view();
    let clip = view_proj * c.panel_position.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-4);
    assert!(ndc.y.abs() < 1e-4);
    assert!(ndc.z > -1.0 && ndc.z < 1.0);
}
