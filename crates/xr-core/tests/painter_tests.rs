// Panel pixel buffer and hit painting.

use glam::Vec2;
use xr_core::panel::WHITE;
use xr_core::*;

const RED: [u8; 4] = [0xff, 0x00, 0x00, 0xff];

fn panel() -> Panel {
    Panel::new(TargetId(0), 1.6, 0.9, PixelBuffer::new(320, 180, WHITE))
}

#[test]
fn center_maps_to_buffer_center() {
    let px = HitPainter::panel_to_pixel(&panel(), Vec2::ZERO);
    assert!((px - Vec2::new(160.0, 90.0)).length() < 1e-3);
}

#[test]
fn corners_map_to_buffer_corners() {
    let p = panel();
    let lo = HitPainter::panel_to_pixel(&p, Vec2::new(-0.8, -0.45));
    let hi = HitPainter::panel_to_pixel(&p, Vec2::new(0.8, 0.45));
    assert!(lo.length() < 1e-3);
    assert!((hi - Vec2::new(320.0, 180.0)).length() < 1e-3);
}

#[test]
fn mapping_does_not_clamp() {
    let px = HitPainter::panel_to_pixel(&panel(), Vec2::new(2.0, -1.0));
    assert!(px.x > 320.0);
    assert!(px.y < 0.0);
}

#[test]
fn paint_stamps_circle_and_marks_dirty() {
    let mut p = panel();
    assert!(p.buffer.take_dirty());
    assert!(!p.buffer.is_dirty());

    let painter = HitPainter::new(5.0, RED);
    let px = painter.paint(&mut p, Vec2::ZERO);
    assert!((px - Vec2::new(160.0, 90.0)).length() < 1e-3);
    assert!(p.buffer.is_dirty());

    assert_eq!(p.buffer.pixel(160, 90), Some(RED));
    assert_eq!(p.buffer.pixel(164, 90), Some(RED));
    assert_eq!(p.buffer.pixel(155, 90), Some(RED));
    // 6.5 px from the center: outside the radius
    assert_eq!(p.buffer.pixel(166, 90), Some(WHITE));
    assert_eq!(p.buffer.pixel(160, 96), Some(WHITE));
    // corner of the bounding box is outside the disc
    assert_eq!(p.buffer.pixel(164, 94), Some(WHITE));
}

#[test]
fn marks_accumulate() {
    let mut p = panel();
    let painter = HitPainter::new(5.0, RED);
    painter.paint(&mut p, Vec2::new(-0.4, 0.2));
    painter.paint(&mut p, Vec2::new(0.4, -0.2));
    let a = HitPainter::panel_to_pixel(&p, Vec2::new(-0.4, 0.2));
    let b = HitPainter::panel_to_pixel(&p, Vec2::new(0.4, -0.2));
    assert_eq!(p.buffer.pixel(a.x as i64, a.y as i64), Some(RED));
    assert_eq!(p.buffer.pixel(b.x as i64, b.y as i64), Some(RED));
}

#[test]
fn off_panel_hit_is_clipped_silently() {
    let mut p = panel();
    let before = p.buffer.as_bytes().to_vec();
    let painter = HitPainter::new(5.0, RED);
    painter.paint(&mut p, Vec2::new(3.0, 0.0));
    assert_eq!(p.buffer.as_bytes(), &before[..]);
    assert!(p.buffer.is_dirty());
}

#[test]
fn edge_hit_is_partially_drawn() {
    let mut b = PixelBuffer::new(320, 180, WHITE);
    let written = b.fill_circle(0.0, 90.0, 5.0, RED);
    assert!(written > 0);
    assert_eq!(b.pixel(0, 90), Some(RED));
    assert_eq!(b.pixel(-1, 90), None);
}

#[test]
fn zero_radius_or_nan_writes_nothing() {
    let mut b = PixelBuffer::new(8, 8, WHITE);
    assert_eq!(b.fill_circle(4.0, 4.0, 0.0, RED), 0);
    assert_eq!(b.fill_circle(f32::NAN, 4.0, 3.0, RED), 0);
}

#[test]
fn load_flips_rows_bottom_up() {
    let mut b = PixelBuffer::new(2, 2, WHITE);
    let top = [1u8, 2, 3, 4];
    let bottom = [5u8, 6, 7, 8];
    let image: Vec<u8> = [top, top, bottom, bottom].concat();
    b.load_rgba_flipped(&image).unwrap();
    assert_eq!(b.pixel(0, 1), Some(top));
    assert_eq!(b.pixel(1, 0), Some(bottom));
}

#[test]
fn load_rejects_wrong_size() {
    let mut b = PixelBuffer::new(2, 2, WHITE);
    match b.load_rgba_flipped(&[0u8; 3]) {
        Err(XrError::BufferSize { expected, got }) => {
            assert_eq!(expected, 16);
            assert_eq!(got, 3);
        }
        other => panic!("unexpected {:?}", other),
    }
}
