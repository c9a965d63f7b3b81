//! Unit tests for the frame-to-ASCII pipeline.
//!
//! These tests verify the core algorithms end to end on synthetic frames:
//! - Ramp quantization
//! - Grid geometry
//! - Sampling and rendering

use ascii_face::ascii::*;
use ascii_face::camera::Frame;

fn render_frame(
    frame: &Frame,
    geometry: &GridGeometry,
    ramp: &GlyphRamp,
    color_mode: bool,
) -> DrawList {
    let mut sampler = FrameSampler::new(SampleFilter::Box);
    let grid = sampler
        .sample(frame, geometry.columns, geometry.rows)
        .expect("frame should sample");
    AsciiRenderer::default().render(grid, geometry, ramp, color_mode)
}

fn geometry(columns: u16) -> GridGeometry {
    GridGeometry::recompute(640.0, 480.0, 4.0 / 3.0, 1.0, columns, DEFAULT_CELL_ASPECT).unwrap()
}

// ==================== Ramp Tests ====================

#[test]
fn test_glyph_index_stays_in_range() {
    for set in [CharSet::Standard, CharSet::Blocks, CharSet::Minimal, CharSet::Dense] {
        let ramp = set.ramp();
        for i in -10..=110 {
            let l = i as f32 / 100.0;
            assert!(ramp.index_for(l) < ramp.len(), "{:?} at {}", set, l);
        }
        assert_eq!(ramp.glyph_for(0.0), ramp.glyphs()[0]);
        assert_eq!(ramp.glyph_for(1.0), ramp.glyphs()[ramp.len() - 1]);
        assert_eq!(ramp.glyph_for(f32::NAN), ramp.darkest());
    }
}

#[test]
fn test_ramp_rejects_single_glyph() {
    assert_eq!(GlyphRamp::new("#".chars()), Err(RampError::TooShort(1)));
    assert!(GlyphRamp::new(" #".chars()).is_ok());
}

// ==================== Geometry Tests ====================

#[test]
fn test_canvas_fits_container_and_keeps_aspect() {
    let containers = [(640.0, 480.0), (1920.0, 400.0), (300.0, 900.0), (1000.0, 1000.0)];
    for aspect in [4.0 / 3.0, 16.0 / 9.0, 3.0 / 4.0] {
        for (w, h) in containers {
            let g = GridGeometry::recompute(w, h, aspect, 2.0, 80, 0.5).unwrap();
            assert!(g.canvas_width_px <= w + 0.01, "{}x{} @ {}", w, h, aspect);
            assert!(g.canvas_height_px <= h + 0.01, "{}x{} @ {}", w, h, aspect);
            let ratio = g.canvas_width_px / g.canvas_height_px;
            assert!((ratio - aspect).abs() < 0.01, "{}x{} @ {}", w, h, aspect);
            assert_eq!(g.backing_width_px, (g.canvas_width_px * 2.0).round() as u32);
        }
    }
}

#[test]
fn test_geometry_unready_without_container() {
    assert!(GridGeometry::recompute(0.0, 480.0, 4.0 / 3.0, 1.0, 80, 0.5).is_err());
    assert!(GridGeometry::recompute(640.0, 480.0, 0.0, 1.0, 80, 0.5).is_err());
}

// ==================== Rendering Tests ====================

#[test]
fn test_uniform_gray_frame() {
    let frame = Frame::solid(320, 240, [128, 128, 128]);
    let g = geometry(40);
    let ramp = GlyphRamp::default();

    let colored = render_frame(&frame, &g, &ramp, true);
    assert_eq!(colored.commands.len(), g.columns as usize * g.rows as usize);
    let first = colored.commands[0].glyph;
    assert!(colored.commands.iter().all(|c| c.glyph == first));
    assert!(colored
        .commands
        .iter()
        .all(|c| c.color == Rgb::new(128, 128, 128)));

    let mono = render_frame(&frame, &g, &ramp, false);
    assert!(mono.commands.iter().all(|c| c.glyph == first));
    assert!(mono.commands.iter().all(|c| c.color == Rgb::ACCENT));
}

#[test]
fn test_black_and_white_frames_hit_ramp_ends() {
    let g = geometry(24);
    let ramp = CharSet::Dense.ramp();

    let black = render_frame(&Frame::solid(64, 48, [0, 0, 0]), &g, &ramp, true);
    assert!(black.commands.iter().all(|c| c.glyph == ramp.darkest()));

    let white = render_frame(&Frame::solid(64, 48, [255, 255, 255]), &g, &ramp, true);
    assert!(white.commands.iter().all(|c| c.glyph == ramp.lightest()));
}

#[test]
fn test_four_by_three_grid_corners() {
    // 4x3 pixels sampled to a 4x3 grid: one pixel per cell
    let mut data = vec![128u8; 4 * 3 * 3];
    data[0..3].copy_from_slice(&[0, 0, 0]);
    let last = (2 * 4 + 3) * 3;
    data[last..last + 3].copy_from_slice(&[255, 255, 255]);
    let frame = Frame::rgb(data, 4, 3);

    // rows = floor(4 * 0.75 / 1.0) = 3
    let g = GridGeometry::recompute(400.0, 400.0, 1.0, 1.0, 4, 0.75).unwrap();
    assert_eq!((g.columns, g.rows), (4, 3));

    let ramp = GlyphRamp::new(" .:#".chars()).unwrap();
    let list = render_frame(&frame, &g, &ramp, false);

    assert_eq!(list.command_at(0, 0).map(|c| c.glyph), Some(' '));
    assert_eq!(list.command_at(3, 2).map(|c| c.glyph), Some('#'));
    assert_eq!(list.to_text().lines().count(), 3);
}

#[test]
fn test_draw_commands_are_top_aligned_on_the_grid() {
    let g = geometry(10);
    let list = render_frame(&Frame::solid(100, 75, [10, 200, 30]), &g, &GlyphRamp::default(), true);
    let cmd = list.command_at(3, 2).unwrap();
    assert!((cmd.x - 3.0 * g.cell_width_px).abs() < 1e-3);
    assert!((cmd.y - 2.0 * g.cell_height_px).abs() < 1e-3);
    assert_eq!(list.background, Rgb::BACKGROUND);
}
