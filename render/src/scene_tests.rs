//! End-to-end tests: paths through the rasterizer into the renderers.

use crate::geom::{int_point, IntRect};
use crate::path::{FillRule, LineJoin, PathBuilder};
use crate::raster::{ClipShape, Rasterizer, StrokeStyle};
use crate::{rgb, AaRenderer, Pixmap, SolidRenderer, SpreadMethod};
use crate::{FLAG_EXTEND_END, FLAG_EXTEND_START, FLAG_IMAGE_BGRA32, FLAG_PREMULTALPHA};

fn count_colored(pixmap: &Pixmap) -> usize {
    pixmap.pixels().iter().filter(|&&p| p != 0).count()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn rect_fill_with_the_solid_renderer() {
    init_logging();
    let mut pixmap = Pixmap::new(100, 100).unwrap();
    {
        let mut renderer = SolidRenderer::new(pixmap.view_mut());
        renderer.set_color(rgb(10, 20, 30));
        let mut raster = Rasterizer::new(100, 100);
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(10, 20, 30, 40));
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut renderer));
    }
    assert_eq!(count_colored(&pixmap), 30 * 40);
    // BGRA layout: r=10 lands in bits 16..24.
    assert_eq!(pixmap.pixel(10, 20), 0xff0a_141e);
    assert_eq!(pixmap.pixel(39, 59), 0xff0a_141e);
    assert_eq!(pixmap.pixel(9, 20), 0);
    assert_eq!(pixmap.pixel(40, 20), 0);
}

#[test]
fn aligned_rect_is_identical_aliased_and_antialiased() {
    let rect = IntRect::new(7, 3, 21, 14);

    let mut solid = Pixmap::new(64, 32).unwrap();
    {
        let mut renderer = SolidRenderer::new(solid.view_mut());
        renderer.set_color(rgb(255, 0, 0));
        let mut raster = Rasterizer::new(64, 32);
        let mut path = PathBuilder::new();
        path.rectangle(&rect);
        assert!(raster.fill_path(&mut path, FillRule::NonZero, &mut renderer));
    }

    let mut aa = Pixmap::new(64, 32).unwrap();
    {
        let mut renderer = AaRenderer::new(aa.view_mut());
        renderer.set_color(rgb(255, 0, 0));
        let mut raster = Rasterizer::new(64, 32);
        let mut path = PathBuilder::new();
        path.rectangle(&rect);
        assert!(raster.fill_path(&mut path, FillRule::NonZero, &mut renderer));
    }

    // A pixel-aligned rectangle gets full coverage everywhere, so the
    // two renderers agree exactly.
    assert_eq!(solid.pixels(), aa.pixels());
}

#[test]
fn mitred_corner_covers_the_outer_square() {
    // An L stroked 20 wide with a mitered join: the outer corner
    // reaches (0,110), the inner corner (20,90).
    init_logging();
    let mut pixmap = Pixmap::new(128, 128).unwrap();
    {
        let mut renderer = AaRenderer::new(pixmap.view_mut());
        renderer.set_color(rgb(255, 0, 0));
        let mut raster = Rasterizer::new(128, 128);
        let mut path = PathBuilder::new();
        path.move_to(10, 10);
        path.line_to(10, 100).unwrap();
        path.line_to(100, 100).unwrap();
        path.end_figure();
        let style = StrokeStyle::default()
            .with_line_width(20.0)
            .with_line_join(LineJoin::MiterClip)
            .with_miter_limit(4.0);
        assert!(raster.stroke_path(&mut path, &style, &mut renderer));
    }
    let red = 0xffff_0000;
    // Deep inside the vertical band, the bottom band, and the mitered
    // corner square.
    assert_eq!(pixmap.pixel(15, 50), red);
    assert_eq!(pixmap.pixel(50, 105), red);
    assert_eq!(pixmap.pixel(5, 105), red);
    // Outside the stroke.
    assert_eq!(pixmap.pixel(25, 50), 0);
    assert_eq!(pixmap.pixel(50, 85), 0);
    assert_eq!(pixmap.pixel(5, 115), 0);
    assert_eq!(pixmap.pixel(5, 5), 0);
}

#[test]
fn linear_gradient_fill_spans_the_rect() {
    let mut pixmap = Pixmap::new(64, 16).unwrap();
    {
        let mut renderer = AaRenderer::new(pixmap.view_mut());
        renderer.add_color_stop(0.0, rgb(255, 0, 0));
        renderer.add_color_stop(1.0, rgb(0, 255, 0));
        renderer.set_linear_gradient(
            0.0,
            0.0,
            64.0,
            0.0,
            SpreadMethod::Pad,
            FLAG_EXTEND_START | FLAG_EXTEND_END,
        );
        let mut raster = Rasterizer::new(64, 16);
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(0, 0, 64, 16));
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut renderer));
    }
    // Left edge nearly red, right edge nearly green, alpha solid.
    let left = pixmap.pixel(1, 8);
    let right = pixmap.pixel(62, 8);
    assert_eq!(left >> 24, 255);
    assert!((left >> 16) & 255 > 0xe0, "left {:08x}", left);
    assert!((right >> 8) & 255 > 0xe0, "right {:08x}", right);
    // Monotonic red-to-green along the row.
    let mut prev_red = 256;
    for x in (3..64).step_by(8) {
        let r = (pixmap.pixel(x, 8) >> 16) & 255;
        assert!(r < prev_red, "red not decreasing at x={}", x);
        prev_red = r;
    }
}

#[test]
fn circular_clip_minus_square_mask() {
    let mut pixmap = Pixmap::new(100, 100).unwrap();
    {
        let mut renderer = AaRenderer::new(pixmap.view_mut());
        renderer.set_color(rgb(255, 0, 0));
        let mut raster = Rasterizer::for_renderer(&renderer, 100, 100);

        // Clip: circle of radius 20 at (50,50).
        let mut clip = PathBuilder::new();
        clip.ellipse(int_point(50, 50), int_point(70, 50), int_point(50, 70));
        assert!(raster.set_clip_path(&mut clip, ClipShape::Fill(FillRule::EvenOdd)));

        // Mask: the square {40,40,20,20} is knocked out of the clip.
        let mut mask = PathBuilder::new();
        mask.rectangle(&IntRect::new(40, 40, 20, 20));
        assert!(raster.set_mask_path(&mut mask, ClipShape::Fill(FillRule::EvenOdd)));

        let mut all = PathBuilder::new();
        all.rectangle(&IntRect::new(0, 0, 100, 100));
        assert!(raster.fill_path(&mut all, FillRule::EvenOdd, &mut renderer));
    }
    // In the circle but outside the square: painted.
    assert_eq!(pixmap.pixel(50, 35) >> 24, 255);
    assert_eq!(pixmap.pixel(35, 50) >> 24, 255);
    // Inside the square: masked out.
    assert_eq!(pixmap.pixel(50, 50), 0);
    assert_eq!(pixmap.pixel(45, 55), 0);
    // Outside the circle: clipped.
    assert_eq!(pixmap.pixel(80, 50), 0);
    assert_eq!(pixmap.pixel(5, 5), 0);
}

#[test]
fn set_color_after_pattern_restores_solid_fills() {
    let texels = [0xff11_2233u32, 0xff44_5566, 0xff77_8899, 0xffaa_bbcc];
    let mut pixmap = Pixmap::new(16, 16).unwrap();
    {
        let mut renderer = AaRenderer::new(pixmap.view_mut());
        assert!(renderer.set_pattern(
            &texels,
            0.0,
            0.0,
            2,
            2,
            2,
            FLAG_IMAGE_BGRA32 | FLAG_PREMULTALPHA
        ));
        renderer.set_color(rgb(0, 0, 255));
        let mut raster = Rasterizer::new(16, 16);
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(0, 0, 16, 16));
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut renderer));
    }
    // Pure solid blue everywhere: the pattern is gone.
    for &pixel in pixmap.pixels() {
        assert_eq!(pixel, 0xff00_00ff);
    }
}

#[test]
fn pattern_fill_tiles_the_texture() {
    // A 2x2 checkerboard tiled over a rect: pixels one image period
    // apart match.
    let texels = [0xffff_ffffu32, 0xff00_0000, 0xff00_0000, 0xffff_ffff];
    let mut pixmap = Pixmap::new(32, 32).unwrap();
    {
        let mut renderer = AaRenderer::new(pixmap.view_mut());
        assert!(renderer.set_pattern(
            &texels,
            0.0,
            0.0,
            2,
            2,
            2,
            FLAG_IMAGE_BGRA32 | FLAG_PREMULTALPHA
        ));
        let mut raster = Rasterizer::new(32, 32);
        let mut path = PathBuilder::new();
        path.rectangle(&IntRect::new(0, 0, 32, 32));
        assert!(raster.fill_path(&mut path, FillRule::EvenOdd, &mut renderer));
    }
    for y in 4..28 {
        for x in 4..28 {
            assert_eq!(
                pixmap.pixel(x, y),
                pixmap.pixel(x + 2, y),
                "tile period broken at ({}, {})",
                x,
                y
            );
            assert_eq!(pixmap.pixel(x, y), pixmap.pixel(x, y + 2));
        }
    }
}

#[test]
fn save_and_swap_clip_regions_round_trip_pixels() {
    let mut with_clip = Pixmap::new(40, 40).unwrap();
    let mut roundtrip = Pixmap::new(40, 40).unwrap();

    for (pixmap, do_roundtrip) in [(&mut with_clip, false), (&mut roundtrip, true)].iter_mut() {
        let mut renderer = SolidRenderer::new(pixmap.view_mut());
        renderer.set_color(rgb(9, 9, 9));
        let mut raster = Rasterizer::new(40, 40);
        let mut clip = PathBuilder::new();
        clip.rectangle(&IntRect::new(5, 5, 12, 9));
        assert!(raster.set_clip_path(&mut clip, ClipShape::Fill(FillRule::EvenOdd)));
        if *do_roundtrip {
            assert!(raster.save_clip_region());
            assert!(raster.swap_clip_region());
            assert!(raster.swap_clip_region());
        }
        let mut all = PathBuilder::new();
        all.rectangle(&IntRect::new(0, 0, 40, 40));
        assert!(raster.fill_path(&mut all, FillRule::EvenOdd, &mut renderer));
    }
    assert_eq!(with_clip.pixels(), roundtrip.pixels());
}
