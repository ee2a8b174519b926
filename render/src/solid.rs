//! The aliased solid-color renderer.

use crate::color::{swap_red_blue, Color};
use crate::pixmap::BufferView;
use crate::raster::{Renderer, ShapeFeeder};

/// Fills shapes with a single opaque color, without antialiasing or
/// blending. Simpler and faster than [`AaRenderer`](crate::AaRenderer)
/// for large areas.
pub struct SolidRenderer<'a> {
    target: BufferView<'a>,
    color: Color,
}

impl<'a> SolidRenderer<'a> {
    pub fn new(target: BufferView<'a>) -> SolidRenderer<'a> {
        let mut renderer = SolidRenderer { target, color: 0 };
        renderer.set_color(0);
        renderer
    }

    /// Selects the color for subsequent fills and strokes. The alpha
    /// component is ignored; pixels are written fully opaque.
    pub fn set_color(&mut self, color: Color) {
        self.color = swap_red_blue(color) | 0xff00_0000;
    }
}

impl<'a> Renderer for SolidRenderer<'a> {
    fn render_shape(&mut self, feeder: &mut ShapeFeeder) {
        while let Some(rect) = feeder.next_sdl_rect() {
            for y in rect.y..rect.y + rect.h {
                let row = self.target.row_mut(y as usize);
                for pixel in &mut row[rect.x as usize..(rect.x + rect.w) as usize] {
                    *pixel = self.color;
                }
            }
        }
    }
}
