use anyhow::{Context, Result, anyhow};
use std::path::Path;
use tiny_skia::{FillRule, Paint, Path as SkiaPath, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::{debug, trace};

use crate::geometry::{Die, Layout};
use crate::palette::Color;

/// Cubic bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// A square RGBA raster that starts fully transparent.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    pub fn new(size: u32) -> Result<Self> {
        let pixmap =
            Pixmap::new(size, size).ok_or_else(|| anyhow!("Cannot allocate a {size}x{size} canvas"))?;
        Ok(Self { pixmap })
    }

    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // Pixmap::pixel only bounds-checks the flat index
        if x >= self.size() || y >= self.size() {
            return None;
        }

        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// All pixels as straight RGBA, row by row.
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut data, self.size(), self.size());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.to_rgba())?;
            writer.finish()?;
        }
        Ok(data)
    }

    pub fn write_png(&self, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, self.encode_png()?)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        debug!(size = self.size(), path = %output_path.display(), "Saved raster icon");
        Ok(())
    }

    fn fill(&mut self, path: &SkiaPath, color: Color) {
        self.pixmap
            .fill_path(path, &paint(color), FillRule::Winding, Transform::identity(), None);
    }

    fn draw_die(&mut self, die: &Die) {
        let x = die.x as f32;
        let y = die.y as f32;
        let side = die.side as f32;
        let radius = die.corner_radius as f32;

        if let Some(body) = rounded_square(x, y, side, radius) {
            self.fill(&body, die.style.fill);
        }

        // Keep the outline inside the body so it does not grow the die
        let width = die.outline_width as f32;
        let inset = width / 2.0;
        if let Some(outline) =
            rounded_square(x + inset, y + inset, side - width, (radius - inset).max(0.0))
        {
            let stroke = Stroke {
                width,
                ..Default::default()
            };
            self.pixmap.stroke_path(
                &outline,
                &paint(die.style.outline),
                &stroke,
                Transform::identity(),
                None,
            );
        }

        for (cx, cy) in die.pips() {
            if let Some(pip) = PathBuilder::from_circle(cx, cy, die.pip_radius as f32) {
                self.fill(&pip, die.style.pip);
            }
        }
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 0xff);
    paint.anti_alias = true;
    paint
}

/// Square path with quarter-circle corners, or `None` when degenerate.
fn rounded_square(x: f32, y: f32, side: f32, radius: f32) -> Option<SkiaPath> {
    if side <= 0.0 {
        return None;
    }

    let r = radius.min(side / 2.0);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(Rect::from_xywh(x, y, side, side)?));
    }

    let k = r * (1.0 - KAPPA);
    let right = x + side;
    let bottom = y + side;

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - k, y, right, y + k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - k, right - k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + k, bottom, x, bottom - k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + k, x + k, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Draw the icon at `size` x `size` pixels.
///
/// The back die is painted before the front die, so the front die covers it
/// wherever the two overlap. The result depends on `size` alone.
pub fn render_raster(size: u32) -> Result<Canvas> {
    let layout = Layout::new(size)?;
    let mut canvas = Canvas::new(size)?;

    for die in layout.dice() {
        trace!(?die, "Drawing die");
        canvas.draw_die(die);
    }

    debug!(size, scale = layout.scale, "Rendered raster icon");
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BACK_DIE, FRONT_DIE};

    fn opaque(color: Color) -> Option<[u8; 4]> {
        Some(color.rgba())
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(render_raster(0).is_err());
    }

    #[test_log::test]
    fn test_render_is_deterministic() -> Result<()> {
        for size in [16, 48, 180] {
            let a = render_raster(size)?;
            let b = render_raster(size)?;

            assert_eq!(a.size(), size);
            assert_eq!(a.to_rgba(), b.to_rgba());
        }
        Ok(())
    }

    #[test]
    fn test_base_size_samples() -> Result<()> {
        let canvas = render_raster(64)?;

        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(63, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(20, 10), opaque(BACK_DIE.fill));
        assert_eq!(canvas.pixel(35, 34), opaque(FRONT_DIE.pip));
        assert_eq!(canvas.pixel(64, 0), None);
        Ok(())
    }

    #[test]
    fn test_pixel_out_of_bounds() -> Result<()> {
        let canvas = render_raster(64)?;

        assert_eq!(canvas.pixel(64, 0), None);
        assert_eq!(canvas.pixel(100, 10), None);
        assert_eq!(canvas.pixel(0, 64), None);
        assert_eq!(canvas.pixel(u32::MAX, u32::MAX), None);
        assert!(canvas.pixel(63, 63).is_some());
        Ok(())
    }

    #[test]
    fn test_front_die_occludes_back_die() -> Result<()> {
        let canvas = render_raster(64)?;
        assert_eq!(canvas.pixel(30, 30), opaque(FRONT_DIE.fill));

        // The overlap spans [26, 38) on both axes; stay clear of the rounded corner
        let back_colors = [BACK_DIE.fill, BACK_DIE.outline, BACK_DIE.pip].map(|c| c.rgba());
        for y in 30..38 {
            for x in 30..38 {
                let pixel = canvas.pixel(x, y).unwrap();
                assert!(!back_colors.contains(&pixel), "back die visible at ({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn test_pips_are_painted() -> Result<()> {
        for size in [64, 180, 512] {
            let layout = Layout::new(size)?;
            let canvas = render_raster(size)?;
            let front = layout.front;

            for (cx, cy) in front.pips() {
                assert_eq!(canvas.pixel(cx as u32, cy as u32), opaque(FRONT_DIE.pip));
            }

            // Back pips are only visible outside the front die
            let hidden = |x: f32, y: f32| x >= front.x as f32 && y >= front.y as f32;
            let visible: Vec<_> = layout
                .back
                .pips()
                .into_iter()
                .filter(|(x, y)| !hidden(*x, *y))
                .collect();
            assert_eq!(visible.len(), 5);

            for (cx, cy) in visible {
                assert_eq!(canvas.pixel(cx as u32, cy as u32), opaque(BACK_DIE.pip));
            }
        }
        Ok(())
    }

    #[test]
    fn test_tiny_sizes_render() -> Result<()> {
        for size in 1..=8 {
            let canvas = render_raster(size)?;
            assert_eq!(canvas.to_rgba().len(), (size * size * 4) as usize);
            assert!(canvas.to_rgba().chunks(4).any(|p| p[3] != 0));
        }
        Ok(())
    }

    #[test]
    fn test_write_png() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("icon.png");

        render_raster(32)?.write_png(&path)?;

        let data = std::fs::read(&path)?;
        assert_eq!(&data[..8], b"\x89PNG\r\n\x1a\n");
        Ok(())
    }

    #[test]
    fn test_write_png_missing_directory() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("missing").join("icon.png");

        assert!(render_raster(16)?.write_png(&path).is_err());
        Ok(())
    }
}
