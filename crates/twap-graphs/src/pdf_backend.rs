//! Single-page vector PDF backend for plotters.
//!
//! Shapes become PDF path operators and text is set in the standard Helvetica
//! font, so no font files are needed. Glyph widths are estimated, which is
//! enough for axis and legend layout.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const FONT_NAME: Name<'static> = Name(b"F1");

/// Average Helvetica advance width, in em.
const AVG_CHAR_WIDTH: f32 = 0.55;
/// Helvetica cap height, in em.
const CAP_HEIGHT: f32 = 0.72;
/// Segments used to approximate a circle.
const CIRCLE_SEGMENTS: usize = 48;

#[derive(Debug, Error)]
pub enum PdfBackendError {
    #[error("failed to write PDF to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type DrawResult = Result<(), DrawingErrorKind<PdfBackendError>>;

/// Draws into a PDF page of `size` points, written to `path` on `present`.
pub struct PdfBackend<'a> {
    path: &'a Path,
    size: (u32, u32),
    content: Content,
    saved: bool,
}

impl<'a> PdfBackend<'a> {
    pub fn new<T: AsRef<Path> + ?Sized>(path: &'a T, size: (u32, u32)) -> Self {
        Self {
            path: path.as_ref(),
            size,
            content: Content::new(),
            saved: false,
        }
    }

    /// Screen coordinates (origin top-left) to PDF user space (origin bottom-left).
    fn flip(&self, (x, y): BackendCoord) -> (f32, f32) {
        (x as f32, self.size.1 as f32 - y as f32)
    }

    fn set_fill(&mut self, color: BackendColor) {
        let (r, g, b) = rgb(color);
        self.content.set_fill_rgb(r, g, b);
    }

    fn set_stroke(&mut self, color: BackendColor, width: u32) {
        let (r, g, b) = rgb(color);
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(width.max(1) as f32);
    }

    fn trace_path(&mut self, points: &[BackendCoord]) {
        for (i, point) in points.iter().enumerate() {
            let (x, y) = self.flip(*point);
            if i == 0 {
                self.content.move_to(x, y);
            } else {
                self.content.line_to(x, y);
            }
        }
    }

    fn document(&self, content: Vec<u8>) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);

        let (width, height) = self.size;
        let mut pdf = Pdf::new();

        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, width as f32, height as f32));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.stream(content_id, &content);
        pdf.finish()
    }
}

fn rgb(color: BackendColor) -> (f32, f32, f32) {
    let (r, g, b) = color.rgb;
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH
}

/// Bytes under WinAnsiEncoding. Printable Latin-1 maps to itself; anything
/// else, including the C1 control range, is replaced.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(byte) if !(0x80..=0x9f).contains(&byte) => byte,
            _ => b'?',
        })
        .collect()
}

impl DrawingBackend for PdfBackend<'_> {
    type ErrorType = PdfBackendError;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> DrawResult {
        Ok(())
    }

    fn present(&mut self) -> DrawResult {
        if self.saved {
            return Ok(());
        }

        let content = std::mem::replace(&mut self.content, Content::new()).finish();
        let bytes = self.document(content);
        std::fs::write(self.path, &bytes).map_err(|source| {
            DrawingErrorKind::DrawingError(PdfBackendError::Io {
                path: self.path.to_path_buf(),
                source,
            })
        })?;

        debug!("Wrote {} byte PDF to {}", bytes.len(), self.path.display());
        self.saved = true;
        Ok(())
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> DrawResult {
        if color.alpha <= 0.0 {
            return Ok(());
        }
        self.set_fill(color);
        let (x, y) = self.flip(point);
        self.content.rect(x, y - 1.0, 1.0, 1.0);
        self.content.fill_nonzero();
        Ok(())
    }

    fn draw_line<S: BackendStyle>(&mut self, from: BackendCoord, to: BackendCoord, style: &S) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width());
        self.trace_path(&[from, to]);
        self.content.stroke();
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }

        let (x0, top) = self.flip(upper_left);
        let (x1, bottom) = self.flip(bottom_right);
        if fill {
            // pixel rectangles are inclusive of both corners
            self.set_fill(style.color());
            self.content.rect(x0, bottom - 1.0, x1 - x0 + 1.0, top - bottom + 1.0);
            self.content.fill_nonzero();
        } else {
            self.set_stroke(style.color(), style.stroke_width());
            self.content.rect(x0, bottom, x1 - x0, top - bottom);
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(&mut self, path: I, style: &S) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = path.into_iter().collect();
        if points.len() < 2 {
            return Ok(());
        }
        self.set_stroke(style.color(), style.stroke_width());
        self.trace_path(&points);
        self.content.stroke();
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(&mut self, center: BackendCoord, radius: u32, style: &S, fill: bool) -> DrawResult {
        let points: Vec<BackendCoord> = (0..CIRCLE_SEGMENTS).map(|i| {
            let angle = i as f64 / CIRCLE_SEGMENTS as f64 * std::f64::consts::TAU;
            (
                center.0 + (radius as f64 * angle.cos()).round() as i32,
                center.1 + (radius as f64 * angle.sin()).round() as i32,
            )
        })
        .collect();

        if fill {
            self.fill_polygon(points, style)
        } else {
            if style.color().alpha <= 0.0 {
                return Ok(());
            }
            self.set_stroke(style.color(), style.stroke_width());
            self.trace_path(&points);
            self.content.close_path();
            self.content.stroke();
            Ok(())
        }
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(&mut self, vert: I, style: &S) -> DrawResult {
        if style.color().alpha <= 0.0 {
            return Ok(());
        }
        let points: Vec<BackendCoord> = vert.into_iter().collect();
        if points.len() < 3 {
            return Ok(());
        }
        self.set_fill(style.color());
        self.trace_path(&points);
        self.content.close_path();
        self.content.fill_nonzero();
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(&mut self, text: &str, style: &TStyle, pos: BackendCoord) -> DrawResult {
        let color = style.color();
        if color.alpha <= 0.0 || text.is_empty() {
            return Ok(());
        }

        let size = style.size() as f32;
        let width = text_width(text, size);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        // distance from the anchor down to the baseline
        let drop = match anchor.v_pos {
            VPos::Top => size * CAP_HEIGHT,
            VPos::Center => size * CAP_HEIGHT / 2.0,
            VPos::Bottom => 0.0,
        };
        let (sin, cos): (f32, f32) = match style.transform() {
            FontTransform::Rotate90 => (-1.0, 0.0),
            FontTransform::Rotate180 => (0.0, -1.0),
            FontTransform::Rotate270 => (1.0, 0.0),
            _ => (0.0, 1.0),
        };

        let (x, y) = self.flip(pos);
        self.set_fill(color);
        self.content.begin_text();
        self.content.set_font(FONT_NAME, size);
        self.content.set_text_matrix([cos, sin, -sin, cos, x, y]);
        self.content.next_line(dx, -drop);
        self.content.show(Str(&latin1_bytes(text)));
        self.content.end_text();
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let size = style.size() as f32;
        Ok((text_width(text, size).ceil() as u32, size.ceil() as u32))
    }
}

impl Drop for PdfBackend<'_> {
    fn drop(&mut self) {
        if !self.saved {
            // drop must not panic; a failed write is only logged
            if let Err(e) = self.present() {
                tracing::warn!("Failed to write PDF on drop: {}", e);
            }
        }
    }
}
