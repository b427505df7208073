//! Geometric primitives for page space and raster space.
//!
//! Two coordinate spaces meet in this crate and are kept apart by type:
//!
//! - **Page space** ([`PagePoint`], [`PageBox`]): PDF user units, origin at the
//!   bottom-left of the media box, y grows upward.
//! - **Raster space** ([`PixelPoint`], [`PixelRect`]): pixels of a rendered page,
//!   origin at the top-left, y grows downward.
//!
//! [`Viewport`] is the only place where a value crosses from one space to the
//! other.

/// A 2D affine transformation matrix.
///
/// PDF uses row-vector matrices of the form:
/// ```text
/// [ a  b  0 ]
/// [ c  d  0 ]
/// [ e  f  1 ]
/// ```
///
/// Where (a,b,c,d) define scaling/rotation/skewing and (e,f) define translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component
    pub a: f32,
    /// Rotation/skew component
    pub b: f32,
    /// Rotation/skew component
    pub c: f32,
    /// Vertical scaling component
    pub d: f32,
    /// Horizontal translation
    pub e: f32,
    /// Vertical translation
    pub f: f32,
}

impl Matrix {
    /// Create a matrix from its six components.
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Create an identity matrix.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Create a translation matrix.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_retext::geometry::Matrix;
    ///
    /// let m = Matrix::translation(10.0, 20.0);
    /// let p = m.transform_point(5.0, 10.0);
    /// assert_eq!(p.x, 15.0);
    /// assert_eq!(p.y, 30.0);
    /// ```
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Create a scaling matrix.
    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Build a matrix from a slice of six numbers, as found in PDF operands.
    pub fn from_slice(values: &[f32]) -> Option<Self> {
        match values {
            [a, b, c, d, e, f] => Some(Self::new(*a, *b, *c, *d, *e, *f)),
            _ => None,
        }
    }

    /// Concatenate two matrices: the result applies `self` first, then `other`.
    ///
    /// With PDF's row-vector convention, `cm` updates the CTM as
    /// `m.multiply(&ctm)` and the text rendering matrix is
    /// `params.multiply(&tm).multiply(&ctm)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_retext::geometry::Matrix;
    ///
    /// let scale_then_move = Matrix::scaling(2.0, 2.0).multiply(&Matrix::translation(10.0, 0.0));
    /// let p = scale_then_move.transform_point(1.0, 1.0);
    /// assert_eq!(p.x, 12.0);
    /// assert_eq!(p.y, 2.0);
    /// ```
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point using this matrix.
    pub fn transform_point(&self, x: f32, y: f32) -> PagePoint {
        PagePoint {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }

    /// Transform a distance vector (ignores translation).
    pub fn transform_vector(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y, self.b * x + self.d * y)
    }

    /// Length of the transformed unit y-vector.
    pub fn y_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Whether the shear components stay within `tolerance`.
    ///
    /// Upright text (including mirrored or scaled text) has `b == c == 0`.
    /// Anything else is rotated or skewed.
    pub fn is_upright(&self, tolerance: f32) -> bool {
        self.b.abs() <= tolerance && self.c.abs() <= tolerance
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// A point in page space (PDF units, y-up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePoint {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl PagePoint {
    /// Create a new page-space point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in page space (PDF units, y-up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Left edge
    pub min_x: f32,
    /// Bottom edge
    pub min_y: f32,
    /// Right edge
    pub max_x: f32,
    /// Top edge
    pub max_y: f32,
}

impl PageBox {
    /// Create a box from its edges.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a box from an origin (bottom-left) and a size.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Box width (may be negative for an inverted box).
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Box height (may be negative for an inverted box).
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Whether the box has strictly positive width and height.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Smallest box containing both boxes.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_retext::geometry::PageBox;
    ///
    /// let a = PageBox::new(0.0, 0.0, 10.0, 10.0);
    /// let b = PageBox::new(5.0, -2.0, 20.0, 8.0);
    /// assert_eq!(a.union(&b), PageBox::new(0.0, -2.0, 20.0, 10.0));
    /// ```
    pub fn union(&self, other: &PageBox) -> PageBox {
        PageBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// A point in raster space (pixels, y-down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    /// X coordinate (pixels from the left edge)
    pub x: f32,
    /// Y coordinate (pixels from the top edge)
    pub y: f32,
}

impl PixelPoint {
    /// Create a new raster-space point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in raster space, anchored at its top-left corner.
///
/// Coordinates may be fractional and may extend beyond the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    /// Left edge (pixels)
    pub x: f32,
    /// Top edge (pixels)
    pub y: f32,
    /// Width (pixels)
    pub width: f32,
    /// Height (pixels)
    pub height: f32,
}

impl PixelRect {
    /// Create a new raster-space rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of edge `size` centered on `center`.
    pub fn centered(center: PixelPoint, size: f32) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Mapping from page space to the pixels of a rendered page.
///
/// The page's media box `[x0, y0, x1, y1]` is rendered at `scale` pixels per
/// unit; the top edge of the media box lands on pixel row 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per page unit
    pub scale: f32,
    /// Left edge of the media box (page space)
    pub origin_x: f32,
    /// Top edge of the media box (page space)
    pub top_y: f32,
    /// Rendered width in pixels
    pub width: u32,
    /// Rendered height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport for a media box rendered at `scale`.
    pub fn new(media_box: PageBox, scale: f32) -> Self {
        let width = (media_box.width() * scale).ceil().max(0.0) as u32;
        let height = (media_box.height() * scale).ceil().max(0.0) as u32;
        Self {
            scale,
            origin_x: media_box.min_x,
            top_y: media_box.max_y,
            width,
            height,
        }
    }

    /// Affine form of this mapping (page space to raster space).
    pub fn matrix(&self) -> Matrix {
        Matrix::new(
            self.scale,
            0.0,
            0.0,
            -self.scale,
            -self.origin_x * self.scale,
            self.top_y * self.scale,
        )
    }

    /// Map a page-space point to raster space.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_retext::geometry::{PageBox, PagePoint, Viewport};
    ///
    /// let viewport = Viewport::new(PageBox::new(0.0, 0.0, 612.0, 792.0), 2.0);
    /// let p = viewport.to_pixel(PagePoint::new(100.0, 700.0));
    /// assert_eq!(p.x, 200.0);
    /// assert_eq!(p.y, 184.0);
    /// ```
    pub fn to_pixel(&self, point: PagePoint) -> PixelPoint {
        PixelPoint::new(
            (point.x - self.origin_x) * self.scale,
            (self.top_y - point.y) * self.scale,
        )
    }

    /// Map a page-space box to the raster rectangle covering it.
    ///
    /// The top-left corner comes from mapping `(min_x, max_y)`; width and
    /// height are the page-space extents times the scale, so both spaces
    /// always agree on the box size.
    pub fn to_pixel_rect(&self, bbox: &PageBox) -> PixelRect {
        let top_left = self.to_pixel(PagePoint::new(bbox.min_x, bbox.max_y));
        PixelRect::new(
            top_left.x,
            top_left.y,
            bbox.width() * self.scale,
            bbox.height() * self.scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_identity() {
        let m = Matrix::identity();
        let p = m.transform_point(3.0, 4.0);
        assert_eq!(p, PagePoint::new(3.0, 4.0));
        assert!(m.is_upright(0.0));
    }

    #[test]
    fn test_matrix_multiply_order() {
        // Translate first, then scale: (1,1) -> (11,1) -> (22,2)
        let m = Matrix::translation(10.0, 0.0).multiply(&Matrix::scaling(2.0, 2.0));
        let p = m.transform_point(1.0, 1.0);
        assert_eq!(p, PagePoint::new(22.0, 2.0));
    }

    #[test]
    fn test_matrix_from_slice() {
        assert_eq!(
            Matrix::from_slice(&[1.0, 0.0, 0.0, 1.0, 5.0, 6.0]),
            Some(Matrix::translation(5.0, 6.0))
        );
        assert_eq!(Matrix::from_slice(&[1.0, 2.0]), None);
    }

    #[test]
    fn test_matrix_rotation_not_upright() {
        let angle = std::f32::consts::FRAC_PI_2;
        let rot = Matrix::new(angle.cos(), angle.sin(), -angle.sin(), angle.cos(), 0.0, 0.0);
        assert!(!rot.is_upright(0.01));
        assert!(Matrix::scaling(12.0, -12.0).is_upright(0.01));
    }

    #[test]
    fn test_matrix_y_scale() {
        let m = Matrix::scaling(3.0, 4.0);
        assert_eq!(m.y_scale(), 4.0);
    }

    #[test]
    fn test_page_box_degenerate() {
        assert!(!PageBox::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
        assert!(PageBox::new(0.0, 0.0, 0.0, 1.0).is_degenerate());
        assert!(PageBox::new(0.0, 5.0, 1.0, 1.0).is_degenerate());
        assert!(PageBox::new(0.0, 0.0, f32::NAN, 1.0).is_degenerate());
    }

    #[test]
    fn test_page_box_from_origin() {
        let b = PageBox::from_origin(10.0, 20.0, 30.0, 5.0);
        assert_eq!(b.width(), 30.0);
        assert_eq!(b.height(), 5.0);
    }

    #[test]
    fn test_viewport_flips_y() {
        let viewport = Viewport::new(PageBox::new(0.0, 0.0, 100.0, 200.0), 2.0);
        assert_eq!(viewport.width, 200);
        assert_eq!(viewport.height, 400);
        assert_eq!(
            viewport.to_pixel(PagePoint::new(0.0, 200.0)),
            PixelPoint::new(0.0, 0.0)
        );
        assert_eq!(
            viewport.to_pixel(PagePoint::new(0.0, 0.0)),
            PixelPoint::new(0.0, 400.0)
        );
    }

    #[test]
    fn test_viewport_offset_media_box() {
        let viewport = Viewport::new(PageBox::new(50.0, 50.0, 150.0, 150.0), 1.0);
        assert_eq!(
            viewport.to_pixel(PagePoint::new(50.0, 150.0)),
            PixelPoint::new(0.0, 0.0)
        );
    }

    #[test]
    fn test_viewport_rect_matches_scale() {
        let viewport = Viewport::new(PageBox::new(0.0, 0.0, 612.0, 792.0), 2.0);
        let rect = viewport.to_pixel_rect(&PageBox::new(100.0, 690.0, 150.0, 710.0));
        assert_eq!(rect.x, 200.0);
        assert_eq!(rect.y, 164.0);
        assert_eq!(rect.width, 100.0);
        assert_eq!(rect.height, 40.0);
    }

    #[test]
    fn test_viewport_matrix_agrees_with_to_pixel() {
        let viewport = Viewport::new(PageBox::new(10.0, 20.0, 110.0, 220.0), 1.5);
        let via_matrix = viewport.matrix().transform_point(60.0, 70.0);
        let direct = viewport.to_pixel(PagePoint::new(60.0, 70.0));
        assert!((via_matrix.x - direct.x).abs() < 1e-4);
        assert!((via_matrix.y - direct.y).abs() < 1e-4);
    }

    #[test]
    fn test_pixel_rect_centered() {
        let r = PixelRect::centered(PixelPoint::new(10.0, 10.0), 2.0);
        assert_eq!(r, PixelRect::new(9.0, 9.0, 2.0, 2.0));
        assert_eq!(r.right(), 11.0);
        assert_eq!(r.bottom(), 11.0);
    }
}
