//! Graphics state for content stream execution.
//!
//! Tracks the transformation matrices, text state parameters and colors
//! that the interpreter needs while walking a page.

use std::rc::Rc;

use crate::color::Color;
use crate::content::font::PdfFont;
use crate::geometry::Matrix;

/// Parameters in effect at a point of a content stream.
#[derive(Debug, Clone)]
pub struct GraphicsState {
    /// Current transformation matrix (maps user space to page space)
    pub ctm: Matrix,
    /// Text matrix (maps text space to user space)
    pub text_matrix: Matrix,
    /// Text line matrix (saved position at start of line)
    pub text_line_matrix: Matrix,

    // Text state parameters
    /// Character spacing (Tc)
    pub char_space: f32,
    /// Word spacing (Tw)
    pub word_space: f32,
    /// Horizontal scaling percentage (Tz)
    pub horizontal_scaling: f32,
    /// Text leading (TL)
    pub leading: f32,
    /// Current font
    pub font: Option<Rc<PdfFont>>,
    /// Resource name the current font was selected by
    pub font_name: Option<String>,
    /// Current font size (Tf)
    pub font_size: f32,
    /// Text rise (Ts)
    pub text_rise: f32,
    /// Text rendering mode (Tr)
    pub render_mode: u8,

    /// Fill color
    pub fill_color: Color,
    /// Stroke color
    pub stroke_color: Color,
    /// Line width in user space
    pub line_width: f32,
}

impl GraphicsState {
    /// Create a graphics state with PDF defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_retext::content::GraphicsState;
    ///
    /// let state = GraphicsState::new();
    /// assert_eq!(state.horizontal_scaling, 100.0);
    /// assert!(state.font.is_none());
    /// ```
    pub fn new() -> Self {
        Self {
            ctm: Matrix::identity(),
            text_matrix: Matrix::identity(),
            text_line_matrix: Matrix::identity(),
            char_space: 0.0,
            word_space: 0.0,
            horizontal_scaling: 100.0,
            leading: 0.0,
            font: None,
            font_name: None,
            font_size: 12.0,
            text_rise: 0.0,
            render_mode: 0,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.0,
        }
    }

    /// Maps text space to page space, including font size, scaling and rise.
    pub fn text_rendering_matrix(&self) -> Matrix {
        Matrix::new(
            self.font_size * self.horizontal_scaling / 100.0,
            0.0,
            0.0,
            self.font_size,
            0.0,
            self.text_rise,
        )
        .multiply(&self.text_matrix)
        .multiply(&self.ctm)
    }

    /// Maps unscaled text space to page space.
    pub fn text_to_page(&self) -> Matrix {
        self.text_matrix.multiply(&self.ctm)
    }

    /// Whether shown text leaves marks (render mode 3 is invisible).
    pub fn text_visible(&self) -> bool {
        self.render_mode != 3 && self.render_mode != 7
    }

    /// Start a new line offset from the current line start (Td).
    pub fn move_text_position(&mut self, tx: f32, ty: f32) {
        self.text_line_matrix = Matrix::translation(tx, ty).multiply(&self.text_line_matrix);
        self.text_matrix = self.text_line_matrix;
    }

    /// Start the next line using the leading (T*).
    pub fn next_line(&mut self) {
        self.move_text_position(0.0, -self.leading);
    }

    /// Advance the text matrix horizontally after showing text.
    pub fn advance(&mut self, tx: f32) {
        self.text_matrix = Matrix::translation(tx, 0.0).multiply(&self.text_matrix);
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack of graphics states for save/restore operations.
///
/// PDF's q (save) and Q (restore) operators push and pop graphics states.
/// An unbalanced Q is ignored.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl GraphicsStateStack {
    /// Create a stack holding only the default state.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_retext::content::GraphicsStateStack;
    ///
    /// let stack = GraphicsStateStack::new();
    /// assert_eq!(stack.depth(), 1);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stack starting from `state`.
    pub fn with_state(state: GraphicsState) -> Self {
        Self {
            current: state,
            saved: Vec::new(),
        }
    }

    /// Current graphics state.
    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    /// Mutable access to the current graphics state.
    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    /// Save the current graphics state (q operator).
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Restore the previous graphics state (Q operator).
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    /// Number of states, including the current one.
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_restore() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().font_size = 14.0;

        stack.save();
        assert_eq!(stack.depth(), 2);
        stack.current_mut().font_size = 16.0;
        stack.current_mut().fill_color = Color::WHITE;

        stack.restore();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().font_size, 14.0);
        assert_eq!(stack.current().fill_color, Color::BLACK);
    }

    #[test]
    fn test_unbalanced_restore_ignored() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().line_width = 3.0;
        stack.restore();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().line_width, 3.0);
    }

    #[test]
    fn test_text_line_movement() {
        let mut state = GraphicsState::new();
        state.move_text_position(72.0, 700.0);
        state.advance(30.0);
        assert_eq!(state.text_matrix.e, 102.0);

        state.leading = 14.0;
        state.next_line();
        // T* starts from the line start, not the advanced position
        assert_eq!(state.text_matrix.e, 72.0);
        assert_eq!(state.text_matrix.f, 686.0);
    }

    #[test]
    fn test_text_rendering_matrix() {
        let mut state = GraphicsState::new();
        state.font_size = 10.0;
        state.horizontal_scaling = 50.0;
        state.text_rise = 2.0;
        state.ctm = Matrix::translation(0.0, 100.0);
        state.move_text_position(20.0, 30.0);

        let trm = state.text_rendering_matrix();
        assert_eq!(trm.a, 5.0);
        assert_eq!(trm.d, 10.0);
        assert_eq!(trm.e, 20.0);
        assert_eq!(trm.f, 132.0);
    }

    #[test]
    fn test_invisible_render_mode() {
        let mut state = GraphicsState::new();
        assert!(state.text_visible());
        state.render_mode = 3;
        assert!(!state.text_visible());
    }
}
