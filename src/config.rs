//! Configuration for text replacement.

/// Text replacement configuration.
///
/// All pixel quantities are in raster space at [`render_scale`](Self::render_scale);
/// all point quantities are in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceConfig {
    /// Oversampling factor used when rasterizing a page for color sampling.
    pub render_scale: f32,

    /// Edge length (px) of each corner sample used for the background estimate.
    pub background_sample_size: f32,

    /// Gap (px) between the match box and each corner sample.
    pub background_margin: f32,

    /// Edge length (px) of the center patch used for the foreground estimate.
    pub foreground_sample_size: f32,

    /// Summed per-channel difference above which the center patch counts as ink.
    pub foreground_contrast_threshold: f32,

    /// Fraction of the box width the replacement may occupy.
    pub width_safety_margin: f32,

    /// Largest absolute shear component (b or c) still treated as upright text.
    pub rotation_tolerance: f32,

    /// Smallest font size (pt) a replacement is drawn at; smaller fits are rejected.
    pub min_font_size: f32,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplaceConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            render_scale: 2.0,
            background_sample_size: 4.0,
            background_margin: 5.0,
            foreground_sample_size: 2.0,
            foreground_contrast_threshold: 0.2,
            width_safety_margin: 0.95,
            rotation_tolerance: 0.01,
            min_font_size: 1.0,
        }
    }

    /// Set the rasterization scale. Non-positive values are ignored.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        if scale > 0.0 && scale.is_finite() {
            self.render_scale = scale;
        }
        self
    }

    /// Set the minimum replacement font size.
    pub fn with_min_font_size(mut self, size: f32) -> Self {
        self.min_font_size = size.max(0.0);
        self
    }

    /// Set the rotation tolerance.
    pub fn with_rotation_tolerance(mut self, tolerance: f32) -> Self {
        self.rotation_tolerance = tolerance.abs();
        self
    }

    /// Set the foreground contrast threshold.
    pub fn with_foreground_contrast_threshold(mut self, threshold: f32) -> Self {
        self.foreground_contrast_threshold = threshold;
        self
    }

    /// Set the background sampling geometry (sample edge and margin, in pixels).
    pub fn with_background_sampling(mut self, sample_size: f32, margin: f32) -> Self {
        self.background_sample_size = sample_size.max(1.0);
        self.background_margin = margin.max(0.0);
        self
    }

    /// Set the horizontal safety margin, clamped to `(0, 1]`.
    pub fn with_width_safety_margin(mut self, margin: f32) -> Self {
        self.width_safety_margin = margin.clamp(f32::EPSILON, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReplaceConfig::default();
        assert_eq!(config.render_scale, 2.0);
        assert_eq!(config.background_sample_size, 4.0);
        assert_eq!(config.background_margin, 5.0);
        assert_eq!(config.foreground_sample_size, 2.0);
        assert_eq!(config.foreground_contrast_threshold, 0.2);
        assert_eq!(config.width_safety_margin, 0.95);
        assert_eq!(config.rotation_tolerance, 0.01);
        assert_eq!(config.min_font_size, 1.0);
    }

    #[test]
    fn test_builder() {
        let config = ReplaceConfig::new()
            .with_render_scale(3.0)
            .with_min_font_size(4.0)
            .with_rotation_tolerance(-0.05)
            .with_background_sampling(6.0, 2.0);

        assert_eq!(config.render_scale, 3.0);
        assert_eq!(config.min_font_size, 4.0);
        assert_eq!(config.rotation_tolerance, 0.05);
        assert_eq!(config.background_sample_size, 6.0);
        assert_eq!(config.background_margin, 2.0);
    }

    #[test]
    fn test_invalid_scale_ignored() {
        let config = ReplaceConfig::new().with_render_scale(0.0);
        assert_eq!(config.render_scale, 2.0);
        let config = ReplaceConfig::new().with_render_scale(f32::NAN);
        assert_eq!(config.render_scale, 2.0);
    }

    #[test]
    fn test_width_margin_clamped() {
        let config = ReplaceConfig::new().with_width_safety_margin(1.5);
        assert_eq!(config.width_safety_margin, 1.0);
    }
}
