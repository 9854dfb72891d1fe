//! Layout tuning constants.
//!
//! The product variants disagree on seam overlaps, stacking gaps and frame
//! floors, so every such value is a named field here rather than a literal in
//! the layout code. Hosts can override any subset from JSON.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Tunable values used by the layout engine and the interaction smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConstants {
    /// Floor for dimensions and prototype sizes before dividing.
    pub epsilon: f32,
    /// Horizontal overlap between adjacent grid columns (hides the shared seam).
    pub column_overlap: f32,
    /// Vertical overlap between adjacent grid rows.
    pub row_overlap: f32,
    /// Vertical gap left between stacked parts.
    pub stack_gap: f32,
    /// Minimum height of the stretched frame.
    pub frame_min_height: f32,
    /// Thickness of procedural shelf boards.
    pub shelf_thickness: f32,
    /// Fraction of the current-to-target distance covered per tick.
    pub smoothing_factor: f32,
    /// Distance below which a moving part snaps onto its target.
    pub snap_epsilon: f32,
    /// Opening angle of hinged doors, in radians.
    pub hinge_open_angle: f32,
    /// How far sliders travel, as a fraction of their depth.
    pub slider_open_fraction: f32,
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            column_overlap: 0.042,
            row_overlap: 0.042,
            stack_gap: 0.005,
            frame_min_height: 0.4,
            shelf_thickness: 0.05,
            smoothing_factor: 0.16,
            snap_epsilon: 0.001,
            hinge_open_angle: std::f32::consts::PI * 0.6,
            slider_open_fraction: 0.9,
        }
    }
}

impl LayoutConstants {
    /// Parse constants from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let constants: Self = serde_json::from_str(json)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject values the layout math cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::InvalidConstant {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(ConfigError::InvalidConstant {
                name: "smoothingFactor",
                value: self.smoothing_factor,
            });
        }
        let non_negative = [
            ("columnOverlap", self.column_overlap),
            ("rowOverlap", self.row_overlap),
            ("stackGap", self.stack_gap),
            ("frameMinHeight", self.frame_min_height),
            ("shelfThickness", self.shelf_thickness),
            ("snapEpsilon", self.snap_epsilon),
            ("sliderOpenFraction", self.slider_open_fraction),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidConstant { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LayoutConstants::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let constants =
            LayoutConstants::from_json(r#"{"columnOverlap": 0.03, "stackGap": 0.0}"#).unwrap();
        assert_eq!(constants.column_overlap, 0.03);
        assert_eq!(constants.stack_gap, 0.0);
        assert_eq!(constants.row_overlap, LayoutConstants::default().row_overlap);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = LayoutConstants::from_json(r#"{"smoothingFactor": 0.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConstant { name: "smoothingFactor", .. }));

        let err = LayoutConstants::from_json(r#"{"stackGap": -1.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConstant { name: "stackGap", .. }));

        assert!(matches!(
            LayoutConstants::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
