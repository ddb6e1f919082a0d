use serde::{Deserialize, Serialize};

/// Invalid tuning value passed to [`CropAdjustParams`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("threshold must be a finite value in [0, 1] (got {0})")]
    Threshold(f32),
    #[error("expand ratio must be finite and non-negative (got {0})")]
    ExpandRatio(f32),
}

/// Tuning for the edge scanner and the final margin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropAdjustParams {
    /// Minimum fraction of dark pixels for a line to count as content.
    ///
    /// The comparison is inclusive. A line with no dark pixel at all is never
    /// content, so `0.0` means "any dark pixel".
    pub threshold: f32,
    /// Maximum number of rows/columns an edge may move.
    pub search_range: usize,
    /// Half-width of the intensity band around the dark reference.
    pub tolerance: u8,
    /// Margin added on each side, as a fraction of the scanned size.
    pub expand_ratio: f32,
}

impl CropAdjustParams {
    pub const DEFAULT: Self = Self {
        threshold: 0.0,
        search_range: 20,
        tolerance: 20,
        expand_ratio: 0.1,
    };

    pub fn with_threshold(self, threshold: f32) -> Result<Self, ParamsError> {
        check_threshold(threshold)?;
        Ok(Self { threshold, ..self })
    }

    pub fn with_search_range(self, search_range: usize) -> Self {
        Self {
            search_range,
            ..self
        }
    }

    pub fn with_tolerance(self, tolerance: u8) -> Self {
        Self { tolerance, ..self }
    }

    pub fn with_expand_ratio(self, expand_ratio: f32) -> Result<Self, ParamsError> {
        check_expand_ratio(expand_ratio)?;
        Ok(Self {
            expand_ratio,
            ..self
        })
    }

    /// Check values that can be set directly through the public fields.
    pub fn validate(&self) -> Result<(), ParamsError> {
        check_threshold(self.threshold)?;
        check_expand_ratio(self.expand_ratio)
    }
}

impl Default for CropAdjustParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_threshold(threshold: f32) -> Result<(), ParamsError> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ParamsError::Threshold(threshold))
    }
}

fn check_expand_ratio(expand_ratio: f32) -> Result<(), ParamsError> {
    if expand_ratio.is_finite() && expand_ratio >= 0.0 {
        Ok(())
    } else {
        Err(ParamsError::ExpandRatio(expand_ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_return_new_value() {
        let base = CropAdjustParams::default();
        let tuned = base
            .with_threshold(0.5)
            .and_then(|p| p.with_expand_ratio(0.0))
            .expect("valid overrides")
            .with_search_range(5)
            .with_tolerance(3);

        assert_eq!(base, CropAdjustParams::DEFAULT);
        assert_eq!(tuned.threshold, 0.5);
        assert_eq!(tuned.search_range, 5);
        assert_eq!(tuned.tolerance, 3);
        assert_eq!(tuned.expand_ratio, 0.0);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let p = CropAdjustParams::default();
        assert_eq!(p.with_threshold(1.5), Err(ParamsError::Threshold(1.5)));
        assert!(p.with_threshold(f32::NAN).is_err());
        assert_eq!(
            p.with_expand_ratio(-0.1),
            Err(ParamsError::ExpandRatio(-0.1))
        );

        let direct = CropAdjustParams {
            threshold: -0.2,
            ..p
        };
        assert!(direct.validate().is_err());
    }

    #[test]
    fn json_fills_missing_fields_from_defaults() {
        let p: CropAdjustParams =
            serde_json::from_str(r#"{ "threshold": 0.25 }"#).expect("parse");
        assert_eq!(p.threshold, 0.25);
        assert_eq!(p.search_range, 20);
        assert_eq!(p.tolerance, 20);
        assert_eq!(p.expand_ratio, 0.1);
    }
}
