//! Aspect-ratio tags and their conversion to pixel dimensions.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{BaseDimensions, ImageSize};

static RATIO: OnceLock<Regex> = OnceLock::new();

/// A `width:height` ratio with both components positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    width: u32,
    height: u32,
}

/// Why a ratio string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioError {
    /// Not of the form `<digits>:<digits>`.
    Malformed,
    /// A component is zero.
    Degenerate,
    /// A component, or the side derived from it, does not fit in `u32`.
    Oversized,
}

impl AspectRatio {
    /// Parse `16:9`-style ratios. Surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Result<Self, RatioError> {
        let re = RATIO
            .get_or_init(|| Regex::new(r"^([0-9]+):([0-9]+)$").expect("ratio pattern is valid"));
        let caps = re.captures(value.trim()).ok_or(RatioError::Malformed)?;
        let component = |i: usize| -> Result<u32, RatioError> {
            caps.get(i)
                .ok_or(RatioError::Malformed)?
                .as_str()
                .parse::<u32>()
                .map_err(|_| RatioError::Oversized)
        };
        let (width, height) = (component(1)?, component(2)?);
        if width == 0 || height == 0 {
            return Err(RatioError::Degenerate);
        }
        Ok(Self { width, height })
    }

    pub fn value(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Scale `base` to this ratio, keeping one base side fixed.
    ///
    /// A ratio wider than the base keeps the base height; otherwise the base
    /// width is kept. The derived side is truncated toward zero, and a ratio
    /// equal to the base ratio returns the base unchanged. A derived side
    /// beyond `u32::MAX` is rejected as [`RatioError::Oversized`].
    pub fn dimensions_for(&self, base: BaseDimensions) -> Result<ImageSize, RatioError> {
        let requested = self.value();
        if requested > base.ratio() {
            let width = derived_side(f64::from(base.height()) * requested)?;
            Ok(ImageSize::new(width, base.height()))
        } else {
            let height = derived_side(f64::from(base.width()) / requested)?;
            Ok(ImageSize::new(base.width(), height))
        }
    }
}

fn derived_side(exact: f64) -> Result<u32, RatioError> {
    let side = exact.trunc();
    if side > f64::from(u32::MAX) {
        return Err(RatioError::Oversized);
    }
    Ok(side as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseDimensions {
        BaseDimensions::new(800, 1422).unwrap()
    }

    #[test]
    fn wide_ratio_keeps_base_height() {
        let size = AspectRatio::parse("16:9").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(2528, 1422));
    }

    #[test]
    fn taller_ratio_keeps_base_width() {
        let size = AspectRatio::parse("1:2").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(800, 1600));
        let size = AspectRatio::parse("9:21").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(800, 1866));
    }

    #[test]
    fn portrait_ratio_wider_than_base_truncates_width() {
        let size = AspectRatio::parse("3:4").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(1066, 1422));
    }

    #[test]
    fn square_on_portrait_base() {
        let size = AspectRatio::parse("1:1").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(1422, 1422));
    }

    #[test]
    fn equal_ratio_is_identity() {
        let base = BaseDimensions::new(1024, 768).unwrap();
        let size = AspectRatio::parse("4:3").unwrap().dimensions_for(base).unwrap();
        assert_eq!(size, ImageSize::new(1024, 768));
    }

    #[test]
    fn nine_sixteen_on_default_base() {
        let size = AspectRatio::parse("9:16").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(800, 1422));
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert!(AspectRatio::parse("  21:9 ").is_ok());
    }

    #[test]
    fn rejects_bad_ratios() {
        assert_eq!(AspectRatio::parse("16x9"), Err(RatioError::Malformed));
        assert_eq!(AspectRatio::parse("16:9:1"), Err(RatioError::Malformed));
        assert_eq!(AspectRatio::parse("1.5:1"), Err(RatioError::Malformed));
        assert_eq!(AspectRatio::parse("0:9"), Err(RatioError::Degenerate));
        assert_eq!(AspectRatio::parse("16:0"), Err(RatioError::Degenerate));
    }

    #[test]
    fn component_beyond_u32_is_oversized() {
        assert_eq!(AspectRatio::parse("99999999999:1"), Err(RatioError::Oversized));
        assert_eq!(AspectRatio::parse("1:4294967296"), Err(RatioError::Oversized));
    }

    #[test]
    fn derived_side_beyond_u32_is_rejected() {
        let ratio = AspectRatio::parse("4000000000:1").unwrap();
        assert_eq!(ratio.dimensions_for(base()), Err(RatioError::Oversized));
        let ratio = AspectRatio::parse("1:4000000000").unwrap();
        assert_eq!(ratio.dimensions_for(base()), Err(RatioError::Oversized));
        // 3000000:1 against height 1422 stays just under the limit.
        let size = AspectRatio::parse("3000000:1").unwrap().dimensions_for(base()).unwrap();
        assert_eq!(size, ImageSize::new(4_266_000_000, 1422));
    }
}
