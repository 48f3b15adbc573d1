//! Dimension fallback chain
//!
//! Each axis resolves independently: filename suffix, then the attachment's stored
//! original size, then the site-wide default. Zero counts as absent at every tier.

use serde::Serialize;

/// Candidate values for one axis, highest precedence first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionSources {
    pub from_filename: Option<u32>,
    pub from_attachment: Option<u32>,
    pub site_default: Option<u32>,
}

impl DimensionSources {
    pub fn resolve(&self) -> Option<u32> {
        [self.from_filename, self.from_attachment, self.site_default]
            .into_iter()
            .flatten()
            .find(|v| *v > 0)
    }
}

/// Final dimensions handed to a placeholder builder.
///
/// An axis is `None` only when all three tiers were empty; builders render it as an
/// empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResolvedDimensions {
    pub fn resolve(width: DimensionSources, height: DimensionSources) -> Self {
        Self {
            width: width.resolve(),
            height: height.resolve(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Width as it appears in a URL template.
    pub fn width_str(&self) -> String {
        self.width.map(|w| w.to_string()).unwrap_or_default()
    }

    /// Height as it appears in a URL template.
    pub fn height_str(&self) -> String {
        self.height.map(|h| h.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILENAME: u32 = 300;
    const ATTACHMENT: u32 = 640;
    const DEFAULT: u32 = 1024;

    fn sources(mask: u8) -> DimensionSources {
        DimensionSources {
            from_filename: (mask & 0b100 != 0).then_some(FILENAME),
            from_attachment: (mask & 0b010 != 0).then_some(ATTACHMENT),
            site_default: (mask & 0b001 != 0).then_some(DEFAULT),
        }
    }

    fn expected(mask: u8) -> Option<u32> {
        if mask & 0b100 != 0 {
            Some(FILENAME)
        } else if mask & 0b010 != 0 {
            Some(ATTACHMENT)
        } else if mask & 0b001 != 0 {
            Some(DEFAULT)
        } else {
            None
        }
    }

    #[test]
    fn test_precedence_all_combinations_per_axis() {
        for mask in 0u8..8 {
            assert_eq!(sources(mask).resolve(), expected(mask), "mask {:03b}", mask);
        }
    }

    #[test]
    fn test_axes_resolve_independently() {
        for width_mask in 0u8..8 {
            for height_mask in 0u8..8 {
                let dims = ResolvedDimensions::resolve(sources(width_mask), sources(height_mask));
                assert_eq!(dims.width, expected(width_mask));
                assert_eq!(dims.height, expected(height_mask));
            }
        }
    }

    #[test]
    fn test_zero_counts_as_absent() {
        let s = DimensionSources {
            from_filename: Some(0),
            from_attachment: Some(0),
            site_default: Some(500),
        };
        assert_eq!(s.resolve(), Some(500));
    }

    #[test]
    fn test_unresolved_axis_renders_empty() {
        let dims = ResolvedDimensions {
            width: Some(10),
            height: None,
        };
        assert!(!dims.is_complete());
        assert_eq!(dims.width_str(), "10");
        assert_eq!(dims.height_str(), "");
    }
}
