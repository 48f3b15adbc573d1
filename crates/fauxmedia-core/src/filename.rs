//! Size-variant filename decomposition
//!
//! Generated image sizes are stored next to the original as `name-WIDTHxHEIGHT.ext`.
//! Decomposing a requested path recovers the canonical upload and the requested size.

use regex::Regex;
use std::sync::OnceLock;

/// Result of decomposing a path relative to the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedFilename {
    /// Filename with the `-WxH` infix removed (or the input unchanged).
    pub canonical: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DecomposedFilename {
    /// Whether the path carried a `-WxH` size suffix.
    pub fn is_size_variant(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

fn size_variant_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy prefix so the suffix closest to the final extension wins.
    RE.get_or_init(|| {
        Regex::new(r"^(?s)(.+)-(\d+)x(\d+)(\.\w+)$").expect("size variant pattern is valid")
    })
}

/// Split `prefix-WxH.ext` into canonical `prefix.ext` plus the requested dimensions.
///
/// Digit runs too long for `u32` are treated as unresolved dimensions.
pub fn decompose(relative_path: &str) -> DecomposedFilename {
    match size_variant_regex().captures(relative_path) {
        Some(caps) => DecomposedFilename {
            canonical: format!("{}{}", &caps[1], &caps[4]),
            width: caps[2].parse().ok(),
            height: caps[3].parse().ok(),
        },
        None => DecomposedFilename {
            canonical: relative_path.to_string(),
            width: None,
            height: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_size_variant() {
        let d = decompose("photo-300x200.jpg");
        assert_eq!(d.canonical, "photo.jpg");
        assert_eq!(d.width, Some(300));
        assert_eq!(d.height, Some(200));
        assert!(d.is_size_variant());
    }

    #[test]
    fn test_decompose_keeps_directories() {
        let d = decompose("2013/05/my-holiday-photo-1024x768.png");
        assert_eq!(d.canonical, "2013/05/my-holiday-photo.png");
        assert_eq!((d.width, d.height), (Some(1024), Some(768)));
    }

    #[test]
    fn test_decompose_without_suffix_is_unchanged() {
        for path in ["photo.jpg", "2013/05/photo.jpg", "photo-300x.jpg", "photox200.jpg", "README"] {
            let d = decompose(path);
            assert_eq!(d.canonical, path);
            assert_eq!(d.width, None);
            assert_eq!(d.height, None);
            assert!(!d.is_size_variant());
        }
    }

    #[test]
    fn test_decompose_uses_suffix_closest_to_extension() {
        let d = decompose("banner-10x20-300x200.jpg");
        assert_eq!(d.canonical, "banner-10x20.jpg");
        assert_eq!((d.width, d.height), (Some(300), Some(200)));
    }

    #[test]
    fn test_decompose_anchors_to_final_extension() {
        // The suffix must sit right before the last extension.
        let d = decompose("archive-10x20.tar.gz");
        assert_eq!(d.canonical, "archive-10x20.tar.gz");
        assert_eq!(d.width, None);

        let d = decompose("photo-300x200.jpg.webp");
        assert_eq!(d.canonical, "photo-300x200.jpg.webp");
    }

    #[test]
    fn test_decompose_arbitrary_digit_strings() {
        for (w, h) in [("1", "1"), ("007", "42"), ("4096", "2160")] {
            let d = decompose(&format!("x-{}x{}.gif", w, h));
            assert_eq!(d.canonical, "x.gif");
            assert_eq!(d.width, w.parse().ok());
            assert_eq!(d.height, h.parse().ok());
        }
    }

    #[test]
    fn test_decompose_overflowing_digits_leave_dimension_unresolved() {
        let d = decompose("x-99999999999x10.gif");
        assert_eq!(d.canonical, "x.gif");
        assert_eq!(d.width, None);
        assert_eq!(d.height, Some(10));
    }
}
