//! Placeholder URL builders
//!
//! Every builder is a pure function of (canonical filename, dimensions, attachment id).
//! The built-in services are described as data in [`BUILTIN_BUILDERS`] rather than one
//! function per variant.

mod registry;

pub use registry::{normalize_builder_name, BuilderRegistry};

use crate::dimensions::ResolvedDimensions;
use crate::models::AttachmentId;
use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

/// Inputs shared by every builder and by the final URL rewrite hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderArgs {
    /// Canonical (unsuffixed) path relative to the upload root.
    pub attached_file: String,
    pub dimensions: ResolvedDimensions,
    pub attachment_id: AttachmentId,
}

/// Maps placeholder arguments to a fully qualified placeholder-service URL.
pub trait PlaceholderUrlBuilder: Send + Sync {
    fn build(&self, args: &PlaceholderArgs) -> String;
}

impl<F> PlaceholderUrlBuilder for F
where
    F: Fn(&PlaceholderArgs) -> String + Send + Sync,
{
    fn build(&self, args: &PlaceholderArgs) -> String {
        self(args)
    }
}

/// The built-in placeholder services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinBuilder {
    /// placehold.it with filename-derived colors and a size label.
    PlaceholdIt,
    PlaceKitten { grayscale: bool },
    LoremPixel {
        theme: Option<&'static str>,
        grayscale: bool,
    },
}

/// Registered name for each built-in builder.
pub const BUILTIN_BUILDERS: &[(&str, BuiltinBuilder)] = &[
    ("placeholdit", BuiltinBuilder::PlaceholdIt),
    ("placekitten_color", BuiltinBuilder::PlaceKitten { grayscale: false }),
    ("placekitten_grayscale", BuiltinBuilder::PlaceKitten { grayscale: true }),
    ("lorempixel", lorempixel(None, false)),
    ("lorempixel_grayscale", lorempixel(None, true)),
    ("lorempixel_abstract", lorempixel(Some("abstract"), false)),
    ("lorempixel_abstract_grayscale", lorempixel(Some("abstract"), true)),
    ("lorempixel_animals", lorempixel(Some("animals"), false)),
    ("lorempixel_animals_grayscale", lorempixel(Some("animals"), true)),
    ("lorempixel_business", lorempixel(Some("business"), false)),
    ("lorempixel_business_grayscale", lorempixel(Some("business"), true)),
    ("lorempixel_cats", lorempixel(Some("cats"), false)),
    ("lorempixel_cats_grayscale", lorempixel(Some("cats"), true)),
    ("lorempixel_city", lorempixel(Some("city"), false)),
    ("lorempixel_city_grayscale", lorempixel(Some("city"), true)),
    ("lorempixel_food", lorempixel(Some("food"), false)),
    ("lorempixel_food_grayscale", lorempixel(Some("food"), true)),
    ("lorempixel_nightlife", lorempixel(Some("nightlife"), false)),
    ("lorempixel_nightlife_grayscale", lorempixel(Some("nightlife"), true)),
    ("lorempixel_fashion", lorempixel(Some("fashion"), false)),
    ("lorempixel_fashion_grayscale", lorempixel(Some("fashion"), true)),
    ("lorempixel_people", lorempixel(Some("people"), false)),
    ("lorempixel_people_grayscale", lorempixel(Some("people"), true)),
    ("lorempixel_nature", lorempixel(Some("nature"), false)),
    ("lorempixel_nature_grayscale", lorempixel(Some("nature"), true)),
    ("lorempixel_sports", lorempixel(Some("sports"), false)),
    ("lorempixel_sports_grayscale", lorempixel(Some("sports"), true)),
    ("lorempixel_technics", lorempixel(Some("technics"), false)),
    ("lorempixel_technics_grayscale", lorempixel(Some("technics"), true)),
    ("lorempixel_transport", lorempixel(Some("transport"), false)),
    ("lorempixel_transport_grayscale", lorempixel(Some("transport"), true)),
];

const fn lorempixel(theme: Option<&'static str>, grayscale: bool) -> BuiltinBuilder {
    BuiltinBuilder::LoremPixel { theme, grayscale }
}

/// Form-style encoding: alphanumerics and `-_.` pass through, space becomes `+`.
const LABEL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn encode_label(label: &str) -> String {
    utf8_percent_encode(label, LABEL_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

/// Basename of `attached_file` with its extension stripped.
fn display_name(attached_file: &str) -> &str {
    let base = attached_file.rsplit('/').next().unwrap_or(attached_file);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.trim_end_matches('.'),
        _ => base,
    }
}

/// Background and foreground colors from the MD5 of the canonical filename.
pub fn filename_colors(attached_file: &str) -> (String, String) {
    let hash = hex::encode(Md5::digest(attached_file.as_bytes()));
    (hash[0..6].to_string(), hash[6..12].to_string())
}

impl BuiltinBuilder {
    fn placeholdit(args: &PlaceholderArgs) -> String {
        let (bgcolor, fgcolor) = filename_colors(&args.attached_file);
        let width = args.dimensions.width_str();
        let height = args.dimensions.height_str();
        let label = format!(
            "{} ({}x{})",
            display_name(&args.attached_file),
            width,
            height
        );
        // Output format is fixed to PNG
        format!(
            "http://placehold.it/{}x{}/{}/{}/png&text={}",
            width,
            height,
            bgcolor,
            fgcolor,
            encode_label(&label)
        )
    }
}

impl PlaceholderUrlBuilder for BuiltinBuilder {
    fn build(&self, args: &PlaceholderArgs) -> String {
        let width = args.dimensions.width_str();
        let height = args.dimensions.height_str();
        match self {
            BuiltinBuilder::PlaceholdIt => Self::placeholdit(args),
            BuiltinBuilder::PlaceKitten { grayscale } => {
                let g = if *grayscale { "g/" } else { "" };
                format!("http://placekitten.com/{}{}/{}", g, width, height)
            }
            BuiltinBuilder::LoremPixel { theme, grayscale } => {
                let g = if *grayscale { "g/" } else { "" };
                let mut url = format!("http://lorempixel.com/{}{}/{}", g, width, height);
                if let Some(theme) = theme {
                    url.push('/');
                    url.push_str(theme);
                }
                url
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn args(file: &str, width: Option<u32>, height: Option<u32>) -> PlaceholderArgs {
        PlaceholderArgs {
            attached_file: file.to_string(),
            dimensions: ResolvedDimensions { width, height },
            attachment_id: 42,
        }
    }

    #[test]
    fn test_filename_colors_are_md5_halves() {
        // md5("foo.jpg") = d271cbfe95ae3584ade8cac317193995
        let (bg, fg) = filename_colors("foo.jpg");
        assert_eq!(bg, "d271cb");
        assert_eq!(fg, "fe95ae");
    }

    #[test]
    fn test_placeholdit_url() {
        let url = BuiltinBuilder::PlaceholdIt.build(&args("2013/05/photo.jpg", Some(300), Some(200)));
        // md5("2013/05/photo.jpg") = 7d5303b7b26bbf14c891a5872c28013d
        assert_eq!(
            url,
            "http://placehold.it/300x200/7d5303/b7b26b/png&text=photo+%28300x200%29"
        );
    }

    #[test]
    fn test_placeholdit_label_encoding() {
        let url = BuiltinBuilder::PlaceholdIt.build(&args("my café.jpeg", None, Some(5)));
        assert!(url.starts_with("http://placehold.it/x5/"));
        assert!(url.ends_with("&text=my+caf%C3%A9+%28x5%29"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("2013/05/photo.jpg"), "photo");
        assert_eq!(display_name("archive.tar.gz"), "archive.tar");
        assert_eq!(display_name("README"), "README");
        assert_eq!(display_name(".hidden"), ".hidden");
    }

    #[test]
    fn test_placekitten_urls() {
        let a = args("a.jpg", Some(300), Some(200));
        assert_eq!(
            BuiltinBuilder::PlaceKitten { grayscale: false }.build(&a),
            "http://placekitten.com/300/200"
        );
        assert_eq!(
            BuiltinBuilder::PlaceKitten { grayscale: true }.build(&a),
            "http://placekitten.com/g/300/200"
        );
    }

    #[test]
    fn test_lorempixel_urls() {
        let a = args("a.jpg", Some(640), Some(480));
        assert_eq!(lorempixel(None, false).build(&a), "http://lorempixel.com/640/480");
        assert_eq!(lorempixel(None, true).build(&a), "http://lorempixel.com/g/640/480");
        assert_eq!(
            lorempixel(Some("cats"), false).build(&a),
            "http://lorempixel.com/640/480/cats"
        );
        assert_eq!(
            lorempixel(Some("cats"), true).build(&a),
            "http://lorempixel.com/g/640/480/cats"
        );
    }

    #[test]
    fn test_lorempixel_family_is_width_then_height_and_distinct() {
        let a = args("a.jpg", Some(11), Some(22));
        let mut seen = HashSet::new();
        for (name, builder) in BUILTIN_BUILDERS {
            if !name.starts_with("lorempixel") {
                continue;
            }
            let url = builder.build(&a);
            let rest = url
                .strip_prefix("http://lorempixel.com/")
                .expect("lorempixel host");
            let rest = rest.strip_prefix("g/").unwrap_or(rest);
            assert!(rest.starts_with("11/22"), "{} -> {}", name, url);
            assert_eq!(url.contains("/g/"), name.ends_with("_grayscale"), "{}", name);
            assert!(seen.insert(url), "duplicate URL for {}", name);
        }
        // base + 13 themes, each with a grayscale sibling
        assert_eq!(seen.len(), 28);
    }

    #[test]
    fn test_builders_are_deterministic() {
        let a = args("2020/01/x-y.png", Some(1), Some(2));
        for (_, builder) in BUILTIN_BUILDERS {
            assert_eq!(builder.build(&a), builder.build(&a));
        }
    }

    #[test]
    fn test_closure_builder() {
        let custom = |a: &PlaceholderArgs| format!("https://dummyimage.com/{}", a.dimensions.width_str());
        assert_eq!(custom.build(&args("a.jpg", Some(9), None)), "https://dummyimage.com/9");
    }
}
