//! Export formats and deterministic export filenames.
//!
//! Filenames follow `<slug>-flowchart-<YYYY-MM-DD>.<extension>`, so exporting
//! the same product twice on one day yields the same name.

use std::fmt;

use chrono::NaiveDate;

/// File formats the viewer can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Standalone SVG markup.
    Svg,
    /// Raster snapshot encoded as PNG.
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }

    /// MIME type of the downloadable blob.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "SVG"),
            Self::Png => write!(f, "PNG"),
        }
    }
}

/// Lowercases `name` and replaces every run of whitespace with one `-`.
///
/// Leading and trailing whitespace runs become hyphens as well; nothing else
/// is stripped. Whitespace here is the browser regex `\s` class: Unicode
/// `White_Space` plus the byte order mark U+FEFF, minus NEL U+0085.
///
/// # Examples
///
/// ```
/// use sowchart_core::filename::slugify;
///
/// assert_eq!(slugify("Consumer  Login"), "consumer-login");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.chars() {
        if is_separator(c) {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }

    slug
}

fn is_separator(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Builds the export filename for `product_name` on `date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use sowchart_core::filename::generate_filename;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
/// assert_eq!(
///     generate_filename("Consumer Login", "svg", date),
///     "consumer-login-flowchart-2024-03-07.svg",
/// );
/// ```
pub fn generate_filename(product_name: &str, extension: &str, date: NaiveDate) -> String {
    format!(
        "{}-flowchart-{}.{extension}",
        slugify(product_name),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_filename_example() {
        assert_eq!(
            generate_filename("Consumer Login", "svg", date(2024, 3, 7)),
            "consumer-login-flowchart-2024-03-07.svg"
        );
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(
            generate_filename("A   B", "png", date(2024, 12, 31)),
            "a-b-flowchart-2024-12-31.png"
        );
        assert_eq!(slugify("A \t\n B"), "a-b");
    }

    #[test]
    fn test_outer_whitespace_becomes_hyphen() {
        assert_eq!(slugify("  NAO "), "-nao-");
    }

    #[test]
    fn test_lowercasing_is_word_aware() {
        assert_eq!(slugify("ΟΔΟΣ"), "οδος");
        assert_eq!(slugify("ΟΔΟΣ ΑΒ"), "οδος-αβ");
    }

    #[test]
    fn test_separator_set() {
        assert_eq!(slugify("A\u{feff}B"), "a-b");
        assert_eq!(slugify("A\u{a0}\u{2028}B"), "a-b");
        assert_eq!(slugify("A\u{85}B"), "a\u{85}b");
    }

    #[test]
    fn test_bundled_product_names() {
        assert_eq!(
            generate_filename("NAO", ExportFormat::Png.extension(), date(2025, 1, 2)),
            "nao-flowchart-2025-01-02.png"
        );
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Svg.extension(), "svg");
        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Png.mime_type(), "image/png");
        assert_eq!(ExportFormat::Png.to_string(), "PNG");
    }

    proptest! {
        #[test]
        fn prop_generate_filename_is_deterministic(
            name in "\\PC{0,40}",
            ext in "[a-z]{1,4}",
            days in 0i64..40_000,
        ) {
            let day = date(1970, 1, 1) + chrono::Duration::days(days);
            prop_assert_eq!(
                generate_filename(&name, &ext, day),
                generate_filename(&name, &ext, day)
            );
        }

        #[test]
        fn prop_slug_has_no_whitespace_or_double_hyphen_from_spacing(
            words in proptest::collection::vec("[A-Za-z0-9]{1,8}", 1..6),
            gaps in proptest::collection::vec("[ \t\n]{1,5}", 5),
        ) {
            let mut name = String::new();
            for (i, word) in words.iter().enumerate() {
                if i > 0 {
                    name.push_str(&gaps[i - 1]);
                }
                name.push_str(word);
            }

            let slug = slugify(&name);
            prop_assert!(!slug.chars().any(char::is_whitespace));
            prop_assert!(!slug.contains("--"));
            prop_assert_eq!(slug, words.join("-").to_lowercase());
        }

        #[test]
        fn prop_filename_layout(name in "[A-Za-z ]{0,20}", days in 0i64..40_000) {
            let day = date(2000, 1, 1) + chrono::Duration::days(days);
            let filename = generate_filename(&name, "svg", day);
            let expected_suffix = format!("-flowchart-{}.svg", day.format("%Y-%m-%d"));
            prop_assert!(filename.ends_with(&expected_suffix));
        }
    }
}
