// src/output/paths.rs
//! Pure functions for filename generation.

use crate::constants::{DATE_FORMAT, FILENAME_INVALID_CHARS};
use crate::model::Category;
use chrono::NaiveDate;

/// Replaces each filesystem-invalid character (`/ \ : * ? " < > |`) with `_`.
///
/// Every other character is kept as is, including spaces and non-Latin scripts.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if FILENAME_INVALID_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Filename for an exported entry. Diary entries get a `YYYY-MM-DD_` prefix.
pub fn entry_filename(title: &str, category: Category, date: NaiveDate) -> String {
    let stem = sanitize_filename(title);
    match category {
        Category::Blog => format!("{}.md", stem),
        Category::Diary => format!("{}_{}.md", date.format(DATE_FORMAT), stem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello/World"), "Hello_World");
        assert_eq!(sanitize_filename("Test:File*Name"), "Test_File_Name");
        assert_eq!(
            sanitize_filename(r#"a\b?c"d<e>f|g"#),
            "a_b_c_d_e_f_g"
        );
        assert_eq!(sanitize_filename("  spaces kept  "), "  spaces kept  ");
        assert_eq!(sanitize_filename("日本語のタイトル"), "日本語のタイトル");
    }

    #[test]
    fn test_blog_filename() {
        assert_eq!(
            entry_filename("First Post", Category::Blog, day()),
            "First Post.md"
        );
        assert_eq!(
            entry_filename("Q&A: Rust?", Category::Blog, day()),
            "Q&A_ Rust_.md"
        );
    }

    #[test]
    fn test_diary_filename_has_date_prefix() {
        assert_eq!(
            entry_filename("雨の日", Category::Diary, day()),
            "2024-03-09_雨の日.md"
        );
    }
}
