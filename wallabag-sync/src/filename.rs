//! Note file names derived from article titles.

use wallabag_core::ArticleId;

use crate::vault::normalize_path;

/// Characters that are illegal or special in vault paths and links.
const RESERVED: &[char] = &[
    '\\', ',', '#', '%', '&', '{', '}', '/', '*', '<', '>', '$', '"', '@', '.', '?',
];

/// Separators some filesystems reject.
const SEPARATORS: &[char] = &[':', '|'];

/// Replace every reserved or separator character with a single space.
///
/// Distinct titles that differ only in those characters map to the same
/// name; the write policy then skips the later one.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || SEPARATORS.contains(&c) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// File stem for an article, with `-{id}` appended when requested.
///
/// A title that sanitizes to nothing but whitespace becomes `untitled`.
pub fn note_stem(title: &str, id: ArticleId, id_in_title: bool) -> String {
    let mut stem = sanitize_title(title);
    if stem.trim().is_empty() {
        stem = "untitled".to_string();
    }
    if id_in_title {
        format!("{stem}-{id}")
    } else {
        stem
    }
}

/// `{folder}/{stem}.{ext}`, normalised.
pub fn vault_file(folder: &str, stem: &str, ext: &str) -> String {
    normalize_path(&format!("{folder}/{stem}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_becomes_space() {
        assert_eq!(sanitize_title("A/B"), "A B");
    }

    #[test]
    fn every_reserved_character_is_replaced() {
        let title = r#"a\b,c#d%e&f{g}h/i*j<k>l$m"n@o.p?q:r|s"#;
        let clean = sanitize_title(title);
        for c in RESERVED.iter().chain(SEPARATORS) {
            assert!(!clean.contains(*c), "{c:?} survived in {clean:?}");
        }
        assert_eq!(clean.chars().count(), title.chars().count());
    }

    #[test]
    fn each_character_maps_to_one_space() {
        assert_eq!(sanitize_title("Q&A: 10..."), "Q A  10   ");
    }

    #[test]
    fn unicode_is_preserved() {
        assert_eq!(sanitize_title("Café · Ürün"), "Café · Ürün");
    }

    #[test]
    fn id_suffix_when_requested() {
        assert_eq!(note_stem("A/B", ArticleId(1), true), "A B-1");
        assert_eq!(note_stem("A/B", ArticleId(1), false), "A B");
    }

    #[test]
    fn empty_title_falls_back() {
        assert_eq!(note_stem("...", ArticleId(4), false), "untitled");
        assert_eq!(note_stem("", ArticleId(4), true), "untitled-4");
    }

    #[test]
    fn vault_file_joins_and_normalises() {
        assert_eq!(vault_file("wallabag/", "A B", "md"), "wallabag/A B.md");
        assert_eq!(vault_file("", "A B", "pdf"), "A B.pdf");
    }
}
