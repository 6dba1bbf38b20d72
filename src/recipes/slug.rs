/// Derives a URL-safe slug from a recipe name: lowercase, alphanumeric
/// runs joined by single hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        "recipe".to_string()
    } else {
        slug
    }
}

/// Rename variant: the record's own slug never blocks itself, so a name
/// change that slugs to the same base keeps the existing slug.
pub fn disambiguate_for_rename(base: &str, taken: &[String], current: &str) -> String {
    let others: Vec<String> = taken.iter().filter(|s| s.as_str() != current).cloned().collect();
    disambiguate(base, &others)
}

/// Picks the first free variant of `base` against the already-taken slugs:
/// `base` itself, then `base-2`, `base-3`, …
pub fn disambiguate(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    let mut n = 2u64;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.iter().any(|s| *s == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Beef Pho"), "beef-pho");
        assert_eq!(slugify("Grandma's Apple Pie!"), "grandma-s-apple-pie");
        assert_eq!(slugify("  Spaced   Out  "), "spaced-out");
    }

    #[test]
    fn slugify_non_ascii_falls_back() {
        assert_eq!(slugify("Crème Brûlée"), "cr-me-br-l-e");
        assert_eq!(slugify("日本語"), "recipe");
        assert_eq!(slugify(""), "recipe");
    }

    #[test]
    fn disambiguate_free_base() {
        assert_eq!(disambiguate("beef-pho", &[]), "beef-pho");
        assert_eq!(
            disambiguate("beef-pho", &["beef-pho-old".into()]),
            "beef-pho"
        );
    }

    #[test]
    fn disambiguate_appends_suffix() {
        let taken = vec!["beef-pho".to_string()];
        assert_eq!(disambiguate("beef-pho", &taken), "beef-pho-2");

        let taken = vec![
            "beef-pho".to_string(),
            "beef-pho-2".to_string(),
            "beef-pho-3".to_string(),
        ];
        assert_eq!(disambiguate("beef-pho", &taken), "beef-pho-4");
    }

    #[test]
    fn disambiguate_skips_gaps() {
        let taken = vec!["beef-pho".to_string(), "beef-pho-3".to_string()];
        assert_eq!(disambiguate("beef-pho", &taken), "beef-pho-2");
    }

    #[test]
    fn rename_to_same_base_keeps_current_slug() {
        // "Beef Pho" renamed to "Beef Pho!" slugs to the same base; the
        // recipe's own slug must not push it to "beef-pho-2".
        let taken = vec!["beef-pho".to_string()];
        assert_eq!(
            disambiguate_for_rename("beef-pho", &taken, "beef-pho"),
            "beef-pho"
        );
    }

    #[test]
    fn rename_still_avoids_other_recipes_slugs() {
        let taken = vec!["beef-pho".to_string(), "beef-pho-2".to_string()];
        assert_eq!(
            disambiguate_for_rename("beef-pho", &taken, "beef-pho-2"),
            "beef-pho-2"
        );
        assert_eq!(
            disambiguate_for_rename("beef-pho", &taken, "lamb-stew"),
            "beef-pho-3"
        );
    }
}
