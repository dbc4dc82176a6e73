/// Longest slug kept before the `.jpg` extension.
pub const MAX_SLUG_LEN: usize = 80;
/// Slug used when nothing usable survives sanitizing.
pub const FALLBACK_SLUG: &str = "imagen";

/// Picks the download filename for a generated image.
///
/// The product name wins when present; otherwise the uploaded file's stem is
/// used.
pub fn output_filename(product_name: Option<&str>, original_filename: Option<&str>) -> String {
    let raw = match product_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name.to_owned(),
        None => {
            let stem = strip_extension(original_filename.unwrap_or(""));
            if stem.is_empty() { FALLBACK_SLUG.to_owned() } else { stem.to_owned() }
        }
    };

    let slug = slugify(&raw);
    if slug.is_empty() {
        format!("{}.jpg", FALLBACK_SLUG)
    } else {
        format!("{}.jpg", slug)
    }
}

/// Lowercases, turns whitespace runs into `-`, keeps only `[a-z0-9_-]` and
/// truncates to [`MAX_SLUG_LEN`].
pub fn slugify(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let mut dashed = String::with_capacity(lowered.len());
    let mut in_space = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_space {
                dashed.push('-');
            }
            in_space = true;
        } else {
            dashed.push(c);
            in_space = false;
        }
    }

    dashed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .take(MAX_SLUG_LEN)
        .collect()
}

/// Drops the final `.ext` from a filename, if there is one.
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(pos) if pos + 1 < filename.len() => &filename[..pos],
        _ => filename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name_takes_priority() {
        assert_eq!(
            output_filename(Some("  Wireless Earbuds Pro 2 "), Some("IMG_0042.PNG")),
            "wireless-earbuds-pro-2.jpg"
        );
    }

    #[test]
    fn falls_back_to_upload_stem() {
        assert_eq!(output_filename(None, Some("Summer Shoot.final.png")), "summer-shootfinal.jpg");
        assert_eq!(output_filename(Some("   "), Some("photo.jpeg")), "photo.jpg");
        assert_eq!(output_filename(None, Some(".png")), "imagen.jpg");
        assert_eq!(output_filename(None, None), "imagen.jpg");
    }

    #[test]
    fn strips_symbols_and_non_ascii() {
        assert_eq!(slugify("Café  Crème — 50% off!"), "caf-crme--50-off");
        assert_eq!(output_filename(Some("???"), None), "imagen.jpg");
        assert_eq!(slugify("snake_case\tand-dash"), "snake_case-and-dash");
    }

    #[test]
    fn truncates_long_slugs() {
        let name = "a".repeat(100);
        let file = output_filename(Some(&name), None);
        assert_eq!(file.len(), MAX_SLUG_LEN + ".jpg".len());
    }
}
