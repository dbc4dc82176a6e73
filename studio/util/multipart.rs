/// Returns the index of the first occurrence of `needle` in `haystack`.
pub fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Splits `haystack` on every occurrence of `needle`, returning the pieces
/// between occurrences (excluding the needle itself).
pub fn split_on<'a>(haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut result = Vec::new();
    let mut start = 0;
    while start <= haystack.len() {
        if let Some(pos) = find_subsequence(&haystack[start..], needle) {
            result.push(&haystack[start..start + pos]);
            start += pos + needle.len();
        } else {
            result.push(&haystack[start..]);
            break;
        }
    }
    result
}

/// Extracts the boundary token from a Content-Type header value like
/// `multipart/form-data; boundary=----WebKitFormBoundaryXXX`.
pub fn extract_boundary(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .map(|s| s.trim())
        .find(|s| s.starts_with("boundary="))
        .map(|s| s["boundary=".len()..].trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
}

/// One decoded part of a multipart/form-data body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<'a> {
    pub name:         String,
    /// Present (possibly empty) for file inputs.
    pub filename:     Option<String>,
    pub content_type: Option<String>,
    pub data:         &'a [u8],
}

impl Part<'_> {
    pub fn is_file(&self) -> bool {
        self.filename.is_some()
    }

    /// The part body as UTF-8 text, if it is valid.
    pub fn text(&self) -> Option<String> {
        String::from_utf8(self.data.to_vec()).ok()
    }
}

/// Splits a multipart body into its named parts, skipping anything that does
/// not carry a `Content-Disposition` name.
pub fn parse_parts<'a>(body: &'a [u8], boundary: &str) -> Vec<Part<'a>> {
    let delimiter = format!("--{}", boundary);
    let sep = b"\r\n\r\n";
    let mut result = Vec::new();

    for part in split_on(body, delimiter.as_bytes()) {
        let Some(sep_pos) = find_subsequence(part, sep) else { continue };
        let headers = String::from_utf8_lossy(&part[..sep_pos]);
        let raw = &part[sep_pos + sep.len()..];
        let data = raw.strip_suffix(b"\r\n").unwrap_or(raw);

        let mut name = None;
        let mut filename = None;
        let mut content_type = None;
        for line in headers.lines() {
            let Some((field, value)) = line.split_once(':') else { continue };
            if field.trim().eq_ignore_ascii_case("content-disposition") {
                name = disposition_param(value, "name");
                filename = disposition_param(value, "filename");
            } else if field.trim().eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_owned());
            }
        }

        if let Some(name) = name {
            result.push(Part { name, filename, content_type, data });
        }
    }
    result
}

/// Looks up a text (non-file) field by name.
pub fn text_field(parts: &[Part<'_>], field_name: &str) -> Option<String> {
    parts
        .iter()
        .find(|p| p.name == field_name && !p.is_file())
        .and_then(Part::text)
}

/// Looks up a file field by name.
pub fn file_field<'p, 'a>(parts: &'p [Part<'a>], field_name: &str) -> Option<&'p Part<'a>> {
    parts.iter().find(|p| p.name == field_name && p.is_file())
}

/// Reads `key="value"` (or unquoted `key=value`) out of a
/// Content-Disposition header value. Quoted values may contain `;` and
/// backslash-escaped quotes.
fn disposition_param(value: &str, key: &str) -> Option<String> {
    disposition_params(value)
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

/// Splits a Content-Disposition value into `(key, value)` pairs, honouring
/// quoted strings. The leading disposition type has no `=` and is skipped.
fn disposition_params(value: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut chars = value.chars().peekable();

    loop {
        let mut key = String::new();
        while let Some(&c) = chars.peek() {
            if c == '=' || c == ';' {
                break;
            }
            key.push(c);
            chars.next();
        }

        match chars.next() {
            None => break,
            Some(';') => continue,
            Some(_) => {}
        }

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        let mut val = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            val.push(escaped);
                        }
                    }
                    _ => val.push(c),
                }
            }
            // Skip anything between the closing quote and the next separator.
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
            }
        } else {
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
                val.push(c);
            }
            val = val.trim().to_owned();
        }

        params.push((key.trim().to_owned(), val));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----formBoundary7MA4YWxk";

    fn body_with(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                        name, f
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    #[test]
    fn extracts_boundary_from_header() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=\"abc123\"").as_deref(),
            Some("abc123")
        );
        assert_eq!(extract_boundary("multipart/form-data"), None);
    }

    #[test]
    fn separates_text_and_file_fields() {
        let png = [0x89u8, b'P', b'N', b'G', 0, 0xff, b'\r', b'\n', 7];
        let body = body_with(&[
            ("productName", None, b"Desk Lamp"),
            ("image", Some("lamp photo.png"), &png),
            ("resizeWidth", None, b"640"),
        ]);
        let parts = parse_parts(&body, BOUNDARY);

        assert_eq!(parts.len(), 3);
        assert_eq!(text_field(&parts, "productName").as_deref(), Some("Desk Lamp"));
        assert_eq!(text_field(&parts, "resizeWidth").as_deref(), Some("640"));
        assert_eq!(text_field(&parts, "image"), None);

        let file = file_field(&parts, "image").expect("file part present");
        assert_eq!(file.filename.as_deref(), Some("lamp photo.png"));
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(file.data, &png[..]);
    }

    #[test]
    fn filename_does_not_shadow_field_name() {
        // `filename="productName"` must not be mistaken for the text field.
        let body = body_with(&[("image", Some("productName"), b"xx")]);
        let parts = parse_parts(&body, BOUNDARY);
        assert_eq!(text_field(&parts, "productName"), None);
        assert!(file_field(&parts, "image").is_some());
    }

    #[test]
    fn quoted_filename_may_contain_semicolons() {
        let body = body_with(&[("image", Some("summer;sale.png"), b"xx")]);
        let parts = parse_parts(&body, BOUNDARY);
        let file = file_field(&parts, "image").expect("file part present");
        assert_eq!(file.name, "image");
        assert_eq!(file.filename.as_deref(), Some("summer;sale.png"));
    }

    #[test]
    fn disposition_params_handle_escapes_and_bare_values() {
        let header = r#" form-data; name=image ; filename="say \"hi\"; ok.png""#;
        assert_eq!(disposition_param(header, "name").as_deref(), Some("image"));
        assert_eq!(disposition_param(header, "filename").as_deref(), Some("say \"hi\"; ok.png"));
        assert_eq!(disposition_param(header, "missing"), None);
    }

    #[test]
    fn empty_file_input_yields_empty_data() {
        let body = body_with(&[("image", Some(""), b"")]);
        let parts = parse_parts(&body, BOUNDARY);
        let file = file_field(&parts, "image").expect("browser still sends the part");
        assert!(file.data.is_empty());
    }
}
