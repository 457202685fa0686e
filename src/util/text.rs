use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";
/// Display width of the ellipsis (3 columns for ASCII "...")
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within a maximum display width.
///
/// If truncation is necessary, appends "..." to indicate text was cut off.
/// Uses Unicode-aware width calculation so CJK characters and emoji count
/// as the columns they actually occupy. For widths of 3 or fewer columns
/// there is no room for "char + ellipsis", so as many characters as fit
/// are returned without the ellipsis.
///
/// Returns `Cow::Borrowed` when the string already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut current_width = 0;
        for (idx, c) in s.char_indices() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width {
                break;
            }
            current_width += char_width;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    let target_width = max_width.saturating_sub(ELLIPSIS_WIDTH);
    let mut current_width = 0;
    let mut cut_point = None;
    let mut exceeded_max = false;

    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);

        if cut_point.is_none() && current_width + char_width > target_width {
            cut_point = Some(idx);
        }
        if current_width + char_width > max_width {
            exceeded_max = true;
            break;
        }
        current_width += char_width;
    }

    if exceeded_max {
        let cut = cut_point.unwrap_or(s.len());
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    } else {
        Cow::Borrowed(s)
    }
}

/// Flatten an HTML article body into plain text for terminal display.
///
/// This is intentionally not a full HTML parser: the article service
/// sanitizes content upstream, and the detail pane only needs readable
/// text. Tags are dropped, block-level closers become line breaks, and the
/// handful of entities that actually occur in feeds are decoded. Script and
/// style elements are removed wholesale.
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut chars = html.char_indices();
    let mut skip_until: Option<&'static str> = None;

    while let Some((idx, c)) = chars.next() {
        if c != '<' {
            if skip_until.is_none() {
                push_decoded(&mut out, html, idx, &mut chars, c);
            }
            continue;
        }

        // Collect the tag up to '>'.
        let mut tag = String::new();
        for (_, tc) in chars.by_ref() {
            if tc == '>' {
                break;
            }
            tag.push(tc);
        }
        let name = tag
            .trim_start_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        if let Some(end) = skip_until {
            if tag.starts_with('/') && name == end {
                skip_until = None;
            }
            continue;
        }

        match name.as_str() {
            "script" | "style" => {
                if !tag.starts_with('/') && !tag.ends_with('/') {
                    skip_until = Some(if name == "script" { "script" } else { "style" });
                }
            }
            "p" | "div" | "section" | "article" | "blockquote" | "ul" | "ol" | "table"
            | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                if tag.starts_with('/') {
                    push_break(&mut out);
                    push_break(&mut out);
                }
            }
            "br" | "li" | "tr" => {
                if !tag.starts_with('/') {
                    push_break(&mut out);
                }
            }
            _ => {}
        }
    }

    // Collapse blank runs to a single separator line and drop the
    // leading/trailing whitespace the block handling leaves behind.
    let mut result = String::with_capacity(out.len());
    let mut pending_blank = false;
    let mut started = false;
    for line in out.lines() {
        let line = line.trim();
        if line.is_empty() {
            if started {
                pending_blank = true;
            }
        } else {
            if started {
                result.push('\n');
                if pending_blank {
                    result.push('\n');
                }
            }
            result.push_str(line);
            started = true;
            pending_blank = false;
        }
    }
    result
}

/// Append one character, decoding an entity if `c` begins one.
fn push_decoded(
    out: &mut String,
    html: &str,
    idx: usize,
    chars: &mut std::str::CharIndices<'_>,
    c: char,
) {
    if c != '&' {
        out.push(c);
        return;
    }

    let rest = &html[idx..];
    let known: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
        ("&nbsp;", ' '),
    ];
    for (entity, decoded) in known {
        if rest.starts_with(entity) {
            out.push(decoded);
            // Consume the remainder of the entity.
            for _ in 0..entity.chars().count() - 1 {
                chars.next();
            }
            return;
        }
    }
    out.push('&');
}

fn push_break(out: &mut String) {
    if !out.ends_with('\n') {
        out.push('\n');
    } else if !out.ends_with("\n\n") {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_fits_is_borrowed() {
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_cjk() {
        assert_eq!(truncate_to_width("未读文章列表", 7), "未读...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
    }

    #[test]
    fn test_html_paragraphs_become_blank_lines() {
        let html = "<p>First paragraph.</p><p>Second paragraph.</p>";
        assert_eq!(html_to_text(html), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_html_inline_tags_dropped() {
        let html = "Plain <b>bold</b> and <a href=\"https://example.com\">a link</a>.";
        assert_eq!(html_to_text(html), "Plain bold and a link.");
    }

    #[test]
    fn test_html_breaks_and_list_items() {
        let html = "line one<br/>line two<ul><li>first</li><li>second</li></ul>";
        let text = html_to_text(html);
        assert!(text.contains("line one\nline two"));
        assert!(text.contains("first\nsecond"));
    }

    #[test]
    fn test_html_entities_decoded() {
        let html = "Fish &amp; chips &lt;now&gt; &quot;fresh&quot;&nbsp;&#39;daily&#39;";
        assert_eq!(html_to_text(html), "Fish & chips <now> \"fresh\" 'daily'");
    }

    #[test]
    fn test_html_unknown_entity_left_alone() {
        assert_eq!(html_to_text("a &copy; b"), "a &copy; b");
    }

    #[test]
    fn test_html_script_and_style_removed() {
        let html = "<p>keep</p><script>alert('no')</script><style>p{color:red}</style><p>also</p>";
        let text = html_to_text(html);
        assert!(text.contains("keep"));
        assert!(text.contains("also"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_html_plain_text_passthrough() {
        assert_eq!(html_to_text("no markup here"), "no markup here");
    }

    #[test]
    fn test_html_collapses_blank_runs() {
        let html = "<div><p>a</p></div><div><p>b</p></div>";
        assert_eq!(html_to_text(html), "a\n\nb");
    }

    #[test]
    fn test_html_empty_input() {
        assert_eq!(html_to_text(""), "");
    }
}
