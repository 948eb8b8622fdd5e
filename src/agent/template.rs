//! Config file templating by single-line substitution.

use std::path::Path;

use crate::error::Result;

/// Replace the first line starting with `key` by `key = value`.
///
/// Equivalent to substituting `^key.*$` on the first matching line only.
/// Every other line, including line endings, is kept byte for byte. When
/// no line matches, the text is returned unchanged.
pub fn replace_key_line(text: &str, key: &str, value: &str) -> String {
    let mut out = String::with_capacity(text.len() + value.len());
    let mut replaced = false;

    for line in text.split_inclusive('\n') {
        if !replaced && line.starts_with(key) {
            let ending = &line[line.trim_end_matches(['\r', '\n']).len()..];
            out.push_str(&format!("{} = {}", key, value));
            out.push_str(ending);
            replaced = true;
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Apply several key overrides in order.
pub fn materialize(template: &str, overrides: &[(&str, &str)]) -> String {
    overrides
        .iter()
        .fold(template.to_string(), |text, (key, value)| {
            replace_key_line(&text, key, value)
        })
}

/// Read `source` and render it with `overrides`.
pub fn render_file(source: &Path, overrides: &[(&str, &str)]) -> Result<String> {
    let template = std::fs::read_to_string(source)?;
    Ok(materialize(&template, overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_matching_line() {
        let text = "[credentials]\napi_key =\nhostname =\n";
        assert_eq!(
            replace_key_line(text, "api_key", "abc123"),
            "[credentials]\napi_key = abc123\nhostname =\n"
        );
    }

    #[test]
    fn replaces_only_first_match() {
        let text = "api_key = old\napi_key = older\n";
        assert_eq!(
            replace_key_line(text, "api_key", "new"),
            "api_key = new\napi_key = older\n"
        );
    }

    #[test]
    fn match_is_anchored_at_line_start() {
        let text = "# api_key = commented\n  api_key = indented\n";
        assert_eq!(replace_key_line(text, "api_key", "x"), text);
    }

    #[test]
    fn prefix_keys_match_like_the_pattern() {
        let text = "api_key_file = /tmp/k\n";
        assert_eq!(replace_key_line(text, "api_key", "x"), "api_key = x\n");
    }

    #[test]
    fn preserves_crlf_and_missing_final_newline() {
        assert_eq!(
            replace_key_line("a = 1\r\nb = 2", "b", "3"),
            "a = 1\r\nb = 3"
        );
    }

    #[test]
    fn no_match_leaves_text_unchanged() {
        let text = "[listeners]\nkeys = syslog-default\n";
        assert_eq!(replace_key_line(text, "api_key", "x"), text);
    }

    #[test]
    fn materialize_applies_every_override() {
        let template = "[credentials]\napi_key =\nhostname = web01\n\n[listeners]\nkeys = syslog-default";
        let rendered = materialize(template, &[("api_key", "abc123"), ("hostname", "edge-1")]);
        insta::assert_snapshot!(rendered, @r"
        [credentials]
        api_key = abc123
        hostname = edge-1

        [listeners]
        keys = syslog-default
        ");
    }

    #[test]
    fn render_file_reads_template() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("agent.conf.default");
        std::fs::write(&path, "api_key =\n").unwrap();
        assert_eq!(
            render_file(&path, &[("api_key", "k")]).unwrap(),
            "api_key = k\n"
        );
    }
}
