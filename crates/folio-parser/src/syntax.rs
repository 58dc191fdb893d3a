//! Syntax highlighting for code blocks.

use syntect::{highlighting::ThemeSet, html::highlighted_html_for_string, parsing::SyntaxSet};

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    default_theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the specified theme.
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            default_theme: theme.to_string(),
        }
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Name of the theme used for highlighting.
    pub fn theme(&self) -> &str {
        &self.default_theme
    }

    /// Highlight code with the given language.
    ///
    /// The result is wrapped in `<div class="highlight language-{lang}">`.
    /// Unknown languages fall back to an escaped `<pre><code>` block.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|l| self.syntax_set.find_syntax_by_token(l));

        let theme = self
            .theme_set
            .themes
            .get(&self.default_theme)
            .or_else(|| self.theme_set.themes.values().next());

        let body = match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
                    .unwrap_or_else(|_| fallback_highlight(code, lang))
            }
            _ => fallback_highlight(code, lang),
        };

        let class = lang
            .map(|l| format!("highlight language-{}", html_escape(l)))
            .unwrap_or_else(|| "highlight".to_string());
        format!("<div class=\"{class}\">{body}</div>\n")
    }

    /// Set the default theme. Unknown theme names are ignored.
    pub fn set_theme(&mut self, theme: &str) {
        if self.theme_set.themes.contains_key(theme) {
            self.default_theme = theme.to_string();
        }
    }
}

/// Plain `<pre><code>` rendering when syntect has no grammar.
fn fallback_highlight(code: &str, lang: Option<&str>) -> String {
    let escaped = html_escape(code);
    let lang_class = lang
        .map(|l| format!(" class=\"language-{}\"", html_escape(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{escaped}</code></pre>")
}

/// Escape HTML special characters.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust() {
        let highlighter = SyntaxHighlighter::default();
        let code = "fn main() {\n    println!(\"Hello\");\n}";
        let html = highlighter.highlight(code, Some("rust"));

        assert!(html.starts_with("<div class=\"highlight language-rust\">"));
        assert!(html.contains("<pre"));
        assert!(html.contains("fn"));
    }

    #[test]
    fn test_highlight_unknown_language() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("a < b", Some("unknown_lang_xyz"));

        assert!(html.contains("<code class=\"language-unknown_lang_xyz\">"));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn test_highlight_no_language() {
        let highlighter = SyntaxHighlighter::default();
        let html = highlighter.highlight("plain text", None);

        assert!(html.starts_with("<div class=\"highlight\">"));
        assert!(html.contains("plain text"));
    }

    #[test]
    fn test_set_theme_ignores_unknown() {
        let mut highlighter = SyntaxHighlighter::default();
        highlighter.set_theme("no-such-theme");
        assert_eq!(highlighter.theme(), "base16-ocean.dark");

        highlighter.set_theme("InspiredGitHub");
        assert_eq!(highlighter.theme(), "InspiredGitHub");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_available_themes() {
        let highlighter = SyntaxHighlighter::default();
        let themes = highlighter.available_themes();

        assert!(themes.contains(&"base16-ocean.dark"));
    }
}
