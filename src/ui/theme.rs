//! Visual theme and styling.

use console::Style;

/// Installer colors.
#[derive(Debug, Clone)]
pub struct AmplifyTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub dim: Style,
    pub highlight: Style,
    pub header: Style,
    /// Commands shown in usage instructions.
    pub command: Style,
}

impl Default for AmplifyTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl AmplifyTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().green(),
            command: Style::new().cyan(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            command: Style::new(),
        }
    }

    /// The colored theme when colors are enabled, otherwise the plain one.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("--- {} ---", title)))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_formats_icons() {
        let theme = AmplifyTheme::plain();
        assert_eq!(theme.format_success("done"), "✓ done");
        assert_eq!(theme.format_warning("careful"), "⚠ careful");
        assert_eq!(theme.format_error("failed"), "✗ failed");
    }

    #[test]
    fn plain_header_is_framed() {
        assert_eq!(
            AmplifyTheme::plain().format_header("NGINX Amplify Agent"),
            "--- NGINX Amplify Agent ---"
        );
    }

    #[test]
    fn colored_theme_keeps_text() {
        let theme = AmplifyTheme::default();
        assert!(theme.format_success("ok").contains("ok"));
    }
}
