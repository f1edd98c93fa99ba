#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Resolve the output format from CLI flags, falling back to the
    /// configured default. `--json` wins over `--format`.
    pub fn resolve(json_flag: bool, format_flag: Option<&str>, config_default: &str) -> Self {
        if json_flag {
            return OutputFormat::Json;
        }
        match format_flag.unwrap_or(config_default) {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
    pub verbose: bool,
}

/// Decide whether to emit ANSI colors: the `color` config value and
/// `--no-color` flag first, then `NO_COLOR`, then a stdout TTY check.
pub fn detect_color(color_setting: &str, no_color_flag: bool) -> bool {
    if no_color_flag || color_setting == "never" {
        return false;
    }
    if color_setting == "always" {
        return true;
    }
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty_stdout()
}

fn atty_stdout() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_wins_over_everything() {
        assert_eq!(OutputFormat::resolve(true, Some("text"), "text"), OutputFormat::Json);
    }

    #[test]
    fn format_flag_wins_over_config() {
        assert_eq!(OutputFormat::resolve(false, Some("json"), "text"), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(false, Some("text"), "json"), OutputFormat::Text);
    }

    #[test]
    fn config_default_applies_without_flags() {
        assert_eq!(OutputFormat::resolve(false, None, "json"), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(false, None, "text"), OutputFormat::Text);
    }

    #[test]
    fn unknown_format_falls_back_to_text() {
        assert_eq!(OutputFormat::resolve(false, Some("xml"), "text"), OutputFormat::Text);
    }

    #[test]
    fn never_and_no_color_disable_color() {
        assert!(!detect_color("never", false));
        assert!(!detect_color("auto", true));
        assert!(!detect_color("always", true));
    }

    #[test]
    fn always_forces_color() {
        assert!(detect_color("always", false));
    }
}
