//! Terminal output formatting.
//!
//! Search output goes to stdout untouched so it can be piped; decoration
//! (colors, labels) is only applied to human-facing lines.

pub mod colors;
pub mod errors;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print text exactly as given
    pub fn raw(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        println!("{} {}", self.colors.dim(&format!("{:>10}:", label)), value);
    }

    /// Print a heading
    pub fn heading(&self, message: &str) {
        println!("{}", self.colors.green(message));
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
