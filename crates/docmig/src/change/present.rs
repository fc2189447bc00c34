use super::Change;
use crate::serial::strip_sentinels;

const BLUE: &str = "\x1b[34m";
const RESET: &str = "\x1b[0m";

/// Options for [`Change::present_with`].
#[derive(Debug, Clone, Default)]
pub struct PresentOptions {
    /// Highlight the document path with ANSI colour codes.
    pub color: bool,
}

impl Change {
    /// Header lines and body describing this change for a human reviewer.
    pub fn present(&self) -> (Vec<String>, String) {
        self.present_with(&PresentOptions::default())
    }

    pub fn present_with(&self, options: &PresentOptions) -> (Vec<String>, String) {
        let target = if options.color {
            format!("{BLUE}{}{RESET}", self.doc_path)
        } else {
            self.doc_path.clone()
        };
        let header = vec![
            format!("Target: {target}"),
            format!(" >> [{}]\n\n", self.command.as_str().to_uppercase()),
        ];

        let body = if let Some(err) = &self.error {
            format!("< !!! ERROR STATE !!! >\n{err}\n")
        } else if self.pretty_diff.is_empty() {
            "< no changes >\n".to_string()
        } else {
            format!("{}\n", strip_sentinels(&self.pretty_diff))
        };
        (header, body)
    }
}
