use regex::Regex;

const BOLD_ITALIC: &str = "\x1b[1;3m$1\x1b[0m";
const BOLD: &str = "\x1b[1m$1\x1b[0m";
const ITALIC: &str = "\x1b[3m$1\x1b[0m";

/// 把助手回复里的 `***x***` / `**x**` / `*x*` 转成终端样式
pub struct ResponseFormatter {
    bold_italic: Regex,
    bold: Regex,
    italic: Regex,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseFormatter {
    pub fn new() -> Self {
        Self {
            bold_italic: Regex::new(r"\*\*\*(.+?)\*\*\*").expect("static regex"),
            bold: Regex::new(r"\*\*(.+?)\*\*").expect("static regex"),
            italic: Regex::new(r"\*(.+?)\*").expect("static regex"),
        }
    }

    pub fn to_terminal(&self, text: &str) -> String {
        let text = self.bold_italic.replace_all(text, BOLD_ITALIC);
        let text = self.bold.replace_all(&text, BOLD);
        self.italic.replace_all(&text, ITALIC).into_owned()
    }
}
