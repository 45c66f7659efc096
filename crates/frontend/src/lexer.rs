use std::collections::HashMap;

use runtime::commands::CommandKind;

pub const COMMENT_MARKER: &str = "//";

// Words following 'end' that close a block
const BLOCK_ENDS: [&str; 4] = ["if", "while", "for", "method"];

// One source line cut in keyword and parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LineTokens {
    pub keyword: String,
    pub params: String,
    pub text: String,
    pub line: u64,
}

impl LineTokens {
    // Whole line, keyword included, as the user wrote it minus the commas
    pub fn full(&self) -> String {
        if self.params.is_empty() {
            self.keyword.clone()
        } else {
            format!("{} {}", self.keyword, self.params)
        }
    }
}

#[derive(Debug)]
pub struct Lexer {
    reserved_keywords: HashMap<&'static str, CommandKind>,
}

impl Default for Lexer {
    fn default() -> Self {
        let mut lexer = Self {
            reserved_keywords: HashMap::new(),
        };
        lexer.generate_keywords();

        lexer
    }
}

// Commas separate arguments like spaces do, except inside a quoted text
fn replace_commas(text: &str) -> String {
    let mut in_quotes = false;

    text.chars()
        .map(|c| match c {
            '"' => {
                in_quotes = !in_quotes;
                c
            }
            ',' if !in_quotes => ' ',
            _ => c,
        })
        .collect()
}

impl Lexer {
    fn generate_keywords(&mut self) {
        for kind in CommandKind::ALL {
            self.reserved_keywords.insert(kind.keyword(), kind);
        }
    }

    pub fn command_kind(&self, keyword: &str) -> Option<CommandKind> {
        self.reserved_keywords.get(keyword).copied()
    }

    // Blank lines and comments give nothing
    pub fn tokenize_line(&self, text: &str, line: u64) -> Option<LineTokens> {
        let trimmed = text.trim();

        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            return None;
        }

        let cleaned = replace_commas(trimmed);
        let cleaned = cleaned.trim();

        let (head, rest) = match cleaned.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (cleaned, ""),
        };
        let mut keyword = head.to_lowercase();
        let mut params = rest.to_string();

        // "end while" is the same as "end-while"
        if keyword == "end" {
            let (next, after) = match rest.split_once(char::is_whitespace) {
                Some((next, after)) => (next, after.trim()),
                None => (rest, ""),
            };

            if BLOCK_ENDS.contains(&next.to_lowercase().as_str()) {
                keyword = format!("end-{}", next.to_lowercase());
                params = after.to_string();
            }
        }

        Some(LineTokens {
            keyword,
            params,
            text: cleaned.to_string(),
            line,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_lines() {
        let lexer = Lexer::default();

        assert_eq!(lexer.tokenize_line("", 0), None);
        assert_eq!(lexer.tokenize_line("   \t", 0), None);
        assert_eq!(lexer.tokenize_line("  // int x = 4", 0), None);
    }

    #[test]
    fn keyword_and_params() {
        let lexer = Lexer::default();
        let tokens = lexer.tokenize_line("  PEN 255, 0,0 ", 3).unwrap();

        assert_eq!(tokens.keyword, "pen");
        assert_eq!(tokens.params, "255  0 0");
        assert_eq!(tokens.line, 3);
        assert_eq!(lexer.command_kind(&tokens.keyword), Some(CommandKind::Pen));
    }

    #[test]
    fn two_word_terminators() {
        let lexer = Lexer::default();

        let tokens = lexer.tokenize_line("End   While", 0).unwrap();
        assert_eq!(tokens.keyword, "end-while");
        assert_eq!(tokens.params, "");

        let tokens = lexer.tokenize_line("end if now", 0).unwrap();
        assert_eq!(tokens.keyword, "end-if");
        assert_eq!(tokens.params, "now");

        let tokens = lexer.tokenize_line("end-for", 0).unwrap();
        assert_eq!(lexer.command_kind(&tokens.keyword), Some(CommandKind::EndFor));

        let tokens = lexer.tokenize_line("end", 0).unwrap();
        assert_eq!(lexer.command_kind(&tokens.keyword), None);
    }

    #[test]
    fn commas_kept_in_texts() {
        let lexer = Lexer::default();
        let tokens = lexer.tokenize_line("write \"a, b\"", 0).unwrap();

        assert_eq!(tokens.params, "\"a, b\"");
        assert_eq!(tokens.full(), "write \"a, b\"");
    }

    #[test]
    fn unknown_words_kept() {
        let lexer = Lexer::default();
        let tokens = lexer.tokenize_line("x=5", 0).unwrap();

        assert_eq!(tokens.keyword, "x=5");
        assert_eq!(tokens.params, "");
        assert_eq!(lexer.command_kind("x=5"), None);
    }
}
