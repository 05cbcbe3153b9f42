//! Console command parsing. Each line typed by the user becomes at most one
//! [`Command`]; `paste` switches to a multi-line mode ended by a lone `.`.

use std::path::{Path, PathBuf};

use analyzer_core::{Msg, SelectedFile};

pub const HELP: &str = "\
Commands:
  desc <text>        replace the job description
  desc+ <text>       append a line to the job description
  paste              type a multi-line description, end with a line containing only '.'
  files <path>...    select résumé files (quote paths with spaces)
  analyze            send description and files to the similarity service
  reset              clear description and report (files stay selected)
  export             save the report as similarity_report.xlsx
  dismiss            hide the current error
  show               redraw the page
  help               this text
  quit               leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Msg(Msg),
    Show,
    Help,
    Quit,
    /// Input that could not be turned into a command; shown to the user.
    Invalid(String),
}

#[derive(Debug, Default)]
pub struct ConsoleParser {
    paste_buffer: Option<Vec<String>>,
}

impl ConsoleParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_paste_mode(&self) -> bool {
        self.paste_buffer.is_some()
    }

    /// Feeds one input line; returns a command once one is complete.
    pub fn feed(&mut self, line: &str) -> Option<Command> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(buffer) = self.paste_buffer.as_mut() {
            if line.trim() == "." {
                let text = self.paste_buffer.take().unwrap_or_default().join("\n");
                return Some(Command::Msg(Msg::DescriptionChanged(text)));
            }
            buffer.push(line.to_string());
            return None;
        }

        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return None;
        }
        let (keyword, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim_start()),
            None => (trimmed, ""),
        };

        let command = match keyword.to_ascii_lowercase().as_str() {
            "desc" => Command::Msg(Msg::DescriptionChanged(rest.to_string())),
            "desc+" => Command::Msg(Msg::DescriptionAppended(rest.to_string())),
            "paste" => {
                self.paste_buffer = Some(Vec::new());
                return None;
            }
            "files" => match parse_files(rest) {
                Ok(files) => Command::Msg(Msg::FilesSelected(files)),
                Err(message) => Command::Invalid(message),
            },
            "analyze" | "submit" => Command::Msg(Msg::SubmitClicked),
            "reset" => Command::Msg(Msg::ResetClicked),
            "export" => Command::Msg(Msg::ExportClicked),
            "dismiss" => Command::Msg(Msg::ErrorDismissed),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("unknown command `{other}`; type `help`")),
        };
        Some(command)
    }
}

/// Resolves `files` arguments. An empty list clears the selection.
fn parse_files(args: &str) -> Result<Vec<SelectedFile>, String> {
    let paths = split_args(args)?;
    paths
        .into_iter()
        .map(|raw| {
            let path = PathBuf::from(&raw);
            if is_regular_file(&path) {
                Ok(SelectedFile::from_path(path))
            } else {
                Err(format!("not a readable file: {raw}"))
            }
        })
        .collect()
}

fn is_regular_file(path: &Path) -> bool {
    path.metadata().map(|meta| meta.is_file()).unwrap_or(false)
}

/// Splits on whitespace, honouring single and double quotes.
fn split_args(input: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_token {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_args_honours_quotes() {
        assert_eq!(
            split_args(r#"a.pdf "my cv.pdf" 'x y.docx'"#).unwrap(),
            vec!["a.pdf", "my cv.pdf", "x y.docx"]
        );
        assert_eq!(split_args("   ").unwrap(), Vec::<String>::new());
        assert!(split_args(r#""open"#).is_err());
    }

    #[test]
    fn simple_commands_map_to_messages() {
        let mut parser = ConsoleParser::new();
        assert_eq!(
            parser.feed("desc Senior Rust engineer"),
            Some(Command::Msg(Msg::DescriptionChanged(
                "Senior Rust engineer".into()
            )))
        );
        assert_eq!(
            parser.feed("desc+ Remote OK"),
            Some(Command::Msg(Msg::DescriptionAppended("Remote OK".into())))
        );
        assert_eq!(parser.feed("ANALYZE"), Some(Command::Msg(Msg::SubmitClicked)));
        assert_eq!(parser.feed("reset"), Some(Command::Msg(Msg::ResetClicked)));
        assert_eq!(parser.feed("export"), Some(Command::Msg(Msg::ExportClicked)));
        assert_eq!(parser.feed("quit"), Some(Command::Quit));
        assert_eq!(parser.feed(""), None);
        assert!(matches!(parser.feed("frobnicate"), Some(Command::Invalid(_))));
    }

    #[test]
    fn paste_mode_collects_lines_until_dot() {
        let mut parser = ConsoleParser::new();
        assert_eq!(parser.feed("paste"), None);
        assert!(parser.in_paste_mode());
        assert_eq!(parser.feed("We need:"), None);
        assert_eq!(parser.feed("  - Rust"), None);
        assert_eq!(
            parser.feed("."),
            Some(Command::Msg(Msg::DescriptionChanged(
                "We need:\n  - Rust".into()
            )))
        );
        assert!(!parser.in_paste_mode());
    }

    #[test]
    fn files_command_checks_paths_and_keeps_order() {
        let temp = tempfile::TempDir::new().unwrap();
        let b = temp.path().join("b.pdf");
        let a = temp.path().join("a cv.docx");
        std::fs::write(&b, "b").unwrap();
        std::fs::write(&a, "a").unwrap();
        let mut parser = ConsoleParser::new();

        let line = format!("files {} \"{}\"", b.display(), a.display());
        assert_eq!(
            parser.feed(&line),
            Some(Command::Msg(Msg::FilesSelected(vec![
                SelectedFile::from_path(b),
                SelectedFile::from_path(a),
            ])))
        );

        let missing = format!("files {}", temp.path().join("nope.pdf").display());
        assert!(matches!(parser.feed(&missing), Some(Command::Invalid(_))));
        assert_eq!(
            parser.feed("files"),
            Some(Command::Msg(Msg::FilesSelected(Vec::new())))
        );
    }
}
