//! Line search over flattened statement text.
//!
//! PDFs are searched with the `pdfgrep` utility; text dumps that were
//! already flattened are searched in-process with the same patterns.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{debug, warn};
use regex::Regex;

/// A "search within file" request: an extended regular expression plus
/// the grep switches the detectors rely on.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub pattern: String,
    pub first_only: bool,
    pub only_matching: bool,
}

impl Query {
    pub fn new(pattern: impl Into<String>) -> Query {
        Query {
            pattern: pattern.into(),
            first_only: false,
            only_matching: false,
        }
    }

    pub fn first_only(mut self) -> Query {
        self.first_only = true;
        self
    }

    pub fn only_matching(mut self) -> Query {
        self.only_matching = true;
        self
    }
}

/// Any failure to search is reported as "no lines".
pub trait TextExtractor {
    fn search(&self, file: &Path, query: &Query) -> Vec<String>;
}

#[derive(Clone, Debug)]
pub struct Pdfgrep {
    program: String,
}

impl Pdfgrep {
    pub fn new(program: impl Into<String>) -> Pdfgrep {
        Pdfgrep {
            program: program.into(),
        }
    }
}

impl Default for Pdfgrep {
    fn default() -> Self {
        Pdfgrep::new("pdfgrep")
    }
}

impl TextExtractor for Pdfgrep {
    fn search(&self, file: &Path, query: &Query) -> Vec<String> {
        let mut command = Command::new(&self.program);
        if query.first_only {
            command.args(&["-m", "1"]);
        }
        if query.only_matching {
            command.arg("-o");
        }
        command.arg("-e").arg(&query.pattern).arg(file);
        debug!("running {:?}", command);

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                warn!("failed to run {}: {}", self.program, e);
                return Vec::new();
            }
        };

        // pdfgrep exits with 1 when nothing matched, which is not worth a warning
        match output.status.code() {
            Some(0) | Some(1) => {}
            _ => warn!(
                "{} failed on {}: {}",
                self.program,
                file.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect()
    }
}

/// Searches text that was already flattened from a PDF, one page line per line.
#[derive(Clone, Debug, Default)]
pub struct PlainText;

impl PlainText {
    pub fn search_text(&self, text: &str, query: &Query) -> Vec<String> {
        let re = match Regex::new(&query.pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!("invalid search pattern {:?}: {}", query.pattern, e);
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        for line in text.lines() {
            if !re.is_match(line) {
                continue;
            }
            if query.only_matching {
                found.extend(re.find_iter(line).map(|m| m.as_str().to_string()));
            } else {
                found.push(line.to_string());
            }
            if query.first_only {
                break;
            }
        }
        found
    }
}

impl TextExtractor for PlainText {
    fn search(&self, file: &Path, query: &Query) -> Vec<String> {
        debug!("searching {} for {:?}", file.display(), query.pattern);
        match fs::read_to_string(file) {
            Ok(text) => self.search_text(&text, query),
            Err(e) => {
                warn!("cannot read {}: {}", file.display(), e);
                Vec::new()
            }
        }
    }
}

/// Picks the extractor for an input file: `.txt` dumps are searched
/// directly, anything else goes through `pdfgrep`.
pub struct Extractors {
    pub pdf: Pdfgrep,
    pub text: PlainText,
}

impl Extractors {
    pub fn new(pdf: Pdfgrep) -> Extractors {
        Extractors {
            pdf,
            text: PlainText,
        }
    }

    pub fn for_file(&self, file: &Path) -> &dyn TextExtractor {
        if is_text_dump(file) {
            &self.text
        } else {
            &self.pdf
        }
    }
}

fn is_text_dump(file: &Path) -> bool {
    file.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
RELEVE DE COMPTE du 01.04.2018 au 30.04.2018
Compte : 0123456 X
   12.345   SALAIRE AVRIL   01.04.18.........1 234,56.
   12.346   LOYER   05.04.18....42,00
";

    #[test]
    fn returns_whole_lines() {
        let lines = PlainText.search_text(PAGE, &Query::new(r"  [0-9]{1,2}\.[0-9]{1,2}\.[0-9]{2}"));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("   12.345"));
    }

    #[test]
    fn first_only_stops_after_one_line() {
        let lines = PlainText.search_text(
            PAGE,
            &Query::new(r"  [0-9]{1,2}\.[0-9]{1,2}\.[0-9]{2}").first_only(),
        );
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn only_matching_returns_matched_text() {
        let query = Query::new(r"du [0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4} au [0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4}")
            .first_only()
            .only_matching();
        assert_eq!(
            PlainText.search_text(PAGE, &query),
            vec!["du 01.04.2018 au 30.04.2018".to_string()]
        );
    }

    #[test]
    fn bad_pattern_finds_nothing() {
        assert!(PlainText.search_text(PAGE, &Query::new("(")).is_empty());
    }

    #[test]
    fn missing_file_finds_nothing() {
        let lines = PlainText.search(Path::new("/nonexistent/statement.txt"), &Query::new("Compte"));
        assert!(lines.is_empty());
    }

    #[test]
    fn missing_program_finds_nothing() {
        let pdfgrep = Pdfgrep::new("/nonexistent/pdfgrep");
        assert!(pdfgrep
            .search(Path::new("statement.pdf"), &Query::new("Compte"))
            .is_empty());
    }

    #[test]
    fn recognises_text_dumps() {
        assert!(is_text_dump(Path::new("releves/avril.txt")));
        assert!(is_text_dump(Path::new("AVRIL.TXT")));
        assert!(!is_text_dump(Path::new("avril.pdf")));
        assert!(!is_text_dump(Path::new("avril")));
    }
}
