//! Matrix input from text files and the console
//!
//! # Text format
//!
//! ```text
//! 3 2
//! 1 1 3
//! 1 -1 1
//! ```
//!
//! The first line holds `width height`, followed by `height` lines of `width`
//! whitespace-separated values. The last column is the right-hand side, so
//! every matrix read here is flagged as augmented. Blank lines and lines
//! starting with `#` are skipped; extra values at the end of a row are ignored.

use crate::dense::DenseMatrix;
use crate::error::{LinsysError, Result};
use std::collections::VecDeque;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Default directory searched by the file chooser
pub const DEFAULT_INPUTS_DIR: &str = "inputs";

fn parse_value<T: std::str::FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token.parse().map_err(|_| LinsysError::Parse {
        line,
        message: format!("invalid {what} '{token}'"),
    })
}

/// Reject shapes whose element count overflows `usize`.
fn check_size(width: usize, height: usize, line: usize) -> Result<()> {
    match width.checked_mul(height) {
        Some(_) => Ok(()),
        None => Err(LinsysError::Parse {
            line,
            message: format!("matrix size {width}x{height} is too large"),
        }),
    }
}

/// Parse a matrix from the text format described in the module docs.
pub fn parse_matrix(text: &str) -> Result<DenseMatrix> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (header_line, header) = lines.next().ok_or_else(|| LinsysError::Parse {
        line: 1,
        message: "missing 'width height' header".to_string(),
    })?;
    let dims: Vec<&str> = header.split_whitespace().collect();
    if dims.len() < 2 {
        return Err(LinsysError::Parse {
            line: header_line,
            message: format!("expected 'width height', got '{header}'"),
        });
    }
    let width: usize = parse_value(dims[0], header_line, "width")?;
    let height: usize = parse_value(dims[1], header_line, "height")?;
    check_size(width, height, header_line)?;

    let mut data = Vec::new();
    let mut last_line = header_line;
    for y in 0..height {
        let (line_no, line) = lines.next().ok_or_else(|| LinsysError::Parse {
            line: last_line + 1,
            message: format!("expected {height} rows, found {y}"),
        })?;
        last_line = line_no;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < width {
            return Err(LinsysError::Parse {
                line: line_no,
                message: format!("expected {width} values, found {}", tokens.len()),
            });
        }
        for token in &tokens[..width] {
            data.push(parse_value::<f64>(token, line_no, "number")?);
        }
    }

    log::debug!("parsed {width}x{height} matrix");
    Ok(DenseMatrix::from_vec(width, height, data)?.with_augmented(true))
}

/// Read and parse a matrix file.
pub fn read_matrix_file<P: AsRef<Path>>(path: P) -> Result<DenseMatrix> {
    let text = fs::read_to_string(path.as_ref())?;
    log::info!("Loading matrix from {}", path.as_ref().display());
    parse_matrix(&text)
}

/// Whitespace-separated token reader over a line-oriented input.
struct Tokens<'a, R: BufRead> {
    input: &'a mut R,
    pending: VecDeque<String>,
    line: usize,
}

impl<'a, R: BufRead> Tokens<'a, R> {
    fn new(input: &'a mut R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            line: 0,
        }
    }

    /// Next token, reading more lines as needed; `None` at end of input.
    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut buf = String::new();
            if self.input.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            self.pending.extend(buf.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    fn expect_token(&mut self, what: &str) -> Result<String> {
        self.next_token()?.ok_or_else(|| LinsysError::Parse {
            line: self.line + 1,
            message: format!("unexpected end of input while reading {what}"),
        })
    }

    /// Drop whatever is left of the current line.
    fn discard_line(&mut self) {
        self.pending.clear();
    }
}

/// Read a matrix interactively, prompting on `out`.
///
/// Values of one row may span several input lines; anything typed after the
/// last value of a row is discarded.
pub fn read_matrix_interactive<R: BufRead, W: Write>(
    out: &mut W,
    input: &mut R,
) -> Result<DenseMatrix> {
    let mut tokens = Tokens::new(input);

    write!(out, "Enter width of the linear system matrix: ")?;
    out.flush()?;
    let token = tokens.expect_token("width")?;
    let width: usize = parse_value(&token, tokens.line, "width")?;
    tokens.discard_line();

    write!(out, "Enter height of the linear system matrix: ")?;
    out.flush()?;
    let token = tokens.expect_token("height")?;
    let height: usize = parse_value(&token, tokens.line, "height")?;
    check_size(width, height, tokens.line)?;
    tokens.discard_line();

    let mut data = Vec::new();
    for y in 0..height {
        writeln!(out, "Enter {}. row of the matrix:", y + 1)?;
        out.flush()?;
        for _ in 0..width {
            let token = tokens.expect_token("matrix row")?;
            data.push(parse_value::<f64>(&token, tokens.line, "number")?);
        }
        tokens.discard_line();
    }

    Ok(DenseMatrix::from_vec(width, height, data)?.with_augmented(true))
}

/// Names of the non-hidden regular files in `dir`, sorted.
pub fn list_input_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Let the user pick one of the files in `dir`; re-prompts until a listed
/// name is entered.
pub fn choose_file<R: BufRead, W: Write>(
    out: &mut W,
    input: &mut R,
    dir: &Path,
) -> Result<PathBuf> {
    let files = list_input_files(dir)?;
    if files.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no input files in {}", dir.display()),
        )
        .into());
    }

    let mut tokens = Tokens::new(input);
    loop {
        writeln!(
            out,
            "Files to choose from (write the file name with .txt as well):"
        )?;
        writeln!(out, "{}", files.join(" "))?;
        out.flush()?;

        let Some(choice) = tokens.next_token()? else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a file was chosen",
            )
            .into());
        };
        tokens.discard_line();
        if files.contains(&choice) {
            return Ok(dir.join(choice));
        }
        log::debug!("'{choice}' is not one of the listed files");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_matrix() {
        let m = parse_matrix("3 2\n1 1 3\n1 -1 1\n").unwrap();
        assert!(m.is_augmented());
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.as_slice(), &[1.0, 1.0, 3.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_parse_matrix_skips_blank_and_comments() {
        let text = "# system\n2 2\n\n1.5 2\n   \n# row two\n-3 4e1 extra\n";
        let m = parse_matrix(text).unwrap();
        assert_eq!(m.as_slice(), &[1.5, 2.0, -3.0, 40.0]);
    }

    #[test]
    fn test_parse_matrix_errors() {
        let err = parse_matrix("").unwrap_err();
        assert!(matches!(err, LinsysError::Parse { line: 1, .. }));

        let err = parse_matrix("3\n").unwrap_err();
        assert!(matches!(err, LinsysError::Parse { line: 1, .. }));

        let err = parse_matrix("2 x\n").unwrap_err();
        assert!(err.to_string().contains("invalid height"));

        let err = parse_matrix("2 2\n1 2\n3\n").unwrap_err();
        assert!(matches!(err, LinsysError::Parse { line: 3, .. }));

        let err = parse_matrix("2 2\n1 2\n").unwrap_err();
        assert!(err.to_string().contains("expected 2 rows, found 1"));

        let err = parse_matrix("2 1\n1 abc\n").unwrap_err();
        assert!(matches!(err, LinsysError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_matrix_oversized_header() {
        let err = parse_matrix("4294967296 4294967296\n1 2\n").unwrap_err();
        assert!(matches!(err, LinsysError::Parse { line: 1, .. }));

        // valid but huge: fails on the short row, not on allocation
        let err = parse_matrix("100000 100000\n1 2\n").unwrap_err();
        assert!(matches!(err, LinsysError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_read_matrix_interactive_oversized() {
        let mut input = Cursor::new("4294967296\n4294967296\n1 2\n");
        let mut out = Vec::new();
        let err = read_matrix_interactive(&mut out, &mut input).unwrap_err();
        assert!(matches!(err, LinsysError::Parse { .. }));
        assert!(!String::from_utf8(out).unwrap().contains("row of the matrix"));
    }

    #[test]
    fn test_read_matrix_interactive() {
        let mut input = Cursor::new("3\n2\n1 1 3\n1 -1\n1 trailing words\n");
        let mut out = Vec::new();
        let m = read_matrix_interactive(&mut out, &mut input).unwrap();

        assert_eq!(m.as_slice(), &[1.0, 1.0, 3.0, 1.0, -1.0, 1.0]);
        let prompts = String::from_utf8(out).unwrap();
        assert!(prompts.contains("Enter width of the linear system matrix: "));
        assert!(prompts.contains("Enter 2. row of the matrix:"));
    }

    #[test]
    fn test_read_matrix_interactive_eof() {
        let mut input = Cursor::new("2\n2\n1 2\n");
        let mut out = Vec::new();
        let err = read_matrix_interactive(&mut out, &mut input).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_read_matrix_interactive_bad_width() {
        let mut input = Cursor::new("-1\n");
        let mut out = Vec::new();
        let err = read_matrix_interactive(&mut out, &mut input).unwrap_err();
        assert!(err.to_string().contains("invalid width"));
    }
}
