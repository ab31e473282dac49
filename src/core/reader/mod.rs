//! # Reader Module
//!
//! Turns the text input into a tree collection.
//!
//! ## Format
//! One tree per line, whitespace-separated 32-bit integers. The first
//! integer seeds the root and the rest are inserted in order. The first
//! blank line ends the input. Any token that is not an integer fails the
//! whole read.
//!
//! ## Example
//! ```rust,ignore
//! use bst_dedup::core::reader::read_trees;
//!
//! let trees = read_trees("input/coarse.txt")?;
//! ```

use crate::core::tree::Tree;
use crate::error::InputError;
use std::path::Path;

/// Parse every tree in `content`
pub fn parse_trees(content: &str) -> Result<Vec<Tree>, InputError> {
    let mut trees = Vec::new();

    for (index, row) in content.lines().enumerate() {
        if row.trim().is_empty() {
            break;
        }
        trees.push(parse_row(row, index + 1)?);
    }

    Ok(trees)
}

/// Read and parse a tree file
pub fn read_trees(path: impl AsRef<Path>) -> Result<Vec<Tree>, InputError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let trees = parse_trees(&content)?;
    tracing::debug!(path = %path.display(), trees = trees.len(), "Read input");
    Ok(trees)
}

fn parse_row(row: &str, line: usize) -> Result<Tree, InputError> {
    let mut tree = Tree::new();
    for token in row.split_ascii_whitespace() {
        let value = token
            .parse::<i32>()
            .map_err(|source| InputError::InvalidToken {
                line,
                token: token.to_string(),
                source,
            })?;
        tree.insert(value);
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_one_tree_per_line() {
        let trees = parse_trees("1 2 3\n3 2 1\n5\n").unwrap();
        assert_eq!(trees.len(), 3);
        assert_eq!(trees[0].in_order().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(trees[2].len(), 1);
    }

    #[test]
    fn accepts_tabs_and_repeated_spaces() {
        let trees = parse_trees("4\t2  6\r\n").unwrap();
        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].in_order().collect::<Vec<_>>(), vec![2, 4, 6]);
    }

    #[test]
    fn blank_line_ends_input() {
        let trees = parse_trees("1\n\n2\n").unwrap();
        assert_eq!(trees.len(), 1);
    }

    #[test]
    fn empty_input_has_no_trees() {
        assert!(parse_trees("").unwrap().is_empty());
    }

    #[test]
    fn invalid_token_reports_line() {
        let error = parse_trees("1 2\n3 four 5\n").unwrap_err();
        match error {
            InputError::InvalidToken { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "four");
            }
            other => panic!("Expected InvalidToken, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        assert!(parse_trees("3000000000\n").is_err());
    }

    #[test]
    fn reads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "10 5 15\n7\n").unwrap();

        let trees = read_trees(file.path()).unwrap();
        assert_eq!(trees.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let error = read_trees("/nonexistent/trees.txt").unwrap_err();
        assert!(matches!(error, InputError::Io { .. }));
    }
}
