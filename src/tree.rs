//! Reads a category hierarchy from an indented text outline.
//!
//! Each non-blank line holds one name. Nesting is shown by indenting a line
//! one [INDENT_UNIT] deeper than its parent:
//!
//! ```text
//! food
//!     groceries
//!     restaurants
//! transport
//! ```

use crate::Error;

/// The number of spaces per nesting level.
pub const INDENT_UNIT: usize = 4;

/// A name from an outline together with its position in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// The nesting depth, zero for top-level names.
    pub depth: usize,
    /// The trimmed name.
    pub name: String,
    /// The name of the parent, `None` for top-level names.
    pub parent: Option<String>,
}

/// Read the outline in `lines` lazily, in document order.
///
/// # Examples
/// ```
/// use bookkeeper::read_tree;
///
/// let pairs: Vec<(String, Option<String>)> = read_tree(["a", "    b", "c"])
///     .map(|entry| entry.map(|entry| (entry.name, entry.parent)))
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(
///     pairs,
///     vec![
///         ("a".to_owned(), None),
///         ("b".to_owned(), Some("a".to_owned())),
///         ("c".to_owned(), None),
///     ]
/// );
/// ```
pub fn read_tree<I>(lines: I) -> TreeReader<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    TreeReader {
        lines: lines.into_iter(),
        ancestors: Vec::new(),
        line_number: 0,
        failed: false,
    }
}

/// An iterator over the entries of an outline, created by [read_tree].
///
/// Yields [Error::InvalidInput] for a line that does not fit the outline, and
/// nothing after that.
#[derive(Debug)]
pub struct TreeReader<I> {
    lines: I,
    /// The chain of (depth, name) from the root to the previous entry.
    ancestors: Vec<(usize, String)>,
    line_number: usize,
    failed: bool,
}

impl<I> TreeReader<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn read_entry(&mut self, line: &str) -> Result<TreeEntry, Error> {
        let name = line.trim();
        let indent = &line[..line.len() - line.trim_start().len()];

        if indent.chars().any(|c| c != ' ') {
            return Err(self.invalid("indentation must use spaces only"));
        }

        if indent.len() % INDENT_UNIT != 0 {
            return Err(self.invalid(&format!(
                "indentation of {} spaces is not a multiple of {INDENT_UNIT}",
                indent.len()
            )));
        }

        let depth = indent.len() / INDENT_UNIT;

        while self
            .ancestors
            .last()
            .is_some_and(|(ancestor_depth, _)| *ancestor_depth >= depth)
        {
            self.ancestors.pop();
        }

        // The remaining ancestors cover depths 0..len, so a new entry can go at most one level deeper.
        if depth > self.ancestors.len() {
            return Err(self.invalid(&format!(
                "\"{name}\" is indented deeper than any parent"
            )));
        }

        let parent = self.ancestors.last().map(|(_, parent)| parent.clone());
        self.ancestors.push((depth, name.to_owned()));

        Ok(TreeEntry {
            depth,
            name: name.to_owned(),
            parent,
        })
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidInput(format!("line {}: {reason}", self.line_number))
    }
}

impl<I> Iterator for TreeReader<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<TreeEntry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let line = self.lines.next()?;
            self.line_number += 1;

            let line = line.as_ref().trim_end();
            if line.is_empty() {
                continue;
            }

            let entry = self.read_entry(line);
            self.failed = entry.is_err();

            return Some(entry);
        }
    }
}
