//! Lexical scanning of raw input into line-addressable source units.
//!
//! A [`SourceUnit`] owns one scanned text blob for the duration of a single
//! scan invocation. Line starts are indexed once up front so that every rule
//! can re-walk the same unit cheaply; [`SourceUnit::lines`] hands out a fresh
//! iterator each call.

/// Classification of a unit's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// Valid text content, eligible for pattern matching.
    Text,
    /// Binary content (embedded NUL bytes or invalid UTF-8). Matching is
    /// skipped and the unit is reported as a `skipped: binary-content` note.
    Binary,
}

/// One line of a source unit.
///
/// Line numbers are 1-based; byte offsets are 0-based and point into the
/// unit's content. The text excludes the line terminator (`\n` or `\r\n`).
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// 0-based byte offset of the first byte of the line.
    pub offset: usize,
    /// Line text without its terminator.
    pub text: &'a str,
}

/// A single scanned text blob with derived line structure.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    id: String,
    content: String,
    kind: UnitKind,
    /// Byte index of the start of each line. Always begins with 0.
    line_starts: Vec<usize>,
}

impl SourceUnit {
    /// Scans raw bytes into a source unit.
    ///
    /// Content containing NUL bytes or invalid UTF-8 is classified as
    /// [`UnitKind::Binary`]; this is not a failure, the unit simply carries
    /// no lines.
    #[must_use]
    pub fn scan(unit_id: impl Into<String>, raw: &[u8]) -> Self {
        let id = unit_id.into();
        if raw.contains(&0) {
            return Self {
                id,
                content: String::new(),
                kind: UnitKind::Binary,
                line_starts: Vec::new(),
            };
        }
        match std::str::from_utf8(raw) {
            Ok(text) => Self::from_text(id, text),
            Err(_) => Self {
                id,
                content: String::new(),
                kind: UnitKind::Binary,
                line_starts: Vec::new(),
            },
        }
    }

    /// Builds a source unit from text already known to be valid UTF-8.
    #[must_use]
    pub fn from_text(unit_id: impl Into<String>, text: &str) -> Self {
        let mut line_starts = vec![0];
        // Newlines are always single bytes in UTF-8, so byte iteration is safe.
        for (i, byte) in text.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            id: unit_id.into(),
            content: text.to_owned(),
            kind: UnitKind::Text,
            line_starts,
        }
    }

    /// Identifier of the unit (path or label).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw content of the unit. Empty for binary units.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the unit was classified as binary.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.kind == UnitKind::Binary
    }

    /// Number of lines in the unit. A trailing newline does not open a new
    /// line; a zero-byte unit has zero lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Returns a fresh, restartable iterator over the unit's lines.
    #[must_use]
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            unit: self,
            next: 0,
        }
    }

    /// Returns the line holding the given 1-based number, if any.
    #[must_use]
    pub fn line(&self, number: usize) -> Option<Line<'_>> {
        self.lines().nth(number.checked_sub(1)?)
    }

    /// Converts a 0-based byte offset into a 1-based line number.
    #[must_use]
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }
}

/// Restartable iterator over the lines of a [`SourceUnit`].
#[derive(Debug)]
pub struct Lines<'a> {
    unit: &'a SourceUnit,
    next: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let starts = &self.unit.line_starts;
        let start = *starts.get(self.next)?;
        let content = &self.unit.content;
        if start >= content.len() {
            return None;
        }
        let end = starts
            .get(self.next + 1)
            .map_or(content.len(), |next_start| next_start - 1);
        let mut text = &content[start..end];
        // Two-character terminators: drop the carriage return too.
        if let Some(stripped) = text.strip_suffix('\r') {
            text = stripped;
        }
        let line = Line {
            number: self.next + 1,
            offset: start,
            text,
        };
        self.next += 1;
        Some(line)
    }
}
