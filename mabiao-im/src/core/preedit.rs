//! Preedit string management
//!
//! Handles the composition string (preedit) that is displayed while the user
//! is typing and before text is committed.

/// Attribute type for preedit text styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// Underline for the whole uncommitted span
    Underline,
    /// Color for phrases finalized into the preedit, left of the cursor
    PrecommitLeft,
    /// Plain style for the live segment being matched
    Current,
    /// Color for phrases finalized into the preedit, right of the cursor
    PrecommitRight,
    /// Color for the rejected suffix of the live segment
    Invalid,
}

/// A text attribute with range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreeditAttribute {
    /// Start position (character index)
    pub start: usize,
    /// End position (character index, exclusive)
    pub end: usize,
    /// Attribute type
    pub attr_type: AttributeType,
}

impl PreeditAttribute {
    pub fn new(start: usize, end: usize, attr_type: AttributeType) -> Self {
        Self {
            start,
            end,
            attr_type,
        }
    }

    /// Create an underline attribute for the entire range
    pub fn underline(start: usize, end: usize) -> Self {
        Self::new(start, end, AttributeType::Underline)
    }
}

/// A segment within the preedit text
#[derive(Debug, Clone)]
pub struct PreeditSegment {
    /// The text content of this segment
    pub text: String,
    /// The attribute type for this segment
    pub attr_type: AttributeType,
}

impl PreeditSegment {
    pub fn new(text: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            text: text.into(),
            attr_type,
        }
    }
}

/// Preedit string with cursor position and attributes
#[derive(Debug, Clone, Default)]
pub struct Preedit {
    /// The preedit text
    text: String,
    /// Caret (cursor) position in characters
    caret: usize,
    /// Text attributes for styling
    attributes: Vec<PreeditAttribute>,
}

impl Preedit {
    /// Create a new empty preedit
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the preedit text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the caret position (in characters)
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Get the text attributes
    pub fn attributes(&self) -> &[PreeditAttribute] {
        &self.attributes
    }

    /// Check if the preedit is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Get the length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Set the caret position
    pub fn set_caret(&mut self, caret: usize) {
        let len = self.len();
        self.caret = caret.min(len);
    }

    /// Append an attribute
    pub fn push_attribute(&mut self, attribute: PreeditAttribute) {
        self.attributes.push(attribute);
    }

    /// Create a preedit from segments. Empty segments are skipped; the
    /// whole span is underlined.
    pub fn from_segments(segments: Vec<PreeditSegment>, caret: usize) -> Self {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        let mut attributes: Vec<_> = segments
            .iter()
            .filter(|s| !s.text.is_empty())
            .scan(0usize, |pos, seg| {
                let start = *pos;
                *pos += seg.text.chars().count();
                Some(PreeditAttribute::new(start, *pos, seg.attr_type))
            })
            .collect();
        let len = text.chars().count();
        if len > 0 {
            attributes.push(PreeditAttribute::underline(0, len));
        }
        Self {
            text,
            caret: caret.min(len),
            attributes,
        }
    }
}
