//! Text insertion edits.
//!
//! The rewriter never reprints the tree: the annotation pass produces a list
//! of insertions against the original source, and this module splices them
//! in. Output is byte-identical to the input everywhere an edit does not
//! land. Edits at the same offset keep their emission order.

/// One insertion: `text` spliced in directly before byte offset `at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub at: usize,
    pub text: String,
}

impl Edit {
    pub fn new(at: usize, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
        }
    }
}

/// Applies all edits to the source in one pass.
pub fn apply_edits(source: &str, edits: &[Edit]) -> String {
    let mut ordered: Vec<&Edit> = edits.iter().collect();
    // Stable: ties keep the order the pass emitted them in.
    ordered.sort_by_key(|e| e.at);

    let added: usize = ordered.iter().map(|e| e.text.len()).sum();
    let mut out = String::with_capacity(source.len() + added);
    let mut cursor = 0;
    for edit in ordered {
        out.push_str(&source[cursor..edit.at]);
        out.push_str(&edit.text);
        cursor = edit.at;
    }
    out.push_str(&source[cursor..]);
    out
}

/// The whitespace indentation of the line containing `offset`.
pub fn line_indent(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line = &source[line_start..offset];
    let indent_len = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..indent_len]
}
