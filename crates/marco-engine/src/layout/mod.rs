//! # Layout
//!
//! Resolves whitespace and paragraph structure in a parsed message, editing
//! the tree in place so the rich-text walker can treat text literally.
//!
//! Two whitespace modes exist, matching the two the chat markup subset can
//! express:
//!
//! - **Normal**: runs of spaces, tabs and line breaks collapse to one space,
//!   and spaces at the start and end of a paragraph are dropped
//! - **Pre**: text is kept as written, except that the newline directly after
//!   a `<pre>` start tag is removed
//!
//! A *paragraph* is a run of phrasing (inline) content uninterrupted by a
//! block element. Between paragraphs the pass inserts a separator string at
//! the shallowest position that still sits between the two runs, so
//! `<p>1</p><b><i>2</i></b>` becomes `[P "1", "¶", B [I "2"]]` rather than
//! putting the separator inside `<i>`.
//!
//! Other edits made along the way:
//!
//! - `<br>` is replaced by a `"\n"` text node
//! - text that becomes empty is removed
//! - elements left with no content are removed, except `img`, `hr` and `li`
//!
//! All bookkeeping lives in a [`ParagraphState`] passed down the recursion,
//! so any subtree can be laid out on its own.

use crate::markup::{MarkupTree, NodeId, Tag};


/// Paragraph separator used when the caller does not pick one.
pub const DEFAULT_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteSpace {
    #[default]
    Normal,
    Pre,
}

#[derive(Debug, Clone, Copy)]
struct PhrasingStart {
    node: NodeId,
    depth: usize,
}

/// Paragraph bookkeeping threaded through the layout recursion.
#[derive(Debug, Default)]
pub struct ParagraphState {
    in_paragraph: bool,
    /// Once any paragraph has been seen, the next one needs a separator.
    seen_paragraph: bool,
    previous_whitespace: bool,
    /// Text that ended the current paragraph so far, for trimming its tail.
    last_text: Option<NodeId>,
    /// Empty placeholder where the next separator should go.
    phrasing_start: Option<PhrasingStart>,
}

impl ParagraphState {
    pub fn in_paragraph(&self) -> bool {
        self.in_paragraph
    }

    pub fn seen_paragraph(&self) -> bool {
        self.seen_paragraph
    }
}

/// Lay out a whole tree. Returns whether any content survived.
pub fn layout(tree: &mut MarkupTree, separator: &str) -> bool {
    let root = tree.root();
    layout_node(tree, root, separator, &mut ParagraphState::default())
}

/// Lay out the subtree at `node`, continuing from `state`.
///
/// A `<br>` is only replaced when it has a parent, so passing a `<br>`
/// element itself leaves it in place.
pub fn layout_node(
    tree: &mut MarkupTree,
    node: NodeId,
    separator: &str,
    state: &mut ParagraphState,
) -> bool {
    let mut pass = LayoutPass { tree, separator };
    pass.element(state, node, None, WhiteSpace::Normal, 0)
}

/// Merge adjacent text siblings throughout the tree.
pub fn simplify(tree: &mut MarkupTree) {
    let root = tree.root();
    simplify_element(tree, root);
}

fn simplify_element(tree: &mut MarkupTree, id: NodeId) {
    let mut index = 0;
    while index < tree.children(id).len() {
        let child = tree.children(id)[index];
        if tree.element(child).is_some() {
            simplify_element(tree, child);
            index += 1;
            continue;
        }

        let previous = index.checked_sub(1).map(|i| tree.children(id)[i]);
        if let Some(previous) = previous
            && tree.text(previous).is_some()
            && let Some(text) = tree.text(child).map(str::to_owned)
        {
            if let Some(previous_text) = tree.text_mut(previous) {
                previous_text.push_str(&text);
            }
            tree.remove_child(id, index);
        } else {
            index += 1;
        }
    }
}

/// Whitespace as the layout model sees it. Non-breaking spaces are content.
fn is_layout_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_layout_whitespace(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

struct LayoutPass<'a> {
    tree: &'a mut MarkupTree,
    separator: &'a str,
}

impl LayoutPass<'_> {
    /// Make sure a paragraph is open, with `node` as its latest text.
    ///
    /// Opening a new paragraph after an earlier one places the separator in
    /// the pending placeholder if that sits shallower than `node`, otherwise
    /// at the front of `node` itself.
    fn start_paragraph(&mut self, state: &mut ParagraphState, node: NodeId, depth: usize) {
        if !state.in_paragraph && state.seen_paragraph {
            match state.phrasing_start.take() {
                Some(start) if start.depth < depth => {
                    if let Some(text) = self.tree.text_mut(start.node) {
                        *text = self.separator.to_string();
                    }
                }
                _ => {
                    if let Some(text) = self.tree.text_mut(node) {
                        text.insert_str(0, self.separator);
                    }
                }
            }
        }

        state.in_paragraph = true;
        state.seen_paragraph = true;
        state.previous_whitespace = self
            .tree
            .text(node)
            .and_then(|text| text.chars().next_back())
            .is_some_and(is_layout_whitespace);
        state.last_text = Some(node);
    }

    /// Close any open paragraph, trimming one final newline and, in normal
    /// whitespace, one final space.
    fn end_paragraph(&mut self, state: &mut ParagraphState, white_space: WhiteSpace) {
        if !state.in_paragraph {
            return;
        }
        if let Some(last) = state.last_text
            && let Some(text) = self.tree.text_mut(last)
        {
            if text.ends_with('\n') {
                text.pop();
            }
            if white_space == WhiteSpace::Normal && text.ends_with(' ') {
                text.pop();
            }
        }
        state.in_paragraph = false;
        state.previous_whitespace = true;
        state.last_text = None;
    }

    fn element(
        &mut self,
        state: &mut ParagraphState,
        id: NodeId,
        parent: Option<NodeId>,
        mut white_space: WhiteSpace,
        depth: usize,
    ) -> bool {
        let Some(tag) = self.tree.tag(id).cloned() else {
            return false;
        };
        let non_phrasing = !tag.is_phrasing();
        let mut strip_leading_newline = false;
        let mut has_content = false;

        if non_phrasing {
            self.end_paragraph(state, white_space);
        }

        match tag {
            Tag::Br => {
                if let Some(parent) = parent {
                    if white_space == WhiteSpace::Normal
                        && state.previous_whitespace
                        && let Some(last) = state.last_text
                        && let Some(text) = self.tree.text_mut(last)
                        && text.ends_with(' ')
                    {
                        text.pop();
                    }
                    let newline = self.tree.create_text("\n");
                    self.start_paragraph(state, newline, depth);
                    self.tree.replace_child(parent, id, newline);
                }
                return true;
            }
            Tag::Pre => {
                white_space = WhiteSpace::Pre;
                strip_leading_newline = true;
            }
            _ => {}
        }

        if tag.allows_empty() {
            let placeholder = self.tree.create_text("");
            self.start_paragraph(state, placeholder, depth);
            has_content = true;
        }

        let mut index = 0;
        while index < self.tree.children(id).len() {
            let child = self.tree.children(id)[index];

            if self.tree.text(child).is_some() {
                self.text(state, child, strip_leading_newline, white_space, depth + 1);
                if self.tree.text(child).is_some_and(str::is_empty) {
                    self.tree.remove_child(id, index);
                } else {
                    has_content = true;
                    index += 1;
                }
            } else {
                let child_is_phrasing = self.tree.tag(child).is_some_and(Tag::is_phrasing);
                if state.seen_paragraph
                    && state.phrasing_start.is_none_or(|start| start.depth > depth)
                    && (!child_is_phrasing || !state.in_paragraph)
                {
                    let placeholder = self.tree.create_text("");
                    self.tree.insert_child(id, index, placeholder);
                    index += 1;
                    state.phrasing_start = Some(PhrasingStart {
                        node: placeholder,
                        depth,
                    });
                }

                if self.element(state, child, Some(id), white_space, depth + 1) {
                    has_content = true;
                    index += 1;
                } else {
                    self.tree.remove_child(id, index);
                }
            }

            strip_leading_newline = false;
        }

        if non_phrasing {
            self.end_paragraph(state, white_space);
        }

        has_content
    }

    fn text(
        &mut self,
        state: &mut ParagraphState,
        id: NodeId,
        strip_leading_newline: bool,
        white_space: WhiteSpace,
        depth: usize,
    ) {
        let Some(raw) = self.tree.text(id) else {
            return;
        };

        let mut text = normalize_newlines(raw);
        if strip_leading_newline && text.starts_with('\n') {
            text.remove(0);
        }
        if white_space == WhiteSpace::Normal {
            text = collapse_whitespace(&text);
            if (!state.in_paragraph || state.previous_whitespace) && text.starts_with(' ') {
                text.remove(0);
            }
        }

        let has_text = !text.is_empty();
        if let Some(slot) = self.tree.text_mut(id) {
            *slot = text;
        }
        if has_text {
            self.start_paragraph(state, id, depth);
        }
    }
}
