//! Line classification and the paragraph-wrapping state machine.

/// Structural role of one line of already-rewritten HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace-only line
    Blank,
    /// `<h1>` through `<h6>`
    Heading,
    /// `<hr>`
    Rule,
    /// Opening `<ul>` / `<ol>`
    ListOpen,
    /// `<li>` line inside a list
    ListItem,
    /// Closing `</ul>` / `</ol>`
    ListClose,
    /// Anything else: paragraph content
    Text,
}

impl LineKind {
    /// Classify a line. Only the line itself is inspected.
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            LineKind::Blank
        } else if line.starts_with("<hr") {
            LineKind::Rule
        } else if is_heading_tag(line) {
            LineKind::Heading
        } else if line.starts_with("<ul") || line.starts_with("<ol") {
            LineKind::ListOpen
        } else if line.starts_with("</ul") || line.starts_with("</ol") {
            LineKind::ListClose
        } else if line.starts_with("<li") {
            LineKind::ListItem
        } else {
            LineKind::Text
        }
    }

    /// Whether this kind of line ends an open paragraph.
    pub fn is_block(self) -> bool {
        !matches!(self, LineKind::Text)
    }
}

fn is_heading_tag(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 2 && bytes[0] == b'<' && bytes[1] == b'h' && (b'1'..=b'6').contains(&bytes[2])
}

/// Paragraph-wrapping state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    /// Between blocks
    #[default]
    Idle,
    /// A `<p>` has been opened and not yet closed
    InParagraph,
    /// Inside a `<ul>`/`<ol>` container
    InList,
}

/// Result of feeding one line to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the line
    pub next: BlockState,
    /// Emit `</p>` before the line
    pub close_paragraph: bool,
    /// Emit `<p>` before the line
    pub open_paragraph: bool,
}

impl Transition {
    fn to(next: BlockState) -> Self {
        Self {
            next,
            close_paragraph: false,
            open_paragraph: false,
        }
    }

    fn closing(next: BlockState) -> Self {
        Self {
            close_paragraph: true,
            ..Self::to(next)
        }
    }
}

impl BlockState {
    /// Transition on a line of the given kind.
    pub fn transition(self, kind: LineKind) -> Transition {
        use BlockState::*;
        use LineKind::*;

        match (self, kind) {
            (InParagraph, Text) => Transition::to(InParagraph),
            (InParagraph, ListOpen) => Transition::closing(InList),
            (InParagraph, _) => Transition::closing(Idle),

            (InList, Blank | Heading | Rule | ListClose) => Transition::to(Idle),
            (InList, _) => Transition::to(InList),

            (Idle, Text) => Transition {
                open_paragraph: true,
                ..Transition::to(InParagraph)
            },
            (Idle, ListOpen) => Transition::to(InList),
            (Idle, _) => Transition::to(Idle),
        }
    }
}

/// Wrap runs of plain lines in `<p>` containers.
///
/// `<p>` and `</p>` are emitted on their own lines. A blank line closes an
/// open paragraph exactly once no matter how many blank lines follow.
pub fn wrap_paragraphs(html: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut state = BlockState::Idle;

    for line in html.split('\n') {
        let kind = LineKind::classify(line);
        let step = state.transition(kind);

        if step.close_paragraph {
            output.push("</p>");
        }
        if step.open_paragraph {
            output.push("<p>");
        }
        output.push(line);

        state = step.next;
        // A list opened and closed on the same line leaves the list again.
        if kind == LineKind::ListOpen && closes_list(line) {
            state = BlockState::Idle;
        }
    }

    if state == BlockState::InParagraph {
        output.push("</p>");
    }

    output.join("\n")
}

fn closes_list(line: &str) -> bool {
    let line = line.trim_end();
    line.ends_with("</ul>") || line.ends_with("</ol>")
}
