//! Neutral document tree, independent of the output format

/// Horizontal paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Run of text with uniform formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Centered bold document title
    Title(String),
    /// Numbered or named section heading, bold and left aligned
    Heading(String),
    Paragraph { spans: Vec<Span>, align: Align },
    /// Empty line
    Spacer,
    /// Two signature columns rendered side by side, each a list of lines
    Signatures { left: Vec<String>, right: Vec<String> },
}

impl Block {
    /// Justified body paragraph with a single plain span
    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph {
            spans: vec![Span::plain(text)],
            align: Align::Justify,
        }
    }

    pub fn aligned(text: impl Into<String>, align: Align) -> Self {
        Block::Paragraph {
            spans: vec![Span::plain(text)],
            align,
        }
    }

    pub fn spans(spans: Vec<Span>) -> Self {
        Block::Paragraph {
            spans,
            align: Align::Justify,
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Block::Title(text) | Block::Heading(text) => out.push_str(text),
            Block::Paragraph { spans, .. } => {
                for span in spans {
                    out.push_str(&span.text);
                }
            }
            Block::Spacer => {}
            Block::Signatures { left, right } => {
                out.push_str(&left.join("\n"));
                out.push('\n');
                out.push_str(&right.join("\n"));
            }
        }
    }
}

/// A complete document ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) -> &mut Self {
        self.blocks.extend(blocks);
        self
    }

    /// All text of the document, one block per line
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.push_text(&mut out);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_joins_spans_and_signatures() {
        let mut doc = Document::new("Потврда");
        doc.push(Block::Title("ПОТВРДА".into()))
            .push(Block::spans(vec![Span::plain("Се потврдува дека "), Span::bold("Марко")]))
            .push(Block::Spacer)
            .push(Block::Signatures {
                left: vec!["Работник".into()],
                right: vec!["Управител".into(), "Ана".into()],
            });

        let text = doc.plain_text();
        assert!(text.contains("ПОТВРДА\n"));
        assert!(text.contains("Се потврдува дека Марко\n"));
        assert!(text.contains("Управител\nАна"));
    }
}
