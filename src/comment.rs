//! Comment trivia grouping: turns a stream of comment trivia into the
//! batches the rest of the pipeline classifies one at a time.

/// A single piece of comment trivia as exposed by the host's syntax tree.
///
/// Line numbers and columns are 1-based, matching the host contract.
pub trait Trivium {
    fn is_block(&self) -> bool;
    fn is_line(&self) -> bool {
        !self.is_block()
    }
    fn start_line(&self) -> u32;
    fn start_col(&self) -> u32;
    fn end_line(&self) -> u32;
    fn end_col(&self) -> u32;
    fn text(&self) -> &str;
}

/// The kind of a comment batch, determining how `SignStripper` strips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    BlockJavadoc,
    BlockNonJavadoc,
    LineGroup,
}

/// A non-empty ordered run of trivia that classify together as one unit.
pub struct CommentBatch<'a, T: Trivium> {
    pub kind: CommentKind,
    pub trivia: Vec<&'a T>,
}

impl<'a, T: Trivium> CommentBatch<'a, T> {
    pub fn first(&self) -> &T {
        self.trivia[0]
    }

    pub fn last(&self) -> &T {
        self.trivia[self.trivia.len() - 1]
    }

    /// Joins the raw text of every trivium in the batch with `"\n"`.
    pub fn joined_text(&self) -> String {
        self.trivia
            .iter()
            .map(|t| t.text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn is_javadoc(text: &str) -> bool {
    text.starts_with("/**")
}

/// Coalesces adjacent line-comment trivia into blocks; passes block comments
/// through individually; filters Javadoc entirely.
pub fn group<'a, T: Trivium>(trivia: &'a [T]) -> Vec<CommentBatch<'a, T>> {
    let mut batches = Vec::new();
    let mut buffer: Vec<&T> = Vec::new();
    let mut last_line: Option<u32> = None;

    let flush = |buffer: &mut Vec<&'a T>, batches: &mut Vec<CommentBatch<'a, T>>| {
        if !buffer.is_empty() {
            batches.push(CommentBatch {
                kind: CommentKind::LineGroup,
                trivia: std::mem::take(buffer),
            });
        }
    };

    for trivium in trivia {
        if is_javadoc(trivium.text()) {
            continue;
        }

        if trivium.is_block() {
            // Javadoc blocks were already skipped above, so any block reaching
            // here is non-Javadoc by construction.
            flush(&mut buffer, &mut batches);
            batches.push(CommentBatch {
                kind: CommentKind::BlockNonJavadoc,
                trivia: vec![trivium],
            });
            last_line = Some(trivium.end_line());
            continue;
        }

        let contiguous = buffer.is_empty()
            || match last_line {
                Some(last) => trivium.start_line() <= last + 1,
                None => true,
            };

        if contiguous {
            buffer.push(trivium);
        } else {
            flush(&mut buffer, &mut batches);
            buffer.push(trivium);
        }
        last_line = Some(trivium.start_line());
    }

    flush(&mut buffer, &mut batches);
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeTrivium {
        block: bool,
        start_line: u32,
        end_line: u32,
        text: String,
    }

    impl Trivium for FakeTrivium {
        fn is_block(&self) -> bool {
            self.block
        }
        fn start_line(&self) -> u32 {
            self.start_line
        }
        fn start_col(&self) -> u32 {
            1
        }
        fn end_line(&self) -> u32 {
            self.end_line
        }
        fn end_col(&self) -> u32 {
            1
        }
        fn text(&self) -> &str {
            &self.text
        }
    }

    fn line(n: u32, text: &str) -> FakeTrivium {
        FakeTrivium {
            block: false,
            start_line: n,
            end_line: n,
            text: text.to_string(),
        }
    }

    fn block(start: u32, end: u32, text: &str) -> FakeTrivium {
        FakeTrivium {
            block: true,
            start_line: start,
            end_line: end,
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_trivia_yields_no_batches() {
        let trivia: Vec<FakeTrivium> = Vec::new();
        assert!(group(&trivia).is_empty());
    }

    #[test]
    fn consecutive_lines_group_and_a_gap_splits() {
        let trivia = vec![
            line(1, "// a"),
            line(2, "// b"),
            line(3, "// c"),
            line(6, "// d"),
        ];
        let batches = group(&trivia);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].trivia.len(), 3);
        assert_eq!(batches[1].trivia.len(), 1);
        assert!(matches!(batches[0].kind, CommentKind::LineGroup));
    }

    #[test]
    fn javadoc_is_filtered() {
        let trivia = vec![block(1, 3, "/** doc */"), line(4, "// ok")];
        let batches = group(&trivia);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].trivia[0].text(), "// ok");
    }

    #[test]
    fn block_comment_flushes_pending_line_group_and_stands_alone() {
        let trivia = vec![line(1, "// a"), block(2, 2, "/* b */"), line(3, "// c")];
        let batches = group(&trivia);
        assert_eq!(batches.len(), 3);
        assert!(matches!(batches[0].kind, CommentKind::LineGroup));
        assert!(matches!(batches[1].kind, CommentKind::BlockNonJavadoc));
        assert!(matches!(batches[2].kind, CommentKind::LineGroup));
    }

    #[test]
    fn line_group_after_block_resets_adjacency_cursor() {
        // Block ends on line 5; a line comment starting on line 6 should still
        // be considered contiguous with the (empty) buffer that follows it.
        let trivia = vec![block(1, 5, "/* b */"), line(6, "// c"), line(7, "// d")];
        let batches = group(&trivia);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].trivia.len(), 2);
    }

    #[test]
    fn joined_text_uses_newline_separator() {
        let trivia = vec![line(1, "// a"), line(2, "// b")];
        let batches = group(&trivia);
        assert_eq!(batches[0].joined_text(), "// a\n// b");
    }
}
