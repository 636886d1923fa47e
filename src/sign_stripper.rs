//! Removes comment delimiters according to a batch's `CommentKind`.

use crate::comment::{CommentBatch, CommentKind, Trivium};
use crate::error::Error;

const JAVADOC_HEADERS: [&str; 4] = ["/** ", "/**\t", "/**\n", "/**\r\n"];

/// Strips comment delimiters from a batch's joined text.
///
/// Returns `Error::UnrecognizedCommentPrefix` when the kind is `BlockJavadoc`
/// and none of the four recognized headers match — this cannot happen for
/// batches produced by [`crate::comment::group`], which only ever tags a
/// batch `BlockJavadoc` when its text started with `/**`, but a caller
/// constructing batches directly must still handle the error.
pub fn strip<T: Trivium>(batch: &CommentBatch<'_, T>) -> Result<String, Error> {
    let text = batch.joined_text();
    match batch.kind {
        CommentKind::BlockJavadoc => strip_javadoc(&text),
        CommentKind::LineGroup => Ok(strip_line_group(&text)),
        CommentKind::BlockNonJavadoc => Ok(strip_block(&text)),
    }
}

fn strip_javadoc(text: &str) -> Result<String, Error> {
    let header = JAVADOC_HEADERS
        .iter()
        .find(|h| text.starts_with(*h))
        .ok_or_else(|| Error::UnrecognizedCommentPrefix(text.chars().take(4).collect()))?;

    let body = &text[header.len()..];
    let body = body.strip_suffix("*/").unwrap_or(body);
    Ok(body.to_string())
}

fn strip_line_group(text: &str) -> String {
    let without_leading = text.strip_prefix("//").unwrap_or(text);
    without_leading.replace("\n//", "\n")
}

fn strip_block(text: &str) -> String {
    let without_leading = text.strip_prefix("/*").unwrap_or(text);
    without_leading.strip_suffix("*/").unwrap_or(without_leading).to_string()
}
