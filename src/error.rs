//! # Parse Errors
//!
//! This module provides the error taxonomy and merge algebra:
//!
//! - **Message**: One piece of an error report, tagged by kind
//! - **ParseError**: A source position plus an ordered set of messages
//!
//! ## Message Kinds
//!
//! Messages come in four kinds, ordered for grouping and display:
//!
//! 1. `SysUnexpected` - raised by token primitives when the input does not match
//! 2. `Unexpected` - a user-issued "this item is unexpected"
//! 3. `Expected` - a label describing what a parser wanted
//! 4. `Generic` - a free-form failure message
//!
//! Two messages are equal when they share a kind, regardless of payload.
//! Replacement and deduplication work per kind; payload deduplication only
//! happens while rendering.
//!
//! ## Merging
//!
//! When two error-producing paths meet (alternatives, sequencing), their
//! errors are merged: the error at the furthest position wins outright,
//! and errors at the same position pool their messages. An error with no
//! messages is "unknown" and loses to any known error.

use std::cmp::Ordering;
use std::fmt;

use crate::pos::SourcePos;

/// One item of an error report.
#[derive(Debug, Clone)]
pub enum Message {
    /// Auto-generated by a token primitive: the raw input did not match.
    /// An empty payload means the input ended.
    SysUnexpected(String),
    /// User-issued unexpected-item report.
    Unexpected(String),
    /// Label describing what would have been valid here.
    Expected(String),
    /// Free-form failure text.
    Generic(String),
}

impl Message {
    pub fn text(&self) -> &str {
        match self {
            Message::SysUnexpected(text)
            | Message::Unexpected(text)
            | Message::Expected(text)
            | Message::Generic(text) => text,
        }
    }

    fn index(&self) -> u8 {
        match self {
            Message::SysUnexpected(_) => 0,
            Message::Unexpected(_) => 1,
            Message::Expected(_) => 2,
            Message::Generic(_) => 3,
        }
    }
}

/// Equality is by kind only; payloads are compared nowhere outside rendering.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for Message {}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A parse failure: where it happened and what was expected there.
///
/// Also carried alongside successful replies as the *residual* error,
/// recording what else could have matched at that point; residuals are
/// merged into later failures so alternatives report every possibility.
#[derive(Debug, Clone)]
pub struct ParseError {
    pos: SourcePos,
    messages: Vec<Message>,
}

impl ParseError {
    /// An error that knows nothing yet: no messages.
    pub fn unknown(pos: SourcePos) -> Self {
        Self {
            pos,
            messages: Vec::new(),
        }
    }

    /// An error carrying a single message.
    pub fn new(pos: SourcePos, message: Message) -> Self {
        Self {
            pos,
            messages: vec![message],
        }
    }

    pub fn position(&self) -> &SourcePos {
        &self.pos
    }

    /// True when no messages have been attached.
    pub fn is_unknown(&self) -> bool {
        self.messages.is_empty()
    }

    /// The messages, sorted by kind. The sort is stable, so messages of
    /// one kind keep their insertion order.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = self.messages.clone();
        messages.sort_by_key(|m| m.index());
        messages
    }

    /// Add a message, dropping all existing messages of the same kind.
    pub fn insert(mut self, message: Message) -> Self {
        self.messages.retain(|m| m != &message);
        self.messages.insert(0, message);
        self
    }

    /// Replace all `Expected` messages with one per label. No labels at
    /// all yields a single empty label, which the renderer then elides.
    pub fn set_expected(mut self, labels: &[String]) -> Self {
        self.messages.retain(|m| !matches!(m, Message::Expected(_)));
        if labels.is_empty() {
            self.messages.push(Message::Expected(String::new()));
        } else {
            for label in labels {
                self.messages.push(Message::Expected(label.clone()));
            }
        }
        self
    }

    /// Merge two errors: an unknown error loses, the furthest position
    /// wins, and equal positions pool their messages.
    pub fn merge(self, other: ParseError) -> ParseError {
        if self.messages.is_empty() && !other.messages.is_empty() {
            return other;
        }
        if other.messages.is_empty() {
            return self;
        }
        match self.pos.cmp(&other.pos) {
            Ordering::Less => other,
            Ordering::Greater => self,
            Ordering::Equal => {
                let mut merged = self;
                merged.messages.extend(other.messages);
                merged
            }
        }
    }
}

/// Drop empty texts and duplicates, preserving order.
fn clean(texts: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for text in texts {
        if !text.is_empty() && !cleaned.contains(text) {
            cleaned.push(text.clone());
        }
    }
    cleaned
}

/// Join as "a, b or c".
fn commas_or(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        _ => {
            let (last, rest) = items.split_last().unwrap();
            format!("{} or {}", rest.join(", "), last)
        }
    }
}

fn prefixed(prefix: &str, texts: &[String]) -> String {
    let cleaned = clean(texts);
    if cleaned.is_empty() {
        String::new()
    } else {
        format!("{} {}", prefix, commas_or(&cleaned))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.pos)?;
        if self.messages.is_empty() {
            return write!(f, "\nunknown parse error");
        }

        let mut sys_unexpected = Vec::new();
        let mut unexpected = Vec::new();
        let mut expected = Vec::new();
        let mut generic = Vec::new();
        for message in self.messages() {
            let text = message.text().to_string();
            match message {
                Message::SysUnexpected(_) => sys_unexpected.push(text),
                Message::Unexpected(_) => unexpected.push(text),
                Message::Expected(_) => expected.push(text),
                Message::Generic(_) => generic.push(text),
            }
        }

        // A user-issued Unexpected overrides the auto-generated report;
        // otherwise only the first system message is shown.
        let sys_line = if !unexpected.is_empty() || sys_unexpected.is_empty() {
            String::new()
        } else if sys_unexpected[0].is_empty() {
            "unexpected end of input".to_string()
        } else {
            format!("unexpected {}", sys_unexpected[0])
        };

        let lines = [
            sys_line,
            prefixed("unexpected", &unexpected),
            prefixed("expecting", &expected),
            commas_or(&clean(&generic)),
        ];
        let mut shown: Vec<&String> = Vec::new();
        for line in &lines {
            if !line.is_empty() && !shown.contains(&line) {
                shown.push(line);
            }
        }
        for line in shown {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> SourcePos {
        SourcePos::new("test")
    }

    fn texts(error: &ParseError) -> Vec<String> {
        error
            .messages()
            .iter()
            .map(|m| m.text().to_string())
            .collect()
    }

    #[test]
    fn test_messages_equal_by_kind_only() {
        assert_eq!(Message::Expected("a".into()), Message::Expected("b".into()));
        assert_ne!(
            Message::Expected("a".into()),
            Message::Unexpected("a".into())
        );
    }

    #[test]
    fn test_messages_ordered_by_kind() {
        assert!(Message::SysUnexpected("z".into()) < Message::Unexpected("a".into()));
        assert!(Message::Unexpected("z".into()) < Message::Expected("a".into()));
        assert!(Message::Expected("z".into()) < Message::Generic("a".into()));
    }

    #[test]
    fn test_unknown_has_no_messages() {
        let error = ParseError::unknown(pos());
        assert!(error.is_unknown());
        assert!(error.messages().is_empty());
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let error = ParseError::new(pos(), Message::Expected("old".into()))
            .insert(Message::Expected("new".into()));
        assert_eq!(texts(&error), vec!["new"]);
    }

    #[test]
    fn test_insert_keeps_other_kinds() {
        let error = ParseError::new(pos(), Message::SysUnexpected("x".into()))
            .insert(Message::Expected("digit".into()));
        assert_eq!(texts(&error), vec!["x", "digit"]);
    }

    #[test]
    fn test_messages_sorted_by_kind() {
        let error = ParseError::new(pos(), Message::Generic("oops".into()))
            .insert(Message::Expected("digit".into()))
            .insert(Message::SysUnexpected("x".into()));
        assert_eq!(texts(&error), vec!["x", "digit", "oops"]);
    }

    #[test]
    fn test_set_expected_replaces_all_labels() {
        let error = ParseError::new(pos(), Message::SysUnexpected("x".into()))
            .insert(Message::Expected("a".into()))
            .insert(Message::Expected("b".into()))
            .set_expected(&["label".to_string()]);
        assert_eq!(texts(&error), vec!["x", "label"]);
    }

    #[test]
    fn test_set_expected_with_no_labels() {
        let error =
            ParseError::new(pos(), Message::Expected("a".into())).set_expected(&[]);
        assert_eq!(texts(&error), vec![""]);
        // The empty label is elided when rendering.
        assert_eq!(error.to_string(), "test:1:1:");
    }

    #[test]
    fn test_merge_unknown_loses() {
        let unknown = ParseError::unknown(pos());
        let known = ParseError::new(pos(), Message::Expected("digit".into()));

        let merged = unknown.clone().merge(known.clone());
        assert_eq!(texts(&merged), vec!["digit"]);

        let merged = known.merge(unknown);
        assert_eq!(texts(&merged), vec!["digit"]);
    }

    #[test]
    fn test_merge_furthest_position_wins() {
        let near = ParseError::new(pos(), Message::Expected("a".into()));
        let far = ParseError::new(
            pos().advance_string("abc"),
            Message::Expected("b".into()),
        );

        let merged = near.clone().merge(far.clone());
        assert_eq!(merged.position(), far.position());
        assert_eq!(texts(&merged), vec!["b"]);

        let merged = far.clone().merge(near);
        assert_eq!(merged.position(), far.position());
        assert_eq!(texts(&merged), vec!["b"]);
    }

    #[test]
    fn test_merge_equal_positions_pool_messages() {
        let first = ParseError::new(pos(), Message::Expected("a".into()));
        let second = ParseError::new(pos(), Message::Expected("b".into()));
        let merged = first.merge(second);
        assert_eq!(texts(&merged), vec!["a", "b"]);
    }

    #[test]
    fn test_display_unknown() {
        let error = ParseError::unknown(pos());
        assert_eq!(error.to_string(), "test:1:1:\nunknown parse error");
    }

    #[test]
    fn test_display_end_of_input() {
        let error = ParseError::new(pos(), Message::SysUnexpected(String::new()));
        assert_eq!(error.to_string(), "test:1:1:\nunexpected end of input");
    }

    #[test]
    fn test_display_all_sections() {
        let error = ParseError::new(pos(), Message::SysUnexpected("'x'".into()))
            .insert(Message::Expected("digit".into()))
            .insert(Message::Generic("oops".into()));
        assert_eq!(
            error.to_string(),
            "test:1:1:\nunexpected 'x'\nexpecting digit\noops"
        );
    }

    #[test]
    fn test_display_joins_with_or() {
        let a = ParseError::new(pos(), Message::Expected("a".into()));
        let b = ParseError::new(pos(), Message::Expected("b".into()));
        let c = ParseError::new(pos(), Message::Expected("c".into()));
        let merged = a.merge(b).merge(c);
        assert_eq!(merged.to_string(), "test:1:1:\nexpecting a, b or c");
    }

    #[test]
    fn test_display_user_unexpected_overrides_system() {
        let error = ParseError::new(pos(), Message::SysUnexpected("'x'".into()))
            .insert(Message::Unexpected("keyword".into()));
        assert_eq!(error.to_string(), "test:1:1:\nunexpected keyword");
    }

    #[test]
    fn test_display_dedups_duplicate_texts() {
        let a = ParseError::new(pos(), Message::Expected("digit".into()));
        let b = ParseError::new(pos(), Message::Expected("digit".into()));
        let merged = a.merge(b);
        assert_eq!(merged.to_string(), "test:1:1:\nexpecting digit");
    }
}
