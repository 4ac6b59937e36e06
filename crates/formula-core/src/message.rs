//! Compile-time diagnostics.
//!
//! A [`Message`] is created by the compiler driver or a resolver, attributed
//! to a text span and optionally to external objects, and collected into a
//! [`MessageList`]. Messages never interrupt compilation.

use std::fmt;

use crate::span::Span;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// Informational note.
    Info,
    /// Suspicious but compilable.
    Warning,
    /// The expression cannot be compiled.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageCode {
    /// Malformed expression text.
    SyntaxError,
    /// A literal token could not be converted into a value.
    InvalidLiteral,
    /// No operation is registered for an operator and its operand datatypes.
    NoOperation,
    /// No function resolver knows the called function.
    UnknownFunction,
    /// The identifier resolver does not know a name.
    UndefinedIdentifier,
    /// A function was called with the wrong number of arguments.
    WrongArgumentCount,
    /// A function does not accept the datatypes of its arguments.
    WrongArgumentTypes,
    /// The expression cannot be converted to the expected result datatype.
    IncompatibleResultType,
}

impl MessageCode {
    /// The code's stable string form.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageCode::SyntaxError => "SYNTAX_ERROR",
            MessageCode::InvalidLiteral => "INVALID_LITERAL",
            MessageCode::NoOperation => "NO_OPERATION",
            MessageCode::UnknownFunction => "UNKNOWN_FUNCTION",
            MessageCode::UndefinedIdentifier => "UNDEFINED_IDENTIFIER",
            MessageCode::WrongArgumentCount => "WRONG_ARGUMENT_COUNT",
            MessageCode::WrongArgumentTypes => "WRONG_ARGUMENT_TYPES",
            MessageCode::IncompatibleResultType => "INCOMPATIBLE_RESULT_TYPE",
        }
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An external element a message is attributed to, e.g. a modeled attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvalidObject {
    /// Identifier of the object.
    pub object: String,
    /// Optional property of the object.
    pub property: Option<String>,
}

impl InvalidObject {
    /// Attribute a message to `object`.
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            property: None,
        }
    }

    /// Attribute a message to `property` of `object`.
    pub fn with_property(object: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            property: Some(property.into()),
        }
    }
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    severity: Severity,
    code: MessageCode,
    text: String,
    span: Option<Span>,
    invalid_objects: Vec<InvalidObject>,
}

impl Message {
    /// Create a message.
    pub fn new(severity: Severity, code: MessageCode, text: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            text: text.into(),
            span: None,
            invalid_objects: Vec::new(),
        }
    }

    /// Create an error message.
    pub fn error(code: MessageCode, text: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, text)
    }

    /// Create a warning message.
    pub fn warning(code: MessageCode, text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, text)
    }

    /// Create an informational message.
    pub fn info(code: MessageCode, text: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, text)
    }

    /// This message located at `span`.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// This message additionally attributed to `object`.
    pub fn with_invalid_object(mut self, object: InvalidObject) -> Self {
        self.invalid_objects.push(object);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> MessageCode {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn invalid_objects(&self) -> &[InvalidObject] {
        &self.invalid_objects
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.severity, self.code)?;
        if let Some(span) = self.span {
            write!(f, " at {}", span)?;
        }
        write!(f, ": {}", self.text)
    }
}

/// Ordered collection of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageList {
    messages: Vec<Message>,
}

impl MessageList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append all messages of `other`, keeping their order.
    pub fn append(&mut self, other: MessageList) {
        self.messages.extend(other.messages);
    }

    /// Whether any message has error severity.
    pub fn contains_error_msg(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }

    /// Number of error messages.
    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_error()).count()
    }

    /// Highest severity in the list.
    pub fn max_severity(&self) -> Option<Severity> {
        self.messages.iter().map(Message::severity).max()
    }

    /// Codes of all messages, in order.
    pub fn codes(&self) -> Vec<MessageCode> {
        self.messages.iter().map(Message::code).collect()
    }

    /// Whether a message with `code` is present.
    pub fn contains_code(&self, code: MessageCode) -> bool {
        self.messages.iter().any(|m| m.code == code)
    }

    /// First message with error severity.
    pub fn first_error(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_error())
    }

    /// Locate every message that has no span yet at `span`.
    pub fn with_span_if_missing(mut self, span: Span) -> Self {
        for message in &mut self.messages {
            if message.span.is_none() {
                message.span = Some(span);
            }
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_vec(self) -> Vec<Message> {
        self.messages
    }
}

impl fmt::Display for MessageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", message)?;
        }
        Ok(())
    }
}

impl From<Message> for MessageList {
    fn from(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }
}

impl FromIterator<Message> for MessageList {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for MessageList {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
