//! The outcome of compiling an expression or sub-expression.

use crate::datatype::Datatype;
use crate::fragment::Fragment;
use crate::message::{Message, MessageList};
use crate::span::Span;
use crate::value::Value;

/// Compiled code, its datatype and the diagnostics produced on the way.
///
/// A result has succeeded exactly when it carries no error message. Results
/// are never modified in place: combining them consumes the inputs and yields
/// a new result.
#[derive(Debug, Clone)]
pub struct CompilationResult {
    fragment: Fragment,
    datatype: Option<Datatype>,
    messages: MessageList,
}

impl CompilationResult {
    /// A successful result.
    pub fn new(fragment: Fragment, datatype: Datatype) -> Self {
        Self {
            fragment,
            datatype: Some(datatype),
            messages: MessageList::new(),
        }
    }

    /// A constant of the value's own datatype.
    pub fn constant(value: Value) -> Self {
        let datatype = value.datatype();
        Self::new(Fragment::Const(value), datatype)
    }

    /// A failed result carrying `message`.
    pub fn failed(message: Message) -> Self {
        Self::from_messages(MessageList::from(message))
    }

    /// A result without code, carrying `messages`.
    pub fn from_messages(messages: MessageList) -> Self {
        Self {
            fragment: Fragment::Invalid,
            datatype: None,
            messages,
        }
    }

    /// This result with `message` appended.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// This result with `messages` appended.
    pub fn with_messages(mut self, messages: MessageList) -> Self {
        self.messages.append(messages);
        self
    }

    /// This result with `messages` placed before its own.
    pub fn with_leading_messages(mut self, messages: MessageList) -> Self {
        let own = std::mem::replace(&mut self.messages, messages);
        self.messages.append(own);
        self
    }

    /// Locate every message without a span at `span`.
    pub fn with_span_if_missing(mut self, span: Span) -> Self {
        self.messages = self.messages.with_span_if_missing(span);
        self
    }

    /// Whether no error message was recorded.
    pub fn succeeded(&self) -> bool {
        !self.messages.contains_error_msg()
    }

    pub fn failed_to_compile(&self) -> bool {
        !self.succeeded()
    }

    /// The result datatype; `None` when no code was produced.
    pub fn datatype(&self) -> Option<&Datatype> {
        self.datatype.as_ref()
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn into_parts(self) -> (Fragment, Option<Datatype>, MessageList) {
        (self.fragment, self.datatype, self.messages)
    }

    /// Distinct identifiers the compiled code reads, in order of first use.
    pub fn identifiers(&self) -> Vec<(&str, &Datatype)> {
        let mut seen: Vec<(&str, &Datatype)> = Vec::new();
        self.fragment.for_each_identifier(&mut |name, datatype| {
            if !seen.iter().any(|(n, _)| *n == name) {
                seen.push((name, datatype));
            }
        });
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageCode;

    #[test]
    fn constant_has_value_datatype() {
        let result = CompilationResult::constant(Value::from(true));
        assert!(result.succeeded());
        assert_eq!(result.datatype(), Some(&Datatype::Boolean));
    }

    #[test]
    fn warnings_do_not_fail() {
        let result = CompilationResult::constant(Value::Integer(1))
            .with_message(Message::warning(MessageCode::NoOperation, "careful"));
        assert!(result.succeeded());

        let result = result.with_message(Message::error(MessageCode::NoOperation, "broken"));
        assert!(result.failed_to_compile());
        assert_eq!(result.messages().len(), 2);
    }

    #[test]
    fn leading_messages_come_first() {
        let result = CompilationResult::failed(Message::error(MessageCode::NoOperation, "second"))
            .with_leading_messages(MessageList::from(Message::warning(
                MessageCode::InvalidLiteral,
                "first",
            )))
            .with_span_if_missing(Span::new(1, 1, 3));
        let texts: Vec<_> = result.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(result.messages().iter().all(|m| m.span() == Some(Span::new(1, 1, 3))));
    }

    #[test]
    fn failed_result_has_no_code() {
        let result = CompilationResult::failed(Message::error(MessageCode::SyntaxError, "oops"));
        assert!(result.fragment().is_invalid());
        assert_eq!(result.datatype(), None);
    }

    #[test]
    fn identifiers_are_unique() {
        let a = Fragment::Identifier {
            name: "a".into(),
            datatype: Datatype::Decimal,
        };
        let fragment = Fragment::Call(Box::new(crate::fragment::CallNode {
            function: crate::fragment::NativeFunction::new("F", |args, _| Ok(args[0].clone())),
            args: vec![a.clone(), a],
            numeric: Default::default(),
        }));
        let result = CompilationResult::new(fragment, Datatype::Decimal);
        assert_eq!(result.identifiers(), vec![("a", &Datatype::Decimal)]);
    }
}
