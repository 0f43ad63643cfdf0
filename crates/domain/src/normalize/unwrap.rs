//! Pull the best candidate text out of a loosely-shaped chat completion
//!
//! OpenAI-compatible providers disagree on where the answer lives: a string
//! `content`, an array of parts, a nested object, a legacy `text` field, or a
//! separate `reasoning_content`. The response is classified into a small set of
//! recognized shapes and an ordered chain of extractors is run over it.

use serde_json::{Map, Value};

use crate::ports::AiError;

/// Keys that may hold text on a content object or a content part
const OBJECT_TEXT_KEYS: &[&str] = &["text", "value", "output_text"];
const PART_TEXT_KEYS: &[&str] = &["text", "content", "value", "output_text"];

/// Which extraction rule produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnwrapRule {
    MessageReasoning,
    ChoiceReasoning,
    MessageContentText,
    MessageContentObject,
    MessageFields,
    MessageContentParts,
    MessageContentNested,
    ChoiceText,
    ChoiceContent,
}

impl UnwrapRule {
    /// The candidate is a model's thinking transcript rather than its answer
    pub fn is_reasoning(&self) -> bool {
        matches!(self, UnwrapRule::MessageReasoning | UnwrapRule::ChoiceReasoning)
    }
}

/// A non-blank text candidate and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unwrapped {
    pub rule: UnwrapRule,
    pub text: String,
}

/// Recognized shapes of a `content` field
#[derive(Debug, Clone, Copy)]
pub enum ContentShape<'a> {
    Absent,
    Text(&'a str),
    Parts(&'a [Value]),
    Object(&'a Map<String, Value>),
    Unrecognized(&'a Value),
}

impl<'a> ContentShape<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => ContentShape::Absent,
            Some(Value::String(s)) => ContentShape::Text(s),
            Some(Value::Array(items)) => ContentShape::Parts(items),
            Some(Value::Object(map)) => ContentShape::Object(map),
            Some(other) => ContentShape::Unrecognized(other),
        }
    }
}

/// Typed view over `choices[0]`
struct ChoiceView<'a> {
    choice: &'a Value,
    message: Option<&'a Map<String, Value>>,
    message_content: ContentShape<'a>,
    choice_content: ContentShape<'a>,
}

impl<'a> ChoiceView<'a> {
    fn new(choice: &'a Value) -> Self {
        let message = choice.get("message").and_then(Value::as_object);
        Self {
            choice,
            message,
            message_content: ContentShape::classify(message.and_then(|m| m.get("content"))),
            choice_content: ContentShape::classify(choice.get("content")),
        }
    }
}

type Extractor = fn(&ChoiceView<'_>) -> Option<String>;

/// Extraction chain, highest priority first
const RULES: &[(UnwrapRule, Extractor)] = &[
    (UnwrapRule::MessageReasoning, message_reasoning),
    (UnwrapRule::ChoiceReasoning, choice_reasoning),
    (UnwrapRule::MessageContentText, message_content_text),
    (UnwrapRule::MessageContentObject, message_content_object),
    (UnwrapRule::MessageFields, message_fields),
    (UnwrapRule::MessageContentParts, message_content_parts),
    (UnwrapRule::MessageContentNested, message_content_nested),
    (UnwrapRule::ChoiceText, choice_text),
    (UnwrapRule::ChoiceContent, choice_content),
];

fn message_reasoning(view: &ChoiceView<'_>) -> Option<String> {
    non_blank(view.message?.get("reasoning_content")?.as_str()?)
}

fn choice_reasoning(view: &ChoiceView<'_>) -> Option<String> {
    non_blank(view.choice.get("reasoning_content")?.as_str()?)
}

fn message_content_text(view: &ChoiceView<'_>) -> Option<String> {
    match view.message_content {
        ContentShape::Text(s) => non_blank(s),
        _ => None,
    }
}

fn message_content_object(view: &ChoiceView<'_>) -> Option<String> {
    match view.message_content {
        ContentShape::Object(map) => first_text(map, OBJECT_TEXT_KEYS),
        _ => None,
    }
}

fn message_fields(view: &ChoiceView<'_>) -> Option<String> {
    first_text(view.message?, OBJECT_TEXT_KEYS)
}

fn message_content_parts(view: &ChoiceView<'_>) -> Option<String> {
    match view.message_content {
        ContentShape::Parts(parts) => join_parts(parts),
        _ => None,
    }
}

/// Object content is already covered by `message_content_object`; this only
/// adds the first element of a parts array read with the object keys.
fn message_content_nested(view: &ChoiceView<'_>) -> Option<String> {
    match view.message_content {
        ContentShape::Parts(parts) => first_text(parts.first()?.as_object()?, OBJECT_TEXT_KEYS),
        _ => None,
    }
}

fn choice_text(view: &ChoiceView<'_>) -> Option<String> {
    non_blank(view.choice.get("text")?.as_str()?)
}

fn choice_content(view: &ChoiceView<'_>) -> Option<String> {
    match view.choice_content {
        ContentShape::Text(s) => non_blank(s),
        ContentShape::Parts(parts) => join_parts(parts),
        _ => None,
    }
}

fn non_blank(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .and_then(non_blank)
}

fn part_text(part: &Value) -> Option<&str> {
    match part {
        Value::String(s) => Some(s),
        Value::Object(map) => PART_TEXT_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str)),
        _ => None,
    }
}

fn join_parts(parts: &[Value]) -> Option<String> {
    let texts: Vec<&str> = parts
        .iter()
        .filter_map(part_text)
        .filter(|s| !s.trim().is_empty())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

/// Every distinct non-blank candidate in priority order. A text produced by
/// more than one rule is kept once, under its highest-priority rule.
///
/// Fails when `choices[0]` is missing or no rule yields text; the raw response
/// is logged in both cases.
pub fn candidates(response: &Value) -> Result<Vec<Unwrapped>, AiError> {
    let Some(choice) = response.get("choices").and_then(|c| c.get(0)) else {
        tracing::error!(raw = %response, "Chat completion has no choices[0]");
        return Err(AiError::Extraction("choices[0] is missing".to_string()));
    };

    let view = ChoiceView::new(choice);
    let mut found: Vec<Unwrapped> = Vec::new();
    for (rule, extract) in RULES {
        let Some(text) = extract(&view) else {
            continue;
        };
        if found.iter().all(|seen| seen.text != text) {
            found.push(Unwrapped { rule: *rule, text });
        }
    }

    if found.is_empty() {
        tracing::error!(raw = %response, "Chat completion content is empty");
        return Err(AiError::Extraction("content is empty".to_string()));
    }

    tracing::debug!(
        rules = ?found.iter().map(|u| u.rule).collect::<Vec<_>>(),
        "Unwrapped chat completion"
    );

    Ok(found)
}

/// The single best candidate text of a chat completion
pub fn unwrap_response(response: &Value) -> Result<Unwrapped, AiError> {
    candidates(response)?
        .into_iter()
        .next()
        .ok_or_else(|| AiError::Extraction("content is empty".to_string()))
}
