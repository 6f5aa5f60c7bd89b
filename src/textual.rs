//! Textual default value parsing
//!
//! Edition defaults carry their values as text: scalar literals for
//! scalar fields (`true`, `42`, `"str"`, enum value identifiers) and
//! `name: value` field lists for message fields. Message values may be
//! written either as a bare field list (`a: 1 b: 2`) or wrapped in braces
//! (`{a: 1 b: 2}`); nested message fields use `name { ... }` with an
//! optional colon. Entries are separated by whitespace, `,` or `;`.
//!
//! Parsing is schema-directed: field names resolve against a
//! [`MessageSchema`] and enum identifiers against the field's
//! [`EnumSchema`], so an unknown name is a parse error rather than a
//! silently dropped value.

use thiserror::Error;

use crate::features::{FeatureSet, FeatureValue};
use crate::schema::{FieldKind, FieldSchema, MessageSchema};

/// Text-format parse failures
///
/// The defaults compiler wraps these into its own error naming the
/// feature field whose default text failed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextFormatError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unknown field {field} in {message}")]
    UnknownField { field: String, message: String },

    #[error("unknown value {value} for enum {enum_name}")]
    UnknownEnumValue { enum_name: String, value: String },

    #[error("invalid {kind} literal: {text}")]
    InvalidLiteral { kind: &'static str, text: String },

    #[error("trailing input after value: {0}")]
    TrailingInput(String),
}

type Result<T> = std::result::Result<T, TextFormatError>;

/// Parse the textual default of a scalar or message field into a value
pub fn parse_field_value(field: &FieldSchema, text: &str) -> Result<FeatureValue> {
    if let FieldKind::Message(schema) = &field.kind {
        let mut value = FeatureSet::new();
        merge_text_into(schema, text, &mut value)?;
        return Ok(FeatureValue::Message(value));
    }

    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.scalar_value(field)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(TextFormatError::TrailingInput(
            parser.remainder().to_string(),
        ));
    }
    Ok(value)
}

/// Parse a textual field list and merge it into `target`
///
/// Merging is additive: fields already populated in `target` keep their
/// values unless the text sets them again, and nested messages compose
/// recursively.
pub fn merge_text_into(
    schema: &MessageSchema,
    text: &str,
    target: &mut FeatureSet,
) -> Result<()> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    if parser.eat('{') {
        parser.message_body(schema, target, Some('}'))?;
    } else {
        parser.message_body(schema, target, None)?;
    }
    parser.skip_ws();
    if !parser.at_end() {
        return Err(TextFormatError::TrailingInput(
            parser.remainder().to_string(),
        ));
    }
    Ok(())
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn remainder(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() || c == ',' || c == ';') {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(TextFormatError::UnexpectedChar {
                found: c,
                offset: self.pos,
            }),
            None => Err(TextFormatError::UnexpectedEnd),
        }
    }

    fn ident(&mut self) -> Result<&'a str> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
            }
            Some(c) => {
                return Err(TextFormatError::UnexpectedChar {
                    found: c,
                    offset: self.pos,
                })
            }
            None => return Err(TextFormatError::UnexpectedEnd),
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        Ok(&self.src[start..self.pos])
    }

    fn numeric_token(&mut self) -> Result<&'a str> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == start || (self.pos == start + 1 && self.src[start..].starts_with('-')) {
            return match self.peek() {
                Some(c) => Err(TextFormatError::UnexpectedChar {
                    found: c,
                    offset: self.pos,
                }),
                None => Err(TextFormatError::UnexpectedEnd),
            };
        }
        Ok(&self.src[start..self.pos])
    }

    fn quoted_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(c) => {
                        return Err(TextFormatError::UnexpectedChar {
                            found: c,
                            offset: self.pos,
                        })
                    }
                    None => return Err(TextFormatError::UnexpectedEnd),
                },
                Some(c) => out.push(c),
                None => return Err(TextFormatError::UnexpectedEnd),
            }
        }
    }

    fn scalar_value(&mut self, field: &FieldSchema) -> Result<FeatureValue> {
        match &field.kind {
            FieldKind::Bool => {
                let token = self.ident()?;
                match token {
                    "true" => Ok(FeatureValue::Bool(true)),
                    "false" => Ok(FeatureValue::Bool(false)),
                    other => Err(TextFormatError::InvalidLiteral {
                        kind: "bool",
                        text: other.to_string(),
                    }),
                }
            }
            FieldKind::Int32 | FieldKind::Int64 => {
                let token = self.numeric_token()?;
                token
                    .parse::<i64>()
                    .map(FeatureValue::Int)
                    .map_err(|_| TextFormatError::InvalidLiteral {
                        kind: "int",
                        text: token.to_string(),
                    })
            }
            FieldKind::Uint32 | FieldKind::Uint64 => {
                let token = self.numeric_token()?;
                token
                    .parse::<u64>()
                    .map(FeatureValue::Uint)
                    .map_err(|_| TextFormatError::InvalidLiteral {
                        kind: "uint",
                        text: token.to_string(),
                    })
            }
            FieldKind::String => Ok(FeatureValue::String(self.quoted_string()?)),
            FieldKind::Enum(schema) => {
                let token = self.ident()?;
                match schema.value_by_name(token) {
                    Some(value) => Ok(FeatureValue::enumeration(&value.name, value.number)),
                    None => Err(TextFormatError::UnknownEnumValue {
                        enum_name: schema.full_name.clone(),
                        value: token.to_string(),
                    }),
                }
            }
            FieldKind::Message(schema) => {
                // `name: { ... }` form; the caller already consumed the colon.
                self.expect('{')?;
                let mut value = FeatureSet::new();
                self.message_body(schema, &mut value, Some('}'))?;
                Ok(FeatureValue::Message(value))
            }
        }
    }

    fn message_body(
        &mut self,
        schema: &MessageSchema,
        target: &mut FeatureSet,
        terminator: Option<char>,
    ) -> Result<()> {
        loop {
            self.skip_separators();
            match (self.peek(), terminator) {
                (None, None) => return Ok(()),
                (None, Some(_)) => return Err(TextFormatError::UnexpectedEnd),
                (Some(c), Some(t)) if c == t => {
                    self.bump();
                    return Ok(());
                }
                _ => {}
            }

            let name = self.ident()?;
            let field = schema.field_by_name(name).ok_or_else(|| {
                TextFormatError::UnknownField {
                    field: name.to_string(),
                    message: schema.full_name.clone(),
                }
            })?;

            let had_colon = {
                self.skip_ws();
                self.eat(':')
            };
            self.skip_ws();

            if let FieldKind::Message(sub_schema) = &field.kind {
                self.expect('{')?;
                self.message_body(sub_schema, target.sub_message_mut(&field.name), Some('}'))?;
            } else {
                if !had_colon {
                    return Err(match self.peek() {
                        Some(c) => TextFormatError::UnexpectedChar {
                            found: c,
                            offset: self.pos,
                        },
                        None => TextFormatError::UnexpectedEnd,
                    });
                }
                let value = self.scalar_value(field)?;
                target.set(&field.name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EnumSchema;
    use rstest::rstest;

    fn test_schema() -> MessageSchema {
        let mode = EnumSchema::new("test.Mode", &[("MODE_UNKNOWN", 0), ("OPEN", 1), ("CLOSED", 2)]);
        let nested = MessageSchema::new("test.Nested")
            .with_field(FieldSchema::new("a", 1, FieldKind::Int64))
            .with_field(FieldSchema::new("b", 2, FieldKind::Int64));
        MessageSchema::new("test.Features")
            .with_field(FieldSchema::new("flag", 1, FieldKind::Bool))
            .with_field(FieldSchema::new("count", 2, FieldKind::Int32))
            .with_field(FieldSchema::new("label", 3, FieldKind::String))
            .with_field(FieldSchema::new("mode", 4, FieldKind::Enum(mode)))
            .with_field(FieldSchema::new("nested", 5, FieldKind::Message(nested)))
    }

    fn field(name: &str) -> FieldSchema {
        test_schema().field_by_name(name).unwrap().clone()
    }

    #[rstest]
    #[case("flag", "true", FeatureValue::Bool(true))]
    #[case("flag", "false", FeatureValue::Bool(false))]
    #[case("count", "42", FeatureValue::Int(42))]
    #[case("count", "-7", FeatureValue::Int(-7))]
    #[case("label", "\"hello\"", FeatureValue::String("hello".to_string()))]
    #[case("mode", "OPEN", FeatureValue::enumeration("OPEN", 1))]
    fn test_scalar_values_parse(
        #[case] field_name: &str,
        #[case] text: &str,
        #[case] expected: FeatureValue,
    ) {
        assert_eq!(parse_field_value(&field(field_name), text).unwrap(), expected);
    }

    #[test]
    fn test_string_escapes() {
        let parsed = parse_field_value(&field("label"), r#""a\"b\\c\n""#).unwrap();
        assert_eq!(parsed, FeatureValue::String("a\"b\\c\n".to_string()));
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let err = parse_field_value(&field("mode"), "SIDEWAYS").unwrap_err();
        assert!(matches!(err, TextFormatError::UnknownEnumValue { .. }));
    }

    #[rstest]
    #[case("flag", "maybe")]
    #[case("count", "twelve")]
    #[case("count", "1 2")]
    #[case("label", "unquoted")]
    fn test_malformed_scalars_are_rejected(#[case] field_name: &str, #[case] text: &str) {
        assert!(parse_field_value(&field(field_name), text).is_err());
    }

    #[rstest]
    #[case("a: 1")]
    #[case("{a: 1}")]
    #[case("{ a: 1 }")]
    #[case("{a: 1,}")]
    fn test_message_text_with_and_without_braces(#[case] text: &str) {
        let nested = field("nested");
        let schema = nested.kind.message_schema().unwrap();
        let mut target = FeatureSet::new();
        merge_text_into(schema, text, &mut target).unwrap();
        assert_eq!(target.get("a"), Some(&FeatureValue::Int(1)));
    }

    #[test]
    fn test_message_merge_is_additive() {
        let nested = field("nested");
        let schema = nested.kind.message_schema().unwrap();
        let mut target = FeatureSet::new();
        merge_text_into(schema, "{a: 1}", &mut target).unwrap();
        merge_text_into(schema, "{b: 2}", &mut target).unwrap();
        assert_eq!(target.get("a"), Some(&FeatureValue::Int(1)));
        assert_eq!(target.get("b"), Some(&FeatureValue::Int(2)));
    }

    #[test]
    fn test_nested_message_entry_with_optional_colon() {
        let schema = test_schema();
        for text in ["nested { a: 1 }", "nested: { a: 1 }"] {
            let mut target = FeatureSet::new();
            merge_text_into(&schema, text, &mut target).unwrap();
            let nested = target.sub_message("nested").unwrap();
            assert_eq!(nested.get("a"), Some(&FeatureValue::Int(1)));
        }
    }

    #[test]
    fn test_multiple_entries_and_separators() {
        let schema = test_schema();
        let mut target = FeatureSet::new();
        merge_text_into(&schema, "flag: true, count: 3  mode: CLOSED", &mut target).unwrap();
        assert_eq!(target.get("flag"), Some(&FeatureValue::Bool(true)));
        assert_eq!(target.get("count"), Some(&FeatureValue::Int(3)));
        assert_eq!(target.get("mode"), Some(&FeatureValue::enumeration("CLOSED", 2)));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let schema = test_schema();
        let mut target = FeatureSet::new();
        let err = merge_text_into(&schema, "bogus: 1", &mut target).unwrap_err();
        assert!(matches!(err, TextFormatError::UnknownField { .. }));
    }

    #[test]
    fn test_unterminated_brace_is_rejected() {
        let schema = test_schema();
        let mut target = FeatureSet::new();
        let err = merge_text_into(&schema, "{flag: true", &mut target).unwrap_err();
        assert_eq!(err, TextFormatError::UnexpectedEnd);
    }
}
