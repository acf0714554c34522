/// A typed CSV field produced by inference.
///
/// The read side only produces a `Value` through [`Reader::read_value`]
/// (or its iterator form), which trial-parses the decoded field text as a
/// signed integer, then an unsigned integer, then a floating point number,
/// and falls back to a string. The order matters: integers past `i64`
/// range become `Uint` rather than losing precision as `Float`.
///
/// [`Reader::read_value`]: struct.Reader.html#method.read_value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A signed integer.
    Int(i64),
    /// An unsigned integer too large for `i64`.
    Uint(u64),
    /// A floating point number.
    Float(f64),
    /// Anything that is not numeric.
    Str(String),
}

impl Value {
    /// Infers a typed value from decoded field text.
    ///
    /// The text must already be unquoted (see [`unquote`]). The first
    /// grammar that fully matches wins; numeric-looking text is never
    /// returned as a string, so `007` infers as `Int(7)`.
    ///
    /// [`unquote`]: fn.unquote.html
    pub fn infer(text: &str) -> Value {
        if let Ok(n) = text.parse::<i64>() {
            return Value::Int(n);
        }
        if let Ok(n) = text.parse::<u64>() {
            return Value::Uint(n);
        }
        if let Ok(n) = text.parse::<f64>() {
            return Value::Float(n);
        }
        Value::Str(text.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Value {
        Value::Str(s.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(
        &self,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        match *self {
            Value::Int(n) => ser.serialize_i64(n),
            Value::Uint(n) => ser.serialize_u64(n),
            Value::Float(n) => ser.serialize_f64(n),
            Value::Str(ref s) => ser.serialize_str(s),
        }
    }
}

/// Decodes a raw field into its string content.
///
/// Raw fields are the exact source span of one field, as returned by
/// [`Reader::read_raw_field`]. A raw field beginning with a quote has one
/// leading and one trailing quote stripped (the tokenizer guarantees they
/// are paired) and every doubled quote inside collapsed to a single one.
/// Anything else is passed through unchanged.
///
/// [`Reader::read_raw_field`]: struct.Reader.html#method.read_raw_field
pub fn unquote(raw: &str) -> String {
    if !raw.starts_with('"') || !raw.ends_with('"') || raw.len() < 2 {
        return raw.to_string();
    }
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '"' {
            // Collapse the doubled quote.
            chars.next();
        }
    }
    out
}
