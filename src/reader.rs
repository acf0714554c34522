use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Error, ParseError, Result};
use crate::position::Position;
use crate::value::{unquote, Value};

/// The tokenizer state while scanning one field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Outside quotes; commas and line terminators end the field.
    InField,
    /// Inside quotes; everything is content, quotes may double.
    InQuotedField,
    /// Just past a closing quote; only a delimiter may follow.
    EndQuotedField,
}

/// A CSV reader.
///
/// This reader pulls one line of text at a time from the underlying
/// stream and tokenizes it into fields. Fields can be read raw, decoded
/// as strings, parsed as a specific numeric type, or read with type
/// inference as a [`Value`].
///
/// The field delimiter is a comma, quoting uses double quotes with
/// doubling as the escape, and lines end with `\n`. Quoted fields may
/// span multiple lines.
///
/// Note one strict policy of this format: a zero-length field between two
/// adjacent delimiters is an error, not an empty string. Empty content is
/// written (and read back) as an explicit `""`. Blank lines are tolerated
/// only as trailing padding before end of stream.
///
/// # Example
///
/// ```
/// use csvline::Reader;
///
/// let data = "Boston,MA\nDallas,TX\n";
/// let mut rdr = Reader::from_reader(data.as_bytes());
/// let mut fields = vec![];
/// while let Some(field) = rdr.read_string().unwrap() {
///     fields.push(field);
/// }
/// assert_eq!(fields, vec!["Boston", "MA", "Dallas", "TX"]);
/// ```
///
/// [`Value`]: enum.Value.html
#[derive(Debug)]
pub struct Reader<R> {
    rdr: io::BufReader<R>,
    /// The current line of text, terminator stripped.
    line: String,
    /// Byte cursor into `line`.
    cursor: usize,
    /// True while `line` still has characters (or its synthesized
    /// terminator) to yield.
    have_line: bool,
    /// Reusable accumulator for the raw text of one field.
    field: String,
    pos: Position,
}

impl<R: io::Read> Reader<R> {
    /// Creates a new CSV reader from an arbitrary `io::Read`.
    ///
    /// The reader is buffered for you automatically.
    pub fn from_reader(rdr: R) -> Reader<R> {
        Reader {
            rdr: io::BufReader::new(rdr),
            line: String::new(),
            cursor: 0,
            have_line: false,
            field: String::with_capacity(1024),
            pos: Position::new(),
        }
    }
}

impl Reader<fs::File> {
    /// Creates a CSV reader for the file at the path given.
    ///
    /// A file that cannot be opened is reported as
    /// [`Error::InvalidArgument`].
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader<fs::File>> {
        let file = fs::File::open(&path).map_err(|err| {
            Error::InvalidArgument(format!(
                "{}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Reader::from_reader(file))
    }
}

macro_rules! read_int {
    ($method:ident, $ty:ty) => {
        #[doc = concat!(
            "Reads the next field and parses it as `",
            stringify!($ty),
            "`, returning `None` at end of stream.",
        )]
        pub fn $method(&mut self) -> Result<Option<$ty>> {
            if !self.tokenize()? {
                return Ok(None);
            }
            unquote(&self.field)
                .parse::<$ty>()
                .map(Some)
                .map_err(|err| self.parse_error(ParseError::Int(err)))
        }
    };
}

macro_rules! read_float {
    ($method:ident, $ty:ty) => {
        #[doc = concat!(
            "Reads the next field and parses it as `",
            stringify!($ty),
            "`, returning `None` at end of stream.",
        )]
        pub fn $method(&mut self) -> Result<Option<$ty>> {
            if !self.tokenize()? {
                return Ok(None);
            }
            unquote(&self.field)
                .parse::<$ty>()
                .map(Some)
                .map_err(|err| self.parse_error(ParseError::Float(err)))
        }
    };
}

impl<R: io::Read> Reader<R> {
    /// Reads the next raw field, returning `None` at end of stream.
    ///
    /// The returned slice is the exact source span of the field: a quoted
    /// field keeps its surrounding quotes and any doubled quotes inside.
    /// Use [`unquote`] to decode it, or [`read_string`] to do both steps
    /// at once. The slice borrows the reader's internal buffer and is
    /// only valid until the next read.
    ///
    /// [`unquote`]: fn.unquote.html
    /// [`read_string`]: #method.read_string
    pub fn read_raw_field(&mut self) -> Result<Option<&str>> {
        if self.tokenize()? {
            Ok(Some(&self.field))
        } else {
            Ok(None)
        }
    }

    /// Reads the next field decoded to its string content, returning
    /// `None` at end of stream.
    pub fn read_string(&mut self) -> Result<Option<String>> {
        if self.tokenize()? {
            Ok(Some(unquote(&self.field)))
        } else {
            Ok(None)
        }
    }

    /// Reads the next field with type inference, returning `None` at end
    /// of stream.
    ///
    /// The decoded text is tried as `i64`, then `u64`, then `f64`, and
    /// falls back to a string. See [`Value::infer`].
    ///
    /// [`Value::infer`]: enum.Value.html#method.infer
    pub fn read_value(&mut self) -> Result<Option<Value>> {
        if self.tokenize()? {
            Ok(Some(Value::infer(&unquote(&self.field))))
        } else {
            Ok(None)
        }
    }

    read_int!(read_i8, i8);
    read_int!(read_i16, i16);
    read_int!(read_i32, i32);
    read_int!(read_i64, i64);
    read_int!(read_u8, u8);
    read_int!(read_u16, u16);
    read_int!(read_u32, u32);
    read_int!(read_u64, u64);
    read_float!(read_f32, f32);
    read_float!(read_f64, f64);

    /// Returns an iterator over the remaining fields as inferred values.
    ///
    /// # Example
    ///
    /// ```
    /// use csvline::{Reader, Value};
    ///
    /// let mut rdr = Reader::from_reader("a,1\n".as_bytes());
    /// let values = rdr.values().collect::<Result<Vec<_>, _>>().unwrap();
    /// assert_eq!(values, vec![Value::Str("a".to_string()), Value::Int(1)]);
    /// ```
    pub fn values(&mut self) -> Values<R> {
        Values { rdr: self }
    }

    /// Returns the current position, for diagnostics.
    ///
    /// The field counter is cumulative over the whole stream; it does not
    /// reset at line boundaries.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns a mutable borrow of the current position.
    ///
    /// This exists so the position context can be injected and inspected
    /// directly, primarily in tests.
    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.pos
    }

    /// Tokenizes the next raw field into `self.field`, returning `false`
    /// on a clean end of stream.
    fn tokenize(&mut self) -> Result<bool> {
        self.field.clear();
        let start = self.pos.field();
        let mut state = State::InField;
        // The first character of a field is consumed unconditionally; end
        // of stream before it is a clean end, not an error.
        let mut c = match self.next_char()? {
            Some(c) => c,
            None => return Ok(false),
        };
        loop {
            match state {
                State::InField => match c {
                    ',' => self.pos.next_field(),
                    '\n' => {
                        self.pos.next_field();
                        self.pos.next_line();
                    }
                    '"' => {
                        self.field.push('"');
                        state = State::InQuotedField;
                    }
                    _ => self.field.push(c),
                },
                State::InQuotedField => match c {
                    '"' => {
                        self.field.push('"');
                        if self.peek_char() == Some('"') {
                            // A doubled quote stays in the raw text;
                            // `unquote` collapses it.
                            self.next_char()?;
                            self.field.push('"');
                        } else {
                            state = State::EndQuotedField;
                        }
                    }
                    '\n' => {
                        self.pos.next_line();
                        self.field.push('\n');
                    }
                    _ => self.field.push(c),
                },
                State::EndQuotedField => match c {
                    ',' => self.pos.next_field(),
                    '\n' => {
                        self.pos.next_field();
                        self.pos.next_line();
                    }
                    _ => {
                        return Err(
                            self.malformed("comma or newline expected")
                        );
                    }
                },
            }
            // A field ends exactly when the cumulative field counter
            // moves.
            if self.pos.field() != start {
                break;
            }
            c = match self.next_char()? {
                Some(c) => c,
                None => {
                    return Err(self.malformed(
                        "unexpected end of input in quoted field",
                    ));
                }
            };
        }
        if self.field.is_empty() {
            // Two adjacent delimiters produced a zero-length field. That
            // is tolerated only as blank trailing padding: everything
            // left in the stream must be a line terminator.
            while let Some(c) = self.next_char()? {
                if c != '\n' {
                    return Err(self.malformed("empty field encountered"));
                }
                self.pos.next_line();
            }
            return Ok(false);
        }
        Ok(true)
    }

    /// Yields the next character of the stream, synthesizing a line
    /// terminator at the end of every line so the tokenizer sees one even
    /// when the source's last line lacks it.
    fn next_char(&mut self) -> Result<Option<char>> {
        if !self.have_line && !self.fill_line()? {
            return Ok(None);
        }
        if self.cursor < self.line.len() {
            let c = self.line[self.cursor..].chars().next().unwrap();
            self.cursor += c.len_utf8();
            Ok(Some(c))
        } else {
            self.have_line = false;
            Ok(Some('\n'))
        }
    }

    /// Looks at the next character of the current line without consuming
    /// it. A doubled-quote lookahead never crosses a line boundary, so
    /// this never pulls a new line.
    fn peek_char(&self) -> Option<char> {
        if !self.have_line {
            return None;
        }
        if self.cursor < self.line.len() {
            self.line[self.cursor..].chars().next()
        } else {
            Some('\n')
        }
    }

    /// Pulls the next line of text, returning `false` at end of stream.
    fn fill_line(&mut self) -> Result<bool> {
        self.line.clear();
        if self.rdr.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        if self.line.ends_with('\n') {
            self.line.pop();
        }
        self.cursor = 0;
        self.have_line = true;
        Ok(true)
    }

    fn malformed(&self, reason: &'static str) -> Error {
        Error::Malformed { pos: self.pos, reason }
    }

    fn parse_error(&self, err: ParseError) -> Error {
        Error::Parse { pos: self.pos, err }
    }
}

/// An iterator over the remaining fields of a reader as inferred values.
///
/// Ends at end of stream. A tokenizer error is yielded once; the reader
/// should be discarded after it.
#[derive(Debug)]
pub struct Values<'r, R: 'r> {
    rdr: &'r mut Reader<R>,
}

impl<'r, R: io::Read> Iterator for Values<'r, R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Result<Value>> {
        self.rdr.read_value().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;

    #[test]
    fn synthesizes_terminator_on_last_line() {
        let mut rdr = Reader::from_reader("a,b".as_bytes());
        assert_eq!(rdr.read_string().unwrap().unwrap(), "a");
        assert_eq!(rdr.read_string().unwrap().unwrap(), "b");
        assert_eq!(rdr.read_string().unwrap(), None);
        // The synthesized terminator counts as a consumed one.
        assert_eq!(rdr.position().line(), 2);
    }

    #[test]
    fn field_counter_is_cumulative() {
        let mut rdr = Reader::from_reader("a,b\nc,d\n".as_bytes());
        for _ in 0..4 {
            rdr.read_string().unwrap().unwrap();
        }
        assert_eq!(rdr.position().field(), 5);
        assert_eq!(rdr.position().line(), 3);
    }

    #[test]
    fn position_can_be_injected() {
        let mut rdr = Reader::from_reader("x,,y\n".as_bytes());
        rdr.position_mut().set_line(10).set_field(90);
        rdr.read_string().unwrap().unwrap();
        let err = rdr.read_string().unwrap_err();
        let pos = err.position().unwrap();
        assert_eq!(pos.line(), 10);
        assert_eq!(pos.field(), 92);
    }

    #[test]
    fn reports_position_in_errors() {
        let mut rdr = Reader::from_reader("a,,b\n".as_bytes());
        rdr.read_string().unwrap().unwrap();
        let err = rdr.read_string().unwrap_err();
        let pos = err.position().expect("malformed errors carry a position");
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.field(), 3);
    }
}
