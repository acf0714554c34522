use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::position::Position;
use crate::value::Value;

/// Escapes field text for CSV output.
///
/// This is a total function over any input text. Empty input becomes an
/// explicit `""`, so a written empty field is distinguishable from no
/// field at all. Otherwise every embedded quote is doubled and, if the
/// original text contains a comma, a quote or a line terminator, the
/// result is wrapped in quotes.
///
/// # Example
///
/// ```
/// assert_eq!(csvline::escape("plain"), "plain");
/// assert_eq!(csvline::escape(""), "\"\"");
/// assert_eq!(csvline::escape("a,b"), "\"a,b\"");
/// assert_eq!(csvline::escape("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    escape_into(field, &mut out);
    out
}

fn escape_into(field: &str, out: &mut String) {
    if field.is_empty() {
        out.push_str("\"\"");
        return;
    }
    if !field.contains(|c: char| c == ',' || c == '"' || c == '\n') {
        out.push_str(field);
        return;
    }
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}

/// A CSV writer.
///
/// Fields are written one at a time; a comma is emitted before every
/// field except the line's first, and [`end_line`] emits the terminator.
/// All quoting is handled automatically. The output of this writer, read
/// back with [`Reader`], reproduces the written values exactly.
///
/// Dropping the writer terminates an in-progress line and flushes, so no
/// output line is ever left unterminated. Errors during drop are ignored;
/// call [`finish`] or [`into_inner`] to observe them.
///
/// # Example
///
/// ```
/// use csvline::Writer;
///
/// let mut wtr = Writer::from_writer(vec![]);
/// wtr.write_line(&["Boston", "MA"]).unwrap();
/// wtr.write_line(&["Dallas", "TX"]).unwrap();
/// let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "Boston,MA\nDallas,TX\n");
/// ```
///
/// [`end_line`]: #method.end_line
/// [`finish`]: #method.finish
/// [`into_inner`]: #method.into_inner
/// [`Reader`]: struct.Reader.html
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    wtr: Option<io::BufWriter<W>>,
    pos: Position,
    first_field: bool,
    scratch: String,
}

impl<W: io::Write> Writer<W> {
    /// Creates a new CSV writer that writes to the `io::Write` given.
    ///
    /// The writer is buffered for you automatically.
    pub fn from_writer(wtr: W) -> Writer<W> {
        Writer {
            wtr: Some(io::BufWriter::new(wtr)),
            pos: Position::new(),
            first_field: true,
            scratch: String::new(),
        }
    }
}

impl Writer<fs::File> {
    /// Creates a CSV writer that writes to the file path given.
    ///
    /// The file is created if it does not already exist and is truncated
    /// otherwise. A file that cannot be created is reported as
    /// [`Error::InvalidArgument`].
    ///
    /// [`Error::InvalidArgument`]: enum.Error.html#variant.InvalidArgument
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Writer<fs::File>> {
        let file = fs::File::create(&path).map_err(|err| {
            Error::InvalidArgument(format!(
                "{}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Writer::from_writer(file))
    }
}

macro_rules! write_int {
    ($method:ident, $ty:ty) => {
        #[doc = concat!(
            "Writes a `",
            stringify!($ty),
            "` as the next field of the current line.",
        )]
        pub fn $method(&mut self, value: $ty) -> Result<()> {
            let mut buf = itoa::Buffer::new();
            self.write_field(buf.format(value))
        }
    };
}

macro_rules! write_float {
    ($method:ident, $ty:ty) => {
        #[doc = concat!(
            "Writes a `",
            stringify!($ty),
            "` as the next field of the current line.",
        )]
        pub fn $method(&mut self, value: $ty) -> Result<()> {
            let mut buf = ryu::Buffer::new();
            self.write_field(buf.format(value))
        }
    };
}

impl<W: io::Write> Writer<W> {
    /// Writes one field, quoting and escaping it as needed.
    pub fn write_field<T: AsRef<str>>(&mut self, field: T) -> Result<()> {
        self.scratch.clear();
        escape_into(field.as_ref(), &mut self.scratch);
        let wtr = self.wtr.as_mut().unwrap();
        if !self.first_field {
            wtr.write_all(b",")?;
        }
        wtr.write_all(self.scratch.as_bytes())?;
        self.first_field = false;
        self.pos.next_field();
        Ok(())
    }

    write_int!(write_i8, i8);
    write_int!(write_i16, i16);
    write_int!(write_i32, i32);
    write_int!(write_i64, i64);
    write_int!(write_u8, u8);
    write_int!(write_u16, u16);
    write_int!(write_u32, u32);
    write_int!(write_u64, u64);
    write_float!(write_f32, f32);
    write_float!(write_f64, f64);

    /// Writes a [`Value`] as the next field of the current line.
    ///
    /// [`Value`]: enum.Value.html
    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match *value {
            Value::Int(v) => self.write_i64(v),
            Value::Uint(v) => self.write_u64(v),
            Value::Float(v) => self.write_f64(v),
            Value::Str(ref s) => self.write_field(s),
        }
    }

    /// Writes one full line of fields followed by a line terminator.
    pub fn write_line<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for field in fields {
            self.write_field(field)?;
        }
        self.end_line()
    }

    /// Ends the current line by emitting a line terminator.
    pub fn end_line(&mut self) -> Result<()> {
        self.wtr.as_mut().unwrap().write_all(b"\n")?;
        self.first_field = true;
        self.pos.next_line();
        Ok(())
    }

    /// Terminates an in-progress line and flushes the underlying writer.
    ///
    /// Calling this again is a no-op apart from another flush.
    pub fn finish(&mut self) -> Result<()> {
        if !self.first_field {
            self.end_line()?;
        }
        self.flush()?;
        Ok(())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.wtr.as_mut().unwrap().flush()
    }

    /// Finishes the writer and returns the underlying `io::Write`.
    pub fn into_inner(mut self) -> Result<W> {
        self.finish()?;
        let wtr = self.wtr.take().unwrap();
        wtr.into_inner().map_err(|err| Error::Io(err.into_error()))
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
}

impl<W: io::Write> Drop for Writer<W> {
    fn drop(&mut self) {
        if self.wtr.is_some() {
            let _ = self.finish();
        }
    }
}
