use std::fmt;

/// A position in CSV data, used for diagnostics.
///
/// The `line` counter starts at `1` and advances once for every line
/// terminator consumed by a reader or emitted by a writer. The `field`
/// counter also starts at `1` and advances once per field, cumulatively
/// over the whole stream — it does *not* reset at line boundaries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Position {
    line: u64,
    field: u64,
}

impl Position {
    /// Returns a new position at the start of CSV data.
    pub fn new() -> Position {
        Position { line: 1, field: 1 }
    }

    /// The line number, starting at `1`.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The cumulative field number, starting at `1`.
    pub fn field(&self) -> u64 {
        self.field
    }

    /// Set the line number.
    pub fn set_line(&mut self, line: u64) -> &mut Position {
        self.line = line;
        self
    }

    /// Set the field number.
    pub fn set_field(&mut self, field: u64) -> &mut Position {
        self.field = field;
        self
    }

    pub(crate) fn next_field(&mut self) {
        self.field += 1;
    }

    pub(crate) fn next_line(&mut self) {
        self.line += 1;
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, field {}", self.line, self.field)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Position {
    fn serialize<S: serde::Serializer>(
        &self,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = ser.serialize_struct("Position", 2)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("field", &self.field)?;
        state.end()
    }
}
