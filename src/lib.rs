/*!
Line-oriented CSV reading and writing with typed fields.

This crate reads and writes comma-delimited, double-quote-escaped,
`\n`-terminated text, one field at a time. The read side tokenizes
quote-aware fields and can decode them as strings, as a requested numeric
type, or with type inference; the write side quotes and escapes
automatically and keeps its output an exact inverse of the reader.

Both sides maintain a [`Position`]: a line counter that advances once per
line terminator and a field counter that is cumulative over the whole
stream. Every error carries the position at which it happened.

The dialect is fixed. A field is quoted when it contains a comma, a quote
or a line terminator; a literal quote inside a quoted field is doubled;
quoted fields may span lines. One strict policy worth knowing: a
zero-length field between two adjacent delimiters is an error, not an
empty string — empty content travels as an explicit `""`. Blank lines are
tolerated only as trailing padding before end of stream.

# Example: reading with type inference

```
use csvline::{Reader, Value};

let data = "Boston,4628910,\"the \"\"Hub\"\"\"\n";
let mut rdr = Reader::from_reader(data.as_bytes());

assert_eq!(rdr.read_value().unwrap(), Some(Value::Str("Boston".to_string())));
assert_eq!(rdr.read_value().unwrap(), Some(Value::Int(4628910)));
assert_eq!(rdr.read_value().unwrap(), Some(Value::Str("the \"Hub\"".to_string())));
assert_eq!(rdr.read_value().unwrap(), None);
```

# Example: writing

```
use csvline::Writer;

let mut wtr = Writer::from_writer(vec![]);
wtr.write_field("city").unwrap();
wtr.write_field("pop").unwrap();
wtr.end_line().unwrap();
wtr.write_field("Boston").unwrap();
wtr.write_u64(4628910).unwrap();
wtr.end_line().unwrap();

let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
assert_eq!(data, "city,pop\nBoston,4628910\n");
```

[`Position`]: struct.Position.html
*/

#![deny(missing_docs)]

pub use crate::error::{Error, ParseError, Result};
pub use crate::position::Position;
pub use crate::reader::{Reader, Values};
pub use crate::value::{unquote, Value};
pub use crate::writer::{escape, Writer};

mod error;
mod position;
mod reader;
mod value;
mod writer;
