//! Interactive console prompts.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{SimError, SimResult};

/// Writes `message`, reads one line and parses it as `T`.
///
/// End of input counts as a parse failure for `field`.
pub fn prompt<T, R, W>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    field: &'static str,
) -> SimResult<T>
where
    T: FromStr,
    R: BufRead,
    W: Write,
{
    write!(writer, "{message}")?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    let value = line.trim();
    value.parse::<T>().map_err(|_| SimError::InputParse {
        field,
        value: value.to_string(),
    })
}
