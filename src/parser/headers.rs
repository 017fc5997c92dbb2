//! Header block reading.

use std::collections::HashMap;

use tokio::io::AsyncBufRead;

use crate::parser::error::Error;
use crate::parser::line::{is_blank, read_line};

/// Saved request headers, keyed by the name declared in the save list.
pub type Headers = HashMap<String, String>;

/// Split a header line into trimmed name and value.
fn split_header(line: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(Error::InvalidHeaderFormat)?;
    Ok((line[..colon].trim_ascii(), line[colon + 1..].trim_ascii()))
}

/// Read header lines up to the terminating blank line.
///
/// Only headers named in `save` (compared case-insensitively) are kept; the
/// rest are read and dropped. A repeated header overwrites the earlier value.
pub async fn read_headers<R>(
    reader: &mut R,
    save: &[String],
    max_line_length: usize,
) -> Result<Headers, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = Headers::new();
    loop {
        let line = read_line(reader, max_line_length).await?;
        if is_blank(&line) {
            break;
        }

        let (name, value) = split_header(&line)?;
        if let Some(declared) = save.iter().find(|s| s.as_bytes().eq_ignore_ascii_case(name)) {
            let value = String::from_utf8_lossy(value).into_owned();
            headers.insert(declared.clone(), value);
        }
    }
    Ok(headers)
}

/// Case-insensitive lookup in a saved header map.
pub fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a String> {
    headers.iter().find_map(|(k, v)| {
        if k.eq_ignore_ascii_case(name) {
            Some(v)
        } else {
            None
        }
    })
}
