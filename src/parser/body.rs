//! Content-Length bounded body reading and decoding.

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::parser::error::Error;
use crate::parser::headers::{find_header, Headers};
use crate::parser::query::parse_query_string;
use crate::parser::request::Body;

/// Media type without parameters, e.g. `text/plain; charset=utf-8` -> `text/plain`.
fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// Decode `data` according to the media type in `content_type`.
pub fn decode_body(content_type: Option<&str>, data: Vec<u8>) -> Result<Body, Error> {
    let media = content_type.map(media_type).unwrap_or("");
    if media.eq_ignore_ascii_case("application/json") {
        Ok(Body::Json(serde_json::from_slice(&data)?))
    } else if media.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        let text = String::from_utf8(data)
            .map_err(|_| Error::InvalidBody("form data is not valid UTF-8".to_string()))?;
        Ok(Body::Form(parse_query_string(&text)))
    } else {
        Ok(Body::Raw(data))
    }
}

/// Read exactly `Content-Length` bytes and decode them.
///
/// A missing `Content-Length` means an empty body.
pub async fn read_body<R>(reader: &mut R, headers: &Headers, max_body_size: usize) -> Result<Body, Error>
where
    R: AsyncRead + Unpin,
{
    let size = match find_header(headers, "Content-Length") {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| Error::InvalidContentLength(raw.clone()))?,
        None => 0,
    };
    if size > max_body_size {
        return Err(Error::PayloadTooLarge {
            size,
            limit: max_body_size,
        });
    }
    if size == 0 {
        return Ok(Body::Empty);
    }

    let mut data = Vec::with_capacity(size);
    let received = (&mut *reader).take(size as u64).read_to_end(&mut data).await?;
    if received < size {
        return Err(Error::IncompleteBody {
            expected: size,
            received,
        });
    }

    decode_body(find_header(headers, "Content-Type").map(String::as_str), data)
}
