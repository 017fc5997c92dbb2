//! Per-connection request handling.
//!
//! One request per connection: parse, route, read headers (and the body if
//! the route asks for it), run the handler, make sure a status line went
//! out, close. Every failure is turned into a wire response or a silent
//! close here and never leaves the connection task.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncRead, AsyncReadExt, AsyncWrite, BufReader};
use tokio::time;

use crate::parser::{read_body, read_headers, read_request_line, Error as ParserError, HttpRequest};
use crate::router::RouteTable;
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::files::FileSource;
use crate::server::logging::LogSink;
use crate::server::response::Response;
use crate::server::status::StatusCode;

/// Most bytes of an oversized body read and dropped before answering 413.
const BODY_DISCARD_LIMIT: u64 = 16 * 1024;

/// State shared read-only by every connection task.
pub(crate) struct Shared {
    pub config: ServerConfig,
    pub routes: RouteTable,
    pub logger: LogSink,
    pub files: Arc<dyn FileSource>,
}

/// Serve a single request on `stream`, then close it.
pub(crate) async fn handle_connection<S>(stream: S, shared: &Shared)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let mut resp = Response::new(Box::new(write_half), Arc::clone(&shared.files));
    let mut path = None;

    let outcome = time::timeout(
        shared.config.request_timeout,
        serve_request(shared, &mut reader, &mut resp, &mut path),
    )
    .await;

    match outcome {
        Err(_) => {
            shared.logger.debug(format_args!(
                "Request not completed within {:?}, closing connection",
                shared.config.request_timeout
            ));
        }
        Ok(Ok(())) => {
            if let Err(err) = resp.finish().await {
                report_failure(shared, &mut resp, path.as_deref(), err).await;
            }
        }
        Ok(Err(err)) => {
            report_failure(shared, &mut resp, path.as_deref(), err).await;
        }
    }

    resp.close().await;
}

async fn serve_request<R>(
    shared: &Shared,
    reader: &mut R,
    resp: &mut Response,
    path: &mut Option<String>,
) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
{
    let max_line_length = shared.config.max_line_length;

    let line = match read_request_line(reader, max_line_length).await {
        Ok(line) => line,
        Err(ParserError::Io(e)) => return Err(Error::IoError(e)),
        Err(err) => {
            drain_headers(reader, max_line_length).await?;
            return Err(err.into());
        }
    };
    *path = Some(line.path.clone());

    let resolved = match shared.routes.resolve(line.method, &line.path) {
        Ok(resolved) => resolved,
        Err(err) => {
            drain_headers(reader, max_line_length).await?;
            return Err(err.into());
        }
    };

    let headers = read_headers(reader, &resolved.config.save_headers, max_line_length).await?;

    let mut request = HttpRequest::new(line, headers);
    if resolved.config.decode_body {
        request.body = match read_body(reader, &request.headers, resolved.config.max_body_size).await {
            Ok(body) => body,
            Err(err @ ParserError::PayloadTooLarge { size, .. }) => {
                discard_body(shared, reader, size).await;
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
    }

    let args: Vec<String> = resolved.captures.values().into_iter().map(String::from).collect();
    request.path_params = resolved.captures.into_pairs();

    shared.logger.debug(format_args!(
        "{} {} dispatched to {}",
        request.method,
        request.path,
        match resolved.index {
            Some(index) => format!("route #{index}"),
            None => "catch-all".to_string(),
        }
    ));

    let reply = resolved.handler.call(&mut request, resp, args).await?;
    resp.send_reply(reply).await
}

/// Read the rest of the header block without keeping anything.
///
/// A malformed header line here fails the request with 400 in place of the
/// routing error.
async fn drain_headers<R>(reader: &mut R, max_line_length: usize) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
{
    read_headers(reader, &[], max_line_length).await?;
    Ok(())
}

/// Drop up to `BODY_DISCARD_LIMIT` bytes of a rejected body, so closing the
/// socket does not reset the connection before the client reads the 413.
async fn discard_body<R>(shared: &Shared, reader: &mut R, size: usize)
where
    R: AsyncBufRead + Unpin,
{
    let limit = u64::try_from(size).unwrap_or(u64::MAX).min(BODY_DISCARD_LIMIT);
    let mut rest = (&mut *reader).take(limit);
    if let Err(e) = tokio::io::copy(&mut rest, &mut tokio::io::sink()).await {
        shared.logger.debug(format_args!("Failed to discard request body: {e}"));
    }
}

/// Turn a failed request into the best response still possible.
async fn report_failure(shared: &Shared, resp: &mut Response, path: Option<&str>, err: Error) {
    let logger = &shared.logger;

    if err.is_connection_reset() {
        logger.debug(format_args!("Connection lost: {err}"));
        return;
    }

    let status = match err.protocol_status() {
        Some(status) => {
            logger.debug(format_args!("Answering {status}: {err}"));
            status
        }
        None => {
            match &err {
                Error::IoError(_) => logger.warn(format_args!("I/O error while serving request: {err}")),
                _ => {
                    logger.error(format_args!("{}", path.unwrap_or("<no request line>")));
                    logger.error(format_args!("Unhandled error in handler: {err}"));
                }
            }
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if let Err(send_err) = resp.error(status, None).await {
        logger.warn(format_args!(
            "Failed to send {status} after error ({err}): {send_err}"
        ));
    }
}
