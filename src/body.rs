//! Reading the POST body from the CGI input stream.

use std::io::Read;

use crate::request::RequestSnapshot;

/// What came of trying to read the request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostBody {
    /// Not a POST, so the input was left alone.
    NotRead,
    /// Read against a declared `CONTENT_LENGTH`. May be shorter than declared
    /// if the input ended early.
    Sized(Vec<u8>),
    /// No usable length was declared and draining the input produced data.
    Chunked(Vec<u8>),
    /// No usable length was declared and the input was empty.
    Empty,
    /// The input stream failed. Holds the error description.
    Failed(String),
}

impl PostBody {
    /// The bytes that were read, if any.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            PostBody::Sized(b) | PostBody::Chunked(b) => Some(b),
            _ => None,
        }
    }
}

/// Read the body of a POST request from `input`.
///
/// A positive declared length bounds the read; otherwise the input is drained to
/// end of stream. I/O errors never escape: they come back as [`PostBody::Failed`].
pub fn read_body(request: &RequestSnapshot, input: impl Read) -> PostBody {
    if !request.is_post() {
        return PostBody::NotRead;
    }

    let body = match request.declared_length() {
        Some(len) if len > 0 => {
            tracing::trace!(len, "Reading body with declared length");
            read_to_end(input.take(len)).map(PostBody::Sized)
        }
        _ => {
            tracing::trace!(content_length = ?request.content_length, "No usable length, draining input");
            read_to_end(input).map(|b| {
                if b.is_empty() {
                    PostBody::Empty
                } else {
                    PostBody::Chunked(b)
                }
            })
        }
    };

    match body {
        Ok(body) => {
            tracing::debug!(bytes = body.bytes().map(<[u8]>::len).unwrap_or(0), "Read POST body");
            body
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error reading POST body");
            PostBody::Failed(e.to_string())
        }
    }
}

fn read_to_end(mut input: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;
    Ok(buf)
}
