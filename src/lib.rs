//! An echo responder for CGI hosts.
//!
//! Each invocation reads the CGI meta-variables and, for POST requests, the
//! request body, and answers with an HTML page describing what it received.
//! It is meant for checking what a web server actually hands to its CGI
//! programs.

use std::io::{Read, Write};

pub mod body;
pub mod request;
pub mod responder;
pub mod version;

use body::read_body;
use request::RequestSnapshot;
use responder::EchoResponder;

/// Run one request: read the body from `input` and write the full CGI
/// response to `out`.
///
/// The response is streamed in order: header, page shell, summary, body,
/// environment dump, footer. A failing `input` shows up in the page. A
/// failing `out` is returned as an error, and whatever was written before it
/// stays written.
pub fn respond(request: &RequestSnapshot, input: impl Read, out: impl Write) -> anyhow::Result<()> {
    let mut responder = EchoResponder::new(out);
    responder.emit_header()?;
    responder.emit_shell()?;
    responder.emit_summary(request)?;

    let body = read_body(request, input);
    responder.emit_body(&body)?;

    responder.emit_env_dump(request)?;
    responder.emit_footer()?;
    responder.finish()?;
    Ok(())
}
