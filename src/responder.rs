//! Writes the echo page as a CGI response.

use std::io::Write;

use anyhow::Context;

use crate::body::PostBody;
use crate::request::RequestSnapshot;

const CONTENT_TYPE_HTML: &str = "text/html";

/// Streams the response, section by section, to `out`.
///
/// Nothing is buffered here beyond what `out` itself does. Once
/// [`EchoResponder::emit_header`] has run, the header is on its way to the
/// server even if a later section fails.
pub struct EchoResponder<W: Write> {
    out: W,
}

impl<W: Write> EchoResponder<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn emit_header(&mut self) -> anyhow::Result<()> {
        write!(self.out, "Content-Type: {}\n\n", CONTENT_TYPE_HTML)
            .context("Couldn't write CGI header")
    }

    pub fn emit_shell(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "<html><body>")
            .and_then(|_| writeln!(self.out, "<h1>CGI Echo Test</h1>"))
            .context("Couldn't write page shell")
    }

    /// One line per tracked variable, with a fixed stand-in when it is unset.
    pub fn emit_summary(&mut self, request: &RequestSnapshot) -> anyhow::Result<()> {
        let fields = [
            ("Request Method:", request.method.as_deref().unwrap_or("Unknown")),
            ("Content Length:", request.content_length.as_deref().unwrap_or("0")),
            ("Content Type:", request.content_type.as_deref().unwrap_or("Not set")),
            ("Query String:", request.query_string.as_deref().unwrap_or("None")),
            ("Transfer Encoding:", request.transfer_encoding.as_deref().unwrap_or("Not set")),
        ];
        for (label, value) in fields {
            self.field(label, value.as_bytes())
                .with_context(|| format!("Couldn't write summary field '{}'", label))?;
        }
        Ok(())
    }

    pub fn emit_body(&mut self, body: &PostBody) -> anyhow::Result<()> {
        let res = match body {
            PostBody::NotRead => return Ok(()),
            PostBody::Sized(data) => self.body_with_length("POST Data:", data),
            PostBody::Chunked(data) => self.body_with_length("POST Data (chunked):", data),
            PostBody::Empty => self.field("POST Data:", b"No data received"),
            PostBody::Failed(msg) => self.field("Error reading POST data:", msg.as_bytes()),
        };
        res.context("Couldn't write POST body section")
    }

    pub fn emit_env_dump(&mut self, request: &RequestSnapshot) -> anyhow::Result<()> {
        writeln!(self.out, "<h2>All Environment Variables:</h2>")
            .and_then(|_| writeln!(self.out, "<ul>"))
            .context("Couldn't open environment list")?;
        for (name, value) in request.echoed_variables() {
            writeln!(self.out, "<li><strong>{}:</strong> {}</li>", name, value)
                .with_context(|| format!("Couldn't write environment variable {}", name))?;
        }
        writeln!(self.out, "</ul>").context("Couldn't close environment list")
    }

    pub fn emit_footer(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "</body></html>").context("Couldn't write page footer")
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> anyhow::Result<W> {
        self.out.flush().context("Couldn't flush response")?;
        Ok(self.out)
    }

    fn body_with_length(&mut self, label: &str, data: &[u8]) -> std::io::Result<()> {
        self.field(label, data)?;
        writeln!(
            self.out,
            "<p><strong>POST Data Length:</strong> {} bytes</p>",
            data.len()
        )
    }

    // Values go out as raw bytes so a body is echoed exactly as it arrived.
    fn field(&mut self, label: &str, value: &[u8]) -> std::io::Result<()> {
        write!(self.out, "<p><strong>{}</strong> ", label)?;
        self.out.write_all(value)?;
        writeln!(self.out, "</p>")
    }
}
