//! Runs the built binary the way a CGI host would: a controlled environment,
//! the body on stdin, and the response read back from stdout.

use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_cgi-echo");

struct CgiResponse {
    headers: HashMap<String, String>,
    body: String,
}

/// Split CGI output at the first blank line into headers and body.
fn parse_response(stdout: &[u8]) -> CgiResponse {
    let out = String::from_utf8_lossy(stdout);
    let (head, body) = out
        .split_once("\n\n")
        .expect("CGI output has a blank line after the headers");

    let mut headers = HashMap::new();
    for line in head.trim().split('\n') {
        let (name, value) = line.split_once(':').expect("header line has a colon");
        headers.insert(name.trim().to_lowercase(), value.trim().to_owned());
    }

    CgiResponse {
        headers,
        body: body.to_owned(),
    }
}

fn cgi_command(vars: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.env_clear()
        .envs(vars.iter().copied())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn run_cgi(vars: &[(&str, &str)], stdin: &[u8]) -> Output {
    let mut child = cgi_command(vars)
        .stdin(Stdio::piped())
        .spawn()
        .expect("cgi-echo started");
    {
        let mut input = child.stdin.take().expect("stdin is piped");
        input.write_all(stdin).expect("body written");
    }
    child.wait_with_output().expect("cgi-echo finished")
}

#[test]
fn get_request_renders_summary() {
    let output = run_cgi(
        &[
            ("GATEWAY_INTERFACE", "CGI/1.1"),
            ("REQUEST_METHOD", "GET"),
            ("QUERY_STRING", "a=1"),
        ],
        b"",
    );
    assert!(output.status.success());

    let res = parse_response(&output.stdout);
    assert_eq!(Some("text/html"), res.headers.get("content-type").map(String::as_str));
    assert!(res.body.contains("Request Method:</strong> GET"));
    assert!(res.body.contains("Query String:</strong> a=1"));
    assert!(res.body.contains("Content Type:</strong> Not set"));
    assert!(!res.body.contains("POST Data"));
    assert!(res.body.trim_end().ends_with("</body></html>"));
}

#[test]
fn post_with_length_reads_declared_bytes() {
    let output = run_cgi(
        &[("REQUEST_METHOD", "POST"), ("CONTENT_LENGTH", "7")],
        b"name=Bo&ignored=tail",
    );
    assert!(output.status.success());

    let res = parse_response(&output.stdout);
    assert!(res.body.contains("<p><strong>POST Data:</strong> name=Bo</p>"));
    assert!(res.body.contains("<p><strong>POST Data Length:</strong> 7 bytes</p>"));
    assert!(!res.body.contains("ignored=tail"));
}

#[test]
fn post_without_length_drains_stdin_from_file() {
    let mut body_file = tempfile::tempfile().expect("temp file created");
    body_file.write_all(b"first chunk|second chunk").expect("body written");
    std::io::Seek::rewind(&mut body_file).expect("rewound");

    let output = cgi_command(&[("REQUEST_METHOD", "POST"), ("HTTP_TRANSFER_ENCODING", "chunked")])
        .stdin(Stdio::from(body_file))
        .output()
        .expect("cgi-echo ran");
    assert!(output.status.success());

    let res = parse_response(&output.stdout);
    assert!(res.body.contains("<p><strong>POST Data (chunked):</strong> first chunk|second chunk</p>"));
    assert!(res.body.contains("Transfer Encoding:</strong> chunked"));
}

#[test]
fn post_with_no_body() {
    let output = cgi_command(&[("REQUEST_METHOD", "POST")])
        .stdin(Stdio::null())
        .output()
        .expect("cgi-echo ran");
    assert!(output.status.success());

    let res = parse_response(&output.stdout);
    assert!(res.body.contains("<p><strong>POST Data:</strong> No data received</p>"));
}

#[test]
fn environment_dump_is_filtered_and_sorted() {
    let output = run_cgi(
        &[
            ("UNRELATED", "y"),
            ("SERVER_NAME", "x"),
            ("HTTP_FOO", "1"),
        ],
        b"",
    );
    let res = parse_response(&output.stdout);

    let listed: Vec<&str> = res
        .body
        .lines()
        .filter_map(|l| l.strip_prefix("<li><strong>"))
        .filter_map(|l| l.split_once(':').map(|(name, _)| name))
        .collect();
    assert_eq!(vec!["HTTP_FOO", "SERVER_NAME"], listed);
    assert!(res.body.contains("Request Method:</strong> Unknown"));
}

#[test]
fn logs_stay_off_stdout() {
    let output = cgi_command(&[("REQUEST_METHOD", "GET"), ("RUST_LOG", "trace")])
        .stdin(Stdio::null())
        .output()
        .expect("cgi-echo ran");
    assert!(output.status.success());
    assert!(output.stdout.starts_with(b"Content-Type: text/html\n\n"));
    assert!(!output.stderr.is_empty());
}
