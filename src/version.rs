//! Protocol versions that cgi-echo expects from its CGI host.

/// The CGI version this program is written against, as the host reports it
/// in `GATEWAY_INTERFACE`.
pub const CGI_VERSION: &str = "CGI/1.1";
