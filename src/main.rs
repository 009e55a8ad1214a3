use cgi_echo::request::RequestSnapshot;
use cgi_echo::version::CGI_VERSION;

fn main() {
    // Stdout carries the response, so logs go to stderr where CGI hosts collect them.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        tracing::error!("Failed to write CGI response: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let request = RequestSnapshot::from_process_env();

    match request.gateway_interface() {
        None => tracing::debug!("GATEWAY_INTERFACE is not set; not started by a CGI server?"),
        Some(v) if v != CGI_VERSION => {
            tracing::debug!(gateway_interface = v, expected = CGI_VERSION, "Unexpected CGI version")
        }
        Some(_) => {}
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    cgi_echo::respond(&request, stdin.lock(), stdout.lock())
}
