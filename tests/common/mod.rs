//! A tiny local stand-in for the badge provider

use tiny_http::{Header, Response, Server};

pub const SIZED_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="90" height="20"><rect width="37" height="20" fill="#555"/><rect x="37" width="53" height="20" fill="#4c1"/></svg>"##;
pub const UNSIZED_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect width="40" height="10" fill="#e05d44"/></svg>"##;
pub const ZERO_SIZED_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"><rect width="40" height="10" fill="#e05d44"/></svg>"##;

/// Start a provider on an ephemeral port and return its badge root.
///
/// Routes:
/// - `/badge/nosize-*` serves an SVG without intrinsic size
/// - `/badge/zero-*` serves an SVG declaring `width="0" height="0"`
/// - `/badge/broken-*` serves text that is not SVG
/// - `/badge/missing-*` answers 404
/// - any other `/badge/*.svg` serves a 90x20 badge
pub fn start_provider() -> String {
    let server = Server::http("127.0.0.1:0").expect("bind provider");
    let addr = server.server_addr().to_ip().expect("ip listener");

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let path = request.url().split('?').next().unwrap_or_default().to_string();
            let svg_header = "Content-Type: image/svg+xml;charset=utf-8"
                .parse::<Header>()
                .unwrap();
            let response = if path.starts_with("/badge/missing-") {
                Response::from_string("Not Found").with_status_code(404)
            } else if path.starts_with("/badge/broken-") {
                Response::from_string("<html>definitely not a badge").with_header(svg_header)
            } else if path.starts_with("/badge/zero-") {
                Response::from_string(ZERO_SIZED_SVG).with_header(svg_header)
            } else if path.starts_with("/badge/nosize-") {
                Response::from_string(UNSIZED_SVG).with_header(svg_header)
            } else if path.starts_with("/badge/") && path.ends_with(".svg") {
                Response::from_string(SIZED_SVG).with_header(svg_header)
            } else {
                Response::from_string("Not Found").with_status_code(404)
            };
            let _ = request.respond(response);
        }
    });

    format!("http://{}/badge", addr)
}

/// A root nothing listens on.
pub fn dead_root() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/badge", addr)
}
