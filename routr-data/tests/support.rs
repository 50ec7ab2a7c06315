//! In-process HTTP responder for exercising the routing client.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// A request as seen by the responder.
#[derive(Debug, Clone, Default)]
pub struct CapturedRequest {
    /// Request line, e.g. `GET /route/v1/car/1,2;3,4.json HTTP/1.1`.
    pub request_line: String,
    /// Header lines, names lower-cased.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: String,
}

impl CapturedRequest {
    /// Value of the first header called `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let wanted = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value.as_str())
    }
}

/// Serves exactly one canned response, then hands back the request.
pub struct OneShotServer {
    base_url: String,
    handle: JoinHandle<CapturedRequest>,
}

impl OneShotServer {
    /// Listen on an ephemeral port and answer with `status` and `body`.
    pub fn respond(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let address = listener.local_addr().expect("local address");
        let reply = format!(
            "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept connection");
            serve(stream, reply.as_bytes())
        });
        Self {
            base_url: format!("http://{address}"),
            handle,
        }
    }

    /// Base URL clients should target.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Wait for the exchange to finish and return the captured request.
    pub fn finish(self) -> CapturedRequest {
        self.handle.join().expect("responder thread")
    }
}

fn serve(stream: TcpStream, reply: &[u8]) -> CapturedRequest {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut captured = CapturedRequest::default();
    reader
        .read_line(&mut captured.request_line)
        .expect("read request line");
    captured.request_line = captured.request_line.trim_end().to_owned();

    let mut content_length = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header line");
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().to_owned();
            if name == "content-length" {
                content_length = value.parse().expect("numeric content length");
            }
            captured.headers.push((name, value));
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).expect("read request body");
    captured.body = String::from_utf8(body).expect("UTF-8 body");

    let mut writer = stream;
    writer.write_all(reply).expect("write response");
    writer.flush().expect("flush response");
    captured
}
