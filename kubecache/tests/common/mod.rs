#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;

pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
}

/// A local HTTP server that answers one connection per scripted response, in
/// order, and then stops.
pub struct ScriptedServer {
    listener: TcpListener,
    pub base_url: String,
}

impl ScriptedServer {
    pub fn bind() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        Self {
            listener,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn serve(
        self,
        responses: Vec<String>,
    ) -> (mpsc::Receiver<CapturedRequest>, thread::JoinHandle<()>) {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            for response in responses {
                let Ok((mut stream, _)) = self.listener.accept() else {
                    return;
                };
                let req = read_request(&mut stream);
                let _ = tx.send(req);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (rx, handle)
    }
}

pub fn json_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

pub fn kubeconfig_yaml(token: &str) -> String {
    format!(
        "apiVersion: v1\nkind: Config\nclusters:\n- name: \"c-m-1\"\n  cluster:\n    server: \"https://rancher.example.com/k8s/clusters/c-m-1\"\nusers:\n- name: \"c-m-1\"\n  user:\n    token: \"{token}\"\ncontexts:\n- name: \"c-m-1\"\n  context:\n    user: \"c-m-1\"\n    cluster: \"c-m-1\"\ncurrent-context: \"c-m-1\"\n"
    )
}

fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = stream.read(&mut chunk).unwrap_or(0);
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }

    let header_end = buf
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
        .unwrap_or(buf.len());
    let header_str = String::from_utf8_lossy(&buf[..header_end]);
    let mut lines = header_str.split("\r\n");
    let request_line = lines.next().unwrap_or("");
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();
    let mut headers = HashMap::new();
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    CapturedRequest {
        method,
        path,
        headers,
    }
}
