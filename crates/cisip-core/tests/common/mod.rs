//! Test doubles and common utilities for data source contract tests
//!
//! The doubles count calls so tests can verify the single-shot constraints
//! (one acquisition, one list call per refresh).

#![allow(dead_code)]

use cisip_core::error::{DetailedResponse, Error, Result};
use cisip_core::traits::{ClientSession, IpListClient, IpsResult, ListIpsOptions};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const IPV4: &str = "1.2.3.0/24";
pub const IPV6: &str = "2001:db8::/32";

/// What the scripted client answers
#[derive(Clone)]
pub enum Reply {
    Ok(IpsResult),
    Fail(DetailedResponse),
    Transport(String),
}

/// A client that answers with a scripted reply
pub struct ScriptedClient {
    reply: Reply,
    list_calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl IpListClient for ScriptedClient {
    async fn list_ips(&self, _options: &ListIpsOptions) -> Result<(IpsResult, DetailedResponse)> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Ok(result) => {
                let body = serde_json::json!({ "success": true, "result": result }).to_string();
                Ok((result.clone(), DetailedResponse::new(200, body)))
            }
            Reply::Fail(response) => Err(Error::remote_request(
                format!("List IPs failed with status {}", response.status_code),
                Some(response.clone()),
            )),
            Reply::Transport(message) => Err(Error::Other(message.clone())),
        }
    }
}

/// A session that hands out scripted clients
pub struct MockSession {
    reply: Reply,
    acquisition_error: Option<String>,
    acquire_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl MockSession {
    /// Session whose client returns the given lists
    pub fn returning(ipv4: &[&str], ipv6: &[&str]) -> Self {
        Self::with_reply(Reply::Ok(IpsResult::new(
            ipv4.iter().map(|s| s.to_string()).collect(),
            ipv6.iter().map(|s| s.to_string()).collect(),
        )))
    }

    /// Session whose client fails with the given raw response
    pub fn failing(status_code: u16, body: &str) -> Self {
        Self::with_reply(Reply::Fail(DetailedResponse::new(status_code, body)))
    }

    /// Session whose client fails before any response arrives
    pub fn unreachable(message: &str) -> Self {
        Self::with_reply(Reply::Transport(message.to_string()))
    }

    /// Session that cannot produce a client
    pub fn without_client(message: &str) -> Self {
        let mut session = Self::returning(&[IPV4], &[IPV6]);
        session.acquisition_error = Some(message.to_string());
        session
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            acquisition_error: None,
            acquire_calls: Arc::new(AtomicUsize::new(0)),
            list_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn acquire_call_count(&self) -> usize {
        self.acquire_calls.load(Ordering::SeqCst)
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl ClientSession for MockSession {
    fn cis_ip_client_session(&self) -> Result<Box<dyn IpListClient>> {
        self.acquire_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.acquisition_error {
            return Err(Error::client_acquisition(message.clone()));
        }
        Ok(Box::new(ScriptedClient {
            reply: self.reply.clone(),
            list_calls: self.list_calls.clone(),
        }))
    }
}

/// In-memory log sink for asserting on tracing output
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber writing every event at TRACE and above into this capture
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + use<> {
        let capture = self.clone();
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || capture.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
