//! RESP2 store backend for Redis-compatible servers.
//!
//! The cache needs five commands (PING, SET with PX, GET, SCAN with MATCH,
//! QUIT), so the client implements exactly those over a single connection
//! rather than pulling in a full Redis driver. Commands are serialized
//! through a mutex; the catalog issues them one at a time per operation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::store::{FlightStore, StoreFuture};

type Connection = BufReader<TcpStream>;

/// One parsed RESP2 reply.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Reply {
    Simple(String),
    Error(String),
    Integer(i64),
    /// Bulk string; `None` is the nil reply (`$-1`).
    Bulk(Option<String>),
    Array(Vec<Reply>),
}

/// TTL store backed by a Redis-compatible server at `host:port`.
pub struct RedisStore {
    addr: String,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl RedisStore {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Address the store connects to, for logging.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    async fn command(&self, parts: &[&str]) -> Result<Reply, StoreError> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(StoreError::NotOpen)?;
        write_command(conn, parts).await?;
        match read_reply(conn).await? {
            Reply::Error(message) => Err(StoreError::Protocol(format!(
                "server rejected {}: {message}",
                parts.first().copied().unwrap_or("command")
            ))),
            reply => Ok(reply),
        }
    }
}

impl FlightStore for RedisStore {
    fn open(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let stream = TcpStream::connect(&self.addr).await.map_err(|error| {
                StoreError::Connection(format!("connect to {}: {error}", self.addr))
            })?;
            let mut conn = BufReader::new(stream);

            write_command(&mut conn, &["PING"]).await?;
            match read_reply(&mut conn).await? {
                Reply::Simple(pong) if pong == "PONG" => {}
                other => return Err(unexpected("PING", &other)),
            }

            *self.conn.lock().await = Some(conn);
            tracing::debug!(addr = %self.addr, "store connection established");
            Ok(())
        })
    }

    fn close(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut conn) = self.conn.lock().await.take() {
                // Best effort; the server closes the socket either way.
                let _ = write_command(&mut conn, &["QUIT"]).await;
            }
            Ok(())
        })
    }

    fn put<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let ttl_ms = ttl.as_millis().max(1).to_string();
            match self
                .command(&["SET", key, value, "PX", ttl_ms.as_str()])
                .await?
            {
                Reply::Simple(ok) if ok == "OK" => Ok(()),
                other => Err(unexpected("SET", &other)),
            }
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            match self.command(&["GET", key]).await? {
                Reply::Bulk(value) => Ok(value),
                other => Err(unexpected("GET", &other)),
            }
        })
    }

    fn scan<'a>(&'a self, prefix: &'a str) -> StoreFuture<'a, Vec<String>> {
        Box::pin(async move {
            let pattern = format!("{prefix}*");
            let mut cursor = String::from("0");
            let mut keys = Vec::new();

            loop {
                let reply = self
                    .command(&[
                        "SCAN",
                        cursor.as_str(),
                        "MATCH",
                        pattern.as_str(),
                        "COUNT",
                        "100",
                    ])
                    .await?;
                let Reply::Array(items) = reply else {
                    return Err(unexpected("SCAN", &reply));
                };
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(Reply::Bulk(Some(next))), Some(Reply::Array(page))) => {
                        for item in page {
                            match item {
                                Reply::Bulk(Some(key)) => keys.push(key),
                                other => return Err(unexpected("SCAN", &other)),
                            }
                        }
                        cursor = next;
                    }
                    _ => return Err(StoreError::Protocol("malformed SCAN reply".to_owned())),
                }
                if cursor == "0" {
                    return Ok(keys);
                }
            }
        })
    }
}

fn unexpected(command: &str, reply: &Reply) -> StoreError {
    StoreError::Protocol(format!("unexpected reply to {command}: {reply:?}"))
}

async fn write_command(conn: &mut Connection, parts: &[&str]) -> Result<(), StoreError> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(format!("*{}\r\n", parts.len()).as_bytes());
    for part in parts {
        buf.extend_from_slice(format!("${}\r\n", part.len()).as_bytes());
        buf.extend_from_slice(part.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
    conn.get_mut().write_all(&buf).await?;
    Ok(())
}

async fn read_line(conn: &mut Connection) -> Result<String, StoreError> {
    let mut line = String::new();
    let read = conn.read_line(&mut line).await?;
    if read == 0 {
        return Err(StoreError::Connection(
            "connection closed by store".to_owned(),
        ));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

fn parse_count(text: &str) -> Result<i64, StoreError> {
    text.parse()
        .map_err(|_| StoreError::Protocol(format!("invalid length: {text:?}")))
}

// Recursive for array replies, hence the explicit boxing.
fn read_reply<'a>(
    conn: &'a mut Connection,
) -> Pin<Box<dyn Future<Output = Result<Reply, StoreError>> + Send + 'a>> {
    Box::pin(async move {
        let line = read_line(conn).await?;
        let Some(kind) = line.chars().next() else {
            return Err(StoreError::Protocol("empty reply line".to_owned()));
        };
        let rest = &line[1..];
        match kind {
            '+' => Ok(Reply::Simple(rest.to_owned())),
            '-' => Ok(Reply::Error(rest.to_owned())),
            ':' => Ok(Reply::Integer(parse_count(rest)?)),
            '$' => {
                let len = parse_count(rest)?;
                if len < 0 {
                    return Ok(Reply::Bulk(None));
                }
                let mut buf = vec![0u8; len as usize + 2];
                conn.read_exact(&mut buf).await?;
                buf.truncate(len as usize);
                let value = String::from_utf8(buf)
                    .map_err(|_| StoreError::Protocol("bulk string is not utf-8".to_owned()))?;
                Ok(Reply::Bulk(Some(value)))
            }
            '*' => {
                let len = parse_count(rest)?;
                if len < 0 {
                    return Ok(Reply::Array(Vec::new()));
                }
                let mut items = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    items.push(read_reply(conn).await?);
                }
                Ok(Reply::Array(items))
            }
            other => Err(StoreError::Protocol(format!(
                "unknown reply type {other:?}"
            ))),
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokio::net::TcpListener;

    use super::*;

    /// Minimal single-connection RESP server used to exercise the client
    /// end-to-end. TTLs are accepted and ignored; expiry behavior belongs to
    /// the real server.
    async fn serve_one(listener: TcpListener) {
        let (stream, _) = listener.accept().await.expect("accept");
        let mut conn = BufReader::new(stream);
        let mut map: HashMap<String, String> = HashMap::new();

        loop {
            let request = match read_reply(&mut conn).await {
                Ok(reply) => reply,
                Err(_) => return,
            };
            let Reply::Array(items) = request else { return };
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Reply::Bulk(Some(text)) => Some(text),
                    _ => None,
                })
                .collect();
            let Some(command) = parts.first() else { return };

            match command.to_ascii_uppercase().as_str() {
                "PING" => write_raw(&mut conn, "+PONG\r\n").await,
                "SET" => {
                    map.insert(parts[1].clone(), parts[2].clone());
                    write_raw(&mut conn, "+OK\r\n").await;
                }
                "GET" => match map.get(&parts[1]) {
                    Some(value) => {
                        let reply = format!("${}\r\n{value}\r\n", value.len());
                        write_raw(&mut conn, &reply).await;
                    }
                    None => write_raw(&mut conn, "$-1\r\n").await,
                },
                "SCAN" => {
                    let prefix = parts[3].trim_end_matches('*');
                    let keys: Vec<&String> =
                        map.keys().filter(|key| key.starts_with(prefix)).collect();
                    let mut reply = format!("*2\r\n$1\r\n0\r\n*{}\r\n", keys.len());
                    for key in keys {
                        reply.push_str(&format!("${}\r\n{key}\r\n", key.len()));
                    }
                    write_raw(&mut conn, &reply).await;
                }
                "QUIT" => {
                    write_raw(&mut conn, "+OK\r\n").await;
                    return;
                }
                _ => write_raw(&mut conn, "-ERR unknown command\r\n").await,
            }
        }
    }

    async fn write_raw(conn: &mut Connection, raw: &str) {
        conn.get_mut()
            .write_all(raw.as_bytes())
            .await
            .expect("write reply");
    }

    async fn start_store() -> RedisStore {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(serve_one(listener));

        let store = RedisStore::new(&addr.ip().to_string(), addr.port());
        store.open().await.expect("open");
        store
    }

    #[tokio::test]
    async fn put_get_scan_roundtrip() {
        let store = start_store().await;

        store
            .put("flights:a", "{\"slices\":[]}", Duration::from_secs(60))
            .await
            .expect("put");
        store
            .put("other:b", "x", Duration::from_secs(60))
            .await
            .expect("put");

        assert_eq!(
            store.get("flights:a").await.expect("get"),
            Some("{\"slices\":[]}".to_owned())
        );
        assert_eq!(store.get("flights:missing").await.expect("get"), None);

        let keys = store.scan("flights:").await.expect("scan");
        assert_eq!(keys, vec!["flights:a".to_owned()]);

        store.close().await.expect("close");
    }

    #[tokio::test]
    async fn error_reply_surfaces_as_protocol_error() {
        let store = start_store().await;

        let error = store.command(&["NOPE"]).await.expect_err("unknown command");
        assert!(matches!(error, StoreError::Protocol(_)));
    }

    #[tokio::test]
    async fn commands_before_open_fail() {
        let store = RedisStore::new("127.0.0.1", 1);
        let error = store.get("k").await.expect_err("not open");
        assert!(matches!(error, StoreError::NotOpen));
    }

    #[tokio::test]
    async fn open_against_closed_port_fails() {
        // Nothing listens on port 1; connect errors map to Connection.
        let store = RedisStore::new("127.0.0.1", 1);
        let error = store.open().await.expect_err("connect should fail");
        assert!(matches!(error, StoreError::Connection(_)));
    }
}
