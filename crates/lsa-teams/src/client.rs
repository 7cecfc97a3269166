//! Async webhook client.

use std::{future::Future, time::Duration};

use reqwest::Client;
use tracing::debug;

use crate::{
  card::MessageCard,
  error::{Error, Result},
};

/// Something that can deliver an announcement to a destination address.
///
/// The notification pass depends on this seam rather than on HTTP, and
/// spawns each delivery as its own task.
pub trait Notifier: Send + Sync + 'static {
  fn send<'a>(
    &'a self,
    destination: &'a str,
    text: &'a str,
    summary: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

/// Posts [`MessageCard`]s to Teams incoming webhooks.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TeamsClient {
  client: Client,
}

impl TeamsClient {
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client })
  }

  /// `POST <url>` with a JSON `MessageCard` body.
  pub async fn post(&self, url: &str, card: &MessageCard) -> Result<()> {
    let resp = self.client.post(url).json(card).send().await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }
    debug!(%status, "webhook accepted message");
    Ok(())
  }
}

impl Notifier for TeamsClient {
  fn send<'a>(
    &'a self,
    destination: &'a str,
    text: &'a str,
    summary: &'a str,
  ) -> impl Future<Output = Result<()>> + Send + 'a {
    async move {
      let card = MessageCard::new(text, summary);
      self.post(destination, &card).await
    }
  }
}

#[cfg(test)]
mod tests {
  use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
  };

  use super::*;

  /// Accept one HTTP request, answer with `status`, and return the request
  /// body.
  async fn one_shot_server(status: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhook", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut buf = Vec::new();
      let mut chunk = [0u8; 4096];
      let body_start = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
          break pos + 4;
        }
      };
      let head = String::from_utf8_lossy(&buf[..body_start]).to_lowercase();
      let length: usize = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .map(|v| v.trim().parse().unwrap())
        .unwrap_or(0);
      while buf.len() < body_start + length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
      }
      let response =
        format!("HTTP/1.1 {status}\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok");
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();
      String::from_utf8(buf[body_start..body_start + length].to_vec()).unwrap()
    });

    (url, handle)
  }

  #[tokio::test]
  async fn posts_message_card() {
    let (url, server) = one_shot_server("200 OK").await;
    let client = TeamsClient::new(Duration::from_secs(5)).unwrap();

    client.send(&url, "body text", "summary text").await.unwrap();

    let body: serde_json::Value =
      serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(body["type"], "MessageCard");
    assert_eq!(body["text"], "body text");
    assert_eq!(body["summary"], "summary text");
  }

  #[tokio::test]
  async fn non_success_status_is_an_error() {
    let (url, server) = one_shot_server("400 Bad Request").await;
    let client = TeamsClient::new(Duration::from_secs(5)).unwrap();

    let err = client.send(&url, "t", "s").await.unwrap_err();
    assert!(matches!(
      err,
      Error::Status { status, .. } if status == reqwest::StatusCode::BAD_REQUEST
    ));
    server.await.unwrap();
  }

  #[tokio::test]
  async fn unreachable_host_is_an_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/webhook", listener.local_addr().unwrap());
    drop(listener);

    let client = TeamsClient::new(Duration::from_secs(5)).unwrap();
    let err = client.send(&url, "t", "s").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
  }
}
