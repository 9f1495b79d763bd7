use std::time::Duration;

use crate::error::CoreError;
use crate::models::{Event, EventDraft};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

#[derive(Deserialize)]
struct EventList {
    events: Vec<serde_json::Value>,
}

#[derive(Serialize)]
struct NewEventList<'a> {
    events: &'a [EventDraft],
}

/// JSON-over-HTTP event store (`/api/events`, `/api/events-list`).
#[derive(Debug, Clone)]
pub struct HttpEventStore {
    client: Client,
    base_url: String,
}

impl HttpEventStore {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Every request gives up after `timeout`, so a server that accepts
    /// the connection and never answers still yields a transport error.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Non-2xx responses are failures, same as a dropped connection.
fn ensure_success(response: Response) -> Result<Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CoreError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

// One malformed record must not hide the rest of the calendar.
fn parse_events(raw: Vec<serde_json::Value>) -> Vec<Event> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<Event>(value) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(error = %err, "Skipping malformed event from store");
                None
            }
        })
        .collect()
}

#[async_trait]
impl super::EventStore for HttpEventStore {
    async fn list_events(&self) -> Result<Vec<Event>, CoreError> {
        let response = self.client.get(self.url("/api/events")).send().await?;
        let list: EventList = ensure_success(response)?.json().await?;
        Ok(parse_events(list.events))
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<Event, CoreError> {
        let response = self
            .client
            .post(self.url("/api/events"))
            .json(draft)
            .send()
            .await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn create_events(&self, drafts: &[EventDraft]) -> Result<Vec<Event>, CoreError> {
        let response = self
            .client
            .post(self.url("/api/events-list"))
            .json(&NewEventList { events: drafts })
            .send()
            .await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn update_event(&self, id: Uuid, event: &Event) -> Result<Event, CoreError> {
        let response = self
            .client
            .put(self.url(&format!("/api/events/{id}")))
            .json(event)
            .send()
            .await?;
        Ok(ensure_success(response)?.json().await?)
    }

    async fn delete_event(&self, id: Uuid) -> Result<(), CoreError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/events/{id}")))
            .send()
            .await?;
        ensure_success(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::EventStore;
    use chrono::{NaiveDate, NaiveTime};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    #[derive(Debug, Clone)]
    struct Recorded {
        request_line: String,
        body: String,
    }

    /// Answers each connection with the next canned `(status, body)` pair.
    async fn serve(responses: Vec<(&'static str, String)>) -> (String, Arc<Mutex<Vec<Recorded>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let log = recorded.clone();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                log.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
            }
        });

        (base_url, recorded)
    }

    async fn read_request(stream: &mut TcpStream) -> Recorded {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            assert!(n > 0, "connection closed before headers ended");
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .map(|(_, value)| value.trim().parse::<usize>().unwrap())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body ended");
            buf.extend_from_slice(&chunk[..n]);
        }

        Recorded {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..]).to_string(),
        }
    }

    fn store(base_url: &str) -> HttpEventStore {
        HttpEventStore::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn event() -> Event {
        EventDraft::new(
            "Standup",
            NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
        )
        .with_id(Uuid::now_v7())
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = store("http://localhost:3000/");
        assert_eq!(store.base_url(), "http://localhost:3000");
        assert_eq!(store.url("/api/events"), "http://localhost:3000/api/events");
    }

    #[test]
    fn test_batch_body_shape() {
        let drafts: Vec<EventDraft> = Vec::new();
        let body = serde_json::to_value(NewEventList { events: &drafts }).unwrap();
        assert_eq!(body, serde_json::json!({ "events": [] }));
    }

    mod transport_tests {
        use super::*;

        #[tokio::test]
        async fn test_list_unwraps_events_envelope() {
            let stored = event();
            let body = serde_json::json!({ "events": [stored] }).to_string();
            let (base_url, recorded) = serve(vec![("200 OK", body)]).await;

            let events = store(&base_url).list_events().await.unwrap();

            assert_eq!(events, vec![stored]);
            assert_eq!(recorded.lock().unwrap()[0].request_line, "GET /api/events HTTP/1.1");
        }

        #[tokio::test]
        async fn test_list_skips_malformed_records() {
            let stored = event();
            let mut bad = serde_json::to_value(event()).unwrap();
            bad["id"] = serde_json::json!("1");
            let body = serde_json::json!({ "events": [bad, stored] }).to_string();
            let (base_url, _recorded) = serve(vec![("200 OK", body)]).await;

            let events = store(&base_url).list_events().await.unwrap();

            assert_eq!(events, vec![stored]);
        }

        #[tokio::test]
        async fn test_create_events_posts_batch_envelope() {
            let created = event();
            let draft = created.to_draft();
            let body = serde_json::json!([created]).to_string();
            let (base_url, recorded) = serve(vec![("201 Created", body)]).await;

            let events = store(&base_url).create_events(&[draft.clone()]).await.unwrap();

            assert_eq!(events, vec![created]);
            let request = recorded.lock().unwrap()[0].clone();
            assert_eq!(request.request_line, "POST /api/events-list HTTP/1.1");
            let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
            assert_eq!(sent, serde_json::json!({ "events": [draft] }));
        }

        #[tokio::test]
        async fn test_update_puts_event_by_id() {
            let mut updated = event();
            updated.title = "Retro".to_string();
            let body = serde_json::to_string(&updated).unwrap();
            let (base_url, recorded) = serve(vec![("200 OK", body)]).await;

            let returned = store(&base_url).update_event(updated.id, &updated).await.unwrap();

            assert_eq!(returned, updated);
            let request = recorded.lock().unwrap()[0].clone();
            assert_eq!(request.request_line, format!("PUT /api/events/{} HTTP/1.1", updated.id));
            let sent: Event = serde_json::from_str(&request.body).unwrap();
            assert_eq!(sent, updated);
        }

        #[tokio::test]
        async fn test_delete_not_found_is_status_error() {
            let id = Uuid::now_v7();
            let (base_url, recorded) = serve(vec![("404 Not Found", "{}".to_string())]).await;

            let err = store(&base_url).delete_event(id).await.unwrap_err();

            assert!(err.is_transport());
            let CoreError::Status { status, url } = err else {
                panic!("Expected a status error");
            };
            assert_eq!(status, 404);
            assert!(url.ends_with(&format!("/api/events/{id}")));
            assert_eq!(
                recorded.lock().unwrap()[0].request_line,
                format!("DELETE /api/events/{id} HTTP/1.1")
            );
        }

        #[tokio::test]
        async fn test_server_error_on_list_is_status_error() {
            let (base_url, _recorded) = serve(vec![("500 Internal Server Error", "{}".to_string())]).await;

            let err = store(&base_url).list_events().await.unwrap_err();

            assert!(matches!(err, CoreError::Status { status: 500, .. }));
        }

        #[tokio::test]
        async fn test_silent_server_times_out() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            tokio::spawn(async move {
                // hold the connection open without answering
                let (_stream, _) = listener.accept().await.unwrap();
                tokio::time::sleep(Duration::from_secs(30)).await;
            });

            let store = HttpEventStore::new(base_url, Duration::from_millis(200)).unwrap();
            let result = tokio::time::timeout(Duration::from_secs(5), store.list_events()).await;

            let err = result.expect("request should give up on its own").unwrap_err();
            assert!(err.is_transport());
            assert!(matches!(&err, CoreError::Http(e) if e.is_timeout()));
        }
    }
}
