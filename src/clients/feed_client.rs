use crate::clients::transport::{FeedRequest, Method, Transport};
use crate::framework::{Document, FeedError, FeedResult, FeedStore, ATOM_NS};
use crate::runtime::{FeedConfig, FeedKind};
use tracing::{debug, info, instrument, warn};

/// [`FeedStore`] over the GData v3 worksheet and list feeds.
///
/// Collections are worksheets, documents are list-feed rows. Every call is a
/// single blocking request; failures are not retried.
pub struct FeedClient<T: Transport> {
    config: FeedConfig,
    transport: T,
}

impl<T: Transport> FeedClient<T> {
    pub fn new(config: FeedConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    fn worksheets_url(&self, store_id: &str) -> String {
        format!("{}/{}/private/full", self.config.worksheet_base_url, store_id)
    }

    fn list_url(&self, store_id: &str, collection_id: &str) -> String {
        format!(
            "{}/{}/{}/private/full",
            self.config.list_base_url, store_id, collection_id
        )
    }

    fn request(
        &self,
        feed: FeedKind,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> FeedResult<String> {
        let mut headers = vec![
            ("GData-Version".to_string(), self.config.gdata_version.clone()),
            ("User-Agent".to_string(), self.config.source.clone()),
        ];
        if let Some(token) = self.config.token_for(feed) {
            headers.push(("Authorization".to_string(), format!("AuthSub token=\"{token}\"")));
        }
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/atom+xml".to_string()));
        }

        let request = FeedRequest {
            method,
            url,
            headers,
            body,
        };
        debug!(%method, url = %request.url, "Sending request");

        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            warn!(%method, url = %request.url, status = response.status, "Request failed");
            return Err(FeedError::Transport(format!(
                "{}: {}",
                response.status,
                response.body.trim()
            )));
        }
        Ok(response.body)
    }
}

impl<T: Transport> FeedStore for FeedClient<T> {
    #[instrument(skip(self))]
    fn resolve_collection_id(&self, store_id: &str, collection_name: &str) -> FeedResult<String> {
        let body = self.request(
            FeedKind::Worksheet,
            Method::Get,
            self.worksheets_url(store_id),
            None,
        )?;
        let wanted = collection_name.to_ascii_lowercase();
        let entries = Document::parse(&body)?.entries();

        let collection_id = entries
            .iter()
            .find(|entry| {
                entry
                    .root()
                    .child(ATOM_NS, "title")
                    .is_some_and(|title| title.text().to_ascii_lowercase() == wanted)
            })
            .and_then(|entry| entry.root().child(ATOM_NS, "id"))
            .and_then(|id| id.text().rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        debug!(?collection_id, "Worksheet lookup");
        collection_id.ok_or_else(|| FeedError::CollectionNotFound(collection_name.to_string()))
    }

    #[instrument(skip(self))]
    fn find_document(
        &self,
        store_id: &str,
        collection_id: &str,
        identity_field: &str,
        identity_value: &str,
    ) -> FeedResult<Option<Document>> {
        let url = format!(
            "{}?sq={}={}",
            self.list_url(store_id, collection_id),
            urlencoding::encode(identity_field),
            urlencoding::encode(identity_value)
        );
        let body = self.request(FeedKind::List, Method::Get, url, None)?;
        let found = Document::parse(&body)?.entries().into_iter().next();
        debug!(found = found.is_some(), "Lookup");
        Ok(found)
    }

    #[instrument(skip(self, document))]
    fn create_document(
        &self,
        store_id: &str,
        collection_id: &str,
        document: &Document,
    ) -> FeedResult<Document> {
        let body = self.request(
            FeedKind::List,
            Method::Post,
            self.list_url(store_id, collection_id),
            Some(document.to_xml()?),
        )?;
        let created = Document::parse(&body)?;
        info!(identity = ?created.identity(), "Row created");
        Ok(created)
    }

    #[instrument(skip(self, document))]
    fn update_document(&self, store_id: &str, document: &Document) -> FeedResult<Document> {
        let edit_link = document
            .edit_link()
            .ok_or_else(|| FeedError::Transport("document has no edit link".to_string()))?;
        let body = self.request(
            FeedKind::List,
            Method::Put,
            edit_link.to_string(),
            Some(document.to_xml()?),
        )?;
        let updated = Document::parse(&body)?;
        info!(identity = ?updated.identity(), "Row updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::transport::FeedResponse;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const WORKSHEETS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:gs="http://schemas.google.com/spreadsheets/2006">
  <entry>
    <id>https://spreadsheets.google.com/feeds/worksheets/key/private/full/od6</id>
    <title type="text">Orders</title>
  </entry>
  <entry>
    <id>https://spreadsheets.google.com/feeds/worksheets/key/private/full/od7</id>
    <title type="text">Sync Log</title>
  </entry>
</feed>"#;

    const ROW: &str = r#"<entry xmlns="http://www.w3.org/2005/Atom" xmlns:gsx="http://schemas.google.com/spreadsheets/2006/extended">
  <id>https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr</id>
  <link rel="edit" type="application/atom+xml" href="https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr/1a2b"/>
  <gsx:id>42</gsx:id>
</entry>"#;

    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<FeedResult<FeedResponse>>>,
        requests: Mutex<Vec<FeedRequest>>,
    }

    impl ScriptedTransport {
        fn respond(&self, status: u16, body: &str) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(FeedResponse::new(status, body)));
        }

        fn requests(&self) -> Vec<FeedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: &FeedRequest) -> FeedResult<FeedResponse> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response")
        }
    }

    fn client(transport: &ScriptedTransport) -> FeedClient<&ScriptedTransport> {
        let config = FeedConfig {
            worksheet_token: Some("ws-token".into()),
            list_token: Some("list-token".into()),
            ..FeedConfig::default()
        };
        FeedClient::new(config, transport)
    }

    #[test]
    fn test_resolve_matches_title_case_insensitively() {
        let transport = ScriptedTransport::default();
        transport.respond(200, WORKSHEETS);

        let id = client(&transport).resolve_collection_id("key", "sync log").unwrap();
        assert_eq!(id, "od7");

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url,
            "https://spreadsheets.google.com/feeds/worksheets/key/private/full"
        );
        assert_eq!(request.header("authorization"), Some("AuthSub token=\"ws-token\""));
        assert_eq!(request.header("GData-Version"), Some("3"));
    }

    #[test]
    fn test_resolve_unknown_title() {
        let transport = ScriptedTransport::default();
        transport.respond(200, WORKSHEETS);

        let result = client(&transport).resolve_collection_id("key", "invoices");
        assert_eq!(result, Err(FeedError::CollectionNotFound("invoices".into())));
    }

    #[test]
    fn test_find_builds_structured_query() {
        let transport = ScriptedTransport::default();
        transport.respond(
            200,
            &format!(r#"<feed xmlns="http://www.w3.org/2005/Atom">{ROW}</feed>"#),
        );

        let found = client(&transport)
            .find_document("key", "od6", "order id", "a&b")
            .unwrap()
            .unwrap();

        assert_eq!(found.read("id"), Some("42"));
        let request = &transport.requests()[0];
        assert_eq!(
            request.url,
            "https://spreadsheets.google.com/feeds/list/key/od6/private/full?sq=order%20id=a%26b"
        );
        assert_eq!(request.header("Authorization"), Some("AuthSub token=\"list-token\""));
    }

    #[test]
    fn test_find_empty_feed_is_none() {
        let transport = ScriptedTransport::default();
        transport.respond(200, r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#);

        let found = client(&transport).find_document("key", "od6", "id", "1").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_create_posts_entry_to_list_feed() {
        let transport = ScriptedTransport::default();
        transport.respond(201, ROW);

        let mut doc = Document::fresh();
        doc.write("id", "42");
        let created = client(&transport).create_document("key", "od6", &doc).unwrap();

        assert!(created.has_identity());
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(
            request.url,
            "https://spreadsheets.google.com/feeds/list/key/od6/private/full"
        );
        assert_eq!(request.header("Content-Type"), Some("application/atom+xml"));
        assert!(request.body.as_deref().unwrap().contains("<gsx:id>42</gsx:id>"));
    }

    #[test]
    fn test_update_puts_to_edit_link() {
        let transport = ScriptedTransport::default();
        transport.respond(200, ROW);

        let doc = Document::parse(ROW).unwrap();
        client(&transport).update_document("key", &doc).unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Put);
        assert_eq!(
            request.url,
            "https://spreadsheets.google.com/feeds/list/key/od6/private/full/cokwr/1a2b"
        );
    }

    #[test]
    fn test_update_without_edit_link_fails() {
        let transport = ScriptedTransport::default();
        let result = client(&transport).update_document("key", &Document::fresh());

        assert!(matches!(result, Err(FeedError::Transport(_))));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_error_status_becomes_transport_error() {
        let transport = ScriptedTransport::default();
        transport.respond(403, "Token invalid\n");

        let result = client(&transport).resolve_collection_id("key", "orders");
        assert_eq!(result, Err(FeedError::Transport("403: Token invalid".into())));
    }

    #[test]
    fn test_redirect_is_transport_error() {
        let transport = ScriptedTransport::default();
        transport.respond(302, "<html>Moved</html>");

        let result = client(&transport).find_document("key", "od6", "id", "1");
        assert_eq!(result, Err(FeedError::Transport("302: <html>Moved</html>".into())));
    }

    #[test]
    fn test_transport_failure_passes_through() {
        let transport = ScriptedTransport::default();
        transport
            .responses
            .lock()
            .unwrap()
            .push_back(Err(FeedError::Transport("connection reset".into())));

        let result = client(&transport).create_document("key", "od6", &Document::fresh());
        assert_eq!(result, Err(FeedError::Transport("connection reset".into())));
    }
}
