//! Cloud Firestore over the v1 REST API

use std::rc::Rc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{json, Value};
use todo_core::domain::{FieldValue, Fields, StoredDocument};
use todo_core::repository::{DocumentRef, DocumentStore};
use todo_core::{PlatformError, PlatformResult};

use crate::auth::FirebaseAuth;
use crate::config::FirebaseConfig;
use crate::error::{firestore_error, FirebaseError, FirebaseResult};
use crate::http::{endpoint, request_json, request_status_only};
use crate::value::{decode_document, encode_fields, encode_value};

/// Characters that cannot appear raw inside one path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

pub struct FirestoreStore {
    client: reqwest::Client,
    config: FirebaseConfig,
    auth: Rc<FirebaseAuth>,
}

impl FirestoreStore {
    pub fn new(config: FirebaseConfig, auth: Rc<FirebaseAuth>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            auth,
        }
    }

    /// Resource name of the database root, as used inside request bodies
    fn database_name(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.config.project_id)
    }

    fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.database_name(), collection, id)
    }

    fn documents_url(&self) -> String {
        endpoint(&self.config.endpoints.firestore, &self.database_name())
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.documents_url(), segment(collection))
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), segment(id))
    }

    async fn authorize(&self, request: reqwest::RequestBuilder) -> PlatformResult<reqwest::RequestBuilder> {
        Ok(match self.auth.id_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn fetch_json(&self, request: reqwest::RequestBuilder) -> PlatformResult<Value> {
        let request = self.authorize(request).await?;
        Ok(request_json(request, firestore_error).await?)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> PlatformResult<()> {
        let request = self.authorize(request).await?;
        Ok(request_status_only(request, firestore_error).await?)
    }
}

fn query_body(collection: &str, field: &str, value: &FieldValue) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            }
        }
    })
}

/// `runQuery` streams one entry per match; entries without a document only
/// carry progress information.
fn decode_query_results(results: &Value) -> FirebaseResult<Vec<StoredDocument>> {
    let entries = results
        .as_array()
        .ok_or_else(|| FirebaseError::Serialization("runQuery did not return an array".into()))?;
    entries
        .iter()
        .filter_map(|entry| entry.get("document"))
        .map(decode_document)
        .collect()
}

fn update_params(fields: &Fields) -> Vec<(&'static str, String)> {
    let mut params: Vec<_> = fields
        .keys()
        .map(|name| ("updateMask.fieldPaths", name.clone()))
        .collect();
    params.push(("currentDocument.exists", "true".to_string()));
    params
}

#[async_trait(?Send)]
impl DocumentStore for FirestoreStore {
    async fn add(&self, collection: &str, fields: Fields) -> PlatformResult<String> {
        let request = self
            .client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": encode_fields(&fields) }));
        let created = self.fetch_json(request).await?;
        let doc = decode_document(&created).map_err(PlatformError::from)?;
        log::debug!("Created {collection}/{}", doc.id);
        Ok(doc.id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()> {
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .json(&json!({ "fields": encode_fields(&fields) }));
        self.send(request).await
    }

    async fn get(&self, collection: &str, id: &str) -> PlatformResult<Option<StoredDocument>> {
        let request = self.client.get(self.document_url(collection, id));
        match self.fetch_json(request).await {
            Ok(doc) => Ok(Some(decode_document(&doc).map_err(PlatformError::from)?)),
            Err(PlatformError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
    ) -> PlatformResult<Vec<StoredDocument>> {
        let request = self
            .client
            .post(format!("{}:runQuery", self.documents_url()))
            .json(&query_body(collection, field, value));
        let results = self.fetch_json(request).await?;
        Ok(decode_query_results(&results)?)
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> PlatformResult<()> {
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .query(&update_params(&fields))
            .json(&json!({ "fields": encode_fields(&fields) }));
        self.send(request).await
    }

    async fn delete(&self, collection: &str, id: &str) -> PlatformResult<()> {
        let request = self.client.delete(self.document_url(collection, id));
        self.send(request).await
    }

    async fn delete_batch(&self, refs: &[DocumentRef]) -> PlatformResult<()> {
        if refs.is_empty() {
            return Ok(());
        }
        let writes: Vec<Value> = refs
            .iter()
            .map(|r| json!({ "delete": self.document_name(&r.collection, &r.id) }))
            .collect();
        let request = self
            .client
            .post(format!("{}:commit", self.documents_url()))
            .json(&json!({ "writes": writes }));
        self.send(request).await?;
        log::debug!("Deleted {} documents in one commit", refs.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirestoreStore {
        let config = FirebaseConfig {
            api_key: "key".into(),
            project_id: "demo".into(),
            ..Default::default()
        };
        let auth = Rc::new(FirebaseAuth::new(config.clone()));
        FirestoreStore::new(config, auth)
    }

    #[test]
    fn test_urls() {
        let store = store();
        assert_eq!(
            store.document_url("todoLists", "abc"),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/todoLists/abc"
        );
        assert_eq!(
            store.document_name("todos", "t1"),
            "projects/demo/databases/(default)/documents/todos/t1"
        );
    }

    #[test]
    fn test_segments_are_escaped() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("plain-id_1"), "plain-id_1");
    }

    #[test]
    fn test_query_body_filters_on_equality() {
        let body = query_body("todos", "listId", &"l1".into());
        let filter = &body["structuredQuery"]["where"]["fieldFilter"];

        assert_eq!(body["structuredQuery"]["from"][0]["collectionId"], "todos");
        assert_eq!(filter["field"]["fieldPath"], "listId");
        assert_eq!(filter["op"], "EQUAL");
        assert_eq!(filter["value"], json!({ "stringValue": "l1" }));
    }

    #[test]
    fn test_query_results_skip_progress_entries() {
        let results = json!([
            {
                "document": {
                    "name": "projects/demo/databases/(default)/documents/todos/t1",
                    "fields": { "title": { "stringValue": "milk" } }
                },
                "readTime": "2024-05-01T12:00:00Z"
            },
            { "readTime": "2024-05-01T12:00:00Z" }
        ]);

        let docs = decode_query_results(&results).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "t1");
    }

    #[test]
    fn test_update_params_mask_every_field() {
        let mut fields = Fields::new();
        fields.insert("title".into(), "a".into());
        fields.insert("description".into(), "b".into());

        let params = update_params(&fields);

        assert_eq!(
            params,
            vec![
                ("updateMask.fieldPaths", "description".to_string()),
                ("updateMask.fieldPaths", "title".to_string()),
                ("currentDocument.exists", "true".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        store().delete_batch(&[]).await.unwrap();
    }
}
