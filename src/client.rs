//! Domain REST client for the five ledger operations.
//!
//! Thin layer over [`RestTransport`]: serialize the request, make exactly
//! one network call, deserialize the body into the matching domain type.
//! No retries, no caching; every failure propagates as a [`ClientError`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::TlsSettings;
use crate::error::ClientError;
use crate::model::{Account, Participant, Transfer};
use crate::transport::RestTransport;

/// Seam for the dispatcher: the five business operations plus shutdown.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn create_participant(&self, participant: &Participant)
    -> Result<Participant, ClientError>;

    async fn participant(&self, name: &str) -> Result<Participant, ClientError>;

    async fn all_participants(&self) -> Result<Vec<Participant>, ClientError>;

    async fn participant_accounts(&self, name: &str) -> Result<Vec<Account>, ClientError>;

    async fn transfer_prepare(&self, transfer: &Transfer) -> Result<Transfer, ClientError>;

    async fn transfer_lookup(
        &self,
        participant: &str,
        transfer_id: &str,
    ) -> Result<Transfer, ClientError>;

    fn close(&self);
}

pub struct DfspClient {
    transport: RestTransport,
}

impl DfspClient {
    pub fn new(base_url: &str, tls: TlsSettings) -> Self {
        Self {
            transport: RestTransport::new(base_url, tls),
        }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
        serde_json::from_value(value).map_err(|e| ClientError::JsonParsing(e.to_string()))
    }

    fn encode<T: serde::Serialize>(body: &T) -> Result<String, ClientError> {
        serde_json::to_string(body).map_err(|e| ClientError::JsonParsing(e.to_string()))
    }
}

#[async_trait]
impl LedgerApi for DfspClient {
    async fn create_participant(
        &self,
        participant: &Participant,
    ) -> Result<Participant, ClientError> {
        let body = Self::encode(participant)?;
        let value = self
            .transport
            .post_object("/jmeter/participants/create", body)
            .await?;
        Self::decode(value)
    }

    async fn participant(&self, name: &str) -> Result<Participant, ClientError> {
        let value = self
            .transport
            .get_object(&format!("/participants/{}", name))
            .await?;
        Self::decode(value)
    }

    async fn all_participants(&self) -> Result<Vec<Participant>, ClientError> {
        let values = self.transport.get_array("/participants").await?;
        Self::decode(Value::Array(values))
    }

    async fn participant_accounts(&self, name: &str) -> Result<Vec<Account>, ClientError> {
        let values = self
            .transport
            .get_array(&format!("/participants/{}/accounts", name))
            .await?;
        Self::decode(Value::Array(values))
    }

    async fn transfer_prepare(&self, transfer: &Transfer) -> Result<Transfer, ClientError> {
        let body = Self::encode(transfer)?;
        let value = self
            .transport
            .post_object("/jmeter/transfers/prepare", body)
            .await?;
        Self::decode(value)
    }

    async fn transfer_lookup(
        &self,
        participant: &str,
        transfer_id: &str,
    ) -> Result<Transfer, ClientError> {
        let value = self
            .transport
            .get_object(&format!(
                "/jmeter/participants/{}/transfers/{}",
                participant, transfer_id
            ))
            .await?;
        Self::decode(value)
    }

    fn close(&self) {
        self.transport.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::Path;
    use axum::routing::{get, post};

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_create_participant_round_trip() {
        let router = Router::new().route(
            "/jmeter/participants/create",
            post(|body: String| async move {
                let mut participant: serde_json::Value = serde_json::from_str(&body).unwrap();
                participant["newlyCreated"] = serde_json::Value::Bool(true);
                participant.to_string()
            }),
        );
        let base = serve(router).await;
        let client = DfspClient::new(&base, TlsSettings::default());

        let created = client
            .create_participant(&Participant::named("fspA", "USD"))
            .await
            .unwrap();
        assert_eq!(created.name.as_deref(), Some("fspA"));
        assert!(created.newly_created);
    }

    #[tokio::test]
    async fn test_lookup_path_includes_participant_and_id() {
        let router = Router::new().route(
            "/jmeter/participants/{name}/transfers/{id}",
            get(|Path((name, id)): Path<(String, String)>| async move {
                format!(r#"{{"transferId":"{}","payerFsp":"{}"}}"#, id, name)
            }),
        );
        let base = serve(router).await;
        let client = DfspClient::new(&base, TlsSettings::default());

        let transfer = client.transfer_lookup("fspA", "abc-123").await.unwrap();
        assert_eq!(transfer.transfer_id.as_deref(), Some("abc-123"));
        assert_eq!(transfer.payer_fsp.as_deref(), Some("fspA"));
    }

    #[tokio::test]
    async fn test_all_participants_decodes_array() {
        let router = Router::new().route(
            "/participants",
            get(|| async { r#"[{"name":"fspA","isActive":1},{"name":"fspB","isActive":0}]"# }),
        );
        let base = serve(router).await;
        let client = DfspClient::new(&base, TlsSettings::default());

        let participants = client.all_participants().await.unwrap();
        assert_eq!(participants.len(), 2);
        assert!(participants[0].is_active);
        assert!(!participants[1].is_active);
    }

    #[tokio::test]
    async fn test_participant_accounts_decodes_array() {
        let router = Router::new().route(
            "/participants/{name}/accounts",
            get(|Path(_name): Path<String>| async {
                r#"[{"id":1,"ledgerAccountType":"POSITION","currency":"USD","isActive":1}]"#
            }),
        );
        let base = serve(router).await;
        let client = DfspClient::new(&base, TlsSettings::default());

        let accounts = client.participant_accounts("fspA").await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].currency.as_deref(), Some("USD"));
    }
}
