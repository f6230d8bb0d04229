use serde::{Deserialize, Serialize};

use super::{Participant, Transfer};

/// One scripted unit of the corpus, keyed by `actionType`.
///
/// The payload type is fixed per kind, so corpus decode is exhaustive:
/// an unknown `actionType` or a payload of the wrong shape is a decode
/// error, not a runtime surprise. The kind is immutable; `request` and
/// `response` are each written at most once during execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "actionType", rename_all = "snake_case")]
pub enum Action {
    CreateParticipant {
        #[serde(default)]
        request: Option<Participant>,
        #[serde(default)]
        response: Option<Participant>,
    },
    TransferPrepare {
        #[serde(default)]
        request: Option<Transfer>,
        #[serde(default)]
        response: Option<Transfer>,
    },
    /// Reserved: the commit leg is not replayed yet.
    TransferFulfil {
        #[serde(default)]
        request: Option<Transfer>,
        #[serde(default)]
        response: Option<Transfer>,
    },
    /// Reserved: not yet supported by the dispatcher.
    TransferReject {
        #[serde(default)]
        request: Option<Transfer>,
        #[serde(default)]
        response: Option<Transfer>,
    },
    TransferPrepareFulfil {
        #[serde(default)]
        request: Option<Transfer>,
        #[serde(default)]
        response: Option<Transfer>,
    },
    TransferLookup {
        #[serde(default)]
        request: Option<Transfer>,
        #[serde(default)]
        response: Option<Transfer>,
    },
    /// Reserved: not yet supported by the dispatcher.
    AccountLookup {
        #[serde(default)]
        request: Option<Participant>,
        #[serde(default)]
        response: Option<Participant>,
    },
}

impl Action {
    /// Corpus-facing kind name, as spelled in the `actionType` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateParticipant { .. } => "create_participant",
            Action::TransferPrepare { .. } => "transfer_prepare",
            Action::TransferFulfil { .. } => "transfer_fulfil",
            Action::TransferReject { .. } => "transfer_reject",
            Action::TransferPrepareFulfil { .. } => "transfer_prepare_fulfil",
            Action::TransferLookup { .. } => "transfer_lookup",
            Action::AccountLookup { .. } => "account_lookup",
        }
    }

    /// The request payload as JSON text, for the bytes-sent diagnostic.
    pub fn request_json(&self) -> Option<String> {
        match self {
            Action::CreateParticipant { request, .. } | Action::AccountLookup { request, .. } => {
                request.as_ref().and_then(|r| serde_json::to_string(r).ok())
            }
            Action::TransferPrepare { request, .. }
            | Action::TransferFulfil { request, .. }
            | Action::TransferReject { request, .. }
            | Action::TransferPrepareFulfil { request, .. }
            | Action::TransferLookup { request, .. } => {
                request.as_ref().and_then(|r| serde_json::to_string(r).ok())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_corpus_array() {
        let corpus = json!([
            {
                "actionType": "create_participant",
                "request": { "name": "fspA", "currency": "USD" }
            },
            {
                "actionType": "transfer_prepare",
                "request": { "payerFsp": "fspA", "payeeFsp": "fspB" }
            },
            { "actionType": "transfer_lookup" }
        ]);

        let actions: Vec<Action> = serde_json::from_value(corpus).unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].kind(), "create_participant");
        assert_eq!(actions[1].kind(), "transfer_prepare");
        assert_eq!(actions[2].kind(), "transfer_lookup");

        match &actions[1] {
            Action::TransferPrepare { request, response } => {
                assert_eq!(request.as_ref().unwrap().payer_fsp.as_deref(), Some("fspA"));
                assert!(response.is_none());
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_type_fails_decode() {
        let raw = json!({ "actionType": "transfer_abort" });
        assert!(serde_json::from_value::<Action>(raw).is_err());
    }

    #[test]
    fn test_request_json_defaults_to_none() {
        let action = Action::TransferLookup {
            request: None,
            response: None,
        };
        assert!(action.request_json().is_none());
    }

    #[test]
    fn test_round_trip_keeps_action_type_tag() {
        let action = Action::TransferPrepareFulfil {
            request: Some(Transfer::default()),
            response: None,
        };
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["actionType"], "transfer_prepare_fulfil");

        let decoded: Action = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.kind(), "transfer_prepare_fulfil");
    }
}
