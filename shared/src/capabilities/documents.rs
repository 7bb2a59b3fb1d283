use std::pin::pin;

use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::session::UserId;
use crate::{AppError, ErrorKind, FAVORITES_SUBCOLLECTION, RECIPES_COLLECTION, USERS_COLLECTION};

/// Slash-separated path of a collection in the hosted document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionPath(String);

impl CollectionPath {
    #[must_use]
    pub fn recipes() -> Self {
        Self(RECIPES_COLLECTION.to_string())
    }

    #[must_use]
    pub fn favorites(user: &UserId) -> Self {
        Self(format!(
            "{USERS_COLLECTION}/{}/{FAVORITES_SUBCOLLECTION}",
            user.as_str()
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one live watch so the shell can tear it down and the core can
/// drop snapshots that arrive after it moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DocumentOperation {
    List {
        collection: CollectionPath,
    },
    Get {
        collection: CollectionPath,
        id: String,
    },
    Set {
        collection: CollectionPath,
        id: String,
        fields: Value,
    },
    Delete {
        collection: CollectionPath,
        id: String,
    },
    /// Streaming: the shell answers with a `Snapshot` on the initial load and
    /// after every change. Once the matching `Unwatch` lands it sends a final
    /// `Unwatched` on this stream, which ends it.
    Watch {
        subscription: SubscriptionId,
        collection: CollectionPath,
    },
    Unwatch {
        subscription: SubscriptionId,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DocumentOutput {
    Documents(Vec<Document>),
    Document(Option<Document>),
    Written,
    Deleted,
    Snapshot(Vec<Document>),
    Unwatched,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentError {
    #[error("service unavailable: {message}")]
    Unavailable { message: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl DocumentError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unavailable { message }
            | Self::PermissionDenied { message }
            | Self::Other { message } => message,
        }
    }
}

impl From<&DocumentError> for AppError {
    fn from(e: &DocumentError) -> Self {
        let kind = match e {
            DocumentError::Unavailable { .. } => ErrorKind::Network,
            DocumentError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            DocumentError::Other { .. } => ErrorKind::Unknown,
        };
        AppError::new(kind, e.message())
    }
}

pub type DocumentResult = Result<DocumentOutput, DocumentError>;

impl Operation for DocumentOperation {
    type Output = DocumentResult;
}

pub struct Documents<Ev> {
    context: CapabilityContext<DocumentOperation, Ev>,
}

impl<Ev> Capability<Ev> for Documents<Ev> {
    type Operation = DocumentOperation;
    type MappedSelf<MappedEv> = Documents<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Documents::new(self.context.map_event(f))
    }
}

impl<Ev> Documents<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<DocumentOperation, Ev>) -> Self {
        Self { context }
    }

    fn request<F>(&self, operation: DocumentOperation, make_event: F)
    where
        F: FnOnce(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(result));
        });
    }

    pub fn list<F>(&self, collection: CollectionPath, make_event: F)
    where
        F: FnOnce(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        self.request(DocumentOperation::List { collection }, make_event);
    }

    pub fn get<F>(&self, collection: CollectionPath, id: String, make_event: F)
    where
        F: FnOnce(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        self.request(DocumentOperation::Get { collection, id }, make_event);
    }

    pub fn set<F>(&self, collection: CollectionPath, id: String, fields: Value, make_event: F)
    where
        F: FnOnce(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        self.request(
            DocumentOperation::Set {
                collection,
                id,
                fields,
            },
            make_event,
        );
    }

    pub fn delete<F>(&self, collection: CollectionPath, id: String, make_event: F)
    where
        F: FnOnce(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        self.request(DocumentOperation::Delete { collection, id }, make_event);
    }

    /// Opens a live watch. `make_event` runs once per delivered snapshot or
    /// error. The task ends, dropping the stream, when the shell delivers
    /// `Unwatched`.
    pub fn watch<F>(&self, subscription: SubscriptionId, collection: CollectionPath, make_event: F)
    where
        F: Fn(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        tracing::debug!(%subscription, %collection, "opening watch");
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let mut updates = pin!(ctx.stream_from_shell(DocumentOperation::Watch {
                subscription,
                collection,
            }));
            while let Some(result) = updates.next().await {
                if matches!(result, Ok(DocumentOutput::Unwatched)) {
                    tracing::debug!(%subscription, "watch closed by shell");
                    break;
                }
                ctx.update_app(make_event(result));
            }
        });
    }

    pub fn unwatch<F>(&self, subscription: SubscriptionId, make_event: F)
    where
        F: FnOnce(DocumentResult) -> Ev + Send + Sync + 'static,
    {
        tracing::debug!(%subscription, "releasing watch");
        self.request(DocumentOperation::Unwatch { subscription }, make_event);
    }
}
