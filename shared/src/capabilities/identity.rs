use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::UserProfile;
use crate::{AppError, ErrorKind};

/// Requests to the hosted identity service. The shell owns the SDK and the
/// persisted session; the core only sees profiles and error messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdentityOperation {
    CurrentUser,
    SignIn { email: String, password: String },
    CreateAccount { email: String, password: String },
    UpdateDisplayName { name: String },
    SendPasswordReset { email: String },
    SignOut,
    Reauthenticate { password: String },
    DeleteAccount,
}

impl IdentityOperation {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CurrentUser => "current_user",
            Self::SignIn { .. } => "sign_in",
            Self::CreateAccount { .. } => "create_account",
            Self::UpdateDisplayName { .. } => "update_display_name",
            Self::SendPasswordReset { .. } => "send_password_reset",
            Self::SignOut => "sign_out",
            Self::Reauthenticate { .. } => "reauthenticate",
            Self::DeleteAccount => "delete_account",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdentityOutput {
    User(Option<UserProfile>),
    SignedIn(UserProfile),
    Done,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum IdentityError {
    #[error("{message}")]
    Rejected { message: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("no signed-in user")]
    NoCurrentUser,
}

impl IdentityError {
    /// Service-provided message, empty when the service gave none.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message } | Self::Network { message } => message,
            Self::NoCurrentUser => "No signed-in user",
        }
    }
}

impl From<&IdentityError> for AppError {
    fn from(e: &IdentityError) -> Self {
        let kind = match e {
            IdentityError::Rejected { .. } | IdentityError::NoCurrentUser => {
                ErrorKind::Authentication
            }
            IdentityError::Network { .. } => ErrorKind::Network,
        };
        AppError::new(kind, e.message())
    }
}

pub type IdentityResult = Result<IdentityOutput, IdentityError>;

impl Operation for IdentityOperation {
    type Output = IdentityResult;
}

pub struct Identity<Ev> {
    context: CapabilityContext<IdentityOperation, Ev>,
}

impl<Ev> Capability<Ev> for Identity<Ev> {
    type Operation = IdentityOperation;
    type MappedSelf<MappedEv> = Identity<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Identity::new(self.context.map_event(f))
    }
}

impl<Ev> Identity<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<IdentityOperation, Ev>) -> Self {
        Self { context }
    }

    fn request<F>(&self, operation: IdentityOperation, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        tracing::debug!(operation = operation.name(), "identity request");
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(result));
        });
    }

    pub fn current_user<F>(&self, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::CurrentUser, make_event);
    }

    pub fn sign_in<F>(&self, email: String, password: String, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::SignIn { email, password }, make_event);
    }

    pub fn create_account<F>(&self, email: String, password: String, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::CreateAccount { email, password }, make_event);
    }

    pub fn update_display_name<F>(&self, name: String, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::UpdateDisplayName { name }, make_event);
    }

    pub fn send_password_reset<F>(&self, email: String, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::SendPasswordReset { email }, make_event);
    }

    pub fn sign_out<F>(&self, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::SignOut, make_event);
    }

    pub fn reauthenticate<F>(&self, password: String, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::Reauthenticate { password }, make_event);
    }

    pub fn delete_account<F>(&self, make_event: F)
    where
        F: FnOnce(IdentityResult) -> Ev + Send + Sync + 'static,
    {
        self.request(IdentityOperation::DeleteAccount, make_event);
    }
}
