#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use serde_json::json;
use shared::capabilities::{
    Document, DocumentOperation, DocumentResult, IdentityOperation, IdentityOutput,
    IdentityResult,
};
use shared::{App, Effect, Event, Model, UserId, UserProfile};

pub type Tester = AppTester<App, Effect>;

/// Effects of one update, sorted by capability.
#[derive(Default)]
pub struct Effects {
    pub renders: usize,
    pub identity: Vec<Request<IdentityOperation>>,
    pub documents: Vec<Request<DocumentOperation>>,
    pub key_value: usize,
}

impl Effects {
    pub fn sort(effects: Vec<Effect>) -> Self {
        let mut sorted = Self::default();
        for effect in effects {
            match effect {
                Effect::Render(_) => sorted.renders += 1,
                Effect::Identity(request) => sorted.identity.push(request),
                Effect::Documents(request) => sorted.documents.push(request),
                Effect::KeyValue(_) => sorted.key_value += 1,
            }
        }
        sorted
    }

    pub fn merge(&mut self, other: Self) {
        self.renders += other.renders;
        self.identity.extend(other.identity);
        self.documents.extend(other.documents);
        self.key_value += other.key_value;
    }

    pub fn identity_ops(&self) -> Vec<&IdentityOperation> {
        self.identity.iter().map(|r| &r.operation).collect()
    }

    pub fn document_ops(&self) -> Vec<&DocumentOperation> {
        self.documents.iter().map(|r| &r.operation).collect()
    }

    pub fn take_identity(&mut self) -> Request<IdentityOperation> {
        assert!(!self.identity.is_empty(), "expected an identity request");
        self.identity.remove(0)
    }

    /// Removes the first document request matching `pred`.
    pub fn take_document(
        &mut self,
        pred: impl Fn(&DocumentOperation) -> bool,
    ) -> Request<DocumentOperation> {
        let index = self
            .documents
            .iter()
            .position(|r| pred(&r.operation))
            .expect("no matching document request");
        self.documents.remove(index)
    }
}

pub fn send(app: &Tester, model: &mut Model, event: Event) -> Effects {
    Effects::sort(app.update(event, model).effects)
}

fn feed(app: &Tester, model: &mut Model, events: Vec<Event>, effects: Vec<Effect>) -> Effects {
    let mut collected = Effects::sort(effects);
    for event in events {
        collected.merge(send(app, model, event));
    }
    collected
}

pub fn resolve_identity(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<IdentityOperation>,
    output: IdentityResult,
) -> Effects {
    let update = app.resolve(request, output).expect("identity request resolves");
    feed(app, model, update.events, update.effects)
}

pub fn resolve_documents(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<DocumentOperation>,
    output: DocumentResult,
) -> Effects {
    let update = app.resolve(request, output).expect("document request resolves");
    feed(app, model, update.events, update.effects)
}

pub fn profile(uid: &str, name: Option<&str>) -> UserProfile {
    UserProfile {
        uid: UserId::new(uid),
        email: Some(format!("{uid}@example.com")),
        display_name: name.map(str::to_string),
    }
}

pub fn recipe_doc(id: &str, name: &str) -> Document {
    Document {
        id: id.to_string(),
        data: json!({
            "recipe_name": name,
            "img_src": format!("https://img.example.com/{id}.jpg"),
            "total_time": "30 mins",
            "servings": 2,
            "nutrition": "Total Fat 3g, Calories: 250",
        }),
    }
}

pub fn is_list(op: &DocumentOperation) -> bool {
    matches!(op, DocumentOperation::List { .. })
}

pub fn is_get(op: &DocumentOperation) -> bool {
    matches!(op, DocumentOperation::Get { .. })
}

pub fn is_watch(op: &DocumentOperation) -> bool {
    matches!(op, DocumentOperation::Watch { .. })
}

/// Starts the app with `user` already signed in. Returns the still pending
/// effects (catalog list and favorites watch among them).
pub fn start_signed_in(app: &Tester, model: &mut Model, user: UserProfile) -> Effects {
    let mut started = send(app, model, Event::AppStarted);
    let mut check = started.take_identity();
    let after = resolve_identity(
        app,
        model,
        &mut check,
        Ok(IdentityOutput::User(Some(user))),
    );
    started.merge(after);
    started
}

pub fn start_signed_out(app: &Tester, model: &mut Model) -> Effects {
    let mut started = send(app, model, Event::AppStarted);
    let mut check = started.take_identity();
    let after = resolve_identity(app, model, &mut check, Ok(IdentityOutput::User(None)));
    started.merge(after);
    started
}
