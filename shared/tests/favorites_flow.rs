mod common;

use assert_matches::assert_matches;
use crux_core::Request;
use shared::capabilities::{DocumentError, DocumentOperation, DocumentOutput};
use shared::{Event, Model, RecipeId, ToastKind};

use common::*;

fn is_set(op: &DocumentOperation) -> bool {
    matches!(op, DocumentOperation::Set { .. })
}

fn is_delete(op: &DocumentOperation) -> bool {
    matches!(op, DocumentOperation::Delete { .. })
}

/// Signed in, catalog loaded with r1 and r2, favorites watch open.
fn setup(app: &Tester, model: &mut Model) -> Request<DocumentOperation> {
    let mut started = start_signed_in(app, model, profile("u1", None));
    let mut list = started.take_document(is_list);
    resolve_documents(
        app,
        model,
        &mut list,
        Ok(DocumentOutput::Documents(vec![
            recipe_doc("r1", "Soup"),
            recipe_doc("r2", "Salad"),
        ])),
    );
    started.take_document(is_watch)
}

#[test]
fn test_snapshots_drive_favorites() {
    let app = Tester::default();
    let mut model = Model::default();
    let mut watch = setup(&app, &mut model);

    resolve_documents(
        &app,
        &mut model,
        &mut watch,
        Ok(DocumentOutput::Snapshot(vec![recipe_doc("r1", "Soup")])),
    );
    let view = app.view(&model);
    assert_eq!(view.favorites.len(), 1);
    assert!(model.favorites.favorites.is_favorite(&RecipeId::new("r1")));

    resolve_documents(
        &app,
        &mut model,
        &mut watch,
        Ok(DocumentOutput::Snapshot(vec![
            recipe_doc("r1", "Soup"),
            recipe_doc("r2", "Salad"),
        ])),
    );
    assert_eq!(app.view(&model).favorites.len(), 2);

    resolve_documents(
        &app,
        &mut model,
        &mut watch,
        Err(DocumentError::PermissionDenied {
            message: "rules".into(),
        }),
    );
    assert!(app.view(&model).favorites.is_empty());
}

#[test]
fn test_add_favorite_writes_record_and_resubscribes() {
    let app = Tester::default();
    let mut model = Model::default();
    let mut old_watch = setup(&app, &mut model);

    let mut effects = send(
        &app,
        &mut model,
        Event::AddFavorite {
            id: RecipeId::new("r2"),
        },
    );
    let mut set = effects.take_document(is_set);
    assert_matches!(
        &set.operation,
        DocumentOperation::Set { collection, id, fields }
            if collection.as_str() == "users/u1/favorites"
                && id == "r2"
                && fields["recipe_name"] == "Salad"
    );

    let mut after = resolve_documents(&app, &mut model, &mut set, Ok(DocumentOutput::Written));
    let ops = after.document_ops();
    assert!(ops.iter().any(|op| matches!(op, DocumentOperation::Unwatch { .. })));
    assert!(ops.iter().any(|op| is_watch(op)));

    let mut new_watch = after.take_document(is_watch);
    resolve_documents(
        &app,
        &mut model,
        &mut new_watch,
        Ok(DocumentOutput::Snapshot(vec![recipe_doc("r2", "Salad")])),
    );
    assert!(model.favorites.favorites.is_favorite(&RecipeId::new("r2")));

    // Deliveries on the released watch no longer land.
    resolve_documents(
        &app,
        &mut model,
        &mut old_watch,
        Ok(DocumentOutput::Snapshot(vec![])),
    );
    assert!(model.favorites.favorites.is_favorite(&RecipeId::new("r2")));
}

#[test]
fn test_released_watches_end_on_unwatched() {
    let app = Tester::default();
    let mut model = Model::default();
    let mut released = vec![setup(&app, &mut model)];

    // Every successful write re-subscribes and releases the previous watch.
    for id in ["r1", "r2", "r1"] {
        let mut effects = send(
            &app,
            &mut model,
            Event::AddFavorite {
                id: RecipeId::new(id),
            },
        );
        let mut set = effects.take_document(is_set);
        let mut after = resolve_documents(&app, &mut model, &mut set, Ok(DocumentOutput::Written));
        assert!(after
            .document_ops()
            .iter()
            .any(|op| matches!(op, DocumentOperation::Unwatch { .. })));
        released.push(after.take_document(is_watch));
    }
    let mut current = released.pop().expect("current watch");

    for watch in &mut released {
        let update = app
            .resolve(watch, Ok(DocumentOutput::Unwatched))
            .expect("released watch accepts its final message");
        assert!(update.events.is_empty());
        assert!(update.effects.is_empty());
    }

    resolve_documents(
        &app,
        &mut model,
        &mut current,
        Ok(DocumentOutput::Snapshot(vec![recipe_doc("r1", "Soup")])),
    );
    assert!(model.favorites.favorites.is_favorite(&RecipeId::new("r1")));
}

#[test]
fn test_sign_out_ends_watch() {
    let app = Tester::default();
    let mut model = Model::default();
    let mut watch = setup(&app, &mut model);

    let effects = send(&app, &mut model, Event::SignOut);
    assert!(effects
        .document_ops()
        .iter()
        .any(|op| matches!(op, DocumentOperation::Unwatch { .. })));

    let update = app
        .resolve(&mut watch, Ok(DocumentOutput::Unwatched))
        .expect("watch accepts its final message");
    assert!(update.events.is_empty());
}

#[test]
fn test_toggle_removes_existing_favorite() {
    let app = Tester::default();
    let mut model = Model::default();
    let mut watch = setup(&app, &mut model);
    resolve_documents(
        &app,
        &mut model,
        &mut watch,
        Ok(DocumentOutput::Snapshot(vec![recipe_doc("r1", "Soup")])),
    );

    let mut effects = send(
        &app,
        &mut model,
        Event::ToggleFavorite {
            id: RecipeId::new("r1"),
        },
    );
    let delete = effects.take_document(is_delete);
    assert_matches!(
        &delete.operation,
        DocumentOperation::Delete { collection, id }
            if collection.as_str() == "users/u1/favorites" && id == "r1"
    );
}

#[test]
fn test_toggle_adds_missing_favorite() {
    let app = Tester::default();
    let mut model = Model::default();
    setup(&app, &mut model);

    let effects = send(
        &app,
        &mut model,
        Event::ToggleFavorite {
            id: RecipeId::new("r1"),
        },
    );
    assert!(effects.document_ops().iter().any(|op| is_set(op)));
}

#[test]
fn test_toggle_respects_disabled_preference() {
    let app = Tester::default();
    let mut model = Model::default();
    setup(&app, &mut model);

    send(&app, &mut model, Event::OpenPreferences { handle: None });
    send(&app, &mut model, Event::SetFavoritesEnabled(false));

    let effects = send(
        &app,
        &mut model,
        Event::ToggleFavorite {
            id: RecipeId::new("r1"),
        },
    );
    assert!(effects.documents.is_empty());
    assert_eq!(
        model.toast.as_ref().map(|t| t.message.as_str()),
        Some("Favorites are disabled in Settings")
    );
}

#[test]
fn test_write_failure_toasts() {
    let app = Tester::default();
    let mut model = Model::default();
    setup(&app, &mut model);

    let mut effects = send(
        &app,
        &mut model,
        Event::RemoveFavorite {
            id: RecipeId::new("r1"),
        },
    );
    let mut delete = effects.take_document(is_delete);
    let after = resolve_documents(
        &app,
        &mut model,
        &mut delete,
        Err(DocumentError::Other {
            message: "quota exceeded".into(),
        }),
    );
    assert!(!after.document_ops().iter().any(|op| is_watch(op)));

    let toast = model.toast.clone().expect("toast");
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Couldn't update favorites: quota exceeded");
}

#[test]
fn test_signed_out_favorites_are_noops() {
    let app = Tester::default();
    let mut model = Model::default();
    start_signed_out(&app, &mut model);

    for event in [
        Event::AddFavorite {
            id: RecipeId::new("r1"),
        },
        Event::RemoveFavorite {
            id: RecipeId::new("r1"),
        },
    ] {
        let effects = send(&app, &mut model, event);
        assert!(effects.documents.is_empty());
    }
    assert!(!model.favorites.favorites.is_favorite(&RecipeId::new("r1")));
}

#[test]
fn test_blank_id_is_noop() {
    let app = Tester::default();
    let mut model = Model::default();
    setup(&app, &mut model);

    let effects = send(
        &app,
        &mut model,
        Event::AddFavorite {
            id: RecipeId::new("  "),
        },
    );
    assert!(effects.documents.is_empty());
}
