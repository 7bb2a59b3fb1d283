mod common;

use shared::capabilities::{encode_bool, PreferenceKey};
use shared::{Event, Model};

use common::*;

fn loaded(key: PreferenceKey, generation: u64, value: bool) -> Event {
    Event::PreferenceLoaded {
        key,
        generation,
        value: Box::new(Ok(Some(encode_bool(value)))),
    }
}

#[test]
fn test_defaults_before_open() {
    let app = Tester::default();
    let mut model = Model::default();

    let effects = send(&app, &mut model, Event::SetDarkThemeEnabled(true));
    assert_eq!(effects.key_value, 0);

    let view = app.view(&model);
    assert!(view.preferences.favorites_enabled);
    assert!(!view.preferences.dark_theme_enabled);
}

#[test]
fn test_open_reads_both_keys_once() {
    let app = Tester::default();
    let mut model = Model::default();

    let effects = send(&app, &mut model, Event::OpenPreferences { handle: None });
    assert_eq!(effects.key_value, 2);

    let effects = send(
        &app,
        &mut model,
        Event::OpenPreferences {
            handle: Some("elsewhere".into()),
        },
    );
    assert_eq!(effects.key_value, 0);
}

#[test]
fn test_invalid_handle_stays_closed() {
    let app = Tester::default();
    let mut model = Model::default();

    let effects = send(
        &app,
        &mut model,
        Event::OpenPreferences {
            handle: Some("not a handle".into()),
        },
    );
    assert_eq!(effects.key_value, 0);
    assert!(!model.preferences.is_open());
}

#[test]
fn test_loaded_values_reach_view() {
    let app = Tester::default();
    let mut model = Model::default();
    send(&app, &mut model, Event::OpenPreferences { handle: None });
    let generation = model.preferences.generation();

    send(&app, &mut model, loaded(PreferenceKey::DarkTheme, generation, true));
    send(
        &app,
        &mut model,
        loaded(PreferenceKey::FavoritesEnabled, generation, false),
    );

    let view = app.view(&model);
    assert!(view.preferences.dark_theme_enabled);
    assert!(!view.preferences.favorites_enabled);
}

#[test]
fn test_set_after_open_beats_late_load() {
    let app = Tester::default();
    let mut model = Model::default();
    send(&app, &mut model, Event::OpenPreferences { handle: None });

    let effects = send(&app, &mut model, Event::SetDarkThemeEnabled(true));
    assert_eq!(effects.key_value, 1);

    let generation = model.preferences.generation();
    send(&app, &mut model, loaded(PreferenceKey::DarkTheme, generation, false));
    assert!(app.view(&model).preferences.dark_theme_enabled);
}

#[test]
fn test_close_reverts_to_defaults() {
    let app = Tester::default();
    let mut model = Model::default();
    send(&app, &mut model, Event::OpenPreferences { handle: None });
    send(&app, &mut model, Event::SetFavoritesEnabled(false));
    assert!(!app.view(&model).preferences.favorites_enabled);

    send(&app, &mut model, Event::ClosePreferences);
    assert!(app.view(&model).preferences.favorites_enabled);

    let effects = send(&app, &mut model, Event::SetFavoritesEnabled(false));
    assert_eq!(effects.key_value, 0);
    assert!(app.view(&model).preferences.favorites_enabled);
}

#[test]
fn test_reopen_drops_loads_from_earlier_open() {
    let app = Tester::default();
    let mut model = Model::default();
    send(&app, &mut model, Event::OpenPreferences { handle: None });
    let first = model.preferences.generation();

    send(&app, &mut model, Event::ClosePreferences);
    let effects = send(&app, &mut model, Event::OpenPreferences { handle: None });
    assert_eq!(effects.key_value, 2);
    let second = model.preferences.generation();
    assert_ne!(first, second);

    let late = send(&app, &mut model, loaded(PreferenceKey::DarkTheme, first, true));
    assert_eq!(late.renders, 0);
    assert!(!app.view(&model).preferences.dark_theme_enabled);

    send(&app, &mut model, loaded(PreferenceKey::DarkTheme, second, true));
    assert!(app.view(&model).preferences.dark_theme_enabled);
}
