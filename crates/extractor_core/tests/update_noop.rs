use extractor_core::{update, AppState, Msg};

#[test]
fn tick_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (mut next, _) = update(next, Msg::UrlsSubmitted("a.com".into()));
    assert!(next.consume_dirty());
    let (mut next, effects) = update(next, Msg::Tick);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}
