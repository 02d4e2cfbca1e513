//! End-to-end dispatch through the public engine API with mock collaborators.

use std::sync::Arc;

use bindkey_engine::{
    Action, Engine, EngineMsg, EngineNotifier, ScriptKind,
    test_support::{MockAutomation, MockClipboard, MockPoster, MockWorkspace},
};

fn engine_with_mocks() -> (Engine, Arc<MockWorkspace>, Arc<MockClipboard>, Arc<MockPoster>) {
    let workspace = Arc::new(MockWorkspace::default());
    let clipboard = Arc::new(MockClipboard::default());
    let poster = Arc::new(MockPoster::new(clipboard.clone()));
    let engine = Engine::new(
        workspace.clone(),
        Arc::new(MockAutomation::default()),
        clipboard.clone(),
        poster.clone(),
    );
    (engine, workspace, clipboard, poster)
}

#[tokio::test]
async fn chain_of_mixed_actions_runs_every_effect() {
    let (engine, workspace, clipboard, poster) = engine_with_mocks();
    clipboard.seed("before");

    let chain = Action::Chain(vec![
        Action::LaunchApp {
            bundle_id: "com.apple.Safari".into(),
            name: "Safari".into(),
        },
        Action::TypeText {
            text: "hello from a chain".into(),
            label: "greeting".into(),
        },
        Action::RunInlineScript {
            source: "true".into(),
            kind: ScriptKind::Shell,
        },
    ]);
    engine.execute(&chain).await.expect("chain");

    assert_eq!(workspace.launched.lock().as_slice(), ["com.apple.Safari"]);
    assert_eq!(
        poster.pasted.lock().as_slice(),
        [Some("hello from a chain".to_string())]
    );
    assert_eq!(clipboard.current(), Some("before".to_string()));
}

#[tokio::test]
async fn failed_dispatch_reaches_the_host_through_the_notifier() {
    let (engine, workspace, _, _) = engine_with_mocks();
    workspace.mark_missing("com.example.ghost");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let notifier = EngineNotifier::new(tx);

    let action = Action::LaunchApp {
        bundle_id: "com.example.ghost".into(),
        name: "Ghost".into(),
    };
    let err = engine.execute(&action).await.unwrap_err();
    notifier
        .send_action_failed(action.display_name(), &err)
        .expect("notify");

    let msg = rx.recv().await.expect("message");
    match msg {
        EngineMsg::ActionFailed { action, error } => {
            assert_eq!(action, "Open Ghost");
            assert!(error.contains("com.example.ghost"));
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn automation_listing_uses_the_service() {
    let automation = Arc::new(MockAutomation {
        names: vec!["Morning".into(), "Focus".into()],
        ..Default::default()
    });
    let clipboard = Arc::new(MockClipboard::default());
    let poster = Arc::new(MockPoster::new(clipboard.clone()));
    let engine = Engine::new(
        Arc::new(MockWorkspace::default()),
        automation,
        clipboard,
        poster,
    );
    let names = engine.automation_names().await.expect("names");
    assert_eq!(names, ["Morning", "Focus"]);
}
