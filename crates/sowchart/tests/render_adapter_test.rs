mod common;

use std::{collections::HashSet, time::Duration};

use sowchart::{
    render::{AdapterState, RenderAdapter, RenderOutcome},
    theme::Theme,
    view::{
        DisplayRegion, ENGINE_UNAVAILABLE_MESSAGE, Occupant, PLACEHOLDER_MESSAGE,
        RENDER_FAILED_MESSAGE,
    },
};

use common::{INVALID_MARKER, ScriptedEngine};

const FLOW: &str = "flowchart LR\n    A[Start] --> B[End]";
const SLOW_FLOW: &str = "flowchart TD\n    %% slow\n    A --> B";

fn adapter(engine: Option<ScriptedEngine>) -> RenderAdapter<ScriptedEngine> {
    RenderAdapter::initialize(DisplayRegion::shared(), engine, &Theme::default())
}

#[test]
fn test_initialize_configures_engine_with_theme() {
    let engine = ScriptedEngine::new();
    let configured = engine.configured_with.clone();
    let adapter = adapter(Some(engine));

    assert_eq!(adapter.state(), AdapterState::Ready);
    assert_eq!(*configured.lock(), Some(Theme::default()));
}

#[test]
fn test_engine_rejecting_theme_leaves_adapter_uninitialized() {
    let engine = ScriptedEngine {
        reject_theme: true,
        ..ScriptedEngine::new()
    };
    assert_eq!(adapter(Some(engine)).state(), AdapterState::Uninitialized);
}

#[test]
fn test_placeholder_markup() {
    let region = DisplayRegion::shared();
    let adapter = RenderAdapter::initialize(region.clone(), Some(ScriptedEngine::new()), &Theme::default());

    adapter.show_placeholder();

    let region = region.lock();
    assert_eq!(region.occupant(), &Occupant::Placeholder);
    assert!(region.markup().contains(PLACEHOLDER_MESSAGE));
    assert!(region.markup().contains("empty-state"));
}

#[tokio::test]
async fn test_successful_render_wraps_svg_in_marker() {
    let region = DisplayRegion::shared();
    let adapter = RenderAdapter::initialize(region.clone(), Some(ScriptedEngine::new()), &Theme::default());

    let outcome = adapter.render(FLOW).await;

    let RenderOutcome::Rendered { diagram_id } = outcome else {
        panic!("expected a rendered diagram, got {outcome:?}");
    };
    let region = region.lock();
    let diagram = region.diagram_element().expect("diagram in region");
    assert_eq!(diagram.diagram_id(), diagram_id);
    assert!(region.markup().starts_with(r#"<div class="mermaid-diagram"><svg"#));
    assert_eq!(region.vector_element(), Some(diagram.svg()));
    assert_eq!(adapter.state(), AdapterState::Ready);
}

#[tokio::test]
async fn test_failed_render_shows_error_and_adapter_recovers() {
    let region = DisplayRegion::shared();
    let adapter = RenderAdapter::initialize(region.clone(), Some(ScriptedEngine::new()), &Theme::default());

    assert_eq!(adapter.render(INVALID_MARKER).await, RenderOutcome::Failed);
    {
        let region = region.lock();
        assert_eq!(
            region.occupant(),
            &Occupant::Error(RENDER_FAILED_MESSAGE.to_string())
        );
        assert!(region.markup().contains(RENDER_FAILED_MESSAGE));
        assert!(region.vector_element().is_none());
    }
    assert_eq!(adapter.state(), AdapterState::Ready);

    assert!(adapter.render(FLOW).await.is_rendered());
    assert!(region.lock().vector_element().is_some());
}

#[tokio::test]
async fn test_render_without_engine_reports_unavailable() {
    let region = DisplayRegion::shared();
    let adapter: RenderAdapter<ScriptedEngine> =
        RenderAdapter::initialize(region.clone(), None, &Theme::default());

    assert_eq!(adapter.state(), AdapterState::Uninitialized);
    assert_eq!(adapter.render(FLOW).await, RenderOutcome::Unavailable);
    assert_eq!(
        region.lock().occupant(),
        &Occupant::Error(ENGINE_UNAVAILABLE_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn test_every_render_uses_a_fresh_diagram_id() {
    let engine = ScriptedEngine::new();
    let ids = engine.diagram_ids.clone();
    let adapter = adapter(Some(engine));

    for _ in 0..5 {
        adapter.render(FLOW).await;
    }
    adapter.render(INVALID_MARKER).await;

    let ids = ids.lock();
    assert_eq!(ids.len(), 6);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), 6);
    assert!(ids.iter().all(|id| id.starts_with("sowchart-diagram-")));
}

#[tokio::test]
async fn test_overlapping_renders_keep_the_latest_request() {
    let region = DisplayRegion::shared();
    let engine = ScriptedEngine {
        slow_delay: Duration::from_millis(30),
        ..ScriptedEngine::new()
    };
    let adapter = RenderAdapter::initialize(region.clone(), Some(engine), &Theme::default());

    // The slow render starts first and finishes last.
    let (slow, fast) = tokio::join!(adapter.render(SLOW_FLOW), adapter.render(FLOW));

    assert_eq!(slow, RenderOutcome::Superseded);
    let RenderOutcome::Rendered { diagram_id } = fast else {
        panic!("expected the later render to win, got {fast:?}");
    };
    let region = region.lock();
    assert_eq!(region.diagram_element().unwrap().diagram_id(), diagram_id);
    assert!(region.vector_element().unwrap().contains("flowchart LR"));
}

#[tokio::test]
async fn test_clear_discards_pending_render() {
    let region = DisplayRegion::shared();
    let adapter = RenderAdapter::initialize(region.clone(), Some(ScriptedEngine::new()), &Theme::default());

    let (outcome, ()) = tokio::join!(adapter.render(SLOW_FLOW), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        adapter.clear();
    });

    assert_eq!(outcome, RenderOutcome::Superseded);
    assert_eq!(region.lock().occupant(), &Occupant::Empty);
}
