use super::*;
use crate::config::{DisplayConfig, SourceFormat};
use crate::engine::{PagerHandle, PaginationNode, Paginator};
use crate::error::{PagerError, PaginationError};
use crate::formatter::Formatter;
use crate::source::JsonTemplate;

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

fn numbers(n: usize) -> Vec<Value> {
    (1..=n).map(|i| json!(i)).collect()
}

fn session(items: Vec<Value>, rows: usize, source: Option<SourceSpec>) -> PagerSession {
    let root = PaginationNode::from_items(items).with_template(Arc::new(JsonTemplate));
    let handle = PagerHandle::new(Paginator::new(root, rows));
    let formatter = Formatter::new(&DisplayConfig {
        color_output: false,
        show_page_header: true,
        indent: 2,
    });
    PagerSession::new(handle, formatter, source)
}

async fn run(session: &PagerSession, line: &str) -> crate::error::Result<CommandOutcome> {
    let command = parse_command(line)?.expect("non-blank command");
    session.execute(command).await
}

#[tokio::test]
async fn test_session_navigation() {
    let session = session(numbers(7), 3, None);
    session.start().await.unwrap();
    assert_eq!(
        session.status().await,
        PageStatus {
            page: Some(1),
            more: true
        }
    );

    assert_eq!(run(&session, "n").await.unwrap(), CommandOutcome::Render);
    assert_eq!(run(&session, "next").await.unwrap(), CommandOutcome::Render);
    assert_eq!(
        session.status().await,
        PageStatus {
            page: Some(3),
            more: false
        }
    );
    assert_eq!(
        run(&session, "next").await.unwrap(),
        CommandOutcome::Message("Already on the last page".to_string())
    );

    assert_eq!(run(&session, "p").await.unwrap(), CommandOutcome::Render);
    assert_eq!(run(&session, "first").await.unwrap(), CommandOutcome::Render);
    assert_eq!(
        run(&session, "prev").await.unwrap(),
        CommandOutcome::Message("Already on the first page".to_string())
    );
}

#[tokio::test]
async fn test_session_goes_to_page_by_number() {
    let session = session(numbers(10), 3, None);
    session.start().await.unwrap();

    assert_eq!(run(&session, "page 3").await.unwrap(), CommandOutcome::Render);
    assert_eq!(session.render().await, "Page 3 (rows 7-9)\n7\n8\n9\n-- more --");

    assert_eq!(run(&session, "g 1").await.unwrap(), CommandOutcome::Render);
    assert_eq!(session.status().await.page, Some(1));
}

#[tokio::test]
async fn test_session_rejects_page_zero() {
    let session = session(numbers(4), 2, None);
    session.start().await.unwrap();

    let err = run(&session, "page 0").await.unwrap_err();
    assert!(matches!(
        err,
        PagerError::Pagination(PaginationError::NegativePageIndex(-1))
    ));
    assert_eq!(session.status().await.page, Some(1));
}

#[tokio::test]
async fn test_session_last_and_rows() {
    let session = session(numbers(10), 4, None);
    session.start().await.unwrap();

    assert_eq!(run(&session, "last").await.unwrap(), CommandOutcome::Render);
    assert_eq!(session.status().await.page, Some(3));
    assert_eq!(
        run(&session, "l").await.unwrap(),
        CommandOutcome::Message("Already on the last page".to_string())
    );

    assert_eq!(run(&session, "rows 0").await.unwrap(), CommandOutcome::Render);
    assert_eq!(
        session.status().await,
        PageStatus {
            page: Some(1),
            more: false
        }
    );
    assert!(session.render().await.starts_with("Page 1 (rows 1-10)"));
}

#[tokio::test]
async fn test_session_refresh_keeps_page() {
    let session = session(numbers(9), 3, None);
    session.start().await.unwrap();
    run(&session, "next").await.unwrap();
    let before = session.render().await;

    assert_eq!(run(&session, "refresh").await.unwrap(), CommandOutcome::Render);
    assert_eq!(session.render().await, before);
}

#[tokio::test]
async fn test_session_help_and_quit() {
    let session = session(numbers(1), 3, None);
    match run(&session, "help").await.unwrap() {
        CommandOutcome::Message(text) => assert!(text.contains("next (n)")),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(run(&session, "q").await.unwrap(), CommandOutcome::Quit);
}

#[tokio::test]
async fn test_reload_without_file() {
    let session = session(numbers(3), 3, None);
    session.start().await.unwrap();
    assert!(matches!(
        run(&session, "reload").await.unwrap(),
        CommandOutcome::Message(_)
    ));
}

#[tokio::test]
async fn test_reload_reads_file_again() {
    let path = std::env::temp_dir().join(format!("rowpager-reload-{}.json", std::process::id()));
    tokio::fs::write(&path, "[1, 2, 3, 4, 5]").await.unwrap();

    let spec = SourceSpec::new(&path, SourceFormat::Auto, Duration::ZERO);
    let root = PaginationNode::new(spec.open().await.unwrap())
        .with_template(Arc::new(JsonTemplate));
    let session = PagerSession::new(
        PagerHandle::new(Paginator::new(root, 2)),
        Formatter::new(&DisplayConfig {
            color_output: false,
            show_page_header: false,
            indent: 2,
        }),
        Some(spec),
    );
    session.start().await.unwrap();
    run(&session, "next").await.unwrap();
    assert_eq!(session.render().await, "3\n4\n-- more --");

    tokio::fs::write(&path, r#"["fresh", "data"]"#).await.unwrap();
    assert_eq!(run(&session, "reload").await.unwrap(), CommandOutcome::Render);
    assert_eq!(session.render().await, "fresh\ndata\n(end)");
    assert_eq!(session.status().await.page, Some(1));
    assert_eq!(
        session.handle().inspect(|p| p.root().source_epoch()).await,
        1
    );

    tokio::fs::remove_file(&path).await.ok();
}

#[tokio::test]
async fn test_dump_pages() {
    let session = session(
        vec![json!("a"), json!({"title": "B", "items": ["b1", "b2"]}), json!("c")],
        2,
        None,
    );
    let pages = session.dump_pages().await.unwrap();

    assert_eq!(
        pages,
        vec![
            "Page 1 (rows 1-2)\na\nB\n-- more --",
            "Page 2 (rows 3-4)\n  b1\n  b2\n-- more --",
            "Page 3 (rows 5-5)\nc\n(end)",
        ]
    );
}

#[test]
fn test_blank_line_is_not_a_command() {
    assert_eq!(parse_command("  ").unwrap(), None);
}
