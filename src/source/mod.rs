//! Data sources feeding the pager.
//!
//! Every source is turned into an [`ItemStream`] of JSON values, so one
//! [`JsonTemplate`] can build components for either input format:
//! - `json`: a JSON array file, with nested panels for objects carrying `items`
//! - `lines`: a text file read lazily, one string item per line

pub mod json;
pub mod lines;

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tracing::info;

use crate::config::SourceFormat;
use crate::engine::ItemStream;
use crate::error::Result;

pub use json::{JsonTemplate, parse_items, render_value};
pub use lines::{line_stream, lines_from_reader};

/// Open `path` as an item stream.
///
/// # Arguments
/// * `path` - Input file
/// * `format` - How to decode it; `Auto` picks by extension
/// * `latency` - Delay before each item is produced
///
/// # Returns
/// * `Result<ItemStream<Value>>` - Lazily pulled items
pub async fn open(path: &Path, format: SourceFormat, latency: Duration) -> Result<ItemStream<Value>> {
    let format = format.resolve(path);
    info!("Opening {} as {:?}", path.display(), format);

    let stream = match format {
        SourceFormat::Json => {
            let content = tokio::fs::read_to_string(path).await?;
            let items = parse_items(&content)?;
            futures::stream::iter(items.into_iter().map(Ok)).boxed()
        }
        SourceFormat::Lines | SourceFormat::Auto => line_stream(path)
            .await?
            .map(|line| line.map(Value::String))
            .boxed(),
    };

    Ok(with_latency(stream, latency))
}

/// Delay every item of `stream` by `latency`.
pub fn with_latency<T>(stream: ItemStream<T>, latency: Duration) -> ItemStream<T>
where
    T: Send + 'static,
{
    if latency.is_zero() {
        return stream;
    }
    stream
        .then(move |item| async move {
            tokio::time::sleep(latency).await;
            item
        })
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rowpager-{}-{name}", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_open_json_file() {
        let path = temp_file("items.json", r#"["a", {"title": "B", "items": [1]}]"#);
        let items: Vec<Value> = open(&path, SourceFormat::Auto, Duration::ZERO)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items, vec![json!("a"), json!({"title": "B", "items": [1]})]);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_open_text_file_as_strings() {
        let path = temp_file("items.txt", "x\ny\n");
        let items: Vec<Value> = open(&path, SourceFormat::Auto, Duration::ZERO)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items, vec![json!("x"), json!("y")]);
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_latency_delays_each_item() {
        let stream = futures::stream::iter(vec![Ok(1), Ok(2)]).boxed();
        let started = tokio::time::Instant::now();
        let items: Vec<i32> = with_latency(stream, Duration::from_millis(5))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2]);
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
