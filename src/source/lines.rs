//! Text files streamed lazily, one item per line.

use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::engine::ItemStream;
use crate::error::{PagerError, Result};

/// Stream the lines of the file at `path`.
///
/// Lines are read only as the pager asks for them. A read error is yielded
/// once and ends the stream.
pub async fn line_stream(path: &Path) -> Result<ItemStream<String>> {
    let file = File::open(path).await?;
    debug!("Streaming lines from {}", path.display());
    Ok(lines_from_reader(BufReader::new(file)))
}

/// Stream the lines of any buffered reader.
pub fn lines_from_reader<R>(reader: R) -> ItemStream<String>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    futures::stream::unfold(Some(reader.lines()), |lines| async move {
        let mut lines = lines?;
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), Some(lines))),
            Ok(None) => None,
            Err(err) => Some((Err(PagerError::from(err)), None)),
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_lines_from_reader() {
        let lines: Vec<String> = lines_from_reader(&b"alpha\nbeta\r\n\ngamma"[..])
            .try_collect()
            .await
            .unwrap();
        assert_eq!(lines, vec!["alpha", "beta", "", "gamma"]);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = line_stream(Path::new("/nonexistent/rowpager-input.txt")).await;
        assert!(matches!(result, Err(PagerError::Io(_))));
    }

    #[tokio::test]
    async fn test_file_is_read_lazily() {
        let path = std::env::temp_dir().join(format!("rowpager-lines-{}.txt", std::process::id()));
        tokio::fs::write(&path, "one\ntwo\nthree\n").await.unwrap();

        let mut stream = line_stream(&path).await.unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap(), "one");
        assert_eq!(stream.next().await.unwrap().unwrap(), "two");
        assert_eq!(stream.next().await.unwrap().unwrap(), "three");
        assert!(stream.next().await.is_none());

        tokio::fs::remove_file(&path).await.ok();
    }
}
