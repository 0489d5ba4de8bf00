//! CLI input: multi-line email read from stdin.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Read lines until the first empty line or EOF, joined with `\n`.
///
/// A line holding only whitespace is not a terminator; only a truly empty
/// line ends the email.
pub async fn read_email<R>(reader: R) -> std::io::Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut collected = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
        if line.is_empty() {
            break;
        }
        collected.push(line);
    }

    Ok(collected.join("\n"))
}

#[cfg(test)]
mod tests {
    use tokio::io::BufReader;

    use super::*;

    async fn read(input: &str) -> String {
        read_email(BufReader::new(input.as_bytes())).await.unwrap()
    }

    #[tokio::test]
    async fn stops_at_first_blank_line() {
        assert_eq!(read("Hi team\nPls review\n\nignored\n").await, "Hi team\nPls review");
    }

    #[tokio::test]
    async fn eof_without_blank_line() {
        assert_eq!(read("one\ntwo").await, "one\ntwo");
    }

    #[tokio::test]
    async fn immediate_blank_line_is_empty() {
        assert_eq!(read("\nlater").await, "");
    }

    #[tokio::test]
    async fn crlf_line_endings() {
        assert_eq!(read("a\r\nb\r\n\r\nc").await, "a\nb");
    }

    #[tokio::test]
    async fn whitespace_line_is_kept() {
        assert_eq!(read("a\n  \nb\n\n").await, "a\n  \nb");
    }
}
