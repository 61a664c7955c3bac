use sqlx::{Any, AnyConnection, Connection};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Path of the compiled vote-ingest binary
pub fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_vote-ingest")
}

/// SQLite URL for a database file inside `dir`, created on first connect
pub fn sqlite_url(dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", dir.join("ingest.db").display())
}

/// Start the binary against `database_url` with all stdio piped
pub fn spawn_ingest(database_url: &str) -> anyhow::Result<Child> {
    let child = Command::new(binary_path())
        .env("DATABASE_URL", database_url)
        .env("VOTE_INGEST_BOOTSTRAP_SCHEMA", "true")
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    Ok(child)
}

/// Run the binary to completion with `input` on stdin
pub fn run_ingest(database_url: &str, input: &str) -> anyhow::Result<Output> {
    let mut child = spawn_ingest(database_url)?;

    // Dropping stdin closes the stream. The child may exit before reading
    // (e.g. on a connection failure), so a broken pipe is not an error here.
    {
        let mut stdin = child.stdin.take().expect("stdin piped");
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
    }

    Ok(child.wait_with_output()?)
}

pub async fn connect(database_url: &str) -> anyhow::Result<AnyConnection> {
    sqlx::any::install_default_drivers();
    Ok(AnyConnection::connect(database_url).await?)
}

pub async fn count_rows(conn: &mut AnyConnection, table: &str) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<Any, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Poll `table` until it holds `expected` rows or `timeout` passes.
/// Connection and query errors count as "not yet", since the table may not exist.
pub async fn wait_for_rows(
    database_url: &str,
    table: &str,
    expected: i64,
    timeout: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Ok(mut conn) = connect(database_url).await {
            let count = count_rows(&mut conn, table).await;
            let _ = conn.close().await;
            if matches!(count, Ok(n) if n >= expected) {
                return true;
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

/// Wait for `child` to exit, killing it after `timeout`
pub async fn wait_with_timeout(mut child: Child, timeout: Duration) -> anyhow::Result<Output> {
    let deadline = Instant::now() + timeout;
    while child.try_wait()?.is_none() {
        if Instant::now() >= deadline {
            child.kill()?;
            anyhow::bail!("vote-ingest did not exit within {:?}", timeout);
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    Ok(child.wait_with_output()?)
}
