//! Line-oriented front end: every line read is submitted as a query.

use std::io::{self, Write};
use std::sync::Arc;

use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::covers::Covers;
use crate::openlibrary::{SearchError, SearchResponse, Searcher};
use crate::render::render_results;
use crate::session::{Applied, QuerySession, QueryState, Ticket};

pub const QUIT: &str = ":q";

/// Reads queries from `input` until EOF or `:q`, rendering only the result
/// of the most recently submitted query.
///
/// At EOF the latest pending query is still awaited before returning.
pub async fn run<S, R, W>(
    searcher: Arc<S>,
    input: R,
    out: &mut W,
    covers: &Covers,
) -> io::Result<()>
where
    S: Searcher + Send + Sync + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ticket, Result<SearchResponse, SearchError>)>();
    let mut lines = input.lines();
    let mut session = QuerySession::new();
    let mut input_closed = false;

    loop {
        tokio::select! {
            line = lines.next_line(), if !input_closed => {
                let Some(line) = line? else {
                    input_closed = true;
                    if session.is_pending() {
                        continue;
                    }
                    break;
                };
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if query == QUIT {
                    break;
                }

                let ticket = session.begin();
                info!("Query #{}: {:?}", ticket.seq(), query);
                writeln!(out, "Loading...")?;

                let searcher = searcher.clone();
                let tx = tx.clone();
                let query = query.to_owned();
                tokio::spawn(async move {
                    let result = searcher.search(&query).await;
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = rx.recv() => {
                if session.complete(ticket, result) == Applied::Current {
                    show(&session, out, covers)?;
                }
                if input_closed && !session.is_pending() {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn show<W: Write>(session: &QuerySession, out: &mut W, covers: &Covers) -> io::Result<()> {
    match session.state() {
        QueryState::Success(results) => write!(out, "{}", render_results(results, covers)),
        QueryState::Failed(err) => writeln!(out, "{}", describe_failure(err)),
        QueryState::Idle | QueryState::Pending(_) => Ok(()),
    }
}

/// One-line message for a failed query. Transport and shape failures read
/// differently so the user can tell a network problem from an API change.
pub fn describe_failure(err: &SearchError) -> String {
    match err {
        SearchError::Validation(issues) => format!(
            "Search endpoint returned an unexpected response ({} issue(s), first: {})",
            issues.len(),
            issues
                .issues()
                .first()
                .map(ToString::to_string)
                .unwrap_or_default()
        ),
        err => format!("Search failed: {}", err),
    }
}
