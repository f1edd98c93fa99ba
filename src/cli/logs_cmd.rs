use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::client::{InteractionQuery, LogClient};
use crate::core::config::AppConfig;
use crate::core::pagination::{compute_window, PageWindow};
use crate::core::session::{aggregate_session, build_row, InteractionRow, SessionHeader};

#[derive(Serialize)]
struct LogsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<SessionHeader>,
    interactions: Vec<InteractionRow>,
    pagination: PageWindow,
    total: u64,
}

pub async fn run(
    config: &AppConfig,
    session_id: Option<String>,
    page: u64,
    limit: Option<u64>,
    opts: &OutputOptions,
) -> Result<()> {
    let limit = limit.unwrap_or(config.api.page_size).max(1);
    let page_index = page.saturating_sub(1);

    let client = LogClient::new(&config.api)?;
    let query = InteractionQuery {
        session_id: session_id.clone(),
        limit,
        offset: page_index * limit,
    };

    if opts.verbose {
        eprintln!(
            "Fetching {} (limit {}, offset {})",
            config.api.base_url, query.limit, query.offset
        );
    }

    // The summary fetch runs concurrently and is allowed to fail; the header
    // then degrades to page-scoped totals.
    let (interactions, summary) = match &session_id {
        Some(id) => {
            let (interactions, summary) =
                tokio::join!(client.get_interactions(&query), client.get_session_summary(id));
            let summary = match summary {
                Ok(summary) => summary,
                Err(e) => {
                    if opts.verbose {
                        eprintln!("Warning: session summary unavailable: {:#}", e);
                    }
                    None
                }
            };
            (interactions, summary)
        }
        None => (client.get_interactions(&query).await, None),
    };

    // Render whatever arrived: a failed page fetch with a good summary still
    // produces the session header.
    let interactions = match interactions {
        Ok(page) => page,
        Err(e) => match &summary {
            Some(_) => {
                eprintln!("Error fetching interactions: {:#}", e);
                let header = aggregate_session(&[], summary.as_ref(), None);
                emit(Some(header), Vec::new(), compute_window(page_index, limit, 0), 0, limit, opts)?;
                return Ok(());
            }
            None => return Err(e),
        },
    };

    let total = interactions.pagination.total;
    let window = compute_window(page_index, limit, total);
    let rows: Vec<InteractionRow> = interactions.data.iter().map(build_row).collect();
    let header = session_id
        .as_ref()
        .map(|_| aggregate_session(&interactions.data, summary.as_ref(), Some(total)));

    emit(header, rows, window, total, limit, opts)
}

fn emit(
    header: Option<SessionHeader>,
    rows: Vec<InteractionRow>,
    window: PageWindow,
    total: u64,
    limit: u64,
    opts: &OutputOptions,
) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            let mut sections: Vec<String> = Vec::new();
            if let Some(header) = &header {
                sections.push(renderer::render_session_header(header, opts.use_color));
            }
            sections.push(renderer::render_rows(&rows, opts.use_color));
            if let Some(footer) = renderer::render_pagination(&window, total, limit, opts.use_color)
            {
                sections.push(footer);
            }
            println!("{}", sections.join("\n\n"));
        }
        OutputFormat::Json => {
            let payload = LogsPayload {
                session: header,
                interactions: rows,
                pagination: window,
                total,
            };
            let json = if opts.pretty {
                serde_json::to_string_pretty(&payload)?
            } else {
                serde_json::to_string(&payload)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}
