//! Terminal front-end for the library explorer.
//!
//! Reads commands from stdin and re-renders the result list whenever the explorer publishes a
//! new view. Typing goes through the same debounce, cache and history logic as the web client.

use lessn::explorer::client::{HttpSearchBackend, SearchBackend};
use lessn::explorer::controller::{Phase, View};
use lessn::explorer::driver::{Explorer, ExplorerConfig};
use lessn::search::types::FacetSelection;

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
commands:
  <text>               type search text (debounced)
  go                   search now
  subject A,B          filter subjects      (grade / topic / subtopic likewise)
  clear                drop all filters
  page N | next | prev change page
  back | forward       history navigation
  quit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let api_url =
        std::env::var("LESSN_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let debounce_ms: u64 = match std::env::var("LESSN_DEBOUNCE_MS") {
        Ok(raw) => raw.trim().parse()?,
        Err(_) => 300,
    };
    let initial_url = std::env::args().nth(1).unwrap_or_default();

    let backend = HttpSearchBackend::new(&api_url);
    tracing::info!("Explorer using {}", backend.base_url());

    let explorer = Explorer::spawn(
        Arc::new(backend) as Arc<dyn SearchBackend>,
        ExplorerConfig {
            debounce: Duration::from_millis(debounce_ms),
            initial_url,
        },
    );

    let mut views = explorer.subscribe();
    let renderer = tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            render(&view);
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let view = explorer.view();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{HELP}"),
            "go" => explorer.submit(),
            "next" => explorer.change_page(view.input.page + 1),
            "prev" => explorer.change_page(view.input.page.saturating_sub(1).max(1)),
            "page" => match rest.trim().parse() {
                Ok(page) => explorer.change_page(page),
                Err(_) => println!("usage: page N"),
            },
            "back" => explorer.back(),
            "forward" => explorer.forward(),
            "clear" => explorer.apply_facets(FacetSelection::default()),
            "subject" | "grade" | "topic" | "subtopic" => {
                let mut selection = view.input.facets.clone();
                let values = split_list(rest);
                match command {
                    "subject" => selection.subjects = values,
                    "grade" => selection.grades = values,
                    "topic" => selection.topics = values,
                    _ => selection.sub_topics = values,
                }
                explorer.apply_facets(selection);
            }
            _ => explorer.type_text(line),
        }
    }

    renderer.abort();
    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn render(view: &View) {
    match view.phase {
        Phase::Debouncing { .. } => return,
        Phase::InFlight { .. } => {
            println!("searching...");
            return;
        }
        Phase::Idle | Phase::Settled => {}
    }

    let Some(shown) = &view.shown else {
        return;
    };

    println!();
    println!(
        "?{}  ({} results, page {})",
        view.url, view.results.total, shown.page
    );
    if view.results.items.is_empty() {
        println!("  no presentations match");
    }
    for item in &view.results.items {
        let topic = item.topic.as_deref().unwrap_or("-");
        println!(
            "  #{:<5} {}  [{} | {} | {}]",
            item.id, item.name, item.subject, item.grade, topic
        );
    }
}
