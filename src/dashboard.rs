//! Interactive dashboard: search, pick a result, view it, export it.

use crate::app::App;
use aptscope_core::{create_listing_table, Result, Session};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

const HELP: &str = "\
Commands:
  search <keyword>   search listings
  list               show the cached search results
  view <n>           fetch and show details for result n
  html <file>        write the last details as an HTML dashboard
  csv <file>         write the last transaction history as CSV
  export             export the last details as a PDF report
  help               show this help
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    Search(String),
    List,
    View(usize),
    Html(PathBuf),
    Csv(PathBuf),
    Export,
    Help,
    Quit,
}

impl DashboardCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match (verb, rest) {
            ("search" | "s", "") => Err("search needs a keyword".to_string()),
            ("search" | "s", keyword) => Ok(Self::Search(keyword.to_string())),
            ("list" | "l", _) => Ok(Self::List),
            ("view" | "v", n) => n
                .parse()
                .map(Self::View)
                .map_err(|_| format!("not a result number: {:?}", n)),
            ("html", "") | ("csv", "") => Err(format!("{} needs a file name", verb)),
            ("html", file) => Ok(Self::Html(PathBuf::from(file))),
            ("csv", file) => Ok(Self::Csv(PathBuf::from(file))),
            ("export" | "e", _) => Ok(Self::Export),
            ("help" | "h" | "?", _) => Ok(Self::Help),
            ("quit" | "q" | "exit", _) => Ok(Self::Quit),
            _ => Err(format!("unknown command: {}", verb)),
        }
    }
}

/// Read commands until `quit` or end of input.
pub async fn run<R, W>(app: &App, session: &mut Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", HELP)?;
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match DashboardCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message)?;
                continue;
            }
        };

        if command == DashboardCommand::Quit {
            break;
        }
        // a failed step is reported and the loop keeps going
        if let Err(e) = step(app, session, command, out).await {
            warn!("Dashboard command failed: {}", e);
            writeln!(out, "Error: {}", e)?;
        }
    }

    Ok(())
}

async fn step<W: Write>(
    app: &App,
    session: &mut Session,
    command: DashboardCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        DashboardCommand::Search(keyword) => {
            let results = app.search(&keyword).await?;
            if session.record_search(&keyword, results) {
                writeln!(out, "Results for {}:", keyword)?;
                writeln!(out, "{}", create_listing_table(session.results()))?;
            } else {
                writeln!(out, "No results for {}", keyword)?;
            }
        }
        DashboardCommand::List => {
            if session.results().is_empty() {
                writeln!(out, "No search results yet")?;
            } else {
                writeln!(out, "{}", create_listing_table(session.results()))?;
            }
        }
        DashboardCommand::View(index) => {
            let listing = session.select(index)?.clone();
            let detail = app.detail(&listing).await?;
            session.store_detail(listing.clone(), detail.clone());
            let view = app.view(listing, detail).await;
            writeln!(out, "{}", view.render_terminal())?;
        }
        DashboardCommand::Html(path) => match session.detail() {
            Some((listing, detail)) => {
                let view = app.view(listing.clone(), detail.clone()).await;
                app.write_html(&view, &path)?;
                writeln!(out, "Wrote {}", path.display())?;
            }
            None => writeln!(out, "View a result first")?,
        },
        DashboardCommand::Csv(path) => match session.detail() {
            Some((_, detail)) => {
                app.write_csv(detail, &path)?;
                writeln!(out, "Wrote {}", path.display())?;
            }
            None => writeln!(out, "View a result first")?,
        },
        DashboardCommand::Export => match session.detail() {
            Some((listing, detail)) => {
                let path = app.export(listing, detail).await?;
                writeln!(out, "Saved report {}", path.display())?;
            }
            None => writeln!(out, "View a result first")?,
        },
        DashboardCommand::Help => writeln!(out, "{}", HELP)?,
        DashboardCommand::Quit => {}
    }
    Ok(())
}
