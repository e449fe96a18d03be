use std::io::Write;
use std::{env, fs, io, process};

use anyhow::{bail, Result};
use log::warn;

mod cache;
mod cli;
mod document;
mod grid;
mod html;
mod layout;
mod server;
mod source;

use document::Document;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "timegrid=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let args = cli::parse(env::args().skip(1).collect());

    // A user-supplied file replaces the whole resolver chain, and unlike the
    // chain its failures are blocking.
    let document = match &args.file {
        Some(path) => match source::load_file(path) {
            Ok(document) => Some(document),
            Err(err) => {
                eprintln!("{err:#}");
                process::exit(1);
            }
        },
        None => source::resolve(args.fetch_url.as_deref()).await,
    };

    match args.command {
        cli::Command::Serve => server::serve(document, args).await,
        cli::Command::Render => render(document, &args),
    }
}

fn render(document: Option<Document>, args: &cli::Args) -> Result<()> {
    let Some(document) = document else {
        bail!("no timetable document could be loaded");
    };

    let selected = match &args.week {
        Some(week) => week.clone(),
        None => match document.first_key() {
            Some(key) => key.to_string(),
            None => {
                warn!("document has no weeks, nothing to render");
                return Ok(());
            }
        },
    };

    let Some(page) = html::render_page(&document, &selected) else {
        // same contract as selecting a missing week interactively
        warn!("week `{selected}` not found, nothing to render");
        return Ok(());
    };

    match &args.output {
        Some(path) => fs::write(path, page)?,
        None => io::stdout().write_all(page.as_bytes())?,
    }

    Ok(())
}
