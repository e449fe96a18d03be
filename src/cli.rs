use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use getopts::Options;
use tokio::time::Duration;

pub enum Command {
    Serve,
    Render,
}

pub struct Args {
    pub command: Command,
    pub address: SocketAddr,
    pub fetch_url: Option<String>,
    pub file: Option<PathBuf>,
    pub week: Option<String>,
    pub output: Option<PathBuf>,
    pub enable_cache: bool,
    pub cache_ttl: Duration,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8080]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "u",
        "fetch-url",
        "URL to fetch the timetable document from before trying local fallbacks",
        "URL",
    );
    opts.optopt(
        "f",
        "file",
        "Load this timetable document instead of the fetch/fallback chain",
        "PATH",
    );
    opts.optopt(
        "w",
        "week",
        "Week key to render (render command) [Default: lowest-numbered week]",
        "KEY",
    );
    opts.optopt(
        "o",
        "output",
        "Write the rendered page here instead of stdout (render command)",
        "PATH",
    );
    opts.optflag(
        "c",
        "enable-cache",
        "Enable caching of rendered pages [Default: false]",
    );
    opts.optopt(
        "t",
        "cache-ttl",
        "Time-to-live for cached pages [Default: 3600]",
        "SECONDS",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        let brief = format!(
            "Usage: {} [serve|render] [options]",
            env!("CARGO_PKG_NAME")
        );
        println!("{}", opts.usage(&brief));
        process::exit(0);
    }

    let command = match matches.free.first().map(String::as_str) {
        None | Some("serve") => Command::Serve,
        Some("render") => Command::Render,
        Some(other) => {
            eprintln!("Unknown command `{other}`, expected `serve` or `render`");
            process::exit(1);
        }
    };

    let address = match matches.opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8080)))
    {
        Ok(address) => address,
        Err(err) => {
            eprintln!("Provided value for option 'address' is invalid: {err}");
            process::exit(1);
        }
    };

    let enable_cache = matches.opt_present("enable-cache");

    let cache_ttl = match matches.opt_get_default("cache-ttl", 3600) {
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => {
            eprintln!("Provided value for option 'cache-ttl' is invalid: {err}");
            process::exit(1);
        }
    };

    Args {
        command,
        address,
        fetch_url: matches.opt_str("fetch-url"),
        file: matches.opt_str("file").map(PathBuf::from),
        week: matches.opt_str("week"),
        output: matches.opt_str("output").map(PathBuf::from),
        enable_cache,
        cache_ttl,
    }
}
