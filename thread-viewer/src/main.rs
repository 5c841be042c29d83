use clap::Parser;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use thread_ref::{IdentityKey, LocalId, RefError};
use thread_view::{Command, Effect, ThreadView, ViewConfig};
use tokio::fs::{read_to_string, File};
use tokio::io::{stdin, AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CONFIG_FILE: &str = ".thread-view.json";
const DEFAULT_FILTER: &str = "thread_viewer=info,thread_view=info";

/// Replays interactions and live posts against a rendered thread, then
/// writes the resulting page.
#[derive(Debug, Parser)]
#[command(name = "thread-viewer", version)]
struct Args {
    /// Thread attributes as rendered by the server, in JSON.
    thread: PathBuf,

    /// Newline-delimited JSON commands. Read from stdin when omitted.
    #[arg(short, long)]
    events: Option<PathBuf>,

    #[arg(short, long, default_value = "thread.html")]
    output: PathBuf,

    /// View configuration. Defaults to ~/.thread-view.json when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Post to fold on at load, either a local id or a `?pivot=N` query.
    #[arg(long)]
    pivot: Option<String>,

    /// Identity key of the current user.
    #[arg(long)]
    identity: Option<String>,
}

#[derive(Debug, ThisError)]
enum Error {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read events: {0}")]
    ReadEvents(#[source] std::io::Error),
    #[error("Invalid identity: {0}")]
    Identity(#[from] RefError),
    #[error("Failed to load thread: {0}")]
    View(#[from] thread_view::Error),
    #[error("Failed to write page: {0}")]
    Page(#[from] thread_pages::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = load_config(args.config.as_deref()).await?;
    let thread_json = read_file(&args.thread).await?;
    let mut view = ThreadView::from_json(&thread_json, config)?;
    info!("Loaded thread {} with {} posts", view.thread().id(), view.thread().len());

    if let Some(identity) = args.identity {
        let identity = IdentityKey::from_string(identity)?;
        log_effects(&view.set_identity(Some(identity)));
    }

    if let Some(pivot) = args.pivot.as_deref() {
        log_effects(&fold_at_load(&mut view, pivot));
    }

    let replayed = match args.events {
        Some(path) => {
            let file = File::open(&path)
                .await
                .map_err(|source| Error::ReadFile { path, source })?;
            replay(&mut view, BufReader::new(file)).await?
        }
        None => replay(&mut view, BufReader::new(stdin())).await?,
    };
    info!("Replayed {} commands", replayed);

    thread_pages::write_thread_html(&args.output, &view).await?;
    info!("Wrote {}", args.output.display());

    Ok(())
}

async fn read_file(path: &Path) -> Result<String, Error> {
    read_to_string(path).await.map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

async fn load_config(path: Option<&Path>) -> Result<ViewConfig, Error> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match simple_home_dir::home_dir().map(|home| home.join(CONFIG_FILE)) {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file, using defaults");
                return Ok(ViewConfig::default());
            }
        },
    };
    let json = read_file(&path).await?;
    let config = ViewConfig::from_json(&json)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

fn fold_at_load(view: &mut ThreadView, pivot: &str) -> Vec<Effect> {
    if pivot.contains('=') {
        return view.fold_from_query(pivot);
    }
    match LocalId::from_string(pivot.to_string()) {
        Ok(pivot) => view.fold_on(pivot),
        Err(err) => {
            warn!("Ignoring pivot {:?}: {}", pivot, err);
            Vec::new()
        }
    }
}

/// Dispatches every command in `reader` strictly in order. Malformed lines
/// are skipped.
async fn replay<R>(view: &mut ThreadView, reader: R) -> Result<usize, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await.map_err(Error::ReadEvents)? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Command::from_json(line) {
            Ok(command) => {
                log_effects(&view.dispatch(command));
                count += 1;
            }
            Err(err) => warn!("Skipping malformed command: {}", err),
        }
    }

    Ok(count)
}

fn log_effects(effects: &[Effect]) {
    for effect in effects {
        match serde_json::to_string(effect) {
            Ok(json) => info!("{}", json),
            Err(err) => warn!("Failed to serialize effect {:?}: {}", effect, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thread_view::FoldState;

    const THREAD: &str = r#"{
        "thread_id": "abc",
        "posts": [
            { "local_id": 1, "global_id": 101, "identity": "a", "color": { "hue": 200, "saturation": 100, "lightness": 30 } },
            { "local_id": 2, "global_id": 102, "reply_target": 1, "identity": "b", "color": { "hue": 10, "saturation": 50, "lightness": 40 } },
            { "local_id": 3, "global_id": 103, "identity": "c", "color": { "hue": 90, "saturation": 20, "lightness": 50 } }
        ]
    }"#;

    fn lid(id: u64) -> LocalId {
        LocalId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_replay_in_order() {
        let mut view = ThreadView::from_json(THREAD, ViewConfig::default()).unwrap();
        let events = concat!(
            r#"{ "command": "toggle_fold", "post": 2 }"#,
            "\n",
            "not json\n",
            "\n",
            r#"{ "command": "post_inserted", "fragment": { "id": 4, "post": { "local_id": 4, "global_id": 104, "reply_target": 2, "identity": "d", "color": { "hue": 1, "saturation": 1, "lightness": 1 } } } }"#,
            "\n",
            r#"{ "command": "post_inserted", "fragment": { "id": 5, "post": { "local_id": 5, "global_id": 105, "reply_target": 3, "identity": "d", "color": { "hue": 1, "saturation": 1, "lightness": 1 } } } }"#,
            "\n",
        );

        let count = replay(&mut view, BufReader::new(events.as_bytes())).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(view.fold_state(), FoldState::Folded { pivot: lid(2) });
        assert!(!view.row(lid(4)).unwrap().is_hidden());
        assert!(view.row(lid(5)).unwrap().is_hidden());
        assert_eq!(view.thread().get(lid(2)).unwrap().back_refs(), &[lid(4)]);
    }

    #[test]
    fn test_fold_at_load() {
        let mut view = ThreadView::from_json(THREAD, ViewConfig::default()).unwrap();
        assert!(fold_at_load(&mut view, "nope").is_empty());
        fold_at_load(&mut view, "?pivot=3");
        assert_eq!(view.fold_state(), FoldState::Folded { pivot: lid(3) });
        fold_at_load(&mut view, "1");
        assert_eq!(view.fold_state(), FoldState::Folded { pivot: lid(1) });
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["thread-viewer", "thread.json", "--pivot", "?pivot=2", "-o", "out.html"]);
        assert_eq!(args.thread, PathBuf::from("thread.json"));
        assert_eq!(args.output, PathBuf::from("out.html"));
        assert_eq!(args.pivot.as_deref(), Some("?pivot=2"));
        assert!(args.events.is_none());
    }
}
