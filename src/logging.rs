use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "hackernews.log";

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

/// Installs the global subscriber: a daily rolling JSON file when `log_dir` is set and a
/// pretty stdout layer when `log_to_console` is set. With neither, nothing is installed and
/// the host keeps the global dispatcher. A second call leaves the first subscriber in place.
///
/// The returned guard flushes the file writer on drop and must outlive all logging.
pub fn init(
    log_to_console: bool,
    log_dir: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let (layers, guard) = build_layers(log_to_console, log_dir);
    if layers.is_empty() {
        return None;
    }

    if let Err(e) = tracing_subscriber::registry().with(layers).try_init() {
        tracing::debug!(error =? e, "Subscriber already installed");
    }

    guard
}

fn build_layers(
    log_to_console: bool,
    log_dir: Option<&std::path::Path>,
) -> (
    Vec<BoxedLayer>,
    Option<tracing_appender::non_blocking::WorkerGuard>,
) {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if let Some(dir) = log_dir {
        let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_filter(tracing::level_filters::LevelFilter::INFO)
                .boxed(),
        );
    }

    if log_to_console {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stdout)
                .with_filter(tracing::level_filters::LevelFilter::INFO)
                .boxed(),
        );
    }

    (layers, guard)
}
