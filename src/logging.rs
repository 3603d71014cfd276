use color_eyre::eyre::Result;
use log::LevelFilter;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// Set up file-based logging under the XDG state directory.
///
/// The report goes to stdout, so log output must stay off the terminal;
/// everything is appended to `revline.log` instead. `RUST_LOG` overrides the
/// level chosen by the `debug` flag.
pub fn init_logging(debug: bool) -> Result<()> {
    let default_level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_dir = default_log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("revline.log"))?;

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] - {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    log::info!("Logging initialized with level: {default_level}");
    Ok(())
}

fn default_log_dir() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => {
            let xdg_state = env::var_os("XDG_STATE_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(home).join(".local/state"));
            xdg_state.join("revline")
        }
        None => PathBuf::from("/tmp/revline"),
    }
}
