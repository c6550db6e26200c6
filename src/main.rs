// Reads one JSON command per line on stdin and answers with one JSON event per
// line on stdout, starting with the initial `update-tabs` event.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use admin_tabs_lib::modules::router::admin_routes;
use admin_tabs_lib::settings::Settings;
use admin_tabs_lib::{logging, AppState, Command, Reply};

fn settings_path() -> Option<PathBuf> {
    match std::env::var_os("ADMIN_TABS_SETTINGS") {
        Some(path) => Some(PathBuf::from(path)),
        None => Settings::default_path().ok(),
    }
}

fn emit(out: &mut impl Write, reply: &Reply) -> io::Result<()> {
    let json = serde_json::to_string(reply).map_err(io::Error::other)?;
    writeln!(out, "{}", json)?;
    out.flush()
}

fn main() -> io::Result<()> {
    let settings = settings_path()
        .map(|path| Settings::load_or_init(&path))
        .unwrap_or_default();

    let log_override = std::env::var("ADMIN_TABS_LOG").ok();
    if cfg!(debug_assertions) || log_override.is_some() {
        logging::init(log_override.as_deref().unwrap_or(&settings.log_level));
    }

    let mut app = AppState::new(settings, admin_routes());
    app.start();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    emit(&mut out, &Reply::UpdateTabs(app.payload()))?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Command>(&line) {
            Ok(command) => app.dispatch(command),
            Err(e) => Reply::Error { message: format!("invalid command: {}", e) },
        };
        emit(&mut out, &reply)?;
    }
    Ok(())
}
