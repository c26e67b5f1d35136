mod paths;

use std::fs::File;
use std::time::Duration;

use scrim::prelude::*;
use simplelog::{LevelFilter, WriteLogger};

fn init_logging() {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        eprintln!("No cache directory; logging disabled");
        return;
    };
    let log_file = File::create(path).expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, simplelog::Config::default(), log_file)
        .expect("Failed to initialize logger");
}

fn init_config() {
    let Some(path) = paths::config_file() else {
        return;
    };
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return;
    }
    match Config::load(&path).and_then(scrim::config::init) {
        Ok(()) => log::info!("Using config from {}", path.display()),
        Err(e) => log::warn!("Ignoring config at {}: {}", path.display(), e),
    }
}

fn print_detail(label: &str, detail: &OverlayEventDetail) {
    match serde_json::to_string(detail) {
        Ok(json) => println!("{}: {}", label, json),
        Err(e) => eprintln!("{}: unprintable detail: {}", label, e),
    }
}

async fn run_loading(ctx: &OverlayContext) {
    let loading = Loading::create(
        ctx,
        LoadingOptions::new()
            .message("Syncing <b>records</b>...")
            .duration(Duration::from_millis(1500)),
    );
    loading.present().await;
    println!("{:#?}", loading.render());

    let detail = loading.on_did_dismiss().await;
    print_detail("loading dismissed", &detail);
}

async fn run_alert(ctx: &OverlayContext) -> Result<(), OverlayError> {
    let alert = Alert::create(
        ctx,
        AlertOptions::new()
            .header("Export")
            .message("Pick a format")
            .input(AlertInput::radio("CSV", "csv").checked(true))
            .input(AlertInput::radio("JSON", "json"))
            .button(AlertButton::cancel("Cancel"))
            .button(
                AlertButton::new("Export")
                    .role("confirm")
                    .with_handler(|values| async move {
                        log::info!("Exporting as {}", values);
                        Ok::<_, HandlerError>(HandlerOutcome::Proceed)
                    }),
            ),
    )?;
    alert.present().await;
    alert.select_radio(1)?;
    println!("{:#?}", alert.render());

    alert.button_click(1).await?;
    print_detail("alert dismissed", &alert.on_did_dismiss().await);
    Ok(())
}

async fn run_close_key(ctx: &OverlayContext) -> Result<(), OverlayError> {
    let alert = Alert::create(ctx, AlertOptions::new().header("Press Escape").button("OK"))?;
    alert.present().await;
    ctx.controller().handle_close_key().await;
    print_detail("close key", &alert.on_did_dismiss().await);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    init_config();

    let ctx = OverlayContext::new();
    run_loading(&ctx).await;
    if let Err(e) = run_alert(&ctx).await {
        eprintln!("Error: {}", e);
    }
    if let Err(e) = run_close_key(&ctx).await {
        eprintln!("Error: {}", e);
    }
}
