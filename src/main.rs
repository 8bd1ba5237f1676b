mod app;

use app::HobbyHubApp;
use chrono::Local;
use hobbyhub::database::{db, flashcards, workouts};
use hobbyhub::{AppConfig, Result};
use rusqlite::Connection;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let app = match setup() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "HobbyHub",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}

fn setup() -> Result<HobbyHubApp> {
    let config = AppConfig::from_env()?;
    info!(
        "HobbyHub v{} starting (database: {}, trend window: {}, formula: {})",
        env!("CARGO_PKG_VERSION"),
        config.database_path.display(),
        config.trend_window,
        config.formula
    );

    let conn = db::open_database(&config.database_path, Local::now().date_naive())?;
    seed_sample_data(&conn)?;
    HobbyHubApp::new(conn, config)
}

/// Fills an empty database with a few cards and exercises to start from
fn seed_sample_data(conn: &Connection) -> Result<()> {
    if !flashcards::get_all_flashcards(conn)?.is_empty()
        || !workouts::get_all_exercises(conn)?.is_empty()
    {
        return Ok(());
    }

    let today = db::get_current_date(conn)?;
    for (front, back) in [("hola", "hello"), ("gracias", "thank you"), ("por favor", "please")] {
        flashcards::add_flashcard(front, back, today, conn)?;
    }
    for (name, muscle_group) in [("Squat", "Legs"), ("Bench Press", "Chest"), ("Deadlift", "Back")] {
        workouts::add_exercise(name, muscle_group, conn)?;
    }

    info!("Sample data created");
    Ok(())
}
