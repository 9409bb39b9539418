//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `edutrack_core` linkage without a UI shell.
//! - Print today's attendance status and recent records for a local database.
//!
//! Usage: `edutrack_cli [DB_PATH]`

use edutrack_core::db::open_db;
use edutrack_core::{
    Clock, DashboardService, SessionService, SqliteStorage, StorageRecordStore, SystemClock,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("edutrack_core ping={}", edutrack_core::ping());
    println!("edutrack_core version={}", edutrack_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match report(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn report(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let storage = SqliteStorage::new(&conn);

    match SessionService::new(&storage).current()? {
        Some(session) => println!(
            "session user_type={} user_id={}",
            session.user_type.as_str(),
            session.user_id.as_deref().unwrap_or("-")
        ),
        None => println!("session none"),
    }

    let today = SystemClock::new().now().date();
    let overview =
        DashboardService::new(StorageRecordStore::new(&storage)).student_overview(today)?;
    println!(
        "attendance today={} marked={}",
        overview.today,
        overview.attended_today()
    );
    for record in &overview.recent {
        println!(
            "recent date={} time={} method={}",
            record.date,
            record.time,
            record.method.map_or("-", |method| method.as_str())
        );
    }
    Ok(())
}
