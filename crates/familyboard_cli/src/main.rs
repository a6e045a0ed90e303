//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `familyboard_core` linkage without the mobile runtime.
//! - With a database path argument, print the startup route for that file.

use familyboard_core::FamilyBoard;

fn main() {
    println!("familyboard_core ping={}", familyboard_core::ping());
    println!("familyboard_core version={}", familyboard_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return;
    };
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("familyboard_core runtime unavailable: {err}");
            return;
        }
    };
    let board = FamilyBoard::open(&db_path);
    let (route, tasks) = runtime.block_on(async {
        (board.initial_route().await, board.tasks().list_tasks().await)
    });
    println!("familyboard_core initial_route={}", route.as_str());
    println!("familyboard_core tasks={}", tasks.len());
}
