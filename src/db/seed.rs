//! Sample data for demos and local development.

use super::{Database, now_ms};
use anyhow::Result;
use rusqlite::{Transaction, params};
use tracing::info;

/// Column names used by every seeded board.
const SEED_COLUMNS: [&str; 3] = ["TODO", "DOING", "DONE"];

/// (title, description) pairs per seeded column.
type SeedColumnTasks = [&'static [(&'static str, &'static str)]; 3];

const PLATFORM_LAUNCH: SeedColumnTasks = [
    &[
        ("Build UI for onboarding flow", "Create UI screens for onboarding process"),
        ("Build UI for search", "Create UI components for search functionality"),
        ("Build settings UI", "Create interface for app settings"),
        ("QA and test all major user journeys", "Ensure all user paths work correctly"),
    ],
    &[
        ("Design settings and search pages", "Create designs for settings and search functionality"),
        ("Add account management endpoints", "Develop API endpoints for account operations"),
        ("Design onboarding flow", "Create designs for user onboarding"),
        ("Add search endpoints", "Develop API endpoints for search functionality"),
        ("Add authentication endpoints", "Develop API endpoints for user authentication"),
        (
            "Research pricing points of various competitors and trial different business models",
            "Study competition pricing strategies",
        ),
    ],
    &[
        ("Conduct 5 wireframe tests", "Test wireframes with users"),
        ("Create wireframe prototype", "Build initial wireframe prototype"),
        ("Review results of usability tests and iterate", "Analyze test results and make improvements"),
        (
            "Create paper prototypes and conduct 10 usability tests with potential customers",
            "Test paper prototypes with potential users",
        ),
        ("Market discovery", "Research market needs and opportunities"),
        ("Competitor analysis", "Research and analyze competitors"),
        ("Research the market", "Study market trends and requirements"),
    ],
];

const MARKETING_PLAN: SeedColumnTasks = [
    &[
        ("Create social media campaign", "Develop social media strategy and content"),
        ("Develop email newsletter", "Design templates and plan content schedule"),
        ("Create promotional video", "Produce a short video highlighting key features"),
    ],
    &[
        ("SEO optimization", "Optimize website content for search engines"),
        ("Plan product launch event", "Organize virtual launch event with demos"),
    ],
    &[
        ("Market research", "Complete analysis of target audience"),
        ("Brand identity development", "Finalize logo and brand guidelines"),
    ],
];

const ROADMAP: SeedColumnTasks = [
    &[
        ("API integration with third-party services", "Add integrations with popular productivity tools"),
        ("Mobile app development", "Create native mobile applications"),
        ("Enterprise features", "Develop advanced security and admin features"),
    ],
    &[
        ("Improve performance", "Optimize load times and responsiveness"),
        ("User feedback implementation", "Address top user requests from feedback forum"),
    ],
    &[
        ("Core functionality", "Complete essential features for MVP"),
        ("Initial user testing", "Complete first round of beta testing"),
    ],
];

const SEED_BOARDS: [(&str, SeedColumnTasks); 3] = [
    ("Platform Launch", PLATFORM_LAUNCH),
    ("Marketing Plan", MARKETING_PLAN),
    ("Roadmap", ROADMAP),
];

/// Checklists for the first three seeded tasks: (title, is_completed).
const SEED_SUBTASKS: [&[(&str, bool)]; 3] = [
    &[
        ("Research pricing", true),
        ("Review competitor product", false),
        ("Finalize requirements", false),
    ],
    &[
        ("Draft wireframes", true),
        ("Review with design team", true),
        ("Finalize mockups", false),
    ],
    &[
        ("Setup development environment", true),
        ("Create basic structure", false),
    ],
];

/// Row counts written by [`Database::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    pub boards: usize,
    pub columns: usize,
    pub tasks: usize,
    pub subtasks: usize,
}

fn seed_board(
    tx: &Transaction<'_>,
    name: &str,
    columns: &SeedColumnTasks,
    now: i64,
    task_ids: &mut Vec<i64>,
    summary: &mut SeedSummary,
) -> Result<()> {
    tx.execute(
        "INSERT INTO boards (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![name, now],
    )?;
    let board_id = tx.last_insert_rowid();
    summary.boards += 1;

    for (column_index, (column_name, tasks)) in SEED_COLUMNS.iter().zip(columns).enumerate() {
        tx.execute(
            "INSERT INTO columns (name, board_id, \"order\", created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![column_name, board_id, column_index as i64 + 1, now],
        )?;
        let column_id = tx.last_insert_rowid();
        summary.columns += 1;

        for (task_index, (title, description)) in tasks.iter().enumerate() {
            tx.execute(
                "INSERT INTO tasks (title, description, column_id, \"order\", created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![title, description, column_id, task_index as i64 + 1, now],
            )?;
            task_ids.push(tx.last_insert_rowid());
            summary.tasks += 1;
        }
    }
    Ok(())
}

impl Database {
    /// Replace all data with the sample boards.
    ///
    /// Runs in one transaction; existing boards and everything beneath them
    /// are deleted first.
    pub fn seed(&self) -> Result<SeedSummary> {
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM boards", [])?;

            let mut summary = SeedSummary::default();
            let mut task_ids = Vec::new();
            for (name, columns) in &SEED_BOARDS {
                seed_board(&tx, name, columns, now, &mut task_ids, &mut summary)?;
            }

            for (task_id, subtasks) in task_ids.iter().zip(SEED_SUBTASKS) {
                for (index, (title, is_completed)) in subtasks.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO subtasks (title, is_completed, task_id, \"order\", created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                        params![title, is_completed, task_id, index as i64, now],
                    )?;
                    summary.subtasks += 1;
                }
            }

            tx.commit()?;
            info!(
                boards = summary.boards,
                columns = summary.columns,
                tasks = summary.tasks,
                subtasks = summary.subtasks,
                "Seeded sample data"
            );
            Ok(summary)
        })
    }
}
