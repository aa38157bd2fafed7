//! Integration tests for the database layer.
//!
//! These tests verify the core database operations using an in-memory SQLite database.
//! Tests are organized by module and functionality.

use kanban_board::db::{Database, DbError};
use kanban_board::types::{Board, Column, NewTask, SubtaskUpdate, Task, TaskUpdate};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn default_columns() -> Vec<String> {
    vec!["To Do".to_string(), "Doing".to_string(), "Done".to_string()]
}

/// Board with the three default columns.
fn board_with_columns(db: &Database, name: &str) -> (Board, Vec<Column>) {
    let board = db.create_board(name, &default_columns()).unwrap();
    let columns = db.list_columns(board.id).unwrap();
    (board, columns)
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: None,
    }
}

/// Board → first column → one task.
fn task_fixture(db: &Database) -> Task {
    let (_, columns) = board_with_columns(db, "Fixture");
    db.create_task(columns[0].id, new_task("Write tests")).unwrap()
}

fn db_error(err: anyhow::Error) -> DbError {
    err.downcast::<DbError>().expect("expected a DbError")
}

mod board_tests {
    use super::*;

    #[test]
    fn create_board_adds_default_columns_in_order() {
        let db = setup_db();

        let (board, columns) = board_with_columns(&db, "Platform Launch");

        assert_eq!(board.name, "Platform Launch");
        assert!(board.created_at > 0);
        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["To Do", "Doing", "Done"]);
        let orders: Vec<_> = columns.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert!(columns.iter().all(|c| c.board_id == board.id));
    }

    #[test]
    fn create_board_without_default_columns() {
        let db = setup_db();

        let board = db.create_board("Empty", &[]).unwrap();

        assert!(db.list_columns(board.id).unwrap().is_empty());
    }

    #[test]
    fn default_column_failure_keeps_board_without_columns() {
        let db = setup_db();
        let broken = vec!["To Do".to_string(), "   ".to_string(), "Done".to_string()];

        let board = db.create_board("Survivor", &broken).unwrap();

        assert!(db.get_board(board.id).unwrap().is_some());
        assert!(db.list_columns(board.id).unwrap().is_empty());
    }

    #[test]
    fn create_board_rejects_blank_name() {
        let db = setup_db();

        let err = db.create_board("  ", &default_columns()).unwrap_err();

        assert_eq!(db_error(err), DbError::EmptyField("Board name"));
        assert!(db.list_boards().unwrap().is_empty());
    }

    #[test]
    fn list_boards_most_recent_first() {
        let db = setup_db();
        let first = db.create_board("First", &[]).unwrap();
        let second = db.create_board("Second", &[]).unwrap();
        let third = db.create_board("Third", &[]).unwrap();

        let ids: Vec<_> = db.list_boards().unwrap().into_iter().map(|b| b.id).collect();

        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn get_board_returns_none_for_unknown_id() {
        let db = setup_db();

        assert!(db.get_board(404).unwrap().is_none());
    }

    #[test]
    fn rename_board_updates_name() {
        let db = setup_db();
        let board = db.create_board("Old", &[]).unwrap();

        let renamed = db.rename_board(board.id, "New").unwrap().unwrap();

        assert_eq!(renamed.id, board.id);
        assert_eq!(renamed.name, "New");
        assert!(renamed.updated_at >= board.updated_at);
        assert_eq!(db.get_board(board.id).unwrap().unwrap().name, "New");
    }

    #[test]
    fn rename_missing_board_returns_none() {
        let db = setup_db();

        assert!(db.rename_board(99, "Nope").unwrap().is_none());
    }

    #[test]
    fn delete_board_cascades_to_descendants() {
        let db = setup_db();
        let (board, columns) = board_with_columns(&db, "Doomed");
        let task = db.create_task(columns[1].id, new_task("Task")).unwrap();
        let subtask = db.create_subtask(task.id, "Step").unwrap();
        let (other, other_columns) = board_with_columns(&db, "Survivor");

        assert!(db.delete_board(board.id).unwrap());

        assert!(db.get_board(board.id).unwrap().is_none());
        assert!(db.list_columns(board.id).unwrap().is_empty());
        for column in &columns {
            assert!(db.get_column(column.id).unwrap().is_none());
        }
        assert!(db.get_task(task.id).unwrap().is_none());
        assert!(db.get_subtask(subtask.id).unwrap().is_none());

        assert!(db.get_board(other.id).unwrap().is_some());
        assert_eq!(db.list_columns(other.id).unwrap(), other_columns);
    }

    #[test]
    fn delete_missing_board_returns_false() {
        let db = setup_db();

        assert!(!db.delete_board(1).unwrap());
    }
}

mod column_tests {
    use super::*;

    #[test]
    fn create_column_appends_after_max_order() {
        let db = setup_db();
        let (board, _) = board_with_columns(&db, "Board");

        let column = db.create_column(board.id, "Review").unwrap();

        assert_eq!(column.order, 4);
        assert_eq!(column.board_id, board.id);
        assert_eq!(db.list_columns(board.id).unwrap().last().unwrap().id, column.id);
    }

    #[test]
    fn first_column_gets_order_one() {
        let db = setup_db();
        let board = db.create_board("Bare", &[]).unwrap();

        let column = db.create_column(board.id, "Only").unwrap();

        assert_eq!(column.order, 1);
    }

    #[test]
    fn order_follows_max_not_count() {
        let db = setup_db();
        let board = db.create_board("Gaps", &[]).unwrap();
        let a = db.create_column(board.id, "A").unwrap();
        db.create_column(board.id, "B").unwrap();
        let c = db.create_column(board.id, "C").unwrap();
        db.delete_column(a.id).unwrap();

        let d = db.create_column(board.id, "D").unwrap();

        assert_eq!(c.order, 3);
        assert_eq!(d.order, 4);
    }

    #[test]
    fn create_column_on_missing_board_fails() {
        let db = setup_db();

        let err = db.create_column(77, "Lost").unwrap_err();

        assert_eq!(db_error(err), DbError::BoardNotFound(77));
    }

    #[test]
    fn rename_column_keeps_order() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");

        let renamed = db.rename_column(columns[1].id, "In Progress").unwrap().unwrap();

        assert_eq!(renamed.name, "In Progress");
        assert_eq!(renamed.order, columns[1].order);
    }

    #[test]
    fn rename_column_rejects_blank_name() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");

        let err = db.rename_column(columns[0].id, "").unwrap_err();

        assert_eq!(db_error(err), DbError::EmptyField("Column name"));
    }

    #[test]
    fn delete_column_cascades_to_tasks() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");
        let task = db.create_task(columns[0].id, new_task("Gone")).unwrap();
        let kept = db.create_task(columns[1].id, new_task("Kept")).unwrap();

        assert!(db.delete_column(columns[0].id).unwrap());

        assert!(db.get_task(task.id).unwrap().is_none());
        assert!(db.get_task(kept.id).unwrap().is_some());
        assert!(!db.delete_column(columns[0].id).unwrap());
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn create_task_appends_with_zero_subtasks() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");

        let first = db.create_task(columns[0].id, new_task("First")).unwrap();
        let second = db
            .create_task(
                columns[0].id,
                NewTask {
                    title: "Second".into(),
                    description: Some("Details".into()),
                },
            )
            .unwrap();

        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
        assert_eq!(first.description, None);
        assert_eq!(second.description.as_deref(), Some("Details"));
        assert_eq!(first.subtasks_count, 0);
        assert_eq!(first.completed_subtasks_count, 0);
    }

    #[test]
    fn create_task_in_missing_column_fails() {
        let db = setup_db();

        let err = db.create_task(5, new_task("Nowhere")).unwrap_err();

        assert_eq!(db_error(err), DbError::ColumnNotFound(5));
    }

    #[test]
    fn create_task_rejects_blank_title() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");

        let err = db.create_task(columns[0].id, new_task(" ")).unwrap_err();

        assert_eq!(db_error(err), DbError::EmptyField("Task title"));
    }

    #[test]
    fn list_tasks_sorted_by_order() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");
        let a = db.create_task(columns[0].id, new_task("A")).unwrap();
        let b = db.create_task(columns[0].id, new_task("B")).unwrap();
        db.update_task(
            a.id,
            TaskUpdate {
                order: Some(10),
                ..Default::default()
            },
        )
        .unwrap();

        let titles: Vec<_> = db
            .list_tasks(columns[0].id)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["B", "A"]);
        assert_eq!(b.order, 2);
    }

    #[test]
    fn subtask_count_is_live() {
        let db = setup_db();
        let task = task_fixture(&db);

        let s1 = db.create_subtask(task.id, "One").unwrap();
        db.create_subtask(task.id, "Two").unwrap();
        db.create_subtask(task.id, "Three").unwrap();
        db.toggle_subtask(s1.id).unwrap();

        let fetched = db.get_task(task.id).unwrap().unwrap();
        assert_eq!(fetched.subtasks_count, 3);
        assert_eq!(fetched.completed_subtasks_count, 1);
        assert_eq!(fetched.updated_at, task.updated_at);

        db.delete_subtask(s1.id).unwrap();

        let listed = db.list_tasks(task.column_id).unwrap();
        assert_eq!(listed[0].subtasks_count, 2);
        assert_eq!(listed[0].completed_subtasks_count, 0);
    }

    #[test]
    fn update_task_partial_fields() {
        let db = setup_db();
        let task = task_fixture(&db);

        let updated = db
            .update_task(
                task.id,
                TaskUpdate {
                    description: Some(Some("Now with details".into())),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Write tests");
        assert_eq!(updated.description.as_deref(), Some("Now with details"));
        assert_eq!(updated.order, task.order);
        assert_eq!(updated.column_id, task.column_id);
    }

    #[test]
    fn update_task_blank_description_clears_it() {
        let db = setup_db();
        let task = task_fixture(&db);
        db.update_task(
            task.id,
            TaskUpdate {
                description: Some(Some("temp".into())),
                ..Default::default()
            },
        )
        .unwrap();

        let cleared = db
            .update_task(
                task.id,
                TaskUpdate {
                    description: Some(Some(String::new())),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(cleared.description, None);
    }

    #[test]
    fn update_task_null_description_clears_it() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");
        let task = db
            .create_task(
                columns[0].id,
                NewTask {
                    title: "Described".into(),
                    description: Some("Old notes".into()),
                },
            )
            .unwrap();

        let cleared = db
            .update_task(
                task.id,
                TaskUpdate {
                    description: Some(None),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(cleared.description, None);
        assert_eq!(cleared.title, "Described");
    }

    #[test]
    fn update_task_rejects_blank_title() {
        let db = setup_db();
        let task = task_fixture(&db);

        let err = db
            .update_task(
                task.id,
                TaskUpdate {
                    title: Some("".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(db_error(err), DbError::EmptyField("Task title"));
    }

    #[test]
    fn moving_task_appends_to_target_column() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");
        let task = db.create_task(columns[0].id, new_task("Mover")).unwrap();
        db.create_task(columns[1].id, new_task("Resident 1")).unwrap();
        db.create_task(columns[1].id, new_task("Resident 2")).unwrap();

        let moved = db
            .update_task(
                task.id,
                TaskUpdate {
                    column_id: Some(columns[1].id),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(moved.column_id, columns[1].id);
        assert_eq!(moved.order, 3);
        assert!(db.list_tasks(columns[0].id).unwrap().is_empty());
    }

    #[test]
    fn moving_task_with_explicit_order() {
        let db = setup_db();
        let (_, columns) = board_with_columns(&db, "Board");
        let task = db.create_task(columns[0].id, new_task("Mover")).unwrap();

        let moved = db
            .update_task(
                task.id,
                TaskUpdate {
                    column_id: Some(columns[2].id),
                    order: Some(0),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(moved.order, 0);
    }

    #[test]
    fn moving_task_to_missing_column_fails() {
        let db = setup_db();
        let task = task_fixture(&db);

        let err = db
            .update_task(
                task.id,
                TaskUpdate {
                    column_id: Some(9999),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(db_error(err), DbError::ColumnNotFound(9999));
        assert_eq!(db.get_task(task.id).unwrap().unwrap().column_id, task.column_id);
    }

    #[test]
    fn update_missing_task_returns_none() {
        let db = setup_db();

        let result = db
            .update_task(
                3,
                TaskUpdate {
                    title: Some("Ghost".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn delete_task_cascades_to_subtasks() {
        let db = setup_db();
        let task = task_fixture(&db);
        let subtask = db.create_subtask(task.id, "Child").unwrap();

        assert!(db.delete_task(task.id).unwrap());

        assert!(db.get_subtask(subtask.id).unwrap().is_none());
        assert!(!db.delete_task(task.id).unwrap());
    }
}

mod subtask_tests {
    use super::*;

    #[test]
    fn create_subtask_defaults() {
        let db = setup_db();
        let task = task_fixture(&db);

        let first = db.create_subtask(task.id, "First").unwrap();
        let second = db.create_subtask(task.id, "Second").unwrap();

        assert!(!first.is_completed);
        assert_eq!(first.task_id, task.id);
        assert_eq!(first.order, 1);
        assert_eq!(second.order, 2);
    }

    #[test]
    fn create_subtask_on_missing_task_fails() {
        let db = setup_db();

        let err = db.create_subtask(12, "Orphan").unwrap_err();

        assert_eq!(db_error(err), DbError::TaskNotFound(12));
    }

    #[test]
    fn toggle_twice_restores_state() {
        let db = setup_db();
        let task = task_fixture(&db);
        let subtask = db.create_subtask(task.id, "Flip").unwrap();

        let once = db.toggle_subtask(subtask.id).unwrap().unwrap();
        let twice = db.toggle_subtask(subtask.id).unwrap().unwrap();

        assert!(once.is_completed);
        assert_eq!(twice.is_completed, subtask.is_completed);
    }

    #[test]
    fn toggle_missing_subtask_returns_none() {
        let db = setup_db();

        assert!(db.toggle_subtask(1).unwrap().is_none());
    }

    #[test]
    fn update_subtask_fields_independently() {
        let db = setup_db();
        let task = task_fixture(&db);
        let subtask = db.create_subtask(task.id, "Draft").unwrap();

        let completed = db
            .update_subtask(
                subtask.id,
                SubtaskUpdate {
                    title: None,
                    is_completed: Some(true),
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(completed.title, "Draft");
        assert!(completed.is_completed);

        let renamed = db
            .update_subtask(
                subtask.id,
                SubtaskUpdate {
                    title: Some("Final".into()),
                    is_completed: None,
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "Final");
        assert!(renamed.is_completed);
    }

    #[test]
    fn update_subtask_rejects_blank_title() {
        let db = setup_db();
        let task = task_fixture(&db);
        let subtask = db.create_subtask(task.id, "Keep").unwrap();

        let err = db
            .update_subtask(
                subtask.id,
                SubtaskUpdate {
                    title: Some("".into()),
                    is_completed: None,
                },
            )
            .unwrap_err();

        assert_eq!(db_error(err), DbError::EmptyField("Subtask title"));
        assert_eq!(db.get_subtask(subtask.id).unwrap().unwrap().title, "Keep");
    }

    #[test]
    fn reorder_assigns_array_index() {
        let db = setup_db();
        let task = task_fixture(&db);
        let s1 = db.create_subtask(task.id, "One").unwrap();
        let s2 = db.create_subtask(task.id, "Two").unwrap();
        let s3 = db.create_subtask(task.id, "Three").unwrap();

        let reordered = db.reorder_subtasks(task.id, &[s3.id, s1.id, s2.id]).unwrap();

        let ids: Vec<_> = reordered.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![s3.id, s1.id, s2.id]);
        assert_eq!(db.get_subtask(s3.id).unwrap().unwrap().order, 0);
        assert_eq!(db.get_subtask(s1.id).unwrap().unwrap().order, 1);
        assert_eq!(db.get_subtask(s2.id).unwrap().unwrap().order, 2);
    }

    #[test]
    fn reorder_ignores_foreign_subtasks() {
        let db = setup_db();
        let task = task_fixture(&db);
        let other_task = db
            .create_task(task.column_id, new_task("Other"))
            .unwrap();
        let mine = db.create_subtask(task.id, "Mine").unwrap();
        let theirs = db.create_subtask(other_task.id, "Theirs").unwrap();

        let reordered = db.reorder_subtasks(task.id, &[theirs.id, mine.id]).unwrap();

        assert_eq!(reordered.len(), 1);
        assert_eq!(reordered[0].order, 1);
        assert_eq!(db.get_subtask(theirs.id).unwrap().unwrap().order, theirs.order);
    }

    #[test]
    fn reorder_on_missing_task_fails() {
        let db = setup_db();

        let err = db.reorder_subtasks(41, &[1, 2]).unwrap_err();

        assert_eq!(db_error(err), DbError::TaskNotFound(41));
    }

    #[test]
    fn create_after_reorder_uses_max_plus_one() {
        let db = setup_db();
        let task = task_fixture(&db);
        let a = db.create_subtask(task.id, "A").unwrap();
        let b = db.create_subtask(task.id, "B").unwrap();
        db.reorder_subtasks(task.id, &[b.id, a.id]).unwrap();

        let c = db.create_subtask(task.id, "C").unwrap();

        assert_eq!(c.order, 2);
    }
}

mod snapshot_tests {
    use super::*;

    #[test]
    fn board_tree_nests_in_display_order() {
        let db = setup_db();
        let (board, columns) = board_with_columns(&db, "Tree");
        let task = db.create_task(columns[2].id, new_task("Leaf")).unwrap();
        db.create_subtask(task.id, "Twig").unwrap();

        let tree = db.board_tree(board.id).unwrap().unwrap();

        assert_eq!(tree.board, board);
        assert_eq!(tree.columns.len(), 3);
        assert_eq!(tree.columns[2].tasks.len(), 1);
        assert_eq!(tree.columns[2].tasks[0].task.subtasks_count, 1);
        assert_eq!(tree.columns[2].tasks[0].subtasks[0].title, "Twig");
        assert_eq!(tree.task_count(), 1);
    }

    #[test]
    fn board_tree_missing_board() {
        let db = setup_db();

        assert!(db.board_tree(8).unwrap().is_none());
    }

    #[test]
    fn export_lists_boards_oldest_first() {
        let db = setup_db();
        db.create_board("Alpha", &[]).unwrap();
        db.create_board("Beta", &[]).unwrap();

        let names: Vec<_> = db
            .export_boards()
            .unwrap()
            .into_iter()
            .map(|t| t.board.name)
            .collect();

        assert_eq!(names, vec!["Alpha", "Beta"]);
    }
}

mod seed_tests {
    use super::*;

    #[test]
    fn seed_loads_sample_boards() {
        let db = setup_db();

        let summary = db.seed().unwrap();

        assert_eq!(summary.boards, 3);
        assert_eq!(summary.columns, 9);
        assert_eq!(summary.tasks, 31);
        assert_eq!(summary.subtasks, 8);

        let trees = db.export_boards().unwrap();
        assert_eq!(trees[0].board.name, "Platform Launch");
        let column_names: Vec<_> = trees[0].columns.iter().map(|c| c.column.name.as_str()).collect();
        assert_eq!(column_names, vec!["TODO", "DOING", "DONE"]);
        let first_task = &trees[0].columns[0].tasks[0];
        assert_eq!(first_task.task.title, "Build UI for onboarding flow");
        assert_eq!(first_task.task.subtasks_count, 3);
        assert_eq!(first_task.task.completed_subtasks_count, 1);
        assert_eq!(first_task.subtasks[0].order, 0);
    }

    #[test]
    fn seed_replaces_existing_data() {
        let db = setup_db();
        db.create_board("Scratch", &default_columns()).unwrap();

        db.seed().unwrap();
        db.seed().unwrap();

        let names: Vec<_> = db.list_boards().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names.len(), 3);
        assert!(!names.contains(&"Scratch".to_string()));
    }
}
