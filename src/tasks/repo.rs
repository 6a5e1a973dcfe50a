use crate::error::AppResult;
use crate::tasks::repo_types::{Task, TaskStatus};
use sqlx::PgPool;
use uuid::Uuid;

impl Task {
    /// All tasks owned by `user_id`, most recent first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> AppResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, content, status, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// `None` covers both "no such task" and "owned by someone else";
    /// callers cannot tell the two apart.
    pub async fn find_by_id(db: &PgPool, user_id: Uuid, task_id: Uuid) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, content, status, created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        content: &str,
        status: TaskStatus,
    ) -> AppResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, content, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, content, status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(status)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    /// Single conditional statement: the owner filter and the write happen
    /// atomically, so there is no check-then-write window. Zero rows
    /// matched (`None`) is the sole not-found-or-forbidden signal.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        task_id: Uuid,
        title: &str,
        content: &str,
        status: TaskStatus,
    ) -> AppResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, content = $4, status = $5, updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, content, status, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(status)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Ownership-filtered delete; returns the affected-row count.
    pub async fn delete(db: &PgPool, user_id: Uuid, task_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
