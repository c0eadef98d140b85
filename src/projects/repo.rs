use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Comma-joined tag list; split at the read surface.
    pub tech_stack: String,
    pub link: String,
    pub image_url: String,
}

/// Text fields of a project as submitted by the admin form.
/// Absent fields stay empty; the form is deliberately lenient.
#[derive(Debug, Clone, Default)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub link: String,
    pub tech_stack: String,
}

impl Project {
    /// All projects, most recently created first.
    pub async fn list_desc(db: &PgPool) -> anyhow::Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, tech_stack, link, image_url
            FROM projects
            ORDER BY id DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get(db: &PgPool, id: i64) -> anyhow::Result<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, tech_stack, link, image_url
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        fields: &ProjectFields,
        image_url: &str,
    ) -> anyhow::Result<Project> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, tech_stack, link, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, tech_stack, link, image_url
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.tech_stack)
        .bind(&fields.link)
        .bind(image_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Full replace of all text fields plus the image reference.
    /// Returns None when the id has no matching row.
    pub async fn update(
        db: &PgPool,
        id: i64,
        fields: &ProjectFields,
        image_url: &str,
    ) -> anyhow::Result<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET title = $2, description = $3, tech_stack = $4, link = $5, image_url = $6
            WHERE id = $1
            RETURNING id, title, description, tech_stack, link, image_url
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.tech_stack)
        .bind(&fields.link)
        .bind(image_url)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Returns false when the id has no matching row.
    /// The underlying blob is left in storage.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::services::PLACEHOLDER_IMAGE_URL;

    fn fields(title: &str) -> ProjectFields {
        ProjectFields {
            title: title.into(),
            description: "d".into(),
            link: "https://example.com".into(),
            tech_stack: "Rust".into(),
        }
    }

    #[sqlx::test]
    async fn create_then_list_returns_newest_first(db: PgPool) {
        let first = Project::create(&db, &fields("first"), PLACEHOLDER_IMAGE_URL)
            .await
            .unwrap();
        let second = Project::create(&db, &fields("second"), PLACEHOLDER_IMAGE_URL)
            .await
            .unwrap();
        assert!(second.id > first.id);

        let listed = Project::list_desc(&db).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[sqlx::test]
    async fn update_unknown_id_returns_none_and_leaves_store_unchanged(db: PgPool) {
        let existing = Project::create(&db, &fields("keep"), PLACEHOLDER_IMAGE_URL)
            .await
            .unwrap();

        let updated = Project::update(&db, existing.id + 1, &fields("stray"), "x")
            .await
            .unwrap();
        assert!(updated.is_none());

        let listed = Project::list_desc(&db).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "keep");
        assert_eq!(listed[0].image_url, PLACEHOLDER_IMAGE_URL);
    }

    #[sqlx::test]
    async fn delete_twice_reports_missing_row(db: PgPool) {
        let project = Project::create(&db, &fields("gone"), PLACEHOLDER_IMAGE_URL)
            .await
            .unwrap();

        assert!(Project::delete(&db, project.id).await.unwrap());
        let listed = Project::list_desc(&db).await.unwrap();
        assert!(listed.iter().all(|p| p.id != project.id));

        assert!(!Project::delete(&db, project.id).await.unwrap());
    }
}
