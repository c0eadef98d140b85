use serde::Serialize;

use super::repo::Project;

pub const TECH_STACK_DELIMITER: char = ',';

pub fn join_tech_stack(tags: &[String]) -> String {
    tags.join(&TECH_STACK_DELIMITER.to_string())
}

/// Empty stored string means no tags, not one empty tag.
pub fn split_tech_stack(stored: &str) -> Vec<String> {
    if stored.is_empty() {
        return Vec::new();
    }
    stored
        .split(TECH_STACK_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// Shape of one project on the public JSON surface.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub link: String,
    pub image_url: String,
}

impl From<Project> for ProjectView {
    fn from(p: Project) -> Self {
        Self {
            title: p.title,
            description: p.description,
            tech_stack: split_tech_stack(&p.tech_stack),
            link: p.link,
            image_url: p.image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_empty_is_empty() {
        assert!(split_tech_stack("").is_empty());
    }

    #[test]
    fn split_preserves_order() {
        assert_eq!(split_tech_stack("Go,Rust"), vec!["Go", "Rust"]);
    }

    #[test]
    fn join_then_split_roundtrip() {
        let tags: Vec<String> = vec!["Rust".into(), "Postgres".into(), "axum".into()];
        assert_eq!(split_tech_stack(&join_tech_stack(&tags)), tags);

        let empty: Vec<String> = Vec::new();
        assert_eq!(split_tech_stack(&join_tech_stack(&empty)), empty);
    }

    #[test]
    fn view_serializes_per_contract() {
        let view = ProjectView::from(Project {
            id: 1,
            title: "X".into(),
            description: "d".into(),
            tech_stack: "Go".into(),
            link: "https://example.com".into(),
            image_url: "https://blob.test/p.png".into(),
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "X");
        assert_eq!(json["tech_stack"], serde_json::json!(["Go"]));
        assert_eq!(json["image_url"], "https://blob.test/p.png");
        assert!(json.get("id").is_none());
    }
}
