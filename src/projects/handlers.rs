use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{auth::extractors::AdminSession, error::AppError, state::AppState};

use super::dto::{join_tech_stack, ProjectView};
use super::repo::{Project, ProjectFields};
use super::services::{image_url_for_create, image_url_for_update, ImageUpload};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/api/projects", get(list_projects_json))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard).post(create_project))
        .route("/admin/projects/:id/edit", post(edit_project))
        .route("/admin/projects/:id/delete", post(delete_project))
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
}

// --- public surface ---

#[derive(Debug, Deserialize)]
struct HomeQuery {
    notice: Option<String>,
}

#[instrument(skip(state))]
async fn home(
    State(state): State<AppState>,
    Query(q): Query<HomeQuery>,
) -> Result<Html<String>, AppError> {
    let projects = Project::list_desc(&state.db).await?;
    let notice = q.notice.as_deref().and_then(notice_text);
    Ok(Html(home_html(notice, &projects)))
}

/// Transient notices carried back from the contact relay via `?notice=`.
fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "sent" => Some("Message sent successfully!"),
        "send-failed" => Some("Error sending message. Please try again later."),
        _ => None,
    }
}

#[instrument(skip(state))]
async fn list_projects_json(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectView>>, AppError> {
    let projects = Project::list_desc(&state.db).await?;
    Ok(Json(projects.into_iter().map(ProjectView::from).collect()))
}

// --- admin surface ---

#[instrument(skip(state))]
async fn dashboard(
    State(state): State<AppState>,
    AdminSession(_user_id): AdminSession,
) -> Result<Html<String>, AppError> {
    let projects = Project::list_desc(&state.db).await?;
    Ok(Html(dashboard_html(&projects)))
}

#[instrument(skip(state, mp))]
async fn create_project(
    State(state): State<AppState>,
    AdminSession(user_id): AdminSession,
    mp: Multipart,
) -> Result<Redirect, AppError> {
    let (fields, image) = parse_project_form(mp).await?;
    let image_url = image_url_for_create(&state, image).await;
    let project = Project::create(&state.db, &fields, &image_url).await?;
    info!(project_id = project.id, user_id, "project created");
    Ok(Redirect::to("/admin/dashboard"))
}

#[instrument(skip(state, mp))]
async fn edit_project(
    State(state): State<AppState>,
    AdminSession(user_id): AdminSession,
    Path(id): Path<i64>,
    mp: Multipart,
) -> Result<Redirect, AppError> {
    let Some(existing) = Project::get(&state.db, id).await? else {
        return Err(AppError::NotFound("project"));
    };
    // Full replace: fields the form omits come back empty.
    let (fields, image) = parse_project_form(mp).await?;
    let image_url = image_url_for_update(&state, &existing.image_url, image).await;
    if Project::update(&state.db, id, &fields, &image_url).await?.is_none() {
        return Err(AppError::NotFound("project"));
    }
    info!(project_id = id, user_id, "project updated");
    Ok(Redirect::to("/admin/dashboard"))
}

#[instrument(skip(state))]
async fn delete_project(
    State(state): State<AppState>,
    AdminSession(user_id): AdminSession,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !Project::delete(&state.db, id).await? {
        return Err(AppError::NotFound("project"));
    }
    info!(project_id = id, user_id, "project deleted");
    Ok(Redirect::to("/admin/dashboard"))
}

/// Pulls the project text fields, repeated tech_stack entries and the
/// optional image out of the multipart form. An image part with an empty
/// filename or empty body counts as no image.
async fn parse_project_form(
    mut mp: Multipart,
) -> Result<(ProjectFields, Option<ImageUpload>), AppError> {
    let mut fields = ProjectFields::default();
    let mut tags: Vec<String> = Vec::new();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = mp.next_field().await.map_err(to_internal)? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        match name.as_str() {
            "title" => fields.title = field.text().await.map_err(to_internal)?,
            "description" => fields.description = field.text().await.map_err(to_internal)?,
            "link" => fields.link = field.text().await.map_err(to_internal)?,
            "tech_stack" => tags.push(field.text().await.map_err(to_internal)?),
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(to_internal)?;
                if !filename.is_empty() && !body.is_empty() {
                    image = Some(ImageUpload {
                        filename,
                        content_type,
                        body,
                    });
                }
            }
            _ => {}
        }
    }

    fields.tech_stack = join_tech_stack(&tags);
    Ok((fields, image))
}

fn to_internal(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Internal(anyhow::anyhow!(e))
}

// --- inline pages (no template engine; rendering is not this service's job) ---

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn project_item(p: &Project) -> String {
    format!(
        "<li><img src=\"{}\" alt=\"\" width=\"200\"><h2>{}</h2><p>{}</p>\
         <p>{}</p><a href=\"{}\">{}</a></li>",
        escape(&p.image_url),
        escape(&p.title),
        escape(&p.description),
        escape(&p.tech_stack),
        escape(&p.link),
        escape(&p.link),
    )
}

fn home_html(notice: Option<&str>, projects: &[Project]) -> String {
    let notice = notice
        .map(|n| format!("<p class=\"notice\">{n}</p>"))
        .unwrap_or_default();
    let items: String = projects.iter().map(project_item).collect();
    format!(
        "<!doctype html><html><head><title>Portfolio</title></head><body>\
         <h1>Projects</h1><ul>{items}</ul>\
         <section id=\"contact\">{notice}\
         <form method=\"post\" action=\"/send-message\">\
         <input name=\"name\" placeholder=\"Name\">\
         <input name=\"email\" placeholder=\"Email\">\
         <input name=\"phone\" placeholder=\"Phone\">\
         <input name=\"subject\" placeholder=\"Subject\">\
         <textarea name=\"message\" placeholder=\"Message\"></textarea>\
         <button type=\"submit\">Send</button>\
         </form></section></body></html>"
    )
}

fn dashboard_html(projects: &[Project]) -> String {
    let items: String = projects
        .iter()
        .map(|p| {
            format!(
                "<li>#{} {} \
                 <form method=\"post\" action=\"/admin/projects/{}/edit\" \
                 enctype=\"multipart/form-data\">\
                 <input name=\"title\" value=\"{}\">\
                 <textarea name=\"description\">{}</textarea>\
                 <input name=\"link\" value=\"{}\">\
                 <input name=\"tech_stack\" value=\"{}\">\
                 <input type=\"file\" name=\"image\">\
                 <button type=\"submit\">Save</button></form>\
                 <form method=\"post\" action=\"/admin/projects/{}/delete\">\
                 <button type=\"submit\">Delete</button></form></li>",
                p.id,
                escape(&p.title),
                p.id,
                escape(&p.title),
                escape(&p.description),
                escape(&p.link),
                escape(&p.tech_stack),
                p.id,
            )
        })
        .collect();
    format!(
        "<!doctype html><html><head><title>Dashboard</title></head><body>\
         <h1>Dashboard</h1><a href=\"/logout\">Log out</a>\
         <form method=\"post\" action=\"/admin/dashboard\" enctype=\"multipart/form-data\">\
         <input name=\"title\" placeholder=\"Title\">\
         <textarea name=\"description\" placeholder=\"Description\"></textarea>\
         <input name=\"link\" placeholder=\"Link\">\
         <input name=\"tech_stack\" placeholder=\"Tech\">\
         <input type=\"file\" name=\"image\">\
         <button type=\"submit\">Create</button>\
         </form><ul>{items}</ul></body></html>"
    )
}
