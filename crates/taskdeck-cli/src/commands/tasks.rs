use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use taskdeck_core::route::Route;
use taskdeck_core::task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};

use super::enter;
use crate::bootstrap::AppContext;

/// Accepts RFC 3339 timestamps or plain dates (midnight UTC).
fn parse_due(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid due date {:?}", raw))?;
    date.and_hms_opt(0, 0, 0)
        .map(|at| at.and_utc())
        .ok_or_else(|| anyhow!("Invalid due date {:?}", raw))
}

fn summary(task: &Task) -> String {
    let due = task
        .due_date
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<12} {:<12} {:<10} {}",
        task.id,
        task.status.label(),
        due,
        task.title.as_deref().unwrap_or("(untitled)")
    )
}

fn print_details(task: &Task) {
    println!("id:          {}", task.id);
    println!("title:       {}", task.title.as_deref().unwrap_or(""));
    println!("status:      {}", task.status.label());
    if let Some(description) = &task.description {
        println!("description: {}", description);
    }
    if !task.categories.is_empty() {
        let names: Vec<&str> = task.categories.iter().map(|c| c.name.as_str()).collect();
        println!("categories:  {}", names.join(", "));
    }
    if let Some(created_at) = task.created_at {
        println!("created:     {}", created_at.to_rfc3339());
    }
    if let Some(due_date) = task.due_date {
        println!("due:         {}", due_date.to_rfc3339());
    }
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    enter(ctx, Route::Home)?;
    ctx.view.activate().await?;
    ctx.todos.fetch_todos().await?;

    let visible = ctx.view.view(&ctx.todos.todos()).await;
    if visible.is_empty() {
        println!("No tasks");
    }
    for task in &visible {
        println!("{}", summary(task));
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let id = TaskId::new(id);
    enter(ctx, Route::EditTodo { id: id.clone() })?;
    let task = ctx.todos.fetch_todo(&id).await?;
    print_details(&task);
    Ok(())
}

pub async fn add(
    ctx: &AppContext,
    title: String,
    description: Option<String>,
    due: Option<String>,
    categories: Vec<String>,
) -> Result<()> {
    enter(ctx, Route::NewTodo)?;
    let draft = TaskDraft {
        description,
        categories,
        due_date: due.as_deref().map(parse_due).transpose()?,
        ..TaskDraft::new(title)
    };
    let task = ctx.todos.add_todo(&draft).await?;
    println!("Created {}", summary(&task));
    Ok(())
}

pub async fn edit(
    ctx: &AppContext,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    due: Option<String>,
) -> Result<()> {
    let id = TaskId::new(id);
    enter(ctx, Route::EditTodo { id: id.clone() })?;
    let patch = TaskPatch {
        title,
        description,
        due_date: due.as_deref().map(parse_due).transpose()?,
        ..TaskPatch::default()
    };
    if patch.is_empty() {
        println!("Nothing to change");
        return Ok(());
    }
    let task = ctx.todos.update_todo(&id, &patch).await?;
    println!("Updated {}", summary(&task));
    Ok(())
}

pub async fn status(ctx: &AppContext, id: &str, status: &str) -> Result<()> {
    enter(ctx, Route::Home)?;
    if status.parse::<TaskStatus>().is_err() {
        println!("Unknown status {:?}; expected TODO, IN_PROGRESS or DONE", status);
        return Ok(());
    }
    let id = TaskId::new(id);
    ctx.todos.toggle_todo_status(&id, status).await?;
    println!("Task {} is now {}", id, status);
    Ok(())
}

pub async fn delete(ctx: &AppContext, id: &str) -> Result<()> {
    enter(ctx, Route::Home)?;
    let id = TaskId::new(id);
    ctx.todos.delete_todo(&id).await?;
    println!("Deleted {}", id);
    Ok(())
}
