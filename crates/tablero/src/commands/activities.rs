//! Activity command handlers.

use std::sync::Arc;

use tabled::Tabled;

use tablero_api::{ApiClient, RecordService};
use tablero_core::{Activity, ActivityPayload};

use crate::cli::{ActivitiesArgs, ActivitiesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Título")]
    title: String,
    #[tabled(rename = "Tipo")]
    kind: String,
    #[tabled(rename = "Descripción")]
    description: String,
}

impl From<&Activity> for ActivityRow {
    fn from(a: &Activity) -> Self {
        Self {
            id: a.id,
            title: a.title.clone(),
            kind: a.activity_type.to_string(),
            description: truncate(&a.description, 40),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Multi-line detail view for `get`.
fn detail(a: &Activity) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", a.id);
    let _ = writeln!(out, "Título:      {}", a.title);
    let _ = writeln!(out, "Tipo:        {}", a.activity_type);
    let _ = writeln!(out, "Descripción: {}", a.description);
    if let Some(ref url) = a.image_url {
        let _ = writeln!(out, "Imagen:      {url}");
    }
    if let Some(ref url) = a.resource_url {
        let _ = writeln!(out, "Recurso:     {url}");
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

fn service(client: Arc<ApiClient>) -> RecordService<Activity, ActivityPayload> {
    RecordService::new(client, "activities")
}

pub async fn handle(
    client: Arc<ApiClient>,
    args: ActivitiesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let svc = service(client);

    match args.command {
        ActivitiesCommand::List { filter } => {
            let mut activities = svc.list_all().await?;
            if let Some(needle) = filter {
                let needle = needle.to_lowercase();
                activities.retain(|a| a.title.to_lowercase().contains(&needle));
            }
            let out = output::render_list(
                &global.output,
                &activities,
                |a| ActivityRow::from(a),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ActivitiesCommand::Get { id } => {
            let activity = svc.get_by_id(id).await?;
            let out = output::render_single(&global.output, &activity, detail, |a| {
                a.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ActivitiesCommand::Create {
            title,
            description,
            r#type,
            image_url,
            resource_url,
        } => {
            let payload = ActivityPayload {
                title,
                description,
                activity_type: r#type.into(),
                image_url,
                resource_url,
            };
            let created = svc.create(&payload).await?;
            output::print_status(
                &format!("Registro creado exitosamente (id {})", created.id),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ActivitiesCommand::Update {
            id,
            title,
            description,
            r#type,
            image_url,
            resource_url,
        } => {
            // Partial flags merge over the current record.
            let current = svc.get_by_id(id).await?;
            let payload = ActivityPayload {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                activity_type: r#type.map_or(current.activity_type, Into::into),
                image_url: image_url.or(current.image_url),
                resource_url: resource_url.or(current.resource_url),
            };
            svc.update(id, &payload).await?;
            output::print_status(
                "Registro actualizado exitosamente",
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ActivitiesCommand::Delete { id } => {
            if !util::confirm(
                &format!("¿Eliminar la actividad {id}? Esta acción no se puede deshacer."),
                global.yes,
            )? {
                return Ok(());
            }
            svc.delete(id).await?;
            output::print_status(
                "Registro eliminado exitosamente",
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
