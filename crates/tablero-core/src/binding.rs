// ── Resource bindings ──
//
// The thinnest layer: per resource, the endpoint name, display strings,
// and the column descriptors that the table model and renderer consume.
// No logic beyond composition.

use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::model::ActivityType;
use crate::table::{CellRender, ColumnDescriptor, actions_column};

/// Everything a generic resource screen needs besides the service:
/// wire endpoint, copy, and the table shape.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    /// Path segment under `/api/`.
    pub endpoint: String,
    pub title: String,
    pub description: String,
    pub create_button_label: String,
    /// Column key the text filter applies to.
    pub search_column: String,
    pub search_placeholder: String,
    pub columns: Vec<ColumnDescriptor>,
}

/// Binding for the activities resource.
pub fn activities_binding() -> ResourceBinding {
    let type_labels: IndexMap<String, String> = ActivityType::iter()
        .map(|t| (t.wire_value().to_owned(), t.to_string()))
        .collect();

    ResourceBinding {
        endpoint: "activities".to_owned(),
        title: "Actividades".to_owned(),
        description: "Gestión de actividades y recursos".to_owned(),
        create_button_label: "Crear actividad".to_owned(),
        search_column: "title".to_owned(),
        search_placeholder: "Buscar...".to_owned(),
        columns: vec![
            ColumnDescriptor::new("id", "ID").sortable().fixed(),
            ColumnDescriptor::new("title", "Título")
                .sortable()
                .filterable(),
            ColumnDescriptor::new("description", "Descripción")
                .render(CellRender::Truncate(40)),
            ColumnDescriptor::new("type", "Tipo").render(CellRender::Badge(type_labels)),
            actions_column(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activities_binding_shape() {
        let binding = activities_binding();
        assert_eq!(binding.endpoint, "activities");
        assert_eq!(binding.search_column, "title");

        let keys: Vec<&str> = binding.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "title", "description", "type", "__actions"]);

        let type_col = &binding.columns[3];
        let CellRender::Badge(labels) = &type_col.render else {
            panic!("type column should render as badge");
        };
        assert_eq!(labels.get("DIGITAL").map(String::as_str), Some("Digital"));
        assert_eq!(
            labels.get("NON_DIGITAL").map(String::as_str),
            Some("No Digital")
        );
    }
}
