//! TypeScript module generation for the merged icon data.

use minijinja::{context, AutoEscape, Environment, ErrorKind};
use serde::Serialize;

use crate::artifacts::{MergedMetadata, SvgTable};

const TEMPLATE_NAME: &str = "icons.ts";

/// Render `icons.ts` from merged artifacts.
///
/// The module exports the geometry table keyed by icon key, the icon list
/// and a union type of the categories.
pub fn render_typescript(
    metadata: &MergedMetadata,
    table: &SvgTable,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;

    let category_union = if metadata.categories.is_empty() {
        "string".to_string()
    } else {
        metadata
            .categories
            .iter()
            .map(|c| to_json(c))
            .collect::<Result<Vec<_>, _>>()?
            .join(" | ")
    };

    env.get_template(TEMPLATE_NAME)?.render(context! {
        file_id => &metadata.source.file_id,
        root_node_id => metadata.source.root_node_id.as_str(),
        exported_at => metadata.exported_at.to_rfc3339(),
        total => metadata.total,
        category_union => category_union,
        categories => to_json(&metadata.categories)?,
        icons => to_json(&metadata.icons)?,
        svgs => to_json(table)?,
    })
}

/// Pretty JSON for interpolation into the template.
fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, minijinja::Error> {
    serde_json::to_string_pretty(value)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

const TEMPLATE: &str = r#"// Generated by figsync from file {{ file_id }} (node {{ root_node_id }}).
// Exported at {{ exported_at }}. Do not edit by hand.

export type IconCategory = {{ category_union }};

export interface IconMeta {
  id: string;
  name: string;
  key: string;
  category: IconCategory;
}

export interface IconSvg {
  pathData: string;
  pathDataAll: string[];
  svgCode: string;
}

export const iconCount = {{ total }};

export const iconCategories: IconCategory[] = {{ categories }};

export const icons: IconMeta[] = {{ icons }};

export const iconSvgs: Record<string, IconSvg> = {{ svgs }};
"#;
