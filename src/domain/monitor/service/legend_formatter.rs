//! Series naming, including `{{token}}` alias templates.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::monitor::model::resource_group_from_id;

static LEGEND_KEY_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(.+?)\s*\}\}").expect("legend key pattern is valid"));

/// Values a legend template may reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegendContext<'a> {
    pub resource_name: &'a str,
    pub metric_name: &'a str,
    pub dimension_name: &'a str,
    pub dimension_value: &'a str,
    pub namespace: &'a str,
    /// Full metric id; the resource group is read out of it.
    pub series_id: &'a str,
}

/// Builds a series name. Without an alias: `resource{dim=value}.metric` or
/// `resource.metric`. With an alias, known tokens are substituted and
/// unknown ones are left as written.
pub fn format_legend_key(alias: &str, ctx: &LegendContext<'_>) -> String {
    if alias.is_empty() {
        if !ctx.dimension_name.is_empty() {
            return format!(
                "{}{{{}={}}}.{}",
                ctx.resource_name, ctx.dimension_name, ctx.dimension_value, ctx.metric_name
            );
        }
        return format!("{}.{}", ctx.resource_name, ctx.metric_name);
    }

    let resource_group = resource_group_from_id(ctx.series_id);

    LEGEND_KEY_FORMAT
        .replace_all(alias, |caps: &Captures<'_>| {
            match caps[1].to_lowercase().as_str() {
                "resourcegroup" => resource_group.to_string(),
                "namespace" => ctx.namespace.to_string(),
                "resourcename" => ctx.resource_name.to_string(),
                "metric" => ctx.metric_name.to_string(),
                "dimensionname" => ctx.dimension_name.to_string(),
                "dimensionvalue" => ctx.dimension_value.to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERIES_ID: &str = "/subscriptions/s/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachines/vm1/providers/Microsoft.Insights/metrics/Percentage CPU";

    fn ctx<'a>(dimension_name: &'a str, dimension_value: &'a str) -> LegendContext<'a> {
        LegendContext {
            resource_name: "vm1",
            metric_name: "Percentage CPU",
            dimension_name,
            dimension_value,
            namespace: "Microsoft.Compute/virtualMachines",
            series_id: SERIES_ID,
        }
    }

    #[test]
    fn default_name_without_dimension() {
        assert_eq!(format_legend_key("", &ctx("", "")), "vm1.Percentage CPU");
    }

    #[test]
    fn default_name_with_dimension() {
        assert_eq!(format_legend_key("", &ctx("blade", "x")), "vm1{blade=x}.Percentage CPU");
    }

    #[test]
    fn substitutes_all_known_tokens() {
        let alias = "{{resourcegroup}} | {{ Namespace }} | {{resourceName}} | {{metric}} | {{dimensionname}}={{DIMENSIONVALUE}}";
        assert_eq!(
            format_legend_key(alias, &ctx("blade", "x")),
            "rg1 | Microsoft.Compute/virtualMachines | vm1 | Percentage CPU | blade=x"
        );
    }

    #[test]
    fn resource_group_template() {
        let context = LegendContext {
            series_id: "/subscriptions/s/resourceGroups/rg1/providers/x",
            ..ctx("", "")
        };
        assert_eq!(
            format_legend_key("{{resourcegroup}}/{{metric}}", &context),
            "rg1/Percentage CPU"
        );
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(
            format_legend_key("{{ unknown }}-{{metric}}", &ctx("", "")),
            "{{ unknown }}-Percentage CPU"
        );
    }

    #[test]
    fn missing_anchor_gives_empty_resource_group() {
        let context = LegendContext {
            series_id: "/subscriptions/s/metrics/cpu",
            ..ctx("", "")
        };
        assert_eq!(format_legend_key("[{{resourcegroup}}]", &context), "[]");
    }
}
