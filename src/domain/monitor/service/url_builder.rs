use crate::domain::monitor::error::{MonitorError, MonitorResult};
use crate::domain::monitor::model::UrlComponents;

/// Metrics path for a resource, relative to the API base:
/// `{sub}/resourceGroups/{rg}/providers/{provider}/{type}/{name}[/{subtype}/{subname}]/providers/microsoft.insights/metrics`.
///
/// Nested types pair up with the `/`-separated resource name, e.g.
/// `Microsoft.Storage/storageAccounts/blobServices` with `acct/default`.
pub fn build_metrics_path(components: &UrlComponents) -> MonitorResult<String> {
    let mut definition = components.metric_definition.split('/');
    let provider = definition.next().unwrap_or_default();
    let types: Vec<&str> = definition.collect();
    let names: Vec<&str> = components.resource_name.split('/').collect();

    if provider.is_empty() || types.is_empty() || types.len() != names.len() {
        return Err(MonitorError::Validation(format!(
            "metric definition '{}' does not match resource name '{}'",
            components.metric_definition, components.resource_name
        )));
    }

    let mut segments = vec![
        components.subscription.as_str(),
        "resourceGroups",
        components.resource_group.as_str(),
        "providers",
        provider,
    ];
    for (resource_type, name) in types.iter().zip(&names) {
        segments.push(*resource_type);
        segments.push(*name);
    }

    Ok(format!("{}/providers/microsoft.insights/metrics", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(definition: &str, name: &str) -> UrlComponents {
        UrlComponents {
            subscription: "sub1".into(),
            resource_group: "rg".into(),
            metric_definition: definition.into(),
            resource_name: name.into(),
        }
    }

    #[test]
    fn builds_simple_resource_path() {
        let path = build_metrics_path(&components("Microsoft.Compute/virtualMachines", "vm1")).unwrap();
        assert_eq!(
            path,
            "sub1/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1/providers/microsoft.insights/metrics"
        );
    }

    #[test]
    fn builds_nested_resource_path() {
        let path = build_metrics_path(&components(
            "Microsoft.Storage/storageAccounts/blobServices",
            "rn1/default",
        ))
        .unwrap();
        assert_eq!(
            path,
            "sub1/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/rn1/blobServices/default/providers/microsoft.insights/metrics"
        );
    }

    #[test]
    fn rejects_mismatched_segments() {
        assert!(matches!(
            build_metrics_path(&components("Microsoft.Storage/storageAccounts/blobServices", "rn1")),
            Err(MonitorError::Validation(_))
        ));
        assert!(build_metrics_path(&components("Microsoft.Compute", "vm1")).is_err());
    }
}
