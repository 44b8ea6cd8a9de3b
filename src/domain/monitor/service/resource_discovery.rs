use std::collections::HashSet;

use tracing::debug;

use crate::domain::monitor::error::MonitorResult;
use crate::domain::monitor::model::{DiscoveryFilter, Resource};
use crate::domain::monitor::service::request_executor::RequestExecutor;

/// Lists resources in every subscription of `filter` and keeps those whose
/// group, location and type all match. Any failing list call aborts discovery.
///
/// De-duplicated by resource id; first occurrence wins and order follows
/// the subscriptions.
pub async fn discover(executor: &RequestExecutor<'_>, filter: &DiscoveryFilter) -> MonitorResult<Vec<Resource>> {
    let mut seen = HashSet::new();
    let mut resources = Vec::new();

    for subscription_id in &filter.subscriptions {
        let listed = executor.execute_resource_list(subscription_id).await?;
        debug!(subscription = %subscription_id, count = listed.value.len(), "listed resources");

        for entry in listed.value {
            let resource = Resource {
                id: entry.id,
                name: entry.name,
                resource_type: entry.resource_type,
                location: entry.location,
                subscription_id: subscription_id.clone(),
            };

            if matches_filter(&resource, filter) && seen.insert(resource.key().to_string()) {
                resources.push(resource);
            }
        }
    }

    debug!(matched = resources.len(), resource_type = %filter.resource_type, "resource discovery finished");
    Ok(resources)
}

fn matches_filter(resource: &Resource, filter: &DiscoveryFilter) -> bool {
    filter.resource_groups.iter().any(|g| g == resource.resource_group())
        && filter.locations.iter().any(|l| *l == resource.location)
        && filter.resource_type == resource.resource_type
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::cancel::CancelSignal;
    use crate::domain::monitor::error::MonitorError;
    use crate::domain::monitor::service::request_executor::tests::MockSender;

    const VM_TYPE: &str = "Microsoft.Compute/virtualMachines";

    fn filter(subscriptions: &[&str]) -> DiscoveryFilter {
        DiscoveryFilter {
            subscriptions: subscriptions.iter().map(|s| s.to_string()).collect(),
            resource_groups: vec!["rg1".into(), "rg2".into()],
            locations: vec!["westeurope".into()],
            resource_type: VM_TYPE.into(),
        }
    }

    fn body(entries: &[(&str, &str, &str, &str)]) -> String {
        let value: Vec<_> = entries
            .iter()
            .map(|(id, name, ty, location)| {
                serde_json::json!({ "id": id, "name": name, "type": ty, "location": location })
            })
            .collect();
        serde_json::json!({ "value": value }).to_string()
    }

    #[tokio::test]
    async fn keeps_only_matching_resources() {
        let sender = MockSender::default().with(
            "sub1/resources",
            200,
            &body(&[
                ("/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachines/vm1", "vm1", VM_TYPE, "westeurope"),
                ("/subscriptions/sub1/resourceGroups/rg3/providers/Microsoft.Compute/virtualMachines/vm2", "vm2", VM_TYPE, "westeurope"),
                ("/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachines/vm3", "vm3", VM_TYPE, "eastus"),
                ("/subscriptions/sub1/resourceGroups/rg2/providers/Microsoft.Web/sites/app", "app", "Microsoft.Web/sites", "westeurope"),
                ("/subscriptions/sub1/resourceGroups/rg2/providers/Microsoft.Compute/virtualMachines/vm4", "vm4", VM_TYPE, "westeurope"),
            ]),
        );
        let cancel = CancelSignal::never();
        let executor = RequestExecutor::new(&sender, &cancel);

        let resources = discover(&executor, &filter(&["sub1"])).await.unwrap();

        let names: Vec<_> = resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["vm1", "vm4"]);
        assert!(resources.iter().all(|r| r.subscription_id == "sub1"));
    }

    #[tokio::test]
    async fn deduplicates_across_subscriptions() {
        let shared = "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachines/vm1";
        let sender = MockSender::default()
            .with("sub1/resources", 200, &body(&[(shared, "vm1", VM_TYPE, "westeurope")]))
            .with("sub2/resources", 200, &body(&[(shared, "vm1", VM_TYPE, "westeurope")]));
        let cancel = CancelSignal::never();
        let executor = RequestExecutor::new(&sender, &cancel);

        let resources = discover(&executor, &filter(&["sub1", "sub2"])).await.unwrap();

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].subscription_id, "sub1");
        assert_eq!(sender.paths(), vec!["sub1/resources", "sub2/resources"]);
    }

    #[tokio::test]
    async fn failing_subscription_aborts_discovery() {
        let sender = MockSender::default()
            .with("sub1/resources", 200, &body(&[]))
            .failing("sub2/resources", MonitorError::Transport("connection reset".into()));
        let cancel = CancelSignal::never();
        let executor = RequestExecutor::new(&sender, &cancel);

        let err = discover(&executor, &filter(&["sub1", "sub2"])).await.unwrap_err();
        assert_eq!(err, MonitorError::Transport("connection reset".into()));
    }
}
