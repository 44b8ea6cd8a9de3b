//! Runs a batch of queries: compile, execute, normalize, merge per refId.

use std::collections::BTreeMap;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::core::client::cancel::CancelSignal;
use crate::core::client::monitor_client::RequestSender;
use crate::domain::monitor::error::MonitorResult;
use crate::domain::monitor::model::query_model::QueryModel;
use crate::domain::monitor::model::{CompiledQuery, QueryResult, QuerySpec, TimeRange};
use crate::domain::monitor::service::query_compiler;
use crate::domain::monitor::service::request_executor::RequestExecutor;
use crate::domain::monitor::service::response_normalizer::normalize;

/// Validates raw dashboard queries. Unknown query modes are dropped.
pub fn specs_from_models(models: Vec<QueryModel>, default_subscription: &str) -> MonitorResult<Vec<QuerySpec>> {
    let mut specs = Vec::with_capacity(models.len());
    for model in models {
        if let Some(spec) = model.into_spec(default_subscription)? {
            specs.push(spec);
        }
    }
    Ok(specs)
}

/// Executes every spec and returns results keyed by refId, each with its
/// series sorted by name.
///
/// Compilation and discovery failures abort the run, as does cancellation.
/// Fetch and decode failures of one compiled query are recorded on its
/// result and the batch continues.
pub async fn run(
    sender: &dyn RequestSender,
    specs: &[QuerySpec],
    time_range: &TimeRange,
    cancel: &CancelSignal,
) -> MonitorResult<BTreeMap<String, QueryResult>> {
    let span = info_span!("monitor_query_run", run_id = %Uuid::new_v4(), queries = specs.len());
    run_inner(sender, specs, time_range, cancel).instrument(span).await
}

async fn run_inner(
    sender: &dyn RequestSender,
    specs: &[QuerySpec],
    time_range: &TimeRange,
    cancel: &CancelSignal,
) -> MonitorResult<BTreeMap<String, QueryResult>> {
    let executor = RequestExecutor::new(sender, cancel);

    // Every spec gets a result, even when discovery matched nothing.
    let mut results: BTreeMap<String, QueryResult> = BTreeMap::new();
    let mut compiled = Vec::new();
    for spec in specs {
        compiled.extend(query_compiler::compile(spec, time_range, &executor).await?);
        results.entry(spec.ref_id.clone()).or_insert_with(|| QueryResult {
            ref_id: spec.ref_id.clone(),
            ..Default::default()
        });
    }
    debug!(compiled = compiled.len(), "queries compiled");

    for query in &compiled {
        if let Some(result) = results.get_mut(&query.ref_id) {
            execute_into(&executor, query, result).await?;
        }
    }

    for result in results.values_mut() {
        result.series.sort_by(|a, b| a.name.cmp(&b.name));
    }

    info!(results = results.len(), "query run finished");
    Ok(results)
}

async fn execute_into(
    executor: &RequestExecutor<'_>,
    query: &CompiledQuery,
    result: &mut QueryResult,
) -> MonitorResult<()> {
    if result.meta.raw_query.is_none() {
        result.meta.raw_query = Some(query.target.clone());
    }

    let span = info_span!("monitor_query", ref_id = %query.ref_id, url = %query.url, target = %query.target);
    match executor.execute(query).instrument(span).await {
        Ok(response) => {
            if result.meta.unit.is_none() {
                result.meta.unit = response.value.first().map(|entry| entry.unit.clone());
            }
            result.series.extend(normalize(&response, query));
            Ok(())
        }
        Err(err) if err.is_query_scoped() => {
            warn!(ref_id = %query.ref_id, url = %query.url, error = %err, "query failed");
            result.error.get_or_insert_with(|| err.to_string());
            Ok(())
        }
        Err(err) => Err(err),
    }
}
