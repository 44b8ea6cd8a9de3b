/* Azure Monitor `metrics` endpoint payload */

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    #[serde(default)]
    pub value: Vec<MetricEntry>,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEntry {
    pub id: String,
    pub name: LocalizedName,
    #[serde(default)]
    pub unit: String,
    /// Some API versions repeat the namespace per entry.
    pub namespace: Option<String>,
    #[serde(default)]
    pub timeseries: Vec<Timeseries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    #[serde(default)]
    pub localized_value: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Timeseries {
    #[serde(default)]
    pub metadatavalues: Vec<MetadataValue>,
    #[serde(default)]
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataValue {
    pub name: LocalizedName,
    #[serde(default)]
    pub value: String,
}

/// All five aggregations are present on the wire; only the requested one is meaningful.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub time_stamp: DateTime<Utc>,
    pub average: Option<f64>,
    pub total: Option<f64>,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    pub count: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_dimensioned_payload() {
        let body = r#"{
            "cost": 0,
            "timespan": "2019-02-08T10:13:50Z/2019-02-08T16:13:50Z",
            "interval": "PT1M",
            "value": [{
                "id": "/subscriptions/sub/resourceGroups/grafanastaging/providers/Microsoft.Storage/storageAccounts/grafanastaging/blobServices/default/providers/Microsoft.Insights/metrics/BlobCount",
                "type": "Microsoft.Insights/metrics",
                "name": { "value": "BlobCount", "localizedValue": "Blob Count" },
                "unit": "Count",
                "timeseries": [{
                    "metadatavalues": [{ "name": { "value": "blobtype", "localizedValue": "blobtype" }, "value": "PageBlob" }],
                    "data": [{ "timeStamp": "2019-02-08T10:13:00Z", "average": 3 }]
                }]
            }],
            "namespace": "Microsoft.Storage/storageAccounts/blobServices",
            "resourceregion": "westeurope"
        }"#;

        let response: MetricsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.namespace, "Microsoft.Storage/storageAccounts/blobServices");
        let entry = &response.value[0];
        assert_eq!(entry.name.localized_value, "Blob Count");
        assert_eq!(entry.timeseries[0].metadatavalues[0].value, "PageBlob");
        let point = &entry.timeseries[0].data[0];
        assert_eq!(point.average, Some(3.0));
        assert_eq!(point.count, None);
    }
}
