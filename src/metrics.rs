use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use aws_sdk_cloudwatch::Client as CloudWatchClient;
use aws_smithy_types::DateTime;
use chrono::{Duration, Utc};
use tracing::{debug, info};

use crate::error::NotifierError;
use crate::events::{ForwardedAlarmEvent, NOT_AVAILABLE};

pub const ECS_NAMESPACE: &str = "AWS/ECS";
pub const PERIOD_SECONDS: i32 = 300;
pub const NO_DATA: &str = "데이터 없음";

/// ECS service metric an alarm watches, inferred from the alarm name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageMetric {
    Cpu,
    Memory,
}

impl UsageMetric {
    pub fn metric_name(&self) -> &'static str {
        match self {
            UsageMetric::Cpu => "CPUUtilization",
            UsageMetric::Memory => "MemoryUtilization",
        }
    }
}

/// Alarms are named by the stack that creates them (`...CpuAlarm...`,
/// `...MemoryAlarm...`); anything else carries no usage metric.
pub fn classify(alarm_name: &str) -> Option<UsageMetric> {
    if alarm_name.contains("CpuAlarm") {
        Some(UsageMetric::Cpu)
    } else if alarm_name.contains("MemoryAlarm") {
        Some(UsageMetric::Memory)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<(String, String)>,
    /// Inclusive start, exclusive end.
    pub window: (chrono::DateTime<Utc>, chrono::DateTime<Utc>),
    pub period_seconds: i32,
}

impl MetricQuery {
    /// The last five minutes of `metric` for one ECS service.
    pub fn last_window(metric: UsageMetric, cluster_name: &str, service_name: &str) -> Self {
        let end = Utc::now();
        MetricQuery {
            namespace: ECS_NAMESPACE.to_string(),
            metric_name: metric.metric_name().to_string(),
            dimensions: vec![
                ("ClusterName".to_string(), cluster_name.to_string()),
                ("ServiceName".to_string(), service_name.to_string()),
            ],
            window: (end - Duration::seconds(PERIOD_SECONDS.into()), end),
            period_seconds: PERIOD_SECONDS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Epoch seconds of the datapoint.
    pub timestamp: i64,
    pub average: f64,
}

#[async_trait]
pub trait MetricsBackend: Send + Sync {
    async fn average(&self, query: &MetricQuery) -> Result<Vec<MetricSample>, NotifierError>;
}

pub type DynMetricsBackend = Arc<dyn MetricsBackend>;

#[async_trait]
impl MetricsBackend for CloudWatchClient {
    async fn average(&self, query: &MetricQuery) -> Result<Vec<MetricSample>, NotifierError> {
        let dimensions = query
            .dimensions
            .iter()
            .map(|(name, value)| Dimension::builder().name(name).value(value).build())
            .collect::<Vec<_>>();

        let response = self
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .set_dimensions(Some(dimensions))
            .start_time(DateTime::from_secs(query.window.0.timestamp()))
            .end_time(DateTime::from_secs(query.window.1.timestamp()))
            .period(query.period_seconds)
            .statistics(Statistic::Average)
            .send()
            .await
            .map_err(|error| NotifierError::Metrics {
                metric_name: query.metric_name.clone(),
                message: error.into_service_error().to_string(),
            })?;

        Ok(samples_from(response.datapoints()))
    }
}

// datapoints without a timestamp or an average are dropped
fn samples_from(datapoints: &[Datapoint]) -> Vec<MetricSample> {
    datapoints
        .iter()
        .filter_map(|dp| {
            Some(MetricSample {
                timestamp: dp.timestamp()?.secs(),
                average: dp.average()?,
            })
        })
        .collect()
}

/// Text for the usage line of an enriched alarm: the latest five minute
/// average as `12.34%`, [NO_DATA] when the backend has nothing, or
/// [NOT_AVAILABLE] when the alarm name maps to no metric (no query is made).
pub async fn usage_message(
    backend: &dyn MetricsBackend,
    event: &ForwardedAlarmEvent,
) -> Result<String, NotifierError> {
    let Some(metric) = classify(&event.alarm_name) else {
        debug!("alarm {} has no usage metric", event.alarm_name);
        return Ok(NOT_AVAILABLE.to_string());
    };

    let query = MetricQuery::last_window(metric, &event.cluster_name, &event.service_name);
    info!(
        "querying {} {} for {}/{}",
        query.namespace, query.metric_name, event.cluster_name, event.service_name
    );
    let samples = backend.average(&query).await?;

    Ok(match samples.iter().max_by_key(|s| s.timestamp) {
        Some(latest) => format!("{:.2}%", latest.average),
        None => NO_DATA.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use aws_config::BehaviorVersion;
    use aws_smithy_runtime::client::http::test_util::{ReplayEvent, StaticReplayClient};
    use aws_smithy_types::body::SdkBody;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        samples: Vec<MetricSample>,
        queries: Mutex<Vec<MetricQuery>>,
    }

    #[async_trait]
    impl MetricsBackend for FakeBackend {
        async fn average(&self, query: &MetricQuery) -> Result<Vec<MetricSample>, NotifierError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.samples.clone())
        }
    }

    fn alarm(name: &str) -> ForwardedAlarmEvent {
        ForwardedAlarmEvent {
            alarm_name: name.to_string(),
            state: "ALARM".to_string(),
            reason: "Threshold Crossed".to_string(),
            timestamp: "t0".to_string(),
            cluster_name: "c1".to_string(),
            service_name: "s1".to_string(),
        }
    }

    fn mock_cloudwatch_client(status: u16, body: &str) -> CloudWatchClient {
        let replay_event = ReplayEvent::new(
            http::Request::builder().body(SdkBody::from("")).unwrap(),
            http::Response::builder()
                .status(status)
                .body(SdkBody::from(body.to_string()))
                .unwrap(),
        );

        let conf = aws_sdk_cloudwatch::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(aws_sdk_cloudwatch::config::Credentials::new(
                "SOMETESTKEYID",
                "somesecretkey",
                Some("somesessiontoken".to_string()),
                None,
                "",
            ))
            .region(aws_sdk_cloudwatch::config::Region::new("ap-northeast-2"))
            .http_client(StaticReplayClient::new(vec![replay_event]))
            .build();

        CloudWatchClient::from_conf(conf)
    }

    #[test]
    fn test_samples_from_datapoints() {
        let datapoints = vec![
            Datapoint::builder()
                .timestamp(DateTime::from_secs(1_700_000_000))
                .average(42.5)
                .build(),
            Datapoint::builder().average(10.0).build(),
            Datapoint::builder()
                .timestamp(DateTime::from_secs(1_700_000_300))
                .build(),
            Datapoint::builder()
                .timestamp(DateTime::from_secs(1_700_000_600))
                .average(0.0)
                .maximum(99.0)
                .build(),
        ];
        assert_eq!(
            samples_from(&datapoints),
            vec![
                MetricSample { timestamp: 1_700_000_000, average: 42.5 },
                MetricSample { timestamp: 1_700_000_600, average: 0.0 },
            ]
        );
        assert!(samples_from(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_cloudwatch_error_is_metrics_error() {
        let client = mock_cloudwatch_client(
            400,
            r#"<ErrorResponse xmlns="http://monitoring.amazonaws.com/doc/2010-08-01/"><Error><Type>Sender</Type><Code>InvalidParameterValue</Code><Message>The parameter StartTime must be less than EndTime.</Message></Error><RequestId>req-1</RequestId></ErrorResponse>"#,
        );
        let query = MetricQuery::last_window(UsageMetric::Cpu, "c1", "s1");
        let err = client.average(&query).await.unwrap_err();
        match err {
            NotifierError::Metrics { metric_name, .. } => {
                assert_eq!(metric_name, "CPUUtilization")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_usage_message_fails_with_backend() {
        let client = mock_cloudwatch_client(
            400,
            r#"<ErrorResponse><Error><Type>Sender</Type><Code>AccessDenied</Code><Message>denied</Message></Error></ErrorResponse>"#,
        );
        let err = usage_message(&client, &alarm("MemoryAlarm")).await.unwrap_err();
        assert!(err.to_string().contains("MemoryUtilization"), "got: {err}");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("ApiServerHealthMonitor-CpuAlarm12AB"), Some(UsageMetric::Cpu));
        assert_eq!(classify("ApiServerHealthMonitor-MemoryAlarm"), Some(UsageMetric::Memory));
        assert_eq!(classify("NatGatewayTrafficAlarm"), None);
        assert_eq!(classify("cpualarm"), None);
    }

    #[tokio::test]
    async fn test_cpu_alarm_queries_cpu_metric() {
        let backend = FakeBackend {
            samples: vec![
                MetricSample { timestamp: 100, average: 10.0 },
                MetricSample { timestamp: 400, average: 91.256 },
                MetricSample { timestamp: 200, average: 50.0 },
            ],
            ..Default::default()
        };
        let usage = usage_message(&backend, &alarm("CpuAlarm")).await.unwrap();
        assert_eq!(usage, "91.26%");

        let queries = backend.queries.lock().unwrap();
        assert_eq!(queries.len(), 1);
        let query = &queries[0];
        assert_eq!(query.namespace, "AWS/ECS");
        assert_eq!(query.metric_name, "CPUUtilization");
        assert_eq!(query.period_seconds, 300);
        assert_eq!(
            query.dimensions,
            vec![
                ("ClusterName".to_string(), "c1".to_string()),
                ("ServiceName".to_string(), "s1".to_string()),
            ]
        );
        assert_eq!(query.window.1 - query.window.0, Duration::minutes(5));
    }

    #[tokio::test]
    async fn test_memory_alarm_without_datapoints() {
        let backend = FakeBackend::default();
        let usage = usage_message(&backend, &alarm("MemoryAlarm")).await.unwrap();
        assert_eq!(usage, NO_DATA);
        assert_eq!(
            backend.queries.lock().unwrap()[0].metric_name,
            "MemoryUtilization"
        );
    }

    #[tokio::test]
    async fn test_unclassified_alarm_skips_query() {
        let backend = FakeBackend::default();
        let usage = usage_message(&backend, &alarm("DiskAlarm")).await.unwrap();
        assert_eq!(usage, "N/A");
        assert!(backend.queries.lock().unwrap().is_empty());
    }
}
