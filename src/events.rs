use std::collections::HashMap;

use serde::de::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::NotifierMode;
use crate::error::NotifierError;

/// Placeholder rendered for any field the event does not carry.
pub const NOT_AVAILABLE: &str = "N/A";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn render(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => not_available(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

// Accepts any JSON value so formatting never fails on an unexpected type.
fn field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer).map(render)
}

/// Deserializes `raw[key]` as `T`, treating an absent or null object as `{}`.
fn object<T>(raw: Option<&Value>) -> Result<T, NotifierError>
where
    T: for<'de> Deserialize<'de>,
{
    let value = match raw {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(v) => v.clone(),
    };
    Ok(T::deserialize(value)?)
}

/// `Batch Job State Change` detail.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchJobEvent {
    #[serde(default = "not_available", deserialize_with = "field")]
    pub job_name: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub job_id: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub status: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub status_reason: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub created_at: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub stopped_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchJobStatus {
    Failed,
    Succeeded,
    Other,
}

impl BatchJobEvent {
    pub fn status_kind(&self) -> BatchJobStatus {
        match self.status.as_str() {
            "FAILED" => BatchJobStatus::Failed,
            "SUCCEEDED" => BatchJobStatus::Succeeded,
            _ => BatchJobStatus::Other,
        }
    }
}

/// `ECS Deployment State Change` detail.
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EcsDeploymentEvent {
    #[serde(default = "not_available", deserialize_with = "field")]
    pub event_type: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub event_name: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub cluster_arn: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub deployment_id: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub reason: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    pub updated_at: String,
}

impl EcsDeploymentEvent {
    /// The last path segment of the cluster ARN, e.g. `my-cluster` for
    /// `arn:aws:ecs:ap-northeast-2:123456789012:cluster/my-cluster`.
    pub fn cluster_name(&self) -> &str {
        if self.cluster_arn == NOT_AVAILABLE {
            return NOT_AVAILABLE;
        }
        self.cluster_arn
            .rsplit('/')
            .next()
            .unwrap_or(&self.cluster_arn)
    }
}

#[derive(serde::Deserialize, Debug, Default)]
struct RawDimension {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    value: Option<Value>,
}

/// Alarm metric dimensions keyed by name. Later entries win on duplicate names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dimensions(HashMap<String, String>);

impl Dimensions {
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or(NOT_AVAILABLE)
    }

    pub fn cluster_name(&self) -> &str {
        self.get("ClusterName")
    }

    pub fn service_name(&self) -> &str {
        self.get("ServiceName")
    }
}

impl FromIterator<(String, String)> for Dimensions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Dimensions(iter.into_iter().collect())
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawAlarmState {
    #[serde(default = "not_available", deserialize_with = "field")]
    value: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    reason: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    timestamp: String,
}

#[derive(serde::Deserialize, Debug, Default)]
struct RawAlarmTrigger {
    #[serde(default)]
    dimensions: Option<Vec<RawDimension>>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawAlarmDetail {
    #[serde(default = "not_available", deserialize_with = "field")]
    alarm_name: String,
    #[serde(default)]
    state: Option<Value>,
    #[serde(default)]
    trigger: Option<Value>,
}

/// `CloudWatch Alarm State Change` delivered straight from CloudWatch.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmEvent {
    pub alarm_name: String,
    pub state: String,
    pub reason: String,
    pub timestamp: String,
    pub dimensions: Dimensions,
}

impl AlarmEvent {
    fn from_detail(detail: Option<&Value>) -> Result<Self, NotifierError> {
        let raw: RawAlarmDetail = object(detail)?;
        let state: RawAlarmState = object(raw.state.as_ref())?;
        let trigger: RawAlarmTrigger = object(raw.trigger.as_ref())?;

        let dimensions = trigger
            .dimensions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|d| match d.name {
                Some(Value::String(name)) => Some((name, render(d.value))),
                _ => None,
            })
            .collect();

        Ok(AlarmEvent {
            alarm_name: raw.alarm_name,
            state: state.value,
            reason: state.reason,
            timestamp: state.timestamp,
            dimensions,
        })
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawForwardedDetail {
    #[serde(default = "not_available", deserialize_with = "field")]
    alarm_name: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    new_state_value: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    new_state_reason: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    state_change_time: String,
}

#[derive(serde::Deserialize, Debug)]
struct RawForwardedEnvelope {
    #[serde(default = "not_available", deserialize_with = "field")]
    cluster_name: String,
    #[serde(default = "not_available", deserialize_with = "field")]
    service_name: String,
    #[serde(default)]
    detail: Option<Value>,
}

/// Alarm forwarded by an EventBridge rule that injects the ECS cluster and
/// service names at the top level of the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedAlarmEvent {
    pub alarm_name: String,
    pub state: String,
    pub reason: String,
    pub timestamp: String,
    pub cluster_name: String,
    pub service_name: String,
}

impl ForwardedAlarmEvent {
    fn from_payload(raw: Value) -> Result<Self, NotifierError> {
        let envelope = RawForwardedEnvelope::deserialize(raw)?;
        let detail: RawForwardedDetail = object(envelope.detail.as_ref())?;
        Ok(ForwardedAlarmEvent {
            alarm_name: detail.alarm_name,
            state: detail.new_state_value,
            reason: detail.new_state_reason,
            timestamp: detail.state_change_time,
            cluster_name: envelope.cluster_name,
            service_name: envelope.service_name,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    BatchJob(BatchJobEvent),
    EcsDeployment(EcsDeploymentEvent),
    EcsHealth(AlarmEvent),
    EcsUsage(ForwardedAlarmEvent),
}

impl NotificationEvent {
    /// Reads the payload with the single schema configured for `mode`.
    /// Missing fields never fail; only a payload whose shape cannot be read
    /// at all (e.g. `detail` is a string) is rejected.
    pub fn parse(mode: NotifierMode, raw: Value) -> Result<Self, NotifierError> {
        if !raw.is_object() {
            return Err(NotifierError::MalformedEvent(serde::de::Error::custom(
                format!("expected a JSON object event, got: {raw}"),
            )));
        }

        let event = match mode {
            NotifierMode::BatchJob => NotificationEvent::BatchJob(object(raw.get("detail"))?),
            NotifierMode::EcsDeployment => {
                NotificationEvent::EcsDeployment(object(raw.get("detail"))?)
            }
            NotifierMode::EcsHealth => {
                NotificationEvent::EcsHealth(AlarmEvent::from_detail(raw.get("detail"))?)
            }
            NotifierMode::EcsUsage => {
                NotificationEvent::EcsUsage(ForwardedAlarmEvent::from_payload(raw)?)
            }
        };
        Ok(event)
    }
}
