//! Slack mrkdwn templates, one per event kind. Field order is fixed per
//! template.

use crate::events::{
    AlarmEvent, BatchJobEvent, BatchJobStatus, EcsDeploymentEvent, ForwardedAlarmEvent,
};

/// The entire outbound webhook payload.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SlackMessage {
    pub text: String,
}

impl From<String> for SlackMessage {
    fn from(text: String) -> Self {
        SlackMessage { text }
    }
}

pub fn batch_job(event: &BatchJobEvent) -> String {
    match event.status_kind() {
        BatchJobStatus::Failed => format!(
            "*AWS Batch 작업 실패* `{}`\n\
             • *작업 ID*: `{}`\n\
             • *상태*: `{}`\n\
             • *사유*: {}\n\
             • *시작 시각*: {}\n\
             • *종료 시각*: {}",
            event.job_name,
            event.job_id,
            event.status,
            event.status_reason,
            event.created_at,
            event.stopped_at
        ),
        BatchJobStatus::Succeeded => format!(
            "*AWS Batch 작업 성공* `{}`\n\
             • *작업 ID*: `{}`\n\
             • *상태*: `{}`\n\
             • *사유*: {}\n\
             • *시작 시각*: {}\n\
             • *종료 시각*: {}",
            event.job_name,
            event.job_id,
            event.status,
            event.status_reason,
            event.created_at,
            event.stopped_at
        ),
        BatchJobStatus::Other => format!(
            "*AWS Batch 작업 상태 변경* `{}`\n\
             • *작업 ID*: `{}`\n\
             • *상태*: `{}`\n\
             • *시작 시각*: {}\n\
             • *종료 시각*: {}",
            event.job_name, event.job_id, event.status, event.created_at, event.stopped_at
        ),
    }
}

pub fn ecs_deployment(event: &EcsDeploymentEvent) -> String {
    format!(
        "*ECS 배포 이벤트 발생*\n\
         • *이벤트 유형*: {}\n\
         • *이벤트 이름*: {}\n\
         • *클러스터 이름*: {}\n\
         • *배포 ID*: {}\n\
         • *사유*: {}\n\
         • *업데이트 시각*: {}",
        event.event_type,
        event.event_name,
        event.cluster_name(),
        event.deployment_id,
        event.reason,
        event.updated_at
    )
}

fn alarm_lines(
    alarm_name: &str,
    state: &str,
    reason: &str,
    timestamp: &str,
    cluster_name: &str,
    service_name: &str,
) -> String {
    format!(
        "• *알람 이름*: `{alarm_name}`\n\
         • *상태 변경*: `{state}`\n\
         • *사유*: {reason}\n\
         • *발생 시각*: {timestamp}\n\
         • *클러스터 이름*: `{cluster_name}`\n\
         • *서비스 이름*: `{service_name}`"
    )
}

pub fn ecs_health(event: &AlarmEvent) -> String {
    format!(
        "*ECS Healthy Check Alarm Notification*\n{}",
        alarm_lines(
            &event.alarm_name,
            &event.state,
            &event.reason,
            &event.timestamp,
            event.dimensions.cluster_name(),
            event.dimensions.service_name(),
        )
    )
}

pub fn ecs_usage(event: &ForwardedAlarmEvent, usage_message: &str) -> String {
    format!(
        "*ECS 리소스 사용량 알람*\n{}\n• *최근 5분 평균 사용량*: {usage_message}",
        alarm_lines(
            &event.alarm_name,
            &event.state,
            &event.reason,
            &event.timestamp,
            &event.cluster_name,
            &event.service_name,
        )
    )
}
