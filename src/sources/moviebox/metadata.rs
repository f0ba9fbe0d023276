use serde_json::Value;

use super::{DETAIL_PATH, DispatchOptions, MovieBoxSource, helpers::attach_thumbnail};
use crate::common::GatewayResult;

impl MovieBoxSource {
    /// Full detail for one subject, with `subject.thumbnail` derived.
    pub async fn detail(&self, subject_id: &str) -> GatewayResult<Value> {
        let payload = self
            .fetch(DETAIL_PATH, DispatchOptions::get().query("subjectId", subject_id))
            .await?;
        Ok(shape_detail(payload))
    }
}

pub fn shape_detail(mut payload: Value) -> Value {
    if let Some(subject) = payload.get_mut("subject") {
        attach_thumbnail(subject);
    }
    payload
}

/// Front-end slug of the subject, needed to build the player referer.
pub fn detail_path(detail: &Value) -> Option<&str> {
    detail
        .pointer("/subject/detailPath")
        .and_then(Value::as_str)
        .filter(|p| !p.trim().is_empty())
}
