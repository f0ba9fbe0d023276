use serde_json::{Value, json};
use tracing::debug;

use super::{DispatchOptions, MovieBoxSource, SEARCH_PATH, helpers::attach_thumbnail};
use crate::{common::GatewayResult, protocol::SubjectType};

impl MovieBoxSource {
    pub async fn search(
        &self,
        keyword: &str,
        page: u32,
        per_page: u32,
        subject_type: SubjectType,
    ) -> GatewayResult<Value> {
        let body = json!({
            "keyword": keyword,
            "page": page,
            "perPage": per_page,
            "subjectType": subject_type.code(),
        });
        let payload = self
            .fetch(SEARCH_PATH, DispatchOptions::post_json(body))
            .await?;
        Ok(shape_search_results(payload, subject_type))
    }
}

/// Drops items whose own `subjectType` differs from the requested one (the
/// upstream filter is not exact) and derives `thumbnail` on every item.
pub fn shape_search_results(mut payload: Value, subject_type: SubjectType) -> Value {
    let Some(items) = payload.get_mut("items").and_then(Value::as_array_mut) else {
        return payload;
    };

    if subject_type != SubjectType::All {
        let before = items.len();
        items.retain(|item| SubjectType::of_item(item) == Some(subject_type));
        debug!(
            "Search filter {} kept {} of {} items",
            subject_type,
            items.len(),
            before
        );
    }
    items.iter_mut().for_each(attach_thumbnail);
    payload
}
