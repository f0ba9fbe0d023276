use serde_json::Value;

/// First non-empty of `cover.url` then `stills.url`.
pub fn thumbnail_of(item: &Value) -> Option<&str> {
    ["cover", "stills"].iter().find_map(|key| {
        item.get(key)
            .and_then(|media| media.get("url"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    })
}

/// Sets `thumbnail` on `item`; leaves the key absent when no image exists.
pub fn attach_thumbnail(item: &mut Value) {
    let Some(thumbnail) = thumbnail_of(item).map(str::to_owned) else {
        return;
    };
    if let Some(obj) = item.as_object_mut() {
        obj.insert("thumbnail".into(), Value::String(thumbnail));
    }
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
