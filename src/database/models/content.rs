use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::database::swap::Sequenced;
use crate::types::ContentType;

/// A content item. `(course_id, module_number, content_id)` is the identity and
/// is referenced by progress records, so it never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ContentItem {
    pub course_id: i32,
    pub module_number: i32,
    pub content_id: i32,
    pub title: String,
    pub content_type: ContentType,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPayload {
    pub title: String,
    pub content_type: ContentType,
    pub url: Option<String>,
}

impl Sequenced for ContentItem {
    type Payload = ContentPayload;

    fn sequence_key(&self) -> i32 {
        self.content_id
    }

    fn payload(&self) -> ContentPayload {
        ContentPayload {
            title: self.title.clone(),
            content_type: self.content_type,
            url: self.url.clone(),
        }
    }

    fn set_payload(&mut self, payload: ContentPayload) {
        self.title = payload.title;
        self.content_type = payload.content_type;
        self.url = payload.url;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContent {
    pub content_id: i64,
    pub title: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub url: Option<String>,
}

/// Partial update. `url` distinguishes an omitted field (`None`) from an
/// explicit `null` (`Some(None)`), which clears the stored url.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub content_type: Option<ContentType>,
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Option<String>>,
}

impl ContentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content_type.is_none() && self.url.is_none()
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    pub content_id: i32,
    pub title: String,
    pub content_type: ContentType,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentChanges {
    pub title: Option<String>,
    pub content_type: Option<ContentType>,
    pub url: Option<Option<String>>,
}

impl ContentChanges {
    pub fn apply(&self, item: &mut ContentItem) {
        if let Some(title) = &self.title {
            item.title = title.clone();
        }
        if let Some(content_type) = self.content_type {
            item.content_type = content_type;
        }
        if let Some(url) = &self.url {
            item.url = url.clone();
        }
    }
}
