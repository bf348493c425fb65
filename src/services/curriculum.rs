use std::sync::Arc;
use tracing::info;

use crate::database::models::{
    ContentChanges, ContentDraft, ContentItem, ContentPatch, ContentRef, Module, ModuleChanges,
    ModuleDraft, ModulePatch, NewContent, NewModule,
};
use crate::database::CourseStore;

use super::error::{DomainError, DomainResult};
use super::validate::{positive_key, required_text, swap_pair};

/// Module and content management for a course whose ownership has already
/// been checked by the caller.
pub struct CurriculumService {
    store: Arc<dyn CourseStore>,
}

impl CurriculumService {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    pub async fn list_modules(&self, course_id: i32) -> DomainResult<Vec<Module>> {
        Ok(self.store.list_modules(course_id).await?)
    }

    pub async fn create_module(&self, course_id: i32, input: NewModule) -> DomainResult<Module> {
        let draft = ModuleDraft {
            module_number: positive_key("module_number", input.module_number)?,
            name: required_text("name", &input.name)?,
            duration_weeks: positive_key("duration_weeks", input.duration_weeks)?,
        };
        let module = self.store.insert_module(course_id, draft).await?;
        info!("Created module {} in course {}", module.module_number, course_id);
        Ok(module)
    }

    pub async fn update_module(&self, course_id: i32, module_number: i32, patch: ModulePatch) -> DomainResult<Module> {
        if patch.is_empty() {
            return Err(DomainError::invalid("No fields to update"));
        }
        let changes = ModuleChanges {
            name: patch.name.as_deref().map(|n| required_text("name", n)).transpose()?,
            duration_weeks: patch
                .duration_weeks
                .map(|w| positive_key("duration_weeks", w))
                .transpose()?,
        };
        Ok(self.store.update_module(course_id, module_number, changes).await?)
    }

    pub async fn delete_module(&self, course_id: i32, module_number: i32) -> DomainResult<()> {
        self.store.delete_module(course_id, module_number).await?;
        info!("Deleted module {} from course {}", module_number, course_id);
        Ok(())
    }

    /// Exchange the payloads of two modules and return the reordered list
    pub async fn swap_modules(&self, course_id: i32, num1: i64, num2: i64) -> DomainResult<Vec<Module>> {
        let (first, second) = swap_pair("num1", num1, "num2", num2)?;
        let modules = self.store.swap_modules(course_id, first, second).await?;
        info!("Swapped modules {} and {} in course {}", first, second, course_id);
        Ok(modules)
    }

    pub async fn list_content(&self, course_id: i32, module_number: i32) -> DomainResult<Vec<ContentItem>> {
        self.ensure_module(course_id, module_number).await?;
        Ok(self.store.list_content(course_id, module_number).await?)
    }

    pub async fn create_content(&self, course_id: i32, module_number: i32, input: NewContent) -> DomainResult<ContentItem> {
        let draft = ContentDraft {
            content_id: positive_key("content_id", input.content_id)?,
            title: required_text("title", &input.title)?,
            content_type: input.content_type,
            url: normalize_url(input.url),
        };
        let item = self.store.insert_content(course_id, module_number, draft).await?;
        info!(
            "Created content {} in course {} module {}",
            item.content_id, course_id, module_number
        );
        Ok(item)
    }

    pub async fn update_content(&self, item: ContentRef, patch: ContentPatch) -> DomainResult<ContentItem> {
        if patch.is_empty() {
            return Err(DomainError::invalid("No fields to update"));
        }
        let changes = ContentChanges {
            title: patch.title.as_deref().map(|t| required_text("title", t)).transpose()?,
            content_type: patch.content_type,
            url: patch.url.map(normalize_url),
        };
        Ok(self.store.update_content(item, changes).await?)
    }

    pub async fn delete_content(&self, item: ContentRef) -> DomainResult<()> {
        self.store.delete_content(item).await?;
        info!(
            "Deleted content {} from course {} module {}",
            item.content_id, item.course_id, item.module_number
        );
        Ok(())
    }

    /// Exchange the payloads of two content items and return the reordered list
    pub async fn swap_content(
        &self,
        course_id: i32,
        module_number: i32,
        content_id1: i64,
        content_id2: i64,
    ) -> DomainResult<Vec<ContentItem>> {
        let (first, second) = swap_pair("contentId1", content_id1, "contentId2", content_id2)?;
        self.ensure_module(course_id, module_number).await?;
        let content = self
            .store
            .swap_content(course_id, module_number, first, second)
            .await?;
        info!(
            "Swapped content {} and {} in course {} module {}",
            first, second, course_id, module_number
        );
        Ok(content)
    }

    async fn ensure_module(&self, course_id: i32, module_number: i32) -> DomainResult<()> {
        let modules = self.store.list_modules(course_id).await?;
        if modules.iter().any(|m| m.module_number == module_number) {
            Ok(())
        } else {
            Err(DomainError::not_found(format!("Module {} not found", module_number)))
        }
    }
}

/// Blank urls are stored as absent
fn normalize_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}
