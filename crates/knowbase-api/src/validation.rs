//! Request validation.
//!
//! Runs before the service layer. Every failure names the offending field
//! (camelCase, as it appears on the wire) so clients can show messages next
//! to the right input.

use std::collections::BTreeMap;

use knowbase_core::defaults::{
    ARTICLE_CREATED_BY_MAX_LEN, ARTICLE_TITLE_MAX_LEN, CATEGORY_NAME_MAX_LEN, PAGE, PAGE_SIZE,
    PAGE_SIZE_MAX, SEARCH_LIMIT, TAG_NAME_MAX_LEN,
};
use knowbase_core::{
    base_slug, CreateArticleRequest, CreateCategoryRequest, CreateTagRequest,
    UpdateArticleRequest,
};

/// Field name to messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str, max: Option<usize>) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", field));
        return;
    }
    if let Some(max) = max {
        check_max_len(errors, field, value, max);
    }
}

fn check_max_len(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("{} must be {} characters or less", field, max),
        );
    }
}

/// Validate the body of an article create.
pub fn validate_create_article(req: &CreateArticleRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "title", &req.title, Some(ARTICLE_TITLE_MAX_LEN));
    check_required(&mut errors, "content", &req.content, None);
    if let Some(created_by) = &req.created_by {
        check_max_len(&mut errors, "createdBy", created_by, ARTICLE_CREATED_BY_MAX_LEN);
    }
    errors.into_result(())
}

/// Validate the body of an article update.
pub fn validate_update_article(req: &UpdateArticleRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "title", &req.title, Some(ARTICLE_TITLE_MAX_LEN));
    check_required(&mut errors, "content", &req.content, None);
    errors.into_result(())
}

/// Explicit slug if given, otherwise derived from the name.
fn resolve_slug(
    errors: &mut ValidationErrors,
    name: &str,
    slug: Option<&str>,
    max: usize,
) -> String {
    match slug.map(str::trim) {
        Some(explicit) if !explicit.is_empty() => {
            check_max_len(errors, "slug", explicit, max);
            explicit.to_string()
        }
        _ => {
            let derived = base_slug(name.trim());
            if derived.trim_matches('-').is_empty() && !name.trim().is_empty() {
                errors.add("slug", "slug could not be derived from name; provide one");
            }
            check_max_len(errors, "slug", &derived, max);
            derived
        }
    }
}

/// Validate a category create; returns the slug to store.
pub fn validate_category(req: &CreateCategoryRequest) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "name", &req.name, Some(CATEGORY_NAME_MAX_LEN));
    let slug = resolve_slug(&mut errors, &req.name, req.slug.as_deref(), CATEGORY_NAME_MAX_LEN);
    errors.into_result(slug)
}

/// Validate a tag create; returns the slug to store.
pub fn validate_tag(req: &CreateTagRequest) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_required(&mut errors, "name", &req.name, Some(TAG_NAME_MAX_LEN));
    let slug = resolve_slug(&mut errors, &req.name, req.slug.as_deref(), TAG_NAME_MAX_LEN);
    errors.into_result(slug)
}

/// Resolve `(page, page_size)` with defaults and bounds.
pub fn validate_paging(
    page: Option<i64>,
    page_size: Option<i64>,
) -> Result<(i64, i64), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let page = page.unwrap_or(PAGE);
    let page_size = page_size.unwrap_or(PAGE_SIZE);

    if page < 1 {
        errors.add("page", "page must be at least 1");
    }
    if !(1..=PAGE_SIZE_MAX).contains(&page_size) {
        errors.add(
            "pageSize",
            format!("pageSize must be between 1 and {}", PAGE_SIZE_MAX),
        );
    }
    errors.into_result((page, page_size))
}

/// Resolve a search query and limit.
pub fn validate_search(
    q: Option<&str>,
    limit: Option<i64>,
) -> Result<(String, i64), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let query = q.map(str::trim).unwrap_or_default().to_string();
    let limit = limit.unwrap_or(SEARCH_LIMIT);

    if query.is_empty() {
        errors.add("q", "q is required");
    }
    if !(1..=PAGE_SIZE_MAX).contains(&limit) {
        errors.add(
            "limit",
            format!("limit must be between 1 and {}", PAGE_SIZE_MAX),
        );
    }
    errors.into_result((query, limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, content: &str) -> CreateArticleRequest {
        CreateArticleRequest {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_article_passes() {
        assert!(validate_create_article(&article("Title", "Body")).is_ok());
    }

    #[test]
    fn test_blank_title_and_content_rejected() {
        let errors = validate_create_article(&article("   ", "")).unwrap_err();
        assert_eq!(errors.fields()["title"], vec!["title is required"]);
        assert_eq!(errors.fields()["content"], vec!["content is required"]);
    }

    #[test]
    fn test_title_length_counts_characters() {
        let at_limit = "é".repeat(ARTICLE_TITLE_MAX_LEN);
        assert!(validate_create_article(&article(&at_limit, "Body")).is_ok());

        let over = "a".repeat(ARTICLE_TITLE_MAX_LEN + 1);
        let errors = validate_create_article(&article(&over, "Body")).unwrap_err();
        assert!(errors.fields().contains_key("title"));
    }

    #[test]
    fn test_created_by_bound() {
        let mut req = article("Title", "Body");
        req.created_by = Some("x".repeat(ARTICLE_CREATED_BY_MAX_LEN + 1));
        let errors = validate_create_article(&req).unwrap_err();
        assert!(errors.fields().contains_key("createdBy"));
    }

    #[test]
    fn test_update_requires_title() {
        let req = UpdateArticleRequest {
            content: "Body".to_string(),
            ..Default::default()
        };
        let errors = validate_update_article(&req).unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert!(errors.fields().contains_key("title"));
    }

    #[test]
    fn test_category_slug_derived_from_name() {
        let req = CreateCategoryRequest {
            name: "Getting Started".to_string(),
            ..Default::default()
        };
        assert_eq!(validate_category(&req).unwrap(), "getting-started");
    }

    #[test]
    fn test_explicit_slug_kept() {
        let req = CreateTagRequest {
            name: "C#".to_string(),
            slug: Some("csharp".to_string()),
        };
        assert_eq!(validate_tag(&req).unwrap(), "csharp");
    }

    #[test]
    fn test_underivable_slug_rejected() {
        let req = CreateTagRequest {
            name: "!!!".to_string(),
            slug: None,
        };
        let errors = validate_tag(&req).unwrap_err();
        assert!(errors.fields().contains_key("slug"));
        assert!(!errors.fields().contains_key("name"));
    }

    #[test]
    fn test_missing_name_reports_name_only() {
        let errors = validate_tag(&CreateTagRequest::default()).unwrap_err();
        assert!(errors.fields().contains_key("name"));
        assert!(!errors.fields().contains_key("slug"));
    }

    #[test]
    fn test_paging_defaults_and_bounds() {
        assert_eq!(validate_paging(None, None).unwrap(), (1, 20));
        assert_eq!(validate_paging(Some(3), Some(100)).unwrap(), (3, 100));

        let errors = validate_paging(Some(0), Some(0)).unwrap_err();
        assert!(errors.fields().contains_key("page"));
        assert!(errors.fields().contains_key("pageSize"));

        assert!(validate_paging(Some(1), Some(101)).is_err());
    }

    #[test]
    fn test_search_requires_query() {
        assert_eq!(
            validate_search(Some(" rust "), None).unwrap(),
            ("rust".to_string(), 20)
        );
        assert!(validate_search(None, None).is_err());
        assert!(validate_search(Some("rust"), Some(0)).is_err());
    }

    #[test]
    fn test_display_joins_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "title is required");
        errors.add("content", "content is required");
        assert_eq!(
            errors.to_string(),
            "content: content is required; title: title is required"
        );
    }
}
