use serde::Deserialize;

use crate::{AppError, AppResult};

/// Body of `PUT /api/v1/users/{auth_user_uuid}`. Every field is optional;
/// which ones must be present depends on whether the user already exists.
/// Unknown keys are rejected at deserialization, not dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub user_name: Option<String>,
    pub user_locale: Option<String>,
    pub languages: Option<String>,
    pub region: Option<String>,
    pub queue_id: Option<i64>,
}

/// Where a patch field lands. `user_name`, `languages` and `region` describe
/// the queue shared by its members; only `locale` and the queue reference
/// live on the user row itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    User(&'static str),
    Queue(&'static str),
}

pub const FIELD_ROUTES: &[(&str, Target)] = &[
    ("user_name", Target::Queue("name")),
    ("user_locale", Target::User("locale")),
    ("languages", Target::Queue("languages")),
    ("region", Target::Queue("region")),
    ("queue_id", Target::User("queue_id")),
];

/// Fields that must all be present when the patch creates a user. Checked in
/// this order; validation names the first one missing.
pub const REQUIRED_ON_CREATE: [&str; 4] = ["user_name", "user_locale", "languages", "region"];

pub fn route(field: &str) -> AppResult<Target> {
    FIELD_ROUTES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, target)| *target)
        .ok_or_else(|| AppError::UnknownField(field.to_owned()))
}

#[derive(Debug, Clone)]
pub(crate) enum PatchValue {
    Text(String),
    Id(i64),
}

impl UserPatch {
    /// The fields actually present, as (field name, value) pairs.
    pub(crate) fn fields(&self) -> Vec<(&'static str, PatchValue)> {
        let mut fields = Vec::new();
        if let Some(v) = &self.user_name {
            fields.push(("user_name", PatchValue::Text(v.clone())));
        }
        if let Some(v) = &self.user_locale {
            fields.push(("user_locale", PatchValue::Text(v.clone())));
        }
        if let Some(v) = &self.languages {
            fields.push(("languages", PatchValue::Text(v.clone())));
        }
        if let Some(v) = &self.region {
            fields.push(("region", PatchValue::Text(v.clone())));
        }
        if let Some(v) = self.queue_id {
            fields.push(("queue_id", PatchValue::Id(v)));
        }
        fields
    }

    /// All creation fields, or the first missing one in
    /// [`REQUIRED_ON_CREATE`] order.
    pub(crate) fn require_all(&self) -> Result<(&str, &str, &str, &str), &'static str> {
        let user_name = self.user_name.as_deref().ok_or("user_name")?;
        let user_locale = self.user_locale.as_deref().ok_or("user_locale")?;
        let languages = self.languages.as_deref().ok_or("languages")?;
        let region = self.region.as_deref().ok_or("region")?;
        Ok((user_name, user_locale, languages, region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_patch() -> UserPatch {
        UserPatch {
            user_name: Some("Alice".to_owned()),
            user_locale: Some("en".to_owned()),
            languages: Some("en,fr".to_owned()),
            region: Some("FR".to_owned()),
            queue_id: Some(7),
        }
    }

    #[test]
    fn every_patch_field_routes() {
        for (field, _) in full_patch().fields() {
            assert!(route(field).is_ok(), "no route for {field}");
        }
    }

    #[test]
    fn descriptive_fields_route_to_queue() {
        assert_eq!(route("user_name").unwrap(), Target::Queue("name"));
        assert_eq!(route("languages").unwrap(), Target::Queue("languages"));
        assert_eq!(route("region").unwrap(), Target::Queue("region"));
        assert_eq!(route("user_locale").unwrap(), Target::User("locale"));
        assert_eq!(route("queue_id").unwrap(), Target::User("queue_id"));
    }

    #[test]
    fn unrecognized_field_is_rejected() {
        assert!(matches!(route("favorite_genre"), Err(AppError::UnknownField(f)) if f == "favorite_genre"));
    }

    #[test]
    fn require_all_names_first_missing_field() {
        for missing in REQUIRED_ON_CREATE {
            let mut patch = full_patch();
            match missing {
                "user_name" => patch.user_name = None,
                "user_locale" => patch.user_locale = None,
                "languages" => patch.languages = None,
                "region" => patch.region = None,
                _ => unreachable!(),
            }
            assert_eq!(patch.require_all().unwrap_err(), missing);
        }
        assert!(full_patch().require_all().is_ok());
    }

    #[test]
    fn first_missing_field_wins_when_several_are_absent() {
        let patch = UserPatch {
            region: Some("DE".to_owned()),
            ..UserPatch::default()
        };
        assert_eq!(patch.require_all().unwrap_err(), "user_name");
    }

    #[test]
    fn unknown_keys_fail_deserialization() {
        let err = serde_json::from_value::<UserPatch>(json!({ "user_name": "A", "shoe_size": 43 }))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let patch: UserPatch = serde_json::from_value(json!({ "user_locale": "uk" })).unwrap();
        let fields = patch.fields();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "user_locale");
    }
}
