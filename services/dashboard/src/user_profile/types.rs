use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Profile document stored in the users table, keyed by `userId`.
///
/// The builder fills in the defaults a freshly registered account gets:
/// zeroed gamification counters, level 1 and both timestamps set to now.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[graphql(name = "User")]
pub struct UserProfile {
    #[builder(default = Uuid::new_v4())]
    pub user_id: Uuid,

    #[builder(setter(into))]
    pub email: String,

    #[builder(setter(into))]
    pub name: String,

    #[builder(default = Role::Student)]
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub avatar: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub bio: Option<String>,

    #[builder(default = Utc::now())]
    pub joined_at: DateTime<Utc>,

    #[builder(default = Utc::now())]
    pub last_active: DateTime<Utc>,

    #[serde(default)]
    #[builder(default)]
    pub xp: u32,

    #[serde(default = "default_level")]
    #[builder(default = 1)]
    pub level: u32,

    #[serde(default)]
    #[builder(default)]
    pub streak: u32,

    #[serde(default)]
    #[builder(default)]
    pub badges: Vec<Badge>,
}

fn default_level() -> u32 {
    1
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earned_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Deserialize, Enum, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_new_account_defaults() {
        let profile = UserProfile::builder()
            .email("ada@example.com")
            .name("Ada")
            .build();

        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.streak, 0);
        assert!(profile.badges.is_empty());
        assert!(profile.avatar.is_none());
        assert!(profile.bio.is_none());
    }

    #[test]
    fn serializes_with_camel_case_attribute_names() {
        let profile = UserProfile::builder()
            .email("ada@example.com")
            .name("Ada")
            .role(Role::Teacher)
            .build();

        let value = serde_json::to_value(&profile).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("userId"));
        assert!(object.contains_key("joinedAt"));
        assert!(object.contains_key("lastActive"));
        assert_eq!(value["role"], "teacher");
        // Absent optionals are dropped from the document entirely.
        assert!(!object.contains_key("avatar"));
        assert!(!object.contains_key("bio"));
    }

    #[test]
    fn deserializes_documents_missing_gamification_fields() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "userId": "f5e114fd-a814-4ec4-8477-5b4e809ac405",
            "email": "grace@example.com",
            "name": "Grace",
            "role": "admin",
            "joinedAt": "2024-01-15T09:00:00Z",
            "lastActive": "2024-01-15T09:00:00Z",
        }))
        .unwrap();

        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.streak, 0);
        assert!(profile.badges.is_empty());
    }
}
