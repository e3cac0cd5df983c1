use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|x| x.eq_ignore_ascii_case(role))
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

#[test]
fn role_lookup_ignores_case() {
    let user = User {
        id: "u-1".into(),
        username: "ana".into(),
        email: "ana@example.com".into(),
        roles: vec!["GUIDE".into()],
        full_name: None,
    };

    assert!(user.has_role("guide"));
    assert!(!user.has_role("admin"));
    assert_eq!(user.display_name(), "ana");
}
