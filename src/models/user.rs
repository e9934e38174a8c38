use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
}

impl UserRecord {
    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }

    /// Registered push token, treating an empty string the same as no token.
    pub fn device_token(&self) -> Option<&str> {
        self.fcm_token.as_deref().filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::UserRecord;

    #[test]
    fn empty_token_is_not_a_device_token() {
        let user = UserRecord {
            role: Some("admin".to_string()),
            fcm_token: Some(String::new()),
        };
        assert_eq!(user.device_token(), None);
        assert!(user.has_role("admin"));
    }

    #[test]
    fn present_token_is_returned() {
        let user = UserRecord {
            role: None,
            fcm_token: Some("T1".to_string()),
        };
        assert_eq!(user.device_token(), Some("T1"));
        assert!(!user.has_role("admin"));
    }
}
