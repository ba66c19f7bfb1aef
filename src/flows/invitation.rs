use crate::serde_implementations::datetime_utc;
use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Serialize, Deserialize)]
pub struct InviteRequest {
    pub email: EmailAddress,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct InviteSent {
    pub email: String,
    #[serde(with = "datetime_utc")]
    pub expiry: DateTime<Utc>,
}

/// The sign-up page receives the token and the plaintext email as query parameters.
pub fn build_invite_link(sign_up_url: &Url, email: &str, token: &str) -> Url {
    let mut link = sign_up_url.to_owned();
    let _ = link
        .query_pairs_mut()
        .append_pair("email", email)
        .append_pair("token", token);
    link
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_carries_email_and_token() {
        let sign_up_url = Url::parse("https://app.zenapt.com/sign-up").unwrap();
        let link = build_invite_link(&sign_up_url, "jane+spa@medspa.com", "aaa.bbb.ccc");
        assert_eq!(
            link.as_str(),
            "https://app.zenapt.com/sign-up?email=jane%2Bspa%40medspa.com&token=aaa.bbb.ccc"
        );
        let pairs: Vec<(String, String)> = link.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("email".to_string(), "jane+spa@medspa.com".to_string()),
                ("token".to_string(), "aaa.bbb.ccc".to_string())
            ]
        );
    }

    #[test]
    fn existing_query_is_kept() {
        let sign_up_url = Url::parse("https://app.zenapt.com/sign-up?ref=admin").unwrap();
        let link = build_invite_link(&sign_up_url, "a@b.com", "t.o.k");
        assert_eq!(link.query(), Some("ref=admin&email=a%40b.com&token=t.o.k"));
    }

    #[test]
    fn request_rejects_invalid_email() {
        assert!(serde_json::from_str::<InviteRequest>(r#"{"email":"nope"}"#).is_err());
        let request: InviteRequest =
            serde_json::from_str(r#"{"email":"a@b.com","name":"A"}"#).unwrap();
        assert_eq!(request.email.as_str(), "a@b.com");
        assert_eq!(request.name.as_deref(), Some("A"));
    }
}
