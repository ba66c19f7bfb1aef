use crate::{
    account::AccountSafe,
    flows::{invitation::InviteSent, sign_up::InviteDetails},
};
use axum::{
    body::Body,
    http::{header::CONTENT_SECURITY_POLICY, response::Builder, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

fn create_baseline_response() -> Builder {
    Response::builder()
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .header(
            CONTENT_SECURITY_POLICY,
            "default-src 'none'; frame-ancestors 'none'; base-uri 'none'",
        )
}

/// Every token failure is reported as `InvalidInvite`, whatever the reason.
#[derive(Debug, Serialize)]
pub enum ResponseData {
    Healthy,
    InviteSent(InviteSent),
    InviteDetails(InviteDetails),
    AccountCreated(AccountSafe),
    InvalidRequest,
    Unauthorized,
    InvalidInvite,
    AlreadyRegistered,
    MailDeliveryFailed,
    InternalServerError,
}

impl ResponseData {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Healthy | Self::InviteSent(_) | Self::InviteDetails(_) => StatusCode::OK,
            Self::AccountCreated(_) => StatusCode::CREATED,
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidInvite => StatusCode::UNAUTHORIZED,
            Self::AlreadyRegistered => StatusCode::CONFLICT,
            Self::MailDeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ResponseData {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let json_body = match serde_json::to_string(&self) {
            Ok(json) => json,
            Err(err) => {
                warn!("{}", err);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json("Internal server error"),
                )
                    .into_response();
            }
        };

        match create_baseline_response()
            .status(status_code)
            .body(Body::from(json_body))
        {
            Ok(response) => response,
            Err(err) => {
                warn!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json("Internal server error"),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;

    #[test]
    fn statuses() {
        assert_eq!(ResponseData::Healthy.status_code(), StatusCode::OK);
        assert_eq!(ResponseData::InvalidRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ResponseData::InvalidInvite.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ResponseData::AlreadyRegistered.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ResponseData::MailDeliveryFailed.status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn response_is_json_with_security_headers() {
        let response = ResponseData::InvalidInvite.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert!(response.headers().contains_key(CONTENT_SECURITY_POLICY));
    }
}
