use crate::{
    error::{Error, InviteError},
    flows::sign_up::{InviteDetails, InviteToken, SignUpCredentials},
    invite_manager::InviteManager,
    response::ResponseData,
};
use axum::{extract::rejection::JsonRejection, response::IntoResponse, Extension, Json};
use std::sync::Arc;
use tracing::warn;

pub async fn verify_invite_route(
    Extension(invite_manager): Extension<Arc<InviteManager>>,
    invite_token: Result<Json<InviteToken>, JsonRejection>,
) -> impl IntoResponse {
    let invite_token = match invite_token {
        Ok(Json(invite_token)) => invite_token,
        Err(rejection) => {
            warn!("{}", rejection);
            return ResponseData::InvalidRequest;
        }
    };
    match invite_manager.verify_invite(&invite_token.token) {
        Ok(invite) => ResponseData::InviteDetails(InviteDetails::from(invite)),
        Err(err) => {
            warn!("{}", err);
            ResponseData::InvalidInvite
        }
    }
}

pub async fn sign_up_route(
    Extension(invite_manager): Extension<Arc<InviteManager>>,
    credentials: Result<Json<SignUpCredentials>, JsonRejection>,
) -> impl IntoResponse {
    let credentials = match credentials {
        Ok(Json(credentials)) => credentials,
        Err(rejection) => {
            warn!("{}", rejection);
            return ResponseData::InvalidRequest;
        }
    };
    match invite_manager.sign_up(credentials).await {
        Ok(account) => ResponseData::AccountCreated(account),
        Err(err) => {
            warn!("{}", err);
            match err {
                Error::Invite(InviteError::InvalidInvite | InviteError::EmailMismatch) => {
                    ResponseData::InvalidInvite
                }
                Error::Invite(InviteError::AlreadyRegistered(_)) => ResponseData::AlreadyRegistered,
                _ => ResponseData::InternalServerError,
            }
        }
    }
}
