use crate::{
    error::{Error, InviteError},
    flows::invitation::{InviteRequest, InviteSent},
    invite_manager::InviteManager,
    response::ResponseData,
};
use axum::{extract::rejection::JsonRejection, response::IntoResponse, Extension, Json};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;
use tracing::warn;

async fn invite(
    invite_request: InviteRequest,
    invite_manager: Arc<InviteManager>,
) -> Result<InviteSent, Error> {
    invite_manager
        .invite(&invite_request.email, invite_request.name)
        .await
}

/// The bearer token is checked before the body is looked at.
pub async fn invite_route(
    Extension(invite_manager): Extension<Arc<InviteManager>>,
    authorisation: Option<TypedHeader<Authorization<Bearer>>>,
    invite_request: Result<Json<InviteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let authorised = match authorisation {
        Some(TypedHeader(authorisation)) => {
            invite_manager.admin_token_matches(authorisation.token())
        }
        None => false,
    };
    if !authorised {
        warn!("Rejected invite request without valid admin token");
        return ResponseData::Unauthorized;
    }
    let invite_request = match invite_request {
        Ok(Json(invite_request)) => invite_request,
        Err(rejection) => {
            warn!("{}", rejection);
            return ResponseData::InvalidRequest;
        }
    };
    match invite(invite_request, invite_manager).await {
        Ok(invite_sent) => ResponseData::InviteSent(invite_sent),
        Err(err) => {
            warn!("{}", err);
            match err {
                Error::Invite(InviteError::AlreadyRegistered(_)) => ResponseData::AlreadyRegistered,
                Error::Mail(_) => ResponseData::MailDeliveryFailed,
                _ => ResponseData::InternalServerError,
            }
        }
    }
}
