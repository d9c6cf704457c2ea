/// Cookie Authentication Middleware
///
/// Validates the access token from the `access_token` cookie and injects its
/// claims into request extensions. An invalid or expired access token is
/// replaced transparently when the `refresh_token` cookie is still valid:
/// the new access token is set on the response and the request proceeds.

use actix_web::{
    body::EitherBody,
    cookie::Cookie,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::cookies::{ACCESS_COOKIE_NAME, REFRESH_COOKIE_NAME};
use crate::auth::SessionService;
use crate::error::{AppError, AuthError};

/// Must wrap every route that requires a logged-in caller
pub struct Authenticate {
    session: SessionService,
}

impl Authenticate {
    pub fn new(session: SessionService) -> Self {
        Self { session }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticateService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthenticateService {
            service: Rc::new(service),
            session: self.session.clone(),
        }))
    }
}

pub struct AuthenticateService<S> {
    service: Rc<S>,
    session: SessionService,
}

impl<S, B> Service<ServiceRequest> for AuthenticateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let session = self.session.clone();

        Box::pin(async move {
            let rotated = authenticate(&req, &session).await?;

            let request = req.request().clone();

            // Inner rejections (e.g. a failed role check) still carry the rotated cookie
            let mut res = match service.call(req).await {
                Ok(res) => res.map_into_left_body(),
                Err(e) => ServiceResponse::new(request, e.error_response()).map_into_right_body(),
            };

            if let Some(cookie) = rotated {
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    tracing::error!("Failed to set rotated access token cookie: {}", e);
                }
            }

            Ok(res)
        })
    }
}

/// Insert claims for the request. Returns the replacement access token
/// cookie when the old one had to be refreshed.
async fn authenticate(
    req: &ServiceRequest,
    session: &SessionService,
) -> Result<Option<Cookie<'static>>, AppError> {
    let access_token = req.cookie(ACCESS_COOKIE_NAME).ok_or_else(|| {
        tracing::debug!(path = %req.path(), "Missing access token cookie");
        AppError::Auth(AuthError::MissingToken)
    })?;

    match session.tokens().validate_access_token(access_token.value()) {
        Ok(claims) => {
            tracing::debug!(user_id = %claims.user_id, "Access token validated");
            req.extensions_mut().insert(claims);
            Ok(None)
        }
        Err(e) => {
            tracing::debug!("Access token rejected ({}), trying refresh token", e);

            let refresh_token = req.cookie(REFRESH_COOKIE_NAME).ok_or_else(|| {
                tracing::warn!("Access token invalid and no refresh token present");
                AppError::Auth(AuthError::MissingToken)
            })?;

            let (token, claims) = session
                .refresh_access_token(refresh_token.value())
                .await
                .map_err(|e| match e {
                    AppError::Auth(_) => e,
                    other => {
                        tracing::error!("Token refresh failed: {}", other);
                        AppError::Auth(AuthError::TokenInvalid)
                    }
                })?;

            tracing::info!(user_id = %claims.user_id, "Access token rotated from refresh token");
            req.extensions_mut().insert(claims);
            Ok(Some(session.access_cookie(token)))
        }
    }
}
