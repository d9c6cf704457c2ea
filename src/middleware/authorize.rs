use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::{authorize, Claims};
use crate::error::{AppError, AuthError};
use crate::models::Role;

/// Role gate. Runs after [`Authenticate`](super::Authenticate), which must
/// be registered as an outer wrapper.
pub struct Authorize {
    roles: Rc<[Role]>,
}

impl Authorize {
    pub fn roles(roles: &[Role]) -> Self {
        Self { roles: roles.into() }
    }

    pub fn admin() -> Self {
        Self::roles(&[Role::Admin])
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authorize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthorizeService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(AuthorizeService {
            service: Rc::new(service),
            roles: self.roles.clone(),
        }))
    }
}

pub struct AuthorizeService<S> {
    service: Rc<S>,
    roles: Rc<[Role]>,
}

impl<S, B> Service<ServiceRequest> for AuthorizeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let decision = match req.extensions().get::<Claims>() {
            Some(claims) => authorize(claims, &self.roles),
            None => Err(AppError::Auth(AuthError::MissingToken)),
        };

        match decision {
            Ok(()) => {
                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => Box::pin(async move { Err(e.into()) }),
        }
    }
}
