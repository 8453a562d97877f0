use log::warn;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{response, Request};
use rocket_okapi::gen::OpenApiGenerator;
use rocket_okapi::okapi::openapi3::{MediaType, Responses};
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use rocket_okapi::response::OpenApiResponderInner;
use serde_json::json;

use crate::access::Caller;
use crate::goals::StoreError;
use crate::model::{Role, RoleError};
use crate::report::ReportError;
use crate::stats::simulation::SimulationError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing `X-User-Id` header")]
    MissingIdentity,
    #[error(transparent)]
    InvalidRole(#[from] RoleError),
    #[error("`{0}` is not allowed to do this")]
    Forbidden(String),
    #[error("Squad `{0}` not found")]
    SquadNotFound(String),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub fn status(&self) -> Status {
        use Error::*;
        match self {
            MissingIdentity => Status::Unauthorized,
            Forbidden(_) => Status::Forbidden,
            SquadNotFound(_) => Status::NotFound,
            InvalidRole(_) | Simulation(_) | Report(_) | Store(StoreError::InvalidUserId(_)) => Status::BadRequest,
            Store(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        warn!("{}", self);
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).respond_to(req)
    }
}

impl OpenApiResponderInner for self::Error {
    fn responses(gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::{okapi, okapi::openapi3::RefOr};

        Ok(Responses {
            responses: okapi::map! {
                "400".to_owned() => RefOr::Object(error_response(gen, "400 Bad Request", "The request records or parameters are invalid.")),
                "401".to_owned() => RefOr::Object(unauthorized(gen)),
                "403".to_owned() => RefOr::Object(error_response(gen, "403 Forbidden", "The caller's role does not allow this.")),
                "500".to_owned() => RefOr::Object(error_response(gen, "500 Internal Server Error", "Goal storage failed.")),
            },
            ..Default::default()
        })
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Caller {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();
        let Some(user_id) = headers
            .get_one(USER_ID_HEADER)
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            return Outcome::Error((Status::Unauthorized, Error::MissingIdentity));
        };
        let role = match headers.get_one(USER_ROLE_HEADER) {
            Some(raw) => match Role::parse(raw) {
                Ok(role) => role,
                Err(e) => return Outcome::Error((Status::BadRequest, e.into())),
            },
            None => Role::User,
        };
        Outcome::Success(Caller::new(user_id, role))
    }
}

impl<'a> OpenApiFromRequest<'a> for Caller {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }

    fn get_responses(gen: &mut OpenApiGenerator) -> rocket_okapi::Result<Responses> {
        use rocket_okapi::{okapi, okapi::openapi3::RefOr};

        Ok(Responses {
            responses: okapi::map! {
                "401".to_owned() => RefOr::Object(unauthorized(gen)),
            },
            ..Default::default()
        })
    }
}

fn error_response(_gen: &mut OpenApiGenerator, title: &str, body: &str) -> rocket_okapi::okapi::openapi3::Response {
    use rocket_okapi::okapi;
    okapi::openapi3::Response {
        description: format!("# {title}\n{body}"),
        content: okapi::map! {
            "application/json".to_owned() => MediaType::default()
        },
        ..Default::default()
    }
}

pub fn unauthorized(gen: &mut OpenApiGenerator) -> rocket_okapi::okapi::openapi3::Response {
    error_response(
        gen,
        "401 Unauthorized",
        "Send the caller's id in `X-User-Id` and, optionally, their role in `X-User-Role`.",
    )
}
