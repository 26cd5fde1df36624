use actix_web::HttpResponse;
use std::borrow::Cow;

use crate::api::STATUS_SUCCESS;

#[derive(serde::Serialize)]
pub struct SuccessData<T: serde::Serialize> {
    pub status: &'static str,
    pub data: Option<T>,
    pub message: Option<Cow<'static, str>>,
}

pub struct Success<T: serde::Serialize> {
    pub status: actix_web::http::StatusCode,
    pub body: SuccessData<T>,
    pub cookies: Vec<actix_web::cookie::Cookie<'static>>,
}

impl<T: serde::Serialize> Success<T> {
    fn with_status(status: actix_web::http::StatusCode, data: Option<T>) -> Self {
        Self {
            status,
            body: SuccessData { status: STATUS_SUCCESS, data, message: None },
            cookies: Vec::new(),
        }
    }

    pub fn ok(data: Option<T>) -> Self {
        Self::with_status(actix_web::http::StatusCode::OK, data)
    }

    pub fn created(data: Option<T>) -> Self {
        Self::with_status(actix_web::http::StatusCode::CREATED, data)
    }

    pub fn message<M>(mut self, msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        self.body.message = Some(msg.into());
        self
    }

    pub fn cookies(mut self, cookies: Vec<actix_web::cookie::Cookie<'static>>) -> Self {
        self.cookies = cookies;
        self
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        let mut response = HttpResponse::build(self.status);

        for cookie in self.cookies {
            response.cookie(cookie);
        }

        response.json(self.body)
    }
}
