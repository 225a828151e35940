// src/service/mod.rs

//! The planner service: `POST /get_plan` over a blocking `tiny_http` listener.
//!
//! Requests are handled one at a time on the accepting thread.

use crate::protocol::planner::Planner;
use crate::protocol::{ErrorBody, PlanRequest};
use crate::tools::Oracle;
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

pub const PLAN_PATH: &str = "/get_plan";

/// Status code and JSON body for one response.
pub type Reply = (u16, String);

pub struct PlannerService<O: Oracle> {
    planner: Planner<O>,
}

impl<O: Oracle> PlannerService<O> {
    pub fn new(planner: Planner<O>) -> Self {
        Self { planner }
    }

    /// Routes one request. Pure apart from the oracle call.
    pub fn handle(&self, method: &Method, url: &str, body: &str) -> Reply {
        let path = url.split('?').next().unwrap_or(url);
        if path != PLAN_PATH {
            return error(404, "Not Found");
        }
        if *method != Method::Post {
            return error(405, "Method Not Allowed");
        }

        let request: PlanRequest = match serde_json::from_str(body) {
            Ok(request) => request,
            Err(e) => return error(422, &format!("Invalid request body: {e}")),
        };

        match self.planner.request_plan(&request.query) {
            Ok(plan) => {
                info!(steps = plan.len(), "handle: plan ready");
                json(200, &plan)
            }
            Err(e) => error(500, &format!("Failed to generate or parse plan: {e}")),
        }
    }

    /// Serves until the server is unblocked.
    pub fn serve(&self, server: &Server) {
        for request in server.incoming_requests() {
            self.respond(request);
        }
        info!("serve: listener closed");
    }

    fn respond(&self, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, %url, "respond: received");

        let mut body = String::new();
        let (status, payload) = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => self.handle(&method, &url, &body),
            Err(e) => error(400, &format!("Unreadable request body: {e}")),
        };

        if status >= 400 {
            warn!(%method, %url, status, "respond: request failed");
        }

        let mut response = Response::from_string(payload).with_status_code(status);
        if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            response = response.with_header(header);
        }
        if let Err(e) = request.respond(response) {
            warn!(error = %e, "respond: failed to write response");
        }
    }
}

fn json<T: Serialize>(status: u16, value: &T) -> Reply {
    match serde_json::to_string(value) {
        Ok(body) => (status, body),
        Err(e) => error(500, &format!("Failed to encode response: {e}")),
    }
}

fn error(status: u16, detail: &str) -> Reply {
    let body = ErrorBody {
        detail: detail.to_string(),
    };
    // ErrorBody is a single string field; encoding cannot fail.
    (status, serde_json::to_string(&body).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Plan;
    use crate::tools::OracleError;

    struct CannedOracle(&'static str);

    impl Oracle for CannedOracle {
        fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            Ok(self.0.to_string())
        }
    }

    fn service(reply: &'static str) -> PlannerService<CannedOracle> {
        PlannerService::new(Planner::new(CannedOracle(reply)))
    }

    fn detail(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body).unwrap().detail
    }

    #[test]
    fn returns_plan_on_success() {
        let svc = service(r#"{"plan": [{"command": "ls -l", "explanation": "Lists directory contents."}]}"#);

        let (status, body) = svc.handle(&Method::Post, PLAN_PATH, r#"{"query": "list files in the current directory"}"#);

        assert_eq!(status, 200);
        let plan: Plan = serde_json::from_str(&body).unwrap();
        assert_eq!(plan.steps[0].command, "ls -l");
    }

    #[test]
    fn empty_plan_is_a_server_error() {
        let svc = service(r#"{"plan": []}"#);

        let (status, body) = svc.handle(&Method::Post, PLAN_PATH, r#"{"query": "what is the capital of France"}"#);

        assert_eq!(status, 500);
        assert_eq!(detail(&body), "Failed to generate or parse plan: The generated plan is empty.");
    }

    #[test]
    fn bad_request_body_is_unprocessable() {
        let svc = service("{}");
        let (status, body) = svc.handle(&Method::Post, PLAN_PATH, r#"{"q": "x"}"#);
        assert_eq!(status, 422);
        assert!(detail(&body).contains("query"));
    }

    #[test]
    fn routing_errors() {
        let svc = service("{}");
        assert_eq!(svc.handle(&Method::Post, "/plans", "{}").0, 404);
        assert_eq!(svc.handle(&Method::Get, PLAN_PATH, "").0, 405);
    }

    #[test]
    fn query_string_is_ignored_for_routing() {
        let svc = service(r#"{"plan": [{"command": "pwd", "explanation": "Prints the directory."}]}"#);
        assert_eq!(svc.handle(&Method::Post, "/get_plan?debug=1", r#"{"query": "where am i"}"#).0, 200);
    }
}
