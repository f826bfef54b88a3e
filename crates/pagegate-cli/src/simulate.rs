//! One simulated request against an in-memory session.

use anyhow::{Context, Result};
use clap::Args;
use pagegate_auth::{GateError, Principal, Redirect};
use pagegate_runtime::config::GateSettings;
use pagegate_runtime::{
    AccessGate, MemoryAuthStore, PageEntry, RecordingEventBus, RecordingNotifications,
    StaticRequest, REDIRECT_PARAM,
};
use pagegate_types::ErrorCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Who is asking, and how.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Start with a session for this login
    #[arg(long)]
    pub login: Option<String>,

    /// Groups of the logged-in principal (comma-separated)
    #[arg(long, value_delimiter = ',', requires = "login")]
    pub groups: Vec<String>,

    /// Bearer token sent with the request
    #[arg(long)]
    pub token: Option<String>,

    /// Send the request as an AJAX call
    #[arg(long)]
    pub ajax: bool,

    /// Act as this login (requires --login)
    #[arg(long, requires = "login")]
    pub impersonate: Option<String>,

    /// Full URL of the request
    #[arg(long, default_value = "/")]
    pub url: String,

    /// Value of the `redirect` post parameter
    #[arg(long)]
    pub then: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PageEnter,
    Logout,
    StopImpersonating,
}

/// Prints `ok` or fails with the policy error.
pub fn validate(settings: &GateSettings) -> Result<String> {
    settings.validate().context("invalid access policy")?;
    Ok("ok".to_string())
}

/// Builds the session and request described by `args` and runs `action`.
pub fn run(settings: &GateSettings, args: &RequestArgs, action: Action) -> Result<String> {
    let store = Arc::new(seed_store(settings, args)?);
    let events = Arc::new(RecordingEventBus::new());
    let notes = Arc::new(RecordingNotifications::new());

    let gate = AccessGate::from_settings(settings, store)
        .events(events.clone())
        .notifications(notes.clone())
        .build();
    let request = build_request(args);

    let mut output = match action {
        Action::PageEnter => page_enter(&gate, &request)?,
        Action::Logout => redirect_json(&gate.on_logout(&request).map_err(with_code)?),
        Action::StopImpersonating => {
            redirect_json(&gate.on_stop_impersonating(&request).map_err(with_code)?)
        }
    };

    if action != Action::PageEnter {
        output["events"] = events.events().into_iter().map(|e| json!(e.name)).collect();
        output["messages"] = json!(notes.messages());
    }

    Ok(serde_json::to_string(&output)?)
}

fn seed_store(settings: &GateSettings, args: &RequestArgs) -> Result<MemoryAuthStore> {
    let store = MemoryAuthStore::new();
    for (token, fixture) in &settings.tokens {
        store.register_token(token.clone(), fixture.to_principal());
    }

    if let Some(ref login) = args.login {
        debug!(login = %login, groups = ?args.groups, "Seeding session");
        store.login(Principal::new(login.clone()).with_groups(args.groups.iter().cloned()));
    }
    if let Some(ref target) = args.impersonate {
        store
            .impersonate(Principal::new(target.clone()))
            .context("cannot start impersonation")?;
    }

    Ok(store)
}

fn build_request(args: &RequestArgs) -> StaticRequest {
    let mut request = StaticRequest::new(args.url.clone());
    if args.ajax {
        request = request.ajax();
    }
    if let Some(ref token) = args.token {
        request = request.with_bearer(token);
    }
    if let Some(ref then) = args.then {
        request = request.with_post_param(REDIRECT_PARAM, then.clone());
    }
    request
}

fn page_enter(gate: &AccessGate, request: &StaticRequest) -> Result<Value> {
    let interceptor = gate.init_request(request).map_err(with_code)?;
    if let Some(ajax) = interceptor.intercept().map_err(with_code)? {
        return Ok(json!({ "outcome": "redirect", "url": ajax.redirect, "ajax": true }));
    }

    match gate.on_page_enter().map_err(with_code)? {
        PageEntry::Redirect(redirect) => Ok(redirect_json(&redirect)),
        PageEntry::Render(ctx) => {
            let mut output = serde_json::to_value(&ctx)?;
            output["outcome"] = json!("render");
            Ok(output)
        }
    }
}

fn redirect_json(redirect: &Redirect) -> Value {
    json!({
        "outcome": "redirect",
        "url": redirect.url(),
        "kind": redirect.kind().as_str(),
    })
}

fn with_code(err: GateError) -> anyhow::Error {
    let code = err.code();
    anyhow::Error::new(err).context(format!("gate failed [{code}]"))
}
