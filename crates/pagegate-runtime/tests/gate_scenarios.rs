//! End-to-end gate behaviour over the in-memory collaborators.

use pagegate_auth::{
    evaluate, AccessPolicy, AuthStore, Decision, GateError, Principal, RedirectKind,
    SecurityLevel, LOGOUT_MESSAGE, STOP_IMPERSONATE_MESSAGE, USER_LOGOUT_EVENT,
};
use pagegate_runtime::config::AccessConfig;
use pagegate_runtime::{
    AccessGate, MemoryAuthStore, PageEntry, RecordingEventBus, RecordingNotifications,
    StaticPageResolver, StaticRequest,
};
use pagegate_types::ErrorCode;
use std::sync::Arc;

struct Harness {
    store: Arc<MemoryAuthStore>,
    events: Arc<RecordingEventBus>,
    notes: Arc<RecordingNotifications>,
    gate: AccessGate,
}

impl Harness {
    fn new(access: AccessConfig, store: MemoryAuthStore) -> Self {
        let store = Arc::new(store);
        let events = Arc::new(RecordingEventBus::new());
        let notes = Arc::new(RecordingNotifications::new());
        let gate = AccessGate::builder(access, store.clone())
            .pages(StaticPageResolver::new([
                ("home", "/"),
                ("login", "/account/login"),
                ("denied", "/403"),
            ]))
            .events(events.clone())
            .notifications(notes.clone())
            .build();

        Self {
            store,
            events,
            notes,
            gate,
        }
    }
}

fn access(level: SecurityLevel, groups: &[&str], redirect: &str) -> AccessConfig {
    AccessConfig {
        security: level,
        allowed_groups: groups.iter().map(|g| g.to_string()).collect(),
        redirect: Some(redirect.to_string()),
        verify_token: false,
    }
}

// --- policy properties -------------------------------------------------

#[test]
fn all_without_groups_always_allows() {
    let policy = AccessPolicy::new(SecurityLevel::All);
    for authenticated in [true, false] {
        for groups in [&[][..], &["admin"][..], &["x", "y"][..]] {
            assert_eq!(evaluate(&policy, authenticated, groups), Decision::Allow);
        }
    }
}

#[test]
fn guest_level_denies_every_authenticated_viewer() {
    let policy = AccessPolicy::new(SecurityLevel::Guest)
        .with_allowed_groups(["admin"])
        .with_redirect("home");
    for groups in [&[][..], &["admin"][..], &["editor"][..]] {
        assert_eq!(evaluate(&policy, true, groups), Decision::Deny);
    }
}

#[test]
fn user_level_denies_every_guest() {
    for groups in [&[][..], &["admin"][..]] {
        let policy = AccessPolicy::new(SecurityLevel::User)
            .with_allowed_groups(groups.iter().copied())
            .with_redirect("login");
        assert_eq!(evaluate(&policy, false, &[] as &[&str]), Decision::Deny);
    }
}

#[test]
fn group_restriction_is_intersection() {
    let allowed = ["admin", "staff"];
    let cases: [(&[&str], Decision); 4] = [
        (&["admin"], Decision::Allow),
        (&["editor", "staff"], Decision::Allow),
        (&["editor"], Decision::Deny),
        (&[], Decision::Deny),
    ];

    for level in [SecurityLevel::All, SecurityLevel::User] {
        let policy = AccessPolicy::new(level)
            .with_allowed_groups(allowed)
            .with_redirect("denied");
        for (groups, expected) in cases {
            assert_eq!(evaluate(&policy, true, groups), expected, "{level} {groups:?}");
        }
    }
}

// --- page entry scenarios ----------------------------------------------

#[test]
fn user_page_without_redirect_is_configuration_error() {
    let config = AccessConfig {
        security: SecurityLevel::User,
        redirect: Some(String::new()),
        ..AccessConfig::default()
    };
    let h = Harness::new(config, MemoryAuthStore::new());

    let err = h.gate.on_page_enter().expect_err("misconfigured");
    assert!(matches!(err, GateError::MissingRedirect { .. }));
    assert_eq!(err.code(), "GATE_MISSING_REDIRECT");
    assert!(!err.is_recoverable());
}

#[test]
fn guest_page_redirects_authenticated_viewer_home() {
    let h = Harness::new(
        access(SecurityLevel::Guest, &[], "home"),
        MemoryAuthStore::logged_in(Principal::new("alice")),
    );

    match h.gate.on_page_enter().expect("enter") {
        PageEntry::Redirect(redirect) => {
            assert_eq!(redirect.url(), "/");
            assert_eq!(redirect.kind(), RedirectKind::Guest);
        }
        PageEntry::Render(_) => panic!("authenticated viewer reached guest-only page"),
    }
    // Denial keeps the session
    assert!(h.store.current_principal().is_some());
}

#[test]
fn wrong_group_is_redirected_to_denied() {
    let h = Harness::new(
        access(SecurityLevel::All, &["admin"], "denied"),
        MemoryAuthStore::logged_in(Principal::new("ed").with_groups(["editor"])),
    );

    let entry = h.gate.on_page_enter().expect("enter");
    assert_eq!(entry.redirect().map(|r| r.url()), Some("/403"));
}

#[test]
fn allowed_viewer_sees_page_context() {
    let h = Harness::new(
        access(SecurityLevel::User, &["admin"], "login"),
        MemoryAuthStore::logged_in(Principal::new("root").with_groups(["admin"])),
    );

    let entry = h.gate.on_page_enter().expect("enter");
    let ctx = entry.context().expect("render");
    let user = ctx.user.as_ref().expect("user exposed");
    assert_eq!(user.login(), "root");
    assert!(user.last_seen().is_some());
    assert!(ctx.impersonator.is_none());
}

#[test]
fn token_login_then_page_enter() {
    let mut config = access(SecurityLevel::User, &[], "login");
    config.verify_token = true;
    let h = Harness::new(config, MemoryAuthStore::new());
    h.store
        .register_token("abc123", Principal::new("api").with_groups(["bots"]));

    let req = StaticRequest::new("/feed").with_bearer("abc123");
    h.gate.init_request(&req).expect("init");

    let entry = h.gate.on_page_enter().expect("enter");
    let ctx = entry.context().expect("render");
    assert_eq!(ctx.token.as_deref(), Some("abc123"));
    assert_eq!(ctx.user.as_ref().map(Principal::login), Some("api"));
}

#[test]
fn bad_token_falls_back_to_guest_redirect() {
    let mut config = access(SecurityLevel::User, &[], "login");
    config.verify_token = true;
    let h = Harness::new(config, MemoryAuthStore::new());

    let req = StaticRequest::new("/feed").ajax().with_bearer("forged");
    let interceptor = h.gate.init_request(&req).expect("init");

    let ajax = interceptor.intercept().expect("intercept").expect("denied");
    assert_eq!(ajax.redirect, "/account/login");
}

// --- session actions ---------------------------------------------------

#[test]
fn logout_clears_session_and_emits_once() {
    let alice = Principal::new("alice");
    let h = Harness::new(
        AccessConfig::default(),
        MemoryAuthStore::logged_in(alice.clone()),
    );

    let req = StaticRequest::new("/account").with_post_param("redirect", "/bye");
    let redirect = h.gate.on_logout(&req).expect("logout");

    assert_eq!(redirect.url(), "/bye");
    assert_eq!(redirect.kind(), RedirectKind::Plain);
    assert!(h.gate.current_user().expect("current user").is_none());

    let events = h.events.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, USER_LOGOUT_EVENT);
    let emitted: Principal = serde_json::from_value(events[0].payload.clone()).expect("payload");
    assert_eq!(emitted.id(), alice.id());
    assert_eq!(h.notes.messages(), vec![LOGOUT_MESSAGE]);
}

#[test]
fn logout_defaults_to_current_url() {
    let h = Harness::new(
        AccessConfig::default(),
        MemoryAuthStore::logged_in(Principal::new("alice")),
    );

    let redirect = h
        .gate
        .on_logout(&StaticRequest::new("https://example.com/page?x=1"))
        .expect("logout");
    assert_eq!(redirect.url(), "https://example.com/page?x=1");
}

#[test]
fn stop_impersonating_reverts_without_logout_event() {
    let h = Harness::new(
        AccessConfig::default(),
        MemoryAuthStore::logged_in(Principal::new("admin")),
    );
    h.store.impersonate(Principal::new("bob")).expect("impersonate");
    assert_eq!(
        h.gate.current_impersonator().as_ref().map(Principal::login),
        Some("admin")
    );

    let req = StaticRequest::new("/bob/profile").with_post_param("redirect", "/admin/users");
    let redirect = h.gate.on_stop_impersonating(&req).expect("stop");

    assert_eq!(redirect.url(), "/admin/users");
    let user = h.gate.current_user().expect("current user").expect("reverted");
    assert_eq!(user.login(), "admin");
    assert!(h.gate.current_impersonator().is_none());
    assert_eq!(h.events.count(USER_LOGOUT_EVENT), 0);
    assert_eq!(h.notes.messages(), vec![STOP_IMPERSONATE_MESSAGE]);
}

#[test]
fn stop_impersonating_when_normal_matches_logout() {
    let run = |stop: bool| {
        let h = Harness::new(
            AccessConfig::default(),
            MemoryAuthStore::logged_in(Principal::new("alice")),
        );
        let req = StaticRequest::new("/cur").with_post_param("redirect", "/bye");
        let redirect = if stop {
            h.gate.on_stop_impersonating(&req)
        } else {
            h.gate.on_logout(&req)
        }
        .expect("action");
        (
            redirect,
            h.events.count(USER_LOGOUT_EVENT),
            h.notes.messages(),
            h.store.current_principal().is_none(),
        )
    };

    assert_eq!(run(true), run(false));
}

#[test]
fn logout_while_impersonating_ends_both() {
    let h = Harness::new(
        AccessConfig::default(),
        MemoryAuthStore::logged_in(Principal::new("admin")),
    );
    h.store.impersonate(Principal::new("bob")).expect("impersonate");

    h.gate.on_logout(&StaticRequest::new("/")).expect("logout");

    assert!(h.gate.current_user().expect("current user").is_none());
    assert!(h.gate.current_impersonator().is_none());
    let events = h.events.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload["login"], "bob");
}

// --- touch-on-access ---------------------------------------------------

#[test]
fn current_user_advances_last_seen() {
    let h = Harness::new(
        AccessConfig::default(),
        MemoryAuthStore::logged_in(Principal::new("alice")),
    );

    let first = h.gate.current_user().expect("first").and_then(|p| p.last_seen());
    let second = h.gate.current_user().expect("second").and_then(|p| p.last_seen());

    assert!(first.is_some());
    assert!(second >= first);
}

#[test]
fn current_user_while_impersonating_never_touches() {
    let h = Harness::new(
        AccessConfig::default(),
        MemoryAuthStore::logged_in(Principal::new("admin")),
    );
    h.store.impersonate(Principal::new("bob")).expect("impersonate");

    for _ in 0..3 {
        let user = h.gate.current_user().expect("current user").expect("acting");
        assert!(user.last_seen().is_none());
    }
    let session = h.store.session().expect("session");
    assert!(session.principal().last_seen().is_none());
    assert!(session.impersonator().and_then(|p| p.last_seen()).is_none());
}
