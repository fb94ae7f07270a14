//! End-to-end registration and login scenarios against shared storage.

use std::sync::Arc;

use auth::{
    AuthError, AuthFlow, AuthForm, AuthStage, FlowConfig, FlowSuccess, StatusKind, UserRecord,
    UserStore,
};
use storage::{FileStore, KeyValueStore, MemoryStore};

fn new_flow() -> (AuthFlow<Arc<MemoryStore>>, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryStore::new());
    let flow = AuthFlow::new(backend.clone(), FlowConfig::default());
    (flow, backend)
}

fn code_of(success: FlowSuccess) -> String {
    match success {
        FlowSuccess::CodeSent { code, .. } => code.to_string(),
        other => panic!("expected CodeSent, got {other:?}"),
    }
}

fn register(flow: &mut AuthFlow<Arc<MemoryStore>>, email: &str, password: &str) {
    let code = code_of(flow.begin_registration(email, password).unwrap());
    flow.confirm_registration(email, &code).unwrap();
}

#[test]
fn registration_commits_account_and_clears_pending() {
    let (mut flow, backend) = new_flow();
    flow.toggle_mode();

    let outcome = flow.submit(&AuthForm::new("a@x.com", "p1"));
    assert_eq!(outcome.status.kind, StatusKind::Success);
    let code = code_of(outcome.result.unwrap());
    assert_eq!(
        flow.stage(),
        &AuthStage::AwaitingCode {
            email: "a@x.com".to_string()
        }
    );

    let outcome = flow.submit(&AuthForm::new("a@x.com", "").with_confirm_code(&code));
    assert_eq!(outcome.status.kind, StatusKind::Success);
    let redirect = outcome.redirect().unwrap();
    assert_eq!(redirect.target, "index.html");
    assert_eq!(redirect.delay.as_millis(), 2000);

    assert_eq!(
        flow.users().load_users(),
        vec![UserRecord::new("a@x.com", "p1").logged_in(true)]
    );
    assert!(!backend.contains("temp_verification_code_a@x.com").unwrap());
    assert!(!backend.contains("temp_register_data_a@x.com").unwrap());
    assert_eq!(
        flow.stage(),
        &AuthStage::Authenticated {
            email: "a@x.com".to_string()
        }
    );
}

#[test]
fn wrong_password_fails_without_mutation() {
    let (mut flow, backend) = new_flow();
    flow.users()
        .save_users(&[UserRecord::new("a@x.com", "p1")])
        .unwrap();
    let before = backend.snapshot().unwrap();

    let outcome = flow.submit(&AuthForm::new("a@x.com", "wrong"));
    assert!(matches!(outcome.result, Err(AuthError::InvalidCredentials)));
    assert_eq!(outcome.status.kind, StatusKind::Error);
    assert!(outcome.redirect().is_none());

    assert_eq!(backend.snapshot().unwrap(), before);
    assert_eq!(flow.stage(), &AuthStage::SignIn);
}

#[test]
fn unknown_email_and_wrong_password_look_the_same() {
    let (mut flow, backend) = new_flow();
    flow.users()
        .save_users(&[UserRecord::new("a@x.com", "p1")])
        .unwrap();
    let before = backend.snapshot().unwrap();

    let unknown = flow.submit(&AuthForm::new("nobody@x.com", "p1"));
    let wrong = flow.submit(&AuthForm::new("a@x.com", "nope"));

    assert_eq!(unknown.status, wrong.status);
    assert_eq!(backend.snapshot().unwrap(), before);
}

#[test]
fn login_leaves_exactly_one_session() {
    let (mut flow, _) = new_flow();
    flow.users()
        .save_users(&[
            UserRecord::new("a@x.com", "p1"),
            UserRecord::new("b@x.com", "p2").logged_in(true),
            UserRecord::new("c@x.com", "p3").logged_in(true),
        ])
        .unwrap();

    let success = flow.login("a@x.com", "p1").unwrap();
    assert!(matches!(success, FlowSuccess::LoggedIn { .. }));

    let users = flow.users().load_users();
    let active: Vec<&str> = users
        .iter()
        .filter(|u| u.is_logged_in)
        .map(|u| u.email.as_str())
        .collect();
    assert_eq!(active, vec!["a@x.com"]);
    // Order is preserved
    assert_eq!(users[1].email, "b@x.com");
}

#[test]
fn last_login_wins() {
    let (mut flow, _) = new_flow();
    register(&mut flow, "a@x.com", "p1");

    let mut other_tab = AuthFlow::new(flow.users().storage().clone(), FlowConfig::default());
    register(&mut other_tab, "b@x.com", "p2");

    flow.login("a@x.com", "p1").unwrap();
    let users = flow.users().load_users();
    assert!(users[0].is_logged_in);
    assert!(!users[1].is_logged_in);
}

#[test]
fn duplicate_email_creates_no_pending_entries() {
    let (mut flow, backend) = new_flow();
    flow.users()
        .save_users(&[UserRecord::new("a@x.com", "p1")])
        .unwrap();
    flow.toggle_mode();

    let outcome = flow.submit(&AuthForm::new("a@x.com", "other"));
    assert!(matches!(outcome.result, Err(AuthError::DuplicateEmail(_))));
    assert_eq!(
        outcome.status.text,
        "Email is already registered. Please sign in."
    );
    assert!(!backend.contains("temp_verification_code_a@x.com").unwrap());
    assert!(!backend.contains("temp_register_data_a@x.com").unwrap());
    assert_eq!(flow.stage(), &AuthStage::Register);
}

#[test]
fn wrong_code_keeps_pending_entries_for_retry() {
    let (mut flow, backend) = new_flow();
    let code = code_of(flow.begin_registration("a@x.com", "p1").unwrap());
    let wrong = if code == "123456" { "654321" } else { "123456" };
    let before = backend.snapshot().unwrap();

    let err = flow.confirm_registration("a@x.com", wrong).unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));
    assert_eq!(backend.snapshot().unwrap(), before);
    assert!(flow.stage().shows_confirm_code());

    // Retry with the right code still works
    flow.confirm_registration("a@x.com", &code).unwrap();
    assert!(flow.users().contains("a@x.com"));
}

#[test]
fn only_latest_code_is_accepted() {
    let (mut flow, _) = new_flow();
    let first = code_of(flow.begin_registration("a@x.com", "old").unwrap());
    let mut second = code_of(flow.begin_registration("a@x.com", "new").unwrap());
    // Regenerate on the rare collision so the stale code really is different
    while first == second {
        second = code_of(flow.begin_registration("a@x.com", "new").unwrap());
    }

    let err = flow.confirm_registration("a@x.com", &first).unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));

    flow.confirm_registration("a@x.com", &second).unwrap();
    assert_eq!(
        flow.users().get_user("a@x.com"),
        Some(UserRecord::new("a@x.com", "new").logged_in(true))
    );
}

#[test]
fn confirming_twice_never_duplicates_an_email() {
    let (mut flow, _) = new_flow();
    let code = code_of(flow.begin_registration("a@x.com", "p1").unwrap());
    flow.confirm_registration("a@x.com", &code).unwrap();

    // Pending entries are gone, so the same code no longer works
    let err = flow.confirm_registration("a@x.com", &code).unwrap_err();
    assert!(matches!(err, AuthError::InvalidCode));

    // And a fresh attempt is rejected up front
    let err = flow.begin_registration("a@x.com", "p2").unwrap_err();
    assert!(matches!(err, AuthError::DuplicateEmail(_)));

    register(&mut flow, "b@x.com", "p2");
    let users = flow.users().load_users();
    let mut emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    emails.sort_unstable();
    emails.dedup();
    assert_eq!(emails.len(), users.len());
}

#[test]
fn user_list_round_trips() {
    let store = UserStore::new(MemoryStore::new());
    let users = vec![
        UserRecord::new("a@x.com", "p1"),
        UserRecord::new("b@x.com", "").logged_in(true),
        UserRecord::new("ünï@x.com", "pä\"ss").logged_in(false),
    ];

    store.save_users(&users).unwrap();
    assert_eq!(store.load_users(), users);
}

#[test]
fn flow_persists_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let backend = Arc::new(FileStore::open(&path).unwrap());
    let mut flow = AuthFlow::new(backend, FlowConfig::default());
    let code = code_of(flow.begin_registration("a@x.com", "p1").unwrap());
    flow.confirm_registration("a@x.com", &code).unwrap();

    // A fresh page load sees the committed account
    let reopened = Arc::new(FileStore::open(&path).unwrap());
    let mut flow = AuthFlow::new(reopened, FlowConfig::default());
    assert!(flow.login("a@x.com", "p1").is_ok());
}
