use scrim_coordinator::AppError;

#[test]
fn display_prefixes_each_variant() {
    let cases = [
        (AppError::Config("x".into()), "config: x"),
        (AppError::PermissionDenied("x".into()), "permission denied: x"),
        (AppError::NotParticipant("x".into()), "not a participant: x"),
        (AppError::SessionNotFound("x".into()), "session not found: x"),
        (AppError::Provisioning("x".into()), "provisioning: x"),
        (AppError::Persistence("x".into()), "persistence: x"),
        (AppError::DuplicateResult("x".into()), "duplicate result: x"),
        (AppError::ElectionClosed("x".into()), "election closed: x"),
        (AppError::InvalidTransition("x".into()), "invalid transition: x"),
        (AppError::InvalidAction("x".into()), "invalid action: x"),
        (AppError::InvalidSignature("x".into()), "invalid signature: x"),
        (AppError::Io("x".into()), "io: x"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn only_interaction_rejections_are_user_facing() {
    assert!(AppError::PermissionDenied(String::new()).is_user_facing());
    assert!(AppError::NotParticipant(String::new()).is_user_facing());
    assert!(AppError::SessionNotFound(String::new()).is_user_facing());
    assert!(AppError::ElectionClosed(String::new()).is_user_facing());
    assert!(AppError::InvalidAction(String::new()).is_user_facing());

    assert!(!AppError::Provisioning(String::new()).is_user_facing());
    assert!(!AppError::Persistence(String::new()).is_user_facing());
    assert!(!AppError::Config(String::new()).is_user_facing());
    assert!(!AppError::InvalidTransition(String::new()).is_user_facing());
}

#[test]
fn json_errors_become_persistence_errors() {
    let err: AppError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, AppError::Persistence(_)));
}

#[test]
fn io_errors_convert() {
    let err: AppError = std::io::Error::other("disk gone").into();
    assert!(matches!(err, AppError::Io(msg) if msg.contains("disk gone")));
}
