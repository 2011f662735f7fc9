mod common;

use propchain_wallet_core::{challenge_message, PortError, VerificationStatus};

use common::{
    account_a, account_b, new_session, ScriptedProvider, SignOutcome, FIXED_NONCE,
};

fn connected_session(sign: SignOutcome, recover: Option<alloy::primitives::Address>) -> common::TestSession {
    let session = new_session(ScriptedProvider::granting(vec![account_a()]));
    session.connect().expect("connect");
    {
        let mut script = session.provider.script();
        script.sign = sign;
        script.recover = recover;
    }
    session
}

#[test]
fn matching_recovery_verifies_ownership() {
    let session = connected_session(SignOutcome::Signature(vec![0x11; 65]), Some(account_a()));

    session.verify_ownership().expect("verify");

    let verification = session.snapshot().expect("snapshot").verification;
    assert_eq!(verification.status, VerificationStatus::Verified);
    assert_eq!(verification.error, None);
}

#[test]
fn recovery_comparison_ignores_hex_casing() {
    let lower: alloy::primitives::Address = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd"
        .parse()
        .expect("lowercase address");
    let upper: alloy::primitives::Address = "0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD"
        .parse()
        .expect("uppercase address");

    let session = new_session(ScriptedProvider::granting(vec![lower]));
    session.connect().expect("connect");
    {
        let mut script = session.provider.script();
        script.sign = SignOutcome::Signature(vec![0x11; 65]);
        script.recover = Some(upper);
    }

    session.verify_ownership().expect("verify");

    assert_eq!(
        session.snapshot().expect("snapshot").verification.status,
        VerificationStatus::Verified
    );
}

#[test]
fn mismatched_recovery_fails_with_mismatch_message() {
    let session = connected_session(SignOutcome::Signature(vec![0x11; 65]), Some(account_b()));

    session.verify_ownership().expect_err("verify must fail");

    let verification = session.snapshot().expect("snapshot").verification;
    assert_eq!(verification.status, VerificationStatus::Failed);
    assert_eq!(
        verification.error.as_deref(),
        Some("Signature does not match the connected account")
    );
}

#[test]
fn signature_rejection_maps_to_user_message() {
    let session = connected_session(SignOutcome::Reject, Some(account_a()));

    let err = session.verify_ownership().expect_err("verify must fail");
    assert!(matches!(err, PortError::Rejected));

    let verification = session.snapshot().expect("snapshot").verification;
    assert_eq!(verification.status, VerificationStatus::Failed);
    assert_eq!(
        verification.error.as_deref(),
        Some("Signature request rejected")
    );
}

#[test]
fn generic_failure_passes_message_through() {
    let session = connected_session(SignOutcome::Fail("provider exploded".to_owned()), None);

    session.verify_ownership().expect_err("verify must fail");

    let verification = session.snapshot().expect("snapshot").verification;
    assert_eq!(verification.status, VerificationStatus::Failed);
    assert!(verification
        .error
        .as_deref()
        .unwrap_or_default()
        .contains("provider exploded"));
}

#[test]
fn verification_requires_a_connected_account() {
    let session = new_session(ScriptedProvider::default());

    session.verify_ownership().expect_err("verify must fail");

    let verification = session.snapshot().expect("snapshot").verification;
    assert_eq!(verification.status, VerificationStatus::Failed);
    assert_eq!(verification.error.as_deref(), Some("No wallet connected"));
}

#[test]
fn challenge_embeds_account_and_nonce() {
    let session = connected_session(SignOutcome::Signature(vec![0x11; 65]), Some(account_a()));

    session.verify_ownership().expect("verify");

    let script = session.provider.script();
    let signed = script.last_signed_message.as_deref().expect("signed message");
    assert_eq!(signed, challenge_message(account_a(), FIXED_NONCE));
    assert!(signed.contains(FIXED_NONCE));
}

#[test]
fn verified_state_ignores_reentrant_triggers() {
    let session = connected_session(SignOutcome::Signature(vec![0x11; 65]), Some(account_a()));
    session.verify_ownership().expect("first verify");

    // A second trigger must not issue another signature request.
    session.provider.script().recover = Some(account_b());
    session.verify_ownership().expect("second verify is a no-op");

    let script = session.provider.script();
    assert_eq!(script.sign_calls, 1);
    drop(script);
    assert_eq!(
        session.snapshot().expect("snapshot").verification.status,
        VerificationStatus::Verified
    );
}

#[test]
fn reset_allows_a_fresh_attempt() {
    let session = connected_session(SignOutcome::Signature(vec![0x11; 65]), Some(account_a()));
    session.verify_ownership().expect("verify");

    session.reset_verification().expect("reset");
    assert_eq!(
        session.snapshot().expect("snapshot").verification.status,
        VerificationStatus::Idle
    );

    session.provider.script().recover = Some(account_b());
    session.verify_ownership().expect_err("mismatch after reset");
    assert_eq!(
        session.snapshot().expect("snapshot").verification.status,
        VerificationStatus::Failed
    );
}

#[test]
fn failed_state_allows_retry() {
    let session = connected_session(SignOutcome::Reject, Some(account_a()));
    session.verify_ownership().expect_err("rejected");

    session.provider.script().sign = SignOutcome::Signature(vec![0x22; 65]);
    session.verify_ownership().expect("retry succeeds");

    assert_eq!(
        session.snapshot().expect("snapshot").verification.status,
        VerificationStatus::Verified
    );
}

#[test]
fn disconnect_resets_verification() {
    let session = connected_session(SignOutcome::Signature(vec![0x11; 65]), Some(account_a()));
    session.verify_ownership().expect("verify");

    session.disconnect().expect("disconnect");

    assert_eq!(
        session.snapshot().expect("snapshot").verification.status,
        VerificationStatus::Idle
    );
}
