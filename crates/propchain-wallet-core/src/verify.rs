use alloy::primitives::Address;

use crate::domain::{VerificationResult, VerificationStatus};
use crate::ports::{AccountCachePort, EntropyPort, PortError, ProviderPort};
use crate::session::WalletSession;

pub(crate) const MSG_SIGN_REJECTED: &str = "Signature request rejected";
pub(crate) const MSG_SIGN_MISMATCH: &str = "Signature does not match the connected account";
pub(crate) const MSG_NO_WALLET: &str = "No wallet connected";

/// Fixed challenge template. The nonce makes replayed signatures useless;
/// the address binds the challenge to the session account.
pub fn challenge_message(account: Address, nonce: &str) -> String {
    format!("PropChain ownership check\nAddress: {account}\nNonce: {nonce}")
}

impl<P, S, E> WalletSession<P, S, E>
where
    P: ProviderPort,
    S: AccountCachePort,
    E: EntropyPort,
{
    /// Runs the ownership challenge for the connected account: nonce,
    /// `personal_sign`, `personal_ecRecover`, then compares the recovered
    /// address with the session account (parsed addresses compare byte-wise,
    /// so hex casing is irrelevant). Re-entrant triggers are ignored while
    /// pending or after a successful verification.
    pub fn verify_ownership(&self) -> Result<(), PortError> {
        let account = {
            let mut g = self.lock()?;
            match g.verification.status {
                VerificationStatus::Pending | VerificationStatus::Verified => return Ok(()),
                VerificationStatus::Idle | VerificationStatus::Failed => {}
            }
            let Some(account) = g.session.account else {
                g.verification = VerificationResult {
                    status: VerificationStatus::Failed,
                    error: Some(MSG_NO_WALLET.to_owned()),
                };
                return Err(PortError::Validation("no connected account".to_owned()));
            };
            g.verification = VerificationResult {
                status: VerificationStatus::Pending,
                error: None,
            };
            account
        };

        let outcome = self.verify_inner(account);
        let mut g = self.lock()?;
        match outcome {
            Ok(recovered) if recovered == account => {
                g.verification = VerificationResult {
                    status: VerificationStatus::Verified,
                    error: None,
                };
                Ok(())
            }
            Ok(recovered) => {
                g.verification = VerificationResult {
                    status: VerificationStatus::Failed,
                    error: Some(MSG_SIGN_MISMATCH.to_owned()),
                };
                Err(PortError::Validation(format!(
                    "recovered {recovered}, expected {account}"
                )))
            }
            Err(err) => {
                g.verification = VerificationResult {
                    status: VerificationStatus::Failed,
                    error: Some(verify_error_message(&err)),
                };
                Err(err)
            }
        }
    }

    fn verify_inner(&self, account: Address) -> Result<Address, PortError> {
        let nonce = self.entropy.challenge_nonce();
        let message = challenge_message(account, &nonce);
        let signature = self.provider.personal_sign(&message, account)?;
        self.provider.recover_signer(&message, &signature)
    }

    /// Explicit reset back to idle. Account changes do not reset verification
    /// automatically; the UI decides when a fresh challenge is warranted.
    pub fn reset_verification(&self) -> Result<(), PortError> {
        let mut g = self.lock()?;
        g.verification = VerificationResult::default();
        Ok(())
    }
}

fn verify_error_message(err: &PortError) -> String {
    match err {
        PortError::Rejected => MSG_SIGN_REJECTED.to_owned(),
        other => other.to_string(),
    }
}
