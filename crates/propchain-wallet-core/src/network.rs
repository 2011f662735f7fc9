use crate::domain::ChainDescriptor;
use crate::ports::{AccountCachePort, EntropyPort, PortError, ProviderAvailability, ProviderPort};
use crate::session::{WalletSession, MSG_NOT_DETECTED};

pub(crate) const MSG_SWITCH_REJECTED: &str = "Network switch rejected";
pub(crate) const MSG_SWITCH_FAILED: &str = "Failed to switch network";
pub(crate) const MSG_ADD_FAILED: &str = "Failed to add network";

impl<P, S, E> WalletSession<P, S, E>
where
    P: ProviderPort,
    S: AccountCachePort,
    E: EntropyPort,
{
    /// Asks the wallet to switch to the fixed target chain. When the wallet
    /// does not recognize the chain (4902), registers it from the immutable
    /// descriptor; registration success counts as switch success. On success
    /// the local chain is set optimistically without waiting for the
    /// corroborating `chainChanged` event.
    pub fn switch_network(&self) -> Result<(), PortError> {
        if let ProviderAvailability::Unavailable(_) = self.provider.availability() {
            self.set_error(MSG_NOT_DETECTED)?;
            return Err(PortError::NotDetected);
        }

        let target = self.target_chain_id();
        match self.provider.switch_chain(target) {
            Ok(()) => {
                self.handle_chain_changed(target)?;
                Ok(())
            }
            Err(PortError::UnrecognizedChain) => {
                let Some(descriptor) = ChainDescriptor::known(target) else {
                    self.set_error(MSG_ADD_FAILED)?;
                    return Err(PortError::Validation(format!(
                        "no descriptor registered for chain {target}"
                    )));
                };
                match self.provider.add_chain(&descriptor) {
                    Ok(()) => {
                        self.handle_chain_changed(target)?;
                        Ok(())
                    }
                    Err(err) => {
                        self.set_error(MSG_ADD_FAILED)?;
                        Err(err)
                    }
                }
            }
            Err(PortError::Rejected) => {
                self.set_error(MSG_SWITCH_REJECTED)?;
                Err(PortError::Rejected)
            }
            Err(err) => {
                self.set_error(MSG_SWITCH_FAILED)?;
                Err(err)
            }
        }
    }

    /// True iff the current chain equals the target. False while the chain is
    /// still unknown.
    pub fn is_on_target_network(&self) -> Result<bool, PortError> {
        let g = self.lock()?;
        Ok(g.session.chain_id == Some(self.target_chain_id()))
    }
}
