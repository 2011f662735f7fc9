use propchain_wallet_core::EntropyPort;

/// Nonce source for ownership challenges. Prefers OS randomness; falls back
/// to a clock-seeded mixer so development runtimes without an entropy source
/// still produce distinct nonces.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntropyAdapter;

impl EntropyPort for EntropyAdapter {
    fn challenge_nonce(&self) -> String {
        let mut bytes = [0u8; 16];
        if getrandom::getrandom(&mut bytes).is_err() {
            let seed = web_time::SystemTime::now()
                .duration_since(web_time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x9e37_79b9_7f4a_7c15);
            fill_from_seed(&mut bytes, seed);
        }
        alloy::hex::encode(bytes)
    }
}

// splitmix64
fn fill_from_seed(out: &mut [u8; 16], mut state: u64) {
    for chunk in out.chunks_exact_mut(8) {
        state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^= z >> 31;
        chunk.copy_from_slice(&z.to_le_bytes());
    }
}
