//! Anonymous guest identifiers.

use luxthrift_core::rng::DeterministicRng;

/// Prefix of every generated guest id.
pub const GUEST_ID_PREFIX: &str = "guest_";

/// Number of random characters after the prefix.
pub const GUEST_ID_RANDOM_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Mints a guest id of the form `guest_` followed by nine base-36 characters.
pub fn generate_guest_id(rng: &mut dyn DeterministicRng) -> String {
    let mut id = String::with_capacity(GUEST_ID_PREFIX.len() + GUEST_ID_RANDOM_LEN);
    id.push_str(GUEST_ID_PREFIX);
    for _ in 0..GUEST_ID_RANDOM_LEN {
        let index = rng.next_u32_range(0, 35) as usize;
        id.push(char::from(ALPHABET[index % ALPHABET.len()]));
    }
    id
}
