use rand::RngCore;

/// Generates an opaque verification/reset token: 32 random bytes, hex
/// encoded. Carries no payload; validity is looked up in the store.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
