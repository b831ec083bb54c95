//! XOR autokey cipher used by Kasa devices
//!
//! Each byte is XORed with the previous *ciphertext* byte, starting from
//! a fixed initial key. Obfuscation, not security; the devices require it
//! on every message.

/// Initial key byte of the autokey chain
const INITIAL_KEY: u8 = 171;

/// Obfuscate a plaintext payload
pub fn encrypt(plain: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    plain
        .iter()
        .map(|&byte| {
            let out = byte ^ key;
            key = out;
            out
        })
        .collect()
}

/// Deobfuscate a device payload
pub fn decrypt(cipher: &[u8]) -> Vec<u8> {
    let mut key = INITIAL_KEY;
    cipher
        .iter()
        .map(|&byte| {
            let out = byte ^ key;
            key = byte;
            out
        })
        .collect()
}

/// Frame a request for the TCP transport: 4-byte big-endian length prefix
/// followed by the obfuscated payload
pub fn encode_frame(json: &str) -> Vec<u8> {
    let body = encrypt(json.as_bytes());
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    frame
}
