/**
    Apply PKCS#7 padding to plaintext before AES-CBC encryption.

    Appends 1-16 bytes, each with the value of the padding length, so a
    20-byte SHA-1 digest always grows to 32 bytes.
*/
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad = block_size - (data.len() % block_size);
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}
