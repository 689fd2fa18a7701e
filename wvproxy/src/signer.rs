use sha1::{Digest, Sha1};

use crate::crypto::{BLOCK_SIZE, RootCipher, pkcs7_pad};
use crate::error::{ProxyError, ProxyResult};

/**
    Request signer keyed by the partner root key and IV.

    A signature is `AES-CBC(root_key, root_iv, PKCS7(SHA1(payload)))`, always
    32 bytes. The IV is static, so signing is deterministic: the same payload
    under the same key material always yields the same bytes. This is an
    integrity tag only; it gives neither confidentiality nor replay protection.
*/
#[derive(Clone)]
pub struct Signer {
    cipher: RootCipher,
    iv: [u8; BLOCK_SIZE],
}

impl Signer {
    /**
        Validate the key material and build a signer.

        Fails with [`ProxyError::Crypto`] when the key is not a valid AES key
        length or the IV is not exactly one block.
    */
    pub fn new(key: &[u8], iv: &[u8]) -> ProxyResult<Self> {
        let cipher = RootCipher::new(key)?;
        let iv: [u8; BLOCK_SIZE] = iv.try_into().map_err(|_| {
            ProxyError::Crypto(format!(
                "root IV must be {BLOCK_SIZE} bytes, got {}",
                iv.len()
            ))
        })?;
        Ok(Self { cipher, iv })
    }

    /**
        Sign the exact bytes of a serialized inner message.
    */
    pub fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let digest = Sha1::digest(payload);
        let padded = pkcs7_pad(&digest, BLOCK_SIZE);
        self.cipher.cbc_encrypt(&self.iv, &padded)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").finish_non_exhaustive()
    }
}
