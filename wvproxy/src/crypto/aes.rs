use aes::{
    Aes128, Aes192, Aes256, Block,
    cipher::{BlockEncrypt, KeyInit},
};

use crate::error::ProxyError;

pub const BLOCK_SIZE: usize = 16;

/**
    AES keyed with the partner root key.

    The key length picks the variant: 16 bytes for AES-128, 24 for AES-192,
    32 for AES-256. Published partner keys are 32 bytes.
*/
#[derive(Clone)]
pub enum RootCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl RootCipher {
    pub fn new(key: &[u8]) -> Result<Self, ProxyError> {
        let cipher = match key.len() {
            16 => Aes128::new_from_slice(key).map(Self::Aes128),
            24 => Aes192::new_from_slice(key).map(Self::Aes192),
            32 => Aes256::new_from_slice(key).map(Self::Aes256),
            n => {
                return Err(ProxyError::Crypto(format!(
                    "root key must be 16, 24 or 32 bytes, got {n}"
                )));
            }
        };
        cipher.map_err(|e| ProxyError::Crypto(e.to_string()))
    }

    fn encrypt_block(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    /**
        AES-CBC encryption of block-aligned plaintext.

        Plaintext must already be padded (see `pkcs7_pad`); the IV is the
        static partner root IV, so equal inputs give equal ciphertexts.
    */
    pub fn cbc_encrypt(&self, iv: &[u8; BLOCK_SIZE], plaintext: &[u8]) -> Vec<u8> {
        debug_assert!(
            !plaintext.is_empty() && plaintext.len().is_multiple_of(BLOCK_SIZE),
            "plaintext must be pre-padded to AES block size"
        );

        let mut ciphertext = Vec::with_capacity(plaintext.len());
        let mut prev = *iv;

        for chunk in plaintext.chunks_exact(BLOCK_SIZE) {
            let mut block = [0u8; BLOCK_SIZE];
            for i in 0..BLOCK_SIZE {
                block[i] = chunk[i] ^ prev[i];
            }
            let mut block_ga = Block::from(block);
            self.encrypt_block(&mut block_ga);
            prev.copy_from_slice(&block_ga);
            ciphertext.extend_from_slice(&block_ga);
        }

        ciphertext
    }
}
