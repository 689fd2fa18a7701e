/*!
    Symmetric primitives behind the request signer.

    - AES-CBC encryption under the partner root key and IV
    - PKCS#7 padding of the digest up to the AES block size
*/

mod aes;
mod padding;

pub(crate) use self::aes::{BLOCK_SIZE, RootCipher};
pub(crate) use self::padding::pkcs7_pad;
