//! Test data shared between the sigblock crates.

// openssl genrsa -traditional -out rsa-1024-pk_1.key 1024
pub const RSA_1024_PK_1: &str = include_str!("../test_assets/private_keys/rsa-1024-pk_1.key");

// openssl pkcs8 -topk8 -nocrypt -in rsa-1024-pk_1.key -out rsa-1024-pk_1-pkcs8.key
pub const RSA_1024_PK_1_PKCS8: &str = include_str!("../test_assets/private_keys/rsa-1024-pk_1-pkcs8.key");

// openssl genrsa -traditional -out rsa-512-pk_1.key 512
pub const RSA_512_PK_1: &str = include_str!("../test_assets/private_keys/rsa-512-pk_1.key");

// openssl req -new -x509 -key rsa-1024-pk_1.key -sha256 -days 36500 \
//     -subj "/CN=Test Signer/O=Sigblock/C=CA" -set_serial 0x1a2b3c4d5e6f -out signer-v3.crt
pub const SIGNER_V3_CERT: &str = include_str!("../test_assets/certificates/signer-v3.crt");

// openssl req -new -key rsa-1024-pk_1.key -subj "/CN=Legacy Signer" -out legacy.csr
// openssl x509 -req -in legacy.csr -signkey rsa-1024-pk_1.key -days 36500 -set_serial 0x80f1 -out legacy-v1.crt
pub const LEGACY_V1_CERT: &str = include_str!("../test_assets/certificates/legacy-v1.crt");

/// Content signed in the end-to-end scenarios.
pub const HELLO_CONTENT: &[u8] = b"Hello world,\nThis is signed.";

/// SHA-1 of [`HELLO_CONTENT`].
///
/// openssl dgst -sha1 -hex
pub const HELLO_SHA1_HEX: &str = "cacb3f1ff1354c8142e2bda407586d8b52f19fb3";

/// RSASSA-PKCS1-v1_5 SHA-1 signature of [`HELLO_CONTENT`] with [`RSA_1024_PK_1`].
///
/// openssl dgst -sha1 -sign rsa-1024-pk_1.key
pub const HELLO_RSA_1024_PK_1_SHA1_SIGNATURE_HEX: &str = "13900f56f2ba8ff692edd197f4335c1cedee23c8b58fc5987e6975c70a1dfdafd88e40c89506725aa69d5b943d499304b500435ee04b3236a29039ef6534918183f6d9639ffa367491645647b863838d88796f3feba8e6ac4762ec72832ba687af52be0d71a69ccf5d1bddc7991179dad5bb238dd3a6c8df93128104e4bedf8d";
