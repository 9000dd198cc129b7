use sha3::{Digest, Sha3_256};

pub fn hash_password(password: &str) -> String {
    let digest = Sha3_256::digest(password.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
