use md5::{Digest, Md5};

/// Computes the request signature shared by client and server.
///
/// The digest is MD5 over `path ++ secret ++ timestamp` with no delimiter
/// between the fields, rendered as lowercase hex. Both sides must produce
/// byte-identical output for the same inputs; validation is an exact string
/// comparison, never a prefix or case-insensitive match.
pub fn compute_signature(path: &str, secret: &str, timestamp: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(path.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(timestamp.as_bytes());
    hex::encode(hasher.finalize())
}
