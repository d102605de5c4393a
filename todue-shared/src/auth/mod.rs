/// Authentication for ToDue
///
/// - `password`: Argon2id hashing and verification, plus the minimum-length
///   registration policy
/// - `session`: Server-side session store backing the signed session cookie

pub mod password;
pub mod session;
