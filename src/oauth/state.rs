/// Generate a fresh anti-forgery `state` value.
///
/// The value starts with the current UNIX time and carries a random suffix,
/// so two sessions started within the same second still differ.
pub fn generate_state() -> String {
    let now = chrono::Utc::now().timestamp();
    let nonce: u64 = rand::random();
    format!("{now}-{nonce:016x}")
}
