/// Fresh nonce for correlating an IPC command with its reply.
pub fn new_nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}
