//! Chat responses
//!
//! Every line the server sends. All of them are plain newline-terminated text.

/// Sent on protocol lines longer than the configured limit.
pub const LINE_TOO_LONG: &str = "Line too long\n";

/// Welcome notice, to the joining client only.
pub fn welcome(name: &str) -> String {
    format!("Welcome to the chat room, {}!\n", name)
}

/// Join announcement, to everyone else who has joined.
pub fn joined(name: &str) -> String {
    format!("{} has joined the chat room\n", name)
}

/// Reply to a JOIN from a client that already has a name.
pub fn already_joined(name: &str) -> String {
    format!("Already joined as {}\n", name)
}

/// A relayed chat message.
pub fn relay(sender: &str, text: &str) -> String {
    format!("{}: {}\n", sender, text)
}

/// WHO reply: one line per name, no end marker.
pub fn roster(names: &[String]) -> String {
    names.iter().map(|name| format!("{}\n", name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_templates() {
        assert_eq!(welcome("Alice"), "Welcome to the chat room, Alice!\n");
        assert_eq!(joined("Bob"), "Bob has joined the chat room\n");
        assert_eq!(already_joined("Alice"), "Already joined as Alice\n");
        assert_eq!(relay("Alice", "hi"), "Alice: hi\n");
    }

    #[test]
    fn test_roster() {
        let names = vec!["Alice".to_string(), "Bob".to_string()];
        assert_eq!(roster(&names), "Alice\nBob\n");
        assert_eq!(roster(&[]), "");
    }
}
