use std::time::{Duration, Instant};

/// Delay between a submitted message and its scripted reply.
pub const REPLY_DELAY: Duration = Duration::from_millis(700);

/// The assistant is a local stand-in: every submission gets this one reply.
pub const SCRIPTED_REPLY: &str =
    "I can summarize the current plan or highlight weak areas. Try \"summary\" or \"weak areas\".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub sender: Sender,
    pub text: String,
}

/// Append-only chat log. Each submission schedules exactly one reply;
/// replies are delay-chained per submission, not a shared queue, so two
/// rapid submissions produce two independent due times.
#[derive(Debug, Default)]
pub struct AssistantLog {
    bubbles: Vec<ChatBubble>,
    pending: Vec<Instant>,
}

impl AssistantLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bubbles(&self) -> &[ChatBubble] {
        &self.bubbles
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Trims and appends a user bubble, scheduling the reply. Empty input
    /// is dropped silently.
    pub fn submit(&mut self, input: &str, now: Instant) -> bool {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.bubbles.push(ChatBubble {
            sender: Sender::User,
            text: trimmed.to_string(),
        });
        self.pending.push(now + REPLY_DELAY);
        true
    }

    /// Appends one scripted bubble per due reply. Returns how many arrived.
    pub fn tick(&mut self, now: Instant) -> usize {
        let before = self.pending.len();
        self.pending.retain(|due| *due > now);
        let arrived = before - self.pending.len();
        for _ in 0..arrived {
            self.bubbles.push(ChatBubble {
                sender: Sender::Assistant,
                text: SCRIPTED_REPLY.to_string(),
            });
        }
        arrived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_whitespace_input_is_dropped() {
        let now = Instant::now();
        let mut log = AssistantLog::new();
        assert!(!log.submit("", now));
        assert!(!log.submit("   \t ", now));
        assert!(log.bubbles().is_empty());
        assert!(!log.has_pending());
    }

    #[test]
    fn submit_appends_trimmed_user_bubble_immediately() {
        let now = Instant::now();
        let mut log = AssistantLog::new();
        assert!(log.submit("  weak areas  ", now));

        assert_eq!(log.bubbles().len(), 1);
        assert_eq!(log.bubbles()[0].sender, Sender::User);
        assert_eq!(log.bubbles()[0].text, "weak areas");
    }

    #[test]
    fn reply_arrives_only_after_the_delay() {
        let now = Instant::now();
        let mut log = AssistantLog::new();
        log.submit("summary", now);

        assert_eq!(log.tick(now), 0);
        assert_eq!(log.tick(now + REPLY_DELAY / 2), 0);
        assert_eq!(log.tick(now + REPLY_DELAY), 1);

        assert_eq!(log.bubbles().len(), 2);
        assert_eq!(log.bubbles()[1].sender, Sender::Assistant);
        assert_eq!(log.bubbles()[1].text, SCRIPTED_REPLY);
    }

    #[test]
    fn each_submission_gets_its_own_reply() {
        let now = Instant::now();
        let mut log = AssistantLog::new();
        log.submit("first", now);
        log.submit("second", now + Duration::from_millis(100));

        assert_eq!(log.tick(now + REPLY_DELAY), 1);
        assert_eq!(log.tick(now + REPLY_DELAY + Duration::from_millis(100)), 1);
        assert_eq!(log.bubbles().len(), 4);
    }

    #[test]
    fn log_is_append_only_and_ordered() {
        let now = Instant::now();
        let mut log = AssistantLog::new();
        log.submit("a", now);
        log.tick(now + REPLY_DELAY);
        log.submit("b", now + REPLY_DELAY);

        let senders: Vec<Sender> = log.bubbles().iter().map(|b| b.sender).collect();
        assert_eq!(senders, vec![Sender::User, Sender::Assistant, Sender::User]);
    }
}
