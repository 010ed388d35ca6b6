//! Live region for assistive-technology announcements
//!
//! Rendered on the status line. Every `announce` is a new announcement, even
//! with the same text as the previous one, so a repeated validation failure
//! is read out again.

use super::element::Live;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub live: Live,
    /// Monotonic sequence number; distinguishes repeats of the same text
    pub seq: u64,
}

#[derive(Debug, Default)]
pub struct Announcer {
    current: Option<Announcement>,
    next_seq: u64,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announce(&mut self, text: impl Into<String>, live: Live) {
        let text = text.into();
        tracing::debug!(target: "modal_form::a11y", "announce ({:?}): {}", live, text);
        self.next_seq += 1;
        self.current = Some(Announcement {
            text,
            live,
            seq: self.next_seq,
        });
    }

    pub fn current(&self) -> Option<&Announcement> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_text_is_a_new_announcement() {
        let mut announcer = Announcer::new();
        announcer.announce("Email required.", Live::Assertive);
        let first = announcer.current().unwrap().seq;
        announcer.announce("Email required.", Live::Assertive);
        let second = announcer.current().unwrap();

        assert_eq!(second.text, "Email required.");
        assert!(second.seq > first);
    }
}
